//! Document Assembler Module
//!
//! 投資レコードを、索引用のタグ付きフラットテキストへ変換する。

use crate::record::{Document, DocumentMetadata, Investment};

/// ESGドキュメントの見出し
const ESG_HEADER: &str = "ESG Overview";
/// ESGドキュメントのメタデータ上のセクション名
const ESG_SECTION: &str = "ESG";
/// フィールドドキュメントの見出し兼セクション名
const FIELDS_SECTION: &str = "Fields";

/// 投資レコード列からドキュメント列を組み立てる
///
/// 1レコードあたりの出力順は、ナラティブ（見出し表の順）、ESG、フィールドです。
/// 空のセクションからはドキュメントを作りません。
///
/// # 引数
///
/// * `investments` - ブロック順（左から右）に並んだ投資レコード
///
/// # 戻り値
///
/// ブロック順、ブロック内は上記の出力順に並んだドキュメント
pub fn assemble_documents(investments: &[Investment]) -> Vec<Document> {
    investments.iter().flat_map(investment_documents).collect()
}

fn investment_documents(investment: &Investment) -> Vec<Document> {
    let tag = format!(
        "[Company: {}] [Fund: {}] [Quarter: {}]",
        investment.name, investment.fund, investment.quarter
    );
    let mut docs = Vec::new();

    for (title, content) in investment.text_blocks.iter() {
        docs.push(document(investment, &tag, title, title, content));
    }

    if !investment.esg.is_empty() {
        let content = investment
            .esg
            .iter()
            .map(|(k, v)| format!("{}: {}", k, v))
            .collect::<Vec<_>>()
            .join("\n");
        docs.push(document(investment, &tag, ESG_HEADER, ESG_SECTION, &content));
    }

    if !investment.fields.is_empty() {
        let content = investment
            .fields
            .iter()
            .map(|(k, v)| format!("{}: {}", k, v.as_deref().unwrap_or("")))
            .collect::<Vec<_>>()
            .join("\n");
        docs.push(document(
            investment,
            &tag,
            FIELDS_SECTION,
            FIELDS_SECTION,
            &content,
        ));
    }

    docs
}

fn document(
    investment: &Investment,
    tag: &str,
    header: &str,
    section: &str,
    content: &str,
) -> Document {
    Document {
        document: format!("{}\n{}\n\n{}", tag, header, content),
        metadata: DocumentMetadata {
            fund: investment.fund.clone(),
            quarter: investment.quarter.clone(),
            investment: investment.name.clone(),
            section: section.to_string(),
        },
    }
}
