//! Fingerprint Module
//!
//! 各セクションの抽出結果を決定的なバイト列（キーをソートした空白なしJSON）に
//! 正規化し、SHA-256でハッシュ化する。存在するセクションハッシュを固定順
//! （fields, kpis, text, esg）で`|`連結したものから全体ハッシュを求めます。
//!
//! 過去の指紋との比較や保存は行いません。

use serde::Serialize;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::error::ExtractError;
use crate::filename::FundQuarter;
use crate::record::{Fingerprint, Investment};
use crate::types::LabelMap;

/// 文字列のSHA-256を小文字16進で返す
pub fn sha256_hex(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

/// 値を正規化JSONに変換する
///
/// すべての階層でオブジェクトのキーを辞書順に並べ、余分な空白を含めずに出力します。
/// 挿入順が異なっても同じ内容なら同じ文字列になります。
/// ASCII以外の文字は`\uXXXX`（小文字16進、BMP外はサロゲートペア）にエスケープします。
pub fn canonical_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ExtractError> {
    let value = serde_json::to_value(value)?;
    Ok(escape_non_ascii(&sort_keys(value).to_string()))
}

/// serde_jsonの出力に残るASCII以外の文字をエスケープする
///
/// 非ASCII文字は文字列リテラルの中にしか現れないため、出力全体を置換してよい。
fn escape_non_ascii(json: &str) -> String {
    if json.is_ascii() {
        return json.to_string();
    }

    let mut out = String::with_capacity(json.len() + 16);
    let mut units = [0u16; 2];
    for ch in json.chars() {
        if ch.is_ascii() {
            out.push(ch);
            continue;
        }
        for unit in ch.encode_utf16(&mut units) {
            out.push_str(&format!("\\u{:04x}", unit));
        }
    }
    out
}

fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut sorted = Map::new();
            for (k, v) in entries {
                sorted.insert(k, sort_keys(v));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

/// セクションごとのハッシュ
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SectionHashes {
    pub fields: Option<String>,
    pub kpis: Option<String>,
    pub text: Option<String>,
    pub esg: Option<String>,
}

impl SectionHashes {
    /// 投資レコードからセクションハッシュを計算する
    ///
    /// 空のセクションはハッシュを持ちません（空構造のハッシュではありません）。
    /// フィールドは値が入力済みのものだけを対象とし、未入力のラベルしかない
    /// テンプレートのフィールドは空として扱います。
    pub fn compute(investment: &Investment) -> Result<Self, ExtractError> {
        let filled: LabelMap<&String> = investment
            .fields
            .iter()
            .filter_map(|(label, value)| value.as_ref().map(|v| (label, v)))
            .collect();

        Ok(Self {
            fields: hash_unless(filled.is_empty(), &filled)?,
            kpis: hash_unless(investment.kpis.is_empty(), &investment.kpis)?,
            text: hash_unless(investment.text_blocks.is_empty(), &investment.text_blocks)?,
            esg: hash_unless(investment.esg.is_empty(), &investment.esg)?,
        })
    }

    /// 固定順で存在するハッシュを列挙
    pub fn present(&self) -> impl Iterator<Item = &str> {
        [&self.fields, &self.kpis, &self.text, &self.esg]
            .into_iter()
            .filter_map(|h| h.as_deref())
    }

    /// 全体ハッシュ（存在するハッシュがなければ`None`）
    pub fn overall(&self) -> Option<String> {
        let parts: Vec<&str> = self.present().collect();
        if parts.is_empty() {
            None
        } else {
            Some(sha256_hex(&parts.join("|")))
        }
    }
}

fn hash_unless<T: Serialize>(empty: bool, value: &T) -> Result<Option<String>, ExtractError> {
    if empty {
        return Ok(None);
    }
    Ok(Some(sha256_hex(&canonical_json(value)?)))
}

/// 投資レコードの指紋を生成する
///
/// すべてのセクションが空の場合は`None`を返します。
pub(crate) fn fingerprint(
    investment: &Investment,
    fund_quarter: &FundQuarter,
) -> Result<Option<Fingerprint>, ExtractError> {
    let hashes = SectionHashes::compute(investment)?;
    let Some(overall_hash) = hashes.overall() else {
        return Ok(None);
    };
    let (year, quarter) = fund_quarter.year_quarter();

    Ok(Some(Fingerprint {
        fund: fund_quarter.fund.clone(),
        quarter_label: fund_quarter.quarter.clone(),
        year,
        quarter,
        company: investment.name.clone(),
        fields_hash: hashes.fields,
        kpi_hash: hashes.kpis,
        text_hash: hashes.text,
        esg_hash: hashes.esg,
        overall_hash,
    }))
}
