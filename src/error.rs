//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。
//!
//! ラベルや値が見つからない、数値が解析できない、ファイル名からファンドや四半期が
//! 導出できない、といった状況はエラーではなく「値なし」として扱われます。
//! ここで定義するエラーは、ワークブック自体が読めない場合と設定不備に限られます。

use thiserror::Error;

/// portfolio_extractクレート全体で使用するエラー型
///
/// # エラーの種類
///
/// - `Io`: 入力バッファの読み込み中に発生したエラー
/// - `Parse`: ワークブックの解析に失敗したエラー（calamine由来）
/// - `SheetNotFound`: 対象ワークシートが存在しない
/// - `Serialize`: 指紋計算用の正規化JSONの生成に失敗した
/// - `Config`: 設定の検証に失敗した、またはXLSX以外の形式
/// - `SecurityViolation`: 入力サイズやグリッドサイズの上限超過
///
/// # 使用例
///
/// ```rust,no_run
/// use portfolio_extract::{ExtractError, ExtractorBuilder};
///
/// fn run(bytes: &[u8]) -> Result<(), ExtractError> {
///     let extractor = ExtractorBuilder::new().build()?;
///     let rows = extractor.kpi_rows(bytes, "MCIV_Q3_2025_Report.xlsx")?;
///     println!("{} rows", rows.len());
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum ExtractError {
    /// I/O操作中に発生したエラー
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ワークブックの解析中に発生したエラー
    ///
    /// ファイル形式が不正、破損したファイルなどが原因となります。
    /// `#[from]`属性により、`calamine::Error`から自動的に変換されます。
    #[error("Failed to parse Excel file: {0}")]
    Parse(#[from] calamine::Error),

    /// 対象のワークシートがワークブック内に存在しない
    #[error("Worksheet named '{0}' not found")]
    SheetNotFound(String),

    /// 正規化JSONの生成エラー
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// 設定の検証に失敗したエラー
    ///
    /// `ExtractorBuilder::build()`時に設定を検証し、無効な設定が検出された
    /// 場合に発生します。例えば、シート名が空の場合や、レイアウトの
    /// ラベルパターンが正規表現として不正な場合などです。
    ///
    /// # 例
    ///
    /// ```rust,no_run
    /// use portfolio_extract::{ExtractError, ExtractorBuilder};
    ///
    /// let result = ExtractorBuilder::new().with_sheet_name("").build();
    ///
    /// match result {
    ///     Err(ExtractError::Config(msg)) => {
    ///         println!("設定エラー: {}", msg);
    ///     }
    ///     _ => {}
    /// }
    /// ```
    #[error("Configuration error: {0}")]
    Config(String),

    /// セキュリティ制限に違反したエラー
    #[error("Security violation: {0}")]
    SecurityViolation(String),
}
