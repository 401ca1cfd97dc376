//! Filename Module
//!
//! アップロードされたファイル名からファンドIDと報告四半期を導出する。
//! 一致しない場合は`"UNKNOWN"`を返し、エラーにはしません。

use once_cell::sync::Lazy;
use regex::Regex;

/// 導出できなかった要素のプレースホルダー
pub const UNKNOWN: &str = "UNKNOWN";

static QUARTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Q([1-4])[\s_-]*(\d{4})").expect("quarter pattern is valid"));

static FUND_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)MC[\s_-]*[IVXLCD]+").expect("fund pattern is valid"));

static LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^Q([1-4])\s+(\d{4})").expect("label pattern is valid"));

/// ファンドIDと四半期ラベルの組
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundQuarter {
    /// 例: `"MCIV"`
    pub fund: String,
    /// 例: `"Q3 2025"`
    pub quarter: String,
}

impl FundQuarter {
    /// 四半期ラベルを(年, 四半期)に分解する
    ///
    /// `"Q3 2025"` → `(Some(2025), Some(3))`、`"UNKNOWN"` → `(None, None)`
    pub fn year_quarter(&self) -> (Option<u16>, Option<u8>) {
        match LABEL_RE.captures(&self.quarter) {
            Some(caps) => {
                let quarter = caps[1].parse::<u8>().ok();
                let year = caps[2].parse::<u16>().ok();
                match (year, quarter) {
                    (Some(y), Some(q)) => (Some(y), Some(q)),
                    _ => (None, None),
                }
            }
            None => (None, None),
        }
    }
}

/// ファイル名からファンドIDと四半期を導出する
///
/// - 四半期: `Q<1-4>`に続く4桁の年（区切り文字として空白・`_`・`-`を許容）を
///   `"Q<n> <year>"`に整形
/// - ファンド: `MC`に続くローマ数字風のトークン（I, V, X, L, C, D）を、
///   区切り文字を除去して大文字化
///
/// # 使用例
///
/// ```rust
/// use portfolio_extract::derive_fund_and_quarter;
///
/// let fq = derive_fund_and_quarter("MCIV_Q3_2025_Report.xlsx");
/// assert_eq!(fq.fund, "MCIV");
/// assert_eq!(fq.quarter, "Q3 2025");
/// ```
pub fn derive_fund_and_quarter(filename: &str) -> FundQuarter {
    let quarter = QUARTER_RE
        .captures(filename)
        .map(|caps| format!("Q{} {}", &caps[1], &caps[2]))
        .unwrap_or_else(|| UNKNOWN.to_string());

    let fund = FUND_RE
        .find(filename)
        .map(|m| {
            m.as_str()
                .chars()
                .filter(|c| !matches!(c, ' ' | '_' | '-') && !c.is_whitespace())
                .collect::<String>()
                .to_uppercase()
        })
        .unwrap_or_else(|| UNKNOWN.to_string());

    FundQuarter { fund, quarter }
}
