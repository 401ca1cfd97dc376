//! Layout Module
//!
//! レポートのレイアウト規約（ワークシート名、ラベル、停止マーカー、KPI定義、
//! ナラティブ見出し、ESGラベル）を定数テーブルとして定義するモジュール。
//!
//! `ReportLayout`は文字列のみを保持する設定値で、`LayoutMatcher`はそれを
//! 正規表現へコンパイルしたものです。抽出関数はすべて`LayoutMatcher`を引数で
//! 受け取り、モジュールレベルの可変状態は持ちません。

use regex::{Regex, RegexBuilder};

use crate::error::ExtractError;
use crate::record::KpiMetric;

/// KPI指標とラベルパターンの組
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KpiLabel {
    pub metric: KpiMetric,
    /// 大文字小文字を区別しない正規表現（部分一致）
    pub pattern: String,
}

impl KpiLabel {
    pub fn new(metric: KpiMetric, pattern: impl Into<String>) -> Self {
        Self {
            metric,
            pattern: pattern.into(),
        }
    }
}

/// レポートのレイアウト規約
///
/// `Default`は四半期ポートフォリオレポートの規約です。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLayout {
    /// 読み込むワークシート名
    pub sheet_name: String,
    /// ブロック開始ラベル（完全一致、大文字小文字無視）
    pub block_label: String,
    /// フィールド抽出でスキップする行ラベル（完全一致、大文字小文字無視）
    pub notes_label: String,
    /// フィールド抽出を終了する行ラベル（部分一致）
    pub field_stop_markers: Vec<String>,
    /// KPI指標の定義
    pub kpi_labels: Vec<KpiLabel>,
    /// ナラティブセクションの見出し（この順で抽出）
    pub narrative_titles: Vec<String>,
    /// ESGセクションの開始ラベル。ナラティブの境界にもなる
    pub esg_overview: String,
    /// ESGセクションの終了ラベル
    pub esg_end: String,
    /// ESG改善ナラティブのラベル（結果のキーにもなる）
    pub esg_improvements: String,
    /// 投資名として扱わないプレースホルダー値（大文字小文字無視）
    pub name_placeholders: Vec<String>,
}

impl Default for ReportLayout {
    fn default() -> Self {
        Self {
            sheet_name: "Portfolio_Input".to_string(),
            block_label: "Name of Investment".to_string(),
            notes_label: "notes:".to_string(),
            field_stop_markers: vec![
                "Year to Date".to_string(),
                "Actual Cash Flows".to_string(),
                "Year on Year".to_string(),
                "ESG Overview".to_string(),
            ],
            kpi_labels: vec![
                KpiLabel::new(KpiMetric::Sales, r"^Sales$"),
                KpiLabel::new(KpiMetric::Ebitda, r"^EBITDA$"),
                KpiLabel::new(KpiMetric::NetIncome, r"^Net income$"),
                KpiLabel::new(KpiMetric::NetDebt, r"^Net debt"),
            ],
            narrative_titles: vec![
                "Investment Overview".to_string(),
                "Significant Events".to_string(),
                "YTD Q3 Analysis".to_string(),
                "March 2025 Budget".to_string(),
                "Exit Plans".to_string(),
            ],
            esg_overview: "ESG Overview".to_string(),
            esg_end: "Action Plan Compliance".to_string(),
            esg_improvements: "ESG Improvements".to_string(),
            name_placeholders: vec![
                "nan".to_string(),
                "none".to_string(),
                "n/a".to_string(),
                "-".to_string(),
                "name of investment".to_string(),
            ],
        }
    }
}

/// コンパイル済みのレイアウト
#[derive(Debug, Clone)]
pub(crate) struct LayoutMatcher {
    pub layout: ReportLayout,
    /// `^<block_label>$`
    pub block_label: Regex,
    pub field_stop: Regex,
    pub kpi: Vec<(KpiMetric, Regex)>,
    /// 見出しと`^<title>$`の組
    pub narrative: Vec<(String, Regex)>,
    /// ナラティブ収集を打ち切る語（小文字化済み）
    pub narrative_boundaries: Vec<String>,
    pub esg_overview: Regex,
    pub esg_end: Regex,
    pub esg_improvements: Regex,
}

impl LayoutMatcher {
    /// レイアウトを検証し、正規表現へコンパイルする
    ///
    /// # 戻り値
    ///
    /// * `Ok(LayoutMatcher)` - コンパイルに成功した場合
    /// * `Err(ExtractError::Config)` - ラベルが空、またはパターンが不正な場合
    pub fn compile(layout: ReportLayout) -> Result<Self, ExtractError> {
        if layout.block_label.trim().is_empty() {
            return Err(ExtractError::Config(
                "Block label must not be empty".to_string(),
            ));
        }
        if layout.field_stop_markers.is_empty() {
            return Err(ExtractError::Config(
                "At least one field stop marker is required".to_string(),
            ));
        }

        let block_label = exact(&layout.block_label)?;

        let stop_alternation = layout
            .field_stop_markers
            .iter()
            .map(|m| regex::escape(m))
            .collect::<Vec<_>>()
            .join("|");
        let field_stop = compile(&format!("({})", stop_alternation))?;

        let kpi = layout
            .kpi_labels
            .iter()
            .map(|label| Ok((label.metric, compile(&label.pattern)?)))
            .collect::<Result<Vec<_>, ExtractError>>()?;

        let narrative = layout
            .narrative_titles
            .iter()
            .map(|title| Ok((title.clone(), exact(title)?)))
            .collect::<Result<Vec<_>, ExtractError>>()?;

        let narrative_boundaries = layout
            .narrative_titles
            .iter()
            .chain(std::iter::once(&layout.esg_overview))
            .map(|s| s.to_lowercase())
            .collect();

        let esg_overview = compile(&regex::escape(&layout.esg_overview))?;
        let esg_end = compile(&regex::escape(&layout.esg_end))?;
        let esg_improvements = compile(&regex::escape(&layout.esg_improvements))?;

        Ok(Self {
            layout,
            block_label,
            field_stop,
            kpi,
            narrative,
            narrative_boundaries,
            esg_overview,
            esg_end,
            esg_improvements,
        })
    }

    /// ナラティブ収集の境界行かどうか（部分一致、大文字小文字無視）
    pub fn is_narrative_boundary(&self, cell: &str) -> bool {
        let lower = cell.to_lowercase();
        self.narrative_boundaries
            .iter()
            .any(|b| lower.contains(b.as_str()))
    }

    /// いずれかのKPIラベルに一致するか
    pub fn is_kpi_label(&self, label: &str) -> bool {
        self.kpi.iter().any(|(_, pattern)| pattern.is_match(label))
    }

    /// 投資名のプレースホルダーかどうか
    pub fn is_name_placeholder(&self, value: &str) -> bool {
        let lower = value.to_lowercase();
        self.layout
            .name_placeholders
            .iter()
            .any(|p| p.to_lowercase() == lower)
    }
}

fn compile(pattern: &str) -> Result<Regex, ExtractError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| ExtractError::Config(format!("Invalid label pattern '{}': {}", pattern, e)))
}

fn exact(label: &str) -> Result<Regex, ExtractError> {
    compile(&format!("^{}$", regex::escape(label)))
}
