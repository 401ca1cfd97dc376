//! Builder Module
//!
//! Fluent Builder APIを提供し、`Extractor`インスタンスを段階的に構築する。

use tracing::{debug, info};

use crate::documents::assemble_documents;
use crate::error::ExtractError;
use crate::extract::{extract_block, extract_kpis, resolve_name};
use crate::filename::{derive_fund_and_quarter, FundQuarter};
use crate::fingerprint::fingerprint;
use crate::grid::Grid;
use crate::layout::{LayoutMatcher, ReportLayout};
use crate::parser::WorkbookParser;
use crate::record::{Document, Fingerprint, Investment, KpiRow};
use crate::security::SecurityConfig;

/// KPI行パイプラインが読み込む行数のデフォルト
const DEFAULT_KPI_ROW_LIMIT: usize = 70;

/// 抽出処理の設定を保持する内部構造体
#[derive(Debug, Clone)]
pub(crate) struct ExtractionConfig {
    /// レポートのレイアウト規約
    pub layout: ReportLayout,

    /// KPI行パイプラインで参照する先頭行数（`None`は全行）
    pub kpi_row_limit: Option<usize>,

    /// 入力サイズの上限
    pub security: SecurityConfig,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            layout: ReportLayout::default(),
            kpi_row_limit: Some(DEFAULT_KPI_ROW_LIMIT),
            security: SecurityConfig::default(),
        }
    }
}

/// Fluent Builder APIを提供する構造体
///
/// `Extractor`インスタンスを段階的に構築するためのビルダーです。
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみをオーバーライドできます。
///
/// # 使用例
///
/// ```rust
/// use portfolio_extract::ExtractorBuilder;
///
/// # fn main() -> Result<(), portfolio_extract::ExtractError> {
/// let extractor = ExtractorBuilder::new()
///     .with_sheet_name("Portfolio_Input")
///     .with_kpi_row_limit(None)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ExtractorBuilder {
    /// 内部設定（構築中）
    config: ExtractionConfig,
}

impl ExtractorBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - レイアウト: 四半期ポートフォリオレポート（シート名`Portfolio_Input`）
    /// - KPI行パイプラインの行数上限: 70
    /// - 入力ファイルサイズ上限: 50MB
    /// - グリッドのセル数上限: 5,000,000
    pub fn new() -> Self {
        Self::default()
    }

    /// レイアウト規約を差し替える
    pub fn with_layout(mut self, layout: ReportLayout) -> Self {
        self.config.layout = layout;
        self
    }

    /// 読み込むワークシート名を指定する
    ///
    /// # 引数
    ///
    /// * `name` - ワークシート名（空文字列は`build()`時にエラー）
    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.config.layout.sheet_name = name.into();
        self
    }

    /// KPI行パイプラインで参照する先頭行数を指定する
    ///
    /// 他のパイプラインには影響しません。
    ///
    /// # 引数
    ///
    /// * `limit` - `Some(n)`で先頭n行のみ、`None`で全行
    pub fn with_kpi_row_limit(mut self, limit: Option<usize>) -> Self {
        self.config.kpi_row_limit = limit;
        self
    }

    /// 入力ファイルサイズの上限（バイト）を指定する
    pub fn with_max_input_size(mut self, bytes: u64) -> Self {
        self.config.security.max_input_file_size = bytes;
        self
    }

    /// グリッドのセル数上限を指定する
    pub fn with_max_grid_cells(mut self, cells: u64) -> Self {
        self.config.security.max_grid_cells = cells;
        self
    }

    /// 設定を検証し、`Extractor`インスタンスを生成する
    ///
    /// # 戻り値
    ///
    /// * `Ok(Extractor)`: 設定が有効な場合
    /// * `Err(ExtractError::Config)`: 設定が無効な場合
    ///
    /// # 発生し得るエラー
    ///
    /// * シート名が空
    /// * KPI行数上限が0
    /// * 入力サイズ上限が0
    /// * レイアウトのラベルが空、またはKPIパターンが正規表現として不正
    pub fn build(self) -> Result<Extractor, ExtractError> {
        if self.config.layout.sheet_name.trim().is_empty() {
            return Err(ExtractError::Config(
                "Sheet name must not be empty".to_string(),
            ));
        }

        if self.config.kpi_row_limit == Some(0) {
            return Err(ExtractError::Config(
                "KPI row limit must be greater than zero".to_string(),
            ));
        }

        if self.config.security.max_input_file_size == 0 {
            return Err(ExtractError::Config(
                "Maximum input size must be greater than zero".to_string(),
            ));
        }

        let matcher = LayoutMatcher::compile(self.config.layout.clone())?;
        Ok(Extractor {
            config: self.config,
            matcher,
        })
    }
}

/// 抽出処理のファサード
///
/// アップロードされたワークブックのバイト列と元のファイル名を受け取り、
/// 4種類のパイプライン（投資レコード、KPI行、ドキュメント、指紋）のいずれかを実行します。
/// 状態を持たないため、`Arc`で共有して並行リクエストから呼び出せます。
///
/// 各パイプラインには、読み込み済みの`Grid`を受け取る`*_from_grid`版があります。
///
/// # 使用例
///
/// ```rust,no_run
/// use portfolio_extract::ExtractorBuilder;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let extractor = ExtractorBuilder::new().build()?;
/// let bytes = std::fs::read("MCIV_Q3_2025_Report.xlsx")?;
/// for fp in extractor.fingerprints(&bytes, "MCIV_Q3_2025_Report.xlsx")? {
///     println!("{} {}", fp.company, fp.overall_hash);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Extractor {
    config: ExtractionConfig,
    matcher: LayoutMatcher,
}

impl Extractor {
    /// 使用中のレイアウト規約
    pub fn layout(&self) -> &ReportLayout {
        &self.config.layout
    }

    /// 使用中のセキュリティ設定
    pub fn security(&self) -> &SecurityConfig {
        &self.config.security
    }

    /// ワークブックのバイト列から対象シートのグリッドを読み込む
    ///
    /// # 戻り値
    ///
    /// * `Ok(Grid)` - 読み込みに成功した場合
    /// * `Err(ExtractError::SecurityViolation)` - 入力またはグリッドが上限を超えた場合
    /// * `Err(ExtractError::Parse)` / `Err(ExtractError::Config)` - ワークブックとして読めない場合
    /// * `Err(ExtractError::SheetNotFound)` - 対象シートが存在しない場合
    pub fn load_grid(&self, bytes: &[u8]) -> Result<Grid, ExtractError> {
        self.config.security.check_input_size(bytes.len())?;

        let mut parser = WorkbookParser::open(bytes.to_vec())?;
        let grid = parser.load_grid(&self.config.layout.sheet_name, &self.config.security)?;

        debug!(
            sheet = %self.config.layout.sheet_name,
            rows = grid.rows(),
            cols = grid.cols(),
            "loaded worksheet grid"
        );
        Ok(grid)
    }

    /// 投資レコードを抽出する
    pub fn parse_portfolio(
        &self,
        bytes: &[u8],
        filename: &str,
    ) -> Result<Vec<Investment>, ExtractError> {
        let grid = self.load_grid(bytes)?;
        Ok(self.parse_portfolio_from_grid(&grid, filename))
    }

    /// 読み込み済みグリッドから投資レコードを抽出する
    ///
    /// # 戻り値
    ///
    /// ブロック順（左から右）の投資レコード。名前が解決できないブロックや、
    /// すべてのセクションが空のブロックは含みません。
    pub fn parse_portfolio_from_grid(&self, grid: &Grid, filename: &str) -> Vec<Investment> {
        let fund_quarter = derive_fund_and_quarter(filename);
        let investments = self.investments(grid, &fund_quarter);

        info!(
            fund = %fund_quarter.fund,
            quarter = %fund_quarter.quarter,
            investments = investments.len(),
            "parsed portfolio"
        );
        investments
    }

    /// KPI行を抽出する
    pub fn kpi_rows(&self, bytes: &[u8], filename: &str) -> Result<Vec<KpiRow>, ExtractError> {
        let grid = self.load_grid(bytes)?;
        Ok(self.kpi_rows_from_grid(&grid, filename))
    }

    /// 読み込み済みグリッドからKPI行を抽出する
    ///
    /// 設定された行数上限までを対象とし、名前が解決でき、かつ1つ以上の指標が
    /// 解析できたブロックのみを出力します。
    pub fn kpi_rows_from_grid(&self, grid: &Grid, filename: &str) -> Vec<KpiRow> {
        let fund_quarter = derive_fund_and_quarter(filename);
        let grid = match self.config.kpi_row_limit {
            Some(limit) => grid.head(limit),
            None => grid.clone(),
        };

        let mut rows = Vec::new();
        for block in grid.segment_blocks(&self.matcher.block_label) {
            let Some(company) = resolve_name(&grid, block, &self.matcher) else {
                debug!(start = block.start, "skipping block without investment name");
                continue;
            };

            let kpis = extract_kpis(&grid, block.start, &self.matcher);
            if kpis.is_empty() {
                debug!(start = block.start, company = %company, "skipping block without KPIs");
                continue;
            }

            rows.push(KpiRow::new(
                &fund_quarter.fund,
                &fund_quarter.quarter,
                &company,
                &kpis,
            ));
        }

        info!(
            fund = %fund_quarter.fund,
            quarter = %fund_quarter.quarter,
            rows = rows.len(),
            "extracted KPI rows"
        );
        rows
    }

    /// 索引用ドキュメントを組み立てる
    pub fn documents(&self, bytes: &[u8], filename: &str) -> Result<Vec<Document>, ExtractError> {
        let grid = self.load_grid(bytes)?;
        Ok(self.documents_from_grid(&grid, filename))
    }

    /// 読み込み済みグリッドから索引用ドキュメントを組み立てる
    pub fn documents_from_grid(&self, grid: &Grid, filename: &str) -> Vec<Document> {
        let fund_quarter = derive_fund_and_quarter(filename);
        let investments = self.investments(grid, &fund_quarter);
        let documents = assemble_documents(&investments);

        info!(
            fund = %fund_quarter.fund,
            quarter = %fund_quarter.quarter,
            investments = investments.len(),
            documents = documents.len(),
            "assembled documents"
        );
        documents
    }

    /// 内容指紋を計算する
    pub fn fingerprints(
        &self,
        bytes: &[u8],
        filename: &str,
    ) -> Result<Vec<Fingerprint>, ExtractError> {
        let grid = self.load_grid(bytes)?;
        self.fingerprints_from_grid(&grid, filename)
    }

    /// 読み込み済みグリッドから内容指紋を計算する
    pub fn fingerprints_from_grid(
        &self,
        grid: &Grid,
        filename: &str,
    ) -> Result<Vec<Fingerprint>, ExtractError> {
        let fund_quarter = derive_fund_and_quarter(filename);

        let mut fingerprints = Vec::new();
        for investment in self.investments(grid, &fund_quarter) {
            if let Some(fp) = fingerprint(&investment, &fund_quarter)? {
                fingerprints.push(fp);
            }
        }

        info!(
            fund = %fund_quarter.fund,
            quarter = %fund_quarter.quarter,
            fingerprints = fingerprints.len(),
            "computed fingerprints"
        );
        Ok(fingerprints)
    }

    fn investments(&self, grid: &Grid, fund_quarter: &FundQuarter) -> Vec<Investment> {
        let blocks = grid.segment_blocks(&self.matcher.block_label);
        debug!(blocks = blocks.len(), "segmented grid into blocks");

        blocks
            .into_iter()
            .filter_map(|block| extract_block(grid, block, &self.matcher, fund_quarter))
            .collect()
    }
}
