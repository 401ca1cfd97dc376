//! Record Module
//!
//! 抽出結果として返すレコード型（投資レコード、KPI行、ドキュメント、指紋）を定義する。
//! すべて`serde::Serialize`を実装し、そのままJSONとして返却できます。

use serde::Serialize;

use crate::types::LabelMap;

/// KPI指標の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KpiMetric {
    Sales,
    Ebitda,
    NetIncome,
    NetDebt,
}

impl KpiMetric {
    /// 固定順の全指標
    pub const ALL: [KpiMetric; 4] = [
        KpiMetric::Sales,
        KpiMetric::Ebitda,
        KpiMetric::NetIncome,
        KpiMetric::NetDebt,
    ];

    /// JSONキー名
    pub fn key(&self) -> &'static str {
        match self {
            KpiMetric::Sales => "sales",
            KpiMetric::Ebitda => "ebitda",
            KpiMetric::NetIncome => "net_income",
            KpiMetric::NetDebt => "net_debt",
        }
    }
}

/// 4つのKPI指標（各指標は独立に存在/欠損）
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Kpis {
    pub sales: Option<f64>,
    pub ebitda: Option<f64>,
    pub net_income: Option<f64>,
    pub net_debt: Option<f64>,
}

impl Kpis {
    /// 指標値を取得
    pub fn get(&self, metric: KpiMetric) -> Option<f64> {
        match metric {
            KpiMetric::Sales => self.sales,
            KpiMetric::Ebitda => self.ebitda,
            KpiMetric::NetIncome => self.net_income,
            KpiMetric::NetDebt => self.net_debt,
        }
    }

    /// 指標値を設定
    pub fn set(&mut self, metric: KpiMetric, value: Option<f64>) {
        let slot = match metric {
            KpiMetric::Sales => &mut self.sales,
            KpiMetric::Ebitda => &mut self.ebitda,
            KpiMetric::NetIncome => &mut self.net_income,
            KpiMetric::NetDebt => &mut self.net_debt,
        };
        *slot = value;
    }

    /// 1つも指標が解析できなかった場合に`true`
    pub fn is_empty(&self) -> bool {
        KpiMetric::ALL.iter().all(|m| self.get(*m).is_none())
    }
}

/// 1ブロック分の投資レコード
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Investment {
    pub fund: String,
    /// "Q<1-4> <year>"形式、または"UNKNOWN"
    pub quarter: String,
    pub name: String,
    pub fields: LabelMap<Option<String>>,
    pub kpis: Kpis,
    pub text_blocks: LabelMap<String>,
    pub esg: LabelMap<String>,
}

impl Investment {
    /// いずれかのセクションに内容があるか
    pub fn has_content(&self) -> bool {
        !self.fields.is_empty()
            || !self.kpis.is_empty()
            || !self.text_blocks.is_empty()
            || !self.esg.is_empty()
    }
}

/// KPIパイプラインの出力行
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiRow {
    pub fund: String,
    pub quarter: String,
    pub company: String,
    pub sales: Option<f64>,
    pub ebitda: Option<f64>,
    pub net_income: Option<f64>,
    pub net_debt: Option<f64>,
}

impl KpiRow {
    pub fn new(fund: &str, quarter: &str, company: &str, kpis: &Kpis) -> Self {
        Self {
            fund: fund.to_string(),
            quarter: quarter.to_string(),
            company: company.to_string(),
            sales: kpis.sales,
            ebitda: kpis.ebitda,
            net_income: kpis.net_income,
            net_debt: kpis.net_debt,
        }
    }
}

/// 索引用ドキュメントのメタデータ
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentMetadata {
    pub fund: String,
    pub quarter: String,
    pub investment: String,
    pub section: String,
}

/// 索引用のフラットなテキストドキュメント
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub document: String,
    pub metadata: DocumentMetadata,
}

/// ブロックごとの内容指紋
///
/// セクションハッシュは、そのセクションが空でない場合のみ存在します。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fingerprint {
    pub fund: String,
    pub quarter_label: String,
    pub year: Option<u16>,
    pub quarter: Option<u8>,
    pub company: String,
    pub fields_hash: Option<String>,
    pub kpi_hash: Option<String>,
    pub text_hash: Option<String>,
    pub esg_hash: Option<String>,
    pub overall_hash: String,
}
