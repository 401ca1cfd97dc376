//! KPI抽出
//!
//! 開始列で各指標のラベル行を探し、隣接セルの値を数値として読み取る。

use crate::grid::Grid;
use crate::layout::LayoutMatcher;
use crate::record::Kpis;

/// ブロックのKPIを抽出する
///
/// ラベルが見つからない、または値が数値として解析できない指標は欠損（`None`）のままです。
/// 0として扱うことはありません。
pub(crate) fn extract_kpis(grid: &Grid, col: usize, matcher: &LayoutMatcher) -> Kpis {
    let mut kpis = Kpis::default();

    for (metric, pattern) in &matcher.kpi {
        let value = grid
            .find_label(col..col + 1, pattern)
            .and_then(|row| grid.text(row, col + 1))
            .and_then(|raw| parse_number(&raw));
        kpis.set(*metric, value);
    }

    kpis
}

/// 桁区切りのカンマを除去して浮動小数点数として解析する
///
/// 有限値以外（`NaN`、`inf`）は欠損として扱います。
pub(crate) fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    cleaned
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::ReportLayout;
    use crate::types::CellValue;

    fn matcher() -> LayoutMatcher {
        LayoutMatcher::compile(ReportLayout::default()).unwrap()
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("1,234.5"), Some(1234.5));
        assert_eq!(parse_number("-12"), Some(-12.0));
        assert_eq!(parse_number("1e3"), Some(1000.0));
        assert_eq!(parse_number("N/A"), None);
        assert_eq!(parse_number("nan"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number(""), None);
    }

    #[test]
    fn test_extract_kpis_mixed() {
        let grid = Grid::from_rows(vec![
            vec![CellValue::text("Name of Investment"), CellValue::text("Acme Co")],
            vec![CellValue::text("Sales"), CellValue::text("1,000")],
            vec![CellValue::text("EBITDA"), CellValue::text("N/A")],
            vec![CellValue::text("Net income"), CellValue::Number(-25.5)],
            vec![CellValue::text("Net debt (incl. leases)"), CellValue::Number(300.0)],
        ]);

        let kpis = extract_kpis(&grid, 0, &matcher());
        assert_eq!(kpis.sales, Some(1000.0));
        assert_eq!(kpis.ebitda, None);
        assert_eq!(kpis.net_income, Some(-25.5));
        assert_eq!(kpis.net_debt, Some(300.0));
    }

    #[test]
    fn test_extract_kpis_first_occurrence_wins() {
        let grid = Grid::from_text_rows(&[
            vec!["Sales", "10"],
            vec!["Sales", "20"],
        ]);
        assert_eq!(extract_kpis(&grid, 0, &matcher()).sales, Some(10.0));
    }

    #[test]
    fn test_extract_kpis_label_not_found() {
        let grid = Grid::from_text_rows(&[vec!["Turnover", "10"]]);
        assert!(extract_kpis(&grid, 0, &matcher()).is_empty());
    }

    #[test]
    fn test_extract_kpis_labels_only_in_start_column() {
        let grid = Grid::from_text_rows(&[vec!["", "Sales", "10"]]);
        assert!(extract_kpis(&grid, 0, &matcher()).is_empty());
    }
}
