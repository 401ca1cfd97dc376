//! フィールド抽出
//!
//! "Name of Investment"行の下にあるラベル/値の組を、停止マーカーに達するまで読み取る。

use crate::grid::Grid;
use crate::layout::LayoutMatcher;
use crate::types::LabelMap;

/// ブロックのフィールドを抽出する
///
/// # 引数
///
/// * `grid` - 対象グリッド
/// * `col` - ブロックの開始列（ラベル列）。値は`col + 1`列から読みます
/// * `matcher` - コンパイル済みレイアウト
///
/// # 戻り値
///
/// ラベル→値の順序付きマップ。ラベルは大文字小文字を保持し、値は欠損し得ます。
/// 開始ラベルが見つからない場合は空のマップ。
///
/// KPIラベルに一致する行はKPIセクションに属するため、フィールドには含めません。
pub(crate) fn extract_fields(
    grid: &Grid,
    col: usize,
    matcher: &LayoutMatcher,
) -> LabelMap<Option<String>> {
    let mut fields = LabelMap::new();

    let Some(name_row) = grid.find_label(col..col + 1, &matcher.block_label) else {
        return fields;
    };

    let notes = matcher.layout.notes_label.to_lowercase();
    for row in name_row + 1..grid.rows() {
        let Some(label) = grid.text(row, col) else {
            continue;
        };
        if label.to_lowercase() == notes {
            continue;
        }
        if matcher.field_stop.is_match(&label) {
            break;
        }
        if matcher.is_kpi_label(&label) {
            continue;
        }

        fields.insert(label, grid.text(row, col + 1));
    }

    fields
}
