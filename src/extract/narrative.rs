//! ナラティブ（自由記述）セクションの抽出

use crate::grid::Grid;
use crate::layout::LayoutMatcher;
use crate::types::LabelMap;

/// 見出しごとの複数行テキストを抽出する
///
/// 見出し行の次の行から開始列の空でないセルを集め、いずれかの見出しまたは
/// ESG開始ラベルを含むセルに達した時点で止めます（境界行は含みません）。
/// 1行も集まらなかった見出しは結果に含めません。
pub(crate) fn extract_text_blocks(
    grid: &Grid,
    col: usize,
    matcher: &LayoutMatcher,
) -> LabelMap<String> {
    let mut text = LabelMap::new();

    for (title, pattern) in &matcher.narrative {
        let Some(title_row) = grid.find_label(col..col + 1, pattern) else {
            continue;
        };

        let mut lines = Vec::new();
        for row in title_row + 1..grid.rows() {
            let Some(cell) = grid.text(row, col) else {
                continue;
            };
            if matcher.is_narrative_boundary(&cell) {
                break;
            }
            lines.push(cell);
        }

        if !lines.is_empty() {
            text.insert(title.clone(), lines.join("\n"));
        }
    }

    text
}
