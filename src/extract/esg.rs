//! ESG抽出
//!
//! ブロックの全列を対象に、"ESG Overview"から"Action Plan Compliance"までの
//! キー/値の組と、"ESG Improvements"の複数行ナラティブを読み取る。

use crate::grid::Grid;
use crate::layout::LayoutMatcher;
use crate::types::{Block, LabelMap};

/// ブロックのESGセクションを抽出する
///
/// 開始行と終了行の間の各行について、ブロック内の空でないセルを左から集め、
/// 2つ以上あれば1つ目をキー、2つ目を値とします。
///
/// 改善ナラティブは開始列のみから集め、`esg_improvements`ラベルをキーとして格納します。
/// 同名のキー/値が表から集められていた場合は、ナラティブで上書きされます。
pub(crate) fn extract_esg(grid: &Grid, block: Block, matcher: &LayoutMatcher) -> LabelMap<String> {
    let mut esg = LabelMap::new();

    let Some(start) = grid.find_label(block.columns(), &matcher.esg_overview) else {
        return esg;
    };
    let end = grid
        .find_label(block.columns(), &matcher.esg_end)
        .unwrap_or(grid.rows());

    for row in start + 1..end {
        let mut cells = block.columns().filter_map(|col| grid.text(row, col));
        if let (Some(key), Some(value)) = (cells.next(), cells.next()) {
            esg.insert(key, value);
        }
    }

    if let Some(improvements) = grid.find_label(block.columns(), &matcher.esg_improvements) {
        let lines: Vec<String> = (improvements + 1..end)
            .filter_map(|row| grid.text(row, block.start))
            .collect();

        if !lines.is_empty() {
            esg.insert(matcher.layout.esg_improvements.clone(), lines.join("\n"));
        }
    }

    esg
}
