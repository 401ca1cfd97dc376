//! Extract Module
//!
//! 1ブロック分のセクション抽出（フィールド、KPI、ナラティブ、ESG）と、
//! それらを投資レコードへまとめる処理を提供するモジュール。

mod esg;
mod fields;
mod kpi;
mod narrative;

pub(crate) use esg::extract_esg;
pub(crate) use fields::extract_fields;
pub(crate) use kpi::extract_kpis;
pub(crate) use narrative::extract_text_blocks;

use tracing::debug;

use crate::filename::FundQuarter;
use crate::grid::Grid;
use crate::layout::LayoutMatcher;
use crate::record::Investment;
use crate::types::Block;

/// ブロックの投資名を解決する
///
/// 開始列で"Name of Investment"行を探し、その右側（ブロック内）で最初の
/// 空でない、プレースホルダーではないセルを投資名とします。
pub(crate) fn resolve_name(grid: &Grid, block: Block, matcher: &LayoutMatcher) -> Option<String> {
    let row = grid.find_label(block.start..block.start + 1, &matcher.block_label)?;

    (block.start + 1..block.end)
        .filter_map(|col| grid.text(row, col))
        .find(|name| !matcher.is_name_placeholder(name))
}

/// 1ブロックを投資レコードへ変換する
///
/// 投資名が解決できない、またはすべてのセクションが空の場合は`None`を返します。
/// テンプレート上の予約列（将来の投資用の空列）が出力に混ざらないようにするためです。
pub(crate) fn extract_block(
    grid: &Grid,
    block: Block,
    matcher: &LayoutMatcher,
    fund_quarter: &FundQuarter,
) -> Option<Investment> {
    let Some(name) = resolve_name(grid, block, matcher) else {
        debug!(start = block.start, "skipping block without investment name");
        return None;
    };

    let investment = Investment {
        fund: fund_quarter.fund.clone(),
        quarter: fund_quarter.quarter.clone(),
        fields: extract_fields(grid, block.start, matcher),
        kpis: extract_kpis(grid, block.start, matcher),
        text_blocks: extract_text_blocks(grid, block.start, matcher),
        esg: extract_esg(grid, block, matcher),
        name,
    };

    if !investment.has_content() {
        debug!(start = block.start, name = %investment.name, "skipping block with no content");
        return None;
    }

    debug!(
        start = block.start,
        end = block.end,
        name = %investment.name,
        fields = investment.fields.len(),
        text_blocks = investment.text_blocks.len(),
        esg = investment.esg.len(),
        "extracted investment block"
    );
    Some(investment)
}
