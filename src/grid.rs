//! Grid Module
//!
//! ヘッダー行を持たない2次元のセルグリッドと、その上で動作するラベル探索・
//! ブロック分割を提供するモジュール。
//!
//! グリッドは読み込み後は不変で、(行, 列)で参照します。範囲外の参照は空セルとして扱います。

use std::ops::Range;

use regex::Regex;

use crate::types::{Block, CellValue};

static EMPTY_CELL: CellValue = CellValue::Empty;

/// 稠密なセルグリッド（行 × 列）
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    cells: Vec<Vec<CellValue>>,
    rows: usize,
    cols: usize,
}

impl Grid {
    /// 行データからグリッドを構築
    ///
    /// 行ごとの長さが異なる場合は、最長の行に合わせて空セルで埋めます。
    pub fn from_rows(rows: Vec<Vec<CellValue>>) -> Self {
        let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
        let cells: Vec<Vec<CellValue>> = rows
            .into_iter()
            .map(|mut row| {
                row.resize(cols, CellValue::Empty);
                row
            })
            .collect();
        let rows = if cols == 0 { 0 } else { cells.len() };

        Self {
            cells: if rows == 0 { Vec::new() } else { cells },
            rows,
            cols,
        }
    }

    /// 文字列のみの行データからグリッドを構築（空文字列は空セル）
    pub fn from_text_rows<S: AsRef<str>>(rows: &[Vec<S>]) -> Self {
        Self::from_rows(
            rows.iter()
                .map(|row| {
                    row.iter()
                        .map(|s| {
                            let s = s.as_ref();
                            if s.is_empty() {
                                CellValue::Empty
                            } else {
                                CellValue::text(s)
                            }
                        })
                        .collect()
                })
                .collect(),
        )
    }

    /// 空のグリッド
    pub fn empty() -> Self {
        Self::from_rows(Vec::new())
    }

    /// 行数
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// 列数
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// セルを参照する（範囲外は空セル）
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.cells
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    /// セルの文字列表現（空なら`None`）
    pub fn text(&self, row: usize, col: usize) -> Option<String> {
        self.cell(row, col).as_text()
    }

    /// 先頭`max_rows`行だけを持つグリッドを返す
    pub fn head(&self, max_rows: usize) -> Grid {
        Self::from_rows(self.cells.iter().take(max_rows).cloned().collect())
    }

    /// 指定列範囲からパターンに一致する最初の行を探す
    ///
    /// 行優先（0行目の全候補列、次に1行目…）で走査し、最初に一致した行番号を返します。
    /// 一致はセル文字列に対する部分一致です。完全一致が必要な場合は呼び出し側が
    /// `^...$`でアンカーします。
    ///
    /// # 引数
    ///
    /// * `columns` - 候補列の範囲
    /// * `pattern` - 大文字小文字を区別しない正規表現
    ///
    /// # 戻り値
    ///
    /// * `Some(row)` - 最初に一致した行
    /// * `None` - 領域内に一致がない場合
    pub fn find_label(&self, columns: Range<usize>, pattern: &Regex) -> Option<usize> {
        (0..self.rows).find(|&row| {
            columns.clone().any(|col| {
                self.text(row, col)
                    .map(|text| pattern.is_match(&text))
                    .unwrap_or(false)
            })
        })
    }

    /// ブロック開始ラベルを含む列を境界としてブロックに分割する
    ///
    /// 各ブロックは開始列から次の開始列の直前まで（最後のブロックはグリッドの
    /// 最終列まで）です。開始列が見つからない場合は空のリストを返します。
    ///
    /// # 引数
    ///
    /// * `start_label` - `^...$`でアンカーされたブロック開始ラベルのパターン
    pub fn segment_blocks(&self, start_label: &Regex) -> Vec<Block> {
        let starts: Vec<usize> = (0..self.cols)
            .filter(|&col| {
                (0..self.rows).any(|row| {
                    self.text(row, col)
                        .map(|text| start_label.is_match(&text))
                        .unwrap_or(false)
                })
            })
            .collect();

        starts
            .iter()
            .enumerate()
            .map(|(i, &start)| {
                let end = starts.get(i + 1).copied().unwrap_or(self.cols);
                Block::new(start, end)
            })
            .collect()
    }
}
