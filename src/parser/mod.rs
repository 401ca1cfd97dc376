//! Parser Module
//!
//! calamineを使用したワークブック読み込み。
//! 対象シートを、抽出処理が直接参照する不変の`Grid`へ変換します。

mod workbook;

pub(crate) use workbook::WorkbookParser;
