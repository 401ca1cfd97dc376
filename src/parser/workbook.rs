//! Workbook Parser
//!
//! calamineでXLSXを開き、指定したワークシートを稠密な`Grid`として読み込む。

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader, Sheets, Xlsx};
use chrono::{NaiveDate, NaiveDateTime};

use crate::error::ExtractError;
use crate::grid::Grid;
use crate::security::SecurityConfig;
use crate::types::CellValue;

/// ワークブックパーサー
///
/// calamineのラッパーとして、ワークブックレベルの操作を提供します。
pub(crate) struct WorkbookParser {
    /// calamineのワークブック（XLSX形式のみサポート）
    workbook: Xlsx<Cursor<Vec<u8>>>,
}

impl WorkbookParser {
    /// バイト列からワークブックを開く
    ///
    /// # 引数
    ///
    /// * `bytes` - アップロードされたファイルの内容
    ///
    /// # 戻り値
    ///
    /// * `Ok(WorkbookParser)` - XLSXとして読み込めた場合
    /// * `Err(ExtractError::Parse)` - ワークブックとして読み込めない場合
    /// * `Err(ExtractError::Config)` - XLSX以外の形式の場合
    pub fn open(bytes: Vec<u8>) -> Result<Self, ExtractError> {
        let sheets = open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(ExtractError::Parse)?;
        match sheets {
            Sheets::Xlsx(workbook) => Ok(Self { workbook }),
            _ => Err(ExtractError::Config(
                "Only XLSX format is supported".to_string(),
            )),
        }
    }

    /// すべてのシート名を取得
    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names().to_vec()
    }

    /// ワークシートをグリッドとして読み込む
    ///
    /// セルはシート上の絶対座標（A1が(0, 0)）に配置します。使用範囲が
    /// B3から始まるシートでも、ラベル探索の行番号はシート上の行番号と一致します。
    ///
    /// # 引数
    ///
    /// * `sheet_name` - 読み込むシート名
    /// * `security` - グリッドサイズの上限
    ///
    /// # 戻り値
    ///
    /// * `Ok(Grid)` - 読み込んだグリッド（空のシートは空のグリッド）
    /// * `Err(ExtractError::SheetNotFound)` - シートが存在しない場合
    pub fn load_grid(
        &mut self,
        sheet_name: &str,
        security: &SecurityConfig,
    ) -> Result<Grid, ExtractError> {
        if !self.sheet_names().iter().any(|name| name == sheet_name) {
            return Err(ExtractError::SheetNotFound(sheet_name.to_string()));
        }

        let range = self
            .workbook
            .worksheet_range(sheet_name)
            .map_err(|e| ExtractError::Parse(e.into()))?;

        let (Some((start_row, start_col)), Some((end_row, end_col))) = (range.start(), range.end())
        else {
            return Ok(Grid::empty());
        };

        let rows = end_row as usize + 1;
        let cols = end_col as usize + 1;
        security.check_grid_size(rows, cols)?;

        let mut cells = vec![vec![CellValue::Empty; cols]; rows];
        for (row, col, data) in range.cells() {
            let r = start_row as usize + row;
            let c = start_col as usize + col;
            cells[r][c] = convert_cell(data);
        }

        Ok(Grid::from_rows(cells))
    }
}

/// calamineのセル値を`CellValue`に変換する
fn convert_cell(data: &Data) -> CellValue {
    match data {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::text(if *b { "True" } else { "False" }),
        // 1904年エポックのワークブックもcalamine側で補正される
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(d) if dt.is_datetime() => CellValue::Date(d),
            _ => CellValue::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) => parse_iso_datetime(s)
            .map(CellValue::Date)
            .unwrap_or_else(|| CellValue::Text(s.clone())),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::text(e.to_string()),
        Data::Empty => CellValue::Empty,
    }
}

fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
