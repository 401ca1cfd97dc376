//! Integration Tests for portfolio-extract
//!
//! Workbooks are generated in memory with rust_xlsxwriter and run through the
//! public `Extractor` facade end-to-end.

use portfolio_extract::{
    sha256_hex, ExtractError, Extractor, ExtractorBuilder, KpiRow, UNKNOWN,
};
use rust_xlsxwriter::*;

const REPORT: &str = "MCIV_Q3_2025_Report.xlsx";

// Helper module for generating test fixtures
mod fixtures {
    use super::*;

    /// Write string rows starting at (row0, col0); empty strings are left blank
    pub fn write_rows(
        worksheet: &mut Worksheet,
        row0: u32,
        col0: u16,
        rows: &[&[&str]],
    ) -> Result<(), XlsxError> {
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                if !value.is_empty() {
                    worksheet.write_string(row0 + r as u32, col0 + c as u16, *value)?;
                }
            }
        }
        Ok(())
    }

    /// Single block: "Name of Investment" / "Acme Co", "Sales" / "1,000"
    pub fn generate_single_kpi_block() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Portfolio_Input")?;

        write_rows(
            worksheet,
            0,
            0,
            &[&["Name of Investment", "Acme Co"], &["Sales", "1,000"]],
        )?;

        Ok(workbook.save_to_buffer()?)
    }

    /// Two fully populated blocks side by side plus an empty template block
    pub fn generate_portfolio() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Portfolio_Input")?;

        let acme: &[&[&str]] = &[
            &["Name of Investment", "Acme Co", ""],
            &["Sector", "Industrials", ""],
            &["Notes:", "internal", ""],
            &["Year to Date", "", ""],
            &["Sales", "1,234.5", ""],
            &["EBITDA", "N/A", ""],
            &["Net income", "-20", ""],
            &["Net debt (incl. leases)", "300", ""],
            &["Investment Overview", "", ""],
            &["Leading widget maker.", "", ""],
            &["", "", ""],
            &["Founded 1990.", "", ""],
            &["Exit Plans", "", ""],
            &["Trade sale 2026.", "", ""],
            &["ESG Overview", "", ""],
            &["Carbon footprint", "", "Measured"],
            &["ESG Improvements", "", ""],
            &["Solar panels installed.", "", ""],
            &["Action Plan Compliance", "", ""],
        ];
        write_rows(worksheet, 0, 0, acme)?;

        let beta: &[&[&str]] = &[
            &["Name of Investment", "Beta Ltd"],
            &["Sector", "Software"],
            &["ESG Overview", ""],
            &["Board diversity", "40%"],
            &["Action Plan Compliance", ""],
        ];
        write_rows(worksheet, 0, 3, beta)?;

        // Reserved template column with a placeholder name
        write_rows(worksheet, 0, 5, &[&["Name of Investment", "n/a"]])?;

        Ok(workbook.save_to_buffer()?)
    }

    /// Block whose values are typed cells (number, boolean, date)
    pub fn generate_typed_cells() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Portfolio_Input")?;

        worksheet.write_string(0, 0, "Name of Investment")?;
        worksheet.write_string(0, 1, "Gamma plc")?;
        worksheet.write_string(1, 0, "Headcount")?;
        worksheet.write_number(1, 1, 1000.0)?;
        worksheet.write_string(2, 0, "Listed")?;
        worksheet.write_boolean(2, 1, true)?;
        worksheet.write_string(3, 0, "Date of Investment")?;
        let date = ExcelDateTime::from_ymd(2025, 3, 31)?;
        let format = Format::new().set_num_format("yyyy-mm-dd");
        worksheet.write_datetime_with_format(3, 1, &date, &format)?;
        worksheet.write_string(4, 0, "Sales")?;
        worksheet.write_number(4, 1, 250.75)?;

        Ok(workbook.save_to_buffer()?)
    }

    /// Used range starts at C3, with another sheet in front
    pub fn generate_offset_sheet() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();

        let cover = workbook.add_worksheet();
        cover.set_name("Cover")?;
        cover.write_string(0, 0, "Name of Investment")?;

        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Portfolio_Input")?;
        write_rows(
            worksheet,
            2,
            2,
            &[&["Name of Investment", "Delta"], &["EBITDA", "12"]],
        )?;

        Ok(workbook.save_to_buffer()?)
    }

    /// Worksheet without any block start label
    pub fn generate_no_blocks() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Portfolio_Input")?;
        write_rows(worksheet, 0, 0, &[&["Sales", "100"], &["Sector", "Retail"]])?;
        Ok(workbook.save_to_buffer()?)
    }

    /// Workbook without the Portfolio_Input sheet
    pub fn generate_wrong_sheet() -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Sheet1")?;
        worksheet.write_string(0, 0, "Name of Investment")?;
        Ok(workbook.save_to_buffer()?)
    }
}

fn extractor() -> Extractor {
    ExtractorBuilder::new().build().unwrap()
}

#[test]
fn test_end_to_end_kpi_row() {
    let bytes = fixtures::generate_single_kpi_block().unwrap();
    let rows = extractor().kpi_rows(&bytes, REPORT).unwrap();

    assert_eq!(
        rows,
        vec![KpiRow {
            fund: "MCIV".to_string(),
            quarter: "Q3 2025".to_string(),
            company: "Acme Co".to_string(),
            sales: Some(1000.0),
            ebitda: None,
            net_income: None,
            net_debt: None,
        }]
    );

    let json = serde_json::to_value(&rows).unwrap();
    assert_eq!(json[0]["ebitda"], serde_json::Value::Null);
    assert_eq!(json[0]["sales"], serde_json::json!(1000.0));
}

#[test]
fn test_end_to_end_fingerprint() {
    let bytes = fixtures::generate_single_kpi_block().unwrap();
    let fps = extractor().fingerprints(&bytes, REPORT).unwrap();

    assert_eq!(fps.len(), 1);
    let fp = &fps[0];
    assert_eq!(fp.company, "Acme Co");
    assert_eq!(fp.quarter_label, "Q3 2025");
    assert_eq!(fp.year, Some(2025));
    assert_eq!(fp.quarter, Some(3));
    assert!(fp.fields_hash.is_none());
    assert!(fp.text_hash.is_none());
    assert!(fp.esg_hash.is_none());

    let kpi_hash = fp.kpi_hash.as_deref().unwrap();
    assert_eq!(
        kpi_hash,
        sha256_hex(r#"{"ebitda":null,"net_debt":null,"net_income":null,"sales":1000.0}"#)
    );
    assert_eq!(fp.overall_hash, sha256_hex(kpi_hash));
}

#[test]
fn test_fingerprints_are_deterministic() {
    let bytes = fixtures::generate_portfolio().unwrap();
    let first = extractor().fingerprints(&bytes, REPORT).unwrap();
    let second = extractor().fingerprints(&bytes, REPORT).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_portfolio_blocks_in_column_order() {
    let bytes = fixtures::generate_portfolio().unwrap();
    let investments = extractor().parse_portfolio(&bytes, REPORT).unwrap();

    let names: Vec<&str> = investments.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Acme Co", "Beta Ltd"]);

    let acme = &investments[0];
    assert_eq!(
        acme.fields.keys().collect::<Vec<_>>(),
        vec!["Sector"],
        "notes row skipped and extraction stops at Year to Date"
    );
    assert_eq!(acme.kpis.sales, Some(1234.5));
    assert_eq!(acme.kpis.ebitda, None);
    assert_eq!(acme.kpis.net_income, Some(-20.0));
    assert_eq!(acme.kpis.net_debt, Some(300.0));
    assert_eq!(
        acme.text_blocks.get("Investment Overview").map(String::as_str),
        Some("Leading widget maker.\nFounded 1990.")
    );
    assert_eq!(
        acme.text_blocks.get("Exit Plans").map(String::as_str),
        Some("Trade sale 2026.")
    );
    assert_eq!(
        acme.esg.get("Carbon footprint").map(String::as_str),
        Some("Measured")
    );
    assert_eq!(
        acme.esg.get("ESG Improvements").map(String::as_str),
        Some("Solar panels installed.")
    );

    let beta = &investments[1];
    assert!(beta.kpis.is_empty());
    assert_eq!(beta.esg.get("Board diversity").map(String::as_str), Some("40%"));
}

#[test]
fn test_documents_order() {
    let bytes = fixtures::generate_portfolio().unwrap();
    let docs = extractor().documents(&bytes, REPORT).unwrap();

    let sections: Vec<(&str, &str)> = docs
        .iter()
        .map(|d| (d.metadata.investment.as_str(), d.metadata.section.as_str()))
        .collect();
    assert_eq!(
        sections,
        vec![
            ("Acme Co", "Investment Overview"),
            ("Acme Co", "Exit Plans"),
            ("Acme Co", "ESG"),
            ("Acme Co", "Fields"),
            ("Beta Ltd", "ESG"),
            ("Beta Ltd", "Fields"),
        ]
    );

    assert_eq!(
        docs[1].document,
        "[Company: Acme Co] [Fund: MCIV] [Quarter: Q3 2025]\nExit Plans\n\nTrade sale 2026."
    );
    assert!(docs
        .iter()
        .all(|d| d.metadata.fund == "MCIV" && d.metadata.quarter == "Q3 2025"));
}

#[test]
fn test_kpi_rows_skip_blocks_without_metrics() {
    let bytes = fixtures::generate_portfolio().unwrap();
    let rows = extractor().kpi_rows(&bytes, REPORT).unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].company, "Acme Co");
}

#[test]
fn test_typed_cells() {
    let bytes = fixtures::generate_typed_cells().unwrap();
    let investments = extractor().parse_portfolio(&bytes, REPORT).unwrap();
    let gamma = &investments[0];

    assert_eq!(gamma.fields.get("Headcount"), Some(&Some("1000".to_string())));
    assert_eq!(gamma.fields.get("Listed"), Some(&Some("True".to_string())));
    assert_eq!(
        gamma.fields.get("Date of Investment"),
        Some(&Some("2025-03-31 00:00:00".to_string()))
    );
    assert_eq!(gamma.kpis.sales, Some(250.75));
}

#[test]
fn test_offset_used_range_and_sheet_selection() {
    let bytes = fixtures::generate_offset_sheet().unwrap();
    let extractor = extractor();

    let grid = extractor.load_grid(&bytes).unwrap();
    assert_eq!(grid.text(2, 2).as_deref(), Some("Name of Investment"));

    let rows = extractor.kpi_rows(&bytes, "delta.xlsx").unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].company, "Delta");
    assert_eq!(rows[0].ebitda, Some(12.0));
    assert_eq!(rows[0].fund, UNKNOWN);
    assert_eq!(rows[0].quarter, UNKNOWN);
}

#[test]
fn test_no_blocks_yields_empty_lists() {
    let bytes = fixtures::generate_no_blocks().unwrap();
    let extractor = extractor();

    assert!(extractor.parse_portfolio(&bytes, REPORT).unwrap().is_empty());
    assert!(extractor.kpi_rows(&bytes, REPORT).unwrap().is_empty());
    assert!(extractor.documents(&bytes, REPORT).unwrap().is_empty());
    assert!(extractor.fingerprints(&bytes, REPORT).unwrap().is_empty());
}

#[test]
fn test_missing_worksheet() {
    let bytes = fixtures::generate_wrong_sheet().unwrap();
    let result = extractor().kpi_rows(&bytes, REPORT);

    match result {
        Err(ExtractError::SheetNotFound(name)) => assert_eq!(name, "Portfolio_Input"),
        other => panic!("Expected SheetNotFound, got {:?}", other),
    }

    let err = extractor().documents(&bytes, REPORT).unwrap_err();
    assert_eq!(err.to_string(), "Worksheet named 'Portfolio_Input' not found");
}

#[test]
fn test_custom_sheet_name() {
    let bytes = fixtures::generate_wrong_sheet().unwrap();
    let extractor = ExtractorBuilder::new()
        .with_sheet_name("Sheet1")
        .build()
        .unwrap();

    // Name present but no content in the block
    assert!(extractor.parse_portfolio(&bytes, REPORT).unwrap().is_empty());
}

#[test]
fn test_invalid_file_format() {
    let result = extractor().fingerprints(b"this is not a spreadsheet", REPORT);
    assert!(matches!(
        result,
        Err(ExtractError::Parse(_)) | Err(ExtractError::Config(_))
    ));
}

#[test]
fn test_grid_limit() {
    let bytes = fixtures::generate_offset_sheet().unwrap();
    let extractor = ExtractorBuilder::new()
        .with_max_grid_cells(4)
        .build()
        .unwrap();

    assert!(matches!(
        extractor.load_grid(&bytes),
        Err(ExtractError::SecurityViolation(_))
    ));
}
