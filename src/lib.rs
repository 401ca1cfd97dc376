//! portfolio-extract - Block-segmenting extractor for quarterly portfolio report workbooks
//!
//! This crate reads the `Portfolio_Input` worksheet of a quarterly portfolio report,
//! splits the header-less grid into horizontally repeated "investment blocks", and
//! extracts fields, KPIs, narrative sections and ESG pairs from each block.
//! From those records it produces flat KPI rows, tagged text documents for indexing,
//! and per-section content fingerprints for change detection.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use portfolio_extract::ExtractorBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let extractor = ExtractorBuilder::new().build()?;
//!
//!     let bytes = std::fs::read("MCIV_Q3_2025_Report.xlsx")?;
//!     let rows = extractor.kpi_rows(&bytes, "MCIV_Q3_2025_Report.xlsx")?;
//!
//!     println!("{}", serde_json::to_string_pretty(&rows)?);
//!     Ok(())
//! }
//! ```
//!
//! # Working on an in-memory grid
//!
//! Every pipeline has a `*_from_grid` variant that skips workbook loading:
//!
//! ```rust
//! use portfolio_extract::{ExtractorBuilder, Grid};
//!
//! # fn main() -> Result<(), portfolio_extract::ExtractError> {
//! let extractor = ExtractorBuilder::new().build()?;
//! let grid = Grid::from_text_rows(&[
//!     vec!["Name of Investment", "Acme Co"],
//!     vec!["Sales", "1,000"],
//! ]);
//!
//! let fingerprints = extractor.fingerprints_from_grid(&grid, "MCIV_Q3_2025.xlsx")?;
//! assert_eq!(fingerprints.len(), 1);
//! assert!(fingerprints[0].kpi_hash.is_some());
//! assert!(fingerprints[0].fields_hash.is_none());
//! # Ok(())
//! # }
//! ```
//!
//! # Serving over HTTP
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use portfolio_extract::{router, ExtractorBuilder};
//!
//! # async fn serve() -> Result<(), Box<dyn std::error::Error>> {
//! let app = router(Arc::new(ExtractorBuilder::new().build()?));
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

mod builder;
mod documents;
mod error;
mod extract;
mod filename;
mod fingerprint;
mod grid;
mod http;
mod layout;
mod parser;
mod record;
mod security;
mod types;

pub use builder::{Extractor, ExtractorBuilder};
pub use documents::assemble_documents;
pub use error::ExtractError;
pub use filename::{derive_fund_and_quarter, FundQuarter, UNKNOWN};
pub use fingerprint::{canonical_json, sha256_hex, SectionHashes};
pub use grid::Grid;
pub use http::router;
pub use layout::{KpiLabel, ReportLayout};
pub use record::{
    Document, DocumentMetadata, Fingerprint, Investment, KpiMetric, KpiRow, Kpis,
};
pub use security::SecurityConfig;
pub use types::{Block, CellValue, LabelMap};
