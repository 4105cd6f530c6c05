//! One-shot bulk loader: reads a spreadsheet of SWIFT codes and creates a
//! record per row through the record manager.
//!
//! Short rows are logged and skipped; the first row that fails to create
//! aborts the whole run.

pub mod reader;
pub mod row;

use std::path::Path;

use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::errors::ServiceError;
use crate::swift_code::domain::UpsertOutcome;
use crate::swift_code::repository::SwiftCodeRepository;
use crate::swift_code::SwiftCodeService;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("error opening {path}: {reason}")]
    Open { path: String, reason: String },
    #[error("could not read rows from sheet {sheet}: {reason}")]
    Sheet { sheet: String, reason: String },
    #[error("unsupported import file format: {0}")]
    UnsupportedFormat(String),
    #[error("could not import row {row}, swiftCode={swift_code}: {source}")]
    Row {
        row: usize,
        swift_code: String,
        #[source]
        source: ServiceError,
    },
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub inserted: usize,
    pub updated: usize,
    pub skipped: usize,
}

/// Read `path` (sheet `sheet` for workbooks) and import every data row.
#[instrument(skip(path, svc), fields(path = %path.as_ref().display()))]
pub async fn import_file<R>(
    path: impl AsRef<Path>,
    sheet: &str,
    svc: &SwiftCodeService<R>,
) -> Result<ImportSummary, ImportError>
where
    R: SwiftCodeRepository + ?Sized,
{
    let rows = reader::read_rows(path.as_ref().to_path_buf(), sheet.to_string()).await?;
    info!(rows = rows.len(), "import_file_read");
    import_rows(rows, svc).await
}

/// Import already-read rows; the first row is the header.
pub async fn import_rows<R>(rows: Vec<Vec<String>>, svc: &SwiftCodeService<R>) -> Result<ImportSummary, ImportError>
where
    R: SwiftCodeRepository + ?Sized,
{
    let mut summary = ImportSummary::default();

    for (idx, cells) in rows.iter().enumerate().skip(1) {
        let row_number = idx + 1;
        let Some(input) = row::parse_row(cells) else {
            warn!(row = row_number, columns = cells.len(), "skipping row with fewer columns than expected");
            summary.skipped += 1;
            continue;
        };

        let swift_code = input.swift_code.clone();
        match svc.create(input).await {
            Ok(UpsertOutcome::Inserted) => summary.inserted += 1,
            Ok(UpsertOutcome::Updated { .. }) => summary.updated += 1,
            Err(source) => return Err(ImportError::Row { row: row_number, swift_code, source }),
        }
        summary.imported += 1;
    }

    info!(
        imported = summary.imported,
        inserted = summary.inserted,
        updated = summary.updated,
        skipped = summary.skipped,
        "import_finished"
    );
    Ok(summary)
}
