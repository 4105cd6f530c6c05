//! Tabular source readers. Every row comes back as plain strings with
//! trailing empty cells removed, so short rows look short regardless of format.

use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader};

use super::ImportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Spreadsheet,
    Csv,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Result<Self, ImportError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(SourceFormat::Spreadsheet),
            "csv" => Ok(SourceFormat::Csv),
            _ => Err(ImportError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Read all rows (header included) off the blocking pool.
pub async fn read_rows(path: PathBuf, sheet: String) -> Result<Vec<Vec<String>>, ImportError> {
    let display = path.display().to_string();
    tokio::task::spawn_blocking(move || read_rows_blocking(&path, &sheet))
        .await
        .map_err(|e| ImportError::Open { path: display, reason: e.to_string() })?
}

pub fn read_rows_blocking(path: &Path, sheet: &str) -> Result<Vec<Vec<String>>, ImportError> {
    match SourceFormat::from_path(path)? {
        SourceFormat::Spreadsheet => read_spreadsheet(path, sheet),
        SourceFormat::Csv => read_csv(path),
    }
}

fn read_spreadsheet(path: &Path, sheet: &str) -> Result<Vec<Vec<String>>, ImportError> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| ImportError::Open { path: path.display().to_string(), reason: e.to_string() })?;
    let range = workbook
        .worksheet_range(sheet)
        .map_err(|e| ImportError::Sheet { sheet: sheet.to_string(), reason: e.to_string() })?;

    Ok(range
        .rows()
        .map(|row| trim_trailing_empty(row.iter().map(cell_to_string).collect()))
        .collect())
}

fn read_csv(path: &Path) -> Result<Vec<Vec<String>>, ImportError> {
    let open_err = |e: csv::Error| ImportError::Open { path: path.display().to_string(), reason: e.to_string() };
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(open_err)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(open_err)?;
        rows.push(trim_trailing_empty(record.iter().map(str::to_string).collect()));
    }
    Ok(rows)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn trim_trailing_empty(mut row: Vec<String>) -> Vec<String> {
    while row.last().is_some_and(|c| c.trim().is_empty()) {
        row.pop();
    }
    row
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn format_follows_extension() {
        assert_eq!(SourceFormat::from_path(Path::new("swift_data.xlsx")).unwrap(), SourceFormat::Spreadsheet);
        assert_eq!(SourceFormat::from_path(Path::new("DATA.CSV")).unwrap(), SourceFormat::Csv);
        assert!(matches!(
            SourceFormat::from_path(Path::new("codes.json")),
            Err(ImportError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn trailing_empty_cells_are_dropped() {
        let row = trim_trailing_empty(vec!["PL".into(), "CODE".into(), "".into(), " ".into()]);
        assert_eq!(row, vec!["PL".to_string(), "CODE".to_string()]);
    }

    #[test]
    fn csv_rows_keep_uneven_lengths() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "COUNTRY ISO2 CODE,SWIFT CODE,CODE TYPE,NAME,ADDRESS,TOWN NAME,COUNTRY NAME,TIME ZONE").unwrap();
        writeln!(file, "PL,ABCDEFGHXXX,BIC11,Bank,\"Prosta 1, floor 2\",Warszawa,Poland,Europe/Warsaw").unwrap();
        writeln!(file, "PL,SHORTROW,,,").unwrap();
        file.flush().unwrap();

        let rows = read_rows_blocking(file.path(), "Sheet1").unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].len(), 8);
        assert_eq!(rows[1][4], "Prosta 1, floor 2");
        assert_eq!(rows[2], vec!["PL".to_string(), "SHORTROW".to_string()]);
    }

    /// Header, one full row with a numeric address cell, one short row.
    pub(crate) fn write_workbook(path: &Path) {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name("Sheet1").unwrap();
        let header = ["COUNTRY ISO2 CODE", "SWIFT CODE", "CODE TYPE", "NAME", "ADDRESS", "TOWN NAME", "COUNTRY NAME", "TIME ZONE"];
        for (col, title) in header.iter().enumerate() {
            sheet.write_string(0, col as u16, *title).unwrap();
        }
        let full = ["PL", "ABCDEFGHXXX", "BIC11", "Bank HQ", "", "Warszawa", "Poland", "Europe/Warsaw"];
        for (col, value) in full.iter().enumerate() {
            if !value.is_empty() {
                sheet.write_string(1, col as u16, *value).unwrap();
            }
        }
        sheet.write_number(1, 4, 12345).unwrap();
        sheet.write_string(2, 0, "PL").unwrap();
        sheet.write_string(2, 1, "SHORTROW").unwrap();
        workbook.save(path).unwrap();
    }

    #[test]
    fn workbook_rows_are_strings_with_short_rows_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("swift_data.xlsx");
        write_workbook(&path);

        let rows = read_rows_blocking(&path, "Sheet1").unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0][1], "SWIFT CODE");
        assert_eq!(rows[1].len(), 8);
        assert_eq!(rows[1][4], "12345");
        assert_eq!(rows[2], vec!["PL".to_string(), "SHORTROW".to_string()]);
    }

    #[test]
    fn unknown_sheet_is_sheet_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("swift_data.xlsx");
        write_workbook(&path);
        let err = read_rows_blocking(&path, "Codes").unwrap_err();
        assert!(matches!(err, ImportError::Sheet { .. }));
    }

    #[test]
    fn missing_workbook_is_open_error() {
        let err = read_rows_blocking(Path::new("/nonexistent/swift_data.xlsx"), "Sheet1").unwrap_err();
        assert!(matches!(err, ImportError::Open { .. }));
    }
}
