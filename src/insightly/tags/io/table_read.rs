use std::path::Path;

use calamine::{DataType, Reader, Xlsx, open_workbook};
use tracing::{debug, instrument};

use crate::insightly::tags::error::{Result, ToolError};
use crate::insightly::tags::model::RawRow;

/// Loads the data rows of a CSV or XLSX export. The first row is treated as
/// the header and skipped; rows with no content at all are dropped.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn read_rows(path: &Path) -> Result<Vec<RawRow>> {
    if !path.exists() {
        return Err(ToolError::MissingInput(path.to_path_buf()));
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let rows = match extension.as_deref() {
        Some("csv") => read_csv_rows(path)?,
        Some("xlsx") | Some("xlsm") => read_xlsx_rows(path)?,
        _ => return Err(ToolError::UnsupportedFormat(path.to_path_buf())),
    };
    debug!(row_count = rows.len(), "loaded rows");
    Ok(rows)
}

fn read_csv_rows(path: &Path) -> Result<Vec<RawRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: RawRow = record.iter().map(str::to_string).collect();
        if !is_blank(&row) {
            rows.push(row);
        }
    }
    Ok(rows)
}

fn read_xlsx_rows(path: &Path) -> Result<Vec<RawRow>> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ToolError::InvalidWorkbook(format!("{} has no sheets", path.display())))?
        .map_err(ToolError::from)?;

    let rows = range
        .rows()
        .skip(1)
        .map(|row| {
            row.iter()
                .map(|cell| cell_to_string(Some(cell)))
                .collect::<RawRow>()
        })
        .filter(|row| !is_blank(row))
        .collect();
    Ok(rows)
}

fn is_blank(row: &[String]) -> bool {
    row.iter().all(|cell| cell.trim().is_empty())
}

/// Renders a cell the way it would appear in a CSV export. Whole numbers lose
/// their fractional part so numeric student IDs keep their plain form.
fn cell_to_string(cell: Option<&DataType>) -> String {
    match cell {
        Some(DataType::String(value)) => value.clone(),
        Some(DataType::Float(value)) => value.to_string(),
        Some(DataType::Int(value)) => value.to_string(),
        Some(DataType::Bool(value)) => value.to_string(),
        Some(DataType::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn csv_header_and_blank_rows_are_skipped() {
        let dir = tempdir().expect("temporary directory");
        let path = dir.path().join("contacts.csv");
        fs::write(
            &path,
            "StudentID,FirstName,LastName,Tags\nS1,Jane,Doe,\"BIO101, Green\"\n,,,\nS2,John,Roe\n",
        )
        .expect("csv written");

        let rows = read_rows(&path).expect("rows read");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["S1", "Jane", "Doe", "BIO101, Green"]);
        assert_eq!(rows[1], vec!["S2", "John", "Roe"]);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = tempdir().expect("temporary directory");
        let path = dir.path().join("contacts.txt");
        fs::write(&path, "a,b").expect("file written");

        assert!(matches!(
            read_rows(&path),
            Err(ToolError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempdir().expect("temporary directory");
        let path = dir.path().join("absent.csv");
        assert!(matches!(read_rows(&path), Err(ToolError::MissingInput(_))));
    }

    #[test]
    fn whole_floats_render_without_fraction() {
        assert_eq!(cell_to_string(Some(&DataType::Float(1234.0))), "1234");
        assert_eq!(cell_to_string(Some(&DataType::Empty)), "");
    }
}
