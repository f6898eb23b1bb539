use crate::domain::ports::SheetSource;
use crate::domain::workbook::{CellValue, Sheet};
use crate::utils::error::Result;
use crate::utils::validation;
use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Extensions calamine can open.
pub const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// An `.xlsx`/`.xls`/`.ods` workbook opened with calamine.
pub struct XlsxWorkbook {
    path: PathBuf,
    names: Vec<String>,
    inner: Sheets<BufReader<File>>,
}

impl XlsxWorkbook {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        validation::validate_file_extensions(
            "workbook",
            &[path.to_string_lossy().to_string()],
            WORKBOOK_EXTENSIONS,
        )?;
        let inner = open_workbook_auto(&path)?;
        let names = inner.sheet_names();
        tracing::debug!("Opened {} ({} sheets)", path.display(), names.len());

        Ok(Self { path, names, inner })
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

impl SheetSource for XlsxWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.names.clone()
    }

    fn read_sheet(&mut self, name: &str) -> Result<Sheet> {
        let range = self.inner.worksheet_range(name)?;
        Ok(sheet_from_range(name, &range))
    }
}

/// Lays the used range out on a grid anchored at A1, so that row and
/// column indices count from the top-left corner of the sheet.
fn sheet_from_range(name: &str, range: &Range<Data>) -> Sheet {
    let (row_offset, col_offset) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));

    let mut rows: Vec<Vec<CellValue>> = vec![Vec::new(); row_offset];
    for source_row in range.rows() {
        let mut row = vec![CellValue::Empty; col_offset];
        row.extend(source_row.iter().map(cell_value));
        rows.push(row);
    }

    Sheet::new(name, rows)
}

fn cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) if s.trim().is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => match excel_serial_to_datetime(dt.as_f64()) {
            Some(value) => CellValue::Date(value),
            None => CellValue::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) => NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
            .or_else(|_| {
                NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .map(|d| d.and_time(chrono::NaiveTime::MIN))
            })
            .map(CellValue::Date)
            .unwrap_or_else(|_| CellValue::Text(s.clone())),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Error(e.to_string()),
    }
}

/// Excel serial dates count days from 1899-12-30 (1900 date system).
fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round() as i64;
    epoch.checked_add_signed(TimeDelta::try_milliseconds(millis)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excel_serial_dates() {
        let date = excel_serial_to_datetime(45658.0).unwrap();
        assert_eq!(date.format("%Y-%m-%d").to_string(), "2025-01-01");

        let noon = excel_serial_to_datetime(45658.5).unwrap();
        assert_eq!(noon.format("%H:%M").to_string(), "12:00");
        assert!(excel_serial_to_datetime(f64::NAN).is_none());
    }

    #[test]
    fn test_cell_conversion() {
        assert_eq!(cell_value(&Data::Int(7)), CellValue::Number(7.0));
        assert_eq!(cell_value(&Data::String("  ".into())), CellValue::Empty);
        assert_eq!(
            cell_value(&Data::String("SOJA".into())),
            CellValue::Text("SOJA".into())
        );
        assert!(matches!(
            cell_value(&Data::DateTimeIso("2024-03-01".into())),
            CellValue::Date(_)
        ));
    }

    #[test]
    fn test_range_is_anchored_at_a1() {
        let mut range: Range<Data> = Range::new((2, 1), (3, 2));
        range.set_value((2, 1), Data::String("CULTURA".into()));
        range.set_value((3, 2), Data::Float(10.0));

        let sheet = sheet_from_range("21-22", &range);
        assert_eq!(sheet.height(), 4);
        assert_eq!(sheet.width(), 3);
        assert_eq!(sheet.rows()[2][1], CellValue::Text("CULTURA".into()));
        assert_eq!(sheet.rows()[3][2], CellValue::Number(10.0));
    }

    #[test]
    fn test_open_rejects_non_workbook_files() {
        let result = XlsxWorkbook::open("dados.csv");
        assert!(matches!(
            result,
            Err(crate::utils::error::AgroError::InvalidConfigValueError { .. })
        ));
    }
}
