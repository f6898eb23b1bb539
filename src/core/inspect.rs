//! Quick look at a workbook: shape, column names and types, and the first
//! rows of each sheet.

use crate::domain::plan::Dimensions;
use crate::domain::ports::{SheetSource, Storage};
use crate::domain::workbook::{CellKind, CellValue, Frame, Sheet};
use crate::utils::error::{AgroError, Result};

#[derive(Debug, Clone)]
pub struct SheetSummary {
    pub name: String,
    pub dimensions: Dimensions,
    pub header_row: usize,
    pub columns: Vec<(String, CellKind)>,
    pub samples: Vec<Vec<CellValue>>,
}

pub fn summarize(sheet: &Sheet, header_row: usize, sample_rows: usize) -> SheetSummary {
    let frame = sheet.frame(header_row);
    let columns = frame
        .columns
        .iter()
        .enumerate()
        .map(|(i, name)| (name.clone(), frame.column_kind(i)))
        .collect();
    let samples = frame
        .data_rows()
        .take(sample_rows)
        .map(|(_, row)| row.to_vec())
        .collect();

    SheetSummary {
        name: sheet.name.clone(),
        dimensions: Dimensions {
            rows: sheet.height(),
            columns: sheet.width(),
        },
        header_row,
        columns,
        samples,
    }
}

impl SheetSummary {
    pub fn render_text(&self) -> String {
        let mut out = format!(
            "📋 {} ({} rows x {} columns)\n",
            self.name, self.dimensions.rows, self.dimensions.columns
        );

        if self.columns.is_empty() {
            out.push_str("  (empty sheet)\n");
            return out;
        }

        out.push_str(&format!("  Columns (header row {}):\n", self.header_row));
        for (name, kind) in &self.columns {
            out.push_str(&format!("    - {} [{}]\n", name, kind));
        }

        if !self.samples.is_empty() {
            out.push_str(&format!("  First {} rows:\n", self.samples.len()));
            for row in &self.samples {
                let cells: Vec<String> = row.iter().map(CellValue::as_text).collect();
                out.push_str(&format!("    | {} |\n", cells.join(" | ")));
            }
        }
        out
    }
}

/// Reads the requested sheet, or every sheet. An unreadable sheet is
/// skipped with a warning, but a sheet asked for by name must exist.
pub fn read_sheets<W: SheetSource>(workbook: &mut W, only: Option<&str>) -> Result<Vec<Sheet>> {
    let names = workbook.sheet_names();
    tracing::info!("📑 {} sheets found: {}", names.len(), names.join(", "));

    if let Some(name) = only {
        if !names.iter().any(|n| n == name) {
            return Err(AgroError::MissingSheetError {
                sheet: name.to_string(),
            });
        }
        return Ok(vec![workbook.read_sheet(name)?]);
    }

    let mut sheets = Vec::with_capacity(names.len());
    for name in &names {
        match workbook.read_sheet(name) {
            Ok(sheet) => sheets.push(sheet),
            Err(e) => tracing::warn!("⚠️ Skipping sheet '{}': {}", name, e),
        }
    }
    Ok(sheets)
}

/// The frame as CSV, header first.
pub fn frame_to_csv(frame: &Frame) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());
    writer.write_record(&frame.columns)?;
    for row in &frame.rows {
        writer.write_record(row.iter().map(CellValue::as_text))?;
    }
    writer
        .into_inner()
        .map_err(|e| AgroError::processing(format!("CSV buffer error: {}", e)))
}

/// Sheet names may hold characters that are not valid in file names.
pub fn csv_file_name(sheet: &str) -> String {
    let cleaned: String = sheet
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            other => other,
        })
        .collect();
    format!("{}.csv", cleaned.trim())
}

/// Writes one `<sheet>.csv` per sheet through `storage` and returns the
/// written paths.
pub async fn export_csv<St: Storage>(
    storage: &St,
    sheets: &[Sheet],
    header_row: usize,
) -> Result<Vec<String>> {
    let mut written = Vec::with_capacity(sheets.len());
    for sheet in sheets {
        let path = csv_file_name(&sheet.name);
        let data = frame_to_csv(&sheet.frame(header_row))?;
        storage.write_file(&path, &data).await?;
        tracing::debug!("Exported sheet '{}' to {}", sheet.name, path);
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::LocalStorage;
    use tempfile::TempDir;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn culture_sheet() -> Sheet {
        Sheet::new(
            "21-22",
            vec![
                vec![text("CULTURA"), text("ÁREA"), text("OBS")],
                vec![text("SOJA"), CellValue::Number(1200.0), CellValue::Empty],
                vec![],
                vec![text("MILHO, 2ª"), CellValue::Number(300.5), text("irrigado")],
                vec![text("TOTAL"), CellValue::Number(1500.5)],
            ],
        )
    }

    #[test]
    fn test_summarize_sheet() {
        let summary = summarize(&culture_sheet(), 0, 2);
        assert_eq!(summary.dimensions, Dimensions { rows: 5, columns: 3 });
        assert_eq!(
            summary.columns,
            vec![
                ("CULTURA".to_string(), CellKind::Text),
                ("ÁREA".to_string(), CellKind::Number),
                ("OBS".to_string(), CellKind::Text),
            ]
        );
        // the blank row is not a sample
        assert_eq!(summary.samples.len(), 2);
        assert_eq!(summary.samples[1][0], text("MILHO, 2ª"));

        let rendered = summary.render_text();
        assert!(rendered.contains("21-22 (5 rows x 3 columns)"));
        assert!(rendered.contains("- ÁREA [number]"));
    }

    #[test]
    fn test_read_sheets_from_memory() {
        let mut sheets = vec![culture_sheet(), Sheet::new("Bancos", vec![])];
        assert_eq!(read_sheets(&mut sheets, None).unwrap().len(), 2);

        let only = read_sheets(&mut sheets, Some("Bancos")).unwrap();
        assert_eq!(only.len(), 1);
        assert!(only[0].is_empty());

        let err = read_sheets(&mut sheets, Some("Fornecedores")).unwrap_err();
        assert!(matches!(err, AgroError::MissingSheetError { .. }));
    }

    #[test]
    fn test_frame_to_csv_quotes_commas() {
        let data = frame_to_csv(&culture_sheet().frame(0)).unwrap();
        let text = String::from_utf8(data).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "CULTURA,ÁREA,OBS");
        assert_eq!(lines[1], "SOJA,1200,");
        assert_eq!(lines[3], "\"MILHO, 2ª\",300.5,irrigado");
    }

    #[test]
    fn test_csv_file_name() {
        assert_eq!(csv_file_name("21-22"), "21-22.csv");
        assert_eq!(csv_file_name("Receitas/Despesas"), "Receitas_Despesas.csv");
    }

    #[tokio::test]
    async fn test_export_csv_writes_one_file_per_sheet() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path().to_string_lossy().to_string());

        let written = export_csv(&storage, &[culture_sheet()], 0).await.unwrap();
        assert_eq!(written, vec!["21-22.csv"]);
        assert!(dir.path().join("21-22.csv").exists());
    }
}
