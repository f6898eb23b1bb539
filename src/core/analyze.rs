use crate::adapters::xlsx::XlsxWorkbook;
use crate::core::inspect;
use crate::domain::plan::{
    AnalysisMetadata, ColumnProfile, ColumnStats, Dimensions, Highlight, SheetAnalysis, SheetKind,
    WorkbookAnalysis,
};
use crate::domain::ports::{Pipeline, Storage};
use crate::domain::workbook::{CellValue, Frame, Sheet};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::Local;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const HEADER_SCAN_ROWS: usize = 10;
const SAMPLE_ROWS: usize = 5;
const CROP_NAMES: [&str; 4] = ["soja", "milho", "algodão", "trigo"];
const MONETARY_THRESHOLD: f64 = 1000.0;
/// Sheets with more rows than this are listed as main sheets.
const MAIN_SHEET_ROWS: usize = 10;

/// First of the top rows with at least three filled cells, two of them text.
pub fn detect_header_row(sheet: &Sheet) -> Option<usize> {
    sheet
        .rows()
        .iter()
        .take(HEADER_SCAN_ROWS)
        .position(|row| {
            let filled = row.iter().filter(|c| !c.is_empty()).count();
            let texts = row.iter().filter(|c| c.is_text()).count();
            filled >= 3 && texts >= 2
        })
}

/// Min/max/mean/sum of a column whose filled cells are all numbers.
fn numeric_stats(frame: &Frame, index: usize) -> Option<ColumnStats> {
    let mut values = Vec::new();
    for cell in frame.column(index).filter(|c| !c.is_empty()) {
        match cell {
            CellValue::Number(n) => values.push(*n),
            _ => return None,
        }
    }
    ColumnStats::from_values(&values)
}

fn highlights(kind: SheetKind, columns: &[ColumnProfile]) -> Vec<Highlight> {
    match kind {
        SheetKind::Production => columns
            .iter()
            .filter(|c| {
                let name = c.name.to_lowercase();
                CROP_NAMES.iter().any(|crop| name.contains(crop))
            })
            .map(|c| Highlight {
                column: c.name.clone(),
                total: None,
            })
            .collect(),
        SheetKind::Financial => columns
            .iter()
            .filter_map(|c| {
                let stats = c.stats?;
                (stats.max > MONETARY_THRESHOLD).then(|| Highlight {
                    column: c.name.clone(),
                    total: Some(stats.sum),
                })
            })
            .collect(),
        SheetKind::Area => columns
            .iter()
            .filter_map(|c| {
                let stats = c.stats?;
                let name = c.name.to_lowercase();
                (name.contains("area") || name.contains("hectare")).then(|| Highlight {
                    column: c.name.clone(),
                    total: Some(stats.sum),
                })
            })
            .collect(),
        SheetKind::General => Vec::new(),
    }
}

pub fn analyze_sheet(sheet: &Sheet) -> SheetAnalysis {
    let header_row = detect_header_row(sheet);

    // Without a header the columns are numbered and every row is data.
    let frame = match header_row {
        Some(row) => sheet.frame(row),
        None => Frame {
            sheet: sheet.name.clone(),
            columns: (0..sheet.width()).map(|i| i.to_string()).collect(),
            rows: sheet.rows().to_vec(),
        },
    };

    let columns: Vec<ColumnProfile> = frame
        .columns
        .iter()
        .enumerate()
        .map(|(i, name)| ColumnProfile {
            name: name.clone(),
            kind: frame.column_kind(i),
            stats: numeric_stats(&frame, i),
        })
        .collect();

    let first_rows = frame
        .data_rows()
        .take(SAMPLE_ROWS)
        .map(|(_, row)| {
            frame
                .columns
                .iter()
                .zip(row)
                .filter(|(_, cell)| !cell.is_empty())
                .map(|(name, cell)| (name.clone(), cell.clone()))
                .collect::<BTreeMap<_, _>>()
        })
        .collect();

    let kind = SheetKind::from_sheet_name(&sheet.name);
    let highlights = highlights(kind, &columns);

    SheetAnalysis {
        name: sheet.name.clone(),
        dimensions: Dimensions {
            rows: frame.height(),
            columns: frame.width(),
        },
        header_row,
        columns,
        first_rows,
        kind,
        highlights,
    }
}

pub fn analyze_workbook(file: &str, sheets: &[Sheet]) -> WorkbookAnalysis {
    WorkbookAnalysis {
        metadata: AnalysisMetadata {
            file: file.to_string(),
            analyzed_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            sheet_count: sheets.len(),
        },
        sheets: sheets.iter().map(analyze_sheet).collect(),
    }
}

impl WorkbookAnalysis {
    pub fn total_rows(&self) -> usize {
        self.sheets.iter().map(|s| s.dimensions.rows).sum()
    }

    pub fn total_columns(&self) -> usize {
        self.sheets.iter().map(|s| s.dimensions.columns).sum()
    }

    pub fn main_sheets(&self) -> impl Iterator<Item = &SheetAnalysis> + '_ {
        self.sheets
            .iter()
            .filter(|s| s.dimensions.rows > MAIN_SHEET_ROWS)
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for sheet in &self.sheets {
            out.push_str(&format!(
                "📋 {}: {} rows x {} columns",
                sheet.name, sheet.dimensions.rows, sheet.dimensions.columns
            ));
            match sheet.header_row {
                Some(row) => out.push_str(&format!(", header on row {}\n", row + 1)),
                None => out.push_str(", no header found\n"),
            }
            for highlight in &sheet.highlights {
                match highlight.total {
                    Some(total) => {
                        out.push_str(&format!("    - {}: {:.2}\n", highlight.column, total))
                    }
                    None => out.push_str(&format!("    - {}\n", highlight.column)),
                }
            }
        }

        out.push_str("\n📊 Summary\n");
        out.push_str(&format!("  - {} sheets\n", self.sheets.len()));
        out.push_str(&format!("  - {} rows in total\n", self.total_rows()));
        out.push_str(&format!("  - {} columns in total\n", self.total_columns()));
        out.push_str("  Main sheets:\n");
        for sheet in self.main_sheets() {
            out.push_str(&format!(
                "  - {}: {} rows x {} columns\n",
                sheet.name, sheet.dimensions.rows, sheet.dimensions.columns
            ));
        }
        out
    }
}

/// `analise_<stem>.json` next to the workbook.
pub fn default_output_path(workbook: &Path) -> PathBuf {
    let stem = workbook
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    workbook.with_file_name(format!("analise_{}.json", stem))
}

pub struct AnalyzePipeline<St: Storage> {
    storage: St,
    workbook: PathBuf,
    output: Option<String>,
}

impl<St: Storage> AnalyzePipeline<St> {
    pub fn new(storage: St, workbook: impl Into<PathBuf>, output: Option<String>) -> Self {
        Self {
            storage,
            workbook: workbook.into(),
            output,
        }
    }

    pub fn output_path(&self) -> String {
        match &self.output {
            Some(path) => path.clone(),
            None => default_output_path(&self.workbook).to_string_lossy().to_string(),
        }
    }
}

#[async_trait]
impl<St: Storage> Pipeline for AnalyzePipeline<St> {
    type Extracted = (String, Vec<Sheet>);
    type Transformed = WorkbookAnalysis;

    async fn extract(&self) -> Result<(String, Vec<Sheet>)> {
        let mut workbook = XlsxWorkbook::open(&self.workbook)?;
        let sheets = inspect::read_sheets(&mut workbook, None)?;
        Ok((workbook.file_name(), sheets))
    }

    async fn transform(&self, (file, sheets): (String, Vec<Sheet>)) -> Result<WorkbookAnalysis> {
        let analysis = analyze_workbook(&file, &sheets);
        tracing::info!(
            "📊 Analyzed {} sheets, {} rows",
            analysis.sheets.len(),
            analysis.total_rows()
        );
        Ok(analysis)
    }

    async fn load(&self, analysis: WorkbookAnalysis) -> Result<String> {
        let path = self.output_path();
        let json = serde_json::to_string_pretty(&analysis)?;
        self.storage.write_file(&path, json.as_bytes()).await?;

        println!("{}", analysis.render_text());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::workbook::CellKind;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn num(n: f64) -> CellValue {
        CellValue::Number(n)
    }

    fn financing_sheet() -> Sheet {
        Sheet::new(
            "Financiamentos",
            vec![
                vec![text("PLANO DE NEGÓCIOS")],
                vec![text("Banco"), num(2025.0), num(2026.0)],
                vec![text("BANCO"), text("VALOR"), text("TAXA"), text("OBS")],
                vec![text("Banco A"), num(150000.0), num(1.2), text("x")],
                vec![text("Banco B"), num(50000.0), num(0.8)],
                vec![],
            ],
        )
    }

    #[test]
    fn test_detect_header_row() {
        assert_eq!(detect_header_row(&financing_sheet()), Some(2));

        let numbers_only = Sheet::new("x", vec![vec![num(1.0), num(2.0), num(3.0)]]);
        assert_eq!(detect_header_row(&numbers_only), None);
    }

    #[test]
    fn test_header_must_be_in_first_ten_rows() {
        let mut rows = vec![vec![num(1.0)]; 10];
        rows.push(vec![text("A"), text("B"), text("C")]);
        assert_eq!(detect_header_row(&Sheet::new("late", rows)), None);
    }

    #[test]
    fn test_analyze_financial_sheet() {
        let analysis = analyze_sheet(&financing_sheet());

        assert_eq!(analysis.header_row, Some(2));
        assert_eq!(analysis.kind, SheetKind::Financial);
        assert_eq!(analysis.dimensions, Dimensions { rows: 2, columns: 4 });

        let valor = &analysis.columns[1];
        assert_eq!(valor.kind, CellKind::Number);
        let stats = valor.stats.unwrap();
        assert_eq!(stats.sum, 200000.0);
        assert_eq!(stats.count, 2);
        // text column has no stats
        assert!(analysis.columns[0].stats.is_none());

        assert_eq!(
            analysis.highlights,
            vec![Highlight {
                column: "VALOR".into(),
                total: Some(200000.0)
            }]
        );

        assert_eq!(analysis.first_rows.len(), 2);
        assert_eq!(analysis.first_rows[1].get("BANCO"), Some(&text("Banco B")));
        assert!(analysis.first_rows[1].get("OBS").is_none());
    }

    #[test]
    fn test_mixed_column_has_no_stats() {
        let sheet = Sheet::new(
            "Area Plantada",
            vec![
                vec![text("FAZENDA"), text("AREA HA"), text("HECTARE")],
                vec![text("Santa Rita"), num(100.0), num(10.0)],
                vec![text("Boa Vista"), num(50.0), text("n/d")],
            ],
        );
        let analysis = analyze_sheet(&sheet);
        assert_eq!(analysis.kind, SheetKind::Area);
        assert_eq!(
            analysis.highlights,
            vec![Highlight {
                column: "AREA HA".into(),
                total: Some(150.0)
            }]
        );
    }

    #[test]
    fn test_production_sheet_lists_crop_columns() {
        let sheet = Sheet::new(
            "Safras",
            vec![
                vec![text("ANO"), text("Soja (ha)"), text("Milho 2ª"), text("Feijão")],
                vec![num(2024.0), num(1.0), num(2.0), num(3.0)],
            ],
        );
        let columns: Vec<String> = analyze_sheet(&sheet)
            .highlights
            .into_iter()
            .map(|h| h.column)
            .collect();
        assert_eq!(columns, vec!["Soja (ha)", "Milho 2ª"]);
    }

    #[test]
    fn test_sheet_without_header() {
        let sheet = Sheet::new("dados", vec![vec![num(1.0), CellValue::Empty, num(3.0)]]);
        let analysis = analyze_sheet(&sheet);
        assert_eq!(analysis.header_row, None);
        assert_eq!(analysis.dimensions, Dimensions { rows: 1, columns: 3 });
        assert_eq!(analysis.columns.len(), 3);
        assert_eq!(analysis.columns[1].kind, CellKind::Empty);
        assert_eq!(analysis.first_rows[0].get("2"), Some(&num(3.0)));
    }

    #[test]
    fn test_workbook_summary() {
        let mut big_rows = vec![vec![text("A"), text("B"), text("C")]];
        big_rows.extend((0..12).map(|i| vec![num(i as f64), num(1.0), num(2.0)]));
        let sheets = vec![financing_sheet(), Sheet::new("Grande", big_rows)];

        let analysis = analyze_workbook("plano.xlsx", &sheets);
        assert_eq!(analysis.metadata.sheet_count, 2);
        assert_eq!(analysis.total_rows(), 14);
        assert_eq!(analysis.total_columns(), 7);
        let main: Vec<&str> = analysis.main_sheets().map(|s| s.name.as_str()).collect();
        assert_eq!(main, vec!["Grande"]);
        assert!(analysis.render_text().contains("Grande: 12 rows x 3 columns"));
    }

    #[test]
    fn test_default_output_path() {
        let path = default_output_path(Path::new("/data/PLANO 2025.xlsx"));
        assert_eq!(path, PathBuf::from("/data/analise_PLANO 2025.json"));
    }
}
