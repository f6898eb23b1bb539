use agro_reports::core::inspect;
use agro_reports::domain::ports::SheetSource;
use agro_reports::{AnalyzePipeline, EtlEngine, ExtractPipeline, LocalStorage, XlsxWorkbook};
use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A trimmed-down business plan: one season sheet, the bank sheet and a
/// sheet the extractor does not know.
fn write_plan_workbook(dir: &Path) -> PathBuf {
    let path = dir.join("PLANO DE NEGOCIOS.xlsx");
    let mut workbook = Workbook::new();

    let season = workbook.add_worksheet();
    season.set_name("21-22").unwrap();
    season.write_string(0, 0, "PLANO DE NEGÓCIOS").unwrap();
    for (col, header) in ["CULTURA", "CICLO", "Área Plantada", "Receita Total", "Lucro"]
        .iter()
        .enumerate()
    {
        season.write_string(6, col as u16, *header).unwrap();
    }
    season.write_string(7, 0, "SOJA").unwrap();
    season.write_string(7, 1, "1ª SAFRA").unwrap();
    season.write_number(7, 2, 1000.0).unwrap();
    season.write_number(7, 3, 5000000.0).unwrap();
    season.write_number(7, 4, 1200000.0).unwrap();
    season.write_string(8, 0, "MILHO").unwrap();
    season.write_number(8, 2, 400.0).unwrap();
    season.write_number(8, 3, 1500000.0).unwrap();
    season.write_number(8, 4, 300000.0).unwrap();
    season.write_string(9, 0, "TOTAL CULTURA").unwrap();
    season.write_number(9, 2, 1400.0).unwrap();

    let banks = workbook.add_worksheet();
    banks.set_name("Bancos").unwrap();
    banks.write_string(5, 0, "BANCO").unwrap();
    banks.write_number(5, 1, 2025.0).unwrap();
    banks.write_number(5, 2, 2026.0).unwrap();
    banks.write_string(6, 0, "Banco do Brasil").unwrap();
    banks.write_number(6, 1, 800000.0).unwrap();
    banks.write_number(6, 2, 400000.0).unwrap();
    banks.write_string(7, 0, "Sicredi").unwrap();
    banks.write_number(7, 1, 200000.0).unwrap();

    let notes = workbook.add_worksheet();
    notes.set_name("Financiamentos").unwrap();
    notes.write_string(0, 0, "LINHA").unwrap();
    notes.write_string(0, 1, "VALOR").unwrap();
    notes.write_string(0, 2, "TAXA").unwrap();
    notes.write_string(1, 0, "Pronamp").unwrap();
    notes.write_number(1, 1, 250000.0).unwrap();
    notes.write_number(1, 2, 8.5).unwrap();

    workbook.save(&path).unwrap();
    path
}

fn read_json(path: &str) -> serde_json::Value {
    let content = std::fs::read_to_string(path).unwrap();
    serde_json::from_str(&content).unwrap()
}

#[test]
fn test_inspect_workbook_and_export_csv() {
    let dir = TempDir::new().unwrap();
    let path = write_plan_workbook(dir.path());

    let mut workbook = XlsxWorkbook::open(&path).unwrap();
    assert_eq!(workbook.sheet_names(), vec!["21-22", "Bancos", "Financiamentos"]);

    let sheets = inspect::read_sheets(&mut workbook, Some("21-22")).unwrap();
    let summary = inspect::summarize(&sheets[0], 6, 5);
    assert_eq!(summary.dimensions.rows, 10);
    assert_eq!(summary.columns[0].0, "CULTURA");
    assert_eq!(summary.samples.len(), 3);

    let csv_dir = dir.path().join("csv");
    let storage = LocalStorage::new(csv_dir.to_string_lossy().to_string());
    let runtime = tokio::runtime::Runtime::new().unwrap();
    runtime
        .block_on(inspect::export_csv(&storage, &sheets, 6))
        .unwrap();

    let csv = std::fs::read_to_string(csv_dir.join("21-22.csv")).unwrap();
    assert!(csv.starts_with("CULTURA,CICLO,Área Plantada,Receita Total,Lucro"));
    assert!(csv.contains("SOJA,1ª SAFRA,1000,5000000,1200000"));
}

#[tokio::test]
async fn test_analyze_pipeline_writes_json_next_to_workbook() {
    let dir = TempDir::new().unwrap();
    let path = write_plan_workbook(dir.path());

    let pipeline = AnalyzePipeline::new(LocalStorage::new(""), &path, None);
    let output = EtlEngine::new(pipeline).run().await.unwrap().output_path;

    assert!(output.ends_with("analise_PLANO DE NEGOCIOS.json"));
    let json = read_json(&output);
    assert_eq!(json["metadata"]["sheet_count"], 3);

    let sheets = json["sheets"].as_array().unwrap();
    assert_eq!(sheets[0]["name"], "21-22");
    assert_eq!(sheets[0]["header_row"], 6);

    let financing = &sheets[2];
    assert_eq!(financing["kind"], "financial");
    assert_eq!(financing["highlights"][0]["column"], "VALOR");
    assert_eq!(financing["highlights"][0]["total"], 250000.0);
}

#[tokio::test]
async fn test_extract_pipeline_reads_available_sections() {
    let dir = TempDir::new().unwrap();
    let path = write_plan_workbook(dir.path());
    let output = dir.path().join("extracted.json").to_string_lossy().to_string();

    let pipeline = ExtractPipeline::new(
        LocalStorage::new(""),
        &path,
        Some(output.clone()),
        Some("WILSEMAR ELGER".to_string()),
    );
    EtlEngine::new(pipeline).run().await.unwrap();

    let json = read_json(&output);
    assert_eq!(json["metadata"]["producer"], "WILSEMAR ELGER");

    let season = &json["production"]["2021-22"];
    assert_eq!(season["crops"].as_array().unwrap().len(), 2);
    assert_eq!(season["area_total"], 1400.0);
    assert_eq!(season["profit_total"], 1500000.0);

    assert_eq!(json["financial"]["bank_debts"]["2025"], 1000000.0);
    assert_eq!(json["financial"]["bank_debts"]["2026"], 400000.0);
    // sheets missing from the workbook are left out
    assert!(json["financial"].get("supplier_debts").is_none());
    assert!(json["properties"].get("leases").is_none());
}
