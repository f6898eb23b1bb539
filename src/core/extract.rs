//! Structured extraction from the consultancy's business-plan workbook.
//!
//! Sheet and column names are those of the workbook template and are kept
//! verbatim. Each season and each section is read on its own; one that
//! fails is logged and left out of the result.

use crate::adapters::xlsx::XlsxWorkbook;
use crate::domain::plan::{
    CropLine, ExtractionMetadata, FinancialData, Lease, LeaseSummary, Machine, MachinerySummary,
    PlanData, PropertyData, RealEstate, RealEstateSummary, SeasonProduction,
};
use crate::domain::ports::{Pipeline, SheetSource, Storage};
use crate::domain::workbook::{Frame, Sheet};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::Local;
use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

pub const SEASON_SHEETS: [&str; 9] = [
    "21-22", "22-23", "23-24", "24-25", "25-26", "26-27", "27-28", "28-29", "29-30",
];
const SEASON_HEADER_ROW: usize = 6;

const BANKS_SHEET: &str = "Bancos";
const BANK_YEARS: RangeInclusive<i32> = 2025..=2032;
const REAL_ESTATE_DEBT_SHEET: &str = "Endiv. Imóveis";
const REAL_ESTATE_DEBT_YEARS: RangeInclusive<i32> = 2023..=2033;
const SUPPLIERS_SHEET: &str = "Fornecedores";
const SUPPLIER_MONTHS: [&str; 9] = [
    "Março", "Abril", "Maio", "Junho", "Julho", "Agosto", "Setembro", "Outubro", "Novembro",
];

const REAL_ESTATE_SHEET: &str = "Bens Imóveis";
const MACHINERY_SHEET: &str = "Bens Móveis";
const LEASES_SHEET: &str = "Arrendamentos";

pub const DEFAULT_OUTPUT_FILE: &str = "dados_extraidos_plano_negocios.json";

mod col {
    pub const CROP: &str = "CULTURA";
    pub const CYCLE: &str = "CICLO";
    pub const SYSTEM: &str = "SISTEMA";
    pub const PLANTED_AREA: &str = "Área Plantada";
    pub const COST_PER_HA: &str = "Custo/ha - R$";
    pub const TOTAL_COST: &str = "Custo Total";
    pub const YIELD_PER_HA: &str = "Produt./ha";
    pub const TOTAL_PRODUCTION: &str = "Produção Total";
    pub const UNIT_PRICE: &str = "Preço/unid";
    pub const TOTAL_REVENUE: &str = "Receita Total";
    pub const PROFIT: &str = "Lucro";

    pub const PROPERTY_NAME: &str = "DENOMINAÇÃO DO IMÓVEL";
    pub const MUNICIPALITY: &str = "MUNICIPIO/UF";
    pub const AREA_HA: &str = "ÁREA (HA)";
    pub const VALUE_PER_HA: &str = "R$/ha";
    pub const TOTAL_VALUE: &str = "Valor Total";

    pub const DESCRIPTION: &str = "DESCRIÇÃO";
    pub const YEAR: &str = "ANO";
    pub const BRAND: &str = "MARCA";
    pub const ACQUISITION_VALUE: &str = "VALOR AQUISIÇÃO";

    pub const FARM: &str = "FAZENDA";
    pub const OWNER: &str = "PROPRIETÁRIO";
    pub const LEASED_AREA: &str = "ÁREA ARRENDADA";
    pub const TERM: &str = "PRAZO";
    pub const RENT_PER_HA: &str = "VALOR/ha (SC)";
}

/// Every sheet the extractor reads.
pub fn plan_sheet_names() -> Vec<&'static str> {
    let mut names = SEASON_SHEETS.to_vec();
    names.extend([
        BANKS_SHEET,
        REAL_ESTATE_DEBT_SHEET,
        SUPPLIERS_SHEET,
        REAL_ESTATE_SHEET,
        MACHINERY_SHEET,
        LEASES_SHEET,
    ]);
    names
}

fn read_frame<W: SheetSource>(source: &mut W, sheet: &str, header_row: usize) -> Result<Frame> {
    Ok(source.read_sheet(sheet)?.frame(header_row))
}

/// Rows of `frame` whose `name` column is filled, by index.
fn named_rows<'a>(frame: &'a Frame, name: &'a str) -> impl Iterator<Item = usize> + 'a {
    (0..frame.height()).filter(move |&row| !frame.get(row, name).is_empty())
}

pub fn read_season(frame: &Frame) -> Result<SeasonProduction> {
    frame.require_column(col::CROP)?;

    let mut season = SeasonProduction::default();
    for row in named_rows(frame, col::CROP) {
        let crop = frame.get(row, col::CROP).as_text();
        if crop.contains("TOTAL") {
            continue;
        }

        let number = |name: &str| frame.get(row, name).number_or_zero();
        season.push(CropLine {
            crop,
            cycle: frame.get(row, col::CYCLE).as_text(),
            system: frame.get(row, col::SYSTEM).as_text(),
            planted_area: number(col::PLANTED_AREA),
            cost_per_ha: number(col::COST_PER_HA),
            total_cost: number(col::TOTAL_COST),
            yield_per_ha: number(col::YIELD_PER_HA),
            total_production: number(col::TOTAL_PRODUCTION),
            unit_price: number(col::UNIT_PRICE),
            total_revenue: number(col::TOTAL_REVENUE),
            profit: number(col::PROFIT),
        });
    }
    Ok(season)
}

/// Column sums for the years present in the header.
pub fn year_totals(frame: &Frame, years: RangeInclusive<i32>) -> BTreeMap<String, f64> {
    years
        .filter_map(|year| {
            let key = year.to_string();
            frame.column_sum(&key).map(|total| (key, total))
        })
        .collect()
}

pub fn supplier_total(frame: &Frame) -> f64 {
    SUPPLIER_MONTHS
        .iter()
        .filter_map(|month| frame.column_sum(month))
        .sum()
}

pub fn read_real_estate(frame: &Frame) -> RealEstateSummary {
    let items: Vec<RealEstate> = named_rows(frame, col::PROPERTY_NAME)
        .map(|row| RealEstate {
            name: frame.get(row, col::PROPERTY_NAME).as_text(),
            municipality: frame.get(row, col::MUNICIPALITY).as_text(),
            area_ha: frame.get(row, col::AREA_HA).number_or_zero(),
            value_per_ha: frame.get(row, col::VALUE_PER_HA).number_or_zero(),
            total_value: frame.get(row, col::TOTAL_VALUE).number_or_zero(),
        })
        .filter(|item| item.area_ha > 0.0)
        .collect();

    RealEstateSummary {
        count: items.len(),
        area_total_ha: items.iter().map(|i| i.area_ha).sum(),
        value_total: items.iter().map(|i| i.total_value).sum(),
        items,
    }
}

pub fn read_machinery(frame: &Frame) -> MachinerySummary {
    let items: Vec<Machine> = named_rows(frame, col::DESCRIPTION)
        .map(|row| Machine {
            description: frame.get(row, col::DESCRIPTION).as_text(),
            year: frame.get(row, col::YEAR).as_text(),
            brand: frame.get(row, col::BRAND).as_text(),
            value: frame.get(row, col::ACQUISITION_VALUE).number_or_zero(),
        })
        .filter(|item| item.value > 0.0)
        .collect();

    MachinerySummary {
        count: items.len(),
        value_total: items.iter().map(|i| i.value).sum(),
        items,
    }
}

pub fn read_leases(frame: &Frame) -> LeaseSummary {
    let items: Vec<Lease> = named_rows(frame, col::FARM)
        .map(|row| Lease {
            farm: frame.get(row, col::FARM).as_text(),
            owner: frame.get(row, col::OWNER).as_text(),
            leased_area: frame.get(row, col::LEASED_AREA).number_or_zero(),
            term: frame.get(row, col::TERM).as_text(),
            value_per_ha: frame.get(row, col::RENT_PER_HA).number_or_zero(),
        })
        .filter(|item| item.leased_area > 0.0)
        .collect();

    LeaseSummary {
        count: items.len(),
        leased_area_total: items.iter().map(|i| i.leased_area).sum(),
        items,
    }
}

/// Logs and drops a failed unit.
fn best_effort<T>(what: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("⚠️ Could not read {}: {}", what, e);
            None
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlanExtractor {
    producer: Option<String>,
}

impl PlanExtractor {
    pub fn new(producer: Option<String>) -> Self {
        Self { producer }
    }

    pub fn extract<W: SheetSource>(&self, file: &str, source: &mut W) -> PlanData {
        PlanData {
            metadata: ExtractionMetadata {
                file: file.to_string(),
                extracted_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
                producer: self.producer.clone(),
            },
            production: self.production(source),
            financial: self.financial(source),
            properties: self.properties(source),
        }
    }

    fn production<W: SheetSource>(&self, source: &mut W) -> BTreeMap<String, SeasonProduction> {
        let mut production = BTreeMap::new();
        for sheet in SEASON_SHEETS {
            let result = read_frame(source, sheet, SEASON_HEADER_ROW).and_then(|f| read_season(&f));
            if let Some(season) = best_effort(&format!("season {}", sheet), result) {
                tracing::info!(
                    "🌾 Season 20{}: {} crops, {:.2} ha, revenue {:.2}",
                    sheet,
                    season.crops.len(),
                    season.area_total,
                    season.revenue_total
                );
                production.insert(format!("20{}", sheet), season);
            }
        }
        production
    }

    fn financial<W: SheetSource>(&self, source: &mut W) -> FinancialData {
        let bank_debts = read_frame(source, BANKS_SHEET, 5).map(|f| year_totals(&f, BANK_YEARS));
        let real_estate_debts = read_frame(source, REAL_ESTATE_DEBT_SHEET, 6)
            .map(|f| year_totals(&f, REAL_ESTATE_DEBT_YEARS));
        let supplier_debts = read_frame(source, SUPPLIERS_SHEET, 5).map(|f| supplier_total(&f));

        FinancialData {
            bank_debts: best_effort("bank debts", bank_debts),
            real_estate_debts: best_effort("real estate debts", real_estate_debts),
            supplier_debts: best_effort("supplier debts", supplier_debts),
        }
    }

    fn properties<W: SheetSource>(&self, source: &mut W) -> PropertyData {
        let real_estate = read_frame(source, REAL_ESTATE_SHEET, 5).map(|f| read_real_estate(&f));
        let machinery = read_frame(source, MACHINERY_SHEET, 5).map(|f| read_machinery(&f));
        let leases = read_frame(source, LEASES_SHEET, 5).map(|f| read_leases(&f));

        PropertyData {
            real_estate: best_effort("real estate", real_estate),
            machinery: best_effort("machinery", machinery),
            leases: best_effort("leases", leases),
        }
    }
}

impl PlanData {
    pub fn render_summary(&self) -> String {
        let mut out = String::from("📋 Extracted data\n");
        for (season, data) in &self.production {
            out.push_str(&format!(
                "  🌾 {}: {} crops, {:.2} ha, cost R$ {:.2}, revenue R$ {:.2}, profit R$ {:.2}\n",
                season,
                data.crops.len(),
                data.area_total,
                data.cost_total,
                data.revenue_total,
                data.profit_total
            ));
        }
        if let Some(banks) = &self.financial.bank_debts {
            let total: f64 = banks.values().sum();
            out.push_str(&format!("  💰 Bank debts: R$ {:.2} over {} years\n", total, banks.len()));
        }
        if let Some(debts) = &self.financial.real_estate_debts {
            let total: f64 = debts.values().sum();
            out.push_str(&format!("  🏡 Real estate debts: R$ {:.2}\n", total));
        }
        if let Some(total) = self.financial.supplier_debts {
            out.push_str(&format!("  📦 Supplier debts: R$ {:.2}\n", total));
        }

        let properties = &self.properties;
        out.push_str(&format!("  - Seasons: {}\n", self.production.len()));
        out.push_str(&format!(
            "  - Properties: {}\n",
            properties.real_estate.as_ref().map_or(0, |r| r.count)
        ));
        out.push_str(&format!(
            "  - Machinery and equipment: {}\n",
            properties.machinery.as_ref().map_or(0, |m| m.count)
        ));
        out.push_str(&format!(
            "  - Leases: {}\n",
            properties.leases.as_ref().map_or(0, |l| l.count)
        ));
        out
    }
}

/// `dados_extraidos_plano_negocios.json` next to the workbook.
pub fn default_output_path(workbook: &Path) -> PathBuf {
    workbook.with_file_name(DEFAULT_OUTPUT_FILE)
}

pub struct ExtractPipeline<St: Storage> {
    storage: St,
    workbook: PathBuf,
    output: Option<String>,
    extractor: PlanExtractor,
}

impl<St: Storage> ExtractPipeline<St> {
    pub fn new(
        storage: St,
        workbook: impl Into<PathBuf>,
        output: Option<String>,
        producer: Option<String>,
    ) -> Self {
        Self {
            storage,
            workbook: workbook.into(),
            output,
            extractor: PlanExtractor::new(producer),
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
impl<St: Storage> Pipeline for ExtractPipeline<St> {
    type Extracted = (String, Vec<Sheet>);
    type Transformed = PlanData;

    /// Reads only the template sheets the workbook actually has.
    async fn extract(&self) -> Result<(String, Vec<Sheet>)> {
        let mut workbook = XlsxWorkbook::open(&self.workbook)?;
        let available = workbook.sheet_names();

        let mut sheets = Vec::new();
        for name in plan_sheet_names() {
            if !available.iter().any(|n| n == name) {
                tracing::debug!("Sheet '{}' not in workbook", name);
                continue;
            }
            if let Some(sheet) = best_effort(&format!("sheet {}", name), workbook.read_sheet(name)) {
                sheets.push(sheet);
            }
        }
        Ok((workbook.file_name(), sheets))
    }

    async fn transform(&self, (file, mut sheets): (String, Vec<Sheet>)) -> Result<PlanData> {
        Ok(self.extractor.extract(&file, &mut sheets))
    }

    async fn load(&self, data: PlanData) -> Result<String> {
        let path = self.output_path();
        let json = serde_json::to_string_pretty(&data)?;
        self.storage.write_file(&path, json.as_bytes()).await?;

        println!("{}", data.render_summary());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::workbook::CellValue;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn num(n: f64) -> CellValue {
        CellValue::Number(n)
    }

    /// Title rows above `header_row`, then the header and data rows.
    fn sheet(name: &str, header_row: usize, header: &[&str], rows: Vec<Vec<CellValue>>) -> Sheet {
        let mut grid = vec![vec![text("PLANO DE NEGÓCIOS")]];
        grid.resize(header_row, Vec::new());
        grid.push(header.iter().map(|h| text(h)).collect());
        grid.extend(rows);
        Sheet::new(name, grid)
    }

    fn season_sheet() -> Sheet {
        sheet(
            "21-22",
            SEASON_HEADER_ROW,
            &[col::CROP, col::CYCLE, col::PLANTED_AREA, col::TOTAL_REVENUE, col::PROFIT],
            vec![
                vec![text("SOJA"), text("1ª SAFRA"), num(1000.0), num(5000000.0), num(1200000.0)],
                vec![text("MILHO"), text("2ª SAFRA"), text("400"), num(1500000.0), num(-20000.0)],
                vec![CellValue::Empty, text("x"), num(99.0)],
                vec![text("TOTAL CULTURA"), CellValue::Empty, num(1400.0)],
            ],
        )
    }

    #[test]
    fn test_read_season_drops_totals_and_blanks() {
        let season = read_season(&season_sheet().frame(SEASON_HEADER_ROW)).unwrap();

        assert_eq!(season.crops.len(), 2);
        assert_eq!(season.crops[1].crop, "MILHO");
        assert_eq!(season.crops[1].planted_area, 400.0);
        assert_eq!(season.crops[0].system, "");
        assert_eq!(season.area_total, 1400.0);
        assert_eq!(season.revenue_total, 6500000.0);
        assert_eq!(season.profit_total, 1180000.0);
    }

    #[test]
    fn test_read_season_requires_crop_column() {
        let frame = sheet("22-23", SEASON_HEADER_ROW, &["ITEM", "VALOR"], vec![]).frame(SEASON_HEADER_ROW);
        assert!(read_season(&frame).is_err());
    }

    #[test]
    fn test_year_totals_and_suppliers() {
        // year headers are numeric cells in the template
        let mut grid = vec![Vec::new(); 5];
        grid.push(vec![text("BANCO"), num(2025.0), num(2026.0), num(2040.0)]);
        grid.push(vec![text("Banco A"), num(100.0), num(50.0), num(1.0)]);
        grid.push(vec![text("Banco B"), num(25.0), CellValue::Empty, num(1.0)]);
        let banks = Sheet::new("Bancos", grid);
        let totals = year_totals(&banks.frame(5), BANK_YEARS);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals["2025"], 125.0);
        assert_eq!(totals["2026"], 50.0);

        let suppliers = sheet(
            "Fornecedores",
            5,
            &["FORNECEDOR", "Março", "Abril", "Dezembro"],
            vec![
                vec![text("Insumos"), num(10.0), num(20.0), num(1000.0)],
                vec![text("Peças"), num(5.0), CellValue::Empty, num(1000.0)],
            ],
        );
        assert_eq!(supplier_total(&suppliers.frame(5)), 35.0);
    }

    #[test]
    fn test_property_sections_filter_rows() {
        let real_estate = sheet(
            REAL_ESTATE_SHEET,
            5,
            &[col::PROPERTY_NAME, col::MUNICIPALITY, col::AREA_HA, col::TOTAL_VALUE],
            vec![
                vec![text("Fazenda Santa Rita"), text("Sorriso/MT"), num(850.5), num(12000000.0)],
                vec![text("Sítio sem área"), text("Sinop/MT"), num(0.0), num(100.0)],
                vec![CellValue::Empty, CellValue::Empty, num(10.0)],
            ],
        );
        let summary = read_real_estate(&real_estate.frame(5));
        assert_eq!(summary.count, 1);
        assert_eq!(summary.area_total_ha, 850.5);
        assert_eq!(summary.items[0].municipality, "Sorriso/MT");

        let machinery = sheet(
            MACHINERY_SHEET,
            5,
            &[col::DESCRIPTION, col::YEAR, col::BRAND, col::ACQUISITION_VALUE],
            vec![
                vec![text("Colheitadeira"), num(2019.0), text("John Deere"), num(1800000.0)],
                vec![text("Trator sem valor"), num(2010.0), text("Valtra"), CellValue::Empty],
            ],
        );
        let summary = read_machinery(&machinery.frame(5));
        assert_eq!(summary.count, 1);
        assert_eq!(summary.items[0].year, "2019");

        let leases = sheet(
            LEASES_SHEET,
            5,
            &[col::FARM, col::OWNER, col::LEASED_AREA, col::TERM, col::RENT_PER_HA],
            vec![vec![text("Fazenda Ouro"), text("João"), num(300.0), text("2030"), num(8.5)]],
        );
        let summary = read_leases(&leases.frame(5));
        assert_eq!(summary.leased_area_total, 300.0);
        assert_eq!(summary.items[0].value_per_ha, 8.5);
    }

    #[test]
    fn test_extract_is_best_effort() {
        let mut sheets = vec![
            season_sheet(),
            sheet("22-23", SEASON_HEADER_ROW, &["ITEM"], vec![vec![text("x")]]),
            sheet(
                "Fornecedores",
                5,
                &["FORNECEDOR", "Maio"],
                vec![vec![text("Insumos"), num(40.0)]],
            ),
        ];

        let data = PlanExtractor::new(Some("WILSEMAR ELGER".into())).extract("plano.xlsx", &mut sheets);

        assert_eq!(data.production.keys().collect::<Vec<_>>(), vec!["2021-22"]);
        assert_eq!(data.financial.supplier_debts, Some(40.0));
        assert!(data.financial.bank_debts.is_none());
        assert!(data.properties.real_estate.is_none());
        assert_eq!(data.metadata.producer.as_deref(), Some("WILSEMAR ELGER"));

        let json = serde_json::to_value(&data).unwrap();
        assert!(json["financial"].get("bank_debts").is_none());
        assert_eq!(json["production"]["2021-22"]["crops"][0]["crop"], "SOJA");

        let summary = data.render_summary();
        assert!(summary.contains("Seasons: 1"));
        assert!(summary.contains("Supplier debts: R$ 40.00"));
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("docs/plano.xlsx")),
            PathBuf::from("docs/dados_extraidos_plano_negocios.json")
        );
    }
}
