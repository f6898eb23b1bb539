//! Results of reading a business-plan workbook: the generic analysis dump
//! and the structured extraction.

use crate::domain::workbook::{CellKind, CellValue};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
pub struct WorkbookAnalysis {
    pub metadata: AnalysisMetadata,
    pub sheets: Vec<SheetAnalysis>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisMetadata {
    pub file: String,
    pub analyzed_at: String,
    pub sheet_count: usize,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
pub struct Dimensions {
    pub rows: usize,
    pub columns: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SheetAnalysis {
    pub name: String,
    pub dimensions: Dimensions,
    /// 0-based row holding the column names, if one was recognised.
    pub header_row: Option<usize>,
    pub columns: Vec<ColumnProfile>,
    pub first_rows: Vec<BTreeMap<String, CellValue>>,
    pub kind: SheetKind,
    pub highlights: Vec<Highlight>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnProfile {
    pub name: String,
    pub kind: CellKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<ColumnStats>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct ColumnStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub sum: f64,
    pub count: usize,
}

impl ColumnStats {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let sum: f64 = values.iter().sum();
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(Self {
            min,
            max,
            mean: sum / values.len() as f64,
            sum,
            count: values.len(),
        })
    }
}

/// What a sheet looks like it holds, guessed from its name.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SheetKind {
    Production,
    Financial,
    Area,
    General,
}

impl SheetKind {
    pub fn from_sheet_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.contains("safra") || lower.contains("produção") {
            SheetKind::Production
        } else if lower.contains("financ") || lower.contains("divida") {
            SheetKind::Financial
        } else if lower.contains("area") || lower.contains("hectare") {
            SheetKind::Area
        } else {
            SheetKind::General
        }
    }
}

/// A column worth pointing out for the sheet's kind, with its total when
/// one applies.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Highlight {
    pub column: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct PlanData {
    pub metadata: ExtractionMetadata,
    /// Keyed by season, e.g. `2021-22`.
    pub production: BTreeMap<String, SeasonProduction>,
    pub financial: FinancialData,
    pub properties: PropertyData,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct ExtractionMetadata {
    pub file: String,
    pub extracted_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub producer: Option<String>,
}

#[derive(Debug, Clone, Serialize, Default, PartialEq)]
pub struct SeasonProduction {
    pub crops: Vec<CropLine>,
    pub area_total: f64,
    pub cost_total: f64,
    pub production_total: f64,
    pub revenue_total: f64,
    pub profit_total: f64,
}

impl SeasonProduction {
    pub fn push(&mut self, crop: CropLine) {
        self.area_total += crop.planted_area;
        self.cost_total += crop.total_cost;
        self.production_total += crop.total_production;
        self.revenue_total += crop.total_revenue;
        self.profit_total += crop.profit;
        self.crops.push(crop);
    }
}

#[derive(Debug, Clone, Serialize, Default, PartialEq)]
pub struct CropLine {
    pub crop: String,
    pub cycle: String,
    pub system: String,
    pub planted_area: f64,
    pub cost_per_ha: f64,
    pub total_cost: f64,
    pub yield_per_ha: f64,
    pub total_production: f64,
    pub unit_price: f64,
    pub total_revenue: f64,
    pub profit: f64,
}

/// Debt totals. A section that could not be read stays `None`.
#[derive(Debug, Clone, Serialize, Default)]
pub struct FinancialData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_debts: Option<BTreeMap<String, f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub real_estate_debts: Option<BTreeMap<String, f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier_debts: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct PropertyData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub real_estate: Option<RealEstateSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub machinery: Option<MachinerySummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leases: Option<LeaseSummary>,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct RealEstateSummary {
    pub items: Vec<RealEstate>,
    pub count: usize,
    pub area_total_ha: f64,
    pub value_total: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RealEstate {
    pub name: String,
    pub municipality: String,
    pub area_ha: f64,
    pub value_per_ha: f64,
    pub total_value: f64,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct MachinerySummary {
    pub items: Vec<Machine>,
    pub count: usize,
    pub value_total: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Machine {
    pub description: String,
    pub year: String,
    pub brand: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct LeaseSummary {
    pub items: Vec<Lease>,
    pub count: usize,
    pub leased_area_total: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Lease {
    pub farm: String,
    pub owner: String,
    pub leased_area: f64,
    pub term: String,
    /// Rent per hectare, in sacks.
    pub value_per_ha: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_kind_from_name() {
        assert_eq!(SheetKind::from_sheet_name("Safra 23-24"), SheetKind::Production);
        assert_eq!(SheetKind::from_sheet_name("PRODUÇÃO"), SheetKind::Production);
        assert_eq!(SheetKind::from_sheet_name("Financiamentos"), SheetKind::Financial);
        assert_eq!(SheetKind::from_sheet_name("Area Plantada"), SheetKind::Area);
        assert_eq!(SheetKind::from_sheet_name("Bancos"), SheetKind::General);
    }

    #[test]
    fn test_column_stats() {
        let stats = ColumnStats::from_values(&[2.0, 4.0, 9.0]).unwrap();
        assert_eq!(stats.min, 2.0);
        assert_eq!(stats.max, 9.0);
        assert_eq!(stats.sum, 15.0);
        assert_eq!(stats.mean, 5.0);
        assert_eq!(stats.count, 3);
        assert!(ColumnStats::from_values(&[]).is_none());
    }

    #[test]
    fn test_season_totals_accumulate() {
        let mut season = SeasonProduction::default();
        season.push(CropLine {
            crop: "SOJA".into(),
            planted_area: 100.0,
            total_cost: 50.0,
            total_revenue: 80.0,
            profit: 30.0,
            ..Default::default()
        });
        season.push(CropLine {
            crop: "MILHO".into(),
            planted_area: 20.0,
            profit: -5.0,
            ..Default::default()
        });

        assert_eq!(season.crops.len(), 2);
        assert_eq!(season.area_total, 120.0);
        assert_eq!(season.profit_total, 25.0);
    }
}
