//! Report payload served by `GET /api/report-data/{organization_id}`.
//!
//! Field names follow the endpoint (Portuguese keys, mixed camel/snake case).

use crate::domain::lenient::{self, SeriesGroup, YearSeries};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Default)]
pub struct ReportData {
    pub organization: Organization,
    pub properties: PropertiesSection,
    pub planting_areas: SeasonChart,
    pub productivity: SeasonChart,
    pub revenue: SeasonChart,
    pub financial_evolution: Vec<FinancialPoint>,
    pub debts: DebtsSection,
    pub debt_position: DebtPosition,
    pub cash_flow: CashFlowProjection,
    pub dre: Vec<DreRow>,
    pub balance_sheet: BalanceSheet,
}

impl ReportData {
    /// Reads every section independently. A malformed section is logged and
    /// left empty; the rest of the payload is still used.
    pub fn from_value(root: &Value) -> Self {
        let planting = match root.get("plantingAreas") {
            Some(inner) if inner.get("plantingAreas").is_some_and(Value::is_object) => {
                inner.get("plantingAreas")
            }
            other => other,
        };

        Self {
            organization: section(root.get("organization"), "organization"),
            properties: section(root.get("properties"), "properties"),
            planting_areas: section(planting, "plantingAreas"),
            productivity: section(root.get("productivity"), "productivity"),
            revenue: section(root.get("revenue"), "revenue"),
            financial_evolution: section(root.get("financialEvolution"), "financialEvolution"),
            debts: section(root.get("debts"), "debts"),
            debt_position: section(root.get("debtPosition"), "debtPosition"),
            cash_flow: section(root.get("cashFlowProjection"), "cashFlowProjection"),
            dre: section(root.get("dre"), "dre"),
            balance_sheet: section(root.get("balanceSheet"), "balanceSheet"),
        }
    }
}

fn section<T: DeserializeOwned + Default>(value: Option<&Value>, name: &str) -> T {
    match value {
        None | Some(Value::Null) => {
            tracing::debug!("Section '{}' missing from payload", name);
            T::default()
        }
        Some(v) => serde_json::from_value(v.clone()).unwrap_or_else(|e| {
            tracing::warn!("⚠️ Section '{}' is malformed, rendering it empty: {}", name, e);
            T::default()
        }),
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Organization {
    #[serde(deserialize_with = "lenient::text")]
    pub nome: String,
    #[serde(deserialize_with = "lenient::text")]
    pub cpf: String,
    #[serde(deserialize_with = "lenient::text")]
    pub cnpj: String,
    #[serde(deserialize_with = "lenient::text")]
    pub email: String,
    #[serde(deserialize_with = "lenient::text")]
    pub telefone: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub endereco: Address,
    #[serde(deserialize_with = "lenient::or_default")]
    pub estrutura_societaria: Vec<Partner>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Address {
    #[serde(deserialize_with = "lenient::text")]
    pub logradouro: String,
    #[serde(deserialize_with = "lenient::text")]
    pub numero: String,
    #[serde(deserialize_with = "lenient::text")]
    pub complemento: String,
    #[serde(deserialize_with = "lenient::text")]
    pub bairro: String,
    #[serde(deserialize_with = "lenient::text")]
    pub cidade: String,
    #[serde(deserialize_with = "lenient::text")]
    pub estado: String,
    #[serde(deserialize_with = "lenient::text")]
    pub cep: String,
}

impl Address {
    pub fn is_empty(&self) -> bool {
        [
            &self.logradouro,
            &self.numero,
            &self.bairro,
            &self.cidade,
            &self.estado,
            &self.cep,
        ]
        .iter()
        .all(|s| s.is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Partner {
    #[serde(deserialize_with = "lenient::text")]
    pub nome: String,
    #[serde(deserialize_with = "lenient::text")]
    pub tipo_documento: String,
}

impl Partner {
    pub fn is_individual(&self) -> bool {
        self.tipo_documento.eq_ignore_ascii_case("cpf")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PropertiesSection {
    #[serde(deserialize_with = "lenient::or_default")]
    pub stats: PropertyStats,
    #[serde(deserialize_with = "lenient::or_default")]
    pub list: Vec<PropertyItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PropertyStats {
    #[serde(rename = "totalFazendas", deserialize_with = "lenient::count")]
    pub total_farms: u32,
    #[serde(rename = "totalProprias", deserialize_with = "lenient::count")]
    pub owned: u32,
    #[serde(rename = "totalArrendadas", deserialize_with = "lenient::count")]
    pub leased: u32,
    #[serde(rename = "areaTotal", deserialize_with = "lenient::number")]
    pub total_area: f64,
    #[serde(rename = "areaPercentualPropria", deserialize_with = "lenient::number")]
    pub owned_area_percent: f64,
    #[serde(rename = "areaPercentualArrendada", deserialize_with = "lenient::number")]
    pub leased_area_percent: f64,
    #[serde(rename = "valorPatrimonial", deserialize_with = "lenient::number")]
    pub asset_value: f64,
    #[serde(rename = "areaCultivavel", deserialize_with = "lenient::number")]
    pub arable_area: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PropertyItem {
    #[serde(deserialize_with = "lenient::text")]
    pub nome: String,
    #[serde(rename = "nomeClean", deserialize_with = "lenient::text")]
    pub nome_clean: String,
    #[serde(deserialize_with = "lenient::number")]
    pub valor_atual: f64,
}

impl PropertyItem {
    pub fn display_name(&self) -> &str {
        if !self.nome_clean.is_empty() {
            &self.nome_clean
        } else if !self.nome.is_empty() {
            &self.nome
        } else {
            "N/A"
        }
    }
}

/// `chartData` series shared by planting area, productivity and revenue.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeasonChart {
    #[serde(rename = "chartData", deserialize_with = "lenient::or_default")]
    pub chart_data: Vec<SeasonPoint>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeasonPoint {
    #[serde(deserialize_with = "lenient::text")]
    pub safra: String,
    #[serde(deserialize_with = "lenient::number")]
    pub total: f64,
    #[serde(deserialize_with = "lenient::series")]
    pub culturas: YearSeries,
}

impl SeasonPoint {
    /// Declared total, or the sum of the crops when the total is zero.
    pub fn total_or_sum(&self) -> f64 {
        if self.total != 0.0 {
            self.total
        } else {
            self.crop_sum()
        }
    }

    pub fn crop_sum(&self) -> f64 {
        self.culturas.values().sum()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FinancialPoint {
    #[serde(deserialize_with = "lenient::text")]
    pub safra: String,
    #[serde(deserialize_with = "lenient::number")]
    pub receita: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub custo: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub lucro: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub margem: f64,
}

impl FinancialPoint {
    /// Profit plus 30% of cost, the approximation used across the report.
    pub fn ebitda(&self) -> f64 {
        self.lucro + self.custo * 0.3
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DebtsSection {
    #[serde(rename = "debtDistributionConsolidated", deserialize_with = "lenient::or_default")]
    pub consolidated: Vec<DebtShare>,
    #[serde(rename = "debtDistribution2025", deserialize_with = "lenient::or_default")]
    pub current_season: Vec<DebtShare>,
}

/// Distribution entry; the endpoint uses either `name`/`value` or
/// `tipo`/`valor`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DebtShare {
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub tipo: String,
    #[serde(deserialize_with = "lenient::number")]
    pub value: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub valor: f64,
}

impl DebtShare {
    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            &self.tipo
        } else {
            &self.name
        }
    }

    pub fn amount(&self) -> f64 {
        if self.value != 0.0 {
            self.value
        } else {
            self.valor
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DebtPosition {
    #[serde(deserialize_with = "lenient::text_list")]
    pub anos: Vec<String>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub dividas: Vec<DebtCategory>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub indicadores: DebtIndicators,
}

impl DebtPosition {
    pub fn category(&self, name: &str) -> Option<&YearSeries> {
        self.dividas
            .iter()
            .find(|d| d.categoria.eq_ignore_ascii_case(name))
            .map(|d| &d.valores_por_ano)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DebtCategory {
    #[serde(deserialize_with = "lenient::text")]
    pub categoria: String,
    #[serde(deserialize_with = "lenient::series")]
    pub valores_por_ano: YearSeries,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DebtIndicators {
    #[serde(deserialize_with = "lenient::series")]
    pub endividamento_total: YearSeries,
    #[serde(deserialize_with = "lenient::series")]
    pub divida_liquida: YearSeries,
    #[serde(deserialize_with = "lenient::or_default")]
    pub indicadores_calculados: CalculatedIndicators,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CalculatedIndicators {
    #[serde(deserialize_with = "lenient::series")]
    pub divida_receita: YearSeries,
    #[serde(deserialize_with = "lenient::series")]
    pub divida_ebitda: YearSeries,
    #[serde(deserialize_with = "lenient::series")]
    pub divida_liquida_receita: YearSeries,
    #[serde(deserialize_with = "lenient::series")]
    pub divida_liquida_ebitda: YearSeries,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CashFlowProjection {
    #[serde(deserialize_with = "lenient::text_list")]
    pub anos: Vec<String>,
    #[serde(deserialize_with = "lenient::series_group")]
    pub receitas_agricolas: SeriesGroup,
    #[serde(deserialize_with = "lenient::series_group")]
    pub despesas_agricolas: SeriesGroup,
    #[serde(deserialize_with = "lenient::series_group")]
    pub outras_despesas: SeriesGroup,
    #[serde(deserialize_with = "lenient::series_group")]
    pub investimentos: SeriesGroup,
    #[serde(deserialize_with = "lenient::series_group")]
    pub financeiras: SeriesGroup,
    #[serde(deserialize_with = "lenient::series")]
    pub fluxo_liquido: YearSeries,
    #[serde(deserialize_with = "lenient::series")]
    pub fluxo_acumulado: YearSeries,
}

/// One income-statement (DRE) year.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DreRow {
    #[serde(deserialize_with = "lenient::text")]
    pub ano: String,
    #[serde(deserialize_with = "lenient::text")]
    pub safra: String,
    #[serde(deserialize_with = "lenient::number")]
    pub receita_bruta: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub deducoes: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub receita_liquida: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub custos_vendas: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub lucro_bruto: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub despesas_operacionais: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub lucro_operacional: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub resultado_financeiro: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub lucro_antes_impostos: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub impostos: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub lucro_liquido: f64,
}

impl DreRow {
    /// Net margin in percent; zero without gross revenue.
    pub fn net_margin(&self) -> f64 {
        if self.receita_bruta > 0.0 {
            self.lucro_liquido / self.receita_bruta * 100.0
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BalanceSheet {
    #[serde(deserialize_with = "lenient::text_list")]
    pub anos: Vec<String>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub ativo: AssetSide,
    #[serde(deserialize_with = "lenient::or_default")]
    pub passivo: LiabilitySide,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AssetSide {
    #[serde(deserialize_with = "lenient::series_group")]
    pub circulante: SeriesGroup,
    #[serde(deserialize_with = "lenient::series_group")]
    pub nao_circulante: SeriesGroup,
    #[serde(deserialize_with = "lenient::series")]
    pub total: YearSeries,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LiabilitySide {
    #[serde(deserialize_with = "lenient::series_group")]
    pub circulante: SeriesGroup,
    #[serde(deserialize_with = "lenient::series_group")]
    pub nao_circulante: SeriesGroup,
    #[serde(deserialize_with = "lenient::series_group")]
    pub patrimonio_liquido: SeriesGroup,
    #[serde(deserialize_with = "lenient::series")]
    pub total: YearSeries,
}

/// `group[key][year]`, zero when any level is missing.
pub fn lookup(group: &SeriesGroup, key: &str, year: &str) -> f64 {
    group
        .get(key)
        .and_then(|series| series.get(year))
        .copied()
        .unwrap_or(0.0)
}

pub fn at(series: &YearSeries, year: &str) -> f64 {
    series.get(year).copied().unwrap_or(0.0)
}
