//! The fourteen report pages, in print order.

mod balance_sheet;
mod cash_flow;
mod cover;
mod dre;
mod financial;
mod indicators;
mod liabilities;
mod notices;
mod planting;
mod productivity;
mod properties;
mod registration;
mod revenue;
mod thanks;

use crate::config::toml_config::BrandingConfig;
use crate::domain::model::{ReportData, SeasonPoint};
use crate::render::canvas::{Align, Canvas, Color};
use crate::render::charts::{self, Column, Row, RowStyle, Series};
use crate::render::fonts::Font;
use crate::render::{format, theme};
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Everything a page needs to draw itself.
pub struct ReportContext<'a> {
    pub data: &'a ReportData,
    pub organization_name: &'a str,
    pub report_period: &'a str,
    pub branding: &'a BrandingConfig,
    pub generated_on: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Cover,
    Notices,
    Registration,
    Properties,
    PlantingArea,
    Productivity,
    Revenue,
    FinancialEvolution,
    Liabilities,
    EconomicIndicators,
    CashFlow,
    IncomeStatement,
    BalanceSheet,
    ThankYou,
}

impl PageKind {
    pub const ALL: [PageKind; 14] = [
        PageKind::Cover,
        PageKind::Notices,
        PageKind::Registration,
        PageKind::Properties,
        PageKind::PlantingArea,
        PageKind::Productivity,
        PageKind::Revenue,
        PageKind::FinancialEvolution,
        PageKind::Liabilities,
        PageKind::EconomicIndicators,
        PageKind::CashFlow,
        PageKind::IncomeStatement,
        PageKind::BalanceSheet,
        PageKind::ThankYou,
    ];

    pub fn title(self) -> &'static str {
        match self {
            PageKind::Cover => "Cover",
            PageKind::Notices => "Legal Notices",
            PageKind::Registration => "Registration Data",
            PageKind::Properties => "Real Estate Holdings",
            PageKind::PlantingArea => "Planted Area Evolution",
            PageKind::Productivity => "Productivity",
            PageKind::Revenue => "Projected Revenue",
            PageKind::FinancialEvolution => "Financial Evolution",
            PageKind::Liabilities => "Liabilities",
            PageKind::EconomicIndicators => "Economic Indicators",
            PageKind::CashFlow => "Projected Cash Flow",
            PageKind::IncomeStatement => "Income Statement",
            PageKind::BalanceSheet => "Balance Sheet",
            PageKind::ThankYou => "Thank You",
        }
    }

    /// 1-based position in the document.
    pub fn number(self) -> usize {
        Self::ALL.iter().position(|&k| k == self).unwrap_or(0) + 1
    }

    pub fn draw(self, ctx: &ReportContext) -> Canvas {
        let mut canvas = Canvas::new(theme::PAGE_WIDTH, theme::PAGE_HEIGHT);
        match self {
            PageKind::Cover => cover::draw(&mut canvas, ctx),
            PageKind::Notices => notices::draw(&mut canvas, ctx),
            PageKind::Registration => registration::draw(&mut canvas, ctx),
            PageKind::Properties => properties::draw(&mut canvas, ctx),
            PageKind::PlantingArea => planting::draw(&mut canvas, ctx),
            PageKind::Productivity => productivity::draw(&mut canvas, ctx),
            PageKind::Revenue => revenue::draw(&mut canvas, ctx),
            PageKind::FinancialEvolution => financial::draw(&mut canvas, ctx),
            PageKind::Liabilities => liabilities::draw(&mut canvas, ctx),
            PageKind::EconomicIndicators => indicators::draw(&mut canvas, ctx),
            PageKind::CashFlow => cash_flow::draw(&mut canvas, ctx),
            PageKind::IncomeStatement => dre::draw(&mut canvas, ctx),
            PageKind::BalanceSheet => balance_sheet::draw(&mut canvas, ctx),
            PageKind::ThankYou => thanks::draw(&mut canvas, ctx),
        }

        if !matches!(self, PageKind::Cover | PageKind::ThankYou) {
            page_footer(&mut canvas, ctx, self.number());
        }
        canvas
    }
}

/// Baseline below the title block where page content starts.
pub(crate) const CONTENT_TOP: f32 = theme::TITLE_Y - 60.0;

pub(crate) const NO_DATA: &str = "Data not available";

/// Large title, accent bar and one-line description.
pub(crate) fn page_header(canvas: &mut Canvas, title: &str, subtitle: &str) {
    canvas.set_fill(theme::PRIMARY);
    canvas.text(theme::MARGIN, theme::TITLE_Y, Font::Regular, 32.0, title);

    let bar_y = theme::TITLE_Y - 15.0;
    canvas.fill_rect(theme::MARGIN, bar_y, 60.0, 3.0, theme::PRIMARY);

    canvas.set_fill(theme::LIGHT);
    canvas.text(theme::MARGIN, bar_y - 20.0, Font::Regular, 11.0, subtitle);
}

pub(crate) fn section_heading(canvas: &mut Canvas, y: f32, text: &str) {
    canvas.set_fill(theme::PRIMARY);
    canvas.text(theme::MARGIN, y, Font::Regular, 14.0, text);
}

/// `SR CONSULTORIA` on the left, organization and page number on the right.
pub(crate) fn page_footer(canvas: &mut Canvas, ctx: &ReportContext, number: usize) {
    let y = 30.0;
    canvas.set_stroke(theme::LIGHTEST);
    canvas.set_line_width(0.5);
    canvas.line(theme::MARGIN, y + 12.0, theme::PAGE_WIDTH - theme::MARGIN, y + 12.0);

    canvas.set_fill(theme::BRAND);
    canvas.text(theme::MARGIN, y, Font::Bold, 8.0, &ctx.branding.mark);
    let mark_width = canvas.string_width(&ctx.branding.mark, Font::Bold, 8.0);
    canvas.set_fill(theme::LIGHT);
    canvas.text(theme::MARGIN + mark_width + 3.0, y, Font::Regular, 7.0, &ctx.branding.name);

    let right = format!("{}  |  {}", ctx.organization_name, number);
    canvas.text_right(theme::PAGE_WIDTH - theme::MARGIN, y, Font::Regular, 7.0, &right);
}

/// Logo made of the bold mark followed by the firm name.
pub(crate) fn draw_logo(canvas: &mut Canvas, x: f32, y: f32, mark_size: f32, branding: &BrandingConfig) -> f32 {
    canvas.set_fill(theme::BRAND);
    canvas.text(x, y, Font::Bold, mark_size, &branding.mark);
    let mark_width = canvas.string_width(&branding.mark, Font::Bold, mark_size);

    let name_size = mark_size * 0.56;
    canvas.set_fill(theme::BLACK);
    canvas.text(x + mark_width + 6.0, y + 3.0, Font::Regular, name_size, &branding.name);

    mark_width + 6.0 + canvas.string_width(&branding.name, Font::Regular, name_size)
}

/// Label column followed by one centred column per year.
pub(crate) fn year_columns(label: &str, label_width: f32, years: &[String]) -> Vec<Column> {
    let year_width = (theme::CONTENT_WIDTH - label_width) / years.len().max(1) as f32;
    std::iter::once(Column::new(label, label_width, Align::Left))
        .chain(
            years
                .iter()
                .map(|y| Column::new(format::short_season(y), year_width, Align::Center)),
        )
        .collect()
}

/// Row label followed by the compact value for each year.
pub(crate) fn value_cells(label: &str, values: impl IntoIterator<Item = f64>) -> Vec<String> {
    std::iter::once(label.to_string())
        .chain(values.into_iter().map(format::compact))
        .collect()
}

/// Crop-by-season grid behind the planting, productivity and revenue pages.
pub(crate) struct CropMatrix {
    pub seasons: Vec<String>,
    /// Distinct crop names, sorted.
    pub crops: Vec<String>,
    /// `values[crop][season]`, zero where a crop is absent.
    pub values: Vec<Vec<f64>>,
}

impl CropMatrix {
    pub fn from_points(points: &[SeasonPoint]) -> Self {
        let crops: Vec<String> = points
            .iter()
            .flat_map(|p| p.culturas.keys().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let values = crops
            .iter()
            .map(|crop| {
                points
                    .iter()
                    .map(|p| p.culturas.get(crop).copied().unwrap_or(0.0))
                    .collect()
            })
            .collect();

        Self {
            seasons: points.iter().map(|p| p.safra.clone()).collect(),
            crops,
            values,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.seasons.is_empty()
    }

    pub fn season_labels(&self) -> Vec<String> {
        self.seasons.iter().map(|s| format::short_season(s)).collect()
    }

    pub fn series(&self) -> Vec<Series> {
        self.crops
            .iter()
            .zip(&self.values)
            .enumerate()
            .map(|(i, (crop, values))| Series {
                name: crop.clone(),
                color: theme::series_color(i),
                values: values.clone(),
            })
            .collect()
    }

    pub fn legend_items(&self) -> Vec<(String, Color)> {
        self.crops
            .iter()
            .enumerate()
            .map(|(i, crop)| (crop.clone(), theme::series_color(i)))
            .collect()
    }

    /// One table row per crop with the given cell format.
    pub fn rows(&self, cell: impl Fn(f64) -> String) -> Vec<Row> {
        self.crops
            .iter()
            .zip(&self.values)
            .map(|(crop, values)| {
                let cells = std::iter::once(crop.to_uppercase())
                    .chain(values.iter().map(|&v| cell(v)))
                    .collect();
                Row::new(cells, RowStyle::Normal)
            })
            .collect()
    }
}

/// Legend plus the per-crop detail table under a chart.
pub(crate) fn crop_table(
    canvas: &mut Canvas,
    top: f32,
    title: &str,
    matrix: &CropMatrix,
    cell: impl Fn(f64) -> String,
) {
    if matrix.is_empty() || matrix.crops.is_empty() {
        return;
    }
    section_heading(canvas, top, title);
    let columns = year_columns("CROP", 110.0, &matrix.seasons);
    let rows = matrix.rows(cell);
    charts::table(canvas, theme::MARGIN, top - 10.0, &columns, &rows, 16.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crop_matrix_fills_gaps() {
        let points: Vec<SeasonPoint> = serde_json::from_value(serde_json::json!([
            {"safra": "2021/2022", "culturas": {"Soja": 10, "Milho": 5}},
            {"safra": "2022/2023", "culturas": {"Soja": 12, "Algodão": 3}}
        ]))
        .unwrap();

        let matrix = CropMatrix::from_points(&points);
        assert_eq!(matrix.crops, vec!["Algodão", "Milho", "Soja"]);
        assert_eq!(matrix.values[0], vec![0.0, 3.0]);
        assert_eq!(matrix.values[1], vec![5.0, 0.0]);
        assert_eq!(matrix.season_labels(), vec!["21/22", "22/23"]);
        assert_eq!(matrix.series().len(), 3);

        let rows = matrix.rows(format::compact);
        assert_eq!(rows[2].cells, vec!["SOJA", "10", "12"]);
    }

    #[test]
    fn test_page_order() {
        assert_eq!(PageKind::ALL.len(), 14);
        assert_eq!(PageKind::Cover.number(), 1);
        assert_eq!(PageKind::Liabilities.number(), 9);
        assert_eq!(PageKind::ThankYou.number(), 14);
    }

    #[test]
    fn test_year_columns_share_remaining_width() {
        let years = vec!["2023/2024".to_string(), "2024/2025".to_string()];
        let columns = year_columns("Item", 150.0, &years);
        assert_eq!(columns.len(), 3);
        assert_eq!(columns[1].header, "23/24");
        let total: f32 = columns.iter().map(|c| c.width).sum();
        assert!((total - theme::CONTENT_WIDTH).abs() < 0.01);
    }

    #[test]
    fn test_value_cells() {
        assert_eq!(
            value_cells("Total", [0.0, 1_500_000.0]),
            vec!["Total".to_string(), "-".to_string(), "1.5M".to_string()]
        );
    }

    #[test]
    fn test_every_page_draws_on_empty_data() {
        let data = ReportData::default();
        let branding = BrandingConfig::default();
        let ctx = ReportContext {
            data: &data,
            organization_name: "CLIENTE",
            report_period: "Multi-season analysis",
            branding: &branding,
            generated_on: NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
        };

        for kind in PageKind::ALL {
            let canvas = kind.draw(&ctx);
            assert!(!canvas.operations().is_empty(), "{:?} drew nothing", kind);
        }
    }
}
