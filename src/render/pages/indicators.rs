use super::{page_header, section_heading, year_columns, ReportContext, CONTENT_TOP, NO_DATA};
use crate::domain::lenient::YearSeries;
use crate::domain::model::{self, DebtPosition};
use crate::render::canvas::Canvas;
use crate::render::charts::{self, Area, Row, RowStyle, Scale, Series};
use crate::render::fonts::Font;
use crate::render::{format, theme};
use std::collections::BTreeSet;

const TABLE_SEASONS: usize = 8;

pub(crate) struct IndicatorsView {
    pub seasons: Vec<String>,
    pub series: Vec<Series>,
}

/// Axis bounds: `min * 1.1` when negative, else 0, up to `max * 1.1`.
pub(crate) fn axis_bounds(values: &[f64]) -> (f64, f64) {
    let min = values.iter().copied().fold(0.0, f64::min);
    let max = values.iter().copied().fold(0.0, f64::max);
    let lower = if min < 0.0 { min * 1.1 } else { 0.0 };
    let upper = if max > 0.0 { max * 1.1 } else { 1.0 };
    (lower, upper)
}

fn ratio(value: f64) -> String {
    if value == 0.0 {
        "-".to_string()
    } else {
        format!("{:.2}", value)
    }
}

impl IndicatorsView {
    pub fn from_position(position: &DebtPosition) -> Self {
        let calc = &position.indicadores.indicadores_calculados;
        let named: [(&str, &YearSeries); 4] = [
            ("Debt / Revenue", &calc.divida_receita),
            ("Debt / EBITDA", &calc.divida_ebitda),
            ("Net debt / Revenue", &calc.divida_liquida_receita),
            ("Net debt / EBITDA", &calc.divida_liquida_ebitda),
        ];

        let seasons: Vec<String> = if position.anos.is_empty() {
            named
                .iter()
                .flat_map(|(_, s)| s.keys().cloned())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        } else {
            position.anos.clone()
        };

        let series = named
            .iter()
            .enumerate()
            .map(|(i, (name, values))| Series {
                name: name.to_string(),
                color: theme::series_color(i * 2),
                values: seasons.iter().map(|y| model::at(values, y)).collect(),
            })
            .collect();

        Self { seasons, series }
    }

    pub fn all_values(&self) -> Vec<f64> {
        self.series.iter().flat_map(|s| s.values.iter().copied()).collect()
    }

    pub fn has_data(&self) -> bool {
        self.all_values().iter().any(|v| *v != 0.0)
    }

    /// Up to eight seasons, zero printed as `-`.
    pub fn rows(&self) -> Vec<Row> {
        self.series
            .iter()
            .map(|s| {
                let cells = std::iter::once(s.name.clone())
                    .chain(s.values.iter().take(TABLE_SEASONS).map(|&v| ratio(v)))
                    .collect();
                Row::new(cells, RowStyle::Normal)
            })
            .collect()
    }
}

pub(super) fn draw(canvas: &mut Canvas, ctx: &ReportContext) {
    page_header(
        canvas,
        "Economic Indicators",
        "Leverage ratios that summarize the repayment capacity",
    );
    let view = IndicatorsView::from_position(&ctx.data.debt_position);

    let heading_y = CONTENT_TOP - 10.0;
    section_heading(canvas, heading_y, "Leverage Ratios per Season");

    let area = Area::new(theme::MARGIN + 35.0, heading_y - 280.0, theme::CONTENT_WIDTH - 35.0, 240.0);
    if !view.has_data() {
        charts::no_data(canvas, &area, NO_DATA);
        return;
    }

    let (lower, upper) = axis_bounds(&view.all_values());
    let scale = Scale::new(lower, upper);
    charts::value_axis(canvas, &area, &scale, 5, |v| format!("{:.1}", v));

    if lower < 0.0 {
        let zero = scale.y(&area, 0.0);
        canvas.set_stroke(theme::LIGHT);
        canvas.set_line_width(1.0);
        canvas.set_dash(4.0, 3.0);
        canvas.line(area.x, zero, area.right(), zero);
        canvas.clear_dash();
    }

    let labels: Vec<String> = view.seasons.iter().map(|s| format::short_season(s)).collect();
    charts::line_chart(canvas, &area, &labels, &view.series, &scale);

    let legend: Vec<_> = view.series.iter().map(|s| (s.name.clone(), s.color)).collect();
    let legend_height = charts::legend(canvas, theme::MARGIN, area.y - 30.0, theme::CONTENT_WIDTH, &legend);

    let table_top = area.y - 40.0 - legend_height;
    section_heading(canvas, table_top, "Indicator Table");
    let shown: Vec<String> = view.seasons.iter().take(TABLE_SEASONS).cloned().collect();
    let columns = year_columns("INDICATOR", 130.0, &shown);
    let bottom = charts::table(canvas, theme::MARGIN, table_top - 10.0, &columns, &view.rows(), 18.0);

    canvas.set_fill(theme::LIGHTER);
    canvas.text(
        theme::MARGIN,
        bottom - 16.0,
        Font::Oblique,
        8.0,
        "EBITDA approximated as net profit plus 30% of cost.",
    );
}
