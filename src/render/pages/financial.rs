use super::{page_header, section_heading, year_columns, ReportContext, CONTENT_TOP, NO_DATA};
use crate::domain::model::FinancialPoint;
use crate::render::canvas::Canvas;
use crate::render::charts::{self, Area, Metric, Row, RowStyle, Scale, Series};
use crate::render::{format, theme};

pub(crate) struct FinancialView {
    /// Seasons with revenue only.
    pub points: Vec<FinancialPoint>,
    pub average_revenue: f64,
    pub average_profit: f64,
    pub average_margin: f64,
    pub average_ebitda: f64,
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

impl FinancialView {
    pub fn from_points(points: &[FinancialPoint]) -> Self {
        let points: Vec<FinancialPoint> = points.iter().filter(|p| p.receita > 0.0).cloned().collect();

        Self {
            average_revenue: mean(points.iter().map(|p| p.receita)),
            average_profit: mean(points.iter().map(|p| p.lucro)),
            average_margin: mean(points.iter().map(|p| p.margem).filter(|m| *m > 0.0)),
            average_ebitda: mean(points.iter().map(FinancialPoint::ebitda)),
            points,
        }
    }

    pub fn metrics(&self) -> Vec<Metric> {
        vec![
            Metric::new(format::brl_millions(self.average_revenue), "Average revenue", "Per season"),
            Metric::new(format::brl_millions(self.average_profit), "Average profit", "Per season"),
            Metric::new(format!("{:.1}%", self.average_margin), "Average margin", "Positive seasons"),
            Metric::new(format::brl_millions(self.average_ebitda), "Average EBITDA", "Profit + 30% of cost"),
        ]
    }

    /// Revenue, cost, EBITDA and net profit, in that order.
    pub fn series(&self) -> Vec<Series> {
        let pick = |f: fn(&FinancialPoint) -> f64| self.points.iter().map(f).collect::<Vec<f64>>();
        vec![
            Series {
                name: "Revenue".into(),
                color: theme::series_color(1),
                values: pick(|p| p.receita),
            },
            Series {
                name: "Cost".into(),
                color: theme::series_color(6),
                values: pick(|p| p.custo),
            },
            Series {
                name: "EBITDA".into(),
                color: theme::series_color(4),
                values: pick(FinancialPoint::ebitda),
            },
            Series {
                name: "Net profit".into(),
                color: theme::series_color(0),
                values: pick(|p| p.lucro),
            },
        ]
    }

    pub fn rows(&self) -> Vec<Row> {
        let millions = |v: f64| format!("{:.1}", v / 1_000_000.0);
        let mut rows: Vec<Row> = self
            .series()
            .into_iter()
            .map(|s| {
                let cells = std::iter::once(s.name.to_uppercase())
                    .chain(s.values.into_iter().map(millions))
                    .collect();
                Row::new(cells, RowStyle::Normal)
            })
            .collect();

        let margins = std::iter::once("MARGIN".to_string())
            .chain(self.points.iter().map(|p| format::percent(p.margem)))
            .collect();
        rows.push(Row::new(margins, RowStyle::Highlight));
        rows
    }
}

pub(super) fn draw(canvas: &mut Canvas, ctx: &ReportContext) {
    page_header(
        canvas,
        "Financial Evolution",
        "Main financial indicators and margins over time",
    );
    let view = FinancialView::from_points(&ctx.data.financial_evolution);

    charts::metric_row(canvas, theme::MARGIN, CONTENT_TOP, theme::CONTENT_WIDTH, 80.0, &view.metrics());

    let heading_y = CONTENT_TOP - 110.0;
    section_heading(canvas, heading_y, "Revenue, Cost, EBITDA and Net Profit");

    let area = Area::new(theme::MARGIN + 45.0, heading_y - 250.0, theme::CONTENT_WIDTH - 45.0, 200.0);
    if view.points.is_empty() {
        charts::no_data(canvas, &area, NO_DATA);
        return;
    }

    let series = view.series();
    let scale = Scale::for_values(series.iter().flat_map(|s| s.values.iter()));
    let seasons: Vec<String> = view.points.iter().map(|p| format::short_season(&p.safra)).collect();
    charts::value_axis(canvas, &area, &scale, 5, format::brl_short);
    charts::line_chart(canvas, &area, &seasons, &series, &scale);

    let legend: Vec<_> = series.iter().map(|s| (s.name.clone(), s.color)).collect();
    let legend_height = charts::legend(canvas, theme::MARGIN, area.y - 30.0, theme::CONTENT_WIDTH, &legend);

    let table_top = area.y - 40.0 - legend_height;
    section_heading(canvas, table_top, "Financial Detail (R$ millions)");
    let raw_seasons: Vec<String> = view.points.iter().map(|p| p.safra.clone()).collect();
    let columns = year_columns("METRIC", 110.0, &raw_seasons);
    charts::table(canvas, theme::MARGIN, table_top - 10.0, &columns, &view.rows(), 16.0);
}
