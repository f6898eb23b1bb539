use super::{crop_table, page_header, section_heading, CropMatrix, ReportContext, CONTENT_TOP, NO_DATA};
use crate::domain::model::SeasonChart;
use crate::render::canvas::Canvas;
use crate::render::charts::{self, Area, Metric, Scale};
use crate::render::{format, theme};

pub(crate) struct RevenueView {
    pub matrix: CropMatrix,
    pub totals: Vec<f64>,
    pub first: f64,
    pub last: f64,
    pub growth: f64,
}

impl RevenueView {
    pub fn from_chart(chart: &SeasonChart) -> Self {
        let mut points = chart.chart_data.clone();
        points.sort_by(|a, b| a.safra.cmp(&b.safra));

        let totals: Vec<f64> = points.iter().map(|p| p.total_or_sum()).collect();
        let first = totals.first().copied().unwrap_or(0.0);
        let last = totals.last().copied().unwrap_or(0.0);

        Self {
            matrix: CropMatrix::from_points(&points),
            growth: format::growth(first, last),
            totals,
            first,
            last,
        }
    }

    pub fn metrics(&self) -> Vec<Metric> {
        let season = |s: Option<&String>| s.map(|s| format!("Season {}", s)).unwrap_or_default();
        vec![
            Metric::new(format::brl_millions(self.first), "First season", season(self.matrix.seasons.first())),
            Metric::new(format::brl_millions(self.last), "Last season", season(self.matrix.seasons.last())),
            Metric::new(format::signed_percent(self.growth), "Total growth", "First to last season"),
            Metric::new(self.matrix.crops.len().to_string(), "Products", "Revenue sources"),
        ]
    }
}

pub(super) fn draw(canvas: &mut Canvas, ctx: &ReportContext) {
    page_header(
        canvas,
        "Projected Revenue",
        "Revenue projection by crop and growth of turnover",
    );
    let view = RevenueView::from_chart(&ctx.data.revenue);

    charts::metric_row(canvas, theme::MARGIN, CONTENT_TOP, theme::CONTENT_WIDTH, 80.0, &view.metrics());

    let heading_y = CONTENT_TOP - 110.0;
    section_heading(canvas, heading_y, "Revenue by Crop");

    let area = Area::new(theme::MARGIN + 45.0, heading_y - 250.0, theme::CONTENT_WIDTH - 45.0, 200.0);
    if view.matrix.is_empty() {
        charts::no_data(canvas, &area, NO_DATA);
        return;
    }

    let stacked_max = (0..view.matrix.seasons.len())
        .map(|i| view.matrix.values.iter().map(|row| row[i].max(0.0)).sum::<f64>())
        .fold(0.0, f64::max);
    let scale = Scale::for_values([stacked_max].iter());
    charts::value_axis(canvas, &area, &scale, 5, format::brl_short);
    charts::stacked_bars(
        canvas,
        &area,
        &view.matrix.season_labels(),
        &view.matrix.series(),
        &scale,
        |v| format!("{:.1}M", v / 1_000_000.0),
    );
    let legend_height = charts::legend(
        canvas,
        theme::MARGIN,
        area.y - 30.0,
        theme::CONTENT_WIDTH,
        &view.matrix.legend_items(),
    );

    crop_table(
        canvas,
        area.y - 40.0 - legend_height,
        "Agricultural Revenue Detail (R$ millions)",
        &view.matrix,
        |v| if v == 0.0 { "-".to_string() } else { format!("{:.1}", v / 1_000_000.0) },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_seasons_are_sorted_before_growth() {
        let chart: SeasonChart = serde_json::from_value(json!({"chartData": [
            {"safra": "2024/25", "culturas": {"Soja": 3000000, "Milho": 1000000}},
            {"safra": "2022/23", "total": 2000000, "culturas": {"Soja": 2000000}}
        ]}))
        .unwrap();

        let view = RevenueView::from_chart(&chart);
        assert_eq!(view.matrix.seasons, vec!["2022/23", "2024/25"]);
        assert_eq!(view.first, 2_000_000.0);
        assert_eq!(view.last, 4_000_000.0);
        assert_eq!(view.growth, 100.0);
        assert_eq!(view.metrics()[0].value, "R$ 2.0M");
        assert_eq!(view.metrics()[3].value, "2");
    }
}
