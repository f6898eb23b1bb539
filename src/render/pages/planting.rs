use super::{crop_table, page_header, section_heading, CropMatrix, ReportContext, CONTENT_TOP, NO_DATA};
use crate::domain::model::SeasonChart;
use crate::render::canvas::Canvas;
use crate::render::charts::{self, Area, Metric, Scale};
use crate::render::{format, theme};

pub(crate) struct PlantingView {
    pub matrix: CropMatrix,
    pub totals: Vec<f64>,
    pub initial: f64,
    pub last: f64,
    pub growth: f64,
    pub axis_max: f64,
}

/// Next multiple of 10 000 above 110% of `max`.
pub(crate) fn area_axis_max(max: f64) -> f64 {
    (((max * 1.1) as i64 / 10_000 + 1) * 10_000) as f64
}

impl PlantingView {
    pub fn from_chart(chart: &SeasonChart) -> Self {
        let totals: Vec<f64> = chart.chart_data.iter().map(|p| p.total_or_sum()).collect();
        let initial = totals.first().copied().unwrap_or(0.0);
        let last = totals.last().copied().unwrap_or(0.0);
        let max = totals.iter().copied().fold(0.0, f64::max);

        Self {
            matrix: CropMatrix::from_points(&chart.chart_data),
            growth: format::growth(initial, last),
            axis_max: area_axis_max(max),
            totals,
            initial,
            last,
        }
    }

    pub fn metrics(&self) -> Vec<Metric> {
        let first = self.matrix.seasons.first().map(String::as_str).unwrap_or("-");
        let final_season = self.matrix.seasons.last().map(String::as_str).unwrap_or("-");
        vec![
            Metric::new(format::thousands(self.initial), "Initial area (ha)", format!("Season {}", first)),
            Metric::new(format::thousands(self.last), "Final area (ha)", format!("Season {}", final_season)),
            Metric::new(format::signed_percent(self.growth), "Total growth", "First to last season"),
            Metric::new(self.matrix.crops.len().to_string(), "Crops", "Distinct crops planted"),
        ]
    }
}

pub(super) fn draw(canvas: &mut Canvas, ctx: &ReportContext) {
    page_header(
        canvas,
        "Planted Area Evolution",
        "Crop mix over time and growth of the cultivated area",
    );
    let view = PlantingView::from_chart(&ctx.data.planting_areas);

    charts::metric_row(canvas, theme::MARGIN, CONTENT_TOP, theme::CONTENT_WIDTH, 80.0, &view.metrics());

    let heading_y = CONTENT_TOP - 110.0;
    section_heading(canvas, heading_y, "Area by Crop");

    let area = Area::new(theme::MARGIN + 45.0, heading_y - 250.0, theme::CONTENT_WIDTH - 45.0, 200.0);
    if view.matrix.is_empty() {
        charts::no_data(canvas, &area, NO_DATA);
        return;
    }

    let scale = Scale::new(0.0, view.axis_max);
    charts::value_axis(canvas, &area, &scale, 5, format::thousands);
    charts::stacked_bars(
        canvas,
        &area,
        &view.matrix.season_labels(),
        &view.matrix.series(),
        &scale,
        format::thousands,
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
        "Detail by Crop (hectares)",
        &view.matrix,
        format::thousands,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_axis_max_rounds_up_to_ten_thousand() {
        assert_eq!(area_axis_max(0.0), 10_000.0);
        assert_eq!(area_axis_max(8_000.0), 10_000.0);
        assert_eq!(area_axis_max(9_500.0), 20_000.0);
        assert_eq!(area_axis_max(45_000.0), 50_000.0);
    }

    #[test]
    fn test_growth_uses_first_and_last_totals() {
        let chart: SeasonChart = serde_json::from_value(json!({"chartData": [
            {"safra": "2021/22", "total": 1000, "culturas": {"Soja": 1000}},
            {"safra": "2022/23", "total": 0, "culturas": {"Soja": 900, "Milho": 600}}
        ]}))
        .unwrap();

        let view = PlantingView::from_chart(&chart);
        assert_eq!(view.initial, 1000.0);
        assert_eq!(view.last, 1500.0);
        assert_eq!(view.growth, 50.0);
        assert_eq!(view.axis_max, 10_000.0);

        let metrics = view.metrics();
        assert_eq!(metrics[2].value, "+50.0%");
        assert_eq!(metrics[3].value, "2");
    }

    #[test]
    fn test_empty_chart() {
        let view = PlantingView::from_chart(&SeasonChart::default());
        assert_eq!(view.growth, 0.0);
        assert!(view.matrix.is_empty());
    }
}
