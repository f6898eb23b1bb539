use super::{crop_table, page_header, section_heading, CropMatrix, ReportContext, CONTENT_TOP, NO_DATA};
use crate::domain::model::SeasonChart;
use crate::render::canvas::Canvas;
use crate::render::charts::{self, Area, Metric, Scale};
use crate::render::{format, theme};

pub(crate) struct ProductivityView {
    pub matrix: CropMatrix,
    pub mean: f64,
    pub max: f64,
    pub min: f64,
    /// Mean of the last season against the first, in percent.
    pub variation: f64,
}

fn positive_mean(values: impl Iterator<Item = f64>) -> f64 {
    let positives: Vec<f64> = values.filter(|v| *v > 0.0).collect();
    if positives.is_empty() {
        0.0
    } else {
        positives.iter().sum::<f64>() / positives.len() as f64
    }
}

impl ProductivityView {
    pub fn from_chart(chart: &SeasonChart) -> Self {
        let points = &chart.chart_data;
        let positives: Vec<f64> = points
            .iter()
            .flat_map(|p| p.culturas.values().copied())
            .filter(|v| *v > 0.0)
            .collect();

        let (mean, max, min) = if positives.is_empty() {
            (0.0, 0.0, 0.0)
        } else {
            (
                positives.iter().sum::<f64>() / positives.len() as f64,
                positives.iter().copied().fold(f64::MIN, f64::max),
                positives.iter().copied().fold(f64::MAX, f64::min),
            )
        };

        let variation = match (points.first(), points.last()) {
            (Some(first), Some(last)) if points.len() >= 2 => format::growth(
                positive_mean(first.culturas.values().copied()),
                positive_mean(last.culturas.values().copied()),
            ),
            _ => 0.0,
        };

        Self {
            matrix: CropMatrix::from_points(points),
            mean,
            max,
            min,
            variation,
        }
    }

    pub fn metrics(&self) -> Vec<Metric> {
        vec![
            Metric::new(format!("{:.1}", self.mean), "Average yield", "bags/ha across crops"),
            Metric::new(format!("{:.1}", self.max), "Highest recorded", "bags/ha"),
            Metric::new(format!("{:.1}", self.min), "Lowest recorded", "bags/ha"),
            Metric::new(format::signed_percent(self.variation), "Total variation", "First to last season"),
        ]
    }
}

pub(super) fn draw(canvas: &mut Canvas, ctx: &ReportContext) {
    page_header(
        canvas,
        "Productivity",
        "Yield evolution by crop and operating efficiency",
    );
    let view = ProductivityView::from_chart(&ctx.data.productivity);

    charts::metric_row(canvas, theme::MARGIN, CONTENT_TOP, theme::CONTENT_WIDTH, 80.0, &view.metrics());

    let heading_y = CONTENT_TOP - 110.0;
    section_heading(canvas, heading_y, "Yield by Crop");

    let area = Area::new(theme::MARGIN + 35.0, heading_y - 250.0, theme::CONTENT_WIDTH - 35.0, 200.0);
    if view.matrix.is_empty() {
        charts::no_data(canvas, &area, NO_DATA);
        return;
    }

    let scale = Scale::for_values(view.matrix.values.iter().flatten());
    charts::value_axis(canvas, &area, &scale, 5, |v| format!("{:.0}", v));
    charts::line_chart(
        canvas,
        &area,
        &view.matrix.season_labels(),
        &view.matrix.series(),
        &scale,
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
        "Detail by Crop (bags/hectare)",
        &view.matrix,
        |v| if v == 0.0 { "-".to_string() } else { format!("{:.1}", v) },
    );
}
