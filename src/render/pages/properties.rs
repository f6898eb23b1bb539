use super::{page_header, section_heading, ReportContext, CONTENT_TOP, NO_DATA};
use crate::domain::model::PropertiesSection;
use crate::render::canvas::Canvas;
use crate::render::charts::{self, Area, Metric, Scale};
use crate::render::{format, theme};

const RANKING_SIZE: usize = 15;

pub(crate) struct PropertiesView {
    pub metrics: Vec<Metric>,
    /// Highest `valor_atual` first.
    pub ranking: Vec<(String, f64)>,
}

impl PropertiesView {
    pub fn from_section(section: &PropertiesSection) -> Self {
        let stats = &section.stats;
        let metrics = vec![
            Metric::new(
                stats.total_farms.to_string(),
                "Total farms",
                format!("{} owned • {} leased", stats.owned, stats.leased),
            ),
            Metric::new(
                format::thousands(stats.total_area),
                "Total area (ha)",
                format!(
                    "{:.0}% owned • {:.0}% leased",
                    stats.owned_area_percent, stats.leased_area_percent
                ),
            ),
            Metric::new(
                format::brl_millions(stats.asset_value),
                "Asset value",
                format!("Arable area {} ha", format::thousands(stats.arable_area)),
            ),
        ];

        let mut ranking: Vec<(String, f64)> = section
            .list
            .iter()
            .map(|p| (format::truncate(p.display_name(), 10, 8, ".."), p.valor_atual))
            .collect();
        ranking.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranking.truncate(RANKING_SIZE);

        Self { metrics, ranking }
    }
}

pub(super) fn draw(canvas: &mut Canvas, ctx: &ReportContext) {
    page_header(
        canvas,
        "Real Estate Holdings",
        "Full view of the property portfolio and how value is spread across farms",
    );
    let view = PropertiesView::from_section(&ctx.data.properties);

    let strip_top = CONTENT_TOP;
    charts::metric_row(canvas, theme::MARGIN, strip_top, theme::CONTENT_WIDTH, 90.0, &view.metrics);

    let heading_y = strip_top - 130.0;
    section_heading(canvas, heading_y, "Property Value Ranking");

    let area = Area::new(theme::MARGIN + 40.0, 150.0, theme::CONTENT_WIDTH - 40.0, heading_y - 190.0);
    if view.ranking.is_empty() {
        charts::no_data(canvas, &area, NO_DATA);
        return;
    }

    let scale = Scale::for_values(view.ranking.iter().map(|(_, v)| v));
    charts::value_axis(canvas, &area, &scale, 5, format::brl_short);

    let labels: Vec<String> = view.ranking.iter().map(|(l, _)| l.clone()).collect();
    let values: Vec<f64> = view.ranking.iter().map(|(_, v)| *v).collect();
    charts::ranking_bars(
        canvas,
        &area,
        &labels,
        &values,
        theme::PRIMARY,
        &scale,
        |v| format!("{:.1}M", v / 1_000_000.0),
    );
}
