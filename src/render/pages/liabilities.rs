use super::{page_header, section_heading, ReportContext, CONTENT_TOP, NO_DATA};
use crate::domain::model::{self, DebtPosition, DebtShare};
use crate::render::canvas::Canvas;
use crate::render::charts::{self, Area, Scale, Series};
use crate::render::fonts::Font;
use crate::render::{format, theme};

const OPERATING_MARKER: &str = "CUSTEIO";
const BANK_CATEGORY: &str = "BANCOS";

/// Operating credit against investment credit.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct DebtSplit {
    pub operating: f64,
    pub investment: f64,
}

impl DebtSplit {
    pub fn from_shares(shares: &[DebtShare]) -> Self {
        shares.iter().fold(Self::default(), |mut split, share| {
            if share.label().to_uppercase().contains(OPERATING_MARKER) {
                split.operating += share.amount();
            } else {
                split.investment += share.amount();
            }
            split
        })
    }

    pub fn total(&self) -> f64 {
        self.operating + self.investment
    }
}

/// Debt per season in R$ millions.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct DebtEvolution {
    pub seasons: Vec<String>,
    pub total: Vec<f64>,
    pub bank: Vec<f64>,
    pub net: Vec<f64>,
}

impl DebtEvolution {
    pub fn from_position(position: &DebtPosition) -> Self {
        let bank_series = position.category(BANK_CATEGORY);
        let indicators = &position.indicadores;
        let millions = |v: f64| v / 1_000_000.0;

        Self {
            seasons: position.anos.clone(),
            total: position
                .anos
                .iter()
                .map(|y| millions(model::at(&indicators.endividamento_total, y)))
                .collect(),
            bank: position
                .anos
                .iter()
                .map(|y| millions(bank_series.map(|s| model::at(s, y)).unwrap_or(0.0)))
                .collect(),
            net: position
                .anos
                .iter()
                .map(|y| millions(model::at(&indicators.divida_liquida, y)))
                .collect(),
        }
    }

    pub fn has_data(&self) -> bool {
        [&self.total, &self.bank, &self.net]
            .iter()
            .any(|series| series.iter().any(|v| *v != 0.0))
    }
}

fn draw_split(canvas: &mut Canvas, cx: f32, top: f32, title: &str, split: &DebtSplit) {
    canvas.set_fill(theme::PRIMARY);
    canvas.text_centred(cx, top, Font::Bold, 11.0, title);

    let slices = vec![
        ("Operating credit".to_string(), split.operating, theme::series_color(0)),
        ("Investment".to_string(), split.investment, theme::series_color(3)),
    ];
    charts::donut_chart(
        canvas,
        cx,
        top - 90.0,
        70.0,
        &slices,
        &format::brl_short(split.total()),
        "TOTAL",
    );
}

pub(super) fn draw(canvas: &mut Canvas, ctx: &ReportContext) {
    page_header(
        canvas,
        "Liabilities",
        "Debt profile by credit line and its evolution over the seasons",
    );
    let debts = &ctx.data.debts;

    let consolidated = DebtSplit::from_shares(&debts.consolidated);
    let current = DebtSplit::from_shares(&debts.current_season);
    let quarter = theme::CONTENT_WIDTH / 4.0;
    draw_split(canvas, theme::MARGIN + quarter, CONTENT_TOP, "Consolidated debt", &consolidated);
    draw_split(canvas, theme::MARGIN + 3.0 * quarter, CONTENT_TOP, "Current season debt", &current);

    let heading_y = CONTENT_TOP - 230.0;
    section_heading(canvas, heading_y, "Debt Position (R$ millions)");

    let area = Area::new(theme::MARGIN + 35.0, 140.0, theme::CONTENT_WIDTH - 35.0, heading_y - 190.0);
    let evolution = DebtEvolution::from_position(&ctx.data.debt_position);
    if !evolution.has_data() {
        charts::no_data(canvas, &area, NO_DATA);
        return;
    }

    let series = vec![
        Series {
            name: "Total debt".into(),
            color: theme::series_color(0),
            values: evolution.total.clone(),
        },
        Series {
            name: "Bank debt".into(),
            color: theme::series_color(2),
            values: evolution.bank.clone(),
        },
        Series {
            name: "Net debt".into(),
            color: theme::series_color(4),
            values: evolution.net.clone(),
        },
    ];
    let scale = Scale::for_values(series.iter().flat_map(|s| s.values.iter()));
    let seasons: Vec<String> = evolution.seasons.iter().map(|s| format::short_season(s)).collect();
    charts::value_axis(canvas, &area, &scale, 5, |v| format!("{:.0}", v));
    charts::line_chart(canvas, &area, &seasons, &series, &scale);

    let legend: Vec<_> = series.iter().map(|s| (s.name.clone(), s.color)).collect();
    charts::legend(canvas, theme::MARGIN, area.y - 30.0, theme::CONTENT_WIDTH, &legend);
}
