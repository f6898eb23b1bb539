use super::{draw_logo, ReportContext};
use crate::render::canvas::Canvas;
use crate::render::fonts::Font;
use crate::render::{format, theme};
use chrono::{Datelike, NaiveDate};

const MONTHS: [&str; 12] = [
    "JANUARY",
    "FEBRUARY",
    "MARCH",
    "APRIL",
    "MAY",
    "JUNE",
    "JULY",
    "AUGUST",
    "SEPTEMBER",
    "OCTOBER",
    "NOVEMBER",
    "DECEMBER",
];

/// `4 MARCH 2025`
pub(crate) fn cover_date(date: NaiveDate) -> String {
    format!("{} {} {}", date.day(), MONTHS[date.month0() as usize], date.year())
}

pub(super) fn draw(canvas: &mut Canvas, ctx: &ReportContext) {
    let x = theme::MARGIN;
    let logo_y = theme::PAGE_HEIGHT - 60.0;

    let logo_width = draw_logo(canvas, x, logo_y, 36.0, ctx.branding);
    canvas.set_stroke(theme::BRAND);
    canvas.set_line_width(3.0);
    canvas.line(x + logo_width + 8.0, logo_y - 5.0, x + logo_width + 8.0, logo_y + 20.0);

    canvas.set_fill(theme::LIGHT);
    canvas.text_right(
        theme::PAGE_WIDTH - theme::MARGIN,
        logo_y + 5.0,
        Font::Regular,
        12.0,
        &cover_date(ctx.generated_on),
    );

    let center_y = theme::PAGE_HEIGHT / 2.0 + 20.0;

    canvas.set_stroke(theme::PRIMARY);
    canvas.set_line_width(2.0);
    canvas.line(x, center_y + 140.0, x + 40.0, center_y + 140.0);
    canvas.set_fill(theme::PRIMARY);
    canvas.text(x + 52.0, center_y + 135.0, Font::Bold, 14.0, "EXECUTIVE REPORT");

    canvas.text(x, center_y + 50.0, Font::Regular, 48.0, "Economic and");
    canvas.text(x, center_y - 10.0, Font::Bold, 48.0, "Financial Analysis");

    canvas.set_fill(theme::SECONDARY);
    let name = ctx.organization_name.to_uppercase();
    let mut y = center_y - 100.0;
    for line in format::wrap_text(&name, Font::Bold, 28.0, theme::CONTENT_WIDTH)
        .into_iter()
        .take(3)
    {
        canvas.text(x, y, Font::Bold, 28.0, &line);
        y -= 34.0;
    }

    let footer_y = 80.0;
    canvas.set_fill(theme::LIGHT);
    canvas.text_right(
        theme::PAGE_WIDTH - theme::MARGIN,
        footer_y + 20.0,
        Font::Regular,
        12.0,
        "COMPLETE ANALYSIS",
    );
    canvas.set_fill(theme::SECONDARY);
    canvas.text_right(
        theme::PAGE_WIDTH - theme::MARGIN,
        footer_y,
        Font::Bold,
        16.0,
        ctx.report_period,
    );

    let gradient = [
        theme::PRIMARY,
        theme::SECONDARY,
        theme::TERTIARY,
        theme::SECONDARY,
        theme::PRIMARY,
    ];
    let band = theme::PAGE_WIDTH / gradient.len() as f32;
    for (i, color) in gradient.iter().enumerate() {
        canvas.fill_rect(i as f32 * band, 0.0, band, 6.0, *color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cover_date() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();
        assert_eq!(cover_date(date), "4 MARCH 2025");
        let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(cover_date(date), "31 DECEMBER 2024");
    }
}
