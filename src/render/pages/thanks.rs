use super::{draw_logo, ReportContext};
use crate::config::toml_config::BrandingConfig;
use crate::render::canvas::Canvas;
use crate::render::fonts::Font;
use crate::render::{format, theme};
use chrono::NaiveDate;

const MESSAGE: [&str; 3] = [
    "Thank you for the trust placed in our work.",
    "We remain available to discuss the analyses in this report and to support the next steps in managing your business.",
    "Our team is at your disposal for any questions.",
];

/// `Report generated on 04/03/2025`
pub(crate) fn generated_line(date: NaiveDate) -> String {
    format!("Report generated on {}", date.format("%d/%m/%Y"))
}

fn draw_contacts(canvas: &mut Canvas, mut y: f32, branding: &BrandingConfig) {
    canvas.set_fill(theme::PRIMARY);
    canvas.text(theme::MARGIN, y, Font::Regular, 18.0, "Our Contacts");
    y -= 8.0;
    canvas.fill_rect(theme::MARGIN, y, 140.0, 2.0, theme::PRIMARY);
    y -= 28.0;

    for contact in &branding.contacts {
        canvas.set_fill(theme::PRIMARY);
        canvas.text(theme::MARGIN, y, Font::Bold, 10.0, &contact.label);
        let label_width = canvas.string_width(&contact.label, Font::Bold, 10.0);
        canvas.set_fill(theme::TERTIARY);
        canvas.text(theme::MARGIN + label_width + 8.0, y, Font::Regular, 10.0, &contact.value);
        y -= 18.0;
    }
}

pub(super) fn draw(canvas: &mut Canvas, ctx: &ReportContext) {
    let title_y = theme::PAGE_HEIGHT - 120.0;
    canvas.set_fill(theme::PRIMARY);
    canvas.text(theme::MARGIN, title_y, Font::Regular, 32.0, "Thank You");
    canvas.fill_rect(theme::MARGIN, title_y - 15.0, 60.0, 3.0, theme::PRIMARY);

    let mut y = title_y - 60.0;
    canvas.set_fill(theme::SECONDARY);
    for paragraph in MESSAGE {
        for line in format::wrap_text(paragraph, Font::Regular, 14.0, theme::CONTENT_WIDTH) {
            canvas.text(theme::MARGIN, y, Font::Regular, 14.0, &line);
            y -= 22.0;
        }
        y -= 15.0;
    }

    if !ctx.branding.contacts.is_empty() {
        draw_contacts(canvas, y - 35.0, ctx.branding);
    }

    let mark_size = 18.0;
    let width = canvas.string_width(&ctx.branding.mark, Font::Bold, mark_size)
        + 6.0
        + canvas.string_width(&ctx.branding.name, Font::Regular, mark_size * 0.56);
    let footer_y = 50.0;
    draw_logo(canvas, (theme::PAGE_WIDTH - width) / 2.0, footer_y, mark_size, ctx.branding);

    let center = theme::PAGE_WIDTH / 2.0;
    canvas.set_fill(theme::LIGHT);
    canvas.text_centred(center, footer_y - 15.0, Font::Regular, 9.0, &ctx.branding.tagline);
    canvas.set_fill(theme::LIGHTER);
    canvas.text_centred(center, footer_y - 35.0, Font::Regular, 8.0, &generated_line(ctx.generated_on));
}
