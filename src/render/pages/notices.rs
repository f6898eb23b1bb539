use super::{page_header, ReportContext, CONTENT_TOP};
use crate::render::canvas::{Canvas, Paint};
use crate::render::fonts::Font;
use crate::render::{format, theme};

pub(crate) struct Notice {
    pub title: &'static str,
    pub text: String,
}

pub(crate) fn notices(organization: &str, firm: &str) -> Vec<Notice> {
    vec![
        Notice {
            title: "CONFIDENTIALITY",
            text: format!(
                "All information provided by {} to {}, including but not limited to strategic plans, \
                 business objectives, commercial strategies and production methods, is considered \
                 strictly confidential and will be handled with the highest degree of professional secrecy.",
                organization, firm
            ),
        },
        Notice {
            title: "ASSUMPTIONS AND PROJECTIONS",
            text: "The analyses, projections and scenarios in this report rest on assumptions \
                   considered reasonable at the time of writing. They are subject to the uncertainty \
                   of the business environment and may be significantly affected by changes in \
                   economic, market or regulatory conditions."
                .to_string(),
        },
        Notice {
            title: "RESPONSIBILITY FOR THE INFORMATION",
            text: format!(
                "This report was prepared exclusively from data and information supplied by the \
                 client. {} did not audit these data independently. The client remains fully \
                 responsible for their accuracy and completeness.",
                firm
            ),
        },
        Notice {
            title: "ANALYSES CHANGE OVER TIME",
            text: "The conclusions and recommendations in this document reflect the conditions at \
                   the date it was prepared. The analyses and strategies should be reviewed \
                   periodically to stay aligned with the business environment."
                .to_string(),
        },
    ]
}

pub(super) fn draw(canvas: &mut Canvas, ctx: &ReportContext) {
    page_header(canvas, "Legal Notices", "Terms that apply to the whole report");

    let firm = format!("{} {}", ctx.branding.mark, ctx.branding.name);
    let x = theme::MARGIN;
    let text_x = x + 50.0;
    let text_width = theme::CONTENT_WIDTH - 50.0;
    let mut y = CONTENT_TOP - 10.0;

    for (i, notice) in notices(ctx.organization_name, &firm).iter().enumerate() {
        let box_size = 32.0;
        let box_y = y - box_size + 8.0;
        canvas.set_fill(theme::PRIMARY);
        canvas.round_rect(x, box_y, box_size, box_size, 4.0, Paint::Fill);
        canvas.set_fill(theme::WHITE);
        canvas.text_centred(
            x + box_size / 2.0,
            box_y + box_size / 2.0 - 5.0,
            Font::Bold,
            14.0,
            &(i + 1).to_string(),
        );

        canvas.set_fill(theme::PRIMARY);
        canvas.text(text_x, y - 2.0, Font::Bold, 13.0, notice.title);

        canvas.set_fill(theme::TERTIARY);
        let lines = format::wrap_text(&notice.text, Font::Regular, 11.0, text_width);
        let mut line_y = y - 20.0;
        for line in &lines {
            canvas.text(text_x, line_y, Font::Regular, 11.0, line);
            line_y -= 14.0;
        }

        y -= lines.len() as f32 * 14.0 + 42.0;
    }

    let warning = format!(
        "This document is the exclusive property of {} and must not be reproduced, \
         distributed or disclosed to third parties without express authorization.",
        ctx.organization_name
    );
    let lines = format::wrap_text(&warning, Font::Oblique, 10.0, theme::CONTENT_WIDTH - 48.0);
    let height = 18.0 + lines.len() as f32 * 13.0;
    let top = y - 10.0;

    canvas.set_fill(theme::BG_LIGHT);
    canvas.round_rect(x, top - height, theme::CONTENT_WIDTH, height, 4.0, Paint::Fill);
    canvas.fill_rect(x, top - height, 4.0, height, theme::PRIMARY);

    canvas.set_fill(theme::TERTIARY);
    let mut line_y = top - 16.0;
    for line in &lines {
        canvas.text(x + 24.0, line_y, Font::Oblique, 10.0, line);
        line_y -= 13.0;
    }
}
