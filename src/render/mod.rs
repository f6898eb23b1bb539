// Render layer: vector drawing, charts and the fourteen report pages, serialized to PDF with lopdf.

pub mod canvas;
pub mod charts;
pub mod document;
pub mod fonts;
pub mod format;
pub mod pages;
pub mod theme;

use crate::utils::error::Result;
use document::DocumentInfo;
use pages::{PageKind, ReportContext};

pub const DOCUMENT_TITLE: &str = "Economic and Financial Analysis";

/// Draws every page in order and returns the finished PDF.
pub fn render_report(ctx: &ReportContext) -> Result<Vec<u8>> {
    let pages = PageKind::ALL
        .iter()
        .map(|kind| {
            tracing::debug!("Drawing page {}: {}", kind.number(), kind.title());
            kind.draw(ctx)
        })
        .collect();

    let info = DocumentInfo {
        title: DOCUMENT_TITLE.to_string(),
        author: format!("{} {}", ctx.branding.mark, ctx.branding.name),
        subject: ctx.organization_name.to_string(),
        created: chrono::Local::now().naive_local(),
    };

    document::assemble(pages, &info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::toml_config::BrandingConfig;
    use crate::domain::model::ReportData;
    use chrono::NaiveDate;

    #[test]
    fn test_render_report_on_empty_data() {
        let data = ReportData::default();
        let branding = BrandingConfig::default();
        let ctx = ReportContext {
            data: &data,
            organization_name: "CLIENTE",
            report_period: "Multi-season analysis",
            branding: &branding,
            generated_on: NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(),
        };

        let bytes = render_report(&ctx).unwrap();
        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), PageKind::ALL.len());
    }
}
