use crate::config::ReportSettings;
use crate::domain::model::{ReportData, SeasonChart};
use crate::domain::ports::{Pipeline, ReportSource, Storage};
use crate::render::pages::ReportContext;
use crate::render::{self, pages::PageKind};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};
use serde_json::Value;

pub const FALLBACK_ORGANIZATION_NAME: &str = "CLIENTE";
const ID_LENGTH: usize = 36;

/// The first command-line argument: an organization id (fetched from the
/// API) or a display name (rendered without data).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrganizationRef {
    Id(String),
    Name(String),
}

impl OrganizationRef {
    pub fn parse(arg: &str) -> Self {
        if arg.chars().count() == ID_LENGTH && arg.contains('-') {
            OrganizationRef::Id(arg.to_string())
        } else {
            OrganizationRef::Name(arg.to_string())
        }
    }

    fn display_name(&self) -> Option<&str> {
        match self {
            OrganizationRef::Name(name) => Some(name),
            OrganizationRef::Id(_) => None,
        }
    }
}

/// `Seasons 2021/22 - 2029/30` from the planting-area series.
pub fn report_period(planting: &SeasonChart) -> String {
    match (planting.chart_data.first(), planting.chart_data.last()) {
        (Some(first), Some(last)) if !first.safra.is_empty() && !last.safra.is_empty() => {
            format!("Seasons {} - {}", first.safra, last.safra)
        }
        _ => "Multi-season analysis".to_string(),
    }
}

pub fn organization_name(data: &ReportData, organization: &OrganizationRef) -> String {
    let nome = data.organization.nome.trim();
    if !nome.is_empty() {
        return nome.to_string();
    }
    organization
        .display_name()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(FALLBACK_ORGANIZATION_NAME)
        .to_string()
}

/// `{output_dir}/{prefix}_{YYYYmmdd_HHMMSS}.pdf`
pub fn default_output_path(output_dir: &str, file_prefix: &str, now: NaiveDateTime) -> String {
    let file_name = format!("{}_{}.pdf", file_prefix, now.format("%Y%m%d_%H%M%S"));
    std::path::Path::new(output_dir)
        .join(file_name)
        .to_string_lossy()
        .to_string()
}

/// A rendered document waiting to be written.
#[derive(Debug)]
pub struct RenderedReport {
    pub organization_name: String,
    pub page_count: usize,
    pub pdf: Vec<u8>,
}

pub struct ReportPipeline<S: ReportSource, St: Storage> {
    source: S,
    storage: St,
    settings: ReportSettings,
    organization: OrganizationRef,
    output: Option<String>,
}

impl<S: ReportSource, St: Storage> ReportPipeline<S, St> {
    pub fn new(
        source: S,
        storage: St,
        settings: ReportSettings,
        organization: OrganizationRef,
        output: Option<String>,
    ) -> Self {
        Self {
            source,
            storage,
            settings,
            organization,
            output,
        }
    }

    pub fn output_path(&self) -> String {
        match &self.output {
            Some(path) => path.clone(),
            None => default_output_path(
                &self.settings.output_dir,
                &self.settings.file_prefix,
                Local::now().naive_local(),
            ),
        }
    }
}

#[async_trait]
impl<S: ReportSource, St: Storage> Pipeline for ReportPipeline<S, St> {
    type Extracted = Value;
    type Transformed = RenderedReport;

    async fn extract(&self) -> Result<Value> {
        let id = match &self.organization {
            OrganizationRef::Id(id) => id,
            OrganizationRef::Name(name) => {
                tracing::info!("📋 No organization id given, rendering '{}' without data", name);
                return Ok(Value::Null);
            }
        };

        tracing::info!("🌐 Fetching report data for organization {}", id);
        match self
            .source
            .fetch_report(id, self.settings.projection_id.as_deref())
            .await
        {
            Ok(payload) => Ok(payload),
            Err(e) => {
                tracing::warn!("⚠️ Could not fetch report data, rendering empty report: {}", e);
                tracing::warn!("💡 {}", e.recovery_suggestion());
                Ok(Value::Null)
            }
        }
    }

    async fn transform(&self, payload: Value) -> Result<RenderedReport> {
        let data = ReportData::from_value(&payload);
        let name = organization_name(&data, &self.organization);
        let period = report_period(&data.planting_areas);
        tracing::debug!("Organization '{}', period '{}'", name, period);

        let ctx = ReportContext {
            data: &data,
            organization_name: &name,
            report_period: &period,
            branding: &self.settings.branding,
            generated_on: Local::now().date_naive(),
        };
        let pdf = render::render_report(&ctx)?;
        tracing::info!("📄 Rendered {} pages ({} bytes)", PageKind::ALL.len(), pdf.len());

        Ok(RenderedReport {
            organization_name: name,
            page_count: PageKind::ALL.len(),
            pdf,
        })
    }

    async fn load(&self, report: RenderedReport) -> Result<String> {
        let path = self.output_path();
        self.storage.write_file(&path, &report.pdf).await?;
        tracing::info!(
            "✅ Report for {} written ({} pages)",
            report.organization_name,
            report.page_count
        );
        Ok(path)
    }
}
