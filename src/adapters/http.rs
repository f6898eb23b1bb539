use crate::domain::ports::{ConfigProvider, ReportSource};
use crate::utils::error::{AgroError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Fetches report payloads from `GET {base_url}/api/report-data/{id}`.
pub struct HttpReportSource {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpReportSource {
    pub fn new(base_url: impl Into<String>, timeout_seconds: u64) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            timeout: Duration::from_secs(timeout_seconds),
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self::new(config.base_url(), config.timeout_seconds())
    }

    pub fn endpoint(&self, organization_id: &str, projection_id: Option<&str>) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| AgroError::InvalidConfigValueError {
            field: "api.base_url".to_string(),
            value: self.base_url.clone(),
            reason: format!("Invalid URL format: {}", e),
        })?;

        url.path_segments_mut()
            .map_err(|_| AgroError::InvalidConfigValueError {
                field: "api.base_url".to_string(),
                value: self.base_url.clone(),
                reason: "URL cannot be a base".to_string(),
            })?
            .pop_if_empty()
            .extend(["api", "report-data", organization_id]);

        if let Some(projection) = projection_id.filter(|p| !p.is_empty()) {
            url.query_pairs_mut().append_pair("projectionId", projection);
        }

        Ok(url)
    }
}

#[async_trait]
impl ReportSource for HttpReportSource {
    async fn fetch_report(
        &self,
        organization_id: &str,
        projection_id: Option<&str>,
    ) -> Result<Value> {
        let url = self.endpoint(organization_id, projection_id)?;
        tracing::debug!("Making API request to: {}", url);

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await?;

        tracing::debug!("API response status: {}", response.status());
        let response = response.error_for_status()?;
        let payload: Value = response.json().await?;
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn test_endpoint_building() {
        let source = HttpReportSource::new("http://localhost:3000/", 30);
        let url = source.endpoint("abc", None).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/report-data/abc");

        let url = source.endpoint("abc", Some("p 1")).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:3000/api/report-data/abc?projectionId=p+1"
        );

        let nested = HttpReportSource::new("https://host/app", 30);
        assert_eq!(
            nested.endpoint("x", Some("")).unwrap().as_str(),
            "https://host/app/api/report-data/x"
        );
    }

    #[tokio::test]
    async fn test_fetch_report() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/report-data/org-1")
                .query_param("projectionId", "proj-9");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"organization": {"nome": "Fazenda"}}));
        });

        let source = HttpReportSource::new(server.base_url(), 5);
        let payload = source.fetch_report("org-1", Some("proj-9")).await.unwrap();

        mock.assert();
        assert_eq!(payload["organization"]["nome"], "Fazenda");
    }

    #[tokio::test]
    async fn test_fetch_report_non_success_is_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/report-data/missing");
            then.status(404);
        });

        let source = HttpReportSource::new(server.base_url(), 5);
        let err = source.fetch_report("missing", None).await.unwrap_err();
        assert!(matches!(err, AgroError::ApiError(_)));
    }
}
