#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use toml_config::{AgroConfig, BrandingConfig, DatabaseConfig};

/// Report settings after applying command-line overrides on top of the
/// config file and built-in defaults.
#[derive(Debug, Clone)]
pub struct ReportSettings {
    pub base_url: String,
    pub projection_id: Option<String>,
    pub timeout_seconds: u64,
    pub output_dir: String,
    pub file_prefix: String,
    pub branding: BrandingConfig,
    pub monitor: bool,
}

impl ReportSettings {
    pub fn from_config(config: &AgroConfig) -> Self {
        Self {
            base_url: config.api.base_url.clone(),
            projection_id: config.api.projection_id.clone(),
            timeout_seconds: config.api.timeout_seconds,
            output_dir: config.report.output_dir.clone(),
            file_prefix: config.report.file_prefix.clone(),
            branding: config.branding.clone(),
            monitor: config.monitoring.enabled,
        }
    }

    #[cfg(feature = "cli")]
    pub fn with_cli(mut self, cli: &cli::ReportCli) -> Self {
        if let Some(base_url) = &cli.base_url {
            self.base_url = base_url.clone();
        }
        if let Some(projection_id) = &cli.projection_id {
            self.projection_id = Some(projection_id.clone());
        }
        if let Some(timeout) = cli.timeout {
            self.timeout_seconds = timeout;
        }
        self.monitor |= cli.monitor;
        self
    }
}

impl ConfigProvider for ReportSettings {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn projection_id(&self) -> Option<&str> {
        self.projection_id.as_deref()
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    fn output_dir(&self) -> &str {
        &self.output_dir
    }

    fn file_prefix(&self) -> &str {
        &self.file_prefix
    }
}

impl Validate for ReportSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_url("api.base_url", &self.base_url)?;
        validation::validate_positive_number(
            "api.timeout_seconds",
            self.timeout_seconds as usize,
            1,
        )?;
        validation::validate_path("report.output_dir", &self.output_dir)?;
        validation::validate_non_empty_string("report.file_prefix", &self.file_prefix)?;
        Ok(())
    }
}

/// Connection string from the flag, then the config file, then
/// `DATABASE_URL` (a `.env` file is honoured). Blank values, such as an
/// unset `${VAR}` in the config, fall through to the next source.
pub fn resolve_database_url(flag: Option<&str>, config: &DatabaseConfig) -> Option<String> {
    let present = |url: &String| !url.trim().is_empty();

    flag.map(str::to_string)
        .filter(present)
        .or_else(|| config.url.clone().filter(present))
        .or_else(|| {
            dotenvy::dotenv().ok();
            std::env::var("DATABASE_URL").ok().filter(present)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_from_defaults() {
        let settings = ReportSettings::from_config(&AgroConfig::default());
        assert_eq!(settings.base_url(), "http://localhost:3000");
        assert_eq!(settings.timeout_seconds(), 30);
        assert!(settings.projection_id().is_none());
        assert!(settings.validate().is_ok());
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_cli_overrides_config() {
        use clap::Parser;

        let config = AgroConfig::from_toml_str(
            "[api]\nbase_url = \"http://config:9000\"\nprojection_id = \"from-config\"\n",
        )
        .unwrap();
        let cli = cli::ReportCli::try_parse_from([
            "agro-report",
            "org",
            "--base-url",
            "http://flag:8000",
            "--timeout",
            "5",
        ])
        .unwrap();

        let settings = ReportSettings::from_config(&config).with_cli(&cli);
        assert_eq!(settings.base_url(), "http://flag:8000");
        assert_eq!(settings.projection_id(), Some("from-config"));
        assert_eq!(settings.timeout_seconds(), 5);
    }

    #[test]
    fn test_database_url_precedence() {
        let config = DatabaseConfig {
            url: Some("postgres://config/db".into()),
            ..Default::default()
        };
        assert_eq!(
            resolve_database_url(Some("postgres://flag/db"), &config).as_deref(),
            Some("postgres://flag/db")
        );
        assert_eq!(
            resolve_database_url(None, &config).as_deref(),
            Some("postgres://config/db")
        );

        let blank = DatabaseConfig {
            url: Some(String::new()),
            ..Default::default()
        };
        std::env::set_var("DATABASE_URL", "postgres://env/db");
        assert_eq!(
            resolve_database_url(Some(" "), &blank).as_deref(),
            Some("postgres://env/db")
        );
        assert_eq!(
            resolve_database_url(None, &config).as_deref(),
            Some("postgres://config/db")
        );

        std::env::remove_var("DATABASE_URL");
        assert_eq!(resolve_database_url(None, &blank), None);
    }
}
