pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod render;
pub mod utils;

pub use adapters::{http::HttpReportSource, storage::LocalStorage, xlsx::XlsxWorkbook};
pub use config::{toml_config::AgroConfig, ReportSettings};
pub use core::{
    analyze::AnalyzePipeline,
    etl::{EtlEngine, RunOutput}, extract::ExtractPipeline,
    report_pipeline::ReportPipeline,
};
pub use utils::error::{AgroError, Result};
