pub mod analyze;
pub mod etl;
pub mod extract;
pub mod inspect;
pub mod report_pipeline;
pub mod schema_probe;

pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
