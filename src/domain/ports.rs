use crate::domain::schema::{ColumnInfo, ForeignKey};
use crate::domain::workbook::Sheet;
use crate::utils::error::{AgroError, Result};
use async_trait::async_trait;
use serde_json::Value;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn projection_id(&self) -> Option<&str>;
    fn timeout_seconds(&self) -> u64;
    fn output_dir(&self) -> &str;
    fn file_prefix(&self) -> &str;
}

/// Where report payloads come from.
#[async_trait]
pub trait ReportSource: Send + Sync {
    async fn fetch_report(&self, organization_id: &str, projection_id: Option<&str>)
        -> Result<Value>;
}

/// Read access to the sheets of a workbook.
pub trait SheetSource {
    fn sheet_names(&self) -> Vec<String>;
    fn read_sheet(&mut self, name: &str) -> Result<Sheet>;
}

/// Sheets already in memory.
impl SheetSource for Vec<Sheet> {
    fn sheet_names(&self) -> Vec<String> {
        self.iter().map(|s| s.name.clone()).collect()
    }

    fn read_sheet(&mut self, name: &str) -> Result<Sheet> {
        self.iter()
            .find(|s| s.name == name)
            .cloned()
            .ok_or_else(|| AgroError::MissingSheetError {
                sheet: name.to_string(),
            })
    }
}

/// Catalogue queries against one database. Rows are tagged with their
/// table name.
#[async_trait]
pub trait SchemaSource: Send + Sync {
    /// `(table_name, table_type)` pairs.
    async fn tables(&self, schema: &str) -> Result<Vec<(String, String)>>;
    async fn columns(&self, schema: &str) -> Result<Vec<(String, ColumnInfo)>>;
    async fn foreign_keys(&self, schema: &str) -> Result<Vec<(String, ForeignKey)>>;
    async fn count_rows(&self, schema: &str, table: &str) -> Result<i64>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    type Extracted: Send;
    type Transformed: Send;

    async fn extract(&self) -> Result<Self::Extracted>;
    async fn transform(&self, data: Self::Extracted) -> Result<Self::Transformed>;
    async fn load(&self, result: Self::Transformed) -> Result<String>;
}
