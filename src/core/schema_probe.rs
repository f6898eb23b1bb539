use crate::domain::ports::SchemaSource;
use crate::domain::schema::{SchemaReport, TableInfo};
use crate::utils::error::Result;

/// What to read from the catalogue.
#[derive(Debug, Clone, Default)]
pub struct ProbeOptions {
    pub schema: String,
    /// Empty means every table.
    pub tables: Vec<String>,
    pub count_rows: bool,
}

impl ProbeOptions {
    fn wants(&self, table: &str) -> bool {
        self.tables.is_empty() || self.tables.iter().any(|t| t == table)
    }
}

fn logged<T: Default>(what: &str, result: Result<T>) -> T {
    result.unwrap_or_else(|e| {
        tracing::warn!("⚠️ Query for {} failed: {}", what, e);
        T::default()
    })
}

/// Builds the schema listing. Each catalogue query is independent, so a
/// failing one leaves its part of the report empty.
pub async fn probe<S: SchemaSource>(source: &S, options: &ProbeOptions) -> SchemaReport {
    let schema = options.schema.as_str();

    let mut tables: Vec<TableInfo> = logged("tables", source.tables(schema).await)
        .into_iter()
        .filter(|(name, _)| options.wants(name))
        .map(|(name, table_type)| TableInfo {
            name,
            table_type,
            ..Default::default()
        })
        .collect();

    for requested in &options.tables {
        if !tables.iter().any(|t| &t.name == requested) {
            tracing::warn!("⚠️ Table '{}' not found in schema '{}'", requested, schema);
        }
    }

    for (table, column) in logged("columns", source.columns(schema).await) {
        if let Some(info) = tables.iter_mut().find(|t| t.name == table) {
            info.columns.push(column);
        }
    }

    for (table, fk) in logged("foreign keys", source.foreign_keys(schema).await) {
        if let Some(info) = tables.iter_mut().find(|t| t.name == table) {
            info.foreign_keys.push(fk);
        }
    }

    if options.count_rows {
        for table in &mut tables {
            match source.count_rows(schema, &table.name).await {
                Ok(count) => table.row_count = Some(count),
                Err(e) => tracing::warn!("⚠️ Could not count rows of '{}': {}", table.name, e),
            }
        }
    }

    tracing::info!("📊 Schema '{}': {} tables", schema, tables.len());
    SchemaReport {
        schema: schema.to_string(),
        tables,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schema::{ColumnInfo, ForeignKey};
    use crate::utils::error::AgroError;
    use async_trait::async_trait;

    struct FakeCatalogue {
        fail_foreign_keys: bool,
    }

    fn column(name: &str, position: i32) -> ColumnInfo {
        ColumnInfo {
            name: name.to_string(),
            data_type: "text".to_string(),
            nullable: true,
            default: None,
            position,
        }
    }

    #[async_trait]
    impl SchemaSource for FakeCatalogue {
        async fn tables(&self, _schema: &str) -> Result<Vec<(String, String)>> {
            Ok(vec![
                ("organizacoes".into(), "BASE TABLE".into()),
                ("propriedades".into(), "BASE TABLE".into()),
                ("vw_resumo".into(), "VIEW".into()),
            ])
        }

        async fn columns(&self, _schema: &str) -> Result<Vec<(String, ColumnInfo)>> {
            Ok(vec![
                ("organizacoes".into(), column("id", 1)),
                ("organizacoes".into(), column("nome", 2)),
                ("propriedades".into(), column("id", 1)),
                ("propriedades".into(), column("organizacao_id", 2)),
            ])
        }

        async fn foreign_keys(&self, _schema: &str) -> Result<Vec<(String, ForeignKey)>> {
            if self.fail_foreign_keys {
                return Err(AgroError::processing("permission denied"));
            }
            Ok(vec![(
                "propriedades".into(),
                ForeignKey {
                    constraint: "propriedades_organizacao_id_fkey".into(),
                    column: "organizacao_id".into(),
                    references_table: "organizacoes".into(),
                    references_column: "id".into(),
                },
            )])
        }

        async fn count_rows(&self, _schema: &str, table: &str) -> Result<i64> {
            match table {
                "vw_resumo" => Err(AgroError::processing("view is broken")),
                _ => Ok(table.len() as i64),
            }
        }
    }

    #[tokio::test]
    async fn test_probe_groups_by_table() {
        let options = ProbeOptions {
            schema: "public".into(),
            ..Default::default()
        };
        let report = probe(&FakeCatalogue { fail_foreign_keys: false }, &options).await;

        assert_eq!(report.tables.len(), 3);
        assert_eq!(report.column_count(), 4);
        let properties = report.table("propriedades").unwrap();
        assert_eq!(properties.foreign_keys.len(), 1);
        assert!(properties.row_count.is_none());
    }

    #[tokio::test]
    async fn test_probe_filters_and_counts() {
        let options = ProbeOptions {
            schema: "public".into(),
            tables: vec!["propriedades".into(), "vw_resumo".into(), "ausente".into()],
            count_rows: true,
        };
        let report = probe(&FakeCatalogue { fail_foreign_keys: true }, &options).await;

        let names: Vec<&str> = report.tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["propriedades", "vw_resumo"]);
        assert_eq!(report.tables[0].row_count, Some(12));
        assert_eq!(report.tables[1].row_count, None);
        // failed foreign-key query leaves the rest intact
        assert!(report.tables[0].foreign_keys.is_empty());
        assert_eq!(report.tables[0].columns.len(), 2);
    }
}
