use crate::domain::ports::SchemaSource;
use crate::domain::schema::{ColumnInfo, ForeignKey};
use crate::utils::error::Result;
use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

// information_schema columns are domain types; everything is cast to text or
// int4 so sqlx decodes them as plain Rust types.

const TABLES_QUERY: &str = r#"
    SELECT table_name::text AS table_name, table_type::text AS table_type
    FROM information_schema.tables
    WHERE table_schema = $1
    ORDER BY table_name
"#;

const COLUMNS_QUERY: &str = r#"
    SELECT table_name::text AS table_name,
           column_name::text AS column_name,
           data_type::text AS data_type,
           (is_nullable = 'YES') AS nullable,
           column_default::text AS column_default,
           ordinal_position::int4 AS position
    FROM information_schema.columns
    WHERE table_schema = $1
    ORDER BY table_name, ordinal_position
"#;

// Referencing and referenced columns are paired by position, so a composite
// key yields one row per column instead of every combination.
const FOREIGN_KEYS_QUERY: &str = r#"
    SELECT tc.table_name::text AS table_name,
           tc.constraint_name::text AS constraint_name,
           kcu.column_name::text AS column_name,
           ref.table_name::text AS foreign_table,
           ref.column_name::text AS foreign_column
    FROM information_schema.table_constraints tc
    JOIN information_schema.key_column_usage kcu
      ON kcu.constraint_name = tc.constraint_name
     AND kcu.constraint_schema = tc.constraint_schema
    JOIN information_schema.referential_constraints rc
      ON rc.constraint_name = tc.constraint_name
     AND rc.constraint_schema = tc.constraint_schema
    JOIN information_schema.key_column_usage ref
      ON ref.constraint_name = rc.unique_constraint_name
     AND ref.constraint_schema = rc.unique_constraint_schema
     AND ref.ordinal_position = kcu.position_in_unique_constraint
    WHERE tc.constraint_type = 'FOREIGN KEY'
      AND tc.table_schema = $1
    ORDER BY tc.table_name, tc.constraint_name, kcu.ordinal_position
"#;

#[derive(sqlx::FromRow)]
struct TableRow {
    table_name: String,
    table_type: String,
}

#[derive(sqlx::FromRow)]
struct ColumnRow {
    table_name: String,
    column_name: String,
    data_type: String,
    nullable: Option<bool>,
    column_default: Option<String>,
    position: i32,
}

#[derive(sqlx::FromRow)]
struct ForeignKeyRow {
    table_name: String,
    constraint_name: String,
    column_name: String,
    foreign_table: String,
    foreign_column: String,
}

pub struct PgSchemaSource {
    pool: PgPool,
}

impl PgSchemaSource {
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections.max(1))
            .acquire_timeout(Duration::from_secs(30))
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl SchemaSource for PgSchemaSource {
    async fn tables(&self, schema: &str) -> Result<Vec<(String, String)>> {
        let rows: Vec<TableRow> = sqlx::query_as(TABLES_QUERY)
            .bind(schema)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|r| (r.table_name, r.table_type))
            .collect())
    }

    async fn columns(&self, schema: &str) -> Result<Vec<(String, ColumnInfo)>> {
        let rows: Vec<ColumnRow> = sqlx::query_as(COLUMNS_QUERY)
            .bind(schema)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|r| {
                (
                    r.table_name,
                    ColumnInfo {
                        name: r.column_name,
                        data_type: r.data_type,
                        nullable: r.nullable.unwrap_or(true),
                        default: r.column_default,
                        position: r.position,
                    },
                )
            })
            .collect())
    }

    async fn foreign_keys(&self, schema: &str) -> Result<Vec<(String, ForeignKey)>> {
        let rows: Vec<ForeignKeyRow> = sqlx::query_as(FOREIGN_KEYS_QUERY)
            .bind(schema)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|r| {
                (
                    r.table_name,
                    ForeignKey {
                        constraint: r.constraint_name,
                        column: r.column_name,
                        references_table: r.foreign_table,
                        references_column: r.foreign_column,
                    },
                )
            })
            .collect())
    }

    async fn count_rows(&self, schema: &str, table: &str) -> Result<i64> {
        let sql = format!(
            "SELECT COUNT(*) FROM {}.{}",
            quote_ident(schema),
            quote_ident(table)
        );
        let (count,): (i64,) = sqlx::query_as(&sql).fetch_one(&self.pool).await?;
        Ok(count)
    }
}

/// Quotes an SQL identifier, doubling embedded quotes.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("safras"), "\"safras\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn test_foreign_keys_pair_columns_by_position() {
        assert!(!FOREIGN_KEYS_QUERY.contains("constraint_column_usage"));
        assert!(FOREIGN_KEYS_QUERY.contains("referential_constraints"));
        assert!(FOREIGN_KEYS_QUERY
            .contains("ref.ordinal_position = kcu.position_in_unique_constraint"));
    }
}
