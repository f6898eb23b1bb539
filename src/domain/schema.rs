//! Shape of a PostgreSQL schema as read from `information_schema`.

use serde::Serialize;

#[derive(Debug, Clone, Serialize, Default)]
pub struct SchemaReport {
    pub schema: String,
    pub tables: Vec<TableInfo>,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct TableInfo {
    pub name: String,
    pub table_type: String,
    pub columns: Vec<ColumnInfo>,
    pub foreign_keys: Vec<ForeignKey>,
    /// Only filled when row counting was requested and succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_count: Option<i64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    pub nullable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    pub position: i32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ForeignKey {
    pub constraint: String,
    pub column: String,
    pub references_table: String,
    pub references_column: String,
}

impl SchemaReport {
    pub fn table(&self, name: &str) -> Option<&TableInfo> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn column_count(&self) -> usize {
        self.tables.iter().map(|t| t.columns.len()).sum()
    }

    /// Plain-text listing grouped by table.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "Schema '{}': {} tables, {} columns\n",
            self.schema,
            self.tables.len(),
            self.column_count()
        ));

        for table in &self.tables {
            out.push('\n');
            match table.row_count {
                Some(count) => out.push_str(&format!(
                    "== {} ({}, {} rows)\n",
                    table.name, table.table_type, count
                )),
                None => out.push_str(&format!("== {} ({})\n", table.name, table.table_type)),
            }

            for column in &table.columns {
                let mut line = format!(
                    "  {:<32} {:<28} {}",
                    column.name,
                    column.data_type,
                    if column.nullable { "NULL" } else { "NOT NULL" }
                );
                if let Some(default) = &column.default {
                    line.push_str(&format!(" DEFAULT {}", default));
                }
                out.push_str(line.trim_end());
                out.push('\n');
            }

            for fk in &table.foreign_keys {
                out.push_str(&format!(
                    "  FK {}: {} -> {}.{}\n",
                    fk.constraint, fk.column, fk.references_table, fk.references_column
                ));
            }
        }

        out
    }
}
