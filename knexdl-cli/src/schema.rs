use std::fmt::{self, Display};

use knexdl_core::{ColumnDescriptor, TsType, map_type};
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSchema {
    pub database: String,
    pub name: String,
    pub columns: Vec<ColumnSchema>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub name: String,
    pub raw_type: String,
    pub ts_type: Option<TsType>,
    pub nullable: bool,
}

impl From<ColumnDescriptor> for ColumnSchema {
    fn from(column: ColumnDescriptor) -> Self {
        let ts_type = match map_type(&column.raw_type, column.default_value.as_deref()) {
            Ok(ts_type) => Some(ts_type),
            Err(err) => {
                warn!("{}: {err}", column.name);
                None
            }
        };
        Self {
            name: column.name,
            raw_type: column.raw_type,
            ts_type,
            nullable: column.nullable,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DbSchema {
    pub tables: Vec<TableSchema>,
}

impl ColumnSchema {
    fn label(&self) -> String {
        match self.nullable {
            true => format!("{}?", self.name),
            false => self.name.clone(),
        }
    }

    fn type_label(&self) -> String {
        match self.ts_type {
            Some(ts_type) => ts_type.to_string(),
            None => format!("??? ({})", self.raw_type),
        }
    }
}

/// One block per table, one `name  type` line per column.
impl Display for DbSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for table in &self.tables {
            writeln!(f, "{}.{}", table.database, table.name)?;
            let labels: Vec<_> = table.columns.iter().map(ColumnSchema::label).collect();
            let width = labels.iter().map(String::len).max().unwrap_or_default();
            for (label, column) in labels.iter().zip(&table.columns) {
                writeln!(f, "  {label:<width$}  {}", column.type_label())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
