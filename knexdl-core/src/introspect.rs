pub mod mysql;
pub mod postgres;

use std::{collections::HashMap, error::Error, fmt, future::Future, sync::Arc};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::introspect::{mysql::MySql, postgres::Postgres};

#[derive(Debug, Clone)]
pub enum IntrospectError {
    UnsupportedDriver { driver: String },
    MissingField { field: String },
    NoDatabases,
}

impl fmt::Display for IntrospectError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            IntrospectError::UnsupportedDriver { driver } => {
                write!(f, "{driver} NOT IMPLEMENTED YET")
            }
            IntrospectError::MissingField { field } => {
                write!(f, "Column metadata is missing the {field} field")
            }
            IntrospectError::NoDatabases => {
                write!(f, "No user database found, name one in the connection string")
            }
        }
    }
}

impl Error for IntrospectError {}

/// One record returned by a raw query, keys in select order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    values: Vec<(String, Value)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(key, value);
        self
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.push((key.into(), value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }

    pub fn first(&self) -> Option<&Value> {
        self.values.first().map(|(_, value)| value)
    }

    /// Text of a column; numbers and booleans are rendered, `NULL` is `None`.
    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key).and_then(value_text)
    }
}

pub(crate) fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    pub nullable: bool,
    pub raw_type: String,
    pub default_value: Option<String>,
}

/// A live database connection the introspector can issue read queries on.
pub trait Connection {
    /// Driver family, e.g. `mysql` or `postgres`.
    fn driver(&self) -> &str;

    /// Database selected when the connection was opened.
    fn database(&self) -> Option<&str>;

    fn raw(&self, sql: &str) -> impl Future<Output = Result<Vec<Row>, Box<dyn Error>>>;
}

/// Schema queries for one driver family.
pub trait Dialect {
    fn list_databases(&self) -> String;

    fn list_tables(&self, database: &str) -> String;

    fn list_columns(&self, database: &str, table: &str) -> String;

    /// Catalog databases never reported by `list_databases`.
    fn system_databases(&self) -> &'static [&'static str];

    fn decode_column(&self, row: &Row) -> Result<ColumnDescriptor, IntrospectError>;
}

/// Builds an [`Introspector`] with the built-in dialects registered.
#[must_use]
pub struct IntrospectorBuilder {
    dialects: HashMap<String, Arc<dyn Dialect>>,
}

impl Default for IntrospectorBuilder {
    fn default() -> Self {
        let mut builder = Self {
            dialects: HashMap::new(),
        };
        let mysql: Arc<dyn Dialect> = Arc::new(MySql);
        for driver in ["mysql", "mariadb"] {
            builder.dialects.insert(driver.to_owned(), mysql.clone());
        }
        let postgres: Arc<dyn Dialect> = Arc::new(Postgres);
        for driver in ["postgres", "postgresql"] {
            builder.dialects.insert(driver.to_owned(), postgres.clone());
        }
        builder
    }
}

impl IntrospectorBuilder {
    pub fn empty() -> Self {
        Self {
            dialects: HashMap::new(),
        }
    }

    pub fn add_dialect(
        &mut self,
        driver: impl Into<String>,
        dialect: impl Dialect + 'static,
    ) -> &mut Self {
        self.dialects.insert(driver.into(), Arc::new(dialect));
        self
    }

    pub fn build(self) -> Introspector {
        Introspector {
            dialects: self.dialects,
        }
    }
}

pub struct Introspector {
    dialects: HashMap<String, Arc<dyn Dialect>>,
}

impl Default for Introspector {
    fn default() -> Self {
        IntrospectorBuilder::default().build()
    }
}

impl Introspector {
    pub fn dialect(&self, driver: &str) -> Result<&dyn Dialect, IntrospectError> {
        self.dialects
            .get(driver)
            .map(|dialect| dialect.as_ref())
            .ok_or_else(|| IntrospectError::UnsupportedDriver {
                driver: driver.to_owned(),
            })
    }

    pub async fn list_databases(
        &self,
        conn: &impl Connection,
    ) -> Result<Vec<String>, Box<dyn Error>> {
        let dialect = self.dialect(conn.driver())?;
        let excluded = dialect.system_databases();
        let rows = conn.raw(&dialect.list_databases()).await?;
        Ok(rows
            .iter()
            .filter_map(|row| row.first().and_then(value_text))
            .filter(|database| !excluded.contains(&database.as_str()))
            .collect())
    }

    pub async fn list_tables(
        &self,
        conn: &impl Connection,
        database: &str,
    ) -> Result<Vec<String>, Box<dyn Error>> {
        let dialect = self.dialect(conn.driver())?;
        let rows = conn.raw(&dialect.list_tables(database)).await?;
        Ok(rows
            .iter()
            .filter_map(|row| row.first().and_then(value_text))
            .collect())
    }

    pub async fn list_columns(
        &self,
        conn: &impl Connection,
        database: &str,
        table: &str,
    ) -> Result<Vec<ColumnDescriptor>, Box<dyn Error>> {
        let dialect = self.dialect(conn.driver())?;
        let rows = conn.raw(&dialect.list_columns(database, table)).await?;
        let mut columns = Vec::with_capacity(rows.len());
        for row in &rows {
            columns.push(dialect.decode_column(row)?);
        }
        Ok(columns)
    }

    /// Databases a run covers: the pre-selected one, otherwise every user database.
    pub async fn databases(&self, conn: &impl Connection) -> Result<Vec<String>, Box<dyn Error>> {
        self.dialect(conn.driver())?;
        match conn.database() {
            Some(database) => {
                debug!("connection is scoped to {database}");
                Ok(vec![database.to_owned()])
            }
            None => {
                let databases = self.list_databases(conn).await?;
                if databases.is_empty() {
                    return Err(IntrospectError::NoDatabases.into());
                }
                Ok(databases)
            }
        }
    }
}

/// Wraps a value in single quotes, doubling embedded quotes.
pub(crate) fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Accepts the spellings drivers use for a nullable flag.
pub(crate) fn is_nullable(value: &Value) -> bool {
    match value {
        Value::Bool(nullable) => *nullable,
        Value::Number(number) => number.as_i64().is_some_and(|flag| flag != 0),
        Value::String(text) => matches!(text.to_ascii_uppercase().as_str(), "YES" | "TRUE" | "1"),
        _ => false,
    }
}
