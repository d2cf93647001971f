use std::error::Error;

use serde_json::Value;
use sqlx::{
    AnyPool, Column, Row as _,
    any::{AnyPoolOptions, AnyRow, install_default_drivers},
};
use tracing::debug;

use crate::{
    introspect::{Connection, Row},
    url::{ConnectionUrl, UrlError},
};

/// [`Connection`] over a single pooled sqlx connection.
pub struct SqlxConnection {
    pool: AnyPool,
    url: ConnectionUrl,
}

impl SqlxConnection {
    pub async fn connect(connection_string: &str) -> Result<Self, Box<dyn Error>> {
        let url = ConnectionUrl::parse(connection_string)?;
        if url.driver().is_none() {
            return Err(UrlError::Malformed.into());
        }
        install_default_drivers();
        debug!("connecting to {url}");
        let pool = AnyPoolOptions::new()
            .max_connections(1)
            .connect(url.as_str())
            .await?;
        Ok(Self { pool, url })
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}

fn decode_value(row: &AnyRow, idx: usize) -> Value {
    if let Ok(value) = row.try_get::<Option<String>, _>(idx) {
        return value.map_or(Value::Null, Value::String);
    }
    if let Ok(value) = row.try_get::<Option<bool>, _>(idx) {
        return value.map_or(Value::Null, Value::Bool);
    }
    if let Ok(value) = row.try_get::<Option<i64>, _>(idx) {
        return value.map_or(Value::Null, Value::from);
    }
    if let Ok(value) = row.try_get::<Option<f64>, _>(idx) {
        return value.map_or(Value::Null, Value::from);
    }
    Value::Null
}

fn decode_row(row: &AnyRow) -> Row {
    let mut decoded = Row::new();
    for column in row.columns() {
        decoded.push(column.name(), decode_value(row, column.ordinal()));
    }
    decoded
}

impl Connection for SqlxConnection {
    fn driver(&self) -> &str {
        self.url.driver().unwrap_or_default()
    }

    fn database(&self) -> Option<&str> {
        self.url.database()
    }

    async fn raw(&self, sql: &str) -> Result<Vec<Row>, Box<dyn Error>> {
        let rows = sqlx::query(sql).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(decode_row).collect())
    }
}
