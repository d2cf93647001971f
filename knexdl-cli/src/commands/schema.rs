use std::error::Error;

use clap::Parser;
use knexdl_core::{Introspector, SqlxConnection};

use crate::{
    commands::Connect,
    config::TomlConfig,
    schema::{ColumnSchema, DbSchema, TableSchema},
};

#[derive(Parser, Debug, Clone)]
#[command(about = "Print the discovered tables with their mapped types")]
#[must_use]
pub struct Schema {
    #[command(flatten)]
    connect: Connect,
    #[arg(long, help = "Print the schema as json")]
    json: bool,
}

async fn load_schema(connection: &str) -> Result<DbSchema, Box<dyn Error>> {
    let conn = SqlxConnection::connect(connection).await?;
    let schema = collect(&conn).await;
    conn.close().await;
    schema
}

async fn collect(conn: &SqlxConnection) -> Result<DbSchema, Box<dyn Error>> {
    let introspector = Introspector::default();
    let mut schema = DbSchema::default();
    for database in introspector.databases(conn).await? {
        for table in introspector.list_tables(conn, &database).await? {
            let columns = introspector
                .list_columns(conn, &database, &table)
                .await?
                .into_iter()
                .map(ColumnSchema::from)
                .collect();
            schema.tables.push(TableSchema {
                database: database.clone(),
                name: table,
                columns,
            });
        }
    }
    Ok(schema)
}

impl Schema {
    pub fn run(self) -> Result<(), Box<dyn Error>> {
        let config = TomlConfig::load()?;
        let connection = self.connect.connection_string(&config)?;

        let rt = tokio::runtime::Runtime::new()?;
        let schema = rt.block_on(load_schema(&connection))?;
        match self.json {
            true => println!("{}", serde_json::to_string_pretty(&schema)?),
            false => print!("{schema}"),
        }
        Ok(())
    }
}
