use std::{
    error::Error,
    fmt::{self, Write as _},
    io,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use regex::Regex;
use serde::{Deserialize, Serialize};
use tokio::{
    fs::{self, File},
    io::{AsyncWriteExt, BufWriter},
};
use tracing::{debug, info};

use crate::{
    introspect::{ColumnDescriptor, Connection, Introspector},
    naming::{composite_key_name, derive_namespace, property_name, row_type_identifier},
    types::map_type,
};

pub const FACADE_FILE: &str = "index.d.ts";
pub const RESULT_FILE: &str = "result.d.ts";
pub const TABLES_FILE: &str = "tables.d.ts";

const ROOT_NAMESPACE: &str = "Knex";
const IMPORT_HEADER: &str = "import type { Knex } from 'knex'\n";
const TABLE_WRAPPER: &str = "Knex.CompositeTableType";

static COMMENTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s:/\*.*?\*/)|//.*").expect("comment pattern is a valid regex")
});

static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("blank line pattern is a valid regex"));

#[derive(Debug, Clone)]
pub enum GenerateError {
    ConfirmationDeclined,
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerateError::ConfirmationDeclined => {
                write!(f, "Generation across multiple databases was declined")
            }
        }
    }
}

impl Error for GenerateError {}

/// Operator decision asked for before a run spans several databases.
///
/// An error reading the answer aborts the run with that error.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> io::Result<bool>;
}

impl<F: FnMut(&str) -> io::Result<bool>> Confirm for F {
    fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        self(prompt)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableIdentity {
    pub database: String,
    pub table: String,
}

#[derive(Debug, Clone)]
pub struct GenerationContext {
    model_name: String,
    multi_database: bool,
    output_dir: PathBuf,
}

impl GenerationContext {
    pub fn new(model_name: &str, multi_database: bool, output_dir: PathBuf) -> Self {
        Self {
            model_name: model_name.to_owned(),
            multi_database,
            output_dir,
        }
    }

    pub fn multi_database(&self) -> bool {
        self.multi_database
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn namespace(&self) -> String {
        derive_namespace(&self.model_name)
    }
}

#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub output_dir: PathBuf,
    pub databases: Vec<String>,
    pub tables: Vec<TableIdentity>,
}

/// Rewrites knex's own declarations into the model specific façade.
pub fn prepare_facade(template: &str, namespace: &str) -> String {
    let renamed = template.replace(ROOT_NAMESPACE, namespace);
    let stripped = COMMENTS.replace_all(&renamed, "");
    BLANK_LINES.replace_all(&stripped, "\n").trim().to_owned()
}

pub fn render_interface(
    identifier: &str,
    columns: &[ColumnDescriptor],
) -> Result<String, Box<dyn Error>> {
    let mut out = format!("export interface {identifier} {{\n");
    for column in columns {
        let ts_type = map_type(&column.raw_type, column.default_value.as_deref())?;
        let optional = if column.nullable { "?" } else { "" };
        writeln!(out, "  {}{optional}: {ts_type};", property_name(&column.name))?;
    }
    out.push_str("}\n");
    Ok(out)
}

pub fn render_aggregate(
    tables: &[TableIdentity],
    multi_database: bool,
) -> Result<String, fmt::Error> {
    let mut out = String::from("/* eslint-disable camelcase */\nexport interface Tables {");
    for TableIdentity { database, table } in tables {
        let key = composite_key_name(table, database, multi_database);
        let identifier = row_type_identifier(table, database, multi_database);
        write!(out, "\n  {}: {TABLE_WRAPPER}<{identifier}>;", property_name(&key))?;
    }
    out.push_str("\n}\n");
    Ok(out)
}

/// Streaming sink for the tables file.
///
/// Text goes to a `.partial` sibling that only replaces the target in
/// [`TablesFile::finish`]. Dropping an unfinished sink removes the partial file.
pub struct TablesFile {
    writer: BufWriter<File>,
    staged: PathBuf,
    target: PathBuf,
    published: bool,
}

impl TablesFile {
    pub async fn create(target: PathBuf) -> io::Result<Self> {
        let mut staged = target.clone().into_os_string();
        staged.push(".partial");
        let staged = PathBuf::from(staged);
        let file = File::create(&staged).await?;
        Ok(Self {
            writer: BufWriter::new(file),
            staged,
            target,
            published: false,
        })
    }

    pub async fn write(&mut self, text: &str) -> io::Result<()> {
        self.writer.write_all(text.as_bytes()).await
    }

    pub async fn finish(mut self) -> io::Result<()> {
        self.writer.flush().await?;
        self.writer.get_ref().sync_all().await?;
        fs::rename(&self.staged, &self.target).await?;
        self.published = true;
        Ok(())
    }
}

impl Drop for TablesFile {
    fn drop(&mut self) {
        if !self.published {
            let _ = std::fs::remove_file(&self.staged);
        }
    }
}

#[must_use]
pub struct Generator {
    introspector: Introspector,
    model_name: String,
    output_root: PathBuf,
    knex_dir: PathBuf,
}

impl Generator {
    /// `output_root/model_name` receives the declarations, `knex_dir` is the
    /// installed knex package the façade is derived from.
    pub fn new(
        model_name: impl Into<String>,
        output_root: impl Into<PathBuf>,
        knex_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            introspector: Introspector::default(),
            model_name: model_name.into(),
            output_root: output_root.into(),
            knex_dir: knex_dir.into(),
        }
    }

    pub async fn run(
        &self,
        conn: &impl Connection,
        confirm: &mut impl Confirm,
    ) -> Result<GenerationReport, Box<dyn Error>> {
        let output_dir = self.output_root.join(&self.model_name);
        info!("client: {}", conn.driver());
        info!("generate types into: {}", output_dir.display());

        let databases = self.introspector.databases(conn).await?;
        let context = GenerationContext::new(&self.model_name, databases.len() > 1, output_dir);
        if context.multi_database() {
            let prompt = format!(
                "more databases ({}) were found, do you want to continue with all?",
                databases.len()
            );
            if !confirm.confirm(&prompt)? {
                return Err(GenerateError::ConfirmationDeclined.into());
            }
        }
        info!("database: {}", databases.join(","));

        let template = read_to_string(&self.knex_dir.join("types").join(FACADE_FILE)).await?;
        fs::create_dir_all(context.output_dir()).await?;
        fs::write(
            context.output_dir().join(FACADE_FILE),
            prepare_facade(&template, &context.namespace()),
        )
        .await?;
        fs::copy(
            self.knex_dir.join("types").join(RESULT_FILE),
            context.output_dir().join(RESULT_FILE),
        )
        .await?;

        let tables = self.write_tables(conn, &context, &databases).await?;
        Ok(GenerationReport {
            output_dir: context.output_dir,
            databases,
            tables,
        })
    }

    async fn write_tables(
        &self,
        conn: &impl Connection,
        context: &GenerationContext,
        databases: &[String],
    ) -> Result<Vec<TableIdentity>, Box<dyn Error>> {
        let multi_database = context.multi_database();
        let mut sink = TablesFile::create(context.output_dir().join(TABLES_FILE)).await?;
        sink.write(IMPORT_HEADER).await?;

        let mut composites = vec![];
        for database in databases {
            for table in self.introspector.list_tables(conn, database).await? {
                debug!(" - generating {database} {table}");
                let columns = self.introspector.list_columns(conn, database, &table).await?;
                let identifier = row_type_identifier(&table, database, multi_database);
                sink.write(&render_interface(&identifier, &columns)?).await?;
                composites.push(TableIdentity {
                    database: database.clone(),
                    table,
                });
            }
        }

        sink.write(&render_aggregate(&composites, multi_database)?).await?;
        sink.finish().await?;
        Ok(composites)
    }
}

async fn read_to_string(path: &Path) -> Result<String, Box<dyn Error>> {
    Ok(fs::read_to_string(path).await.map_err(|error| {
        format!(
            "encountered '{error}' attempting to read {}",
            path.display()
        )
    })?)
}
