mod generate;
mod init;
mod introspect;
mod schema;

use std::{error::Error, path::PathBuf};

use knexdl_core::{Confirm, GenerationReport, Generator, SqlxConnection, mask_credentials};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::{config, env};

pub use generate::Generate;
pub use init::Initialize;
pub use introspect::Introspect;
pub use schema::Schema;

/// Progress goes to stderr so stdout only carries command output.
fn init_tracing(debug: bool) -> Result<(), Box<dyn Error>> {
    let level = if debug { Level::INFO } else { Level::WARN };
    tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .with_target(debug)
            .finish(),
    )?;
    Ok(())
}

/// Arguments shared by every command that connects to a database.
#[derive(clap::Args, Debug, Clone)]
pub struct Connect {
    #[arg(value_name = "ENV", help = "Environment name containing the connection string")]
    environment: String,
    #[arg(short, long = "env", help = "Path to the environments file [default: .env]")]
    env_file: Option<PathBuf>,
    #[arg(long, help = "Show debug information")]
    debug: bool,
}

impl Connect {
    /// Reads the environments file and returns the selected connection string.
    fn connection_string(&self, config: &config::TomlConfig) -> Result<String, Box<dyn Error>> {
        init_tracing(self.debug)?;
        let path = std::env::current_dir()?.join(config.env_file(self.env_file.clone()));
        let vars = env::read(&path)?;
        let connection = config::connection_string(&vars, &self.environment)?;
        eprintln!(
            " - loaded environment '{}' from: {}",
            self.environment,
            path.display()
        );
        eprintln!(" - connection string: {}", mask_credentials(&connection));
        eprintln!();
        Ok(connection)
    }
}

async fn run_generator(
    connection: &str,
    generator: Generator,
    mut confirm: impl Confirm,
) -> Result<GenerationReport, Box<dyn Error>> {
    let conn = SqlxConnection::connect(connection).await?;
    let report = generator.run(&conn, &mut confirm).await;
    conn.close().await;
    report
}

fn print_report(report: &GenerationReport) {
    for table in &report.tables {
        eprintln!(" - generated {}.{}", table.database, table.table);
    }
    eprintln!(
        " - all types were generated successfully into {}",
        report.output_dir.display()
    );
}
