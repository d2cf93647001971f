use std::{error::Error, io, path::PathBuf};

use clap::Parser;
use knexdl_core::Generator;

use crate::{
    commands::{Connect, print_report, run_generator},
    config::TomlConfig,
    prompt,
};

#[derive(Parser, Debug, Clone)]
#[command(about = "Generate the model types into <OUTPUT>/<MODEL>")]
#[must_use]
pub struct Generate {
    #[command(flatten)]
    connect: Connect,
    #[arg(value_name = "MODEL", help = "Model name")]
    model: String,
    #[arg(short, long, help = "Output root directory [default: src/]")]
    output: Option<PathBuf>,
    #[arg(long, help = "Path to the installed knex package")]
    knex_dir: Option<PathBuf>,
}

impl Generate {
    pub fn run(self) -> Result<(), Box<dyn Error>> {
        let config = TomlConfig::load()?;
        eprintln!();
        eprintln!(" - model: {}", self.model);
        let connection = self.connect.connection_string(&config)?;

        let generator = Generator::new(
            &self.model,
            config.output(self.output.clone()),
            config.knex_dir(self.knex_dir.clone()),
        );
        let confirm = |question: &str| -> io::Result<bool> { prompt::ask(question) };

        let rt = tokio::runtime::Runtime::new()?;
        let report = rt.block_on(run_generator(&connection, generator, confirm))?;
        print_report(&report);
        Ok(())
    }
}
