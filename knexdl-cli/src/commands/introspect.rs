use std::{error::Error, io, path::PathBuf};

use clap::Parser;
use knexdl_core::{Generator, naming::derive_namespace};

use crate::{
    commands::{Connect, print_report, run_generator},
    config::TomlConfig,
    prompt,
};

#[derive(Parser, Debug, Clone)]
#[command(about = "Introspect the database into node_modules/@types/knexdl/<MODEL>")]
#[must_use]
pub struct Introspect {
    #[command(flatten)]
    connect: Connect,
    #[arg(value_name = "MODEL", help = "Model name")]
    model: String,
    #[arg(long, help = "Path to the installed knex package")]
    knex_dir: Option<PathBuf>,
    #[arg(short, long, help = "Answer yes to every question")]
    yes: bool,
}

fn usage(model: &str) -> String {
    let namespace = derive_namespace(model);
    let binding = model.to_lowercase();
    format!(
        "import knex from 'knex'
import type {{ {namespace} }} from 'knexdl/{model}'

const {binding} = knex({{
    ...
}}) as unknown as {namespace}
export default {binding}"
    )
}

impl Introspect {
    pub fn run(self) -> Result<(), Box<dyn Error>> {
        let config = TomlConfig::load()?;
        eprintln!();
        eprintln!(" - model: {}", self.model);
        let connection = self.connect.connection_string(&config)?;
        if !self.yes && !prompt::ask("Continue?")? {
            return Ok(());
        }

        let generator = Generator::new(
            &self.model,
            config.types_dir(),
            config.knex_dir(self.knex_dir.clone()),
        );
        let yes = self.yes;
        let confirm = move |question: &str| -> io::Result<bool> {
            match yes {
                true => Ok(true),
                false => prompt::ask(question),
            }
        };

        let rt = tokio::runtime::Runtime::new()?;
        let report = rt.block_on(run_generator(&connection, generator, confirm))?;
        print_report(&report);
        eprintln!(" - the connection file should look like this");
        println!();
        println!("{}", usage(&self.model));
        println!();
        Ok(())
    }
}
