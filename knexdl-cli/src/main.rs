mod commands;
pub mod config;
pub mod env;
mod prompt;
pub mod schema;

use std::error::Error;

use clap::*;
use commands::{Generate, Initialize, Introspect, Schema};

#[derive(Parser)]
#[command(name = "knexdl", bin_name = "knexdl")]
enum Command {
    Introspect(Introspect),
    Generate(Generate),
    Schema(Schema),
    Init(Initialize),
}

fn run() -> Result<(), Box<dyn Error>> {
    let command = Command::parse();
    match command {
        Command::Introspect(args) => args.run(),
        Command::Generate(args) => args.run(),
        Command::Schema(args) => args.run(),
        Command::Init(args) => args.init(),
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!();
        eprintln!(" - Error: {err}");
        std::process::exit(1);
    }
}
