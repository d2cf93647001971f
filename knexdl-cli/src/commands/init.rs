use std::{error::Error, fs};

use crate::config::{CONFIG_FILE, TomlConfig};

/// Writes `knexdl.toml` with every setting at its default.
#[derive(clap::Args)]
#[command(about = "Write a default knexdl.toml", long_about = None, name = "init")]
pub struct Initialize {
    #[arg(long, help = "Replace an existing knexdl.toml")]
    force: bool,
}

fn default_config() -> Result<String, toml::ser::Error> {
    let body = toml::to_string_pretty(&TomlConfig::with_defaults())?;
    Ok(format!(
        "# knexdl settings, command line flags take precedence\n{body}"
    ))
}

impl Initialize {
    pub fn init(self) -> Result<(), Box<dyn Error>> {
        if !self.force && fs::exists(CONFIG_FILE)? {
            eprintln!(" - {CONFIG_FILE} already exists, pass --force to replace it");
            return Ok(());
        }
        fs::write(CONFIG_FILE, default_config()?)?;
        eprintln!(" - wrote {CONFIG_FILE}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_parses_back() {
        let text = default_config().unwrap();
        assert!(text.starts_with("# knexdl settings"));
        let config: TomlConfig = toml::from_str(&text).unwrap();
        assert_eq!(config.knex_dir(None), std::path::PathBuf::from("node_modules/knex"));
        assert_eq!(
            config.types_dir(),
            std::path::PathBuf::from("node_modules/@types/knexdl")
        );
    }
}
