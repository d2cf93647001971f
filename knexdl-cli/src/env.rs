use std::{collections::HashMap, error::Error, fmt::Display, path::Path, sync::LazyLock};

use regex::Regex;

static LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?m)^\s*(?:export\s+)?([\w.-]+)(?:\s*=\s*?|:\s+?)(\s*'(?:\\'|[^'])*'|\s*"(?:\\"|[^"])*"|\s*`(?:\\`|[^`])*`|[^#\r\n]+)?\s*(?:#.*)?$"#,
    )
    .expect("env line pattern is a valid regex")
});

#[derive(Debug, Clone)]
pub enum EnvError {
    NotFound { path: String },
}

impl Display for EnvError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnvError::NotFound { path } => write!(f, "{path} file not found"),
        }
    }
}

impl Error for EnvError {}

fn unquote(value: &str) -> &str {
    let mut chars = value.chars();
    match (chars.next(), chars.next_back()) {
        (Some(first), Some(last)) if first == last && matches!(first, '\'' | '"' | '`') => {
            &value[1..value.len() - 1]
        }
        _ => value,
    }
}

/// Parses `.env` style text: `[export] KEY=value` or `KEY: value`, with
/// optional quotes and trailing `#` comments.
pub fn parse(text: &str) -> HashMap<String, String> {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut vars = HashMap::new();
    for line in LINE.captures_iter(&text) {
        let key = line[1].to_owned();
        let value = line.get(2).map_or("", |value| value.as_str()).trim();
        let mut parsed = unquote(value).to_owned();
        if value.starts_with('"') {
            parsed = parsed.replace("\\n", "\n").replace("\\r", "\r");
        }
        vars.insert(key, parsed);
    }
    vars
}

pub fn read(path: &Path) -> Result<HashMap<String, String>, Box<dyn Error>> {
    if !std::fs::exists(path)? {
        return Err(EnvError::NotFound {
            path: path.display().to_string(),
        }
        .into());
    }
    Ok(parse(&std::fs::read_to_string(path)?))
}
