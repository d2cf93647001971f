use std::{error::Error, fmt};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapperError {
    UnknownColumnType { raw_type: String },
}

impl fmt::Display for MapperError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MapperError::UnknownColumnType { raw_type } => {
                write!(f, "Non registered column type {raw_type}")
            }
        }
    }
}

impl Error for MapperError {}

/// TypeScript type a column is declared as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TsType {
    Boolean,
    String,
    Number,
    Date,
    Record,
    Array,
    Unknown,
}

impl fmt::Display for TsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TsType::Boolean => write!(f, "boolean"),
            TsType::String => write!(f, "string"),
            TsType::Number => write!(f, "number"),
            TsType::Date => write!(f, "Date"),
            TsType::Record => write!(f, "Record<string, unknown>"),
            TsType::Array => write!(f, "unknown[]"),
            TsType::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeFamily {
    Boolean,
    Text,
    Numeric,
    Temporal,
    Json,
}

const TYPE_FAMILIES: &[(&str, TypeFamily)] = &[
    ("bool", TypeFamily::Boolean),
    ("boolean", TypeFamily::Boolean),
    // Text types
    ("text", TypeFamily::Text),
    ("citext", TypeFamily::Text),
    ("tinytext", TypeFamily::Text),
    ("mediumtext", TypeFamily::Text),
    ("longtext", TypeFamily::Text),
    ("char", TypeFamily::Text),
    ("character", TypeFamily::Text),
    ("bpchar", TypeFamily::Text),
    ("varchar", TypeFamily::Text),
    ("character varying", TypeFamily::Text),
    ("enum", TypeFamily::Text),
    ("set", TypeFamily::Text),
    // Numbers drivers hand back as strings
    ("money", TypeFamily::Text),
    ("numeric", TypeFamily::Text),
    ("decimal", TypeFamily::Text),
    ("int8", TypeFamily::Text),
    ("time", TypeFamily::Text),
    ("timetz", TypeFamily::Text),
    ("tsquery", TypeFamily::Text),
    ("tsvector", TypeFamily::Text),
    ("uuid", TypeFamily::Text),
    ("xml", TypeFamily::Text),
    ("cidr", TypeFamily::Text),
    ("inet", TypeFamily::Text),
    ("macaddr", TypeFamily::Text),
    ("macaddr8", TypeFamily::Text),
    // Integer and float types
    ("tinyint", TypeFamily::Numeric),
    ("smallint", TypeFamily::Numeric),
    ("mediumint", TypeFamily::Numeric),
    ("int", TypeFamily::Numeric),
    ("integer", TypeFamily::Numeric),
    ("bigint", TypeFamily::Numeric),
    ("int2", TypeFamily::Numeric),
    ("int4", TypeFamily::Numeric),
    ("double", TypeFamily::Numeric),
    ("double precision", TypeFamily::Numeric),
    ("real", TypeFamily::Numeric),
    ("float", TypeFamily::Numeric),
    ("float4", TypeFamily::Numeric),
    ("float8", TypeFamily::Numeric),
    // Time types
    ("datetime", TypeFamily::Temporal),
    ("date", TypeFamily::Temporal),
    ("timestamp", TypeFamily::Temporal),
    ("timestamptz", TypeFamily::Temporal),
    // Json types
    ("json", TypeFamily::Json),
    ("jsonb", TypeFamily::Json),
];

impl TypeFamily {
    /// Looks up an already normalized type name.
    pub fn lookup(name: &str) -> Option<Self> {
        TYPE_FAMILIES
            .iter()
            .find(|(known, _)| *known == name)
            .map(|(_, family)| *family)
    }

    pub fn resolve(self, default_value: Option<&str>) -> TsType {
        match self {
            TypeFamily::Boolean => TsType::Boolean,
            TypeFamily::Text => TsType::String,
            TypeFamily::Numeric => TsType::Number,
            TypeFamily::Temporal => TsType::Date,
            TypeFamily::Json => match default_value {
                Some(default) if default.starts_with("'{") => TsType::Record,
                Some(default) if default.starts_with("'[") => TsType::Array,
                _ => TsType::Unknown,
            },
        }
    }
}

/// Drops the `(n)` / `(p, s)` suffix and normalizes case.
fn normalize(raw_type: &str) -> String {
    let base = match raw_type.find('(') {
        Some(parentheses) => &raw_type[..parentheses],
        None => raw_type,
    };
    base.trim().to_lowercase()
}

pub fn map_type(raw_type: &str, default_value: Option<&str>) -> Result<TsType, MapperError> {
    let Some(family) = TypeFamily::lookup(&normalize(raw_type)) else {
        return Err(MapperError::UnknownColumnType {
            raw_type: raw_type.to_owned(),
        });
    };
    Ok(family.resolve(default_value))
}
