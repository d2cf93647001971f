use crate::introspect::{ColumnDescriptor, Dialect, IntrospectError, Row, is_nullable, quote_literal};

/// PostgreSQL.
///
/// `information_schema` only describes the database the session is attached
/// to, so that is the one database reported, and tables come from the
/// session's `current_schema()`.
pub struct Postgres;

impl Dialect for Postgres {
    fn list_databases(&self) -> String {
        "SELECT current_database()::text AS database".to_owned()
    }

    fn list_tables(&self, database: &str) -> String {
        format!(
            "SELECT
    table_name::text AS table_name
FROM
    information_schema.tables
WHERE
    table_catalog = {}
    AND table_schema = current_schema()
ORDER BY
    table_name",
            quote_literal(database)
        )
    }

    fn list_columns(&self, database: &str, table: &str) -> String {
        format!(
            "SELECT
    column_name::text AS column_name,
    udt_name::text AS udt_name,
    (is_nullable = 'YES') AS is_nullable,
    column_default::text AS column_default
FROM
    information_schema.columns
WHERE
    table_catalog = {}
    AND table_schema = current_schema()
    AND table_name = {}
ORDER BY
    ordinal_position",
            quote_literal(database),
            quote_literal(table)
        )
    }

    fn system_databases(&self) -> &'static [&'static str] {
        &["postgres", "template0", "template1"]
    }

    fn decode_column(&self, row: &Row) -> Result<ColumnDescriptor, IntrospectError> {
        let required = |field: &str| {
            row.text(field).ok_or_else(|| IntrospectError::MissingField {
                field: field.to_owned(),
            })
        };
        Ok(ColumnDescriptor {
            name: required("column_name")?,
            raw_type: required("udt_name")?,
            nullable: row.get("is_nullable").is_some_and(is_nullable),
            default_value: row.text("column_default"),
        })
    }
}
