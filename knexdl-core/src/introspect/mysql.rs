use crate::introspect::{ColumnDescriptor, Dialect, IntrospectError, Row, is_nullable, quote_literal};

/// MySQL and MariaDB, read through `information_schema`.
pub struct MySql;

fn literal(value: &str) -> String {
    quote_literal(&value.replace('\\', "\\\\"))
}

impl Dialect for MySql {
    fn list_databases(&self) -> String {
        "SELECT CAST(SCHEMA_NAME AS CHAR) AS `Database` FROM information_schema.SCHEMATA ORDER BY SCHEMA_NAME".to_owned()
    }

    fn list_tables(&self, database: &str) -> String {
        format!(
            "SELECT CAST(TABLE_NAME AS CHAR) AS TABLE_NAME FROM information_schema.TABLES WHERE TABLE_SCHEMA = {} ORDER BY TABLE_NAME",
            literal(database)
        )
    }

    fn list_columns(&self, database: &str, table: &str) -> String {
        format!(
            "SELECT
    CAST(COLUMN_NAME AS CHAR) AS `Field`,
    CAST(DATA_TYPE AS CHAR) AS `Type`,
    CAST(IS_NULLABLE AS CHAR) AS `Null`,
    CAST(COLUMN_DEFAULT AS CHAR) AS `Default`
FROM
    information_schema.COLUMNS
WHERE
    TABLE_SCHEMA = {}
    AND TABLE_NAME = {}
ORDER BY
    ORDINAL_POSITION",
            literal(database),
            literal(table)
        )
    }

    fn system_databases(&self) -> &'static [&'static str] {
        &["mysql", "performance_schema", "information_schema", "sys"]
    }

    fn decode_column(&self, row: &Row) -> Result<ColumnDescriptor, IntrospectError> {
        let required = |field: &str| {
            row.text(field).ok_or_else(|| IntrospectError::MissingField {
                field: field.to_owned(),
            })
        };
        Ok(ColumnDescriptor {
            name: required("Field")?,
            raw_type: required("Type")?,
            nullable: row.get("Null").is_some_and(is_nullable),
            default_value: row.text("Default"),
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;

    #[test]
    fn queries_are_scoped() {
        let sql = MySql.list_tables("shop");
        assert!(sql.contains("TABLE_SCHEMA = 'shop'"));
        let sql = MySql.list_columns("shop", "order_items");
        assert!(sql.contains("TABLE_SCHEMA = 'shop'"));
        assert!(sql.contains("TABLE_NAME = 'order_items'"));
        assert!(sql.contains("ORDER BY\n    ORDINAL_POSITION"));
    }

    #[test]
    fn names_are_escaped() {
        let sql = MySql.list_tables(r"it's\");
        assert!(sql.contains(r"TABLE_SCHEMA = 'it''s\\'"));
    }

    #[test]
    fn decode_show_fields_row() {
        let row = Row::new()
            .with("Field", "settings")
            .with("Type", "json")
            .with("Null", "YES")
            .with("Default", "'{}'");
        assert_eq!(
            MySql.decode_column(&row).unwrap(),
            ColumnDescriptor {
                name: "settings".into(),
                nullable: true,
                raw_type: "json".into(),
                default_value: Some("'{}'".into()),
            }
        );
    }

    #[test]
    fn decode_requires_field_and_type() {
        let row = Row::new().with("Field", "id").with("Null", "NO");
        assert!(matches!(
            MySql.decode_column(&row),
            Err(IntrospectError::MissingField { field }) if field == "Type"
        ));

        let row = Row::new()
            .with("Field", Value::Null)
            .with("Type", "int");
        assert!(MySql.decode_column(&row).is_err());
    }
}
