use std::sync::LazyLock;

use regex::Regex;

static MODEL_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)models|model").expect("model pattern is a valid regex")
});

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("identifier pattern is a valid regex")
});

pub fn capitalize_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Namespace the knex declarations are renamed to, e.g. `user_model` -> `User_Models`.
pub fn derive_namespace(model_name: &str) -> String {
    let stripped = MODEL_WORD.replace_all(model_name, "");
    capitalize_first(&format!("{stripped}Models"))
}

pub fn composite_key_name(table: &str, database: &str, multi_database: bool) -> String {
    match multi_database {
        true => format!("{database}.{table}"),
        false => table.to_owned(),
    }
}

/// Interface name for a table row, e.g. `order-items` -> `Order_items`.
pub fn row_type_identifier(table: &str, database: &str, multi_database: bool) -> String {
    let name = match multi_database {
        true => format!("{}{}", capitalize_first(database), capitalize_first(table)),
        false => capitalize_first(table),
    };
    type_identifier(&name)
}

/// Replaces characters a TypeScript identifier cannot hold with `_`.
fn type_identifier(name: &str) -> String {
    let mut identifier: String = name
        .chars()
        .map(|ch| match ch.is_ascii_alphanumeric() || ch == '_' || ch == '$' {
            true => ch,
            false => '_',
        })
        .collect();
    if identifier.is_empty() || identifier.starts_with(|ch: char| ch.is_ascii_digit()) {
        identifier.insert(0, '_');
    }
    identifier
}

/// Property key for a column, quoted when it is not a plain identifier.
pub fn property_name(field: &str) -> String {
    match IDENTIFIER.is_match(field) {
        true => field.to_owned(),
        false => format!("'{}'", field.replace('\\', "\\\\").replace('\'', "\\'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalize() {
        assert_eq!(capitalize_first("users"), "Users");
        assert_eq!(capitalize_first("userProfile"), "UserProfile");
        assert_eq!(capitalize_first("_users"), "_users");
        assert_eq!(capitalize_first("ärger"), "Ärger");
        assert_eq!(capitalize_first(""), "");
    }

    #[test]
    fn namespace_removes_model_words() {
        assert_eq!(derive_namespace("UserModel"), "UserModels");
        assert_eq!(derive_namespace("user_model"), "User_Models");
        assert_eq!(derive_namespace("models_user"), "_userModels");
        assert_eq!(derive_namespace("MODELS"), "Models");
        assert_eq!(derive_namespace("shop"), "ShopModels");
    }

    #[test]
    fn single_database_names_are_unqualified() {
        assert_eq!(composite_key_name("users", "shop", false), "users");
        assert_eq!(row_type_identifier("users", "shop", false), "Users");
    }

    #[test]
    fn multi_database_names_are_qualified() {
        assert_eq!(composite_key_name("users", "shop", true), "shop.users");
        assert_eq!(row_type_identifier("users", "shop", true), "ShopUsers");
    }

    #[test]
    fn row_types_are_valid_identifiers() {
        assert_eq!(row_type_identifier("order-items", "shop", false), "Order_items");
        assert_eq!(row_type_identifier("order items", "my-shop", true), "My_shopOrder_items");
        assert_eq!(row_type_identifier("2024_sales", "shop", false), "_2024_sales");
        assert_eq!(row_type_identifier("ärger", "shop", false), "_rger");
        assert_eq!(composite_key_name("order-items", "shop", false), "order-items");
    }

    #[test]
    fn property_names() {
        assert_eq!(property_name("created_at"), "created_at");
        assert_eq!(property_name("$id"), "$id");
        assert_eq!(property_name("created-at"), "'created-at'");
        assert_eq!(property_name("1st"), "'1st'");
        assert_eq!(property_name("it's"), "'it\\'s'");
    }
}
