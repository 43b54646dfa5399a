//! Table name derivation.

use crate::error::{RegistryError, RegistryResult};

/// Conventional suffix removed from model names.
pub const MODEL_SUFFIX: &str = "Model";

/// Derive a table name from a model's simple name.
///
/// One trailing `Model` is removed (exact, case-sensitive match) and the
/// remainder is lowercased: `UserModel` -> `user`, `User` -> `user`.
pub fn derive_table_name(model_name: &str) -> String {
    model_name
        .strip_suffix(MODEL_SUFFIX)
        .unwrap_or(model_name)
        .to_lowercase()
}

/// Check that a model name is an identifier and yields a table name.
pub(crate) fn validate_model_name(model_name: &str) -> RegistryResult<String> {
    let mut chars = model_name.chars();
    let starts_ok = chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_');
    if !starts_ok || !chars.all(|c| c.is_alphanumeric() || c == '_') {
        return Err(RegistryError::introspection(
            model_name,
            "model name is not a valid identifier",
        ));
    }

    let table_name = derive_table_name(model_name);
    if table_name.is_empty() {
        return Err(RegistryError::introspection(
            model_name,
            format!("table name is empty after removing the '{MODEL_SUFFIX}' suffix"),
        ));
    }
    Ok(table_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix_stripped_and_lowercased() {
        assert_eq!(derive_table_name("UserModel"), "user");
        assert_eq!(derive_table_name("BlogPostModel"), "blogpost");
    }

    #[test]
    fn test_no_suffix() {
        assert_eq!(derive_table_name("User"), "user");
    }

    #[test]
    fn test_suffix_only_at_end_and_once() {
        assert_eq!(derive_table_name("ModelUser"), "modeluser");
        assert_eq!(derive_table_name("ModelModel"), "model");
    }

    #[test]
    fn test_suffix_is_case_sensitive() {
        assert_eq!(derive_table_name("Usermodel"), "usermodel");
        assert_eq!(derive_table_name("UserMODEL"), "usermodel");
    }

    #[test]
    fn test_validate_rejects_bare_suffix() {
        let err = validate_model_name("Model").unwrap_err();
        assert!(matches!(err, RegistryError::IntrospectionFailure { .. }));
    }

    #[test]
    fn test_validate_rejects_non_identifiers() {
        assert!(validate_model_name("").is_err());
        assert!(validate_model_name("{{closure}}").is_err());
        assert!(validate_model_name("9Lives").is_err());
        assert!(validate_model_name("Has Space").is_err());
    }

    #[test]
    fn test_validate_returns_table_name() {
        assert_eq!(validate_model_name("OrderModel").unwrap(), "order");
        assert_eq!(validate_model_name("_Audit").unwrap(), "_audit");
    }
}
