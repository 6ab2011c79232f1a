//! Identifier validation and quoting for dynamically built SQL.
//!
//! Table and column names cannot be bound as statement parameters, so every
//! dynamically assembled statement quotes them through this module. Names
//! are validated for obvious injection vectors first, then wrapped in the
//! engine's quote character with embedded quotes doubled.

use crate::error::{MigrateError, Result};

/// Maximum identifier length accepted from either engine.
/// - Firebird: 63 characters (dialect 3)
/// - MySQL: 64 characters
const MAX_IDENTIFIER_LENGTH: usize = 64;

/// Validate an identifier before it is spliced into SQL.
///
/// Rejects:
/// - Empty identifiers
/// - Identifiers containing null bytes (injection vector)
/// - Identifiers exceeding maximum length
///
/// # Errors
///
/// Returns `MigrateError::Config` with a descriptive message.
pub fn validate_identifier(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(MigrateError::Config(
            "Identifier cannot be empty".to_string(),
        ));
    }

    if name.contains('\0') {
        return Err(MigrateError::Config(format!(
            "Identifier contains null byte (possible injection attempt): {:?}",
            name
        )));
    }

    if name.len() > MAX_IDENTIFIER_LENGTH {
        return Err(MigrateError::Config(format!(
            "Identifier exceeds maximum length of {} bytes (got {} bytes): {:?}",
            MAX_IDENTIFIER_LENGTH,
            name.len(),
            name
        )));
    }

    Ok(())
}

/// Quote a Firebird identifier with double quotes.
///
/// Escapes embedded double quotes by doubling them. Validates the
/// identifier before quoting.
pub fn quote_firebird(name: &str) -> Result<String> {
    validate_identifier(name)?;
    Ok(format!("\"{}\"", name.replace('"', "\"\"")))
}

/// Quote a MySQL identifier with backticks.
///
/// Escapes embedded backticks by doubling them. Validates the identifier
/// before quoting.
pub fn quote_mysql(name: &str) -> Result<String> {
    validate_identifier(name)?;
    Ok(format!("`{}`", name.replace('`', "``")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_identifier_normal() {
        assert!(validate_identifier("USERS").is_ok());
        assert!(validate_identifier("my_table").is_ok());
        assert!(validate_identifier("Table123").is_ok());
    }

    #[test]
    fn test_validate_identifier_rejects_empty() {
        let result = validate_identifier("");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("empty"));
    }

    #[test]
    fn test_validate_identifier_rejects_null_byte() {
        let result = validate_identifier("table\0name");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("null byte"));
    }

    #[test]
    fn test_validate_identifier_rejects_too_long() {
        let long_name = "a".repeat(MAX_IDENTIFIER_LENGTH + 1);
        let result = validate_identifier(&long_name);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("maximum length"));
    }

    #[test]
    fn test_validate_identifier_accepts_max_length() {
        let max_name = "a".repeat(MAX_IDENTIFIER_LENGTH);
        assert!(validate_identifier(&max_name).is_ok());
    }

    #[test]
    fn test_quote_firebird_normal() {
        assert_eq!(quote_firebird("USERS").unwrap(), "\"USERS\"");
        assert_eq!(quote_firebird("my_table").unwrap(), "\"my_table\"");
    }

    #[test]
    fn test_quote_firebird_escapes_double_quote() {
        assert_eq!(quote_firebird("table\"name").unwrap(), "\"table\"\"name\"");
    }

    #[test]
    fn test_quote_mysql_normal() {
        assert_eq!(quote_mysql("users").unwrap(), "`users`");
        assert_eq!(quote_mysql("my_table").unwrap(), "`my_table`");
    }

    #[test]
    fn test_quote_mysql_escapes_backtick() {
        assert_eq!(quote_mysql("table`name").unwrap(), "`table``name`");
        assert_eq!(quote_mysql("a`b`c").unwrap(), "`a``b``c`");
    }

    #[test]
    fn test_quote_mysql_injection_safely_quoted() {
        let result = quote_mysql("users`; DROP TABLE students; --");
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), "`users``; DROP TABLE students; --`");
    }

    #[test]
    fn test_quote_rejects_invalid() {
        assert!(quote_firebird("").is_err());
        assert!(quote_mysql("table\0name").is_err());
    }
}
