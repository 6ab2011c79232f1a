//! Configuration validation.

use super::Config;
use crate::error::{MigrateError, Result};

/// Validate the configuration after file load and environment overrides.
pub fn validate(config: &Config) -> Result<()> {
    // Source validation
    if config.firebird.host.is_empty() {
        return Err(MigrateError::Config("firebird.host is required".into()));
    }
    if config.firebird.database.is_empty() {
        return Err(MigrateError::Config(
            "firebird.database is required (set it in the config file or FIREBIRD_DATABASE)".into(),
        ));
    }
    if config.firebird.user.is_empty() {
        return Err(MigrateError::Config("firebird.user is required".into()));
    }

    // Target validation
    if config.mysql.host.is_empty() {
        return Err(MigrateError::Config("mysql.host is required".into()));
    }
    if config.mysql.database.is_empty() {
        return Err(MigrateError::Config(
            "mysql.database is required (set it in the config file or MYSQL_DATABASE)".into(),
        ));
    }
    if config.mysql.user.is_empty() {
        return Err(MigrateError::Config("mysql.user is required".into()));
    }

    // Migration config validation
    if config.migration.batch_size == 0 {
        return Err(MigrateError::Config(
            "migration.batch_size must be at least 1".into(),
        ));
    }

    Ok(())
}
