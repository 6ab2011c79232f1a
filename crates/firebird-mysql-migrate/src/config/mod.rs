//! Configuration loading, environment resolution, and validation.

mod types;
mod validation;

pub use types::*;

use crate::error::{MigrateError, Result};
use std::path::Path;

impl Config {
    /// Load configuration from a YAML file, apply environment overrides,
    /// and validate the result.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = serde_yaml::from_str(&content)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string without touching the
    /// environment. Used by tests and by callers that resolve their own
    /// settings.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }

    /// Layer environment variables over file values. Environment wins;
    /// unset or empty variables leave the file value in place.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|name| std::env::var(name).ok())
    }

    fn apply_overrides_from(&mut self, get: impl Fn(&str) -> Option<String>) -> Result<()> {
        override_string(&mut self.firebird.host, "FIREBIRD_HOST", &get);
        override_port(&mut self.firebird.port, "FIREBIRD_PORT", &get)?;
        override_string(&mut self.firebird.database, "FIREBIRD_DATABASE", &get);
        override_string(&mut self.firebird.user, "FIREBIRD_USER", &get);
        override_string(&mut self.firebird.password, "FIREBIRD_PASSWORD", &get);
        override_string(&mut self.firebird.charset, "FIREBIRD_CHARSET", &get);

        override_string(&mut self.mysql.host, "MYSQL_HOST", &get);
        override_port(&mut self.mysql.port, "MYSQL_PORT", &get)?;
        override_string(&mut self.mysql.database, "MYSQL_DATABASE", &get);
        override_string(&mut self.mysql.user, "MYSQL_USER", &get);
        override_string(&mut self.mysql.password, "MYSQL_PASSWORD", &get);
        override_string(&mut self.mysql.charset, "MYSQL_CHARSET", &get);
        Ok(())
    }
}

fn override_string(field: &mut String, name: &str, get: &impl Fn(&str) -> Option<String>) {
    if let Some(value) = get(name) {
        if !value.is_empty() {
            *field = value;
        }
    }
}

fn override_port(
    field: &mut u16,
    name: &str,
    get: &impl Fn(&str) -> Option<String>,
) -> Result<()> {
    if let Some(value) = get(name) {
        if value.is_empty() {
            return Ok(());
        }
        *field = value
            .parse()
            .map_err(|_| MigrateError::Config(format!("{} must be a port number: {:?}", name, value)))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const MINIMAL_YAML: &str = r#"
firebird:
  database: /var/db/app.fdb
  password: masterkey
mysql:
  database: app
  password: secret
"#;

    #[test]
    fn test_from_yaml_applies_defaults() {
        let config = Config::from_yaml(MINIMAL_YAML).unwrap();
        assert_eq!(config.firebird.host, "localhost");
        assert_eq!(config.firebird.port, 3050);
        assert_eq!(config.firebird.user, "SYSDBA");
        assert_eq!(config.firebird.charset, "UTF8");
        assert_eq!(config.mysql.port, 3306);
        assert_eq!(config.mysql.user, "root");
        assert_eq!(config.mysql.charset, "utf8mb4");
        assert_eq!(config.migration.batch_size, 1000);
        assert!(config.migration.transfer_structure);
        assert!(config.migration.transfer_data);
        assert!(!config.migration.drop_tables);
        assert!(config.migration.decimal_as_text);
    }

    #[test]
    fn test_from_yaml_full() {
        let yaml = r#"
firebird:
  host: fb.example.com
  port: 3051
  database: /data/erp.fdb
  user: reader
  password: pw
  charset: WIN1251
mysql:
  host: db.example.com
  port: 3307
  database: erp
  user: loader
  password: pw2
migration:
  batch_size: 250
  transfer_structure: false
  drop_tables: true
  decimal_as_text: false
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.firebird.host, "fb.example.com");
        assert_eq!(config.firebird.port, 3051);
        assert_eq!(config.firebird.charset, "WIN1251");
        assert_eq!(config.mysql.port, 3307);
        assert_eq!(config.migration.batch_size, 250);
        assert!(!config.migration.transfer_structure);
        assert!(config.migration.transfer_data);
        assert!(config.migration.drop_tables);
        assert!(!config.migration.decimal_as_text);
    }

    #[test]
    fn test_from_yaml_rejects_invalid() {
        assert!(Config::from_yaml("firebird: [not, a, map]").is_err());
        // Valid YAML, missing required databases.
        assert!(Config::from_yaml("migration:\n  batch_size: 10").is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load("/nonexistent/config.yaml").unwrap_err();
        assert!(matches!(err, MigrateError::Io(_)));
    }

    #[test]
    fn test_env_overrides_win_over_file() {
        let mut config: Config = serde_yaml::from_str(MINIMAL_YAML).unwrap();
        let env: HashMap<&str, &str> = HashMap::from([
            ("FIREBIRD_HOST", "fb-prod"),
            ("FIREBIRD_PORT", "3052"),
            ("MYSQL_DATABASE", "app_prod"),
            ("MYSQL_PASSWORD", ""),
        ]);
        config
            .apply_overrides_from(|name| env.get(name).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.firebird.host, "fb-prod");
        assert_eq!(config.firebird.port, 3052);
        assert_eq!(config.mysql.database, "app_prod");
        // Empty variables do not clobber file values.
        assert_eq!(config.mysql.password, "secret");
        // Untouched fields keep their file/default values.
        assert_eq!(config.firebird.database, "/var/db/app.fdb");
        assert_eq!(config.mysql.user, "root");
    }

    #[test]
    fn test_env_rejects_bad_port() {
        let mut config: Config = serde_yaml::from_str(MINIMAL_YAML).unwrap();
        let err = config
            .apply_overrides_from(|name| (name == "MYSQL_PORT").then(|| "not-a-port".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("MYSQL_PORT"));
    }
}
