//! Configuration type definitions.
//!
//! Every connection field can come from three places, in precedence order:
//! environment variable, config file value, built-in default. The structs
//! here carry the file values and defaults; `Config::apply_env_overrides`
//! layers the environment on top.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Source database configuration (Firebird).
    #[serde(default)]
    pub firebird: FirebirdConfig,

    /// Target database configuration (MySQL).
    #[serde(default)]
    pub mysql: MysqlConfig,

    /// Migration behavior configuration.
    #[serde(default)]
    pub migration: MigrationConfig,
}

/// Source database (Firebird) configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct FirebirdConfig {
    /// Database host.
    #[serde(default = "default_host")]
    pub host: String,

    /// Database port (default: 3050).
    #[serde(default = "default_firebird_port")]
    pub port: u16,

    /// Path to the database file on the server, or an alias.
    #[serde(default)]
    pub database: String,

    /// Username (default: SYSDBA).
    #[serde(default = "default_firebird_user")]
    pub user: String,

    /// Password. Never serialized back out.
    #[serde(default, skip_serializing)]
    pub password: String,

    /// Connection charset (default: UTF8).
    #[serde(default = "default_firebird_charset")]
    pub charset: String,
}

impl Default for FirebirdConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_firebird_port(),
            database: String::new(),
            user: default_firebird_user(),
            password: String::new(),
            charset: default_firebird_charset(),
        }
    }
}

impl fmt::Debug for FirebirdConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FirebirdConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("charset", &self.charset)
            .finish()
    }
}

/// Target database (MySQL) configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct MysqlConfig {
    /// Database host.
    #[serde(default = "default_host")]
    pub host: String,

    /// Database port (default: 3306).
    #[serde(default = "default_mysql_port")]
    pub port: u16,

    /// Database name. Created on the target if absent.
    #[serde(default)]
    pub database: String,

    /// Username (default: root).
    #[serde(default = "default_mysql_user")]
    pub user: String,

    /// Password. Never serialized back out. May be empty.
    #[serde(default, skip_serializing)]
    pub password: String,

    /// Connection charset (default: utf8mb4).
    #[serde(default = "default_mysql_charset")]
    pub charset: String,
}

impl Default for MysqlConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_mysql_port(),
            database: String::new(),
            user: default_mysql_user(),
            password: String::new(),
            charset: default_mysql_charset(),
        }
    }
}

impl fmt::Debug for MysqlConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MysqlConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("charset", &self.charset)
            .finish()
    }
}

/// Migration behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationConfig {
    /// Rows per page fetched from the source and per bulk insert into the
    /// target (default: 1000, must be positive).
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Whether to create target tables (default: true).
    #[serde(default = "default_true")]
    pub transfer_structure: bool,

    /// Whether to stream row data (default: true).
    #[serde(default = "default_true")]
    pub transfer_data: bool,

    /// Drop every table in the target database before migrating
    /// (default: false).
    #[serde(default)]
    pub drop_tables: bool,

    /// Map fixed-point source columns to fixed-width text instead of
    /// DECIMAL (default: true; see `typemap`).
    #[serde(default = "default_true")]
    pub decimal_as_text: bool,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            transfer_structure: true,
            transfer_data: true,
            drop_tables: false,
            decimal_as_text: true,
        }
    }
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_firebird_port() -> u16 {
    3050
}

fn default_firebird_user() -> String {
    "SYSDBA".to_string()
}

fn default_firebird_charset() -> String {
    "UTF8".to_string()
}

fn default_mysql_port() -> u16 {
    3306
}

fn default_mysql_user() -> String {
    "root".to_string()
}

fn default_mysql_charset() -> String {
    "utf8mb4".to_string()
}

fn default_batch_size() -> usize {
    1000
}

fn default_true() -> bool {
    true
}
