//! # firebird-mysql-migrate
//!
//! Firebird to MySQL migration library.
//!
//! This library copies a relational schema and its data from a Firebird
//! database into MySQL: schema discovery, type mapping, target table
//! creation and batched, converted row transfer. Everything runs
//! synchronously over one source and one target connection, with:
//!
//! - **Type mapping** from Firebird field types to MySQL column types,
//!   including the overridable fixed-point-as-text policy
//! - **Row conversion** that renders temporal values as text and degrades
//!   undecodable blob content instead of failing
//! - **Batched loading** via multi-row `INSERT`, one commit per table
//! - **Optional destructive reset** of the whole target database
//! - **Lowercase folding** of table, column and key names
//!
//! ## Example
//!
//! ```rust,no_run
//! use firebird_mysql_migrate::{Config, FirebirdSource, MigrateOptions, Migrator, MysqlTarget};
//!
//! fn main() -> firebird_mysql_migrate::Result<()> {
//!     let config = Config::load("config.yaml")?;
//!     let source = FirebirdSource::connect(&config.firebird)?;
//!     let target = MysqlTarget::connect(&config.mysql)?;
//!     let options = MigrateOptions {
//!         database: config.mysql.database.clone(),
//!         batch_size: config.migration.batch_size,
//!         ..MigrateOptions::default()
//!     };
//!     let report = Migrator::new(source, target, options).run()?;
//!     println!("Migrated {} rows", report.rows_transferred);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod convert;
pub mod core;
pub mod drivers;
pub mod error;
pub mod migrator;
pub mod typemap;

// Re-exports for convenient access
pub use config::{Config, FirebirdConfig, MigrationConfig, MysqlConfig};
pub use self::core::{
    ColumnDefinition, ColumnDescriptor, ForeignKeyDescriptor, Row, RowCursor, RowValue,
    SourceIntrospector, SourceType, TableDescriptor, TargetWriter,
};
pub use drivers::{FirebirdSource, MysqlTarget};
pub use error::{MigrateError, Result};
pub use migrator::{MigrateOptions, MigrationReport, Migrator, TableReport};
pub use typemap::TypeMapper;
