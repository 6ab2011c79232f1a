//! MySQL target driver.
//!
//! Implements [`TargetWriter`] over a single blocking connection from the
//! `mysql` crate. The connection runs with autocommit off; the engine
//! decides when a table's inserts are committed. Dropping the value closes
//! the connection.

use mysql::prelude::*;
use mysql::{Conn, OptsBuilder, Value};
use tracing::{debug, info, warn};

use crate::config::MysqlConfig;
use crate::convert::{DATE_FORMAT, TIMESTAMP_FORMAT};
use crate::core::identifier::quote_mysql;
use crate::core::traits::{ColumnDefinition, TargetWriter};
use crate::core::value::{Row, RowValue};
use crate::error::{MigrateError, Result};

/// MySQL prepared statements accept at most this many placeholders.
const MYSQL_MAX_PLACEHOLDERS: usize = 65_535;

/// MySQL target writer over one owned connection.
pub struct MysqlTarget {
    conn: Conn,
}

impl MysqlTarget {
    /// Connect to the MySQL server.
    ///
    /// No database is selected yet: the engine creates and selects the
    /// target database during its run preamble, so the configured database
    /// does not have to exist.
    pub fn connect(config: &MysqlConfig) -> Result<Self> {
        if !is_valid_charset(&config.charset) {
            return Err(MigrateError::Config(format!(
                "mysql.charset is not a valid charset name: {:?}",
                config.charset
            )));
        }

        let opts = OptsBuilder::new()
            .ip_or_hostname(Some(config.host.clone()))
            .tcp_port(config.port)
            .user(Some(config.user.clone()))
            .pass(Some(config.password.clone()))
            // Autocommit stays off for the whole run; commits are explicit
            // and issued once per table.
            .init(vec![
                format!("SET NAMES {}", config.charset),
                "SET autocommit = 0".to_string(),
            ]);

        let mut conn = Conn::new(opts).map_err(|e| {
            MigrateError::connection(e.to_string(), "connecting to the MySQL target")
        })?;

        conn.query_drop("SELECT 1").map_err(|e| {
            MigrateError::connection(e.to_string(), "testing the MySQL target connection")
        })?;

        info!(
            "Connected to MySQL target: {}:{}",
            config.host, config.port
        );

        Ok(Self { conn })
    }
}

impl TargetWriter for MysqlTarget {
    fn create_database_if_absent(&mut self, name: &str) -> Result<()> {
        let sql = format!(
            "CREATE DATABASE IF NOT EXISTS {} CHARACTER SET utf8mb4 COLLATE utf8mb4_unicode_ci",
            quote_mysql(name)?
        );
        self.conn
            .query_drop(&sql)
            .map_err(|e| MigrateError::schema_creation(name, e.to_string()))?;
        debug!("Ensured database '{}' exists", name);
        Ok(())
    }

    fn select_database(&mut self, name: &str) -> Result<()> {
        let sql = format!("USE {}", quote_mysql(name)?);
        self.conn
            .query_drop(&sql)
            .map_err(|e| MigrateError::connection(e.to_string(), "selecting the target database"))?;
        Ok(())
    }

    fn list_tables(&mut self) -> Result<Vec<String>> {
        self.conn
            .query("SHOW TABLES")
            .map_err(|e| MigrateError::introspection("target table list", e.to_string()))
    }

    fn table_exists(&mut self, table: &str) -> Result<bool> {
        let count: Option<u64> = self
            .conn
            .exec_first(
                "SELECT COUNT(*) FROM information_schema.TABLES \
                 WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ?",
                (table,),
            )
            .map_err(|e| MigrateError::introspection(table, e.to_string()))?;
        Ok(count.unwrap_or(0) > 0)
    }

    fn drop_table(&mut self, table: &str) -> Result<()> {
        let sql = format!("DROP TABLE IF EXISTS {}", quote_mysql(table)?);
        self.conn
            .query_drop(&sql)
            .map_err(|e| MigrateError::schema_creation(table, e.to_string()))?;
        debug!("Dropped table {}", table);
        Ok(())
    }

    fn drop_all_tables(&mut self) -> Result<usize> {
        let tables = self.list_tables()?;
        if tables.is_empty() {
            return Ok(0);
        }

        // Referential checks stay off for the whole sweep so drop order
        // does not matter. The setting is session-scoped.
        self.conn
            .query_drop("SET FOREIGN_KEY_CHECKS = 0")
            .map_err(|e| MigrateError::schema_creation("*", e.to_string()))?;

        for table in &tables {
            let sql = format!("DROP TABLE IF EXISTS {}", quote_mysql(table)?);
            self.conn
                .query_drop(&sql)
                .map_err(|e| MigrateError::schema_creation(table, e.to_string()))?;
        }

        self.conn
            .query_drop("SET FOREIGN_KEY_CHECKS = 1")
            .map_err(|e| MigrateError::schema_creation("*", e.to_string()))?;

        warn!("Dropped all {} tables in the target database", tables.len());
        Ok(tables.len())
    }

    fn create_table(
        &mut self,
        table: &str,
        columns: &[ColumnDefinition],
        primary_key: &[String],
    ) -> Result<()> {
        let ddl = build_create_table_ddl(table, columns, primary_key)?;
        self.conn
            .query_drop(&ddl)
            .map_err(|e| MigrateError::schema_creation(table, e.to_string()))?;
        debug!("Created table {} ({} columns)", table, columns.len());
        Ok(())
    }

    fn bulk_insert(&mut self, table: &str, columns: &[String], rows: &[Row]) -> Result<()> {
        if rows.is_empty() || columns.is_empty() {
            return Ok(());
        }

        let table_quoted = quote_mysql(table)?;
        let col_list = columns
            .iter()
            .map(|c| quote_mysql(c))
            .collect::<Result<Vec<_>>>()?
            .join(", ");

        // One multi-row INSERT per chunk, splitting only when the row
        // count would exceed the server's placeholder limit.
        let num_cols = columns.len();
        for chunk in rows.chunks(max_rows_per_chunk(num_cols)) {
            let placeholders_per_row = format!("({})", vec!["?"; num_cols].join(", "));
            let all_placeholders: Vec<String> =
                std::iter::repeat_n(placeholders_per_row, chunk.len()).collect();

            let sql = format!(
                "INSERT INTO {} ({}) VALUES {}",
                table_quoted,
                col_list,
                all_placeholders.join(", ")
            );

            let params: Vec<Value> = chunk
                .iter()
                .flat_map(|row| row.iter().map(row_value_to_mysql))
                .collect();

            self.conn
                .exec_drop(&sql, params)
                .map_err(|e| MigrateError::insert(table, format!("INSERT batch: {}", e)))?;
        }

        debug!("Wrote {} rows to {}", rows.len(), table);
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        self.conn
            .query_drop("COMMIT")
            .map_err(|e| MigrateError::connection(e.to_string(), "committing on the MySQL target"))
    }

    fn rollback(&mut self) -> Result<()> {
        self.conn
            .query_drop("ROLLBACK")
            .map_err(|e| {
                MigrateError::connection(e.to_string(), "rolling back on the MySQL target")
            })
    }
}

/// Generate the CREATE TABLE statement: column definitions in source order,
/// then a primary key clause when one exists. Nullability is deliberately
/// not emitted.
fn build_create_table_ddl(
    table: &str,
    columns: &[ColumnDefinition],
    primary_key: &[String],
) -> Result<String> {
    let mut col_defs = columns
        .iter()
        .map(|c| Ok(format!("{} {}", quote_mysql(&c.name)?, c.sql_type)))
        .collect::<Result<Vec<_>>>()?;

    if !primary_key.is_empty() {
        let pk_cols = primary_key
            .iter()
            .map(|c| quote_mysql(c))
            .collect::<Result<Vec<_>>>()?
            .join(", ");
        col_defs.push(format!("PRIMARY KEY ({})", pk_cols));
    }

    Ok(format!(
        "CREATE TABLE {} (\n    {}\n) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_ci",
        quote_mysql(table)?,
        col_defs.join(",\n    ")
    ))
}

/// Rows per INSERT chunk under the placeholder limit.
fn max_rows_per_chunk(num_cols: usize) -> usize {
    (MYSQL_MAX_PLACEHOLDERS / num_cols).max(1)
}

/// Convert a row value to a `mysql` parameter value.
///
/// Timestamps and dates are bound as their text form; the converter
/// normally renders them before insert, so these arms only matter for
/// callers binding unconverted rows.
fn row_value_to_mysql(value: &RowValue) -> Value {
    match value {
        RowValue::Null => Value::NULL,
        RowValue::Boolean(b) => Value::from(*b),
        RowValue::Integer(i) => Value::from(*i),
        RowValue::Float(f) => Value::from(*f),
        RowValue::Text(s) => Value::from(s.as_str()),
        RowValue::Bytes(b) => Value::from(b.as_slice()),
        RowValue::Timestamp(dt) => Value::from(dt.format(TIMESTAMP_FORMAT).to_string()),
        RowValue::Date(d) => Value::from(d.format(DATE_FORMAT).to_string()),
    }
}

/// Charset names are spliced into `SET NAMES`; keep them to the safe set.
fn is_valid_charset(charset: &str) -> bool {
    !charset.is_empty()
        && charset
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_create_table_ddl_with_pk() {
        let columns = vec![
            ColumnDefinition {
                name: "ID".to_string(),
                sql_type: "INTEGER".to_string(),
            },
            ColumnDefinition {
                name: "NAME".to_string(),
                sql_type: "VARCHAR(120)".to_string(),
            },
        ];
        let pk = vec!["ID".to_string()];

        let ddl = build_create_table_ddl("USERS", &columns, &pk).unwrap();
        assert!(ddl.starts_with("CREATE TABLE `USERS` ("));
        assert!(ddl.contains("`ID` INTEGER"));
        assert!(ddl.contains("`NAME` VARCHAR(120)"));
        assert!(ddl.contains("PRIMARY KEY (`ID`)"));
        assert!(ddl.contains("ENGINE=InnoDB DEFAULT CHARSET=utf8mb4"));
        // Nullability is never part of the definition.
        assert!(!ddl.contains("NOT NULL"));
    }

    #[test]
    fn test_create_table_ddl_without_pk() {
        let columns = vec![ColumnDefinition {
            name: "VAL".to_string(),
            sql_type: "TEXT".to_string(),
        }];
        let ddl = build_create_table_ddl("LOG", &columns, &[]).unwrap();
        assert!(!ddl.contains("PRIMARY KEY"));
    }

    #[test]
    fn test_create_table_ddl_composite_pk() {
        let columns = vec![
            ColumnDefinition {
                name: "A".to_string(),
                sql_type: "INTEGER".to_string(),
            },
            ColumnDefinition {
                name: "B".to_string(),
                sql_type: "INTEGER".to_string(),
            },
        ];
        let pk = vec!["A".to_string(), "B".to_string()];
        let ddl = build_create_table_ddl("PAIRS", &columns, &pk).unwrap();
        assert!(ddl.contains("PRIMARY KEY (`A`, `B`)"));
    }

    #[test]
    fn test_max_rows_per_chunk() {
        assert_eq!(max_rows_per_chunk(1), 65_535);
        assert_eq!(max_rows_per_chunk(2), 32_767);
        assert_eq!(max_rows_per_chunk(65), 1008);
        // Degenerate arity still makes progress.
        assert_eq!(max_rows_per_chunk(100_000), 1);
    }

    #[test]
    fn test_row_value_to_mysql() {
        assert_eq!(row_value_to_mysql(&RowValue::Null), Value::NULL);
        assert_eq!(
            row_value_to_mysql(&RowValue::Integer(7)),
            Value::from(7i64)
        );
        assert_eq!(
            row_value_to_mysql(&RowValue::Text("x".to_string())),
            Value::from("x")
        );
        assert_eq!(
            row_value_to_mysql(&RowValue::Bytes(vec![1, 2])),
            Value::from(vec![1u8, 2])
        );

        let ts = NaiveDate::from_ymd_opt(2023, 5, 1)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap();
        assert_eq!(
            row_value_to_mysql(&RowValue::Timestamp(ts)),
            Value::from("2023-05-01 12:30:00")
        );
        assert_eq!(
            row_value_to_mysql(&RowValue::Date(ts.date())),
            Value::from("2023-05-01")
        );
    }

    #[test]
    fn test_charset_validation() {
        assert!(is_valid_charset("utf8mb4"));
        assert!(is_valid_charset("latin1"));
        assert!(!is_valid_charset(""));
        assert!(!is_valid_charset("utf8mb4; DROP TABLE x"));
    }
}
