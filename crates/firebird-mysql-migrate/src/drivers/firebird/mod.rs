//! Firebird source driver.
//!
//! Implements [`SourceIntrospector`] over a single blocking connection from
//! the pure-Rust `rsfbclient` wire protocol, so no native `fbclient`
//! library is needed. Schema metadata comes from the `RDB$` system tables;
//! names there are space-padded `CHAR` columns and are trimmed on the way
//! out. Dropping the value closes the connection.

use rsfbclient::{charset, Charset, FbError, Queryable, SimpleConnection, SqlType};
use tracing::{debug, info};

use crate::config::FirebirdConfig;
use crate::core::identifier::quote_firebird;
use crate::core::schema::{ColumnDescriptor, ForeignKeyDescriptor, SourceType};
use crate::core::traits::{RowCursor, SourceIntrospector};
use crate::core::value::{Row, RowValue};
use crate::error::{MigrateError, Result};

/// `RDB$FIELD_TYPE` of Firebird's DATE columns. The wire protocol delivers
/// their values as midnight timestamps; the cursor narrows them back to
/// dates so they render as `YYYY-MM-DD`.
const DATE_TYPE_CODE: i16 = 12;

const LIST_TABLES_SQL: &str = "\
    SELECT RDB$RELATION_NAME \
    FROM RDB$RELATIONS \
    WHERE RDB$SYSTEM_FLAG = 0 AND RDB$VIEW_BLR IS NULL \
    ORDER BY RDB$RELATION_NAME";

const COLUMNS_SQL: &str = "\
    SELECT \
        r.RDB$FIELD_NAME, \
        f.RDB$FIELD_TYPE, \
        f.RDB$FIELD_LENGTH, \
        f.RDB$FIELD_PRECISION, \
        f.RDB$FIELD_SCALE, \
        r.RDB$NULL_FLAG \
    FROM RDB$RELATION_FIELDS r \
    JOIN RDB$FIELDS f ON r.RDB$FIELD_SOURCE = f.RDB$FIELD_NAME \
    WHERE TRIM(r.RDB$RELATION_NAME) = ? \
    ORDER BY r.RDB$FIELD_POSITION";

const PRIMARY_KEY_SQL: &str = "\
    SELECT s.RDB$FIELD_NAME \
    FROM RDB$INDEX_SEGMENTS s \
    JOIN RDB$INDICES i ON s.RDB$INDEX_NAME = i.RDB$INDEX_NAME \
    JOIN RDB$RELATION_CONSTRAINTS c ON i.RDB$INDEX_NAME = c.RDB$INDEX_NAME \
    WHERE TRIM(c.RDB$RELATION_NAME) = ? \
      AND c.RDB$CONSTRAINT_TYPE = 'PRIMARY KEY' \
    ORDER BY s.RDB$FIELD_POSITION";

/// Referenced table and column are resolved through the index the foreign
/// key constraint is paired with (`RDB$FOREIGN_KEY` names the referenced
/// index), matching segments by position for multi-column keys.
const FOREIGN_KEYS_SQL: &str = "\
    SELECT \
        c.RDB$CONSTRAINT_NAME, \
        s.RDB$FIELD_NAME, \
        ri.RDB$RELATION_NAME, \
        rs.RDB$FIELD_NAME \
    FROM RDB$RELATION_CONSTRAINTS c \
    JOIN RDB$INDICES i ON i.RDB$INDEX_NAME = c.RDB$INDEX_NAME \
    JOIN RDB$INDICES ri ON ri.RDB$INDEX_NAME = i.RDB$FOREIGN_KEY \
    JOIN RDB$INDEX_SEGMENTS s ON s.RDB$INDEX_NAME = i.RDB$INDEX_NAME \
    JOIN RDB$INDEX_SEGMENTS rs ON rs.RDB$INDEX_NAME = ri.RDB$INDEX_NAME \
        AND rs.RDB$FIELD_POSITION = s.RDB$FIELD_POSITION \
    WHERE TRIM(c.RDB$RELATION_NAME) = ? \
      AND c.RDB$CONSTRAINT_TYPE = 'FOREIGN KEY' \
    ORDER BY c.RDB$CONSTRAINT_NAME, s.RDB$FIELD_POSITION";

/// Firebird source introspector over one owned connection.
pub struct FirebirdSource {
    conn: SimpleConnection,
}

impl FirebirdSource {
    /// Connect to the Firebird server over the wire protocol.
    pub fn connect(config: &FirebirdConfig) -> Result<Self> {
        let charset = charset_from_name(&config.charset)?;

        let conn = rsfbclient::builder_pure_rust()
            .host(&config.host)
            .port(config.port)
            .db_name(&config.database)
            .user(&config.user)
            .pass(&config.password)
            .charset(charset)
            .connect()
            .map_err(|e| {
                MigrateError::connection(e.to_string(), "connecting to the Firebird source")
            })?;

        let mut conn: SimpleConnection = conn.into();

        // RDB$DATABASE is the one-row system table; Firebird has no
        // FROM-less SELECT.
        let _: Vec<(i32,)> = conn.query("SELECT 1 FROM RDB$DATABASE", ()).map_err(|e| {
            MigrateError::connection(e.to_string(), "testing the Firebird source connection")
        })?;

        info!(
            "Connected to Firebird source: {}:{} ({})",
            config.host, config.port, config.database
        );

        Ok(Self { conn })
    }
}

impl SourceIntrospector for FirebirdSource {
    fn list_tables(&mut self) -> Result<Vec<String>> {
        let rows: Vec<(String,)> = self
            .conn
            .query(LIST_TABLES_SQL, ())
            .map_err(|e| MigrateError::introspection("source table list", e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|(name,)| name.trim().to_string())
            .collect())
    }

    fn get_columns(&mut self, table: &str) -> Result<Vec<ColumnDescriptor>> {
        type ColumnRow = (String, i16, i32, Option<i32>, Option<i32>, Option<i16>);

        let rows: Vec<ColumnRow> = self
            .conn
            .query(COLUMNS_SQL, (table,))
            .map_err(|e| MigrateError::introspection(table, e.to_string()))?;

        let columns: Vec<ColumnDescriptor> = rows
            .into_iter()
            .map(
                |(name, type_code, length, precision, scale, null_flag)| ColumnDescriptor {
                    name: name.trim().to_string(),
                    source_type: SourceType::from_code(type_code),
                    type_code,
                    length,
                    precision,
                    scale,
                    nullable: null_flag != Some(1),
                },
            )
            .collect();

        debug!("Discovered {} columns for {}", columns.len(), table);
        Ok(columns)
    }

    fn get_primary_key(&mut self, table: &str) -> Result<Vec<String>> {
        let rows: Vec<(String,)> = self
            .conn
            .query(PRIMARY_KEY_SQL, (table,))
            .map_err(|e| MigrateError::introspection(table, e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|(name,)| name.trim().to_string())
            .collect())
    }

    fn get_foreign_keys(&mut self, table: &str) -> Result<Vec<ForeignKeyDescriptor>> {
        let rows: Vec<(String, String, String, String)> = self
            .conn
            .query(FOREIGN_KEYS_SQL, (table,))
            .map_err(|e| MigrateError::introspection(table, e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|(name, column, ref_table, ref_column)| ForeignKeyDescriptor {
                name: name.trim().to_string(),
                column: column.trim().to_string(),
                ref_table: ref_table.trim().to_string(),
                ref_column: ref_column.trim().to_string(),
            })
            .collect())
    }

    fn get_row_count(&mut self, table: &str) -> Result<u64> {
        let sql = format!("SELECT COUNT(*) FROM {}", quote_firebird(table)?);
        let rows: Vec<(i64,)> = self
            .conn
            .query(&sql, ())
            .map_err(|e| MigrateError::introspection(table, e.to_string()))?;

        let count = rows.first().map(|(count,)| *count).unwrap_or(0);
        Ok(count.max(0) as u64)
    }

    fn stream_rows<'a>(
        &'a mut self,
        table: &str,
        page_size: usize,
    ) -> Result<Box<dyn RowCursor + 'a>> {
        // Per-column type codes drive the date narrowing below; fetched
        // before the select so the cursor owns them.
        let type_codes: Vec<i16> = self
            .get_columns(table)?
            .into_iter()
            .map(|c| c.type_code)
            .collect();

        let sql = format!("SELECT * FROM {}", quote_firebird(table)?);
        let rows = self
            .conn
            .query_iter(&sql, ())
            .map_err(|e| MigrateError::introspection(table, e.to_string()))?;

        Ok(Box::new(FirebirdRowCursor {
            rows: Box::new(rows),
            type_codes,
            page_size: page_size.max(1),
            table: table.to_string(),
            exhausted: false,
        }))
    }
}

/// Cursor over one `SELECT *`, pulling `page_size` rows per call while the
/// connection stays exclusively borrowed.
struct FirebirdRowCursor<'a> {
    rows: Box<dyn Iterator<Item = std::result::Result<rsfbclient::Row, FbError>> + 'a>,
    type_codes: Vec<i16>,
    page_size: usize,
    table: String,
    exhausted: bool,
}

impl RowCursor for FirebirdRowCursor<'_> {
    fn next_page(&mut self) -> Result<Vec<Row>> {
        if self.exhausted {
            return Ok(Vec::new());
        }

        let mut page = Vec::with_capacity(self.page_size);
        while page.len() < self.page_size {
            match self.rows.next() {
                Some(Ok(row)) => page.push(decode_row(row, &self.type_codes)),
                Some(Err(e)) => {
                    return Err(MigrateError::connection(
                        e.to_string(),
                        format!("fetching rows from {}", self.table),
                    ));
                }
                None => {
                    self.exhausted = true;
                    break;
                }
            }
        }
        Ok(page)
    }
}

fn decode_row(row: rsfbclient::Row, type_codes: &[i16]) -> Row {
    row.cols
        .into_iter()
        .zip(type_codes)
        .map(|(col, code)| sql_type_to_row_value(col.value, *code))
        .collect()
}

/// Narrow one wire value to a row value using the column's declared type.
fn sql_type_to_row_value(value: SqlType, type_code: i16) -> RowValue {
    match value {
        SqlType::Null => RowValue::Null,
        SqlType::Boolean(b) => RowValue::Boolean(b),
        SqlType::Integer(i) => RowValue::Integer(i),
        SqlType::Floating(f) => RowValue::Float(f),
        SqlType::Text(s) => RowValue::Text(s),
        SqlType::Binary(b) => RowValue::Bytes(b),
        SqlType::Timestamp(ts) => {
            if type_code == DATE_TYPE_CODE {
                RowValue::Date(ts.date())
            } else {
                RowValue::Timestamp(ts)
            }
        }
    }
}

/// Resolve a configured charset name to the wire protocol charset.
fn charset_from_name(name: &str) -> Result<Charset> {
    let normalized = name.trim().to_uppercase().replace('-', "");
    match normalized.as_str() {
        "UTF8" => Ok(charset::UTF_8),
        "ISO8859_1" | "ISO88591" | "LATIN1" => Ok(charset::ISO_8859_1),
        "WIN1251" => Ok(charset::WIN_1251),
        "WIN1252" => Ok(charset::WIN_1252),
        "ASCII" => Ok(charset::ASCII),
        _ => Err(MigrateError::Config(format!(
            "unsupported firebird.charset: {:?} (expected UTF8, ISO8859_1, WIN1251, WIN1252 or ASCII)",
            name
        ))),
    }
}
