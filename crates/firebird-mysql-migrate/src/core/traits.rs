//! Collaborator contracts between the migration engine and the two
//! database drivers.
//!
//! The engine never talks to a client library directly; it drives a
//! [`SourceIntrospector`] and a [`TargetWriter`]. Both are synchronous and
//! take `&mut self` because each wraps a single exclusively-owned blocking
//! connection. Connection acquisition is construction and release is `Drop`,
//! so a run cannot leak a connection on any exit path.

use crate::error::Result;

use super::schema::{ColumnDescriptor, ForeignKeyDescriptor, TableDescriptor};
use super::value::Row;

/// A column definition ready for target DDL: the (possibly folded) name and
/// the mapped target type string.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    /// Column name.
    pub name: String,

    /// Target type string (e.g. "VARCHAR(120)", "BIGINT").
    pub sql_type: String,
}

/// Forward-only, single-pass cursor over one table's rows.
///
/// Pages are fetched on demand so only one page of raw rows is resident at
/// a time. An empty page means the cursor is exhausted; it is not resumable
/// mid-consumption.
pub trait RowCursor {
    /// Fetch the next page of rows, at most the page size requested when
    /// the cursor was opened.
    fn next_page(&mut self) -> Result<Vec<Row>>;
}

/// Schema discovery and row streaming from the source database.
pub trait SourceIntrospector {
    /// List user table names in the source's reported enumeration order.
    fn list_tables(&mut self) -> Result<Vec<String>>;

    /// Fetch column metadata for a table, in declaration order.
    fn get_columns(&mut self, table: &str) -> Result<Vec<ColumnDescriptor>>;

    /// Fetch primary key column names in key order; empty when the table
    /// has no primary key.
    fn get_primary_key(&mut self, table: &str) -> Result<Vec<String>>;

    /// Fetch foreign key metadata. Collected into the table descriptor but
    /// never acted on.
    fn get_foreign_keys(&mut self, table: &str) -> Result<Vec<ForeignKeyDescriptor>>;

    /// Count the rows in a table.
    fn get_row_count(&mut self, table: &str) -> Result<u64>;

    /// Open a forward-only cursor over all rows of a table, delivered in
    /// pages of at most `page_size` rows.
    fn stream_rows<'a>(
        &'a mut self,
        table: &str,
        page_size: usize,
    ) -> Result<Box<dyn RowCursor + 'a>>;

    /// Assemble the full descriptor for one table.
    ///
    /// Template method over the individual metadata calls; drivers can
    /// override if they can fetch everything in fewer round trips.
    fn describe_table(&mut self, table: &str) -> Result<TableDescriptor> {
        Ok(TableDescriptor {
            name: table.to_string(),
            columns: self.get_columns(table)?,
            primary_key: self.get_primary_key(table)?,
            foreign_keys: self.get_foreign_keys(table)?,
        })
    }
}

/// Schema creation and bulk loading into the target database.
pub trait TargetWriter {
    // ===== Database operations =====

    /// Create the target database if it does not exist.
    fn create_database_if_absent(&mut self, name: &str) -> Result<()>;

    /// Select the database all subsequent statements run against.
    fn select_database(&mut self, name: &str) -> Result<()>;

    // ===== Schema operations =====

    /// List table names in the selected database.
    fn list_tables(&mut self) -> Result<Vec<String>>;

    /// Check if a table exists.
    fn table_exists(&mut self, table: &str) -> Result<bool>;

    /// Drop a table if it exists.
    fn drop_table(&mut self, table: &str) -> Result<()>;

    /// Drop every table in the selected database, with referential checks
    /// disabled for the duration. Returns the number of tables dropped.
    fn drop_all_tables(&mut self) -> Result<usize>;

    /// Create a table from ordered column definitions plus an optional
    /// primary key clause.
    fn create_table(
        &mut self,
        table: &str,
        columns: &[ColumnDefinition],
        primary_key: &[String],
    ) -> Result<()>;

    // ===== Data operations =====

    /// Load a batch of rows with one multi-row insert.
    fn bulk_insert(&mut self, table: &str, columns: &[String], rows: &[Row]) -> Result<()>;

    /// Commit the open transaction.
    fn commit(&mut self) -> Result<()>;

    /// Roll back the open transaction.
    fn rollback(&mut self) -> Result<()>;
}
