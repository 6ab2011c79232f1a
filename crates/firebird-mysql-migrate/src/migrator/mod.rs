//! Migration engine - main workflow coordinator.
//!
//! Walks every table through `Discover → MapSchema → CreateTarget →
//! StreamData → Committed`, strictly one table at a time over the two owned
//! connections. The engine is generic over the collaborator traits, so the
//! drivers can be swapped for in-memory fakes in tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::convert::convert_row;
use crate::core::schema::TableDescriptor;
use crate::core::traits::{SourceIntrospector, TargetWriter};
use crate::core::value::Batch;
use crate::error::{MigrateError, Result};
use crate::typemap::TypeMapper;

/// Run-wide settings, fixed at engine construction.
///
/// The destructive reset lives here as an explicit value rather than in any
/// ambient state: whoever constructs the engine decides, once.
#[derive(Debug, Clone)]
pub struct MigrateOptions {
    /// Target database name, created if absent and selected before any
    /// table is processed.
    pub database: String,

    /// Explicit table list, migrated in the given order. `None` migrates
    /// every table the source enumerates.
    pub tables: Option<Vec<String>>,

    /// Rows per page fetched from the source and per bulk insert into the
    /// target. One knob on purpose: a page that fills a batch is flushed
    /// before the next page is fetched.
    pub batch_size: usize,

    /// Create target tables.
    pub transfer_structure: bool,

    /// Stream table data.
    pub transfer_data: bool,

    /// Destructive reset: drop **every** table in the target database
    /// before migrating, not only tables in the migration set.
    pub drop_tables: bool,

    /// Fold table, column and primary-key names to lowercase.
    pub lowercase: bool,

    /// Map fixed-point source columns to fixed-width text instead of
    /// `DECIMAL`. See [`TypeMapper`].
    pub decimal_as_text: bool,
}

impl Default for MigrateOptions {
    fn default() -> Self {
        Self {
            database: String::new(),
            tables: None,
            batch_size: 1000,
            transfer_structure: true,
            transfer_data: true,
            drop_tables: false,
            lowercase: false,
            decimal_as_text: true,
        }
    }
}

/// Result of a migration run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationReport {
    /// Final status.
    pub status: String,

    /// When the migration started.
    pub started_at: DateTime<Utc>,

    /// When the migration completed.
    pub completed_at: DateTime<Utc>,

    /// Total duration in seconds.
    pub duration_seconds: f64,

    /// Tables processed.
    pub tables_processed: usize,

    /// Tables created in the target.
    pub tables_created: usize,

    /// Total rows transferred.
    pub rows_transferred: u64,

    /// Average throughput (rows/second).
    pub rows_per_second: u64,

    /// Per-table outcomes, in processing order.
    pub tables: Vec<TableReport>,
}

/// Outcome for one table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableReport {
    /// Target table name (folded when lowercase mode is on).
    pub name: String,

    /// Row count reported by the source before streaming.
    pub row_count: u64,

    /// Rows actually inserted.
    pub rows_transferred: u64,

    /// Bulk-insert calls issued.
    pub batches: usize,
}

/// Migration engine over one source and one target connection.
pub struct Migrator<S, T> {
    source: S,
    target: T,
    options: MigrateOptions,
    interrupt: Arc<AtomicBool>,
}

impl<S: SourceIntrospector, T: TargetWriter> Migrator<S, T> {
    /// Create an engine owning both collaborator connections.
    pub fn new(source: S, target: T, options: MigrateOptions) -> Self {
        Self {
            source,
            target,
            options,
            interrupt: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Install a shared interrupt flag, typically set from a SIGINT
    /// handler. The engine polls it between tables and between pages and
    /// aborts the run when it is set.
    pub fn with_interrupt_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupt = flag;
        self
    }

    /// Run the migration.
    ///
    /// Consumes the engine; both connections are released when this
    /// returns, on success and on failure alike.
    pub fn run(mut self) -> Result<MigrationReport> {
        let started_at = Utc::now();
        info!("Starting migration run");

        // Run preamble: the configured database may not exist yet.
        self.target.create_database_if_absent(&self.options.database)?;
        self.target.select_database(&self.options.database)?;

        if self.options.drop_tables {
            info!(
                "Destructive reset: dropping every table in '{}'",
                self.options.database
            );
            let dropped = self.target.drop_all_tables()?;
            info!("Dropped {} tables", dropped);
        }

        let tables = match &self.options.tables {
            Some(list) if !list.is_empty() => list.clone(),
            _ => self.source.list_tables()?,
        };
        info!("Found {} tables to migrate", tables.len());

        let mapper = TypeMapper::new(self.options.decimal_as_text);

        let mut table_reports = Vec::with_capacity(tables.len());
        for name in &tables {
            check_interrupt(&self.interrupt)?;

            match self.migrate_table(name, &mapper) {
                Ok(report) => table_reports.push(report),
                Err(e) => {
                    // Uncommitted inserts for the failed table must not
                    // land if the connection lingers past this run.
                    if let Err(rollback_err) = self.target.rollback() {
                        warn!("Rollback after failure also failed: {}", rollback_err);
                    }
                    return Err(e);
                }
            }
        }

        let completed_at = Utc::now();
        let duration = (completed_at - started_at).num_milliseconds() as f64 / 1000.0;
        let rows_transferred: u64 = table_reports.iter().map(|t| t.rows_transferred).sum();
        let rows_per_second = if duration > 0.0 {
            (rows_transferred as f64 / duration) as u64
        } else {
            0
        };

        let report = MigrationReport {
            status: "completed".to_string(),
            started_at,
            completed_at,
            duration_seconds: duration,
            tables_processed: table_reports.len(),
            tables_created: if self.options.transfer_structure {
                table_reports.len()
            } else {
                0
            },
            rows_transferred,
            rows_per_second,
            tables: table_reports,
        };

        info!(
            "Migration {}: {} tables, {} rows in {:.1}s ({} rows/s)",
            report.status,
            report.tables_processed,
            report.rows_transferred,
            report.duration_seconds,
            report.rows_per_second
        );

        Ok(report)
    }

    /// Walk one table through the state machine.
    fn migrate_table(&mut self, source_name: &str, mapper: &TypeMapper) -> Result<TableReport> {
        // Discover
        let descriptor = self.source.describe_table(source_name)?;

        // MapSchema
        let descriptor = if self.options.lowercase {
            descriptor.fold_lowercase()
        } else {
            descriptor
        };
        let target_name = descriptor.name.clone();
        info!("Processing table: {}", target_name);

        // CreateTarget
        if self.options.transfer_structure {
            let definitions: Vec<_> = descriptor
                .columns
                .iter()
                .map(|c| mapper.column_definition(c))
                .collect();

            if self.target.table_exists(&target_name)? {
                debug!("Table {} already exists in the target, dropping", target_name);
                self.target.drop_table(&target_name)?;
            }
            self.target
                .create_table(&target_name, &definitions, &descriptor.primary_key)?;
            info!(
                "Created table {} ({} columns)",
                target_name,
                definitions.len()
            );
        }

        // StreamData
        let mut row_count = 0;
        let mut rows_transferred = 0;
        let mut batches = 0;
        if self.options.transfer_data {
            row_count = self.source.get_row_count(source_name)?;
            if row_count == 0 {
                info!("Table {} is empty, skipping data transfer", target_name);
            } else {
                (rows_transferred, batches) = stream_table(
                    &mut self.source,
                    &mut self.target,
                    &descriptor,
                    source_name,
                    &target_name,
                    self.options.batch_size,
                    &self.interrupt,
                )?;
            }
        }

        Ok(TableReport {
            name: target_name,
            row_count,
            rows_transferred,
            batches,
        })
    }
}

/// Stream one table's rows: page in, convert, batch out, then one commit
/// after the final flush.
///
/// Free function over the two collaborators because the row cursor keeps
/// the source borrowed for the whole loop while inserts go to the target.
fn stream_table<S: SourceIntrospector, T: TargetWriter>(
    source: &mut S,
    target: &mut T,
    descriptor: &TableDescriptor,
    source_name: &str,
    target_name: &str,
    batch_size: usize,
    interrupt: &AtomicBool,
) -> Result<(u64, usize)> {
    let columns = descriptor.column_names();
    let batch_size = batch_size.max(1);

    let mut batch = Batch::new(batch_size);
    let mut rows_transferred: u64 = 0;
    let mut batches = 0;

    let mut cursor = source.stream_rows(source_name, batch_size)?;
    loop {
        check_interrupt(interrupt)?;

        let page = cursor.next_page()?;
        if page.is_empty() {
            break;
        }

        for row in page {
            batch.push(convert_row(row, &descriptor.columns));
            if batch.is_full() {
                let rows = batch.take();
                target.bulk_insert(target_name, &columns, &rows)?;
                rows_transferred += rows.len() as u64;
                batches += 1;
                debug!("{}: {} rows loaded", target_name, rows_transferred);
            }
        }
    }

    if !batch.is_empty() {
        let rows = batch.take();
        target.bulk_insert(target_name, &columns, &rows)?;
        rows_transferred += rows.len() as u64;
        batches += 1;
    }

    // One commit per table, after the last flush. A failure partway
    // through leaves earlier batches applied without this commit; the
    // mitigation is re-running with the destructive reset.
    target.commit()?;
    info!(
        "{}: {} rows transferred in {} batches",
        target_name, rows_transferred, batches
    );

    Ok((rows_transferred, batches))
}

fn check_interrupt(interrupt: &AtomicBool) -> Result<()> {
    if interrupt.load(Ordering::Relaxed) {
        Err(MigrateError::Interrupted)
    } else {
        Ok(())
    }
}
