//! firebird-mysql-migrate CLI - Firebird to MySQL database migration.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use firebird_mysql_migrate::{
    Config, FirebirdSource, MigrateError, MigrateOptions, Migrator, MysqlTarget,
};
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "firebird-mysql-migrate")]
#[command(about = "Firebird to MySQL database migration")]
#[command(version)]
struct Cli {
    /// Path to YAML configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Comma-separated list of tables to migrate (default: all tables)
    #[arg(short, long)]
    tables: Option<String>,

    /// Migrate structure only (no data)
    #[arg(long, conflicts_with = "data_only")]
    structure_only: bool,

    /// Migrate data only (no structure)
    #[arg(long)]
    data_only: bool,

    /// Create tables and columns in lowercase
    #[arg(long)]
    lowercase: bool,

    /// Drop every table in the target database before migrating
    #[arg(long)]
    drop_tables: bool,

    /// Output the final report as JSON to stdout
    #[arg(long)]
    output_json: bool,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "info")]
    verbosity: String,
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), MigrateError> {
    let cli = Cli::parse();

    setup_logging(&cli.verbosity, &cli.log_format);

    let config = Config::load(&cli.config)?;
    info!("Loaded configuration from {:?}", cli.config);

    let interrupt = Arc::new(AtomicBool::new(false));
    setup_interrupt_handler(Arc::clone(&interrupt))?;

    // Comma-separated list, entries trimmed; empty entries dropped.
    let tables = cli.tables.as_deref().map(|list| {
        list.split(',')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
    });

    let options = MigrateOptions {
        database: config.mysql.database.clone(),
        tables,
        batch_size: config.migration.batch_size,
        transfer_structure: config.migration.transfer_structure && !cli.data_only,
        transfer_data: config.migration.transfer_data && !cli.structure_only,
        drop_tables: config.migration.drop_tables || cli.drop_tables,
        lowercase: cli.lowercase,
        decimal_as_text: config.migration.decimal_as_text,
    };

    let source = FirebirdSource::connect(&config.firebird)?;
    let target = MysqlTarget::connect(&config.mysql)?;

    let report = Migrator::new(source, target, options)
        .with_interrupt_flag(interrupt)
        .run()?;

    if cli.output_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("\nMigration completed!");
        println!("  Duration: {:.2}s", report.duration_seconds);
        println!("  Tables: {}", report.tables_processed);
        println!("  Rows: {}", report.rows_transferred);
        println!("  Throughput: {} rows/sec", report.rows_per_second);
    }

    Ok(())
}

fn setup_logging(verbosity: &str, format: &str) {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false);

    if format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

/// Install the SIGINT handler. The first Ctrl-C sets the shared flag; the
/// engine notices it between pages and between tables and aborts with the
/// connections still released cleanly.
fn setup_interrupt_handler(interrupt: Arc<AtomicBool>) -> Result<(), MigrateError> {
    ctrlc::set_handler(move || {
        eprintln!("\nInterrupt received, stopping after the current page...");
        interrupt.store(true, Ordering::Relaxed);
    })
    .map_err(|e| MigrateError::Config(format!("Failed to install interrupt handler: {}", e)))
}
