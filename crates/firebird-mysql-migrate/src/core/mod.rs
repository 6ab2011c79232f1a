//! Core abstractions shared by the engine and the drivers.
//!
//! - [`schema`]: column/table/constraint metadata types
//! - [`value`]: positional row values and batches
//! - [`identifier`]: identifier validation and per-engine quoting
//! - [`traits`]: collaborator contracts the drivers implement
//!
//! The engine is written entirely against these types and traits, so its
//! logic can be exercised with in-memory fakes and the drivers stay thin
//! wrappers over their client libraries.

pub mod identifier;
pub mod schema;
pub mod traits;
pub mod value;

// Re-export commonly used types for convenience
pub use schema::{ColumnDescriptor, ForeignKeyDescriptor, SourceType, TableDescriptor};
pub use traits::{ColumnDefinition, RowCursor, SourceIntrospector, TargetWriter};
pub use value::{Batch, Row, RowValue};
