//! Database driver implementations.
//!
//! Database-specific implementations of the core traits, one per side:
//!
//! - [`firebird`]: Firebird source ([`SourceIntrospector`](crate::core::SourceIntrospector))
//! - [`mysql`]: MySQL target ([`TargetWriter`](crate::core::TargetWriter))
//!
//! Each driver owns exactly one blocking connection, opened in its
//! constructor and closed when it is dropped. The engine is generic over
//! the traits, so tests substitute in-memory fakes for both sides.

pub mod firebird;
pub mod mysql;

pub use firebird::FirebirdSource;
pub use mysql::MysqlTarget;
