//! Row conversion from source values to target-safe values.
//!
//! Conversion is pure and infallible: problematic values degrade locally
//! (undecodable text-blob bytes become replacement characters, empty
//! strings become NULL) instead of failing the row. Timestamps and dates
//! are rendered as text in the formats MySQL accepts for `DATETIME` and
//! the text columns that hold date values in these schemas.

use crate::core::schema::ColumnDescriptor;
use crate::core::value::{Row, RowValue};

/// Render format for timestamp values, accepted by MySQL `DATETIME`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Render format for date values.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Convert one row in place of its column descriptors.
///
/// The row must be positionally aligned to `columns`; a length mismatch is
/// a bug in the caller, not a data condition, and asserts.
pub fn convert_row(row: Row, columns: &[ColumnDescriptor]) -> Row {
    assert_eq!(
        row.len(),
        columns.len(),
        "row arity must match column descriptors"
    );
    row.into_iter()
        .zip(columns)
        .map(|(value, col)| convert_value(value, col))
        .collect()
}

/// Convert a single value according to its column descriptor.
pub fn convert_value(value: RowValue, col: &ColumnDescriptor) -> RowValue {
    match value {
        RowValue::Null => RowValue::Null,

        // Text blobs arrive as bytes; decode with replacement so a bad
        // sequence degrades instead of failing the row.
        RowValue::Bytes(bytes) if col.is_text_blob() => {
            RowValue::Text(String::from_utf8_lossy(&bytes).into_owned())
        }
        RowValue::Bytes(bytes) => RowValue::Bytes(bytes),

        RowValue::Timestamp(ts) => RowValue::Text(ts.format(TIMESTAMP_FORMAT).to_string()),
        RowValue::Date(date) => RowValue::Text(date.format(DATE_FORMAT).to_string()),

        // Timestamp columns already carrying text keep their original
        // formatting untouched.
        RowValue::Text(s) if col.is_timestamp() => RowValue::Text(s),
        RowValue::Text(s) => {
            if s.is_empty() {
                RowValue::Null
            } else {
                RowValue::Text(s.trim().to_string())
            }
        }

        other => other,
    }
}
