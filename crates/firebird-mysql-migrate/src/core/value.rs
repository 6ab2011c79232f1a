//! Row value types for database-agnostic data transfer.
//!
//! Values are owned and positional: a [`Row`] is ordered to match the column
//! order of the table it was read from.

use chrono::{NaiveDate, NaiveDateTime};

/// A single column value as read from the source or written to the target.
#[derive(Debug, Clone, PartialEq)]
pub enum RowValue {
    /// SQL NULL.
    Null,

    /// Boolean value.
    Boolean(bool),

    /// Signed integer (covers smallint, integer, bigint).
    Integer(i64),

    /// Floating point (covers float, double precision).
    Float(f64),

    /// Text data.
    Text(String),

    /// Binary data.
    Bytes(Vec<u8>),

    /// Timestamp without timezone.
    Timestamp(NaiveDateTime),

    /// Date without time component.
    Date(NaiveDate),
}

impl RowValue {
    /// Check if this value is NULL.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, RowValue::Null)
    }
}

impl From<bool> for RowValue {
    fn from(v: bool) -> Self {
        RowValue::Boolean(v)
    }
}

impl From<i64> for RowValue {
    fn from(v: i64) -> Self {
        RowValue::Integer(v)
    }
}

impl From<i32> for RowValue {
    fn from(v: i32) -> Self {
        RowValue::Integer(v as i64)
    }
}

impl From<f64> for RowValue {
    fn from(v: f64) -> Self {
        RowValue::Float(v)
    }
}

impl From<String> for RowValue {
    fn from(v: String) -> Self {
        RowValue::Text(v)
    }
}

impl From<&str> for RowValue {
    fn from(v: &str) -> Self {
        RowValue::Text(v.to_string())
    }
}

impl From<Vec<u8>> for RowValue {
    fn from(v: Vec<u8>) -> Self {
        RowValue::Bytes(v)
    }
}

impl From<NaiveDateTime> for RowValue {
    fn from(v: NaiveDateTime) -> Self {
        RowValue::Timestamp(v)
    }
}

impl From<NaiveDate> for RowValue {
    fn from(v: NaiveDate) -> Self {
        RowValue::Date(v)
    }
}

/// One row of values, positionally aligned to the owning table's columns.
pub type Row = Vec<RowValue>;

/// A bounded, ordered group of converted rows awaiting one bulk-load call.
///
/// The engine pushes converted rows until the batch reaches its capacity,
/// flushes it as a single insert, and reuses the allocation for the next
/// batch.
#[derive(Debug)]
pub struct Batch {
    rows: Vec<Row>,
    capacity: usize,
}

impl Batch {
    /// Create an empty batch that flushes at `capacity` rows.
    ///
    /// Capacity must be greater than zero; this is enforced by config
    /// validation before a batch is ever constructed.
    pub fn new(capacity: usize) -> Self {
        Self {
            rows: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a row.
    pub fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Whether the batch has reached its flush threshold.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.rows.len() >= self.capacity
    }

    /// Check if the batch is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get the number of rows currently buffered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Take all buffered rows, leaving the batch empty with its capacity
    /// reserved for reuse.
    pub fn take(&mut self) -> Vec<Row> {
        std::mem::replace(&mut self.rows, Vec::with_capacity(self.capacity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_value_is_null() {
        assert!(RowValue::Null.is_null());
        assert!(!RowValue::Integer(42).is_null());
        assert!(!RowValue::Text(String::new()).is_null());
    }

    #[test]
    fn test_from_implementations() {
        let v: RowValue = 42i32.into();
        assert_eq!(v, RowValue::Integer(42));

        let v: RowValue = "hello".into();
        assert_eq!(v, RowValue::Text("hello".to_string()));

        let v: RowValue = vec![1u8, 2, 3].into();
        assert_eq!(v, RowValue::Bytes(vec![1, 2, 3]));
    }

    #[test]
    fn test_batch_fill_and_take() {
        let mut batch = Batch::new(2);
        assert!(batch.is_empty());
        assert!(!batch.is_full());

        batch.push(vec![RowValue::Integer(1)]);
        assert!(!batch.is_full());

        batch.push(vec![RowValue::Integer(2)]);
        assert!(batch.is_full());
        assert_eq!(batch.len(), 2);

        let rows = batch.take();
        assert_eq!(rows.len(), 2);
        assert!(batch.is_empty());
        assert!(!batch.is_full());
    }
}
