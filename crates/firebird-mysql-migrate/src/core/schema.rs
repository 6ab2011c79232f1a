//! Schema metadata types for tables, columns, and constraints.
//!
//! These types are the fixed-shape representation of source metadata used
//! throughout the migration: drivers fill them in, the type mapper and the
//! engine consume them. They are immutable once fetched.

use serde::{Deserialize, Serialize};

/// Firebird column type codes as stored in `RDB$FIELDS.RDB$FIELD_TYPE`.
///
/// Codes 12 and 13 are fixed-point types that, in the schemas this tool was
/// written for, hold date/time values rendered as text; the type mapper has
/// an explicit policy for them (see `typemap`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceType {
    /// 7: SMALLINT.
    Short,
    /// 8: INTEGER.
    Long,
    /// 10: FLOAT.
    Float,
    /// 11: legacy DOUBLE PRECISION.
    DFloat,
    /// 12: fixed-point, stores formatted date/time text in practice.
    Decimal,
    /// 13: fixed-point, same caveat as `Decimal`.
    Numeric,
    /// 14: fixed-length character storage.
    Text,
    /// 15: CHAR.
    Char,
    /// 16: 64-bit integer.
    Int64,
    /// 27: DOUBLE PRECISION.
    Double,
    /// 35: TIMESTAMP.
    Timestamp,
    /// 37: VARCHAR.
    Varying,
    /// 40: binary blob.
    Blob,
    /// 261: BLOB SUB_TYPE TEXT.
    TextBlob,
}

impl SourceType {
    /// Resolve a raw `RDB$FIELD_TYPE` code. Unknown codes return `None` and
    /// fall through to the type mapper's generic fallback.
    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            7 => Some(SourceType::Short),
            8 => Some(SourceType::Long),
            10 => Some(SourceType::Float),
            11 => Some(SourceType::DFloat),
            12 => Some(SourceType::Decimal),
            13 => Some(SourceType::Numeric),
            14 => Some(SourceType::Text),
            15 => Some(SourceType::Char),
            16 => Some(SourceType::Int64),
            27 => Some(SourceType::Double),
            35 => Some(SourceType::Timestamp),
            37 => Some(SourceType::Varying),
            40 => Some(SourceType::Blob),
            261 => Some(SourceType::TextBlob),
            _ => None,
        }
    }

    /// The raw numeric code for this type.
    pub fn code(self) -> i16 {
        match self {
            SourceType::Short => 7,
            SourceType::Long => 8,
            SourceType::Float => 10,
            SourceType::DFloat => 11,
            SourceType::Decimal => 12,
            SourceType::Numeric => 13,
            SourceType::Text => 14,
            SourceType::Char => 15,
            SourceType::Int64 => 16,
            SourceType::Double => 27,
            SourceType::Timestamp => 35,
            SourceType::Varying => 37,
            SourceType::Blob => 40,
            SourceType::TextBlob => 261,
        }
    }

    /// All codes known to the mapping table, in ascending code order.
    pub fn all() -> &'static [SourceType] {
        &[
            SourceType::Short,
            SourceType::Long,
            SourceType::Float,
            SourceType::DFloat,
            SourceType::Decimal,
            SourceType::Numeric,
            SourceType::Text,
            SourceType::Char,
            SourceType::Int64,
            SourceType::Double,
            SourceType::Timestamp,
            SourceType::Varying,
            SourceType::Blob,
            SourceType::TextBlob,
        ]
    }
}

/// Column metadata as discovered from the source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name, trailing padding trimmed.
    pub name: String,

    /// Resolved source type; `None` for codes outside the mapping table.
    pub source_type: Option<SourceType>,

    /// Raw `RDB$FIELD_TYPE` code as fetched.
    pub type_code: i16,

    /// Declared storage length in bytes (character types).
    pub length: i32,

    /// Numeric precision, when declared.
    pub precision: Option<i32>,

    /// Numeric scale, when declared. Firebird stores it negated.
    pub scale: Option<i32>,

    /// Whether the column allows NULL. Discovered but not expressed in
    /// target DDL.
    pub nullable: bool,
}

impl ColumnDescriptor {
    /// Whether this column is the textual blob type (UTF-8 decoded on
    /// conversion).
    pub fn is_text_blob(&self) -> bool {
        self.source_type == Some(SourceType::TextBlob)
    }

    /// Whether this column is the timestamp type (text values pass through
    /// unchanged on conversion).
    pub fn is_timestamp(&self) -> bool {
        self.source_type == Some(SourceType::Timestamp)
    }
}

/// Foreign key metadata, one entry per referencing column segment.
///
/// Collected during discovery and carried on the table descriptor; the
/// target never creates foreign keys and table order is never derived from
/// them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForeignKeyDescriptor {
    /// Constraint name.
    pub name: String,

    /// Referencing column in this table.
    pub column: String,

    /// Referenced table name.
    pub ref_table: String,

    /// Referenced column name.
    pub ref_column: String,
}

/// Table metadata: ordered columns plus key information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableDescriptor {
    /// Table name.
    pub name: String,

    /// Column definitions in source declaration order. This order is
    /// authoritative: streamed rows are positionally aligned to it.
    pub columns: Vec<ColumnDescriptor>,

    /// Primary key column names in key order, possibly empty.
    pub primary_key: Vec<String>,

    /// Foreign key constraints (collected, unused).
    pub foreign_keys: Vec<ForeignKeyDescriptor>,
}

impl TableDescriptor {
    /// Check if the table has a primary key.
    pub fn has_pk(&self) -> bool {
        !self.primary_key.is_empty()
    }

    /// Column names in declaration order.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Fold the table name, column names, and primary-key names to
    /// lowercase. Used when lowercase naming mode is enabled; folding is
    /// applied to all three consistently so the primary-key clause still
    /// references existing columns.
    pub fn fold_lowercase(mut self) -> Self {
        self.name = self.name.to_lowercase();
        for col in &mut self.columns {
            col.name = col.name.to_lowercase();
        }
        for key in &mut self.primary_key {
            *key = key.to_lowercase();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_column(name: &str, code: i16) -> ColumnDescriptor {
        ColumnDescriptor {
            name: name.to_string(),
            source_type: SourceType::from_code(code),
            type_code: code,
            length: 0,
            precision: None,
            scale: None,
            nullable: true,
        }
    }

    #[test]
    fn test_source_type_round_trip() {
        for ty in SourceType::all() {
            assert_eq!(SourceType::from_code(ty.code()), Some(*ty));
        }
    }

    #[test]
    fn test_source_type_unknown_code() {
        assert_eq!(SourceType::from_code(9), None);
        assert_eq!(SourceType::from_code(-1), None);
        assert_eq!(SourceType::from_code(999), None);
    }

    #[test]
    fn test_column_type_predicates() {
        assert!(make_test_column("memo", 261).is_text_blob());
        assert!(!make_test_column("memo", 40).is_text_blob());

        assert!(make_test_column("created", 35).is_timestamp());
        assert!(!make_test_column("created", 37).is_timestamp());
    }

    #[test]
    fn test_has_pk() {
        let mut table = TableDescriptor {
            name: "ORDERS".to_string(),
            columns: vec![make_test_column("ID", 8)],
            primary_key: vec![],
            foreign_keys: vec![],
        };
        assert!(!table.has_pk());

        table.primary_key = vec!["ID".to_string()];
        assert!(table.has_pk());
    }

    #[test]
    fn test_fold_lowercase() {
        let table = TableDescriptor {
            name: "USERS".to_string(),
            columns: vec![make_test_column("ID", 8), make_test_column("Name", 37)],
            primary_key: vec!["ID".to_string()],
            foreign_keys: vec![],
        };

        let folded = table.fold_lowercase();
        assert_eq!(folded.name, "users");
        assert_eq!(folded.columns[0].name, "id");
        assert_eq!(folded.columns[1].name, "name");
        assert_eq!(folded.primary_key, vec!["id".to_string()]);
    }

    #[test]
    fn test_column_names_order() {
        let table = TableDescriptor {
            name: "T".to_string(),
            columns: vec![
                make_test_column("B", 8),
                make_test_column("A", 8),
                make_test_column("C", 8),
            ],
            primary_key: vec![],
            foreign_keys: vec![],
        };
        assert_eq!(table.column_names(), vec!["B", "A", "C"]);
    }
}
