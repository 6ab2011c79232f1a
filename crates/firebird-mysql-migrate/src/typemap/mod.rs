//! Type mapping between Firebird and MySQL.
//!
//! The mapping table is static for the life of the process: each source
//! type code resolves to a target template (a base type name plus which
//! qualifier, if any, gets appended from the column metadata). Codes
//! outside the table degrade to `TEXT` rather than failing.

use crate::core::schema::{ColumnDescriptor, SourceType};
use crate::core::traits::ColumnDefinition;

/// Target type for source codes outside the mapping table.
const FALLBACK_TYPE: &str = "TEXT";

/// Fixed width used when fixed-point columns are mapped as text.
const DECIMAL_TEXT_TYPE: &str = "VARCHAR(50)";

/// Which piece of column metadata qualifies a base type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Qualifier {
    /// Base name is emitted as-is.
    None,
    /// Character types: `(length)` when the declared length is positive.
    Length,
    /// Fixed-point types: `(precision, scale)` / `(precision)` by presence.
    Precision,
}

/// Maps source column descriptors to MySQL type strings.
///
/// `decimal_as_text` controls the policy for the fixed-point codes 12/13:
/// the schemas this tool was built for store formatted date/time text in
/// those columns, so by default they map to a fixed-width `VARCHAR` rather
/// than `DECIMAL`. Disable the policy for schemas where they hold real
/// numerics.
#[derive(Debug, Clone)]
pub struct TypeMapper {
    decimal_as_text: bool,
}

impl Default for TypeMapper {
    fn default() -> Self {
        Self {
            decimal_as_text: true,
        }
    }
}

impl TypeMapper {
    pub fn new(decimal_as_text: bool) -> Self {
        Self { decimal_as_text }
    }

    /// The static template for a known source type.
    fn template(&self, ty: SourceType) -> (&'static str, Qualifier) {
        match ty {
            // Integer types
            SourceType::Short => ("SMALLINT", Qualifier::None),
            SourceType::Long => ("INTEGER", Qualifier::None),
            SourceType::Int64 => ("BIGINT", Qualifier::None),

            // Floating point
            SourceType::Float => ("FLOAT", Qualifier::None),
            SourceType::DFloat => ("DOUBLE", Qualifier::None),
            SourceType::Double => ("DOUBLE", Qualifier::None),

            // Fixed point: date/time-as-text policy (see struct docs)
            SourceType::Decimal | SourceType::Numeric => {
                if self.decimal_as_text {
                    (DECIMAL_TEXT_TYPE, Qualifier::None)
                } else {
                    ("DECIMAL", Qualifier::Precision)
                }
            }

            // Character types
            SourceType::Text => ("VARCHAR", Qualifier::Length),
            SourceType::Varying => ("VARCHAR", Qualifier::Length),
            SourceType::Char => ("CHAR", Qualifier::Length),

            // Date/time
            SourceType::Timestamp => ("DATETIME", Qualifier::None),

            // Blobs
            SourceType::Blob => ("BLOB", Qualifier::None),
            SourceType::TextBlob => ("LONGTEXT", Qualifier::None),
        }
    }

    /// Map one column descriptor to a MySQL type string.
    pub fn map_column(&self, col: &ColumnDescriptor) -> String {
        let Some(ty) = col.source_type else {
            return FALLBACK_TYPE.to_string();
        };

        let (base, qualifier) = self.template(ty);
        match qualifier {
            Qualifier::None => base.to_string(),
            Qualifier::Length => {
                if col.length > 0 {
                    format!("{}({})", base, col.length)
                } else {
                    base.to_string()
                }
            }
            Qualifier::Precision => {
                // Zero counts as absent; Firebird reports scale negated.
                let precision = col.precision.filter(|p| *p != 0);
                let scale = col.scale.filter(|s| *s != 0);
                match (precision, scale) {
                    (Some(p), Some(s)) => format!("{}({}, {})", base, p, s.abs()),
                    (Some(p), None) => format!("{}({})", base, p),
                    _ => base.to_string(),
                }
            }
        }
    }

    /// Map one column to a DDL-ready definition, keeping the column name.
    pub fn column_definition(&self, col: &ColumnDescriptor) -> ColumnDefinition {
        ColumnDefinition {
            name: col.name.clone(),
            sql_type: self.map_column(col),
        }
    }
}
