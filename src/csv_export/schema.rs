//! # Export Schema
//!
//! The fixed column contract shared by the header row and every data row.

use std::fmt;

/// The kind of value a column holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Any UTF-8 text
    Text,
    /// A decimal integer, or empty when the column is optional
    Integer,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Integer => "integer",
        }
    }

    /// Whether a non-empty `value` is representable as this kind
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            FieldKind::Text => true,
            FieldKind::Integer => value.parse::<i64>().is_ok(),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One column of the export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl Column {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }
}

/// Ordered set of columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSchema {
    columns: &'static [Column],
}

impl ExportSchema {
    pub const fn new(columns: &'static [Column]) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &'static [Column] {
        self.columns
    }

    pub fn arity(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, index: usize) -> Option<&'static Column> {
        self.columns.get(index)
    }

    /// Column names in header order
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> {
        self.columns.iter().map(|c| c.name)
    }
}

/// Columns of the course section export
pub const SECTION_SCHEMA: ExportSchema = ExportSchema::new(&[
    Column::required("quarter", FieldKind::Text),
    Column::required("courseId", FieldKind::Text),
    Column::optional("title", FieldKind::Text),
    Column::required("enrollCode", FieldKind::Text),
    Column::optional("section", FieldKind::Text),
    Column::required("status", FieldKind::Text),
    Column::optional("enrolled", FieldKind::Integer),
    Column::optional("maxEnrolled", FieldKind::Integer),
    Column::optional("instructors", FieldKind::Text),
    Column::optional("meetings", FieldKind::Text),
    Column::optional("ge", FieldKind::Text),
]);
