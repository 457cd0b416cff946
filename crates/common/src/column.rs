use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Live or captured column data of one source, keyed by column name.
///
/// BTreeMap keeps column iteration deterministic across runs.
pub type ColumnData = BTreeMap<String, Column>;

/// A single scalar cell value.
///
/// String and opaque payloads sit behind `Arc`, so cloning a value is a
/// reference copy. They are never mutated in place after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Arc<str>),
    /// Any structured value the model does not interpret.
    Opaque(Arc<serde_json::Value>),
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(Arc::from(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(Arc::from(v))
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Self::Opaque(Arc::new(v))
    }
}

/// A buffer type defined outside this crate that can sit in a column.
///
/// Implementors decide whether they can be duplicated. Returning `None`
/// from [`ForeignBuffer::try_duplicate`] marks the buffer as uncopyable,
/// which snapshot capture reports as an error instead of aliasing it.
pub trait ForeignBuffer: fmt::Debug {
    /// Name used in error messages and summaries.
    fn type_name(&self) -> &str;

    /// Number of elements held.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Produce an independently owned copy, if this buffer supports it.
    fn try_duplicate(&self) -> Option<Arc<dyn ForeignBuffer>>;
}

/// One column of a data source.
///
/// Every variant except [`Column::Scalar`] is a bulk buffer: copying it
/// must duplicate its elements.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "values", rename_all = "snake_case")]
pub enum Column {
    /// Generic sequence of mixed values.
    Values(Vec<Value>),
    Float64(Vec<f64>),
    Float32(Vec<f32>),
    Int64(Vec<i64>),
    Int32(Vec<i32>),
    #[serde(rename = "uint8")]
    UInt8(Vec<u8>),
    Bool(Vec<bool>),
    /// A single value standing in for the whole column.
    Scalar(Value),
    #[serde(skip)]
    Foreign(Arc<dyn ForeignBuffer>),
}

impl Column {
    /// Capability check used at copy time.
    pub fn is_bulk_buffer(&self) -> bool {
        !matches!(self, Self::Scalar(_))
    }

    /// Number of rows. A scalar column counts as one row.
    pub fn len(&self) -> usize {
        match self {
            Self::Values(v) => v.len(),
            Self::Float64(v) => v.len(),
            Self::Float32(v) => v.len(),
            Self::Int64(v) => v.len(),
            Self::Int32(v) => v.len(),
            Self::UInt8(v) => v.len(),
            Self::Bool(v) => v.len(),
            Self::Scalar(_) => 1,
            Self::Foreign(buf) => buf.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short name of the column's representation.
    pub fn kind(&self) -> &str {
        match self {
            Self::Values(_) => "values",
            Self::Float64(_) => "float64",
            Self::Float32(_) => "float32",
            Self::Int64(_) => "int64",
            Self::Int32(_) => "int32",
            Self::UInt8(_) => "uint8",
            Self::Bool(_) => "bool",
            Self::Scalar(_) => "scalar",
            Self::Foreign(buf) => buf.type_name(),
        }
    }

    /// The empty column that replaces this one on clear.
    ///
    /// Typed numeric buffers keep their element type; everything else
    /// becomes an empty generic sequence.
    pub fn emptied(&self) -> Self {
        match self {
            Self::Float64(_) => Self::Float64(Vec::new()),
            Self::Float32(_) => Self::Float32(Vec::new()),
            Self::Int64(_) => Self::Int64(Vec::new()),
            Self::Int32(_) => Self::Int32(Vec::new()),
            Self::UInt8(_) => Self::UInt8(Vec::new()),
            Self::Bool(_) => Self::Bool(Vec::new()),
            Self::Values(_) | Self::Scalar(_) | Self::Foreign(_) => Self::Values(Vec::new()),
        }
    }

    /// Build a generic column from anything convertible into values.
    pub fn values<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::Values(items.into_iter().map(Into::into).collect())
    }
}

impl PartialEq for Column {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Values(a), Self::Values(b)) => a == b,
            (Self::Float64(a), Self::Float64(b)) => a == b,
            (Self::Float32(a), Self::Float32(b)) => a == b,
            (Self::Int64(a), Self::Int64(b)) => a == b,
            (Self::Int32(a), Self::Int32(b)) => a == b,
            (Self::UInt8(a), Self::UInt8(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Scalar(a), Self::Scalar(b)) => a == b,
            // Foreign buffers are opaque; only the same buffer is equal.
            (Self::Foreign(a), Self::Foreign(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<Vec<Value>> for Column {
    fn from(v: Vec<Value>) -> Self {
        Self::Values(v)
    }
}

impl From<Vec<f64>> for Column {
    fn from(v: Vec<f64>) -> Self {
        Self::Float64(v)
    }
}

impl From<Vec<f32>> for Column {
    fn from(v: Vec<f32>) -> Self {
        Self::Float32(v)
    }
}

impl From<Vec<i64>> for Column {
    fn from(v: Vec<i64>) -> Self {
        Self::Int64(v)
    }
}

impl From<Vec<i32>> for Column {
    fn from(v: Vec<i32>) -> Self {
        Self::Int32(v)
    }
}

impl From<Vec<u8>> for Column {
    fn from(v: Vec<u8>) -> Self {
        Self::UInt8(v)
    }
}

impl From<Vec<bool>> for Column {
    fn from(v: Vec<bool>) -> Self {
        Self::Bool(v)
    }
}
