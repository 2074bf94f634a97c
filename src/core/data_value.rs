use std::cmp::Ordering;
use std::fmt::{self, Display};
use std::hash::{Hash, Hasher};

use chrono::{NaiveDate, NaiveDateTime};

use crate::core::error::{Error, Result};

/// A single dynamically typed cell of a [`DataFrame`](crate::DataFrame) column
#[derive(Debug, Clone)]
pub enum Value {
    /// Missing value
    Null,
    Boolean(bool),
    Int64(i64),
    Float64(f64),
    String(String),
    DateTime(NaiveDateTime),
}

/// Family of values that can be ordered against each other
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueDomain {
    /// `Int64` and `Float64`
    Numeric,
    Boolean,
    String,
    DateTime,
}

impl Display for ValueDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueDomain::Numeric => "numeric",
            ValueDomain::Boolean => "boolean",
            ValueDomain::String => "string",
            ValueDomain::DateTime => "datetime",
        };
        write!(f, "{}", name)
    }
}

impl Value {
    /// Check if the value is missing. NaN counts as missing.
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Float64(v) => v.is_nan(),
            _ => false,
        }
    }

    /// Returns the type name of the value
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "bool",
            Value::Int64(_) => "i64",
            Value::Float64(_) => "f64",
            Value::String(_) => "string",
            Value::DateTime(_) => "datetime",
        }
    }

    /// Ordering domain of the value, `None` when missing
    pub fn domain(&self) -> Option<ValueDomain> {
        if self.is_missing() {
            return None;
        }
        match self {
            Value::Int64(_) | Value::Float64(_) => Some(ValueDomain::Numeric),
            Value::Boolean(_) => Some(ValueDomain::Boolean),
            Value::String(_) => Some(ValueDomain::String),
            Value::DateTime(_) => Some(ValueDomain::DateTime),
            Value::Null => None,
        }
    }

    /// Numeric view of the value for aggregation.
    ///
    /// Missing values map to `Ok(None)`, booleans to 0/1. Strings and
    /// datetimes are outside the numeric domain.
    pub fn to_f64(&self) -> Result<Option<f64>> {
        match self {
            Value::Null => Ok(None),
            Value::Float64(v) if v.is_nan() => Ok(None),
            Value::Float64(v) => Ok(Some(*v)),
            Value::Int64(v) => Ok(Some(*v as f64)),
            Value::Boolean(b) => Ok(Some(if *b { 1.0 } else { 0.0 })),
            other => Err(Error::Domain(format!(
                "value of type {} is not numeric",
                other.type_name()
            ))),
        }
    }

    /// Get the timestamp if this is a datetime value
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Value::DateTime(ts) => Some(*ts),
            _ => None,
        }
    }

    /// Compare two values for sorting.
    ///
    /// Missing values compare equal to each other and greater than anything
    /// else. Values from different domains are an error.
    pub fn try_cmp(&self, other: &Value) -> Result<Ordering> {
        match (self.domain(), other.domain()) {
            (None, None) => Ok(Ordering::Equal),
            (None, Some(_)) => Ok(Ordering::Greater),
            (Some(_), None) => Ok(Ordering::Less),
            (Some(a), Some(b)) if a != b => Err(Error::Domain(format!(
                "cannot compare {} value with {} value",
                a, b
            ))),
            _ => Ok(self.cmp_within_domain(other)),
        }
    }

    // Both values non-missing and in the same domain
    fn cmp_within_domain(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Boolean(a), Value::Boolean(b)) => a.cmp(b),
            (Value::Int64(a), Value::Int64(b)) => a.cmp(b),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::DateTime(a), Value::DateTime(b)) => a.cmp(b),
            (a, b) => match (a.to_f64(), b.to_f64()) {
                (Ok(Some(x)), Ok(Some(y))) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
                _ => Ordering::Equal,
            },
        }
    }

    fn float_key_bits(v: f64) -> u64 {
        if v.is_nan() {
            f64::NAN.to_bits()
        } else if v == 0.0 {
            0.0f64.to_bits()
        } else {
            v.to_bits()
        }
    }
}

// Exact-value equality, used for partition keys. NaN equals NaN here.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Int64(a), Value::Int64(b)) => a == b,
            (Value::Float64(a), Value::Float64(b)) => {
                Value::float_key_bits(*a) == Value::float_key_bits(*b)
            }
            (Value::String(a), Value::String(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Boolean(b) => b.hash(state),
            Value::Int64(v) => v.hash(state),
            Value::Float64(v) => Value::float_key_bits(*v).hash(state),
            Value::String(s) => s.hash(state),
            Value::DateTime(ts) => ts.hash(state),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NA"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Int64(v) => write!(f, "{}", v),
            Value::Float64(v) => write!(f, "{}", v),
            Value::String(s) => write!(f, "{}", s),
            Value::DateTime(ts) => write!(f, "{}", ts),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int64(value as i64)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int64(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float64(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Value::DateTime(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        match value.and_hms_opt(0, 0, 0) {
            Some(ts) => Value::DateTime(ts),
            None => Value::Null,
        }
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}
