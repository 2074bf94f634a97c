use std::cmp::Ordering;
use std::fmt::{self, Debug, Display};

/// Type representing missing values (NA, Not Available)
///
/// Numeric window results use `NA<f64>` so that an empty window is visible in
/// the type rather than smuggled through as NaN.
#[derive(Clone, Copy)]
pub enum NA<T> {
    /// Case when a value exists
    Value(T),
    /// Case when a value doesn't exist
    NA,
}

impl<T> NA<T> {
    /// Check if the value is missing
    pub fn is_na(&self) -> bool {
        match self {
            NA::Value(_) => false,
            NA::NA => true,
        }
    }
}

impl NA<f64> {
    /// Unwrap to `f64`, mapping NA to NaN
    pub fn to_f64_or_nan(&self) -> f64 {
        match self {
            NA::Value(v) => *v,
            NA::NA => f64::NAN,
        }
    }
}

// From implementation: Automatic conversion from type T to NA<T>
impl<T> From<T> for NA<T> {
    fn from(value: T) -> Self {
        NA::Value(value)
    }
}

// From implementation: Automatic conversion from Option<T> to NA<T>
impl<T> From<Option<T>> for NA<T> {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => NA::Value(v),
            None => NA::NA,
        }
    }
}

impl<T> From<NA<T>> for Option<T> {
    fn from(na: NA<T>) -> Self {
        match na {
            NA::Value(v) => Some(v),
            NA::NA => None,
        }
    }
}

impl<T: Debug> Debug for NA<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NA::Value(v) => write!(f, "{:?}", v),
            NA::NA => write!(f, "NA"),
        }
    }
}

impl<T: Display> Display for NA<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NA::Value(v) => write!(f, "{}", v),
            NA::NA => write!(f, "NA"),
        }
    }
}

impl<T: PartialEq> PartialEq for NA<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (NA::Value(a), NA::Value(b)) => a == b,
            (NA::NA, NA::NA) => true,
            _ => false,
        }
    }
}

impl<T: Eq> Eq for NA<T> {}

impl<T: PartialOrd> PartialOrd for NA<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (NA::Value(a), NA::Value(b)) => a.partial_cmp(b),
            (NA::NA, NA::NA) => Some(Ordering::Equal),
            (NA::NA, _) => Some(Ordering::Less), // Define NA as always less than other values
            (_, NA::NA) => Some(Ordering::Greater),
        }
    }
}
