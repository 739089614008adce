//! Per-timestep quantities that may be given as one broadcast value.

use serde::{Deserialize, Serialize};

use crate::error::CouplingError;

/// A quantity that is either constant over the run or sampled per timestep.
///
/// Deserializes untagged: `1.0` or `[1.0, 0.0, 0.0]` is a scalar for `f64`
/// and `[f64; 3]` respectively, while an array of those is a sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Series<T> {
    Scalar(T),
    Sequence(Vec<T>),
}

impl<T: Clone> Series<T> {
    /// Length of an explicit sequence, `None` for a scalar.
    pub fn sequence_len(&self) -> Option<usize> {
        match self {
            Self::Scalar(_) => None,
            Self::Sequence(values) => Some(values.len()),
        }
    }

    /// True for a sequence with no entries.
    pub fn is_empty_sequence(&self) -> bool {
        matches!(self, Self::Sequence(values) if values.is_empty())
    }

    /// Expand to exactly `n` values.
    ///
    /// Scalars are repeated; sequences must already have length `n`.
    pub fn broadcast(&self, n: usize, what: &str) -> Result<Vec<T>, CouplingError> {
        match self {
            Self::Scalar(value) => Ok(vec![value.clone(); n]),
            Self::Sequence(values) if values.len() == n => Ok(values.clone()),
            Self::Sequence(values) => Err(CouplingError::ShapeMismatch {
                what: what.to_string(),
                expected: n,
                found: values.len(),
            }),
        }
    }

    /// Iterate every stored value (one for a scalar).
    pub fn values(&self) -> impl Iterator<Item = &T> {
        let slice: &[T] = match self {
            Self::Scalar(value) => std::slice::from_ref(value),
            Self::Sequence(values) => values,
        };
        slice.iter()
    }
}

impl From<f64> for Series<f64> {
    fn from(value: f64) -> Self {
        Self::Scalar(value)
    }
}

impl From<Vec<f64>> for Series<f64> {
    fn from(values: Vec<f64>) -> Self {
        Self::Sequence(values)
    }
}

impl From<[f64; 3]> for Series<[f64; 3]> {
    fn from(value: [f64; 3]) -> Self {
        Self::Scalar(value)
    }
}

impl From<Vec<[f64; 3]>> for Series<[f64; 3]> {
    fn from(values: Vec<[f64; 3]>) -> Self {
        Self::Sequence(values)
    }
}
