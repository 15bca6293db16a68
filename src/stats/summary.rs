//! Average and population standard deviation over integer samples.

use serde::{Serialize, Serializer};

/// Value reported on the wire when a statistic has no data behind it
pub const UNDEFINED_SENTINEL: f64 = -1.0;

/// A computed statistic, or the explicit absence of one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Statistic {
    Undefined,
    Value(f64),
}

impl Statistic {
    pub fn value(&self) -> Option<f64> {
        match self {
            Statistic::Undefined => None,
            Statistic::Value(v) => Some(*v),
        }
    }

    /// Wire form: the value itself, or `-1` when undefined.
    pub fn to_f64(&self) -> f64 {
        self.value().unwrap_or(UNDEFINED_SENTINEL)
    }
}

impl Serialize for Statistic {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_f64())
    }
}

/// Mean and standard deviation of one collection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub avg: Statistic,
    pub stddev: Statistic,
}

impl Summary {
    pub const UNDEFINED: Summary = Summary {
        avg: Statistic::Undefined,
        stddev: Statistic::Undefined,
    };
}

/// Population mean and standard deviation (divides by `n`).
///
/// A collection summing to zero, the empty one included, has no defined
/// statistics.
pub fn summarize(collection: &[usize]) -> Summary {
    let sum: f64 = collection.iter().map(|&x| x as f64).sum();
    if sum == 0.0 {
        return Summary::UNDEFINED;
    }

    let n = collection.len() as f64;
    let avg = sum / n;
    let squared_diffs: f64 = collection
        .iter()
        .map(|&x| (x as f64 - avg).powi(2))
        .sum();

    Summary {
        avg: Statistic::Value(avg),
        stddev: Statistic::Value((squared_diffs / n).sqrt()),
    }
}
