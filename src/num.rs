use ordered_float::NotNan;
use serde::Deserialize;

use crate::{Error, Result};

/// A closed interval `[lo, hi]` with `0 < lo < hi`, both finite. Feature columns are scaled into
/// this interval before their values are multiplied together.
///
/// `lo` must be strictly positive. Values in `[0, 1]` shrink under any exponent greater than 1 and
/// a value of 0 either zeroes the whole product or, under a negative weight, leaves it undefined.
#[derive(Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct Interval {
    lo: f64,
    hi: f64,
}

#[derive(Deserialize)]
struct RawInterval {
    lo: f64,
    hi: f64,
}

impl Interval {
    pub const DEFAULT: Self = Self {
        lo: 10.0,
        hi: 100.0,
    };

    pub fn new(lo: f64, hi: f64) -> Result<Self> {
        let invalid = |reason| Err(Error::InvalidInterval { lo, hi, reason });
        if !lo.is_finite() || !hi.is_finite() {
            return invalid("bounds must be finite");
        }
        if lo >= hi {
            return invalid("lo must be less than hi");
        }
        if lo <= 0.0 {
            return invalid("lo must be greater than 0");
        }
        Ok(Self { lo, hi })
    }

    pub fn lo(&self) -> f64 {
        self.lo
    }

    pub fn hi(&self) -> f64 {
        self.hi
    }

    pub fn width(&self) -> f64 {
        self.hi - self.lo
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.lo..=self.hi).contains(&value)
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<RawInterval> for Interval {
    type Error = Error;
    fn try_from(RawInterval { lo, hi }: RawInterval) -> Result<Self> {
        Self::new(lo, hi)
    }
}

impl std::fmt::Debug for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.lo, self.hi)
    }
}

/// A finite, non-NaN WPM score.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Score(NotNan<f64>);

impl Score {
    /// The empty product.
    pub const ONE: Self = Self(unsafe { NotNan::new_unchecked(1.0) });

    pub fn new(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        NotNan::new(value).ok().map(Self)
    }

    pub fn as_f64(&self) -> f64 {
        self.0.into_inner()
    }
}

impl std::cmp::PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::cmp::Ord for Score {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

impl std::fmt::Debug for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
