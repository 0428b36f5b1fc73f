//! Exact rational beat positions.

use std::ops::{Add, Sub};

use num_rational::Ratio;

/// An exact, non-negative rational musical beat position.
///
/// Comparisons and ordering are rational, never floating point: two beats
/// that are musically identical compare equal regardless of how they were
/// constructed, since the underlying [`Ratio`] is always kept reduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Beat(Ratio<u64>);

impl Beat {
    /// Beat zero, the start of the chart.
    pub const ZERO: Beat = Beat(Ratio::new_raw(0, 1));

    /// Construct a beat from an explicit numerator/denominator pair.
    ///
    /// # Errors
    ///
    /// Returns [`None`] if `denominator` is zero.
    #[must_use]
    pub fn new(numerator: u64, denominator: u64) -> Option<Self> {
        if denominator == 0 {
            return None;
        }
        Some(Beat(Ratio::new(numerator, denominator)))
    }

    /// Construct a beat from an integer number of beats.
    #[must_use]
    pub fn from_integer(n: u64) -> Self {
        Beat(Ratio::from_integer(n))
    }

    /// The reduced numerator of this beat.
    #[must_use]
    pub fn numer(&self) -> u64 {
        *self.0.numer()
    }

    /// The reduced denominator of this beat.
    #[must_use]
    pub fn denom(&self) -> u64 {
        *self.0.denom()
    }

    /// Convert to an `f64` approximation. Only ever called at the edge where
    /// the spec requires a floating-point result (e.g. dividing by a `bps`).
    #[must_use]
    pub fn to_f64(self) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let result = *self.0.numer() as f64 / *self.0.denom() as f64;
        result
    }

    /// Reinterpret as a signed rational, for modules (the CBT converter)
    /// that need to mix exact chart beats with derived, possibly-negative
    /// rational positions.
    #[must_use]
    pub fn to_signed_ratio(self) -> Ratio<i64> {
        #[allow(clippy::cast_possible_wrap)]
        Ratio::new(*self.0.numer() as i64, *self.0.denom() as i64)
    }

    /// The underlying ratio, exposed for arithmetic that stays within this
    /// crate.
    #[must_use]
    pub(crate) fn ratio(self) -> Ratio<u64> {
        self.0
    }

    pub(crate) fn from_ratio(ratio: Ratio<u64>) -> Self {
        Beat(ratio)
    }
}

impl Default for Beat {
    fn default() -> Self {
        Beat::ZERO
    }
}

impl Add for Beat {
    type Output = Beat;
    fn add(self, rhs: Beat) -> Beat {
        Beat(self.0 + rhs.0)
    }
}

impl Sub for Beat {
    type Output = Beat;
    /// Panics if `rhs > self`; beats are non-negative by invariant and every
    /// caller in this crate subtracts an earlier beat from a later one.
    fn sub(self, rhs: Beat) -> Beat {
        assert!(rhs.0 <= self.0, "beat subtraction would go negative");
        Beat(self.0 - rhs.0)
    }
}
