//! Semantic unit types for the quantities the engine passes around
//!
//! Newtype wrappers keep carbon masses, percentage thresholds and density
//! fractions from being mixed up. All wrap `f64` so ledger sums stay exact
//! enough for bit-identical replays.
//!
//! # Usage
//! ```
//! use forest_fire_core::core_types::units::{Fraction, KgCo2, Percent};
//!
//! let emitted = KgCo2::new(12.5) + KgCo2::new(7.5);
//! assert_eq!(*emitted, 20.0);
//!
//! let threshold = Percent::new(70.0);
//! assert_eq!(threshold.to_fraction(), Fraction::new(0.7));
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Deref, Mul, Neg, Sub, SubAssign};

/// Compare f64 values with total ordering
#[inline]
fn f64_total_cmp(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}

// ============================================================================
// CARBON MASS
// ============================================================================

/// Mass of CO2-equivalent in kilograms
///
/// Negative values are allowed: the ledger balance goes negative when
/// sequestration outpaces emission.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct KgCo2(f64);

impl Eq for KgCo2 {}

impl PartialOrd for KgCo2 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for KgCo2 {
    fn cmp(&self, other: &Self) -> Ordering {
        f64_total_cmp(self.0, other.0)
    }
}

impl Deref for KgCo2 {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl KgCo2 {
    pub const ZERO: KgCo2 = KgCo2(0.0);

    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        KgCo2(value)
    }

    #[inline]
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl Add for KgCo2 {
    type Output = KgCo2;
    fn add(self, rhs: KgCo2) -> KgCo2 {
        KgCo2(self.0 + rhs.0)
    }
}

impl AddAssign for KgCo2 {
    fn add_assign(&mut self, rhs: KgCo2) {
        self.0 += rhs.0;
    }
}

impl Sub for KgCo2 {
    type Output = KgCo2;
    fn sub(self, rhs: KgCo2) -> KgCo2 {
        KgCo2(self.0 - rhs.0)
    }
}

impl SubAssign for KgCo2 {
    fn sub_assign(&mut self, rhs: KgCo2) {
        self.0 -= rhs.0;
    }
}

impl Neg for KgCo2 {
    type Output = KgCo2;
    fn neg(self) -> KgCo2 {
        KgCo2(-self.0)
    }
}

impl Mul<f64> for KgCo2 {
    type Output = KgCo2;
    fn mul(self, rhs: f64) -> KgCo2 {
        KgCo2(self.0 * rhs)
    }
}

impl fmt::Display for KgCo2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} kg CO2", self.0)
    }
}

// ============================================================================
// PERCENT / FRACTION
// ============================================================================

/// Percentage on the 0-100 scale (ignition thresholds)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Percent(f64);

impl Eq for Percent {}

impl PartialOrd for Percent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Percent {
    fn cmp(&self, other: &Self) -> Ordering {
        f64_total_cmp(self.0, other.0)
    }
}

impl Deref for Percent {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl Percent {
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Percent(value)
    }

    /// Convert to fraction (0-1)
    #[inline]
    #[must_use]
    pub fn to_fraction(self) -> Fraction {
        Fraction(self.0 / 100.0)
    }
}

impl Add<f64> for Percent {
    type Output = Percent;
    fn add(self, rhs: f64) -> Percent {
        Percent(self.0 + rhs)
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.0)
    }
}

/// Fraction on the 0-1 scale (densities, intensities)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Fraction(f64);

impl Eq for Fraction {}

impl PartialOrd for Fraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Fraction {
    fn cmp(&self, other: &Self) -> Ordering {
        f64_total_cmp(self.0, other.0)
    }
}

impl Deref for Fraction {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl Fraction {
    pub const ZERO: Fraction = Fraction(0.0);
    pub const ONE: Fraction = Fraction(1.0);

    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Fraction(value)
    }

    /// Whether the value lies in the closed unit interval
    #[inline]
    pub fn is_unit(self) -> bool {
        (0.0..=1.0).contains(&self.0)
    }

    #[inline]
    #[must_use]
    pub fn to_percent(self) -> Percent {
        Percent(self.0 * 100.0)
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kg_co2_arithmetic() {
        let mut balance = KgCo2::ZERO;
        balance += KgCo2::new(10.0);
        balance -= KgCo2::new(2.5);
        assert_eq!(*balance, 7.5);
        assert_eq!(*(-balance), -7.5);
        assert!(KgCo2::new(1.0) < KgCo2::new(2.0));
    }

    #[test]
    fn test_fraction_bounds() {
        assert!(Fraction::new(0.0).is_unit());
        assert!(Fraction::new(1.0).is_unit());
        assert!(!Fraction::new(1.01).is_unit());
        assert!(!Fraction::new(-0.1).is_unit());
        assert_eq!(Fraction::new(0.35).to_percent(), Percent::new(35.0));
    }
}
