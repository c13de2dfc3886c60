//! Measurement units

use std::{
    fmt,
    ops::{Add, Sub},
    str::FromStr,
};

use rust_decimal::{Decimal, prelude::ToPrimitive};

/// A length in inches, stored as an exact decimal.
///
/// Lash measurements and tolerance windows are given to a tenth of a mil
/// (0.0001 in), so all arithmetic stays in decimal space; binary floats
/// cannot represent these values exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Inches(Decimal);

impl Inches {
    /// A length of zero inches.
    pub const ZERO: Inches = Inches(Decimal::ZERO);

    /// Creates a length from a raw decimal value.
    #[must_use]
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the raw decimal value.
    #[must_use]
    pub const fn as_decimal(self) -> Decimal {
        self.0
    }

    /// Returns the absolute value.
    #[must_use]
    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    /// Quantizes the length to whole tenth-mils (0.0001 in), rounding
    /// half to even.
    ///
    /// Returns `None` if the result does not fit in an `i64`, which cannot
    /// happen for any physically plausible measurement.
    pub fn to_tenth_mils(self) -> Option<i64> {
        (self.0 * Decimal::from(10_000_u32)).round().to_i64()
    }
}

impl Add for Inches {
    type Output = Inches;

    fn add(self, rhs: Inches) -> Inches {
        Inches(self.0 + rhs.0)
    }
}

impl Sub for Inches {
    type Output = Inches;

    fn sub(self, rhs: Inches) -> Inches {
        Inches(self.0 - rhs.0)
    }
}

impl FromStr for Inches {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s).map(Inches)
    }
}

impl fmt::Display for Inches {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}
