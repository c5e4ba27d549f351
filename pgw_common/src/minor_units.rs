use std::fmt::Display;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::op;

/// Number of minor units (cents, fen) in one major currency unit for every currency the gateway handles.
pub const MINOR_UNITS_PER_MAJOR: i64 = 100;

//--------------------------------------     MinorUnits       ---------------------------------------------------------
/// An amount of money expressed as an integer count of minor currency units, e.g. cents.
///
/// Providers disagree on how amounts travel over the wire: some want `"34.50"`, others want `3450`. `MinorUnits`
/// is the exact intermediate both encodings are produced from, so that rounding happens exactly once.
///
/// Arithmetic is overflow-checked only. An amount that leaves the `i64` range is a conversion error, never a panic or
/// a wrapped value.
#[derive(Debug, Clone, Copy, Default, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MinorUnits(i64);

op!(checked MinorUnits, checked_add, MinorUnitsConversionError);
op!(checked MinorUnits, checked_sub, MinorUnitsConversionError);

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented in minor currency units: {0}")]
pub struct MinorUnitsConversionError(String);

impl From<i64> for MinorUnits {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl PartialEq for MinorUnits {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for MinorUnits {}

impl TryFrom<f64> for MinorUnits {
    type Error = MinorUnitsConversionError;

    /// Converts an amount in major units (e.g. dollars) to minor units, rounding half away from zero.
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::from_scaled((value * MINOR_UNITS_PER_MAJOR as f64).round())
            .map_err(|_| MinorUnitsConversionError(format!("{value} is not a representable amount")))
    }
}

impl Display for MinorUnits {
    /// Formats as a decimal string with exactly two fractional digits, e.g. `34.50`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let per_major = MINOR_UNITS_PER_MAJOR.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / per_major, abs % per_major)
    }
}

impl MinorUnits {
    pub fn value(&self) -> i64 {
        self.0
    }

    /// Multiplies by a quantity, e.g. a unit price by the number of units.
    pub fn checked_mul(self, quantity: i64) -> Result<Self, MinorUnitsConversionError> {
        self.0
            .checked_mul(quantity)
            .map(Self)
            .ok_or_else(|| MinorUnitsConversionError(format!("{self} x {quantity} overflows")))
    }

    /// The amount as a two-decimal string. Equivalent to `to_string()`.
    pub fn to_decimal_string(&self) -> String {
        self.to_string()
    }

    // `i64::MAX as f64` rounds up to 2^63, which is itself out of range.
    fn from_scaled(scaled: f64) -> Result<Self, MinorUnitsConversionError> {
        if !scaled.is_finite() || scaled.abs() >= i64::MAX as f64 {
            return Err(MinorUnitsConversionError(format!("{scaled} minor units")));
        }
        #[allow(clippy::cast_possible_truncation)]
        Ok(Self(scaled as i64))
    }
}
