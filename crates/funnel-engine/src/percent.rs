use std::fmt::{self, Display};
use std::str::FromStr;

use funnel_core::errors::{ErrorInfo, FunnelError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Percentage with one fractional digit, stored as whole tenths.
///
/// The value is `part / whole * 100` evaluated in `f64`, then rounded to the
/// nearest tenth using the exact binary value of that double, with ties
/// going to the larger tenth. This is the rule dashboards apply when they
/// format a rate to one decimal, so `23 / 80` renders as `28.7`. Values above
/// 100 are representable for out-of-order funnel data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Percentage {
    tenths: u64,
}

impl Percentage {
    /// The `"0.0"` percentage.
    pub const ZERO: Percentage = Percentage { tenths: 0 };
    /// The `"100.0"` percentage.
    pub const HUNDRED: Percentage = Percentage { tenths: 1000 };

    /// Returns `part / whole * 100`, or zero when `whole` is zero.
    pub fn ratio(part: usize, whole: usize) -> Self {
        if whole == 0 {
            return Self::ZERO;
        }
        let value = part as f64 / whole as f64 * 100.0;
        Self {
            tenths: round_to_tenths(value),
        }
    }

    /// Number of tenths of a percent.
    pub fn tenths(self) -> u64 {
        self.tenths
    }
}

/// Rounds a finite non-negative double to the nearest tenth, ties up.
///
/// Works on the mantissa and exponent directly so that `x * 10` is never
/// rounded before the tie check.
fn round_to_tenths(value: f64) -> u64 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    let bits = value.to_bits();
    let exponent_bits = ((bits >> 52) & 0x7ff) as i32;
    let fraction = bits & ((1u64 << 52) - 1);
    let (mantissa, exponent) = if exponent_bits == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), exponent_bits - 1075)
    };
    // value * 10 == scaled * 2^exponent, exactly.
    let scaled = u128::from(mantissa) * 10;
    let tenths = if exponent >= 0 {
        scaled.checked_shl(exponent as u32).unwrap_or(u128::MAX)
    } else {
        let shift = exponent.unsigned_abs();
        if shift > 64 {
            // scaled < 2^57, so the value is below half a tenth.
            0
        } else {
            let quotient = scaled >> shift;
            let remainder = scaled & ((1u128 << shift) - 1);
            let half = 1u128 << (shift - 1);
            quotient + u128::from(remainder >= half)
        }
    };
    u64::try_from(tenths).unwrap_or(u64::MAX)
}

impl Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.tenths / 10, self.tenths % 10)
    }
}

impl FromStr for Percentage {
    type Err = FunnelError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            FunnelError::Decode(
                ErrorInfo::new("funnel.percentage", "expected a percentage like \"12.5\"")
                    .with_context("value", raw),
            )
        };
        let (whole, fraction) = raw.split_once('.').ok_or_else(invalid)?;
        if fraction.len() != 1 {
            return Err(invalid());
        }
        let whole: u64 = whole.parse().map_err(|_| invalid())?;
        let fraction: u64 = fraction.parse().map_err(|_| invalid())?;
        let tenths = whole
            .checked_mul(10)
            .and_then(|tenths| tenths.checked_add(fraction))
            .ok_or_else(invalid)?;
        Ok(Self { tenths })
    }
}

impl Serialize for Percentage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Percentage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
