// crates/trellis-economics/src/token.rs
//
// $TRL token amount type. The smallest unit is the base unit; 1 TRL = 10^9
// units. All internal accounting uses integer units.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// Number of base units in one TRL.
pub const UNITS_PER_TRL: u64 = 1_000_000_000;

/// A $TRL amount, wrapping a count of base units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Trl {
    pub units: u64,
}

impl Trl {
    /// Whole TRL. Saturates at u64::MAX units.
    pub const fn whole(trl: u64) -> Self {
        Self {
            units: trl.saturating_mul(UNITS_PER_TRL),
        }
    }

    pub const fn from_units(units: u64) -> Self {
        Self { units }
    }

    pub const fn zero() -> Self {
        Self { units: 0 }
    }
}

impl Add for Trl {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            units: self.units.saturating_add(rhs.units),
        }
    }
}

impl Sub for Trl {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            units: self.units.saturating_sub(rhs.units),
        }
    }
}

impl fmt::Display for Trl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.units / UNITS_PER_TRL;
        let frac = self.units % UNITS_PER_TRL;
        if frac == 0 {
            write!(f, "{} TRL", whole)
        } else {
            let frac_str = format!("{:09}", frac);
            let trimmed = frac_str.trim_end_matches('0');
            write!(f, "{}.{} TRL", whole, trimmed)
        }
    }
}
