//! Bitcoin amounts
//!
//! Lightning transfers are always denominated in whole satoshis, while the
//! natural display unit is the bitcoin. [`Bitcoin`] keeps the satoshi count as
//! its backing integer so that converting to and from the display unit never
//! loses a sat.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};

/// Number of satoshis in one bitcoin.
pub const SATS_PER_BTC: i64 = 100_000_000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bitcoin {
    sats: i64,
}

impl Bitcoin {
    pub const ZERO: Bitcoin = Bitcoin { sats: 0 };

    pub const fn from_sats(sats: i64) -> Self {
        Self { sats }
    }

    pub const fn to_sats(self) -> i64 {
        self.sats
    }

    /// Build an amount from a display-unit value, rounding to the nearest sat.
    pub fn from_btc(btc: f64) -> Self {
        Self {
            sats: (btc * SATS_PER_BTC as f64).round() as i64,
        }
    }

    pub fn to_btc(self) -> f64 {
        self.sats as f64 / SATS_PER_BTC as f64
    }
}

impl Add for Bitcoin {
    type Output = Bitcoin;

    fn add(self, rhs: Bitcoin) -> Bitcoin {
        Bitcoin::from_sats(self.sats + rhs.sats)
    }
}

impl AddAssign for Bitcoin {
    fn add_assign(&mut self, rhs: Bitcoin) {
        *self = *self + rhs;
    }
}

impl Sub for Bitcoin {
    type Output = Bitcoin;

    fn sub(self, rhs: Bitcoin) -> Bitcoin {
        Bitcoin::from_sats(self.sats - rhs.sats)
    }
}

impl Sum for Bitcoin {
    fn sum<I: Iterator<Item = Bitcoin>>(iter: I) -> Bitcoin {
        iter.fold(Bitcoin::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Bitcoin> for Bitcoin {
    fn sum<I: Iterator<Item = &'a Bitcoin>>(iter: I) -> Bitcoin {
        iter.copied().sum()
    }
}

impl fmt::Display for Bitcoin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = if self.sats == 1 { "sat" } else { "sats" };
        write!(f, "{} {}", group_thousands(self.sats), unit)
    }
}

fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
