// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed-point USD amounts.
//!
//! Amounts are integer picodollars (1e-12 USD), so summing any number of
//! entries in any order produces the same total.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;

const PICOS_PER_USD: f64 = 1e12;

/// A non-negative USD amount with picodollar resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Usd(u64);

impl Usd {
    pub const ZERO: Usd = Usd(0);

    pub const fn from_picodollars(picos: u64) -> Self {
        Usd(picos)
    }

    /// Round a dollar value to the nearest picodollar. Negative and NaN
    /// inputs clamp to zero.
    pub fn from_usd(usd: f64) -> Self {
        Usd((usd * PICOS_PER_USD).round() as u64)
    }

    pub const fn picodollars(self) -> u64 {
        self.0
    }

    pub fn as_usd(self) -> f64 {
        self.0 as f64 / PICOS_PER_USD
    }
}

impl From<u64> for Usd {
    fn from(picos: u64) -> Self {
        Usd(picos)
    }
}

impl Add for Usd {
    type Output = Usd;

    fn add(self, rhs: Usd) -> Usd {
        Usd(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Usd {
    fn sum<I: Iterator<Item = Usd>>(iter: I) -> Usd {
        iter.fold(Usd::ZERO, Add::add)
    }
}

impl fmt::Display for Usd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision().unwrap_or(6);
        write!(f, "${:.*}", precision, self.as_usd())
    }
}
