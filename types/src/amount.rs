//! Token amount type.
//!
//! Amounts are fixed-point integers with 18 fractional digits, stored as raw
//! units in a `u128`. Arithmetic is checked only: there are no operator impls
//! that could wrap or panic, so every caller has to decide what an overflow
//! means at its own call site.

use crate::error::ParseError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A token amount in raw units (1 whole token = 10^18 raw).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenAmount(u128);

impl TokenAmount {
    pub const ZERO: Self = Self(0);
    pub const DECIMALS: u32 = 18;
    /// Raw units per whole token.
    pub const UNIT: u128 = 1_000_000_000_000_000_000;

    pub fn from_raw(raw: u128) -> Self {
        Self(raw)
    }

    /// `n` whole tokens. Cannot overflow: `u64::MAX * 10^18 < u128::MAX`.
    pub fn whole(n: u64) -> Self {
        Self(n as u128 * Self::UNIT)
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// `self * numerator / denominator`, or `None` on overflow or a zero denominator.
    pub fn checked_mul_div(self, numerator: u128, denominator: u128) -> Option<Self> {
        if denominator == 0 {
            return None;
        }
        self.0.checked_mul(numerator).map(|v| Self(v / denominator))
    }

    /// Parse a human decimal such as `"100"`, `"0.5"` or `"1000000.000000000000000001"`.
    pub fn parse_decimal(s: &str) -> Result<Self, ParseError> {
        let s = s.trim();
        let (int_part, frac_part) = match s.split_once('.') {
            Some((i, f)) => (i, f),
            None => (s, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(ParseError::InvalidAmount(s.to_string()));
        }
        if frac_part.len() > Self::DECIMALS as usize {
            return Err(ParseError::TooManyDecimals(frac_part.len()));
        }
        let all_digits = |p: &str| p.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(int_part) || !all_digits(frac_part) {
            return Err(ParseError::InvalidAmount(s.to_string()));
        }

        let whole: u128 = if int_part.is_empty() {
            0
        } else {
            int_part
                .parse()
                .map_err(|_| ParseError::InvalidAmount(s.to_string()))?
        };
        let mut frac: u128 = 0;
        if !frac_part.is_empty() {
            frac = frac_part
                .parse()
                .map_err(|_| ParseError::InvalidAmount(s.to_string()))?;
            frac *= 10u128.pow(Self::DECIMALS - frac_part.len() as u32);
        }
        whole
            .checked_mul(Self::UNIT)
            .and_then(|w| w.checked_add(frac))
            .map(Self)
            .ok_or(ParseError::AmountOverflow)
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / Self::UNIT;
        let frac = self.0 % Self::UNIT;
        if frac == 0 {
            return write!(f, "{whole}");
        }
        let digits = format!("{:018}", frac);
        write!(f, "{whole}.{}", digits.trim_end_matches('0'))
    }
}

impl FromStr for TokenAmount {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_decimal(s)
    }
}

impl Serialize for TokenAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TokenAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse_decimal(&s).map_err(serde::de::Error::custom)
    }
}
