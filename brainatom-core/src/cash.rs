//! Exact monetary amounts.
//!
//! Provider rates are published as dollars per million tokens, so a per-token
//! rate like `$0.27 / 1M` is `0.00000027` dollars. `Cash` stores whole
//! picodollars, which keeps every catalog rate and every cost computed from
//! token counts exact.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::BrainError;

const DECIMALS: usize = 12;
const PICOS_PER_DOLLAR: u128 = 1_000_000_000_000;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cash {
    picos: u128,
}

impl Cash {
    pub const ZERO: Cash = Cash { picos: 0 };

    pub const fn from_picodollars(picos: u128) -> Self {
        Self { picos }
    }

    pub const fn picodollars(&self) -> u128 {
        self.picos
    }

    /// Parses a dollar amount such as `"$0.50"`, `"1.25"` or `"$0"`.
    pub fn parse(input: &str) -> Result<Self, BrainError> {
        let invalid = |reason: &str| {
            BrainError::InvalidConfig(format!("invalid cash amount '{input}': {reason}"))
        };

        let trimmed = input.trim();
        let digits = trimmed.strip_prefix('$').unwrap_or(trimmed);
        let (whole, fraction) = match digits.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (digits, ""),
        };

        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid("no digits"));
        }
        if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
            return Err(invalid("expected digits"));
        }
        if fraction.len() > DECIMALS {
            return Err(invalid("more precision than a picodollar"));
        }

        let whole: u128 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid("amount too large"))?
        };
        let fraction: u128 = if fraction.is_empty() {
            0
        } else {
            let padded = format!("{fraction:0<DECIMALS$}");
            padded.parse().map_err(|_| invalid("expected digits"))?
        };

        whole
            .checked_mul(PICOS_PER_DOLLAR)
            .and_then(|picos| picos.checked_add(fraction))
            .map(Self::from_picodollars)
            .ok_or_else(|| invalid("amount too large"))
    }

    /// Converts a "dollars per million tokens" price into a per-token rate.
    pub fn per_million(price: &str) -> Result<Self, BrainError> {
        let total = Self::parse(price)?;
        if total.picos % 1_000_000 != 0 {
            return Err(BrainError::InvalidConfig(format!(
                "price '{price}' per million tokens is not a whole number of picodollars per token"
            )));
        }
        Ok(Self::from_picodollars(total.picos / 1_000_000))
    }
}

impl Add for Cash {
    type Output = Cash;

    fn add(self, rhs: Cash) -> Cash {
        Cash::from_picodollars(self.picos.saturating_add(rhs.picos))
    }
}

impl Mul<u64> for Cash {
    type Output = Cash;

    fn mul(self, count: u64) -> Cash {
        Cash::from_picodollars(self.picos.saturating_mul(u128::from(count)))
    }
}

impl Sum for Cash {
    fn sum<I: Iterator<Item = Cash>>(iter: I) -> Cash {
        iter.fold(Cash::ZERO, Add::add)
    }
}

impl fmt::Display for Cash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.picos / PICOS_PER_DOLLAR;
        let fraction = self.picos % PICOS_PER_DOLLAR;
        if fraction == 0 {
            return write!(f, "${whole}");
        }
        let fraction = format!("{fraction:0>DECIMALS$}");
        write!(f, "${whole}.{}", fraction.trim_end_matches('0'))
    }
}

impl FromStr for Cash {
    type Err = BrainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Cash::parse(s)
    }
}

impl Serialize for Cash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Cash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Cash::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dollar_strings() {
        assert_eq!(Cash::parse("$0").unwrap(), Cash::ZERO);
        assert_eq!(
            Cash::parse("$0.50").unwrap().picodollars(),
            500_000_000_000
        );
        assert_eq!(Cash::parse("1.25").unwrap().picodollars(), 1_250_000_000_000);
        assert_eq!(Cash::parse("$.5").unwrap(), Cash::parse("$0.5").unwrap());
    }

    #[test]
    fn rejects_malformed_amounts() {
        assert!(Cash::parse("").is_err());
        assert!(Cash::parse("$").is_err());
        assert!(Cash::parse("$1,00").is_err());
        assert!(Cash::parse("-1").is_err());
        assert!(Cash::parse("0.0000000000001").is_err());
    }

    #[test]
    fn per_million_divides_exactly() {
        let rate = Cash::per_million("$0.27").unwrap();
        assert_eq!(rate.picodollars(), 270_000);
        assert_eq!(rate * 1_000_000, Cash::parse("$0.27").unwrap());
    }

    #[test]
    fn display_trims_trailing_zeros() {
        assert_eq!(Cash::from_picodollars(16_000_000).to_string(), "$0.000016");
        assert_eq!(Cash::parse("$2").unwrap().to_string(), "$2");
        assert_eq!(Cash::parse("$1.20").unwrap().to_string(), "$1.2");
    }

    #[test]
    fn serializes_as_dollar_string() {
        let cash = Cash::parse("$0.000016").unwrap();
        let value = serde_json::to_value(cash).unwrap();
        assert_eq!(value, serde_json::json!("$0.000016"));
        let back: Cash = serde_json::from_value(value).unwrap();
        assert_eq!(back, cash);
    }
}
