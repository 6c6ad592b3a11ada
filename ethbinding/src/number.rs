//! Canonical arbitrary precision number type for decoded contract values.
//!
//! [`BigNumber`] is a sign and a 256-bit magnitude, so it can represent every
//! Solidity `uintN` and `intN` value without loss.

use serde::de::{Deserializer, Error as _};
use serde::{Deserialize, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter, LowerHex};
use std::str::FromStr;
use thiserror::Error;
use web3::types::U256;

/// An error parsing a [`BigNumber`].
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("invalid big number '{0}'")]
pub struct ParseBigNumberError(pub String);

/// A signed integer with a 256-bit magnitude.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct BigNumber {
    negative: bool,
    magnitude: U256,
}

impl BigNumber {
    /// Creates a number from a sign and magnitude. Zero is never negative.
    pub fn new(negative: bool, magnitude: U256) -> Self {
        BigNumber {
            negative: negative && !magnitude.is_zero(),
            magnitude,
        }
    }

    /// Interprets a 256-bit word as a two's complement signed integer.
    pub fn from_twos_complement(value: U256) -> Self {
        if value.bit(255) {
            let (magnitude, _) = (!value).overflowing_add(U256::one());
            BigNumber::new(true, magnitude)
        } else {
            BigNumber::new(false, value)
        }
    }

    /// Returns true if the number is strictly less than zero.
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Returns true if the number is zero.
    pub fn is_zero(&self) -> bool {
        self.magnitude.is_zero()
    }

    /// Returns the absolute value.
    pub fn magnitude(&self) -> U256 {
        self.magnitude
    }

    /// Returns the value as an unsigned integer if it is not negative.
    pub fn to_u256(&self) -> Option<U256> {
        if self.negative {
            None
        } else {
            Some(self.magnitude)
        }
    }

    /// Returns the `0x` prefixed hexadecimal representation, with a leading
    /// `-` for negative numbers.
    pub fn to_hex_string(&self) -> String {
        let sign = if self.negative { "-" } else { "" };
        format!("{}0x{:x}", sign, self.magnitude)
    }
}

impl From<U256> for BigNumber {
    fn from(value: U256) -> Self {
        BigNumber::new(false, value)
    }
}

impl From<u64> for BigNumber {
    fn from(value: u64) -> Self {
        BigNumber::new(false, value.into())
    }
}

impl From<i64> for BigNumber {
    fn from(value: i64) -> Self {
        BigNumber::new(value < 0, value.unsigned_abs().into())
    }
}

impl FromStr for BigNumber {
    type Err = ParseBigNumberError;

    /// Parses a decimal or `0x` prefixed hexadecimal string with an optional
    /// leading minus sign.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseBigNumberError(s.to_owned());

        let trimmed = s.trim();
        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        let magnitude = match unsigned
            .strip_prefix("0x")
            .or_else(|| unsigned.strip_prefix("0X"))
        {
            Some(digits) => {
                if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
                    return Err(err());
                }
                U256::from_str_radix(digits, 16).map_err(|_| err())?
            }
            None => {
                if unsigned.is_empty() || !unsigned.chars().all(|c| c.is_ascii_digit()) {
                    return Err(err());
                }
                U256::from_dec_str(unsigned).map_err(|_| err())?
            }
        };

        Ok(BigNumber::new(negative, magnitude))
    }
}

impl Display for BigNumber {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        Display::fmt(&self.magnitude, f)
    }
}

impl LowerHex for BigNumber {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        LowerHex::fmt(&self.magnitude, f)
    }
}

impl Ord for BigNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.negative, other.negative) {
            (false, false) => self.magnitude.cmp(&other.magnitude),
            (true, true) => other.magnitude.cmp(&self.magnitude),
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
        }
    }
}

impl PartialOrd for BigNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Serialize for BigNumber {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// The structural shapes a big number can be constructed from.
#[derive(Deserialize)]
#[serde(untagged)]
enum Repr {
    String(String),
    Unsigned(u64),
    Signed(i64),
    Object {
        #[serde(alias = "_hex")]
        hex: String,
    },
}

impl<'de> Deserialize<'de> for BigNumber {
    /// Accepts decimal or hex strings, integer numbers and objects carrying a
    /// `hex` (or `_hex`) string field, as serialized by common JavaScript big
    /// number libraries.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Repr::deserialize(deserializer)? {
            Repr::String(s) | Repr::Object { hex: s } => s.parse().map_err(D::Error::custom),
            Repr::Unsigned(value) => Ok(value.into()),
            Repr::Signed(value) => Ok(value.into()),
        }
    }
}
