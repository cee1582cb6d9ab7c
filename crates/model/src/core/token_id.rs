use primitive_types::U256;
use serde::{Serialize, Serializer};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Hex digits in a 256-bit value.
const MAX_HEX_DIGITS: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenIdError {
    #[error("Token id is empty")]
    Empty,

    #[error("Invalid digit '{0}' in token id")]
    InvalidDigit(char),

    #[error("Token id does not fit in 256 bits")]
    Overflow,
}

/// ERC-721 token identifier (`uint256`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenId(U256);

impl TokenId {
    /// Parses a hex string with or without the `0x` prefix, as found in log topics.
    pub fn from_hex(s: &str) -> Result<Self, TokenIdError> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if digits.is_empty() {
            return Err(TokenIdError::Empty);
        }
        if let Some(c) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(TokenIdError::InvalidDigit(c));
        }

        // Leading zeros do not count against the width.
        let digits = digits.trim_start_matches('0');
        if digits.is_empty() {
            return Ok(TokenId::default());
        }
        if digits.len() > MAX_HEX_DIGITS {
            return Err(TokenIdError::Overflow);
        }

        U256::from_str_radix(digits, 16)
            .map(TokenId)
            .map_err(|_| TokenIdError::Overflow)
    }

    fn from_decimal(s: &str) -> Result<Self, TokenIdError> {
        if s.is_empty() {
            return Err(TokenIdError::Empty);
        }
        if let Some(c) = s.chars().find(|c| !c.is_ascii_digit()) {
            return Err(TokenIdError::InvalidDigit(c));
        }

        U256::from_dec_str(s)
            .map(TokenId)
            .map_err(|_| TokenIdError::Overflow)
    }
}

impl From<u64> for TokenId {
    fn from(value: u64) -> Self {
        TokenId(U256::from(value))
    }
}

impl FromStr for TokenId {
    type Err = TokenIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with("0x") || s.starts_with("0X") {
            TokenId::from_hex(s)
        } else {
            TokenId::from_decimal(s)
        }
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Decimal string, so ids beyond `u64` survive JSON consumers.
impl Serialize for TokenId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
