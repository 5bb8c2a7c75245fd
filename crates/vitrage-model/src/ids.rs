// SPDX-License-Identifier: Apache-2.0

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub const PRODUCT_ID_MAX_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
#[non_exhaustive]
pub struct ProductId(String);

impl ProductId {
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        if input.is_empty() {
            return Err(ParseError::Empty("product_id"));
        }
        if input.trim() != input {
            return Err(ParseError::Trimmed("product_id"));
        }
        if input.len() > PRODUCT_ID_MAX_LEN {
            return Err(ParseError::TooLong("product_id", PRODUCT_ID_MAX_LEN));
        }
        if !input
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
        {
            return Err(ParseError::InvalidFormat(
                "product_id must be lowercase kebab-case",
            ));
        }
        Ok(Self(input.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque, human-readable quote identifier: `Q-<base36 millis>-<base36 entropy>`.
/// Readable in mail threads and logs; uniqueness is best-effort, not
/// cryptographic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
#[non_exhaustive]
pub struct QuoteId(String);

impl QuoteId {
    #[must_use]
    pub fn mint(unix_millis: u64, entropy: u64) -> Self {
        Self(format!(
            "Q-{}-{}",
            to_base36(unix_millis),
            to_base36(entropy)
        ))
    }

    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let mut parts = input.split('-');
        let ok = parts.next() == Some("Q")
            && parts.clone().count() == 2
            && parts.all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_alphanumeric()));
        if !ok {
            return Err(ParseError::InvalidFormat(
                "quote_id must look like Q-<base36>-<base36>",
            ));
        }
        Ok(Self(input.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for QuoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut buf = Vec::with_capacity(13);
    while value > 0 {
        buf.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    buf.reverse();
    String::from_utf8(buf).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_id_rejects_uppercase_and_whitespace() {
        assert!(ProductId::parse("rolgordijn-basic").is_ok());
        assert!(ProductId::parse("Rolgordijn").is_err());
        assert!(ProductId::parse(" rolgordijn").is_err());
        assert!(ProductId::parse("").is_err());
    }

    #[test]
    fn quote_id_shape_roundtrips_through_parse() {
        let id = QuoteId::mint(1_700_000_000_000, 123_456_789);
        assert!(id.as_str().starts_with("Q-"));
        assert_eq!(QuoteId::parse(id.as_str()), Ok(id));
        assert!(QuoteId::parse("Q--x").is_err());
        assert!(QuoteId::parse("quote-1").is_err());
    }

    #[test]
    fn base36_encodes_known_values() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
    }
}
