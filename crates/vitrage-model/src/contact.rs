// SPDX-License-Identifier: Apache-2.0

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub const NAME_MIN_LEN: usize = 2;
pub const NAME_MAX_LEN: usize = 120;
pub const EMAIL_MAX_LEN: usize = 254;
pub const PHONE_MIN_DIGITS: usize = 10;
pub const PHONE_MAX_DIGITS: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
#[non_exhaustive]
pub struct CustomerName(String);

impl CustomerName {
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ParseError::Empty("name"));
        }
        if trimmed.chars().count() < NAME_MIN_LEN {
            return Err(ParseError::TooShort("name", NAME_MIN_LEN));
        }
        if trimmed.chars().count() > NAME_MAX_LEN {
            return Err(ParseError::TooLong("name", NAME_MAX_LEN));
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
#[non_exhaustive]
pub struct Email(String);

impl Email {
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        if input.is_empty() {
            return Err(ParseError::Empty("email"));
        }
        if input.len() > EMAIL_MAX_LEN {
            return Err(ParseError::TooLong("email", EMAIL_MAX_LEN));
        }
        if input.chars().any(char::is_whitespace) {
            return Err(ParseError::InvalidFormat(
                "email must not contain whitespace",
            ));
        }
        let Some((local, domain)) = input.split_once('@') else {
            return Err(ParseError::InvalidFormat("email must contain '@'"));
        };
        if local.is_empty() || domain.contains('@') {
            return Err(ParseError::InvalidFormat(
                "email must have exactly one '@' with a non-empty local part",
            ));
        }
        if !domain.contains('.') || domain.split('.').any(str::is_empty) {
            return Err(ParseError::InvalidFormat(
                "email domain must contain a dot with no empty labels",
            ));
        }
        Ok(Self(input.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
#[non_exhaustive]
pub struct Phone(String);

impl Phone {
    /// Accepts common formatting (`+31 6 1234 5678`, `(070) 123-4567`); the
    /// stored value keeps the caller's formatting.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ParseError::Empty("phone"));
        }
        let mut digits = 0usize;
        for c in trimmed.chars() {
            match c {
                '0'..='9' => digits += 1,
                ' ' | '+' | '-' | '(' | ')' => {}
                _ => {
                    return Err(ParseError::InvalidFormat(
                        "phone may contain digits, spaces, '+', '-', '(' and ')' only",
                    ))
                }
            }
        }
        if digits < PHONE_MIN_DIGITS {
            return Err(ParseError::TooShort("phone", PHONE_MIN_DIGITS));
        }
        if digits > PHONE_MAX_DIGITS {
            return Err(ParseError::TooLong("phone", PHONE_MAX_DIGITS));
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Dutch postal code, canonicalized to `1234 AB`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[non_exhaustive]
pub struct DutchPostalCode(String);

impl DutchPostalCode {
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let compact: String = input.trim().chars().filter(|c| *c != ' ').collect();
        let bytes = compact.as_bytes();
        if bytes.len() != 6 {
            return Err(ParseError::InvalidFormat(
                "postal code must be 4 digits followed by 2 letters",
            ));
        }
        let (digits, letters) = bytes.split_at(4);
        if !digits.iter().all(u8::is_ascii_digit) || digits[0] == b'0' {
            return Err(ParseError::InvalidFormat(
                "postal code digits must be 1000-9999",
            ));
        }
        if !letters.iter().all(u8::is_ascii_alphabetic) {
            return Err(ParseError::InvalidFormat(
                "postal code must end in two letters",
            ));
        }
        let canonical = format!(
            "{} {}{}",
            std::str::from_utf8(digits).unwrap_or_default(),
            letters[0].to_ascii_uppercase() as char,
            letters[1].to_ascii_uppercase() as char
        );
        Ok(Self(canonical))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for DutchPostalCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn postal_code_accepts_with_and_without_space() {
        assert_eq!(
            DutchPostalCode::parse("1234 AB").expect("spaced").as_str(),
            "1234 AB"
        );
        assert_eq!(
            DutchPostalCode::parse("1234AB").expect("compact").as_str(),
            "1234 AB"
        );
        assert_eq!(
            DutchPostalCode::parse("1234ab").expect("lowercase").as_str(),
            "1234 AB"
        );
    }

    #[test]
    fn postal_code_rejects_malformed_input() {
        assert!(DutchPostalCode::parse("AB1234").is_err());
        assert!(DutchPostalCode::parse("12345").is_err());
        assert!(DutchPostalCode::parse("0123 AB").is_err());
        assert!(DutchPostalCode::parse("1234 A1").is_err());
        assert!(DutchPostalCode::parse("").is_err());
    }

    #[test]
    fn email_requires_dotted_domain() {
        assert!(Email::parse("a@b.nl").is_ok());
        assert!(Email::parse("a@b").is_err());
        assert!(Email::parse("a b@c.nl").is_err());
        assert!(Email::parse("@c.nl").is_err());
        assert!(Email::parse("a@c..nl").is_err());
    }

    #[test]
    fn phone_counts_digits_not_formatting() {
        assert!(Phone::parse("+31 6 1234 5678").is_ok());
        assert!(Phone::parse("(070) 123-4567").is_ok());
        assert!(Phone::parse("0612345678").is_ok());
        assert!(Phone::parse("070-123-456").is_err());
        assert!(Phone::parse("06 abc").is_err());
    }

    #[test]
    fn name_is_trimmed_and_bounded() {
        assert_eq!(
            CustomerName::parse("  Jan de Vries ").expect("name").as_str(),
            "Jan de Vries"
        );
        assert!(CustomerName::parse("J").is_err());
        assert!(CustomerName::parse("   ").is_err());
    }
}
