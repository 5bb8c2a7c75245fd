// SPDX-License-Identifier: Apache-2.0

use crate::contact::{CustomerName, DutchPostalCode, Email, Phone};
use crate::ids::{ProductId, QuoteId};
use crate::money::Cents;
use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const MESSAGE_MAX_LEN: usize = 2000;
pub const QUANTITY_MAX: u32 = 99;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactChannel {
    Email,
    Phone,
}

impl ContactChannel {
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        match raw {
            "email" => Ok(Self::Email),
            "phone" => Ok(Self::Phone),
            _ => Err(ParseError::InvalidFormat(
                "contact channel must be 'email' or 'phone'",
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Customer {
    pub name: CustomerName,
    pub email: Email,
    pub phone: Phone,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Address {
    pub street: String,
    pub house_number: String,
    pub postal_code: DutchPostalCode,
    pub city: String,
}

/// One configured product in a quote request. The selection maps option key
/// to the chosen choice value; the price is the server-computed unit price
/// times quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuoteLine {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub width_mm: i64,
    pub height_mm: i64,
    pub selection: BTreeMap<String, String>,
    pub line_price: Cents,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuoteRequestData {
    pub customer: Customer,
    pub address: Address,
    pub lines: Vec<QuoteLine>,
    pub message: Option<String>,
    pub preferred_contact: ContactChannel,
    pub total_price: Cents,
}

impl QuoteRequestData {
    /// Structural checks the field-level constructors cannot see.
    pub fn validate(&self) -> Result<(), ParseError> {
        if self.lines.is_empty() {
            return Err(ParseError::Empty("lines"));
        }
        for line in &self.lines {
            if line.quantity == 0 || line.quantity > QUANTITY_MAX {
                return Err(ParseError::OutOfRange("quantity", 1, QUANTITY_MAX as i64));
            }
        }
        if self
            .message
            .as_ref()
            .is_some_and(|m| m.chars().count() > MESSAGE_MAX_LEN)
        {
            return Err(ParseError::TooLong("message", MESSAGE_MAX_LEN));
        }
        let computed: Cents = self.lines.iter().map(|l| l.line_price).sum();
        if computed != self.total_price {
            return Err(ParseError::InvalidFormat(
                "total_price must equal the sum of line prices",
            ));
        }
        Ok(())
    }
}

/// An accepted quote request: validated payload plus the identity the
/// service assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Quote {
    pub id: QuoteId,
    pub received_at_millis: u64,
    pub data: QuoteRequestData,
}

impl Quote {
    #[must_use]
    pub fn new(id: QuoteId, received_at_millis: u64, data: QuoteRequestData) -> Self {
        Self {
            id,
            received_at_millis,
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_data(lines: Vec<QuoteLine>, total: Cents) -> QuoteRequestData {
        QuoteRequestData {
            customer: Customer {
                name: CustomerName::parse("Jan de Vries").expect("name"),
                email: Email::parse("jan@devries.nl").expect("email"),
                phone: Phone::parse("0612345678").expect("phone"),
            },
            address: Address {
                street: "Lindenlaan".to_string(),
                house_number: "12a".to_string(),
                postal_code: DutchPostalCode::parse("2511 CV").expect("postal"),
                city: "Den Haag".to_string(),
            },
            lines,
            message: None,
            preferred_contact: ContactChannel::Email,
            total_price: total,
        }
    }

    fn sample_line(price: Cents) -> QuoteLine {
        QuoteLine {
            product_id: ProductId::parse("rolgordijn-basic").expect("id"),
            product_name: "Rolgordijn Basic".to_string(),
            quantity: 1,
            width_mm: 800,
            height_mm: 1200,
            selection: BTreeMap::new(),
            line_price: price,
        }
    }

    #[test]
    fn total_must_match_line_sum() {
        let ok = sample_data(vec![sample_line(Cents::from_euros(199))], Cents::from_euros(199));
        ok.validate().expect("consistent totals");

        let bad = sample_data(vec![sample_line(Cents::from_euros(199))], Cents::from_euros(198));
        assert!(bad.validate().is_err());
    }

    #[test]
    fn empty_lines_are_rejected() {
        let data = sample_data(vec![], Cents::ZERO);
        assert_eq!(data.validate(), Err(ParseError::Empty("lines")));
    }

    #[test]
    fn quantity_bounds_are_enforced() {
        let mut line = sample_line(Cents::from_euros(100));
        line.quantity = 0;
        let data = sample_data(vec![line], Cents::from_euros(100));
        assert!(data.validate().is_err());
    }
}
