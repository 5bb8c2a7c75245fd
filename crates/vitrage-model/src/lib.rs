#![forbid(unsafe_code)]

pub mod catalog;
pub mod contact;
pub mod ids;
pub mod money;
pub mod quote;

pub use catalog::{
    builtin_catalog, Catalog, ConfigOption, Dimension, OptionChoice, Product, SpecRow,
    DIMENSION_MAX_MM, DIMENSION_MIN_MM,
};
pub use contact::{CustomerName, DutchPostalCode, Email, Phone};
pub use ids::{ProductId, QuoteId};
pub use money::Cents;
pub use quote::{
    Address, ContactChannel, Customer, Quote, QuoteLine, QuoteRequestData, MESSAGE_MAX_LEN,
    QUANTITY_MAX,
};

use std::fmt::{Display, Formatter};

pub const CRATE_NAME: &str = "vitrage-model";

/// Field-scoped validation failure raised by the parsing constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseError {
    Empty(&'static str),
    Trimmed(&'static str),
    TooShort(&'static str, usize),
    TooLong(&'static str, usize),
    OutOfRange(&'static str, i64, i64),
    InvalidFormat(&'static str),
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty(name) => write!(f, "{name} must not be empty"),
            Self::Trimmed(name) => {
                write!(f, "{name} must not contain leading/trailing whitespace")
            }
            Self::TooShort(name, min) => write!(f, "{name} is below min length {min}"),
            Self::TooLong(name, max) => write!(f, "{name} exceeds max length {max}"),
            Self::OutOfRange(name, min, max) => {
                write!(f, "{name} must be between {min} and {max}")
            }
            Self::InvalidFormat(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for ParseError {}
