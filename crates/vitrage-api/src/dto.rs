// SPDX-License-Identifier: Apache-2.0

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Quote submission payload as it arrives on the wire. Field names are
/// camelCase to match the configurator frontend; everything is plain data
/// here and validated in [`crate::convert`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct QuoteSubmission {
    pub customer: CustomerDto,
    pub lines: Vec<QuoteLineDto>,
    #[serde(default)]
    pub message: Option<String>,
    pub preferred_contact: String,
    pub total_price: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CustomerDto {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: AddressDto,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AddressDto {
    pub street: String,
    pub house_number: String,
    pub postal_code: String,
    pub city: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct QuoteLineDto {
    pub product_id: String,
    pub quantity: u32,
    pub width_mm: i64,
    pub height_mm: i64,
    #[serde(default, deserialize_with = "options_no_duplicates")]
    pub options: BTreeMap<String, String>,
}

/// Body of `POST /v1/products/{product_id}/price`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PricePreviewRequest {
    pub width_mm: i64,
    pub height_mm: i64,
    #[serde(default, deserialize_with = "options_no_duplicates")]
    pub options: BTreeMap<String, String>,
}

/// Map deserializer that rejects a repeated option key instead of letting
/// the last occurrence win. A duplicate in the raw JSON means the client
/// sent conflicting selections for the same option.
fn options_no_duplicates<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct OptionsVisitor;

    impl<'de> Visitor<'de> for OptionsVisitor {
        type Value = BTreeMap<String, String>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of option key to choice value")
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut options = BTreeMap::new();
            while let Some((key, value)) = access.next_entry::<String, String>()? {
                if options.insert(key.clone(), value).is_some() {
                    return Err(de::Error::custom(format!("duplicate option key: {key}")));
                }
            }
            Ok(options)
        }
    }

    deserializer.deserialize_map(OptionsVisitor)
}
