// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use vitrage_model::{Cents, Product, Quote};
use vitrage_pricing::{format_eur, total_with_vat, vat_amount};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct QuoteAccepted {
    pub quote_id: String,
    pub received_at: u64,
    pub total_price: i64,
    pub total_with_vat: i64,
    pub estimated_response: String,
}

impl QuoteAccepted {
    #[must_use]
    pub fn from_quote(quote: &Quote, vat_rate_permille: i64, estimated_response: &str) -> Self {
        let net = quote.data.total_price;
        Self {
            quote_id: quote.id.as_str().to_string(),
            received_at: quote.received_at_millis,
            total_price: net.amount(),
            total_with_vat: total_with_vat(net, vat_rate_permille).amount(),
            estimated_response: estimated_response.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PricePreview {
    pub net: i64,
    pub vat: i64,
    pub gross: i64,
    pub formatted: String,
}

impl PricePreview {
    #[must_use]
    pub fn from_net(net: Cents, vat_rate_permille: i64) -> Self {
        let gross = total_with_vat(net, vat_rate_permille);
        Self {
            net: net.amount(),
            vat: vat_amount(net, vat_rate_permille).amount(),
            gross: gross.amount(),
            formatted: format_eur(gross),
        }
    }
}

/// Catalog listing entry: enough to render a product card, without the
/// option tables.
#[must_use]
pub fn product_summary(product: &Product) -> Value {
    json!({
        "id": product.id,
        "name": product.name,
        "category": product.category,
        "description": product.description,
        "basePrice": product.base_price.amount(),
        "basePriceFormatted": format_eur(product.base_price),
        "images": product.images,
    })
}

/// Full product payload for the configurator: option tables, specs and the
/// pricing strategy marker.
#[must_use]
pub fn product_detail(product: &Product) -> Value {
    let options: Vec<Value> = product
        .options
        .iter()
        .map(|option| {
            json!({
                "key": option.key,
                "label": option.label,
                "info": option.info,
                "required": option.required,
                "choices": option
                    .choices
                    .iter()
                    .map(|c| json!({"value": c.value, "label": c.label, "delta": c.delta.amount()}))
                    .collect::<Vec<Value>>(),
            })
        })
        .collect();
    json!({
        "id": product.id,
        "name": product.name,
        "category": product.category,
        "description": product.description,
        "basePrice": product.base_price.amount(),
        "ratePerM2": product.rate_per_m2.map(Cents::amount),
        "options": options,
        "specs": product.specs,
        "images": product.images,
    })
}
