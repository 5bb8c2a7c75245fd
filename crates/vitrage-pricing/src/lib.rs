#![forbid(unsafe_code)]

//! Pure price computation for the vitrage catalog.
//!
//! Two strategies co-exist, mirroring how the configurator pages price
//! products: banded option tables (each width/height step carries a fixed
//! delta) and the continuous area formula (`width * height * rate`). A
//! product selects its strategy through `rate_per_m2`; both clamp the result
//! at the base price so a customer is never quoted below the advertised
//! starting price.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use vitrage_model::{Cents, Dimension, Product};

pub const CRATE_NAME: &str = "vitrage-pricing";

/// Dutch VAT, carried in permille to keep the arithmetic in integers.
pub const DEFAULT_VAT_RATE_PERMILLE: i64 = 210;

const MM2_PER_M2: i64 = 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PricingError {
    InvalidDimension(&'static str),
    InvalidPrice(&'static str),
    UnknownOption(String),
    UnknownChoice { option: String, value: String },
    MissingOption(String),
}

impl Display for PricingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDimension(name) => write!(f, "invalid dimension: {name}"),
            Self::InvalidPrice(name) => write!(f, "invalid price input: {name}"),
            Self::UnknownOption(key) => write!(f, "unknown option: {key}"),
            Self::UnknownChoice { option, value } => {
                write!(f, "unknown choice {value} for option {option}")
            }
            Self::MissingOption(key) => write!(f, "required option not selected: {key}"),
        }
    }
}

impl std::error::Error for PricingError {}

/// Continuous area surcharge: `width * height * rate`, fixed-point,
/// rounded half-up to whole cents.
#[must_use]
pub fn area_surcharge(width: Dimension, height: Dimension, rate_per_m2: Cents) -> Cents {
    let area_mm2 = width.millimeters() * height.millimeters();
    rate_per_m2.mul_div_round(area_mm2, MM2_PER_M2)
}

/// The general price calculator: base price plus area surcharge plus the
/// sum of option modifiers, floored at the base price.
///
/// Negative dimensions, base price or rate are rejected instead of being
/// silently clamped away by the floor.
pub fn calculate_price(
    base_price: Cents,
    width_mm: i64,
    height_mm: i64,
    rate_per_m2: Cents,
    modifiers: &[Cents],
) -> Result<Cents, PricingError> {
    if base_price.is_negative() {
        return Err(PricingError::InvalidPrice("base_price"));
    }
    if rate_per_m2.is_negative() {
        return Err(PricingError::InvalidPrice("rate_per_m2"));
    }
    let width = Dimension::parse("width_mm", width_mm)
        .map_err(|_| PricingError::InvalidDimension("width_mm"))?;
    let height = Dimension::parse("height_mm", height_mm)
        .map_err(|_| PricingError::InvalidDimension("height_mm"))?;
    let modifier_sum: Cents = modifiers.iter().copied().sum();
    let total = base_price + area_surcharge(width, height, rate_per_m2) + modifier_sum;
    Ok(base_price.max(total))
}

/// Resolves a submitted selection against a product's option tables and
/// returns the price deltas in option-table order. Unknown keys or values
/// and missing required options are errors.
pub fn resolve_selection(
    product: &Product,
    selection: &BTreeMap<String, String>,
) -> Result<Vec<Cents>, PricingError> {
    for key in selection.keys() {
        if product.option(key).is_none() {
            return Err(PricingError::UnknownOption(key.clone()));
        }
    }
    let mut deltas = Vec::with_capacity(selection.len());
    for option in &product.options {
        match selection.get(&option.key) {
            Some(value) => {
                let choice =
                    option
                        .choice(value)
                        .ok_or_else(|| PricingError::UnknownChoice {
                            option: option.key.clone(),
                            value: value.clone(),
                        })?;
                deltas.push(choice.delta);
            }
            None if option.required => {
                return Err(PricingError::MissingOption(option.key.clone()));
            }
            None => {}
        }
    }
    Ok(deltas)
}

/// Unit price of one configured product. Banded products price purely
/// through their option deltas; products with `rate_per_m2` add the
/// continuous area surcharge for the free dimensions. Both floor at base.
pub fn unit_price(
    product: &Product,
    width_mm: i64,
    height_mm: i64,
    selection: &BTreeMap<String, String>,
) -> Result<Cents, PricingError> {
    let deltas = resolve_selection(product, selection)?;
    match product.rate_per_m2 {
        Some(rate) => calculate_price(product.base_price, width_mm, height_mm, rate, &deltas),
        None => {
            Dimension::parse("width_mm", width_mm)
                .map_err(|_| PricingError::InvalidDimension("width_mm"))?;
            Dimension::parse("height_mm", height_mm)
                .map_err(|_| PricingError::InvalidDimension("height_mm"))?;
            let total = product.base_price + deltas.iter().copied().sum();
            Ok(product.base_price.max(total))
        }
    }
}

/// VAT amount on a net price, rounded half-up to whole cents.
#[must_use]
pub fn vat_amount(price: Cents, rate_permille: i64) -> Cents {
    price.mul_div_round(rate_permille, 1000)
}

/// Gross price. Defined as net plus [`vat_amount`] so the two helpers can
/// never disagree after rounding.
#[must_use]
pub fn total_with_vat(price: Cents, rate_permille: i64) -> Cents {
    price + vat_amount(price, rate_permille)
}

/// Dutch display formatting: `€ 1.234,56`.
#[must_use]
pub fn format_eur(amount: Cents) -> String {
    let sign = if amount.amount() < 0 { "-" } else { "" };
    let euros = (amount.amount() / 100).abs();
    let cents = (amount.amount() % 100).abs();
    let mut grouped = String::new();
    let digits = euros.to_string();
    let len = digits.len();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    format!("€ {sign}{grouped},{cents:02}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrage_model::builtin_catalog;

    #[test]
    fn floor_guarantees_base_price() {
        let total = calculate_price(
            Cents::from_euros(129),
            800,
            1200,
            Cents::ZERO,
            &[Cents::from_euros(-50)],
        )
        .expect("price");
        assert_eq!(total, Cents::from_euros(129));
    }

    #[test]
    fn identity_case_returns_base_price() {
        let total =
            calculate_price(Cents::from_euros(129), 800, 1200, Cents::ZERO, &[]).expect("price");
        assert_eq!(total, Cents::from_euros(129));
    }

    #[test]
    fn area_surcharge_is_fixed_point_half_up() {
        // 800mm x 1200mm = 0.96 m2 at EUR 18/m2 -> EUR 17.28
        let width = Dimension::parse("width_mm", 800).expect("width");
        let height = Dimension::parse("height_mm", 1200).expect("height");
        assert_eq!(
            area_surcharge(width, height, Cents::from_euros(18)),
            Cents::new(1728)
        );
        // 333mm x 333mm = 0.110889 m2 at EUR 10/m2 -> 110.889 cents -> 111
        let w = Dimension::parse("width_mm", 333).expect("width");
        let h = Dimension::parse("height_mm", 333).expect("height");
        assert_eq!(area_surcharge(w, h, Cents::from_euros(10)), Cents::new(111));
    }

    #[test]
    fn declared_example_scenario() {
        // base 129, 800x1200 at 18/m2, modifiers [45, 25]
        let total = calculate_price(
            Cents::from_euros(129),
            800,
            1200,
            Cents::from_euros(18),
            &[Cents::from_euros(45), Cents::from_euros(25)],
        )
        .expect("price");
        assert_eq!(total, Cents::new(12900 + 1728 + 7000));
    }

    #[test]
    fn invalid_inputs_fail_fast() {
        let base = Cents::from_euros(100);
        assert_eq!(
            calculate_price(base, -800, 1200, Cents::ZERO, &[]),
            Err(PricingError::InvalidDimension("width_mm"))
        );
        assert_eq!(
            calculate_price(base, 800, 5, Cents::ZERO, &[]),
            Err(PricingError::InvalidDimension("height_mm"))
        );
        assert_eq!(
            calculate_price(Cents::new(-1), 800, 1200, Cents::ZERO, &[]),
            Err(PricingError::InvalidPrice("base_price"))
        );
        assert_eq!(
            calculate_price(base, 800, 1200, Cents::new(-1), &[]),
            Err(PricingError::InvalidPrice("rate_per_m2"))
        );
    }

    #[test]
    fn selection_resolution_walks_option_tables() {
        let catalog = builtin_catalog();
        let product = catalog
            .product(&vitrage_model::ProductId::parse("jaloezie-aluminium").expect("id"))
            .expect("product");

        let mut selection = BTreeMap::new();
        selection.insert("width".to_string(), "800".to_string());
        selection.insert("height".to_string(), "1000".to_string());
        selection.insert("slat-color".to_string(), "black".to_string());
        let deltas = resolve_selection(product, &selection).expect("resolve");
        assert_eq!(
            deltas,
            vec![Cents::from_euros(40), Cents::from_euros(15), Cents::from_euros(12)]
        );

        selection.insert("slat-color".to_string(), "chartreuse".to_string());
        assert_eq!(
            resolve_selection(product, &selection),
            Err(PricingError::UnknownChoice {
                option: "slat-color".to_string(),
                value: "chartreuse".to_string()
            })
        );

        selection.remove("slat-color");
        assert_eq!(
            resolve_selection(product, &selection),
            Err(PricingError::MissingOption("slat-color".to_string()))
        );

        selection.insert("slat-color".to_string(), "white".to_string());
        selection.insert("finish".to_string(), "matte".to_string());
        assert_eq!(
            resolve_selection(product, &selection),
            Err(PricingError::UnknownOption("finish".to_string()))
        );
    }

    #[test]
    fn banded_unit_price_floors_at_base() {
        let catalog = builtin_catalog();
        let product = catalog
            .product(&vitrage_model::ProductId::parse("jaloezie-aluminium").expect("id"))
            .expect("product");
        let mut selection = BTreeMap::new();
        selection.insert("width".to_string(), "400".to_string());
        selection.insert("height".to_string(), "600".to_string());
        selection.insert("slat-color".to_string(), "white".to_string());
        let price = unit_price(product, 400, 600, &selection).expect("price");
        assert_eq!(price, product.base_price);
    }

    #[test]
    fn vat_helpers_agree() {
        let price = Cents::new(21628);
        let vat = vat_amount(price, DEFAULT_VAT_RATE_PERMILLE);
        assert_eq!(vat, Cents::new(4542)); // 21628 * 0.21 = 4541.88 -> 4542
        assert_eq!(
            total_with_vat(price, DEFAULT_VAT_RATE_PERMILLE),
            price + vat
        );
    }

    #[test]
    fn eur_formatting_uses_dutch_conventions() {
        assert_eq!(format_eur(Cents::new(123_456)), "€ 1.234,56");
        assert_eq!(format_eur(Cents::new(9_00)), "€ 9,00");
        assert_eq!(format_eur(Cents::new(1_234_567_89)), "€ 1.234.567,89");
        assert_eq!(format_eur(Cents::new(-4_50)), "€ -4,50");
    }
}
