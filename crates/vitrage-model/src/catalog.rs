// SPDX-License-Identifier: Apache-2.0

use crate::ids::ProductId;
use crate::money::Cents;
use crate::ParseError;
use serde::{Deserialize, Serialize};

pub const DIMENSION_MIN_MM: i64 = 10;
pub const DIMENSION_MAX_MM: i64 = 6000;

/// A millimeter measurement entered by the customer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[non_exhaustive]
pub struct Dimension(i64);

impl Dimension {
    pub fn parse(name: &'static str, mm: i64) -> Result<Self, ParseError> {
        if !(DIMENSION_MIN_MM..=DIMENSION_MAX_MM).contains(&mm) {
            return Err(ParseError::OutOfRange(name, DIMENSION_MIN_MM, DIMENSION_MAX_MM));
        }
        Ok(Self(mm))
    }

    #[must_use]
    pub const fn millimeters(self) -> i64 {
        self.0
    }
}

/// One selectable value in an option table. For width/height options the
/// delta is the banded stand-in for an area surcharge: a fixed step priced
/// up front instead of a continuous measurement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionChoice {
    pub value: String,
    pub label: String,
    pub delta: Cents,
}

impl OptionChoice {
    #[must_use]
    pub fn new(value: &str, label: &str, delta: Cents) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
            delta,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOption {
    pub key: String,
    pub label: String,
    pub info: Option<String>,
    pub required: bool,
    pub choices: Vec<OptionChoice>,
}

impl ConfigOption {
    #[must_use]
    pub fn new(key: &str, label: &str, required: bool, choices: Vec<OptionChoice>) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            info: None,
            required,
            choices,
        }
    }

    #[must_use]
    pub fn with_info(mut self, info: &str) -> Self {
        self.info = Some(info.to_string());
        self
    }

    #[must_use]
    pub fn choice(&self, value: &str) -> Option<&OptionChoice> {
        self.choices.iter().find(|c| c.value == value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpecRow {
    pub label: String,
    pub value: String,
}

/// Static product descriptor, defined as literal data at build time and
/// never mutated at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub category: String,
    pub base_price: Cents,
    /// Cents per square meter; `None` for products priced purely by banded
    /// option tables.
    pub rate_per_m2: Option<Cents>,
    pub options: Vec<ConfigOption>,
    pub specs: Vec<SpecRow>,
    pub images: Vec<String>,
}

impl Product {
    #[must_use]
    pub fn option(&self, key: &str) -> Option<&ConfigOption> {
        self.options.iter().find(|o| o.key == key)
    }

    pub fn validate(&self) -> Result<(), ParseError> {
        if self.base_price.is_negative() {
            return Err(ParseError::InvalidFormat("base_price must be >= 0"));
        }
        if self.rate_per_m2.is_some_and(Cents::is_negative) {
            return Err(ParseError::InvalidFormat("rate_per_m2 must be >= 0"));
        }
        // One dimension-pricing strategy per product; carrying both would
        // charge the same millimeters twice.
        if self.rate_per_m2.is_some()
            && (self.option("width").is_some() || self.option("height").is_some())
        {
            return Err(ParseError::InvalidFormat(
                "area-priced products must not carry banded dimension options",
            ));
        }
        for option in &self.options {
            if option.choices.is_empty() {
                return Err(ParseError::InvalidFormat(
                    "every config option needs at least one choice",
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Catalog {
    pub products: Vec<Product>,
}

impl Catalog {
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    #[must_use]
    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }
}

fn id(raw: &str) -> ProductId {
    ProductId::parse(raw).unwrap_or_else(|e| panic!("builtin product id {raw}: {e}"))
}

fn width_bands(steps: &[(i64, i64)]) -> ConfigOption {
    banded("width", "Breedte", steps)
}

fn height_bands(steps: &[(i64, i64)]) -> ConfigOption {
    banded("height", "Hoogte", steps)
}

fn banded(key: &str, label: &str, steps: &[(i64, i64)]) -> ConfigOption {
    let choices = steps
        .iter()
        .map(|(mm, delta_euros)| {
            OptionChoice::new(&format!("{mm}"), &format!("{mm} mm"), Cents::from_euros(*delta_euros))
        })
        .collect();
    ConfigOption::new(key, label, true, choices)
}

/// The built-in catalog. Each product prices its dimensions through exactly
/// one strategy: banded width/height option tables, or the continuous
/// area formula when `rate_per_m2` is set.
#[must_use]
pub fn builtin_catalog() -> Catalog {
    let roller = Product {
        id: id("rolgordijn-basic"),
        name: "Rolgordijn Basic".to_string(),
        description: "Verduisterend rolgordijn op maat, inclusief montagesteunen.".to_string(),
        category: "rolgordijnen".to_string(),
        base_price: Cents::from_euros(129),
        rate_per_m2: Some(Cents::from_euros(18)),
        options: vec![
            ConfigOption::new(
                "color",
                "Kleur",
                true,
                vec![
                    OptionChoice::new("white", "Wit", Cents::ZERO),
                    OptionChoice::new("sand", "Zand", Cents::ZERO),
                    OptionChoice::new("anthracite", "Antraciet", Cents::from_euros(10)),
                ],
            ),
            ConfigOption::new(
                "cassette",
                "Cassette",
                false,
                vec![
                    OptionChoice::new("none", "Geen", Cents::ZERO),
                    OptionChoice::new("open", "Open cassette", Cents::from_euros(25)),
                    OptionChoice::new("closed", "Dichte cassette", Cents::from_euros(45)),
                ],
            ),
            ConfigOption::new(
                "side-channels",
                "Zijgeleiding",
                false,
                vec![
                    OptionChoice::new("none", "Geen", Cents::ZERO),
                    OptionChoice::new("aluminium", "Aluminium", Cents::from_euros(25)),
                ],
            ),
            ConfigOption::new(
                "operation",
                "Bediening",
                false,
                vec![
                    OptionChoice::new("chain", "Ketting", Cents::ZERO),
                    OptionChoice::new("motor", "Elektrisch", Cents::from_euros(95)),
                ],
            )
            .with_info("Elektrische bediening werkt op een oplaadbare accu."),
        ],
        specs: vec![
            SpecRow {
                label: "Materiaal".to_string(),
                value: "Polyester, 100% verduisterend".to_string(),
            },
            SpecRow {
                label: "Montage".to_string(),
                value: "In of op de dag".to_string(),
            },
        ],
        images: vec!["products/rolgordijn-basic-01.webp".to_string()],
    };

    let venetian = Product {
        id: id("jaloezie-aluminium"),
        name: "Jaloezie Aluminium 25mm".to_string(),
        description: "Aluminium jaloezie met 25mm lamellen, traploos kantelbaar.".to_string(),
        category: "jaloezieen".to_string(),
        base_price: Cents::from_euros(149),
        rate_per_m2: None,
        options: vec![
            width_bands(&[(400, 0), (600, 20), (800, 40), (1000, 55), (1400, 80)]),
            height_bands(&[(600, 0), (1000, 15), (1600, 35), (2200, 60)]),
            ConfigOption::new(
                "slat-color",
                "Lamelkleur",
                true,
                vec![
                    OptionChoice::new("silver", "Zilver", Cents::ZERO),
                    OptionChoice::new("white", "Wit", Cents::ZERO),
                    OptionChoice::new("black", "Zwart", Cents::from_euros(12)),
                ],
            ),
        ],
        specs: vec![SpecRow {
            label: "Lamelbreedte".to_string(),
            value: "25 mm".to_string(),
        }],
        images: vec!["products/jaloezie-aluminium-01.webp".to_string()],
    };

    let screen = Product {
        id: id("plisse-hordeur"),
        name: "Plissé Hordeur".to_string(),
        description: "Plissé hordeur voor openslaande deuren, zelfsluitend.".to_string(),
        category: "horren".to_string(),
        base_price: Cents::from_euros(189),
        rate_per_m2: None,
        options: vec![
            width_bands(&[(800, 0), (1000, 25), (1200, 45), (1600, 85)]),
            height_bands(&[(2000, 0), (2300, 20), (2600, 45)]),
            ConfigOption::new(
                "frame-color",
                "Framekleur",
                true,
                vec![
                    OptionChoice::new("white", "Wit", Cents::ZERO),
                    OptionChoice::new("anthracite", "Antraciet", Cents::from_euros(15)),
                ],
            ),
        ],
        specs: vec![SpecRow {
            label: "Gaas".to_string(),
            value: "Zwart fiberglass".to_string(),
        }],
        images: vec!["products/plisse-hordeur-01.webp".to_string()],
    };

    let curtain = Product {
        id: id("overgordijn-velours"),
        name: "Overgordijn Velours".to_string(),
        description: "Velours overgordijn, op maat geconfectioneerd per meter.".to_string(),
        category: "gordijnen".to_string(),
        base_price: Cents::from_euros(89),
        rate_per_m2: Some(Cents::from_euros(24)),
        options: vec![
            ConfigOption::new(
                "pleat",
                "Plooisoort",
                true,
                vec![
                    OptionChoice::new("wave", "Wave", Cents::ZERO),
                    OptionChoice::new("double-pleat", "Dubbele plooi", Cents::from_euros(18)),
                    OptionChoice::new("triple-pleat", "Driedubbele plooi", Cents::from_euros(28)),
                ],
            ),
            ConfigOption::new(
                "lining",
                "Voering",
                false,
                vec![
                    OptionChoice::new("none", "Geen", Cents::ZERO),
                    OptionChoice::new("thermal", "Thermisch", Cents::from_euros(35)),
                ],
            ),
        ],
        specs: vec![SpecRow {
            label: "Stof".to_string(),
            value: "Velours, 290 g/m²".to_string(),
        }],
        images: vec!["products/overgordijn-velours-01.webp".to_string()],
    };

    Catalog::new(vec![roller, venetian, screen, curtain])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_internally_consistent() {
        let catalog = builtin_catalog();
        assert!(!catalog.products.is_empty());
        for product in &catalog.products {
            product.validate().expect("builtin product valid");
            for option in &product.options {
                let mut values: Vec<&str> =
                    option.choices.iter().map(|c| c.value.as_str()).collect();
                values.sort_unstable();
                values.dedup();
                assert_eq!(
                    values.len(),
                    option.choices.len(),
                    "duplicate choice value in {}/{}",
                    product.id,
                    option.key
                );
            }
        }
    }

    #[test]
    fn dimension_enforces_minimum() {
        assert!(Dimension::parse("width_mm", 9).is_err());
        assert!(Dimension::parse("width_mm", 0).is_err());
        assert!(Dimension::parse("width_mm", -800).is_err());
        assert_eq!(
            Dimension::parse("width_mm", 800).expect("valid").millimeters(),
            800
        );
        assert!(Dimension::parse("width_mm", 6001).is_err());
    }

    #[test]
    fn area_priced_product_cannot_carry_dimension_bands() {
        let catalog = builtin_catalog();
        let mut product = catalog.products[0].clone();
        assert!(product.rate_per_m2.is_some());
        product.options.push(banded("width", "Breedte", &[(400, 0)]));
        assert!(product.validate().is_err());
    }

    #[test]
    fn catalog_lookup_finds_by_id() {
        let catalog = builtin_catalog();
        let id = ProductId::parse("rolgordijn-basic").expect("id");
        assert!(catalog.product(&id).is_some());
        let missing = ProductId::parse("niet-bestaand").expect("id");
        assert!(catalog.product(&missing).is_none());
    }
}
