// SPDX-License-Identifier: Apache-2.0

use crate::dto::{AddressDto, CustomerDto, QuoteLineDto, QuoteSubmission};
use crate::errors::FieldError;
use vitrage_model::{
    Address, Catalog, Cents, ContactChannel, Customer, CustomerName, DutchPostalCode, Email,
    ParseError, Phone, ProductId, QuoteLine, QuoteRequestData, MESSAGE_MAX_LEN, QUANTITY_MAX,
};
use vitrage_pricing::{unit_price, PricingError};

fn reason(err: &ParseError) -> &'static str {
    match err {
        ParseError::Empty(_) => "required",
        ParseError::TooShort(_, _) => "too_short",
        ParseError::TooLong(_, _) => "too_long",
        ParseError::OutOfRange(_, _, _) => "out_of_range",
        _ => "invalid",
    }
}

struct Collector {
    errors: Vec<FieldError>,
}

impl Collector {
    fn new() -> Self {
        Self { errors: Vec::new() }
    }

    fn parse<T>(&mut self, field: &str, result: Result<T, ParseError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.errors.push(FieldError::new(field, reason(&err)));
                None
            }
        }
    }

    fn require_text(&mut self, field: &str, value: &str, max_len: usize) -> Option<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.errors.push(FieldError::new(field, "required"));
            return None;
        }
        if trimmed.chars().count() > max_len {
            self.errors.push(FieldError::new(field, "too_long"));
            return None;
        }
        Some(trimmed.to_string())
    }
}

fn convert_customer(collector: &mut Collector, dto: &CustomerDto) -> Option<Customer> {
    let name = collector.parse("customer.name", CustomerName::parse(&dto.name));
    let email = collector.parse("customer.email", Email::parse(&dto.email));
    let phone = collector.parse("customer.phone", Phone::parse(&dto.phone));
    Some(Customer {
        name: name?,
        email: email?,
        phone: phone?,
    })
}

fn convert_address(collector: &mut Collector, dto: &AddressDto) -> Option<Address> {
    let street = collector.require_text("customer.address.street", &dto.street, 200);
    let house_number = collector.require_text("customer.address.houseNumber", &dto.house_number, 16);
    let postal_code = collector.parse(
        "customer.address.postalCode",
        DutchPostalCode::parse(&dto.postal_code),
    );
    let city = collector.require_text("customer.address.city", &dto.city, 100);
    Some(Address {
        street: street?,
        house_number: house_number?,
        postal_code: postal_code?,
        city: city?,
    })
}

fn convert_line(
    collector: &mut Collector,
    catalog: &Catalog,
    index: usize,
    dto: &QuoteLineDto,
) -> Option<QuoteLine> {
    let path = |suffix: &str| format!("lines[{index}].{suffix}");

    let product_id = collector.parse(&path("productId"), ProductId::parse(&dto.product_id))?;
    let Some(product) = catalog.product(&product_id) else {
        collector
            .errors
            .push(FieldError::new(path("productId"), "unknown_product"));
        return None;
    };

    if dto.quantity == 0 || dto.quantity > QUANTITY_MAX {
        collector
            .errors
            .push(FieldError::new(path("quantity"), "out_of_range"));
        return None;
    }

    let unit = match unit_price(product, dto.width_mm, dto.height_mm, &dto.options) {
        Ok(v) => v,
        Err(err) => {
            let (field, why): (String, &str) = match &err {
                PricingError::InvalidDimension("width_mm") => (path("widthMm"), "out_of_range"),
                PricingError::InvalidDimension(_) => (path("heightMm"), "out_of_range"),
                PricingError::InvalidPrice(_) => (path("productId"), "invalid"),
                PricingError::UnknownOption(key) => {
                    (format!("{}.{key}", path("options")), "unknown_option")
                }
                PricingError::UnknownChoice { option, .. } => {
                    (format!("{}.{option}", path("options")), "unknown_choice")
                }
                PricingError::MissingOption(key) => {
                    (format!("{}.{key}", path("options")), "missing_option")
                }
                _ => (path("productId"), "invalid"),
            };
            collector.errors.push(FieldError::new(field, why));
            return None;
        }
    };

    Some(QuoteLine {
        product_id,
        product_name: product.name.clone(),
        quantity: dto.quantity,
        width_mm: dto.width_mm,
        height_mm: dto.height_mm,
        selection: dto.options.clone(),
        line_price: unit * i64::from(dto.quantity),
    })
}

/// Validates a wire submission against the catalog, collecting every field
/// error instead of stopping at the first. Prices are recomputed
/// server-side; the client-supplied total must match the recomputation.
pub fn validate_submission(
    catalog: &Catalog,
    submission: &QuoteSubmission,
) -> Result<QuoteRequestData, Vec<FieldError>> {
    let mut collector = Collector::new();

    let customer = convert_customer(&mut collector, &submission.customer);
    let address = convert_address(&mut collector, &submission.customer.address);

    let preferred_contact = collector.parse(
        "preferredContact",
        ContactChannel::parse(&submission.preferred_contact),
    );

    let message = match &submission.message {
        Some(m) if m.chars().count() > MESSAGE_MAX_LEN => {
            collector.errors.push(FieldError::new("message", "too_long"));
            None
        }
        Some(m) if m.trim().is_empty() => None,
        Some(m) => Some(m.trim().to_string()),
        None => None,
    };

    if submission.lines.is_empty() {
        collector.errors.push(FieldError::new("lines", "required"));
    }
    let mut lines = Vec::with_capacity(submission.lines.len());
    for (index, dto) in submission.lines.iter().enumerate() {
        if let Some(line) = convert_line(&mut collector, catalog, index, dto) {
            lines.push(line);
        }
    }

    // Only verify the total once every line priced cleanly; partial sums
    // would produce a misleading mismatch error.
    let computed: Cents = lines.iter().map(|l| l.line_price).sum();
    if collector.errors.is_empty() && computed != Cents::new(submission.total_price) {
        collector
            .errors
            .push(FieldError::new("totalPrice", "mismatch"));
    }

    if !collector.errors.is_empty() {
        return Err(collector.errors);
    }

    let data = QuoteRequestData {
        customer: customer.expect("customer present when no errors"),
        address: address.expect("address present when no errors"),
        lines,
        message,
        preferred_contact: preferred_contact.expect("contact present when no errors"),
        total_price: computed,
    };
    debug_assert!(data.validate().is_ok());
    Ok(data)
}
