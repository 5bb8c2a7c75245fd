// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ApiErrorCode {
    ValidationFailed,
    UnknownProduct,
    InvalidOption,
    InvalidJson,
    NotReady,
    Internal,
}

impl ApiErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ValidationFailed => "ValidationFailed",
            Self::UnknownProduct => "UnknownProduct",
            Self::InvalidOption => "InvalidOption",
            Self::InvalidJson => "InvalidJson",
            Self::NotReady => "NotReady",
            Self::Internal => "Internal",
        }
    }
}

/// One field-level validation failure, reported with a dotted path into the
/// submitted payload (`customer.address.postalCode`, `lines[0].widthMm`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldError {
    pub field: String,
    pub reason: String,
}

impl FieldError {
    #[must_use]
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
    pub details: Value,
}

impl ApiError {
    #[must_use]
    pub fn new(code: ApiErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
        }
    }

    #[must_use]
    pub fn validation_failed(field_errors: Vec<FieldError>) -> Self {
        Self::new(
            ApiErrorCode::ValidationFailed,
            "validation failed",
            json!({ "field_errors": field_errors }),
        )
    }

    #[must_use]
    pub fn unknown_product(product_id: &str) -> Self {
        Self::new(
            ApiErrorCode::UnknownProduct,
            format!("unknown product: {product_id}"),
            json!({ "product_id": product_id }),
        )
    }

    /// Option-table miss on a single selection, as hit by the price preview
    /// endpoint. Quote submission reports the same condition inside a
    /// `ValidationFailed` batch instead.
    #[must_use]
    pub fn invalid_option(field_error: FieldError) -> Self {
        Self::new(
            ApiErrorCode::InvalidOption,
            "selection does not match the product's option tables",
            json!({ "field_errors": [field_error] }),
        )
    }

    #[must_use]
    pub fn invalid_json(message: &str) -> Self {
        Self::new(
            ApiErrorCode::InvalidJson,
            "request body is not valid json for this endpoint",
            json!({ "message": message }),
        )
    }

    #[must_use]
    pub fn not_ready() -> Self {
        Self::new(ApiErrorCode::NotReady, "service not ready", json!({}))
    }

    /// Generic failure; internals are logged server-side, never leaked here.
    #[must_use]
    pub fn internal() -> Self {
        Self::new(
            ApiErrorCode::Internal,
            "an unexpected error occurred; please try again",
            json!({}),
        )
    }
}

const _: fn() = || {
    fn assert_traits<T: Serialize + for<'de> Deserialize<'de>>() {}
    assert_traits::<ApiError>();
};
