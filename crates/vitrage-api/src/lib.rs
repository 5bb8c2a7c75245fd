#![forbid(unsafe_code)]

pub mod convert;
pub mod dto;
pub mod errors;
pub mod responses;

pub use convert::validate_submission;
pub use dto::{AddressDto, CustomerDto, PricePreviewRequest, QuoteLineDto, QuoteSubmission};
pub use errors::{ApiError, ApiErrorCode, FieldError};
pub use responses::{product_detail, product_summary, PricePreview, QuoteAccepted};

pub const CRATE_NAME: &str = "vitrage-api";
