//! Validation functionality
//!
//! Provides validation logic for export requests:
//! - Interface selection (unknown, duplicate, endpoint-less interfaces)
//! - Schema version / encoding compatibility

pub mod request;

pub use request::{
    CompatibilityError, RequestValidationResult, RequestValidator, SelectionError,
    allowed_encodings, check_compatibility, validate_request,
};
