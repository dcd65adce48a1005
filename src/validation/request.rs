//! Export request validation
//!
//! Checks that a request selects existing interfaces that can be exported and
//! that the (schema version, encoding) pair is one the exporter supports.
//! Nothing here touches storage.

use crate::export::{ExportError, ExportRequest};
use crate::models::{Encoding, Project, RestInterface, SchemaVersion};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Problem with the interface selection of a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum SelectionError {
    #[error("No API interface selected")]
    NoInterfaces,
    #[error("Unknown API interface '{0}'")]
    UnknownInterface(String),
    #[error("API interface '{0}' has no endpoints")]
    NoEndpoints(String),
    #[error("API interface '{0}' is selected more than once")]
    DuplicateInterface(String),
}

/// The encoding is not offered for the schema version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{schema_version} cannot be exported as {encoding}")]
pub struct CompatibilityError {
    pub schema_version: SchemaVersion,
    pub encoding: Encoding,
}

/// Encodings offered for a schema version
pub fn allowed_encodings(schema_version: SchemaVersion) -> &'static [Encoding] {
    match schema_version {
        SchemaVersion::Swagger12 => &[Encoding::Json, Encoding::Xml],
        SchemaVersion::Swagger20 | SchemaVersion::OpenApi30 => &[Encoding::Json, Encoding::Yaml],
    }
}

/// Check a (schema version, encoding) pair against the compatibility matrix
///
/// # Example
///
/// ```rust
/// use swagger_export::models::{Encoding, SchemaVersion};
/// use swagger_export::validation::check_compatibility;
///
/// assert!(check_compatibility(SchemaVersion::Swagger12, Encoding::Xml).is_ok());
/// assert!(check_compatibility(SchemaVersion::OpenApi30, Encoding::Xml).is_err());
/// ```
pub fn check_compatibility(
    schema_version: SchemaVersion,
    encoding: Encoding,
) -> Result<(), CompatibilityError> {
    if allowed_encodings(schema_version).contains(&encoding) {
        Ok(())
    } else {
        Err(CompatibilityError {
            schema_version,
            encoding,
        })
    }
}

/// Result of request validation.
///
/// Holds every violation found; an empty result means the request is legal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[must_use = "validation results should be checked for violations"]
pub struct RequestValidationResult {
    pub selection_errors: Vec<SelectionError>,
    pub compatibility_error: Option<CompatibilityError>,
}

impl RequestValidationResult {
    pub fn is_valid(&self) -> bool {
        self.selection_errors.is_empty() && self.compatibility_error.is_none()
    }

    /// Convert into the first failing category: selection, then compatibility
    pub fn into_result(self) -> Result<(), ExportError> {
        if !self.selection_errors.is_empty() {
            return Err(ExportError::Selection(self.selection_errors));
        }
        match self.compatibility_error {
            Some(error) => Err(ExportError::Compatibility(error)),
            None => Ok(()),
        }
    }
}

/// Export request validator
#[derive(Debug, Default)]
pub struct RequestValidator;

impl RequestValidator {
    /// Create a new request validator
    pub fn new() -> Self {
        Self
    }

    /// Collect every violation of a request against a project
    ///
    /// # Example
    ///
    /// ```rust
    /// use swagger_export::export::ExportRequest;
    /// use swagger_export::models::{Encoding, Project, SchemaVersion};
    /// use swagger_export::validation::{RequestValidator, SelectionError};
    ///
    /// let project = Project::new("Empty");
    /// let request = ExportRequest::new(["Missing"], "out", SchemaVersion::Swagger20, Encoding::Xml);
    ///
    /// let result = RequestValidator::new().validate(&request, &project);
    /// assert_eq!(
    ///     result.selection_errors,
    ///     vec![SelectionError::UnknownInterface("Missing".to_string())]
    /// );
    /// assert!(result.compatibility_error.is_some());
    /// ```
    pub fn validate(&self, request: &ExportRequest, project: &Project) -> RequestValidationResult {
        let mut selection_errors = Vec::new();
        if request.interfaces().is_empty() {
            selection_errors.push(SelectionError::NoInterfaces);
        }

        let mut seen = HashSet::new();
        for name in request.interfaces() {
            if !seen.insert(name.as_str()) {
                let duplicate = SelectionError::DuplicateInterface(name.clone());
                if !selection_errors.contains(&duplicate) {
                    selection_errors.push(duplicate);
                }
                continue;
            }
            match project.interface(name) {
                None => selection_errors.push(SelectionError::UnknownInterface(name.clone())),
                Some(interface) if interface.endpoints.is_empty() => {
                    selection_errors.push(SelectionError::NoEndpoints(name.clone()))
                }
                Some(_) => {}
            }
        }

        RequestValidationResult {
            selection_errors,
            compatibility_error: check_compatibility(request.schema_version(), request.encoding())
                .err(),
        }
    }
}

/// Validate a request and resolve its interfaces, ordered by name
pub fn validate_request<'p>(
    request: &ExportRequest,
    project: &'p Project,
) -> Result<Vec<&'p RestInterface>, ExportError> {
    RequestValidator::new()
        .validate(request, project)
        .into_result()?;

    let mut interfaces: Vec<&RestInterface> = request
        .interfaces()
        .iter()
        .filter_map(|name| project.interface(name))
        .collect();
    interfaces.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(interfaces)
}
