//! Export request

use crate::models::{Encoding, SchemaVersion};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A single export attempt
///
/// Carries everything that varies between exports. The request is immutable
/// once built; a failed attempt is retried by building a corrected request.
///
/// # Example
///
/// ```rust
/// use swagger_export::export::ExportRequest;
/// use swagger_export::models::{Encoding, SchemaVersion};
///
/// let request = ExportRequest::new(["PetStore"], "/out", SchemaVersion::Swagger12, Encoding::Xml)
///     .with_api_version("2.1")
///     .with_base_path("https://petstore.example.com/api");
///
/// assert_eq!(request.interfaces(), ["PetStore".to_string()]);
/// assert_eq!(request.api_version(), Some("2.1"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRequest {
    interfaces: Vec<String>,
    target: PathBuf,
    schema_version: SchemaVersion,
    encoding: Encoding,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    api_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    base_path: Option<String>,
}

impl ExportRequest {
    pub fn new<I, S>(
        interfaces: I,
        target: impl Into<PathBuf>,
        schema_version: SchemaVersion,
        encoding: Encoding,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            interfaces: interfaces.into_iter().map(Into::into).collect(),
            target: target.into(),
            schema_version,
            encoding,
            api_version: None,
            base_path: None,
        }
    }

    /// Set the API version label (Swagger 1.2 only); blank labels are ignored
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = non_blank(api_version.into());
        self
    }

    /// Set the base path override (Swagger 1.2 only); blank paths are ignored
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = non_blank(base_path.into());
        self
    }

    /// Names of the selected interfaces, in selection order
    pub fn interfaces(&self) -> &[String] {
        &self.interfaces
    }

    /// Folder the documents are written to
    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn schema_version(&self) -> SchemaVersion {
        self.schema_version
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn api_version(&self) -> Option<&str> {
        self.api_version.as_deref()
    }

    pub fn base_path(&self) -> Option<&str> {
        self.base_path.as_deref()
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_optional_fields_are_dropped() {
        let request =
            ExportRequest::new(["A"], "out", SchemaVersion::Swagger12, Encoding::Json)
                .with_api_version("  ")
                .with_base_path("");
        assert_eq!(request.api_version(), None);
        assert_eq!(request.base_path(), None);
    }

    #[test]
    fn test_accepts_owned_names() {
        let names = vec!["A".to_string(), "B".to_string()];
        let request = ExportRequest::new(names, "out", SchemaVersion::OpenApi30, Encoding::Yaml);
        assert_eq!(request.interfaces().len(), 2);
        assert_eq!(request.target(), Path::new("out"));
    }
}
