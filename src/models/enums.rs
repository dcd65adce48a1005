//! Enums for REST API models and export options
//!
//! # Serde Casing Conventions
//!
//! - `UPPERCASE`: HTTP verbs, matching how they appear on the wire (HttpMethod)
//! - `lowercase`: Simple keywords (ParameterLocation, RepresentationKind, Encoding)
//! - Explicit renames: Schema version labels used in settings files (SchemaVersion)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// HTTP verb of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
    Trace,
}

impl HttpMethod {
    /// Upper-case verb as used in Swagger 1.2 `method` fields
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Trace => "TRACE",
        }
    }

    /// Lower-case verb as used for path item keys in Swagger 2.0 / OpenAPI 3.0
    pub fn path_key(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
            HttpMethod::Patch => "patch",
            HttpMethod::Head => "head",
            HttpMethod::Options => "options",
            HttpMethod::Trace => "trace",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a parameter is carried in the HTTP request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Body,
    Form,
    /// `;name=value` segments; no supported schema family can express these
    Matrix,
}

impl ParameterLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterLocation::Path => "path",
            ParameterLocation::Query => "query",
            ParameterLocation::Header => "header",
            ParameterLocation::Body => "body",
            ParameterLocation::Form => "form",
            ParameterLocation::Matrix => "matrix",
        }
    }
}

impl fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role of a representation within an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepresentationKind {
    Request,
    Response,
    Fault,
}

/// Target schema family of an export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SchemaVersion {
    /// Swagger 1.2 resource listing plus one API declaration per resource
    #[serde(rename = "swagger-1.2")]
    Swagger12,
    /// Swagger 2.0 single definition
    #[serde(rename = "swagger-2.0")]
    Swagger20,
    /// OpenAPI 3.0 single definition (default)
    #[default]
    #[serde(rename = "openapi-3.0")]
    OpenApi30,
}

impl SchemaVersion {
    pub const ALL: [SchemaVersion; 3] = [
        SchemaVersion::Swagger12,
        SchemaVersion::Swagger20,
        SchemaVersion::OpenApi30,
    ];

    /// Human readable label, e.g. "Swagger 2.0"
    pub fn label(&self) -> &'static str {
        match self {
            SchemaVersion::Swagger12 => "Swagger 1.2",
            SchemaVersion::Swagger20 => "Swagger 2.0",
            SchemaVersion::OpenApi30 => "OpenAPI 3.0",
        }
    }
}

impl FromStr for SchemaVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '_'], "-");
        match normalized.as_str() {
            "swagger-1.2" | "1.2" => Ok(SchemaVersion::Swagger12),
            "swagger-2.0" | "2.0" => Ok(SchemaVersion::Swagger20),
            "openapi-3.0" | "openapi-3.0.0" | "3.0" => Ok(SchemaVersion::OpenApi30),
            _ => Err(format!(
                "Unknown schema version: {}. Use 'swagger-1.2', 'swagger-2.0' or 'openapi-3.0'.",
                s
            )),
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Textual encoding of exported documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    #[default]
    Json,
    Yaml,
    /// Only available for Swagger 1.2
    Xml,
}

impl Encoding {
    pub const ALL: [Encoding; 3] = [Encoding::Json, Encoding::Yaml, Encoding::Xml];

    /// File extension used for documents in this encoding
    pub fn extension(&self) -> &'static str {
        match self {
            Encoding::Json => "json",
            Encoding::Yaml => "yaml",
            Encoding::Xml => "xml",
        }
    }
}

impl FromStr for Encoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(Encoding::Json),
            "yaml" | "yml" => Ok(Encoding::Yaml),
            "xml" => Ok(Encoding::Xml),
            _ => Err(format!(
                "Unknown format: {}. Use 'json', 'yaml' or 'xml'.",
                s
            )),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_version_from_str_accepts_labels() {
        assert_eq!(
            "Swagger 1.2".parse::<SchemaVersion>().unwrap(),
            SchemaVersion::Swagger12
        );
        assert_eq!(
            "swagger-2.0".parse::<SchemaVersion>().unwrap(),
            SchemaVersion::Swagger20
        );
        assert_eq!(
            "OpenAPI 3.0".parse::<SchemaVersion>().unwrap(),
            SchemaVersion::OpenApi30
        );
        assert!("raml".parse::<SchemaVersion>().is_err());
    }

    #[test]
    fn test_schema_version_serde_uses_kebab_labels() {
        let json = serde_json::to_string(&SchemaVersion::Swagger12).unwrap();
        assert_eq!(json, "\"swagger-1.2\"");
        let parsed: SchemaVersion = serde_json::from_str("\"openapi-3.0\"").unwrap();
        assert_eq!(parsed, SchemaVersion::OpenApi30);
    }

    #[test]
    fn test_encoding_round_trips_through_display() {
        for encoding in Encoding::ALL {
            assert_eq!(encoding.to_string().parse::<Encoding>().unwrap(), encoding);
        }
        assert_eq!("YML".parse::<Encoding>().unwrap(), Encoding::Yaml);
    }

    #[test]
    fn test_http_method_keys() {
        assert_eq!(HttpMethod::Get.path_key(), "get");
        assert_eq!(HttpMethod::Options.as_str(), "OPTIONS");
        let parsed: HttpMethod = serde_json::from_str("\"PATCH\"").unwrap();
        assert_eq!(parsed, HttpMethod::Patch);
    }
}
