//! Document builder contract, builder selection and shared derivation rules
//!
//! Each schema family has one stateless builder implementing [`DocumentBuilder`].
//! [`select_builder`] maps a [`SchemaVersion`] onto its builder. The helpers in
//! this module hold the rules every family shares: stable ordering of
//! resources and operations, parameter inheritance, path placeholder
//! synthesis, media type checks and response grouping.

use super::document::DocumentSet;
use super::openapi3::OpenApi3Builder;
use super::request::ExportRequest;
use super::swagger1::Swagger1Builder;
use super::swagger2::Swagger2Builder;
use crate::models::{
    HttpMethod, Operation, Parameter, ParameterLocation, RepresentationKind, Resource,
    RestInterface, SchemaVersion, join_paths,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Placeholder value used when no API version is known
pub const DEFAULT_API_VERSION: &str = "1.0";

static RE_PATH_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([^{}/]+)\}").expect("Invalid regex"));
static RE_MEDIA_TYPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9!#$&^_.+*-]+/[A-Za-z0-9!#$&^_.+*-]+(\s*;.*)?$").expect("Invalid regex")
});

/// Location of a model element, used to point build errors at the culprit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelElement {
    pub interface: String,
    pub resource: String,
    pub operation: Option<String>,
}

impl ModelElement {
    pub(crate) fn operation(
        interface: &RestInterface,
        resource: &Resource,
        operation: &Operation,
    ) -> Self {
        Self {
            interface: interface.name.clone(),
            resource: resource.name.clone(),
            operation: Some(operation.name.clone()),
        }
    }
}

impl fmt::Display for ModelElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "interface '{}', resource '{}'",
            self.interface, self.resource
        )?;
        if let Some(operation) = &self.operation {
            write!(f, ", operation '{}'", operation)?;
        }
        Ok(())
    }
}

/// The model holds an element the chosen schema family cannot express
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("{element}: media type '{media_type}' cannot be expressed in {schema_version}")]
    UnsupportedMediaType {
        element: ModelElement,
        media_type: String,
        schema_version: SchemaVersion,
    },
    #[error(
        "{element}: {location} parameter '{parameter}' cannot be expressed in {schema_version}"
    )]
    UnsupportedParameter {
        element: ModelElement,
        parameter: String,
        location: ParameterLocation,
        schema_version: SchemaVersion,
    },
    #[error("{element}: HTTP method {method} cannot be expressed in {schema_version}")]
    UnsupportedMethod {
        element: ModelElement,
        method: HttpMethod,
        schema_version: SchemaVersion,
    },
    #[error("{element}: more than one body parameter")]
    MultipleBodies { element: ModelElement },
    #[error("{element}: body and form parameters cannot be combined in {schema_version}")]
    BodyAndForm {
        element: ModelElement,
        schema_version: SchemaVersion,
    },
    #[error("{element}: {method} {path} is already defined by another operation")]
    DuplicateOperation {
        element: ModelElement,
        method: HttpMethod,
        path: String,
    },
}

impl BuildError {
    /// The model element the error points at
    pub fn element(&self) -> &ModelElement {
        match self {
            BuildError::UnsupportedMediaType { element, .. }
            | BuildError::UnsupportedParameter { element, .. }
            | BuildError::UnsupportedMethod { element, .. }
            | BuildError::MultipleBodies { element }
            | BuildError::BodyAndForm { element, .. }
            | BuildError::DuplicateOperation { element, .. } => element,
        }
    }
}

/// Converts the selected interfaces into the documents of one schema family
pub trait DocumentBuilder: Send + Sync {
    fn schema_version(&self) -> SchemaVersion;

    /// Build the documents for the selected interfaces
    ///
    /// `interfaces` are the already validated selection; no partial document set
    /// is returned on error.
    fn build(
        &self,
        request: &ExportRequest,
        interfaces: &[&RestInterface],
    ) -> Result<DocumentSet, BuildError>;
}

/// Return the builder for a schema version
///
/// # Example
///
/// ```rust
/// use swagger_export::export::select_builder;
/// use swagger_export::models::SchemaVersion;
///
/// let builder = select_builder(SchemaVersion::Swagger20);
/// assert_eq!(builder.schema_version(), SchemaVersion::Swagger20);
/// ```
pub fn select_builder(schema_version: SchemaVersion) -> &'static dyn DocumentBuilder {
    match schema_version {
        SchemaVersion::Swagger12 => &Swagger1Builder,
        SchemaVersion::Swagger20 => &Swagger2Builder,
        SchemaVersion::OpenApi30 => &OpenApi3Builder,
    }
}

/// A resource of the tree with its resolved full path and inherited parameters
#[derive(Debug, Clone)]
pub(crate) struct FlatResource<'a> {
    pub interface: &'a RestInterface,
    pub resource: &'a Resource,
    pub full_path: String,
    /// Parameters declared on ancestors and the resource itself, outermost first
    pub parameters: Vec<&'a Parameter>,
}

impl FlatResource<'_> {
    pub fn operation_element(&self, operation: &Operation) -> ModelElement {
        ModelElement::operation(self.interface, self.resource, operation)
    }

    /// Operations ordered by verb, then name
    pub fn sorted_operations(&self) -> Vec<&Operation> {
        let mut operations: Vec<&Operation> = self.resource.operations.iter().collect();
        operations.sort_by(|a, b| a.method.cmp(&b.method).then_with(|| a.name.cmp(&b.name)));
        operations
    }
}

/// Interfaces ordered by name
pub(crate) fn sorted_interfaces<'a>(interfaces: &[&'a RestInterface]) -> Vec<&'a RestInterface> {
    let mut sorted = interfaces.to_vec();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));
    sorted
}

/// Flatten the resource trees of all interfaces
///
/// Resources are ordered by interface name, then resource name, then full path.
pub(crate) fn flatten_resources<'a>(interfaces: &[&'a RestInterface]) -> Vec<FlatResource<'a>> {
    fn walk<'a>(
        interface: &'a RestInterface,
        resource: &'a Resource,
        parent_path: &str,
        inherited: &[&'a Parameter],
        out: &mut Vec<FlatResource<'a>>,
    ) {
        let full_path = join_paths(parent_path, &resource.path);
        let mut parameters = inherited.to_vec();
        parameters.extend(resource.parameters.iter());
        for child in &resource.children {
            walk(interface, child, &full_path, &parameters, out);
        }
        out.push(FlatResource {
            interface,
            resource,
            full_path,
            parameters,
        });
    }

    let mut flat = Vec::new();
    for interface in sorted_interfaces(interfaces) {
        for resource in &interface.resources {
            walk(interface, resource, "", &[], &mut flat);
        }
    }
    flat.sort_by(|a, b| {
        a.interface
            .name
            .cmp(&b.interface.name)
            .then_with(|| a.resource.name.cmp(&b.resource.name))
            .then_with(|| a.full_path.cmp(&b.full_path))
    });
    flat
}

/// Resolve the parameters of an operation
///
/// Inherited resource parameters come first; an operation parameter with the
/// same name and location replaces the inherited one. Path placeholders with no
/// declared path parameter get a required string parameter. Matrix parameters
/// and multiple body parameters are rejected, and so is a body parameter next to
/// form parameters in the Swagger families.
pub(crate) fn effective_parameters(
    flat: &FlatResource<'_>,
    operation: &Operation,
    schema_version: SchemaVersion,
) -> Result<Vec<Parameter>, BuildError> {
    let mut parameters: Vec<Parameter> = Vec::new();
    for parameter in flat
        .parameters
        .iter()
        .copied()
        .chain(operation.parameters.iter())
    {
        match parameters
            .iter_mut()
            .find(|p| p.name == parameter.name && p.location == parameter.location)
        {
            Some(existing) => *existing = parameter.clone(),
            None => parameters.push(parameter.clone()),
        }
    }

    for name in path_placeholders(&flat.full_path) {
        let declared = parameters
            .iter()
            .any(|p| p.location == ParameterLocation::Path && p.name == name);
        if !declared {
            parameters.push(Parameter::new(name, ParameterLocation::Path).required());
        }
    }

    if let Some(matrix) = parameters
        .iter()
        .find(|p| p.location == ParameterLocation::Matrix)
    {
        return Err(BuildError::UnsupportedParameter {
            element: flat.operation_element(operation),
            parameter: matrix.name.clone(),
            location: matrix.location,
            schema_version,
        });
    }

    let bodies = parameters
        .iter()
        .filter(|p| p.location == ParameterLocation::Body)
        .count();
    if bodies > 1 {
        return Err(BuildError::MultipleBodies {
            element: flat.operation_element(operation),
        });
    }

    let has_form = parameters
        .iter()
        .any(|p| p.location == ParameterLocation::Form);
    if bodies == 1 && has_form && schema_version != SchemaVersion::OpenApi30 {
        return Err(BuildError::BodyAndForm {
            element: flat.operation_element(operation),
            schema_version,
        });
    }

    Ok(parameters)
}

/// Names of the `{placeholder}` segments of a path template, in order
pub(crate) fn path_placeholders(path: &str) -> Vec<String> {
    RE_PATH_PLACEHOLDER
        .captures_iter(path)
        .map(|c| c[1].to_string())
        .collect()
}

/// Check every representation of an operation has a `type/subtype` media type
pub(crate) fn check_media_types(
    flat: &FlatResource<'_>,
    operation: &Operation,
    schema_version: SchemaVersion,
) -> Result<(), BuildError> {
    for representation in &operation.representations {
        if !RE_MEDIA_TYPE.is_match(representation.media_type.trim()) {
            return Err(BuildError::UnsupportedMediaType {
                element: flat.operation_element(operation),
                media_type: representation.media_type.clone(),
                schema_version,
            });
        }
    }
    Ok(())
}

/// Reject a verb the schema family has no slot for
pub(crate) fn check_method(
    flat: &FlatResource<'_>,
    operation: &Operation,
    schema_version: SchemaVersion,
    supported: &[HttpMethod],
) -> Result<(), BuildError> {
    if supported.contains(&operation.method) {
        Ok(())
    } else {
        Err(BuildError::UnsupportedMethod {
            element: flat.operation_element(operation),
            method: operation.method,
            schema_version,
        })
    }
}

/// Sorted, de-duplicated media types of the given representation kinds
pub(crate) fn media_types(operation: &Operation, kinds: &[RepresentationKind]) -> Vec<String> {
    let mut types: Vec<String> = operation
        .representations
        .iter()
        .filter(|r| kinds.contains(&r.kind))
        .map(|r| r.media_type.trim().to_string())
        .collect();
    types.sort();
    types.dedup();
    types
}

/// Schema reference of the first request representation that declares one
pub(crate) fn request_schema(operation: &Operation) -> Option<&str> {
    operation
        .representations_of(RepresentationKind::Request)
        .find_map(|r| r.schema_ref.as_deref())
}

/// A response grouped by status code
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ResponseEntry {
    pub description: String,
    /// (media type, schema reference) pairs in declaration order
    pub content: Vec<(String, Option<String>)>,
}

impl ResponseEntry {
    /// First schema reference declared for this status
    pub fn schema(&self) -> Option<&str> {
        self.content.iter().find_map(|(_, schema)| schema.as_deref())
    }
}

/// Group response and fault representations by status code
///
/// Representations without status codes count as 200 (responses) or 500
/// (faults). The first description declared for a code wins.
pub(crate) fn collect_responses(operation: &Operation) -> BTreeMap<u16, ResponseEntry> {
    let mut responses: BTreeMap<u16, ResponseEntry> = BTreeMap::new();
    for representation in &operation.representations {
        let fallback = match representation.kind {
            RepresentationKind::Request => continue,
            RepresentationKind::Response => 200,
            RepresentationKind::Fault => 500,
        };
        let codes = if representation.status_codes.is_empty() {
            vec![fallback]
        } else {
            representation.status_codes.clone()
        };
        for code in codes {
            let entry = responses.entry(code).or_insert_with(|| ResponseEntry {
                description: String::new(),
                content: Vec::new(),
            });
            if entry.description.is_empty() {
                entry.description = representation
                    .description
                    .clone()
                    .unwrap_or_else(|| reason_phrase(code).to_string());
            }
            let item = (
                representation.media_type.trim().to_string(),
                representation.schema_ref.clone(),
            );
            if !entry.content.contains(&item) {
                entry.content.push(item);
            }
        }
    }
    responses
}

/// Map a model data type name to a (type, format) pair
///
/// Accepts JSON schema names and XML schema names with or without an `xs:` prefix.
pub(crate) fn map_data_type(data_type: &str) -> (&'static str, Option<&'static str>) {
    let lower = data_type.trim().to_lowercase();
    let name = lower
        .strip_prefix("xs:")
        .or_else(|| lower.strip_prefix("xsd:"))
        .unwrap_or(&lower);
    match name {
        "int" | "integer" | "short" | "int32" => ("integer", Some("int32")),
        "long" | "int64" => ("integer", Some("int64")),
        "float" => ("number", Some("float")),
        "double" => ("number", Some("double")),
        "decimal" | "number" => ("number", None),
        "boolean" | "bool" => ("boolean", None),
        "date" => ("string", Some("date")),
        "datetime" | "date-time" => ("string", Some("date-time")),
        "base64binary" | "byte" => ("string", Some("byte")),
        "binary" | "file" => ("string", Some("binary")),
        _ => ("string", None),
    }
}

/// A default value as JSON of the mapped type, or the raw text when it does not parse
pub(crate) fn typed_default(raw: &str, data_type: &str) -> Value {
    let trimmed = raw.trim();
    let typed = match map_data_type(data_type).0 {
        "integer" => trimmed.parse::<i64>().ok().map(Value::from),
        "number" => trimmed
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number),
        "boolean" => trimmed.parse::<bool>().ok().map(Value::Bool),
        _ => None,
    };
    typed.unwrap_or_else(|| Value::String(raw.to_string()))
}

/// Standard reason phrase for common status codes
pub(crate) fn reason_phrase(code: u16) -> &'static str {
    match code {
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        204 => "No Content",
        301 => "Moved Permanently",
        302 => "Found",
        304 => "Not Modified",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        409 => "Conflict",
        415 => "Unsupported Media Type",
        422 => "Unprocessable Entity",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "Response",
    }
}

/// Title shared by all families: the selected interface names joined with ", "
pub(crate) fn title(interfaces: &[&RestInterface]) -> String {
    sorted_interfaces(interfaces)
        .iter()
        .map(|i| i.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Description of the selection when exactly one interface carries one
pub(crate) fn description(interfaces: &[&RestInterface]) -> Option<String> {
    match interfaces {
        [single] => single.description.clone(),
        _ => None,
    }
}

/// Version for the unified families: the model's, then the request label, then the placeholder
pub(crate) fn unified_version(request: &ExportRequest, interfaces: &[&RestInterface]) -> String {
    sorted_interfaces(interfaces)
        .iter()
        .find_map(|i| i.version.clone())
        .or_else(|| request.api_version().map(str::to_string))
        .unwrap_or_else(|| DEFAULT_API_VERSION.to_string())
}
