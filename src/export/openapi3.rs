//! OpenAPI 3.0 builder
//!
//! Produces a single `openapi` document with one server per distinct endpoint.
//! Body and form parameters become a `requestBody`; response media types are
//! grouped under `content`.

use super::builder::{
    BuildError, DocumentBuilder, ResponseEntry, check_media_types, collect_responses,
    description, effective_parameters, flatten_resources, map_data_type, media_types,
    sorted_interfaces, title, typed_default, unified_version,
};
use super::document::{Document, DocumentKind, DocumentSet};
use super::endpoint::endpoints;
use super::request::ExportRequest;
use crate::models::{
    HttpMethod, Operation, Parameter, ParameterLocation, RepresentationKind, RestInterface,
    SchemaVersion, join_paths,
};
use serde_json::{Map, Value, json};
use std::collections::{BTreeSet, HashSet};

/// File stem of the OpenAPI 3.0 definition
pub const OPENAPI_DOCUMENT_NAME: &str = "openapi";

const OPENAPI_VERSION: &str = "3.0.1";
const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
const MULTIPART_FORM: &str = "multipart/form-data";

/// Builder for OpenAPI 3.0 definitions
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenApi3Builder;

impl DocumentBuilder for OpenApi3Builder {
    fn schema_version(&self) -> SchemaVersion {
        SchemaVersion::OpenApi30
    }

    fn build(
        &self,
        request: &ExportRequest,
        interfaces: &[&RestInterface],
    ) -> Result<DocumentSet, BuildError> {
        let mut paths: Map<String, Value> = Map::new();
        let mut schemas: BTreeSet<String> = BTreeSet::new();
        let mut seen: HashSet<(String, HttpMethod)> = HashSet::new();

        for flat in flatten_resources(interfaces) {
            for operation in flat.sorted_operations() {
                check_media_types(&flat, operation, SchemaVersion::OpenApi30)?;
                if !seen.insert((flat.full_path.clone(), operation.method)) {
                    return Err(BuildError::DuplicateOperation {
                        element: flat.operation_element(operation),
                        method: operation.method,
                        path: flat.full_path.clone(),
                    });
                }
                let parameters =
                    effective_parameters(&flat, operation, SchemaVersion::OpenApi30)?;
                let entry =
                    build_operation(&flat.interface.name, operation, &parameters, &mut schemas);

                if let Value::Object(item) = paths
                    .entry(flat.full_path.clone())
                    .or_insert_with(|| Value::Object(Map::new()))
                {
                    item.insert(operation.method.path_key().to_string(), entry);
                }
            }
        }

        let mut info = Map::new();
        info.insert("title".to_string(), json!(title(interfaces)));
        info.insert(
            "version".to_string(),
            json!(unified_version(request, interfaces)),
        );
        if let Some(description) = description(interfaces) {
            info.insert("description".to_string(), json!(description));
        }

        let mut root = Map::new();
        root.insert("openapi".to_string(), json!(OPENAPI_VERSION));
        root.insert("info".to_string(), Value::Object(info));
        let servers: Vec<Value> = server_urls(request, interfaces)
            .into_iter()
            .map(|url| json!({ "url": url }))
            .collect();
        if !servers.is_empty() {
            root.insert("servers".to_string(), Value::Array(servers));
        }
        root.insert("paths".to_string(), Value::Object(paths));
        if !schemas.is_empty() {
            let schemas: Map<String, Value> = schemas
                .into_iter()
                .map(|name| (name, json!({ "type": "object" })))
                .collect();
            root.insert("components".to_string(), json!({ "schemas": schemas }));
        }

        Ok(DocumentSet::single(
            OPENAPI_DOCUMENT_NAME,
            Document::new(DocumentKind::OpenApi, Value::Object(root)),
        ))
    }
}

/// Distinct server URLs: each endpoint joined with its interface base path
///
/// The request base path is appended only to endpoints of interfaces that
/// declare no base path and whose endpoints carry no path.
fn server_urls(request: &ExportRequest, interfaces: &[&RestInterface]) -> BTreeSet<String> {
    let mut urls = BTreeSet::new();
    for interface in sorted_interfaces(interfaces) {
        for endpoint in endpoints(interface) {
            let suffix = match (&interface.base_path, &endpoint.path, request.base_path()) {
                (Some(base_path), _, _) => Some(join_paths("", base_path)),
                (None, None, Some(requested)) if requested.starts_with('/') => {
                    Some(join_paths("", requested))
                }
                _ => None,
            };
            let url = match suffix {
                Some(suffix) if suffix != "/" => format!("{}{}", endpoint.url, suffix),
                _ => endpoint.url.clone(),
            };
            urls.insert(url);
        }
    }
    urls
}

fn schema_ref(name: &str, schemas: &mut BTreeSet<String>) -> Value {
    schemas.insert(name.to_string());
    json!({ "$ref": format!("#/components/schemas/{}", name) })
}

fn type_schema(parameter: &Parameter) -> Value {
    let (data_type, format) = map_data_type(&parameter.data_type);
    let mut schema = Map::new();
    schema.insert("type".to_string(), json!(data_type));
    if let Some(format) = format {
        schema.insert("format".to_string(), json!(format));
    }
    if let Some(default_value) = &parameter.default_value {
        schema.insert(
            "default".to_string(),
            typed_default(default_value, &parameter.data_type),
        );
    }
    Value::Object(schema)
}

fn build_operation(
    interface_name: &str,
    operation: &Operation,
    parameters: &[Parameter],
    schemas: &mut BTreeSet<String>,
) -> Value {
    let mut op = Map::new();
    op.insert("operationId".to_string(), json!(operation.name));
    if let Some(summary) = &operation.description {
        op.insert("summary".to_string(), json!(summary));
    }
    op.insert("tags".to_string(), json!([interface_name]));

    let params: Vec<Value> = parameters
        .iter()
        .filter(|p| matches!(
            p.location,
            ParameterLocation::Path | ParameterLocation::Query | ParameterLocation::Header
        ))
        .map(|p| {
            let mut param = Map::new();
            param.insert("name".to_string(), json!(p.name));
            param.insert("in".to_string(), json!(p.location.as_str()));
            param.insert(
                "required".to_string(),
                json!(p.required || p.location == ParameterLocation::Path),
            );
            if let Some(description) = &p.description {
                param.insert("description".to_string(), json!(description));
            }
            param.insert("schema".to_string(), type_schema(p));
            Value::Object(param)
        })
        .collect();
    if !params.is_empty() {
        op.insert("parameters".to_string(), Value::Array(params));
    }

    if let Some(body) = build_request_body(operation, parameters, schemas) {
        op.insert("requestBody".to_string(), body);
    }

    let responses = collect_responses(operation);
    let mut responses_obj = Map::new();
    if responses.is_empty() {
        responses_obj.insert(
            "default".to_string(),
            json!({ "description": "Default response" }),
        );
    }
    for (code, entry) in &responses {
        responses_obj.insert(code.to_string(), build_response(entry, schemas));
    }
    op.insert("responses".to_string(), Value::Object(responses_obj));

    Value::Object(op)
}

/// Request body from body/form parameters and request representations
fn build_request_body(
    operation: &Operation,
    parameters: &[Parameter],
    schemas: &mut BTreeSet<String>,
) -> Option<Value> {
    let body = parameters
        .iter()
        .find(|p| p.location == ParameterLocation::Body);
    let form: Vec<&Parameter> = parameters
        .iter()
        .filter(|p| p.location == ParameterLocation::Form)
        .collect();
    let declared = media_types(operation, &[RepresentationKind::Request]);

    if body.is_none() && form.is_empty() && declared.is_empty() {
        return None;
    }

    let mut content = Map::new();
    if !form.is_empty() {
        let media_type = if declared.iter().any(|m| m == MULTIPART_FORM) {
            MULTIPART_FORM
        } else {
            FORM_URLENCODED
        };
        let mut properties = Map::new();
        let mut required = Vec::new();
        for parameter in &form {
            properties.insert(parameter.name.clone(), type_schema(parameter));
            if parameter.required {
                required.push(json!(parameter.name));
            }
        }
        let mut schema = Map::new();
        schema.insert("type".to_string(), json!("object"));
        schema.insert("properties".to_string(), Value::Object(properties));
        if !required.is_empty() {
            schema.insert("required".to_string(), Value::Array(required));
        }
        content.insert(media_type.to_string(), json!({ "schema": schema }));
    }

    for representation in operation.representations_of(RepresentationKind::Request) {
        let media_type = representation.media_type.trim().to_string();
        if content.contains_key(&media_type) {
            continue;
        }
        let schema = match (&representation.schema_ref, body) {
            (Some(name), _) => schema_ref(name, schemas),
            (None, Some(parameter)) => type_schema(parameter),
            (None, None) => json!({}),
        };
        content.insert(media_type, json!({ "schema": schema }));
    }

    if content.is_empty()
        && let Some(parameter) = body
    {
        content.insert(
            "application/json".to_string(),
            json!({ "schema": type_schema(parameter) }),
        );
    }

    let mut request_body = Map::new();
    if let Some(description) = body.and_then(|p| p.description.clone()) {
        request_body.insert("description".to_string(), json!(description));
    }
    request_body.insert("content".to_string(), Value::Object(content));
    request_body.insert(
        "required".to_string(),
        json!(body.is_some_and(|p| p.required) || form.iter().any(|p| p.required)),
    );
    Some(Value::Object(request_body))
}

fn build_response(entry: &ResponseEntry, schemas: &mut BTreeSet<String>) -> Value {
    let mut content = Map::new();
    for (media_type, schema) in &entry.content {
        let media = match schema {
            Some(name) => json!({ "schema": schema_ref(name, schemas) }),
            None => json!({}),
        };
        // First declaration of a media type wins
        if !content.contains_key(media_type) {
            content.insert(media_type.clone(), media);
        }
    }

    let mut response = Map::new();
    response.insert("description".to_string(), json!(entry.description));
    if !content.is_empty() {
        response.insert("content".to_string(), Value::Object(content));
    }
    Value::Object(response)
}
