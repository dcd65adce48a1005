//! Swagger 2.0 builder
//!
//! Produces a single `swagger` document. Host, schemes and base path come from
//! the selected interfaces; the request base path is only used when the model
//! has none.

use super::builder::{
    BuildError, DocumentBuilder, ResponseEntry, check_media_types, check_method,
    collect_responses, description, effective_parameters, flatten_resources, map_data_type,
    media_types, request_schema, sorted_interfaces, title, typed_default, unified_version,
};
use super::document::{Document, DocumentKind, DocumentSet};
use super::endpoint::{Endpoint, endpoints};
use super::request::ExportRequest;
use crate::models::{
    HttpMethod, Operation, Parameter, ParameterLocation, RepresentationKind, RestInterface,
    SchemaVersion, join_paths,
};
use serde_json::{Map, Value, json};
use std::collections::{BTreeSet, HashSet};

/// File stem of the Swagger 2.0 definition
pub const SWAGGER_DOCUMENT_NAME: &str = "swagger";

const SUPPORTED_METHODS: [HttpMethod; 7] = [
    HttpMethod::Get,
    HttpMethod::Post,
    HttpMethod::Put,
    HttpMethod::Delete,
    HttpMethod::Patch,
    HttpMethod::Head,
    HttpMethod::Options,
];

const SUPPORTED_SCHEMES: [&str; 4] = ["http", "https", "ws", "wss"];

/// Builder for Swagger 2.0 definitions
#[derive(Debug, Default, Clone, Copy)]
pub struct Swagger2Builder;

impl DocumentBuilder for Swagger2Builder {
    fn schema_version(&self) -> SchemaVersion {
        SchemaVersion::Swagger20
    }

    fn build(
        &self,
        request: &ExportRequest,
        interfaces: &[&RestInterface],
    ) -> Result<DocumentSet, BuildError> {
        let mut paths: Map<String, Value> = Map::new();
        let mut definitions: BTreeSet<String> = BTreeSet::new();
        let mut seen: HashSet<(String, HttpMethod)> = HashSet::new();

        for flat in flatten_resources(interfaces) {
            for operation in flat.sorted_operations() {
                check_method(
                    &flat,
                    operation,
                    SchemaVersion::Swagger20,
                    &SUPPORTED_METHODS,
                )?;
                check_media_types(&flat, operation, SchemaVersion::Swagger20)?;
                if !seen.insert((flat.full_path.clone(), operation.method)) {
                    return Err(BuildError::DuplicateOperation {
                        element: flat.operation_element(operation),
                        method: operation.method,
                        path: flat.full_path.clone(),
                    });
                }
                let parameters =
                    effective_parameters(&flat, operation, SchemaVersion::Swagger20)?;
                let entry = build_operation(
                    &flat.interface.name,
                    operation,
                    &parameters,
                    &mut definitions,
                );

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

        let parsed: Vec<Endpoint> = sorted_interfaces(interfaces)
            .into_iter()
            .flat_map(endpoints)
            .collect();

        let mut root = Map::new();
        root.insert("swagger".to_string(), json!("2.0"));
        root.insert("info".to_string(), Value::Object(info));
        if let Some(first) = parsed.first() {
            root.insert("host".to_string(), json!(first.host));
        }
        let schemes: BTreeSet<&str> = parsed
            .iter()
            .map(|e| e.scheme.as_str())
            .filter(|s| SUPPORTED_SCHEMES.contains(s))
            .collect();
        if !schemes.is_empty() {
            root.insert("schemes".to_string(), json!(schemes));
        }
        root.insert(
            "basePath".to_string(),
            json!(base_path(request, interfaces, &parsed)),
        );
        root.insert("paths".to_string(), Value::Object(paths));
        if !definitions.is_empty() {
            let definitions: Map<String, Value> = definitions
                .into_iter()
                .map(|name| (name, json!({ "type": "object" })))
                .collect();
            root.insert("definitions".to_string(), Value::Object(definitions));
        }

        Ok(DocumentSet::single(
            SWAGGER_DOCUMENT_NAME,
            Document::new(DocumentKind::Swagger, Value::Object(root)),
        ))
    }
}

/// Base path: interface base path, endpoint path, request base path, then `/`
fn base_path(
    request: &ExportRequest,
    interfaces: &[&RestInterface],
    parsed: &[Endpoint],
) -> String {
    let sorted = sorted_interfaces(interfaces);
    if let Some(configured) = sorted.iter().find_map(|i| i.base_path.as_deref()) {
        return join_paths("", configured);
    }
    if let Some(path) = parsed.iter().find_map(|e| e.path.clone()) {
        return path;
    }
    match request.base_path() {
        Some(requested) => match Endpoint::parse(requested) {
            Some(endpoint) => endpoint.path.unwrap_or_else(|| "/".to_string()),
            None => join_paths("", requested),
        },
        None => "/".to_string(),
    }
}

fn schema_ref(name: &str, definitions: &mut BTreeSet<String>) -> Value {
    definitions.insert(name.to_string());
    json!({ "$ref": format!("#/definitions/{}", name) })
}

fn build_operation(
    interface_name: &str,
    operation: &Operation,
    parameters: &[Parameter],
    definitions: &mut BTreeSet<String>,
) -> Value {
    let mut op = Map::new();
    op.insert("operationId".to_string(), json!(operation.name));
    if let Some(summary) = &operation.description {
        op.insert("summary".to_string(), json!(summary));
    }
    op.insert("tags".to_string(), json!([interface_name]));

    let consumes = media_types(operation, &[RepresentationKind::Request]);
    if !consumes.is_empty() {
        op.insert("consumes".to_string(), json!(consumes));
    }
    let produces = media_types(
        operation,
        &[RepresentationKind::Response, RepresentationKind::Fault],
    );
    if !produces.is_empty() {
        op.insert("produces".to_string(), json!(produces));
    }

    let mut params: Vec<Value> = parameters
        .iter()
        .map(|p| build_parameter(p, operation, definitions))
        .collect();
    let has_payload = parameters
        .iter()
        .any(|p| matches!(p.location, ParameterLocation::Body | ParameterLocation::Form));
    if !has_payload && let Some(schema) = request_schema(operation) {
        params.push(json!({
            "name": "body",
            "in": "body",
            "required": false,
            "schema": schema_ref(schema, definitions),
        }));
    }
    if !params.is_empty() {
        op.insert("parameters".to_string(), Value::Array(params));
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
        responses_obj.insert(code.to_string(), build_response(entry, definitions));
    }
    op.insert("responses".to_string(), Value::Object(responses_obj));

    Value::Object(op)
}

fn build_response(entry: &ResponseEntry, definitions: &mut BTreeSet<String>) -> Value {
    let mut response = Map::new();
    response.insert("description".to_string(), json!(entry.description));
    if let Some(schema) = entry.schema() {
        response.insert("schema".to_string(), schema_ref(schema, definitions));
    }
    Value::Object(response)
}

fn build_parameter(
    parameter: &Parameter,
    operation: &Operation,
    definitions: &mut BTreeSet<String>,
) -> Value {
    let mut param = Map::new();
    param.insert("name".to_string(), json!(parameter.name));
    let location = match parameter.location {
        ParameterLocation::Form => "formData",
        other => other.as_str(),
    };
    param.insert("in".to_string(), json!(location));
    param.insert(
        "required".to_string(),
        json!(parameter.required || parameter.location == ParameterLocation::Path),
    );
    if let Some(description) = &parameter.description {
        param.insert("description".to_string(), json!(description));
    }

    let (data_type, format) = map_data_type(&parameter.data_type);
    if parameter.location == ParameterLocation::Body {
        let schema = match request_schema(operation) {
            Some(name) => schema_ref(name, definitions),
            None => json!({ "type": data_type }),
        };
        param.insert("schema".to_string(), schema);
    } else {
        param.insert("type".to_string(), json!(data_type));
        if let Some(format) = format {
            param.insert("format".to_string(), json!(format));
        }
        if let Some(default_value) = &parameter.default_value {
            param.insert(
                "default".to_string(),
                typed_default(default_value, &parameter.data_type),
            );
        }
    }
    Value::Object(param)
}
