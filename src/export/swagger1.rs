//! Swagger 1.2 builder
//!
//! Produces a resource listing (`api-docs`) plus one API declaration per
//! resource. Swagger 1.2 is a point-in-time export: the API version label and
//! the base path come from the request, not from the interface endpoints.

use super::builder::{
    BuildError, DEFAULT_API_VERSION, DocumentBuilder, FlatResource, check_media_types,
    check_method, collect_responses, effective_parameters, flatten_resources, map_data_type,
    media_types, request_schema, title,
};
use super::document::{Document, DocumentKind, DocumentSet, NamedDocument};
use super::request::ExportRequest;
use crate::models::{
    HttpMethod, Operation, Parameter, ParameterLocation, RepresentationKind, RestInterface,
    SchemaVersion,
};
use serde_json::{Map, Value, json};
use std::collections::HashSet;

/// File stem of the resource listing
pub const RESOURCE_LISTING_NAME: &str = "api-docs";

const SWAGGER_VERSION: &str = "1.2";

const SUPPORTED_METHODS: [HttpMethod; 7] = [
    HttpMethod::Get,
    HttpMethod::Post,
    HttpMethod::Put,
    HttpMethod::Delete,
    HttpMethod::Patch,
    HttpMethod::Head,
    HttpMethod::Options,
];

/// Builder for the Swagger 1.2 resource listing family
#[derive(Debug, Default, Clone, Copy)]
pub struct Swagger1Builder;

impl DocumentBuilder for Swagger1Builder {
    fn schema_version(&self) -> SchemaVersion {
        SchemaVersion::Swagger12
    }

    fn build(
        &self,
        request: &ExportRequest,
        interfaces: &[&RestInterface],
    ) -> Result<DocumentSet, BuildError> {
        let api_version = request.api_version().unwrap_or(DEFAULT_API_VERSION);
        let base_path = request.base_path().unwrap_or("");

        let resources = flatten_resources(interfaces);
        let stems = file_stems(&resources);

        let mut listing_apis = Vec::with_capacity(resources.len());
        let mut declarations = Vec::with_capacity(resources.len());
        for (flat, stem) in resources.iter().zip(stems) {
            let declaration = build_declaration(flat, api_version, base_path)?;
            listing_apis.push(json!({
                "path": format!("/{}.{{format}}", stem),
                "description": flat
                    .resource
                    .description
                    .clone()
                    .unwrap_or_else(|| flat.resource.name.clone()),
            }));
            declarations.push(NamedDocument {
                name: stem,
                document: Document::new(DocumentKind::ApiDeclaration, declaration),
            });
        }

        let listing = json!({
            "swaggerVersion": SWAGGER_VERSION,
            "apiVersion": api_version,
            "info": { "title": title(interfaces) },
            "apis": listing_apis,
        });

        Ok(DocumentSet::with_parts(
            NamedDocument {
                name: RESOURCE_LISTING_NAME.to_string(),
                document: Document::new(DocumentKind::ResourceListing, listing),
            },
            declarations,
        ))
    }
}

fn build_declaration(
    flat: &FlatResource<'_>,
    api_version: &str,
    base_path: &str,
) -> Result<Value, BuildError> {
    let mut operations = Vec::new();
    let mut produces = Vec::new();
    let mut consumes = Vec::new();

    for operation in flat.sorted_operations() {
        check_method(
            flat,
            operation,
            SchemaVersion::Swagger12,
            &SUPPORTED_METHODS,
        )?;
        check_media_types(flat, operation, SchemaVersion::Swagger12)?;
        let parameters = effective_parameters(flat, operation, SchemaVersion::Swagger12)?;

        produces.extend(media_types(
            operation,
            &[RepresentationKind::Response, RepresentationKind::Fault],
        ));
        consumes.extend(media_types(operation, &[RepresentationKind::Request]));
        operations.push(build_operation(operation, &parameters));
    }
    produces.sort();
    produces.dedup();
    consumes.sort();
    consumes.dedup();

    let apis = if operations.is_empty() {
        Vec::new()
    } else {
        let mut api = Map::new();
        api.insert("path".to_string(), json!(flat.full_path));
        if let Some(description) = &flat.resource.description {
            api.insert("description".to_string(), json!(description));
        }
        api.insert("operations".to_string(), Value::Array(operations));
        vec![Value::Object(api)]
    };

    Ok(json!({
        "swaggerVersion": SWAGGER_VERSION,
        "apiVersion": api_version,
        "basePath": base_path,
        "resourcePath": flat.full_path,
        "produces": produces,
        "consumes": consumes,
        "apis": apis,
    }))
}

fn build_operation(operation: &Operation, parameters: &[Parameter]) -> Value {
    let responses = collect_responses(operation);

    // The declared return type is the model of the first successful response
    let return_type = responses
        .range(200..300)
        .find_map(|(_, entry)| entry.schema())
        .unwrap_or("void");

    let mut params: Vec<Value> = parameters
        .iter()
        .map(|p| build_parameter(p, operation))
        .collect();
    let has_payload = parameters
        .iter()
        .any(|p| matches!(p.location, ParameterLocation::Body | ParameterLocation::Form));
    if !has_payload && let Some(schema) = request_schema(operation) {
        params.push(json!({
            "paramType": "body",
            "name": "body",
            "type": schema,
            "required": false,
            "allowMultiple": false,
        }));
    }

    let response_messages: Vec<Value> = responses
        .iter()
        .map(|(code, entry)| {
            let mut message = Map::new();
            message.insert("code".to_string(), json!(code));
            message.insert("message".to_string(), json!(entry.description));
            if let Some(schema) = entry.schema() {
                message.insert("responseModel".to_string(), json!(schema));
            }
            Value::Object(message)
        })
        .collect();

    json!({
        "method": operation.method.as_str(),
        "nickname": operation.name,
        "summary": operation.description.clone().unwrap_or_else(|| operation.name.clone()),
        "type": return_type,
        "parameters": params,
        "responseMessages": response_messages,
    })
}

fn build_parameter(parameter: &Parameter, operation: &Operation) -> Value {
    let mut param = Map::new();
    param.insert(
        "paramType".to_string(),
        json!(parameter.location.as_str()),
    );
    param.insert("name".to_string(), json!(parameter.name));

    let body_schema = match parameter.location {
        ParameterLocation::Body => request_schema(operation),
        _ => None,
    };
    match body_schema {
        Some(schema) => {
            param.insert("type".to_string(), json!(schema));
        }
        None => {
            let (data_type, format) = map_data_type(&parameter.data_type);
            param.insert("type".to_string(), json!(data_type));
            if let Some(format) = format {
                param.insert("format".to_string(), json!(format));
            }
        }
    }

    param.insert(
        "required".to_string(),
        json!(parameter.required || parameter.location == ParameterLocation::Path),
    );
    if let Some(description) = &parameter.description {
        param.insert("description".to_string(), json!(description));
    }
    if let Some(default_value) = &parameter.default_value {
        param.insert("defaultValue".to_string(), json!(default_value));
    }
    param.insert("allowMultiple".to_string(), json!(false));
    Value::Object(param)
}

/// Unique, filesystem-safe file stems for the declarations, in resource order
///
/// Stems derive from resource names; clashes get `_2`, `_3`, ... suffixes and
/// the resource listing's own stem is never reused. Stems are compared without
/// case so no two files collide on a case-insensitive filesystem.
fn file_stems(resources: &[FlatResource<'_>]) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::new();
    used.insert(RESOURCE_LISTING_NAME.to_string());

    resources
        .iter()
        .map(|flat| {
            let base = sanitize_file_stem(&flat.resource.name);
            let mut stem = base.clone();
            let mut counter = 2;
            while used.contains(&stem.to_lowercase()) {
                stem = format!("{}_{}", base, counter);
                counter += 1;
            }
            used.insert(stem.to_lowercase());
            stem
        })
        .collect()
}

/// Sanitize a resource name into a file stem
fn sanitize_file_stem(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' => c,
            _ => '_',
        })
        .collect();
    let trimmed = sanitized.trim_matches('_');
    if trimmed.is_empty() {
        "resource".to_string()
    } else {
        trimmed.to_string()
    }
}
