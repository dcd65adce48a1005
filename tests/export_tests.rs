//! Export engine tests

use serde_json::Value;
use std::collections::BTreeSet;
use std::path::Path;
use swagger_export::export::{ExportEngine, ExportError, ExportRequest, WriteError};
use swagger_export::models::{
    Encoding, HttpMethod, Operation, Parameter, ParameterLocation, Project, Representation,
    Resource, RestInterface, SchemaVersion,
};
use swagger_export::validation::SelectionError;
use swagger_export::{ExportErrorKind, MemoryStorageBackend};
use tempfile::TempDir;

fn petstore() -> RestInterface {
    RestInterface::new("PetStore")
        .with_description("Pets for everyone")
        .with_endpoint("https://petstore.example.com/v1")
        .with_resource(
            Resource::new("pets", "/pets").with_operation(
                Operation::new("listPets", HttpMethod::Get).with_representation(
                    Representation::response("application/json", vec![200]).with_schema("PetList"),
                ),
            ),
        )
}

fn orders() -> RestInterface {
    RestInterface::new("Orders")
        .with_endpoint("http://localhost:8080")
        .with_resource(
            Resource::new("orders", "/orders")
                .with_operation(Operation::new("listOrders", HttpMethod::Get))
                .with_operation(
                    Operation::new("createOrder", HttpMethod::Post)
                        .with_parameter(Parameter::new("order", ParameterLocation::Body).required())
                        .with_representation(
                            Representation::request("application/json").with_schema("Order"),
                        )
                        .with_representation(Representation::response("application/json", vec![201])),
                )
                .with_child(
                    Resource::new("order", "{orderId}")
                        .with_operation(Operation::new("getOrder", HttpMethod::Get))
                        .with_operation(Operation::new("deleteOrder", HttpMethod::Delete)),
                ),
        )
}

fn project() -> Project {
    Project::new("Shop")
        .with_interface(petstore())
        .with_interface(orders())
        .with_interface(RestInterface::new("Empty"))
}

fn dir_entries(dir: &Path) -> BTreeSet<String> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect()
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_scenario_a_openapi_json_single_file() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("out");
    let request = ExportRequest::new(["PetStore"], &target, SchemaVersion::OpenApi30, Encoding::Json);

    let primary = ExportEngine::filesystem().export(&request, &project()).unwrap();

    assert_eq!(primary, target.join("openapi.json"));
    assert_eq!(dir_entries(&target), BTreeSet::from(["openapi.json".to_string()]));

    let doc = read_json(&primary);
    let paths = doc["paths"].as_object().unwrap();
    assert_eq!(paths.len(), 1);
    let pets = paths["/pets"].as_object().unwrap();
    assert_eq!(pets.keys().collect::<Vec<_>>(), vec!["get"]);
    assert_eq!(doc["servers"][0]["url"], "https://petstore.example.com/v1");
}

#[test]
fn test_scenario_b_xml_for_openapi_is_incompatible() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("out");
    let request = ExportRequest::new(["PetStore"], &target, SchemaVersion::OpenApi30, Encoding::Xml);

    let err = ExportEngine::filesystem().export(&request, &project()).unwrap_err();

    assert!(matches!(err, ExportError::Compatibility(_)));
    assert!(!target.exists());
}

#[test]
fn test_scenario_c_empty_selection() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("out");
    let request = ExportRequest::new(
        Vec::<String>::new(),
        &target,
        SchemaVersion::OpenApi30,
        Encoding::Json,
    );

    let err = ExportEngine::filesystem().export(&request, &project()).unwrap_err();

    match err {
        ExportError::Selection(errors) => assert_eq!(errors, vec![SelectionError::NoInterfaces]),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!target.exists());
}

#[test]
fn test_scenario_d_interface_without_endpoints() {
    let engine = ExportEngine::new(MemoryStorageBackend::new());
    let request = ExportRequest::new(["Empty"], "out", SchemaVersion::Swagger20, Encoding::Json);

    let err = engine.export(&request, &project()).unwrap_err();

    match err {
        ExportError::Selection(errors) => {
            assert_eq!(errors, vec![SelectionError::NoEndpoints("Empty".to_string())])
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(engine.backend().files().is_empty());
}

#[test]
fn test_scenario_e_swagger12_listing_and_declarations() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("legacy");
    let shop = Project::new("Shop").with_interface(
        petstore().with_resource(
            Resource::new("orders", "/orders")
                .with_operation(Operation::new("listOrders", HttpMethod::Get)),
        ),
    );
    let request = ExportRequest::new(["PetStore"], &target, SchemaVersion::Swagger12, Encoding::Json)
        .with_api_version("3.1")
        .with_base_path("https://petstore.example.com/v1");

    let primary = ExportEngine::filesystem().export(&request, &shop).unwrap();

    assert_eq!(primary, target.join("api-docs.json"));
    assert_eq!(
        dir_entries(&target),
        BTreeSet::from([
            "api-docs.json".to_string(),
            "orders.json".to_string(),
            "pets.json".to_string(),
        ])
    );

    let listing = read_json(&primary);
    assert_eq!(listing["swaggerVersion"], "1.2");
    assert_eq!(listing["apiVersion"], "3.1");
    let referenced: Vec<&str> = listing["apis"]
        .as_array()
        .unwrap()
        .iter()
        .map(|api| api["path"].as_str().unwrap())
        .collect();
    assert_eq!(referenced, vec!["/orders.{format}", "/pets.{format}"]);

    let pets = read_json(&target.join("pets.json"));
    assert_eq!(pets["basePath"], "https://petstore.example.com/v1");
    assert_eq!(pets["resourcePath"], "/pets");
    assert_eq!(pets["apis"][0]["operations"][0]["method"], "GET");
    assert_eq!(pets["apis"][0]["operations"][0]["type"], "PetList");
}

#[test]
fn test_swagger12_xml_export() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("xml");
    let request = ExportRequest::new(["Orders"], &target, SchemaVersion::Swagger12, Encoding::Xml);

    ExportEngine::filesystem().export(&request, &project()).unwrap();

    assert_eq!(
        dir_entries(&target),
        BTreeSet::from([
            "api-docs.xml".to_string(),
            "order.xml".to_string(),
            "orders.xml".to_string(),
        ])
    );
    let listing = std::fs::read_to_string(target.join("api-docs.xml")).unwrap();
    assert!(listing.contains("<resourceListing>"));
    assert!(listing.contains("<path>/order.{format}</path>"));
}

#[test]
fn test_repeated_exports_are_byte_identical() {
    let cases = [
        (SchemaVersion::Swagger12, Encoding::Json),
        (SchemaVersion::Swagger12, Encoding::Xml),
        (SchemaVersion::Swagger20, Encoding::Json),
        (SchemaVersion::Swagger20, Encoding::Yaml),
        (SchemaVersion::OpenApi30, Encoding::Json),
        (SchemaVersion::OpenApi30, Encoding::Yaml),
    ];
    for (version, encoding) in cases {
        let temp = TempDir::new().unwrap();
        let request =
            ExportRequest::new(["PetStore", "Orders"], temp.path(), version, encoding);
        let engine = ExportEngine::filesystem();

        let first = engine.export_report(&request, &project()).unwrap();
        let first_bytes: Vec<Vec<u8>> = first.files.iter().map(|f| std::fs::read(f).unwrap()).collect();

        let second = engine.export_report(&request, &project()).unwrap();
        let second_bytes: Vec<Vec<u8>> =
            second.files.iter().map(|f| std::fs::read(f).unwrap()).collect();

        assert_eq!(first.files, second.files, "{version} / {encoding}");
        assert_eq!(first_bytes, second_bytes, "{version} / {encoding}");
    }
}

#[test]
fn test_selection_order_does_not_change_output() {
    let engine = ExportEngine::new(MemoryStorageBackend::new());
    let a = ExportRequest::new(["PetStore", "Orders"], "a", SchemaVersion::Swagger20, Encoding::Json);
    let b = ExportRequest::new(["Orders", "PetStore"], "b", SchemaVersion::Swagger20, Encoding::Json);

    engine.export(&a, &project()).unwrap();
    engine.export(&b, &project()).unwrap();

    assert_eq!(
        engine.backend().read_to_string("a/swagger.json"),
        engine.backend().read_to_string("b/swagger.json")
    );
}

#[test]
fn test_listing_references_every_resource_once() {
    let engine = ExportEngine::new(MemoryStorageBackend::new());
    let request = ExportRequest::new(["PetStore", "Orders"], "out", SchemaVersion::Swagger12, Encoding::Json);

    let report = engine.export_report(&request, &project()).unwrap();

    let listing: Value =
        serde_json::from_str(&engine.backend().read_to_string("out/api-docs.json").unwrap()).unwrap();
    let referenced: Vec<String> = listing["apis"]
        .as_array()
        .unwrap()
        .iter()
        .map(|api| api["path"].as_str().unwrap().to_string())
        .collect();
    let unique: BTreeSet<&String> = referenced.iter().collect();

    // orders, order ({orderId}) and pets
    assert_eq!(referenced.len(), 3);
    assert_eq!(unique.len(), 3);
    assert_eq!(report.files.len(), 4);
}

#[test]
fn test_unified_documents_hold_every_operation_once() {
    let selected = project();
    let expected: usize = ["PetStore", "Orders"]
        .iter()
        .map(|name| selected.interface(name).unwrap().operation_count())
        .sum();

    for version in [SchemaVersion::Swagger20, SchemaVersion::OpenApi30] {
        let engine = ExportEngine::new(MemoryStorageBackend::new());
        let request = ExportRequest::new(["PetStore", "Orders"], "out", version, Encoding::Json);
        let primary = engine.export(&request, &selected).unwrap();

        let doc: Value =
            serde_json::from_str(&engine.backend().read_to_string(&primary).unwrap()).unwrap();
        let paths = doc["paths"].as_object().unwrap();
        let operations: usize = paths.values().map(|item| item.as_object().unwrap().len()).sum();

        assert_eq!(operations, expected, "{version}");
        assert!(paths["/orders/{orderId}"].get("delete").is_some());
        assert_eq!(
            paths["/orders/{orderId}"]["get"]["parameters"][0]["name"],
            "orderId"
        );
    }
}

#[test]
fn test_build_errors_write_nothing() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("out");
    let traced = Project::new("Shop").with_interface(
        petstore().with_resource(
            Resource::new("debug", "/debug").with_operation(Operation::new("trace", HttpMethod::Trace)),
        ),
    );

    let request = ExportRequest::new(["PetStore"], &target, SchemaVersion::Swagger20, Encoding::Json);
    let err = ExportEngine::filesystem().export(&request, &traced).unwrap_err();
    assert_eq!(err.kind(), ExportErrorKind::Build);
    assert!(!target.exists());

    // TRACE has a slot in OpenAPI 3.0
    let request = ExportRequest::new(["PetStore"], &target, SchemaVersion::OpenApi30, Encoding::Json);
    assert!(ExportEngine::filesystem().export(&request, &traced).is_ok());
}

#[test]
fn test_failed_commit_leaves_no_new_files() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("out");
    // A directory where a declaration should go makes its rename fail
    std::fs::create_dir_all(target.join("pets.json")).unwrap();

    let shop = Project::new("Shop").with_interface(
        petstore().with_resource(
            Resource::new("orders", "/orders")
                .with_operation(Operation::new("listOrders", HttpMethod::Get)),
        ),
    );
    let request = ExportRequest::new(["PetStore"], &target, SchemaVersion::Swagger12, Encoding::Json);
    let err = ExportEngine::filesystem().export(&request, &shop).unwrap_err();

    match err {
        ExportError::Write(WriteError::Batch {
            failed, committed, ..
        }) => {
            assert_eq!(failed, target.join("pets.json"));
            assert_eq!(committed, 2);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(dir_entries(&target), BTreeSet::from(["pets.json".to_string()]));
}

#[test]
fn test_failed_export_keeps_earlier_export() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("out");
    let shop = Project::new("Shop").with_interface(
        petstore().with_resource(
            Resource::new("orders", "/orders")
                .with_operation(Operation::new("listOrders", HttpMethod::Get)),
        ),
    );
    let earlier = ExportRequest::new(["PetStore"], &target, SchemaVersion::Swagger12, Encoding::Json);
    ExportEngine::filesystem().export(&earlier, &shop).unwrap();
    let listing = std::fs::read(target.join("api-docs.json")).unwrap();
    let orders = std::fs::read(target.join("orders.json")).unwrap();

    std::fs::remove_file(target.join("pets.json")).unwrap();
    std::fs::create_dir(target.join("pets.json")).unwrap();
    let request = earlier.with_api_version("2.0");
    let err = ExportEngine::filesystem().export(&request, &shop).unwrap_err();

    match &err {
        ExportError::Write(write) => assert!(write.rolled_back(), "{write}"),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(
        dir_entries(&target),
        BTreeSet::from([
            "api-docs.json".to_string(),
            "orders.json".to_string(),
            "pets.json".to_string(),
        ])
    );
    assert_eq!(std::fs::read(target.join("api-docs.json")).unwrap(), listing);
    assert_eq!(std::fs::read(target.join("orders.json")).unwrap(), orders);
}

#[test]
fn test_declaration_files_are_unique_ignoring_case() {
    let engine = ExportEngine::new(MemoryStorageBackend::new());
    let shop = Project::new("Shop").with_interface(
        RestInterface::new("Zoo")
            .with_endpoint("http://localhost")
            .with_resource(Resource::new("Pets", "/pets"))
            .with_resource(Resource::new("pets", "/more-pets")),
    );
    let request = ExportRequest::new(["Zoo"], "out", SchemaVersion::Swagger12, Encoding::Json);

    let report = engine.export_report(&request, &shop).unwrap();

    let folded: BTreeSet<String> = report
        .files
        .iter()
        .map(|f| f.to_string_lossy().to_lowercase())
        .collect();
    assert_eq!(report.files.len(), 3);
    assert_eq!(folded.len(), 3);
}
