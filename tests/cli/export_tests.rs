//! Export command tests

#[cfg(feature = "cli")]
use swagger_export::cli::commands::export::{ExportArgs, handle_export};
#[cfg(feature = "cli")]
use swagger_export::config::ExportSettings;
#[cfg(feature = "cli")]
use swagger_export::models::{Encoding, SchemaVersion};
#[cfg(feature = "cli")]
use tempfile::TempDir;

#[cfg(feature = "cli")]
fn write_project(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("shop.yaml");
    std::fs::write(
        &path,
        r#"name: Shop
interfaces:
  - name: PetStore
    endpoints: [https://petstore.example.com]
    resources:
      - name: pets
        path: /pets
        operations:
          - name: listPets
            method: GET
"#,
    )
    .unwrap();
    path
}

#[cfg(feature = "cli")]
#[test]
fn test_cli_export_saves_settings_after_success() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("api");
    let args = ExportArgs {
        project: write_project(temp.path()),
        target: Some(target.clone()),
        version: Some(SchemaVersion::Swagger20),
        format: Some(Encoding::Yaml),
        save_settings: true,
        settings_dir: temp.path().to_path_buf(),
        ..Default::default()
    };

    let primary = handle_export(&args).unwrap();
    assert_eq!(primary, target.join("swagger.yaml"));

    let settings = ExportSettings::load_file(temp.path()).unwrap();
    assert_eq!(settings.schema_version, SchemaVersion::Swagger20);
    assert_eq!(settings.format, Encoding::Yaml);
    assert_eq!(settings.target_folder, target.display().to_string());
}

#[cfg(feature = "cli")]
#[test]
fn test_cli_export_uses_saved_settings() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("saved");
    ExportSettings {
        target_folder: target.display().to_string(),
        schema_version: SchemaVersion::Swagger12,
        format: Encoding::Xml,
        ..Default::default()
    }
    .save(temp.path())
    .unwrap();

    let args = ExportArgs {
        project: write_project(temp.path()),
        settings_dir: temp.path().to_path_buf(),
        ..Default::default()
    };
    let primary = handle_export(&args).unwrap();

    assert_eq!(primary, target.join("api-docs.xml"));
    assert!(target.join("pets.xml").exists());
}

#[cfg(feature = "cli")]
#[test]
fn test_cli_failed_export_keeps_previous_settings() {
    let temp = TempDir::new().unwrap();
    let args = ExportArgs {
        project: write_project(temp.path()),
        target: Some(temp.path().join("out")),
        version: Some(SchemaVersion::OpenApi30),
        format: Some(Encoding::Xml),
        save_settings: true,
        settings_dir: temp.path().to_path_buf(),
        ..Default::default()
    };

    let err = handle_export(&args).unwrap_err();
    assert!(err.to_string().contains("cannot be exported as xml"));
    assert!(!ExportSettings::path_in(temp.path()).exists());
}
