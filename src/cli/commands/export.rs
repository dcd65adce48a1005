//! Export command handlers

use crate::cli::error::CliError;
use crate::config::ExportSettings;
use crate::export::{ExportEngine, ExportRequest};
use crate::models::{Encoding, Project, SchemaVersion};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Arguments for the export command
#[derive(Debug, Clone, Default)]
pub struct ExportArgs {
    pub project: PathBuf,
    /// Interfaces to export; empty selects the only interface of the project
    pub apis: Vec<String>,
    pub target: Option<PathBuf>,
    pub version: Option<SchemaVersion>,
    pub format: Option<Encoding>,
    pub api_version: Option<String>,
    pub base_path: Option<String>,
    pub save_settings: bool,
    /// Directory holding `.swagger-export.toml`
    pub settings_dir: PathBuf,
}

/// Arguments for the list command
#[derive(Debug, Clone)]
pub struct ListArgs {
    pub project: PathBuf,
}

/// Load a project model from a `.json`, `.yaml` or `.yml` file
pub fn load_project(path: &Path) -> Result<Project, CliError> {
    if !path.exists() {
        return Err(CliError::FileNotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)
        .map_err(|e| CliError::FileReadError(path.to_path_buf(), e.to_string()))?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);
    match extension.as_deref() {
        Some("json") => Project::from_json(&content)
            .map_err(|e| CliError::ProjectParseError(path.to_path_buf(), e.to_string())),
        Some("yaml") | Some("yml") => Project::from_yaml(&content)
            .map_err(|e| CliError::ProjectParseError(path.to_path_buf(), e.to_string())),
        _ => Err(CliError::InvalidArgument(format!(
            "Unsupported project file: {}. Use a .json, .yaml or .yml file.",
            path.display()
        ))),
    }
}

/// Build the request from arguments, falling back to saved settings
///
/// Returns the request and the settings to remember after a successful export.
pub fn resolve_request(
    args: &ExportArgs,
    project: &Project,
    settings: &ExportSettings,
) -> Result<(ExportRequest, ExportSettings), CliError> {
    let apis = if !args.apis.is_empty() {
        args.apis.clone()
    } else if let [only] = project.interfaces.as_slice() {
        vec![only.name.clone()]
    } else {
        return Err(CliError::InvalidArgument(format!(
            "Select an API with --api. Available: {}",
            project.interface_names().join(", ")
        )));
    };

    let target = match &args.target {
        Some(target) => target.clone(),
        None if !settings.target_folder.trim().is_empty() => {
            PathBuf::from(settings.target_folder.trim())
        }
        None => {
            return Err(CliError::InvalidArgument(
                "No target folder. Use --target.".to_string(),
            ));
        }
    };
    let schema_version = args.version.unwrap_or(settings.schema_version);
    let encoding = args.format.unwrap_or(settings.format);
    let api_version = args
        .api_version
        .clone()
        .unwrap_or_else(|| settings.api_version.clone());
    let base_path = args
        .base_path
        .clone()
        .unwrap_or_else(|| settings.base_path.clone());

    let request = ExportRequest::new(apis, target.clone(), schema_version, encoding)
        .with_api_version(api_version.as_str())
        .with_base_path(base_path.as_str());

    let remembered = ExportSettings {
        base_path,
        target_folder: target.display().to_string(),
        format: encoding,
        api_version,
        schema_version,
    };
    Ok((request, remembered))
}

/// Handle the export command, returning the primary written file
pub fn handle_export(args: &ExportArgs) -> Result<PathBuf, CliError> {
    let project = load_project(&args.project)?;
    let settings = ExportSettings::load(&args.settings_dir)?;
    let (request, remembered) = resolve_request(args, &project, &settings)?;

    let engine = ExportEngine::filesystem();
    let report = engine.export_report(&request, &project)?;

    if args.save_settings {
        remembered.save(&args.settings_dir)?;
        info!(
            "Saved export settings to {}",
            ExportSettings::path_in(&args.settings_dir).display()
        );
    }

    println!(
        "Exported {} as {} ({} file(s))",
        request.interfaces().join(", "),
        request.schema_version(),
        report.files.len()
    );
    for file in &report.files {
        println!("  {}", file.display());
    }
    Ok(report.primary().to_path_buf())
}

/// Describe the interfaces and endpoints of a project
pub fn format_listing(project: &Project) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Project: {}", project.name);
    for interface in &project.interfaces {
        let _ = write!(out, "  {}", interface.name);
        if let Some(version) = &interface.version {
            let _ = write!(out, " ({})", version);
        }
        let _ = writeln!(out, " - {} operation(s)", interface.operation_count());
        if interface.endpoints.is_empty() {
            let _ = writeln!(out, "    (no endpoints)");
        }
        for endpoint in &interface.endpoints {
            let _ = writeln!(out, "    {}", endpoint);
        }
    }
    out
}

/// Handle the list command
pub fn handle_list(args: &ListArgs) -> Result<(), CliError> {
    let project = load_project(&args.project)?;
    if project.interfaces.is_empty() {
        warn!("Project '{}' has no API interfaces", project.name);
    }
    print!("{}", format_listing(&project));
    Ok(())
}
