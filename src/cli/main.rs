//! CLI binary entry point for swagger-export

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use swagger_export::cli::commands::export::{ExportArgs, ListArgs, handle_export, handle_list};
use swagger_export::models::{Encoding, SchemaVersion};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "swagger-export")]
#[command(about = "Export REST API models as Swagger 1.2, Swagger 2.0 or OpenAPI 3.0")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export one or more API interfaces of a project
    Export {
        /// Project model file (.json, .yaml or .yml)
        #[arg(short, long)]
        project: PathBuf,
        /// API interface to export (repeatable). Optional when the project has one interface.
        #[arg(short, long = "api")]
        apis: Vec<String>,
        /// Target folder. Defaults to the last used folder.
        #[arg(short, long)]
        target: Option<PathBuf>,
        /// Schema version: swagger-1.2, swagger-2.0 or openapi-3.0
        #[arg(short, long)]
        version: Option<SchemaVersion>,
        /// Encoding: json, yaml or xml
        #[arg(short, long)]
        format: Option<Encoding>,
        /// API version label for documents whose model carries none
        #[arg(long)]
        api_version: Option<String>,
        /// Base path or URL written into the definition
        #[arg(long)]
        base_path: Option<String>,
        /// Don't remember the options used for this export
        #[arg(long)]
        no_save_settings: bool,
        /// Directory holding .swagger-export.toml
        #[arg(long, default_value = ".")]
        settings_dir: PathBuf,
    },
    /// List the API interfaces and endpoints of a project
    List {
        /// Project model file (.json, .yaml or .yml)
        #[arg(short, long)]
        project: PathBuf,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Export {
            project,
            apis,
            target,
            version,
            format,
            api_version,
            base_path,
            no_save_settings,
            settings_dir,
        } => {
            let args = ExportArgs {
                project,
                apis,
                target,
                version,
                format,
                api_version,
                base_path,
                save_settings: !no_save_settings,
                settings_dir,
            };
            handle_export(&args).map(|_| ())
        }
        Commands::List { project } => handle_list(&ListArgs { project }),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
