use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{json, Value};
use spectro_registry::api::auth::Credentials;
use spectro_registry::api::client::PaletteClient;
use spectro_registry::api::http::format_api_error;
use spectro_registry::api::models::HasMetadata;
use spectro_registry::config::Config;
use spectro_registry::provider;
use spectro_registry::registry::{self, RegistryKind};
use spectro_registry::schema::{Diagnostics, Resource, ResourceData};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Registry handlers for the Spectro Cloud Palette provider
#[derive(Parser, Debug)]
#[command(name = "spectro-registry", version, about, long_about = None)]
struct Args {
    /// Palette API host
    #[arg(long)]
    host: Option<String>,

    /// Project UID to scope API calls to
    #[arg(short, long)]
    project_uid: Option<String>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read the registry data source by name
    RegistryRead {
        #[arg(long)]
        name: String,
    },
    /// Resolve a registry of one kind by name (pack, helm, oci) or UID (ecr, basic)
    Resolve {
        #[arg(long)]
        kind: RegistryKind,
        key: String,
    },
    /// Create an ECR registry from a JSON or YAML document
    EcrCreate {
        #[arg(long)]
        doc: PathBuf,
    },
    /// Refresh an ECR registry's state
    EcrRead {
        #[arg(long)]
        id: String,
    },
    /// Replace an ECR registry with a JSON or YAML document
    EcrUpdate {
        #[arg(long)]
        id: String,
        #[arg(long)]
        doc: PathBuf,
    },
    /// Delete an OCI registry
    EcrDelete {
        #[arg(long)]
        id: String,
    },
    /// Print the data source and resource schemas
    Schema,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("spectro-registry started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("spectro-registry").join("spectro-registry.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".spectro-registry").join("spectro-registry.log");
    }
    PathBuf::from("spectro-registry.log")
}

/// Read a configuration document; `.yaml`/`.yml` files are parsed as YAML
fn load_document(path: &Path) -> Result<ResourceData> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;

    let value: Value = match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML document {:?}", path))?,
        _ => serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON document {:?}", path))?,
    };

    Ok(ResourceData::from_value(value)?)
}

fn print_outcome(d: &ResourceData, diags: &Diagnostics) -> Result<bool> {
    let output = json!({
        "state": d.to_state(),
        "diagnostics": diags,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(!diags.has_error())
}

/// Validate against the schema, then run the callback only if that passed
async fn run_callback<'a, F, Fut>(
    schema: &Resource,
    client: &'a PaletteClient,
    d: &'a mut ResourceData,
    callback: F,
) -> Diagnostics
where
    F: FnOnce(&'a PaletteClient, &'a mut ResourceData) -> Fut,
    Fut: std::future::Future<Output = Diagnostics>,
{
    let diags = schema.validate(d);
    if diags.has_error() {
        return diags;
    }
    callback(client, d).await
}

/// Build the API client from CLI flags, config file and environment
fn connect(host: Option<String>, project_uid: Option<String>) -> Result<PaletteClient> {
    let config = Config::load();
    let host = host.unwrap_or_else(|| config.effective_host());
    let project_uid = project_uid.or_else(|| config.effective_project_uid());

    tracing::info!("Using host: {}, project: {:?}", host, project_uid);

    let credentials = Credentials::from_env().map_err(|e| anyhow::anyhow!(format_api_error(&e)))?;
    PaletteClient::new(&host, credentials, project_uid.as_deref())
        .context("Failed to create Palette client")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level)?;

    let Args {
        host,
        project_uid,
        command,
        ..
    } = args;

    let ok = match command {
        Command::Schema => {
            let schemas = json!({
                "data_sources": { "spectrocloud_registry": provider::data_source_registry() },
                "resources": { "spectrocloud_registry_oci": provider::resource_registry_ecr() },
            });
            println!("{}", serde_json::to_string_pretty(&schemas)?);
            true
        }
        Command::RegistryRead { name } => {
            let client = connect(host, project_uid)?;
            let mut d = ResourceData::default();
            d.set("name", name);
            let schema = provider::data_source_registry();
            let diags = run_callback(&schema, &client, &mut d, provider::data_source_registry_read).await;
            print_outcome(&d, &diags)?
        }
        Command::Resolve { kind, key } => {
            let client = connect(host, project_uid)?;
            match registry::resolve(&client, kind, &key).await {
                Ok(found) => {
                    let output = json!({
                        "kind": found.kind().as_str(),
                        "uid": found.uid(),
                        "name": found.name(),
                        "endpoint": found.endpoint(),
                    });
                    println!("{}", serde_json::to_string_pretty(&output)?);
                    true
                }
                Err(e) => {
                    eprintln!("Error: {}", format_api_error(&e));
                    false
                }
            }
        }
        Command::EcrCreate { doc } => {
            let mut d = load_document(&doc)?;
            let client = connect(host, project_uid)?;
            let schema = provider::resource_registry_ecr();
            let diags = run_callback(&schema, &client, &mut d, provider::resource_registry_ecr_create).await;
            print_outcome(&d, &diags)?
        }
        Command::EcrRead { id } => {
            let client = connect(host, project_uid)?;
            let mut d = ResourceData::default();
            d.set_id(id);
            let diags = provider::resource_registry_ecr_read(&client, &mut d).await;
            print_outcome(&d, &diags)?
        }
        Command::EcrUpdate { id, doc } => {
            let mut d = load_document(&doc)?;
            d.set_id(id);
            let client = connect(host, project_uid)?;
            let schema = provider::resource_registry_ecr();
            let diags = run_callback(&schema, &client, &mut d, provider::resource_registry_ecr_update).await;
            print_outcome(&d, &diags)?
        }
        Command::EcrDelete { id } => {
            let client = connect(host, project_uid)?;
            let mut d = ResourceData::default();
            d.set_id(id);
            let diags = provider::resource_registry_ecr_delete(&client, &mut d).await;
            print_outcome(&d, &diags)?
        }
    };

    if !ok {
        std::process::exit(1);
    }

    Ok(())
}
