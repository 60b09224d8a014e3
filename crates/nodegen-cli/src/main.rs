use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use nodegen_core::config::{self, CONFIG_FILE_NAME, NodegenConfig};
use nodegen_core::error::TransformError;
use nodegen_core::ir::NodegenParams;
use nodegen_core::parse::{self, SpecFormat};
use nodegen_core::transform::{self, NormalizeOptions};
use nodegen_core::{CodeGenerator, GeneratedFile, custom};
use nodegen_plugin::{PluginGenerator, PluginOptions};

/// Name of the dereferenced spec written to the work directory.
const DEREF_FILE_NAME: &str = "_deref.json";

#[derive(Parser)]
#[command(
    name = "nodegen",
    about = "Workflow-automation node generator for OpenAPI 3.x",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate node fragments from an OpenAPI spec or a custom schema
    Generate {
        /// Path to the input file (YAML or JSON)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Treat the input as a custom nodegen YAML schema
        #[arg(long)]
        custom: bool,
    },

    /// Validate an OpenAPI spec
    Validate {
        /// Path to the OpenAPI spec file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Inspect the nodegen params of an OpenAPI spec
    Inspect {
        /// Path to the OpenAPI spec file
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: InspectFormat,
    },

    /// Initialize a new nodegen configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, ValueEnum)]
enum InspectFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { input, custom } => cmd_generate(input, custom),

        Commands::Validate { input } => cmd_validate(input),

        Commands::Inspect { input, format } => cmd_inspect(input, format),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "nodegen", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<NodegenConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    config::load_config(&config_path).map_err(|e| anyhow::anyhow!(e))
}

fn read_input(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Parse and dereference an OpenAPI spec, keeping the dereferenced document
/// under `work_dir` when one is given.
fn load_spec(path: &Path, work_dir: Option<&Path>) -> Result<parse::spec::OpenApiSpec> {
    let content = read_input(path)?;
    let document = parse::load_value(&content, SpecFormat::from_path(path))
        .with_context(|| format!("failed to parse {}", path.display()))?;
    let dereferenced = parse::dereference(document)
        .with_context(|| format!("failed to dereference {}", path.display()))?;

    if let Some(dir) = work_dir {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create work directory {}", dir.display()))?;
        let deref_path = dir.join(DEREF_FILE_NAME);
        fs::write(&deref_path, serde_json::to_string_pretty(&dereferenced)?)
            .with_context(|| format!("failed to write {}", deref_path.display()))?;
        log::debug!("wrote dereferenced spec to {}", deref_path.display());
    }

    Ok(parse::from_value(dereferenced)?)
}

/// Normalize with the options of the project config, shared by every command.
fn normalize_with_config(
    spec: &parse::spec::OpenApiSpec,
    cfg: &NodegenConfig,
) -> Result<NodegenParams, TransformError> {
    transform::normalize_with_options(spec, &NormalizeOptions::from_config(cfg))
}

fn load_params(
    path: &Path,
    cfg: &NodegenConfig,
    custom: bool,
    work_dir: Option<&Path>,
) -> Result<NodegenParams> {
    if custom {
        let content = read_input(path)?;
        let params = custom::from_yaml(&content)
            .with_context(|| format!("failed to stage custom schema {}", path.display()))?;
        return Ok(params);
    }

    let spec = load_spec(path, work_dir)?;
    let params = normalize_with_config(&spec, cfg)
        .with_context(|| format!("failed to normalize {}", path.display()))?;
    Ok(params)
}

/// Write generated files to disk under the given base directory.
fn write_files(base: &Path, files: &[GeneratedFile]) -> Result<()> {
    for file in files {
        let path = base.join(&file.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        fs::write(&path, &file.content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        eprintln!("  wrote {}", path.display());
    }
    Ok(())
}

fn cmd_generate(input: Option<PathBuf>, custom: bool) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let input = input.unwrap_or_else(|| PathBuf::from(&cfg.input));
    let work_dir = PathBuf::from(&cfg.work_dir);
    let params = load_params(&input, &cfg, custom, Some(&work_dir))?;

    let output_dir = PathBuf::from(&cfg.output);
    eprintln!(
        "Generating {} → {}",
        params.meta_params.service_name,
        output_dir.display()
    );

    let files = PluginGenerator
        .generate(&params, &PluginOptions::from(&cfg.emit))
        .map_err(|e| anyhow::anyhow!(e))?;

    fs::create_dir_all(&output_dir).with_context(|| {
        format!("failed to create output directory {}", output_dir.display())
    })?;
    write_files(&output_dir, &files)?;

    eprintln!(
        "Generated {} files for {} resources and {} operations in {}",
        files.len(),
        params.main_params.len(),
        params.operation_count(),
        output_dir.display()
    );
    Ok(())
}

fn cmd_validate(input: PathBuf) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let parsed = load_spec(&input, None)?;

    eprintln!(
        "Valid OpenAPI {} spec: {}",
        parsed.openapi, parsed.info.title
    );
    eprintln!("  Version: {}", parsed.info.version);
    eprintln!("  Paths: {}", parsed.paths.len());

    if let Some(ref components) = parsed.components {
        eprintln!("  Schemas: {}", components.schemas.len());
    }

    // Also validate that it normalizes into nodegen params
    let params = normalize_with_config(&parsed, &cfg)?;
    eprintln!("  Resources: {}", params.main_params.len());
    eprintln!("  Operations: {}", params.operation_count());

    eprintln!("Validation successful.");
    Ok(())
}

fn cmd_inspect(input: PathBuf, format: InspectFormat) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let params = load_params(&input, &cfg, false, None)?;

    let summary = build_inspect_summary(&params);

    match format {
        InspectFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&summary)?;
            print!("{}", yaml);
        }
        InspectFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn build_inspect_summary(params: &NodegenParams) -> serde_json::Value {
    let resources: serde_json::Map<String, serde_json::Value> = params
        .main_params
        .iter()
        .map(|(resource, operations)| {
            let operations: Vec<serde_json::Value> = operations
                .iter()
                .map(|op| {
                    serde_json::json!({
                        "operationId": op.operation_id,
                        "method": op.request_method.as_str(),
                        "endpoint": op.endpoint,
                        "parameters": op.parameters.iter().map(|p| &p.name).collect::<Vec<_>>(),
                        "bodies": op.request_body.iter().map(|g| g.name.as_str()).collect::<Vec<_>>(),
                    })
                })
                .collect();
            (resource.clone(), serde_json::Value::Array(operations))
        })
        .collect();

    let meta = &params.meta_params;
    serde_json::json!({
        "serviceName": meta.service_name,
        "authType": meta.auth_type.as_str(),
        "apiUrl": meta.api_url,
        "nodeColor": meta.node_color,
        "resources": resources,
    })
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
