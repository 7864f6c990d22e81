use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use indexmap::IndexMap;

use ofmt_core::config::{self, CONFIG_FILE_NAME, FmtConfig, OutputFormat};
use ofmt_core::parse;
use ofmt_core::parse::spec::OpenApiSpec;
use ofmt_core::transform;

#[derive(Parser)]
#[command(name = "ofmt", about = "OpenAPI 3.x document reducer", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reduce an OpenAPI document and write the result
    Fmt(FmtArgs),

    /// Parse an OpenAPI document and report what it contains
    Validate {
        /// Path to the OpenAPI document (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Initialize a new ofmt configuration
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Args)]
struct FmtArgs {
    /// Path to the input OpenAPI document (YAML or JSON)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Path to write the reduced document to
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<FormatArg>,

    /// Path to extract, repeatable; keeps every method of the path
    #[arg(short, long = "path")]
    paths: Vec<String>,

    /// Extension key to keep when stripping, repeatable; implies --strip
    #[arg(short, long = "keep")]
    keep: Vec<String>,

    /// Strip x- extension fields from the document
    #[arg(short, long)]
    strip: bool,

    /// Path to the config file (defaults to .ofmt.yaml in the current directory)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Yaml,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Yaml => OutputFormat::Yaml,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Fmt(args) => cmd_fmt(args),

        Commands::Validate { input } => cmd_validate(input),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "ofmt", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Load the explicit config file, or the default one from the current
/// directory when present. A missing explicit config is an error; a missing
/// default is not.
fn load_fmt_config(explicit: Option<&Path>) -> Result<FmtConfig> {
    match explicit {
        Some(path) => config::load_config(path)
            .map_err(|e| anyhow::anyhow!(e))?
            .with_context(|| format!("config file {} not found", path.display())),
        None => Ok(config::load_config(Path::new(CONFIG_FILE_NAME))
            .map_err(|e| anyhow::anyhow!(e))?
            .unwrap_or_default()),
    }
}

fn load_spec(path: &Path) -> Result<OpenApiSpec> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("yaml");

    let parsed = match ext {
        "json" => parse::from_json(&content)?,
        _ => parse::from_yaml(&content)?,
    };
    Ok(parsed)
}

fn cmd_fmt(args: FmtArgs) -> Result<()> {
    let cfg = load_fmt_config(args.config.as_deref())?;

    // Config file values take precedence over flags, matching the
    // documented merge order.
    let input = cfg
        .input
        .clone()
        .map(PathBuf::from)
        .or(args.input)
        .context("input file must be provided via --input or the config file")?;
    let output = cfg
        .output
        .clone()
        .map(PathBuf::from)
        .or(args.output)
        .context("output file must be provided via --output or the config file")?;
    let format = cfg
        .format
        .or(args.format.map(OutputFormat::from))
        .unwrap_or(OutputFormat::Yaml);

    let mut keep = args.keep;
    let mut strip = args.strip || !keep.is_empty();
    if cfg.strip.enable {
        strip = true;
        if !cfg.strip.keep.is_empty() {
            keep = cfg.strip.keep.clone();
        }
    }

    // Endpoints from the config win over bare --path flags, which match
    // every method of the named path.
    let mut targets: IndexMap<String, Vec<String>> = IndexMap::new();
    if cfg.split.enable && !cfg.split.endpoints.is_empty() {
        for endpoint in &cfg.split.endpoints {
            if endpoint.path.is_empty() {
                continue;
            }
            targets.insert(endpoint.path.clone(), endpoint.methods.clone());
        }
    } else {
        for path in &args.paths {
            if path.is_empty() {
                continue;
            }
            targets.insert(path.clone(), Vec::new());
        }
    }

    let parsed = load_spec(&input)?;

    // Extraction runs first: it produces the superset that stripping then
    // cleans up.
    let mut doc = if targets.is_empty() {
        parsed
    } else {
        transform::extract_paths(Some(&parsed), &targets)?
    };

    if strip {
        let keep: HashSet<String> = keep.into_iter().filter(|key| !key.is_empty()).collect();
        log::debug!("stripping extensions, keeping {} keys", keep.len());
        transform::strip_extensions(Some(&mut doc), &keep);
    }

    let data = match format {
        OutputFormat::Yaml => parse::to_yaml(&doc)?,
        OutputFormat::Json => parse::to_json(&doc)?,
    };
    fs::write(&output, data).with_context(|| format!("failed to write {}", output.display()))?;
    eprintln!("wrote {}", output.display());

    Ok(())
}

fn cmd_validate(input: PathBuf) -> Result<()> {
    let parsed = load_spec(&input)?;

    eprintln!(
        "Valid OpenAPI {} document: {}",
        parsed.openapi, parsed.info.title
    );
    eprintln!("  Version: {}", parsed.info.version);
    eprintln!("  Paths: {}", parsed.paths.len());

    if let Some(ref components) = parsed.components {
        eprintln!("  Schemas: {}", components.schemas.len());
        eprintln!("  Parameters: {}", components.parameters.len());
        eprintln!("  Request bodies: {}", components.request_bodies.len());
        eprintln!("  Responses: {}", components.responses.len());
        eprintln!("  Headers: {}", components.headers.len());
        eprintln!("  Security schemes: {}", components.security_schemes.len());
    }

    eprintln!("Validation successful.");
    Ok(())
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
