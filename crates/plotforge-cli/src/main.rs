//! Command-line inspection of modules and provenance.
//!
//! `plotforge discover` lists module directories and their declared
//! capabilities; `plotforge validate`, `verify`, and `latest` query a
//! registry file. All registry access goes through the same explicit
//! handle the pipeline uses.

use anyhow::Context;
use clap::{Parser, Subcommand};
use plotforge_module::discover;
use plotforge_registry::PlotRegistry;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "plotforge", version, about = "Plot pipeline provenance tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List modules under a root directory
    Discover {
        /// Module root directory
        #[arg(long)]
        root: PathBuf,
        /// Only show modules with this type tag
        #[arg(long = "type")]
        module_type: Option<String>,
    },
    /// Run the composite registry health check
    Validate {
        /// Registry file
        #[arg(long)]
        registry: PathBuf,
        /// Artifact types that must be present
        #[arg(long = "require", value_delimiter = ',')]
        required: Vec<String>,
        /// Rehash every artifact file
        #[arg(long)]
        check_hashes: bool,
    },
    /// Verify one artifact against its on-disk bytes
    Verify {
        /// Registry file
        #[arg(long)]
        registry: PathBuf,
        /// Artifact name
        name: String,
    },
    /// Show the latest artifact of a type
    Latest {
        /// Registry file
        #[arg(long)]
        registry: PathBuf,
        /// Artifact type tag
        #[arg(long = "type")]
        artifact_type: String,
    },
}

/// Vocabulary accepted when opening a registry read-only from the CLI.
/// Registration still happens through the pipeline with its own list.
const CLI_TYPES: [&str; 4] = ["raw_data", "processed_data", "plot", "report"];

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Discover { root, module_type } => {
            let descriptors = discover(&root, module_type.as_deref())
                .with_context(|| format!("discovering modules under {}", root.display()))?;
            if descriptors.is_empty() {
                println!("no modules found");
                return Ok(());
            }
            for (name, descriptor) in &descriptors {
                let caps: Vec<&str> = descriptor
                    .declared_capabilities
                    .iter()
                    .map(|c| c.as_str())
                    .collect();
                println!(
                    "{name}  type={}  backend={}  capabilities=[{}]",
                    descriptor.module_type,
                    descriptor.backend,
                    caps.join(", ")
                );
            }
        }
        Command::Validate {
            registry,
            required,
            check_hashes,
        } => {
            let registry = open_registry(&registry)?;
            let required: Vec<&str> = required.iter().map(String::as_str).collect();
            let report = registry.validate(&required, check_hashes, true);
            println!("{}", serde_json::to_string_pretty(&report)?);
            if !report.valid {
                std::process::exit(1);
            }
        }
        Command::Verify { registry, name } => {
            let registry = open_registry(&registry)?;
            let outcome = registry.verify(&name)?;
            println!("{name}: {outcome:?}");
            if !outcome.is_verified() {
                std::process::exit(1);
            }
        }
        Command::Latest {
            registry,
            artifact_type,
        } => {
            let registry = open_registry(&registry)?;
            match registry.get_latest(&artifact_type) {
                Some(record) => println!("{}", serde_json::to_string_pretty(record)?),
                None => {
                    println!("no artifact of type '{artifact_type}'");
                    std::process::exit(1);
                }
            }
        }
    }
    Ok(())
}

fn open_registry(path: &PathBuf) -> anyhow::Result<PlotRegistry> {
    anyhow::ensure!(path.exists(), "registry file not found: {}", path.display());
    PlotRegistry::init(path, "cli", CLI_TYPES)
        .with_context(|| format!("opening registry {}", path.display()))
}
