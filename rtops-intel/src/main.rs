//! rtops-intel - Threat-Intel Import CLI
//!
//! Local ingestion job for the RTOps catalog: triggers an import pass over
//! the configured candidate source files, or browses the resulting
//! catalog. Not a service; everything runs one-shot against the catalog
//! database in the root folder.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use rtops_intel::{catalog, import, registry};

#[derive(Parser)]
#[command(name = "rtops-intel", about = "RTOps threat-intel catalog tool")]
struct Args {
    /// Root folder holding the catalog database (overrides RTOPS_ROOT)
    #[arg(long)]
    root: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run an import pass over the candidate source files
    Import {
        /// Additional bundle/layer JSON documents to attempt
        #[arg(long = "json")]
        json: Vec<PathBuf>,

        /// Additional spreadsheet workbooks to attempt
        #[arg(long = "xlsx")]
        xlsx: Vec<PathBuf>,
    },
    /// List the catalog grouped by tactic in kill-chain order
    List {
        /// Case-insensitive filter over name, technique id, or tactic
        #[arg(long)]
        filter: Option<String>,
    },
    /// Show whether the catalog has ever been populated
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let root = rtops_common::config::resolve_root_folder(args.root.as_deref());
    let db_path = rtops_common::config::ensure_root_folder(&root)?;
    info!("Database: {}", db_path.display());

    let pool = rtops_common::db::init_database(&db_path).await?;

    match args.command {
        Command::Import { json, xlsx } => {
            let mut config = import::ImportConfig::default_locations(&root);
            config.json_candidates.extend(json);
            config.workbook_candidates.extend(xlsx);

            let outcome = import::run_import(&pool, &config).await?;
            println!("{}", outcome.summary());
        }
        Command::List { filter } => {
            let groups = catalog::list_techniques(&pool, filter.as_deref()).await?;
            for group in groups {
                println!("{} ({})", group.title, group.techniques.len());
                for technique in group.techniques {
                    let name = if technique.name.is_empty() {
                        technique.technique_id.clone()
                    } else {
                        technique.name.clone()
                    };
                    println!("  {} ({})", name, technique.technique_id);
                }
            }
        }
        Command::Status => {
            let loaded = catalog::intel_loaded(&pool).await?;
            println!(
                "Catalog populated: {} ({} tactics tracked)",
                if loaded { "yes" } else { "no" },
                registry::TACTIC_ORDER.len()
            );
        }
    }

    Ok(())
}
