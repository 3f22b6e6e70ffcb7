use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use mdi_lsp::config::{DEFAULT_REGISTRY_URL, LATEST, LOG_ENV, LspConfig, SEARCH_RESULT_LIMIT};
use mdi_lsp::icons::manager::IconManager;
use mdi_lsp::icons::registries::NpmRegistry;
use mdi_lsp::icons::store::SnapshotStore;
use mdi_lsp::icons::variant::Variant;

#[derive(Parser)]
#[command(name = "mdi-lsp")]
#[command(version, about = "Language Server for Material Design Icons")]
struct Cli {
    /// Directory holding downloaded icon snapshots
    #[arg(long, global = true)]
    storage_dir: Option<PathBuf>,

    /// Base URL of the npm registry
    #[arg(long, global = true, default_value = DEFAULT_REGISTRY_URL)]
    registry_url: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// List published versions, newest first
    Versions {
        #[arg(long)]
        light: bool,
    },
    /// Download and store a version (or "latest")
    Fetch {
        version: String,
        #[arg(long)]
        light: bool,
    },
    /// Search icons by name, alias, tag or codepoint
    Search {
        query: String,
        #[arg(long)]
        light: bool,
        #[arg(long, default_value = LATEST)]
        version: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let storage_dir = cli
        .storage_dir
        .unwrap_or_else(mdi_lsp::config::storage_dir);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    match cli.command {
        None => runtime.block_on(mdi_lsp::lsp::server::run_server(
            storage_dir,
            cli.registry_url,
        )),
        Some(command) => {
            init_cli_logging();
            let manager = IconManager::new(
                LspConfig::default(),
                Arc::new(NpmRegistry::new(&cli.registry_url)),
                Arc::new(SnapshotStore::new(storage_dir)),
            );
            runtime.block_on(run_command(&manager, command))
        }
    }
}

fn init_cli_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run_command(manager: &IconManager, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Versions { light } => {
            let variant = Variant::from_light(light);
            let info = manager.icon_set(variant).available_versions().await?;
            for entry in &info.versions {
                let published = entry
                    .published_at
                    .map(|time| time.format("%Y-%m-%d").to_string())
                    .unwrap_or_default();
                let marker = if entry.version == info.latest {
                    " (latest)"
                } else {
                    ""
                };
                println!("{:<12} {}{}", entry.version, published, marker);
            }
        }
        Command::Fetch { version, light } => {
            let variant = Variant::from_light(light);
            let version = if version == LATEST {
                manager.refresh_latest(variant).await?
            } else {
                version
            };
            let collection = manager.icon_list_for(variant, Some(version.as_str())).await?;
            println!(
                "{} {}: {} icons stored",
                variant,
                collection.version(),
                collection.len()
            );
        }
        Command::Search {
            query,
            light,
            version,
        } => {
            let variant = Variant::from_light(light);
            if version == LATEST
                && let Err(e) = manager.refresh_latest(variant).await
            {
                warn!("Searching the last known {} version: {}", variant, e);
            }

            let mut config = LspConfig::default();
            config.icons.light = light;
            config.icons.version = version;
            manager.update_config(config);

            for icon in manager.search(&query, SEARCH_RESULT_LIMIT).await? {
                println!(
                    "{:<40} {}  {}",
                    icon.name(),
                    icon.codepoint(),
                    icon.aliases().join(", ")
                );
            }
        }
    }
    Ok(())
}
