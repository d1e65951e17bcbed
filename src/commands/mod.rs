//! CLI command definitions and dispatch.

pub mod browse;
pub mod remove;
pub mod transfer;

use clap::{Parser, Subcommand};
use tracing::debug;

use mediahub_core::config::AppConfig;
use mediahub_core::error::AppError;
use mediahub_service::MediaLibrary;
use mediahub_store::StoreManager;

use crate::output::{self, OutputFormat};

/// MediaHub: browse and manage media by folder
#[derive(Debug, Parser)]
#[command(name = "mediahub", version, about, long_about = None)]
pub struct Cli {
    /// Directory holding default.toml and environment overlays
    #[arg(short, long, default_value = "config")]
    pub config_dir: String,

    /// Configuration environment (falls back to MEDIAHUB_ENV, then "development")
    #[arg(short, long)]
    pub env: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the folder tree with asset counts
    Tree(browse::TreeArgs),
    /// List the subfolders and assets of one folder
    Ls(browse::LsArgs),
    /// Upload local files into a folder
    Upload(transfer::UploadArgs),
    /// Move assets to another folder
    Mv(transfer::MoveArgs),
    /// Delete a folder and every asset beneath it
    Rm(remove::RemoveArgs),
}

impl Cli {
    /// The configuration environment to load.
    pub fn environment(&self) -> String {
        self.env.clone().unwrap_or_else(|| {
            std::env::var("MEDIAHUB_ENV").unwrap_or_else(|_| "development".to_string())
        })
    }

    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> Result<(), AppError> {
        let mut library = open_library(&config).await?;

        match &self.command {
            Commands::Tree(args) => browse::tree(args, &library, self.format),
            Commands::Ls(args) => browse::ls(args, &library, self.format),
            Commands::Upload(args) => transfer::upload(args, &mut library, self.format).await,
            Commands::Mv(args) => transfer::move_assets(args, &mut library, self.format).await,
            Commands::Rm(args) => remove::execute(args, &mut library, self.format).await,
        }
    }
}

/// Build the stores and load the first asset snapshot.
async fn open_library(config: &AppConfig) -> Result<MediaLibrary, AppError> {
    let stores = StoreManager::from_config(&config.metadata, &config.assets).await?;
    let mut library = MediaLibrary::new(&stores, config);
    library.refresh().await?;
    debug!(assets = library.assets().len(), "Asset snapshot loaded");
    Ok(library)
}

/// Tell the user when the snapshot could not be reloaded after a change.
fn warn_if_stale(library: &MediaLibrary) {
    if let Some(e) = library.refresh_error() {
        output::print_warning(&format!("Change applied, but reloading assets failed: {e}"));
    }
}
