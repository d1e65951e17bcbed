//! Folder deletion command.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use mediahub_core::config::RetirementPolicy;
use mediahub_core::error::AppError;
use mediahub_entity::FolderPath;
use mediahub_service::{FolderDeletionOutcome, MediaLibrary, RemoteDeletion};

use crate::output::{self, OutputFormat};

/// Arguments for the rm command
#[derive(Debug, Args)]
pub struct RemoveArgs {
    /// Folder to delete
    pub path: String,

    /// Retire the folder even if some deletions fail
    #[arg(long)]
    pub optimistic: bool,
}

/// Per-asset deletion result
#[derive(Debug, Serialize, Tabled)]
struct DeletionRow {
    /// Asset id
    id: String,
    /// Display name
    name: String,
    /// Remote copy outcome
    remote: String,
    /// Metadata record outcome
    record: String,
}

fn remote_label(remote: &RemoteDeletion) -> String {
    match remote {
        RemoteDeletion::Deleted => "deleted".to_string(),
        RemoteDeletion::NotFound => "not found".to_string(),
        RemoteDeletion::Failed(e) => format!("failed: {}", e.message),
        RemoteDeletion::Skipped => "skipped".to_string(),
    }
}

/// Execute the rm command
pub async fn execute(
    args: &RemoveArgs,
    library: &mut MediaLibrary,
    format: OutputFormat,
) -> Result<(), AppError> {
    let path = FolderPath::navigation(&args.path);
    if library.tree().get(&path).is_none() {
        return Err(AppError::not_found(format!("Folder '{path}' not found")));
    }
    let policy = args.optimistic.then_some(RetirementPolicy::Optimistic);

    let mut phases = library.subscribe_deletions();
    let watcher = tokio::spawn(async move {
        while phases.changed().await.is_ok() {
            let phase = *phases.borrow_and_update();
            tracing::debug!(%phase, "Deletion progress");
        }
    });

    let report = library.delete_folder(&path, policy).await?;
    watcher.abort();
    super::warn_if_stale(library);

    let rows: Vec<DeletionRow> = report
        .items
        .iter()
        .map(|item| DeletionRow {
            id: item.asset_id.to_string(),
            name: item.name.clone(),
            remote: remote_label(&item.remote),
            record: match &item.metadata {
                Ok(()) => "deleted".to_string(),
                Err(e) => format!("failed: {}", e.message),
            },
        })
        .collect();
    if !rows.is_empty() {
        output::print_list(&rows, format);
    }

    match &report.outcome {
        FolderDeletionOutcome::Retired { .. } => {
            output::print_success(&format!(
                "Deleted folder '{}' ({} assets)",
                report.path,
                rows.len()
            ));
            Ok(())
        }
        FolderDeletionOutcome::RetiredWithErrors { error } => {
            output::print_warning(&format!(
                "Folder '{}' removed from view, but: {}",
                report.path, error.message
            ));
            Ok(())
        }
        FolderDeletionOutcome::Kept { error } => Err(AppError::with_source(
            error.kind,
            format!(
                "Folder '{}' kept ({} policy): {}",
                report.path, report.policy, error.message
            ),
            error.clone(),
        )),
    }
}
