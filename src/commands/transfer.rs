//! Commands that write assets: `upload` and `mv`.

use std::path::{Path, PathBuf};

use clap::Args;
use serde::Serialize;
use tabled::Tabled;
use tokio::sync::watch;

use mediahub_core::error::{AppError, ErrorKind};
use mediahub_core::types::{AssetId, UploadFile};
use mediahub_entity::FolderPath;
use mediahub_service::{MediaLibrary, UploadTarget};

use crate::output::{self, OutputFormat};

/// Arguments for the upload command
#[derive(Debug, Args)]
pub struct UploadArgs {
    /// Files to upload
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Destination folder (defaults to "default")
    #[arg(short = 'd', long)]
    pub folder: Option<String>,
}

/// Arguments for the mv command
#[derive(Debug, Args)]
pub struct MoveArgs {
    /// Asset ids to move
    #[arg(required = true)]
    pub ids: Vec<String>,

    /// Destination folder
    #[arg(short, long)]
    pub to: String,
}

/// Per-file upload result
#[derive(Debug, Serialize, Tabled)]
struct UploadRow {
    /// File name
    file: String,
    /// Size in bytes
    size: u64,
    /// "uploaded", "rejected" or "failed"
    status: &'static str,
    /// Asset id or error message
    detail: String,
}

/// Moved asset
#[derive(Debug, Serialize, Tabled)]
struct MovedRow {
    /// Asset id
    id: String,
    /// Display name
    name: String,
    /// New folder
    folder: String,
}

async fn read_file(path: &Path) -> Result<UploadFile, AppError> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| AppError::validation(format!("Not a file: {}", path.display())))?
        .to_string();
    let data = tokio::fs::read(path).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Storage,
            format!("Failed to read {}: {e}", path.display()),
            e,
        )
    })?;
    Ok(UploadFile::new(name, data))
}

/// Upload local files.
pub async fn upload(
    args: &UploadArgs,
    library: &mut MediaLibrary,
    format: OutputFormat,
) -> Result<(), AppError> {
    let mut files = Vec::with_capacity(args.files.len());
    for path in &args.files {
        files.push(read_file(path).await?);
    }

    let target = match &args.folder {
        Some(folder) => UploadTarget::Folder(FolderPath::navigation(folder)),
        None => UploadTarget::Current,
    };

    let (tx, mut rx) = watch::channel(0u8);
    let printer = tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            eprint!("\rUploading... {:>3}%", *rx.borrow_and_update());
        }
        eprintln!();
    });

    let report = library.upload(files, target, tx).await;
    let _ = printer.await;
    super::warn_if_stale(library);

    let rows: Vec<UploadRow> = report
        .outcomes
        .iter()
        .map(|outcome| {
            let (status, detail) = match &outcome.result {
                Ok(asset) => ("uploaded", asset.id.to_string()),
                Err(e) if outcome.is_rejected() => ("rejected", e.message.clone()),
                Err(e) => ("failed", e.message.clone()),
            };
            UploadRow {
                file: outcome.file_name.clone(),
                size: outcome.size,
                status,
                detail,
            }
        })
        .collect();
    output::print_list(&rows, format);

    let failed = report.failed().count();
    if failed == 0 {
        output::print_success(&format!(
            "Uploaded {} file(s) to '{}'",
            rows.len(),
            report.folder
        ));
    } else {
        output::print_warning(&format!(
            "{failed} of {} file(s) were not uploaded",
            rows.len()
        ));
    }
    Ok(())
}

/// Move assets to another folder.
pub async fn move_assets(
    args: &MoveArgs,
    library: &mut MediaLibrary,
    format: OutputFormat,
) -> Result<(), AppError> {
    let mut ids = Vec::with_capacity(args.ids.len());
    for id in &args.ids {
        let id = AssetId::from(id.as_str());
        if !library.assets().iter().any(|asset| asset.id == id) {
            return Err(AppError::not_found(format!("Asset {id} not found")));
        }
        ids.push(id);
    }

    let report = library.move_assets(&ids, &args.to).await;
    super::warn_if_stale(library);
    let report = report?;
    let rows: Vec<MovedRow> = report
        .moved
        .iter()
        .map(|asset| MovedRow {
            id: asset.id.to_string(),
            name: asset.name.clone(),
            folder: asset.folder.clone(),
        })
        .collect();
    output::print_list(&rows, format);
    output::print_success(&format!(
        "Moved {} asset(s) to '{}'",
        rows.len(),
        report.destination
    ));
    Ok(())
}
