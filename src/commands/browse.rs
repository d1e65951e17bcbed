//! Read-only browsing commands: `tree` and `ls`.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use mediahub_core::error::AppError;
use mediahub_entity::{FolderNode, FolderPath};
use mediahub_service::MediaLibrary;

use crate::output::{self, OutputFormat};

/// Arguments for the tree command
#[derive(Debug, Args)]
pub struct TreeArgs {
    /// Folder to start from (omit for the root)
    #[arg(default_value = "")]
    pub path: String,

    /// Max depth below the starting folder
    #[arg(short, long)]
    pub depth: Option<usize>,
}

/// Arguments for the ls command
#[derive(Debug, Args)]
pub struct LsArgs {
    /// Folder to list (omit for the root)
    #[arg(default_value = "")]
    pub path: String,
}

/// One folder of the tree
#[derive(Debug, Serialize, Tabled)]
struct TreeRow {
    /// Indented folder name
    #[serde(skip)]
    folder: String,
    /// Full path
    path: String,
    /// Assets directly inside
    assets: usize,
    /// Assets in the whole subtree
    total: usize,
}

/// One entry of a folder listing
#[derive(Debug, Serialize, Tabled)]
struct EntryRow {
    /// "folder" or "asset"
    kind: &'static str,
    /// Display name
    name: String,
    /// Asset id (empty for folders)
    id: String,
    /// Asset URL, or the subtree asset count for folders
    detail: String,
}

fn collect_rows(
    node: &FolderNode,
    path: &FolderPath,
    depth: usize,
    max_depth: Option<usize>,
    rows: &mut Vec<TreeRow>,
) {
    if max_depth.is_some_and(|max| depth >= max) {
        return;
    }
    for (name, child) in node.sorted_children() {
        let child_path = path.child(name);
        rows.push(TreeRow {
            folder: format!("{}{name}", "  ".repeat(depth)),
            path: child_path.join(),
            assets: child.item_count(),
            total: child.total_item_count(),
        });
        collect_rows(child, &child_path, depth + 1, max_depth, rows);
    }
}

/// Print the folder tree.
pub fn tree(args: &TreeArgs, library: &MediaLibrary, format: OutputFormat) -> Result<(), AppError> {
    let start = FolderPath::navigation(&args.path);
    let tree = library.tree();

    let mut rows = Vec::new();
    collect_rows(tree.resolve(&start), &start, 0, args.depth, &mut rows);
    output::print_list(&rows, format);
    Ok(())
}

/// List one folder: subfolders first, then assets in snapshot order.
pub fn ls(args: &LsArgs, library: &MediaLibrary, format: OutputFormat) -> Result<(), AppError> {
    let path = FolderPath::navigation(&args.path);
    let node = library.folder(&path);

    let folders = node.sorted_children().into_iter().map(|(name, child)| EntryRow {
        kind: "folder",
        name: name.to_string(),
        id: String::new(),
        detail: format!("{} assets", child.total_item_count()),
    });
    let assets = node.items.iter().map(|asset| EntryRow {
        kind: "asset",
        name: asset.name.clone(),
        id: asset.id.to_string(),
        detail: asset.url.clone(),
    });

    let rows: Vec<EntryRow> = folders.chain(assets).collect();
    output::print_list(&rows, format);
    Ok(())
}
