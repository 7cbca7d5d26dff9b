//! Destination folder planning.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::media::MediaKind;
use crate::resolve::VideoItem;

/// Compute and create the destination directory tree for a batch.
///
/// Items are grouped by their exact folder string under
/// `<base>/<Music|Videos>`; the empty folder maps to that root itself.
/// Creation is idempotent. Returns the folder → absolute path map.
///
/// A failure here is fatal to the whole run: no item can be placed if its
/// directory cannot be created.
pub fn create_folder_structure(
    items: &[VideoItem],
    base_path: &Path,
    kind: MediaKind,
) -> Result<HashMap<String, PathBuf>> {
    let root = base_path.join(kind.root_folder());

    let mut organized: HashMap<String, PathBuf> = HashMap::new();
    for item in items {
        if organized.contains_key(&item.folder) {
            continue;
        }
        let full_path = if item.folder.is_empty() {
            root.clone()
        } else {
            root.join(&item.folder)
        };
        std::fs::create_dir_all(&full_path)?;
        organized.insert(item.folder.clone(), full_path);
    }

    Ok(organized)
}
