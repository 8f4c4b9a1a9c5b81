//! Materializes the resource store onto the output directory tree.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::store::ResourceStore;

/// Write every record's payload under the output root.
///
/// Ancestor directories are created as needed; a file already present at a
/// target path is overwritten. Any directory-creation or write failure is
/// fatal and aborts the pipeline, leaving whatever partial tree exists on
/// disk.
pub fn write_store(store: &ResourceStore, output_dir: &Path) -> Result<()> {
    for resource in store.iter() {
        let target = output_dir.join(resource.relative_file_path());

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        fs::write(&target, resource.data())
            .with_context(|| format!("failed to write {}", target.display()))?;
    }
    Ok(())
}
