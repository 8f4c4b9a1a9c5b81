//! Synthesizes index documents so every served directory has a default file.

use std::collections::BTreeMap;
use std::fs;

use anyhow::{Context, Result};

use crate::project::BundleLayout;
use crate::resource::CapturedResource;
use crate::store::ResourceStore;

/// Token in the redirect template replaced with the root document's path.
pub const REDIRECT_URL_PLACEHOLDER: &str = "$REDIRECT_URL$";

/// Add a redirecting index document to every directory that lacks one.
///
/// Every directory implied by any resource's relative path, ancestors
/// included, must end up holding a file a generic static server serves by
/// default; browsing an indexless directory would otherwise leak a listing.
/// Synthesized records carry the redirect template with its placeholder
/// pointed at the root document, so any stray directory visit lands on the
/// real start page. A missing or unreadable template is fatal.
pub fn add_directory_indexes(
    store: &mut ResourceStore,
    original_url: &str,
    layout: &BundleLayout,
) -> Result<()> {
    let directories = directories_with_default_markers(store, &layout.default_serve_file_names);

    let template = fs::read_to_string(&layout.redirect_template_file).with_context(|| {
        format!(
            "failed to read redirect template {}",
            layout.redirect_template_file
        )
    })?;

    let root = store
        .get(original_url)
        .with_context(|| format!("root resource {original_url} missing from store"))?;
    let redirect_target = format!("/{}", root.relative_file_path());
    let body = template.replace(REDIRECT_URL_PLACEHOLDER, &redirect_target);

    for (directory, has_default) in directories {
        if has_default {
            continue;
        }
        let path = format!("{directory}{}", layout.index_file_name);
        store.insert(CapturedResource::new(
            path.clone(),
            "text/html",
            body.clone().into_bytes(),
            path.clone(),
            "utf-8",
            "",
        ));
    }

    Ok(())
}

/// Every directory implied by the store, mapped to whether it already holds
/// a default-serve file. Keys are absolute, `/`-terminated directory paths.
fn directories_with_default_markers(
    store: &ResourceStore,
    default_serve_file_names: &[String],
) -> BTreeMap<String, bool> {
    let mut directories = BTreeMap::new();

    for resource in store.iter() {
        let mut directory = String::from("/");
        directories.insert(directory.clone(), false);
        for part in resource.directory().split('/') {
            if part.is_empty() {
                continue;
            }
            directory.push_str(part);
            directory.push('/');
            directories.insert(directory.clone(), false);
        }
    }

    for resource in store.iter() {
        if !default_serve_file_names
            .iter()
            .any(|name| *name == resource.file_name())
        {
            continue;
        }
        let directory = resource.directory();
        let key = if directory.is_empty() {
            String::from("/")
        } else {
            format!("/{directory}/")
        };
        directories.insert(key, true);
    }

    directories
}
