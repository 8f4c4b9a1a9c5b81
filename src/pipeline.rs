//! Post-processing orchestrator turning captured resources into a servable
//! tree.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::forensics::inject_forensics_script;
use crate::indexer::add_directory_indexes;
use crate::project::BundleLayout;
use crate::rewrite::{rewrite_resource_paths, strip_host_links};
use crate::store::ResourceStore;
use crate::writer::write_store;

/// Runs the five post-processing stages over a populated resource store.
///
/// Each stage performs one complete pass over the store before the next
/// begins: strip absolute-host links, rewrite internal paths, inject the
/// forensics script, synthesize missing directory indexes, write the tree to
/// disk. The whole pipeline is single-threaded and stateless between runs.
pub struct PostProcessor {
    original_url: String,
    store: ResourceStore,
    output_dir: PathBuf,
    layout: BundleLayout,
}

impl PostProcessor {
    /// Create a processor for a populated store.
    ///
    /// The store must already hold the root record under `original_url`; the
    /// output directory is created when missing.
    pub fn new(
        original_url: impl Into<String>,
        store: ResourceStore,
        output_dir: impl Into<PathBuf>,
        layout: BundleLayout,
    ) -> Result<Self> {
        let original_url = original_url.into();
        let output_dir = output_dir.into();

        if !store.contains_key(&original_url) {
            bail!("root resource {original_url} missing from store");
        }
        fs::create_dir_all(&output_dir)
            .with_context(|| format!("failed to create output directory {}", output_dir.display()))?;

        Ok(Self {
            original_url,
            store,
            output_dir,
            layout,
        })
    }

    /// The URL identifying the root record.
    pub fn original_url(&self) -> &str {
        &self.original_url
    }

    /// The store in its current state.
    pub fn store(&self) -> &ResourceStore {
        &self.store
    }

    /// Run every stage in order and materialize the tree.
    ///
    /// Consumes the processor and returns the final store, with rewritten
    /// resource URLs and synthesized index records included.
    pub fn run(mut self) -> Result<ResourceStore> {
        strip_host_links(&mut self.store, &self.original_url)?;
        rewrite_resource_paths(&mut self.store, &self.output_dir, self.layout.max_path_len);
        inject_forensics_script(&mut self.store, &self.original_url)?;
        add_directory_indexes(&mut self.store, &self.original_url, &self.layout)?;
        write_store(&self.store, &self.output_dir)?;
        Ok(self.store)
    }
}
