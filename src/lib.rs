#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod config;
pub mod forensics;
pub mod indexer;
pub mod paths;
pub mod pipeline;
pub mod project;
pub mod resource;
pub mod rewrite;
pub mod store;
pub mod writer;

pub use config::BundleConfig;
pub use pipeline::PostProcessor;
pub use project::BundleLayout;
pub use resource::{normalize_capture_url, CapturedResource};
pub use store::ResourceStore;
