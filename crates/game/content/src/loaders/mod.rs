//! Content loaders for reading balance and catalog files.
//!
//! Balance numbers come from TOML (`balance.toml`), the trial catalog from
//! RON (`trials.ron`). Parsed data is validated before it reaches callers.

pub mod config;
pub mod factory;
pub mod trials;

pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use trials::TrialLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
