//! Engine balance loader.

use std::path::Path;

use cultivation_core::EngineConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for engine balance from TOML files.
///
/// Every section and field is optional; omitted values keep their defaults.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load an [`EngineConfig`] from a TOML file.
    pub fn load(path: &Path) -> LoadResult<EngineConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse and validate TOML text.
    pub fn parse(content: &str) -> LoadResult<EngineConfig> {
        let config: EngineConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse balance TOML: {}", e))?;
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid balance config: {}", e))?;

        Ok(config)
    }
}
