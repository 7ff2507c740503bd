//! Content factory for loading everything from one data directory.

use std::path::{Path, PathBuf};

use cultivation_core::EngineConfig;

use crate::loaders::{ConfigLoader, LoadResult, TrialLoader};
use crate::trials::TrialCatalog;

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── balance.toml
/// └── trials.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub const BALANCE_FILE: &'static str = "balance.toml";
    pub const TRIALS_FILE: &'static str = "trials.ron";

    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Factory over the data shipped with this crate.
    pub fn bundled() -> Self {
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
    }

    /// Load engine balance from `balance.toml`.
    pub fn load_config(&self) -> LoadResult<EngineConfig> {
        let path = self.data_dir.join(Self::BALANCE_FILE);
        ConfigLoader::load(&path)
    }

    /// Load the trial catalog from `trials.ron`.
    pub fn load_trials(&self) -> LoadResult<TrialCatalog> {
        let path = self.data_dir.join(Self::TRIALS_FILE);
        TrialLoader::load(&path)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn bundled_content_loads() {
        let factory = ContentFactory::bundled();
        let config = factory.load_config().unwrap();
        assert_eq!(config.combat.max_turns, 10);

        let trials = factory.load_trials().unwrap();
        assert!(!trials.is_empty());
        for (id, trial) in trials.iter() {
            assert!(trial.problem().is_none(), "trial {id}");
        }
    }
}
