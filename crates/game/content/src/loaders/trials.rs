//! Trial catalog loader.

use std::collections::HashSet;
use std::path::Path;

use crate::loaders::{LoadResult, read_file};
use crate::trials::{TrialCatalog, TrialTemplate};

/// Loader for the trial catalog from RON files.
///
/// The file holds a list of `(id, template)` pairs.
pub struct TrialLoader;

impl TrialLoader {
    /// Load and validate a trial catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<TrialCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<TrialCatalog> {
        let entries: Vec<(String, TrialTemplate)> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse trial catalog RON: {}", e))?;

        let mut seen = HashSet::new();
        for (id, template) in &entries {
            if !seen.insert(id.as_str()) {
                anyhow::bail!("Duplicate trial id '{}'", id);
            }
            if let Some(problem) = template.problem() {
                anyhow::bail!("Invalid trial '{}': {}", id, problem);
            }
        }

        Ok(entries.into_iter().collect())
    }
}
