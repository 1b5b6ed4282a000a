use crate::domain::{Registry, StoreResult};
use std::fs;
use std::path::Path;

/// Reads and writes the registry snapshot as pretty-printed JSON.
pub struct RegistryRepository;

impl RegistryRepository {
    pub fn save(registry: &Registry, path: &Path) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(registry)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn load(path: &Path) -> StoreResult<Registry> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
