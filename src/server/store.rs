/// In-memory TVL series loaded from a directory of JSON files

use anyhow::{anyhow, Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::core::tvl::{parse_series, ProtocolSeries};

#[derive(Debug, Default, Clone)]
pub struct TvlStore {
    series: HashMap<String, ProtocolSeries>,
}

impl TvlStore {
    /// Every `<name>.json` in `dir` becomes the series of protocol `<name>`
    pub fn load_dir(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(anyhow!("Data directory not found at {}", dir.display()));
        }

        let mut store = Self::default();

        let entries = fs::read_dir(dir)
            .with_context(|| format!("Failed to read data directory {}", dir.display()))?;

        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let body = fs::read(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let series = parse_series(&body)
                .with_context(|| format!("Invalid TVL series in {}", path.display()))?;

            tracing::info!(protocol = name, points = series.len(), "loaded TVL series");
            store.insert(name, series);
        }

        Ok(store)
    }

    pub fn insert(&mut self, protocol: &str, series: ProtocolSeries) {
        self.series.insert(protocol.to_lowercase(), series);
    }

    /// Case-insensitive lookup
    pub fn get(&self, protocol: &str) -> Option<&ProtocolSeries> {
        self.series.get(&protocol.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn protocols(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.series.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_dir_keys_by_lowercase_stem() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("Minswap.json"),
            r#"[{"timestamp":"2024-01-01","tvl":100}]"#,
        )
        .unwrap();
        fs::write(dir.path().join("indigo.json"), "[]").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let store = TvlStore::load_dir(dir.path()).unwrap();
        assert_eq!(store.protocols(), vec!["indigo", "minswap"]);
        assert_eq!(store.get("MINSWAP").unwrap().len(), 1);
        assert!(store.get("Indigo").unwrap().is_empty());
        assert!(store.get("liqwid").is_none());
    }

    #[test]
    fn test_load_dir_rejects_bad_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("minswap.json"), r#"{"tvl": 1}"#).unwrap();

        let err = TvlStore::load_dir(dir.path()).unwrap_err();
        assert!(err.to_string().contains("Invalid TVL series"));

        assert!(TvlStore::load_dir(&dir.path().join("missing")).is_err());
    }
}
