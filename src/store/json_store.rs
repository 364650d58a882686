use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Serialize, de::DeserializeOwned};

use crate::store::schema::{StatsData, TestResultsData};

pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("kanadr");
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    fn load<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        let path = self.file_path(name);
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
                Err(_) => T::default(),
            }
        } else {
            T::default()
        }
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    pub fn load_stats(&self) -> StatsData {
        self.load("stats.json")
    }

    pub fn save_stats(&self, data: &StatsData) -> Result<()> {
        self.save("stats.json", data)
    }

    pub fn load_test_results(&self) -> TestResultsData {
        self.load("test_results.json")
    }

    pub fn save_test_results(&self, data: &TestResultsData) -> Result<()> {
        self.save("test_results.json", data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ledger::SessionLedger;
    use crate::engine::lifetime::LifetimeStats;
    use crate::exam::result::TestResult;
    use crate::session::question::GameMode;
    use tempfile::TempDir;

    fn make_test_store() -> (TempDir, JsonStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    fn answered_stats() -> LifetimeStats {
        let mut ledger = SessionLedger::default();
        ledger.record_correct("あ", GameMode::Pick, "a", 1.2);
        ledger.record_wrong("い", GameMode::Pick, "u");
        ledger.elapsed_ms = 30_000;

        let mut stats = LifetimeStats::default();
        stats.merge_session(&ledger);
        stats
    }

    #[test]
    fn test_missing_files_load_defaults() {
        let (_dir, store) = make_test_store();

        let stats = store.load_stats();
        assert!(!stats.needs_reset());
        assert_eq!(stats.stats.total_sessions, 0);

        let results = store.load_test_results();
        assert!(!results.needs_reset());
        assert!(results.results.is_empty());
    }

    #[test]
    fn test_stats_round_trip() {
        let (_dir, store) = make_test_store();
        let data = StatsData {
            schema_version: 1,
            stats: answered_stats(),
        };

        store.save_stats(&data).unwrap();
        let loaded = store.load_stats();

        assert_eq!(loaded.stats.total_sessions, 1);
        assert_eq!(loaded.stats.total_correct_answers, 1);
        assert_eq!(loaded.stats.total_wrong_answers, 1);
        assert_eq!(loaded.stats.total_time_ms, 30_000);
        assert_eq!(loaded.stats.character_scores.len(), 2);
    }

    #[test]
    fn test_result_round_trip_by_id_is_deep_equal() {
        let (_dir, store) = make_test_store();
        let mut ledger = SessionLedger::default();
        ledger.record_correct("あ", GameMode::Pick, "a", 1.0);
        let pool = vec![crate::catalog::CharacterEntry {
            character: "あ".to_string(),
            romanization: "a".to_string(),
            group: 0,
        }];
        let result = TestResult::from_ledger("77".to_string(), &ledger, &pool, 1, 4.5);

        let mut data = TestResultsData::default();
        data.results.push(result.clone());
        store.save_test_results(&data).unwrap();

        let loaded = store.load_test_results();
        let found = loaded.results.iter().find(|r| r.id == "77").unwrap();
        assert_eq!(*found, result);
    }

    #[test]
    fn test_corrupt_file_loads_default() {
        let (_dir, store) = make_test_store();
        fs::write(store.file_path("stats.json"), "not json at all").unwrap();

        let stats = store.load_stats();
        assert_eq!(stats.stats.total_sessions, 0);
        assert!(!stats.needs_reset());
    }

    #[test]
    fn test_save_leaves_no_tmp_file() {
        let (dir, store) = make_test_store();
        store.save_stats(&StatsData::default()).unwrap();

        assert!(store.file_path("stats.json").exists());
        assert!(!dir.path().join("stats.tmp").exists());
    }

    #[test]
    fn test_stale_schema_version_flags_reset() {
        let (_dir, store) = make_test_store();
        let data = StatsData {
            schema_version: 0,
            stats: LifetimeStats::default(),
        };
        store.save_stats(&data).unwrap();

        let loaded = store.load_stats();
        assert!(loaded.needs_reset());
    }
}
