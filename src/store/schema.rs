use serde::{Deserialize, Serialize};

use crate::engine::lifetime::LifetimeStats;
use crate::exam::result::TestResult;

const SCHEMA_VERSION: u32 = 1;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StatsData {
    pub schema_version: u32,
    pub stats: LifetimeStats,
}

impl Default for StatsData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            stats: LifetimeStats::default(),
        }
    }
}

impl StatsData {
    pub fn new(stats: LifetimeStats) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            stats,
        }
    }

    /// Check if loaded data has a stale schema version and needs reset.
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TestResultsData {
    pub schema_version: u32,
    pub results: Vec<TestResult>,
}

impl Default for TestResultsData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            results: Vec::new(),
        }
    }
}

impl TestResultsData {
    pub fn new(results: Vec<TestResult>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            results,
        }
    }

    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }
}
