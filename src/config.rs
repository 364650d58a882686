use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::session::question::GameMode;

/// Question counts offered on the test setup screen.
pub const QUESTION_COUNT_PRESETS: [usize; 5] = [10, 20, 30, 50, 100];

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default = "default_selected_groups")]
    pub selected_groups: Vec<usize>,
    #[serde(default = "default_mode")]
    pub default_mode: GameMode,
    #[serde(default = "default_question_count")]
    pub default_question_count: usize,
    #[serde(default = "default_challenge_duration_secs")]
    pub challenge_duration_secs: u64,
}

fn default_selected_groups() -> Vec<usize> {
    Vec::new()
}
fn default_mode() -> GameMode {
    GameMode::Pick
}
fn default_question_count() -> usize {
    10
}
fn default_challenge_duration_secs() -> u64 {
    60
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            selected_groups: default_selected_groups(),
            default_mode: default_mode(),
            default_question_count: default_question_count(),
            challenge_duration_secs: default_challenge_duration_secs(),
        }
    }
}

impl Preferences {
    pub fn load() -> Result<Self> {
        let path = Self::preferences_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let preferences: Preferences = toml::from_str(&content)?;
            Ok(preferences)
        } else {
            Ok(Preferences::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::preferences_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn preferences_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("kanadr")
            .join("preferences.toml")
    }

    /// Drop values a stale or hand-edited file may carry: group indices past
    /// the catalog, question counts off the preset list, a zero countdown.
    /// Call after deserialization.
    pub fn normalize(&mut self, group_count: usize) {
        self.selected_groups.retain(|&index| index < group_count);
        if !QUESTION_COUNT_PRESETS.contains(&self.default_question_count) {
            self.default_question_count = default_question_count();
        }
        if self.challenge_duration_secs == 0 {
            self.challenge_duration_secs = default_challenge_duration_secs();
        }
    }
}
