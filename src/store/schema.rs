use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProgressData {
    pub schema_version: u32,
    /// Keyed by topic id.
    #[serde(default)]
    pub lessons: BTreeMap<String, LessonProgress>,
}

impl Default for ProgressData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            lessons: BTreeMap::new(),
        }
    }
}

impl ProgressData {
    /// Check if loaded data has a stale schema version and needs reset.
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }

    pub fn lesson(&self, topic: &str) -> Option<&LessonProgress> {
        self.lessons.get(topic)
    }

    pub fn lesson_mut(&mut self, topic: &str) -> &mut LessonProgress {
        self.lessons.entry(topic.to_string()).or_default()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LessonProgress {
    /// Section ids, so progress survives reordering and language changes.
    #[serde(default)]
    pub completed_sections: BTreeSet<String>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub times_completed: u32,
}

impl LessonProgress {
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}
