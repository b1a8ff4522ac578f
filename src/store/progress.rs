use chrono::Utc;
use tracing::{info, warn};

use crate::content::{Section, TopicId};
use crate::nav::CompletionSink;
use crate::store::json_store::JsonStore;
use crate::store::schema::{LessonProgress, ProgressData};

/// Keeps lesson progress in memory and mirrors every change to disk.
///
/// Without a store (e.g. the data dir is not writable) progress still works
/// for the session but is not persisted.
pub struct ProgressRecorder {
    store: Option<JsonStore>,
    data: ProgressData,
}

impl ProgressRecorder {
    pub fn new(store: Option<JsonStore>) -> Self {
        let data = store
            .as_ref()
            .map(JsonStore::load_progress)
            .unwrap_or_default();
        Self { store, data }
    }

    pub fn data(&self) -> &ProgressData {
        &self.data
    }

    pub fn lesson(&self, topic: &TopicId) -> Option<&LessonProgress> {
        self.data.lesson(topic.as_str())
    }

    /// Indices in `sections` whose ids were completed in earlier visits.
    pub fn completed_indices(&self, topic: &TopicId, sections: &[Section]) -> Vec<usize> {
        let Some(progress) = self.lesson(topic) else {
            return Vec::new();
        };
        sections
            .iter()
            .enumerate()
            .filter(|(_, s)| progress.completed_sections.contains(s.id.as_str()))
            .map(|(i, _)| i)
            .collect()
    }

    pub fn record_section(&mut self, topic: &TopicId, section: &Section) {
        let inserted = self
            .data
            .lesson_mut(topic.as_str())
            .completed_sections
            .insert(section.id.to_string());
        if inserted {
            self.persist();
        }
    }

    fn persist(&self) {
        let Some(store) = &self.store else {
            return;
        };
        if let Err(err) = store.save_progress(&self.data) {
            warn!(error = %err, "failed to save progress");
        }
    }
}

impl CompletionSink for ProgressRecorder {
    fn on_lesson_complete(&mut self, topic: &TopicId) {
        let lesson = self.data.lesson_mut(topic.as_str());
        lesson.completed_at = Some(Utc::now());
        lesson.times_completed = lesson.times_completed.saturating_add(1);
        info!(topic = %topic, times = lesson.times_completed, "lesson completed");
        self.persist();
    }
}
