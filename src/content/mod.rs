pub mod catalog;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::preferences::Language;

pub use catalog::{CatalogError, Lesson, LessonCatalog};

/// Stable identifier for a lesson topic, e.g. `malayan-tapir`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicId(String);

impl TopicId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifier of a section within a lesson. Identical in every language.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(String);

impl SectionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TopicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TopicId({})", self.0)
    }
}

impl fmt::Debug for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SectionId({})", self.0)
    }
}

impl fmt::Display for TopicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One piece of section body text, already localized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContentBlock {
    Paragraph(String),
    Bullet(String),
    Fact { label: String, text: String },
}

/// A page of lesson content in one language.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Section {
    pub id: SectionId,
    pub title: String,
    pub body: Vec<ContentBlock>,
}

/// Supplies the ordered sections of one lesson.
pub trait ContentProvider {
    /// Sections in reading order. Expected to be non-empty.
    fn sections(&self, language: Language) -> Vec<Section>;
}

/// Looks up narration for a lesson. `None` means there is none to play.
pub trait AudioProvider {
    fn resolve_audio_url(&self, topic: &TopicId, language: Language) -> Option<String>;
}

/// A string with one translation per supported language.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Localized {
    pub en: String,
    pub ms: String,
}

impl Localized {
    pub fn get(&self, language: Language) -> &str {
        match language {
            Language::English => &self.en,
            Language::Malay => &self.ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_localized_get() {
        let text = Localized {
            en: "Turtle".to_string(),
            ms: "Penyu".to_string(),
        };
        assert_eq!(text.get(Language::English), "Turtle");
        assert_eq!(text.get(Language::Malay), "Penyu");
    }

    #[test]
    fn test_topic_id_display_and_debug() {
        let id = TopicId::new("malayan-tapir");
        assert_eq!(id.to_string(), "malayan-tapir");
        assert_eq!(format!("{id:?}"), "TopicId(malayan-tapir)");
    }
}
