use std::collections::{BTreeMap, HashSet};

use rust_embed::Embed;
use serde::Deserialize;
use thiserror::Error;

use crate::content::{
    AudioProvider, ContentBlock, ContentProvider, Localized, Section, SectionId, TopicId,
};
use crate::preferences::Language;

pub const DEFAULT_MEDIA_BASE_URL: &str = "https://example.org/rimba";

#[derive(Embed)]
#[folder = "assets/lessons/"]
struct LessonAssets;

#[derive(Embed)]
#[folder = "assets/badges/"]
struct BadgeAssets;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("asset {name} is not valid UTF-8")]
    Encoding { name: String },
    #[error("asset {name} is missing")]
    MissingAsset { name: String },
    #[error("failed to parse {name}: {source}")]
    Parse {
        name: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("no lessons found")]
    Empty,
    #[error("topic {topic} is defined more than once")]
    DuplicateTopic { topic: String },
    #[error("lesson {topic} has no sections")]
    NoSections { topic: String },
    #[error("lesson {topic} repeats section id {id}")]
    DuplicateSection { topic: String, id: String },
    #[error("lesson {topic} is missing {language} text for {field}")]
    MissingText {
        topic: String,
        field: String,
        language: Language,
    },
    #[error("lesson {topic} awards unknown badge {badge}")]
    UnknownBadge { topic: String, badge: String },
}

#[derive(Debug, Deserialize)]
struct LessonFile {
    topic: String,
    badge: String,
    title: Localized,
    audio: Localized,
    pdf: Localized,
    #[serde(default)]
    sections: Vec<SectionFile>,
}

#[derive(Clone, Debug, Deserialize)]
struct SectionFile {
    id: String,
    title: Localized,
    #[serde(default)]
    blocks: Vec<BlockFile>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum BlockFile {
    Paragraph { text: Localized },
    Bullet { text: Localized },
    Fact { label: Localized, text: Localized },
}

impl BlockFile {
    fn localize(&self, language: Language) -> ContentBlock {
        match self {
            BlockFile::Paragraph { text } => ContentBlock::Paragraph(text.get(language).to_string()),
            BlockFile::Bullet { text } => ContentBlock::Bullet(text.get(language).to_string()),
            BlockFile::Fact { label, text } => ContentBlock::Fact {
                label: label.get(language).to_string(),
                text: text.get(language).to_string(),
            },
        }
    }

    fn texts(&self) -> Vec<&Localized> {
        match self {
            BlockFile::Paragraph { text } | BlockFile::Bullet { text } => vec![text],
            BlockFile::Fact { label, text } => vec![label, text],
        }
    }
}

/// One lesson, holding every translation of its content.
#[derive(Clone, Debug)]
pub struct Lesson {
    topic: TopicId,
    badge: String,
    title: Localized,
    audio: Localized,
    pdf: Localized,
    sections: Vec<SectionFile>,
}

impl Lesson {
    pub fn topic(&self) -> &TopicId {
        &self.topic
    }

    pub fn title(&self, language: Language) -> &str {
        self.title.get(language)
    }

    pub fn badge(&self) -> &str {
        &self.badge
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    pub fn section_ids(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.id.as_str())
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let topic = self.topic.to_string();
        if self.sections.is_empty() {
            return Err(CatalogError::NoSections { topic });
        }

        let mut seen = HashSet::new();
        for section in &self.sections {
            if !seen.insert(section.id.as_str()) {
                return Err(CatalogError::DuplicateSection {
                    topic,
                    id: section.id.clone(),
                });
            }
        }

        let mut fields: Vec<(String, &Localized)> = vec![
            ("title".to_string(), &self.title),
            ("audio".to_string(), &self.audio),
            ("pdf".to_string(), &self.pdf),
        ];
        for section in &self.sections {
            fields.push((format!("{}.title", section.id), &section.title));
            for (i, block) in section.blocks.iter().enumerate() {
                for text in block.texts() {
                    fields.push((format!("{}.blocks[{i}]", section.id), text));
                }
            }
        }

        for (field, text) in fields {
            for language in Language::ALL {
                if text.get(language).trim().is_empty() {
                    return Err(CatalogError::MissingText {
                        topic,
                        field,
                        language,
                    });
                }
            }
        }
        Ok(())
    }
}

impl ContentProvider for Lesson {
    fn sections(&self, language: Language) -> Vec<Section> {
        self.sections
            .iter()
            .map(|s| Section {
                id: SectionId::new(s.id.clone()),
                title: s.title.get(language).to_string(),
                body: s.blocks.iter().map(|b| b.localize(language)).collect(),
            })
            .collect()
    }
}

/// Every bundled lesson plus the badge table used on the completion screen.
#[derive(Clone, Debug)]
pub struct LessonCatalog {
    lessons: Vec<Lesson>,
    badges: BTreeMap<String, Localized>,
    media_base_url: String,
}

impl LessonCatalog {
    /// Load and validate the lessons compiled into the binary.
    pub fn load_embedded() -> Result<Self, CatalogError> {
        let mut names: Vec<String> = LessonAssets::iter()
            .filter(|name| name.ends_with(".toml"))
            .map(|name| name.to_string())
            .collect();
        names.sort();

        let mut sources = Vec::with_capacity(names.len());
        for name in names {
            let file = LessonAssets::get(&name).ok_or_else(|| CatalogError::MissingAsset {
                name: name.clone(),
            })?;
            let content = String::from_utf8(file.data.into_owned())
                .map_err(|_| CatalogError::Encoding { name: name.clone() })?;
            sources.push((name, content));
        }

        let badges_name = "badges.toml";
        let badges = BadgeAssets::get(badges_name).ok_or_else(|| CatalogError::MissingAsset {
            name: badges_name.to_string(),
        })?;
        let badges = std::str::from_utf8(badges.data.as_ref()).map_err(|_| CatalogError::Encoding {
            name: badges_name.to_string(),
        })?;

        Self::from_sources(
            sources.iter().map(|(n, c)| (n.as_str(), c.as_str())),
            badges,
        )
    }

    /// Build from `(file name, toml)` pairs in display order.
    pub fn from_sources<'a>(
        lessons: impl IntoIterator<Item = (&'a str, &'a str)>,
        badges: &str,
    ) -> Result<Self, CatalogError> {
        let badges: BTreeMap<String, Localized> =
            toml::from_str(badges).map_err(|source| CatalogError::Parse {
                name: "badges.toml".to_string(),
                source,
            })?;

        let mut parsed = Vec::new();
        for (name, content) in lessons {
            let file: LessonFile = toml::from_str(content).map_err(|source| CatalogError::Parse {
                name: name.to_string(),
                source,
            })?;
            parsed.push(Lesson {
                topic: TopicId::new(file.topic),
                badge: file.badge,
                title: file.title,
                audio: file.audio,
                pdf: file.pdf,
                sections: file.sections,
            });
        }

        let catalog = Self {
            lessons: parsed,
            badges,
            media_base_url: DEFAULT_MEDIA_BASE_URL.to_string(),
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Check that every lesson is complete and that each completion badge
    /// resolves, so a broken table fails at startup rather than mid-lesson.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.lessons.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut topics = HashSet::new();
        for lesson in &self.lessons {
            if !topics.insert(lesson.topic.as_str()) {
                return Err(CatalogError::DuplicateTopic {
                    topic: lesson.topic.to_string(),
                });
            }
            lesson.validate()?;
            let Some(badge) = self.badges.get(&lesson.badge) else {
                return Err(CatalogError::UnknownBadge {
                    topic: lesson.topic.to_string(),
                    badge: lesson.badge.clone(),
                });
            };
            for language in Language::ALL {
                if badge.get(language).trim().is_empty() {
                    return Err(CatalogError::MissingText {
                        topic: lesson.topic.to_string(),
                        field: format!("badge {}", lesson.badge),
                        language,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn with_media_base_url(mut self, url: impl Into<String>) -> Self {
        self.media_base_url = url.into();
        self
    }

    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    pub fn lesson(&self, topic: &str) -> Option<&Lesson> {
        self.lessons.iter().find(|l| l.topic.as_str() == topic)
    }

    pub fn badge_name(&self, lesson: &Lesson, language: Language) -> Option<&str> {
        self.badges.get(&lesson.badge).map(|b| b.get(language))
    }

    pub fn pdf_url(&self, topic: &TopicId, language: Language) -> Option<String> {
        let lesson = self.lesson(topic.as_str())?;
        Some(self.media_url(lesson.pdf.get(language)))
    }

    fn media_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.media_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl AudioProvider for LessonCatalog {
    fn resolve_audio_url(&self, topic: &TopicId, language: Language) -> Option<String> {
        let lesson = self.lesson(topic.as_str())?;
        let path = lesson.audio.get(language).trim();
        if path.is_empty() {
            return None;
        }
        Some(self.media_url(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BADGES: &str = r#"
[reef-friend]
en = "Reef Friend"
ms = "Sahabat Terumbu"
"#;

    fn lesson_toml(topic: &str, badge: &str, section_ids: &[&str]) -> String {
        let mut out = format!(
            r#"
topic = "{topic}"
badge = "{badge}"
title = {{ en = "Title", ms = "Tajuk" }}
audio = {{ en = "audio/{topic}-en.mp3", ms = "audio/{topic}-ms.mp3" }}
pdf = {{ en = "https://cdn.test/{topic}-en.pdf", ms = "https://cdn.test/{topic}-ms.pdf" }}
"#
        );
        for id in section_ids {
            out.push_str(&format!(
                r#"
[[sections]]
id = "{id}"
title = {{ en = "Section {id}", ms = "Bahagian {id}" }}

[[sections.blocks]]
kind = "paragraph"
text = {{ en = "Hello", ms = "Helo" }}

[[sections.blocks]]
kind = "fact"
label = {{ en = "Weight", ms = "Berat" }}
text = {{ en = "300 kg", ms = "300 kg" }}
"#
            ));
        }
        out
    }

    #[test]
    fn test_parses_sections_per_language() {
        let toml = lesson_toml("coral", "reef-friend", &["intro", "threats"]);
        let catalog = LessonCatalog::from_sources([("coral.toml", toml.as_str())], BADGES).unwrap();
        let lesson = catalog.lesson("coral").unwrap();

        let en = lesson.sections(Language::English);
        let ms = lesson.sections(Language::Malay);
        assert_eq!(en.len(), 2);
        assert_eq!(en[0].id, ms[0].id);
        assert_eq!(en[0].title, "Section intro");
        assert_eq!(ms[0].title, "Bahagian intro");
        assert_eq!(
            ms[0].body[1],
            ContentBlock::Fact {
                label: "Berat".to_string(),
                text: "300 kg".to_string()
            }
        );
    }

    #[test]
    fn test_rejects_duplicate_section_ids() {
        let toml = lesson_toml("coral", "reef-friend", &["intro", "intro"]);
        let err = LessonCatalog::from_sources([("coral.toml", toml.as_str())], BADGES).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateSection { ref id, .. } if id == "intro"));
    }

    #[test]
    fn test_rejects_unknown_badge() {
        let toml = lesson_toml("coral", "nobody", &["intro"]);
        let err = LessonCatalog::from_sources([("coral.toml", toml.as_str())], BADGES).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownBadge { .. }));
    }

    #[test]
    fn test_rejects_lesson_without_sections() {
        let toml = lesson_toml("coral", "reef-friend", &[]);
        let err = LessonCatalog::from_sources([("coral.toml", toml.as_str())], BADGES).unwrap_err();
        assert!(matches!(err, CatalogError::NoSections { .. }));
    }

    #[test]
    fn test_rejects_missing_translation() {
        let toml = lesson_toml("coral", "reef-friend", &["intro"]).replace("ms = \"Helo\"", "ms = \"\"");
        let err = LessonCatalog::from_sources([("coral.toml", toml.as_str())], BADGES).unwrap_err();
        match err {
            CatalogError::MissingText { field, language, .. } => {
                assert_eq!(field, "intro.blocks[0]");
                assert_eq!(language, Language::Malay);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rejects_duplicate_topics() {
        let a = lesson_toml("coral", "reef-friend", &["intro"]);
        let err = LessonCatalog::from_sources(
            [("a.toml", a.as_str()), ("b.toml", a.as_str())],
            BADGES,
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateTopic { .. }));
    }

    #[test]
    fn test_rejects_empty_catalog() {
        let err = LessonCatalog::from_sources(std::iter::empty(), BADGES).unwrap_err();
        assert!(matches!(err, CatalogError::Empty));
    }

    #[test]
    fn test_parse_error_names_file() {
        let err = LessonCatalog::from_sources([("broken.toml", "topic = ")], BADGES).unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn test_media_urls_join_base_or_pass_through() {
        let toml = lesson_toml("coral", "reef-friend", &["intro"]);
        let catalog = LessonCatalog::from_sources([("coral.toml", toml.as_str())], BADGES)
            .unwrap()
            .with_media_base_url("https://media.test/lessons/");
        let topic = TopicId::new("coral");

        assert_eq!(
            catalog.resolve_audio_url(&topic, Language::Malay).as_deref(),
            Some("https://media.test/lessons/audio/coral-ms.mp3")
        );
        assert_eq!(
            catalog.pdf_url(&topic, Language::English).as_deref(),
            Some("https://cdn.test/coral-en.pdf")
        );
        assert_eq!(catalog.resolve_audio_url(&TopicId::new("nope"), Language::English), None);
    }

    #[test]
    fn test_badge_name_lookup() {
        let toml = lesson_toml("coral", "reef-friend", &["intro"]);
        let catalog = LessonCatalog::from_sources([("coral.toml", toml.as_str())], BADGES).unwrap();
        let lesson = catalog.lesson("coral").unwrap();
        assert_eq!(catalog.badge_name(lesson, Language::Malay), Some("Sahabat Terumbu"));
    }
}
