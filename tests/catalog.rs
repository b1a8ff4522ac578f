use std::collections::BTreeSet;

use rimba::content::{AudioProvider, ContentBlock, ContentProvider, LessonCatalog};
use rimba::preferences::Language;

#[test]
fn embedded_lessons_validate() {
    let catalog = LessonCatalog::load_embedded().expect("bundled lessons must validate");
    assert!(catalog.validate().is_ok());

    let topics: Vec<&str> = catalog.lessons().iter().map(|l| l.topic().as_str()).collect();
    assert_eq!(topics, vec!["malayan-tapir", "green-sea-turtle"]);
}

#[test]
fn tapir_lesson_has_eight_sections() {
    let catalog = LessonCatalog::load_embedded().unwrap();
    let tapir = catalog.lesson("malayan-tapir").unwrap();
    assert_eq!(tapir.section_count(), 8);
    assert_eq!(tapir.sections(Language::English).len(), 8);
}

#[test]
fn section_ids_match_across_languages() {
    let catalog = LessonCatalog::load_embedded().unwrap();
    for lesson in catalog.lessons() {
        let en: Vec<_> = lesson.sections(Language::English).into_iter().map(|s| s.id).collect();
        let ms: Vec<_> = lesson.sections(Language::Malay).into_iter().map(|s| s.id).collect();
        assert_eq!(en, ms, "{}", lesson.topic());

        let unique: BTreeSet<_> = en.iter().collect();
        assert_eq!(unique.len(), en.len(), "{} has duplicate ids", lesson.topic());
    }
}

#[test]
fn translations_differ_and_are_not_blank() {
    let catalog = LessonCatalog::load_embedded().unwrap();
    for lesson in catalog.lessons() {
        assert_ne!(lesson.title(Language::English), lesson.title(Language::Malay));
        for language in Language::ALL {
            for section in lesson.sections(language) {
                assert!(!section.title.trim().is_empty());
                assert!(!section.body.is_empty(), "{} / {}", lesson.topic(), section.id);
                for block in &section.body {
                    let text = match block {
                        ContentBlock::Paragraph(t) | ContentBlock::Bullet(t) => t,
                        ContentBlock::Fact { text, .. } => text,
                    };
                    assert!(!text.trim().is_empty());
                }
            }
        }
    }
}

#[test]
fn every_lesson_has_badge_audio_and_pdf() {
    let catalog = LessonCatalog::load_embedded().unwrap();
    for lesson in catalog.lessons() {
        for language in Language::ALL {
            let badge = catalog.badge_name(lesson, language).unwrap();
            assert!(!badge.is_empty());
            let audio = catalog.resolve_audio_url(lesson.topic(), language).unwrap();
            assert!(audio.starts_with("https://"));
            assert!(audio.contains(language.code()));
            let pdf = catalog.pdf_url(lesson.topic(), language).unwrap();
            assert!(pdf.ends_with(".pdf"));
        }
    }
}

#[test]
fn media_base_url_override() {
    let catalog = LessonCatalog::load_embedded()
        .unwrap()
        .with_media_base_url("file:///srv/rimba/");
    let lesson = &catalog.lessons()[0];
    let pdf = catalog.pdf_url(lesson.topic(), Language::English).unwrap();
    assert!(pdf.starts_with("file:///srv/rimba/pdf/"));
}
