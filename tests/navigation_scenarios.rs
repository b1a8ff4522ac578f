use std::time::{Duration, Instant};

use rimba::content::{ContentBlock, Section, SectionId, TopicId};
use rimba::nav::{CompletionSink, NavEvent, SectionNavigationController, clamp_index};

const DEBOUNCE: Duration = Duration::from_millis(300);

fn sections(count: usize) -> Vec<Section> {
    (0..count)
        .map(|i| Section {
            id: SectionId::new(format!("section-{i}")),
            title: format!("Section {i}"),
            body: vec![ContentBlock::Paragraph(format!("Body {i}"))],
        })
        .collect()
}

fn controller(count: usize) -> SectionNavigationController {
    SectionNavigationController::new(TopicId::new("malayan-tapir"), sections(count))
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[derive(Default)]
struct CountingSink {
    topics: Vec<TopicId>,
}

impl CompletionSink for CountingSink {
    fn on_lesson_complete(&mut self, topic: &TopicId) {
        self.topics.push(topic.clone());
    }
}

#[test]
fn clamping_always_lands_in_range() {
    for len in 1..12 {
        for index in 0..40 {
            let clamped = clamp_index(index, len);
            assert!(clamped < len, "clamp({index}, {len}) = {clamped}");
        }
    }
    assert_eq!(clamp_index(7, 0), 0);
}

#[test]
fn two_selects_inside_window_commit_once_to_the_last() {
    let mut ctl = controller(8);
    let t0 = Instant::now();

    ctl.request_select(2, t0);
    ctl.request_select(5, t0 + ms(100));

    // The first deadline has been superseded.
    assert_eq!(ctl.poll(t0 + DEBOUNCE), None);

    let mut commits = Vec::new();
    for step in 0..20 {
        if let Some(event) = ctl.poll(t0 + ms(100) + DEBOUNCE + ms(step * 50)) {
            commits.push(event);
        }
    }
    assert_eq!(commits, vec![NavEvent::Committed { from: 0, to: 5 }]);
    assert_eq!(ctl.safe_index(), 5);
}

#[test]
fn next_is_dropped_while_select_is_requeued() {
    let mut ctl = controller(8);
    let t0 = Instant::now();

    ctl.request_next(t0);
    assert!(ctl.is_navigating());
    assert_eq!(ctl.pending_target(), Some(1));

    ctl.request_next(t0 + ms(10));
    assert_eq!(ctl.pending_target(), Some(1));
    assert_eq!(ctl.safe_index(), 0);

    ctl.request_select(6, t0 + ms(20));
    assert_eq!(ctl.pending_target(), Some(6));
}

#[test]
fn boundaries_reset_without_scheduling() {
    let mut ctl = controller(3);
    let t0 = Instant::now();

    ctl.request_previous(t0);
    assert!(!ctl.is_navigating());
    assert_eq!(ctl.pending_target(), None);

    ctl.request_select(2, t0);
    ctl.poll(t0 + DEBOUNCE);
    assert!(ctl.is_last());

    ctl.request_next(t0 + ms(400));
    assert!(!ctl.is_navigating());
    assert_eq!(ctl.pending_target(), None);
    assert!(!ctl.needs_poll());
    assert_eq!(ctl.safe_index(), 2);
}

#[test]
fn timer_fire_clears_flag_and_target_even_when_invalid() {
    let mut ctl = controller(4);
    let t0 = Instant::now();

    ctl.request_select(3, t0);
    assert_eq!(
        ctl.poll(t0 + DEBOUNCE),
        Some(NavEvent::Committed { from: 0, to: 3 })
    );
    assert!(!ctl.is_navigating());
    assert_eq!(ctl.pending_target(), None);

    ctl.request_select(99, t0 + ms(500));
    assert_eq!(
        ctl.poll(t0 + ms(500) + DEBOUNCE),
        Some(NavEvent::Dropped { target: 99 })
    );
    assert!(!ctl.is_navigating());
    assert_eq!(ctl.pending_target(), None);
    assert_eq!(ctl.safe_index(), 3);
}

#[test]
fn rapid_nexts_advance_a_single_section() {
    let mut ctl = controller(8);
    let t0 = Instant::now();

    ctl.request_next(t0);
    ctl.request_next(t0 + ms(30));
    ctl.request_next(t0 + ms(60));

    ctl.poll(t0 + ms(1000));
    assert_eq!(ctl.safe_index(), 1);
}

#[test]
fn sidebar_opens_synchronously_and_closes_after_animation() {
    let mut ctl = controller(8);
    let t0 = Instant::now();

    ctl.open_sidebar(t0);
    assert!(ctl.sidebar_visible());

    ctl.poll(t0 + ms(300));
    assert_eq!(ctl.slide_offset(), 0.0);
    assert!((ctl.overlay_opacity() - 0.5).abs() < f32::EPSILON);

    let t1 = t0 + ms(300);
    ctl.close_sidebar(t1);
    ctl.poll(t1 + ms(100));
    assert!(ctl.sidebar_visible());
    ctl.poll(t1 + ms(249));
    assert!(ctl.sidebar_visible());
    ctl.poll(t1 + ms(250));
    assert!(!ctl.sidebar_visible());
    assert_eq!(ctl.overlay_opacity(), 0.0);
}

#[test]
fn completion_is_reported_only_when_idle() {
    let mut ctl = controller(3);
    let mut sink = CountingSink::default();
    let t0 = Instant::now();

    ctl.request_next(t0);
    assert!(!ctl.request_complete(&mut sink));
    assert!(sink.topics.is_empty());

    ctl.poll(t0 + DEBOUNCE);
    assert!(ctl.request_complete(&mut sink));
    assert_eq!(sink.topics, vec![TopicId::new("malayan-tapir")]);
    // No local state change.
    assert_eq!(ctl.safe_index(), 1);
    assert!(ctl.completed_sections().is_empty());
}

#[test]
fn dispose_cancels_pending_commit() {
    let mut ctl = controller(5);
    let t0 = Instant::now();
    ctl.request_select(4, t0);
    ctl.dispose();

    assert_eq!(ctl.poll(t0 + ms(1000)), None);
    assert_eq!(ctl.safe_index(), 0);
    ctl.request_next(t0 + ms(1000));
    assert!(!ctl.is_navigating());
}

#[test]
fn language_switch_resolves_by_id() {
    let mut ctl = controller(4);
    let t0 = Instant::now();
    ctl.request_select(2, t0);
    ctl.poll(t0 + DEBOUNCE);
    ctl.mark_completed(1);

    // Same ids, different order and an extra section up front.
    let mut translated = sections(4);
    translated.reverse();
    translated.insert(
        0,
        Section {
            id: SectionId::new("pengenalan"),
            title: "Pengenalan".to_string(),
            body: Vec::new(),
        },
    );
    ctl.replace_sections(translated);

    assert_eq!(ctl.current_section().unwrap().id.as_str(), "section-2");
    let completed: Vec<&str> = ctl
        .completed_sections()
        .iter()
        .map(|&i| ctl.sections()[i].id.as_str())
        .collect();
    assert_eq!(completed, vec!["section-1"]);
}
