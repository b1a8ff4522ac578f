use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::content::{Section, TopicId};
use crate::nav::debounce::PendingTimer;
use crate::nav::sidebar::SidebarState;
use crate::nav::{CompletionSink, clamp_index};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Outcome of a debounced commit, reported by `poll`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavEvent {
    Committed { from: usize, to: usize },
    /// The target was out of range when the timer fired; the index stayed put.
    Dropped { target: usize },
}

/// Owns the current section of one lesson screen.
///
/// Requests arriving while a transition is pending are filtered by
/// `is_navigating`: next/previous are dropped, an explicit selection
/// replaces the pending target and restarts the debounce window. The
/// timer is polled from the event loop, so every method that can start
/// or fire it takes the current `Instant`.
#[derive(Debug)]
pub struct SectionNavigationController {
    topic: TopicId,
    sections: Vec<Section>,
    current_index: usize,
    is_navigating: bool,
    timer: PendingTimer<usize>,
    debounce: Duration,
    completed: BTreeSet<usize>,
    sidebar: SidebarState,
    disposed: bool,
}

impl SectionNavigationController {
    pub fn new(topic: TopicId, sections: Vec<Section>) -> Self {
        Self::with_debounce(topic, sections, DEFAULT_DEBOUNCE)
    }

    pub fn with_debounce(topic: TopicId, sections: Vec<Section>, debounce: Duration) -> Self {
        if sections.is_empty() {
            debug!(topic = %topic, "navigation controller created with no sections");
        }
        Self {
            topic,
            sections,
            current_index: 0,
            is_navigating: false,
            timer: PendingTimer::new(),
            debounce,
            completed: BTreeSet::new(),
            sidebar: SidebarState::default(),
            disposed: false,
        }
    }

    pub fn topic(&self) -> &TopicId {
        &self.topic
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// The current index clamped into the live section list.
    pub fn safe_index(&self) -> usize {
        clamp_index(self.current_index, self.sections.len())
    }

    pub fn current_section(&self) -> Option<&Section> {
        self.sections.get(self.safe_index())
    }

    pub fn is_last(&self) -> bool {
        self.safe_index() + 1 >= self.sections.len()
    }

    pub fn is_navigating(&self) -> bool {
        self.is_navigating
    }

    pub fn pending_target(&self) -> Option<usize> {
        self.timer.payload().copied()
    }

    pub fn completed_sections(&self) -> &BTreeSet<usize> {
        &self.completed
    }

    pub fn is_completed(&self, index: usize) -> bool {
        self.completed.contains(&index)
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn sidebar(&self) -> &SidebarState {
        &self.sidebar
    }

    pub fn sidebar_visible(&self) -> bool {
        self.sidebar.visible()
    }

    pub fn slide_offset(&self) -> f32 {
        self.sidebar.slide_offset()
    }

    pub fn overlay_opacity(&self) -> f32 {
        self.sidebar.overlay_opacity()
    }

    /// Fraction of the lesson reached, counting the current section.
    pub fn progress(&self) -> f64 {
        if self.sections.is_empty() {
            return 0.0;
        }
        (self.safe_index() + 1) as f64 / self.sections.len() as f64
    }

    pub fn request_next(&mut self, now: Instant) {
        if self.disposed {
            return;
        }
        if self.is_navigating {
            trace!("next dropped: transition pending");
            return;
        }
        self.is_navigating = true;
        let index = self.safe_index();
        if index + 1 < self.sections.len() {
            self.schedule(now, index + 1);
        } else {
            debug!(index, "next ignored at last section");
            self.is_navigating = false;
        }
    }

    pub fn request_previous(&mut self, now: Instant) {
        if self.disposed {
            return;
        }
        if self.is_navigating {
            trace!("previous dropped: transition pending");
            return;
        }
        self.is_navigating = true;
        let index = self.safe_index();
        if index > 0 {
            self.schedule(now, index - 1);
        } else {
            debug!("previous ignored at first section");
            self.is_navigating = false;
        }
    }

    /// Jump to `target`, e.g. from a sidebar entry. Unlike next/previous this
    /// is honoured mid-transition: the latest selection wins.
    pub fn request_select(&mut self, target: usize, now: Instant) {
        if self.disposed {
            return;
        }
        if self.is_navigating {
            trace!(target, previous = ?self.pending_target(), "selection replaces pending target");
        }
        self.is_navigating = true;
        self.schedule(now, target);
        self.sidebar.close(now);
    }

    /// Report the lesson as finished. Returns whether the sink was notified.
    pub fn request_complete(&mut self, sink: &mut dyn CompletionSink) -> bool {
        if self.disposed || self.is_navigating {
            trace!("completion dropped: transition pending");
            return false;
        }
        sink.on_lesson_complete(&self.topic);
        true
    }

    /// Record a section as done. Out-of-range indices are ignored; nothing is
    /// ever removed.
    pub fn mark_completed(&mut self, index: usize) {
        if index < self.sections.len() {
            self.completed.insert(index);
        }
    }

    pub fn mark_all_completed(&mut self) {
        self.completed.extend(0..self.sections.len());
    }

    pub fn open_sidebar(&mut self, now: Instant) {
        if !self.disposed {
            self.sidebar.open(now);
        }
    }

    pub fn close_sidebar(&mut self, now: Instant) {
        if !self.disposed {
            self.sidebar.close(now);
        }
    }

    pub fn toggle_sidebar(&mut self, now: Instant) {
        if !self.disposed {
            self.sidebar.toggle(now);
        }
    }

    pub fn set_sidebar_width(&mut self, width: f32) {
        self.sidebar.set_panel_width(width);
    }

    /// Drive the debounce timer and the sidebar animation.
    pub fn poll(&mut self, now: Instant) -> Option<NavEvent> {
        if self.disposed {
            return None;
        }
        self.sidebar.tick(now);
        let target = self.timer.take_due(now)?;
        Some(self.commit(target))
    }

    /// True while there is something for `poll` to do.
    pub fn needs_poll(&self) -> bool {
        !self.disposed && (self.timer.is_pending() || self.sidebar.is_animating())
    }

    fn schedule(&mut self, now: Instant, target: usize) {
        self.timer.schedule(now, self.debounce, target);
    }

    fn commit(&mut self, target: usize) -> NavEvent {
        self.is_navigating = false;
        self.timer.cancel();
        if target < self.sections.len() {
            let from = self.safe_index();
            self.current_index = target;
            debug!(from, to = target, "section committed");
            NavEvent::Committed { from, to: target }
        } else {
            debug!(target, len = self.sections.len(), "commit dropped: target out of range");
            NavEvent::Dropped { target }
        }
    }

    /// Swap in the section list for another language.
    ///
    /// Sections are matched by id, so the reader stays on the same section
    /// even if the new list is ordered or sized differently. The pending
    /// target and the completed set are carried over the same way.
    pub fn replace_sections(&mut self, sections: Vec<Section>) {
        let position_in = |id: &str, list: &[Section]| list.iter().position(|s| s.id.as_str() == id);

        let current_id = self.current_section().map(|s| s.id.as_str().to_string());
        let pending_id = self
            .pending_target()
            .and_then(|i| self.sections.get(i))
            .map(|s| s.id.as_str().to_string());
        let completed_ids: Vec<String> = self
            .completed
            .iter()
            .filter_map(|&i| self.sections.get(i))
            .map(|s| s.id.as_str().to_string())
            .collect();

        self.current_index = current_id
            .as_deref()
            .and_then(|id| position_in(id, &sections))
            .unwrap_or(0);

        if self.timer.is_pending() {
            match pending_id.as_deref().and_then(|id| position_in(id, &sections)) {
                Some(new_target) => {
                    if let Some(target) = self.timer.payload_mut() {
                        *target = new_target;
                    }
                }
                None => {
                    debug!("pending section missing after language switch; cancelled");
                    self.timer.cancel();
                    self.is_navigating = false;
                }
            }
        }

        self.completed = completed_ids
            .iter()
            .filter_map(|id| position_in(id, &sections))
            .collect();
        self.sections = sections;
    }

    /// Tear down for unmount. Any pending commit is cancelled and later
    /// calls become no-ops.
    pub fn dispose(&mut self) {
        if let Some(target) = self.timer.cancel() {
            debug!(target, "pending commit cancelled on dispose");
        }
        self.is_navigating = false;
        self.disposed = true;
    }
}

impl Drop for SectionNavigationController {
    fn drop(&mut self) {
        if !self.disposed {
            self.dispose();
        }
    }
}
