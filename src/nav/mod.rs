pub mod controller;
pub mod debounce;
pub mod sidebar;

use crate::content::TopicId;

pub use controller::{NavEvent, SectionNavigationController};
pub use debounce::PendingTimer;
pub use sidebar::SidebarState;

/// Receives the "lesson finished" signal. Fire-and-forget: implementations
/// log their own failures and never report back.
pub trait CompletionSink {
    fn on_lesson_complete(&mut self, topic: &TopicId);
}

/// Clamp `index` into a list of `len` items. An empty list clamps to 0.
pub fn clamp_index(index: usize, len: usize) -> usize {
    if len == 0 { 0 } else { index.min(len - 1) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_index_always_in_range() {
        for len in 1..=12 {
            for index in [0, 1, len - 1, len, len + 7, usize::MAX] {
                let safe = clamp_index(index, len);
                assert!(safe < len, "clamp({index}, {len}) = {safe}");
            }
        }
    }

    #[test]
    fn test_clamp_index_is_idempotent() {
        for index in 0..20 {
            let once = clamp_index(index, 8);
            assert_eq!(clamp_index(once, 8), once);
        }
    }

    #[test]
    fn test_clamp_index_empty_list() {
        assert_eq!(clamp_index(5, 0), 0);
    }
}
