pub mod menu;
pub mod progress_bar;
pub mod section_view;
pub mod sidebar;
