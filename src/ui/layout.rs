use ratatui::layout::{Constraint, Direction, Layout, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutTier {
    Wide,   // ≥100 cols: padded reading column, full-size sidebar, progress bar
    Medium, // 60-99 cols: full-width text, progress bar
    Narrow, // <60 cols: full-width text, progress in the header only
}

impl LayoutTier {
    pub fn from_area(area: Rect) -> Self {
        if area.width >= 100 {
            LayoutTier::Wide
        } else if area.width >= 60 {
            LayoutTier::Medium
        } else {
            LayoutTier::Narrow
        }
    }

    pub fn show_progress_bar(&self, height: u16) -> bool {
        height >= 16 && *self != LayoutTier::Narrow
    }

    /// Width of the slide-in section panel.
    pub fn sidebar_width(&self, area_width: u16) -> u16 {
        let preferred = match self {
            LayoutTier::Wide => 40,
            LayoutTier::Medium => 32,
            LayoutTier::Narrow => area_width.saturating_sub(6),
        };
        preferred.min(area_width)
    }

    pub fn reading_margin(&self) -> u16 {
        match self {
            LayoutTier::Wide => 6,
            LayoutTier::Medium => 2,
            LayoutTier::Narrow => 0,
        }
    }
}

pub struct AppLayout {
    pub header: Rect,
    pub main: Rect,
    pub progress: Option<Rect>,
    pub footer: Rect,
    pub tier: LayoutTier,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let tier = LayoutTier::from_area(area);
        let show_progress = tier.show_progress_bar(area.height);

        let mut constraints = vec![Constraint::Length(3), Constraint::Min(5)];
        if show_progress {
            constraints.push(Constraint::Length(3));
        }
        constraints.push(Constraint::Length(2));

        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        let (progress, footer) = if show_progress {
            (Some(vertical[2]), vertical[3])
        } else {
            (None, vertical[2])
        };

        Self {
            header: vertical[0],
            main: vertical[1],
            progress,
            footer,
            tier,
        }
    }

    /// Text area inside the section view: border, reading margin and the
    /// top padding row removed.
    pub fn body_viewport(&self) -> Rect {
        let margin = self.tier.reading_margin();
        let inner_width = self.main.width.saturating_sub(2 + 2 * margin);
        let inner_height = self.main.height.saturating_sub(3);
        Rect::new(self.main.x + 1 + margin, self.main.y + 2, inner_width, inner_height)
    }
}

pub fn wrapped_line_count(text: &str, width: usize) -> usize {
    if width == 0 {
        return 0;
    }
    let chars = text.chars().count().max(1);
    chars.div_ceil(width)
}

pub fn pack_hint_lines(hints: &[&str], width: usize) -> Vec<String> {
    if width == 0 || hints.is_empty() {
        return Vec::new();
    }

    let prefix = "  ";
    let separator = "  ";
    let mut out: Vec<String> = Vec::new();
    let mut current = prefix.to_string();
    let mut has_hint = false;

    for hint in hints {
        if hint.is_empty() {
            continue;
        }
        let candidate = if has_hint {
            format!("{current}{separator}{hint}")
        } else {
            format!("{current}{hint}")
        };
        if candidate.chars().count() <= width {
            current = candidate;
            has_hint = true;
        } else {
            if has_hint {
                out.push(current);
            }
            current = format!("{prefix}{hint}");
            has_hint = true;
        }
    }

    if has_hint {
        out.push(current);
    }
    out
}

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    const MIN_POPUP_WIDTH: u16 = 48;
    const MIN_POPUP_HEIGHT: u16 = 12;

    let requested_w = area.width.saturating_mul(percent_x.min(100)) / 100;
    let requested_h = area.height.saturating_mul(percent_y.min(100)) / 100;

    let target_w = requested_w.max(MIN_POPUP_WIDTH).min(area.width);
    let target_h = requested_h.max(MIN_POPUP_HEIGHT).min(area.height);

    let left = area
        .x
        .saturating_add((area.width.saturating_sub(target_w)) / 2);
    let top = area
        .y
        .saturating_add((area.height.saturating_sub(target_h)) / 2);

    Rect::new(left, top, target_w, target_h)
}
