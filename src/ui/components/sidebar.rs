use std::collections::BTreeSet;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::content::Section;
use crate::ui::theme::{Theme, ThemeColors};

/// Dims whatever is already drawn in the area. Used behind the section panel.
pub struct Overlay<'a> {
    opacity: f32,
    theme: &'a Theme,
}

impl<'a> Overlay<'a> {
    pub fn new(opacity: f32, theme: &'a Theme) -> Self {
        Self { opacity, theme }
    }
}

impl Widget for Overlay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.opacity <= 0.0 {
            return;
        }
        let shade = self.theme.colors.overlay();
        let area = area.intersection(buf.area);
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                let cell = &mut buf[(x, y)];
                let fg = ThemeColors::mix(cell.fg, shade, self.opacity);
                let bg = ThemeColors::mix(cell.bg, shade, self.opacity);
                cell.set_fg(fg).set_bg(bg);
            }
        }
    }
}

/// Section list sliding in from the left edge.
///
/// `offset` is the panel's horizontal position relative to `area.x`: `0`
/// when fully open, `-width` when fully closed.
pub struct SectionSidebar<'a> {
    sections: &'a [Section],
    current: usize,
    cursor: usize,
    completed: &'a BTreeSet<usize>,
    width: u16,
    offset: f32,
    title: String,
    hints: String,
    theme: &'a Theme,
}

impl<'a> SectionSidebar<'a> {
    pub fn new(
        sections: &'a [Section],
        current: usize,
        completed: &'a BTreeSet<usize>,
        theme: &'a Theme,
    ) -> Self {
        Self {
            sections,
            current,
            cursor: current,
            completed,
            width: 34,
            offset: 0.0,
            title: String::new(),
            hints: String::new(),
            theme,
        }
    }

    pub fn cursor(mut self, cursor: usize) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn width(mut self, width: u16) -> Self {
        self.width = width;
        self
    }

    pub fn offset(mut self, offset: f32) -> Self {
        self.offset = offset;
        self
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn hints(mut self, hints: &str) -> Self {
        self.hints = hints.to_string();
        self
    }

    fn render_panel(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", self.title))
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.sidebar_bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let list_height = inner.height.saturating_sub(2) as usize;
        // Keep the cursor row in view.
        let first = self.cursor.saturating_sub(list_height.saturating_sub(1));

        let mut lines: Vec<Line> = Vec::new();
        for (i, section) in self.sections.iter().enumerate().skip(first).take(list_height) {
            let is_cursor = i == self.cursor;
            let is_current = i == self.current;
            let marker = if self.completed.contains(&i) { "✓" } else { " " };
            let pointer = if is_cursor { ">" } else { " " };

            let mut style = Style::default().fg(if is_current {
                colors.accent()
            } else {
                colors.fg()
            });
            if is_cursor {
                style = style.bg(colors.accent_dim()).add_modifier(Modifier::BOLD);
            }

            lines.push(Line::from(vec![
                Span::styled(format!("{pointer}{:>2}. ", i + 1), style),
                Span::styled(format!("{marker} "), Style::default().fg(colors.completed())),
                Span::styled(section.title.as_str(), style),
            ]));
        }
        Paragraph::new(lines).render(inner, buf);

        if inner.height >= 2 && !self.hints.is_empty() {
            let hint_y = inner.bottom() - 1;
            buf.set_stringn(
                inner.x,
                hint_y,
                &self.hints,
                inner.width as usize,
                Style::default().fg(colors.text_muted()),
            );
        }
    }
}

impl Widget for SectionSidebar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = self.width.min(area.width);
        if width == 0 || area.height == 0 {
            return;
        }
        let hidden = (-self.offset).round().clamp(0.0, width as f32) as u16;
        let shown = width - hidden;
        if shown == 0 {
            return;
        }

        // Draw the whole panel off-screen, then copy the part that has slid
        // into view.
        let mut scratch = Buffer::empty(Rect::new(0, 0, width, area.height));
        self.render_panel(scratch.area, &mut scratch);

        for y in 0..area.height {
            for x in 0..shown {
                let src = scratch[(hidden + x, y)].clone();
                buf[(area.x + x, area.y + y)] = src;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::SectionId;
    use ratatui::style::Color;

    fn sections() -> Vec<Section> {
        ["Introduction", "Habitat", "Diet"]
            .iter()
            .enumerate()
            .map(|(i, title)| Section {
                id: SectionId::new(format!("s{i}")),
                title: title.to_string(),
                body: Vec::new(),
            })
            .collect()
    }

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width).map(|x| buf[(x, y)].symbol().to_string()).collect()
    }

    #[test]
    fn test_open_panel_lists_sections_with_markers() {
        let theme = Theme::default();
        let sections = sections();
        let completed: BTreeSet<usize> = [0].into_iter().collect();
        let area = Rect::new(0, 0, 60, 10);
        let mut buf = Buffer::empty(area);
        SectionSidebar::new(&sections, 1, &completed, &theme)
            .cursor(2)
            .width(30)
            .title("Sections")
            .render(area, &mut buf);

        assert!(row(&buf, 1).contains(" 1. ✓ Introduction"));
        assert!(row(&buf, 2).contains(" 2.   Habitat"));
        assert!(row(&buf, 3).contains("> 3.   Diet"));
        // Nothing drawn right of the panel.
        assert_eq!(buf[(40, 1)].symbol(), " ");
    }

    #[test]
    fn test_offset_shifts_panel_left() {
        let theme = Theme::default();
        let sections = sections();
        let completed = BTreeSet::new();
        let area = Rect::new(0, 0, 60, 10);

        let mut open = Buffer::empty(area);
        SectionSidebar::new(&sections, 0, &completed, &theme)
            .width(30)
            .render(area, &mut open);

        let mut sliding = Buffer::empty(area);
        SectionSidebar::new(&sections, 0, &completed, &theme)
            .width(30)
            .offset(-10.0)
            .render(area, &mut sliding);

        // Right border moves from column 29 to column 19.
        assert_eq!(open[(29, 1)].symbol(), "│");
        assert_eq!(sliding[(19, 1)].symbol(), "│");
        assert_eq!(sliding[(29, 1)].symbol(), " ");
    }

    #[test]
    fn test_fully_closed_draws_nothing() {
        let theme = Theme::default();
        let sections = sections();
        let completed = BTreeSet::new();
        let area = Rect::new(0, 0, 40, 6);
        let mut buf = Buffer::empty(area);
        SectionSidebar::new(&sections, 0, &completed, &theme)
            .width(30)
            .offset(-30.0)
            .render(area, &mut buf);
        assert_eq!(buf, Buffer::empty(area));
    }

    #[test]
    fn test_overlay_blends_towards_shade() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 2, 1);
        let mut buf = Buffer::empty(area);
        buf[(0, 0)].set_bg(Color::Rgb(200, 200, 200));
        Overlay::new(0.5, &theme).render(area, &mut buf);
        assert_eq!(buf[(0, 0)].bg, Color::Rgb(100, 100, 100));

        let mut untouched = Buffer::empty(area);
        untouched[(0, 0)].set_bg(Color::Rgb(200, 200, 200));
        Overlay::new(0.0, &theme).render(area, &mut untouched);
        assert_eq!(untouched[(0, 0)].bg, Color::Rgb(200, 200, 200));
    }
}
