use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Padding, Paragraph, Widget, Wrap};

use crate::content::{ContentBlock, Section};
use crate::ui::layout::wrapped_line_count;
use crate::ui::theme::Theme;

/// The body of the active section, wrapped and scrollable.
pub struct SectionView<'a> {
    section: &'a Section,
    scroll: u16,
    margin: u16,
    theme: &'a Theme,
}

impl<'a> SectionView<'a> {
    pub fn new(section: &'a Section, theme: &'a Theme) -> Self {
        Self {
            section,
            scroll: 0,
            margin: 0,
            theme,
        }
    }

    pub fn scroll(mut self, scroll: u16) -> Self {
        self.scroll = scroll;
        self
    }

    pub fn margin(mut self, margin: u16) -> Self {
        self.margin = margin;
        self
    }
}

fn plain_lines(section: &Section) -> Vec<String> {
    let mut out = Vec::with_capacity(section.body.len() * 2);
    for block in &section.body {
        match block {
            ContentBlock::Paragraph(text) => {
                if !out.is_empty() {
                    out.push(String::new());
                }
                out.push(text.clone());
            }
            ContentBlock::Bullet(text) => out.push(format!("  • {text}")),
            ContentBlock::Fact { label, text } => out.push(format!("{label}: {text}")),
        }
    }
    out
}

/// Rows the body needs at `width`, for clamping the scroll offset.
pub fn content_height(section: &Section, width: u16) -> u16 {
    let rows: usize = plain_lines(section)
        .iter()
        .map(|line| wrapped_line_count(line, width as usize))
        .sum();
    rows.min(u16::MAX as usize) as u16
}

impl Widget for SectionView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(Line::from(Span::styled(
                format!(" {} ", self.section.title),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )))
            .border_style(Style::default().fg(colors.border()))
            .padding(Padding::new(self.margin, self.margin, 1, 0))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let body_style = Style::default().fg(colors.fg());
        let mut lines: Vec<Line> = Vec::new();
        for content in &self.section.body {
            match content {
                ContentBlock::Paragraph(text) => {
                    if !lines.is_empty() {
                        lines.push(Line::from(""));
                    }
                    lines.push(Line::from(Span::styled(text.as_str(), body_style)));
                }
                ContentBlock::Bullet(text) => {
                    lines.push(Line::from(vec![
                        Span::styled("  • ", Style::default().fg(colors.accent())),
                        Span::styled(text.as_str(), body_style),
                    ]));
                }
                ContentBlock::Fact { label, text } => {
                    lines.push(Line::from(vec![
                        Span::styled(
                            format!("{label}: "),
                            Style::default()
                                .fg(colors.accent())
                                .add_modifier(Modifier::BOLD),
                        ),
                        Span::styled(text.as_str(), body_style),
                    ]));
                }
            }
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0))
            .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::SectionId;

    fn sample() -> Section {
        Section {
            id: SectionId::new("diet"),
            title: "Diet".to_string(),
            body: vec![
                ContentBlock::Paragraph("Tapirs browse on leaves and fruit.".to_string()),
                ContentBlock::Bullet("Young shoots".to_string()),
                ContentBlock::Fact {
                    label: "Daily intake".to_string(),
                    text: "Up to 40 kg".to_string(),
                },
            ],
        }
    }

    fn rendered(buf: &Buffer) -> String {
        let mut out = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                out.push_str(buf[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn test_renders_title_and_blocks() {
        let theme = Theme::default();
        let section = sample();
        let area = Rect::new(0, 0, 60, 10);
        let mut buf = Buffer::empty(area);
        SectionView::new(&section, &theme).render(area, &mut buf);

        let text = rendered(&buf);
        assert!(text.contains(" Diet "));
        assert!(text.contains("Tapirs browse on leaves and fruit."));
        assert!(text.contains("• Young shoots"));
        assert!(text.contains("Daily intake: Up to 40 kg"));
    }

    #[test]
    fn test_scroll_skips_leading_rows() {
        let theme = Theme::default();
        let section = sample();
        let area = Rect::new(0, 0, 60, 10);
        let mut buf = Buffer::empty(area);
        SectionView::new(&section, &theme).scroll(1).render(area, &mut buf);
        assert!(!rendered(&buf).contains("Tapirs browse"));
    }

    #[test]
    fn test_content_height_counts_wrapped_rows() {
        let section = sample();
        assert_eq!(content_height(&section, 80), 3);
        assert!(content_height(&section, 10) > 3);
    }
}
