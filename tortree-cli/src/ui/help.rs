use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, Padding, Widget},
};

use super::theme::Theme;

/// Help overlay widget
pub struct HelpView<'a> {
    theme: &'a Theme,
}

impl<'a> HelpView<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }
}

impl Widget for HelpView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Center the help box
        let width = 50.min(area.width.saturating_sub(4));
        let height = 29.min(area.height.saturating_sub(4));
        let x = area.x + (area.width - width) / 2;
        let y = area.y + (area.height - height) / 2;
        let help_area = Rect::new(x, y, width, height);

        Clear.render(help_area, buf);

        let block = Block::default()
            .title(" Help ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.blue))
            .style(Style::default().bg(self.theme.bg_surface))
            .padding(Padding::uniform(1));

        let inner = block.inner(help_area);
        block.render(help_area, buf);

        let key_style = Style::default()
            .fg(self.theme.yellow)
            .add_modifier(Modifier::BOLD);
        let desc_style = Style::default().fg(self.theme.fg);
        let section_style = Style::default()
            .fg(self.theme.blue)
            .add_modifier(Modifier::BOLD);

        let help_items = [
            ("", "Navigation", true),
            ("↑ k", "Move up", false),
            ("↓ j", "Move down", false),
            ("PgUp/PgDn", "Page up/down", false),
            ("Home g", "Go to first", false),
            ("End G", "Go to last", false),
            ("Enter → l", "Open directory", false),
            ("Bksp ← h", "Parent directory", false),
            ("", "", false),
            ("", "Selection", true),
            ("Space", "Select/unselect row", false),
            ("a", "Select all rows", false),
            ("Esc", "Clear selection", false),
            ("", "", false),
            ("", "Files", true),
            ("w", "Download selected", false),
            ("x", "Skip selected", false),
            ("1", "Low priority", false),
            ("2", "Normal priority", false),
            ("3", "High priority", false),
            ("", "", false),
            ("", "Other", true),
            ("?", "Toggle this help", false),
            ("q Ctrl+C", "Quit", false),
        ];

        for (i, (key, desc, is_section)) in help_items.iter().enumerate() {
            if i >= inner.height as usize {
                break;
            }

            let y = inner.y + i as u16;

            if *is_section {
                buf.set_string(inner.x, y, *desc, section_style);
            } else if !key.is_empty() {
                buf.set_string(inner.x, y, format!("{:12}", key), key_style);
                buf.set_string(inner.x + 12, y, *desc, desc_style);
            }
        }
    }
}
