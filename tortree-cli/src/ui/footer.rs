use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::app::AppMode;

use super::theme::Theme;

/// Footer widget showing keyboard hints and the last request
pub struct Footer<'a> {
    mode: AppMode,
    theme: &'a Theme,
    selection_count: usize,
    status: Option<&'a str>,
}

impl<'a> Footer<'a> {
    pub fn new(mode: AppMode, theme: &'a Theme) -> Self {
        Self {
            mode,
            theme,
            selection_count: 0,
            status: None,
        }
    }

    pub fn with_selection(mut self, count: usize) -> Self {
        self.selection_count = count;
        self
    }

    pub fn with_status(mut self, status: Option<&'a str>) -> Self {
        self.status = status;
        self
    }
}

impl Widget for Footer<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 20 || area.height < 1 {
            return;
        }

        let hints: Vec<(&str, &str)> = match self.mode {
            AppMode::Building => vec![("q", "Quit")],
            AppMode::Browsing => vec![
                ("↑↓", "Navigate"),
                ("←→", "Up/Open"),
                ("Space", "Select"),
                ("w/x", "Download/Skip"),
                ("1-3", "Priority"),
                ("?", "Help"),
                ("q", "Quit"),
            ],
            AppMode::Help => vec![("Esc", "Close help"), ("q", "Close")],
        };

        let key_style = Style::default()
            .fg(self.theme.fg)
            .add_modifier(Modifier::BOLD);
        let desc_style = Style::default().fg(self.theme.fg_dim);
        let sep_style = Style::default().fg(self.theme.border);

        let mut x = area.x + 1;
        for (i, (key, desc)) in hints.iter().enumerate() {
            buf.set_string(x, area.y, *key, key_style);
            x += key.chars().count() as u16 + 1;

            buf.set_string(x, area.y, *desc, desc_style);
            x += desc.chars().count() as u16;

            if i < hints.len() - 1 {
                buf.set_string(x, area.y, "  │  ", sep_style);
                x += 5;
            }

            if x >= area.x + area.width - 5 {
                break;
            }
        }

        // Selection count or last request on the right side
        let right = if self.selection_count > 0 {
            Some((
                format!("{} selected", self.selection_count),
                self.theme.purple,
            ))
        } else {
            self.status.map(|s| (s.to_string(), self.theme.green))
        };

        if let Some((text, color)) = right {
            let style = Style::default().fg(color).add_modifier(Modifier::BOLD);
            let width = text.chars().count() as u16;
            let text_x = (area.x + area.width).saturating_sub(width + 1);
            if text_x > x + 2 {
                buf.set_string(text_x, area.y, &text, style);
            }
        }
    }
}
