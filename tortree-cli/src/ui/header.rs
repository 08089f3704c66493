use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};
use tortree_core::{format_count, format_size};

use crate::app::{AppMode, AppState};

use super::progress::progress_indicator;
use super::theme::Theme;

/// Header widget showing title, torrent path, and status
pub struct Header<'a> {
    state: &'a AppState,
    theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(state: &'a AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 20 || area.height < 1 {
            return;
        }

        let title = "TORTREE";
        let title_style = Style::default()
            .fg(self.theme.blue)
            .add_modifier(Modifier::BOLD);
        buf.set_string(area.x + 1, area.y, title, title_style);

        buf.set_string(
            area.x + 9,
            area.y,
            "─",
            Style::default().fg(self.theme.border),
        );

        let building = self.state.mode == AppMode::Building;
        let tree = self.state.session.tree();

        // Status (right-aligned)
        let status = if building {
            progress_indicator(&self.state.progress, self.state.spinner_frame)
        } else {
            format!(
                "{} files, {}",
                format_count(tree.file_count() as u64),
                format_size(tree.total_size())
            )
        };
        let status_width = status.chars().count() as u16;

        // Breadcrumbs
        let path = if building {
            self.state.torrent_name.clone()
        } else {
            tree.breadcrumbs(self.state.session.current_directory())
        };

        let max_path_len = area.width.saturating_sub(status_width + 14) as usize;
        let chars: Vec<char> = path.chars().collect();
        let display_path = if chars.len() > max_path_len && max_path_len > 3 {
            let tail: String = chars[chars.len() - (max_path_len - 3)..].iter().collect();
            format!("...{}", tail)
        } else {
            path
        };

        buf.set_stringn(
            area.x + 11,
            area.y,
            &display_path,
            max_path_len,
            Style::default().fg(self.theme.fg),
        );

        let status_x = area.x + area.width.saturating_sub(status_width + 2);
        let status_style = if building {
            Style::default().fg(self.theme.yellow)
        } else {
            Style::default().fg(self.theme.fg_dim)
        };
        buf.set_string(status_x, area.y, &status, status_style);
    }
}
