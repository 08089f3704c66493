use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, Padding, Widget},
};
use tortree_core::{BuildProgress, format_count};

use super::bar_chart::progress_bar;
use super::theme::Theme;

/// Braille spinner characters
const SPINNER: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Progress widget shown while the files tree is built
pub struct ProgressView<'a> {
    progress: &'a BuildProgress,
    torrent_name: &'a str,
    spinner_frame: usize,
    theme: &'a Theme,
}

impl<'a> ProgressView<'a> {
    pub fn new(
        progress: &'a BuildProgress,
        torrent_name: &'a str,
        spinner_frame: usize,
        theme: &'a Theme,
    ) -> Self {
        Self {
            progress,
            torrent_name,
            spinner_frame,
            theme,
        }
    }
}

impl Widget for ProgressView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border))
            .padding(Padding::horizontal(1));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 3 || inner.width < 20 {
            return;
        }

        let spinner = SPINNER[self.spinner_frame % SPINNER.len()];
        let spinner_style = Style::default()
            .fg(self.theme.blue)
            .add_modifier(Modifier::BOLD);
        buf.set_string(inner.x, inner.y, spinner.to_string(), spinner_style);

        let status_text = format!(" Building files tree for {}...", self.torrent_name);
        buf.set_stringn(
            inner.x + 2,
            inner.y,
            &status_text,
            inner.width.saturating_sub(2) as usize,
            Style::default().fg(self.theme.fg),
        );

        let percentage = self.progress.percentage();
        let bar = progress_bar(percentage / 100.0, inner.width as usize);
        buf.set_string(inner.x, inner.y + 1, &bar, Style::default().fg(self.theme.blue));

        let stats = format!(
            "{} of {} files  {:.1}%",
            format_count(self.progress.files_added as u64),
            format_count(self.progress.total_files as u64),
            percentage,
        );
        buf.set_string(
            inner.x,
            inner.y + 2,
            &stats,
            Style::default().fg(self.theme.fg_muted),
        );
    }
}

/// Compact progress indicator for header
pub fn progress_indicator(progress: &BuildProgress, spinner_frame: usize) -> String {
    let spinner = SPINNER[spinner_frame % SPINNER.len()];
    format!(
        "{} {} / {} files",
        spinner,
        format_count(progress.files_added as u64),
        format_count(progress.total_files as u64)
    )
}
