use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main application layout
pub struct AppLayout {
    pub header: Rect,
    pub wanted_bar: Rect,
    pub list: Rect,
    pub footer: Rect,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Header
                Constraint::Length(1), // Wanted size bar
                Constraint::Min(5),    // File list
                Constraint::Length(1), // Footer
            ])
            .split(area);

        Self {
            header: chunks[0],
            wanted_bar: chunks[1],
            list: chunks[2],
            footer: chunks[3],
        }
    }
}
