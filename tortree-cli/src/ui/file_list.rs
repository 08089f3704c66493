use std::collections::HashSet;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};
use tortree_core::{Entry, FilesTree, NodeId, format_size};

use super::bar_chart::progress_bar;
use super::theme::Theme;

const BAR_WIDTH: usize = 16;
const PCT_WIDTH: usize = 7;
const SIZE_WIDTH: usize = 10;
const PRIORITY_WIDTH: usize = 8;

/// Listing of the current directory: wanted checkbox, name, priority,
/// download progress and size per row
pub struct FileListView<'a> {
    tree: &'a FilesTree,
    entries: &'a [Entry],
    selected_index: usize,
    scroll_offset: usize,
    selected_nodes: &'a HashSet<NodeId>,
    theme: &'a Theme,
}

impl<'a> FileListView<'a> {
    pub fn new(
        tree: &'a FilesTree,
        entries: &'a [Entry],
        selected_index: usize,
        scroll_offset: usize,
        selected_nodes: &'a HashSet<NodeId>,
        theme: &'a Theme,
    ) -> Self {
        Self {
            tree,
            entries,
            selected_index,
            scroll_offset,
            selected_nodes,
            theme,
        }
    }
}

fn truncate(name: &str, max: usize) -> String {
    if name.chars().count() > max {
        let kept: String = name.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", kept)
    } else {
        name.to_string()
    }
}

impl Widget for FileListView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 || area.width < 50 {
            return;
        }

        if self.entries.is_empty() {
            buf.set_string(
                area.x + 2,
                area.y,
                "No files",
                Style::default().fg(self.theme.fg_muted),
            );
            return;
        }

        let right_width = PRIORITY_WIDTH + BAR_WIDTH + PCT_WIDTH + SIZE_WIDTH + 1;
        let name_width = (area.width as usize).saturating_sub(right_width + 10);
        let right_x = area.x + area.width - right_width as u16;

        for (i, entry) in self
            .entries
            .iter()
            .skip(self.scroll_offset)
            .take(area.height as usize)
            .enumerate()
        {
            let y = area.y + i as u16;
            let is_cursor = i + self.scroll_offset == self.selected_index;
            let is_multi_selected = match entry {
                Entry::Node(id) => self.selected_nodes.contains(id),
                Entry::Parent => false,
            };
            let bg = if is_cursor {
                self.theme.selection_bg
            } else if is_multi_selected {
                self.theme.bg_highlight
            } else {
                self.theme.bg
            };

            // Three-state: cursor (selection_bg), multi-selected (bg_highlight), normal
            let row_style = if is_cursor {
                Style::default().bg(bg).fg(self.theme.selection_fg)
            } else {
                Style::default().bg(bg).fg(self.theme.fg)
            };
            let styled = |color: Color| {
                if is_cursor {
                    row_style
                } else {
                    Style::default().fg(color).bg(bg)
                }
            };

            // Clear the row
            for x in 0..area.width {
                buf.set_string(area.x + x, y, " ", row_style);
            }

            let mut x = area.x;
            if is_multi_selected {
                buf.set_string(x, y, "▪", Style::default().fg(self.theme.purple).bg(bg));
            }
            x += 2;

            let id = match entry {
                Entry::Parent => {
                    buf.set_string(x + 4, y, "..", row_style.add_modifier(Modifier::BOLD));
                    continue;
                }
                Entry::Node(id) => *id,
            };
            let Some(node) = self.tree.get(id) else {
                continue;
            };
            let summary = self.tree.rollup(id);

            // Checkbox
            buf.set_string(
                x,
                y,
                summary.wanted.checkbox(),
                styled(self.theme.wanted_color(summary.wanted)),
            );
            x += 4;

            // Icon
            buf.set_string(
                x,
                y,
                node.kind.icon(),
                styled(self.theme.icon_color(node.is_directory())),
            );
            x += 3;

            // Name
            let display_name = truncate(&node.name, name_width);
            let name_style = if node.is_directory() {
                row_style.add_modifier(Modifier::BOLD)
            } else {
                row_style
            };
            buf.set_string(x, y, &display_name, name_style);

            // Priority
            buf.set_string(
                right_x,
                y,
                summary.priority.label(),
                styled(self.theme.priority_color(summary.priority)),
            );

            // Download progress bar
            let percentage = summary.progress() * 100.0;
            let bar_color = if is_cursor {
                self.theme.selection_fg
            } else {
                self.theme.progress_color(percentage)
            };
            let bar = progress_bar(summary.progress(), BAR_WIDTH - 1);
            let bar_x = right_x + PRIORITY_WIDTH as u16;
            buf.set_string(bar_x, y, &bar, styled(bar_color));

            // Percentage
            let pct_str = format!("{:>6.1}%", percentage);
            buf.set_string(
                bar_x + BAR_WIDTH as u16,
                y,
                &pct_str,
                styled(self.theme.fg_dim),
            );

            // Size
            let size_str = format!("{:>9}", format_size(summary.size));
            buf.set_string(
                bar_x + (BAR_WIDTH + PCT_WIDTH) as u16,
                y,
                &size_str,
                styled(self.theme.fg_muted),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tortree_core::{FileRecord, Navigator, tree::build_tree};

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ünïcödé-name", 5), "ünïc…");
    }

    #[test]
    fn test_render_rows() {
        let tree = build_tree(&[
            FileRecord::new(0, ["album", "b.flac"], 100).with_completed(50),
            FileRecord::new(1, ["album", "a.flac"], 100).with_wanted(false),
        ]);
        let mut nav = Navigator::new();
        nav.enter(&tree, tree.find_by_path("album").unwrap());
        let entries = nav.entries(&tree);
        let selected = HashSet::new();
        let theme = Theme::default();

        let area = Rect::new(0, 0, 80, 4);
        let mut buf = Buffer::empty(area);
        FileListView::new(&tree, &entries, 1, 0, &selected, &theme).render(area, &mut buf);

        let row = |y: u16| -> String {
            (0..area.width)
                .map(|x| buf[(x, y)].symbol().to_string())
                .collect()
        };
        assert!(row(0).contains(".."));
        assert!(row(1).contains("[ ]"));
        assert!(row(1).contains("a.flac"));
        assert!(row(2).contains("[x]"));
        assert!(row(2).contains("50.0%"));
    }
}
