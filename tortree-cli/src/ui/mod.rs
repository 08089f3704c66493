pub mod bar_chart;
mod file_list;
mod footer;
mod header;
mod help;
mod layout;
mod progress;
mod theme;

pub use file_list::FileListView;
pub use footer::Footer;
pub use header::Header;
pub use help::HelpView;
pub use layout::AppLayout;
pub use progress::ProgressView;
pub use theme::Theme;
