mod action;
mod requests;
mod state;

pub use action::Action;
pub use requests::{FileRequest, RequestLog};
pub use state::{AppMode, AppState};
