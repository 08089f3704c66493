mod job;
mod progress;

pub use job::{BuildConfig, BuildJob, BuiltTree, CancellationToken};
pub use progress::{BuildMessage, BuildProgress};
