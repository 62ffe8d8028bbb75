//! Logging infrastructure: console output through `tracing` and a per-run
//! summary of file outcomes.

mod logger;
mod subscriber;
mod types;

pub use logger::Logger;
pub use subscriber::init_subscriber;
#[cfg(test)]
pub(crate) use subscriber::testing::capture_logs;
pub use types::{FileEntry, FileStatus};
