#![warn(clippy::uninlined_format_args)]

pub mod config;
pub mod group_directory;
pub mod record_store;
pub mod snapshot;
pub mod winning_numbers;

pub use config::{AppConfig, ConfigError};
pub use group_directory::InMemoryGroupDirectory;
pub use record_store::InMemoryRecordStore;
pub use snapshot::{GroupSnapshot, LedgerSnapshot, SnapshotError};
pub use winning_numbers::{JsonWinningNumbersFeed, WinningNumbersLoadError};
