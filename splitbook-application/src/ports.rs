use std::collections::HashMap;

use splitbook_domain::{GroupId, InvoicePeriod, PersonId, Record, Scope, WinningNumbers};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("record store is unavailable: {0}")]
    Unavailable(String),
    #[error("record store rejected the write: {0}")]
    Rejected(String),
    #[error("stored record is corrupt: {0}")]
    Corrupt(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeedError {
    #[error("winning numbers feed is unavailable: {0}")]
    Unavailable(String),
    #[error("winning numbers feed returned malformed data: {0}")]
    Malformed(String),
}

/// Persistence for raw records. Indexes are 0-based positions in the list
/// returned by `records` for the same scope.
pub trait RecordStore: Send + Sync {
    fn records(&self, scope: &Scope) -> Result<Vec<Record>, StoreError>;

    fn append(&self, scope: &Scope, record: Record) -> Result<(), StoreError>;

    /// `Ok(false)` when nothing is stored at `index`.
    fn delete(&self, scope: &Scope, index: usize) -> Result<bool, StoreError>;

    /// Removes every record in `scope` and returns how many there were.
    fn reset(&self, scope: &Scope) -> Result<usize, StoreError>;
}

pub trait WinningNumbersFeed: Send + Sync {
    /// `Ok(None)` when the draw for `period` has not been published.
    fn winning_numbers(&self, period: InvoicePeriod)
    -> Result<Option<WinningNumbers>, FeedError>;
}

impl WinningNumbersFeed for HashMap<InvoicePeriod, WinningNumbers> {
    fn winning_numbers(
        &self,
        period: InvoicePeriod,
    ) -> Result<Option<WinningNumbers>, FeedError> {
        Ok(self.get(&period).cloned())
    }
}

pub trait GroupDirectory: Send + Sync {
    /// `Ok(false)` when a group with that name already exists.
    fn create_group(&self, group: &GroupId, members: &[PersonId]) -> Result<bool, StoreError>;

    fn members(&self, group: &GroupId) -> Result<Option<Vec<PersonId>>, StoreError>;
}
