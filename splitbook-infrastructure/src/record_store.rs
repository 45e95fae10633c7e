use dashmap::DashMap;
use splitbook_application::{RecordStore, StoreError};
use splitbook_domain::{Record, Scope};
use std::sync::Arc;

/// Records kept per scope in insertion order.
///
/// Scopes that were reset stay present with an empty list, so "reset" and
/// "never written" read the same.
#[derive(Clone, Debug, Default)]
pub struct InMemoryRecordStore {
    inner: Arc<DashMap<Scope, Vec<Record>>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scopes(&self) -> Vec<Scope> {
        self.inner.iter().map(|entry| entry.key().clone()).collect()
    }

    pub fn len(&self, scope: &Scope) -> usize {
        self.inner.get(scope).map_or(0, |records| records.len())
    }

    pub fn is_empty(&self, scope: &Scope) -> bool {
        self.len(scope) == 0
    }
}

impl RecordStore for InMemoryRecordStore {
    fn records(&self, scope: &Scope) -> Result<Vec<Record>, StoreError> {
        Ok(self
            .inner
            .get(scope)
            .map(|records| records.clone())
            .unwrap_or_default())
    }

    fn append(&self, scope: &Scope, record: Record) -> Result<(), StoreError> {
        if !record.belongs_to(scope) {
            return Err(StoreError::Rejected(format!(
                "record does not belong to {scope}"
            )));
        }
        self.inner.entry(scope.clone()).or_default().push(record);
        Ok(())
    }

    fn delete(&self, scope: &Scope, index: usize) -> Result<bool, StoreError> {
        let Some(mut records) = self.inner.get_mut(scope) else {
            return Ok(false);
        };
        if index >= records.len() {
            return Ok(false);
        }
        records.remove(index);
        Ok(true)
    }

    fn reset(&self, scope: &Scope) -> Result<usize, StoreError> {
        Ok(self
            .inner
            .get_mut(scope)
            .map_or(0, |mut records| std::mem::take(&mut *records).len()))
    }
}
