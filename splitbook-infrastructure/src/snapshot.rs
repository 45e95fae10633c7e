//! JSON ledger snapshots: every group with its members and records, plus
//! everyone's personal entries.

use serde::{Deserialize, Serialize};
use splitbook_application::{GroupDirectory, RecordStore, StoreError};
use splitbook_domain::{GroupId, PersonId, PersonalEntry, Record, RecordValidationError, Scope};
use std::{fs, path::Path};

use crate::{group_directory::InMemoryGroupDirectory, record_store::InMemoryRecordStore};

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("record {position} of {scope} is invalid: {source}")]
    InvalidRecord {
        scope: Scope,
        position: usize,
        #[source]
        source: RecordValidationError,
    },
    #[error("group '{0}' appears more than once")]
    DuplicateGroup(GroupId),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSnapshot {
    pub id: GroupId,
    #[serde(default)]
    pub members: Vec<PersonId>,
    #[serde(default)]
    pub records: Vec<Record>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    #[serde(default)]
    pub groups: Vec<GroupSnapshot>,
    #[serde(default)]
    pub personal: Vec<PersonalEntry>,
}

impl LedgerSnapshot {
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validates every record and loads them into fresh in-memory adapters.
    pub fn into_stores(
        self,
    ) -> Result<(InMemoryRecordStore, InMemoryGroupDirectory), SnapshotError> {
        let store = InMemoryRecordStore::new();
        let directory = InMemoryGroupDirectory::new();

        for group in self.groups {
            if !group.members.is_empty() && !directory.create_group(&group.id, &group.members)? {
                return Err(SnapshotError::DuplicateGroup(group.id));
            }
            let scope = Scope::Group(group.id);
            for (idx, record) in group.records.into_iter().enumerate() {
                load_record(&store, &scope, idx + 1, record)?;
            }
        }

        for (idx, entry) in self.personal.into_iter().enumerate() {
            let scope = Scope::Personal(entry.owner.clone());
            load_record(&store, &scope, idx + 1, Record::Personal(entry))?;
        }

        tracing::info!(scopes = store.scopes().len(), "Ledger snapshot loaded");
        Ok((store, directory))
    }

    /// Captures the current contents of the adapters.
    pub fn capture(
        store: &InMemoryRecordStore,
        directory: &InMemoryGroupDirectory,
    ) -> Result<Self, SnapshotError> {
        let groups = directory
            .groups()
            .into_iter()
            .map(|(id, members)| GroupSnapshot {
                id,
                members,
                records: Vec::new(),
            })
            .collect();
        capture_scopes(store, store.scopes(), groups)
    }
}

fn capture_scopes(
    store: &dyn RecordStore,
    mut scopes: Vec<Scope>,
    mut groups: Vec<GroupSnapshot>,
) -> Result<LedgerSnapshot, SnapshotError> {
    let mut personal = Vec::new();

    scopes.sort_by_key(|scope| scope.to_string());
    for scope in scopes {
        let records = store.records(&scope)?;
        match scope {
            Scope::Group(id) => match groups.iter_mut().find(|group| group.id == id) {
                Some(group) => group.records = records,
                None => groups.push(GroupSnapshot {
                    id,
                    members: Vec::new(),
                    records,
                }),
            },
            Scope::Personal(_) => {
                personal.extend(records.into_iter().filter_map(|record| match record {
                    Record::Personal(entry) => Some(entry),
                    _ => None,
                }));
            }
        }
    }

    Ok(LedgerSnapshot { groups, personal })
}

fn load_record(
    store: &InMemoryRecordStore,
    scope: &Scope,
    position: usize,
    record: Record,
) -> Result<(), SnapshotError> {
    record
        .validate()
        .map_err(|source| SnapshotError::InvalidRecord {
            scope: scope.clone(),
            position,
            source,
        })?;
    store.append(scope, record)?;
    Ok(())
}
