use dashmap::{DashMap, mapref::entry::Entry};
use splitbook_application::{GroupDirectory, StoreError};
use splitbook_domain::{GroupId, PersonId};
use std::sync::Arc;

#[derive(Clone, Debug, Default)]
pub struct InMemoryGroupDirectory {
    groups: Arc<DashMap<GroupId, Vec<PersonId>>>,
}

impl InMemoryGroupDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn groups(&self) -> Vec<(GroupId, Vec<PersonId>)> {
        let mut groups: Vec<(GroupId, Vec<PersonId>)> = self
            .groups
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        groups.sort_by(|(a, _), (b, _)| a.cmp(b));
        groups
    }
}

impl GroupDirectory for InMemoryGroupDirectory {
    fn create_group(&self, group: &GroupId, members: &[PersonId]) -> Result<bool, StoreError> {
        match self.groups.entry(group.clone()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(members.to_vec());
                Ok(true)
            }
        }
    }

    fn members(&self, group: &GroupId) -> Result<Option<Vec<PersonId>>, StoreError> {
        Ok(self.groups.get(group).map(|members| members.clone()))
    }
}
