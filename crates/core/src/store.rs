//! Knowledge store trait: the read-only source of records.

use crate::error::StoreError;
use crate::record::KnowledgeRecord;

/// Lists the current knowledge records.
///
/// A change in the returned list requires a full index rebuild.
pub trait KnowledgeStore: Send + Sync {
    fn list_records(&self) -> Result<Vec<KnowledgeRecord>, StoreError>;
}

/// A store over records already in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticStore {
    records: Vec<KnowledgeRecord>,
}

impl StaticStore {
    pub fn new(records: Vec<KnowledgeRecord>) -> Self {
        Self { records }
    }
}

impl KnowledgeStore for StaticStore {
    fn list_records(&self) -> Result<Vec<KnowledgeRecord>, StoreError> {
        Ok(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Category, Dining};

    #[test]
    fn static_store_returns_its_records() {
        let store = StaticStore::new(vec![KnowledgeRecord::Dining(Dining {
            name: "The Lair".into(),
            ..Dining::default()
        })]);
        let records = store.list_records().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].category(), Category::Dining);
    }
}
