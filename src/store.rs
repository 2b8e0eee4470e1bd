//! In-memory record store.
//!
//! Single source of truth for one record kind. Records are kept in creation
//! order; an index maps IDs to positions. Mutable access is crate-private so
//! every change goes through a workflow.

use std::collections::HashMap;

use crate::model::{EventRequest, RecordId, TaskDistribution};

/// Anything a [`RecordStore`] can hold.
pub trait Record: Clone {
    /// Label used in logs and metrics ("event_request", ...).
    const KIND: &'static str;

    fn id(&self) -> RecordId;
}

impl Record for EventRequest {
    const KIND: &'static str = "event_request";

    fn id(&self) -> RecordId {
        self.id
    }
}

impl Record for TaskDistribution {
    const KIND: &'static str = "task_distribution";

    fn id(&self) -> RecordId {
        self.id
    }
}

/// Keyed collection of records of one kind.
#[derive(Debug, Clone)]
pub struct RecordStore<T> {
    records: Vec<T>,
    index: HashMap<RecordId, usize>,
}

impl<T> Default for RecordStore<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T: Record> RecordStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a fresh ID, build the record with it, append, and return a copy.
    pub fn insert(&mut self, build: impl FnOnce(RecordId) -> T) -> T {
        let mut id = RecordId::new();
        while self.index.contains_key(&id) {
            id = RecordId::new();
        }

        let record = build(id);
        debug_assert_eq!(record.id(), id, "record must keep its assigned id");

        self.index.insert(id, self.records.len());
        self.records.push(record.clone());
        record
    }

    /// Get a record by ID. `None` for unknown IDs.
    pub fn get(&self, id: RecordId) -> Option<&T> {
        self.index.get(&id).map(|&pos| &self.records[pos])
    }

    pub(crate) fn get_mut(&mut self, id: RecordId) -> Option<&mut T> {
        self.index.get(&id).map(|&pos| &mut self.records[pos])
    }

    /// All records, in creation order.
    pub fn list_all(&self) -> &[T] {
        &self.records
    }

    /// Records matching a predicate, in creation order.
    pub fn filter(&self, mut pred: impl FnMut(&T) -> bool) -> Vec<T> {
        self.records.iter().filter(|r| pred(r)).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drop every record. Reset facility for tests and replays.
    pub fn clear(&mut self) {
        self.records.clear();
        self.index.clear();
    }
}
