//! In-memory touchpoint catalog
//!
//! Copy-on-write: readers take an `Arc` snapshot and classify it without
//! holding the lock, so writers never race with an in-flight assessment.

use crate::domain::error::{AssessmentError, Result};
use crate::domain::touchpoint::Touchpoint;
use crate::domain::types::TouchpointId;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Default)]
struct Catalog {
    records: Vec<Touchpoint>,
    index: FxHashMap<TouchpointId, usize>,
}

impl Catalog {
    fn reindex(&mut self) {
        self.index = self.records.iter().enumerate().map(|(i, tp)| (tp.id.clone(), i)).collect();
    }
}

/// Immutable view of the catalog at one point in time
#[derive(Debug, Clone)]
pub struct Snapshot(Arc<Catalog>);

impl Snapshot {
    pub fn touchpoints(&self) -> &[Touchpoint] {
        &self.0.records
    }

    pub fn get(&self, id: &TouchpointId) -> Option<&Touchpoint> {
        self.0.index.get(id).map(|&i| &self.0.records[i])
    }

    pub fn len(&self) -> usize {
        self.0.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.records.is_empty()
    }
}

/// Thread-safe touchpoint record store
#[derive(Debug, Default)]
pub struct TouchpointStore {
    inner: RwLock<Arc<Catalog>>,
}

impl TouchpointStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a catalog; the first duplicate id is rejected
    pub fn from_touchpoints(touchpoints: Vec<Touchpoint>) -> Result<Self> {
        let store = Self::new();
        for tp in touchpoints {
            store.insert(tp)?;
        }
        Ok(store)
    }

    /// Insert a validated touchpoint; fails on invalid scores or duplicate id
    pub fn insert(&self, touchpoint: Touchpoint) -> Result<()> {
        touchpoint.validate()?;
        let mut guard = self.inner.write();
        if guard.index.contains_key(&touchpoint.id) {
            return Err(AssessmentError::DuplicateId(touchpoint.id));
        }
        let catalog = Arc::make_mut(&mut *guard);
        catalog.index.insert(touchpoint.id.clone(), catalog.records.len());
        debug!(id = %touchpoint.id, stage = %touchpoint.stage, "touchpoint_inserted");
        catalog.records.push(touchpoint);
        Ok(())
    }

    /// Insert or replace by id. Returns the previous record if one existed.
    pub fn upsert(&self, touchpoint: Touchpoint) -> Result<Option<Touchpoint>> {
        touchpoint.validate()?;
        let mut guard = self.inner.write();
        let catalog = Arc::make_mut(&mut *guard);
        match catalog.index.get(&touchpoint.id).copied() {
            Some(i) => Ok(Some(std::mem::replace(&mut catalog.records[i], touchpoint))),
            None => {
                catalog.index.insert(touchpoint.id.clone(), catalog.records.len());
                catalog.records.push(touchpoint);
                Ok(None)
            }
        }
    }

    pub fn remove(&self, id: &TouchpointId) -> Option<Touchpoint> {
        let mut guard = self.inner.write();
        let i = *guard.index.get(id)?;
        let catalog = Arc::make_mut(&mut *guard);
        let removed = catalog.records.remove(i);
        catalog.reindex();
        debug!(id = %id, "touchpoint_removed");
        Some(removed)
    }

    pub fn get(&self, id: &TouchpointId) -> Option<Touchpoint> {
        let guard = self.inner.read();
        guard.index.get(id).map(|&i| guard.records[i].clone())
    }

    pub fn len(&self) -> usize {
        self.inner.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cheap immutable view for a classification run
    pub fn snapshot(&self) -> Snapshot {
        Snapshot(Arc::clone(&self.inner.read()))
    }
}
