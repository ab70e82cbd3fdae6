//! In-memory record repository.
//!
//! # Responsibility
//! - Store records keyed by `RecordId` with a per-field unique index.
//! - Serialize every mutation through one write lock so the uniqueness check
//!   and the write it guards are a single atomic step.
//!
//! # Invariants
//! - `next_id` only grows, and only on a successful create.
//! - `unique_index[field]` holds exactly the live records' values for `field`.
//! - Mutations are computed fully before anything is written.

use crate::clock::{Clock, SystemClock};
use crate::config::{normalize_page, RepoConfig};
use crate::model::record::{Entity, Record, RecordId};
use crate::repo::record_repo::{Page, RepoError, RepoResult, Repository};
use log::warn;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

struct State<T> {
    records: BTreeMap<RecordId, Record<T>>,
    unique_index: HashMap<&'static str, HashMap<String, RecordId>>,
    next_id: RecordId,
}

impl<T: Entity> State<T> {
    fn new() -> Self {
        Self {
            records: BTreeMap::new(),
            unique_index: T::UNIQUE_FIELDS
                .iter()
                .map(|field| (*field, HashMap::new()))
                .collect(),
            next_id: RecordId::FIRST,
        }
    }

    fn owner_of(&self, field: &str, value: &str) -> Option<RecordId> {
        self.unique_index
            .get(field)
            .and_then(|values| values.get(value))
            .copied()
    }

    /// Returns the first unique field of `fields` held by a record other
    /// than `exclude`.
    fn find_conflict(&self, fields: &T, exclude: Option<RecordId>) -> Option<&'static str> {
        T::UNIQUE_FIELDS.iter().copied().find(|field| {
            let Some(value) = fields.unique_value(field) else {
                return false;
            };
            match self.owner_of(field, value) {
                Some(owner) => Some(owner) != exclude,
                None => false,
            }
        })
    }

    fn index_insert(&mut self, id: RecordId, fields: &T) {
        for field in T::UNIQUE_FIELDS {
            if let Some(value) = fields.unique_value(field) {
                self.unique_index
                    .entry(*field)
                    .or_default()
                    .insert(value.to_string(), id);
            }
        }
    }

    fn index_remove(&mut self, fields: &T) {
        for field in T::UNIQUE_FIELDS {
            if let (Some(value), Some(values)) =
                (fields.unique_value(field), self.unique_index.get_mut(field))
            {
                values.remove(value);
            }
        }
    }

    /// Live records ordered by `created_at DESC, id DESC`.
    fn ordered(&self) -> Vec<&Record<T>> {
        let mut records: Vec<&Record<T>> = self.records.values().collect();
        records.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        records
    }
}

/// Thread-safe in-memory repository for one entity type.
pub struct MemoryRepository<T> {
    state: RwLock<State<T>>,
    clock: Arc<dyn Clock>,
    config: RepoConfig,
}

impl<T: Entity> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> MemoryRepository<T> {
    pub fn new() -> Self {
        Self::with_config(RepoConfig::default())
    }

    pub fn with_config(config: RepoConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: RepoConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: RwLock::new(State::new()),
            clock,
            config,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, State<T>> {
        self.state.read().unwrap_or_else(|poisoned| {
            warn!(
                "event=lock_poisoned module=repo status=recovered kind={} mode=read",
                T::KIND
            );
            PoisonError::into_inner(poisoned)
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, State<T>> {
        self.state.write().unwrap_or_else(|poisoned| {
            warn!(
                "event=lock_poisoned module=repo status=recovered kind={} mode=write",
                T::KIND
            );
            PoisonError::into_inner(poisoned)
        })
    }
}

impl<T: Entity> Repository<T> for MemoryRepository<T> {
    fn create(&self, fields: T) -> RepoResult<Record<T>> {
        fields.validate()?;

        let mut state = self.write();
        if let Some(field) = state.find_conflict(&fields, None) {
            return Err(RepoError::Conflict {
                kind: T::KIND,
                field,
            });
        }

        let id = state.next_id;
        let now = self.clock.now_ms();
        let record = Record {
            id,
            created_at: now,
            updated_at: now,
            fields,
        };

        state.next_id = id.next();
        state.index_insert(id, &record.fields);
        state.records.insert(id, record.clone());
        Ok(record)
    }

    fn get_by_id(&self, id: RecordId) -> RepoResult<Record<T>> {
        self.read()
            .records
            .get(&id)
            .cloned()
            .ok_or_else(|| RepoError::not_found_id(T::KIND, id))
    }

    fn get_by_unique_field(&self, field: &str, value: &str) -> RepoResult<Record<T>> {
        let Some(field) = T::unique_field(field) else {
            return Err(RepoError::InvalidField {
                field: field.to_string(),
                reason: format!("not a unique field of {}", T::KIND),
            });
        };

        let state = self.read();
        state
            .owner_of(field, value)
            .and_then(|id| state.records.get(&id))
            .cloned()
            .ok_or_else(|| RepoError::not_found_field(T::KIND, field, value))
    }

    fn list(&self, page: i64, page_size: i64) -> RepoResult<Page<T>> {
        let page = normalize_page(page);
        let page_size = self.config.normalize_page_size(page_size);
        let skip = (page as usize - 1).saturating_mul(page_size as usize);

        let state = self.read();
        let items = state
            .ordered()
            .into_iter()
            .skip(skip)
            .take(page_size as usize)
            .cloned()
            .collect();

        Ok(Page {
            items,
            total: state.records.len(),
            page,
            page_size,
        })
    }

    fn list_all(&self) -> RepoResult<Vec<Record<T>>> {
        Ok(self.read().ordered().into_iter().cloned().collect())
    }

    fn update(&self, id: RecordId, patch: &T::Patch) -> RepoResult<Record<T>> {
        let mut state = self.write();
        let Some(current) = state.records.get(&id) else {
            return Err(RepoError::not_found_id(T::KIND, id));
        };

        let mut candidate = current.fields.clone();
        candidate.apply_patch(patch);
        candidate.validate()?;
        if let Some(field) = state.find_conflict(&candidate, Some(id)) {
            return Err(RepoError::Conflict {
                kind: T::KIND,
                field,
            });
        }

        let updated = Record {
            id,
            created_at: current.created_at,
            updated_at: self.clock.now_ms().max(current.updated_at),
            fields: candidate,
        };
        let previous = current.fields.clone();

        state.index_remove(&previous);
        state.index_insert(id, &updated.fields);
        state.records.insert(id, updated.clone());
        Ok(updated)
    }

    fn delete(&self, id: RecordId) -> RepoResult<()> {
        let mut state = self.write();
        let removed = state
            .records
            .remove(&id)
            .ok_or_else(|| RepoError::not_found_id(T::KIND, id))?;
        state.index_remove(&removed.fields);
        Ok(())
    }

    fn len(&self) -> usize {
        self.read().records.len()
    }
}
