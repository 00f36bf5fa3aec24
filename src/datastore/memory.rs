//! MemoryKeyValueService - process-local stand-in for the remote key-value service.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, RwLock};

use tracing::trace;

use super::{Context, Key, KeyValueService, Query, Record, RecordIter, ServiceError};

type Storage = BTreeMap<(String, Key), Record>;

/// Key-value service backed by a BTreeMap.
///
/// Records are partitioned by the context's namespace. Clone-friendly via
/// Arc: clones share storage and the id allocator.
#[derive(Clone)]
pub struct MemoryKeyValueService {
    storage: Arc<RwLock<Storage>>,
    next_id: Arc<AtomicI64>,
}

impl Default for MemoryKeyValueService {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryKeyValueService {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(BTreeMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }

    /// Number of records stored across all namespaces and kinds.
    pub fn len(&self) -> usize {
        self.storage.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn storage_key(ctx: &Context, key: &Key) -> (String, Key) {
        (ctx.namespace().unwrap_or_default().to_string(), key.clone())
    }

    fn require_complete(key: &Key) -> Result<(), ServiceError> {
        if key.kind().is_empty() {
            return Err(ServiceError::InvalidKey("empty kind".into()));
        }
        if !key.is_complete() {
            return Err(ServiceError::InvalidKey(format!("incomplete key {}", key)));
        }
        Ok(())
    }
}

fn poisoned() -> ServiceError {
    ServiceError::Unavailable("lock poisoned".into())
}

impl KeyValueService for MemoryKeyValueService {
    fn get(&self, ctx: &Context, key: &Key) -> Result<Option<Record>, ServiceError> {
        ctx.check()?;
        Self::require_complete(key)?;
        let storage = self.storage.read().map_err(|_| poisoned())?;
        Ok(storage.get(&Self::storage_key(ctx, key)).cloned())
    }

    fn put(&self, ctx: &Context, key: &Key, record: Record) -> Result<Key, ServiceError> {
        ctx.check()?;
        if key.kind().is_empty() {
            return Err(ServiceError::InvalidKey("empty kind".into()));
        }

        let mut storage = self.storage.write().map_err(|_| poisoned())?;

        // Allocated ids skip keys already written with explicit ids.
        let key = if key.is_complete() {
            key.clone()
        } else {
            loop {
                let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                let candidate = Key::new(key.kind(), id);
                if !storage.contains_key(&Self::storage_key(ctx, &candidate)) {
                    break candidate;
                }
            }
        };

        storage.insert(Self::storage_key(ctx, &key), record);
        trace!(key = %key, "record stored");
        Ok(key)
    }

    fn delete(&self, ctx: &Context, key: &Key) -> Result<(), ServiceError> {
        ctx.check()?;
        Self::require_complete(key)?;
        let mut storage = self.storage.write().map_err(|_| poisoned())?;
        if storage.remove(&Self::storage_key(ctx, key)).is_some() {
            trace!(key = %key, "record removed");
        }
        Ok(())
    }

    fn query<'a>(&'a self, ctx: &Context, query: &Query) -> Result<RecordIter<'a>, ServiceError> {
        ctx.check()?;
        let namespace = ctx.namespace().unwrap_or_default();

        let mut results: Vec<(Key, Record)> = {
            let storage = self.storage.read().map_err(|_| poisoned())?;
            storage
                .iter()
                .filter(|((ns, key), _)| {
                    ns == namespace && query.kind.as_deref().map_or(true, |k| key.kind() == k)
                })
                .filter(|(_, record)| query.matches(record))
                .map(|((_, key), record)| (key.clone(), record.clone()))
                .collect()
        };

        // Stable sort keeps key order among equal records.
        results.sort_by(|(_, a), (_, b)| query.compare(a, b));

        let limit = query.limit.unwrap_or(usize::MAX);
        let ctx = ctx.clone();
        let iter = results
            .into_iter()
            .skip(query.offset)
            .take(limit)
            .map(move |item| ctx.check().map(|()| item));

        Ok(Box::new(iter))
    }
}
