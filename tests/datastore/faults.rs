//! KeyValueService wrappers that misbehave in controlled ways.

use std::sync::atomic::{AtomicUsize, Ordering};

use repository_base::datastore::{
    Context, Key, KeyValueService, MemoryKeyValueService, Query, Record, RecordIter, ServiceError,
};
use repository_base::Identifier;

/// Files every written record under another kind.
pub struct WrongKind {
    pub inner: MemoryKeyValueService,
    pub kind: &'static str,
}

impl KeyValueService for WrongKind {
    fn get(&self, ctx: &Context, key: &Key) -> Result<Option<Record>, ServiceError> {
        self.inner.get(ctx, key)
    }

    fn put(&self, ctx: &Context, key: &Key, record: Record) -> Result<Key, ServiceError> {
        let key = match key.identifier() {
            Some(id) => Key::new(self.kind, id.clone()),
            None => Key::incomplete(self.kind),
        };
        self.inner.put(ctx, &key, record)
    }

    fn delete(&self, ctx: &Context, key: &Key) -> Result<(), ServiceError> {
        self.inner.delete(ctx, key)
    }

    fn query<'a>(&'a self, ctx: &Context, query: &Query) -> Result<RecordIter<'a>, ServiceError> {
        self.inner.query(ctx, query)
    }
}

/// Assigns string identifiers to incomplete keys.
pub struct NameAllocator {
    pub inner: MemoryKeyValueService,
}

impl KeyValueService for NameAllocator {
    fn get(&self, ctx: &Context, key: &Key) -> Result<Option<Record>, ServiceError> {
        self.inner.get(ctx, key)
    }

    fn put(&self, ctx: &Context, key: &Key, record: Record) -> Result<Key, ServiceError> {
        if key.is_complete() {
            return self.inner.put(ctx, key, record);
        }
        let key = Key::new(key.kind(), Identifier::Name("generated".into()));
        self.inner.put(ctx, &key, record)
    }

    fn delete(&self, ctx: &Context, key: &Key) -> Result<(), ServiceError> {
        self.inner.delete(ctx, key)
    }

    fn query<'a>(&'a self, ctx: &Context, query: &Query) -> Result<RecordIter<'a>, ServiceError> {
        self.inner.query(ctx, query)
    }
}

/// Query iteration fails after `after` results; other calls fail while `down` is set.
pub struct Flaky {
    pub inner: MemoryKeyValueService,
    pub after: usize,
    pub down: bool,
    pub calls: AtomicUsize,
}

impl Flaky {
    pub fn new(inner: MemoryKeyValueService, after: usize) -> Self {
        Self {
            inner,
            after,
            down: false,
            calls: AtomicUsize::new(0),
        }
    }

    fn guard(&self) -> Result<(), ServiceError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if self.down {
            return Err(ServiceError::Unavailable("connection refused".into()));
        }
        Ok(())
    }
}

impl KeyValueService for Flaky {
    fn get(&self, ctx: &Context, key: &Key) -> Result<Option<Record>, ServiceError> {
        self.guard()?;
        self.inner.get(ctx, key)
    }

    fn put(&self, ctx: &Context, key: &Key, record: Record) -> Result<Key, ServiceError> {
        self.guard()?;
        self.inner.put(ctx, key, record)
    }

    fn delete(&self, ctx: &Context, key: &Key) -> Result<(), ServiceError> {
        self.guard()?;
        self.inner.delete(ctx, key)
    }

    fn query<'a>(&'a self, ctx: &Context, query: &Query) -> Result<RecordIter<'a>, ServiceError> {
        self.guard()?;
        let after = self.after;
        let iter = self
            .inner
            .query(ctx, query)?
            .enumerate()
            .map(move |(i, item)| {
                if i < after {
                    item
                } else {
                    Err(ServiceError::Unavailable("stream reset".into()))
                }
            });
        Ok(Box::new(iter))
    }
}
