//! KeyValueService - the remote key-value store a DatastoreRepository talks to.

use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;

use super::{Key, Query};

/// Serialized field values of one stored entity.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Query results, one record at a time. Iteration ends at `None`.
pub type RecordIter<'a> = Box<dyn Iterator<Item = Result<(Key, Record), ServiceError>> + 'a>;

/// Errors reported by the key-value service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("deadline exceeded")]
    DeadlineExceeded,
    #[error("invalid key: {0}")]
    InvalidKey(String),
    #[error("service unavailable: {0}")]
    Unavailable(String),
    #[error("{0}")]
    Other(String),
}

/// Request-scoped settings passed along with every service call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    namespace: Option<String>,
    deadline: Option<Instant>,
}

impl Context {
    /// A context with no namespace and no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Fails with `DeadlineExceeded` once the deadline has passed.
    pub fn check(&self) -> Result<(), ServiceError> {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(ServiceError::DeadlineExceeded),
            _ => Ok(()),
        }
    }
}

/// The operations a durable backend must offer.
///
/// Every call is a blocking round trip bound to `ctx`. Implementations own
/// their connection handling; callers get errors back unchanged.
pub trait KeyValueService {
    /// Fetch the record at a complete key, `None` if nothing is stored there.
    fn get(&self, ctx: &Context, key: &Key) -> Result<Option<Record>, ServiceError>;

    /// Store a record, returning the finalized key. An incomplete key gets
    /// a service-assigned integer identifier.
    fn put(&self, ctx: &Context, key: &Key, record: Record) -> Result<Key, ServiceError>;

    /// Remove the record at a complete key. Removing an absent record succeeds.
    fn delete(&self, ctx: &Context, key: &Key) -> Result<(), ServiceError>;

    fn query<'a>(&'a self, ctx: &Context, query: &Query) -> Result<RecordIter<'a>, ServiceError>;
}

impl<S: KeyValueService + ?Sized> KeyValueService for &S {
    fn get(&self, ctx: &Context, key: &Key) -> Result<Option<Record>, ServiceError> {
        (**self).get(ctx, key)
    }

    fn put(&self, ctx: &Context, key: &Key, record: Record) -> Result<Key, ServiceError> {
        (**self).put(ctx, key, record)
    }

    fn delete(&self, ctx: &Context, key: &Key) -> Result<(), ServiceError> {
        (**self).delete(ctx, key)
    }

    fn query<'a>(&'a self, ctx: &Context, query: &Query) -> Result<RecordIter<'a>, ServiceError> {
        (**self).query(ctx, query)
    }
}

impl<S: KeyValueService + ?Sized> KeyValueService for Arc<S> {
    fn get(&self, ctx: &Context, key: &Key) -> Result<Option<Record>, ServiceError> {
        (**self).get(ctx, key)
    }

    fn put(&self, ctx: &Context, key: &Key, record: Record) -> Result<Key, ServiceError> {
        (**self).put(ctx, key, record)
    }

    fn delete(&self, ctx: &Context, key: &Key) -> Result<(), ServiceError> {
        (**self).delete(ctx, key)
    }

    fn query<'a>(&'a self, ctx: &Context, query: &Query) -> Result<RecordIter<'a>, ServiceError> {
        (**self).query(ctx, query)
    }
}
