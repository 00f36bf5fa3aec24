//! Durable backend - repositories over a remote key-value service.
//!
//! A `DatastoreRepository` addresses records by `Key` (kind name plus an
//! integer or string identifier) and talks to anything implementing
//! `KeyValueService`. `MemoryKeyValueService` is a process-local
//! implementation for tests and development.
//!
//! ## Example
//!
//! ```ignore
//! use repository_base::datastore::{Context, DatastoreRepository, MemoryKeyValueService};
//! use repository_base::Repository;
//!
//! let mut users = DatastoreRepository::<User, _>::new(
//!     Context::background(),
//!     MemoryKeyValueService::new(),
//! )?;
//! let mut bob = User { name: "bob".into(), ..Default::default() };
//! users.create(&mut bob)?;
//! let loaded = users.find(&bob.id)?;
//! ```

mod key;
mod memory;
mod query;
mod repository;
mod service;

pub use key::Key;
pub use memory::MemoryKeyValueService;
pub use query::{Direction, Filter, FilterOp, Order, Query};
pub use repository::DatastoreRepository;
pub use service::{Context, KeyValueService, Record, RecordIter, ServiceError};
