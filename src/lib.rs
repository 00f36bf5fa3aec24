//! Generic CRUD repositories over plain Rust structs.
//!
//! One `Repository` contract, two backends:
//!
//! - [`datastore::DatastoreRepository`] stores records in a remote
//!   key-value service addressed by kind name and identifier.
//! - [`in_memory::InMemoryRepository`] keeps entities in a process-local map.
//!
//! Entities name their identifier field with `#[repository(id)]`:
//!
//! ```ignore
//! #[derive(Clone, Default, Serialize, Deserialize, Entity)]
//! struct User {
//!     #[repository(id)]
//!     pub id: i64,
//!     pub name: String,
//! }
//!
//! let mut users = InMemoryRepository::<User>::new()?;
//! let mut bob = User { name: "bob".into(), ..Default::default() };
//! users.create(&mut bob)?;
//! assert_ne!(bob.id, 0);
//! ```
//!
//! Shape-specific repositories are built by composition: hold a generic
//! repository in a field and forward to it.

extern crate self as repository_base;

mod config;
pub mod datastore;
mod entity;
mod error;
mod id_manager;
pub mod in_memory;
mod repository;

pub use config::RepositoryConfig;
pub use entity::{Entity, IdKind, IdValue, Identifier};
pub use error::RepositoryError;
pub use id_manager::IdManager;
pub use repository::Repository;

pub use repository_base_macros::Entity;
