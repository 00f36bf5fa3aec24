//! In-memory backend - entities held in a process-local map.

mod repository;

pub use repository::InMemoryRepository;
