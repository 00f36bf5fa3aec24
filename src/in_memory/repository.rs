use std::collections::HashMap;

use tracing::trace;

use crate::config::RepositoryConfig;
use crate::entity::{Entity, IdValue};
use crate::error::RepositoryError;
use crate::id_manager::IdManager;
use crate::repository::Repository;

/// Repository backed by a HashMap keyed by identifier.
///
/// Identifiers come from an internal counter starting at
/// `RepositoryConfig::first_id`. Identifiers freed by `delete` are never
/// reused, and ones already taken by `create_with_id` are skipped. Nothing
/// survives the repository.
pub struct InMemoryRepository<E: Entity> {
    data: HashMap<E::Id, E>,
    next_id: i64,
    ids: IdManager<E>,
}

impl<E: Entity> InMemoryRepository<E> {
    pub fn new() -> Result<Self, RepositoryError> {
        Self::with_config(&RepositoryConfig::default())
    }

    pub fn with_config(config: &RepositoryConfig) -> Result<Self, RepositoryError> {
        let ids = match &config.kind {
            Some(kind) => IdManager::with_kind(kind.clone())?,
            None => IdManager::new()?,
        };
        Ok(Self {
            data: HashMap::new(),
            next_id: config.first_id.max(1),
            ids,
        })
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn next_identifier(&mut self) -> Result<E::Id, RepositoryError> {
        loop {
            let seq = self.next_id;
            self.next_id = seq
                .checked_add(1)
                .ok_or_else(|| RepositoryError::IdentifiersExhausted {
                    kind: self.ids.kind().to_string(),
                })?;
            let id = E::Id::from_sequence(seq);
            if !self.data.contains_key(&id) {
                return Ok(id);
            }
        }
    }

    fn store(&mut self, entity: &mut E, id: E::Id) {
        entity.set_identifier(id.clone());
        trace!(kind = %self.ids.kind(), id = ?id, "entity stored");
        self.data.insert(id, entity.clone());
    }
}

impl<E: Entity> Repository<E> for InMemoryRepository<E> {
    fn id_manager(&self) -> &IdManager<E> {
        &self.ids
    }

    fn find(&self, id: &E::Id) -> Result<E, RepositoryError> {
        self.data
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound {
                kind: self.ids.kind().to_string(),
                id: id.clone().into_identifier(),
            })
    }

    fn find_all(&self) -> Result<Vec<E>, RepositoryError> {
        Ok(self.data.values().cloned().collect())
    }

    fn create(&mut self, entity: &mut E) -> Result<(), RepositoryError> {
        let id = self.next_identifier()?;
        self.store(entity, id);
        Ok(())
    }

    /// Stamps exactly the identifier it stores under. The counter is left alone.
    fn create_with_id(&mut self, entity: &mut E, id: E::Id) -> Result<(), RepositoryError> {
        self.store(entity, id);
        Ok(())
    }

    fn update(&mut self, entity: &E) -> Result<(), RepositoryError> {
        let id = entity.identifier();
        trace!(kind = %self.ids.kind(), id = ?id, "entity updated");
        self.data.insert(id, entity.clone());
        Ok(())
    }

    fn delete(&mut self, entity: &E) -> Result<(), RepositoryError> {
        self.data.remove(&entity.identifier());
        Ok(())
    }
}
