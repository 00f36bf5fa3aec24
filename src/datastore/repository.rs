use serde_json::Value;
use tracing::debug;

use super::{Context, Key, KeyValueService, Query, Record, ServiceError};
use crate::config::RepositoryConfig;
use crate::entity::{Entity, IdKind, IdValue, Identifier};
use crate::error::RepositoryError;
use crate::id_manager::IdManager;
use crate::repository::Repository;

// Fresh identifiers tried by `create` before giving up on name collisions.
const MAX_CREATE_ATTEMPTS: usize = 16;

/// Repository for one entity shape, stored in a key-value service.
///
/// Every call is one or more blocking round trips to `service`, bound to the
/// repository's `Context`. Service errors come back unchanged; nothing is
/// retried here.
pub struct DatastoreRepository<E, S> {
    ctx: Context,
    service: S,
    ids: IdManager<E>,
}

impl<E: Entity, S: KeyValueService> DatastoreRepository<E, S> {
    pub fn new(ctx: Context, service: S) -> Result<Self, RepositoryError> {
        Self::with_config(ctx, service, &RepositoryConfig::default())
    }

    pub fn with_config(
        ctx: Context,
        service: S,
        config: &RepositoryConfig,
    ) -> Result<Self, RepositoryError> {
        let ids = match &config.kind {
            Some(kind) => IdManager::with_kind(kind.clone())?,
            None => IdManager::new()?,
        };
        Ok(Self { ctx, service, ids })
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Replace the request context used for subsequent calls.
    pub fn set_context(&mut self, ctx: Context) {
        self.ctx = ctx;
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn new_key(&self, id: E::Id) -> Key {
        Key::new(self.ids.kind(), id.into_identifier())
    }

    /// Run a query restricted to this repository's kind.
    ///
    /// Reading stops at the first failed or undecodable result; what was read
    /// until then is returned.
    pub fn find_by_query(&self, query: Query) -> Result<Vec<E>, RepositoryError> {
        let mut list = Vec::new();
        self.find_by_query_into(query, &mut list)?;
        Ok(list)
    }

    /// Like `find_by_query`, appending into `list`. Returns the number appended.
    pub fn find_by_query_into(
        &self,
        query: Query,
        list: &mut Vec<E>,
    ) -> Result<usize, RepositoryError> {
        let query = query.with_kind(self.ids.kind());
        let before = list.len();

        for item in self.service.query(&self.ctx, &query)? {
            let Ok((key, record)) = item else {
                break;
            };
            match self.decode(&key, record) {
                Ok(entity) => list.push(entity),
                Err(_) => break,
            }
        }

        let found = list.len() - before;
        debug!(kind = %self.ids.kind(), found, "query finished");
        Ok(found)
    }

    fn entity_key(&self, entity: &E) -> Result<Key, RepositoryError> {
        Ok(self.new_key(self.ids.require_identifier(entity)?))
    }

    fn check_kind(&self, key: &Key) -> Result<(), RepositoryError> {
        if key.kind() != self.ids.kind() {
            return Err(RepositoryError::ShapeMismatch {
                expected: self.ids.kind().to_string(),
                actual: key.kind().to_string(),
            });
        }
        Ok(())
    }

    fn encode(&self, entity: &E) -> Result<Record, RepositoryError> {
        match serde_json::to_value(entity)? {
            Value::Object(record) => Ok(record),
            _ => Err(RepositoryError::InvalidEntityShape {
                kind: self.ids.kind().to_string(),
                reason: "entity did not serialize to a record".into(),
            }),
        }
    }

    // Stored members are laid over a zero-valued entity, so members missing
    // from the record keep their zero values. The key's identifier wins.
    fn decode(&self, key: &Key, record: Record) -> Result<E, RepositoryError> {
        self.check_kind(key)?;

        let mut base = self.encode(&E::default())?;
        base.extend(record);
        let mut entity: E = serde_json::from_value(Value::Object(base))?;

        if let Some(id) = key.identifier() {
            self.ids.set_identifier(&mut entity, id.clone())?;
        }
        Ok(entity)
    }

    fn put(&self, key: &Key, entity: &E) -> Result<Key, RepositoryError> {
        let record = self.encode(entity)?;
        let stored = self.service.put(&self.ctx, key, record)?;
        self.check_kind(&stored)?;
        Ok(stored)
    }

    // Ok(false) when the allocated identifier names a record that already
    // exists, which only happens for string-keyed repositories.
    fn finish_create(&self, entity: &mut E, interim: &Key) -> Result<bool, RepositoryError> {
        self.check_kind(interim)?;
        let id = self.allocated_id(interim)?;
        let key = self.new_key(id.clone());

        if key != *interim {
            if self.service.get(&self.ctx, &key)?.is_some() {
                return Ok(false);
            }
            self.service.delete(&self.ctx, interim)?;
        }

        entity.set_identifier(id);
        self.put(&key, entity)?;
        debug!(key = %key, "entity created");
        Ok(true)
    }

    fn allocated_id(&self, key: &Key) -> Result<E::Id, RepositoryError> {
        match key.identifier() {
            Some(id) if !id.is_unset() => match (E::Id::KIND, id) {
                (IdKind::Name, Identifier::Int(seq)) => Ok(E::Id::from_sequence(*seq)),
                _ => self.ids.convert(id.clone()),
            },
            _ => Err(ServiceError::InvalidKey(format!("service returned incomplete key {}", key)).into()),
        }
    }
}

impl<E: Entity, S: KeyValueService> Repository<E> for DatastoreRepository<E, S> {
    fn id_manager(&self) -> &IdManager<E> {
        &self.ids
    }

    fn find(&self, id: &E::Id) -> Result<E, RepositoryError> {
        let key = self.new_key(id.clone());
        match self.service.get(&self.ctx, &key)? {
            Some(record) => self.decode(&key, record),
            None => Err(RepositoryError::NotFound {
                kind: self.ids.kind().to_string(),
                id: id.clone().into_identifier(),
            }),
        }
    }

    fn find_all(&self) -> Result<Vec<E>, RepositoryError> {
        self.find_by_query(Query::new())
    }

    /// Two round trips: an insert under an incomplete key to obtain an
    /// identifier, then a re-put under the finalized key so the stored
    /// record carries the stamped identifier. When any step after the
    /// insert fails, the interim record is deleted before returning.
    fn create(&mut self, entity: &mut E) -> Result<(), RepositoryError> {
        for _ in 0..MAX_CREATE_ATTEMPTS {
            let record = self.encode(entity)?;
            let interim = self
                .service
                .put(&self.ctx, &Key::incomplete(self.ids.kind()), record)?;

            match self.finish_create(entity, &interim) {
                Ok(true) => return Ok(()),
                Ok(false) => self.service.delete(&self.ctx, &interim)?,
                Err(err) => {
                    let _ = self.service.delete(&self.ctx, &interim);
                    return Err(err);
                }
            }
        }
        Err(RepositoryError::IdentifiersExhausted {
            kind: self.ids.kind().to_string(),
        })
    }

    fn create_with_id(&mut self, entity: &mut E, id: E::Id) -> Result<(), RepositoryError> {
        if id.is_unset() {
            return Err(RepositoryError::UnsetIdentifier {
                kind: self.ids.kind().to_string(),
            });
        }
        entity.set_identifier(id.clone());
        let key = self.put(&self.new_key(id), entity)?;
        debug!(key = %key, "entity created");
        Ok(())
    }

    fn update(&mut self, entity: &E) -> Result<(), RepositoryError> {
        let key = self.entity_key(entity)?;
        self.put(&key, entity)?;
        debug!(key = %key, "entity updated");
        Ok(())
    }

    fn delete(&mut self, entity: &E) -> Result<(), RepositoryError> {
        let key = self.entity_key(entity)?;
        self.service.delete(&self.ctx, &key)?;
        debug!(key = %key, "entity deleted");
        Ok(())
    }
}
