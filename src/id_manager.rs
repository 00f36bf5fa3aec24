//! IdManager - locates and manipulates an entity's identifier.

use std::marker::PhantomData;

use serde_json::Value;

use crate::entity::{Entity, IdKind, IdValue, Identifier};
use crate::error::RepositoryError;

/// Identifier access for one entity shape.
///
/// Resolution happens once, at construction: the zero value of `E` is
/// serialized and checked for a record with an identifier member of the
/// right type. Every later call goes straight through the `Entity` impl.
pub struct IdManager<E> {
    kind: String,
    _marker: PhantomData<fn() -> E>,
}

impl<E> std::fmt::Debug for IdManager<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdManager").field("kind", &self.kind).finish()
    }
}

impl<E> Clone for IdManager<E> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind.clone(),
            _marker: PhantomData,
        }
    }
}

impl<E: Entity> IdManager<E> {
    /// Build a manager using the shape's own kind name.
    pub fn new() -> Result<Self, RepositoryError> {
        Self::with_kind(E::KIND)
    }

    /// Build a manager that stores the shape under a different kind name.
    pub fn with_kind(kind: impl Into<String>) -> Result<Self, RepositoryError> {
        let kind = kind.into();

        let value = serde_json::to_value(E::default()).map_err(|e| {
            RepositoryError::InvalidEntityShape {
                kind: kind.clone(),
                reason: e.to_string(),
            }
        })?;

        let record = match value {
            Value::Object(record) => record,
            other => {
                return Err(RepositoryError::InvalidEntityShape {
                    kind,
                    reason: format!("expected a record, serialized to {}", json_type(&other)),
                })
            }
        };

        let actual = match record.get(E::ID_FIELD) {
            None => {
                return Err(RepositoryError::IdentifierFieldNotFound {
                    kind,
                    field: E::ID_FIELD.to_string(),
                })
            }
            Some(Value::Number(n)) if n.is_i64() => IdKind::Int,
            Some(Value::String(_)) => IdKind::Name,
            Some(other) => {
                return Err(RepositoryError::InvalidEntityShape {
                    kind,
                    reason: format!(
                        "identifier field {:?} serialized to {}",
                        E::ID_FIELD,
                        json_type(other)
                    ),
                })
            }
        };

        if actual != E::Id::KIND {
            return Err(RepositoryError::IdentifierTypeMismatch {
                kind,
                expected: E::Id::KIND,
                actual,
            });
        }

        Ok(Self {
            kind,
            _marker: PhantomData,
        })
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn id_field(&self) -> &'static str {
        E::ID_FIELD
    }

    pub fn id_kind(&self) -> IdKind {
        E::Id::KIND
    }

    pub fn identifier(&self, entity: &E) -> Identifier {
        entity.identifier().into_identifier()
    }

    /// Stamp `id` onto `entity`. Fails if `id` is of the wrong type.
    pub fn set_identifier(&self, entity: &mut E, id: Identifier) -> Result<(), RepositoryError> {
        let id = self.convert(id)?;
        entity.set_identifier(id);
        Ok(())
    }

    /// Convert a dynamic identifier into this shape's identifier type.
    pub fn convert(&self, id: Identifier) -> Result<E::Id, RepositoryError> {
        E::Id::try_from_identifier(id).map_err(|id| RepositoryError::IdentifierTypeMismatch {
            kind: self.kind.clone(),
            expected: E::Id::KIND,
            actual: id.kind(),
        })
    }

    /// The entity's identifier, rejecting the zero value.
    pub fn require_identifier(&self, entity: &E) -> Result<E::Id, RepositoryError> {
        let id = entity.identifier();
        if id.is_unset() {
            return Err(RepositoryError::UnsetIdentifier {
                kind: self.kind.clone(),
            });
        }
        Ok(id)
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
