use std::fmt;

use crate::entity::Identifier;

/// Address of one stored record: kind name plus an integer or string identifier.
///
/// A key without an identifier (or with the zero identifier) is incomplete;
/// the service assigns an integer identifier when one is put.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key {
    kind: String,
    id: Option<Identifier>,
}

impl Key {
    pub fn new(kind: impl Into<String>, id: impl Into<Identifier>) -> Self {
        Self {
            kind: kind.into(),
            id: Some(id.into()),
        }
    }

    pub fn incomplete(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: None,
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn identifier(&self) -> Option<&Identifier> {
        self.id.as_ref()
    }

    pub fn int_id(&self) -> Option<i64> {
        match self.id {
            Some(Identifier::Int(id)) => Some(id),
            _ => None,
        }
    }

    pub fn name_id(&self) -> Option<&str> {
        match &self.id {
            Some(Identifier::Name(name)) => Some(name),
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.id.as_ref().is_some_and(|id| !id.is_unset())
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(Identifier::Name(name)) if !name.is_empty() => {
                write!(f, "{}({:?})", self.kind, name)
            }
            Some(id) if !id.is_unset() => write!(f, "{}({})", self.kind, id),
            _ => write!(f, "{}(incomplete)", self.kind),
        }
    }
}
