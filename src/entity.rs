//! Entity - the capability contract every stored record shape implements.

use std::fmt;
use std::hash::Hash;

use serde::{de::DeserializeOwned, Serialize};

/// A record shape managed by a repository.
///
/// Usually derived with `#[derive(Entity)]` and a `#[repository(id)]` marker
/// on the identifier field, but any shape can implement it by hand.
pub trait Entity: Serialize + DeserializeOwned + Clone + Default {
    /// Identifier value type, either `i64` or `String`.
    type Id: IdValue;

    /// Backend-level name grouping all records of this shape.
    const KIND: &'static str;

    /// Serialized name of the identifier field.
    const ID_FIELD: &'static str;

    /// Returns the current identifier value.
    fn identifier(&self) -> Self::Id;

    /// Overwrites the identifier value in place.
    fn set_identifier(&mut self, id: Self::Id);
}

/// The two identifier value types a repository can be configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdKind {
    Int,
    Name,
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdKind::Int => f.write_str("int64"),
            IdKind::Name => f.write_str("string"),
        }
    }
}

/// A dynamically typed identifier, as exchanged with storage backends.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Identifier {
    Int(i64),
    Name(String),
}

impl Identifier {
    pub fn kind(&self) -> IdKind {
        match self {
            Identifier::Int(_) => IdKind::Int,
            Identifier::Name(_) => IdKind::Name,
        }
    }

    /// True for the zero value of either type: `0` or `""`.
    pub fn is_unset(&self) -> bool {
        match self {
            Identifier::Int(id) => *id == 0,
            Identifier::Name(name) => name.is_empty(),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Int(id) => write!(f, "{}", id),
            Identifier::Name(name) => f.write_str(name),
        }
    }
}

impl From<i64> for Identifier {
    fn from(id: i64) -> Self {
        Identifier::Int(id)
    }
}

impl From<String> for Identifier {
    fn from(name: String) -> Self {
        Identifier::Name(name)
    }
}

impl From<&str> for Identifier {
    fn from(name: &str) -> Self {
        Identifier::Name(name.to_string())
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for i64 {}
    impl Sealed for String {}
}

/// Identifier value types. Implemented for `i64` and `String` only.
pub trait IdValue:
    sealed::Sealed + Clone + Eq + Hash + fmt::Debug + Send + Sync + 'static
{
    const KIND: IdKind;

    fn into_identifier(self) -> Identifier;

    /// Converts back from a dynamic identifier, handing it back on a type mismatch.
    fn try_from_identifier(id: Identifier) -> Result<Self, Identifier>;

    /// Renders a generated sequence number as an identifier of this type.
    fn from_sequence(seq: i64) -> Self;

    fn is_unset(&self) -> bool;
}

impl IdValue for i64 {
    const KIND: IdKind = IdKind::Int;

    fn into_identifier(self) -> Identifier {
        Identifier::Int(self)
    }

    fn try_from_identifier(id: Identifier) -> Result<Self, Identifier> {
        match id {
            Identifier::Int(id) => Ok(id),
            other => Err(other),
        }
    }

    fn from_sequence(seq: i64) -> Self {
        seq
    }

    fn is_unset(&self) -> bool {
        *self == 0
    }
}

impl IdValue for String {
    const KIND: IdKind = IdKind::Name;

    fn into_identifier(self) -> Identifier {
        Identifier::Name(self)
    }

    fn try_from_identifier(id: Identifier) -> Result<Self, Identifier> {
        match id {
            Identifier::Name(name) => Ok(name),
            other => Err(other),
        }
    }

    fn from_sequence(seq: i64) -> Self {
        seq.to_string()
    }

    fn is_unset(&self) -> bool {
        self.is_empty()
    }
}
