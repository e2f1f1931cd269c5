use bstr::BString;

use crate::digest::Digest;
use crate::object::Kind;

/// Everything that can go wrong inside the object database.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("object not found: {0}")]
    ObjectNotFound(String),

    #[error("corrupt object{}: {reason}", with_id(.id))]
    CorruptObject { id: Option<Digest>, reason: String },

    #[error("unknown object type: {0}")]
    UnknownObjectType(BString),

    #[error("ambiguous reference `{name}`: matches {}", short_ids(.candidates))]
    AmbiguousReference { name: String, candidates: Vec<Digest> },

    #[error("{kind} is missing required field `{field}`")]
    MissingRequiredField { kind: Kind, field: &'static str },

    #[error("object {id} is a {actual}, expected a {expected}")]
    KindMismatch {
        id: Digest,
        expected: Kind,
        actual: Kind,
    },

    #[error("duplicate tree entry: {0}")]
    DuplicateTreeEntry(BString),

    #[error("invalid ref name: {0}")]
    InvalidRefName(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn corrupt(reason: impl Into<String>) -> Self {
        Self::CorruptObject {
            id: None,
            reason: reason.into(),
        }
    }

    /// Attach the offending object id to a `CorruptObject` that doesn't have one yet.
    pub fn at(self, oid: &Digest) -> Self {
        match self {
            Self::CorruptObject { id: None, reason } => Self::CorruptObject {
                id: Some(oid.clone()),
                reason,
            },
            other => other,
        }
    }
}

fn with_id(id: &Option<Digest>) -> String {
    id.as_ref().map(|id| format!(" {id}")).unwrap_or_default()
}

fn short_ids(ids: &[Digest]) -> String {
    ids.iter().map(Digest::short).collect::<Vec<_>>().join(", ")
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
