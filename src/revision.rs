//! Turning a human-supplied name into an object id.
//!
//! A name is one of:
//! - a full 40 character hex id
//! - an abbreviated hex id of at least 4 characters
//! - a symbolic ref (`HEAD`, a branch or tag name, `refs/...`)

use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::*;

use crate::database::Database;
use crate::digest::Digest;
use crate::error::{Error, Result};
use crate::object::{Kind, Object};
use crate::refs::RefStore;

static HEX_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[[:xdigit:]]{4,39}$").unwrap());

#[derive(Debug, PartialEq, Eq)]
enum Name {
    Full(Digest),
    Prefix(String),
    Symbolic(String),
}

impl Name {
    fn parse(input: &str) -> Self {
        if let Ok(digest) = Digest::from_str(input) {
            return Self::Full(digest);
        }

        if HEX_PREFIX.is_match(input) {
            return Self::Prefix(input.to_ascii_lowercase());
        }

        Self::Symbolic(input.to_owned())
    }
}

/// Resolve `name` to an object id.
///
/// With `expected` set, the object must be of that kind. If it isn't and `follow` is true, tags
/// are peeled to their target (and commits to their tree, when a tree is wanted) until the kind
/// matches. If no such object can be reached this fails with [`Error::ObjectNotFound`].
pub fn resolve(
    database: &Database,
    refs: &impl RefStore,
    name: &str,
    expected: Option<Kind>,
    follow: bool,
) -> Result<Digest> {
    let oid = find(database, refs, name)?;
    match expected {
        None => Ok(oid),
        Some(expected) => peel(database, name, oid, expected, follow),
    }
}

fn find(database: &Database, refs: &impl RefStore, name: &str) -> Result<Digest> {
    match Name::parse(name) {
        Name::Full(oid) => Ok(oid),

        Name::Prefix(prefix) => match database.find_prefix(&prefix)?.as_slice() {
            // Hex-looking branch names exist; give the refs a chance.
            [] => symbolic(refs, name),
            [oid] => Ok(oid.clone()),
            candidates => {
                debug!(%name, count = candidates.len(), "Ambiguous object name");
                Err(Error::AmbiguousReference {
                    name: name.to_owned(),
                    candidates: candidates.to_vec(),
                })
            }
        },

        Name::Symbolic(name) => symbolic(refs, &name),
    }
}

fn symbolic(refs: &impl RefStore, name: &str) -> Result<Digest> {
    refs.lookup(name)?
        .ok_or_else(|| Error::ObjectNotFound(name.to_owned()))
}

fn peel(
    database: &Database,
    name: &str,
    mut oid: Digest,
    expected: Kind,
    follow: bool,
) -> Result<Digest> {
    loop {
        let object = database.load(&oid)?;
        if object.kind() == expected {
            return Ok(oid);
        }
        if !follow {
            break;
        }

        oid = match object {
            Object::Tag(tag) => tag.target().clone(),
            Object::Commit(commit) if expected == Kind::Tree => commit.tree_id().clone(),
            _ => break,
        };
        trace!(%name, next = %oid, "Peeling towards {expected}");
    }

    Err(Error::ObjectNotFound(format!("{name} (as {expected})")))
}

#[cfg(test)]
mod parser_tests {
    use super::*;

    #[test]
    fn classify() {
        let full = "ffc1c862714edb677d6f467902cf2e406eee22ce";
        assert_eq!(Name::parse(full), Name::Full(Digest::from_str(full).unwrap()));
        assert_eq!(Name::parse("ABcd12"), Name::Prefix("abcd12".to_owned()));
        assert_eq!(Name::parse("abc"), Name::Symbolic("abc".to_owned()));
        assert_eq!(Name::parse("HEAD"), Name::Symbolic("HEAD".to_owned()));
        assert_eq!(Name::parse("v1.0"), Name::Symbolic("v1.0".to_owned()));
        assert_eq!(
            Name::parse(&format!("{full}0")),
            Name::Symbolic(format!("{full}0"))
        );
    }
}
