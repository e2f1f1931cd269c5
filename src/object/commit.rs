use std::str::FromStr;

use bstr::{BStr, ByteSlice};

use super::{Kind, Object, Storable};
use crate::digest::Digest;
use crate::error::{Error, Result};
use crate::kvlm::Kvlm;
use crate::signature::Signature;

/// A commit: a [`Kvlm`] with exactly one `tree` and any number of `parent`s.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Commit {
    kvlm: Kvlm,
    tree: Digest,
    parents: Vec<Digest>,
}

/// Parse a header value that must hold a full object id.
pub(super) fn parse_oid(kind: Kind, key: &str, value: &BStr) -> Result<Digest> {
    value
        .to_str()
        .ok()
        .and_then(|s| Digest::from_str(s).ok())
        .ok_or_else(|| Error::corrupt(format!("{kind} has invalid `{key}` id: {value:?}")))
}

impl Commit {
    pub fn new(
        tree: Digest,
        parents: Vec<Digest>,
        author: &Signature,
        committer: &Signature,
        message: &str,
    ) -> Self {
        let mut kvlm = Kvlm::new();
        kvlm.push("tree", tree.to_hex());
        for parent in &parents {
            kvlm.push("parent", parent.to_hex());
        }
        kvlm.push("author", author.to_string());
        kvlm.push("committer", committer.to_string());
        kvlm.set_message(message);

        Self {
            kvlm,
            tree,
            parents,
        }
    }

    fn from_kvlm(kvlm: Kvlm) -> Result<Self> {
        let tree = match kvlm.get_all("tree") {
            [tree] => parse_oid(Kind::Commit, "tree", tree.as_bstr())?,
            [] => {
                return Err(Error::MissingRequiredField {
                    kind: Kind::Commit,
                    field: "tree",
                })
            }
            _ => return Err(Error::corrupt("commit has more than one `tree`")),
        };

        let parents = kvlm
            .get_all("parent")
            .iter()
            .map(|parent| parse_oid(Kind::Commit, "parent", parent.as_bstr()))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            kvlm,
            tree,
            parents,
        })
    }

    pub fn tree_id(&self) -> &Digest {
        &self.tree
    }

    /// Parents in the order they are recorded. Empty for a root commit.
    pub fn parents(&self) -> &[Digest] {
        &self.parents
    }

    pub fn message(&self) -> &BStr {
        self.kvlm.message()
    }

    /// First line of the message.
    pub fn summary(&self) -> &BStr {
        self.message().lines().next().unwrap_or_default().as_bstr()
    }
}

impl Storable for Commit {
    const KIND: Kind = Kind::Commit;

    fn serialize(&self) -> Vec<u8> {
        self.kvlm.serialize()
    }

    fn deserialize(payload: &[u8]) -> Result<Self> {
        Self::from_kvlm(Kvlm::parse(payload)?)
    }

    fn from_object(object: Object) -> Option<Self> {
        if let Object::Commit(v) = object {
            Some(v)
        } else {
            None
        }
    }
}
