use std::collections::HashSet;

use bstr::{BStr, BString, ByteSlice};
use memchr::memchr;
use tracing::*;

use super::{Kind, Object, Storable};
use crate::digest::Digest;
use crate::error::{Error, Result};
use crate::filemode::FileMode;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeEntry {
    mode: FileMode,
    /// The mode exactly as it is written out. Entries read from disk keep the digits they were
    /// stored with (`040000` as well as `40000`), so they hash back to the same id.
    mode_digits: BString,
    pub name: BString,
    pub oid: Digest,
}

impl TreeEntry {
    pub fn new(mode: FileMode, name: impl Into<BString>, oid: Digest) -> Self {
        Self {
            mode,
            mode_digits: format!("{mode:o}").into(),
            name: name.into(),
            oid,
        }
    }

    /// The kind of object this entry points at.
    pub fn kind(&self) -> Kind {
        self.mode.kind()
    }

    /// The entry formatted like a line of `git ls-tree`, with its name prefixed by `prefix`.
    pub fn ls_line(&self, prefix: &BStr) -> String {
        format!(
            "{} {} {}\t{}{}",
            self.mode,
            self.kind(),
            self.oid,
            prefix,
            self.name
        )
    }

    /// Parses one entry off the front of `bytes`, returning it and the rest.
    /// Entries are of the form `<mode> <name>\0<oid>`
    fn parse(bytes: &[u8]) -> Result<(Self, &[u8])> {
        let space = memchr(b' ', bytes)
            .ok_or_else(|| Error::corrupt("truncated tree entry: missing mode terminator"))?;
        let nul = memchr(b'\0', &bytes[space..])
            .map(|idx| space + idx)
            .ok_or_else(|| Error::corrupt("truncated tree entry: missing name terminator"))?;

        let mode_digits = &bytes[..space];
        let mode = FileMode::parse(mode_digits)?;
        let name = &bytes[space + 1..nul];
        if name.is_empty() {
            return Err(Error::corrupt("tree entry with an empty name"));
        }

        let oid_end = nul + 1 + Digest::LEN;
        let oid = bytes
            .get(nul + 1..oid_end)
            .and_then(Digest::from_bytes)
            .ok_or_else(|| {
                Error::corrupt(format!("truncated tree entry: {:?}", name.as_bstr()))
            })?;

        if !mode.is_standard() {
            debug!(
                mode = %mode_digits.as_bstr(),
                name = %name.as_bstr(),
                "Unusual tree entry mode"
            );
        }

        let mut entry = Self::new(mode, name, oid);
        entry.mode_digits = mode_digits.into();
        Ok((entry, &bytes[oid_end..]))
    }

    fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.mode_digits);
        out.push(b' ');
        out.extend_from_slice(&self.name);
        out.push(b'\0');
        out.extend_from_slice(&*self.oid);
    }
}

/// An ordered list of entries. The order is kept exactly as given, so that serialization is
/// reproducible.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tree {
    entries: Vec<TreeEntry>,
}

impl Tree {
    pub fn new(entries: Vec<TreeEntry>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if !seen.insert(entry.name.as_bstr()) {
                return Err(Error::DuplicateTreeEntry(entry.name.clone()));
            }
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

}

impl Storable for Tree {
    const KIND: Kind = Kind::Tree;

    fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for entry in &self.entries {
            entry.write(&mut out);
        }
        out
    }

    fn deserialize(mut payload: &[u8]) -> Result<Self> {
        let mut entries = Vec::new();
        while !payload.is_empty() {
            let (entry, rest) = TreeEntry::parse(payload)?;
            entries.push(entry);
            payload = rest;
        }
        Self::new(entries).map_err(|e| match e {
            Error::DuplicateTreeEntry(name) => {
                Error::corrupt(format!("duplicate tree entry: {:?}", name))
            }
            other => other,
        })
    }

    fn from_object(object: Object) -> Option<Self> {
        if let Object::Tree(v) = object {
            Some(v)
        } else {
            None
        }
    }
}
