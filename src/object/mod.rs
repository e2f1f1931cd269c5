//! The object model. Every object is stored framed as `"{kind} {len}\0{payload}"`; the digest of
//! that framed form is the object's id.

pub mod blob;
pub mod commit;
pub mod tag;
pub mod tree;

use std::fmt;
use std::str::FromStr;

use bstr::ByteSlice;
use memchr::memchr;

use crate::error::{Error, Result};

pub use blob::Blob;
pub use commit::Commit;
pub use tag::Tag;
pub use tree::Tree;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Blob,
    Tree,
    Commit,
    Tag,
}

impl Kind {
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Blob => "blob",
            Kind::Tree => "tree",
            Kind::Commit => "commit",
            Kind::Tag => "tag",
        }
    }

    pub fn from_bytes(tag: &[u8]) -> Result<Self> {
        match tag {
            b"blob" => Ok(Kind::Blob),
            b"tree" => Ok(Kind::Tree),
            b"commit" => Ok(Kind::Commit),
            b"tag" => Ok(Kind::Tag),
            other => Err(Error::UnknownObjectType(other.into())),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_bytes(s.as_bytes())
    }
}

/// Prepend the `"{kind} {len}\0"` header to a payload.
pub fn frame(kind: Kind, payload: &[u8]) -> Vec<u8> {
    let header = format!("{} {}\0", kind, payload.len());
    let mut framed = Vec::with_capacity(header.len() + payload.len());
    framed.extend_from_slice(header.as_bytes());
    framed.extend_from_slice(payload);
    framed
}

/// Split framed bytes into their kind and payload, checking the declared length.
pub fn parse(framed: &[u8]) -> Result<(Kind, &[u8])> {
    let space = memchr(b' ', framed).ok_or_else(|| Error::corrupt("missing kind terminator"))?;
    let nul = memchr(b'\0', &framed[space..])
        .map(|idx| space + idx)
        .ok_or_else(|| Error::corrupt("missing length terminator"))?;

    let kind = Kind::from_bytes(&framed[..space])?;

    let declared = &framed[space + 1..nul];
    let declared = std::str::from_utf8(declared)
        .ok()
        .filter(|len| !len.is_empty() && len.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|len| len.parse::<usize>().ok())
        .ok_or_else(|| Error::corrupt(format!("invalid length: {:?}", declared.as_bstr())))?;

    let payload = &framed[nul + 1..];
    if payload.len() != declared {
        return Err(Error::corrupt(format!(
            "declared length {declared} but payload is {} bytes",
            payload.len()
        )));
    }

    Ok((kind, payload))
}

/// Behaviour shared by every object variant.
pub trait Storable: Sized {
    const KIND: Kind;

    /// The payload, without the framing header.
    fn serialize(&self) -> Vec<u8>;

    fn deserialize(payload: &[u8]) -> Result<Self>;

    /// Returns the object formatted `"{type} {len}\0{data}"`.
    /// e.g.
    /// a blob `"hello\n"` becomes `"blob 6\0hello\n"`
    fn formatted(&self) -> Vec<u8> {
        frame(Self::KIND, &self.serialize())
    }

    /// Pick this variant out of a loaded [`Object`].
    fn from_object(object: Object) -> Option<Self>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Object {
    Blob(Blob),
    Tree(Tree),
    Commit(Commit),
    Tag(Tag),
}

impl Object {
    pub fn kind(&self) -> Kind {
        match self {
            Object::Blob(_) => Kind::Blob,
            Object::Tree(_) => Kind::Tree,
            Object::Commit(_) => Kind::Commit,
            Object::Tag(_) => Kind::Tag,
        }
    }

    pub fn deserialize(kind: Kind, payload: &[u8]) -> Result<Self> {
        Ok(match kind {
            Kind::Blob => Object::Blob(Blob::deserialize(payload)?),
            Kind::Tree => Object::Tree(Tree::deserialize(payload)?),
            Kind::Commit => Object::Commit(Commit::deserialize(payload)?),
            Kind::Tag => Object::Tag(Tag::deserialize(payload)?),
        })
    }

    /// Parse framed bytes all the way down to the matching variant.
    pub fn from_framed(framed: &[u8]) -> Result<Self> {
        let (kind, payload) = parse(framed)?;
        Self::deserialize(kind, payload)
    }

    pub fn serialize(&self) -> Vec<u8> {
        match self {
            Object::Blob(blob) => blob.serialize(),
            Object::Tree(tree) => tree.serialize(),
            Object::Commit(commit) => commit.serialize(),
            Object::Tag(tag) => tag.serialize(),
        }
    }

}

macro_rules! impl_from_variant {
    ($($variant:ident),*) => {$(
        impl From<$variant> for Object {
            fn from(v: $variant) -> Self {
                Object::$variant(v)
            }
        }
    )*};
}

impl_from_variant!(Blob, Tree, Commit, Tag);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::Digest;

    #[test]
    fn frame_then_parse() {
        for (kind, payload) in [
            (Kind::Blob, &b"hello\n"[..]),
            (Kind::Tree, &b""[..]),
            (Kind::Commit, &b"tree x\n\nmsg"[..]),
            (Kind::Tag, &b"has a \0 nul and a space"[..]),
        ] {
            let framed = frame(kind, payload);
            assert_eq!(parse(&framed).unwrap(), (kind, payload));
        }
        assert_eq!(frame(Kind::Blob, b"hello\n"), b"blob 6\0hello\n");
    }

    #[test]
    fn length_mismatch_is_corrupt() {
        for framed in [&b"blob 5\0hello\n"[..], b"blob 7\0hello\n", b"blob \0", b"blob x\0"] {
            let err = parse(framed).unwrap_err();
            assert!(matches!(err, Error::CorruptObject { .. }), "{err}");
        }
    }

    #[test]
    fn missing_header_is_corrupt() {
        for framed in [&b""[..], b"blob", b"blob 6hello\n"] {
            let err = parse(framed).unwrap_err();
            assert!(matches!(err, Error::CorruptObject { .. }), "{err}");
        }
    }

    #[test]
    fn unknown_kind() {
        let err = parse(b"bolb 6\0hello\n").unwrap_err();
        assert!(matches!(err, Error::UnknownObjectType(ref tag) if tag == "bolb"));
        assert!("bolb".parse::<Kind>().is_err());
        assert_eq!("tag".parse::<Kind>().unwrap(), Kind::Tag);
    }

    #[test]
    fn dispatches_to_variant() {
        let object = Object::from_framed(b"blob 6\0hello\n").unwrap();
        assert_eq!(object, Object::Blob(Blob::new(b"hello\n".to_vec())));
        assert_eq!(frame(object.kind(), &object.serialize()), b"blob 6\0hello\n");

        let empty_tree = Object::from_framed(b"tree 0\0").unwrap();
        assert_eq!(empty_tree.kind(), Kind::Tree);
        assert_eq!(
            Digest::new(&frame(Kind::Tree, &empty_tree.serialize())).to_hex(),
            "4b825dc642cb6eb9a060e54bf8d69288fbee4904"
        );
    }
}
