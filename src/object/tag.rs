use bstr::BStr;

use super::commit::parse_oid;
use super::{Kind, Object, Storable};
use crate::digest::Digest;
use crate::error::{Error, Result};
use crate::kvlm::Kvlm;
use crate::signature::Signature;

/// An annotated tag: names another object and describes it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tag {
    kvlm: Kvlm,
    target: Digest,
    target_kind: Kind,
}

impl Tag {
    pub fn new(
        target: Digest,
        target_kind: Kind,
        name: &str,
        tagger: &Signature,
        message: &str,
    ) -> Self {
        let mut kvlm = Kvlm::new();
        kvlm.push("object", target.to_hex());
        kvlm.push("type", target_kind.as_str());
        kvlm.push("tag", name);
        kvlm.push("tagger", tagger.to_string());
        kvlm.set_message(message);

        Self {
            kvlm,
            target,
            target_kind,
        }
    }

    fn from_kvlm(kvlm: Kvlm) -> Result<Self> {
        let required = |field: &'static str| {
            kvlm.get(field).ok_or(Error::MissingRequiredField {
                kind: Kind::Tag,
                field,
            })
        };

        let target = parse_oid(Kind::Tag, "object", required("object")?)?;
        let target_kind = Kind::from_bytes(required("type")?)?;
        required("tag")?;

        Ok(Self {
            kvlm,
            target,
            target_kind,
        })
    }

    /// The id of the tagged object.
    pub fn target(&self) -> &Digest {
        &self.target
    }

    pub fn target_kind(&self) -> Kind {
        self.target_kind
    }

    pub fn name(&self) -> &BStr {
        self.kvlm.get("tag").unwrap_or_default()
    }
}

impl Storable for Tag {
    const KIND: Kind = Kind::Tag;

    fn serialize(&self) -> Vec<u8> {
        self.kvlm.serialize()
    }

    fn deserialize(payload: &[u8]) -> Result<Self> {
        Self::from_kvlm(Kvlm::parse(payload)?)
    }

    fn from_object(object: Object) -> Option<Self> {
        if let Object::Tag(v) = object {
            Some(v)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bstr::ByteSlice;

    use super::*;
    use crate::signature::Timestamp;

    const TARGET: &str = "ce013625030ba8dba906f756967f9e9ca394464a";

    #[test]
    fn tag_layout() {
        let tagger = Signature::new(
            "A U Thor",
            "author@example.com",
            Timestamp::from_git("1700000000 -0500").unwrap(),
        );
        let tag = Tag::new(
            Digest::from_str(TARGET).unwrap(),
            Kind::Blob,
            "v1.0",
            &tagger,
            "first release\n",
        );

        let serialized = tag.serialize();
        assert_eq!(
            serialized.as_bstr(),
            format!(
                "object {TARGET}\ntype blob\ntag v1.0\n\
                 tagger A U Thor <author@example.com> 1700000000 -0500\n\
                 \nfirst release\n"
            )
            .as_bytes()
            .as_bstr()
        );

        let parsed = Tag::deserialize(&serialized).unwrap();
        assert_eq!(parsed, tag);
        assert_eq!(parsed.target().to_hex(), TARGET);
        assert_eq!(parsed.target_kind(), Kind::Blob);
        assert_eq!(parsed.name(), "v1.0");
        assert_eq!(parsed.kvlm.message(), "first release\n");
    }

    #[test]
    fn required_fields() {
        let missing = [
            ("object", format!("type blob\ntag v1\n\nmsg")),
            ("type", format!("object {TARGET}\ntag v1\n\nmsg")),
            ("tag", format!("object {TARGET}\ntype blob\n\nmsg")),
        ];
        for (field, raw) in missing {
            match Tag::deserialize(raw.as_bytes()) {
                Err(Error::MissingRequiredField { kind: Kind::Tag, field: f }) => {
                    assert_eq!(f, field)
                }
                other => panic!("expected missing `{field}`, got {other:?}"),
            }
        }

        let raw = format!("object {TARGET}\ntype widget\ntag v1\n\nmsg");
        assert!(matches!(
            Tag::deserialize(raw.as_bytes()),
            Err(Error::UnknownObjectType(_))
        ));
    }
}
