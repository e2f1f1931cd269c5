//! Key-value list with message: the text encoding shared by commits and tags.
//!
//! ```text
//! tree 090c4c5dd61d2e84c832c4cd306b66bf2fabc1f5
//! parent e6a49274aa0893ce2e2928589100387aee220c5b
//! author Jamie Quigley <jamie@quigley.xyz> 1658312219 +0100
//! gpgsig -----BEGIN PGP SIGNATURE-----
//!  iQEzBAABCAAdFiEEMLv/P6sLuz4ENfg8jo/2biro2XAFAmLX1h0ACgkQjo/2biro
//!  -----END PGP SIGNATURE-----
//!
//! Message goes here
//! ```
//!
//! A value continues onto the next line when that line starts with a single space. In memory the
//! continuation marker is dropped and the lines are joined with `\n`.

use bstr::{BStr, BString, ByteSlice};
use memchr::memchr;

use crate::error::{Error, Result};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Kvlm {
    /// Keys in order of first appearance, each with every value seen for it.
    fields: Vec<(BString, Vec<BString>)>,
    message: BString,
}

impl Kvlm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(raw: &[u8]) -> Result<Self> {
        let mut kvlm = Self::new();
        let mut pos = 0;

        while pos < raw.len() {
            let rest = &raw[pos..];
            let space = memchr(b' ', rest);
            let newline = memchr(b'\n', rest);

            // No key on this line: it has to be the blank separator before the message.
            let space = match (space, newline) {
                (_, Some(0)) => {
                    kvlm.message = BString::from(&rest[1..]);
                    return Ok(kvlm);
                }
                (Some(space), Some(newline)) if space < newline => space,
                _ => {
                    return Err(Error::corrupt(format!(
                        "malformed header line: {:?}",
                        rest[..newline.unwrap_or(rest.len())].as_bstr()
                    )))
                }
            };

            let key = &rest[..space];

            // Find the end of the value: the first newline not followed by a continuation space.
            let mut end = space;
            loop {
                end = match memchr(b'\n', &rest[end + 1..]) {
                    Some(idx) => end + 1 + idx,
                    None => {
                        return Err(Error::corrupt(format!(
                            "unterminated value for key {:?}",
                            key.as_bstr()
                        )))
                    }
                };
                if rest.get(end + 1) != Some(&b' ') {
                    break;
                }
            }

            let value = rest[space + 1..end].replace("\n ", "\n");
            kvlm.push(key, value);
            pos += end + 1;
        }

        Ok(kvlm)
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for (key, values) in &self.fields {
            for value in values {
                out.extend_from_slice(key);
                out.push(b' ');
                out.extend_from_slice(&value.replace("\n", "\n "));
                out.push(b'\n');
            }
        }
        out.push(b'\n');
        out.extend_from_slice(&self.message);
        out
    }

    /// Append a value for `key`. A key seen before keeps its original position.
    pub fn push(&mut self, key: impl AsRef<[u8]>, value: impl Into<BString>) {
        let key = key.as_ref();
        match self.fields.iter_mut().find(|(k, _)| k == key) {
            Some((_, values)) => values.push(value.into()),
            None => self.fields.push((key.into(), vec![value.into()])),
        }
    }

    /// All values recorded for `key`, in the order they were encountered.
    pub fn get_all(&self, key: impl AsRef<[u8]>) -> &[BString] {
        let key = key.as_ref();
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values.as_slice())
            .unwrap_or_default()
    }

    /// The first value recorded for `key`.
    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<&BStr> {
        self.get_all(key).first().map(|v| v.as_bstr())
    }

    pub fn message(&self) -> &BStr {
        self.message.as_bstr()
    }

    pub fn set_message(&mut self, message: impl Into<BString>) {
        self.message = message.into();
    }
}
