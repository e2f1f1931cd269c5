use super::{Kind, Object, Storable};
use crate::error::Result;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Blob {
    data: Vec<u8>,
}

impl Blob {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl Storable for Blob {
    const KIND: Kind = Kind::Blob;

    fn serialize(&self) -> Vec<u8> {
        self.data.clone()
    }

    fn deserialize(payload: &[u8]) -> Result<Self> {
        Ok(Self::new(payload.to_vec()))
    }

    fn from_object(object: Object) -> Option<Self> {
        if let Object::Blob(v) = object {
            Some(v)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::Digest;

    #[test]
    /// Generate a blob with known contents. Ensure that the OID and the formatted output are as
    /// expected.
    fn test_blob_format() {
        let text = "hello\n";
        let expected_hash = [
            206, 1, 54, 37, 3, 11, 168, 219, 169, 6, 247, 86, 150, 127, 158, 156, 163, 148, 70, 74,
        ];
        let blob = Blob::new(text.as_bytes().to_vec());
        assert_eq!(blob.formatted(), b"blob 6\0hello\n");
        let oid = Digest::new(&blob.formatted());
        assert_eq!(*oid, expected_hash);
        assert_eq!(oid.to_hex(), "ce013625030ba8dba906f756967f9e9ca394464a");
    }

    #[test]
    fn payload_is_untouched() {
        let bytes = b"\0\xff binary \n\n".to_vec();
        let blob = Blob::deserialize(&bytes).unwrap();
        assert_eq!(blob.serialize(), bytes);
        assert_eq!(blob.data(), &bytes[..]);
    }
}
