use std::io::{ErrorKind, Read, Write};
use std::str::FromStr;

use camino::{Utf8Path, Utf8PathBuf};
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use tracing::*;

use crate::digest::Digest;
use crate::error::{Error, Result};
use crate::object::{Object, Storable};
use crate::util;

/// The object store: zlib-compressed framed objects in `objects/xx/yyyy...`.
pub struct Database {
    pub database_root: Utf8PathBuf,
}

impl Database {
    pub fn new(git_folder: impl AsRef<Utf8Path>) -> Self {
        Self {
            database_root: git_folder.as_ref().join("objects"),
        }
    }

    fn bucket_path(&self, oid: &Digest) -> Utf8PathBuf {
        self.database_root.join(&oid.to_hex()[..2])
    }

    fn object_path(&self, oid: &Digest) -> Utf8PathBuf {
        let mut x = self.bucket_path(oid);
        x.push(&oid.to_hex()[2..]);
        x
    }

    pub fn exists(&self, oid: &Digest) -> bool {
        self.object_path(oid).is_file()
    }

    /// Store already-framed bytes under their digest. Writing the same bytes twice is a no-op.
    pub fn write(&self, framed: &[u8]) -> Result<Digest> {
        let oid = Digest::new(framed);
        if self.exists(&oid) {
            trace!(oid = %oid, "Object already in database");
            return Ok(oid);
        }

        trace!(oid = %oid, "Writing object to database");

        let dirname = self.bucket_path(&oid);
        std::fs::create_dir_all(&dirname)?;

        let mut e = ZlibEncoder::new(Vec::with_capacity(framed.len()), Compression::fast());
        e.write_all(framed)?;
        let compressed_bytes = e.finish()?;

        // Write under a temporary name and rename into place, so a reader never sees a partial
        // object.
        let temp_path = dirname.join(util::tmp_file_name());
        let mut file = std::fs::File::options()
            .write(true)
            .create_new(true)
            .open(&temp_path)?;
        if let Err(e) = file.write_all(&compressed_bytes) {
            drop(file);
            let _ = std::fs::remove_file(&temp_path);
            return Err(e.into());
        }
        drop(file);

        if let Err(e) = std::fs::rename(&temp_path, self.object_path(&oid)) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(e.into());
        }

        Ok(oid)
    }

    /// Read back the framed bytes stored under `oid`.
    pub fn read(&self, oid: &Digest) -> Result<Vec<u8>> {
        trace!(oid = %oid, "Reading object from database");

        let compressed = match std::fs::read(self.object_path(oid)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::ObjectNotFound(oid.to_hex()))
            }
            Err(e) => return Err(e.into()),
        };

        let mut d = ZlibDecoder::new(&*compressed);
        let mut decompressed = Vec::new();
        d.read_to_end(&mut decompressed).map_err(|e| Error::CorruptObject {
            id: Some(oid.clone()),
            reason: format!("decompression failed: {e}"),
        })?;

        Ok(decompressed)
    }

    pub fn store<T: Storable>(&self, obj: &T) -> Result<Digest> {
        self.write(&obj.formatted())
    }

    pub fn load(&self, oid: &Digest) -> Result<Object> {
        let bytes = self.read(oid)?;
        Object::from_framed(&bytes).map_err(|e| e.at(oid))
    }

    /// Load `oid` and require it to be a `T`.
    pub fn load_as<T: Storable>(&self, oid: &Digest) -> Result<T> {
        let object = self.load(oid)?;
        let actual = object.kind();
        T::from_object(object).ok_or_else(|| Error::KindMismatch {
            id: oid.clone(),
            expected: T::KIND,
            actual,
        })
    }

    /// Every stored id whose hex form starts with `prefix`, sorted.
    ///
    /// `prefix` must be lowercase hex and at least two characters long.
    pub fn find_prefix(&self, prefix: &str) -> Result<Vec<Digest>> {
        debug_assert!(prefix.len() >= 2);
        let (bucket, rest) = prefix.split_at(2);
        let bucket_path = self.database_root.join(bucket);

        let entries = match bucket_path.read_dir_utf8() {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut found = Vec::new();
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            if name.starts_with(util::TMP_OBJECT_PREFIX) || !name.starts_with(rest) {
                continue;
            }
            match Digest::from_str(&format!("{bucket}{name}")) {
                Ok(oid) => found.push(oid),
                Err(_) => warn!(path = %entry.path(), "Ignoring stray file in object store"),
            }
        }
        found.sort();

        debug!(%prefix, matches = found.len(), "Searched object store");
        Ok(found)
    }
}
