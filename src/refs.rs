//! Reference storage. This is a collaborator of the object database: the resolver only ever
//! asks it to turn a symbolic name into an id.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::str::FromStr;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::*;
use walkdir::WalkDir;

use crate::digest::Digest;
use crate::error::{Error, Result};

/// Symbolic refs pointing at symbolic refs are followed at most this many times.
const MAX_SYMREF_DEPTH: usize = 5;

/// Contains all characters that cannot appear in a ref name.
///
/// See: <https://github.com/git/git/blob/795ea8776befc95ea2becd8020c7a284677b4161/refs.c#L48-L57>
const DISALLOWED_CHARACTERS: [char; 41] = [
    '\0', '\x01', '\x02', '\x03', '\x04', '\x05', '\x06', '\x07', '\x08', '\t', '\n', '\x0b',
    '\x0c', '\r', '\x0e', '\x0f', '\x10', '\x11', '\x12', '\x13', '\x14', '\x15', '\x16', '\x17',
    '\x18', '\x19', '\x1a', '\x1b', '\x1c', '\x1d', '\x1e', '\x1f', ' ', '*', ':', '?', '[', '\\',
    '^', '~', '\x7f',
];

/// Check whether a string is a valid ref name.
///
/// Disallowed paths are any path where:
/// - it is empty
/// - it (or any path component) begins with `'.'`
/// - it contains double dots `".."`
/// - it contains ASCII control characters
/// - it contains `':'`, `'?'`, `'['`, `'\\'`, `'^'`, `'~'`, `'*'`, `' '`, or `'\t'`
/// - it begins or ends with `'/'`
/// - it ends with `".lock"`
/// - it contains `"@{"`
pub fn is_valid_ref_name(name: &str) -> bool {
    !(name.is_empty()
        || name.chars().any(|c| DISALLOWED_CHARACTERS.contains(&c))
        || name.starts_with('.')
        || name.starts_with('/')
        || name.contains("/.")
        || name.contains("..")
        || name.contains("//")
        || name.ends_with('/')
        || name.ends_with(".lock")
        || name.contains("@{"))
}

/// Maps symbolic names (`HEAD`, `master`, `refs/tags/v1`) to object ids.
pub trait RefStore {
    /// Returns `Ok(None)` when no ref by that name exists.
    fn lookup(&self, name: &str) -> Result<Option<Digest>>;
}

impl RefStore for BTreeMap<String, Digest> {
    fn lookup(&self, name: &str) -> Result<Option<Digest>> {
        Ok(self.get(name).cloned())
    }
}

/// Refs stored as loose files below a `.git` directory.
pub struct FsRefs {
    git_dir: Utf8PathBuf,
}

impl FsRefs {
    pub fn new(git_dir: impl AsRef<Utf8Path>) -> Self {
        Self {
            git_dir: git_dir.as_ref().to_owned(),
        }
    }

    /// Read one ref file, following `ref: ` indirections.
    fn read_ref(&self, name: &str, depth: usize) -> Result<Option<Digest>> {
        let path = self.git_dir.join(name);
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) if path.is_dir() => {
                trace!(%path, error = %e, "Ref path is a directory");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        let contents = contents.trim();

        if let Some(target) = contents.strip_prefix("ref: ") {
            if depth >= MAX_SYMREF_DEPTH {
                warn!(%name, "Symbolic ref chain too deep");
                return Err(Error::InvalidRefName(name.to_owned()));
            }
            trace!(%name, %target, "Following symbolic ref");
            if !is_valid_ref_name(target) {
                return Err(Error::InvalidRefName(target.to_owned()));
            }
            return self.read_ref(target, depth + 1);
        }

        Digest::from_str(contents).map(Some).map_err(|_| Error::CorruptObject {
            id: None,
            reason: format!("ref `{name}` holds `{contents}`, not an object id"),
        })
    }

    /// Every ref under `refs/`, keyed by its full name.
    pub fn list(&self) -> Result<BTreeMap<String, Digest>> {
        let mut refs = BTreeMap::new();
        let root = self.git_dir.join("refs");
        if !root.is_dir() {
            return Ok(refs);
        }

        for entry in WalkDir::new(&root).sort_by_file_name() {
            let entry = entry.map_err(std::io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(path) = Utf8Path::from_path(entry.path()) else {
                warn!(path = ?entry.path(), "Skipping ref with non-UTF-8 name");
                continue;
            };
            let Ok(name) = path.strip_prefix(&self.git_dir) else {
                continue;
            };
            let name = name.as_str().replace(std::path::MAIN_SEPARATOR, "/");
            if let Some(oid) = self.read_ref(&name, 0)? {
                refs.insert(name, oid);
            }
        }
        Ok(refs)
    }
}

impl RefStore for FsRefs {
    /// Tries `<name>`, `refs/<name>`, `refs/tags/<name>`, `refs/heads/<name>` and
    /// `refs/remotes/<name>`, in that order, like `git rev-parse`.
    fn lookup(&self, name: &str) -> Result<Option<Digest>> {
        if !is_valid_ref_name(name) {
            return Err(Error::InvalidRefName(name.to_owned()));
        }

        for candidate in [
            name.to_owned(),
            format!("refs/{name}"),
            format!("refs/tags/{name}"),
            format!("refs/heads/{name}"),
            format!("refs/remotes/{name}"),
        ] {
            if let Some(oid) = self.read_ref(&candidate, 0)? {
                debug!(%name, %candidate, %oid, "Resolved ref");
                return Ok(Some(oid));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use tempdir::TempDir;

    use super::*;

    const A: &str = "ce013625030ba8dba906f756967f9e9ca394464a";
    const B: &str = "4b825dc642cb6eb9a060e54bf8d69288fbee4904";

    fn setup() -> color_eyre::Result<(TempDir, FsRefs)> {
        let dir = TempDir::new("")?;
        let git_dir = Utf8Path::from_path(dir.path()).unwrap().to_owned();
        std::fs::create_dir_all(git_dir.join("refs/heads"))?;
        std::fs::create_dir_all(git_dir.join("refs/tags"))?;
        std::fs::write(git_dir.join("HEAD"), "ref: refs/heads/master\n")?;
        std::fs::write(git_dir.join("refs/heads/master"), format!("{A}\n"))?;
        std::fs::write(git_dir.join("refs/tags/v1"), format!("{B}\n"))?;
        Ok((dir, FsRefs::new(git_dir)))
    }

    #[test]
    fn valid_ref_names() {
        for name in ["master", "main", "origin/main", "v1.0.0", "HEAD", "feature/x-y_z"] {
            assert!(is_valid_ref_name(name), "{name}");
        }
        for name in [
            "", ".hidden", "a/.b", "a..b", "a b", "a:b", "a~1", "a^", "a/", "/a", "x.lock",
            "a@{1}", "mast\0er", "a//b",
        ] {
            assert!(!is_valid_ref_name(name), "{name:?}");
        }
    }

    #[test]
    fn lookup_follows_symrefs_and_short_names() -> color_eyre::Result<()> {
        let (_dir, refs) = setup()?;
        let a = Digest::from_str(A)?;
        let b = Digest::from_str(B)?;

        assert_eq!(refs.lookup("HEAD")?, Some(a.clone()));
        assert_eq!(refs.lookup("master")?, Some(a.clone()));
        assert_eq!(refs.lookup("heads/master")?, Some(a));
        assert_eq!(refs.lookup("v1")?, Some(b.clone()));
        assert_eq!(refs.lookup("refs/tags/v1")?, Some(b));
        assert_eq!(refs.lookup("nope")?, None);
        // `refs` itself is a directory, not a ref.
        assert_eq!(refs.lookup("refs")?, None);
        assert!(matches!(
            refs.lookup("../escape"),
            Err(Error::InvalidRefName(_))
        ));
        Ok(())
    }

    #[test]
    fn symref_loops_are_rejected() -> color_eyre::Result<()> {
        let (dir, refs) = setup()?;
        std::fs::write(dir.path().join("refs/heads/loop"), "ref: refs/heads/loop\n")?;
        assert!(refs.lookup("loop").is_err());
        Ok(())
    }

    #[test]
    fn list_all_refs() -> color_eyre::Result<()> {
        let (_dir, refs) = setup()?;
        let listed = refs.list()?;
        let names = listed.keys().map(String::as_str).collect::<Vec<_>>();
        assert_eq!(names, ["refs/heads/master", "refs/tags/v1"]);
        assert_eq!(listed["refs/tags/v1"].to_hex(), B);
        Ok(())
    }
}
