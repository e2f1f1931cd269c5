use camino::{Utf8Path, Utf8PathBuf};
use color_eyre::eyre::{eyre, Context};
use tracing::*;

use crate::database::Database;
use crate::digest::Digest;
use crate::error;
use crate::object::Kind;
use crate::refs::FsRefs;
use crate::revision;

/// The `.git` directory of a working tree.
pub struct Repo {
    pub git_dir: Utf8PathBuf,
    pub database: Database,
    pub refs: FsRefs,
}

impl Repo {
    fn at(worktree: &Utf8Path) -> Self {
        let git_dir = worktree.join(".git");
        trace!(path = %worktree, "Opened repo");
        Self {
            database: Database::new(&git_dir),
            refs: FsRefs::new(&git_dir),
            git_dir,
        }
    }

    /// Find the repository containing `path`, searching upwards through its parents.
    pub fn open(path: &Utf8Path) -> color_eyre::Result<Self> {
        let mut current = Some(path);
        while let Some(dir) = current {
            if dir.join(".git").is_dir() {
                return Ok(Self::at(dir));
            }
            current = dir.parent();
        }
        Err(eyre!("Not a repository (or any of the parent directories): {path}"))
    }

    /// Create the directory skeleton for an empty repository at `path`.
    pub fn init(path: &Utf8Path) -> color_eyre::Result<Self> {
        trace!(%path, "Initialising repo");
        let git_dir = path.join(".git");
        if git_dir.exists() {
            warn!("Repo already exists, init will do nothing");
        } else {
            for d in ["objects", "refs/heads", "refs/tags"] {
                let dir = git_dir.join(d);
                trace!(path = %dir, "Creating directory");
                std::fs::create_dir_all(&dir)
                    .wrap_err_with(|| format!("Could not create {dir}"))?;
            }
            std::fs::write(git_dir.join("HEAD"), "ref: refs/heads/master\n")?;
        }
        Ok(Self::at(path))
    }

    /// Resolve a user-supplied name to an object id. See [`revision::resolve`].
    pub fn resolve(
        &self,
        name: &str,
        expected: Option<Kind>,
        follow: bool,
    ) -> error::Result<Digest> {
        revision::resolve(&self.database, &self.refs, name, expected, follow)
    }
}
