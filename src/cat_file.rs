use std::io::Write;
use std::process::exit;

use color_eyre::eyre::Context;

use crate::interface::CatFile;
use crate::ls_tree;
use crate::object::{self, Object};
use crate::repo::Repo;
use crate::Result;

pub fn handle(repo: &Repo, args: &CatFile) -> Result<()> {
    match args {
        CatFile::Exists { object } => {
            let oid = match repo.resolve(object, None, false) {
                Ok(oid) => oid,
                Err(e) => {
                    eprintln!("{e}");
                    exit(1);
                }
            };
            if !repo.database.exists(&oid) {
                eprintln!("Object does not exist: {oid}");
                exit(1);
            }
            if let Err(e) = repo.database.load(&oid) {
                eprintln!("Object is corrupt: {e}");
                exit(1);
            }
            Ok(())
        }

        CatFile::PrettyPrint { object } => {
            let oid = repo.resolve(object, None, false)?;
            let object = repo
                .database
                .load(&oid)
                .wrap_err_with(|| format!("Could not read {object}"))?;
            let mut stdout = std::io::stdout().lock();
            pretty_print(&object, &mut stdout)?;
            Ok(())
        }

        CatFile::Type { object } => {
            let oid = repo.resolve(object, None, false)?;
            let framed = repo.database.read(&oid)?;
            let (kind, _) = object::parse(&framed).map_err(|e| e.at(&oid))?;
            println!("{kind}");
            Ok(())
        }

        CatFile::Size { object } => {
            let oid = repo.resolve(object, None, false)?;
            let framed = repo.database.read(&oid)?;
            let (_, payload) = object::parse(&framed).map_err(|e| e.at(&oid))?;
            println!("{}", payload.len());
            Ok(())
        }
    }
}

/// Blobs, commits and tags print their payload as is; trees print like `ls-tree`.
pub fn pretty_print(object: &Object, out: &mut impl Write) -> std::io::Result<()> {
    match object {
        Object::Blob(blob) => out.write_all(blob.data()),
        Object::Tree(tree) => ls_tree::write_entries(tree, out),
        other => out.write_all(&other.serialize()),
    }
}
