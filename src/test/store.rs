use bstr::ByteSlice;
use tempdir::TempDir;

use crate::cat_file;
use crate::digest::Digest;
use crate::error::Error;
use crate::object::{self, Blob, Kind, Object, Storable};
use crate::*;

#[test]
/// Store `"hello\n"` as a blob. Its id is the same one git gives it, it lands in the fan-out
/// directory git would use, and reading it back gives the same bytes.
fn hello_blob_end_to_end() -> Result<()> {
    let dir = TempDir::new("")?;
    let repo = crate::test_repo!(dir);

    let oid = repo.database.store(&Blob::new(b"hello\n".to_vec()))?;
    assert_eq!(oid.to_hex(), "ce013625030ba8dba906f756967f9e9ca394464a");
    assert!(repo
        .git_dir
        .join("objects/ce/013625030ba8dba906f756967f9e9ca394464a")
        .is_file());

    let resolved = repo.resolve("ce01", None, false)?;
    assert_eq!(resolved, oid);

    let object = repo.database.load(&resolved)?;
    assert_eq!(object.kind(), Kind::Blob);
    let mut out = Vec::new();
    cat_file::pretty_print(&object, &mut out)?;
    assert_eq!(out.as_bstr(), "hello\n");
    Ok(())
}

#[test]
fn writing_twice_is_harmless() -> Result<()> {
    let dir = TempDir::new("")?;
    let repo = crate::test_repo!(dir);

    let framed = Blob::new(b"twice".to_vec()).formatted();
    let first = repo.database.write(&framed)?;
    let second = repo.database.write(&framed)?;
    assert_eq!(first, second);
    assert_eq!(repo.database.read(&first)?, framed);
    Ok(())
}

#[test]
fn every_variant_survives_the_store() -> Result<()> {
    let dir = TempDir::new("")?;
    let repo = crate::test_repo!(dir);
    let db = &repo.database;

    let blob = Blob::new(b"contents\n".to_vec());
    let blob_id = db.store(&blob)?;
    let tree = crate::object::Tree::new(vec![crate::object::tree::TreeEntry::new(
        crate::filemode::FileMode::REGULAR,
        "file",
        blob_id.clone(),
    )])?;
    let tree_id = db.store(&tree)?;
    let commit = crate::object::Commit::new(
        tree_id,
        vec![],
        &super::signature(),
        &super::signature(),
        "initial\n",
    );
    let commit_id = db.store(&commit)?;
    let tag = crate::object::Tag::new(
        commit_id.clone(),
        Kind::Commit,
        "v1",
        &super::signature(),
        "tagged\n",
    );

    let objects: Vec<Object> = vec![blob.into(), tree.into(), commit.into(), tag.into()];
    for object in objects {
        let framed = object::frame(object.kind(), &object.serialize());
        let oid = db.write(&framed)?;
        assert_eq!(oid, Digest::new(&framed));
        assert_eq!(db.load(&oid)?, object);
    }
    Ok(())
}

#[test]
fn unknown_kind_on_disk() -> Result<()> {
    let dir = TempDir::new("")?;
    let repo = crate::test_repo!(dir);

    let oid = repo.database.write(b"widget 3\0abc")?;
    assert!(repo.database.exists(&oid));
    assert!(matches!(
        repo.database.load(&oid),
        Err(Error::UnknownObjectType(_))
    ));
    Ok(())
}
