use std::io::Write;

use bstr::{BStr, BString, ByteSlice};

use crate::database::Database;
use crate::digest::Digest;
use crate::object::{Kind, Tree};
use crate::Result;

/// Write one `ls-tree` line per entry of `tree`.
pub fn write_entries(tree: &Tree, out: &mut impl Write) -> std::io::Result<()> {
    for entry in tree.entries() {
        writeln!(out, "{}", entry.ls_line(BStr::new("")))?;
    }
    Ok(())
}

/// List `tree`. When `recursive`, sub-trees are descended into instead of being listed, and
/// names are printed with their full path.
pub fn ls_tree(
    database: &Database,
    tree: &Digest,
    recursive: bool,
    out: &mut impl Write,
) -> Result<()> {
    walk(database, tree, recursive, BStr::new(""), out)
}

fn walk(
    database: &Database,
    oid: &Digest,
    recursive: bool,
    prefix: &BStr,
    out: &mut impl Write,
) -> Result<()> {
    let tree = database.load_as::<Tree>(oid)?;
    for entry in tree.entries() {
        if recursive && entry.kind() == Kind::Tree {
            let mut nested = BString::from(prefix.as_bytes());
            nested.extend_from_slice(&entry.name);
            nested.push(b'/');
            walk(database, &entry.oid, recursive, nested.as_bstr(), out)?;
        } else {
            writeln!(out, "{}", entry.ls_line(prefix))?;
        }
    }
    Ok(())
}
