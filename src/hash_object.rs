use camino::Utf8Path;
use color_eyre::eyre::Context;
use tracing::*;

use crate::database::Database;
use crate::digest::Digest;
use crate::object::{self, Kind, Object};
use crate::Result;

/// Compute the id `data` would have as an object of `kind`, storing it when a database is given.
///
/// The data is parsed as `kind` first, so that malformed trees, commits and tags are refused.
pub fn hash_object(kind: Kind, data: &[u8], database: Option<&Database>) -> Result<Digest> {
    Object::deserialize(kind, data).wrap_err_with(|| format!("Not a valid {kind}"))?;
    let framed = object::frame(kind, data);
    let oid = match database {
        Some(database) => database.write(&framed)?,
        None => Digest::new(&framed),
    };
    debug!(%oid, %kind, stored = database.is_some(), "Hashed object");
    Ok(oid)
}

pub fn hash_file(kind: Kind, path: &Utf8Path, database: Option<&Database>) -> Result<Digest> {
    let data = std::fs::read(path).wrap_err_with(|| format!("Could not read {path}"))?;
    hash_object(kind, &data, database)
}
