use std::collections::HashSet;
use std::io::Write;

use tracing::*;

use crate::database::Database;
use crate::digest::Digest;
use crate::graph;
use crate::object::Commit;
use crate::Result;

/// Render the history of `start` as a Graphviz digraph.
pub fn graphviz(database: &Database, start: &Digest, out: &mut impl Write) -> Result<()> {
    let mut labelled = HashSet::new();

    writeln!(out, "digraph witlog {{")?;
    writeln!(out, "  node[shape=rect]")?;
    node(database, start, &mut labelled, out)?;

    let mut walk = graph::walk(database, start.clone());
    for edge in &mut walk {
        let edge = edge?;
        node(database, &edge.parent, &mut labelled, out)?;
        writeln!(out, "  c_{} -> c_{};", edge.commit, edge.parent)?;
    }
    debug!(%start, commits = walk.seen().len(), "Rendered history");

    writeln!(out, "}}")?;
    Ok(())
}

fn node(
    database: &Database,
    oid: &Digest,
    labelled: &mut HashSet<Digest>,
    out: &mut impl Write,
) -> Result<()> {
    if !labelled.insert(oid.clone()) {
        return Ok(());
    }
    let commit = database.load_as::<Commit>(oid)?;
    let summary = commit
        .summary()
        .to_string()
        .replace('\\', "\\\\")
        .replace('"', "\\\"");
    writeln!(out, "  c_{oid} [label=\"{}: {summary}\"]", oid.short())?;
    Ok(())
}
