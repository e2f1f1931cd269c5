//! Depth-first traversal of commit ancestry.

use std::collections::HashSet;

use tracing::*;

use crate::database::Database;
use crate::digest::Digest;
use crate::error::Result;
use crate::object::Commit;

/// A `commit -> parent` link in the history graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edge {
    pub commit: Digest,
    pub parent: Digest,
}

struct Frame {
    commit: Digest,
    /// Loaded lazily, the first time this frame is on top of the stack.
    parents: Option<Vec<Digest>>,
    next: usize,
}

impl Frame {
    fn new(commit: Digest) -> Self {
        Self {
            commit,
            parents: None,
            next: 0,
        }
    }
}

/// Lazily yields the edges reachable from a starting commit.
///
/// Each commit is expanded at most once, so shared ancestors in a diamond history are only
/// walked through one of their descendants. Edges come out in visitation order: for every
/// commit, its parents are taken in recorded order and each one is fully explored before the
/// next.
pub struct Walk<'a> {
    database: &'a Database,
    seen: HashSet<Digest>,
    stack: Vec<Frame>,
}

impl<'a> Walk<'a> {
    pub fn new(database: &'a Database, start: Digest) -> Self {
        let mut seen = HashSet::new();
        seen.insert(start.clone());
        Self {
            database,
            seen,
            stack: vec![Frame::new(start)],
        }
    }

    fn step(&mut self) -> Result<Option<Edge>> {
        loop {
            let Some(frame) = self.stack.last_mut() else {
                return Ok(None);
            };

            if frame.parents.is_none() {
                trace!(commit = %frame.commit, "Visiting commit");
                let commit = self.database.load_as::<Commit>(&frame.commit)?;
                frame.parents = Some(commit.parents().to_vec());
            }

            let parents = frame.parents.as_deref().unwrap_or_default();
            let Some(parent) = parents.get(frame.next).cloned() else {
                self.stack.pop();
                continue;
            };
            frame.next += 1;

            let edge = Edge {
                commit: frame.commit.clone(),
                parent: parent.clone(),
            };
            if self.seen.insert(parent.clone()) {
                self.stack.push(Frame::new(parent));
            }
            return Ok(Some(edge));
        }
    }

    /// Every commit expanded so far, including the start.
    pub fn seen(&self) -> &HashSet<Digest> {
        &self.seen
    }
}

impl Iterator for Walk<'_> {
    type Item = Result<Edge>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.step() {
            Ok(edge) => edge.map(Ok),
            Err(e) => {
                // Don't keep walking a broken history.
                self.stack.clear();
                Some(Err(e))
            }
        }
    }
}

/// Walk the ancestry of `start`. See [`Walk`].
pub fn walk(database: &Database, start: Digest) -> Walk<'_> {
    Walk::new(database, start)
}
