#[cfg(test)]
mod test;

mod cat_file;
mod database;
mod digest;
mod error;
mod filemode;
mod graph;
mod hash_object;
mod interface;
mod kvlm;
mod log;
mod ls_tree;
mod object;
mod refs;
mod repo;
mod revision;
mod signature;
mod util;

use camino::Utf8PathBuf;
use color_eyre::eyre::Context;
pub use color_eyre::Result;

use crate::interface::*;
use crate::object::{Commit, Kind, Tag};
use crate::repo::Repo;
use crate::signature::{Signature, Timestamp};

use clap::Parser;
use tracing::*;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    color_eyre::install()?;

    let opt = Opt::parse();

    let default_level = if opt.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let path = match opt.path {
        Some(ref path) => path
            .canonicalize_utf8()
            .wrap_err(format!("Directory not found: '{path}'"))?,
        None => Utf8PathBuf::try_from(std::env::current_dir()?)?,
    };

    run(opt.command, path)
}

fn run(command: Command, path: Utf8PathBuf) -> Result<()> {
    if let Command::Init { directory } = &command {
        let target = directory
            .as_ref()
            .map(|dir| path.join(dir))
            .unwrap_or_else(|| path.clone());
        std::fs::create_dir_all(&target)?;
        let repo = Repo::init(&target)?;
        println!("Initialized empty repository in {}", repo.git_dir);
        return Ok(());
    }

    if let Command::HashObject {
        write: false,
        kind,
        file,
    } = &command
    {
        // Hashing without writing doesn't need a repository.
        let oid = hash_object::hash_file(*kind, &path.join(file), None)?;
        println!("{oid}");
        return Ok(());
    }

    let repo = Repo::open(&path)?;

    match command {
        Command::Init { .. } => unreachable!(),

        Command::CatFile(args) => cat_file::handle(&repo, &args)?,

        Command::HashObject { kind, file, .. } => {
            let oid = hash_object::hash_file(kind, &path.join(file), Some(&repo.database))?;
            println!("{oid}");
        }

        Command::LsTree { recursive, tree } => {
            let oid = repo.resolve(&tree, Some(Kind::Tree), true)?;
            ls_tree::ls_tree(&repo.database, &oid, recursive, &mut std::io::stdout().lock())?;
        }

        Command::Log { commit } => {
            let oid = repo
                .resolve(&commit, Some(Kind::Commit), true)
                .wrap_err_with(|| format!("Not a commit: {commit}"))?;
            log::graphviz(&repo.database, &oid, &mut std::io::stdout().lock())?;
        }

        Command::RevParse { kind, name } => {
            let oid = repo.resolve(&name, kind, true)?;
            println!("{oid}");
        }

        Command::ShowRef => {
            for (name, oid) in repo.refs.list()? {
                println!("{oid} {name}");
            }
        }

        Command::CommitTree {
            tree,
            parents,
            message,
            identity,
        } => {
            let tree = repo.resolve(&tree, Some(Kind::Tree), true)?;
            let parents = parents
                .iter()
                .map(|parent| repo.resolve(parent, Some(Kind::Commit), true))
                .collect::<Result<Vec<_>, _>>()?;
            let signature = identity.signature()?;
            let message = with_trailing_newline(message);
            let commit = Commit::new(tree, parents, &signature, &signature, &message);
            println!("{}", repo.database.store(&commit)?);
        }

        Command::Tag {
            name,
            object,
            message,
            identity,
        } => {
            let target = repo.resolve(&object, None, false)?;
            let kind = repo.database.load(&target)?.kind();
            let message = with_trailing_newline(message);
            let tag = Tag::new(target, kind, &name, &identity.signature()?, &message);
            debug!(
                name = %tag.name(),
                target = %tag.target(),
                kind = %tag.target_kind(),
                "Writing tag"
            );
            println!("{}", repo.database.store(&tag)?);
        }
    }
    Ok(())
}

impl Identity {
    fn signature(&self) -> Result<Signature> {
        let when = match &self.author_date {
            Some(date) => Timestamp::from_git(date)
                .wrap_err_with(|| format!("Invalid date '{date}', expected '<unix> <+hhmm>'"))?,
            None => Timestamp::now(),
        };
        Ok(Signature::new(&self.author_name, &self.author_email, when))
    }
}

fn with_trailing_newline(mut message: String) -> String {
    if !message.ends_with('\n') {
        message.push('\n');
    }
    message
}
