use camino::Utf8PathBuf;
use clap::Args;
use clap::Parser;
use clap::Subcommand;

use crate::object::Kind;

#[derive(Clone, Debug, Subcommand)]
pub enum Command {
    /// Create an empty repository
    Init {
        #[clap(value_name = "directory")]
        directory: Option<Utf8PathBuf>,
    },

    #[clap(subcommand)]
    CatFile(CatFile),

    /// Compute the id of a file as an object, optionally storing it
    HashObject {
        /// Actually write the object into the database
        #[clap(short)]
        write: bool,

        #[clap(short = 't', long = "type", default_value = "blob")]
        kind: Kind,

        file: Utf8PathBuf,
    },

    /// List the contents of a tree object
    LsTree {
        /// Recurse into sub-trees
        #[clap(short)]
        recursive: bool,

        #[clap(value_name = "tree-ish")]
        tree: String,
    },

    /// Print the history of a commit as a Graphviz graph
    Log {
        #[clap(default_value = "HEAD")]
        commit: String,
    },

    /// Resolve a name to a full object id
    RevParse {
        /// Peel the named object until it is of this type
        #[clap(long = "type")]
        kind: Option<Kind>,

        name: String,
    },

    /// List references and the objects they point at
    ShowRef,

    /// Create a commit object from a tree
    CommitTree {
        #[clap(value_name = "tree-ish")]
        tree: String,

        #[clap(short = 'p', long = "parent")]
        parents: Vec<String>,

        #[clap(short, long, env = "WIT_COMMIT_MESSAGE")]
        message: String,

        #[clap(flatten)]
        identity: Identity,
    },

    /// Create an annotated tag object. Only the object is written; no ref is created.
    Tag {
        name: String,

        #[clap(default_value = "HEAD")]
        object: String,

        #[clap(short, long)]
        message: String,

        #[clap(flatten)]
        identity: Identity,
    },
}

// FIXME: This is exposing the full names of the subcommands.
#[derive(Clone, Debug, Subcommand)]
pub enum CatFile {
    /// Exit with status `ExitCode::SUCCESS` if `object` exists and is a valid object. If
    /// `object` is of an invalid format, exit with status `ExitCode::FAILURE`, and print an
    /// error to stderr.
    #[clap(short_flag = 'e')]
    Exists {
        #[clap(value_name = "object")]
        object: String,
    },

    /// Pretty-print the contents of `object` based on its type
    #[clap(short_flag = 'p')]
    PrettyPrint {
        #[clap(value_name = "object")]
        object: String,
    },

    /// Print the type of `object` to stdout
    #[clap(short_flag = 't')]
    Type {
        #[clap(value_name = "object")]
        object: String,
    },

    /// Print the size of `object` to stdout
    #[clap(short_flag = 's')]
    Size {
        #[clap(value_name = "object")]
        object: String,
    },
}

/// Who to record as author, committer or tagger.
#[derive(Clone, Debug, Args)]
pub struct Identity {
    #[clap(long, env = "WIT_AUTHOR_NAME")]
    pub author_name: String,

    #[clap(long, env = "WIT_AUTHOR_EMAIL")]
    pub author_email: String,

    /// Record this time instead of the current one, as `<unix seconds> <+hhmm>`
    #[clap(long, env = "WIT_AUTHOR_DATE")]
    pub author_date: Option<String>,
}

#[derive(Debug, Parser)]
#[clap(name = "wit", about = "A content-addressed object database with a git-compatible layout")]
pub struct Opt {
    #[clap(subcommand)]
    pub command: Command,

    /// Log at debug level unless `RUST_LOG` says otherwise
    #[clap(short, long, global = true)]
    pub verbose: bool,

    /// Run as if started in this directory
    #[clap(short = 'C', env = "WIT_DIR", global = true)]
    pub path: Option<Utf8PathBuf>,
}
