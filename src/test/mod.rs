mod store;

use crate::signature::{Signature, Timestamp};

pub const COMMIT_NAME: &str = "Jamie Quigley";
pub const COMMIT_EMAIL: &str = "jamie@quigley.xyz";

/// A signature with a fixed timestamp, so commit ids are reproducible.
pub fn signature() -> Signature {
    Signature::new(
        COMMIT_NAME,
        COMMIT_EMAIL,
        Timestamp::from_git("1658312219 +0100").expect("valid timestamp"),
    )
}

/// A freshly initialised repository in a temporary directory.
#[macro_export]
macro_rules! test_repo {
    ($dir:ident) => {{
        let root = camino::Utf8Path::from_path($dir.path()).unwrap();
        $crate::repo::Repo::init(root)?
    }};
}
