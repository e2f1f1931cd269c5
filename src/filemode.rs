use std::fmt;

use crate::error::{Error, Result};
use crate::object::Kind;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(transparent)]
pub struct FileMode(pub u32);

impl fmt::Octal for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:o}", self.0)
    }
}

/// Zero-padded to six digits, as `git ls-tree` prints it.
impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06o}", self.0)
    }
}

impl FileMode {
    pub const DIRECTORY: FileMode = FileMode(0o040000);
    pub const REGULAR: FileMode = FileMode(0o100644);
    pub const EXECUTABLE: FileMode = FileMode(0o100755);
    pub const SYMLINK: FileMode = FileMode(0o120000);
    pub const GITLINK: FileMode = FileMode(0o160000);

    /// Parse the octal digits of a tree entry's mode field.
    pub fn parse(digits: &[u8]) -> Result<Self> {
        let invalid = || {
            Error::corrupt(format!("invalid file mode: {:?}", bstr::BStr::new(digits)))
        };
        if digits.is_empty() || !digits.iter().all(|b| (b'0'..=b'7').contains(b)) {
            return Err(invalid());
        }
        let digits = std::str::from_utf8(digits).map_err(|_| invalid())?;
        u32::from_str_radix(digits, 8).map(Self).map_err(|_| invalid())
    }

    /// The kind of object an entry with this mode points at.
    pub fn kind(self) -> Kind {
        match FileMode(self.0 & 0o170000) {
            FileMode::DIRECTORY => Kind::Tree,
            FileMode::GITLINK => Kind::Commit,
            _ => Kind::Blob,
        }
    }

    /// Whether git itself would write this mode.
    pub fn is_standard(self) -> bool {
        matches!(
            self,
            FileMode::REGULAR
                | FileMode::EXECUTABLE
                | FileMode::SYMLINK
                | FileMode::DIRECTORY
                | FileMode::GITLINK
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_format() {
        let mode = FileMode::parse(b"40000").unwrap();
        assert_eq!(mode, FileMode::DIRECTORY);
        assert_eq!(format!("{mode:o}"), "40000");
        assert_eq!(mode.to_string(), "040000");
        assert_eq!(mode.kind(), Kind::Tree);

        assert_eq!(FileMode::parse(b"100755").unwrap().kind(), Kind::Blob);
        assert_eq!(FileMode::parse(b"160000").unwrap().kind(), Kind::Commit);
        assert_eq!(FileMode::SYMLINK.kind(), Kind::Blob);

        for bad in [&b""[..], b"10064x", b"1008"] {
            assert!(FileMode::parse(bad).is_err());
        }
    }

    #[test]
    fn standard_modes() {
        for digits in [&b"100644"[..], b"100755", b"120000", b"40000", b"040000", b"160000"] {
            assert!(FileMode::parse(digits).unwrap().is_standard());
        }
        // Old repositories carry group-writable blobs.
        assert!(!FileMode::parse(b"100664").unwrap().is_standard());
        assert_eq!(FileMode::parse(b"100664").unwrap().kind(), Kind::Blob);
    }
}
