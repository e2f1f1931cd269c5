use std::fmt::Display;

use chrono::{DateTime, FixedOffset};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(pub DateTime<FixedOffset>);

impl Timestamp {
    pub fn now() -> Self {
        Self(chrono::offset::Local::now().into())
    }

    /// Parse a timestamp from a unix + HH + mm offset
    pub fn from_git(s: &str) -> chrono::ParseResult<Self> {
        Ok(Self(DateTime::parse_from_str(s, "%s %z")?))
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%s %z"))
    }
}

/// Who made a commit or tag, and when: `Name <email> 1658312219 +0100`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub name: String,
    pub email: String,
    pub when: Timestamp,
}

impl Signature {
    pub fn new(name: impl Into<String>, email: impl Into<String>, when: Timestamp) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            when,
        }
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <{}> {}", self.name, self.email, self.when)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_round_trips_through_git_format() {
        for s in ["1658312219 +0100", "0 +0000", "1700000000 -0530"] {
            assert_eq!(Timestamp::from_git(s).unwrap().to_string(), s);
        }
        assert!(Timestamp::from_git("yesterday").is_err());
    }

    #[test]
    fn signature_line() {
        let sig = Signature::new(
            "Jamie Quigley",
            "jamie@quigley.xyz",
            Timestamp::from_git("1658312219 +0100").unwrap(),
        );
        assert_eq!(
            sig.to_string(),
            "Jamie Quigley <jamie@quigley.xyz> 1658312219 +0100"
        );
    }
}
