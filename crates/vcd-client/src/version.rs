//! Numeric API version handling.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, ErrorKind};

/// A dotted numeric vCD API version such as `31.0` or `37.2`.
///
/// Missing trailing components compare as zero, so `31` == `31.0`.
#[derive(Debug, Clone)]
pub struct ApiVersion {
    parts: Vec<u32>,
}

impl ApiVersion {
    /// Major component (`36` for `36.2`).
    pub fn major(&self) -> u32 {
        self.parts.first().copied().unwrap_or(0)
    }

    /// Minor component (`2` for `36.2`).
    pub fn minor(&self) -> u32 {
        self.parts.get(1).copied().unwrap_or(0)
    }

    /// Returns true if this version is at least `other`.
    pub fn at_least(&self, other: &ApiVersion) -> bool {
        self >= other
    }
}

impl FromStr for ApiVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::new(ErrorKind::Config(
                "empty API version".to_string(),
            )));
        }

        let parts = s
            .split('.')
            .map(|p| p.parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| {
                Error::with_source(
                    ErrorKind::Config(format!("invalid API version '{}'", s)),
                    e,
                )
            })?;

        Ok(Self { parts })
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major(), self.minor())?;
        for part in self.parts.iter().skip(2) {
            write!(f, ".{}", part)?;
        }
        Ok(())
    }
}

impl Ord for ApiVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.parts.len().max(other.parts.len());
        for i in 0..len {
            let a = self.parts.get(i).copied().unwrap_or(0);
            let b = other.parts.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for ApiVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ApiVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ApiVersion {}
