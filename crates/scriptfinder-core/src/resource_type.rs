//! Resource type parsing.
//!
//! The following patterns are supported:
//! - `a/b/c` - path-based
//! - `a/b/c/1.0.0` - path-based, versioned
//! - `a.b.c` - package-style
//! - `a.b.c/1.0.0` - package-style, versioned
//! - `a` - flat (sub-set of path-based)

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Version attached to a resource type.
///
/// The accepted grammar is `major[.minor[.micro[.qualifier]]]` with numeric
/// first three segments and a qualifier restricted to `[A-Za-z0-9_-]`.
/// Omitted numeric segments default to zero, so `"1"` normalizes to
/// `"1.0.0"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeVersion {
    pub major: u32,
    pub minor: u32,
    pub micro: u32,
    pub qualifier: Option<String>,
}

/// Error for a string that does not match the version grammar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid version string {raw:?}")]
pub struct ParseVersionError {
    pub raw: String,
}

impl TypeVersion {
    /// Build a plain numeric version without qualifier.
    #[must_use]
    pub fn new(major: u32, minor: u32, micro: u32) -> Self {
        Self {
            major,
            minor,
            micro,
            qualifier: None,
        }
    }

    /// Set the qualifier segment.
    #[must_use]
    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = Some(qualifier.into());
        self
    }
}

impl FromStr for TypeVersion {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseVersionError { raw: s.to_string() };

        if s.is_empty() {
            return Err(invalid());
        }

        let segments: Vec<&str> = s.split('.').collect();
        if segments.len() > 4 || segments.iter().any(|seg| seg.is_empty()) {
            return Err(invalid());
        }

        let numeric = |seg: &str| seg.parse::<u32>().map_err(|_| invalid());

        let major = numeric(segments[0])?;
        let minor = segments.get(1).map_or(Ok(0), |seg| numeric(seg))?;
        let micro = segments.get(2).map_or(Ok(0), |seg| numeric(seg))?;
        let qualifier = match segments.get(3) {
            Some(seg) => {
                if !seg
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
                {
                    return Err(invalid());
                }
                Some((*seg).to_string())
            }
            None => None,
        };

        Ok(Self {
            major,
            minor,
            micro,
            qualifier,
        })
    }
}

impl fmt::Display for TypeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.micro)?;
        if let Some(q) = &self.qualifier {
            write!(f, ".{q}")?;
        }
        Ok(())
    }
}

/// A parsed resource type: normalized type string plus optional version.
///
/// Immutable value; the label is derived from the type string on demand and
/// never stored, so it cannot diverge.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceType {
    type_name: String,
    version: Option<TypeVersion>,
}

impl ResourceType {
    /// Parse a raw resource type string.
    ///
    /// A trailing segment that looks like a version is split off and
    /// normalized. A trailing segment that does not parse as a version is
    /// kept as part of the type: many legitimate types contain numeric path
    /// segments that are not versions, so this is a silent fallback, not an
    /// error.
    ///
    /// # Errors
    /// Returns [`Error::InvalidType`] when `raw` is empty or reduces to an
    /// empty type after the version segment is removed.
    pub fn parse(raw: &str) -> Result<Self, Error> {
        if raw.is_empty() {
            return Err(Error::InvalidType {
                raw: raw.to_string(),
            });
        }

        let (type_name, version) = match raw.rfind('/') {
            Some(last_slash) if !raw.ends_with('/') => {
                match raw[last_slash + 1..].parse::<TypeVersion>() {
                    Ok(version) => (&raw[..last_slash], Some(version)),
                    Err(_) => (raw, None),
                }
            }
            _ => (raw, None),
        };

        if type_name.is_empty() {
            return Err(Error::InvalidType {
                raw: raw.to_string(),
            });
        }

        Ok(Self {
            type_name: type_name.to_string(),
            version,
        })
    }

    /// The resource type string, without any version information.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The version, if the raw string carried one.
    #[must_use]
    pub fn version(&self) -> Option<&TypeVersion> {
        self.version.as_ref()
    }

    /// The resource type label: the part after the last `/`, or after the
    /// last `.` when there is no separator, or the whole type when neither
    /// is present.
    ///
    /// The label names the main script for the type, so it is always
    /// non-empty: a degenerate type ending in a separator falls back to the
    /// whole type string.
    #[must_use]
    pub fn label(&self) -> &str {
        let label = match self.type_name.rfind('/') {
            Some(pos) => &self.type_name[pos + 1..],
            None => match self.type_name.rfind('.') {
                Some(pos) => &self.type_name[pos + 1..],
                None => &self.type_name,
            },
        };
        if label.is_empty() {
            &self.type_name
        } else {
            label
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name)?;
        if let Some(version) = &self.version {
            write!(f, "/{version}")?;
        }
        Ok(())
    }
}
