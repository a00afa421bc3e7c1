use std::fmt;
use std::str::FromStr;

use semver::{Version, VersionReq};

/// Error type for version parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    InvalidFormat,
    ParseError(String),
}

impl fmt::Display for VersionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionError::InvalidFormat => write!(f, "Invalid version format"),
            VersionError::ParseError(msg) => write!(f, "Version parse error: {}", msg),
        }
    }
}

impl std::error::Error for VersionError {}

/// Version of the host process that plugins declare compatibility against
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct HostVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl HostVersion {
    /// Creates a new host version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self { major, minor, patch }
    }

    /// Parses a version string like "1.2.3"
    pub fn parse(version: &str) -> Result<Self, VersionError> {
        let parts: Vec<&str> = version.split('.').collect();
        if parts.len() != 3 {
            return Err(VersionError::InvalidFormat);
        }

        let parse_part = |part: &str| -> Result<u64, VersionError> {
            part.parse::<u64>()
                .map_err(|e| VersionError::ParseError(e.to_string()))
        };

        Ok(Self::new(
            parse_part(parts[0])?,
            parse_part(parts[1])?,
            parse_part(parts[2])?,
        ))
    }

    /// The equivalent `semver::Version`, used for range checks
    pub fn as_semver(&self) -> Version {
        Version::new(self.major, self.minor, self.patch)
    }
}

impl FromStr for HostVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HostVersion::parse(s)
    }
}

impl fmt::Display for HostVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Represents a version requirement range using semver constraints.
#[derive(Debug, Clone)]
pub struct VersionRange {
    /// The original constraint string (e.g., "^1.2.3", ">=2.0")
    constraint: String,
    /// The parsed semver requirement
    req: VersionReq,
}

impl VersionRange {
    /// Creates a new version range from a constraint string.
    pub fn from_constraint(constraint: &str) -> Result<Self, VersionError> {
        let req = VersionReq::parse(constraint).map_err(|e| {
            VersionError::ParseError(format!("Invalid version constraint '{}': {}", constraint, e))
        })?;
        Ok(Self {
            constraint: constraint.to_string(),
            req,
        })
    }

    /// Checks if a specific `semver::Version` satisfies this range.
    pub fn includes(&self, version: &Version) -> bool {
        self.req.matches(version)
    }

    /// Returns the original constraint string.
    pub fn constraint_string(&self) -> &str {
        &self.constraint
    }
}

impl PartialEq for VersionRange {
    fn eq(&self, other: &Self) -> bool {
        self.constraint == other.constraint
    }
}

/// Implement Display to show the original constraint string.
impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.constraint)
    }
}

/// Allow parsing directly from a string slice.
impl FromStr for VersionRange {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VersionRange::from_constraint(s)
    }
}
