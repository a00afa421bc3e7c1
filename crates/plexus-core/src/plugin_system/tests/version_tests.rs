#![cfg(test)]

use std::str::FromStr;

use crate::plugin_system::version::{HostVersion, VersionError, VersionRange};

#[test]
fn test_host_version_parse_valid() {
    let v = HostVersion::parse("1.2.3").unwrap();
    assert_eq!(v, HostVersion::new(1, 2, 3));
    assert_eq!(v.to_string(), "1.2.3");
}

#[test]
fn test_host_version_parse_invalid() {
    assert_eq!(HostVersion::parse("1.2"), Err(VersionError::InvalidFormat));
    assert_eq!(HostVersion::parse("1.2.3.4"), Err(VersionError::InvalidFormat));
    assert!(matches!(
        HostVersion::parse("1.2.x"),
        Err(VersionError::ParseError(_))
    ));
}

#[test]
fn test_host_version_as_semver() {
    let v = HostVersion::new(0, 1, 0);
    assert_eq!(v.as_semver(), semver::Version::new(0, 1, 0));
}

#[test]
fn test_version_range_includes() {
    let range = VersionRange::from_constraint(">=1.0.0, <2.0.0").unwrap();
    assert!(range.includes(&semver::Version::new(1, 5, 0)));
    assert!(!range.includes(&semver::Version::new(2, 0, 0)));
    assert!(!range.includes(&semver::Version::new(0, 9, 9)));
}

#[test]
fn test_version_range_keeps_constraint_string() {
    let range = VersionRange::from_str("^0.1").unwrap();
    assert_eq!(range.constraint_string(), "^0.1");
    assert_eq!(range.to_string(), "^0.1");
}

#[test]
fn test_version_range_rejects_garbage() {
    assert!(VersionRange::from_constraint("not-a-range").is_err());
}
