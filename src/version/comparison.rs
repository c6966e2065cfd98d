//! Version comparison for capability versions.
//!
//! Capability versions are free-form strings declared in metadata. Most are
//! semantic versions, possibly with a `v`, `version-` or `release-` prefix, but
//! plenty are not (`1.7`, `2.0-rc1`, `20240101`). Comparison therefore tries
//! semver first and falls back to a segment-wise comparison where numeric
//! segments compare numerically and everything else lexically.
//!
//! # Examples
//!
//! ```rust,no_run
//! use capres::version::comparison::VersionComparator;
//! use std::cmp::Ordering;
//!
//! assert_eq!(VersionComparator::compare("v1.10.0", "1.9.3"), Ordering::Greater);
//! assert_eq!(VersionComparator::compare("1.7", "1.7.0"), Ordering::Less);
//!
//! let versions = ["1.0", "2.0", "1.5"];
//! assert_eq!(VersionComparator::highest(versions.iter().copied()), Some("2.0"));
//! ```

use semver::Version;
use std::cmp::Ordering;

/// Stateless helpers for ordering version strings.
pub struct VersionComparator;

impl VersionComparator {
    /// Total order over version strings.
    pub fn compare(a: &str, b: &str) -> Ordering {
        match (Self::parse_version(a), Self::parse_version(b)) {
            (Ok(a), Ok(b)) => a.cmp(&b),
            _ => Self::compare_segments(Self::strip_prefix(a), Self::strip_prefix(b)),
        }
    }

    /// The highest version in `versions`; the first one wins among equals.
    pub fn highest<'a>(versions: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
        let mut highest: Option<&'a str> = None;
        for version in versions {
            match highest {
                Some(current) if Self::compare(version, current) != Ordering::Greater => {}
                _ => highest = Some(version),
            }
        }
        highest
    }

    fn strip_prefix(version_str: &str) -> &str {
        if let Some(stripped) = version_str.strip_prefix("version-") {
            stripped
        } else if let Some(stripped) = version_str.strip_prefix("release-") {
            stripped
        } else if let Some(stripped) = version_str.strip_prefix('v') {
            stripped
        } else {
            version_str
        }
    }

    fn parse_version(version_str: &str) -> Result<Version, semver::Error> {
        Version::parse(Self::strip_prefix(version_str))
    }

    fn compare_segments(a: &str, b: &str) -> Ordering {
        let split = |s: &str| -> Vec<String> {
            s.split(['.', '-', '_', '+']).filter(|p| !p.is_empty()).map(str::to_string).collect()
        };
        let left = split(a);
        let right = split(b);

        for (l, r) in left.iter().zip(right.iter()) {
            let ordering = match (l.parse::<u64>(), r.parse::<u64>()) {
                (Ok(l), Ok(r)) => l.cmp(&r),
                // numeric segments sort after qualifiers such as "rc1"
                (Ok(_), Err(_)) => Ordering::Greater,
                (Err(_), Ok(_)) => Ordering::Less,
                (Err(_), Err(_)) => l.cmp(r),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        // "2.0-rc1" precedes "2.0" while "2.0.1" follows it
        match left.len().cmp(&right.len()) {
            Ordering::Greater => Self::trailing_order(&left[right.len()..]),
            Ordering::Less => Self::trailing_order(&right[left.len()..]).reverse(),
            Ordering::Equal => Ordering::Equal,
        }
    }

    /// How the longer of two otherwise equal versions compares, given its extra segments.
    ///
    /// Zero segments are skipped so that `1.0.0-rc.1` still precedes `1.0`.
    fn trailing_order(extra: &[String]) -> Ordering {
        match extra.iter().find(|segment| segment.parse::<u64>() != Ok(0)) {
            Some(segment) if segment.parse::<u64>().is_err() => Ordering::Less,
            _ => Ordering::Greater,
        }
    }
}
