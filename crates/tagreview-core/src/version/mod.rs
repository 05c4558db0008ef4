//! Version parsing and next-version computation.
//!
//! A release tag is `<prefix><major>.<minor>.<patch>`. The next version keeps
//! the major number, adds the feature count to the minor number and every
//! other classified commit to the patch number. Nothing is reset.

use semver::Version;
use thiserror::Error;

use crate::classify::CommitCounts;

/// Errors from version operations.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum VersionError {
    /// The tag is not `<prefix><major>.<minor>.<patch>`.
    #[error("malformed version tag {tag:?}: expected {prefix}<major>.<minor>.<patch>")]
    MalformedTag {
        /// The tag as described by git.
        tag: String,
        /// The expected prefix.
        prefix: String,
    },

    /// Adding the commit counts overflowed a version component.
    #[error("version component overflow computing the next version after {current}")]
    Overflow {
        /// The current version.
        current: Version,
    },
}

/// Result alias for version operations.
pub type VersionResult<T> = Result<T, VersionError>;

/// Parse a release tag into a version.
///
/// The leading `prefix` is stripped, as is a trailing `git describe`
/// distance suffix (`-<n>-g<hex>`). What remains must be exactly three
/// dot-separated numbers; pre-release and build metadata are rejected.
pub fn parse_tag(tag: &str, prefix: &str) -> VersionResult<Version> {
    let malformed = || VersionError::MalformedTag {
        tag: tag.to_string(),
        prefix: prefix.to_string(),
    };

    let bare = tag.strip_prefix(prefix).ok_or_else(malformed)?;
    let bare = strip_describe_suffix(bare);

    let parts: Vec<&str> = bare.split('.').collect();
    let [major, minor, patch] = parts.as_slice() else {
        return Err(malformed());
    };

    let number = |s: &str| -> VersionResult<u64> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        s.parse().map_err(|_| malformed())
    };

    Ok(Version::new(number(major)?, number(minor)?, number(patch)?))
}

/// Compute the next version from the current one and the commit counts.
pub fn next_version(current: &Version, counts: &CommitCounts) -> VersionResult<Version> {
    let overflow = || VersionError::Overflow {
        current: current.clone(),
    };

    let minor = current
        .minor
        .checked_add(counts.features)
        .ok_or_else(overflow)?;
    let patch = [counts.fixes, counts.refactors, counts.tests, counts.style]
        .into_iter()
        .try_fold(current.patch, u64::checked_add)
        .ok_or_else(overflow)?;

    Ok(Version::new(current.major, minor, patch))
}

/// Render a version as a tag name.
pub fn format_tag(version: &Version, prefix: &str) -> String {
    format!(
        "{prefix}{}.{}.{}",
        version.major, version.minor, version.patch
    )
}

/// Remove `-<n>-g<hex>` as appended by `git describe` when the described
/// commit is not exactly tagged.
fn strip_describe_suffix(s: &str) -> &str {
    let Some((rest, hash)) = s.rsplit_once("-g") else {
        return s;
    };
    let Some((base, distance)) = rest.rsplit_once('-') else {
        return s;
    };

    let is_hash = !hash.is_empty() && hash.bytes().all(|b| b.is_ascii_hexdigit());
    let is_distance = !distance.is_empty() && distance.bytes().all(|b| b.is_ascii_digit());
    if is_hash && is_distance { base } else { s }
}
