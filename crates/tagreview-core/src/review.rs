//! The release review pipeline.
//!
//! One straight-line pass: fetch, pick the start of the range (from the
//! recent release tags when not given), classify the commits in the range,
//! then describe the latest tag and compute the proposed next one.
//!
//! All repository access goes through a [`GitQuery`] supplied by the
//! caller.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::classify::{CommitCounts, classify};
use crate::config::ReviewSettings;
use crate::git::{CommitData, GitError, GitQuery};
use crate::tags::rank_tags;
use crate::version::{self, VersionError};

/// Errors from a review run.
#[derive(Error, Debug)]
pub enum ReviewError {
    /// A git query failed.
    #[error(transparent)]
    Git(#[from] GitError),

    /// The current tag could not be turned into the next version.
    #[error(transparent)]
    Version(#[from] VersionError),

    /// No start ref was given and no tag carries the release prefix.
    #[error("no release tags starting with {prefix:?}; pass --from to choose a start ref")]
    NoReleaseTags {
        /// The configured prefix.
        prefix: String,
    },

    /// The repository has no tags at all, so there is no current version.
    #[error("no tags found; cannot determine the current version")]
    NoTags,
}

/// Result alias for review operations.
pub type ReviewResult<T> = Result<T, ReviewError>;

/// What to review.
#[derive(Debug, Clone, Default)]
pub struct ReviewRequest {
    /// Start of the range (exclusive). Chosen from recent tags when `None`.
    pub from: Option<String>,
    /// End of the range (inclusive). `HEAD` when `None`.
    pub to: Option<String>,
}

/// A release tag together with the commit it points to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagInfo {
    /// Tag name.
    pub tag: String,
    /// The tagged commit.
    #[serde(flatten)]
    pub commit: CommitData,
}

/// The outcome of a review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewReport {
    /// Recent release tags, best first. `None` when `from` was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_tags: Option<Vec<TagInfo>>,
    /// Start of the reviewed range.
    pub from: String,
    /// End of the reviewed range, if one was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// Number of commits in the range.
    pub commit_count: usize,
    /// Classified commit counts.
    pub counts: CommitCounts,
    /// The latest tag as described by git.
    pub current: String,
    /// The proposed next tag.
    pub next: String,
}

/// Run a review against `repo`.
#[instrument(skip(repo, settings), fields(from = ?request.from, to = ?request.to))]
pub fn run_review<G: GitQuery + ?Sized>(
    repo: &G,
    request: &ReviewRequest,
    settings: &ReviewSettings,
) -> ReviewResult<ReviewReport> {
    if settings.fetch {
        repo.fetch()?;
    } else {
        debug!("fetch disabled");
    }

    let (from, recent_tags) = match &request.from {
        Some(from) => (from.clone(), None),
        None => {
            let recent = recent_tags(repo, settings)?;
            let oldest = recent.last().ok_or_else(|| ReviewError::NoReleaseTags {
                prefix: settings.tag_prefix.clone(),
            })?;
            (oldest.tag.clone(), Some(recent))
        }
    };

    let range = commit_range(&from, request.to.as_deref());
    let lines = repo.log_oneline(&range)?;
    let counts = classify(&lines);
    info!(%range, commits = lines.len(), ?counts, "classified commits");

    let current = current_tag(repo)?;
    let current_version = version::parse_tag(&current, &settings.tag_prefix)?;
    let next_version = version::next_version(&current_version, &counts)?;
    let next = version::format_tag(&next_version, &settings.tag_prefix);
    info!(%current, %next, "proposed next version");

    Ok(ReviewReport {
        recent_tags,
        from,
        to: request.to.clone(),
        commit_count: lines.len(),
        counts,
        current,
        next,
    })
}

/// The highest-ranked release tags with their commit metadata.
#[instrument(skip(repo, settings))]
pub fn recent_tags<G: GitQuery + ?Sized>(
    repo: &G,
    settings: &ReviewSettings,
) -> ReviewResult<Vec<TagInfo>> {
    let ranked = rank_tags(
        repo.tags()?,
        &settings.tag_prefix,
        settings.tag_order,
        settings.tag_limit,
    );
    debug!(count = ranked.len(), order = %settings.tag_order, "ranked release tags");

    ranked
        .into_iter()
        .map(|tag| {
            let id = repo.resolve_commit(&format!("refs/tags/{tag}"))?;
            let commit = repo.commit_data(&id)?;
            Ok::<_, ReviewError>(TagInfo { tag, commit })
        })
        .collect()
}

/// The latest tag, described relative to the newest tagged commit.
fn current_tag<G: GitQuery + ?Sized>(repo: &G) -> ReviewResult<String> {
    let commit = repo.latest_tagged_commit()?.ok_or(ReviewError::NoTags)?;
    Ok(repo.describe(&commit)?)
}

/// `<from>..<to>`, leaving `to` empty so git falls back to `HEAD`.
fn commit_range(from: &str, to: Option<&str>) -> String {
    format!("{from}..{}", to.unwrap_or_default())
}
