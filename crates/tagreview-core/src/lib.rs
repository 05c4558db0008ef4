//! Core library for tagreview.
//!
//! Reviews the commits since a release tag, counts them by conventional-commit
//! keyword and proposes the next version. The `tagreview` CLI is a thin layer
//! over [`review::run_review`].
//!
//! # Modules
//!
//! - [`classify`] - Keyword classification of commit lines
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//! - [`git`] - Git query boundary and the `git` CLI implementation
//! - [`review`] - The review pipeline
//! - [`tags`] - Release tag ranking
//! - [`version`] - Version parsing and next-version computation
//!
//! # Quick Start
//!
//! ```no_run
//! use camino::Utf8Path;
//! use tagreview_core::git::GitCli;
//! use tagreview_core::review::{ReviewRequest, run_review};
//! use tagreview_core::ConfigLoader;
//!
//! let path = Utf8Path::new(".");
//! let config = ConfigLoader::new().with_project_search(path).load()?;
//! let repo = GitCli::open(path)?;
//! let report = run_review(&repo, &ReviewRequest::default(), &config.review_settings())?;
//! println!("{} -> {}", report.current, report.next);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
#![deny(unsafe_code)]

pub mod classify;

pub mod config;

pub mod error;

pub mod git;

pub mod review;

pub mod tags;

pub mod version;

pub use config::{Config, ConfigLoader, LogLevel, ReviewSettings};

pub use error::{ConfigError, ConfigResult};

// Re-export semver so downstream crates don't need a direct dependency.
pub use semver;
