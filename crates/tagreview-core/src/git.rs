//! Git query boundary for release reviews.
//!
//! [`GitQuery`] lists the read/fetch operations a review needs. [`GitCli`]
//! implements them by shelling out to `git -C <path>`, so the user's remotes,
//! credentials and config apply unchanged.

use std::ffi::OsStr;
use std::path::PathBuf;
use std::process::Command;

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument};

/// Errors from git operations.
#[derive(Error, Debug)]
pub enum GitError {
    /// The `git` executable could not be found on `PATH`.
    #[error("git executable not found: {0}")]
    NotInstalled(#[from] which::Error),

    /// Failed to execute the `git` command.
    #[error("failed to run git: {0}")]
    Exec(#[from] std::io::Error),

    /// `git` returned a non-zero exit code.
    #[error("git {command} failed: {stderr}")]
    Command {
        /// The git subcommand that failed (e.g., "describe").
        command: String,
        /// Captured stderr.
        stderr: String,
    },

    /// The path is not a git working copy.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was opened.
        path: Utf8PathBuf,
    },

    /// A query produced output that could not be interpreted.
    #[error("unexpected output from git {command}: {output:?}")]
    UnexpectedOutput {
        /// The git subcommand.
        command: String,
        /// The raw output.
        output: String,
    },
}

/// Result alias for git operations.
pub type GitResult<T> = Result<T, GitError>;

/// Metadata of the commit a tag points to.
///
/// The committer is deliberately absent; only the author is reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitData {
    /// Full commit id.
    pub id: String,
    /// First line of the commit message.
    pub title: String,
    /// Commit message body (everything after the title).
    pub message: String,
    /// Author name.
    pub author: String,
    /// Author date, strict ISO 8601.
    pub timestamp: String,
}

/// Read-only (plus fetch) queries against a repository.
///
/// The review pipeline depends only on this trait; tests substitute an
/// in-memory implementation.
pub trait GitQuery {
    /// Fetch updates from the default remote.
    fn fetch(&self) -> GitResult<()>;

    /// All tag names, in git's listing order.
    fn tags(&self) -> GitResult<Vec<String>>;

    /// Resolve a revision to the id of the commit it points to.
    fn resolve_commit(&self, rev: &str) -> GitResult<String>;

    /// Title, message, author and timestamp of a commit.
    fn commit_data(&self, commit: &str) -> GitResult<CommitData>;

    /// `git log --pretty=oneline` lines for a range such as `v1.0.0..HEAD`.
    fn log_oneline(&self, range: &str) -> GitResult<Vec<String>>;

    /// The most recently created tagged commit, if any tag exists.
    fn latest_tagged_commit(&self) -> GitResult<Option<String>>;

    /// Describe a revision by its nearest tag (`git describe --tags`).
    fn describe(&self, rev: &str) -> GitResult<String>;
}

/// A git working copy queried through the `git` binary.
#[derive(Debug, Clone)]
pub struct GitCli {
    git: PathBuf,
    root: Utf8PathBuf,
}

impl GitCli {
    /// Open the repository at `path`.
    ///
    /// Fails with [`GitError::NotARepo`] if the path does not exist or is not
    /// inside a git working copy.
    #[instrument]
    pub fn open(path: &Utf8Path) -> GitResult<Self> {
        let git = which::which("git")?;
        if !path.is_dir() {
            return Err(GitError::NotARepo {
                path: path.to_path_buf(),
            });
        }

        let repo = Self {
            git,
            root: path.to_path_buf(),
        };
        match repo.run(["rev-parse", "--git-dir"]) {
            Ok(git_dir) => {
                debug!(git_dir = git_dir.trim(), "opened repository");
                Ok(repo)
            }
            Err(GitError::Command { .. } | GitError::NotARepo { .. }) => Err(GitError::NotARepo {
                path: path.to_path_buf(),
            }),
            Err(e) => Err(e),
        }
    }

    /// The working copy path this handle was opened with.
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Run a git command in the repository and return its stdout.
    fn run<I, S>(&self, args: I) -> GitResult<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<S> = args.into_iter().collect();
        let output = Command::new(&self.git)
            .arg("-C")
            .arg(self.root.as_std_path())
            .args(&args)
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

            if stderr.contains("not a git repository") {
                return Err(GitError::NotARepo {
                    path: self.root.clone(),
                });
            }

            Err(GitError::Command {
                command: args
                    .first()
                    .map(|a| a.as_ref().to_string_lossy().to_string())
                    .unwrap_or_default(),
                stderr,
            })
        }
    }
}

impl GitQuery for GitCli {
    #[instrument(skip(self), fields(root = %self.root))]
    fn fetch(&self) -> GitResult<()> {
        self.run(["fetch", "--quiet"])?;
        debug!("fetched remote updates");
        Ok(())
    }

    #[instrument(skip(self))]
    fn tags(&self) -> GitResult<Vec<String>> {
        let output = self.run(["tag", "--list"])?;
        let tags: Vec<String> = non_empty_lines(&output).map(str::to_string).collect();
        debug!(count = tags.len(), "listed tags");
        Ok(tags)
    }

    #[instrument(skip(self))]
    fn resolve_commit(&self, rev: &str) -> GitResult<String> {
        let spec = format!("{rev}^{{commit}}");
        let output = self.run(["rev-parse", "--verify", "--quiet", spec.as_str()])?;
        first_line("rev-parse", &output).map(str::to_string)
    }

    #[instrument(skip(self))]
    fn commit_data(&self, commit: &str) -> GitResult<CommitData> {
        let output = self.run([
            "log",
            "-1",
            "--format=%H%x00%s%x00%b%x00%an%x00%aI",
            commit,
        ])?;
        parse_commit_data(&output)
    }

    #[instrument(skip(self))]
    fn log_oneline(&self, range: &str) -> GitResult<Vec<String>> {
        let output = self.run(["log", "--pretty=oneline", range])?;
        let lines: Vec<String> = non_empty_lines(&output).map(str::to_string).collect();
        debug!(count = lines.len(), "commits in range");
        Ok(lines)
    }

    #[instrument(skip(self))]
    fn latest_tagged_commit(&self) -> GitResult<Option<String>> {
        let output = self.run(["rev-list", "--tags", "--max-count=1"])?;
        let commit = non_empty_lines(&output).next().map(str::to_string);
        debug!(?commit, "latest tagged commit");
        Ok(commit)
    }

    #[instrument(skip(self))]
    fn describe(&self, rev: &str) -> GitResult<String> {
        let output = self.run(["describe", "--tags", rev])?;
        first_line("describe", &output).map(str::to_string)
    }
}

fn non_empty_lines(output: &str) -> impl Iterator<Item = &str> {
    output.lines().map(str::trim_end).filter(|l| !l.is_empty())
}

fn first_line<'a>(command: &str, output: &'a str) -> GitResult<&'a str> {
    non_empty_lines(output)
        .next()
        .map(str::trim)
        .ok_or_else(|| GitError::UnexpectedOutput {
            command: command.to_string(),
            output: output.to_string(),
        })
}

/// Parse the NUL-separated output of the `commit_data` log format.
fn parse_commit_data(output: &str) -> GitResult<CommitData> {
    let fields: Vec<&str> = output.trim_end_matches('\n').split('\0').collect();
    let [id, title, message, author, timestamp] = fields.as_slice() else {
        return Err(GitError::UnexpectedOutput {
            command: "log".to_string(),
            output: output.to_string(),
        });
    };

    Ok(CommitData {
        id: id.trim().to_string(),
        title: title.trim().to_string(),
        message: message.trim().to_string(),
        author: author.trim().to_string(),
        timestamp: timestamp.trim().to_string(),
    })
}
