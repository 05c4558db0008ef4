//! Review command: fetch, classify commits since the last release, propose a version.

use anyhow::Context;
use camino::Utf8Path;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::{OwoColorize, Stream};
use tracing::{debug, instrument};

use tagreview_core::classify::{Category, CommitCounts};
use tagreview_core::config::ReviewSettings;
use tagreview_core::git::{GitCli, GitQuery, GitResult};
use tagreview_core::review::{ReviewReport, ReviewRequest, TagInfo, run_review};

use crate::render::Table;

/// Options for one review run, after config and flags are merged.
#[derive(Debug, Clone)]
pub struct ReviewOptions {
    /// What to review.
    pub request: ReviewRequest,
    /// Effective settings.
    pub settings: ReviewSettings,
    /// Print JSON instead of tables.
    pub json: bool,
}

/// Run the review against the repository at `path` and print the report.
#[instrument(name = "cmd_review", skip_all, fields(%path, json_output = options.json))]
pub fn cmd_review(path: &Utf8Path, options: &ReviewOptions) -> anyhow::Result<()> {
    debug!(settings = ?options.settings, "executing review command");

    let repo = GitCli::open(path).context("failed to open repository")?;
    debug!(root = %repo.root(), "repository opened");

    let report = if options.json {
        run_review(&repo, &options.request, &options.settings)
    } else {
        run_review(&FetchSpinner(&repo), &options.request, &options.settings)
    }
    .context("review failed")?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_report(&report, options.settings.tag_limit));
    }

    Ok(())
}

/// Render the full text report.
///
/// The tags heading names the configured limit, not the number of rows.
pub fn render_report(report: &ReviewReport, tag_limit: usize) -> String {
    let mut out = String::new();

    if let Some(tags) = &report.recent_tags {
        out.push('\n');
        out.push_str(&heading(&format!("Last {tag_limit} Tags:")));
        out.push_str(&tags_table(tags).render());
    }

    out.push('\n');
    out.push_str(&heading("Summary:"));
    out.push_str(&summary_table(&report.counts).render());

    out.push('\n');
    out.push_str(&heading(&format!("Current: {}", report.current)));
    out.push_str(&heading(&format!("Next: {}", report.next)));
    out
}

fn heading(text: &str) -> String {
    format!(
        "{}\n",
        text.if_supports_color(Stream::Stdout, |t| t.green())
    )
}

fn tags_table(tags: &[TagInfo]) -> Table {
    let mut table = Table::new([
        "Tag",
        "Commit ID",
        "Commit Title",
        "Commit Message",
        "Author",
        "Timestamp",
    ]);
    for info in tags {
        table.row([
            info.tag.as_str(),
            info.commit.id.as_str(),
            info.commit.title.as_str(),
            info.commit.message.as_str(),
            info.commit.author.as_str(),
            info.commit.timestamp.as_str(),
        ]);
    }
    table
}

fn summary_table(counts: &CommitCounts) -> Table {
    let mut table = Table::new(Category::ALL.map(Category::heading));
    table.row(Category::ALL.map(|c| counts.get(c).to_string()));
    table
}

/// Shows a spinner on stderr while the network fetch runs.
struct FetchSpinner<'a, G: GitQuery>(&'a G);

impl<G: GitQuery> GitQuery for FetchSpinner<'_, G> {
    fn fetch(&self) -> GitResult<()> {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message("Fetching remote updates...");
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        let result = self.0.fetch();
        spinner.finish_and_clear();
        result
    }

    fn tags(&self) -> GitResult<Vec<String>> {
        self.0.tags()
    }

    fn resolve_commit(&self, rev: &str) -> GitResult<String> {
        self.0.resolve_commit(rev)
    }

    fn commit_data(&self, commit: &str) -> GitResult<tagreview_core::git::CommitData> {
        self.0.commit_data(commit)
    }

    fn log_oneline(&self, range: &str) -> GitResult<Vec<String>> {
        self.0.log_oneline(range)
    }

    fn latest_tagged_commit(&self) -> GitResult<Option<String>> {
        self.0.latest_tagged_commit()
    }

    fn describe(&self, rev: &str) -> GitResult<String> {
        self.0.describe(rev)
    }
}
