//! tagreview CLI
#![deny(unsafe_code)]

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Parser;
use tagreview::Cli;
use tagreview::commands::review::{self, ReviewOptions};
use tagreview_core::config::ConfigLoader;
use tagreview_core::review::ReviewRequest;
use tracing::debug;

mod observability;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli.color.apply();

    let path = Utf8PathBuf::try_from(cli.path.clone()).map_err(|e| {
        anyhow::anyhow!(
            "repository path is not valid UTF-8: {}",
            e.into_path_buf().display()
        )
    })?;

    let mut loader = ConfigLoader::new().with_project_search(&path);
    if let Some(ref config_path) = cli.config {
        let config_path = Utf8PathBuf::try_from(config_path.clone()).map_err(|e| {
            anyhow::anyhow!(
                "config path is not valid UTF-8: {}",
                e.into_path_buf().display()
            )
        })?;
        loader = loader.with_file(&config_path);
    }
    let config = loader.load().context("failed to load configuration")?;

    let obs_config = observability::ObservabilityConfig::from_env_with_overrides(
        config
            .log_dir
            .as_ref()
            .map(|dir| dir.as_std_path().to_path_buf()),
    );
    let env_filter = observability::env_filter(cli.quiet, cli.verbose, config.log_level.as_str());
    let _guard = observability::init_observability(&obs_config, env_filter)
        .context("failed to initialize logging")?;

    debug!(
        verbose = cli.verbose,
        quiet = cli.quiet,
        json = cli.json,
        color = ?cli.color,
        "CLI initialized"
    );

    let mut settings = config.review_settings();
    if cli.no_fetch {
        settings.fetch = false;
    }
    if let Some(order) = cli.tag_order {
        settings.tag_order = order;
    }

    let options = ReviewOptions {
        request: ReviewRequest {
            from: cli.from,
            to: cli.to,
        },
        settings,
        json: cli.json,
    };

    let result = review::cmd_review(&path, &options);
    if let Err(ref err) = result {
        tracing::error!(error = %err, "fatal error");
    }
    result
}
