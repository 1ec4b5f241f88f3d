// FILE: crates/cli/src/commands.rs

use crate::prompt::TerminalPrompt;
use anyhow::{bail, Context, Result};
use chrono::DateTime;
use console::style;
use scrobblecast_config::{AppCredentials, Config, ConfigManager, MAX_POSTS_PER_RUN};
use scrobblecast_sinks::{Authorizer, MastodonSink, PasswordLogin, PostSink};
use scrobblecast_sources::{EventSource, LastFmSource};
use scrobblecast_sync_engine::{
    RetentionSweeper, SweepReport, SyncConfig, SyncEngine, SyncReport,
};

#[cfg(test)]
mod tests;

/// Per-invocation overrides from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub max_count: Option<usize>,
    pub sweep: bool,
}

/// Sweep (unless disabled), then sync
pub fn run(manager: &ConfigManager, options: &RunOptions) -> Result<()> {
    let config = load_config(manager)?;
    let credentials = load_credentials(manager)?;
    let sink = connect_timeline(manager, &config, &credentials)?;

    if options.sweep && config.sweep.enabled {
        let report = sweep_with(&config, &sink)?;
        print_sweep_report(&report);
    } else {
        log::debug!("Sweep skipped");
    }

    let source = connect_history(&config, &credentials)?;
    let report = sync_with(manager, &config, options.max_count, &source, &sink)?;
    print_sync_report(&report);
    Ok(())
}

/// Delete old now-playing posts only
pub fn sweep(manager: &ConfigManager) -> Result<()> {
    let config = load_config(manager)?;
    let credentials = load_credentials(manager)?;
    let sink = connect_timeline(manager, &config, &credentials)?;

    let report = sweep_with(&config, &sink)?;
    print_sweep_report(&report);
    Ok(())
}

/// Acquire and store a fresh access token, replacing any existing one
pub fn login(manager: &ConfigManager) -> Result<()> {
    let credentials = load_credentials(manager)?;
    let token = terminal_login(&credentials)
        .acquire_token()
        .context("Login failed")?;
    manager
        .store_access_token(&token)
        .context("Failed to store access token")?;

    println!(
        "{} Logged into {}",
        style("✓").green().bold(),
        credentials.mastodon.instance
    );
    Ok(())
}

/// Print config locations and sync progress
pub fn status(manager: &ConfigManager) -> Result<()> {
    let config = load_config(manager)?;
    print!("{}", render_status(manager, &config));
    Ok(())
}

fn load_config(manager: &ConfigManager) -> Result<Config> {
    manager.load_with_env_overrides().with_context(|| {
        format!(
            "Failed to load config from {}",
            manager.config_path().display()
        )
    })
}

fn load_credentials(manager: &ConfigManager) -> Result<AppCredentials> {
    manager.load_credentials().with_context(|| {
        format!(
            "Failed to load app credentials from {}",
            manager.credentials_path().display()
        )
    })
}

fn terminal_login(credentials: &AppCredentials) -> PasswordLogin<TerminalPrompt> {
    PasswordLogin::new(
        credentials.mastodon.instance.as_str(),
        credentials.mastodon.client_key.as_str(),
        credentials.mastodon.client_secret.as_str(),
        TerminalPrompt::new(),
    )
}

fn connect_timeline(
    manager: &ConfigManager,
    config: &Config,
    credentials: &AppCredentials,
) -> Result<MastodonSink> {
    let token = ensure_access_token(manager, config, &terminal_login(credentials))?;
    MastodonSink::new(credentials.mastodon.instance.as_str(), token)
        .context("Failed to set up Mastodon client")
}

fn connect_history(config: &Config, credentials: &AppCredentials) -> Result<LastFmSource> {
    let user = config.require_lastfm_user()?;
    LastFmSource::new(credentials.lastfm.api_key.as_str(), user)
        .context("Failed to set up Last.fm client")
}

/// Returns the stored token, logging in first if there is none
pub fn ensure_access_token(
    manager: &ConfigManager,
    config: &Config,
    authorizer: &dyn Authorizer,
) -> Result<String> {
    if let Some(token) = config.mastodon.token() {
        return Ok(token.to_string());
    }

    log::info!("No access token stored, logging in");
    let token = authorizer.acquire_token().context("Login failed")?;
    manager
        .store_access_token(&token)
        .context("Failed to store access token")?;
    Ok(token)
}

/// Builds the engine settings, applying a one-off `--max-count`
pub fn sync_config(config: &Config, max_count: Option<usize>) -> Result<SyncConfig> {
    let max_count = max_count.unwrap_or(config.sync.max_count);
    if max_count == 0 || max_count > MAX_POSTS_PER_RUN {
        bail!(
            "max count must be between 1 and {}, got {}",
            MAX_POSTS_PER_RUN,
            max_count
        );
    }

    Ok(SyncConfig {
        max_count,
        visibility: config.sync.visibility,
        template: config
            .sync
            .post_template()
            .context("Invalid post template")?,
    })
}

pub fn sync_with(
    manager: &ConfigManager,
    config: &Config,
    max_count: Option<usize>,
    source: &dyn EventSource,
    sink: &dyn PostSink,
) -> Result<SyncReport> {
    let engine = SyncEngine::new(sync_config(config, max_count)?);
    let mut store = manager.progress_store();
    engine.run(source, sink, &mut store).context("Sync failed")
}

pub fn sweep_with(config: &Config, sink: &dyn PostSink) -> Result<SweepReport> {
    RetentionSweeper::new(config.sweep.policy())
        .sweep(sink)
        .context("Sweep failed")
}

fn print_sync_report(report: &SyncReport) {
    if report.is_noop() {
        println!("Nothing new to post");
        return;
    }

    println!(
        "{} Posted {} scrobble(s), watermark {} -> {}",
        style("✓").green().bold(),
        style(report.published.len()).bold().cyan(),
        report.starting_watermark,
        report.watermark
    );
    if !report.rejected.is_empty() {
        println!(
            "  {} {} rejected and skipped",
            style("!").yellow().bold(),
            report.rejected.len()
        );
    }
    if report.pending > 0 {
        println!("  {} left for the next run", report.pending);
    }
}

fn print_sweep_report(report: &SweepReport) {
    println!(
        "{} Deleted {} old post(s) out of {} scanned",
        style("✓").green().bold(),
        style(report.deleted.len()).bold().cyan(),
        report.scanned
    );
    for failure in &report.failures {
        println!(
            "  {} could not delete {}: {}",
            style("!").yellow().bold(),
            failure.post,
            failure.error
        );
    }
}

pub fn render_status(manager: &ConfigManager, config: &Config) -> String {
    let watermark = config.lastfm.last_timestamp;
    let last_sync = DateTime::from_timestamp(watermark.value(), 0)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let present = |yes: bool| if yes { "yes" } else { "no" };

    let mut out = String::new();
    out.push_str(&format!("{}\n", style("scrobblecast status").bold().cyan()));
    out.push_str(&format!("{}\n", "=".repeat(40)));
    out.push_str(&format!(
        "Config:       {} (exists: {})\n",
        manager.config_path().display(),
        present(manager.config_path().exists())
    ));
    out.push_str(&format!(
        "Credentials:  {} (exists: {})\n",
        manager.credentials_path().display(),
        present(manager.credentials_path().exists())
    ));
    let user = if config.lastfm.user.is_empty() {
        "(not set)"
    } else {
        config.lastfm.user.as_str()
    };
    out.push_str(&format!("Last.fm user: {}\n", user));
    out.push_str(&format!("Watermark:    {} ({})\n", watermark, last_sync));
    out.push_str(&format!(
        "Logged in:    {}\n",
        present(config.mastodon.token().is_some())
    ));
    out.push_str(&format!(
        "Posting:      up to {} per run, {}\n",
        config.sync.max_count, config.sync.visibility
    ));
    out.push_str(&format!(
        "Sweep:        {} (older than {} days)\n",
        if config.sweep.enabled { "on" } else { "off" },
        config.sweep.min_age_days
    ));
    out
}
