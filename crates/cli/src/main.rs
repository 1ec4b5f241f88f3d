// FILE: crates/cli/src/main.rs

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use scrobblecast_config::{ConfigManager, CONFIG_FILE_NAME, CREDENTIALS_FILE_NAME};
use std::path::PathBuf;

mod commands;
mod prompt;

use commands::RunOptions;

fn build_cli() -> Command {
    Command::new("scrobblecast")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Posts your Last.fm scrobbles to Mastodon and cleans up old ones")
        .arg(
            Arg::new("config-dir")
                .long("config-dir")
                .value_name("DIR")
                .help("Directory holding config.toml and app_credentials.toml")
                .value_parser(clap::value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Session config file (overrides --config-dir)")
                .value_parser(clap::value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("credentials")
                .long("credentials")
                .value_name("FILE")
                .help("App credential file (overrides --config-dir)")
                .value_parser(clap::value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log debug output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(max_count_arg())
        .arg(no_sweep_arg())
        .subcommand(
            Command::new("run")
                .about("Delete old now-playing posts, then post new scrobbles (default)")
                .arg(max_count_arg())
                .arg(no_sweep_arg()),
        )
        .subcommand(
            Command::new("sync")
                .about("Post new scrobbles only")
                .arg(max_count_arg()),
        )
        .subcommand(Command::new("sweep").about("Delete old now-playing posts only"))
        .subcommand(Command::new("login").about("Log into the Mastodon instance and store a new token"))
        .subcommand(Command::new("status").about("Show config locations and sync progress"))
}

fn max_count_arg() -> Arg {
    Arg::new("max-count")
        .short('n')
        .long("max-count")
        .value_name("N")
        .help("Maximum posts to publish in this run")
        .value_parser(clap::value_parser!(usize))
}

fn no_sweep_arg() -> Arg {
    Arg::new("no-sweep")
        .long("no-sweep")
        .help("Skip deleting old posts")
        .action(ArgAction::SetTrue)
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

/// Resolves the config handle from the path flags
fn config_manager(matches: &ArgMatches) -> Result<ConfigManager> {
    let config = matches.get_one::<PathBuf>("config").cloned();
    let credentials = matches.get_one::<PathBuf>("credentials").cloned();
    let dir = match matches.get_one::<PathBuf>("config-dir") {
        Some(dir) => dir.clone(),
        None if config.is_some() && credentials.is_some() => PathBuf::new(),
        None => ConfigManager::default_config_dir().context("Failed to locate config directory")?,
    };

    Ok(ConfigManager::with_paths(
        config.unwrap_or_else(|| dir.join(CONFIG_FILE_NAME)),
        credentials.unwrap_or_else(|| dir.join(CREDENTIALS_FILE_NAME)),
    ))
}

fn run_options(top: &ArgMatches, sub: Option<&ArgMatches>) -> RunOptions {
    let max_count = sub
        .and_then(|m| m.try_get_one::<usize>("max-count").ok().flatten())
        .or_else(|| top.get_one::<usize>("max-count"))
        .copied();
    let no_sweep = sub
        .and_then(|m| m.try_get_one::<bool>("no-sweep").ok().flatten())
        .copied()
        .unwrap_or(false)
        || top.get_flag("no-sweep");

    RunOptions {
        max_count,
        sweep: !no_sweep,
    }
}

fn main() -> Result<()> {
    let matches = build_cli().get_matches();
    init_logging(matches.get_flag("verbose"));
    let manager = config_manager(&matches)?;

    match matches.subcommand() {
        Some(("run", sub_matches)) => {
            commands::run(&manager, &run_options(&matches, Some(sub_matches)))
        }
        Some(("sync", sub_matches)) => {
            let options = RunOptions {
                sweep: false,
                ..run_options(&matches, Some(sub_matches))
            };
            commands::run(&manager, &options)
        }
        Some(("sweep", _)) => commands::sweep(&manager),
        Some(("login", _)) => commands::login(&manager),
        Some(("status", _)) => commands::status(&manager),
        _ => commands::run(&manager, &run_options(&matches, None)),
    }
}
