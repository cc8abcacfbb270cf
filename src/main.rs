// git-branch-archiver: Git branch export and backup tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Config --> Logging --> run_archive_command
//! ```

use std::process::ExitCode;

use git_branch_archiver::cli::{self, Cli};
use git_branch_archiver::cmd::archive::run_archive_command;
use git_branch_archiver::config::loader::ConfigLoader;
use git_branch_archiver::config::{Config, DEFAULT_CONFIG_FILE, ENV_PREFIX};
use git_branch_archiver::error::Result;
use git_branch_archiver::logging::{LogConfig, init_logging};
use tracing::debug;

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> ExitCode {
    let cli = cli::parse();

    let loader = match build_config_loader(&cli) {
        Ok(loader) => loader,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    let loaded_files = loader.format_loaded_files();
    let config = match loader.build() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let log_config = build_log_config(&cli, &config);
    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    for line in &loaded_files {
        debug!(file = %line, "config file");
    }

    match run_archive_command(&cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn build_config_loader(cli: &Cli) -> Result<ConfigLoader> {
    let mut loader = ConfigLoader::new().add_toml_file_optional(DEFAULT_CONFIG_FILE);
    for path in &cli.global.config {
        loader = loader.add_toml_file(path);
    }
    loader = loader.with_env_prefix(ENV_PREFIX);

    for (key, value) in cli.to_config_overrides() {
        loader = loader.set(key, value)?;
    }
    Ok(loader)
}

fn build_log_config(cli: &Cli, config: &Config) -> LogConfig {
    LogConfig::builder()
        .with_console_level(config.global.log_level.with_verbose(cli.verbose))
        .maybe_with_log_file(config.global.log_file.clone())
        .build()
}
