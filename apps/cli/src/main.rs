//! # brew: Coffee Shop Counter
//!
//! Command line front end over `brew-core` and `brew-db`.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  argv ──► clap (cli.rs)                                                 │
//! │             │                                                           │
//! │             ▼                                                           │
//! │  AppConfig::load      defaults → brew.toml → BREW_* → --database        │
//! │             │                                                           │
//! │             ▼                                                           │
//! │  logging::init        EnvFilter, stderr                                 │
//! │             │                                                           │
//! │             ▼                                                           │
//! │  Database::new  ──►  commands::dispatch  ──►  Output (text | --json)    │
//! │                              │                                          │
//! │                              └── error ──► report::classify ──► exit    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Results go to stdout. Errors go to stderr as text, or to stdout as a
//! JSON object when `--json` is set.

mod cli;
mod commands;
mod config;
mod logging;
mod output;
mod report;

use std::process::ExitCode;

use anyhow::Context;
use brew_db::{Database, DbConfig};
use clap::Parser;
use tracing::debug;

use crate::cli::Cli;
use crate::config::AppConfig;
use crate::output::Formatter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let json = cli.json;

    match run(cli).await {
        Ok(rendered) => {
            println!("{rendered}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            let failure = report::classify(&err);
            debug!(code = failure.code, error = ?err, "Command failed");
            if json {
                println!("{}", failure.render(true));
            } else {
                eprintln!("{}", failure.render(false));
            }
            ExitCode::from(failure.exit_code)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<String> {
    let config = AppConfig::load(cli.config.as_deref(), cli.database.as_deref())
        .context("failed to load configuration")?;

    logging::init(&config.log_level, config.log_format)?;
    debug!(?config, "Configuration loaded");

    let db = Database::new(
        DbConfig::new(config.database_path.clone()).max_connections(config.max_connections),
    )
    .await?;
    debug!(path = %config.database_path.display(), "Database ready");

    let fmt = Formatter::new(config.currency_symbol.clone());
    let result = commands::dispatch(&db.ingredients(), &db.recipes(), &fmt, cli.command).await;
    db.close().await;

    result?.render(cli.json)
}
