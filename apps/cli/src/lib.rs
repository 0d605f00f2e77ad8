pub mod adapter;
pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod study;

use std::sync::{Arc, Mutex};

use clap::Parser;
use study_core::runtime::{spawn_session, SessionConfig};
use study_core::types::{DisplayFilter, Order, StudySettings};
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::adapter::{RepositoryHistory, TerminalAdapter};
use crate::api::HttpWordSource;
use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::db::{OutcomeRepository, SettingsRepository, SqliteRepository};

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Command::Study { unit_id } => run_study(&config, unit_id).await,
        Command::Units => list_units(&config).await,
        Command::Settings { filter, order } => update_settings(&config, filter, order),
        Command::History { clear } => show_history(&config, clear),
    }
}

fn open_repository(config: &Config) -> anyhow::Result<SqliteRepository> {
    if let Some(parent) = config.db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    tracing::debug!(path = %config.db_path.display(), "opening database");
    Ok(SqliteRepository::open(&config.db_path)?)
}

async fn run_study(config: &Config, unit_id: i64) -> anyhow::Result<()> {
    let api_url = config.require_api_url()?;
    let repository = Arc::new(Mutex::new(open_repository(config)?));
    let settings = repository
        .lock()
        .expect("repository lock")
        .get_study_settings()?;

    tracing::info!(
        unit_id,
        filter = settings.filter.as_str(),
        order = settings.order.as_str(),
        "starting study session"
    );

    let adapter = TerminalAdapter::new(std::io::stdout(), Arc::clone(&repository));
    let view = adapter.view();
    let history = RepositoryHistory::new(Arc::clone(&repository));
    let session_config = SessionConfig {
        auth_token: config.auth_token.clone(),
        unit_id,
        settings,
        fetch_timeout: config.fetch_timeout,
    };
    let handle = spawn_session(
        session_config,
        Arc::new(HttpWordSource::new(api_url)),
        adapter,
        history,
    );

    study::run_input_loop(
        handle,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        view,
        repository,
        settings,
    )
    .await?;
    Ok(())
}

async fn list_units(config: &Config) -> anyhow::Result<()> {
    let source = HttpWordSource::new(config.require_api_url()?);
    let units = source.fetch_units(&config.auth_token).await?;
    if units.is_empty() {
        println!("No units available.");
    }
    for unit in units {
        println!("{:>4}  {}", unit.id, unit.title);
    }
    Ok(())
}

fn update_settings(
    config: &Config,
    filter: Option<DisplayFilter>,
    order: Option<Order>,
) -> anyhow::Result<()> {
    let repo = open_repository(config)?;
    let current = repo.get_study_settings()?;

    if filter.is_some() || order.is_some() {
        let updated = StudySettings {
            filter: filter.unwrap_or(current.filter),
            order: order.unwrap_or(current.order),
        };
        repo.save_study_settings(&updated)?;
        tracing::info!(
            filter = updated.filter.as_str(),
            order = updated.order.as_str(),
            "study settings saved"
        );
        print_settings(&updated);
    } else {
        print_settings(&current);
    }
    Ok(())
}

fn print_settings(settings: &StudySettings) {
    println!("filter: {}", settings.filter.as_str());
    println!("order:  {}", settings.order.as_str());
}

fn show_history(config: &Config, clear: bool) -> anyhow::Result<()> {
    let repo = open_repository(config)?;
    if clear {
        let removed = repo.clear_outcomes()?;
        println!("Cleared {removed} recorded words.");
        return Ok(());
    }

    let counts = repo.outcome_counts()?;
    println!("remembered:     {}", counts.remembered);
    println!("not remembered: {}", counts.not_remembered);
    Ok(())
}
