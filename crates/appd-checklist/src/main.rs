mod aggregator;
mod api;
mod cli;
mod config;
mod controller;
mod error;
mod models;
mod relay;
mod report;
mod security;
mod ui;

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use clap::{Parser, Subcommand};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::{
    aggregator::AggregationPolicy,
    api::{appdynamics_data, generate_report, health, send_teams},
    config::AppConfig,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub policy: Arc<AggregationPolicy>,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let http = config.http_client()?;
        Ok(Self {
            policy: Arc::new(AggregationPolicy::from_config(&config)?),
            config: Arc::new(config),
            http,
        })
    }
}

#[derive(Parser)]
#[command(name = "appd-checklist", version, about = "AppDynamics daily checklist dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the dashboard and its API (default)
    Serve,
    /// Generate one checklist from a saved profile and print it
    Run(cli::RunArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Cli::parse();
    let config = AppConfig::load()?;

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Run(run_args) => cli::run(run_args, &config).await,
    }
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("invalid host/port")?;
    let app = router(AppState::new(config)?);

    info!(%addr, "appd-checklist listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/appdynamics-data", post(appdynamics_data))
        .route("/api/report", post(generate_report))
        .route("/api/send-teams", post(send_teams))
        .route("/", get(ui::index))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();
}
