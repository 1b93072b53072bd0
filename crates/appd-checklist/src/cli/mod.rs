use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::{
    aggregator::{aggregate, AggregationPolicy},
    config::AppConfig,
    controller::{Credentials, HttpController},
    error::ApiError,
    models::ClientProfile,
    relay::send_to_teams,
    report::{build_prompt, GeminiClient},
};

#[derive(Debug, Args)]
pub struct RunArgs {
    /// JSON file holding the saved client list (same format as the dashboard export)
    #[arg(long, env = "APPD_PROFILES")]
    pub profiles: PathBuf,

    /// Client id or display name
    #[arg(long)]
    pub client: String,

    /// Relay the generated checklist to the client's Teams webhook
    #[arg(long, default_value_t = false)]
    pub send: bool,
}

pub fn load_profiles(path: &Path) -> anyhow::Result<Vec<ClientProfile>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid profiles in {}", path.display()))
}

pub fn select_profile<'a>(profiles: &'a [ClientProfile], key: &str) -> anyhow::Result<&'a ClientProfile> {
    profiles
        .iter()
        .find(|p| p.matches(key))
        .ok_or_else(|| anyhow::anyhow!("no client profile matches '{key}'"))
}

/// Aggregates, generates and prints one checklist without the dashboard.
pub async fn run(args: RunArgs, cfg: &AppConfig) -> anyhow::Result<()> {
    let profiles = load_profiles(&args.profiles)?;
    let profile = select_profile(&profiles, &args.client)?;
    if args.send && profile.teams_webhook_url.trim().is_empty() {
        return Err(ApiError::Config(format!(
            "client '{}' has no Teams webhook configured",
            profile.name
        ))
        .into());
    }

    let http = cfg.http_client()?;
    let creds = Credentials::from_request(&profile.data_request())?;
    let api = HttpController::new(http.clone(), creds.controller_url.clone());
    let snapshot = aggregate(&api, &creds, &AggregationPolicy::from_config(cfg)?).await?;

    let data = serde_json::to_value(&snapshot).context("failed to encode snapshot")?;
    let report = GeminiClient::from_config(http.clone(), cfg)?
        .generate(&build_prompt(&profile.name, &data))
        .await?;
    println!("{report}");

    if args.send {
        send_to_teams(&http, &profile.teams_webhook_url, &report).await?;
        info!(client = %profile.name, "checklist sent to Teams");
    }
    Ok(())
}
