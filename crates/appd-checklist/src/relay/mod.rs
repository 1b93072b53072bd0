use tracing::info;

use crate::{error::ApiError, security::outbound_url};

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub webhook_url: Option<String>,
}

/// Posts a plain-text message to a Teams incoming webhook.
pub async fn send_to_teams(
    http: &reqwest::Client,
    webhook_url: &str,
    message: &str,
) -> Result<(), ApiError> {
    if webhook_url.trim().is_empty() {
        return Err(ApiError::Config("Teams webhook URL not provided".into()));
    }
    let url = outbound_url(webhook_url, "webhookUrl")?;

    let resp = http
        .post(&url)
        .json(&serde_json::json!({ "text": message }))
        .send()
        .await
        .map_err(|e| ApiError::Upstream(format!("Teams API error: {e}")))?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ApiError::Upstream(format!(
            "Teams API error: {} {body}",
            status.as_u16()
        )));
    }

    info!(chars = message.len(), "message relayed to Teams");
    Ok(())
}
