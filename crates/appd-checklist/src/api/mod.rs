use axum::{extract::State, Json};
use tracing::{error, info, Instrument};
use uuid::Uuid;

use crate::{
    aggregator::aggregate,
    controller::{Credentials, HttpController},
    error::ApiError,
    models::{DataRequest, Snapshot},
    relay::{send_to_teams, RelayRequest},
    report::{build_prompt, GeminiClient, ReportRequest, ReportResponse},
    AppState,
};

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok", "service": "appd-checklist"}))
}

pub async fn appdynamics_data(
    State(state): State<AppState>,
    Json(req): Json<DataRequest>,
) -> Result<Json<Snapshot>, ApiError> {
    let creds = Credentials::from_request(&req)?;
    let span = tracing::info_span!(
        "aggregate",
        request_id = %Uuid::new_v4(),
        client_id = %creds.client_id,
    );

    let api = HttpController::new(state.http.clone(), creds.controller_url.clone());
    let snapshot = aggregate(&api, &creds, &state.policy)
        .instrument(span)
        .await
        .inspect_err(|e| error!(error = %e, "error fetching AppDynamics data"))?;

    Ok(Json(snapshot))
}

pub async fn generate_report(
    State(state): State<AppState>,
    Json(req): Json<ReportRequest>,
) -> Result<Json<ReportResponse>, ApiError> {
    if req.client_name.trim().is_empty() {
        return Err(ApiError::missing("clientName"));
    }
    if req.data.is_null() {
        return Err(ApiError::missing("data"));
    }

    let client = GeminiClient::from_config(state.http.clone(), &state.config)?;
    let prompt = build_prompt(&req.client_name, &req.data);
    let report = client
        .generate(&prompt)
        .instrument(tracing::info_span!("report", request_id = %Uuid::new_v4()))
        .await
        .inspect_err(|e| error!(error = %e, client = %req.client_name, "report generation failed"))?;

    Ok(Json(ReportResponse { report }))
}

pub async fn send_teams(
    State(state): State<AppState>,
    Json(req): Json<RelayRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let webhook_url = req.webhook_url.as_deref().unwrap_or_default();
    send_to_teams(&state.http, webhook_url, &req.message)
        .await
        .inspect_err(|e| error!(error = %e, "Teams relay failed"))?;

    info!("Teams relay acknowledged");
    Ok(Json(serde_json::json!({"success": true})))
}
