use anyhow::Context;
use serde::de::DeserializeOwned;

use crate::{
    error::ApiError,
    models::{Application, DataRequest, Database, HealthViolation, Server},
    security::outbound_base_url,
};

/// Validated credentials for one controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub controller_url: String,
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    pub fn from_request(req: &DataRequest) -> Result<Self, ApiError> {
        let controller_url = required(&req.controller_url, "controllerUrl")?;
        let account_name = required(&req.account_name, "accountName")?;
        let client_name = required(&req.client_name, "clientName")?;
        let client_secret = required(&req.client_secret, "clientSecret")?;

        Ok(Self {
            controller_url: outbound_base_url(controller_url, "controllerUrl")?,
            client_id: normalize_client_id(client_name, account_name),
            client_secret: client_secret.to_string(),
        })
    }
}

fn required<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str, ApiError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::missing(field))
}

/// API clients are addressed as `<clientName>@<accountName>`.
pub fn normalize_client_id(client_name: &str, account_name: &str) -> String {
    let client_name = client_name.trim();
    if client_name.contains('@') {
        client_name.to_string()
    } else {
        format!("{client_name}@{}", account_name.trim())
    }
}

/// The controller calls the aggregator depends on.
#[async_trait::async_trait]
pub trait ControllerApi: Send + Sync {
    async fn access_token(&self, creds: &Credentials) -> Result<String, ApiError>;
    async fn applications(&self, token: &str) -> Result<Vec<Application>, ApiError>;
    async fn health_violations(
        &self,
        token: &str,
        app_id: i64,
        lookback_mins: u64,
    ) -> anyhow::Result<Vec<HealthViolation>>;
    async fn servers(&self, token: &str) -> anyhow::Result<Vec<Server>>;
    async fn databases(&self, token: &str) -> anyhow::Result<Vec<Database>>;
}

pub struct HttpController {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, serde::Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
}

impl HttpController {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/controller{path}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(&self, token: &str, path: &str) -> anyhow::Result<T> {
        let resp = self
            .http
            .get(self.url(path))
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .with_context(|| format!("request to {path} failed"))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("{path} returned {status}: {body}");
        }
        resp.json::<T>()
            .await
            .with_context(|| format!("invalid JSON from {path}"))
    }
}

#[async_trait::async_trait]
impl ControllerApi for HttpController {
    async fn access_token(&self, creds: &Credentials) -> Result<String, ApiError> {
        let resp = self
            .http
            .post(self.url("/api/oauth/access_token"))
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", creds.client_id.as_str()),
                ("client_secret", creds.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ApiError::Auth(e.to_string()))?;

        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            tracing::error!(%status, body = %body, "token endpoint rejected credentials");
            return Err(ApiError::Auth(format!("{} - {body}", status.as_u16())));
        }

        serde_json::from_str::<TokenResponse>(&body)
            .ok()
            .and_then(|t| t.access_token)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::Auth(format!("{} - no access_token in response", status.as_u16())))
    }

    async fn applications(&self, token: &str) -> Result<Vec<Application>, ApiError> {
        self.get_json(token, "/rest/applications?output=JSON")
            .await
            .map_err(|e| ApiError::Upstream(format!("AppDynamics applications API failed: {e:#}")))
    }

    async fn health_violations(
        &self,
        token: &str,
        app_id: i64,
        lookback_mins: u64,
    ) -> anyhow::Result<Vec<HealthViolation>> {
        let path = format!(
            "/rest/applications/{app_id}/problems/healthrule-violations?time-range-type=BEFORE_NOW&duration-in-mins={lookback_mins}&output=JSON"
        );
        self.get_json(token, &path).await
    }

    async fn servers(&self, token: &str) -> anyhow::Result<Vec<Server>> {
        self.get_json(token, "/rest/markethistory/servers?output=JSON").await
    }

    async fn databases(&self, token: &str) -> anyhow::Result<Vec<Database>> {
        self.get_json(token, "/rest/databases?output=JSON").await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use axum::{
        extract::{Path, Query},
        http::{HeaderMap, StatusCode},
        routing::{get, post},
        Form, Json, Router,
    };

    use super::*;

    async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn creds(base: &str) -> Credentials {
        Credentials {
            controller_url: base.to_string(),
            client_id: "checklist@bankx".into(),
            client_secret: "s3cret".into(),
        }
    }

    #[test]
    fn client_id_gets_account_suffix_only_once() {
        assert_eq!(normalize_client_id(" checklist ", " bankx "), "checklist@bankx");
        assert_eq!(normalize_client_id("checklist@other", "bankx"), "checklist@other");
    }

    #[test]
    fn credentials_reject_blank_fields_in_order() {
        let mut req = DataRequest {
            controller_url: Some("https://bankx.saas.appdynamics.com/".into()),
            account_name: Some("bankx".into()),
            client_name: Some("checklist".into()),
            client_secret: Some("   ".into()),
        };
        match Credentials::from_request(&req) {
            Err(ApiError::Config(msg)) => assert!(msg.contains("clientSecret")),
            other => panic!("expected config error, got {other:?}"),
        }

        req.client_secret = Some(" s3cret ".into());
        let creds = Credentials::from_request(&req).unwrap();
        assert_eq!(creds.controller_url, "https://bankx.saas.appdynamics.com");
        assert_eq!(creds.client_id, "checklist@bankx");
        assert_eq!(creds.client_secret, "s3cret");

        req.controller_url = None;
        match Credentials::from_request(&req) {
            Err(ApiError::Config(msg)) => assert!(msg.contains("controllerUrl")),
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn token_exchange_posts_client_credentials_form() {
        let app = Router::new().route(
            "/controller/api/oauth/access_token",
            post(|Form(form): Form<HashMap<String, String>>| async move {
                if form.get("grant_type").map(String::as_str) == Some("client_credentials")
                    && form.get("client_id").map(String::as_str) == Some("checklist@bankx")
                    && form.get("client_secret").map(String::as_str) == Some("s3cret")
                {
                    (StatusCode::OK, Json(serde_json::json!({"access_token": "tok-1", "expires_in": 300})))
                } else {
                    (StatusCode::UNAUTHORIZED, Json(serde_json::json!({"error": "invalid_client"})))
                }
            }),
        );
        let base = spawn(app).await;
        let api = HttpController::new(reqwest::Client::new(), base.clone());

        assert_eq!(api.access_token(&creds(&base)).await.unwrap(), "tok-1");

        let mut bad = creds(&base);
        bad.client_secret = "wrong".into();
        match api.access_token(&bad).await {
            Err(ApiError::Auth(msg)) => {
                assert!(msg.starts_with("401"));
                assert!(msg.contains("invalid_client"));
            }
            other => panic!("expected auth error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn listings_send_bearer_and_query_window() {
        let app = Router::new()
            .route(
                "/controller/rest/applications",
                get(|headers: HeaderMap| async move {
                    let auth = headers.get("authorization").and_then(|v| v.to_str().ok());
                    if auth == Some("Bearer tok-1") {
                        (StatusCode::OK, Json(serde_json::json!([{"id": 5, "name": "Core-PROD", "description": ""}])))
                    } else {
                        (StatusCode::UNAUTHORIZED, Json(serde_json::json!([])))
                    }
                }),
            )
            .route(
                "/controller/rest/applications/:id/problems/healthrule-violations",
                get(|Path(id): Path<i64>, Query(q): Query<HashMap<String, String>>| async move {
                    Json(serde_json::json!([{
                        "id": id,
                        "name": q.get("duration-in-mins").cloned().unwrap_or_default(),
                        "incidentStatus": q.get("time-range-type").cloned().unwrap_or_default(),
                    }]))
                }),
            )
            .route(
                "/controller/rest/databases",
                get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "db collector offline") }),
            );
        let base = spawn(app).await;
        let api = HttpController::new(reqwest::Client::new(), base);

        let apps = api.applications("tok-1").await.unwrap();
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].name, "Core-PROD");

        match api.applications("stale").await {
            Err(ApiError::Upstream(msg)) => assert!(msg.contains("401")),
            other => panic!("expected upstream error, got {other:?}"),
        }

        let violations = api.health_violations("tok-1", 5, 10_080).await.unwrap();
        assert_eq!(violations[0].id, Some(5));
        assert_eq!(violations[0].name.as_deref(), Some("10080"));
        assert_eq!(violations[0].incident_status.as_deref(), Some("BEFORE_NOW"));

        let err = api.databases("tok-1").await.unwrap_err();
        assert!(format!("{err:#}").contains("db collector offline"));
    }
}
