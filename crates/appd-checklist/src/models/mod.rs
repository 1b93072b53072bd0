use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// Saved client profile, in the same shape the dashboard keeps in browser storage.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientProfile {
    pub id: String,
    pub name: String,
    pub controller_url: String,
    #[serde(default)]
    pub account_name: String,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default)]
    pub teams_webhook_url: String,
}

impl ClientProfile {
    pub fn data_request(&self) -> DataRequest {
        DataRequest {
            controller_url: Some(self.controller_url.clone()),
            account_name: Some(self.account_name.clone()),
            client_name: Some(self.client_name.clone()),
            client_secret: Some(self.client_secret.clone()),
        }
    }

    pub fn matches(&self, key: &str) -> bool {
        self.id == key || self.name.eq_ignore_ascii_case(key.trim())
    }
}

/// Body of `POST /api/appdynamics-data`. Every field is optional on the wire so
/// that a missing one surfaces as a configuration error instead of a decode error.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataRequest {
    #[serde(default)]
    pub controller_url: Option<String>,
    #[serde(default)]
    pub account_name: Option<String>,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Application {
    pub id: i64,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthViolation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Status as reported by the controller's REST API; `status` wins when both are set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time_in_millis: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time_in_millis: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HealthViolation {
    pub fn effective_status(&self) -> Option<&str> {
        self.status.as_deref().or(self.incident_status.as_deref())
    }

    /// `OPEN`, `CONTINUE` and `CONTINUING` mean the violation has not ended yet.
    pub fn is_active(&self) -> bool {
        self.effective_status().is_some_and(|s| {
            let s = s.trim();
            ["OPEN", "CONTINUE", "CONTINUING"]
                .iter()
                .any(|active| s.eq_ignore_ascii_case(active))
        })
    }

    pub fn ended_after(&self, cutoff: DateTime<Utc>) -> bool {
        self.end_time_in_millis
            .is_some_and(|end| end > cutoff.timestamp_millis())
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationGroup {
    pub app_name: String,
    pub violations: Vec<HealthViolation>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Server {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Database {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub applications: Vec<Application>,
    pub health_violations: Vec<ViolationGroup>,
    pub servers: Vec<Server>,
    pub databases: Vec<Database>,
    pub timestamp: DateTime<Utc>,
}
