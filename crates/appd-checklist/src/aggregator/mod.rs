use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use crate::{
    config::AppConfig,
    controller::{ControllerApi, Credentials},
    error::ApiError,
    models::{HealthViolation, Snapshot, ViolationGroup},
    security::is_non_production,
};

/// Filtering knobs for one aggregation run.
#[derive(Debug, Clone)]
pub struct AggregationPolicy {
    pub excluded_marker: String,
    pub lookback_mins: u64,
    pub relevance_window: Duration,
}

impl AggregationPolicy {
    pub fn from_config(cfg: &AppConfig) -> anyhow::Result<Self> {
        Ok(Self {
            excluded_marker: cfg.excluded_marker.clone(),
            lookback_mins: cfg.violation_lookback_mins,
            relevance_window: cfg.relevance_window()?,
        })
    }

    fn excludes(&self, name: Option<&str>) -> bool {
        name.is_some_and(|n| is_non_production(n, &self.excluded_marker))
    }
}

impl Default for AggregationPolicy {
    fn default() -> Self {
        let cfg = AppConfig::default();
        Self {
            excluded_marker: cfg.excluded_marker,
            lookback_mins: cfg.violation_lookback_mins,
            relevance_window: Duration::hours(cfg.relevance_window_hours),
        }
    }
}

/// Active violations always survive; terminal ones only if they ended inside the window.
pub fn relevant_violations(
    violations: Vec<HealthViolation>,
    now: DateTime<Utc>,
    window: Duration,
) -> Vec<HealthViolation> {
    // A window reaching past the earliest representable instant keeps every ended violation.
    let cutoff = now.checked_sub_signed(window).unwrap_or(DateTime::<Utc>::MIN_UTC);
    violations
        .into_iter()
        .filter(|v| v.is_active() || v.ended_after(cutoff))
        .collect()
}

/// Builds a snapshot for one controller. Only the token exchange and the
/// application listing are fatal; everything after them degrades to empty.
pub async fn aggregate(
    api: &dyn ControllerApi,
    creds: &Credentials,
    policy: &AggregationPolicy,
) -> Result<Snapshot, ApiError> {
    let token = api.access_token(creds).await?;
    let applications = api.applications(&token).await?;

    let mut health_violations = Vec::new();
    for app in &applications {
        if policy.excludes(Some(app.name.as_str())) {
            continue;
        }

        let fetched = match api
            .health_violations(&token, app.id, policy.lookback_mins)
            .await
        {
            Ok(v) => v,
            Err(e) => {
                warn!(app = %app.name, app_id = app.id, error = %format!("{e:#}"), "skipping violations for application");
                continue;
            }
        };

        let relevant = relevant_violations(fetched, Utc::now(), policy.relevance_window);
        if !relevant.is_empty() {
            health_violations.push(ViolationGroup {
                app_name: app.name.clone(),
                violations: relevant,
            });
        }
    }

    let servers = api.servers(&token).await.unwrap_or_else(|e| {
        warn!(error = %format!("{e:#}"), "servers API failed");
        Vec::new()
    });
    let databases = api.databases(&token).await.unwrap_or_else(|e| {
        warn!(error = %format!("{e:#}"), "databases API failed");
        Vec::new()
    });

    let snapshot = Snapshot {
        applications: applications
            .into_iter()
            .filter(|a| !policy.excludes(Some(a.name.as_str())))
            .collect(),
        health_violations,
        servers: servers
            .into_iter()
            .filter(|s| !policy.excludes(s.name.as_deref()))
            .collect(),
        databases: databases
            .into_iter()
            .filter(|d| !policy.excludes(d.name.as_deref()))
            .collect(),
        timestamp: Utc::now(),
    };

    info!(
        client_id = %creds.client_id,
        applications = snapshot.applications.len(),
        violation_groups = snapshot.health_violations.len(),
        servers = snapshot.servers.len(),
        databases = snapshot.databases.len(),
        "aggregation completed"
    );
    Ok(snapshot)
}
