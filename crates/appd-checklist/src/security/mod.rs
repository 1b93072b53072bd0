use url::Url;

use crate::error::ApiError;

/// Checks a user-supplied URL before anything is sent to it. Only `http` and
/// `https` with a host are accepted.
pub fn outbound_url(raw: &str, field: &str) -> Result<String, ApiError> {
    let trimmed = raw.trim();
    let parsed = Url::parse(trimmed)
        .map_err(|e| ApiError::Config(format!("invalid {field}: {e}")))?;

    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(ApiError::Config(format!(
            "invalid {field}: expected an http(s) URL"
        )));
    }

    Ok(trimmed.to_string())
}

/// Same as [`outbound_url`], with trailing slashes dropped so paths can be appended.
pub fn outbound_base_url(raw: &str, field: &str) -> Result<String, ApiError> {
    outbound_url(raw, field).map(|url| url.trim_end_matches('/').to_string())
}

/// Names containing the marker, in any case, belong to non-production environments.
pub fn is_non_production(name: &str, marker: &str) -> bool {
    !marker.is_empty() && name.to_uppercase().contains(&marker.to_uppercase())
}
