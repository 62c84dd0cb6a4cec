use reqwest::Client;
use timing::RawSnapshot;
use tracing::info;
use url::Url;

use crate::error::AppError;

/// Machine endpoint the AC server exposes next to its human pages.
pub const LEADERBOARD_PATH: &str = "/api/live-timings/leaderboard.json";

const LIVE_TIMING_SEGMENT: &str = "/live-timing";

/// Rewrites a human-facing server URL to the telemetry endpoint.
///
/// URLs already pointing at the endpoint pass through untouched; a
/// trailing `/live-timing` page segment is stripped before the endpoint
/// path is appended. Query and fragment survive the rewrite.
pub fn transform_url(raw: &str) -> String {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return String::new();
    }

    if trimmed.contains(LEADERBOARD_PATH) {
        return trimmed.to_string();
    }

    match Url::parse(trimmed) {
        Ok(mut url) => {
            url.set_path(&rewrite_path(url.path()));
            url.to_string()
        }
        // not an absolute URL, rewrite it as a plain string
        Err(_) => rewrite_path(trimmed),
    }
}

fn rewrite_path(path: &str) -> String {
    let mut path = path.trim_end_matches('/');

    if let Some(stripped) = path.strip_suffix(LIVE_TIMING_SEGMENT) {
        path = stripped;
    }

    format!("{path}{LEADERBOARD_PATH}")
}

/// One bounded-timeout pull of the raw snapshot. Timeouts, non-success
/// statuses and unparseable bodies all surface as [`AppError::UpstreamFetch`].
pub async fn fetch_snapshot(client: &Client, api_url: &str) -> Result<RawSnapshot, AppError> {
    info!("Fetching {api_url}");

    let response = client.get(api_url).send().await?.error_for_status()?;
    let snapshot = response.json::<RawSnapshot>().await?;

    Ok(snapshot)
}
