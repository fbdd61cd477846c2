//! Elasticsearch cluster health parser.

use serde::Deserialize;

use crate::parsing::{HealthLevel, ParseError, ParseResult};

pub const SERVICE_NAME: &str = "elasticsearch";

/// Subset of the `_cluster/health` response we care about.
///
/// Absent and `null` fields both read as empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ClusterHealth {
    cluster_name: Option<String>,
    status: Option<String>,
}

/// Map a cluster status colour onto a health level.
///
/// Unknown or missing colours fall through to `Healthy`.
fn level_for_status(status: &str) -> HealthLevel {
    match status {
        "green" => HealthLevel::Healthy,
        "yellow" => HealthLevel::Degraded,
        "red" => HealthLevel::Unhealthy,
        _ => HealthLevel::default(),
    }
}

pub(crate) fn parse_cluster_health(body: &[u8]) -> Result<ParseResult, ParseError> {
    let health: Option<ClusterHealth> =
        serde_json::from_slice(body).map_err(|source| ParseError::Decode {
            service: SERVICE_NAME,
            source,
        })?;
    let health = health.unwrap_or_default();

    Ok(ParseResult {
        level: level_for_status(health.status.as_deref().unwrap_or_default()),
        service_id: health.cluster_name.unwrap_or_default(),
    })
}
