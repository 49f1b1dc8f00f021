use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use utoipa::ToSchema;

/// Overall health of the service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Error,
}

/// Health of a single indicator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorStatus {
    Up,
    Down,
}

/// State reported by one indicator (`application`, `database`, ...).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct IndicatorState {
    pub status: IndicatorStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl IndicatorState {
    pub fn up() -> Self {
        Self {
            status: IndicatorStatus::Up,
            uptime: None,
            message: None,
        }
    }

    pub fn down(message: impl Into<String>) -> Self {
        Self {
            status: IndicatorStatus::Down,
            uptime: None,
            message: Some(message.into()),
        }
    }

    pub fn is_up(&self) -> bool {
        self.status == IndicatorStatus::Up
    }
}

/// Health check body.
///
/// `info` holds the indicators that are up, `error` the ones that are down and `details`
/// all of them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub info: BTreeMap<String, IndicatorState>,
    pub error: BTreeMap<String, IndicatorState>,
    pub details: BTreeMap<String, IndicatorState>,
}

impl HealthReport {
    pub fn is_ok(&self) -> bool {
        self.status == HealthStatus::Ok
    }
}

/// Health service shared by the API surfaces.
///
/// Remembers when it was created so the `application` indicator can report uptime.
#[derive(Clone, Debug)]
pub struct HealthService {
    started: Instant,
}

impl HealthService {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn uptime(&self) -> Duration {
        self.started.elapsed()
    }

    /// The always-up `application` indicator, carrying the current uptime.
    pub fn application(&self) -> IndicatorState {
        IndicatorState {
            uptime: Some(format_uptime(self.uptime())),
            ..IndicatorState::up()
        }
    }

    /// Build a report from the `application` indicator plus `indicators`.
    ///
    /// The report is `ok` only if every indicator is up.
    pub fn check<I, N>(&self, indicators: I) -> HealthReport
    where
        I: IntoIterator<Item = (N, IndicatorState)>,
        N: Into<String>,
    {
        let mut info = BTreeMap::new();
        let mut error = BTreeMap::new();
        let mut details = BTreeMap::new();

        let all = std::iter::once(("application".to_string(), self.application()))
            .chain(indicators.into_iter().map(|(name, state)| (name.into(), state)));

        for (name, state) in all {
            if state.is_up() {
                info.insert(name.clone(), state.clone());
            } else {
                error.insert(name.clone(), state.clone());
            }
            details.insert(name, state);
        }

        let status = if error.is_empty() {
            HealthStatus::Ok
        } else {
            HealthStatus::Error
        };

        HealthReport {
            status,
            info,
            error,
            details,
        }
    }
}

impl Default for HealthService {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a duration as `HH:MM:SS`. Hours are not wrapped at 24.
pub fn format_uptime(uptime: Duration) -> String {
    let secs = uptime.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uptime_is_zero_padded() {
        assert_eq!(format_uptime(Duration::from_secs(0)), "00:00:00");
        assert_eq!(format_uptime(Duration::from_secs(65)), "00:01:05");
        assert_eq!(format_uptime(Duration::from_secs(3 * 3600 + 7)), "03:00:07");
        assert_eq!(format_uptime(Duration::from_secs(100 * 3600)), "100:00:00");
    }

    #[test]
    fn all_up_reports_ok() {
        let report = HealthService::new().check([("database", IndicatorState::up())]);

        assert!(report.is_ok());
        assert!(report.error.is_empty());
        assert_eq!(report.info.len(), 2);
        assert_eq!(report.details, report.info);
        assert!(report.info["application"].uptime.is_some());
    }

    #[test]
    fn down_indicator_moves_to_error() {
        let report =
            HealthService::new().check([("database", IndicatorState::down("ping failed"))]);

        assert_eq!(report.status, HealthStatus::Error);
        assert!(report.info.contains_key("application"));
        assert_eq!(
            report.error["database"].message.as_deref(),
            Some("ping failed")
        );
        assert_eq!(report.details.len(), 2);
    }

    #[test]
    fn report_serialises_in_terminus_form() {
        let report = HealthService::new().check([("database", IndicatorState::up())]);
        let json = serde_json::to_value(&report).expect("serialise");

        assert_eq!(json["status"], "ok");
        assert_eq!(json["info"]["application"]["status"], "up");
        assert_eq!(json["info"]["database"], serde_json::json!({ "status": "up" }));
        assert_eq!(json["error"], serde_json::json!({}));
    }
}
