//! Readiness report for the assistant's collaborators.

use crate::types::IndexStats;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Degraded,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceHealth {
    pub knowledge_base: bool,
    pub ai_service: bool,
    pub web_search: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub timestamp: DateTime<Utc>,
    pub status: HealthStatus,
    pub services: ServiceHealth,
    pub errors: Vec<String>,
    pub index: IndexStats,
}

/// Build a report from the current index and provider configuration.
///
/// No errors is `ok`; errors with a usable model is `degraded`; anything
/// else is `error`. A disabled web search is reported but is not an error.
pub fn check_health(index: IndexStats, ai_configured: bool, web_enabled: bool) -> HealthReport {
    let services = ServiceHealth {
        knowledge_base: index.chunks > 0,
        ai_service: ai_configured,
        web_search: web_enabled,
    };

    let mut errors = Vec::new();
    if !services.knowledge_base {
        errors.push("Knowledge base not loaded".to_string());
    }
    if !services.ai_service {
        errors.push("AI provider not configured".to_string());
    }

    let status = if errors.is_empty() {
        HealthStatus::Ok
    } else if services.ai_service {
        HealthStatus::Degraded
    } else {
        HealthStatus::Error
    };

    HealthReport {
        timestamp: Utc::now(),
        status,
        services,
        errors,
        index,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(chunks: usize) -> IndexStats {
        IndexStats {
            generation: 1,
            documents: usize::from(chunks > 0),
            chunks,
            skipped: 0,
            loaded_at: Utc::now(),
        }
    }

    #[test]
    fn test_all_services_ok() {
        let report = check_health(stats(12), true, false);
        assert_eq!(report.status, HealthStatus::Ok);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_empty_index_is_degraded() {
        let report = check_health(stats(0), true, true);
        assert_eq!(report.status, HealthStatus::Degraded);
        assert_eq!(report.errors, vec!["Knowledge base not loaded"]);
    }

    #[test]
    fn test_missing_provider_is_error() {
        let report = check_health(stats(12), false, true);
        assert_eq!(report.status, HealthStatus::Error);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["services"]["aiService"], false);
        assert_eq!(json["index"]["chunks"], 12);
    }
}
