//! Cache refresh reporting.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Outcome counts of one bulk cache refresh.
///
/// `succeeded + failed == total` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RefreshReport {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl RefreshReport {
    pub(crate) fn record(&mut self, ok: bool) {
        self.total += 1;
        if ok {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }

    /// True when every user was written to the cache.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.failed == 0
    }
}

/// Response body of a manually triggered refresh.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CacheRefreshResponse {
    pub message: String,
    #[serde(flatten)]
    pub report: RefreshReport,
}

impl From<RefreshReport> for CacheRefreshResponse {
    fn from(report: RefreshReport) -> Self {
        Self {
            message: "User cache refresh complete".to_string(),
            report,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_keeps_counts_consistent() {
        let mut report = RefreshReport::default();
        report.record(true);
        report.record(false);
        report.record(true);

        assert_eq!(report.total, 3);
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed, 1);
        assert!(!report.is_complete());
    }

    #[test]
    fn test_response_flattens_report() {
        let json = serde_json::to_value(CacheRefreshResponse::from(RefreshReport {
            total: 2,
            succeeded: 2,
            failed: 0,
        }))
        .unwrap();

        assert_eq!(json["message"], "User cache refresh complete");
        assert_eq!(json["succeeded"], 2);
    }
}
