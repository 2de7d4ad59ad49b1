//! Mergeable health reports

use serde::{Deserialize, Serialize};

/// Accumulator of zero or more error strings; empty means healthy
///
/// Only constructible through `empty`, `error` and `merge`, which keep the
/// errors sorted. Incoming JSON goes through `HealthResponse` instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    errors: Vec<String>,
}

impl HealthReport {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            errors: vec![message.into()],
        }
    }

    /// Combine two reports
    ///
    /// Errors are kept sorted, so the result depends only on the multiset of
    /// errors and never on the order in which partial reports arrived.
    #[must_use]
    pub fn merge(mut self, other: HealthReport) -> Self {
        self.errors.extend(other.errors);
        self.errors.sort();
        self
    }

    pub fn is_healthy(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }
}

impl FromIterator<HealthReport> for HealthReport {
    fn from_iter<I: IntoIterator<Item = HealthReport>>(iter: I) -> Self {
        iter.into_iter().fold(HealthReport::empty(), HealthReport::merge)
    }
}

/// Body of `GET /health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub errors: Vec<String>,
}

impl From<HealthReport> for HealthResponse {
    fn from(report: HealthReport) -> Self {
        Self {
            errors: report.into_errors(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn report_strategy() -> impl Strategy<Value = HealthReport> {
        prop::collection::vec("[a-z ]{0,12}", 0..4).prop_map(|errors| {
            errors
                .into_iter()
                .map(HealthReport::error)
                .collect::<HealthReport>()
        })
    }

    #[test]
    fn test_empty_is_healthy() {
        assert!(HealthReport::empty().is_healthy());
        assert!(!HealthReport::error("store down").is_healthy());
    }

    #[test]
    fn test_only_failing_subscriber_appears() {
        let a = HealthReport::empty();
        let b = HealthReport::error("failed to get report for b");
        let c = HealthReport::empty();

        let abc = a.clone().merge(b.clone()).merge(c.clone());
        let cba = c.merge(b.clone()).merge(a);
        assert_eq!(abc, cba);
        assert_eq!(abc.errors(), b.errors());
    }

    #[test]
    fn test_response_serializes_errors_array() {
        let body = serde_json::to_value(HealthResponse::from(HealthReport::empty())).unwrap();
        assert_eq!(body, serde_json::json!({ "errors": [] }));
    }

    proptest! {
        #[test]
        fn prop_empty_is_identity(r in report_strategy()) {
            prop_assert_eq!(HealthReport::empty().merge(r.clone()), r.clone());
            prop_assert_eq!(r.clone().merge(HealthReport::empty()), r);
        }

        #[test]
        fn prop_errors_stay_sorted(a in report_strategy(), b in report_strategy()) {
            let merged = a.merge(b);
            prop_assert!(merged.errors().windows(2).all(|pair| pair[0] <= pair[1]));
        }

        #[test]
        fn prop_merge_commutes(a in report_strategy(), b in report_strategy()) {
            prop_assert_eq!(a.clone().merge(b.clone()), b.merge(a));
        }

        #[test]
        fn prop_merge_associates(
            a in report_strategy(),
            b in report_strategy(),
            c in report_strategy(),
        ) {
            prop_assert_eq!(
                a.clone().merge(b.clone()).merge(c.clone()),
                a.merge(b.merge(c))
            );
        }
    }
}
