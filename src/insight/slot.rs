use super::client::{Insight, InsightError};
use tracing::warn;

/// Insight text state, kept apart from the store
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InsightSlot {
    #[default]
    Idle,
    Pending {
        revision: u64,
    },
    Ready {
        revision: u64,
        text: String,
    },
    Failed {
        revision: u64,
        message: String,
    },
}

impl InsightSlot {
    /// Mark a request for `revision` as in flight
    pub fn begin(&mut self, revision: u64) {
        *self = InsightSlot::Pending { revision };
    }

    /// Record a finished request.
    ///
    /// The result is dropped (returns false) unless the slot is pending for
    /// exactly `requested_revision` and the store is still at that revision.
    pub fn complete(
        &mut self,
        requested_revision: u64,
        current_revision: u64,
        result: Result<Insight, InsightError>,
    ) -> bool {
        if requested_revision != current_revision {
            warn!(
                requested_revision,
                current_revision, "discarding stale insight response"
            );
            return false;
        }
        match self {
            InsightSlot::Pending { revision } if *revision == requested_revision => {}
            InsightSlot::Pending { revision } => {
                warn!(requested_revision, pending = *revision, "discarding superseded insight response");
                return false;
            }
            _ => {
                warn!(requested_revision, "discarding insight response with no pending request");
                return false;
            }
        }

        *self = match result {
            Ok(insight) => InsightSlot::Ready {
                revision: requested_revision,
                text: insight.text,
            },
            Err(e) => InsightSlot::Failed {
                revision: requested_revision,
                message: e.to_string(),
            },
        };
        true
    }

    /// Current text, if it still matches `current_revision`
    pub fn text_for(&self, current_revision: u64) -> Option<&str> {
        match self {
            InsightSlot::Ready { revision, text } if *revision == current_revision => Some(text),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, InsightSlot::Pending { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insight(text: &str, revision: u64) -> Result<Insight, InsightError> {
        Ok(Insight {
            text: text.to_string(),
            revision,
        })
    }

    #[test]
    fn test_default_is_idle() {
        assert_eq!(InsightSlot::default(), InsightSlot::Idle);
    }

    #[test]
    fn test_complete_current_revision() {
        let mut slot = InsightSlot::default();
        slot.begin(3);
        assert!(slot.is_pending());

        assert!(slot.complete(3, 3, insight("summary", 3)));
        assert_eq!(slot.text_for(3), Some("summary"));
        assert_eq!(slot.text_for(4), None);
    }

    #[test]
    fn test_stale_response_discarded() {
        let mut slot = InsightSlot::default();
        slot.begin(3);

        // Store mutated while the request was in flight
        assert!(!slot.complete(3, 4, insight("old", 3)));
        assert_eq!(slot, InsightSlot::Pending { revision: 3 });
    }

    #[test]
    fn test_superseded_request_discarded() {
        let mut slot = InsightSlot::default();
        slot.begin(3);
        slot.begin(5);

        assert!(!slot.complete(3, 3, insight("old", 3)));
        assert!(slot.complete(5, 5, insight("new", 5)));
        assert_eq!(slot.text_for(5), Some("new"));
    }

    #[test]
    fn test_completion_without_begin_discarded() {
        let mut slot = InsightSlot::default();
        assert!(!slot.complete(2, 2, insight("unrequested", 2)));
        assert_eq!(slot, InsightSlot::Idle);
    }

    #[test]
    fn test_duplicate_completion_discarded() {
        let mut slot = InsightSlot::default();
        slot.begin(2);
        assert!(slot.complete(2, 2, insight("first", 2)));
        assert!(!slot.complete(2, 2, insight("second", 2)));
        assert_eq!(slot.text_for(2), Some("first"));

        let mut failed = InsightSlot::default();
        failed.begin(2);
        assert!(failed.complete(2, 2, Err(InsightError::NotConfigured)));
        assert!(!failed.complete(2, 2, insight("late", 2)));
        assert!(matches!(failed, InsightSlot::Failed { .. }));
    }

    #[test]
    fn test_failure_recorded() {
        let mut slot = InsightSlot::default();
        slot.begin(1);
        assert!(slot.complete(1, 1, Err(InsightError::NotConfigured)));
        match slot {
            InsightSlot::Failed { revision, message } => {
                assert_eq!(revision, 1);
                assert!(message.contains("not configured"));
            }
            other => panic!("unexpected slot: {:?}", other),
        }
    }
}
