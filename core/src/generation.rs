//! Request generations.
//!
//! A view hands out a [`RequestToken`] for every fetch it starts and applies
//! the response only while that token is still the latest one. Starting a
//! newer fetch, or cancelling the tracker when the view goes away, makes every
//! older token stale, so late responses are dropped instead of overwriting
//! newer data.

use std::cell::Cell;
use std::rc::Rc;

/// Identifies one started request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

/// Shared generation counter of one view. Clones share the same counter.
#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    latest: Rc<Cell<u64>>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request, superseding every earlier token.
    pub fn begin(&self) -> RequestToken {
        let next = self.latest.get() + 1;
        self.latest.set(next);
        RequestToken(next)
    }

    /// Whether a response for `token` should still be applied.
    pub fn is_current(&self, token: RequestToken) -> bool {
        self.latest.get() == token.0
    }

    /// Invalidate every outstanding token without starting a request.
    pub fn cancel(&self) {
        self.latest.set(self.latest.get() + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_token_wins() {
        let tracker = RequestTracker::new();
        let first = tracker.begin();
        assert!(tracker.is_current(first));

        let second = tracker.begin();
        assert!(!tracker.is_current(first));
        assert!(tracker.is_current(second));
    }

    #[test]
    fn test_out_of_order_resolution() {
        // depth 1 requested, then depth 3; depth 1 answers last
        let tracker = RequestTracker::new();
        let shallow = tracker.begin();
        let deep = tracker.begin();

        let mut applied = Vec::new();
        for (token, label) in [(deep, "depth 3"), (shallow, "depth 1")] {
            if tracker.is_current(token) {
                applied.push(label);
            }
        }
        assert_eq!(applied, vec!["depth 3"]);
    }

    #[test]
    fn test_cancel_discards_everything() {
        let tracker = RequestTracker::new();
        let token = tracker.begin();
        let clone = tracker.clone();
        clone.cancel();
        assert!(!tracker.is_current(token));
    }
}
