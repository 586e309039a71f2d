//! Request tokens for last-issued-wins async lookups.
//!
//! Every lookup gets a fresh [`RequestToken`].  A completion is applied only
//! if its token is still the latest one issued; anything older is stale and
//! dropped.  Nothing is cancelled at the supplier, the answer is just ignored.

/// Opaque, monotonically increasing marker for one issued lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    /// The raw sequence number, for logging.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Issues tokens and answers whether a token is still current.
#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: u64,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a token that supersedes every earlier one.
    pub fn issue(&mut self) -> RequestToken {
        self.latest += 1;
        RequestToken(self.latest)
    }

    /// Whether `token` is the most recently issued token.
    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.latest
    }

    /// Make every outstanding token stale without issuing a new request.
    pub fn invalidate(&mut self) {
        self.latest += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_token_supersedes_older() {
        let mut tracker = RequestTracker::new();
        let a = tracker.issue();
        assert!(tracker.is_current(a));
        let b = tracker.issue();
        assert!(b > a);
        assert!(!tracker.is_current(a));
        assert!(tracker.is_current(b));
    }

    #[test]
    fn invalidate_stales_everything() {
        let mut tracker = RequestTracker::new();
        let a = tracker.issue();
        tracker.invalidate();
        assert!(!tracker.is_current(a));
        let b = tracker.issue();
        assert!(tracker.is_current(b));
    }
}
