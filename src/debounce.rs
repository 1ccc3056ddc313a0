use std::time::Duration;

use crate::epoch::{Epoch, RequestToken};

pub const SEARCH_QUIET_PERIOD: Duration = Duration::from_millis(400);

/// Holds the most recent non-blank query until the input goes quiet.
///
/// Every keystroke supersedes the previous timer; only the ticket handed out
/// last can release its query.
#[derive(Debug, Default)]
pub struct SearchDebouncer {
    epoch: Epoch,
    pending: Option<(RequestToken, String)>,
}

impl SearchDebouncer {
    /// Returns a ticket to arm a timer with, or `None` when the query is blank.
    pub fn input(&mut self, query: &str) -> Option<RequestToken> {
        let query = query.trim();
        if query.is_empty() {
            self.cancel();
            return None;
        }
        let token = self.epoch.issue();
        self.pending = Some((token, query.to_string()));
        Some(token)
    }

    /// Called when a timer elapses; yields the query only for the latest ticket.
    pub fn fire(&mut self, token: RequestToken) -> Option<String> {
        match &self.pending {
            Some((pending, _)) if *pending == token && self.epoch.is_current(token) => {
                self.pending.take().map(|(_, query)| query)
            }
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.epoch.invalidate();
        self.pending = None;
    }
}

pub async fn quiet_period(token: RequestToken) -> RequestToken {
    tokio::time::sleep(SEARCH_QUIET_PERIOD).await;
    token
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_input_arms_nothing() {
        let mut debouncer = SearchDebouncer::default();
        assert_eq!(debouncer.input("   "), None);
        assert!(debouncer.pending.is_none());
    }

    #[test]
    fn blank_input_cancels_pending_timer() {
        let mut debouncer = SearchDebouncer::default();
        let ticket = debouncer.input("dune").unwrap();
        assert_eq!(debouncer.input(""), None);
        assert_eq!(debouncer.fire(ticket), None);
    }

    #[test]
    fn superseded_ticket_releases_nothing() {
        let mut debouncer = SearchDebouncer::default();
        let first = debouncer.input("bat").unwrap();
        let second = debouncer.input("  batman ").unwrap();

        assert_eq!(debouncer.fire(first), None);
        assert_eq!(debouncer.fire(second), Some(String::from("batman")));
        assert_eq!(debouncer.fire(second), None);
    }

    #[tokio::test(start_paused = true)]
    async fn timer_waits_for_the_quiet_period() {
        let start = tokio::time::Instant::now();
        let mut debouncer = SearchDebouncer::default();
        let ticket = debouncer.input("alien").unwrap();

        let fired = quiet_period(ticket).await;
        assert!(start.elapsed() >= SEARCH_QUIET_PERIOD);
        assert_eq!(debouncer.fire(fired), Some(String::from("alien")));
    }
}
