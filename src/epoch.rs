/// Token handed out when a request is dispatched for a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Monotonic request counter for one logical slot (selection, season, list, search).
///
/// Every dispatch calls [`Epoch::issue`]; a completion is applied only while
/// [`Epoch::is_current`] still holds for the token it was dispatched with.
#[derive(Debug, Default, Clone)]
pub struct Epoch {
    latest: u64,
}

impl Epoch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self) -> RequestToken {
        self.latest += 1;
        RequestToken(self.latest)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.latest
    }

    /// Supersedes whatever is in flight without starting a new request.
    pub fn invalidate(&mut self) {
        self.latest += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_latest_token_is_current() {
        let mut epoch = Epoch::new();
        let first = epoch.issue();
        let second = epoch.issue();
        assert!(!epoch.is_current(first));
        assert!(epoch.is_current(second));
        assert!(second.value() > first.value());
    }

    #[test]
    fn invalidate_retires_outstanding_token() {
        let mut epoch = Epoch::new();
        let token = epoch.issue();
        epoch.invalidate();
        assert!(!epoch.is_current(token));
    }
}
