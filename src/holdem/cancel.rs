use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// A handle that can stop a running simulation from another thread.
///
/// Clones share the same flag.
///
/// ```
/// use holdem_equity::holdem::CancelToken;
///
/// let token = CancelToken::new();
/// let other = token.clone();
/// other.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// When a trial loop should give up early: on cancellation, after a
/// deadline, or never.
#[derive(Debug, Clone, Default)]
pub struct StopCondition {
    token: Option<CancelToken>,
    deadline: Option<Instant>,
}

impl StopCondition {
    /// Run every requested trial.
    pub fn never() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: CancelToken) -> Self {
        self.token = Some(token);
        self
    }

    /// Stop once `timeout` has passed from now.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Instant::now().checked_add(timeout);
        self
    }

    pub fn should_stop(&self) -> bool {
        self.token.as_ref().is_some_and(CancelToken::is_cancelled)
            || self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never() {
        assert!(!StopCondition::never().should_stop());
    }

    #[test]
    fn test_token() {
        let token = CancelToken::new();
        let stop = StopCondition::never().with_token(token.clone());
        assert!(!stop.should_stop());
        token.cancel();
        assert!(stop.should_stop());
    }

    #[test]
    fn test_timeout() {
        assert!(StopCondition::never().with_timeout(Duration::ZERO).should_stop());
        assert!(
            !StopCondition::never()
                .with_timeout(Duration::from_secs(3600))
                .should_stop()
        );
    }
}
