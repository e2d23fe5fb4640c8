use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

/// Fails calls to a collaborator fast after repeated transport failures.
///
/// Closed until `failure_threshold` consecutive failures, then Open for
/// `reset_timeout`, then HalfOpen where a single probe decides between
/// Closed and Open. A probe that has not reported back within
/// `reset_timeout` (its caller was dropped mid-request) is written off and
/// the next call probes instead. Never retries on its own.
pub struct CircuitBreaker {
    name: String,
    state: RwLock<CircuitState>,
    failure_count: AtomicUsize,
    failure_threshold: usize,
    reset_timeout: Duration,
    /// When the circuit opened, or when the current probe went out.
    opened_at: RwLock<Option<Instant>>,
    probing: AtomicBool,
}

impl CircuitBreaker {
    pub fn new(name: &str, failure_threshold: usize, reset_timeout: Duration) -> Self {
        Self {
            name: name.to_string(),
            state: RwLock::new(CircuitState::Closed),
            failure_count: AtomicUsize::new(0),
            failure_threshold: failure_threshold.max(1),
            reset_timeout,
            opened_at: RwLock::new(None),
            probing: AtomicBool::new(false),
        }
    }

    pub async fn state(&self) -> CircuitState {
        *self.state.read().await
    }

    /// Whether a call may go out now.
    pub async fn check(&self) -> bool {
        let state = *self.state.read().await;
        match state {
            CircuitState::Closed => true,
            CircuitState::HalfOpen => {
                if !self.probing.swap(true, Ordering::SeqCst) {
                    *self.opened_at.write().await = Some(Instant::now());
                    return true;
                }
                let mut probe_started = self.opened_at.write().await;
                let lost = probe_started
                    .map(|at| at.elapsed() >= self.reset_timeout)
                    .unwrap_or(true);
                if lost {
                    *probe_started = Some(Instant::now());
                    tracing::warn!("Circuit breaker [{}] probe never reported back, probing again", self.name);
                }
                lost
            }
            CircuitState::Open => {
                let cooled_down = self
                    .opened_at
                    .read()
                    .await
                    .map(|at| at.elapsed() >= self.reset_timeout)
                    .unwrap_or(true);
                if !cooled_down {
                    return false;
                }
                let mut state = self.state.write().await;
                if *state == CircuitState::Open {
                    *state = CircuitState::HalfOpen;
                    self.probing.store(true, Ordering::SeqCst);
                    *self.opened_at.write().await = Some(Instant::now());
                    tracing::info!("Circuit breaker [{}] half-open, probing", self.name);
                    return true;
                }
                // Another task moved it first; it owns the probe.
                *state == CircuitState::Closed
            }
        }
    }

    pub async fn record_success(&self) {
        self.failure_count.store(0, Ordering::SeqCst);
        let mut state = self.state.write().await;
        if *state != CircuitState::Closed {
            *state = CircuitState::Closed;
            self.probing.store(false, Ordering::SeqCst);
            tracing::info!("Circuit breaker [{}] closed", self.name);
        }
    }

    pub async fn record_failure(&self) {
        let count = self.failure_count.fetch_add(1, Ordering::SeqCst) + 1;
        let mut state = self.state.write().await;

        if *state == CircuitState::HalfOpen || count >= self.failure_threshold {
            if *state != CircuitState::Open {
                tracing::error!(
                    "Circuit breaker [{}] open after {} consecutive failures",
                    self.name,
                    count
                );
            }
            *state = CircuitState::Open;
            self.probing.store(false, Ordering::SeqCst);
            *self.opened_at.write().await = Some(Instant::now());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_trips_after_threshold_and_recovers() {
        let breaker = CircuitBreaker::new("inventory", 2, Duration::from_millis(50));
        assert!(breaker.check().await);

        breaker.record_failure().await;
        assert_eq!(breaker.state().await, CircuitState::Closed);
        breaker.record_failure().await;
        assert_eq!(breaker.state().await, CircuitState::Open);
        assert!(!breaker.check().await);

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(breaker.check().await, "first call after cooldown probes");
        assert_eq!(breaker.state().await, CircuitState::HalfOpen);
        assert!(!breaker.check().await, "only one probe at a time");

        breaker.record_success().await;
        assert_eq!(breaker.state().await, CircuitState::Closed);
        assert!(breaker.check().await);
    }

    #[tokio::test]
    async fn test_failed_probe_reopens() {
        let breaker = CircuitBreaker::new("ledger", 1, Duration::from_millis(20));
        breaker.record_failure().await;
        tokio::time::sleep(Duration::from_millis(40)).await;

        assert!(breaker.check().await);
        breaker.record_failure().await;
        assert_eq!(breaker.state().await, CircuitState::Open);
        assert!(!breaker.check().await);
    }

    #[tokio::test]
    async fn test_abandoned_probe_does_not_wedge_half_open() {
        let breaker = CircuitBreaker::new("inventory", 1, Duration::from_millis(20));
        breaker.record_failure().await;
        tokio::time::sleep(Duration::from_millis(40)).await;

        // admitted, then never recorded
        assert!(breaker.check().await);
        assert!(!breaker.check().await);

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(breaker.check().await, "a stale probe is replaced");
        assert!(!breaker.check().await);

        breaker.record_success().await;
        assert_eq!(breaker.state().await, CircuitState::Closed);
        assert!(breaker.check().await);
    }

    #[tokio::test]
    async fn test_success_resets_failure_count() {
        let breaker = CircuitBreaker::new("inventory", 2, Duration::from_secs(60));
        breaker.record_failure().await;
        breaker.record_success().await;
        breaker.record_failure().await;
        assert_eq!(breaker.state().await, CircuitState::Closed);
    }
}
