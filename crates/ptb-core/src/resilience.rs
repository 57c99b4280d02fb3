//! Reconnect loop around the chat-session lifecycle.
//!
//! Each attempt yields an explicit [`ConnectOutcome`]; the loop switches on it:
//! auth failures abort, transient failures back off for a random delay inside the
//! configured window, anything else waits a fixed delay. Retries are unbounded.

use std::time::Duration;

use async_trait::async_trait;
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{error, info, warn};

use crate::{
    config::{
        Config, DEFAULT_RETRY_MAX_SECS, DEFAULT_RETRY_MIN_SECS, DEFAULT_UNEXPECTED_RETRY_SECS,
    },
    errors::Error,
    session::{SessionHandle, SessionState, SessionView},
    Result,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConnectOutcome {
    Success,
    /// Invalid credential. Terminal.
    AuthFailure(String),
    /// Connection refused/reset, disconnect, timeout, rate limit.
    TransientFailure(String),
    UnknownFailure(String),
}

/// Port for the chat platform session.
#[async_trait]
pub trait SessionConnector: Send {
    /// Establish the session. `Success` means the platform accepted the credential.
    async fn connect(&mut self, session: &SessionHandle) -> ConnectOutcome;

    /// Serve inbound events until the session ends. `Success` is a clean shutdown.
    async fn serve(&mut self, session: &SessionHandle) -> ConnectOutcome;
}

#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub network_min: Duration,
    pub network_max: Duration,
    pub unexpected: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            network_min: Duration::from_secs(DEFAULT_RETRY_MIN_SECS),
            network_max: Duration::from_secs(DEFAULT_RETRY_MAX_SECS),
            unexpected: Duration::from_secs(DEFAULT_UNEXPECTED_RETRY_SECS),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            network_min: cfg.retry_min,
            network_max: cfg.retry_max,
            unexpected: cfg.unexpected_retry,
        }
    }

    /// Uniform in `[network_min, network_max]`, millisecond resolution.
    pub fn network_delay<R: Rng>(&self, rng: &mut R) -> Duration {
        let lo = self.network_min.as_millis() as u64;
        let hi = (self.network_max.as_millis() as u64).max(lo);
        Duration::from_millis(rng.gen_range(lo..=hi))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoopReport {
    pub attempts: u32,
    pub delays: Vec<Duration>,
}

pub struct SessionLoop<C, S = TokioSleeper> {
    connector: C,
    sleeper: S,
    policy: RetryPolicy,
    session: SessionHandle,
    rng: StdRng,
    /// Delay applied before the current attempt; cleared once connected.
    backoff: Option<Duration>,
}

impl<C: SessionConnector> SessionLoop<C, TokioSleeper> {
    pub fn new(connector: C, policy: RetryPolicy) -> Self {
        Self::with_sleeper(connector, policy, TokioSleeper)
    }
}

impl<C: SessionConnector, S: Sleeper> SessionLoop<C, S> {
    pub fn with_sleeper(connector: C, policy: RetryPolicy, sleeper: S) -> Self {
        Self {
            connector,
            sleeper,
            policy,
            session: SessionHandle::new(),
            rng: StdRng::from_entropy(),
            backoff: None,
        }
    }

    /// Fix the backoff RNG seed (tests).
    pub fn seeded(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn view(&self) -> SessionView {
        self.session.view()
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    pub fn backoff(&self) -> Option<Duration> {
        self.backoff
    }

    /// Drive the session until it ends cleanly (`Ok`) or the credential is
    /// rejected (`Err(Error::Auth)`).
    pub async fn run(&mut self) -> Result<LoopReport> {
        let mut report = LoopReport::default();

        loop {
            self.session.begin_attempt();
            report.attempts += 1;
            info!(attempt = report.attempts, "starting chat session");

            let outcome = match self.connector.connect(&self.session).await {
                ConnectOutcome::Success => {
                    self.session.set_connected();
                    self.backoff = None;
                    info!("chat session connected");
                    self.connector.serve(&self.session).await
                }
                failed => failed,
            };

            let delay = match outcome {
                ConnectOutcome::Success => {
                    info!("chat session ended cleanly; leaving reconnect loop");
                    self.session.set_state(SessionState::Disconnected);
                    return Ok(report);
                }
                ConnectOutcome::AuthFailure(reason) => {
                    error!(%reason, "login failed (invalid token); not retrying");
                    self.session.set_state(SessionState::Aborted);
                    return Err(Error::Auth(reason));
                }
                ConnectOutcome::TransientFailure(reason) => {
                    let delay = self.policy.network_delay(&mut self.rng);
                    warn!(%reason, delay_secs = delay.as_secs_f64(), "network error; retrying");
                    delay
                }
                ConnectOutcome::UnknownFailure(reason) => {
                    let delay = self.policy.unexpected;
                    error!(%reason, delay_secs = delay.as_secs_f64(), "unexpected session error; retrying");
                    delay
                }
            };

            self.session.set_state(SessionState::Disconnected);
            self.backoff = Some(delay);
            report.delays.push(delay);
            self.sleeper.sleep(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::VecDeque,
        sync::{Arc, Mutex},
    };

    use super::*;
    use crate::domain::BotIdentity;

    #[derive(Default, Clone)]
    struct RecordingSleeper {
        slept: Arc<Mutex<Vec<Duration>>>,
    }

    #[async_trait]
    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, duration: Duration) {
            self.slept.lock().unwrap().push(duration);
        }
    }

    /// Replays scripted connect outcomes; `serve` returns `serve_outcome`.
    struct ScriptedConnector {
        connects: VecDeque<ConnectOutcome>,
        serve_outcomes: VecDeque<ConnectOutcome>,
        connect_calls: u32,
        serve_calls: u32,
        states_seen_in_serve: Vec<SessionState>,
    }

    impl ScriptedConnector {
        fn new(connects: Vec<ConnectOutcome>, serves: Vec<ConnectOutcome>) -> Self {
            Self {
                connects: connects.into(),
                serve_outcomes: serves.into(),
                connect_calls: 0,
                serve_calls: 0,
                states_seen_in_serve: Vec::new(),
            }
        }
    }

    #[async_trait]
    impl SessionConnector for ScriptedConnector {
        async fn connect(&mut self, session: &SessionHandle) -> ConnectOutcome {
            self.connect_calls += 1;
            let outcome = self
                .connects
                .pop_front()
                .unwrap_or(ConnectOutcome::Success);
            if outcome == ConnectOutcome::Success {
                session.set_identity(BotIdentity {
                    id: 1,
                    username: "scene_bot".to_string(),
                });
            }
            outcome
        }

        async fn serve(&mut self, session: &SessionHandle) -> ConnectOutcome {
            self.serve_calls += 1;
            self.states_seen_in_serve.push(session.status().state);
            self.serve_outcomes
                .pop_front()
                .unwrap_or(ConnectOutcome::Success)
        }
    }

    fn transient() -> ConnectOutcome {
        ConnectOutcome::TransientFailure("connection reset".to_string())
    }

    #[tokio::test]
    async fn auth_failure_aborts_after_one_attempt() {
        let sleeper = RecordingSleeper::default();
        let connector = ScriptedConnector::new(
            vec![ConnectOutcome::AuthFailure("Unauthorized".to_string())],
            vec![],
        );
        let mut lp = SessionLoop::with_sleeper(connector, RetryPolicy::default(), sleeper.clone());
        let view = lp.view();

        let err = lp.run().await.unwrap_err();
        assert!(matches!(err, Error::Auth(reason) if reason == "Unauthorized"));
        assert_eq!(lp.connector().connect_calls, 1);
        assert_eq!(lp.connector().serve_calls, 0);
        assert!(sleeper.slept.lock().unwrap().is_empty());
        assert_eq!(view.status().state, SessionState::Aborted);
    }

    #[tokio::test]
    async fn transient_failures_back_off_inside_window_then_connect() {
        let sleeper = RecordingSleeper::default();
        let connector = ScriptedConnector::new(
            vec![transient(), transient(), transient(), ConnectOutcome::Success],
            vec![ConnectOutcome::Success],
        );
        let policy = RetryPolicy::default();
        let mut lp = SessionLoop::with_sleeper(connector, policy, sleeper.clone()).seeded(17);
        let view = lp.view();

        let report = lp.run().await.unwrap();

        assert_eq!(report.attempts, 4);
        assert_eq!(lp.connector().connect_calls, 4);
        assert_eq!(lp.connector().serve_calls, 1);
        assert_eq!(lp.connector().states_seen_in_serve, [SessionState::Connected]);

        let slept = sleeper.slept.lock().unwrap().clone();
        assert_eq!(slept.len(), 3);
        assert_eq!(slept, report.delays);
        for d in slept {
            assert!(d >= policy.network_min && d <= policy.network_max, "{d:?}");
        }

        assert_eq!(lp.backoff(), None);
        let status = view.status();
        assert_eq!(status.state, SessionState::Disconnected);
        assert_eq!(status.attempts, 4);
        assert_eq!(status.identity.map(|i| i.username).as_deref(), Some("scene_bot"));
    }

    #[tokio::test]
    async fn unknown_failure_uses_fixed_delay() {
        let sleeper = RecordingSleeper::default();
        let connector = ScriptedConnector::new(
            vec![
                ConnectOutcome::UnknownFailure("boom".to_string()),
                ConnectOutcome::UnknownFailure("boom again".to_string()),
            ],
            vec![],
        );
        let policy = RetryPolicy {
            unexpected: Duration::from_secs(5),
            ..RetryPolicy::default()
        };
        let mut lp = SessionLoop::with_sleeper(connector, policy, sleeper.clone());

        let report = lp.run().await.unwrap();
        assert_eq!(report.attempts, 3);
        assert_eq!(
            *sleeper.slept.lock().unwrap(),
            [Duration::from_secs(5), Duration::from_secs(5)]
        );
    }

    #[tokio::test]
    async fn failure_while_connected_is_retried_and_backoff_resets() {
        let sleeper = RecordingSleeper::default();
        let connector = ScriptedConnector::new(
            vec![ConnectOutcome::Success, ConnectOutcome::Success],
            vec![transient(), ConnectOutcome::Success],
        );
        let mut lp =
            SessionLoop::with_sleeper(connector, RetryPolicy::default(), sleeper.clone()).seeded(3);

        let report = lp.run().await.unwrap();
        assert_eq!(report.attempts, 2);
        assert_eq!(lp.connector().serve_calls, 2);
        assert_eq!(sleeper.slept.lock().unwrap().len(), 1);
        assert_eq!(lp.backoff(), None);
    }

    #[tokio::test]
    async fn auth_failure_after_retries_still_aborts() {
        let sleeper = RecordingSleeper::default();
        let connector = ScriptedConnector::new(
            vec![
                transient(),
                ConnectOutcome::AuthFailure("token revoked".to_string()),
            ],
            vec![],
        );
        let mut lp =
            SessionLoop::with_sleeper(connector, RetryPolicy::default(), sleeper.clone()).seeded(9);

        assert!(matches!(lp.run().await, Err(Error::Auth(_))));
        assert_eq!(lp.connector().connect_calls, 2);
        assert_eq!(sleeper.slept.lock().unwrap().len(), 1);
    }

    #[test]
    fn network_delay_stays_in_window() {
        let policy = RetryPolicy {
            network_min: Duration::from_secs(15),
            network_max: Duration::from_secs(30),
            unexpected: Duration::from_secs(15),
        };
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..1_000 {
            let d = policy.network_delay(&mut rng);
            assert!(d >= policy.network_min && d <= policy.network_max);
        }

        let fixed = RetryPolicy {
            network_min: Duration::from_secs(2),
            network_max: Duration::from_secs(2),
            ..policy
        };
        assert_eq!(fixed.network_delay(&mut rng), Duration::from_secs(2));
    }

    #[tokio::test]
    async fn tokio_sleeper_waits() {
        let start = tokio::time::Instant::now();
        TokioSleeper.sleep(Duration::from_millis(10)).await;
        assert!(start.elapsed() >= Duration::from_millis(10));
    }
}
