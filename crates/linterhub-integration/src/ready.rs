//! Readiness rounds.
//!
//! A round pairs one CLI handle with a readiness signal that settles exactly
//! once. Re-initialisation never touches an existing round: it arms a new
//! one and swaps it in, so a caller that captured the old round keeps the
//! old handle for its whole call.

use std::sync::Arc;

use tokio::sync::watch;

use crate::cli::LinterhubCli;
use crate::error::CallError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundState {
    Pending,
    /// Settled by a successful version probe.
    Ready { version: String },
    Failed { reason: String },
}

#[derive(Debug)]
pub struct ReadyRound {
    cli:   Arc<LinterhubCli>,
    state: watch::Receiver<RoundState>,
}

/// Write half of a round. Consumed by [`settle`](Self::settle), so a round
/// cannot settle twice.
#[derive(Debug)]
pub struct RoundSignal(watch::Sender<RoundState>);

impl RoundSignal {
    pub fn settle(self, outcome: Result<String, String>) {
        let state = match outcome {
            Ok(version) => RoundState::Ready { version },
            Err(reason) => RoundState::Failed { reason },
        };
        self.0.send_replace(state);
    }
}

impl ReadyRound {
    pub fn arm(cli: LinterhubCli) -> (Arc<Self>, RoundSignal) {
        let (tx, rx) = watch::channel(RoundState::Pending);
        let round = Arc::new(Self {
            cli:   Arc::new(cli),
            state: rx,
        });
        (round, RoundSignal(tx))
    }

    pub fn cli(&self) -> &Arc<LinterhubCli> { &self.cli }

    pub fn state(&self) -> RoundState { self.state.borrow().clone() }

    /// Suspends until the round settles and returns its handle.
    pub async fn ready(&self) -> Result<Arc<LinterhubCli>, CallError> {
        let mut rx = self.state.clone();
        let settled = rx
            .wait_for(|state| *state != RoundState::Pending)
            .await
            .map(|state| (*state).clone());
        match settled {
            Ok(RoundState::Failed { reason }) => Err(CallError::NotReady(reason)),
            Ok(_) => Ok(self.cli.clone()),
            Err(_) => Err(CallError::NotReady("readiness probe abandoned".into())),
        }
    }
}
