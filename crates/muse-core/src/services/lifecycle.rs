//! Request Lifecycle Controller
//!
//! Coordinates exactly one external call per feature instance:
//! Idle → Pending → Succeeded/Failed, with precondition checks before
//! anything is dispatched and a liveness token checked before a completion
//! is applied.

use std::future::Future;
use std::sync::{Mutex, MutexGuard};

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::domain::{LifecycleError, LifecycleState};

/// What happened to a submit attempt that passed its preconditions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// A call was already pending (or the instance is torn down); nothing sent
    Ignored,
    /// The call settled and the state was updated
    Settled(LifecycleState),
    /// The call settled after teardown; state left untouched
    Discarded,
}

impl Submission {
    pub fn state(&self) -> Option<&LifecycleState> {
        match self {
            Submission::Settled(state) => Some(state),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    state: LifecycleState,
    last_output: Option<String>,
    cycles: u64,
}

/// Per-feature request lifecycle
#[derive(Debug)]
pub struct RequestLifecycle {
    feature: &'static str,
    inner: Mutex<Inner>,
    liveness: CancellationToken,
}

impl RequestLifecycle {
    pub fn new(feature: &'static str) -> Self {
        Self {
            feature,
            inner: Mutex::new(Inner::default()),
            liveness: CancellationToken::new(),
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.lock().state.clone()
    }

    pub fn is_pending(&self) -> bool {
        self.lock().state.is_pending()
    }

    /// Most recent successful output; survives later failures
    pub fn last_output(&self) -> Option<String> {
        self.lock().last_output.clone()
    }

    /// Number of cycles that reached Pending
    pub fn cycles(&self) -> u64 {
        self.lock().cycles
    }

    pub fn is_live(&self) -> bool {
        !self.liveness.is_cancelled()
    }

    /// Mark the owning feature as gone.
    ///
    /// A call already in flight keeps running; its completion is dropped.
    pub fn teardown(&self) {
        debug!(feature = self.feature, "Lifecycle torn down");
        self.liveness.cancel();
    }

    /// Back to Idle with no retained output; ignored while a call is pending
    pub fn reset(&self) -> bool {
        let mut inner = self.lock();
        if inner.state.is_pending() {
            return false;
        }
        inner.state = LifecycleState::Idle;
        inner.last_output = None;
        true
    }

    /// Drive one cycle.
    ///
    /// `preconditions` runs only when no call is pending; its error is
    /// returned without touching state. `call` runs once the state is
    /// Pending. `apply` runs with the outcome just before the state leaves
    /// Pending, and only while the instance is live.
    pub async fn submit<P, C, Fut, A>(
        &self,
        preconditions: P,
        call: C,
        apply: A,
    ) -> Result<Submission, LifecycleError>
    where
        P: FnOnce() -> Result<(), LifecycleError>,
        C: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, LifecycleError>>,
        A: FnOnce(&Result<String, LifecycleError>),
    {
        if !self.is_live() || self.is_pending() {
            debug!(feature = self.feature, "Submit ignored while pending");
            return Ok(Submission::Ignored);
        }

        if let Err(e) = preconditions() {
            debug!(feature = self.feature, error = %e, "Submit rejected before dispatch");
            return Err(e);
        }

        let Some(cycle) = self.try_begin() else {
            return Ok(Submission::Ignored);
        };
        info!(feature = self.feature, cycle, "Request dispatched");

        let guard = PendingGuard::new(self, cycle);
        let outcome = call().await;
        guard.disarm();
        Ok(self.settle(cycle, outcome, apply))
    }

    /// Move to Pending if nothing is in flight; returns the cycle number
    fn try_begin(&self) -> Option<u64> {
        let mut inner = self.lock();
        if inner.state.is_pending() {
            return None;
        }
        inner.state = LifecycleState::Pending;
        inner.cycles += 1;
        Some(inner.cycles)
    }

    fn settle<A>(&self, cycle: u64, outcome: Result<String, LifecycleError>, apply: A) -> Submission
    where
        A: FnOnce(&Result<String, LifecycleError>),
    {
        let mut inner = self.lock();

        if !self.is_live() {
            debug!(feature = self.feature, cycle, "Completion arrived after teardown, discarded");
            return Submission::Discarded;
        }

        apply(&outcome);

        let next = match outcome {
            Ok(text) => {
                info!(feature = self.feature, cycle, chars = text.chars().count(), "Request succeeded");
                inner.last_output = Some(text.clone());
                LifecycleState::Succeeded(text)
            }
            Err(e) => {
                error!(feature = self.feature, cycle, error = %e, "Request failed");
                LifecycleState::Failed(e.user_message())
            }
        };
        inner.state = next;

        Submission::Settled(inner.state.clone())
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Leaves Pending if the submit future is dropped before the call settles
struct PendingGuard<'a> {
    lifecycle: &'a RequestLifecycle,
    cycle: u64,
    armed: bool,
}

impl<'a> PendingGuard<'a> {
    fn new(lifecycle: &'a RequestLifecycle, cycle: u64) -> Self {
        Self {
            lifecycle,
            cycle,
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut inner = self.lifecycle.lock();
        if inner.state.is_pending() {
            warn!(feature = self.lifecycle.feature, cycle = self.cycle, "Request abandoned before completion");
            inner.state = LifecycleState::Failed(
                LifecycleError::Transport("request abandoned".to_string()).user_message(),
            );
        }
    }
}
