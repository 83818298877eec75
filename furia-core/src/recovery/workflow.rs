use parking_lot::Mutex;
use serde_json::json;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::hooks::{Navigator, Notice, Notifier};
use super::marker::CONFIRMATION_MARKER;
use super::state::{CooldownTimer, PollState, PollStatus, RecoveryRequest, RecoverySnapshot};
use super::{RecoveryError, RecoveryPolicy, INVALID_EMAIL_MESSAGE, NOT_REMEMBERED_MESSAGE};
use crate::api::{HttpTransport, Method, EMAIL_CONFIRMED_PATH, FORGOT_PASSWORD_PATH};
use crate::error::Result;
use crate::storage::{KeyValueStore, PENDING_EMAIL_KEY};

const TICK: std::time::Duration = std::time::Duration::from_secs(1);

/// Password reset e-mail confirmation workflow.
///
/// One instance backs one screen. Background tasks never outlive it: dropping
/// the workflow cancels them like [`shutdown`](Self::shutdown) does.
pub struct EmailConfirmationWorkflow {
    shared: Arc<Shared>,
}

struct Shared {
    transport: Arc<dyn HttpTransport>,
    store: Arc<dyn KeyValueStore>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    policy: RecoveryPolicy,
    inner: Mutex<Inner>,
    root: CancellationToken,
}

struct Inner {
    request: Option<RecoveryRequest>,
    poll: PollState,
    cooldown: CooldownTimer,
    /// Token of the current cycle; cancelled when the cycle is replaced
    cycle: Option<CancellationToken>,
}

impl EmailConfirmationWorkflow {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        store: Arc<dyn KeyValueStore>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
        policy: RecoveryPolicy,
    ) -> Self {
        let poll = PollState::new(policy.max_attempts, policy.poll_interval);
        Self {
            shared: Arc::new(Shared {
                transport,
                store,
                navigator,
                notifier,
                policy,
                inner: Mutex::new(Inner {
                    request: None,
                    poll,
                    cooldown: CooldownTimer::default(),
                    cycle: None,
                }),
                root: CancellationToken::new(),
            }),
        }
    }

    pub fn policy(&self) -> &RecoveryPolicy {
        &self.shared.policy
    }

    /// Send the reset e-mail and start polling for its confirmation.
    ///
    /// Returns once the send completed; polling continues in the background.
    /// Rejected without any request while a send is in flight or while the
    /// resend cooldown of a running cycle has not expired.
    pub async fn submit(&self, email: &str) -> std::result::Result<(), RecoveryError> {
        let shared = &self.shared;
        if shared.root.is_cancelled() {
            return Err(RecoveryError::Closed);
        }

        let email = email.trim();
        if email.is_empty() {
            let err = RecoveryError::Validation(INVALID_EMAIL_MESSAGE.to_string());
            shared.notifier.notify(&err.notice());
            return Err(err);
        }

        let cycle = {
            let mut inner = shared.inner.lock();
            match inner.poll.status {
                PollStatus::Sending => return Err(RecoveryError::RequestInFlight),
                PollStatus::Polling if !inner.cooldown.can_resend() => {
                    return Err(RecoveryError::ResendCooldown {
                        remaining_secs: inner.cooldown.remaining_secs,
                    });
                }
                _ => {}
            }

            if let Some(previous) = inner.cycle.take() {
                previous.cancel();
            }
            let token = shared.root.child_token();
            inner.cycle = Some(token.clone());
            inner.request = Some(RecoveryRequest::new(email));
            inner.poll.restart(PollStatus::Sending);
            inner.cooldown = CooldownTimer::default();
            token
        };

        info!(email = %email, "Requesting password reset e-mail");

        let result = tokio::select! {
            _ = cycle.cancelled() => return Err(RecoveryError::Closed),
            result = shared.transport.request(
                Method::POST,
                FORGOT_PASSWORD_PATH,
                Some(json!({ "email": email })),
            ) => result,
        };

        let outcome = match result {
            Ok(response) if response.is_success() => Ok(()),
            Ok(response) => Err(RecoveryError::server(
                response.status,
                response.message().unwrap_or_default(),
            )),
            Err(e) => Err(RecoveryError::RequestSetup(e.to_string())),
        };

        if let Err(err) = outcome {
            let mut inner = shared.inner.lock();
            if cycle.is_cancelled() {
                return Err(RecoveryError::Closed);
            }
            warn!(email = %email, error = %err, "Password reset request failed");
            inner.poll.status = PollStatus::Failed(err.user_message());
            inner.cycle = None;
            shared.notifier.notify(&err.notice());
            return Err(err);
        }

        let persisted = match shared.store.set(PENDING_EMAIL_KEY, email).await {
            Ok(()) => true,
            Err(e) => {
                warn!(store = shared.store.name(), error = %e, "Failed to persist pending e-mail");
                false
            }
        };

        {
            let mut inner = shared.inner.lock();
            if cycle.is_cancelled() {
                return Err(RecoveryError::Closed);
            }
            if !persisted {
                shared
                    .notifier
                    .notify(&Notice::info("Heads up", NOT_REMEMBERED_MESSAGE));
            }
            inner.poll.restart(PollStatus::Polling);
            inner
                .cooldown
                .start(shared.policy.resend_cooldown.as_secs());
        }

        info!(
            email = %email,
            max_attempts = shared.policy.max_attempts,
            "Reset e-mail sent, waiting for confirmation"
        );

        tokio::spawn(run_poll(shared.clone(), email.to_string(), cycle.clone()));
        tokio::spawn(run_cooldown(shared.clone(), cycle));
        Ok(())
    }

    /// Resume polling for a persisted pending e-mail without re-sending it.
    ///
    /// Returns whether a cycle was started. The cooldown is left expired, so a
    /// resend is allowed right away.
    pub async fn resume(&self) -> Result<bool> {
        if self.shared.root.is_cancelled() {
            return Err(RecoveryError::Closed.into());
        }

        let email = match self.pending_email().await? {
            Some(email) => email,
            None => return Ok(false),
        };

        let cycle = {
            let mut inner = self.shared.inner.lock();
            if inner.poll.status.is_active() {
                return Ok(false);
            }
            if let Some(previous) = inner.cycle.take() {
                previous.cancel();
            }
            let token = self.shared.root.child_token();
            inner.cycle = Some(token.clone());
            inner.request = Some(RecoveryRequest::new(email.clone()));
            inner.poll.restart(PollStatus::Polling);
            inner.cooldown = CooldownTimer::default();
            token
        };

        info!(email = %email, "Resuming confirmation polling");
        tokio::spawn(run_poll(self.shared.clone(), email, cycle));
        Ok(true)
    }

    /// Cancel every pending check and tick. Idempotent.
    pub fn shutdown(&self) {
        let mut inner = self.shared.inner.lock();
        if self.shared.root.is_cancelled() {
            return;
        }
        self.shared.root.cancel();
        inner.cycle = None;
        debug!(status = %inner.poll.status, "Recovery workflow shut down");
    }

    pub fn is_shut_down(&self) -> bool {
        self.shared.root.is_cancelled()
    }

    pub fn snapshot(&self) -> RecoverySnapshot {
        let inner = self.shared.inner.lock();
        RecoverySnapshot {
            request: inner.request.clone(),
            poll: inner.poll.clone(),
            cooldown: inner.cooldown.clone(),
        }
    }

    pub fn status(&self) -> PollStatus {
        self.shared.inner.lock().poll.status.clone()
    }

    /// Whether `submit` would currently be accepted
    pub fn can_resend(&self) -> bool {
        let inner = self.shared.inner.lock();
        match inner.poll.status {
            PollStatus::Sending => false,
            PollStatus::Polling => inner.cooldown.can_resend(),
            _ => true,
        }
    }

    /// E-mail persisted by the last successful send
    pub async fn pending_email(&self) -> Result<Option<String>> {
        Ok(self.shared.store.get(PENDING_EMAIL_KEY).await?)
    }
}

impl Drop for EmailConfirmationWorkflow {
    fn drop(&mut self) {
        // Waits out a transition already holding the lock
        self.shutdown();
    }
}

impl Shared {
    /// One confirmation check. Transport failures count as "not yet".
    async fn check(&self, email: &str) -> bool {
        match self
            .transport
            .request(
                Method::POST,
                EMAIL_CONFIRMED_PATH,
                Some(json!({ "email": email })),
            )
            .await
        {
            Ok(response) => {
                let confirmed = CONFIRMATION_MARKER.matches(&response);
                debug!(status = response.status, confirmed, "Confirmation check answered");
                confirmed
            }
            Err(e) => {
                warn!(error = %e, "Confirmation check failed, will retry");
                false
            }
        }
    }
}

async fn run_poll(shared: Arc<Shared>, email: String, token: CancellationToken) {
    tokio::select! {
        _ = token.cancelled() => return,
        _ = tokio::time::sleep(shared.policy.initial_delay) => {}
    }

    loop {
        let confirmed = tokio::select! {
            _ = token.cancelled() => return,
            confirmed = shared.check(&email) => confirmed,
        };

        {
            let mut inner = shared.inner.lock();
            if token.is_cancelled() {
                return;
            }
            inner.poll.attempts_made += 1;
            debug!(
                attempt = inner.poll.attempts_made,
                max_attempts = inner.poll.max_attempts,
                "Confirmation check done"
            );

            if confirmed {
                info!(email = %email, attempts = inner.poll.attempts_made, "E-mail confirmed");
                inner.poll.status = PollStatus::Confirmed;
                inner.cooldown.stop();
                inner.cycle = None;
                token.cancel();
                shared.navigator.navigate_confirmed(&email);
                return;
            }

            if inner.poll.is_exhausted() {
                info!(email = %email, attempts = inner.poll.attempts_made, "Confirmation polling timed out");
                inner.poll.status = PollStatus::TimedOut;
                inner.cooldown.stop();
                inner.cycle = None;
                token.cancel();
                shared.notifier.notify(&RecoveryError::PollExhausted.notice());
                return;
            }
        }

        tokio::select! {
            _ = token.cancelled() => return,
            _ = tokio::time::sleep(shared.policy.poll_interval) => {}
        }
    }
}

async fn run_cooldown(shared: Arc<Shared>, token: CancellationToken) {
    loop {
        tokio::select! {
            _ = token.cancelled() => return,
            _ = tokio::time::sleep(TICK) => {}
        }

        let mut inner = shared.inner.lock();
        if token.is_cancelled() || inner.poll.status != PollStatus::Polling {
            return;
        }
        if inner.cooldown.tick() {
            debug!("Resend cooldown expired");
            return;
        }
        if !inner.cooldown.active {
            return;
        }
    }
}
