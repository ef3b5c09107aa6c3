//! The enrollment wizard: a linear, staged workflow gating a simulated
//! purchase behind the retype challenge and a simulated one-time-code
//! exchange, before handing off to the external checkout.
//!
//! ## Stages
//! ```text
//! CollectingEmail → DispatchingCode → AwaitingCode → ConfirmingCode
//!       → CollectingPayment → CompletingPayment → Closed
//! ```
//!
//! The wizard can be dismissed from any stage. Dismissal bumps an epoch
//! counter; every delayed continuation re-checks the epoch before
//! mutating, so a code dispatch or payment that resolves after dismissal
//! is dropped instead of corrupting torn-down state.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use coursegate_common::constants::OTP_LEN;
use coursegate_common::{
    CheckoutRequest, EnrollError, EnrollmentRecord, Offering, PaymentOutcome, WizardStage,
};

use crate::challenge::{ChallengeSession, ChallengeSource, RandomChallengeSource, SubmitOutcome};
use crate::clock::{Sleeper, TokioSleeper};
use crate::config::WizardConfig;
use crate::payment::{PaymentGateway, price_to_minor_units};
use crate::store::{EnrollmentStore, JsonFileStore};

/// Capabilities injected into the wizard. The engine never touches ambient
/// storage, timers, or randomness directly, so every collaborator can be
/// swapped for a fake.
pub struct WizardDeps {
    pub store: Arc<dyn EnrollmentStore>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub sleeper: Arc<dyn Sleeper>,
    pub challenge_source: Arc<dyn ChallengeSource>,
}

impl WizardDeps {
    /// Production wiring: Tokio timers and the thread-local RNG
    pub fn new(store: Arc<dyn EnrollmentStore>, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self {
            store,
            gateway,
            sleeper: Arc::new(TokioSleeper),
            challenge_source: Arc::new(RandomChallengeSource),
        }
    }

    /// Production wiring against the local JSON store from the config
    pub fn local(config: &WizardConfig, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self::new(Arc::new(JsonFileStore::new(&config.store_path)), gateway)
    }
}

/// Mutable wizard state behind the shared lock
struct WizardState {
    stage: WizardStage,
    email: String,
    code_dispatched: bool,
    code_confirmed: bool,
    challenge: ChallengeSession,
    /// Bumped on dismissal so stale delayed continuations can detect they
    /// lost the session
    epoch: u64,
}

/// One modal enrollment session for a single offering.
pub struct EnrollmentWizard {
    offering: Offering,
    session_id: String,
    config: WizardConfig,
    state: Arc<RwLock<WizardState>>,
    store: Arc<dyn EnrollmentStore>,
    gateway: Arc<dyn PaymentGateway>,
    sleeper: Arc<dyn Sleeper>,
    challenge_source: Arc<dyn ChallengeSource>,
}

impl EnrollmentWizard {
    pub fn new(offering: Offering, config: WizardConfig, deps: WizardDeps) -> Self {
        let challenge = ChallengeSession::new(deps.challenge_source.as_ref());
        let session_id = new_session_id();

        tracing::debug!(
            session = %session_id,
            course_id = offering.id,
            "wizard opened"
        );

        Self {
            offering,
            session_id,
            config,
            state: Arc::new(RwLock::new(WizardState {
                stage: WizardStage::CollectingEmail,
                email: String::new(),
                code_dispatched: false,
                code_confirmed: false,
                challenge,
                epoch: 0,
            })),
            store: deps.store,
            gateway: deps.gateway,
            sleeper: deps.sleeper,
            challenge_source: deps.challenge_source,
        }
    }

    pub fn offering(&self) -> &Offering {
        &self.offering
    }

    /// Session identifier for log correlation
    pub fn id(&self) -> &str {
        &self.session_id
    }

    pub async fn stage(&self) -> WizardStage {
        self.state.read().await.stage
    }

    pub async fn email(&self) -> String {
        self.state.read().await.email.clone()
    }

    pub async fn code_dispatched(&self) -> bool {
        self.state.read().await.code_dispatched
    }

    pub async fn code_confirmed(&self) -> bool {
        self.state.read().await.code_confirmed
    }

    pub async fn challenge_text(&self) -> String {
        self.state.read().await.challenge.text().to_string()
    }

    pub async fn challenge_solved(&self) -> bool {
        self.state.read().await.challenge.is_solved()
    }

    pub async fn challenge_attempted_wrong(&self) -> bool {
        self.state.read().await.challenge.attempted_wrong()
    }

    /// Submit a challenge answer.
    ///
    /// On a mismatch the challenge regenerates after the configured delay;
    /// the call resolves once the retry text is in place. There is no
    /// attempt limit. A dismissal during the delay cancels the
    /// regeneration.
    pub async fn submit_challenge(&self, candidate: &str) -> Result<SubmitOutcome, EnrollError> {
        let (outcome, epoch) = {
            let mut state = self.state.write().await;
            if state.stage != WizardStage::CollectingEmail {
                return Err(EnrollError::WrongStage(state.stage));
            }
            let outcome = state.challenge.submit(candidate);
            (outcome, state.epoch)
        };

        if outcome == SubmitOutcome::Mismatch {
            self.sleeper
                .sleep(Duration::from_millis(self.config.challenge_retry_delay_ms))
                .await;

            let mut state = self.state.write().await;
            if state.epoch == epoch && !state.challenge.is_solved() {
                state.challenge.regenerate(self.challenge_source.as_ref());
            }
        }

        Ok(outcome)
    }

    /// Manually request a fresh challenge. Ignored once solved.
    pub async fn refresh_challenge(&self) -> Result<(), EnrollError> {
        let mut state = self.state.write().await;
        if state.stage != WizardStage::CollectingEmail {
            return Err(EnrollError::WrongStage(state.stage));
        }
        if !state.challenge.is_solved() {
            state.challenge.regenerate(self.challenge_source.as_ref());
        }
        Ok(())
    }

    /// Validate the email and the challenge, then simulate dispatching a
    /// one-time code. Both guards must hold or the wizard stays in
    /// `CollectingEmail` with the entered data intact. The wizard sits in
    /// `DispatchingCode` for the configured latency and lands in
    /// `AwaitingCode` unless dismissed in the meantime.
    pub async fn request_code(&self, email: &str) -> Result<(), EnrollError> {
        let epoch = {
            let mut state = self.state.write().await;
            match state.stage {
                WizardStage::CollectingEmail | WizardStage::AwaitingCode => {}
                other => return Err(EnrollError::WrongStage(other)),
            }
            if !is_valid_email(email) {
                return Err(EnrollError::InvalidEmail(email.to_string()));
            }
            if !state.challenge.is_solved() {
                return Err(EnrollError::ChallengeUnsolved);
            }
            state.email = email.to_string();
            state.stage = WizardStage::DispatchingCode;
            state.epoch
        };

        tracing::debug!(session = %self.session_id, email = %email, "dispatching one-time code");
        self.sleeper
            .sleep(Duration::from_millis(self.config.code_dispatch_delay_ms))
            .await;

        let mut state = self.state.write().await;
        if state.epoch != epoch {
            tracing::debug!(session = %self.session_id, "code dispatch resolved after dismissal, ignoring");
            return Err(EnrollError::Dismissed);
        }
        state.stage = WizardStage::AwaitingCode;
        state.code_dispatched = true;

        tracing::info!(session = %self.session_id, "one-time code dispatched");
        Ok(())
    }

    /// Dispatch another code to the already-entered email
    pub async fn resend_code(&self) -> Result<(), EnrollError> {
        let email = {
            let state = self.state.read().await;
            if state.stage != WizardStage::AwaitingCode {
                return Err(EnrollError::WrongStage(state.stage));
            }
            state.email.clone()
        };
        self.request_code(&email).await
    }

    /// Go back to the email step. The dispatched flag resets; the solved
    /// challenge does not (solving is one-way within a session).
    pub async fn change_email(&self) -> Result<(), EnrollError> {
        let mut state = self.state.write().await;
        if state.stage != WizardStage::AwaitingCode {
            return Err(EnrollError::WrongStage(state.stage));
        }
        state.stage = WizardStage::CollectingEmail;
        state.code_dispatched = false;
        Ok(())
    }

    /// Verify the entered one-time code.
    ///
    /// Any code of the right length passes: there is no backend holding
    /// the dispatched code, so confirmation is simulated end to end. A
    /// wrong-length code blocks without leaving `AwaitingCode`.
    pub async fn confirm_code(&self, code: &str) -> Result<(), EnrollError> {
        let epoch = {
            let mut state = self.state.write().await;
            if state.stage != WizardStage::AwaitingCode {
                return Err(EnrollError::WrongStage(state.stage));
            }
            let got = code.chars().count();
            if got != OTP_LEN {
                return Err(EnrollError::MalformedCode {
                    expected: OTP_LEN,
                    got,
                });
            }
            state.stage = WizardStage::ConfirmingCode;
            state.epoch
        };

        self.sleeper
            .sleep(Duration::from_millis(self.config.code_confirm_delay_ms))
            .await;

        let mut state = self.state.write().await;
        if state.epoch != epoch {
            tracing::debug!(session = %self.session_id, "code confirmation resolved after dismissal, ignoring");
            return Err(EnrollError::Dismissed);
        }
        state.stage = WizardStage::CollectingPayment;
        state.code_confirmed = true;

        tracing::info!(session = %self.session_id, "one-time code confirmed");
        Ok(())
    }

    /// Invoke the external checkout.
    ///
    /// A completed payment records the enrollment (idempotent by course
    /// id) and closes the wizard after a short linger. A user dismissal of
    /// the overlay or a gateway failure leaves the wizard in
    /// `CollectingPayment` with nothing recorded.
    pub async fn pay(&self) -> Result<PaymentOutcome, EnrollError> {
        let (email, epoch) = {
            let state = self.state.read().await;
            if state.stage != WizardStage::CollectingPayment {
                return Err(EnrollError::WrongStage(state.stage));
            }
            (state.email.clone(), state.epoch)
        };

        let amount_minor = price_to_minor_units(&self.offering.price)?;
        let request = CheckoutRequest {
            amount_minor,
            currency: self.config.currency.clone(),
            name: self.config.merchant_name.clone(),
            description: format!("Enrollment for {}", self.offering.title),
            prefill_email: email,
            theme_color: self.config.theme_color.clone(),
        };

        tracing::debug!(
            session = %self.session_id,
            amount_minor = amount_minor,
            currency = %request.currency,
            "opening checkout"
        );

        let outcome = match self.gateway.open(request).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(session = %self.session_id, error = %e, "checkout failed to open");
                return Err(e);
            }
        };

        {
            let mut state = self.state.write().await;
            if state.epoch != epoch {
                tracing::debug!(session = %self.session_id, "payment resolved after dismissal, ignoring");
                return Err(EnrollError::Dismissed);
            }

            match &outcome {
                PaymentOutcome::Dismissed => {
                    // Stay in CollectingPayment; nothing was recorded.
                    tracing::debug!(session = %self.session_id, "checkout dismissed by user");
                    return Ok(outcome);
                }
                PaymentOutcome::Completed { payment_id } => {
                    state.stage = WizardStage::CompletingPayment;
                    tracing::info!(
                        session = %self.session_id,
                        payment_id = %payment_id,
                        "payment completed"
                    );
                }
            }
        }

        let record = EnrollmentRecord::new(&self.offering);
        match self.store.upsert_if_absent(record).await {
            Ok(true) => {
                tracing::info!(course_id = self.offering.id, "enrollment recorded")
            }
            Ok(false) => {
                tracing::debug!(course_id = self.offering.id, "already enrolled, record unchanged")
            }
            Err(e) => {
                // Leave the wizard retryable rather than stuck mid-completion.
                let mut state = self.state.write().await;
                if state.epoch == epoch {
                    state.stage = WizardStage::CollectingPayment;
                }
                return Err(e);
            }
        }

        self.sleeper
            .sleep(Duration::from_millis(self.config.completion_linger_ms))
            .await;

        let mut state = self.state.write().await;
        if state.epoch == epoch {
            state.stage = WizardStage::Closed;
        }

        Ok(outcome)
    }

    /// Abandon the wizard.
    ///
    /// Allowed from any stage; discards all in-progress session state with
    /// no store side effects. In-flight simulated operations observe the
    /// epoch bump and drop their results.
    pub async fn dismiss(&self) {
        let mut state = self.state.write().await;
        if state.stage == WizardStage::Closed {
            return;
        }
        state.epoch += 1;
        state.stage = WizardStage::Closed;
        state.email.clear();
        state.code_dispatched = false;
        state.code_confirmed = false;

        tracing::debug!(session = %self.session_id, "wizard dismissed");
    }
}

/// Random session identifier for log correlation
fn new_session_id() -> String {
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    let mut bytes = [0u8; 8];
    rand::Rng::fill(&mut rand::rng(), &mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Purely syntactic email check: one '@', non-empty local part, dotted
/// domain with non-empty labels, no whitespace.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}
