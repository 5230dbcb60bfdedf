//! Registration flow operations
//!
//! [`RegistrationFlow`] binds the step machine to the API client and the
//! session stores. Each operation performs one step's submission, mutates
//! the draft, and returns the step to move to next. Entry guards are
//! evaluated separately via [`RegistrationFlow::entry`] so drivers can
//! honor redirects before prompting for input.

use crate::api::types::{AccountType, BusinessDetails, RegistrationRequest, UserProfile};
use crate::api::ApiClient;
use crate::error::{EchoLedgerError, Result};
use crate::flow::cooldown::ResendCooldown;
use crate::flow::machine::{entry_guard, FlowStep, StepEntry};
use crate::store::{DraftSnapshot, SessionDraft};
use crate::validate::{validate_email, validate_otp_code, validate_password};

/// Plan identifier assumed when the user skips the plan step
pub const DEFAULT_PLAN: &str = "free";

/// Fields collected at the final registration step
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub firstname: String,
    pub lastname: String,
    pub password: String,
    pub confirm_password: String,
    /// Assistant display name, personal accounts only
    pub ai_name: Option<String>,
    /// Assistant persona, personal accounts only
    pub ai_role: Option<String>,
    /// Company details, required for business accounts
    pub business: Option<BusinessDetails>,
}

impl RegistrationForm {
    /// Client-side validation of the form against the chosen account type
    fn validate(&self, account_type: AccountType) -> Result<()> {
        if self.firstname.trim().is_empty() || self.lastname.trim().is_empty() {
            return Err(
                EchoLedgerError::Validation("First and last name are required".to_string()).into(),
            );
        }

        let password_errors = validate_password(&self.password);
        if !password_errors.is_empty() {
            return Err(EchoLedgerError::Validation(password_errors.join("; ")).into());
        }
        if self.password != self.confirm_password {
            return Err(EchoLedgerError::Validation("Passwords do not match".to_string()).into());
        }

        if account_type == AccountType::Business {
            match &self.business {
                Some(details)
                    if !details.business_name.trim().is_empty()
                        && !details.business_type.trim().is_empty() => {}
                _ => {
                    return Err(EchoLedgerError::Validation(
                        "Business name and type are required for business accounts".to_string(),
                    )
                    .into())
                }
            }
        }

        Ok(())
    }
}

/// Outcome of a successful final registration
#[derive(Debug)]
pub enum RegisterOutcome {
    /// The durable session is populated and the draft destroyed
    Authenticated(UserProfile),
    /// Draft prerequisites disappeared between entry and submit; resume
    /// at the named step
    Redirect(FlowStep),
}

/// Drives the registration session flow against one draft store
#[derive(Clone)]
pub struct RegistrationFlow {
    api: ApiClient,
    draft: SessionDraft,
}

impl RegistrationFlow {
    pub fn new(api: ApiClient, draft: SessionDraft) -> Self {
        Self { api, draft }
    }

    /// The draft this flow mutates
    pub fn draft(&self) -> &SessionDraft {
        &self.draft
    }

    /// Current guard-relevant draft state
    pub fn snapshot(&self) -> DraftSnapshot {
        self.draft.snapshot()
    }

    /// Evaluate the entry guard for a step against the live draft
    pub fn entry(&self, step: FlowStep, requested_type: Option<AccountType>) -> StepEntry {
        entry_guard(step, &self.draft.snapshot(), requested_type)
    }

    /// Step one: record the account category
    pub fn choose_account_type(&self, account_type: AccountType) -> FlowStep {
        self.draft.set_account_type(account_type);
        tracing::debug!("Account type chosen: {}", account_type);
        FlowStep::PlanSelection
    }

    /// Step two: record the selected plan
    pub fn select_plan(&self, plan: &str) -> FlowStep {
        self.draft.set_selected_plan(plan);
        tracing::debug!("Plan selected: {}", plan);
        FlowStep::EmailVerification
    }

    /// Step two, skipped: fall back to the default plan
    pub fn skip_plan(&self) -> FlowStep {
        self.select_plan(DEFAULT_PLAN)
    }

    /// Step three: submit the address and trigger OTP issuance
    ///
    /// On success the address is recorded in the draft, along with the
    /// echoed code when the backend runs in echo mode.
    pub async fn submit_email(&self, email: &str) -> Result<FlowStep> {
        let email = email.trim();
        if !validate_email(email) {
            return Err(
                EchoLedgerError::Validation("Please enter a valid email address".to_string())
                    .into(),
            );
        }

        let envelope = self.api.send_otp(email).await?;
        let sent = envelope.require_payload()?;

        self.draft.set_verification_email(email);
        if let Some(otp) = &sent.otp {
            self.draft.set_issued_otp(otp);
        }
        tracing::info!("OTP issued to {}", email);
        Ok(FlowStep::OtpVerification)
    }

    /// Step four: exchange the code for a registration session identifier
    ///
    /// Success is judged solely by the presence of a non-null `verified`
    /// identifier in the payload; the envelope's status code is not
    /// consulted. The backend has been observed returning domain errors
    /// with 200 and valid identifiers alongside non-200 statuses, and
    /// either way the identifier is what the register step needs.
    pub async fn verify_code(&self, code: &str) -> Result<FlowStep> {
        if !validate_otp_code(code) {
            return Err(
                EchoLedgerError::Validation("Enter the 6-digit code".to_string()).into(),
            );
        }
        let email = self.draft.verification_email().ok_or_else(|| {
            EchoLedgerError::Validation("No verification email on record".to_string())
        })?;

        let envelope = self.api.verify_otp(&email, code).await?;
        let status = envelope.status_code;
        let message = envelope.message.clone();
        let verified = envelope.into_payload().and_then(|p| p.verified);

        match verified {
            Some(session_id) => {
                self.draft.set_session_id(&session_id);
                tracing::info!("OTP verified, registration session established");
                if self.draft.account_type().is_some() {
                    Ok(FlowStep::Register)
                } else {
                    // The draft never saw step one (e.g. the user jumped
                    // straight to email verification); collect the type now.
                    Ok(FlowStep::AccountType)
                }
            }
            None => {
                let message = if message.is_empty() {
                    "Invalid or expired OTP. Please try again.".to_string()
                } else {
                    message
                };
                Err(EchoLedgerError::Api { status, message }.into())
            }
        }
    }

    /// Reissue the one-time code, subject to the resend window
    ///
    /// The cooldown starts only when the backend confirms the resend.
    pub async fn resend_code(&self, cooldown: &mut ResendCooldown) -> Result<()> {
        if cooldown.is_active() {
            return Err(EchoLedgerError::Validation(format!(
                "Please wait {}s before requesting another code",
                cooldown.remaining().as_secs().max(1)
            ))
            .into());
        }
        let email = self.draft.verification_email().ok_or_else(|| {
            EchoLedgerError::Validation("No verification email on record".to_string())
        })?;

        let envelope = self.api.resend_otp(&email).await?;
        let sent = envelope.require_payload()?;
        if let Some(otp) = &sent.otp {
            self.draft.set_issued_otp(otp);
        }
        cooldown.begin();
        tracing::info!("OTP reissued to {}", email);
        Ok(())
    }

    /// Final step: create the account
    ///
    /// Re-checks the draft prerequisites at submit time. On success the
    /// token is persisted before the profile, the draft is destroyed, and
    /// the normalized profile is returned.
    pub async fn register(&self, form: RegistrationForm) -> Result<RegisterOutcome> {
        let snapshot = self.draft.snapshot();
        let (session_id, account_type) = match (snapshot.session_id, snapshot.account_type) {
            (Some(session_id), Some(account_type)) => (session_id, account_type),
            _ => return Ok(RegisterOutcome::Redirect(FlowStep::EmailVerification)),
        };
        if snapshot.selected_plan.is_none() {
            return Ok(RegisterOutcome::Redirect(FlowStep::PlanSelection));
        }

        form.validate(account_type)?;

        let request = RegistrationRequest {
            session_id,
            account_type,
            firstname: form.firstname.trim().to_string(),
            lastname: form.lastname.trim().to_string(),
            password: form.password,
            confirm_password: form.confirm_password,
            ai_name: form.ai_name.filter(|s| !s.trim().is_empty()),
            ai_role: form.ai_role.filter(|s| !s.trim().is_empty()),
            business: if account_type == AccountType::Business {
                form.business
            } else {
                None
            },
        };

        let envelope = self.api.register(&request).await?;
        let status = envelope.status_code;
        let message = envelope.message.clone();
        let auth = envelope.into_payload().ok_or(EchoLedgerError::Api {
            status,
            message: if message.is_empty() {
                "Invalid response from server: missing access token".to_string()
            } else {
                message
            },
        })?;
        if auth.access_token.is_empty() {
            return Err(EchoLedgerError::Api {
                status,
                message: "Invalid response from server: missing access token".to_string(),
            }
            .into());
        }

        let user = self.api.session().persist(auth);
        self.draft.clear();
        tracing::info!("Registration complete for {}", user.email);
        Ok(RegisterOutcome::Authenticated(user))
    }
}
