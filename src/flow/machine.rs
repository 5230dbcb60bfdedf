//! Registration step machine
//!
//! The signup flow is a linear sequence of steps, each with an entry
//! guard over the current session draft. Guards are pure: given a step
//! and a [`DraftSnapshot`] they either admit the step or name the step
//! to fall back to. All redirect decisions live here so the interactive
//! driver and the tests exercise the same logic.

use crate::api::types::AccountType;
use crate::store::DraftSnapshot;
use std::fmt;

/// One step of the registration flow, in forward order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowStep {
    /// Choose personal or business
    AccountType,
    /// Pick a subscription tier (skippable)
    PlanSelection,
    /// Provide the address to verify
    EmailVerification,
    /// Enter the one-time code
    OtpVerification,
    /// Fill in the account details
    Register,
    /// Terminal: the durable session is populated
    Authenticated,
}

impl fmt::Display for FlowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FlowStep::AccountType => "account type",
            FlowStep::PlanSelection => "plan selection",
            FlowStep::EmailVerification => "email verification",
            FlowStep::OtpVerification => "OTP verification",
            FlowStep::Register => "registration",
            FlowStep::Authenticated => "authenticated",
        };
        write!(f, "{}", name)
    }
}

/// Outcome of an entry guard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepEntry {
    /// The draft satisfies the step's prerequisites
    Proceed,
    /// Prerequisites missing; resume at this earlier step
    Redirect(FlowStep),
}

/// Decide whether `step` may be entered given the current draft
///
/// `requested_type` is the account type the caller believes it is
/// signing up as (carried between steps the way a query parameter
/// would be); when present it must agree with the type recorded in
/// the draft.
///
/// Redirect targets follow the flow's fallback rules:
/// - plan selection without a chosen type restarts at account type
/// - OTP entry without a stored address restarts at email verification
/// - registration without a verified session restarts at email
///   verification, and without a plan falls back to plan selection
pub fn entry_guard(
    step: FlowStep,
    draft: &DraftSnapshot,
    requested_type: Option<AccountType>,
) -> StepEntry {
    match step {
        FlowStep::AccountType | FlowStep::EmailVerification | FlowStep::Authenticated => {
            StepEntry::Proceed
        }
        FlowStep::PlanSelection => match draft.account_type {
            Some(stored) => {
                if requested_type.map(|t| t == stored).unwrap_or(true) {
                    StepEntry::Proceed
                } else {
                    StepEntry::Redirect(FlowStep::AccountType)
                }
            }
            None => StepEntry::Redirect(FlowStep::AccountType),
        },
        FlowStep::OtpVerification => {
            if draft.verification_email.is_some() {
                StepEntry::Proceed
            } else {
                StepEntry::Redirect(FlowStep::EmailVerification)
            }
        }
        FlowStep::Register => {
            if draft.session_id.is_none() || draft.account_type.is_none() {
                StepEntry::Redirect(FlowStep::EmailVerification)
            } else if draft.selected_plan.is_none() {
                StepEntry::Redirect(FlowStep::PlanSelection)
            } else {
                StepEntry::Proceed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty() -> DraftSnapshot {
        DraftSnapshot::default()
    }

    fn full() -> DraftSnapshot {
        DraftSnapshot {
            account_type: Some(AccountType::Personal),
            selected_plan: Some("free".to_string()),
            verification_email: Some("a@b.com".to_string()),
            session_id: Some("sess-1".to_string()),
        }
    }

    #[test]
    fn test_account_type_always_enters() {
        assert_eq!(
            entry_guard(FlowStep::AccountType, &empty(), None),
            StepEntry::Proceed
        );
    }

    #[test]
    fn test_plan_selection_requires_chosen_type() {
        assert_eq!(
            entry_guard(FlowStep::PlanSelection, &empty(), None),
            StepEntry::Redirect(FlowStep::AccountType)
        );
        assert_eq!(
            entry_guard(FlowStep::PlanSelection, &full(), None),
            StepEntry::Proceed
        );
    }

    #[test]
    fn test_plan_selection_rejects_type_mismatch() {
        assert_eq!(
            entry_guard(FlowStep::PlanSelection, &full(), Some(AccountType::Business)),
            StepEntry::Redirect(FlowStep::AccountType)
        );
        assert_eq!(
            entry_guard(FlowStep::PlanSelection, &full(), Some(AccountType::Personal)),
            StepEntry::Proceed
        );
    }

    #[test]
    fn test_otp_verification_requires_stored_email() {
        assert_eq!(
            entry_guard(FlowStep::OtpVerification, &empty(), None),
            StepEntry::Redirect(FlowStep::EmailVerification)
        );
        assert_eq!(
            entry_guard(FlowStep::OtpVerification, &full(), None),
            StepEntry::Proceed
        );
    }

    #[test]
    fn test_register_requires_session_and_type() {
        let mut draft = full();
        draft.session_id = None;
        assert_eq!(
            entry_guard(FlowStep::Register, &draft, None),
            StepEntry::Redirect(FlowStep::EmailVerification)
        );

        let mut draft = full();
        draft.account_type = None;
        assert_eq!(
            entry_guard(FlowStep::Register, &draft, None),
            StepEntry::Redirect(FlowStep::EmailVerification)
        );
    }

    #[test]
    fn test_register_without_plan_falls_back_to_plan_selection() {
        let mut draft = full();
        draft.selected_plan = None;
        assert_eq!(
            entry_guard(FlowStep::Register, &draft, None),
            StepEntry::Redirect(FlowStep::PlanSelection)
        );
    }

    #[test]
    fn test_register_enters_with_complete_draft() {
        assert_eq!(
            entry_guard(FlowStep::Register, &full(), None),
            StepEntry::Proceed
        );
    }
}
