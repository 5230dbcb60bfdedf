//! The ephemeral registration session draft
//!
//! Typed accessors over the raw key/value store that carries the signup
//! wizard's intermediate state between steps. Created when the user
//! reaches the first step; destroyed atomically on successful
//! registration. Keys match the original client's sessionStorage names.

use crate::api::types::AccountType;
use crate::store::KeyValueStore;
use std::sync::Arc;

/// Draft key: chosen account category
pub const KEY_ACCOUNT_TYPE: &str = "accountType";
/// Draft key: selected subscription plan identifier
pub const KEY_SELECTED_PLAN: &str = "selectedPlan";
/// Draft key: address that received the one-time code
pub const KEY_VERIFICATION_EMAIL: &str = "verificationEmail";
/// Draft key: echoed OTP, present only against dev backends
pub const KEY_OTP_SET: &str = "otpSet";
/// Draft key: registration session identifier from OTP verification
pub const KEY_SESSION_ID: &str = "sessionId";

const ALL_KEYS: [&str; 5] = [
    KEY_ACCOUNT_TYPE,
    KEY_SELECTED_PLAN,
    KEY_VERIFICATION_EMAIL,
    KEY_OTP_SET,
    KEY_SESSION_ID,
];

/// Typed view over the ephemeral signup draft
///
/// # Examples
///
/// ```
/// use echoledger::api::types::AccountType;
/// use echoledger::store::{MemoryStore, SessionDraft};
/// use std::sync::Arc;
///
/// let draft = SessionDraft::new(Arc::new(MemoryStore::new()));
/// draft.set_account_type(AccountType::Business);
/// assert_eq!(draft.account_type(), Some(AccountType::Business));
/// draft.clear();
/// assert_eq!(draft.account_type(), None);
/// ```
#[derive(Clone)]
pub struct SessionDraft {
    store: Arc<dyn KeyValueStore>,
}

impl SessionDraft {
    /// Create a draft view over the given store
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The chosen account category, if step one has completed
    pub fn account_type(&self) -> Option<AccountType> {
        self.store
            .get(KEY_ACCOUNT_TYPE)
            .and_then(|s| AccountType::parse_str(&s))
    }

    /// Record the chosen account category
    pub fn set_account_type(&self, account_type: AccountType) {
        self.store.set(KEY_ACCOUNT_TYPE, account_type.as_str());
    }

    /// The selected plan identifier, if the plan step has completed
    pub fn selected_plan(&self) -> Option<String> {
        self.store.get(KEY_SELECTED_PLAN)
    }

    /// Record the selected plan
    pub fn set_selected_plan(&self, plan: &str) {
        self.store.set(KEY_SELECTED_PLAN, plan);
    }

    /// The address the one-time code was sent to
    pub fn verification_email(&self) -> Option<String> {
        self.store.get(KEY_VERIFICATION_EMAIL)
    }

    /// Record the verified address
    pub fn set_verification_email(&self, email: &str) {
        self.store.set(KEY_VERIFICATION_EMAIL, email);
    }

    /// The echoed OTP, present only when the backend runs in echo mode
    pub fn issued_otp(&self) -> Option<String> {
        self.store.get(KEY_OTP_SET)
    }

    /// Record the echoed OTP for display
    pub fn set_issued_otp(&self, otp: &str) {
        self.store.set(KEY_OTP_SET, otp);
    }

    /// The registration session identifier from OTP verification; its
    /// presence is the sole gate allowing entry to final registration
    pub fn session_id(&self) -> Option<String> {
        self.store.get(KEY_SESSION_ID)
    }

    /// Record the registration session identifier
    pub fn set_session_id(&self, session_id: &str) {
        self.store.set(KEY_SESSION_ID, session_id);
    }

    /// Delete every draft key in one operation
    pub fn clear(&self) {
        self.store.remove_many(&ALL_KEYS);
    }

    /// Capture the fields the entry guards consult
    pub fn snapshot(&self) -> DraftSnapshot {
        DraftSnapshot {
            account_type: self.account_type(),
            selected_plan: self.selected_plan(),
            verification_email: self.verification_email(),
            session_id: self.session_id(),
        }
    }
}

/// Point-in-time copy of the guard-relevant draft fields
///
/// The flow machine's guards are pure functions over this snapshot, so
/// they can be tested without any store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftSnapshot {
    pub account_type: Option<AccountType>,
    pub selected_plan: Option<String>,
    pub verification_email: Option<String>,
    pub session_id: Option<String>,
}
