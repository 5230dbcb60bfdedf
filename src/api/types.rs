//! Wire types for the Echo Ledger REST API
//!
//! Request and response structures as consumed by the registration flow
//! and the conversational sync layer. Field names mirror the backend's
//! JSON exactly; serde renames cover the camelCase identifiers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account category chosen at the first step of signup
///
/// Gates which later steps are valid: business accounts collect nested
/// business details at registration and land on the business dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    /// Individual account
    Personal,
    /// Company account with nested business details
    Business,
}

impl AccountType {
    /// Parse an account type from a string, case-insensitively
    ///
    /// # Examples
    ///
    /// ```
    /// use echoledger::api::types::AccountType;
    ///
    /// assert_eq!(AccountType::parse_str("business"), Some(AccountType::Business));
    /// assert_eq!(AccountType::parse_str("PERSONAL"), Some(AccountType::Personal));
    /// assert_eq!(AccountType::parse_str("admin"), None);
    /// ```
    pub fn parse_str(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "PERSONAL" => Some(Self::Personal),
            "BUSINESS" => Some(Self::Business),
            _ => None,
        }
    }

    /// Canonical wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Personal => "PERSONAL",
            Self::Business => "BUSINESS",
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body for `POST /auth/otp/send` and `POST /auth/otp/resend`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpRequest {
    /// Address the one-time code is mailed to
    pub email: String,
}

/// Payload of a successful OTP send
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpSent {
    /// Echo of the submitted address
    pub email: String,
    /// The issued code, present only when the backend runs in the
    /// non-production echo-OTP mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otp: Option<String>,
}

/// Request body for `POST /auth/otp/verify`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpVerifyRequest {
    /// Address the code was sent to
    pub email: String,
    /// The 6-digit code the user entered
    pub code: String,
}

/// Payload of an OTP verification attempt
///
/// `verified` carries the registration session identifier on success and
/// is null on failure. The HTTP status is not a reliable success signal
/// for this endpoint; only this field is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpVerified {
    /// Opaque session identifier, or null when the code was rejected
    pub verified: Option<String>,
}

/// Nested business details submitted with a business registration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessDetails {
    /// Legal or trading name
    pub business_name: String,
    /// Free-form type, e.g. "LLC"
    pub business_type: String,
    /// Headcount, optional
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_count: Option<u32>,
}

/// Request body for `POST /auth/register`
///
/// One shape covers both account types; `business` is only present for
/// business registrations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationRequest {
    /// Session identifier obtained from OTP verification
    #[serde(rename = "sessionId")]
    pub session_id: String,
    /// Account category being registered
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub firstname: String,
    pub lastname: String,
    pub password: String,
    pub confirm_password: String,
    /// Optional AI-assistant personalization
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_role: Option<String>,
    /// Business details, required when `account_type` is Business
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business: Option<BusinessDetails>,
}

/// Request body for `POST /auth/login`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// A user profile as stored in the durable session
///
/// The backend may return `role_name` instead of `type`; see
/// [`UserProfile::normalize`] for the reconciliation rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    /// Canonical account category; may be absent on the wire when the
    /// backend sends `role_name` instead
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub account_type: Option<AccountType>,
    /// Legacy role field some backend responses carry in place of `type`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_name: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business: Option<BusinessDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
}

impl UserProfile {
    /// Reconcile `role_name` into the canonical `type` field
    ///
    /// The backend is inconsistent about which field carries the account
    /// category. Before a profile is persisted, the missing `type` is
    /// filled from `role_name` when the latter parses as a known category.
    ///
    /// # Examples
    ///
    /// ```
    /// use echoledger::api::types::{AccountType, UserProfile};
    ///
    /// let mut profile = UserProfile::stub("u1", "a@b.com");
    /// profile.role_name = Some("BUSINESS".to_string());
    /// profile.normalize();
    /// assert_eq!(profile.account_type, Some(AccountType::Business));
    /// ```
    pub fn normalize(&mut self) {
        if self.account_type.is_none() {
            if let Some(role) = &self.role_name {
                match AccountType::parse_str(role) {
                    Some(parsed) => {
                        tracing::debug!("Normalized user type from role_name: {}", parsed);
                        self.account_type = Some(parsed);
                    }
                    None => {
                        tracing::warn!("Unrecognized role_name '{}', type left unset", role);
                    }
                }
            }
        }
    }

    /// Minimal profile for tests and doc examples
    pub fn stub(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            firstname: "Test".to_string(),
            lastname: "User".to_string(),
            email: email.into(),
            account_type: None,
            role_name: None,
            is_verified: true,
            ai_name: None,
            ai_role: None,
            business: None,
            plan: None,
        }
    }
}

/// Payload of a successful registration or login: the profile plus the
/// bearer credential, flattened into one object on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Durable bearer credential, opaque to the client
    #[serde(rename = "accessToken")]
    pub access_token: String,
    /// The authenticated user's profile fields
    #[serde(flatten)]
    pub user: UserProfile,
}

/// A subscription plan from `GET /subscription/plans`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    /// Plan identifier submitted back at registration, e.g. "free", "pro"
    pub plan: String,
    /// Display name
    pub name: String,
    pub price: f64,
    pub currency: String,
    #[serde(default)]
    pub features: Vec<String>,
    /// Opaque limit description; shape varies per plan
    #[serde(default)]
    pub limits: serde_json::Value,
}

/// Who authored a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message in a conversation thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    /// Creates a user-authored message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Creates an assistant-authored message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Request body for `POST /prompt/send`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptRequest {
    /// The user's message text
    pub prompt: String,
    /// Thread to append to; absent to start a new thread
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

/// Payload of a successful prompt send
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptReply {
    /// Thread identifier; newly assigned when the request started a thread
    #[serde(rename = "conversationId")]
    pub conversation_id: Option<String>,
    /// The assistant's reply text
    pub response: String,
}

/// Summary of a conversation thread from `GET /prompt/conversations`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
