//! Authentication endpoints
//!
//! OTP issue/verify, registration, and login. Three of these endpoints
//! return domain failures as structured envelopes on 400-class statuses;
//! those statuses are listed as accepted so callers always get the
//! envelope and decide from its contents.

use crate::api::envelope::Envelope;
use crate::api::types::{
    AuthResponse, LoginRequest, OtpRequest, OtpSent, OtpVerified, RegistrationRequest,
};
use crate::api::ApiClient;
use crate::error::Result;
use reqwest::StatusCode;

impl ApiClient {
    /// `POST /auth/otp/send` — issue a one-time code to an address
    ///
    /// The returned payload echoes the address and, only against
    /// non-production backends, the code itself.
    pub async fn send_otp(&self, email: &str) -> Result<Envelope<OtpSent>> {
        self.post_json(
            "/auth/otp/send",
            &OtpRequest {
                email: email.to_string(),
            },
            &[],
        )
        .await
    }

    /// `POST /auth/otp/resend` — reissue the code to the same address
    pub async fn resend_otp(&self, email: &str) -> Result<Envelope<OtpSent>> {
        self.post_json(
            "/auth/otp/resend",
            &OtpRequest {
                email: email.to_string(),
            },
            &[],
        )
        .await
    }

    /// `POST /auth/otp/verify` — exchange a code for a session identifier
    ///
    /// A 400 response still carries the verification result, so it is
    /// returned as a structured envelope rather than an error. Callers
    /// must judge success from the payload's `verified` field, not the
    /// status.
    pub async fn verify_otp(&self, email: &str, code: &str) -> Result<Envelope<OtpVerified>> {
        self.post_json(
            "/auth/otp/verify",
            &crate::api::types::OtpVerifyRequest {
                email: email.to_string(),
                code: code.to_string(),
            },
            &[StatusCode::BAD_REQUEST],
        )
        .await
    }

    /// `POST /auth/register` — create the account
    ///
    /// 400 envelopes (validation failures, expired sessions) come back as
    /// structured responses so their message reaches the form.
    pub async fn register(&self, request: &RegistrationRequest) -> Result<Envelope<AuthResponse>> {
        self.post_json("/auth/register", request, &[StatusCode::BAD_REQUEST])
            .await
    }

    /// `POST /auth/login` — authenticate with email and password
    ///
    /// Both 400 and 401 envelopes are structured domain errors here; note
    /// the global interceptor will still have cleared any stale durable
    /// session before this returns a 401 envelope.
    pub async fn login(&self, email: &str, password: &str) -> Result<Envelope<AuthResponse>> {
        self.post_json(
            "/auth/login",
            &LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            },
            &[StatusCode::BAD_REQUEST, StatusCode::UNAUTHORIZED],
        )
        .await
    }
}
