use serde_json::json;
use std::sync::Arc;

use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use echoledger::api::types::{AccountType, BusinessDetails};
use echoledger::api::ApiClient;
use echoledger::config::ApiConfig;
use echoledger::flow::{
    entry_guard, FlowStep, RegisterOutcome, RegistrationFlow, RegistrationForm, StepEntry,
};
use echoledger::store::{DraftSnapshot, DurableSession, MemoryStore, SessionDraft};

fn flow_for(server: &MockServer) -> (RegistrationFlow, DurableSession) {
    let config = ApiConfig {
        base_url: server.uri(),
        timeout_seconds: 5,
    };
    let session = DurableSession::new(Arc::new(MemoryStore::new()));
    let api = ApiClient::new(&config, session.clone()).unwrap();
    let flow = RegistrationFlow::new(api, SessionDraft::new(Arc::new(MemoryStore::new())));
    (flow, session)
}

/// Full business registration, from account type to authenticated
#[tokio::test]
async fn test_business_registration_end_to_end() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/otp/send"))
        .and(body_json(json!({"email": "owner@acme.com"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "statusCode": 200,
            "message": "OTP sent",
            "body": {"email": "owner@acme.com", "otp": "424242"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/otp/verify"))
        .and(body_json(json!({"email": "owner@acme.com", "code": "424242"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "statusCode": 200,
            "message": "verified",
            "body": {"verified": "sess-77"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .and(body_json(json!({
            "sessionId": "sess-77",
            "type": "BUSINESS",
            "firstname": "Grace",
            "lastname": "Hopper",
            "password": "Str0ng!pass",
            "confirm_password": "Str0ng!pass",
            "business": {
                "business_name": "Acme Analytics",
                "business_type": "LLC",
                "employee_count": 40
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "statusCode": 200,
            "message": "created",
            "body": {
                "accessToken": "tok-reg",
                "id": "u-9",
                "firstname": "Grace",
                "lastname": "Hopper",
                "email": "owner@acme.com",
                "role_name": "BUSINESS",
                "is_verified": true
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (flow, session) = flow_for(&server);

    // Step 1: account type
    assert_eq!(flow.entry(FlowStep::AccountType, None), StepEntry::Proceed);
    assert_eq!(
        flow.choose_account_type(AccountType::Business),
        FlowStep::PlanSelection
    );

    // Step 2: plan
    assert_eq!(flow.entry(FlowStep::PlanSelection, None), StepEntry::Proceed);
    assert_eq!(flow.select_plan("pro"), FlowStep::EmailVerification);

    // Step 3: email
    let next = flow.submit_email("owner@acme.com").await.unwrap();
    assert_eq!(next, FlowStep::OtpVerification);
    assert_eq!(flow.draft().issued_otp().as_deref(), Some("424242"));

    // Step 4: OTP
    assert_eq!(flow.entry(FlowStep::OtpVerification, None), StepEntry::Proceed);
    let next = flow.verify_code("424242").await.unwrap();
    assert_eq!(next, FlowStep::Register);

    // Step 5: register
    assert_eq!(flow.entry(FlowStep::Register, None), StepEntry::Proceed);
    let form = RegistrationForm {
        firstname: "Grace".to_string(),
        lastname: "Hopper".to_string(),
        password: "Str0ng!pass".to_string(),
        confirm_password: "Str0ng!pass".to_string(),
        business: Some(BusinessDetails {
            business_name: "Acme Analytics".to_string(),
            business_type: "LLC".to_string(),
            employee_count: Some(40),
        }),
        ..Default::default()
    };
    let user = match flow.register(form).await.unwrap() {
        RegisterOutcome::Authenticated(user) => user,
        other => panic!("expected authenticated outcome, got {:?}", other),
    };

    // Profile normalized from role_name, durable session populated,
    // draft destroyed.
    assert_eq!(user.account_type, Some(AccountType::Business));
    assert!(session.is_authenticated());
    assert_eq!(session.access_token().as_deref(), Some("tok-reg"));
    assert_eq!(flow.snapshot(), DraftSnapshot::default());
}

/// Every guard redirect in one walk: a draft that lost its fields falls
/// back step by step until a step it satisfies
#[test]
fn test_guard_redirect_chain_over_empty_draft() {
    let empty = DraftSnapshot::default();

    assert_eq!(
        entry_guard(FlowStep::Register, &empty, None),
        StepEntry::Redirect(FlowStep::EmailVerification)
    );
    assert_eq!(
        entry_guard(FlowStep::OtpVerification, &empty, None),
        StepEntry::Redirect(FlowStep::EmailVerification)
    );
    assert_eq!(
        entry_guard(FlowStep::PlanSelection, &empty, None),
        StepEntry::Redirect(FlowStep::AccountType)
    );
    assert_eq!(
        entry_guard(FlowStep::EmailVerification, &empty, None),
        StepEntry::Proceed
    );
}

/// A verified session without a plan bounces to plan selection, not all
/// the way back to email verification
#[test]
fn test_guard_register_prefers_plan_redirect_when_session_intact() {
    let draft = DraftSnapshot {
        account_type: Some(AccountType::Personal),
        selected_plan: None,
        verification_email: Some("a@b.com".to_string()),
        session_id: Some("sess-1".to_string()),
    };
    assert_eq!(
        entry_guard(FlowStep::Register, &draft, None),
        StepEntry::Redirect(FlowStep::PlanSelection)
    );
}

/// The OTP success rule both ways: identifier-with-400 succeeds,
/// null-with-200 fails
#[tokio::test]
async fn test_otp_success_judged_by_identifier_not_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/otp/verify"))
        .and(body_json(json!({"email": "a@b.com", "code": "111111"})))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "statusCode": 400,
            "message": "inconsistent backend",
            "body": {"verified": "sess-odd"}
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/otp/verify"))
        .and(body_json(json!({"email": "a@b.com", "code": "222222"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "statusCode": 200,
            "message": "Invalid or expired OTP",
            "body": {"verified": null}
        })))
        .mount(&server)
        .await;

    let (flow, _) = flow_for(&server);
    flow.draft().set_account_type(AccountType::Personal);
    flow.draft().set_verification_email("a@b.com");

    // Identifier present: success despite the 400.
    let next = flow.verify_code("111111").await.unwrap();
    assert_eq!(next, FlowStep::Register);
    assert_eq!(flow.draft().session_id().as_deref(), Some("sess-odd"));

    // Identifier null: failure despite the 200, and the previously stored
    // identifier is untouched.
    let err = flow.verify_code("222222").await.unwrap_err();
    assert_eq!(echoledger::format_error(&err), "Invalid or expired OTP");
    assert_eq!(flow.draft().session_id().as_deref(), Some("sess-odd"));
}

/// Requests after registration carry the new bearer token
#[tokio::test]
async fn test_registered_session_authenticates_subsequent_requests() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "statusCode": 200,
            "message": "created",
            "body": {
                "accessToken": "tok-fresh",
                "id": "u-1",
                "firstname": "Ada",
                "lastname": "Lovelace",
                "email": "a@b.com",
                "type": "PERSONAL",
                "is_verified": true
            }
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/prompt/conversations"))
        .and(header("authorization", "Bearer tok-fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "statusCode": 200,
            "message": "ok",
            "body": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = ApiConfig {
        base_url: server.uri(),
        timeout_seconds: 5,
    };
    let session = DurableSession::new(Arc::new(MemoryStore::new()));
    let api = ApiClient::new(&config, session).unwrap();
    let flow = RegistrationFlow::new(api.clone(), SessionDraft::new(Arc::new(MemoryStore::new())));

    flow.draft().set_account_type(AccountType::Personal);
    flow.draft().set_selected_plan("free");
    flow.draft().set_session_id("sess-1");

    let form = RegistrationForm {
        firstname: "Ada".to_string(),
        lastname: "Lovelace".to_string(),
        password: "Str0ng!pass".to_string(),
        confirm_password: "Str0ng!pass".to_string(),
        ..Default::default()
    };
    assert!(matches!(
        flow.register(form).await.unwrap(),
        RegisterOutcome::Authenticated(_)
    ));

    // The token persisted by registration rides on the next call.
    api.list_conversations().await.unwrap();
}

/// A 401 on an authenticated call clears the durable session
#[tokio::test]
async fn test_expired_token_clears_durable_session() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/prompt/conversations"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "statusCode": 401,
            "message": "Token expired"
        })))
        .mount(&server)
        .await;

    let config = ApiConfig {
        base_url: server.uri(),
        timeout_seconds: 5,
    };
    let session = DurableSession::new(Arc::new(MemoryStore::new()));
    session.set_access_token("tok-stale");
    let api = ApiClient::new(&config, session.clone()).unwrap();

    let err = api.list_conversations().await.unwrap_err();
    assert!(err.to_string().contains("log in again"));
    assert!(session.access_token().is_none());
}
