use crate::e2e::helpers;

use helpers::TestContext;
use hyper::StatusCode;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_ok_for_health_check(ctx: &TestContext) {
    let response = ctx.client.get("/health").await.unwrap();

    response.assert_status(StatusCode::OK);

    // Health endpoint returns plain text
    let body = String::from_utf8(response.body_bytes.clone()).unwrap();
    assert_eq!(body, "OK");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_report_key_pool_and_tts_provider_when_ready(ctx: &TestContext) {
    let response = ctx.client.get("/health/ready").await.unwrap();

    response.assert_status(StatusCode::OK);

    let body = response.value();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["gemini_keys"], 2);
    assert_eq!(body["tts"], "fake");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_not_require_a_session_for_health_checks(ctx: &TestContext) {
    let anonymous = ctx.client.anonymous();

    anonymous
        .get("/health")
        .await
        .unwrap()
        .assert_status(StatusCode::OK);
    anonymous
        .get("/health/ready")
        .await
        .unwrap()
        .assert_status(StatusCode::OK);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_include_request_id_in_responses(ctx: &TestContext) {
    let response = ctx.client.get("/health").await.unwrap();
    response.assert_header_exists("x-request-id");

    // Errors carry it too
    let response = ctx.client.anonymous().get("/api/playback").await.unwrap();
    response.assert_status(StatusCode::UNAUTHORIZED);
    response.assert_header_exists("x-request-id");
}
