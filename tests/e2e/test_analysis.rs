use crate::e2e::helpers;

use helpers::fake_gemini::REJECTED_KEY;
use helpers::{TestContext, PARAGRAPH};
use hyper::StatusCode;
use serde_json::json;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_analyze_a_paragraph_sentence_by_sentence(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/api/analysis", &json!({ "text": PARAGRAPH }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.value();
    assert_eq!(body["status"], "fresh");

    let sentences = body["sentences"].as_array().unwrap();
    assert_eq!(sentences.len(), 2);
    assert_eq!(sentences[0]["index"], 0);
    assert_eq!(sentences[0]["english"], "I like tea.");
    assert_eq!(sentences[0]["vietnamese"], "Tôi thích trà.");
    assert_eq!(sentences[1]["index"], 1);
    assert_eq!(sentences[1]["english"], "She reads books.");

    // Grammar arrives pre-split on its line marker
    let lines = sentences[0]["grammar_lines"].as_array().unwrap();
    assert_eq!(lines.len(), 2);

    // Fresh results reset every reveal level
    assert_eq!(body["display_states"], json!([0, 0]));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_serve_repeated_text_from_the_session_cache(ctx: &TestContext) {
    ctx.client
        .post("/api/analysis", &json!({ "text": PARAGRAPH }))
        .await
        .unwrap()
        .assert_status(StatusCode::OK);
    let calls = ctx.gemini.call_count();

    let response = ctx
        .client
        .post("/api/analysis", &json!({ "text": PARAGRAPH }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.value()["status"], "cached");
    assert_eq!(response.value()["sentences"].as_array().unwrap().len(), 2);
    assert_eq!(ctx.gemini.call_count(), calls);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_clear_and_invalidate_on_empty_text(ctx: &TestContext) {
    ctx.client
        .post("/api/analysis", &json!({ "text": PARAGRAPH }))
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let response = ctx
        .client
        .post("/api/analysis", &json!({ "text": "  " }))
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);
    assert_eq!(response.value()["status"], "cleared");
    assert_eq!(response.value()["sentences"], json!([]));

    // The previous entry is gone, so the same text is fetched again
    let response = ctx
        .client
        .post("/api/analysis", &json!({ "text": PARAGRAPH }))
        .await
        .unwrap();
    assert_eq!(response.value()["status"], "fresh");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_rotate_past_a_rejected_key_and_keep_the_pointer(ctx: &TestContext) {
    ctx.client
        .post("/api/analysis", &json!({ "text": PARAGRAPH }))
        .await
        .unwrap()
        .assert_status(StatusCode::OK);
    assert_eq!(ctx.gemini.keys_seen(), vec![REJECTED_KEY, "good-key"]);

    // The next logical request starts from the key that worked
    ctx.client
        .post("/api/analysis", &json!({ "text": "Another short paragraph." }))
        .await
        .unwrap()
        .assert_status(StatusCode::OK);
    assert_eq!(
        ctx.gemini.keys_seen(),
        vec![REJECTED_KEY, "good-key", "good-key"]
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_send_one_request_per_merged_paragraph(ctx: &TestContext) {
    let long_line = "word ".repeat(40);
    let text = format!("{}\n{}\n\nShort tail.", long_line.trim(), long_line.trim());

    let response = ctx
        .client
        .post("/api/analysis", &json!({ "text": text }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let sentences = response.value()["sentences"].as_array().unwrap();
    // Each paragraph yields the two canned sentences, indexed across the batch
    let indexes: Vec<u64> = sentences
        .iter()
        .map(|s| s["index"].as_u64().unwrap())
        .collect();
    assert_eq!(indexes, (0..sentences.len() as u64).collect::<Vec<_>>());
    assert!(sentences.len() >= 4);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_keep_sessions_apart(ctx: &TestContext) {
    ctx.client
        .post("/api/analysis", &json!({ "text": PARAGRAPH }))
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let response = ctx
        .client
        .with_session("another-page-session")
        .post("/api/analysis", &json!({ "text": PARAGRAPH }))
        .await
        .unwrap();
    assert_eq!(response.value()["status"], "fresh");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_requests_without_a_session(ctx: &TestContext) {
    let response = ctx
        .client
        .anonymous()
        .post("/api/analysis", &json!({ "text": PARAGRAPH }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::UNAUTHORIZED)
        .assert_error_message("X-Session-Id");
}
