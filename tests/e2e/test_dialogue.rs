use crate::e2e::helpers;

use helpers::{TestContext, PARAGRAPH};
use hyper::StatusCode;
use serde_json::json;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_generate_a_twenty_line_dialogue(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/api/dialogue", &json!({ "text": PARAGRAPH }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.value();
    assert_eq!(body["status"], "fresh");

    let turns = body["turns"].as_array().unwrap();
    assert_eq!(turns.len(), 20);
    assert_eq!(turns[0]["english"], "Line number 0.");
    assert_eq!(turns[0]["vietnamese"], "Câu số 0.");
    assert_eq!(turns[0]["speaker"], "Speaker 1");
    assert_eq!(turns[1]["speaker"], "Speaker 2");
    assert_eq!(turns[19]["index"], 19);
    assert!(turns[0].get("recording").is_none());
    assert_eq!(body["display_states"].as_array().unwrap().len(), 20);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_cache_dialogues_separately_from_analyses(ctx: &TestContext) {
    ctx.client
        .post("/api/analysis", &json!({ "text": PARAGRAPH }))
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    // Same text, other namespace: not a cache hit
    let response = ctx
        .client
        .post("/api/dialogue", &json!({ "text": PARAGRAPH }))
        .await
        .unwrap();
    assert_eq!(response.value()["status"], "fresh");

    let response = ctx
        .client
        .post("/api/dialogue", &json!({ "text": PARAGRAPH }))
        .await
        .unwrap();
    assert_eq!(response.value()["status"], "cached");
    assert_eq!(response.value()["turns"].as_array().unwrap().len(), 20);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_clear_the_dialogue_on_empty_text(ctx: &TestContext) {
    ctx.client
        .post("/api/dialogue", &json!({ "text": PARAGRAPH }))
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let response = ctx
        .client
        .post("/api/dialogue", &json!({ "text": "" }))
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);
    assert_eq!(response.value()["status"], "cleared");
    assert_eq!(response.value()["turns"], json!([]));
}
