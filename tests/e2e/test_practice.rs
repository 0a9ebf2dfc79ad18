use crate::e2e::helpers;

use helpers::{finish_utterance, wait_for, TestContext, PARAGRAPH};
use hyper::StatusCode;
use serde_json::json;
use test_context::test_context;

async fn generate_dialogue(ctx: &TestContext) {
    ctx.client
        .post("/api/dialogue", &json!({ "text": PARAGRAPH }))
        .await
        .unwrap()
        .assert_status(StatusCode::OK);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_require_a_cached_dialogue(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            "/api/practice",
            &json!({ "text": PARAGRAPH, "role": "Speaker 1" }),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::NOT_FOUND)
        .assert_error_message("Chưa có hội thoại");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_wait_for_the_user_on_their_first_line(ctx: &TestContext) {
    generate_dialogue(ctx).await;

    let response = ctx
        .client
        .post(
            "/api/practice",
            &json!({ "text": PARAGRAPH, "role": "Speaker 1" }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.value();
    assert_eq!(body["active"], true);
    assert_eq!(body["turn"], json!({ "state": "user_turn", "index": 0 }));
    assert_eq!(body["role"], "Speaker 1");
    assert_eq!(body["total_turns"], 20);
    assert_eq!(body["current"], json!(null));
    assert!(ctx.tts.calls().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_record_the_user_line_and_continue_the_dialogue(ctx: &TestContext) {
    generate_dialogue(ctx).await;

    ctx.client
        .post(
            "/api/practice",
            &json!({ "text": PARAGRAPH, "role": "Speaker 2" }),
        )
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    // Speaker 1 opens, read by the app
    let opening = finish_utterance(&ctx.client, "/api/practice", 0).await;
    assert_eq!(opening["text"], "Line number 0.");
    assert_eq!(opening["voice"], "UK English Female");

    wait_for(&ctx.client, "/api/practice", |b| {
        b["turn"] == json!({ "state": "user_turn", "index": 1 })
    })
    .await;

    let response = ctx
        .client
        .post(
            "/api/practice/recording/start",
            &json!({ "permission": "granted", "audio_inputs": 1 }),
        )
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);
    assert_eq!(response.value()["recording"], true);

    let audio = b"webm-bytes".to_vec();
    let response = ctx
        .client
        .post_bytes("/api/practice/recording/stop", audio.clone(), "audio/webm")
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);
    let body = response.value();
    assert_eq!(body["recording"]["turn_index"], 1);
    assert_eq!(body["recording"]["byte_len"], audio.len());
    assert_eq!(body["practice"]["recording"], false);
    assert_eq!(body["practice"]["recorded_turns"], json!([1]));

    let next = wait_for(&ctx.client, "/api/practice", |b| b["current"]["index"] == 2).await;
    assert_eq!(next["turn"], json!({ "state": "system_turn", "index": 2 }));

    let stored = ctx.client.get("/api/practice/recordings/1").await.unwrap();
    stored.assert_status(StatusCode::OK);
    assert_eq!(stored.header("content-type").map(String::as_str), Some("audio/webm"));
    assert_eq!(stored.body_bytes, audio);

    // The dialogue result now carries the recording on the user's turn
    let response = ctx
        .client
        .post("/api/dialogue", &json!({ "text": PARAGRAPH }))
        .await
        .unwrap();
    let turns = response.value()["turns"].as_array().unwrap();
    assert_eq!(turns[1]["recording"]["turn_index"], 1);
    assert!(turns[0].get("recording").is_none());

    ctx.client
        .delete("/api/practice")
        .await
        .unwrap()
        .assert_status(StatusCode::OK);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_report_a_denied_microphone(ctx: &TestContext) {
    generate_dialogue(ctx).await;
    ctx.client
        .post(
            "/api/practice",
            &json!({ "text": PARAGRAPH, "role": "Speaker 1" }),
        )
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let response = ctx
        .client
        .post(
            "/api/practice/recording/start",
            &json!({ "permission": "denied" }),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY)
        .assert_error_message("Không thể truy cập micro");

    let body = ctx.client.get("/api/practice").await.unwrap();
    assert_eq!(body.value()["recording"], false);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_skip_to_the_next_turn(ctx: &TestContext) {
    generate_dialogue(ctx).await;
    ctx.client
        .post(
            "/api/practice",
            &json!({ "text": PARAGRAPH, "role": "Speaker 1" }),
        )
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let response = ctx.client.post_empty("/api/practice/skip").await.unwrap();
    response.assert_status(StatusCode::OK);
    assert_eq!(
        response.value()["turn"],
        json!({ "state": "system_turn", "index": 1 })
    );

    let spoken = finish_utterance(&ctx.client, "/api/practice", 1).await;
    assert_eq!(spoken["voice"], "US English Male");

    let body = wait_for(&ctx.client, "/api/practice", |b| {
        b["turn"] == json!({ "state": "user_turn", "index": 2 })
    })
    .await;
    assert_eq!(body["recorded_turns"], json!([]));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_an_empty_recording(ctx: &TestContext) {
    generate_dialogue(ctx).await;
    ctx.client
        .post(
            "/api/practice",
            &json!({ "text": PARAGRAPH, "role": "Speaker 1" }),
        )
        .await
        .unwrap()
        .assert_status(StatusCode::OK);
    ctx.client
        .post(
            "/api/practice/recording/start",
            &json!({ "permission": "granted" }),
        )
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let response = ctx
        .client
        .post_bytes("/api/practice/recording/stop", Vec::new(), "audio/webm")
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Bản ghi âm trống");
}
