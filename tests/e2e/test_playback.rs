use crate::e2e::helpers;

use dialogtape_backend::domain::playback::Voice;
use helpers::fake_tts::FakeTts;
use helpers::{finish_utterance, wait_for, TestContext, PARAGRAPH};
use hyper::StatusCode;
use serde_json::json;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_refuse_playback_of_uncached_text(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            "/api/playback",
            &json!({ "source": "analysis", "text": "Never analyzed." }),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::NOT_FOUND)
        .assert_error_message("Chưa có dữ liệu");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_speed_outside_the_allowed_range(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            "/api/playback",
            &json!({ "source": "analysis", "text": PARAGRAPH, "speed": 3.0 }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_read_analyzed_sentences_in_order(ctx: &TestContext) {
    ctx.client
        .post("/api/analysis", &json!({ "text": PARAGRAPH }))
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let response = ctx
        .client
        .post(
            "/api/playback",
            &json!({ "source": "analysis", "text": PARAGRAPH, "speed": 0.8 }),
        )
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);

    let first = finish_utterance(&ctx.client, "/api/playback", 0).await;
    assert_eq!(first["text"], "I like tea.");
    assert_eq!(first["voice"], "US English Male");
    assert_eq!(first["volume"], 1.0);

    let second = finish_utterance(&ctx.client, "/api/playback", 1).await;
    assert_eq!(second["text"], "She reads books.");

    let body = wait_for(&ctx.client, "/api/playback", |b| b["state"] == "idle").await;
    assert_eq!(body["current"], json!(null));
    assert_eq!(
        body["characters_spoken"],
        ("I like tea.".len() + "She reads books.".len()) as u64
    );

    let calls = ctx.tts.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls.iter().all(|(_, voice, rate)| *voice == Voice::UsEnglishMale && *rate == 0.8));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_alternate_voices_for_a_dialogue_and_serve_its_audio(ctx: &TestContext) {
    ctx.client
        .post("/api/dialogue", &json!({ "text": PARAGRAPH }))
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    ctx.client
        .post(
            "/api/playback",
            &json!({ "source": "dialogue", "text": PARAGRAPH }),
        )
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let body = wait_for(&ctx.client, "/api/playback", |b| b["current"]["index"] == 0).await;
    assert_eq!(body["state"], "speaking");
    assert_eq!(body["current"]["voice"], "UK English Female");

    let audio_url = body["current"]["audio_url"].as_str().unwrap().to_string();
    let audio = ctx.client.get(&audio_url).await.unwrap();
    audio.assert_status(StatusCode::OK);
    assert_eq!(audio.header("content-type").map(String::as_str), Some("audio/mpeg"));
    assert_eq!(audio.body_bytes, FakeTts::audio_for("Line number 0."));

    finish_utterance(&ctx.client, "/api/playback", 0).await;
    let second = finish_utterance(&ctx.client, "/api/playback", 1).await;
    assert_eq!(second["voice"], "US English Male");

    ctx.client
        .delete("/api/playback")
        .await
        .unwrap()
        .assert_status(StatusCode::OK);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_stop_playback_and_drop_the_current_utterance(ctx: &TestContext) {
    ctx.client
        .post("/api/dialogue", &json!({ "text": PARAGRAPH }))
        .await
        .unwrap()
        .assert_status(StatusCode::OK);
    ctx.client
        .post(
            "/api/playback",
            &json!({ "source": "dialogue", "text": PARAGRAPH, "repeat": true }),
        )
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let body = wait_for(&ctx.client, "/api/playback", |b| !b["current"].is_null()).await;
    assert_eq!(body["repeat"], true);
    let stale_id = body["current"]["id"].clone();

    let response = ctx.client.delete("/api/playback").await.unwrap();
    response.assert_status(StatusCode::OK);
    assert_eq!(response.value()["state"], "idle");
    assert_eq!(response.value()["current"], json!(null));

    // A late end report for the dropped utterance is ignored
    let response = ctx
        .client
        .post("/api/playback/ended", &json!({ "utterance_id": stale_id }))
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);
    assert_eq!(response.value()["accepted"], false);
}
