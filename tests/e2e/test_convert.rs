use crate::e2e::helpers;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use helpers::stubs::{StubBehavior, StubTtsRepository};
use helpers::{TestApp, TestContext, STUB_AUDIO_BYTES};
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_context::test_context;
use tts_relay::controllers::tts::ConvertResponse;

fn decode_data_uri(uri: &str) -> Vec<u8> {
    let (prefix, payload) = uri.split_once(',').expect("data URI without payload");
    assert!(prefix.starts_with("data:audio/"), "unexpected prefix {}", prefix);
    assert!(prefix.ends_with(";base64"), "unexpected prefix {}", prefix);
    STANDARD.decode(payload).expect("payload is not base64")
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_convert_text_and_return_inline_audio(ctx: &TestContext) {
    let response = ctx
        .client
        .post_form(
            "/convert",
            &[("text", "Hello"), ("language", "en-US"), ("voice_type", "female-1")],
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);

    let body: ConvertResponse = response.json().unwrap();
    assert!(body.success);
    assert_eq!(body.method, "stub");
    assert!(!body.voice_used.is_empty());
    assert!(body.audio_data.starts_with("data:audio/mp3;base64,"));
    assert_eq!(decode_data_uri(&body.audio_data).len(), STUB_AUDIO_BYTES);
    assert!(body.filename.starts_with("voice_"));
    assert!(body.filename.ends_with(".mp3"));
    assert!(ctx.app.scratch_is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_apply_default_language_and_voice(ctx: &TestContext) {
    let response = ctx
        .client
        .post_form("/convert", &[("text", "नमस्ते")])
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);

    let body = response.body.as_ref().unwrap();
    assert_eq!(body["voice_used"], json!("hi-IN-SwaraNeural"));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_attachment_for_file_response(ctx: &TestContext) {
    let response = ctx
        .client
        .post_form(
            "/convert",
            &[
                ("text", "Hello"),
                ("language", "en"),
                ("format", "wav"),
                ("response_type", "file"),
            ],
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.body_bytes.len(), STUB_AUDIO_BYTES);
    assert_eq!(response.header("content-type").map(String::as_str), Some("audio/wav"));

    let disposition = response.header("content-disposition").unwrap();
    assert!(disposition.starts_with("attachment; filename=\"voice_"));
    assert!(disposition.ends_with(".wav\""));
    assert_eq!(response.header("x-synthesis-method").map(String::as_str), Some("stub"));
    response.assert_header_exists("x-voice-used");
    assert!(ctx.app.scratch_is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_empty_text(ctx: &TestContext) {
    let response = ctx
        .client
        .post_form("/convert", &[("text", "   "), ("language", "en")])
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Text cannot be empty");
    assert_eq!(ctx.engine.calls(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_missing_text(ctx: &TestContext) {
    let response = ctx
        .client
        .post_form("/convert", &[("language", "en")])
        .await
        .unwrap();

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(ctx.engine.calls(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_enforce_text_length_limit(ctx: &TestContext) {
    let at_limit = "a".repeat(5000);
    let response = ctx
        .client
        .post_form("/convert", &[("text", at_limit.as_str())])
        .await
        .unwrap();
    response.assert_status(StatusCode::OK);

    let over_limit = "a".repeat(5001);
    let response = ctx
        .client
        .post_form("/convert", &[("text", over_limit.as_str())])
        .await
        .unwrap();
    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("5000 characters or less");

    assert_eq!(ctx.engine.calls(), 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_malformed_hints(ctx: &TestContext) {
    for (field, value) in [
        ("rate", "fast"),
        ("pitch", "high"),
        ("format", "flac"),
        ("quality", "ultra"),
        ("response_type", "xml"),
    ] {
        let response = ctx
            .client
            .post_form("/convert", &[("text", "Hello"), (field, value)])
            .await
            .unwrap();

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    assert_eq!(ctx.engine.calls(), 0);
}

#[tokio::test]
async fn it_should_fall_back_to_next_engine() {
    let broken = StubTtsRepository::new("broken", StubBehavior::Fail);
    let working = StubTtsRepository::new("working", StubBehavior::Succeed(STUB_AUDIO_BYTES));
    let app = TestApp::spawn(vec![broken.clone(), working.clone()]).await;

    let response = app
        .client
        .post_form("/convert", &[("text", "Hello"), ("language", "en")])
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.body.as_ref().unwrap();
    assert_eq!(body["method"], json!("working"));
    assert_eq!(broken.calls(), 1);
    assert_eq!(working.calls(), 1);
    assert!(app.scratch_is_empty());
}

#[tokio::test]
async fn it_should_return_500_when_every_engine_fails() {
    let first = StubTtsRepository::new("first", StubBehavior::Fail);
    let second = StubTtsRepository::new("second", StubBehavior::Succeed(10));
    let app = TestApp::spawn(vec![first, second]).await;

    let response = app
        .client
        .post_form("/convert", &[("text", "Hello"), ("language", "en")])
        .await
        .unwrap();

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body, Some(json!({ "error": "Audio generation failed" })));
    assert!(app.scratch_is_empty());

    let stats = app.client.get("/stats").await.unwrap();
    assert_eq!(stats.body.as_ref().unwrap()["total"], json!(0));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_include_request_id_in_convert_responses(ctx: &TestContext) {
    let ok = ctx
        .client
        .post_form("/convert", &[("text", "Hello")])
        .await
        .unwrap();
    ok.assert_header_exists("x-request-id");

    let rejected = ctx
        .client
        .post_form("/convert", &[("text", "")])
        .await
        .unwrap();
    rejected.assert_header_exists("x-request-id");

    assert_ne!(ok.header("x-request-id"), rejected.header("x-request-id"));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_json_body_with_json_error(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/convert", &json!({ "text": "Hello", "language": "en" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Invalid form body");
    assert_eq!(ctx.engine.calls(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_duplicate_form_fields_with_json_error(ctx: &TestContext) {
    let response = ctx
        .client
        .post_raw("/convert", "application/x-www-form-urlencoded", "text=one&text=two")
        .await
        .unwrap();

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.body.as_ref().and_then(|b| b.get("error")).is_some());
}
