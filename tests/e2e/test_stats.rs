use crate::e2e::helpers;

use helpers::TestContext;
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_context::test_context;
use tts_relay::domain::usage::StatsResponse;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_report_zeros_before_any_conversion(ctx: &TestContext) {
    let response = ctx.client.get("/stats").await.unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(
        response.body,
        Some(json!({ "total": 0, "today": 0, "popular_languages": [] }))
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_count_each_successful_conversion_once(ctx: &TestContext) {
    for _ in 0..2 {
        ctx.client
            .post_form("/convert", &[("text", "Same text"), ("language", "hi")])
            .await
            .unwrap()
            .assert_status(StatusCode::OK);
    }
    ctx.client
        .post_form("/convert", &[("text", "Hello"), ("language", "en")])
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let stats: StatsResponse = ctx.client.get("/stats").await.unwrap().json().unwrap();

    assert_eq!(stats.total, 3);
    assert_eq!(stats.today, 3);
    assert_eq!(stats.popular_languages.len(), 2);
    assert_eq!(stats.popular_languages[0].language, "hi");
    assert_eq!(stats.popular_languages[0].count, 2);
    assert_eq!(stats.popular_languages[1].language, "en");
    assert_eq!(stats.popular_languages[1].count, 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_not_count_rejected_requests(ctx: &TestContext) {
    ctx.client
        .post_form("/convert", &[("text", "")])
        .await
        .unwrap()
        .assert_status(StatusCode::BAD_REQUEST);

    let stats: StatsResponse = ctx.client.get("/stats").await.unwrap().json().unwrap();
    assert_eq!(stats.total, 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_at_most_five_popular_languages(ctx: &TestContext) {
    for language in ["hi", "en", "bn", "te", "ta", "ur", "pa"] {
        ctx.client
            .post_form("/convert", &[("text", "Hello"), ("language", language)])
            .await
            .unwrap()
            .assert_status(StatusCode::OK);
    }

    let stats: StatsResponse = ctx.client.get("/stats").await.unwrap().json().unwrap();
    assert_eq!(stats.total, 7);
    assert_eq!(stats.popular_languages.len(), 5);
}
