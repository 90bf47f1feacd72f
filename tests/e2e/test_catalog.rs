use crate::e2e::helpers;

use helpers::TestContext;
use hyper::StatusCode;
use serde_json::json;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_list_supported_languages(ctx: &TestContext) {
    let response = ctx.client.get("/api/languages").await.unwrap();

    response.assert_status(StatusCode::OK);

    let body = response.body.as_ref().unwrap();
    let languages = body.as_object().expect("languages must be an object");
    assert!(languages.contains_key("hi"));
    assert!(languages.contains_key("en-uk"));
    assert!(languages["hi"].as_str().unwrap().contains("Hindi"));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_list_voice_types(ctx: &TestContext) {
    let response = ctx.client.get("/api/voice-types").await.unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(
        response.body.as_ref().unwrap()["female1"],
        json!("Professional Female")
    );
    assert_eq!(response.body.as_ref().unwrap().as_object().unwrap().len(), 5);
}
