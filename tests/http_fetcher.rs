//! Drives the blocking HTTP fetcher and the full pipeline against a local mock upstream.
//!
//! The blocking client must not run on an async worker, so every fetch goes
//! through `spawn_blocking`.

use std::fs;

use skyfetch::{
    SkyfetchError,
    pipeline::{ArtifactSpec, Descriptor, FetchOutcome, Fetcher, HttpFetcher, Mode, Pipeline, RequestSpec, TransformMode},
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path, query_param},
};

async fn fetch(
    url: String,
    user_agent: Option<&'static str>,
) -> skyfetch::Result<FetchOutcome> {
    tokio::task::spawn_blocking(move || HttpFetcher::with_user_agent(user_agent)?.get(&url)).await.unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn returns_status_and_raw_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/DONKI/notifications"))
        .and(query_param("type", "all"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"[{"messageBody":"A"}]"#))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = fetch(format!("{}/DONKI/notifications?api_key=DEMO_KEY&type=all", server.uri()), None).await.unwrap();

    assert_eq!(outcome.status_code, 200);
    assert_eq!(outcome.body, br#"[{"messageBody":"A"}]"#.to_vec());
    assert!(outcome.history.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn non_200_is_returned_not_raised() {
    let server = MockServer::start().await;
    Mock::given(method("GET")).respond_with(ResponseTemplate::new(404).set_body_string("missing")).mount(&server).await;

    let outcome = fetch(format!("{}/neo/rest/v1/feed", server.uri()), None).await.unwrap();
    assert_eq!(outcome.status_code, 404);
}

#[tokio::test(flavor = "multi_thread")]
async fn sends_browser_user_agent_when_asked() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tle/25544"))
        .and(header("user-agent", "Mozilla/5.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"satelliteId":25544}"#))
        .mount(&server)
        .await;
    Mock::given(method("GET")).respond_with(ResponseTemplate::new(403)).mount(&server).await;

    let url = format!("{}/api/tle/25544", server.uri());
    assert_eq!(fetch(url.clone(), Some("Mozilla/5.0")).await.unwrap().status_code, 200);
    assert_eq!(fetch(url, None).await.unwrap().status_code, 403);
}

#[tokio::test(flavor = "multi_thread")]
async fn follows_redirects_and_records_them() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", format!("{}/new", server.uri())))
        .mount(&server)
        .await;
    Mock::given(method("GET")).and(path("/new")).respond_with(ResponseTemplate::new(200).set_body_string("moved here")).mount(&server).await;

    let outcome = fetch(format!("{}/old", server.uri()), None).await.unwrap();

    assert_eq!(outcome.status_code, 200);
    assert_eq!(outcome.body, b"moved here".to_vec());
    assert_eq!(outcome.history, vec![format!("{}/new", server.uri())]);
}

#[tokio::test(flavor = "multi_thread")]
async fn connection_failure_is_http_error() {
    // nothing listens on the tcpmux port
    let err = fetch("http://127.0.0.1:1/gone".to_string(), None).await.unwrap_err();
    assert!(matches!(err, SkyfetchError::Http(_)));
}

#[tokio::test(flavor = "multi_thread")]
async fn pipeline_writes_image_from_linked_asset() {
    let server = MockServer::start().await;
    let image = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR\x00\x00\x00\x01".to_vec();
    Mock::given(method("GET"))
        .and(path("/planetary/apod"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(r#"{{"url":"{0}/image.png","hdurl":"{0}/image_hd.png"}}"#, server.uri())))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET")).and(path("/image_hd.png")).respond_with(ResponseTemplate::new(200).set_body_bytes(image.clone())).expect(1).mount(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("apod.png");
    let descriptor = Descriptor::new(RequestSpec::new(format!("{}/planetary/apod", server.uri())).param("hd", Some(true)), TransformMode::Binary)
        .asset(skyfetch::pipeline::AssetLink::new("hdurl"))
        .artifact(ArtifactSpec::overwrite(&dest));

    let result = tokio::task::spawn_blocking(move || Pipeline::new(HttpFetcher::new()?).run(&descriptor, Mode::Executing)).await.unwrap().unwrap();

    assert!(result.changed());
    assert_eq!(result.status_code(), 200);
    assert_eq!(fs::read(&dest).unwrap(), image);
}

#[tokio::test(flavor = "multi_thread")]
async fn planning_never_reaches_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("GET")).respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;

    let descriptor = Descriptor::new(RequestSpec::new(format!("{}/neo/rest/v1/feed", server.uri())).param("start_date", Some("2021-01-01")), TransformMode::Yaml);
    let expected_url = format!("{}/neo/rest/v1/feed?start_date=2021-01-01", server.uri());

    let result = tokio::task::spawn_blocking(move || Pipeline::new(HttpFetcher::new()?).run(&descriptor, Mode::Planning)).await.unwrap().unwrap();

    assert_eq!(result.status_code(), 0);
    assert_eq!(result.request_url(), expected_url);
}
