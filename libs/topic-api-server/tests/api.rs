use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use topic_engine::Broker;

fn app() -> (Arc<Broker>, Router) {
    let broker = Arc::new(Broker::new());
    let router = topic_api_server::router(broker.clone());
    (broker, router)
}

async fn send(router: &Router, req: Request<Body>) -> (StatusCode, String) {
    let resp = router.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn produce_req(body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/producer")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn consume_req(query: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(format!("/consumer?{query}"))
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn produce_returns_new_length() {
    let (broker, router) = app();

    let data = json!({"weather": "sunny", "temperature": "23"});
    let (status, body) = send(&router, produce_req(json!({"topic": "weather", "data": data}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "1");

    let (_, body) = send(&router, produce_req(json!({"topic": "weather", "data": "rainy"}))).await;
    assert_eq!(body, "2");
    assert_eq!(broker.topics(), vec!["weather"]);
}

#[tokio::test]
async fn produce_requires_topic() {
    let (broker, router) = app();
    let (status, body) = send(&router, produce_req(json!({"data": 1}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("topic is required"));
    assert!(broker.topics().is_empty());
}

#[tokio::test]
async fn produce_rejects_malformed_json() {
    let (_, router) = app();
    let req = Request::builder()
        .method(Method::POST)
        .uri("/producer")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, _) = send(&router, req).await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn consume_reads_range_and_offset() {
    let (_, router) = app();
    for v in ["sunny", "rainy", "windy"] {
        send(&router, produce_req(json!({"topic": "weather", "data": v}))).await;
    }

    let (status, body) = send(&router, consume_req("topic=weather&s_offset=0&e_offset=-1")).await;
    assert_eq!(status, StatusCode::OK);
    let parsed: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(parsed, json!({"data": ["sunny", "rainy", "windy"], "offset": 3}));

    let (_, body) = send(&router, consume_req("topic=weather&s_offset=1&e_offset=2")).await;
    let parsed: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(parsed, json!({"data": ["rainy"], "offset": 2}));
}

#[tokio::test]
async fn consume_end_defaults_to_latest() {
    let (_, router) = app();
    send(&router, produce_req(json!({"topic": "t", "data": 1}))).await;
    send(&router, produce_req(json!({"topic": "t", "data": 2}))).await;

    let (status, body) = send(&router, consume_req("topic=t&s_offset=1")).await;
    assert_eq!(status, StatusCode::OK);
    let parsed: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(parsed, json!({"data": [2], "offset": 2}));
}

#[tokio::test]
async fn consume_unknown_topic_is_not_found() {
    let (broker, router) = app();
    let (status, body) = send(&router, consume_req("topic=missing&s_offset=0&e_offset=-1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("the topic is not in broker"));
    assert!(broker.topics().is_empty());
}

#[tokio::test]
async fn consume_range_errors_are_bad_request() {
    let (_, router) = app();
    send(&router, produce_req(json!({"topic": "weather", "data": "sunny"}))).await;
    send(&router, produce_req(json!({"topic": "weather", "data": "rainy"}))).await;

    let cases = [
        ("s_offset=2&e_offset=-1", "start offset can't be larger than topic size"),
        ("s_offset=5&e_offset=-1", "start offset can't be larger than topic size"),
        ("s_offset=1&e_offset=1", "start offset should be less than end offset"),
        ("s_offset=0&e_offset=3", "end offset should be less than topic size"),
    ];
    for (query, expected) in cases {
        let (status, body) = send(&router, consume_req(&format!("topic=weather&{query}"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{query}");
        assert!(body.contains(expected), "{query}: {body}");
    }
}

#[tokio::test]
async fn consume_validates_parameters() {
    let (_, router) = app();
    send(&router, produce_req(json!({"topic": "t", "data": 1}))).await;

    for query in [
        "s_offset=0&e_offset=-1",
        "topic=&s_offset=0",
        "topic=t&s_offset=-1&e_offset=-1",
        "topic=t&s_offset=0&e_offset=-2",
        "topic=t&s_offset=abc",
        "topic=t",
    ] {
        let (status, _) = send(&router, consume_req(query)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{query}");
    }
}

#[tokio::test]
async fn wrong_method_is_rejected() {
    let (_, router) = app();
    let req = Request::builder()
        .method(Method::GET)
        .uri("/producer")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&router, req).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn list_topics_is_sorted() {
    let (_, router) = app();
    for topic in ["news", "alerts", "weather"] {
        send(&router, produce_req(json!({"topic": topic, "data": null}))).await;
    }

    let req = Request::builder().uri("/api/topics").body(Body::empty()).unwrap();
    let (status, body) = send(&router, req).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<String> = serde_json::from_str(&body).unwrap();
    assert_eq!(names, vec!["alerts", "news", "weather"]);
}

#[tokio::test]
async fn run_reports_bind_failure() {
    let taken = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = taken.local_addr().unwrap().to_string();

    let err = topic_api_server::run(
        &addr,
        Arc::new(Broker::new()),
        tokio_util::sync::CancellationToken::new(),
    )
    .await
    .unwrap_err();

    match err {
        topic_api_server::ServeError::Bind { addr: failed, .. } => assert_eq!(failed, addr),
        other => panic!("expected bind error, got {other}"),
    }
}
