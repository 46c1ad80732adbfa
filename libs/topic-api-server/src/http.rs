use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use topic_engine::{BrokerError, RangeEnd};

use super::AppState;

// ═══════════════════════════════════════════════════════════════
//  POST /producer
// ═══════════════════════════════════════════════════════════════

#[derive(Deserialize)]
pub(crate) struct ProduceBody {
    #[serde(default)]
    topic: String,
    #[serde(default)]
    data: Value,
}

pub(crate) async fn handle_produce(
    State(state): State<AppState>,
    axum::Json(body): axum::Json<ProduceBody>,
) -> Response {
    if body.topic.is_empty() {
        return bad_request("topic is required.");
    }

    let offset = state.broker.produce(&body.topic, body.data);
    tracing::trace!(topic = %body.topic, offset, "produced");
    axum::Json(offset).into_response()
}

// ═══════════════════════════════════════════════════════════════
//  GET /consumer?topic=X&s_offset=N&e_offset=M
// ═══════════════════════════════════════════════════════════════

#[derive(Deserialize)]
pub(crate) struct ConsumeParams {
    #[serde(default)]
    topic: String,
    s_offset: i64,
    #[serde(default = "latest")]
    e_offset: i64,
}

fn latest() -> i64 {
    RangeEnd::LATEST_SENTINEL
}

#[derive(Serialize)]
struct ConsumeResponse {
    data: Vec<Value>,
    offset: u64,
}

pub(crate) async fn handle_consume(
    State(state): State<AppState>,
    Query(params): Query<ConsumeParams>,
) -> Response {
    if params.topic.is_empty() {
        return bad_request("topic is required.");
    }
    let Ok(start) = u64::try_from(params.s_offset) else {
        return bad_request("s_offset must be >= 0.");
    };
    let Some(end) = RangeEnd::from_wire(params.e_offset) else {
        return bad_request("e_offset must be >= -1.");
    };

    let range = match state.broker.consume(&params.topic, start, end) {
        Ok(range) => range,
        Err(e) => {
            tracing::debug!(topic = %params.topic, start, end = params.e_offset, error = %e, "consume rejected");
            return broker_error(&e);
        }
    };

    let body = ConsumeResponse {
        data: range.messages,
        offset: range.end,
    };
    match serde_json::to_string_pretty(&body) {
        Ok(json) => ([(header::CONTENT_TYPE, "application/json")], json).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("500 Internal Server Error: json marshal error: {e}"),
        )
            .into_response(),
    }
}

// ═══════════════════════════════════════════════════════════════
//  GET /api/topics
// ═══════════════════════════════════════════════════════════════

pub(crate) async fn handle_list_topics(State(state): State<AppState>) -> impl IntoResponse {
    axum::Json(state.broker.topics())
}

// ═══════════════════════════════════════════════════════════════
//  Error responses
// ═══════════════════════════════════════════════════════════════

fn bad_request(msg: &str) -> Response {
    (StatusCode::BAD_REQUEST, format!("400 Bad Request: {msg}")).into_response()
}

fn broker_error(e: &BrokerError) -> Response {
    if e.is_range_error() {
        bad_request(&e.to_string())
    } else {
        (StatusCode::NOT_FOUND, format!("404 Not Found: {e}")).into_response()
    }
}
