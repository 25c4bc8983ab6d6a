use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, header::CONTENT_TYPE},
    response::Html,
};
use serde_json::Value;

use crate::{
    error::AppError,
    message::ChatResponse,
    services::validator::validate,
    state::SharedState,
};

const INDEX_PAGE: &str = include_str!("../../public/index.html");

pub async fn index_handler() -> Html<&'static str> {
    Html(INDEX_PAGE)
}

/// `application/json` and any `application/*+json` type.
pub fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(value) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let mime = value.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

// The body is taken raw so a missing, broken or non-JSON payload reaches
// validation as an empty mapping instead of being rejected by the extractor.
pub async fn chat_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ChatResponse>, AppError> {
    let payload: Value = if is_json_content_type(&headers) {
        serde_json::from_slice(&body).unwrap_or(Value::Null)
    } else {
        Value::Null
    };
    let request = validate(&payload)?;

    tracing::info!(
        age = request.age,
        chars = request.message.chars().count(),
        "chat request accepted"
    );

    let response = state.tutor.get_response(&request.message, request.age).await;
    Ok(Json(ChatResponse { response }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(content_type: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_str(content_type).unwrap());
        headers
    }

    #[test]
    fn json_content_types() {
        assert!(is_json_content_type(&headers_with("application/json")));
        assert!(is_json_content_type(&headers_with("Application/JSON; charset=utf-8")));
        assert!(is_json_content_type(&headers_with("application/vnd.api+json")));
    }

    #[test]
    fn other_content_types() {
        assert!(!is_json_content_type(&HeaderMap::new()));
        assert!(!is_json_content_type(&headers_with("text/plain")));
        assert!(!is_json_content_type(&headers_with("application/x-www-form-urlencoded")));
        assert!(!is_json_content_type(&headers_with("text/json+json")));
    }
}
