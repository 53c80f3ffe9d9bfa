//! Request dispatch.
//!
//! ```text
//! request
//!     → first backend rule matching the path? → reverse proxy (terminal)
//!     → otherwise resolve content key (index_key override)
//!     → store get → 200 text/html + bytes | 500 empty
//! ```

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request, StatusCode},
    response::{IntoResponse, Response},
};

use crate::http::state::RouterState;

/// Handler for every inbound request.
pub async fn dispatch(State(state): State<Arc<RouterState>>, request: Request<Body>) -> Response {
    if let Some(rule) = state.backends().match_encoded_path(request.uri().path()) {
        return rule.proxy.forward(request).await;
    }

    let key = state.keys().resolve(request.uri().query());

    match state.store().get(&key).await {
        Ok(content) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, HeaderValue::from_static("text/html"))],
            content,
        )
            .into_response(),
        Err(e) => {
            tracing::debug!(key = %key, error = %e, "Content lookup failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
