use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};

use super::AppState;
use crate::middleware::RequestId;

/// `GET /?q=<query>`: merged products plus the addresses of every store
/// they are available at.
///
/// A repeated `q` parameter uses its first value.
pub(super) async fn search(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let Some(query) = first_query(params) else {
        return (StatusCode::BAD_REQUEST, "No query provided").into_response();
    };

    match state.engine.search(&query).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => {
            tracing::error!(request_id = %req_id.0, error = %e, "search failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error.").into_response()
        }
    }
}

fn first_query(params: Vec<(String, String)>) -> Option<String> {
    params
        .into_iter()
        .find_map(|(key, value)| (key == "q").then_some(value))
}
