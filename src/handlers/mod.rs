use axum::{
    extract::FromRequestParts,
    http::{header::HeaderMap, request::Parts},
    routing::{delete, get, post},
    Router,
};

use crate::AppState;

pub mod print_requests;
pub mod search;
pub mod settings;
pub mod snapshots;

/// Opaque identity context stamped on audit-relevant calls. Authentication
/// and role enforcement happen upstream; these headers are trusted input
/// from the session layer, not validated here.
#[derive(Debug, Clone)]
pub struct ActingUser {
    pub id: String,
    pub name: String,
}

impl ActingUser {
    fn from_headers(headers: &HeaderMap) -> Self {
        let header_str = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        Self {
            id: header_str("x-user-id").unwrap_or_else(|| "system".to_string()),
            name: header_str("x-user-name").unwrap_or_else(|| "system".to_string()),
        }
    }
}

impl<S> FromRequestParts<S> for ActingUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ActingUser::from_headers(&parts.headers))
    }
}

/// All v1 routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/snapshots",
            get(snapshots::list_snapshots).post(snapshots::upload_snapshot),
        )
        .route("/snapshots/{id}", delete(snapshots::delete_snapshot))
        .route("/snapshots/{id}/skus", get(snapshots::snapshot_skus))
        .route("/snapshots/{id}/stats", get(search::snapshot_stats))
        .route("/search", get(search::search_inventory))
        .route("/search/bulk", post(search::bulk_search))
        .route("/compare", get(search::compare_sku))
        .route("/print-requests", post(print_requests::create_print_request))
        .route("/settings", get(settings::get_settings))
}
