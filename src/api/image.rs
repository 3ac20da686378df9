use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::error::ApiError;
use crate::models::{content_type_for_key, AppConfig};
use crate::services::{ObjectStore, UrlSigner};

use super::upload::SignedQuery;

/// Serve a stored object through a signed URL
#[utoipa::path(
    get,
    path = "/api/image/{key}",
    responses(
        (status = 200, description = "Object bytes", body = Vec<u8>, content_type = "image/png"),
        (status = 403, description = "Invalid or expired signature"),
        (status = 404, description = "Object not found"),
    ),
    params(
        ("key" = String, Path, description = "Object key"),
        ("expires" = i64, Query, description = "Expiration timestamp"),
        ("signature" = String, Query, description = "HMAC signature"),
    ),
    tag = "Images"
)]
pub async fn handle_image(
    State(config): State<Arc<AppConfig>>,
    State(signer): State<Arc<UrlSigner>>,
    State(objects): State<Arc<dyn ObjectStore>>,
    Path(key): Path<String>,
    Query(query): Query<SignedQuery>,
) -> Result<Response, ApiError> {
    query.verify(&signer, "GET", &format!("/api/image/{key}"))?;

    let body = objects.get(&config.storage.bucket, &key).await?;
    tracing::debug!(key = %key, bytes = body.len(), "Serving object");

    Ok((
        [
            (header::CONTENT_TYPE, content_type_for_key(&key)),
            (header::CACHE_CONTROL, "private, max-age=3600"),
        ],
        body,
    )
        .into_response())
}
