use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::models::{content_type_for_key, AppConfig, ImageId, InputFormat};
use crate::services::{ImagePipeline, ObjectStore, UrlSigner, INPUT_PREFIX};

use super::events::outcome_response;

/// Characters escaped in object keys placed in URL paths; `/` is kept
const KEY_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'?')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Build an absolute URL for `route` + `key`, signed for `method`
pub fn signed_url(
    config: &AppConfig,
    signer: &UrlSigner,
    method: &str,
    route: &str,
    key: &str,
    ttl_secs: i64,
) -> String {
    let path = format!("{route}/{key}");
    let signature = signer.sign(method, &path, ttl_secs);
    format!(
        "{}{route}/{}?{}",
        config.server.public_url.trim_end_matches('/'),
        utf8_percent_encode(key, KEY_ENCODE_SET),
        signature.query()
    )
}

/// Query parameters for upload URL issuance
#[derive(Debug, Deserialize)]
pub struct UploadUrlQuery {
    /// File extension of the upload (default: jpg)
    #[serde(default)]
    pub ext: Option<String>,
}

/// Signed upload target
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadUrlResponse {
    /// PUT the image bytes here before it expires
    pub upload_url: String,
    pub image_id: String,
    /// Object key the upload will be stored under
    pub key: String,
}

/// Signature query parameters on signed URLs
#[derive(Debug, Deserialize)]
pub struct SignedQuery {
    #[serde(default)]
    pub expires: Option<i64>,
    #[serde(default)]
    pub signature: Option<String>,
}

impl SignedQuery {
    /// Verify against `method` on `path`
    pub fn verify(&self, signer: &UrlSigner, method: &str, path: &str) -> Result<(), ApiError> {
        match (&self.signature, self.expires) {
            (Some(signature), Some(expires)) if signer.verify(method, path, signature, expires) => {
                Ok(())
            }
            _ => Err(ApiError::Forbidden),
        }
    }
}

/// Issue a signed upload URL
///
/// The upload lands under `input/` and is processed as soon as it arrives.
#[utoipa::path(
    get,
    path = "/api/upload-url",
    responses(
        (status = 200, description = "Signed upload URL", body = UploadUrlResponse),
        (status = 400, description = "Unsupported extension"),
    ),
    params(
        ("ext" = Option<String>, Query, description = "jpg, jpeg, png, webp, heic or heif (default: jpg)"),
    ),
    tag = "Upload"
)]
pub async fn handle_upload_url(
    State(config): State<Arc<AppConfig>>,
    State(signer): State<Arc<UrlSigner>>,
    Query(query): Query<UploadUrlQuery>,
) -> Result<Response, ApiError> {
    let ext = query
        .ext
        .as_deref()
        .unwrap_or("jpg")
        .trim_start_matches('.')
        .to_lowercase();
    if InputFormat::from_extension(&format!(".{ext}")).is_none() {
        return Err(ApiError::BadRequest(format!("Unsupported extension: {ext}")));
    }

    let image_id = ImageId::generate();
    let key = format!(
        "{INPUT_PREFIX}{}-{image_id}.{ext}",
        Utc::now().format("%Y%m%d%H%M%S")
    );
    let upload_url = signed_url(
        &config,
        &signer,
        "PUT",
        "/api/upload",
        &key,
        config.server.upload_url_ttl_secs,
    );

    tracing::info!(key = %key, "Issued upload URL");

    Ok((
        [(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")],
        Json(UploadUrlResponse {
            upload_url,
            image_id: image_id.to_string(),
            key,
        }),
    )
        .into_response())
}

/// Receive an upload through a signed URL
///
/// Stores the body under its key and processes it immediately; the
/// response is the processing result.
#[utoipa::path(
    put,
    path = "/api/upload/{key}",
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "Processed or ignored as duplicate"),
        (status = 400, description = "Key outside the upload prefix"),
        (status = 403, description = "Invalid or expired signature"),
        (status = 413, description = "Image exceeds the input size limit"),
        (status = 415, description = "Unsupported file type"),
        (status = 422, description = "Image could not be decoded"),
    ),
    params(
        ("key" = String, Path, description = "Object key from the upload URL"),
        ("expires" = i64, Query, description = "Expiration timestamp"),
        ("signature" = String, Query, description = "HMAC signature"),
    ),
    tag = "Upload"
)]
pub async fn handle_upload(
    State(config): State<Arc<AppConfig>>,
    State(signer): State<Arc<UrlSigner>>,
    State(objects): State<Arc<dyn ObjectStore>>,
    State(pipeline): State<Arc<ImagePipeline>>,
    Path(key): Path<String>,
    Query(query): Query<SignedQuery>,
    body: Bytes,
) -> Result<Response, ApiError> {
    query.verify(&signer, "PUT", &format!("/api/upload/{key}"))?;
    if !key.starts_with(INPUT_PREFIX) {
        return Err(ApiError::BadRequest(format!("Key must start with {INPUT_PREFIX}")));
    }

    let bucket = &config.storage.bucket;
    objects
        .put(bucket, &key, body.to_vec(), content_type_for_key(&key))
        .await?;
    tracing::info!(key = %key, bytes = body.len(), "Received upload");

    let outcome = pipeline.process(bucket, &key).await?;
    Ok(outcome_response(outcome)?.into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_url_shape() {
        let mut config = AppConfig::default();
        config.server.public_url = "https://frame.example.com/".into();
        let signer = UrlSigner::new("s");

        let url = signed_url(&config, &signer, "GET", "/api/image", "dithered/a b.png", 60);
        assert!(url.starts_with("https://frame.example.com/api/image/dithered/a%20b.png?expires="));
        assert!(url.contains("&signature="));
    }

    #[test]
    fn test_signed_query_verification() {
        let signer = UrlSigner::new("s");
        let sig = signer.sign("GET", "/api/image/x.png", 60);

        let valid = SignedQuery {
            expires: Some(sig.expires),
            signature: Some(sig.signature.clone()),
        };
        assert!(valid.verify(&signer, "GET", "/api/image/x.png").is_ok());
        assert!(valid.verify(&signer, "GET", "/api/image/y.png").is_err());

        let missing = SignedQuery {
            expires: None,
            signature: Some(sig.signature),
        };
        assert!(matches!(
            missing.verify(&signer, "GET", "/api/image/x.png"),
            Err(ApiError::Forbidden)
        ));
    }
}
