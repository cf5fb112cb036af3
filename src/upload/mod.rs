//! Image host integration.
//!
//! Birthday images are not stored locally; they are handed to an external
//! host which returns a permanent URL.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha1::{Digest, Sha1};

use crate::config::{ConfigError, ImageHostConfig};
use crate::errors::AppError;
use crate::models::ImageUpload;

const UPLOAD_FAILED: &str = "Image upload failed";

/// Something that can turn image bytes into a public URL.
#[async_trait]
pub trait ImageHost: Send + Sync + 'static {
    /// Upload the image and return its permanent URL.
    async fn upload(&self, image: ImageUpload) -> Result<String, AppError>;
}

/// How uploads are authorised with Cloudinary.
#[derive(Debug, Clone)]
enum UploadAuth {
    /// Account API key and secret; every request carries a signature.
    Signed {
        api_key: String,
        api_secret: String,
        upload_preset: Option<String>,
    },
    /// Unsigned upload preset.
    Unsigned { upload_preset: String },
}

/// Uploads to Cloudinary's image upload endpoint.
pub struct CloudinaryHost {
    client: reqwest::Client,
    upload_url: String,
    auth: UploadAuth,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

impl CloudinaryHost {
    /// Build a host from configuration, or `None` when uploads cannot be authorised.
    ///
    /// API credentials take precedence; an upload preset alone selects unsigned uploads.
    pub fn from_config(config: &ImageHostConfig) -> Result<Option<Self>, ConfigError> {
        let Some(cloud_name) = &config.cloud_name else {
            return Ok(None);
        };

        let auth = match (&config.api_key, &config.api_secret, &config.upload_preset) {
            (Some(api_key), Some(api_secret), upload_preset) => UploadAuth::Signed {
                api_key: api_key.clone(),
                api_secret: api_secret.clone(),
                upload_preset: upload_preset.clone(),
            },
            (_, _, Some(upload_preset)) => UploadAuth::Unsigned {
                upload_preset: upload_preset.clone(),
            },
            _ => return Ok(None),
        };

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ConfigError(format!("failed to build upload client: {e}")))?;

        Ok(Some(Self {
            client,
            upload_url: format!(
                "{}/v1_1/{}/image/upload",
                config.api_base.trim_end_matches('/'),
                cloud_name
            ),
            auth,
        }))
    }

    /// Text fields sent alongside the file.
    fn form_fields(&self, timestamp: i64) -> Vec<(&'static str, String)> {
        match &self.auth {
            UploadAuth::Unsigned { upload_preset } => {
                vec![("upload_preset", upload_preset.clone())]
            }
            UploadAuth::Signed {
                api_key,
                api_secret,
                upload_preset,
            } => {
                let mut params = vec![("timestamp", timestamp.to_string())];
                if let Some(preset) = upload_preset {
                    params.push(("upload_preset", preset.clone()));
                }
                let signature = sign_params(&params, api_secret);
                params.push(("api_key", api_key.clone()));
                params.push(("signature", signature));
                params
            }
        }
    }
}

/// Cloudinary request signature: SHA-1 hex of the params sorted by name,
/// joined as `k=v&k=v`, with the API secret appended.
///
/// `file`, `api_key`, `cloud_name` and `resource_type` are never signed.
fn sign_params(params: &[(&str, String)], api_secret: &str) -> String {
    let mut sorted: Vec<_> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let to_sign = sorted
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha1::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl ImageHost for CloudinaryHost {
    async fn upload(&self, image: ImageUpload) -> Result<String, AppError> {
        let size = image.bytes.len();
        let mut part = Part::bytes(image.bytes).file_name(image.file_name);
        if let Some(content_type) = image.content_type.as_deref() {
            part = part.mime_str(content_type).map_err(|e| {
                tracing::error!("Unusable image content type {:?}: {}", content_type, e);
                AppError::Upload(UPLOAD_FAILED.to_string())
            })?;
        }

        let mut form = Form::new();
        for (name, value) in self.form_fields(Utc::now().timestamp()) {
            form = form.text(name, value);
        }
        let form = form.part("file", part);

        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    tracing::error!("Image upload timed out: {}", e);
                } else {
                    tracing::error!("Image upload request failed: {}", e);
                }
                AppError::Upload(UPLOAD_FAILED.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Image host rejected upload ({}): {}", status, body);
            return Err(AppError::Upload(UPLOAD_FAILED.to_string()));
        }

        let body: UploadResponse = response.json().await.map_err(|e| {
            tracing::error!("Unreadable image host response: {}", e);
            AppError::Upload(UPLOAD_FAILED.to_string())
        })?;

        tracing::info!("Uploaded image ({} bytes) to {}", size, body.secure_url);
        Ok(body.secure_url)
    }
}

/// Used when no image host is configured; every upload fails.
pub struct UnconfiguredImageHost;

#[async_trait]
impl ImageHost for UnconfiguredImageHost {
    async fn upload(&self, _image: ImageUpload) -> Result<String, AppError> {
        tracing::error!("Image upload attempted but no image host is configured");
        Err(AppError::Upload(UPLOAD_FAILED.to_string()))
    }
}
