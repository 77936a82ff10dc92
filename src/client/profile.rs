//! Profile, upload and health endpoints

use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{segment, ApiClient, ApiError, ApiResult};
use crate::models::{UploadedImage, User};

/// Uploads larger than this are refused before hitting the network
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Backend health report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub uptime_seconds: Option<u64>,
}

impl ApiClient {
    /// The signed-in user's own profile
    pub async fn profile(&self) -> ApiResult<User> {
        self.get_data("/profile").await
    }

    pub async fn user(&self, id: &str) -> ApiResult<User> {
        self.get_data(&format!("/users/{}", segment(id))).await
    }

    /// `POST /uploads` as multipart field `file`; returns the hosted URL
    pub async fn upload_image(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> ApiResult<UploadedImage> {
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(ApiError::Api {
                status: 413,
                code: "PAYLOAD_TOO_LARGE".to_string(),
                message: format!("Images are limited to {} MB", MAX_UPLOAD_BYTES / (1024 * 1024)),
            });
        }

        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(content_type)?;
        let form = Form::new().part("file", part);

        let builder = self.request(Method::POST, "/uploads").await?.multipart(form);
        self.send_data(builder).await
    }

    /// Read an image from disk and upload it
    pub async fn upload_file(&self, path: &Path) -> ApiResult<UploadedImage> {
        let content_type = image_content_type(path).ok_or_else(|| ApiError::Api {
            status: 415,
            code: "UNSUPPORTED_MEDIA_TYPE".to_string(),
            message: format!("{} is not a supported image", path.display()),
        })?;
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());

        self.upload_image(&file_name, bytes, content_type).await
    }

    /// `GET /health`, which sits beside the API prefix rather than under it
    pub async fn health(&self) -> ApiResult<HealthStatus> {
        let response = self
            .send(self.client.get(health_url(&self.config.base_url)))
            .await?;
        response.json().await.map_err(ApiError::from_transport)
    }
}

fn health_url(base_url: &str) -> String {
    let root = base_url.trim_end_matches('/');
    let root = root.strip_suffix("/api/v1").unwrap_or(root);
    format!("{}/health", root)
}

/// Content type for the image formats the backend accepts
pub(crate) fn image_content_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "heic" => Some("image/heic"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_health_url() {
        assert_eq!(health_url("http://localhost:8090/api/v1"), "http://localhost:8090/health");
        assert_eq!(health_url("http://localhost:8090/api/v1/"), "http://localhost:8090/health");
        assert_eq!(health_url("https://api.example"), "https://api.example/health");
    }

    #[test]
    fn test_image_content_type() {
        assert_eq!(image_content_type(&PathBuf::from("band.JPG")), Some("image/jpeg"));
        assert_eq!(image_content_type(&PathBuf::from("ash.webp")), Some("image/webp"));
        assert_eq!(image_content_type(&PathBuf::from("notes.txt")), None);
        assert_eq!(image_content_type(&PathBuf::from("noext")), None);
    }
}
