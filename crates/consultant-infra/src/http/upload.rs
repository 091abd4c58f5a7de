//! Document upload client.
//!
//! Sends a single file as the `file` part of a multipart form. The backend
//! stores the document and runs it through its ingestion agent; it reports
//! processing failures in the JSON body with a success status, so the body
//! is checked for `error` before anything else.

use std::path::Path;

use reqwest::multipart::{Form, Part};

use consultant_types::config::ClientConfig;
use consultant_types::error::{BackendError, UploadError};
use consultant_types::upload::UploadResult;

use super::{build_client, error_for_status, transport_error};

pub struct UploadClient {
    client: reqwest::Client,
    upload_url: String,
}

impl UploadClient {
    pub fn new(config: &ClientConfig) -> Result<Self, UploadError> {
        Ok(Self::with_client(build_client(config)?, config))
    }

    pub fn with_client(client: reqwest::Client, config: &ClientConfig) -> Self {
        Self {
            client,
            upload_url: config.upload_url(),
        }
    }

    pub async fn upload(&self, file: &Path) -> Result<UploadResult, UploadError> {
        let data = tokio::fs::read(file).await.map_err(|e| UploadError::Io {
            path: file.display().to_string(),
            message: e.to_string(),
        })?;
        let filename = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        tracing::info!(file = %filename, bytes = data.len(), "uploading document");
        let form = Form::new().part("file", Part::bytes(data).file_name(filename));

        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;
        let response = error_for_status(response).await?;

        let result: UploadResult = response
            .json()
            .await
            .map_err(|e| BackendError::Decode(format!("upload body: {e}")))?;

        match result.error {
            Some(message) => Err(UploadError::Rejected(message)),
            None => Ok(result),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> ClientConfig {
        ClientConfig {
            backend_url: server.uri(),
            ..ClientConfig::default()
        }
    }

    async fn write_pdf(dir: &TempDir) -> std::path::PathBuf {
        let file = dir.path().join("harvard_cds.pdf");
        tokio::fs::write(&file, b"%PDF-1.4 fake").await.unwrap();
        file
    }

    #[tokio::test]
    async fn test_upload_sends_file_part() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/upload/"))
            .and(body_string_contains("name=\"file\""))
            .and(body_string_contains("filename=\"harvard_cds.pdf\""))
            .and(body_string_contains("%PDF-1.4 fake"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "filename": "harvard_cds.pdf",
                "message": "File uploaded and processed.",
                "saved_path": "/data/pdfs/harvard_cds.pdf",
                "agent_response_saved": "/data/json/harvard_cds.pdf_full_response.json",
                "session_id": "abc",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let tmp = TempDir::new().unwrap();
        let file = write_pdf(&tmp).await;
        let client = UploadClient::new(&config_for(&server)).unwrap();

        let result = client.upload(&file).await.unwrap();
        assert_eq!(result.filename.as_deref(), Some("harvard_cds.pdf"));
        assert_eq!(result.session_id.as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_error_body_is_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/upload/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "error": "Only PDF files are supported" })),
            )
            .mount(&server)
            .await;

        let tmp = TempDir::new().unwrap();
        let file = write_pdf(&tmp).await;
        let client = UploadClient::new(&config_for(&server)).unwrap();

        let err = client.upload(&file).await.unwrap_err();
        assert!(matches!(err, UploadError::Rejected(ref m) if m == "Only PDF files are supported"));
    }

    #[tokio::test]
    async fn test_server_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/upload/"))
            .respond_with(ResponseTemplate::new(413))
            .mount(&server)
            .await;

        let tmp = TempDir::new().unwrap();
        let file = write_pdf(&tmp).await;
        let client = UploadClient::new(&config_for(&server)).unwrap();

        let err = client.upload(&file).await.unwrap_err();
        assert!(matches!(
            err,
            UploadError::Backend(BackendError::Status { status: 413, .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let tmp = TempDir::new().unwrap();
        let client = UploadClient::new(&ClientConfig::default()).unwrap();

        let err = client
            .upload(&tmp.path().join("nope.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::Io { ref path, .. } if path.ends_with("nope.pdf")));
    }
}
