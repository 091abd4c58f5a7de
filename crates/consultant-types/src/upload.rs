//! Result of the document upload endpoint.

use serde::{Deserialize, Serialize};

/// JSON body returned by the upload endpoint.
///
/// The backend answers with a success status even when processing failed,
/// so `error` must be checked explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub saved_path: Option<String>,
    #[serde(default)]
    pub agent_response_saved: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl UploadResult {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_result_success_body() {
        let json = r#"{
            "filename": "harvard_cds.pdf",
            "message": "File uploaded and processed.",
            "saved_path": "/data/pdfs/harvard_cds.pdf",
            "agent_response_saved": "/data/json/harvard_cds.pdf_full_response.json",
            "session_id": "abc"
        }"#;
        let result: UploadResult = serde_json::from_str(json).unwrap();
        assert!(!result.is_error());
        assert_eq!(result.filename.as_deref(), Some("harvard_cds.pdf"));
        assert!(result.agent_response_saved.is_some());
    }

    #[test]
    fn test_upload_result_error_body() {
        let result: UploadResult =
            serde_json::from_str(r#"{"error":"No filename provided"}"#).unwrap();
        assert!(result.is_error());
        assert!(result.filename.is_none());
    }
}
