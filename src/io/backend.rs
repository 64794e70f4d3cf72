// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Image editing backend.
//!
//! [`ImageEditor`] is the seam between the job runner and the remote
//! model. [`OpenAiImageEditor`] talks to the OpenAI images edit endpoint;
//! tests substitute their own implementations.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Client as HttpClient;
use reqwest::StatusCode;
use serde::Deserialize;

/// Inputs for one inpainting call. Both images are PNG encoded.
#[derive(Debug, Clone)]
pub struct EditRequest {
    pub image_png: Vec<u8>,
    pub mask_png: Vec<u8>,
    pub prompt: String,
    /// Requested output size, e.g. `"1536x1024"`.
    pub size: String,
}

/// Failures of the remote edit operation, kept apart so the operator sees
/// what went wrong.
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    #[error("network error: {0}")]
    Network(String),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("request rejected: {0}")]
    Validation(String),

    #[error("backend returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("unexpected response: {0}")]
    MalformedResponse(String),
}

/// Something that can repaint a masked area of an image.
///
/// Calls block for as long as the backend needs; the runner only invokes
/// this from worker threads.
pub trait ImageEditor: Send + Sync {
    /// Returns the raw bytes of the edited image.
    fn edit_image(&self, request: &EditRequest) -> Result<Vec<u8>, EditError>;
}

/// Connection settings for [`OpenAiImageEditor`].
#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    pub api_key: String,
    pub api_base: String,
    pub model: String,
}

/// Blocking client for `POST {api_base}/images/edits`.
pub struct OpenAiImageEditor {
    client: HttpClient,
    endpoint: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct EditResponse {
    data: Vec<EditResponseImage>,
}

#[derive(Debug, Deserialize)]
struct EditResponseImage {
    b64_json: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl OpenAiImageEditor {
    pub fn new(settings: OpenAiSettings) -> anyhow::Result<Self> {
        // Edits can take over a minute; no client-side timeout
        let client = HttpClient::builder().timeout(None).build()?;
        let endpoint = format!("{}/images/edits", settings.api_base.trim_end_matches('/'));

        Ok(Self {
            client,
            endpoint,
            api_key: settings.api_key,
            model: settings.model,
        })
    }

    fn form(&self, request: &EditRequest) -> Result<Form, EditError> {
        let image = Part::bytes(request.image_png.clone())
            .file_name("image.png")
            .mime_str("image/png")
            .map_err(|e| EditError::Validation(e.to_string()))?;
        let mask = Part::bytes(request.mask_png.clone())
            .file_name("mask.png")
            .mime_str("image/png")
            .map_err(|e| EditError::Validation(e.to_string()))?;

        Ok(Form::new()
            .text("model", self.model.clone())
            .text("prompt", request.prompt.clone())
            .text("size", request.size.clone())
            .text("n", "1")
            .part("image", image)
            .part("mask", mask))
    }
}

impl ImageEditor for OpenAiImageEditor {
    fn edit_image(&self, request: &EditRequest) -> Result<Vec<u8>, EditError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .multipart(self.form(request)?)
            .send()
            .map_err(|e| EditError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| EditError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(classify_failure(status, &body));
        }
        decode_success(&body)
    }
}

/// Map an error status and body to an [`EditError`].
fn classify_failure(status: StatusCode, body: &str) -> EditError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.trim().to_string());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => EditError::Auth(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => EditError::Validation(message),
        _ => EditError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

/// Extract the first image from a successful response body.
fn decode_success(body: &str) -> Result<Vec<u8>, EditError> {
    let parsed: EditResponse =
        serde_json::from_str(body).map_err(|e| EditError::MalformedResponse(e.to_string()))?;

    let encoded = parsed
        .data
        .into_iter()
        .next()
        .and_then(|image| image.b64_json)
        .ok_or_else(|| EditError::MalformedResponse("response contained no image".to_string()))?;

    BASE64
        .decode(encoded.trim())
        .map_err(|e| EditError::MalformedResponse(format!("invalid base64 image: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_success_reads_first_image() {
        let body = format!(r#"{{"created": 1, "data": [{{"b64_json": "{}"}}]}}"#, BASE64.encode(b"png"));
        assert_eq!(decode_success(&body).unwrap(), b"png");
    }

    #[test]
    fn test_decode_success_without_image_is_malformed() {
        let err = decode_success(r#"{"data": []}"#).unwrap_err();
        assert!(matches!(err, EditError::MalformedResponse(_)));

        let err = decode_success(r#"{"data": [{"b64_json": "***"}]}"#).unwrap_err();
        assert!(matches!(err, EditError::MalformedResponse(_)));
    }

    #[test]
    fn test_classify_failure_distinguishes_auth_and_validation() {
        let body = r#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}"#;

        match classify_failure(StatusCode::UNAUTHORIZED, body) {
            EditError::Auth(message) => assert_eq!(message, "Incorrect API key provided"),
            other => panic!("expected auth error, got {other:?}"),
        }
        assert!(matches!(
            classify_failure(StatusCode::BAD_REQUEST, body),
            EditError::Validation(_)
        ));
        assert!(matches!(
            classify_failure(StatusCode::INTERNAL_SERVER_ERROR, "oops"),
            EditError::Api { status: 500, ref message } if message == "oops"
        ));
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let editor = OpenAiImageEditor::new(OpenAiSettings {
            api_key: "sk-test".to_string(),
            api_base: "https://example.test/v1/".to_string(),
            model: "gpt-image-1".to_string(),
        })
        .unwrap();
        assert_eq!(editor.endpoint, "https://example.test/v1/images/edits");
    }
}
