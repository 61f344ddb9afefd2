//! Document-processing service client: AI enhancement with math-aware
//! preview, and digital signature insertion. All uploads are multipart;
//! requests that fail local validation never reach the network.

use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use super::{
    content_disposition_filename, ensure_docx, GeneratedFile, RemoteError, DOCX_MIME,
};

const VALID_EXTENSIONS: &[&str] = &[".docx", ".pdf", ".txt", ".doc"];
const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// An uploaded document on its way to the processing service.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, Default)]
pub struct EnhanceOptions {
    /// Optional user instructions for the enhancement pass.
    pub prompt: Option<String>,
    /// "auto", "academic", "technical" or "business".
    pub doc_type: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SignatureOptions {
    /// Signature payload: base64 image or plain text.
    pub signature: String,
    /// "bottom-right", "bottom-left", "top-right", "top-left" or "center".
    pub position: Option<String>,
    pub signer_name: Option<String>,
}

/// Math-aware preview of an uploaded document.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DocumentPreview {
    pub preview_text: String,
    pub latex_equations: Vec<String>,
    pub has_math: bool,
    pub equation_count: i64,
    pub filename: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct PreviewResponse {
    filename: String,
    has_math: bool,
    equation_count: i64,
    equations: Vec<Equation>,
    text_preview: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct Equation {
    content: String,
}

#[derive(Debug, Deserialize)]
struct UpstreamError {
    error: String,
}

#[derive(Clone)]
pub struct DocProcClient {
    http: Client,
    base_url: String,
}

impl DocProcClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Runs the AI enhancement pass. The result is always a Word document;
    /// the filename is normalized accordingly.
    pub async fn enhance(
        &self,
        file: UploadFile,
        options: EnhanceOptions,
    ) -> Result<GeneratedFile, RemoteError> {
        validate_upload(&file)?;
        info!("enhancing document {}", file.name);

        let fallback = format!("enhanced_{}", file.name);
        let mut form = Form::new().part(
            "file",
            Part::bytes(file.bytes.to_vec()).file_name(file.name.clone()),
        );
        if let Some(prompt) = options.prompt {
            form = form.text("prompt", prompt);
        }
        if let Some(doc_type) = options.doc_type {
            form = form.text("doc_type", doc_type);
        }

        let response = self
            .http
            .post(format!("{}/enhance", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(RemoteError::Network)?;

        self.binary_result(response, fallback, "Failed to enhance document")
            .await
    }

    /// Inserts a digital signature. Requires a signature payload up front.
    pub async fn add_signature(
        &self,
        file: UploadFile,
        options: SignatureOptions,
    ) -> Result<GeneratedFile, RemoteError> {
        if file.name.is_empty() {
            return Err(RemoteError::Validation("No file provided".to_string()));
        }
        if options.signature.is_empty() {
            return Err(RemoteError::Validation("No signature provided".to_string()));
        }
        if options.signer_name.as_deref().map_or(true, str::is_empty) {
            return Err(RemoteError::Validation("Signer name is required".to_string()));
        }
        info!("adding signature to document {}", file.name);

        let fallback = format!("Signed_{}", file.name);
        let mut form = Form::new()
            .part(
                "file",
                Part::bytes(file.bytes.to_vec()).file_name(file.name.clone()),
            )
            .text("signature", options.signature);
        if let Some(position) = options.position {
            form = form.text("position", position);
        }
        if let Some(signer_name) = options.signer_name {
            form = form.text("signer_name", signer_name);
        }

        let response = self
            .http
            .post(format!("{}/add-signature", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(RemoteError::Network)?;

        self.binary_result(response, fallback, "Failed to add signature")
            .await
    }

    /// Extracts text and LaTeX equations without modifying the document.
    pub async fn preview(&self, file: UploadFile) -> Result<DocumentPreview, RemoteError> {
        if file.name.is_empty() {
            return Err(RemoteError::Validation("No file provided".to_string()));
        }
        debug!("previewing document {}", file.name);

        let original_name = file.name.clone();
        let form = Form::new().part(
            "file",
            Part::bytes(file.bytes.to_vec()).file_name(file.name),
        );

        let response = self
            .http
            .post(format!("{}/preview", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(RemoteError::Network)?;

        if !response.status().is_success() {
            return Err(upstream_error(response, "Preview failed").await);
        }

        let preview: PreviewResponse = response
            .json()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))?;

        Ok(DocumentPreview {
            preview_text: preview.text_preview,
            latex_equations: preview.equations.into_iter().map(|e| e.content).collect(),
            has_math: preview.has_math,
            equation_count: preview.equation_count,
            filename: if preview.filename.is_empty() {
                original_name
            } else {
                preview.filename
            },
        })
    }

    pub async fn health(&self) -> Result<Value, RemoteError> {
        let response = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .map_err(RemoteError::Network)?;

        if !response.status().is_success() {
            return Err(RemoteError::Upstream {
                status: response.status().as_u16(),
                message: "Health check failed".to_string(),
            });
        }
        response
            .json()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))
    }

    async fn binary_result(
        &self,
        response: Response,
        fallback_name: String,
        failure: &str,
    ) -> Result<GeneratedFile, RemoteError> {
        if !response.status().is_success() {
            return Err(upstream_error(response, failure).await);
        }

        let filename =
            content_disposition_filename(response.headers()).unwrap_or(fallback_name);
        let filename = ensure_docx(&filename);

        let bytes = response
            .bytes()
            .await
            .map_err(RemoteError::Network)?;

        info!("processed document ready: {filename}");
        Ok(GeneratedFile {
            bytes,
            filename,
            content_type: DOCX_MIME,
        })
    }
}

/// Local checks for the enhancement path: extension set and 10 MiB cap.
fn validate_upload(file: &UploadFile) -> Result<(), RemoteError> {
    if file.name.is_empty() {
        return Err(RemoteError::Validation("No file provided".to_string()));
    }

    let ext = format!(
        ".{}",
        file.name.rsplit('.').next().unwrap_or("").to_lowercase()
    );
    if !VALID_EXTENSIONS.contains(&ext.as_str()) {
        return Err(RemoteError::Validation(format!(
            "Unsupported file format. Please use: {}",
            VALID_EXTENSIONS.join(", ")
        )));
    }

    if file.bytes.len() > MAX_FILE_SIZE {
        return Err(RemoteError::Validation(
            "File size exceeds 10MB limit".to_string(),
        ));
    }
    Ok(())
}

async fn upstream_error(response: Response, fallback: &str) -> RemoteError {
    let status = response.status();
    let message = match response.json::<UpstreamError>().await {
        Ok(body) if !body.error.is_empty() => body.error,
        Ok(_) => fallback.to_string(),
        Err(_) => format!(
            "Server error: {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("")
        ),
    };
    RemoteError::Upstream {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;
    use axum::routing::post;
    use axum::Router;

    fn pdf(name: &str, size: usize) -> UploadFile {
        UploadFile {
            name: name.to_string(),
            bytes: Bytes::from(vec![0u8; size]),
        }
    }

    async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn oversized_file_is_rejected_locally() {
        // Unroutable base URL: if validation let this through, the test
        // would fail with a network error instead of the validation message.
        let client = DocProcClient::new("http://127.0.0.1:9");
        let err = client
            .enhance(pdf("report.pdf", 11 * 1024 * 1024), EnhanceOptions::default())
            .await
            .unwrap_err();
        match err {
            RemoteError::Validation(message) => {
                assert_eq!(message, "File size exceeds 10MB limit")
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unsupported_extension_is_rejected_locally() {
        let client = DocProcClient::new("http://127.0.0.1:9");
        let err = client
            .enhance(pdf("image.png", 128), EnhanceOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RemoteError::Validation(ref m) if m.contains("Unsupported")));
    }

    #[tokio::test]
    async fn missing_signature_is_rejected_locally() {
        let client = DocProcClient::new("http://127.0.0.1:9");
        let err = client
            .add_signature(pdf("contract.pdf", 128), SignatureOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RemoteError::Validation(ref m) if m == "No signature provided"));
    }

    #[tokio::test]
    async fn missing_signer_name_is_rejected_locally() {
        let client = DocProcClient::new("http://127.0.0.1:9");
        let err = client
            .add_signature(
                pdf("contract.pdf", 128),
                SignatureOptions {
                    signature: "SGVsbG8=".to_string(),
                    ..SignatureOptions::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RemoteError::Validation(ref m) if m == "Signer name is required"));
    }

    #[tokio::test]
    async fn enhance_synthesizes_docx_filename_without_header() {
        let router = Router::new().route("/enhance", post(|| async { vec![1u8, 2, 3] }));
        let client = DocProcClient::new(spawn(router).await);

        let result = client
            .enhance(pdf("report.pdf", 2 * 1024 * 1024), EnhanceOptions::default())
            .await
            .unwrap();

        assert_eq!(result.filename, "enhanced_report.docx");
        assert_eq!(result.bytes.as_ref(), &[1, 2, 3]);
        assert_eq!(result.content_type, DOCX_MIME);
    }

    #[tokio::test]
    async fn enhance_prefers_header_filename_and_normalizes_it() {
        let router = Router::new().route(
            "/enhance",
            post(|| async {
                (
                    [(
                        header::CONTENT_DISPOSITION,
                        "attachment; filename=\"improved.pdf\"",
                    )],
                    vec![9u8],
                )
            }),
        );
        let client = DocProcClient::new(spawn(router).await);

        let result = client
            .enhance(pdf("report.pdf", 1024), EnhanceOptions::default())
            .await
            .unwrap();
        assert_eq!(result.filename, "improved.docx");
    }

    #[tokio::test]
    async fn signature_default_filename_is_prefixed() {
        let router = Router::new().route("/add-signature", post(|| async { vec![7u8] }));
        let client = DocProcClient::new(spawn(router).await);

        let result = client
            .add_signature(
                pdf("contract.pdf", 1024),
                SignatureOptions {
                    signature: "SGVsbG8=".to_string(),
                    signer_name: Some("Jane Doe".to_string()),
                    ..SignatureOptions::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(result.filename, "Signed_contract.docx");
    }

    #[tokio::test]
    async fn upstream_json_error_is_surfaced() {
        let router = Router::new().route(
            "/enhance",
            post(|| async {
                (
                    axum::http::StatusCode::UNPROCESSABLE_ENTITY,
                    axum::Json(serde_json::json!({ "error": "document is encrypted" })),
                )
            }),
        );
        let client = DocProcClient::new(spawn(router).await);

        let err = client
            .enhance(pdf("locked.pdf", 1024), EnhanceOptions::default())
            .await
            .unwrap_err();
        match err {
            RemoteError::Upstream { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "document is encrypted");
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn upstream_error_without_body_gets_generic_message() {
        let router = Router::new().route(
            "/enhance",
            post(|| async { axum::http::StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let client = DocProcClient::new(spawn(router).await);

        let err = client
            .enhance(pdf("report.pdf", 1024), EnhanceOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RemoteError::Upstream { status: 500, ref message } if message.starts_with("Server error: 500")
        ));
    }

    #[tokio::test]
    async fn preview_reshapes_equations() {
        let router = Router::new().route(
            "/preview",
            post(|| async {
                axum::Json(serde_json::json!({
                    "filename": "paper.docx",
                    "has_math": true,
                    "equation_count": 2,
                    "equations": [
                        { "content": "E = mc^2" },
                        { "content": "a^2 + b^2 = c^2" }
                    ],
                    "text_preview": "Introduction..."
                }))
            }),
        );
        let client = DocProcClient::new(spawn(router).await);

        let preview = client.preview(pdf("paper.pdf", 1024)).await.unwrap();
        assert!(preview.has_math);
        assert_eq!(preview.equation_count, 2);
        assert_eq!(preview.latex_equations, vec!["E = mc^2", "a^2 + b^2 = c^2"]);
        assert_eq!(preview.preview_text, "Introduction...");
        assert_eq!(preview.filename, "paper.docx");
    }
}
