//! Remote generation clients.
//!
//! Two external AI-backed HTTP services sit behind this module: the template
//! service (JSON in, Word/PDF out) and the document-processing service
//! (multipart in, Word out). Neither client retries, and neither configures a
//! timeout beyond reqwest's platform default; a hung upstream call hangs the
//! request.

use bytes::Bytes;
use reqwest::header::HeaderMap;
use thiserror::Error;

pub mod docproc;
pub mod template_api;

pub use docproc::DocProcClient;
pub use template_api::TemplateClient;

pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const PDF_MIME: &str = "application/pdf";

#[derive(Debug, Error)]
pub enum RemoteError {
    /// Rejected locally; no request was sent.
    #[error("{0}")]
    Validation(String),

    /// Upstream answered with a non-2xx status.
    #[error("{message}")]
    Upstream { status: u16, message: String },

    /// The service could not be reached at all.
    #[error("Network error. Please check your connection and try again.")]
    Network(#[source] reqwest::Error),

    /// 2xx response whose body did not match the documented shape.
    #[error("Invalid response from server: {0}")]
    Decode(String),
}

/// A binary artifact returned by one of the services, ready for download.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub bytes: Bytes,
    pub filename: String,
    pub content_type: &'static str,
}

/// Forces the filename to end in exactly one `.docx` extension; the
/// processing backend returns Word documents regardless of input format.
pub(crate) fn ensure_docx(name: &str) -> String {
    let lower = name.to_lowercase();
    for ext in [".pdf", ".txt", ".doc"] {
        if lower.ends_with(ext) {
            return format!("{}.docx", &name[..name.len() - ext.len()]);
        }
    }
    if lower.ends_with(".docx") {
        return name.to_string();
    }
    match name.rfind('.') {
        Some(idx) if idx > 0 => format!("{}.docx", &name[..idx]),
        _ => format!("{name}.docx"),
    }
}

/// Extracts the filename from a `Content-Disposition` header, if any.
pub(crate) fn content_disposition_filename(headers: &HeaderMap) -> Option<String> {
    let value = headers
        .get(reqwest::header::CONTENT_DISPOSITION)?
        .to_str()
        .ok()?;
    let (_, rest) = value.split_once("filename=")?;
    let name = rest
        .split(';')
        .next()
        .unwrap_or(rest)
        .trim()
        .trim_matches('"');
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Collapses whitespace runs into underscores, for derived filenames.
pub(crate) fn underscore(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut in_whitespace = false;
    for c in value.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                out.push('_');
                in_whitespace = true;
            }
        } else {
            out.push(c);
            in_whitespace = false;
        }
    }
    out
}
