//! Response interpretation: the content-type branch
//!
//! Non-2xx responses become remote errors. Successful JSON bodies become a
//! pretty-printed `extracted_text.json` artifact; anything else is treated
//! as a binary download named from `Content-Disposition`.

use crate::error::{OperationError, TransportError};
use serde::Serialize;
use serde_json::Value;

pub const JSON_ARTIFACT_NAME: &str = "extracted_text.json";
pub const FALLBACK_STEM: &str = "output";

/// What a transport hands back, independent of the HTTP stack used
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub content_disposition: Option<String>,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A file offered to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    pub filename: String,
    pub mime: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OperationOutcome {
    /// Binary result to download
    File(Artifact),
    /// Structured result, with its downloadable rendition
    Json { value: Value, artifact: Artifact },
}

impl OperationOutcome {
    pub fn artifact(&self) -> &Artifact {
        match self {
            OperationOutcome::File(artifact) => artifact,
            OperationOutcome::Json { artifact, .. } => artifact,
        }
    }

    pub fn into_artifact(self) -> Artifact {
        match self {
            OperationOutcome::File(artifact) => artifact,
            OperationOutcome::Json { artifact, .. } => artifact,
        }
    }
}

/// Turn a raw response into an outcome or an error
pub fn interpret(response: RawResponse) -> Result<OperationOutcome, OperationError> {
    if !response.is_success() {
        return Err(OperationError::Remote {
            status: response.status,
            message: remote_message(&response),
        });
    }

    let content_type = response
        .content_type
        .as_deref()
        .unwrap_or("")
        .to_ascii_lowercase();

    if content_type.contains("json") {
        let value: Value = serde_json::from_slice(&response.body)
            .map_err(|e| TransportError::MalformedResponse(e.to_string()))?;
        let pretty = serde_json::to_string_pretty(&value)
            .map_err(|e| TransportError::MalformedResponse(e.to_string()))?;

        return Ok(OperationOutcome::Json {
            value,
            artifact: Artifact {
                filename: JSON_ARTIFACT_NAME.to_string(),
                mime: "application/json".to_string(),
                bytes: pretty.into_bytes(),
            },
        });
    }

    let filename = derive_filename(response.content_disposition.as_deref(), &content_type);
    let mime = match response.content_type {
        Some(ct) if !ct.is_empty() => ct,
        _ => "application/octet-stream".to_string(),
    };

    Ok(OperationOutcome::File(Artifact {
        filename,
        mime,
        bytes: response.body,
    }))
}

/// `{error}` from a JSON error body, or a generic message
fn remote_message(response: &RawResponse) -> String {
    serde_json::from_slice::<Value>(&response.body)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
        .filter(|msg| !msg.trim().is_empty())
        .unwrap_or_else(|| format!("Operation failed (HTTP {})", response.status))
}

/// Filename from the disposition header, falling back to `output` plus an
/// extension inferred from the content type
pub fn derive_filename(content_disposition: Option<&str>, content_type: &str) -> String {
    let mut filename = content_disposition
        .and_then(disposition_filename)
        .map(|name| basename(&name).to_string())
        .filter(|name| !name.is_empty() && name != "." && name != "..")
        .unwrap_or_else(|| FALLBACK_STEM.to_string());

    if !filename.contains('.') {
        if let Some(ext) = extension_for(content_type) {
            filename.push_str(ext);
        }
    }

    filename
}

fn extension_for(content_type: &str) -> Option<&'static str> {
    let content_type = content_type.to_ascii_lowercase();
    if content_type.contains("pdf") {
        Some(".pdf")
    } else if content_type.contains("zip") {
        Some(".zip")
    } else if content_type.contains("text") {
        Some(".txt")
    } else {
        None
    }
}

/// Extract the filename parameter, preferring the RFC 5987 `filename*` form
fn disposition_filename(header: &str) -> Option<String> {
    let mut plain = None;

    for param in split_params(header).into_iter().skip(1) {
        let Some((key, value)) = param.split_once('=') else {
            continue;
        };
        let key = key.trim().to_ascii_lowercase();
        let value = value.trim();

        if key == "filename*" {
            // charset'lang'percent-encoded
            let encoded = value.splitn(3, '\'').nth(2).unwrap_or(value);
            if let Some(decoded) = percent_decode(encoded.trim_matches('"')) {
                return Some(decoded);
            }
        } else if key == "filename" && plain.is_none() {
            plain = Some(unquote(value));
        }
    }

    plain
}

/// Split header parameters on `;`, except inside quoted strings
fn split_params(header: &str) -> Vec<&str> {
    let mut params = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut escaped = false;

    for (i, c) in header.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => {
                params.push(&header[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    params.push(&header[start..]);
    params
}

/// Strip surrounding quotes; `\"` and `\\` inside them are unescaped
fn unquote(value: &str) -> String {
    let Some(inner) = value.strip_prefix('"') else {
        return value.to_string();
    };
    let inner = inner.strip_suffix('"').unwrap_or(inner);

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        match (c, chars.peek()) {
            ('\\', Some(&next)) if next == '"' || next == '\\' => {
                out.push(next);
                chars.next();
            }
            _ => out.push(c),
        }
    }
    out
}

fn percent_decode(input: &str) -> Option<String> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = input.get(i + 1..i + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

/// Strip any directory components a server might put in the name
fn basename(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name).trim()
}
