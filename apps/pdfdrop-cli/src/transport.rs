use async_trait::async_trait;
use pdfdrop_core::{FormValue, OperationRequest, RawResponse, Transport, TransportError};
use reqwest::header::{HeaderMap, HeaderName, CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("pdfdrop/", env!("CARGO_PKG_VERSION"));

/// Multipart POST over `reqwest`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

/// Multipart body in request order
pub fn build_form(request: &OperationRequest<Vec<u8>>) -> Result<Form, TransportError> {
    let mut form = Form::new();

    for part in &request.parts {
        form = match &part.value {
            FormValue::Text(text) => form.text(part.name, text.clone()),
            FormValue::File(file) => {
                let mut body = Part::bytes(file.payload.clone()).file_name(file.name.clone());
                if !file.mime.is_empty() {
                    body = body.mime_str(&file.mime).map_err(|e| {
                        TransportError::Network(format!("Invalid MIME type {}: {}", file.mime, e))
                    })?;
                }
                form.part(part.name, body)
            }
        };
    }

    Ok(form)
}

fn header_value(headers: &HeaderMap, name: HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

#[async_trait(?Send)]
impl Transport<Vec<u8>> for ReqwestTransport {
    async fn send(
        &self,
        endpoint: &str,
        request: &OperationRequest<Vec<u8>>,
    ) -> Result<RawResponse, TransportError> {
        let form = build_form(request)?;
        debug!(endpoint, fields = ?request.field_names(), "sending request");

        let response = self
            .client
            .post(endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let content_type = header_value(response.headers(), CONTENT_TYPE);
        let content_disposition = header_value(response.headers(), CONTENT_DISPOSITION);

        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?
            .to_vec();

        debug!(status, bytes = body.len(), "response received");
        Ok(RawResponse {
            status,
            content_type,
            content_disposition,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfdrop_core::{FileCollection, Operation, SelectedFile, StaticFields};

    fn request(op: Operation, fields: StaticFields) -> OperationRequest<Vec<u8>> {
        let mut collection = FileCollection::default();
        collection.accept(vec![SelectedFile::from_bytes(
            "a.pdf",
            "application/pdf",
            b"%PDF-1.7".to_vec(),
        )]);
        OperationRequest::assemble(op, &collection, &fields).unwrap()
    }

    #[test]
    fn test_form_has_boundary() {
        let form = build_form(&request(Operation::Merge, StaticFields::new())).unwrap();
        assert!(!form.boundary().is_empty());
    }

    #[test]
    fn test_form_with_fields() {
        let fields = StaticFields::new().with("page-ranges", "1-3");
        assert!(build_form(&request(Operation::Split, fields)).is_ok());
    }

    #[test]
    fn test_client_builds_with_timeout() {
        assert!(ReqwestTransport::new(Some(Duration::from_secs(30))).is_ok());
    }
}
