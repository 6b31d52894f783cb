//! `fetch`-based transport

use crate::js_error_message;
use async_trait::async_trait;
use js_sys::Uint8Array;
use pdfdrop_core::{FormValue, OperationRequest, RawResponse, Transport, TransportError};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, FormData, Request, RequestInit, Response};

/// Posts the request as `multipart/form-data`; the browser sets the
/// boundary header itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

impl FetchTransport {
    async fn fetch(
        &self,
        endpoint: &str,
        request: &OperationRequest<File>,
    ) -> Result<RawResponse, JsValue> {
        let window = web_sys::window().ok_or("No window")?;

        let form = FormData::new()?;
        for part in &request.parts {
            match &part.value {
                FormValue::Text(text) => form.append_with_str(part.name, text)?,
                FormValue::File(file) => {
                    form.append_with_blob_and_filename(part.name, &file.payload, &file.name)?
                }
            }
        }

        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_body(&form);

        let request = Request::new_with_str_and_init(endpoint, &opts)?;
        let response = JsFuture::from(window.fetch_with_request(&request)).await?;
        read_response(response.dyn_into()?).await
    }
}

/// Status, the two headers the pipeline reads, and the whole body
async fn read_response(response: Response) -> Result<RawResponse, JsValue> {
    let headers = response.headers();
    let content_type = headers.get("Content-Type")?;
    let content_disposition = headers.get("Content-Disposition")?;

    let buffer = JsFuture::from(response.array_buffer()?).await?;
    let body = Uint8Array::new(&buffer).to_vec();

    Ok(RawResponse {
        status: response.status(),
        content_type,
        content_disposition,
        body,
    })
}

#[async_trait(?Send)]
impl Transport<File> for FetchTransport {
    async fn send(
        &self,
        endpoint: &str,
        request: &OperationRequest<File>,
    ) -> Result<RawResponse, TransportError> {
        self.fetch(endpoint, request).await.map_err(|err| {
            let message = js_error_message(&err);
            web_sys::console::error_1(&format!("Request to {} failed: {}", endpoint, message).into());
            TransportError::Network(message)
        })
    }
}
