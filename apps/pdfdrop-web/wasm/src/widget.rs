//! The `PdfDropWidget` class exported to JavaScript

use crate::fields::DomFields;
use crate::surface::DomSurface;
use crate::transport::FetchTransport;
use pdfdrop_core::{OperationOutcome, SelectedFile, Transport, Widget, WidgetConfig};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::{File, FileList};

type BrowserWidget = Widget<File, DomSurface, DomFields>;

/// Result of a successful `submit`, as handed to JavaScript
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitSummary<'a> {
    filename: &'a str,
    mime: &'a str,
    size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    json: Option<&'a serde_json::Value>,
}

impl<'a> From<&'a OperationOutcome> for SubmitSummary<'a> {
    fn from(outcome: &'a OperationOutcome) -> Self {
        let artifact = outcome.artifact();
        Self {
            filename: &artifact.filename,
            mime: &artifact.mime,
            size: artifact.bytes.len(),
            json: match outcome {
                OperationOutcome::Json { value, .. } => Some(value),
                OperationOutcome::File(_) => None,
            },
        }
    }
}

/// File upload widget bound to the current page
#[wasm_bindgen]
pub struct PdfDropWidget {
    inner: Rc<RefCell<BrowserWidget>>,
    transport: FetchTransport,
}

#[wasm_bindgen]
impl PdfDropWidget {
    /// Create a widget; `config_json` overrides the defaults
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<PdfDropWidget, JsValue> {
        let config = match config_json.as_deref() {
            Some(json) if !json.trim().is_empty() => {
                WidgetConfig::from_json_str(json).map_err(|e| JsValue::from_str(&e.to_string()))?
            }
            _ => WidgetConfig::default(),
        };

        let widget = Widget::new(config, DomSurface::new()?, DomFields::new()?);
        Ok(Self {
            inner: Rc::new(RefCell::new(widget)),
            transport: FetchTransport,
        })
    }

    /// Operation names with their field schemas
    pub fn operations() -> Result<JsValue, JsValue> {
        to_js(&crate::operation_catalog())
    }

    /// Stage files from a drop or picker event.
    /// Returns `{accepted, rejected}`; rejections are also shown as notices.
    #[wasm_bindgen(js_name = addFiles)]
    pub fn add_files(&self, files: FileList) -> Result<JsValue, JsValue> {
        let candidates: Vec<SelectedFile<File>> = (0..files.length())
            .filter_map(|i| files.get(i))
            .map(|file| SelectedFile::new(file.name(), file.size() as u64, file.type_(), file))
            .collect();

        let report = self.inner.borrow_mut().handle_files(candidates);
        to_js(&report)
    }

    #[wasm_bindgen(js_name = removeFile)]
    pub fn remove_file(&self, index: usize) -> Result<(), JsValue> {
        self.inner
            .borrow_mut()
            .remove_file(index)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// `new_order` lists current indices in the desired order
    #[wasm_bindgen(js_name = reorderFiles)]
    pub fn reorder_files(&self, new_order: &[usize]) -> Result<(), JsValue> {
        self.inner
            .borrow_mut()
            .reorder_files(new_order)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = moveFile)]
    pub fn move_file(&self, from: usize, to: usize) -> Result<(), JsValue> {
        self.inner
            .borrow_mut()
            .move_file(from, to)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn reset(&self) {
        self.inner.borrow_mut().reset();
    }

    #[wasm_bindgen(js_name = getFiles)]
    pub fn get_files(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.borrow().collection().summaries())
    }

    #[wasm_bindgen(js_name = fileCount)]
    pub fn file_count(&self) -> usize {
        self.inner.borrow().collection().len()
    }

    /// Current submission state, e.g. "Idle" or "AwaitingResponse"
    pub fn state(&self) -> String {
        format!("{:?}", self.inner.borrow().state())
    }

    /// Run `operation` against the service.
    ///
    /// Resolves to `{filename, mime, size, json?}` after the download was
    /// triggered; rejects with the error message, which is also shown as
    /// a notice.
    pub fn submit(&self, operation: String) -> js_sys::Promise {
        let inner = Rc::clone(&self.inner);
        let transport = self.transport;

        wasm_bindgen_futures::future_to_promise(async move {
            // No borrow is held across the await: handlers may run meanwhile
            let prepared = inner
                .borrow_mut()
                .prepare_submission(&operation)
                .map_err(|e| JsValue::from_str(&e.to_string()))?;

            let response = transport
                .send(&prepared.endpoint, &prepared.request)
                .await;

            let outcome = inner
                .borrow_mut()
                .finish_submission(response)
                .map_err(|e| JsValue::from_str(&e.to_string()))?;

            to_js(&SubmitSummary::from(&outcome))
        })
    }
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfdrop_core::Artifact;

    #[test]
    fn test_summary_of_json_outcome() {
        let value = serde_json::json!({"pages": []});
        let outcome = OperationOutcome::Json {
            value: value.clone(),
            artifact: Artifact {
                filename: "extracted_text.json".to_string(),
                mime: "application/json".to_string(),
                bytes: b"{}".to_vec(),
            },
        };

        let summary = serde_json::to_value(SubmitSummary::from(&outcome)).unwrap();
        assert_eq!(summary["filename"], "extracted_text.json");
        assert_eq!(summary["size"], 2);
        assert_eq!(summary["json"], value);
    }

    #[test]
    fn test_summary_of_file_outcome_has_no_json() {
        let outcome = OperationOutcome::File(Artifact {
            filename: "merged.pdf".to_string(),
            mime: "application/pdf".to_string(),
            bytes: vec![0; 10],
        });

        let summary = serde_json::to_value(SubmitSummary::from(&outcome)).unwrap();
        assert_eq!(summary["mime"], "application/pdf");
        assert!(summary.get("json").is_none());
    }
}
