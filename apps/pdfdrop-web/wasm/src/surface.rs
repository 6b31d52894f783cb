//! DOM rendering of the widget state
//!
//! Expects the page to provide:
//! - `#drop-zone`: notices are appended to its parent
//! - `#file-input`: the picker, cleared on reset
//! - `#file-list`: container for the rendered file rows
//! - `.progress-bar`: width follows the submission progress
//! - `#json-output` (optional): receives structured results
//!
//! File names are only ever inserted as text, never as markup.

use crate::js_error_message;
use js_sys::{Array, Uint8Array};
use pdfdrop_core::{format_bytes, Artifact, FileSummary, Notice, NoticeLevel, UiSurface};
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::{
    Blob, BlobPropertyBag, Document, Element, HtmlAnchorElement, HtmlElement, HtmlInputElement,
    Url, Window,
};

const DROP_ZONE_ID: &str = "drop-zone";
const FILE_INPUT_ID: &str = "file-input";
const FILE_LIST_ID: &str = "file-list";
const JSON_OUTPUT_ID: &str = "json-output";
const PROGRESS_BAR_SELECTOR: &str = ".progress-bar";

/// Delay before an object URL is revoked after its download was triggered
const REVOKE_DELAY_MS: i32 = 1_000;

/// Object URL revoked when dropped
struct ObjectUrl(String);

impl ObjectUrl {
    fn for_blob(blob: &Blob) -> Result<Self, JsValue> {
        Url::create_object_url_with_blob(blob).map(ObjectUrl)
    }

    fn href(&self) -> &str {
        &self.0
    }
}

impl Drop for ObjectUrl {
    fn drop(&mut self) {
        let _ = Url::revoke_object_url(&self.0);
    }
}

/// Object URLs still alive, shared with the deferred revoke callbacks
#[derive(Clone, Default)]
struct UrlRegistry(Rc<RefCell<Vec<ObjectUrl>>>);

impl UrlRegistry {
    fn hold(&self, url: ObjectUrl) {
        self.0.borrow_mut().push(url);
    }

    fn release(&self, href: &str) {
        self.0.borrow_mut().retain(|url| url.href() != href);
    }

    fn release_all(&self) {
        self.0.borrow_mut().clear();
    }

    fn len(&self) -> usize {
        self.0.borrow().len()
    }
}

pub struct DomSurface {
    window: Window,
    document: Document,
    urls: UrlRegistry,
}

impl DomSurface {
    pub fn new() -> Result<Self, JsValue> {
        let window =
            web_sys::window().ok_or_else(|| JsValue::from_str("No window object available"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("No document object available"))?;

        Ok(Self {
            window,
            document,
            urls: UrlRegistry::default(),
        })
    }

    /// Object URLs not yet revoked
    pub fn live_object_urls(&self) -> usize {
        self.urls.len()
    }

    fn try_render_files(&self, files: &[FileSummary]) -> Result<(), JsValue> {
        let Some(list) = self.document.get_element_by_id(FILE_LIST_ID) else {
            return Ok(());
        };
        list.set_text_content(None);

        for file in files {
            let row = self.document.create_element("div")?;
            row.set_class_name("file-item d-flex align-items-center p-2 border-bottom");
            row.set_attribute("data-index", &file.index.to_string())?;

            let name = self.document.create_element("span")?;
            name.set_class_name("flex-grow-1");
            name.set_text_content(Some(&file.name));

            let size = self.document.create_element("small")?;
            size.set_class_name("text-muted me-2");
            size.set_text_content(Some(&format_bytes(file.size)));

            let remove = self.document.create_element("button")?;
            remove.set_class_name("btn btn-sm btn-outline-danger remove-file");
            remove.set_attribute("type", "button")?;
            remove.set_attribute("data-index", &file.index.to_string())?;
            remove.set_attribute("aria-label", &format!("Remove {}", file.name))?;
            remove.set_text_content(Some("\u{00d7}"));

            row.append_child(&name)?;
            row.append_child(&size)?;
            row.append_child(&remove)?;
            list.append_child(&row)?;
        }
        Ok(())
    }

    fn try_show_notice(&self, notice: &Notice) -> Result<(), JsValue> {
        let alert = self.document.create_element("div")?;
        alert.set_class_name(&format!(
            "alert {} alert-dismissible fade show mt-3",
            alert_class(notice.level)
        ));
        alert.set_attribute("role", "alert")?;

        let text = self.document.create_element("span")?;
        text.set_text_content(Some(&notice.message));
        alert.append_child(&text)?;

        let close = self.document.create_element("button")?;
        close.set_class_name("btn-close");
        close.set_attribute("type", "button")?;
        close.set_attribute("data-bs-dismiss", "alert")?;
        close.set_attribute("aria-label", "Close")?;
        alert.append_child(&close)?;

        self.notice_host()?.append_child(&alert)?;

        let expire = Closure::once_into_js(move || alert.remove());
        self.window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                expire.unchecked_ref(),
                notice.timeout_ms.min(i32::MAX as u32) as i32,
            )?;
        Ok(())
    }

    fn notice_host(&self) -> Result<Element, JsValue> {
        if let Some(parent) = self
            .document
            .get_element_by_id(DROP_ZONE_ID)
            .and_then(|zone| zone.parent_element())
        {
            return Ok(parent);
        }
        self.document
            .body()
            .map(Element::from)
            .ok_or_else(|| JsValue::from_str("No body element available"))
    }

    fn try_set_progress(&self, percent: u8) -> Result<(), JsValue> {
        let Some(bar) = self.document.query_selector(PROGRESS_BAR_SELECTOR)? else {
            return Ok(());
        };
        let percent = percent.min(100);

        if let Some(html) = bar.dyn_ref::<HtmlElement>() {
            html.style().set_property("width", &format!("{}%", percent))?;
        }
        bar.set_attribute("aria-valuenow", &percent.to_string())?;

        if let Some(track) = bar.parent_element() {
            track
                .class_list()
                .toggle_with_force("d-none", percent == 0 || percent == 100)?;
        }
        Ok(())
    }

    fn try_download(&self, artifact: &Artifact) -> Result<(), JsValue> {
        let bytes = Uint8Array::from(artifact.bytes.as_slice());
        let parts = Array::new();
        parts.push(&bytes);

        let options = BlobPropertyBag::new();
        options.set_type(&artifact.mime);
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;

        let url = ObjectUrl::for_blob(&blob)?;
        let href = url.href().to_string();
        self.urls.hold(url);

        let anchor: HtmlAnchorElement = self.document.create_element("a")?.dyn_into()?;
        anchor.set_href(&href);
        anchor.set_download(&artifact.filename);

        let body = self
            .document
            .body()
            .ok_or_else(|| JsValue::from_str("No body element available"))?;
        body.append_child(&anchor)?;
        anchor.click();
        anchor.remove();

        let urls = self.urls.clone();
        let revoke = Closure::once_into_js(move || urls.release(&href));
        self.window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                revoke.unchecked_ref(),
                REVOKE_DELAY_MS,
            )?;

        web_sys::console::log_1(
            &format!(
                "Downloading {} ({})",
                artifact.filename,
                format_bytes(artifact.bytes.len() as u64)
            )
            .into(),
        );
        Ok(())
    }

    fn try_display_json(&self, value: &Value) -> Result<(), JsValue> {
        let Some(output) = self.document.get_element_by_id(JSON_OUTPUT_ID) else {
            return Ok(());
        };
        let pretty = serde_json::to_string_pretty(value)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        output.set_text_content(Some(&pretty));
        Ok(())
    }

    fn try_reset_inputs(&self) -> Result<(), JsValue> {
        self.urls.release_all();

        if let Some(input) = self
            .document
            .get_element_by_id(FILE_INPUT_ID)
            .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
        {
            input.set_value("");
        }
        if let Some(output) = self.document.get_element_by_id(JSON_OUTPUT_ID) {
            output.set_text_content(None);
        }
        Ok(())
    }
}

impl UiSurface for DomSurface {
    fn render_files(&mut self, files: &[FileSummary]) {
        report("render file list", self.try_render_files(files));
    }

    fn show_notice(&mut self, notice: Notice) {
        report("show notice", self.try_show_notice(&notice));
    }

    fn set_progress(&mut self, percent: u8) {
        report("update progress", self.try_set_progress(percent));
    }

    fn offer_download(&mut self, artifact: &Artifact) -> Result<(), String> {
        self.try_download(artifact).map_err(|err| {
            let message = format!(
                "Failed to download {}: {}",
                artifact.filename,
                js_error_message(&err)
            );
            web_sys::console::error_1(&message.as_str().into());
            message
        })
    }

    fn display_json(&mut self, value: &Value) {
        report("display result", self.try_display_json(value));
    }

    fn reset_inputs(&mut self) {
        report("reset inputs", self.try_reset_inputs());
    }
}

fn alert_class(level: NoticeLevel) -> &'static str {
    match level {
        NoticeLevel::Info => "alert-info",
        NoticeLevel::Success => "alert-success",
        NoticeLevel::Error => "alert-danger",
    }
}

fn report(action: &str, result: Result<(), JsValue>) {
    if let Err(err) = result {
        web_sys::console::error_1(
            &format!("Failed to {}: {}", action, js_error_message(&err)).into(),
        );
    }
}
