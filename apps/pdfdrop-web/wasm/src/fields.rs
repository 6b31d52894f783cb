//! Operation parameters read straight from the page's input controls

use pdfdrop_core::{FieldKind, FieldSource, FieldValue};
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};

/// Looks controls up by id at submission time, so the page can
/// add or remove option panels freely.
pub struct DomFields {
    document: Document,
}

impl DomFields {
    pub fn new() -> Result<Self, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("No document object available"))?;
        Ok(Self { document })
    }
}

impl FieldSource for DomFields {
    fn read(&self, control: &str, kind: FieldKind) -> Option<FieldValue> {
        let element = self.document.get_element_by_id(control)?;

        if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
            return Some(match kind {
                FieldKind::Checkbox => FieldValue::Flag(input.checked()),
                _ => FieldValue::Text(input.value()),
            });
        }
        if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
            return Some(FieldValue::Text(select.value()));
        }
        if let Some(area) = element.dyn_ref::<HtmlTextAreaElement>() {
            return Some(FieldValue::Text(area.value()));
        }

        web_sys::console::warn_1(
            &format!("Control #{} is not an input element", control).into(),
        );
        None
    }
}
