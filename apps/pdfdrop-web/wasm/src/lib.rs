//! WASM bindings for the PDF upload widget
//!
//! All widget state lives in Rust. JavaScript forwards DOM events
//! (drop, file picker, remove buttons, operation buttons) to a
//! `PdfDropWidget` and the widget updates the page itself.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { PdfDropWidget } from './pkg/pdfdrop_wasm.js';
//!
//! await init();
//!
//! const widget = new PdfDropWidget(JSON.stringify({ endpoint_base: "" }));
//! dropZone.addEventListener('drop', (e) => widget.addFiles(e.dataTransfer.files));
//! fileInput.addEventListener('change', () => widget.addFiles(fileInput.files));
//!
//! // Operation buttons
//! await widget.submit("merge");
//! ```

pub mod fields;
pub mod surface;
pub mod transport;
pub mod widget;

use pdfdrop_core::Operation;
use wasm_bindgen::prelude::*;

pub use fields::DomFields;
pub use surface::DomSurface;
pub use transport::FetchTransport;
pub use widget::PdfDropWidget;

/// Initialize the WASM module
/// Called automatically by wasm-bindgen
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Get the library version
#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Format bytes as human-readable string
#[wasm_bindgen]
pub fn format_bytes(bytes: usize) -> String {
    pdfdrop_core::format_bytes(bytes as u64)
}

/// Operation names with their field schemas
pub fn operation_catalog() -> serde_json::Value {
    Operation::ALL
        .iter()
        .map(|op| {
            serde_json::json!({
                "name": op.name(),
                "orderSensitive": op.is_order_sensitive(),
                "schema": op.schema(),
            })
        })
        .collect()
}

/// Convert a JS error into something loggable
pub(crate) fn js_error_message(err: &JsValue) -> String {
    if let Some(s) = err.as_string() {
        return s;
    }
    if let Some(e) = err.dyn_ref::<js_sys::Error>() {
        return String::from(e.message());
    }
    format!("{:?}", err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_get_version() {
        let version = get_version();
        assert!(!version.is_empty());
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(500), "500 B");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(2621440), "2.5 MB");
    }

    #[test]
    fn test_catalog_lists_every_operation() {
        let catalog = operation_catalog();
        let names: Vec<&str> = catalog
            .as_array()
            .unwrap()
            .iter()
            .map(|entry| entry["name"].as_str().unwrap())
            .collect();

        assert_eq!(
            names,
            vec![
                "merge",
                "split",
                "watermark",
                "toImages",
                "rotate",
                "addText",
                "extractText",
                "organize",
                "secure"
            ]
        );
        assert_eq!(catalog[0]["orderSensitive"], true);
        assert_eq!(catalog[1]["schema"]["fields"][0]["control"], "page-ranges");
    }

    proptest! {
        #[test]
        fn format_bytes_always_has_unit(bytes in 0usize..usize::MAX / 2) {
            let formatted = format_bytes(bytes);
            prop_assert!(formatted.ends_with('B'));
        }
    }
}
