//! Access to the current values of operation input controls

use crate::operation::FieldKind;
use std::collections::HashMap;

/// Value read from an input control
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
}

impl FieldValue {
    /// Blank text counts as missing for required fields
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Flag(_) => false,
        }
    }

    /// Multipart encoding; flags become "true"/"false"
    pub fn into_form_text(self) -> String {
        match self {
            FieldValue::Text(s) => s,
            FieldValue::Flag(b) => b.to_string(),
        }
    }
}

/// Supplies control values by control id.
///
/// Returns `None` when the control does not exist.
pub trait FieldSource {
    fn read(&self, control: &str, kind: FieldKind) -> Option<FieldValue>;
}

/// Map-backed field source, for native front ends and tests
#[derive(Debug, Clone, Default)]
pub struct StaticFields {
    values: HashMap<String, String>,
}

impl StaticFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, control: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(control, value);
        self
    }

    pub fn set(&mut self, control: impl Into<String>, value: impl Into<String>) {
        self.values.insert(control.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FieldSource for StaticFields {
    fn read(&self, control: &str, kind: FieldKind) -> Option<FieldValue> {
        let raw = self.values.get(control);
        match kind {
            // unchecked checkboxes still submit "false"
            FieldKind::Checkbox => Some(FieldValue::Flag(raw.is_some_and(|v| is_truthy(v)))),
            _ => raw.map(|v| FieldValue::Text(v.clone())),
        }
    }
}

impl<T: FieldSource + ?Sized> FieldSource for &T {
    fn read(&self, control: &str, kind: FieldKind) -> Option<FieldValue> {
        (**self).read(control, kind)
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on" | "checked"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_fields_read_text() {
        let fields = StaticFields::new().with("page-ranges", "1-3");
        assert_eq!(
            fields.read("page-ranges", FieldKind::Text),
            Some(FieldValue::Text("1-3".into()))
        );
        assert_eq!(fields.read("missing", FieldKind::Text), None);
    }

    #[test]
    fn test_checkbox_defaults_to_unchecked() {
        let fields = StaticFields::new().with("allow-print", "on");
        assert_eq!(
            fields.read("allow-print", FieldKind::Checkbox),
            Some(FieldValue::Flag(true))
        );
        assert_eq!(
            fields.read("allow-copy", FieldKind::Checkbox),
            Some(FieldValue::Flag(false))
        );
    }

    #[test]
    fn test_blank_and_form_text() {
        assert!(FieldValue::Text("   ".into()).is_blank());
        assert!(!FieldValue::Flag(false).is_blank());
        assert_eq!(FieldValue::Flag(true).into_form_text(), "true");
        assert_eq!(FieldValue::Text("x".into()).into_form_text(), "x");
    }
}
