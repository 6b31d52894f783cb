//! Multipart payload assembly
//!
//! Combines the file collection with control values according to the
//! operation's schema. All validation happens here, before any network call.

use crate::collection::FileCollection;
use crate::error::ValidationError;
use crate::fields::{FieldSource, FieldValue};
use crate::file::SelectedFile;
use crate::operation::{FieldCheck, FileRule, Operation};
use crate::ranges::parse_ranges;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue<P> {
    Text(String),
    File(SelectedFile<P>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPart<P> {
    pub name: &'static str,
    pub value: FormValue<P>,
}

/// A fully validated request, ready for a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRequest<P> {
    pub operation: Operation,
    /// Extra fields in schema order, then the file part(s)
    pub parts: Vec<FormPart<P>>,
}

impl<P: Clone> OperationRequest<P> {
    /// Build the request for `operation` from the staged files and the
    /// current control values.
    pub fn assemble(
        operation: Operation,
        collection: &FileCollection<P>,
        fields: &dyn FieldSource,
    ) -> Result<Self, ValidationError> {
        let first = collection.first().ok_or(ValidationError::NoFiles)?;
        let schema = operation.schema();
        let mut parts = Vec::with_capacity(schema.fields.len() + collection.len());
        let mut blank: Vec<&'static str> = Vec::new();

        for spec in schema.fields {
            let value = fields.read(spec.control, spec.kind);
            let is_blank = value.as_ref().map(FieldValue::is_blank).unwrap_or(true);

            if is_blank {
                if spec.required {
                    return Err(ValidationError::MissingField(spec.name.to_string()));
                }
                blank.push(spec.name);
            }

            let Some(value) = value else {
                continue;
            };

            if let (FieldCheck::PageRanges, FieldValue::Text(text)) = (spec.check, &value) {
                if !is_blank {
                    parse_ranges(text).map_err(|reason| ValidationError::InvalidField {
                        field: spec.name.to_string(),
                        reason,
                    })?;
                }
            }

            parts.push(FormPart {
                name: spec.name,
                value: FormValue::Text(value.into_form_text()),
            });
        }

        if let Some(any_of) = schema.any_of {
            if any_of.fields.iter().all(|name| blank.contains(name)) {
                return Err(ValidationError::MissingOneOf {
                    fields: any_of.fields.iter().map(|s| s.to_string()).collect(),
                    message: any_of.message.to_string(),
                });
            }
        }

        match schema.files {
            FileRule::All(name) => parts.extend(collection.iter().map(|file| FormPart {
                name,
                value: FormValue::File(file.clone()),
            })),
            FileRule::First(name) => parts.push(FormPart {
                name,
                value: FormValue::File(first.clone()),
            }),
        }

        let request = Self { operation, parts };
        debug!(
            operation = %operation,
            fields = ?request.field_names(),
            files = request.files().count(),
            "assembled request"
        );
        Ok(request)
    }
}

impl<P> OperationRequest<P> {
    /// Names of all parts, in order (values are never logged)
    pub fn field_names(&self) -> Vec<&'static str> {
        self.parts.iter().map(|p| p.name).collect()
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|p| match &p.value {
            FormValue::Text(s) if p.name == name => Some(s.as_str()),
            _ => None,
        })
    }

    pub fn files(&self) -> impl Iterator<Item = &SelectedFile<P>> {
        self.parts.iter().filter_map(|p| match &p.value {
            FormValue::File(f) => Some(f),
            FormValue::Text(_) => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::StaticFields;
    use pretty_assertions::assert_eq;

    fn collection(names: &[&str]) -> FileCollection<Vec<u8>> {
        let mut c = FileCollection::default();
        c.accept(
            names
                .iter()
                .map(|n| SelectedFile::from_bytes(*n, "application/pdf", n.as_bytes().to_vec())),
        );
        c
    }

    #[test]
    fn test_empty_collection_fails_first() {
        let c = collection(&[]);
        let err = OperationRequest::assemble(Operation::Merge, &c, &StaticFields::new());
        assert_eq!(err.unwrap_err(), ValidationError::NoFiles);
    }

    #[test]
    fn test_merge_sends_all_files_in_order() {
        let c = collection(&["b.pdf", "a.pdf", "c.pdf"]);
        let req = OperationRequest::assemble(Operation::Merge, &c, &StaticFields::new()).unwrap();

        assert_eq!(req.field_names(), vec!["files[]", "files[]", "files[]"]);
        let names: Vec<_> = req.files().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["b.pdf", "a.pdf", "c.pdf"]);
    }

    #[test]
    fn test_split_sends_first_file_and_ranges() {
        let c = collection(&["one.pdf", "two.pdf"]);
        let fields = StaticFields::new().with("page-ranges", "1-2, 4");
        let req = OperationRequest::assemble(Operation::Split, &c, &fields).unwrap();

        assert_eq!(req.field_names(), vec!["ranges", "file"]);
        assert_eq!(req.text("ranges"), Some("1-2, 4"));
        assert_eq!(req.files().next().unwrap().name, "one.pdf");
    }

    #[test]
    fn test_split_requires_ranges() {
        let c = collection(&["one.pdf"]);
        let fields = StaticFields::new().with("page-ranges", "  ");
        let err = OperationRequest::assemble(Operation::Split, &c, &fields).unwrap_err();
        assert_eq!(err, ValidationError::MissingField("ranges".into()));
    }

    #[test]
    fn test_split_rejects_malformed_ranges() {
        let c = collection(&["one.pdf"]);
        let fields = StaticFields::new().with("page-ranges", "3-1");
        let err = OperationRequest::assemble(Operation::Split, &c, &fields).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidField { ref field, .. } if field == "ranges"));
    }

    #[test]
    fn test_split_with_huge_range_validates_quickly() {
        let c = collection(&["one.pdf"]);
        let fields = StaticFields::new().with("page-ranges", "1-4000000000");

        let started = std::time::Instant::now();
        let req = OperationRequest::assemble(Operation::Split, &c, &fields).unwrap();

        assert!(started.elapsed() < std::time::Duration::from_millis(100));
        assert_eq!(req.text("ranges"), Some("1-4000000000"));
    }

    #[test]
    fn test_watermark_fields_in_schema_order() {
        let c = collection(&["doc.pdf"]);
        let fields = StaticFields::new()
            .with("watermark-text", "DRAFT")
            .with("watermark-position", "center")
            .with("watermark-color", "#ff0000");
        let req = OperationRequest::assemble(Operation::Watermark, &c, &fields).unwrap();

        assert_eq!(req.field_names(), vec!["text", "position", "color", "file"]);
        assert_eq!(req.text("color"), Some("#ff0000"));
    }

    #[test]
    fn test_missing_optional_controls_are_omitted() {
        let c = collection(&["doc.pdf"]);
        let fields = StaticFields::new().with("watermark-text", "DRAFT");
        let req = OperationRequest::assemble(Operation::Watermark, &c, &fields).unwrap();
        assert_eq!(req.field_names(), vec!["text", "file"]);
    }

    #[test]
    fn test_add_text_requires_text() {
        let c = collection(&["doc.pdf"]);
        let fields = StaticFields::new().with("text-x", "10").with("text-y", "20");
        let err = OperationRequest::assemble(Operation::AddText, &c, &fields).unwrap_err();
        assert_eq!(err, ValidationError::MissingField("text".into()));
    }

    #[test]
    fn test_secure_requires_a_password() {
        let c = collection(&["doc.pdf"]);
        let fields = StaticFields::new()
            .with("owner-password", "")
            .with("user-password", "")
            .with("allow-print", "true");
        let err = OperationRequest::assemble(Operation::Secure, &c, &fields).unwrap_err();
        match err {
            ValidationError::MissingOneOf { fields, message } => {
                assert_eq!(fields, vec!["owner_password", "user_password"]);
                assert!(message.contains("password"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_secure_encodes_flags() {
        let c = collection(&["doc.pdf"]);
        let fields = StaticFields::new()
            .with("user-password", "s3cret")
            .with("allow-print", "on");
        let req = OperationRequest::assemble(Operation::Secure, &c, &fields).unwrap();

        assert_eq!(
            req.field_names(),
            vec!["user_password", "allow_print", "allow_copy", "file"]
        );
        assert_eq!(req.text("owner_password"), None);
        assert_eq!(req.text("allow_print"), Some("true"));
        assert_eq!(req.text("allow_copy"), Some("false"));
    }

    #[test]
    fn test_non_merge_operations_send_one_file() {
        let c = collection(&["a.pdf", "b.pdf"]);
        let fields = StaticFields::new()
            .with("page-ranges", "1")
            .with("watermark-text", "x")
            .with("add-text", "x")
            .with("owner-password", "x");
        for op in Operation::ALL {
            let req = OperationRequest::assemble(op, &c, &fields).unwrap();
            let expected = if op == Operation::Merge { 2 } else { 1 };
            assert_eq!(req.files().count(), expected, "{}", op);
        }
    }
}
