//! Operation names and their form-field schemas
//!
//! Each operation maps to a static descriptor: which files are sent, and
//! which input controls feed which multipart fields. Request assembly is
//! driven entirely by this table.

use crate::error::ValidationError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A PDF transformation offered by the remote service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Operation {
    Merge,
    Split,
    Watermark,
    ToImages,
    Rotate,
    AddText,
    ExtractText,
    Organize,
    Secure,
}

/// Which files of the collection go into the request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", content = "field", rename_all = "snake_case")]
pub enum FileRule {
    /// Every file, in collection order, under a repeated field name
    All(&'static str),
    /// Only the first file
    First(&'static str),
}

/// Kind of input control a field is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Number,
    Select,
    Password,
    Checkbox,
}

/// Extra syntax check applied client-side before sending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldCheck {
    None,
    PageRanges,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    /// Multipart field name expected by the service
    pub name: &'static str,
    /// Id of the input control the value is read from
    pub control: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub check: FieldCheck,
}

impl FieldSpec {
    const fn optional(name: &'static str, control: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            control,
            kind,
            required: false,
            check: FieldCheck::None,
        }
    }

    const fn required(name: &'static str, control: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            control,
            kind,
            required: true,
            check: FieldCheck::None,
        }
    }

    const fn checked(self, check: FieldCheck) -> Self {
        Self { check, ..self }
    }
}

/// Constraint spanning several optional fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnyOf {
    pub fields: &'static [&'static str],
    pub message: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OperationSchema {
    pub files: FileRule,
    pub fields: &'static [FieldSpec],
    pub any_of: Option<AnyOf>,
}

const FIRST_FILE: FileRule = FileRule::First("file");

static MERGE: OperationSchema = OperationSchema {
    files: FileRule::All("files[]"),
    fields: &[],
    any_of: None,
};

static SPLIT: OperationSchema = OperationSchema {
    files: FIRST_FILE,
    fields: &[FieldSpec::required("ranges", "page-ranges", FieldKind::Text)
        .checked(FieldCheck::PageRanges)],
    any_of: None,
};

static WATERMARK: OperationSchema = OperationSchema {
    files: FIRST_FILE,
    fields: &[
        FieldSpec::required("text", "watermark-text", FieldKind::Text),
        FieldSpec::optional("position", "watermark-position", FieldKind::Select),
        FieldSpec::optional("color", "watermark-color", FieldKind::Text),
    ],
    any_of: None,
};

static TO_IMAGES: OperationSchema = OperationSchema {
    files: FIRST_FILE,
    fields: &[
        FieldSpec::optional("format", "image-format", FieldKind::Select),
        FieldSpec::optional("dpi", "image-dpi", FieldKind::Number),
    ],
    any_of: None,
};

static ROTATE: OperationSchema = OperationSchema {
    files: FIRST_FILE,
    fields: &[
        FieldSpec::optional("angle", "rotation-angle", FieldKind::Select),
        FieldSpec::optional("pages", "rotation-pages", FieldKind::Text),
    ],
    any_of: None,
};

static ADD_TEXT: OperationSchema = OperationSchema {
    files: FIRST_FILE,
    fields: &[
        FieldSpec::required("text", "add-text", FieldKind::Text),
        FieldSpec::optional("x", "text-x", FieldKind::Number),
        FieldSpec::optional("y", "text-y", FieldKind::Number),
        FieldSpec::optional("color", "text-color", FieldKind::Text),
    ],
    any_of: None,
};

static EXTRACT_TEXT: OperationSchema = OperationSchema {
    files: FIRST_FILE,
    fields: &[
        FieldSpec::optional("pages", "extract-pages", FieldKind::Text),
        FieldSpec::optional("format", "extract-format", FieldKind::Select),
    ],
    any_of: None,
};

static ORGANIZE: OperationSchema = OperationSchema {
    files: FIRST_FILE,
    fields: &[FieldSpec::optional("layout", "page-layout", FieldKind::Select)],
    any_of: None,
};

static SECURE: OperationSchema = OperationSchema {
    files: FIRST_FILE,
    fields: &[
        FieldSpec::optional("owner_password", "owner-password", FieldKind::Password),
        FieldSpec::optional("user_password", "user-password", FieldKind::Password),
        FieldSpec::optional("allow_print", "allow-print", FieldKind::Checkbox),
        FieldSpec::optional("allow_copy", "allow-copy", FieldKind::Checkbox),
    ],
    any_of: Some(AnyOf {
        fields: &["owner_password", "user_password"],
        message: "Please enter at least one password (owner or user password is required)",
    }),
};

impl Operation {
    pub const ALL: [Operation; 9] = [
        Operation::Merge,
        Operation::Split,
        Operation::Watermark,
        Operation::ToImages,
        Operation::Rotate,
        Operation::AddText,
        Operation::ExtractText,
        Operation::Organize,
        Operation::Secure,
    ];

    /// Name used in the endpoint path
    pub fn name(self) -> &'static str {
        match self {
            Operation::Merge => "merge",
            Operation::Split => "split",
            Operation::Watermark => "watermark",
            Operation::ToImages => "toImages",
            Operation::Rotate => "rotate",
            Operation::AddText => "addText",
            Operation::ExtractText => "extractText",
            Operation::Organize => "organize",
            Operation::Secure => "secure",
        }
    }

    pub fn schema(self) -> &'static OperationSchema {
        match self {
            Operation::Merge => &MERGE,
            Operation::Split => &SPLIT,
            Operation::Watermark => &WATERMARK,
            Operation::ToImages => &TO_IMAGES,
            Operation::Rotate => &ROTATE,
            Operation::AddText => &ADD_TEXT,
            Operation::ExtractText => &EXTRACT_TEXT,
            Operation::Organize => &ORGANIZE,
            Operation::Secure => &SECURE,
        }
    }

    /// `{base}/pdf/{name}`; an empty base yields a same-origin relative path
    pub fn endpoint(self, base: &str) -> String {
        format!("{}/pdf/{}", base.trim_end_matches('/'), self.name())
    }

    /// True when file order changes the output
    pub fn is_order_sensitive(self) -> bool {
        matches!(self.schema().files, FileRule::All(_))
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .iter()
            .copied()
            .find(|op| op.name() == s)
            .ok_or_else(|| ValidationError::UnknownOperation(s.to_string()))
    }
}
