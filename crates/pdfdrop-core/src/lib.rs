//! Client-side front end for a remote PDF processing service
//!
//! Files are staged in a [`FileCollection`], validated against an
//! [`AcceptPolicy`], and submitted for one of nine [`Operation`]s as a
//! multipart request. The response is turned into a downloadable
//! [`Artifact`].
//!
//! Platform specifics sit behind three traits:
//! - [`FieldSource`]: reads the operation's form controls
//! - [`Transport`]: sends the request
//! - [`UiSurface`]: renders the list, notices, progress and downloads
//!
//! [`Widget`] ties them together.

pub mod collection;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod fields;
pub mod file;
pub mod operation;
pub mod policy;
pub mod ranges;
pub mod request;
pub mod response;
pub mod surface;
pub mod transport;
pub mod widget;

pub use collection::{AcceptReport, FileCollection, Rejection};
pub use config::WidgetConfig;
pub use dispatcher::{Dispatcher, PreparedSubmission, SubmissionState};
pub use error::{
    CollectionError, ConfigError, OperationError, TransportError, ValidationError,
};
pub use fields::{FieldSource, FieldValue, StaticFields};
pub use file::{format_bytes, FileSummary, SelectedFile};
pub use operation::{FieldKind, FileRule, Operation, OperationSchema};
pub use policy::{AcceptPolicy, RejectReason, DEFAULT_MAX_FILE_SIZE};
pub use ranges::{page_count, parse_ranges};
pub use request::{FormPart, FormValue, OperationRequest};
pub use response::{derive_filename, interpret, Artifact, OperationOutcome, RawResponse};
pub use surface::{Notice, NoticeLevel, RecordingSurface, SurfaceEvent, UiSurface};
pub use transport::Transport;
pub use widget::Widget;
