//! The abstract UI a widget drives
//!
//! A real DOM, a terminal, or a test recorder can stand behind it.

use crate::file::FileSummary;
use crate::response::Artifact;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// Transient, dismissible message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    /// Auto-dismiss delay
    pub timeout_ms: u32,
}

pub trait UiSurface {
    /// Replace the rendered file list with `files`
    fn render_files(&mut self, files: &[FileSummary]);

    fn show_notice(&mut self, notice: Notice);

    /// 0 hides the indicator
    fn set_progress(&mut self, percent: u8);

    /// Start a download of `artifact`; `Err` carries a user-facing message
    fn offer_download(&mut self, artifact: &Artifact) -> Result<(), String>;

    /// Structured results, for surfaces that can display them
    fn display_json(&mut self, _value: &Value) {}

    /// Back to the initial state: clear pickers and release held resources
    fn reset_inputs(&mut self);
}

/// Everything a [`RecordingSurface`] observed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    Render(Vec<FileSummary>),
    Notice(Notice),
    Progress(u8),
    Download(Artifact),
    Json(String),
    Reset,
}

/// Surface that records calls, for tests and headless use
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub events: Vec<SurfaceEvent>,
    /// When set, downloads fail with this message
    pub download_error: Option<String>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<&Notice> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SurfaceEvent::Notice(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    pub fn downloads(&self) -> Vec<&Artifact> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SurfaceEvent::Download(a) => Some(a),
                _ => None,
            })
            .collect()
    }

    pub fn progress(&self) -> Vec<u8> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SurfaceEvent::Progress(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    /// The most recent rendered list
    pub fn last_render(&self) -> Option<&[FileSummary]> {
        self.events.iter().rev().find_map(|e| match e {
            SurfaceEvent::Render(files) => Some(files.as_slice()),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl UiSurface for RecordingSurface {
    fn render_files(&mut self, files: &[FileSummary]) {
        self.events.push(SurfaceEvent::Render(files.to_vec()));
    }

    fn show_notice(&mut self, notice: Notice) {
        self.events.push(SurfaceEvent::Notice(notice));
    }

    fn set_progress(&mut self, percent: u8) {
        self.events.push(SurfaceEvent::Progress(percent));
    }

    fn offer_download(&mut self, artifact: &Artifact) -> Result<(), String> {
        if let Some(message) = &self.download_error {
            return Err(message.clone());
        }
        self.events.push(SurfaceEvent::Download(artifact.clone()));
        Ok(())
    }

    fn display_json(&mut self, value: &Value) {
        self.events.push(SurfaceEvent::Json(value.to_string()));
    }

    fn reset_inputs(&mut self) {
        self.events.push(SurfaceEvent::Reset);
    }
}
