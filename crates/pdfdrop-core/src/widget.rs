//! Composition root: one collection, one dispatcher, one surface
//!
//! UI events arrive as method calls; every mutation is reflected on the
//! surface. Errors and successes are transient notices, and successful
//! results are always offered as a download.

use crate::collection::{AcceptReport, FileCollection};
use crate::config::WidgetConfig;
use crate::dispatcher::{Dispatcher, PreparedSubmission, SubmissionState};
use crate::error::{CollectionError, OperationError, TransportError};
use crate::fields::FieldSource;
use crate::file::SelectedFile;
use crate::operation::Operation;
use crate::response::{OperationOutcome, RawResponse};
use crate::surface::{Notice, NoticeLevel, UiSurface};
use crate::transport::Transport;

/// Progress milestones reported during a submission
pub mod progress {
    pub const START: u8 = 0;
    pub const REQUEST_BUILT: u8 = 20;
    pub const RESPONSE_RECEIVED: u8 = 80;
    pub const ARTIFACT_READY: u8 = 90;
    pub const DONE: u8 = 100;
}

pub struct Widget<P, S, F> {
    collection: FileCollection<P>,
    dispatcher: Dispatcher,
    surface: S,
    fields: F,
    config: WidgetConfig,
}

impl<P, S, F> Widget<P, S, F>
where
    P: Clone,
    S: UiSurface,
    F: FieldSource,
{
    pub fn new(config: WidgetConfig, surface: S, fields: F) -> Self {
        Self {
            collection: FileCollection::new(config.policy()),
            dispatcher: Dispatcher::new(config.endpoint_base.clone()),
            surface,
            fields,
            config,
        }
    }

    /// Drop or picker event
    pub fn handle_files<I>(&mut self, candidates: I) -> AcceptReport
    where
        I: IntoIterator<Item = SelectedFile<P>>,
    {
        let report = self.collection.accept(candidates);

        for rejection in &report.rejected {
            self.notify(
                NoticeLevel::Error,
                format!("File {} is not valid: {}", rejection.name, rejection.reason),
            );
        }

        if !report.accepted.is_empty() {
            self.render();
        }
        report
    }

    pub fn remove_file(&mut self, index: usize) -> Result<(), CollectionError> {
        self.collection.remove(index)?;
        if self.collection.is_empty() {
            self.reset();
        } else {
            self.render();
        }
        Ok(())
    }

    pub fn reorder_files(&mut self, new_order: &[usize]) -> Result<(), CollectionError> {
        self.collection.reorder(new_order)?;
        self.render();
        Ok(())
    }

    pub fn move_file(&mut self, from: usize, to: usize) -> Result<(), CollectionError> {
        self.collection.move_file(from, to)?;
        self.render();
        Ok(())
    }

    /// Clear the collection and put the surface back in its initial state
    pub fn reset(&mut self) {
        self.collection.reset();
        self.surface.reset_inputs();
        self.surface.set_progress(progress::START);
        self.render();
    }

    /// First half of a submission: validate and assemble.
    ///
    /// Failures are reported on the surface before being returned.
    pub fn prepare_submission(
        &mut self,
        operation_name: &str,
    ) -> Result<PreparedSubmission<P>, OperationError> {
        let result = operation_name
            .parse::<Operation>()
            .map_err(OperationError::from)
            .and_then(|operation| {
                self.dispatcher
                    .prepare(operation, &self.collection, &self.fields)
            });

        match result {
            Ok(prepared) => {
                self.surface.set_progress(progress::REQUEST_BUILT);
                self.dispatcher.mark_sent();
                Ok(prepared)
            }
            Err(err) => {
                self.report_error(&err);
                Err(err)
            }
        }
    }

    /// Second half: interpret the transport result, download, clean up
    pub fn finish_submission(
        &mut self,
        response: Result<RawResponse, TransportError>,
    ) -> Result<OperationOutcome, OperationError> {
        if response.is_ok() {
            self.surface.set_progress(progress::RESPONSE_RECEIVED);
        }

        let surface = &mut self.surface;
        let result = self
            .dispatcher
            .complete_with(response, &mut self.collection, |outcome| {
                surface.set_progress(progress::ARTIFACT_READY);
                if let OperationOutcome::Json { value, .. } = outcome {
                    surface.display_json(value);
                }
                surface
                    .offer_download(outcome.artifact())
                    .map_err(OperationError::Delivery)
            });

        match result {
            Ok(outcome) => {
                self.surface.set_progress(progress::DONE);
                self.notify(
                    NoticeLevel::Success,
                    format!("Done: {}", outcome.artifact().filename),
                );
                self.render();
                Ok(outcome)
            }
            Err(err) => {
                self.report_error(&err);
                Err(err)
            }
        }
    }

    /// Whole submission through `transport`
    pub async fn submit<T>(
        &mut self,
        transport: &T,
        operation_name: &str,
    ) -> Result<OperationOutcome, OperationError>
    where
        T: Transport<P> + ?Sized,
    {
        let prepared = self.prepare_submission(operation_name)?;
        let response = transport.send(&prepared.endpoint, &prepared.request).await;
        self.finish_submission(response)
    }

    pub fn collection(&self) -> &FileCollection<P> {
        &self.collection
    }

    pub fn state(&self) -> SubmissionState {
        self.dispatcher.state()
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn fields(&self) -> &F {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut F {
        &mut self.fields
    }

    fn render(&mut self) {
        let summaries = self.collection.summaries();
        self.surface.render_files(&summaries);
    }

    fn report_error(&mut self, err: &OperationError) {
        // a busy rejection leaves the in-flight submission's progress alone
        if !matches!(err, OperationError::Busy) {
            self.surface.set_progress(progress::START);
        }
        self.notify(NoticeLevel::Error, err.to_string());
    }

    fn notify(&mut self, level: NoticeLevel, message: String) {
        self.surface.show_notice(Notice {
            level,
            message,
            timeout_ms: self.config.notice_timeout_ms,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::StaticFields;
    use crate::surface::{RecordingSurface, SurfaceEvent};

    type TestWidget = Widget<Vec<u8>, RecordingSurface, StaticFields>;

    fn widget() -> TestWidget {
        Widget::new(
            WidgetConfig::default(),
            RecordingSurface::new(),
            StaticFields::new(),
        )
    }

    fn pdf(name: &str) -> SelectedFile<Vec<u8>> {
        SelectedFile::from_bytes(name, "application/pdf", b"%PDF-1.7".to_vec())
    }

    #[test]
    fn test_rejections_become_error_notices() {
        let mut w = widget();
        w.handle_files(vec![SelectedFile::from_bytes("a.png", "image/png", vec![1])]);

        let notices = w.surface().notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert!(notices[0].message.starts_with("File a.png is not valid"));
        assert_eq!(notices[0].timeout_ms, 5000);
        assert!(w.collection().is_empty());
    }

    #[test]
    fn test_removing_last_file_resets_surface() {
        let mut w = widget();
        w.handle_files(vec![pdf("only.pdf")]);
        w.surface_mut().clear();

        w.remove_file(0).unwrap();

        assert!(w.surface().events.contains(&SurfaceEvent::Reset));
        assert_eq!(w.surface().last_render(), Some(&[][..]));
    }

    #[test]
    fn test_unknown_operation_is_reported() {
        let mut w = widget();
        w.handle_files(vec![pdf("a.pdf")]);
        let err = w.prepare_submission("compress").unwrap_err();

        assert!(err.is_validation());
        assert_eq!(w.state(), SubmissionState::Idle);
        assert!(w.surface().notices().last().unwrap().message.contains("compress"));
    }

    #[test]
    fn test_prepare_then_finish() {
        let mut w = widget();
        w.handle_files(vec![pdf("a.pdf"), pdf("b.pdf")]);

        let prepared = w.prepare_submission("merge").unwrap();
        assert_eq!(prepared.endpoint, "/pdf/merge");
        assert_eq!(w.state(), SubmissionState::AwaitingResponse);

        let outcome = w
            .finish_submission(Ok(RawResponse {
                status: 200,
                content_type: Some("application/pdf".into()),
                content_disposition: Some("attachment; filename=merged.pdf".into()),
                body: b"%PDF-1.7".to_vec(),
            }))
            .unwrap();

        assert_eq!(outcome.artifact().filename, "merged.pdf");
        assert!(w.collection().is_empty());
        assert_eq!(w.surface().downloads().len(), 1);
        assert_eq!(
            w.surface().progress(),
            vec![
                progress::REQUEST_BUILT,
                progress::RESPONSE_RECEIVED,
                progress::ARTIFACT_READY,
                progress::DONE
            ]
        );
    }

    #[test]
    fn test_busy_rejection_keeps_progress() {
        let mut w = widget();
        w.handle_files(vec![pdf("a.pdf")]);
        w.prepare_submission("merge").unwrap();
        w.surface_mut().clear();

        let err = w.prepare_submission("merge").unwrap_err();

        assert_eq!(err, OperationError::Busy);
        assert!(w.surface().progress().is_empty());
        assert_eq!(w.surface().notices().len(), 1);
        assert_eq!(w.state(), SubmissionState::AwaitingResponse);
    }

    #[test]
    fn test_failed_download_is_not_reported_as_done() {
        let mut w = widget();
        w.handle_files(vec![pdf("a.pdf"), pdf("b.pdf")]);
        w.surface_mut().download_error = Some("Failed to write merged.pdf".into());
        w.prepare_submission("merge").unwrap();

        let err = w
            .finish_submission(Ok(RawResponse {
                status: 200,
                content_type: Some("application/pdf".into()),
                content_disposition: Some("attachment; filename=merged.pdf".into()),
                body: b"%PDF-1.7".to_vec(),
            }))
            .unwrap_err();

        assert_eq!(err, OperationError::Delivery("Failed to write merged.pdf".into()));
        assert_eq!(w.collection().len(), 2);
        assert_eq!(w.state(), SubmissionState::Idle);
        assert!(w.surface().downloads().is_empty());

        let notices = w.surface().notices();
        assert!(notices.iter().all(|n| n.level != NoticeLevel::Success));
        assert_eq!(notices.last().unwrap().message, "Failed to write merged.pdf");
        assert_eq!(w.surface().progress().last(), Some(&progress::START));
    }
}
