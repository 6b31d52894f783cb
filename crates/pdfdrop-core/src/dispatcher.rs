//! Submission state machine
//!
//! `Idle → Validating → Sending → AwaitingResponse → {Completed | Failed} → Idle`
//!
//! The phases are exposed separately (`prepare`, `mark_sent`, `complete`)
//! for callers that cannot hold a borrow across the network await.
//! `submit` runs all of them against a [`Transport`].

use crate::collection::FileCollection;
use crate::error::{OperationError, TransportError};
use crate::fields::FieldSource;
use crate::operation::Operation;
use crate::request::OperationRequest;
use crate::response::{interpret, OperationOutcome, RawResponse};
use crate::transport::Transport;
use serde::Serialize;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SubmissionState {
    Idle,
    Validating,
    Sending,
    AwaitingResponse,
    Completed,
    Failed,
}

/// A validated request plus the URL it goes to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedSubmission<P> {
    pub endpoint: String,
    pub request: OperationRequest<P>,
}

#[derive(Debug, Clone)]
pub struct Dispatcher {
    endpoint_base: String,
    state: SubmissionState,
    in_flight: Option<Operation>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new("")
    }
}

impl Dispatcher {
    pub fn new(endpoint_base: impl Into<String>) -> Self {
        Self {
            endpoint_base: endpoint_base.into(),
            state: SubmissionState::Idle,
            in_flight: None,
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub fn in_flight(&self) -> Option<Operation> {
        self.in_flight
    }

    pub fn endpoint_base(&self) -> &str {
        &self.endpoint_base
    }

    /// Validate and assemble. On success the dispatcher is `Sending`;
    /// on failure it is back to `Idle` and nothing was sent.
    pub fn prepare<P: Clone>(
        &mut self,
        operation: Operation,
        collection: &FileCollection<P>,
        fields: &dyn FieldSource,
    ) -> Result<PreparedSubmission<P>, OperationError> {
        if self.state != SubmissionState::Idle {
            warn!(
                requested = %operation,
                in_flight = ?self.in_flight,
                "submission rejected while busy"
            );
            return Err(OperationError::Busy);
        }

        self.in_flight = Some(operation);
        self.transition(SubmissionState::Validating);

        match OperationRequest::assemble(operation, collection, fields) {
            Ok(request) => {
                self.transition(SubmissionState::Sending);
                Ok(PreparedSubmission {
                    endpoint: operation.endpoint(&self.endpoint_base),
                    request,
                })
            }
            Err(err) => {
                debug!(%operation, error = %err, "validation failed");
                self.finish(SubmissionState::Failed);
                Err(err.into())
            }
        }
    }

    /// Record that the request left; the response is now awaited
    pub fn mark_sent(&mut self) {
        if self.state == SubmissionState::Sending {
            self.transition(SubmissionState::AwaitingResponse);
        }
    }

    /// Interpret the transport result. Success clears `collection`;
    /// failure leaves it untouched. Returns to `Idle` either way.
    pub fn complete<P>(
        &mut self,
        response: Result<RawResponse, TransportError>,
        collection: &mut FileCollection<P>,
    ) -> Result<OperationOutcome, OperationError> {
        self.complete_with(response, collection, |_| Ok(()))
    }

    /// Like [`complete`](Self::complete), but `deliver` must also accept
    /// the outcome before the submission counts as a success. A delivery
    /// error is a failure: `collection` is kept for a retry.
    pub fn complete_with<P, D>(
        &mut self,
        response: Result<RawResponse, TransportError>,
        collection: &mut FileCollection<P>,
        deliver: D,
    ) -> Result<OperationOutcome, OperationError>
    where
        D: FnOnce(&OperationOutcome) -> Result<(), OperationError>,
    {
        self.mark_sent();
        let operation = self.in_flight;

        let result = response
            .map_err(OperationError::from)
            .and_then(interpret)
            .and_then(|outcome| deliver(&outcome).map(|()| outcome));

        match &result {
            Ok(outcome) => {
                info!(
                    operation = ?operation,
                    filename = %outcome.artifact().filename,
                    bytes = outcome.artifact().bytes.len(),
                    "operation completed"
                );
                collection.reset();
                self.finish(SubmissionState::Completed);
            }
            Err(err) => {
                warn!(operation = ?operation, error = %err, "operation failed");
                self.finish(SubmissionState::Failed);
            }
        }

        result
    }

    /// Run a whole submission through `transport`
    pub async fn submit<P, T>(
        &mut self,
        transport: &T,
        operation: Operation,
        collection: &mut FileCollection<P>,
        fields: &dyn FieldSource,
    ) -> Result<OperationOutcome, OperationError>
    where
        P: Clone,
        T: Transport<P> + ?Sized,
    {
        let prepared = self.prepare(operation, collection, fields)?;
        self.mark_sent();
        let response = transport.send(&prepared.endpoint, &prepared.request).await;
        self.complete(response, collection)
    }

    fn finish(&mut self, terminal: SubmissionState) {
        self.transition(terminal);
        self.in_flight = None;
        self.transition(SubmissionState::Idle);
    }

    fn transition(&mut self, to: SubmissionState) {
        debug!(from = ?self.state, to = ?to, "submission state");
        self.state = to;
    }
}
