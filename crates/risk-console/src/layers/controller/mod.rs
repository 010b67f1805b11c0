use predict_protocol::{
    coerce, FieldName, FieldValue, FormValues, PredictRequest, PredictResponse, PredictionResult,
};
use std::time::Instant;

use crate::layers::transport::{PredictTransport, TransportError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldUpdate {
    Stored,
    Cleared,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum FieldIssue {
    Blank(FieldName),
    BelowMin(FieldName, f64),
}

impl std::fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldIssue::Blank(name) => write!(f, "{name} is required"),
            FieldIssue::BelowMin(name, min) => write!(f, "{name} must be at least {min}"),
        }
    }
}

/// Checks an input surface applies before letting a submission through.
/// The controller itself never refuses to submit.
pub(crate) fn field_issues(values: &FormValues) -> Vec<FieldIssue> {
    let mut issues: Vec<FieldIssue> = values
        .blank_fields()
        .into_iter()
        .map(FieldIssue::Blank)
        .collect();
    issues.extend(
        values
            .below_min_fields()
            .into_iter()
            .filter_map(|name| name.min().map(|min| FieldIssue::BelowMin(name, min))),
    );
    issues
}

/// A dispatched submission: the ticket to report back with and the payload.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Submission {
    pub(crate) ticket: u64,
    pub(crate) request: PredictRequest,
}

/// Owns the form values, the latest prediction and the in-flight state.
///
/// Submitting is split in two halves so the network call can run elsewhere:
/// `begin_submit` on the owning thread, the transport call wherever, then
/// `complete_submit` back on the owning thread.
pub(crate) struct FormController {
    values: FormValues,
    result: Option<PredictionResult>,
    outstanding: usize,
    next_ticket: u64,
    oldest_accepted: u64,
    fence_responses: bool,
}

impl FormController {
    pub(crate) fn new(fence_responses: bool) -> Self {
        Self {
            values: FormValues::INITIAL,
            result: None,
            outstanding: 0,
            next_ticket: 1,
            oldest_accepted: 1,
            fence_responses,
        }
    }

    pub(crate) fn values(&self) -> &FormValues {
        &self.values
    }

    pub(crate) fn result(&self) -> Option<&PredictionResult> {
        self.result.as_ref()
    }

    pub(crate) fn is_loading(&self) -> bool {
        self.outstanding > 0
    }

    pub(crate) fn update_field(&mut self, name: FieldName, raw: &str) -> FieldUpdate {
        match coerce(raw) {
            Some(FieldValue::Empty) => {
                self.values.set(name, FieldValue::Empty);
                FieldUpdate::Cleared
            }
            Some(value) => {
                self.values.set(name, value);
                FieldUpdate::Stored
            }
            None => {
                tracing::debug!(field = %name, raw, "rejected non-numeric input");
                FieldUpdate::Rejected
            }
        }
    }

    /// Moves a field by `steps` multiples of its step size.
    pub(crate) fn step_field(&mut self, name: FieldName, steps: i32) -> f64 {
        let step = name.step();
        let current = self.values.get(name).to_wire();
        let scale = (1.0 / step).round();
        let next = ((current + step * f64::from(steps)) * scale).round() / scale;
        self.values.set(name, FieldValue::Number(next));
        next
    }

    pub(crate) fn reset(&mut self) {
        self.values = FormValues::INITIAL;
        self.result = None;
        if self.fence_responses {
            self.oldest_accepted = self.next_ticket;
        }
    }

    pub(crate) fn begin_submit(&mut self) -> Submission {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.outstanding += 1;
        self.result = None;
        Submission {
            ticket,
            request: PredictRequest::from_values(&self.values),
        }
    }

    /// Records the outcome of a submission. Returns whether it was applied.
    pub(crate) fn complete_submit(
        &mut self,
        ticket: u64,
        outcome: Result<PredictResponse, TransportError>,
    ) -> bool {
        self.outstanding = self.outstanding.saturating_sub(1);

        if self.fence_responses && !self.accepts(ticket) {
            tracing::debug!(ticket, latest = self.next_ticket - 1, "dropping stale prediction");
            return false;
        }

        let result = match outcome {
            Ok(response) => PredictionResult::Success(response),
            Err(err) => {
                tracing::warn!(ticket, kind = err.kind(), error = %err, "prediction request failed");
                PredictionResult::server_error()
            }
        };
        self.result = Some(result);
        true
    }

    pub(crate) async fn submit<T>(&mut self, transport: &T) -> Option<&PredictionResult>
    where
        T: PredictTransport + ?Sized,
    {
        let submission = self.begin_submit();
        let started = Instant::now();
        tracing::info!(ticket = submission.ticket, "prediction request dispatched");
        let outcome = transport.predict(&submission.request).await;
        let applied = self.complete_submit(submission.ticket, outcome);
        tracing::info!(
            ticket = submission.ticket,
            elapsed_ms = started.elapsed().as_millis() as u64,
            applied,
            failed = self.result.as_ref().is_some_and(PredictionResult::is_failure),
            "prediction settled"
        );
        self.result.as_ref()
    }

    fn accepts(&self, ticket: u64) -> bool {
        ticket >= self.oldest_accepted && ticket + 1 == self.next_ticket
    }
}
