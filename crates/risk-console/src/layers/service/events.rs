use predict_protocol::PredictResponse;
use std::time::Duration;

use crate::layers::controller::Submission;
use crate::layers::transport::TransportError;

/// Requests from the input layer to the prediction service.
pub(crate) enum ServiceCommand {
    Submit(Submission),
}

/// Notifications from the prediction service back to the UI loop.
pub(crate) enum UiEvent {
    PredictionSettled {
        ticket: u64,
        outcome: Result<PredictResponse, TransportError>,
        elapsed: Duration,
    },
}
