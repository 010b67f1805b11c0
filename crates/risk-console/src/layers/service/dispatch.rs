use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

use crate::layers::controller::Submission;
use crate::layers::service::events::{ServiceCommand, UiEvent};
use crate::layers::transport::PredictTransport;

pub(crate) fn spawn_prediction_service(
    transport: Arc<dyn PredictTransport>,
    cmd_rx: mpsc::Receiver<ServiceCommand>,
    event_tx: mpsc::Sender<UiEvent>,
) {
    tokio::spawn(async move {
        service_loop(transport, cmd_rx, event_tx).await;
    });
}

async fn service_loop(
    transport: Arc<dyn PredictTransport>,
    mut cmd_rx: mpsc::Receiver<ServiceCommand>,
    event_tx: mpsc::Sender<UiEvent>,
) {
    while let Some(command) = cmd_rx.recv().await {
        match command {
            ServiceCommand::Submit(submission) => {
                dispatch_submission(Arc::clone(&transport), submission, event_tx.clone());
            }
        }
    }
    tracing::debug!("prediction service stopped");
}

// Each submission runs on its own task; overlapping submissions are not
// queued behind one another.
fn dispatch_submission(
    transport: Arc<dyn PredictTransport>,
    submission: Submission,
    event_tx: mpsc::Sender<UiEvent>,
) {
    tokio::spawn(async move {
        let ticket = submission.ticket;
        let started = Instant::now();
        tracing::info!(ticket, "prediction request dispatched");
        let outcome = transport.predict(&submission.request).await;
        let elapsed = started.elapsed();
        match &outcome {
            Ok(response) => tracing::info!(
                ticket,
                elapsed_ms = elapsed.as_millis() as u64,
                label = response.label.as_deref().unwrap_or("-"),
                probability = ?response.probability,
                "prediction settled"
            ),
            Err(err) => tracing::info!(
                ticket,
                elapsed_ms = elapsed.as_millis() as u64,
                kind = err.kind(),
                "prediction settled with transport error"
            ),
        }
        let event = UiEvent::PredictionSettled {
            ticket,
            outcome,
            elapsed,
        };
        if event_tx.send(event).await.is_err() {
            tracing::debug!(ticket, "ui loop gone, dropping prediction");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::controller::FormController;
    use crate::layers::transport::TransportError;
    use async_trait::async_trait;
    use predict_protocol::{PredictRequest, PredictResponse};

    struct FixedTransport;

    #[async_trait]
    impl PredictTransport for FixedTransport {
        async fn predict(
            &self,
            request: &PredictRequest,
        ) -> Result<PredictResponse, TransportError> {
            if request.glucose > 0.0 {
                Ok(PredictResponse {
                    label: Some("Non-Diabetic".to_string()),
                    probability: Some(0.2),
                    ..PredictResponse::default()
                })
            } else {
                Err(TransportError::Connect("refused".to_string()))
            }
        }
    }

    #[tokio::test]
    async fn settles_each_submission_once() {
        let (cmd_tx, cmd_rx) = mpsc::channel(8);
        let (event_tx, mut event_rx) = mpsc::channel(8);
        spawn_prediction_service(Arc::new(FixedTransport), cmd_rx, event_tx);

        let mut controller = FormController::new(false);
        controller.update_field(predict_protocol::FieldName::Glucose, "140");
        let submission = controller.begin_submit();
        cmd_tx
            .send(ServiceCommand::Submit(submission.clone()))
            .await
            .expect("send");

        let UiEvent::PredictionSettled { ticket, outcome, .. } =
            event_rx.recv().await.expect("event");
        assert_eq!(ticket, submission.ticket);
        assert!(controller.complete_submit(ticket, outcome));
        assert!(!controller.is_loading());
        assert!(matches!(
            controller.result(),
            Some(predict_protocol::PredictionResult::Success(_))
        ));
    }

    #[tokio::test]
    async fn transport_errors_are_forwarded() {
        let (cmd_tx, cmd_rx) = mpsc::channel(8);
        let (event_tx, mut event_rx) = mpsc::channel(8);
        spawn_prediction_service(Arc::new(FixedTransport), cmd_rx, event_tx);

        let mut controller = FormController::new(false);
        let submission = controller.begin_submit();
        cmd_tx
            .send(ServiceCommand::Submit(submission))
            .await
            .expect("send");
        let UiEvent::PredictionSettled { outcome, .. } = event_rx.recv().await.expect("event");
        assert_eq!(outcome.unwrap_err().kind(), "connect");
    }
}
