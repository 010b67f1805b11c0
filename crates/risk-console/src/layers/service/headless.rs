use predict_protocol::FieldName;
use std::process::ExitCode;

use crate::config::ClientConfig;
use crate::layers::controller::{field_issues, FieldUpdate, FormController};
use crate::layers::display::{derive_display, ResultDisplay};
use crate::layers::transport::PredictTransport;

/// Fills the form from `fields`, submits once and prints the result.
pub(crate) async fn run_headless(
    transport: &dyn PredictTransport,
    fields: &[(FieldName, String)],
    config: &ClientConfig,
) -> anyhow::Result<ExitCode> {
    let report = headless_report(transport, fields, config).await?;
    for line in &report.lines {
        println!("{line}");
    }
    Ok(if report.failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

struct HeadlessReport {
    lines: Vec<String>,
    failed: bool,
}

async fn headless_report(
    transport: &dyn PredictTransport,
    fields: &[(FieldName, String)],
    config: &ClientConfig,
) -> anyhow::Result<HeadlessReport> {
    let mut controller = FormController::new(config.form.fence_responses);
    for (name, raw) in fields {
        if controller.update_field(*name, raw) == FieldUpdate::Rejected {
            anyhow::bail!("{name} expects a number, got `{raw}`");
        }
    }
    if config.form.require_all_fields {
        let issues = field_issues(controller.values());
        if !issues.is_empty() {
            let joined = issues
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            anyhow::bail!("form is incomplete: {joined}");
        }
    }

    let display = derive_display(controller.submit(transport).await);
    let Some(display) = display else {
        anyhow::bail!("prediction finished without a result");
    };
    let failed = matches!(display, ResultDisplay::Error(_));
    Ok(HeadlessReport {
        lines: display.summary_lines(&config.ui.model_name),
        failed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::transport::stub::{closed_port, spawn_stub};
    use crate::layers::transport::HttpTransport;
    use axum::http::StatusCode;
    use serde_json::json;

    fn config_for(port: u16) -> ClientConfig {
        let mut config = ClientConfig::default();
        config.endpoint.host = "127.0.0.1".to_string();
        config.endpoint.port = port;
        config
    }

    fn sample_fields() -> Vec<(FieldName, String)> {
        [
            (FieldName::Pregnancies, "2"),
            (FieldName::Glucose, "120"),
            (FieldName::BloodPressure, "70"),
            (FieldName::SkinThickness, "25"),
            (FieldName::Insulin, "125"),
            (FieldName::Bmi, "30.1"),
            (FieldName::DiabetesPedigreeFunction, "0.45"),
            (FieldName::Age, "29"),
        ]
        .into_iter()
        .map(|(name, raw)| (name, raw.to_string()))
        .collect()
    }

    #[tokio::test]
    async fn borderline_reply_renders_medium() {
        let stub = spawn_stub(
            StatusCode::OK,
            r#"{"label":"Borderline","probability":0.5,"prediction":1}"#,
        )
        .await;
        let config = config_for(stub.port);
        let transport = HttpTransport::new(&config.endpoint).expect("transport");

        let report = headless_report(&transport, &sample_fields(), &config)
            .await
            .expect("report");
        assert!(!report.failed);
        assert_eq!(report.lines[0], "severity: MID (medium, yellow)");
        assert!(report.lines.contains(&"probability: 0.500".to_string()));
        assert!(report.lines.contains(&"raw prediction: 1".to_string()));

        let requests = stub.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0],
            json!({
                "Pregnancies": 2.0,
                "Glucose": 120.0,
                "BloodPressure": 70.0,
                "SkinThickness": 25.0,
                "Insulin": 125.0,
                "BMI": 30.1,
                "DiabetesPedigreeFunction": 0.45,
                "Age": 29.0,
            })
        );
    }

    #[tokio::test]
    async fn unreachable_backend_reports_server_error() {
        let config = config_for(closed_port().await);
        let transport = HttpTransport::new(&config.endpoint).expect("transport");
        let report = headless_report(&transport, &sample_fields(), &config)
            .await
            .expect("report");
        assert!(report.failed);
        assert_eq!(report.lines, vec!["error: Server error. Check backend."]);
    }

    #[tokio::test]
    async fn blank_field_blocks_submission() {
        let stub = spawn_stub(StatusCode::OK, "{}").await;
        let config = config_for(stub.port);
        let transport = HttpTransport::new(&config.endpoint).expect("transport");
        let fields = vec![(FieldName::Insulin, String::new())];

        let err = headless_report(&transport, &fields, &config)
            .await
            .err()
            .expect("incomplete form");
        assert!(err.to_string().contains("Insulin is required"));
        assert!(stub.requests().is_empty());
    }

    #[tokio::test]
    async fn non_numeric_field_is_refused() {
        let config = config_for(closed_port().await);
        let transport = HttpTransport::new(&config.endpoint).expect("transport");
        let fields = vec![(FieldName::Glucose, "high".to_string())];
        assert!(headless_report(&transport, &fields, &config).await.is_err());
    }
}
