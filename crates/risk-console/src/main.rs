mod cli;
mod config;
mod layers;

use crate::cli::Args;
use crate::config::{load_config, validate_config, ClientConfig};
use crate::layers::controller::FieldUpdate;
use crate::layers::service::events::{ServiceCommand, UiEvent};
use crate::layers::service::{init_tracing, run_headless, spawn_prediction_service};
use crate::layers::transport::{HttpTransport, PredictTransport};
use crate::layers::ui::{draw_ui, handle_key_event, restore_terminal, setup_terminal, AppState, Tui};
use anyhow::Context;
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use predict_protocol::FieldName;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    let _log_guard = init_tracing(&args.log_dir, args.log_to_stderr)?;

    let mut config = load_config(&args.config)?;
    args.apply_overrides(&mut config);
    validate_config(&config)
        .with_context(|| format!("invalid config {}", args.config.display()))?;

    let transport = HttpTransport::new(&config.endpoint).context("failed to build http client")?;
    info!(
        endpoint = %transport.url(),
        headless = args.headless,
        fence_responses = config.form.fence_responses,
        "risk console starting"
    );

    if args.headless {
        return run_headless(&transport, &args.fields, &config).await;
    }

    run_tui(Arc::new(transport), &config, &args.fields)?;
    info!("risk console exiting");
    Ok(ExitCode::SUCCESS)
}

fn run_tui(
    transport: Arc<dyn PredictTransport>,
    config: &ClientConfig,
    fields: &[(FieldName, String)],
) -> anyhow::Result<()> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<ServiceCommand>(32);
    let (ui_tx, mut ui_rx) = mpsc::channel::<UiEvent>(128);
    spawn_prediction_service(transport, cmd_rx, ui_tx);

    let mut app = AppState::new(config);
    for (name, raw) in fields {
        if app.prefill(*name, raw) == FieldUpdate::Rejected {
            anyhow::bail!("{name} expects a number, got `{raw}`");
        }
    }

    let mut terminal = setup_terminal().context("failed to set up terminal")?;
    let tick_rate = Duration::from_millis(config.ui.tick_ms);
    let outcome = event_loop(&mut terminal, &mut app, &cmd_tx, &mut ui_rx, tick_rate);
    restore_terminal(&mut terminal)?;
    outcome
}

fn event_loop(
    terminal: &mut Tui,
    app: &mut AppState,
    cmd_tx: &mpsc::Sender<ServiceCommand>,
    ui_rx: &mut mpsc::Receiver<UiEvent>,
    tick_rate: Duration,
) -> anyhow::Result<()> {
    loop {
        while let Ok(event) = ui_rx.try_recv() {
            app.handle_event(event);
        }

        terminal.draw(|frame| draw_ui(frame, app))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handle_key_event(key, app, cmd_tx) {
                    break;
                }
            }
        }
        app.on_tick();
    }
    Ok(())
}
