use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;

use crate::layers::service::events::ServiceCommand;
use crate::layers::transport::TransportError;

use super::app::AppState;

/// Applies one key press. Returns `true` when the app should exit.
pub(crate) fn handle_key_event(
    key: KeyEvent,
    app: &mut AppState,
    cmd_tx: &mpsc::Sender<ServiceCommand>,
) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        return true;
    }

    if app.confirm_quit {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => return true,
            KeyCode::Esc => {
                app.confirm_quit = false;
                return false;
            }
            _ => {
                app.confirm_quit = false;
            }
        }
    }

    match key.code {
        KeyCode::Char('r') if ctrl => app.reset(),
        KeyCode::Char('u') if ctrl => app.clear_focused(),
        KeyCode::Char('q') | KeyCode::Char('Q') => app.confirm_quit = true,
        KeyCode::Tab | KeyCode::Down => app.focus_next(),
        KeyCode::BackTab | KeyCode::Up => app.focus_prev(),
        KeyCode::Right => app.step_focused(1),
        KeyCode::Left => app.step_focused(-1),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Esc => app.notice = None,
        KeyCode::Enter => submit(app, cmd_tx),
        KeyCode::Char(ch) if is_numeric_char(ch) => app.push_char(ch),
        _ => {}
    }
    false
}

fn is_numeric_char(ch: char) -> bool {
    ch.is_ascii_digit() || matches!(ch, '.' | '-' | '+' | 'e' | 'E')
}

fn submit(app: &mut AppState, cmd_tx: &mpsc::Sender<ServiceCommand>) {
    let Some(submission) = app.try_begin_submit() else {
        return;
    };
    let ticket = submission.ticket;
    if let Err(err) = cmd_tx.try_send(ServiceCommand::Submit(submission)) {
        // The request never left; settle it here so loading cannot stick.
        tracing::warn!(ticket, error = %err, "prediction service unavailable");
        app.controller.complete_submit(
            ticket,
            Err(TransportError::Request("prediction service unavailable".to_string())),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use predict_protocol::{FieldName, FieldValue, PredictionResult};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    #[test]
    fn enter_sends_submission() {
        let (cmd_tx, mut cmd_rx) = mpsc::channel(4);
        let mut app = AppState::new(&ClientConfig::default());
        handle_key_event(key(KeyCode::Tab), &mut app, &cmd_tx);
        for ch in ['9', '5'] {
            handle_key_event(key(KeyCode::Char(ch)), &mut app, &cmd_tx);
        }
        assert!(!handle_key_event(key(KeyCode::Enter), &mut app, &cmd_tx));

        let ServiceCommand::Submit(submission) = cmd_rx.try_recv().expect("command");
        assert_eq!(submission.request.glucose, 95.0);
        assert!(app.controller.is_loading());

        handle_key_event(key(KeyCode::Enter), &mut app, &cmd_tx);
        assert!(cmd_rx.try_recv().is_err());
    }

    #[test]
    fn closed_service_settles_submission() {
        let (cmd_tx, cmd_rx) = mpsc::channel(1);
        drop(cmd_rx);
        let mut app = AppState::new(&ClientConfig::default());
        handle_key_event(key(KeyCode::Enter), &mut app, &cmd_tx);
        assert!(!app.controller.is_loading());
        assert_eq!(
            app.controller.result(),
            Some(&PredictionResult::server_error())
        );
    }

    #[test]
    fn quit_needs_confirmation() {
        let (cmd_tx, _cmd_rx) = mpsc::channel(1);
        let mut app = AppState::new(&ClientConfig::default());
        assert!(!handle_key_event(key(KeyCode::Char('q')), &mut app, &cmd_tx));
        assert!(app.confirm_quit);
        assert!(!handle_key_event(key(KeyCode::Esc), &mut app, &cmd_tx));
        assert!(!app.confirm_quit);
        handle_key_event(key(KeyCode::Char('q')), &mut app, &cmd_tx);
        assert!(handle_key_event(key(KeyCode::Char('q')), &mut app, &cmd_tx));
        assert!(handle_key_event(ctrl('c'), &mut app, &cmd_tx));
    }

    #[test]
    fn ctrl_r_resets_and_ctrl_u_clears() {
        let (cmd_tx, _cmd_rx) = mpsc::channel(1);
        let mut app = AppState::new(&ClientConfig::default());
        handle_key_event(key(KeyCode::Char('3')), &mut app, &cmd_tx);
        handle_key_event(ctrl('u'), &mut app, &cmd_tx);
        assert_eq!(
            app.controller.values().get(FieldName::Pregnancies),
            FieldValue::Empty
        );
        handle_key_event(ctrl('r'), &mut app, &cmd_tx);
        assert_eq!(
            app.controller.values().get(FieldName::Pregnancies),
            FieldValue::Number(0.0)
        );
        assert_eq!(app.buffer(FieldName::Pregnancies), "0");
    }

    #[test]
    fn arrows_step_the_focused_field() {
        let (cmd_tx, _cmd_rx) = mpsc::channel(1);
        let mut app = AppState::new(&ClientConfig::default());
        handle_key_event(key(KeyCode::BackTab), &mut app, &cmd_tx);
        handle_key_event(key(KeyCode::Right), &mut app, &cmd_tx);
        handle_key_event(key(KeyCode::Right), &mut app, &cmd_tx);
        handle_key_event(key(KeyCode::Left), &mut app, &cmd_tx);
        assert_eq!(app.buffer(FieldName::Age), "1");
    }

    #[test]
    fn letters_are_ignored() {
        let (cmd_tx, _cmd_rx) = mpsc::channel(1);
        let mut app = AppState::new(&ClientConfig::default());
        handle_key_event(key(KeyCode::Char('x')), &mut app, &cmd_tx);
        assert_eq!(app.buffer(FieldName::Pregnancies), "0");
    }
}
