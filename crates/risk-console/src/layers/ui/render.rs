use predict_protocol::FieldName;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Clear, Gauge, Paragraph, Wrap};

use super::app::{AppState, Notice};
use super::text::{caption_with_hint, sanitize_text_for_tui};
use super::theme::{Theme, ValueStyle};
use crate::layers::display::{derive_display, OutcomeView, ResultDisplay};

const TITLE: &str = "Diabetes Risk Predictor";
const SUBTITLE: &str = "Enter patient details, the model returns a prediction and probability.";
const TIP: &str = "Tip: Use realistic values for better results.";
const DISCLAIMER: &str = "Note: This is a demo prediction. For production use, ensure HTTPS, \
                          authentication and proper model validation.";

pub(crate) fn draw_ui(frame: &mut ratatui::Frame, app: &mut AppState) {
    let theme = Theme::dark();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(10),
            Constraint::Length(3),
            Constraint::Min(7),
            Constraint::Length(4),
        ])
        .split(frame.area());

    draw_header(frame, app, &theme, chunks[0]);
    draw_form(frame, app, &theme, chunks[1]);
    draw_controls(frame, app, &theme, chunks[2]);
    draw_result(frame, app, &theme, chunks[3]);
    draw_footer(frame, app, &theme, chunks[4]);
}

fn draw_header(frame: &mut ratatui::Frame, app: &AppState, theme: &Theme, area: Rect) {
    let lines = vec![
        Line::from(vec![
            Span::styled(TITLE, theme.accent_style()),
            Span::styled("    Model: ", theme.key_style()),
            Span::styled(app.model_name.clone(), theme.value_style(ValueStyle::Important)),
        ]),
        Line::from(vec![
            Span::styled(SUBTITLE, theme.help_style()),
            Span::styled("  ", theme.help_style()),
            Span::styled(app.endpoint_url.clone(), theme.value_style(ValueStyle::Dim)),
        ]),
    ];
    let header = Paragraph::new(lines).block(theme.block("Predictor"));
    frame.render_widget(header, area);
}

fn draw_form(frame: &mut ratatui::Frame, app: &AppState, theme: &Theme, area: Rect) {
    let block = theme.block("Patient details");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2); 4])
        .split(inner);
    for (index, name) in FieldName::ALL.into_iter().enumerate() {
        let row = rows[index / 2];
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(row);
        let cell = columns[index % 2];
        let cell = Rect {
            width: cell.width.saturating_sub(1),
            ..cell
        };
        frame.render_widget(field_widget(app, theme, name, cell.width), cell);
    }
}

fn field_widget<'a>(app: &AppState, theme: &Theme, name: FieldName, width: u16) -> Paragraph<'a> {
    let focused = app.focused_field() == name;
    let caption = caption_with_hint(name.as_str(), name.hint(), width as usize);
    let caption_style = if focused {
        theme.accent_style()
    } else {
        theme.key_style()
    };

    let buffer = app.buffer(name).to_string();
    let mut value_spans = vec![Span::styled(
        if focused { "> " } else { "  " },
        theme.accent_style(),
    )];
    let value_style = if app.is_invalid(name) {
        theme.error_style()
    } else if focused {
        theme.highlight_style()
    } else {
        theme.value_style(ValueStyle::Normal)
    };
    let shown = if buffer.is_empty() && !focused {
        Span::styled("(blank)", theme.value_style(ValueStyle::Dim))
    } else {
        Span::styled(buffer, value_style)
    };
    value_spans.push(shown);
    if focused {
        value_spans.push(Span::styled("_", theme.accent_style()));
    }

    Paragraph::new(vec![
        Line::styled(caption, caption_style),
        Line::from(value_spans),
    ])
}

fn draw_controls(frame: &mut ratatui::Frame, app: &AppState, theme: &Theme, area: Rect) {
    let mut spans = Vec::new();
    if app.controller.is_loading() {
        spans.push(Span::styled(
            format!("[ Predicting {} ]", app.spinner_frame()),
            theme.warn_style(),
        ));
    } else {
        spans.push(Span::styled("[ Enter: Predict ]", theme.highlight_style()));
    }
    spans.push(Span::styled("  [ Ctrl+R: Reset ]  ", theme.value_style(ValueStyle::Normal)));
    match &app.notice {
        Some(Notice::Warn(message)) => spans.push(Span::styled(message.clone(), theme.warn_style())),
        Some(Notice::Info(message)) => {
            spans.push(Span::styled(message.clone(), theme.value_style(ValueStyle::Dim)))
        }
        None => spans.push(Span::styled(TIP, theme.help_style())),
    }
    if let Some(elapsed) = app.last_elapsed {
        spans.push(Span::styled(
            format!("  (answered in {} ms)", elapsed.as_millis()),
            theme.value_style(ValueStyle::Dim),
        ));
    }
    let controls = Paragraph::new(Line::from(spans)).block(theme.block("Actions"));
    frame.render_widget(controls, area);
}

fn draw_result(frame: &mut ratatui::Frame, app: &AppState, theme: &Theme, area: Rect) {
    frame.render_widget(Clear, area);
    match derive_display(app.controller.result()) {
        None => {
            let message = if app.controller.is_loading() {
                "waiting for the backend..."
            } else {
                "no prediction yet"
            };
            let empty = Paragraph::new(Text::styled(message, theme.value_style(ValueStyle::Dim)))
                .block(theme.block("Result"));
            frame.render_widget(empty, area);
        }
        Some(ResultDisplay::Error(message)) => {
            let error = Paragraph::new(Text::styled(
                sanitize_text_for_tui(&message),
                theme.error_style(),
            ))
            .block(theme.error_block("Result"))
            .wrap(Wrap { trim: true });
            frame.render_widget(error, area);
        }
        Some(ResultDisplay::Outcome(view)) => draw_outcome(frame, app, theme, area, &view),
    }
}

fn draw_outcome(
    frame: &mut ratatui::Frame,
    app: &AppState,
    theme: &Theme,
    area: Rect,
    view: &OutcomeView,
) {
    let block = theme.block("Result");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(10), Constraint::Min(20)])
        .split(inner);

    let badge_area = Rect {
        height: columns[0].height.min(3),
        width: columns[0].width.saturating_sub(2),
        ..columns[0]
    };
    let tone = view.severity.tone();
    let badge = Paragraph::new(vec![
        Line::raw(""),
        Line::raw(view.severity.code()),
        Line::raw(""),
    ])
    .alignment(Alignment::Center)
    .style(theme.badge_style(tone));
    frame.render_widget(badge, badge_area);

    let details = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(columns[1]);

    let label = Line::from(vec![
        Span::styled(
            sanitize_text_for_tui(&view.label),
            theme.value_style(ValueStyle::Important),
        ),
        Span::raw(" "),
        Span::styled(view.marker, theme.tone_style(tone)),
    ]);
    frame.render_widget(Paragraph::new(label), details[0]);

    let numbers = Line::from(vec![
        Span::styled("Probability ", theme.key_style()),
        Span::styled(view.probability_text.clone(), theme.value_style(ValueStyle::Normal)),
        Span::styled("   Raw prediction ", theme.key_style()),
        Span::styled(
            sanitize_text_for_tui(&view.prediction_text),
            theme.value_style(ValueStyle::Normal),
        ),
        Span::styled("   Model ", theme.key_style()),
        Span::styled(app.model_name.clone(), theme.value_style(ValueStyle::Normal)),
    ]);
    frame.render_widget(Paragraph::new(numbers), details[1]);

    if let Some(bar) = &view.bar {
        let gauge = Gauge::default()
            .gauge_style(theme.tone_style(bar.tone))
            .ratio(bar.ratio())
            .label(format!("{:.0}%", bar.fill_percent));
        frame.render_widget(gauge, details[2]);
        frame.render_widget(
            Paragraph::new(Line::styled("Probability bar", theme.help_style())),
            details[3],
        );
    }
}

fn draw_footer(frame: &mut ratatui::Frame, app: &AppState, theme: &Theme, area: Rect) {
    let mut help = vec![Span::styled(
        "Tab/↑↓=field  ←/→=step  0-9 . - e=edit  Ctrl+U=clear  Enter=predict  Ctrl+R=reset  Q=quit  ",
        theme.help_style(),
    )];
    if app.confirm_quit {
        help.push(Span::styled("press Q again to quit / Esc to cancel", theme.warn_style()));
    }
    let footer = Paragraph::new(vec![
        Line::from(help),
        Line::styled(DISCLAIMER, theme.value_style(ValueStyle::Dim)),
    ])
    .block(theme.block("Controls"))
    .wrap(Wrap { trim: true });
    frame.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use predict_protocol::{PredictResponse, PredictionResult};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn render(app: &mut AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).expect("terminal");
        terminal.draw(|frame| draw_ui(frame, app)).expect("draw");
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn settle(app: &mut AppState, response: PredictResponse) {
        let submission = app.try_begin_submit().expect("submission");
        app.controller.complete_submit(submission.ticket, Ok(response));
    }

    #[test]
    fn renders_empty_form() {
        let mut app = AppState::new(&ClientConfig::default());
        let screen = render(&mut app);
        assert!(screen.contains("Diabetes Risk Predictor"));
        assert!(screen.contains("DiabetesPedigreeFunction"));
        assert!(screen.contains("no prediction yet"));
        assert!(screen.contains("Enter: Predict"));
    }

    #[test]
    fn renders_borderline_outcome() {
        let mut app = AppState::new(&ClientConfig::default());
        settle(
            &mut app,
            PredictResponse {
                label: Some("Borderline".to_string()),
                probability: Some(0.5),
                prediction: Some(serde_json::json!(1)),
                error: None,
            },
        );
        let screen = render(&mut app);
        assert!(screen.contains("MID"));
        assert!(screen.contains("Borderline"));
        assert!(screen.contains("0.500"));
        assert!(screen.contains("Probability bar"));
    }

    #[test]
    fn renders_error_panel_and_spinner() {
        let mut app = AppState::new(&ClientConfig::default());
        let submission = app.try_begin_submit().expect("submission");
        let screen = render(&mut app);
        assert!(screen.contains("Predicting"));
        assert!(screen.contains("waiting for the backend"));

        app.controller.complete_submit(
            submission.ticket,
            Err(crate::layers::transport::TransportError::Timeout),
        );
        assert_eq!(app.controller.result(), Some(&PredictionResult::server_error()));
        let screen = render(&mut app);
        assert!(screen.contains("Server error. Check backend."));
    }
}
