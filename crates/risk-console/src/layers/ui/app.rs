use predict_protocol::{coerce, FieldName, FieldValue, FormValues};
use std::time::Duration;

use crate::config::ClientConfig;
use crate::layers::controller::{field_issues, FieldUpdate, FormController, Submission};
use crate::layers::service::events::UiEvent;

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Notice {
    Info(String),
    Warn(String),
}

pub(crate) struct AppState {
    pub(crate) controller: FormController,
    pub(crate) buffers: Vec<String>,
    pub(crate) focused: usize,
    pub(crate) notice: Option<Notice>,
    pub(crate) confirm_quit: bool,
    pub(crate) tick: u64,
    pub(crate) last_elapsed: Option<Duration>,
    pub(crate) model_name: String,
    pub(crate) endpoint_url: String,
    require_all_fields: bool,
}

impl AppState {
    pub(crate) fn new(config: &ClientConfig) -> Self {
        let controller = FormController::new(config.form.fence_responses);
        let buffers = buffers_from(controller.values());
        Self {
            controller,
            buffers,
            focused: 0,
            notice: None,
            confirm_quit: false,
            tick: 0,
            last_elapsed: None,
            model_name: config.ui.model_name.clone(),
            endpoint_url: config.endpoint.url().unwrap_or_default(),
            require_all_fields: config.form.require_all_fields,
        }
    }

    /// Seeds a field before the first frame, e.g. from `--field` flags.
    pub(crate) fn prefill(&mut self, name: FieldName, raw: &str) -> FieldUpdate {
        let update = self.controller.update_field(name, raw);
        if update != FieldUpdate::Rejected {
            self.buffers[name.index()] = format_value(self.controller.values().get(name));
        }
        update
    }

    pub(crate) fn focused_field(&self) -> FieldName {
        FieldName::ALL[self.focused]
    }

    pub(crate) fn buffer(&self, name: FieldName) -> &str {
        &self.buffers[name.index()]
    }

    /// Text in the field's editor does not parse as a number.
    pub(crate) fn is_invalid(&self, name: FieldName) -> bool {
        coerce(self.buffer(name)).is_none()
    }

    pub(crate) fn focus_next(&mut self) {
        self.focused = (self.focused + 1) % FieldName::COUNT;
    }

    pub(crate) fn focus_prev(&mut self) {
        if self.focused == 0 {
            self.focused = FieldName::COUNT - 1;
        } else {
            self.focused -= 1;
        }
    }

    pub(crate) fn push_char(&mut self, ch: char) {
        let name = self.focused_field();
        let mut text = self.buffers[name.index()].clone();
        // A lone zero placeholder is replaced rather than appended to.
        if text == "0" && ch != '.' {
            text.clear();
        }
        text.push(ch);
        self.edit_focused(text);
    }

    pub(crate) fn backspace(&mut self) {
        let mut text = self.buffers[self.focused].clone();
        text.pop();
        self.edit_focused(text);
    }

    pub(crate) fn clear_focused(&mut self) {
        self.edit_focused(String::new());
    }

    pub(crate) fn step_focused(&mut self, steps: i32) {
        let name = self.focused_field();
        let value = self.controller.step_field(name, steps);
        self.buffers[name.index()] = format_value(FieldValue::Number(value));
        self.notice = None;
    }

    fn edit_focused(&mut self, text: String) {
        let name = self.focused_field();
        let update = self.controller.update_field(name, &text);
        self.buffers[name.index()] = text;
        self.notice = match update {
            FieldUpdate::Rejected => Some(Notice::Warn(format!("{name} expects a number"))),
            FieldUpdate::Stored | FieldUpdate::Cleared => None,
        };
    }

    pub(crate) fn reset(&mut self) {
        self.controller.reset();
        self.last_elapsed = None;
        self.buffers = buffers_from(self.controller.values());
        self.notice = Some(Notice::Info("form reset".to_string()));
    }

    /// Starts a submission unless one is already running or the form fails
    /// its input checks.
    pub(crate) fn try_begin_submit(&mut self) -> Option<Submission> {
        if self.controller.is_loading() {
            return None;
        }
        if self.require_all_fields {
            let mut problems: Vec<String> = FieldName::ALL
                .into_iter()
                .filter(|name| self.is_invalid(*name))
                .map(|name| format!("{name} expects a number"))
                .collect();
            problems.extend(
                field_issues(self.controller.values())
                    .iter()
                    .map(ToString::to_string),
            );
            if !problems.is_empty() {
                self.notice = Some(Notice::Warn(problems.join("; ")));
                return None;
            }
        }
        self.notice = None;
        Some(self.controller.begin_submit())
    }

    pub(crate) fn handle_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::PredictionSettled {
                ticket,
                outcome,
                elapsed,
            } => {
                if self.controller.complete_submit(ticket, outcome) {
                    self.last_elapsed = Some(elapsed);
                }
            }
        }
    }

    pub(crate) fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    pub(crate) fn spinner_frame(&self) -> &'static str {
        SPINNER_FRAMES[(self.tick % SPINNER_FRAMES.len() as u64) as usize]
    }
}

fn buffers_from(values: &FormValues) -> Vec<String> {
    values.iter().map(|(_, value)| format_value(value)).collect()
}

fn format_value(value: FieldValue) -> String {
    value.to_string()
}
