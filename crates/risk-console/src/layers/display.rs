//! Maps a prediction result onto what the result panel shows.
//!
//! The badge follows the label string while the probability bar follows the
//! probability alone; the two rules are independent and can disagree.

use predict_protocol::PredictionResult;
use serde_json::Value;

pub(crate) const HIGH_RISK_LABEL: &str = "Diabetic - High Risk";
pub(crate) const BORDERLINE_LABEL: &str = "Borderline";

const BAR_RED_AT: f64 = 0.6;
const BAR_YELLOW_AT: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tone {
    Red,
    Yellow,
    Green,
}

impl Tone {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Tone::Red => "red",
            Tone::Yellow => "yellow",
            Tone::Green => "green",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    pub(crate) fn from_label(label: Option<&str>) -> Self {
        match label {
            Some(HIGH_RISK_LABEL) => Severity::High,
            Some(BORDERLINE_LABEL) => Severity::Medium,
            _ => Severity::Low,
        }
    }

    pub(crate) fn code(self) -> &'static str {
        match self {
            Severity::High => "HIGH",
            Severity::Medium => "MID",
            Severity::Low => "SAFE",
        }
    }

    pub(crate) fn tone(self) -> Tone {
        match self {
            Severity::High => Tone::Red,
            Severity::Medium => Tone::Yellow,
            Severity::Low => Tone::Green,
        }
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ProbabilityBar {
    pub(crate) fill_percent: f64,
    pub(crate) tone: Tone,
}

impl ProbabilityBar {
    pub(crate) fn from_probability(probability: f64) -> Self {
        Self {
            fill_percent: (probability * 100.0).clamp(0.0, 100.0),
            tone: bar_tone(probability),
        }
    }

    pub(crate) fn ratio(&self) -> f64 {
        self.fill_percent / 100.0
    }
}

pub(crate) fn bar_tone(probability: f64) -> Tone {
    if probability >= BAR_RED_AT {
        Tone::Red
    } else if probability >= BAR_YELLOW_AT {
        Tone::Yellow
    } else {
        Tone::Green
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct OutcomeView {
    pub(crate) label: String,
    pub(crate) severity: Severity,
    pub(crate) marker: &'static str,
    pub(crate) probability_text: String,
    pub(crate) prediction_text: String,
    pub(crate) bar: Option<ProbabilityBar>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ResultDisplay {
    Error(String),
    Outcome(OutcomeView),
}

pub(crate) fn derive_display(result: Option<&PredictionResult>) -> Option<ResultDisplay> {
    let response = match result? {
        PredictionResult::Failure { error } => return Some(ResultDisplay::Error(error.clone())),
        PredictionResult::Success(response) => response,
    };
    // A 2xx body carrying `error` still renders as an error.
    if let Some(error) = &response.error {
        return Some(ResultDisplay::Error(error.clone()));
    }

    let label = response.label.clone();
    let severity = Severity::from_label(label.as_deref());
    let marker = if severity == Severity::High { "⚠" } else { "✅" };
    Some(ResultDisplay::Outcome(OutcomeView {
        label: label.unwrap_or_default(),
        severity,
        marker,
        probability_text: fixed3(response.probability.unwrap_or(0.0)),
        prediction_text: prediction_text(response.prediction.as_ref()),
        bar: response.probability.map(ProbabilityBar::from_probability),
    }))
}

/// Three decimals, with exact ties rounded away from zero.
fn fixed3(value: f64) -> String {
    let scaled = value * 1000.0;
    // The fused multiply-add recovers the rounding error of the product.
    let exact = value.mul_add(1000.0, -scaled) == 0.0;
    if exact && (scaled - scaled.trunc()).abs() == 0.5 {
        let units = (scaled.abs() + 0.5) as u64;
        let sign = if value < 0.0 { "-" } else { "" };
        return format!("{sign}{}.{:03}", units / 1000, units % 1000);
    }
    format!("{value:.3}")
}

fn prediction_text(prediction: Option<&Value>) -> String {
    match prediction {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => match number.as_f64() {
            Some(float) if number.is_f64() && float.fract() == 0.0 && float.abs() < 1e21 => {
                // Integral floats read like integers; `-0` reads as `0`.
                format!("{}", float + 0.0)
            }
            _ => number.to_string(),
        },
        Some(other) => other.to_string(),
    }
}

impl ResultDisplay {
    /// Plain-text rendering used by headless mode.
    pub(crate) fn summary_lines(&self, model_name: &str) -> Vec<String> {
        match self {
            ResultDisplay::Error(message) => vec![format!("error: {message}")],
            ResultDisplay::Outcome(view) => {
                let mut lines = vec![
                    format!(
                        "severity: {} ({}, {})",
                        view.severity.code(),
                        view.severity.as_str(),
                        view.severity.tone().as_str()
                    ),
                    format!("label: {} {}", view.label, view.marker),
                    format!("probability: {}", view.probability_text),
                    format!("raw prediction: {}", view.prediction_text),
                    format!("model: {model_name}"),
                ];
                if let Some(bar) = &view.bar {
                    lines.push(format!(
                        "probability bar: {:.0}% {}",
                        bar.fill_percent,
                        bar.tone.as_str()
                    ));
                }
                lines
            }
        }
    }
}
