use std::fmt;

/// The eight measurements collected by the form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldName {
    Pregnancies,
    Glucose,
    BloodPressure,
    SkinThickness,
    Insulin,
    Bmi,
    DiabetesPedigreeFunction,
    Age,
}

impl FieldName {
    pub const ALL: [FieldName; 8] = [
        FieldName::Pregnancies,
        FieldName::Glucose,
        FieldName::BloodPressure,
        FieldName::SkinThickness,
        FieldName::Insulin,
        FieldName::Bmi,
        FieldName::DiabetesPedigreeFunction,
        FieldName::Age,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Key used on the wire and shown as the field caption.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldName::Pregnancies => "Pregnancies",
            FieldName::Glucose => "Glucose",
            FieldName::BloodPressure => "BloodPressure",
            FieldName::SkinThickness => "SkinThickness",
            FieldName::Insulin => "Insulin",
            FieldName::Bmi => "BMI",
            FieldName::DiabetesPedigreeFunction => "DiabetesPedigreeFunction",
            FieldName::Age => "Age",
        }
    }

    pub fn hint(self) -> &'static str {
        match self {
            FieldName::Pregnancies => "e.g. 2",
            FieldName::Glucose => "e.g. 120",
            FieldName::BloodPressure => "e.g. 70",
            FieldName::SkinThickness => "e.g. 25",
            FieldName::Insulin => "e.g. 125",
            FieldName::Bmi => "e.g. 30.1",
            FieldName::DiabetesPedigreeFunction => "e.g. 0.45",
            FieldName::Age => "e.g. 29",
        }
    }

    /// Increment applied by the step keys of the input surface.
    pub fn step(self) -> f64 {
        match self {
            FieldName::Bmi => 0.1,
            FieldName::DiabetesPedigreeFunction => 0.001,
            _ => 1.0,
        }
    }

    pub fn min(self) -> Option<f64> {
        match self {
            FieldName::Age => Some(0.0),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Case-insensitive lookup by wire name.
    pub fn parse(raw: &str) -> Result<Self, FieldParseError> {
        let trimmed = raw.trim();
        Self::ALL
            .into_iter()
            .find(|name| name.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| FieldParseError(trimmed.to_string()))
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldParseError(pub String);

impl fmt::Display for FieldParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown field `{}`", self.0)
    }
}

impl std::error::Error for FieldParseError {}

/// A coerced field value. `Number` is always finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Empty,
}

impl FieldValue {
    pub fn as_number(self) -> Option<f64> {
        match self {
            FieldValue::Number(value) => Some(value),
            FieldValue::Empty => None,
        }
    }

    pub fn is_empty(self) -> bool {
        matches!(self, FieldValue::Empty)
    }

    /// Value put on the wire; blank fields go out as zero.
    pub fn to_wire(self) -> f64 {
        self.as_number().unwrap_or(0.0)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(value) => write!(f, "{value}"),
            FieldValue::Empty => Ok(()),
        }
    }
}

/// Interpret raw text from an input control.
///
/// Only the empty string maps to `Empty`. Whitespace-only text reads as
/// zero and surrounding whitespace is ignored. Anything that does not parse
/// to a finite number yields `None` so the caller can keep the previous value.
pub fn coerce(raw: &str) -> Option<FieldValue> {
    if raw.is_empty() {
        return Some(FieldValue::Empty);
    }
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(FieldValue::Number(0.0));
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(FieldValue::Number(value)),
        _ => None,
    }
}

/// One value per field; every key is always present.
#[derive(Debug, Clone, PartialEq)]
pub struct FormValues {
    values: [FieldValue; FieldName::COUNT],
}

impl FormValues {
    pub const INITIAL: FormValues = FormValues {
        values: [FieldValue::Number(0.0); FieldName::COUNT],
    };

    pub fn get(&self, name: FieldName) -> FieldValue {
        self.values[name.index()]
    }

    pub fn set(&mut self, name: FieldName, value: FieldValue) {
        self.values[name.index()] = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldName, FieldValue)> + '_ {
        FieldName::ALL
            .into_iter()
            .map(move |name| (name, self.get(name)))
    }

    pub fn blank_fields(&self) -> Vec<FieldName> {
        self.iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(name, _)| name)
            .collect()
    }

    /// Fields whose value sits under the field's lower bound.
    pub fn below_min_fields(&self) -> Vec<FieldName> {
        self.iter()
            .filter(|&(name, value)| match (name.min(), value.as_number()) {
                (Some(min), Some(current)) => current < min,
                _ => false,
            })
            .map(|(name, _)| name)
            .collect()
    }
}

impl Default for FormValues {
    fn default() -> Self {
        Self::INITIAL
    }
}
