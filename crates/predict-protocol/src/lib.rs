use serde::Serialize;
use serde_json::Value;

pub mod form;

pub use form::{coerce, FieldName, FieldParseError, FieldValue, FormValues};

/// Message shown whenever the request/response cycle fails.
pub const SERVER_ERROR_MESSAGE: &str = "Server error. Check backend.";

/// Body of `POST /predict`: a flat object keyed by the field wire names.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct PredictRequest {
    pub pregnancies: f64,
    pub glucose: f64,
    pub blood_pressure: f64,
    pub skin_thickness: f64,
    pub insulin: f64,
    #[serde(rename = "BMI")]
    pub bmi: f64,
    pub diabetes_pedigree_function: f64,
    pub age: f64,
}

impl PredictRequest {
    pub fn from_values(values: &FormValues) -> Self {
        let wire = |name: FieldName| values.get(name).to_wire();
        Self {
            pregnancies: wire(FieldName::Pregnancies),
            glucose: wire(FieldName::Glucose),
            blood_pressure: wire(FieldName::BloodPressure),
            skin_thickness: wire(FieldName::SkinThickness),
            insulin: wire(FieldName::Insulin),
            bmi: wire(FieldName::Bmi),
            diabetes_pedigree_function: wire(FieldName::DiabetesPedigreeFunction),
            age: wire(FieldName::Age),
        }
    }

    pub fn get(&self, name: FieldName) -> f64 {
        match name {
            FieldName::Pregnancies => self.pregnancies,
            FieldName::Glucose => self.glucose,
            FieldName::BloodPressure => self.blood_pressure,
            FieldName::SkinThickness => self.skin_thickness,
            FieldName::Insulin => self.insulin,
            FieldName::Bmi => self.bmi,
            FieldName::DiabetesPedigreeFunction => self.diabetes_pedigree_function,
            FieldName::Age => self.age,
        }
    }
}

/// Reply from the prediction endpoint.
///
/// Decoding never asserts a shape: missing or mistyped members simply come
/// back as `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictResponse {
    pub label: Option<String>,
    pub probability: Option<f64>,
    pub prediction: Option<Value>,
    pub error: Option<String>,
}

impl PredictResponse {
    pub fn from_value(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::default();
        };
        let label = object.get("label").and_then(Value::as_str).map(str::to_string);
        let probability = object.get("probability").and_then(Value::as_f64);
        let prediction = object
            .get("prediction")
            .filter(|value| !value.is_null())
            .cloned();
        let error = object.get("error").and_then(error_text);
        Self {
            label,
            probability,
            prediction,
            error,
        }
    }

    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_slice(body)?;
        Ok(Self::from_value(&value))
    }
}

// Only values that would read as "set" count as a server error.
fn error_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text.clone()),
        Value::Number(number) if number.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

/// Outcome of the most recent submission.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionResult {
    Success(PredictResponse),
    Failure { error: String },
}

impl PredictionResult {
    pub fn server_error() -> Self {
        PredictionResult::Failure {
            error: SERVER_ERROR_MESSAGE.to_string(),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, PredictionResult::Failure { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_values() -> FormValues {
        let mut values = FormValues::default();
        let inputs = [
            (FieldName::Pregnancies, 2.0),
            (FieldName::Glucose, 120.0),
            (FieldName::BloodPressure, 70.0),
            (FieldName::SkinThickness, 25.0),
            (FieldName::Insulin, 125.0),
            (FieldName::Bmi, 30.1),
            (FieldName::DiabetesPedigreeFunction, 0.45),
            (FieldName::Age, 29.0),
        ];
        for (name, value) in inputs {
            values.set(name, FieldValue::Number(value));
        }
        values
    }

    #[test]
    fn request_uses_wire_names() {
        let request = PredictRequest::from_values(&sample_values());
        let json = serde_json::to_value(&request).expect("serialize");
        assert_eq!(
            json,
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
        let object = json.as_object().expect("object");
        assert_eq!(object.len(), 8);
        for name in FieldName::ALL {
            assert!(object.contains_key(name.as_str()), "missing {name}");
        }
    }

    #[test]
    fn empty_fields_are_sent_as_zero() {
        let mut values = sample_values();
        values.set(FieldName::Insulin, FieldValue::Empty);
        let request = PredictRequest::from_values(&values);
        assert_eq!(request.insulin, 0.0);
        assert_eq!(request.get(FieldName::Glucose), 120.0);
    }

    #[test]
    fn response_decodes_full_payload() {
        let body = br#"{"label":"Borderline","probability":0.5,"prediction":1}"#;
        let response = PredictResponse::from_slice(body).expect("decode");
        assert_eq!(response.label.as_deref(), Some("Borderline"));
        assert_eq!(response.probability, Some(0.5));
        assert_eq!(response.prediction, Some(json!(1)));
        assert_eq!(response.error, None);
    }

    #[test]
    fn response_tolerates_odd_shapes() {
        let response = PredictResponse::from_value(&json!({
            "label": 3,
            "probability": "high",
            "prediction": null,
            "extra": true
        }));
        assert_eq!(response, PredictResponse::default());

        let response = PredictResponse::from_value(&json!([1, 2, 3]));
        assert_eq!(response, PredictResponse::default());

        let response = PredictResponse::from_value(&json!({"error": ""}));
        assert_eq!(response.error, None);
        let response = PredictResponse::from_value(&json!({"error": "Invalid input format"}));
        assert_eq!(response.error.as_deref(), Some("Invalid input format"));
    }

    #[test]
    fn response_rejects_non_json_body() {
        assert!(PredictResponse::from_slice(b"<html>oops</html>").is_err());
    }

    #[test]
    fn server_error_uses_fixed_message() {
        assert_eq!(
            PredictionResult::server_error(),
            PredictionResult::Failure {
                error: "Server error. Check backend.".to_string()
            }
        );
    }
}
