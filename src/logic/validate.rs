use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::model::CycleTime;

/// Field-level validation failures, aggregated across the whole payload.
///
/// Serializes as the bare field -> messages map, which is exactly the 400
/// response body. An invalid payload is rejected before any store write, so
/// these never partially apply.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: &str) -> Self {
        let mut errors = Self::new();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: &str, message: &str) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Validated fields of a process payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessFields {
    pub name: String,
    pub description: String,
}

/// Validated fields of an operation payload. The `process` hyperlink is kept
/// raw here; resolving it against the store is the identity resolver's job.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationFields {
    pub op_number: i64,
    pub name: String,
    pub description: String,
    pub cycle_time: CycleTime,
    pub process_link: String,
}

const REQUIRED: &str = "This field is required.";
const NOT_A_STRING: &str = "Not a valid string.";
const NOT_AN_INTEGER: &str = "A valid integer is required.";
const NEGATIVE: &str = "Ensure this value is greater than or equal to 0.";
const NOT_AN_OBJECT: &str = "Invalid payload. Expected a JSON object.";

/// Validate a process payload. `name` and `description` are optional and may
/// be blank; anything else in the payload is ignored.
pub fn process_payload(payload: &Value) -> Result<ProcessFields, ValidationErrors> {
    let object = match payload.as_object() {
        Some(object) => object,
        None => return Err(ValidationErrors::single("non_field_errors", NOT_AN_OBJECT)),
    };

    let mut errors = ValidationErrors::new();
    let name = optional_string(object.get("name"), "name", &mut errors);
    let description = optional_string(object.get("description"), "description", &mut errors);

    if errors.is_empty() {
        Ok(ProcessFields { name, description })
    } else {
        Err(errors)
    }
}

/// Validate an operation payload. Every field is required; failures are
/// collected per field rather than short-circuiting on the first one.
pub fn operation_payload(payload: &Value) -> Result<OperationFields, ValidationErrors> {
    let object = match payload.as_object() {
        Some(object) => object,
        None => return Err(ValidationErrors::single("non_field_errors", NOT_AN_OBJECT)),
    };

    let mut errors = ValidationErrors::new();

    let op_number = match object.get("op_number") {
        None | Some(Value::Null) => {
            errors.push("op_number", REQUIRED);
            None
        }
        Some(value) => match value.as_i64() {
            Some(n) if n >= 0 => Some(n),
            Some(_) => {
                errors.push("op_number", NEGATIVE);
                None
            }
            None => {
                errors.push("op_number", NOT_AN_INTEGER);
                None
            }
        },
    };

    let name = required_string(object.get("name"), "name", &mut errors);
    let description = required_string(object.get("description"), "description", &mut errors);

    let cycle_time = match object.get("cycle_time") {
        None | Some(Value::Null) => {
            errors.push("cycle_time", REQUIRED);
            None
        }
        Some(Value::String(raw)) => match raw.parse::<CycleTime>() {
            Ok(ct) => Some(ct),
            Err(e) => {
                errors.push("cycle_time", &e.to_string());
                None
            }
        },
        Some(_) => {
            errors.push("cycle_time", NOT_A_STRING);
            None
        }
    };

    let process_link = required_string(object.get("process"), "process", &mut errors);

    if errors.is_empty() {
        Ok(OperationFields {
            // empty() checked above, each field collected Some on success
            op_number: op_number.unwrap(),
            name: name.unwrap(),
            description: description.unwrap(),
            cycle_time: cycle_time.unwrap(),
            process_link: process_link.unwrap(),
        })
    } else {
        Err(errors)
    }
}

fn optional_string(value: Option<&Value>, field: &str, errors: &mut ValidationErrors) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(_) => {
            errors.push(field, NOT_A_STRING);
            String::new()
        }
    }
}

fn required_string(
    value: Option<&Value>,
    field: &str,
    errors: &mut ValidationErrors,
) -> Option<String> {
    match value {
        None | Some(Value::Null) => {
            errors.push(field, REQUIRED);
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.push(field, NOT_A_STRING);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn process_payload_defaults_to_blank_fields() {
        let fields = process_payload(&json!({})).unwrap();
        assert_eq!(fields.name, "");
        assert_eq!(fields.description, "");
    }

    #[test]
    fn process_payload_ignores_unknown_fields() {
        let fields = process_payload(&json!({
            "name": "RECEIVE_INSPECT",
            "description": "INSPECT FOR DAMAGE",
            "plant": "Norrköping"
        }))
        .unwrap();
        assert_eq!(fields.name, "RECEIVE_INSPECT");
    }

    #[test]
    fn process_payload_rejects_non_string_name() {
        let errors = process_payload(&json!({"name": 7})).unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["name"]);
    }

    #[test]
    fn operation_payload_reports_every_missing_field() {
        let errors = operation_payload(&json!({})).unwrap_err();
        let mut fields: Vec<&str> = errors.fields().collect();
        fields.sort();
        assert_eq!(
            fields,
            vec!["cycle_time", "description", "name", "op_number", "process"]
        );
    }

    #[test]
    fn operation_payload_accepts_a_complete_payload() {
        let fields = operation_payload(&json!({
            "name": "Load Furnace",
            "op_number": 10,
            "description": "Load on a flat plate",
            "cycle_time": "0:01:30",
            "process": "http://localhost/processes/abc"
        }))
        .unwrap();
        assert_eq!(fields.op_number, 10);
        assert_eq!(fields.cycle_time, CycleTime::from_seconds(90));
        assert_eq!(fields.process_link, "http://localhost/processes/abc");
    }

    #[test]
    fn operation_payload_rejects_non_integer_op_number() {
        let errors = operation_payload(&json!({
            "name": "", "description": "", "cycle_time": "0:01:00",
            "process": "/processes/abc", "op_number": "ten"
        }))
        .unwrap_err();
        assert_eq!(errors, ValidationErrors::single("op_number", NOT_AN_INTEGER));
    }

    #[test]
    fn operation_payload_rejects_negative_op_number() {
        let errors = operation_payload(&json!({
            "name": "", "description": "", "cycle_time": "0:01:00",
            "process": "/processes/abc", "op_number": -5
        }))
        .unwrap_err();
        assert_eq!(errors, ValidationErrors::single("op_number", NEGATIVE));
    }

    #[test]
    fn operation_payload_rejects_malformed_cycle_time() {
        let errors = operation_payload(&json!({
            "name": "", "description": "", "cycle_time": "90 seconds",
            "process": "/processes/abc", "op_number": 10
        }))
        .unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["cycle_time"]);
    }

    #[test]
    fn validation_errors_serialize_as_field_map() {
        let mut errors = ValidationErrors::new();
        errors.push("op_number", REQUIRED);
        errors.push("op_number", "second message");
        errors.push("name", REQUIRED);
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            json!({
                "name": ["This field is required."],
                "op_number": ["This field is required.", "second message"]
            })
        );
    }
}
