use std::collections::{BTreeMap, HashMap};
use serde::Serialize;
use serde_json::{Map, Number, Value};
use thiserror::Error;

#[derive(Clone, Copy, Serialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Text,
    Email,
    Tel,
    Date,
    Number,
    Textarea,
    Select,
    Checkbox,
}

#[derive(Clone, Serialize, Debug, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// One input of a rendered form, with the value it should be pre-filled with.
#[derive(Clone, Serialize, Debug, PartialEq)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub input: InputKind,
    pub value: String,
    pub options: Vec<SelectOption>,
    pub required: bool,
}

impl FormField {
    fn new(name: &'static str, label: &'static str, input: InputKind, value: impl Into<String>) -> Self {
        Self {
            name,
            label,
            input,
            value: value.into(),
            options: Vec::new(),
            required: false,
        }
    }

    pub fn text(name: &'static str, label: &'static str, value: impl Into<String>) -> Self {
        Self::new(name, label, InputKind::Text, value)
    }

    pub fn email(name: &'static str, label: &'static str, value: impl Into<String>) -> Self {
        Self::new(name, label, InputKind::Email, value)
    }

    pub fn tel(name: &'static str, label: &'static str, value: impl Into<String>) -> Self {
        Self::new(name, label, InputKind::Tel, value)
    }

    pub fn date(name: &'static str, label: &'static str, value: impl Into<String>) -> Self {
        Self::new(name, label, InputKind::Date, value)
    }

    pub fn number(name: &'static str, label: &'static str, value: impl Into<String>) -> Self {
        Self::new(name, label, InputKind::Number, value)
    }

    pub fn textarea(name: &'static str, label: &'static str, value: impl Into<String>) -> Self {
        Self::new(name, label, InputKind::Textarea, value)
    }

    pub fn checkbox(name: &'static str, label: &'static str, checked: bool) -> Self {
        Self::new(name, label, InputKind::Checkbox, if checked { "true" } else { "" })
    }

    pub fn select(
        name: &'static str,
        label: &'static str,
        value: impl Into<String>,
        options: &[(&str, &str)],
    ) -> Self {
        let mut field = Self::new(name, label, InputKind::Select, value);
        field.options = options
            .iter()
            .map(|(value, label)| SelectOption {
                value: value.to_string(),
                label: label.to_string(),
            })
            .collect();
        field
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{0} must be a number")]
    NotNumeric(&'static str),
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: u32,
        max: u32,
    },
    #[error("Invalid value for {0}")]
    InvalidChoice(&'static str),
}

/// Overwrites the pre-filled values with what the user just submitted.
pub fn apply_submitted(fields: &mut [FormField], submitted: &HashMap<String, String>) {
    for field in fields.iter_mut() {
        match submitted.get(field.name) {
            Some(value) => field.value = value.clone(),
            None if field.input == InputKind::Checkbox => field.value.clear(),
            None => {}
        }
    }
}

/// Builds the JSON update body for the declared fields, validating as it goes.
pub fn collect_payload(
    fields: &[FormField],
    submitted: &HashMap<String, String>,
) -> Result<Map<String, Value>, FormError> {
    let mut payload = Map::new();
    for field in fields {
        let raw = submitted.get(field.name).map(|value| value.trim()).unwrap_or("");
        if field.required && raw.is_empty() && field.input != InputKind::Checkbox {
            return Err(FormError::Missing(field.label));
        }

        let value = match field.input {
            InputKind::Checkbox => Value::Bool(!raw.is_empty()),
            InputKind::Number if raw.is_empty() => Value::Null,
            InputKind::Number => Value::Number(parse_number(raw, field.label)?),
            InputKind::Select if raw.is_empty() => Value::Null,
            InputKind::Select => {
                if !field.options.iter().any(|option| option.value == raw) {
                    return Err(FormError::InvalidChoice(field.label));
                }
                Value::String(raw.to_string())
            }
            _ => Value::String(raw.to_string()),
        };
        payload.insert(field.name.to_string(), value);
    }
    Ok(payload)
}

fn parse_number(raw: &str, label: &'static str) -> Result<Number, FormError> {
    if let Ok(whole) = raw.parse::<i64>() {
        return Ok(Number::from(whole));
    }
    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .ok_or(FormError::NotNumeric(label))
}

/// Typed accessors over the raw text values of a multipart listing form.
pub struct FieldValues<'a>(pub &'a BTreeMap<String, String>);

impl<'a> FieldValues<'a> {
    pub fn optional(&self, name: &str) -> String {
        self.0
            .get(name)
            .map(|value| value.trim().to_string())
            .unwrap_or_default()
    }

    pub fn required(&self, name: &str, label: &'static str) -> Result<String, FormError> {
        let value = self.optional(name);
        if value.is_empty() {
            return Err(FormError::Missing(label));
        }
        Ok(value)
    }

    pub fn number(&self, name: &str, label: &'static str) -> Result<f64, FormError> {
        self.required(name, label)?
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or(FormError::NotNumeric(label))
    }

    pub fn optional_number(&self, name: &str, label: &'static str) -> Result<Option<f64>, FormError> {
        if self.optional(name).is_empty() {
            return Ok(None);
        }
        self.number(name, label).map(Some)
    }

    pub fn choice(
        &self,
        name: &str,
        label: &'static str,
        options: &[(&str, &str)],
    ) -> Result<String, FormError> {
        let value = self.required(name, label)?;
        if !options.iter().any(|(option, _)| *option == value) {
            return Err(FormError::InvalidChoice(label));
        }
        Ok(value)
    }

    pub fn flag(&self, name: &str) -> bool {
        matches!(self.optional(name).as_str(), "true" | "on" | "1")
    }

    /// One entry per non-blank line, as the amenity and feature textareas are filled in.
    pub fn lines(&self, name: &str) -> Vec<String> {
        self.optional(name)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use super::*;

    fn submitted(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    fn enquiry_fields() -> Vec<FormField> {
        vec![
            FormField::text("name", "Name", "").required(),
            FormField::number("adults", "Adults", ""),
            FormField::select(
                "status",
                "Status",
                "pending",
                &[("pending", "Pending"), ("confirmed", "Confirmed")],
            ),
        ]
    }

    #[test]
    fn payload_converts_numbers_and_keeps_strings() {
        let payload = collect_payload(
            &enquiry_fields(),
            &submitted(&[("name", " Priya "), ("adults", "3"), ("status", "confirmed")]),
        )
        .unwrap();

        assert_eq!(
            Value::Object(payload),
            json!({ "name": "Priya", "adults": 3, "status": "confirmed" })
        );
    }

    #[test]
    fn payload_rejects_missing_required_fields() {
        let error = collect_payload(&enquiry_fields(), &submitted(&[("adults", "2")])).unwrap_err();
        assert_eq!(error, FormError::Missing("Name"));
        assert_eq!(error.to_string(), "Name is required");
    }

    #[test]
    fn payload_rejects_unknown_choices_and_bad_numbers() {
        let bad_status = collect_payload(
            &enquiry_fields(),
            &submitted(&[("name", "A"), ("status", "archived")]),
        );
        assert_eq!(bad_status.unwrap_err(), FormError::InvalidChoice("Status"));

        let bad_number = collect_payload(
            &enquiry_fields(),
            &submitted(&[("name", "A"), ("adults", "two")]),
        );
        assert_eq!(bad_number.unwrap_err(), FormError::NotNumeric("Adults"));
    }

    #[test]
    fn submitted_values_replace_prefilled_ones() {
        let mut fields = vec![
            FormField::text("name", "Name", "Old"),
            FormField::checkbox("ac", "Air conditioning", true),
        ];
        apply_submitted(&mut fields, &submitted(&[("name", "New")]));
        assert_eq!(fields[0].value, "New");
        assert_eq!(fields[1].value, "");
    }

    #[test]
    fn field_values_split_lines_and_read_flags() {
        let raw: BTreeMap<String, String> = [
            ("amenities".to_string(), "Pool\n\n  Spa \nWifi".to_string()),
            ("ac".to_string(), "on".to_string()),
            ("price".to_string(), "abc".to_string()),
        ]
        .into_iter()
        .collect();
        let values = FieldValues(&raw);

        assert_eq!(values.lines("amenities"), vec!["Pool", "Spa", "Wifi"]);
        assert!(values.flag("ac"));
        assert!(!values.flag("missing"));
        assert_eq!(values.number("price", "Price"), Err(FormError::NotNumeric("Price")));
        assert_eq!(values.optional_number("seating", "Seating"), Ok(None));
    }
}
