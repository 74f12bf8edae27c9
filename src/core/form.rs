//! Registration record and its field keys

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Keys of the fields collected by the wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKey {
    Name,
    Email,
    Age,
    Country,
    Password,
    ConfirmPassword,
}

impl FieldKey {
    /// Wire name of the field, as used in record files and the schema
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKey::Name => "name",
            FieldKey::Email => "email",
            FieldKey::Age => "age",
            FieldKey::Country => "country",
            FieldKey::Password => "password",
            FieldKey::ConfirmPassword => "confirmPassword",
        }
    }

    /// Human label shown next to the input
    pub fn label(&self) -> &'static str {
        match self {
            FieldKey::Name => "Name",
            FieldKey::Email => "Email",
            FieldKey::Age => "Age",
            FieldKey::Country => "Country",
            FieldKey::Password => "Password",
            FieldKey::ConfirmPassword => "Confirm Password",
        }
    }

    /// Whether the value must be hidden when echoed back
    pub fn is_secret(&self) -> bool {
        matches!(self, FieldKey::Password | FieldKey::ConfirmPassword)
    }

    /// All field keys in record order
    pub fn all() -> &'static [FieldKey] {
        &[
            FieldKey::Name,
            FieldKey::Email,
            FieldKey::Age,
            FieldKey::Country,
            FieldKey::Password,
            FieldKey::ConfirmPassword,
        ]
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error parsing a field key
#[derive(Debug, Error)]
#[error("unknown field '{0}' (expected one of: name, email, age, country, password, confirmPassword)")]
pub struct UnknownField(pub String);

impl FromStr for FieldKey {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldKey::all()
            .iter()
            .find(|k| k.as_str() == s)
            .copied()
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

/// Error turning an untyped record into form values
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordShapeError {
    #[error("record must be a mapping of field names to values")]
    NotAMapping,

    #[error("field '{0}' must be a single value, not a list or mapping")]
    NotScalar(FieldKey),
}

/// The record being built by the wizard
///
/// `age` is `None` when the typed text was not a whole number, so the
/// schema can report it as a type failure instead of silently coercing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormValues {
    pub name: String,
    pub email: String,
    pub age: Option<i64>,
    pub country: String,
    pub password: String,
    pub confirm_password: String,
}

impl Default for FormValues {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            age: Some(18),
            country: String::new(),
            password: String::new(),
            confirm_password: String::new(),
        }
    }
}

impl FormValues {
    /// Build values from an untyped record
    ///
    /// Each scalar is applied as the text a user would have typed, so a
    /// non-numeric age becomes `None` and is reported by validation. Missing
    /// keys keep their defaults; unknown keys are ignored.
    pub fn from_record(record: &JsonValue) -> Result<Self, RecordShapeError> {
        let map = record.as_object().ok_or(RecordShapeError::NotAMapping)?;
        let mut values = Self::default();
        for key in FieldKey::all() {
            let raw = match map.get(key.as_str()) {
                None => continue,
                Some(JsonValue::Null) => String::new(),
                Some(JsonValue::String(s)) => s.clone(),
                Some(v @ (JsonValue::Number(_) | JsonValue::Bool(_))) => v.to_string(),
                Some(JsonValue::Array(_) | JsonValue::Object(_)) => {
                    return Err(RecordShapeError::NotScalar(*key))
                }
            };
            values.set_field(*key, &raw);
        }
        Ok(values)
    }

    /// Update a field from the raw text typed by the user
    pub fn set_field(&mut self, key: FieldKey, raw: &str) {
        match key {
            FieldKey::Name => self.name = raw.to_string(),
            FieldKey::Email => self.email = raw.to_string(),
            FieldKey::Age => self.age = raw.trim().parse().ok(),
            FieldKey::Country => self.country = raw.to_string(),
            FieldKey::Password => self.password = raw.to_string(),
            FieldKey::ConfirmPassword => self.confirm_password = raw.to_string(),
        }
    }

    /// Current value of a field as display text
    pub fn get_field(&self, key: FieldKey) -> String {
        match key {
            FieldKey::Name => self.name.clone(),
            FieldKey::Email => self.email.clone(),
            FieldKey::Age => self.age.map(|a| a.to_string()).unwrap_or_default(),
            FieldKey::Country => self.country.clone(),
            FieldKey::Password => self.password.clone(),
            FieldKey::ConfirmPassword => self.confirm_password.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let values = FormValues::default();
        assert_eq!(values.age, Some(18));
        assert!(values.name.is_empty());
        assert!(values.confirm_password.is_empty());
    }

    #[test]
    fn test_field_key_parse() {
        assert_eq!("confirmPassword".parse::<FieldKey>().unwrap(), FieldKey::ConfirmPassword);
        assert_eq!("age".parse::<FieldKey>().unwrap(), FieldKey::Age);
        assert!("confirm_password".parse::<FieldKey>().is_err());
    }

    #[test]
    fn test_set_age_parses_integer() {
        let mut values = FormValues::default();
        values.set_field(FieldKey::Age, " 42 ");
        assert_eq!(values.age, Some(42));
        values.set_field(FieldKey::Age, "forty");
        assert_eq!(values.age, None);
        assert_eq!(values.get_field(FieldKey::Age), "");
    }

    #[test]
    fn test_serde_uses_camel_case() {
        let mut values = FormValues::default();
        values.set_field(FieldKey::ConfirmPassword, "secret1");
        let json = serde_json::to_value(&values).unwrap();
        assert_eq!(json["confirmPassword"], "secret1");
        assert_eq!(json["age"], 18);
    }

    #[test]
    fn test_partial_record_fills_defaults() {
        let values: FormValues = serde_yml::from_str("name: Ada\n").unwrap();
        assert_eq!(values.name, "Ada");
        assert_eq!(values.age, Some(18));
        assert!(values.email.is_empty());
    }

    #[test]
    fn test_from_record_keeps_bad_age_for_validation() {
        let record = serde_json::json!({ "name": "Ada", "age": "seventeen" });
        let values = FormValues::from_record(&record).unwrap();
        assert_eq!(values.name, "Ada");
        assert_eq!(values.age, None);
    }

    #[test]
    fn test_from_record_takes_scalars_as_text() {
        let record = serde_json::json!({ "name": 42, "age": 36, "country": null, "extra": true });
        let values = FormValues::from_record(&record).unwrap();
        assert_eq!(values.name, "42");
        assert_eq!(values.age, Some(36));
        assert!(values.country.is_empty());
        assert!(values.email.is_empty());
    }

    #[test]
    fn test_from_record_rejects_wrong_shapes() {
        assert_eq!(
            FormValues::from_record(&serde_json::json!(["Ada"])),
            Err(RecordShapeError::NotAMapping)
        );
        assert_eq!(
            FormValues::from_record(&serde_json::json!({ "email": ["a@b.co"] })),
            Err(RecordShapeError::NotScalar(FieldKey::Email))
        );
    }
}
