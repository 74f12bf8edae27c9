//! Schema validation of registration records with per-field messages

use jsonschema::error::ValidationErrorKind;
use jsonschema::{validator_for, ValidationError as JsonSchemaError, Validator as JsonValidator};
use miette::{Diagnostic, NamedSource, SourceSpan};
use serde::Serialize;
use serde_json::{json, Value as JsonValue};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::core::form::{FieldKey, FormValues};
use crate::schema::REGISTRATION_SCHEMA;

/// Errors loading the schema document itself
#[derive(Debug, Error, Diagnostic)]
pub enum SchemaError {
    #[error("Schema is not valid JSON: {0}")]
    #[diagnostic(code(regwiz::schema::parse))]
    Parse(String),

    #[error("Schema failed to compile: {0}")]
    #[diagnostic(code(regwiz::schema::compile))]
    Compile(String),
}

/// Per-field validation messages, at most one per field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error, Diagnostic)]
#[error("{} field(s) failed validation", .errors.len())]
#[diagnostic(
    code(regwiz::schema::field_errors),
    help("Correct the highlighted fields and try again")
)]
#[serde(transparent)]
pub struct FieldErrors {
    errors: BTreeMap<FieldKey, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: FieldKey) -> Option<&str> {
        self.errors.get(&key).map(String::as_str)
    }

    pub fn contains(&self, key: FieldKey) -> bool {
        self.errors.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Fields with errors, in record order
    pub fn fields(&self) -> Vec<FieldKey> {
        self.errors.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, &str)> {
        self.errors.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn remove(&mut self, key: FieldKey) {
        self.errors.remove(&key);
    }

    /// Replace the messages for every field present in `other`
    pub fn extend(&mut self, other: FieldErrors) {
        self.errors.extend(other.errors);
    }

    /// Keep the first message reported for a field
    fn insert_first(&mut self, key: FieldKey, message: String) {
        self.errors.entry(key).or_insert(message);
    }
}

/// Problems found in an untyped record
#[derive(Debug, Clone, Default, PartialEq, Eq, Error, Diagnostic)]
#[error(
    "{} record problem(s), {} field(s) failed validation",
    .record.len(),
    .fields.len()
)]
#[diagnostic(code(regwiz::schema::record_errors))]
pub struct RecordErrors {
    /// Problems with the record as a whole, such as a non-mapping document
    pub record: Vec<String>,
    pub fields: FieldErrors,
}

/// A single problem found in a record
#[derive(Debug, Clone)]
struct Violation {
    /// Field the problem belongs to, `None` for record-level problems
    field: Option<FieldKey>,
    /// Key to highlight in the source document
    key: String,
    message: String,
    hint: &'static str,
}

/// Error for a record file, with every problem labelled in the source
#[derive(Debug, Error, Diagnostic)]
#[error("Record validation failed: {summary}")]
#[diagnostic(code(regwiz::schema::record_invalid))]
pub struct RecordValidationError {
    summary: String,

    #[source_code]
    src: NamedSource<String>,

    #[related]
    violations: Vec<FieldViolation>,
}

/// One labelled problem inside a record file
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
pub struct FieldViolation {
    #[label("{}", self.hint)]
    span: SourceSpan,

    message: String,
    hint: String,

    #[help]
    help: Option<String>,
}

impl FieldViolation {
    pub fn new(message: String, hint: String, span: SourceSpan, help: Option<String>) -> Self {
        Self {
            span,
            message,
            hint,
            help,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl RecordValidationError {
    pub fn new(filename: &str, source: &str, violations: Vec<FieldViolation>) -> Self {
        let count = violations.len();
        let summary = if count == 1 {
            "1 error".to_string()
        } else {
            format!("{} errors", count)
        };
        Self {
            summary,
            src: NamedSource::new(filename, source.to_string()),
            violations,
        }
    }

    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }
}

/// Compiled registration schema plus the password confirmation rule
pub struct FormSchema {
    compiled: JsonValidator,
}

impl FormSchema {
    /// Compile the embedded registration schema
    pub fn new() -> Result<Self, SchemaError> {
        Self::from_source(REGISTRATION_SCHEMA)
    }

    pub fn from_source(source: &str) -> Result<Self, SchemaError> {
        let schema: JsonValue =
            serde_json::from_str(source).map_err(|e| SchemaError::Parse(e.to_string()))?;
        let compiled = validator_for(&schema).map_err(|e| SchemaError::Compile(e.to_string()))?;
        Ok(Self { compiled })
    }

    /// Validate `values`, reporting only problems in `fields`
    pub fn validate(&self, values: &FormValues, fields: &[FieldKey]) -> Result<(), FieldErrors> {
        let (_, errors) = self.partition(&record_json(values), fields);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate an untyped record, reporting field problems only in `fields`
    ///
    /// Every violation in scope is returned at once. Record-level problems
    /// (a non-mapping record, unknown keys) are always reported.
    pub fn validate_value(&self, record: &JsonValue, fields: &[FieldKey]) -> Result<(), RecordErrors> {
        let (record, fields) = self.partition(record, fields);
        if record.is_empty() && fields.is_empty() {
            Ok(())
        } else {
            Err(RecordErrors { record, fields })
        }
    }

    /// Split violations into record-level messages and in-scope field errors
    fn partition(&self, record: &JsonValue, fields: &[FieldKey]) -> (Vec<String>, FieldErrors) {
        let mut record_level = Vec::new();
        let mut errors = FieldErrors::new();
        for violation in self.violations(record) {
            match violation.field {
                Some(field) if fields.contains(&field) => {
                    errors.insert_first(field, violation.message)
                }
                Some(_) => {}
                None => record_level.push(violation.message),
            }
        }
        (record_level, errors)
    }

    /// Validate YAML or JSON record text, labelling each problem in the source
    ///
    /// Record-level problems (unknown keys, a non-mapping document) are always
    /// reported; field problems only for `fields`.
    pub fn check_source(
        &self,
        content: &str,
        filename: &str,
        fields: &[FieldKey],
    ) -> Result<(), RecordValidationError> {
        let yaml_value: serde_yml::Value = match serde_yml::from_str(content) {
            Ok(v) => v,
            Err(e) => {
                let span = find_error_span(content, e.location());
                let violation = FieldViolation::new(
                    format!("YAML parse error: {}", e),
                    "invalid YAML".to_string(),
                    span,
                    Some("Check the syntax - one `key: value` per line".to_string()),
                );
                return Err(RecordValidationError::new(filename, content, vec![violation]));
            }
        };

        let record: JsonValue = match serde_json::to_value(&yaml_value) {
            Ok(v) => v,
            Err(e) => {
                let violation = FieldViolation::new(
                    format!("Failed to convert record to JSON: {}", e),
                    "conversion error".to_string(),
                    (0, content.len()).into(),
                    None,
                );
                return Err(RecordValidationError::new(filename, content, vec![violation]));
            }
        };

        let mut seen: Vec<FieldKey> = Vec::new();
        let mut violations = Vec::new();
        for violation in self.violations(&record) {
            match violation.field {
                Some(field) if !fields.contains(&field) => continue,
                Some(field) if seen.contains(&field) => continue,
                Some(field) => seen.push(field),
                None => {}
            }
            let help = violation.field.and_then(help_for);
            violations.push(FieldViolation::new(
                violation.message,
                violation.hint.to_string(),
                find_path_span(content, &violation.key),
                help,
            ));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(RecordValidationError::new(filename, content, violations))
        }
    }

    /// Schema violations followed by the cross-field rule
    fn violations(&self, record: &JsonValue) -> Vec<Violation> {
        let mut violations: Vec<Violation> = self
            .compiled
            .iter_errors(record)
            .map(|e| error_to_violation(&e))
            .collect();

        if let Some(mismatch) = password_mismatch(record) {
            violations.push(mismatch);
        }

        violations
    }
}

/// Message shown when a field breaks its constraint
pub fn constraint_message(field: FieldKey) -> &'static str {
    match field {
        FieldKey::Name => "Name must be at least 2 characters",
        FieldKey::Email => "Invalid email address",
        FieldKey::Age => "You must be at least 18 years old",
        FieldKey::Country => "Country is required",
        FieldKey::Password => "Password must be at least 6 characters",
        FieldKey::ConfirmPassword => "Password confirmation must be at least 6 characters",
    }
}

/// Message attached to `confirmPassword` when the passwords differ
pub const PASSWORD_MISMATCH: &str = "Passwords must match";

fn record_json(values: &FormValues) -> JsonValue {
    json!({
        "name": values.name,
        "email": values.email,
        "age": values.age,
        "country": values.country,
        "password": values.password,
        "confirmPassword": values.confirm_password,
    })
}

/// The mismatch belongs to the confirmation field, never to `password`
fn password_mismatch(record: &JsonValue) -> Option<Violation> {
    let password = record.get(FieldKey::Password.as_str())?.as_str()?;
    let confirm = record.get(FieldKey::ConfirmPassword.as_str())?.as_str()?;
    (password != confirm).then(|| Violation {
        field: Some(FieldKey::ConfirmPassword),
        key: FieldKey::ConfirmPassword.as_str().to_string(),
        message: PASSWORD_MISMATCH.to_string(),
        hint: "does not match password",
    })
}

/// Convert a JSON Schema validation error to our violation format
fn error_to_violation(error: &JsonSchemaError) -> Violation {
    let path_key = error
        .instance_path
        .as_str()
        .split('/')
        .find(|s| !s.is_empty())
        .unwrap_or("")
        .to_string();

    match &error.kind {
        ValidationErrorKind::Required { property } => {
            let key = property
                .as_str()
                .map(|s| s.to_string())
                .unwrap_or_else(|| property.to_string());
            let field = key.parse::<FieldKey>().ok();
            let message = match field {
                Some(f) => format!("{} is required", f.label()),
                None => format!("Missing required field: {}", key),
            };
            Violation {
                field,
                key,
                message,
                hint: "required field missing",
            }
        }
        ValidationErrorKind::AdditionalProperties { unexpected } => Violation {
            field: None,
            key: unexpected.first().cloned().unwrap_or_default(),
            message: format!("Unknown field(s): {}", unexpected.join(", ")),
            hint: "unknown field",
        },
        kind => match path_key.parse::<FieldKey>() {
            Ok(field) => Violation {
                field: Some(field),
                message: field_message(field, kind),
                hint: format_error_hint(kind),
                key: path_key,
            },
            Err(_) => Violation {
                field: None,
                key: path_key,
                message: "Record must be a mapping of field names to values".to_string(),
                hint: format_error_hint(kind),
            },
        },
    }
}

fn field_message(field: FieldKey, kind: &ValidationErrorKind) -> String {
    match kind {
        ValidationErrorKind::Type { .. } if field == FieldKey::Age => {
            "Age must be a number".to_string()
        }
        ValidationErrorKind::Type { .. } => format!("{} must be text", field.label()),
        _ => constraint_message(field).to_string(),
    }
}

/// Generate a short hint for the error label
fn format_error_hint(kind: &ValidationErrorKind) -> &'static str {
    match kind {
        ValidationErrorKind::Type { .. } => "wrong type",
        ValidationErrorKind::Pattern { .. } => "not an email address",
        ValidationErrorKind::MinLength { .. } => "too short",
        ValidationErrorKind::Minimum { .. } => "too small",
        _ => "invalid value",
    }
}

fn help_for(field: FieldKey) -> Option<String> {
    match field {
        FieldKey::Email => Some("Use an address like ada@example.com".to_string()),
        FieldKey::Age => Some("Enter a whole number of 18 or more".to_string()),
        FieldKey::ConfirmPassword => Some("Repeat the password exactly".to_string()),
        _ => None,
    }
}

/// Find the span (byte offset, length) for a parse error location
fn find_error_span(content: &str, location: Option<serde_yml::Location>) -> SourceSpan {
    if let Some(loc) = location {
        let line = loc.line().saturating_sub(1);
        let column = loc.column().saturating_sub(1);

        let mut offset = 0;
        for (i, line_content) in content.lines().enumerate() {
            if i == line {
                offset += column;
                break;
            }
            offset += line_content.len() + 1;
        }

        let rest_of_content = &content[offset.min(content.len())..];
        let len = rest_of_content
            .find('\n')
            .unwrap_or(rest_of_content.len())
            .max(1);

        (offset.min(content.len()), len).into()
    } else {
        first_line_span(content)
    }
}

/// Span of `key` in the record, or the first line when it is absent
fn find_path_span(content: &str, key: &str) -> SourceSpan {
    if key.is_empty() {
        return first_line_span(content);
    }
    find_key_span(content, key).unwrap_or_else(|| first_line_span(content))
}

fn first_line_span(content: &str) -> SourceSpan {
    let len = content.find('\n').unwrap_or(content.len()).max(1);
    (0, len).into()
}

/// Find the span of a key in YAML or JSON content
fn find_key_span(content: &str, key: &str) -> Option<SourceSpan> {
    let yaml_pattern = format!("{}:", key);
    let json_pattern = format!("\"{}\"", key);

    let mut offset = 0;
    for line in content.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with(&yaml_pattern) || trimmed.starts_with(&json_pattern) {
            let indent = line.len() - trimmed.len();
            return Some((offset + indent, trimmed.len()).into());
        }
        offset += line.len() + 1;
    }
    None
}
