//! Schema system - record validation and the embedded registration schema

pub mod validator;

pub use validator::{FieldErrors, FormSchema, RecordErrors, RecordValidationError, SchemaError};

/// JSON Schema for a registration record, embedded at compile time
pub const REGISTRATION_SCHEMA: &str = include_str!("../../schemas/registration.schema.json");
