//! Static step table for the registration wizard

use serde::Serialize;

use crate::core::form::FieldKey;

/// How a field is entered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Text,
    Email,
    Number,
    Password,
}

impl InputKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputKind::Text => "text",
            InputKind::Email => "email",
            InputKind::Number => "number",
            InputKind::Password => "password",
        }
    }
}

/// A single input on a step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    pub key: FieldKey,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub kind: InputKind,
}

impl FieldDescriptor {
    const fn new(key: FieldKey, label: &'static str, kind: InputKind) -> Self {
        Self {
            key,
            label,
            placeholder: label,
            kind,
        }
    }
}

/// One page of the wizard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    pub id: &'static str,
    pub name: &'static str,
    pub fields: Vec<FieldDescriptor>,
}

impl Step {
    /// Keys gating advancement from this step
    pub fn field_keys(&self) -> Vec<FieldKey> {
        self.fields.iter().map(|f| f.key).collect()
    }
}

/// The registration steps, in order. The last one is the completion page
/// and carries no fields.
pub fn registration_steps() -> Vec<Step> {
    vec![
        Step {
            id: "Step 1",
            name: "Personal Information",
            fields: vec![
                FieldDescriptor::new(FieldKey::Name, "Name", InputKind::Text),
                FieldDescriptor::new(FieldKey::Email, "Email", InputKind::Email),
                FieldDescriptor::new(FieldKey::Age, "Age", InputKind::Number),
            ],
        },
        Step {
            id: "Step 2",
            name: "Location",
            fields: vec![FieldDescriptor::new(
                FieldKey::Country,
                "Country",
                InputKind::Text,
            )],
        },
        Step {
            id: "Step 3",
            name: "Security",
            fields: vec![
                FieldDescriptor::new(FieldKey::Password, "Password", InputKind::Password),
                FieldDescriptor::new(
                    FieldKey::ConfirmPassword,
                    "Confirm Password",
                    InputKind::Password,
                ),
            ],
        },
        Step {
            id: "Step 4",
            name: "Complete",
            fields: Vec::new(),
        },
    ]
}
