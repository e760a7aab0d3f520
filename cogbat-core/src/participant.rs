use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fields as submitted by the collection form, not yet validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParticipantForm {
    pub identifier: String,
    pub attributes: Vec<(String, String)>,
}

impl ParticipantForm {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            attributes: Vec::new(),
        }
    }

    pub fn field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Every field is required; values are stored trimmed.
    pub fn validate(&self) -> Result<Participant, ParticipantError> {
        let identifier = self.identifier.trim();
        if identifier.is_empty() {
            return Err(ParticipantError::MissingIdentifier);
        }
        let mut attributes = Vec::with_capacity(self.attributes.len());
        for (key, value) in &self.attributes {
            let key = key.trim();
            let value = value.trim();
            if key.is_empty() {
                return Err(ParticipantError::UnnamedField);
            }
            if value.is_empty() {
                return Err(ParticipantError::EmptyField(key.to_string()));
            }
            if attributes.iter().any(|(k, _): &(String, String)| k == key) {
                return Err(ParticipantError::DuplicateField(key.to_string()));
            }
            attributes.push((key.to_string(), value.to_string()));
        }
        Ok(Participant {
            identifier: identifier.to_string(),
            attributes,
        })
    }
}

/// Validated participant record, immutable for the session's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    identifier: String,
    attributes: Vec<(String, String)>,
}

impl Participant {
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Attributes in submission order.
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParticipantError {
    #[error("participant identifier is empty")]
    MissingIdentifier,
    #[error("participant field has no name")]
    UnnamedField,
    #[error("participant field `{0}` is empty")]
    EmptyField(String),
    #[error("participant field `{0}` was given twice")]
    DuplicateField(String),
}
