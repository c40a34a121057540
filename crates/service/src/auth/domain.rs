use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::errors::AuthError;

/// Null, numbers and other non-string values count as a missing field.
fn string_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        _ => String::new(),
    })
}

/// Registration input
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterInput {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub email: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub password: String,
}

impl RegisterInput {
    /// All three fields must be present and non-empty. Values are otherwise opaque.
    pub fn validate(&self) -> Result<(), AuthError> {
        let missing: Vec<&str> = [("name", &self.name), ("email", &self.email), ("password", &self.password)]
            .into_iter()
            .filter(|(_, v)| v.is_empty())
            .map(|(k, _)| k)
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(AuthError::Validation(format!("missing fields: {}", missing.join(", "))))
        }
    }
}

/// Login input
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginInput {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub email: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub password: String,
}

/// Persisted account record. `password` always holds the PHC hash string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub name: String,
    pub email: String,
    #[serde(rename = "password")]
    pub password_hash: String,
}

/// Successful outcome of a store operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Registered,
    Authenticated,
}

impl Confirmation {
    pub fn message(&self) -> &'static str {
        match self {
            Confirmation::Registered => "Registration successful!",
            Confirmation::Authenticated => "Login successful!",
        }
    }
}
