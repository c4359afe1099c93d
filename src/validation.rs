use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Structural validation for insert/update payloads. Types and shape are
/// enforced by serde; `validate` adds requiredness, catalog membership and
/// range checks on top.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Field-level error messages, keyed by the JSON field name.
#[derive(Debug, Default, Serialize)]
pub struct ValidationErrors {
    #[serde(flatten)]
    errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }
}

/// Deserialize an arbitrary JSON value into a payload type and validate it,
/// collecting everything into field-level errors.
pub fn parse_body<T>(value: serde_json::Value) -> Result<T, ValidationErrors>
where
    T: DeserializeOwned + Validate,
{
    let parsed: T = serde_json::from_value(value)
        .map_err(|e| ValidationErrors::single("body", e.to_string()))?;
    parsed.validate()?;
    Ok(parsed)
}

/// Add an error unless `value` is one of the catalog entries.
pub fn check_catalog(
    errors: &mut ValidationErrors,
    field: &str,
    value: &str,
    catalog: &[&str],
) {
    if !catalog.contains(&value) {
        errors.add(field, format!("must be one of: {}", catalog.join(", ")));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_errors_pass() {
        assert!(ValidationErrors::new().into_result().is_ok());
    }

    #[test]
    fn test_errors_accumulate_per_field() {
        let mut errors = ValidationErrors::new();
        errors.add("username", "is required");
        errors.add("username", "must be at least 3 characters");
        errors.add("password", "is required");

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["username"].as_array().unwrap().len(), 2);
        assert_eq!(json["password"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_check_catalog() {
        let mut errors = ValidationErrors::new();
        check_catalog(&mut errors, "experienceLevel", "Beginner", &["Beginner", "Advanced"]);
        assert!(errors.is_empty());

        check_catalog(&mut errors, "experienceLevel", "Expert", &["Beginner", "Advanced"]);
        assert!(!errors.is_empty());
    }
}
