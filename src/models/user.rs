use chrono::{DateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::FromSqliteRow;
use crate::validation::{Validate, ValidationErrors};

/// The password hash never leaves the process: it is skipped on
/// serialization, so every API representation is already sanitized.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: String,
    pub email: Option<String>,
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl FromSqliteRow for User {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            username: row.get("username")?,
            password_hash: row.get("password_hash")?,
            first_name: row.get("first_name")?,
            email: row.get("email")?,
            profile_image: row.get("profile_image")?,
            created_at: row.get("created_at")?,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    pub username: String,
    pub password: String,
    pub first_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
}

impl Validate for CreateUser {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.username.trim().is_empty() {
            errors.add("username", "is required");
        } else if self.username.trim().len() < 3 {
            errors.add("username", "must be at least 3 characters");
        }
        if self.password.len() < 6 {
            errors.add("password", "must be at least 6 characters");
        }
        if self.first_name.trim().is_empty() {
            errors.add("firstName", "is required");
        }
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_user_has_no_password_hash() {
        let user = User {
            id: "u1".to_string(),
            username: "alice".to_string(),
            password_hash: "secret-hash".to_string(),
            first_name: "Alice".to_string(),
            email: None,
            profile_image: None,
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("passwordHash").is_none());
        assert!(value.get("password_hash").is_none());
        assert_eq!(value["username"], "alice");
    }

    #[test]
    fn test_short_password_rejected() {
        let data = CreateUser {
            username: "alice".to_string(),
            password: "12345".to_string(),
            first_name: "Alice".to_string(),
            email: None,
            profile_image: None,
        };
        let errors = data.validate().unwrap_err();
        assert!(errors.fields().any(|f| f == "password"));
    }

    #[test]
    fn test_valid_user_accepted() {
        let data = CreateUser {
            username: "alice".to_string(),
            password: "password123".to_string(),
            first_name: "Alice".to_string(),
            email: Some("alice@example.com".to_string()),
            profile_image: None,
        };
        assert!(data.validate().is_ok());
    }
}
