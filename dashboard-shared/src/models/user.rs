use serde::{Deserialize, Serialize};

/// A dashboard account as reported by `/user/` and `/users/`.
///
/// Read-only on the client: nothing here is ever written back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// Server-assigned identifier.
    pub id: i64,

    /// Login name.
    pub username: String,

    /// Contact address; may be empty.
    #[serde(default)]
    pub email: String,

    /// Given name; may be empty.
    #[serde(default)]
    pub first_name: String,

    /// Family name; may be empty.
    #[serde(default)]
    pub last_name: String,
}

impl User {
    /// Returns `"first last"` trimmed, or `None` when both parts are blank.
    #[must_use]
    pub fn full_name(&self) -> Option<String> {
        let joined = format!("{} {}", self.first_name, self.last_name);
        let trimmed = joined.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// Email for display, `-` when absent.
    #[must_use]
    pub fn email_or_dash(&self) -> &str {
        if self.email.is_empty() { "-" } else { &self.email }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(first: &str, last: &str) -> User {
        User {
            id: 1,
            username: "alice".to_string(),
            email: String::new(),
            first_name: first.to_string(),
            last_name: last.to_string(),
        }
    }

    #[test]
    fn test_full_name_joins_parts() {
        assert_eq!(user("Alice", "Smith").full_name().as_deref(), Some("Alice Smith"));
    }

    #[test]
    fn test_full_name_trims_missing_part() {
        assert_eq!(user("", "Smith").full_name().as_deref(), Some("Smith"));
        assert_eq!(user("Alice", "").full_name().as_deref(), Some("Alice"));
    }

    #[test]
    fn test_full_name_none_when_blank() {
        assert_eq!(user("", "").full_name(), None);
    }

    #[test]
    fn test_email_or_dash() {
        let mut u = user("", "");
        assert_eq!(u.email_or_dash(), "-");
        u.email = "alice@example.com".to_string();
        assert_eq!(u.email_or_dash(), "alice@example.com");
    }

    #[test]
    fn test_profile_without_name_fields_deserializes() {
        let u: User =
            serde_json::from_str(r#"{"id":7,"username":"bob","email":"bob@example.com"}"#).unwrap();
        assert_eq!(u.id, 7);
        assert!(u.first_name.is_empty());
        assert!(u.last_name.is_empty());
    }
}
