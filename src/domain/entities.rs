//! Domain entities representing core business concepts

use serde::{Deserialize, Serialize};

use super::errors::DomainError;
use super::value_objects::{EmailAddress, UserId};

/// Maximum length of the name and department fields
pub const MAX_FIELD_LENGTH: usize = 100;

/// A persisted user record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: EmailAddress,
    pub department: String,
}

impl User {
    /// Replace every field except the identifier with the values of a validated draft
    pub fn apply(&mut self, profile: UserProfile) {
        self.first_name = profile.first_name;
        self.last_name = profile.last_name;
        self.email = profile.email;
        self.department = profile.department;
    }
}

/// Validated, trimmed user fields ready to be persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: EmailAddress,
    pub department: String,
}

impl UserProfile {
    pub fn into_user(self, id: UserId) -> User {
        User {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            department: self.department,
        }
    }
}

/// Unvalidated user fields as received from a client.
///
/// Any field may be missing; [`UserDraft::validate`] reports every problem at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDraft {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
}

impl UserDraft {
    /// Validate every field, collecting all failures
    pub fn validate(self) -> Result<UserProfile, DomainError> {
        let mut errors = Vec::new();

        let first_name = required_text("firstName", self.first_name, &mut errors);
        let last_name = required_text("lastName", self.last_name, &mut errors);
        let department = required_text("department", self.department, &mut errors);

        let email = match self.email.as_deref().map(EmailAddress::parse) {
            Some(Ok(email)) => Some(email),
            Some(Err(message)) => {
                errors.push(message);
                None
            }
            None => {
                errors.push("email is required.".to_string());
                None
            }
        };

        match (first_name, last_name, email, department) {
            (Some(first_name), Some(last_name), Some(email), Some(department)) => Ok(UserProfile {
                first_name,
                last_name,
                email,
                department,
            }),
            _ => Err(DomainError::Validation { errors }),
        }
    }
}

fn required_text(field: &str, value: Option<String>, errors: &mut Vec<String>) -> Option<String> {
    let value = value.as_deref().map(str::trim).unwrap_or_default();

    if value.is_empty() {
        errors.push(format!("{} is required.", field));
        return None;
    }

    if value.chars().count() > MAX_FIELD_LENGTH {
        errors.push(format!(
            "{} must be at most {} characters.",
            field, MAX_FIELD_LENGTH
        ));
        return None;
    }

    Some(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> UserDraft {
        UserDraft {
            first_name: Some(" Ada ".to_string()),
            last_name: Some("Lovelace".to_string()),
            email: Some("Ada@Example.com".to_string()),
            department: Some("Engineering".to_string()),
        }
    }

    #[test]
    fn valid_draft_is_trimmed() {
        let profile = draft().validate().unwrap();
        assert_eq!(profile.first_name, "Ada");
        assert_eq!(profile.email.as_str(), "Ada@Example.com");
    }

    #[test]
    fn empty_draft_reports_every_field() {
        let err = UserDraft::default().validate().unwrap_err();
        match err {
            DomainError::Validation { errors } => {
                assert_eq!(errors.len(), 4);
                assert!(errors.contains(&"firstName is required.".to_string()));
                assert!(errors.contains(&"lastName is required.".to_string()));
                assert!(errors.contains(&"email is required.".to_string()));
                assert!(errors.contains(&"department is required.".to_string()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn blank_and_overlong_fields_are_rejected() {
        let mut input = draft();
        input.last_name = Some("   ".to_string());
        input.department = Some("x".repeat(MAX_FIELD_LENGTH + 1));
        input.email = Some("not-an-email".to_string());

        let DomainError::Validation { errors } = input.validate().unwrap_err() else {
            panic!("expected validation error");
        };
        assert_eq!(
            errors,
            vec![
                "lastName is required.".to_string(),
                "department must be at most 100 characters.".to_string(),
                "email is not a valid email address.".to_string(),
            ]
        );
    }

    #[test]
    fn apply_keeps_identifier() {
        let mut user = draft().validate().unwrap().into_user(UserId::new(7));
        let mut replacement = draft();
        replacement.first_name = Some("Grace".to_string());
        replacement.email = Some("grace@example.com".to_string());

        user.apply(replacement.validate().unwrap());

        assert_eq!(user.id, UserId::new(7));
        assert_eq!(user.first_name, "Grace");
        assert_eq!(user.email.as_str(), "grace@example.com");
    }
}
