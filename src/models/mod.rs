//! Data models for the Birthday Wishes application.
//!
//! These models match the frontend JSON shapes exactly for seamless interoperability.

mod birthday;
mod share;
mod wish;

pub use birthday::*;
pub use share::*;
pub use wish::*;

use crate::errors::AppError;

/// Return the value unchanged, or a validation error when it is absent or blank.
pub(crate) fn require_text(value: Option<&str>, message: &str) -> Result<String, AppError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.to_string()),
        _ => Err(AppError::Validation(message.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_birthday_requires_name() {
        assert!(NewBirthday::new(None, "").is_err());
        assert!(NewBirthday::new(Some("   "), "").is_err());

        let birthday = NewBirthday::new(Some("  Ada "), "").unwrap();
        assert_eq!(birthday.name(), "  Ada ");
        assert_eq!(birthday.image_url(), "");
    }

    #[test]
    fn test_new_wish_reports_first_missing_field() {
        let err = NewWish::new(Some("page"), Some("Bob"), Some("")).unwrap_err();
        assert_eq!(err.message(), "Message is required");

        let err = NewWish::new(None, Some("Bob"), Some("hi")).unwrap_err();
        assert_eq!(err.message(), "Birthday id is required");
    }

    #[test]
    fn test_new_wish_keeps_surrounding_whitespace() {
        let wish = NewWish::new(Some("page"), Some(" Bob "), Some("  Happy\nbday!\n\n  ")).unwrap();
        assert_eq!(wish.name(), " Bob ");
        assert_eq!(wish.message(), "  Happy\nbday!\n\n  ");
    }

    #[test]
    fn test_wish_request_accepts_legacy_birthday_id() {
        let request: CreateWishRequest = serde_json::from_str(
            r#"{"birthdayId": "abc", "name": "Bob", "message": "Happy bday!"}"#,
        )
        .unwrap();
        let wish = NewWish::try_from(&request).unwrap();
        assert_eq!(wish.page_id(), "abc");
    }

    #[test]
    fn test_recipients_from_array_and_string() {
        let request: ShareRequest =
            serde_json::from_str(r#"{"pageId": "p", "emails": ["a@x.io", " ", "b@x.io"]}"#)
                .unwrap();
        assert_eq!(
            request.emails.unwrap().addresses(),
            vec!["a@x.io".to_string(), "b@x.io".to_string()]
        );

        let request: ShareRequest =
            serde_json::from_str(r#"{"birthdayId": "p", "emails": "a@x.io, b@x.io,"}"#).unwrap();
        assert_eq!(request.page_id.as_deref(), Some("p"));
        assert_eq!(request.emails.unwrap().addresses().len(), 2);
    }

    #[test]
    fn test_summary_serializes_camel_case() {
        let summary = BirthdaySummary {
            id: "1".into(),
            name: "Ada".into(),
            image_url: String::new(),
            wish_count: 3,
            created_at: "2026-01-01T00:00:00.000Z".into(),
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["wishCount"], 3);
        assert_eq!(json["imageUrl"], "");
    }
}
