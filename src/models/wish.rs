//! Wish model matching the frontend Wish shape.

use serde::{Deserialize, Serialize};

use super::require_text;
use crate::errors::AppError;

/// A message left on a birthday page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wish {
    pub id: String,
    pub page_id: String,
    /// Display name of the sender
    pub name: String,
    pub message: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Request body for creating a new wish.
///
/// Every field is optional at the decoding stage so that a missing field
/// surfaces as a validation error instead of a body rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWishRequest {
    #[serde(default, alias = "birthdayId")]
    pub page_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A validated wish ready to be inserted.
#[derive(Debug, Clone)]
pub struct NewWish {
    page_id: String,
    name: String,
    message: String,
}

impl NewWish {
    pub fn new(
        page_id: Option<&str>,
        name: Option<&str>,
        message: Option<&str>,
    ) -> Result<Self, AppError> {
        Ok(Self {
            page_id: require_text(page_id, "Birthday id is required")?,
            name: require_text(name, "Name is required")?,
            message: require_text(message, "Message is required")?,
        })
    }

    pub fn page_id(&self) -> &str {
        &self.page_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl TryFrom<&CreateWishRequest> for NewWish {
    type Error = AppError;

    fn try_from(request: &CreateWishRequest) -> Result<Self, Self::Error> {
        NewWish::new(
            request.page_id.as_deref(),
            request.name.as_deref(),
            request.message.as_deref(),
        )
    }
}
