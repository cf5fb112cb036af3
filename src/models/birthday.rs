//! Birthday page model matching the frontend Birthday shape.

use serde::{Deserialize, Serialize};

use super::require_text;
use crate::errors::AppError;

/// A birthday page that wishes are left against.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Birthday {
    pub id: String,
    pub name: String,
    /// Empty when no image was uploaded
    pub image_url: String,
    pub created_at: String,
    pub updated_at: String,
}

/// A birthday listing row annotated with how many wishes it has.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BirthdaySummary {
    pub id: String,
    pub name: String,
    pub image_url: String,
    pub wish_count: i64,
    pub created_at: String,
}

/// A validated birthday ready to be inserted.
#[derive(Debug, Clone)]
pub struct NewBirthday {
    name: String,
    image_url: String,
}

impl NewBirthday {
    pub fn new(name: Option<&str>, image_url: impl Into<String>) -> Result<Self, AppError> {
        Ok(Self {
            name: require_text(name, "Name is required")?,
            image_url: image_url.into(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }
}

/// An image file received with a birthday creation request.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}
