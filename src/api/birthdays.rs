//! Birthday API endpoints.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, Path, State,
    },
    Json,
};

use super::{ApiResult, Created};
use crate::errors::AppError;
use crate::models::{require_text, Birthday, BirthdaySummary, ImageUpload, NewBirthday};
use crate::AppState;

/// Fields collected from the multipart creation form.
#[derive(Debug, Default)]
struct BirthdayForm {
    name: Option<String>,
    image: Option<ImageUpload>,
}

/// POST /api/birthday - Create a birthday, uploading the image first if one is attached.
pub async fn create_birthday(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Created<Birthday>> {
    let multipart =
        multipart.map_err(|e| AppError::from_body_rejection(e.status(), e.body_text()))?;
    let form = read_form(multipart).await?;

    // Validate before touching the image host
    let name = require_text(form.name.as_deref(), "Name is required")?;

    let image_url = match form.image {
        Some(image) => state.images.upload(image).await?,
        None => String::new(),
    };

    let new = NewBirthday::new(Some(&name), image_url)?;
    let birthday = state.repo.create_birthday(&new).await?;
    tracing::info!("Created birthday {} ({})", birthday.id, birthday.name);

    Ok(Created(birthday))
}

/// GET /api/birthday - List all birthdays with their wish counts, newest first.
pub async fn list_birthdays(State(state): State<AppState>) -> ApiResult<Json<Vec<BirthdaySummary>>> {
    let birthdays = state.repo.list_birthdays_with_wish_counts().await?;
    Ok(Json(birthdays))
}

/// GET /api/birthday/:id - Get a single birthday.
pub async fn get_birthday(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Birthday>> {
    match state.repo.get_birthday(&id).await? {
        Some(birthday) => Ok(Json(birthday)),
        None => Err(AppError::birthday_not_found()),
    }
}

async fn read_form(mut multipart: Multipart) -> ApiResult<BirthdayForm> {
    let mut form = BirthdayForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "name" => {
                let text = field.text().await.map_err(multipart_error)?;
                form.name = Some(text);
            }
            "image" => {
                let file_name = field.file_name().unwrap_or("image").to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(multipart_error)?;

                // Browsers send an empty part when no file was chosen
                if bytes.is_empty() {
                    continue;
                }
                form.image = Some(ImageUpload {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            other => tracing::debug!("Ignoring unexpected form field {:?}", other),
        }
    }

    Ok(form)
}

fn multipart_error(e: MultipartError) -> AppError {
    AppError::from_body_rejection(e.status(), e.body_text())
}
