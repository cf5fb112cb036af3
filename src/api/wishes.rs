//! Wish API endpoints.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

use super::{json_body, ApiResult, Created};
use crate::models::{CreateWishRequest, NewWish, Wish};
use crate::AppState;

/// POST /api/wish - Leave a wish on a birthday.
pub async fn create_wish(
    State(state): State<AppState>,
    body: Result<Json<CreateWishRequest>, JsonRejection>,
) -> ApiResult<Created<Wish>> {
    let request = json_body(body)?;
    let new = NewWish::try_from(&request)?;

    let wish = state.repo.create_wish(&new).await?;
    tracing::debug!("Created wish {} on birthday {}", wish.id, wish.page_id);

    Ok(Created(wish))
}

/// GET /api/wish/:pageId - List wishes for a birthday, newest first.
pub async fn list_wishes(
    State(state): State<AppState>,
    Path(page_id): Path<String>,
) -> ApiResult<Json<Vec<Wish>>> {
    let wishes = state.repo.list_wishes_for_birthday(&page_id).await?;
    Ok(Json(wishes))
}
