//! Share API endpoint.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use super::{json_body, ApiResult};
use crate::models::{ShareReceipt, ShareRequest};
use crate::share::share_birthday;
use crate::AppState;

/// POST /api/share - Email a birthday link to a list of recipients.
pub async fn create_share(
    State(state): State<AppState>,
    body: Result<Json<ShareRequest>, JsonRejection>,
) -> ApiResult<Json<ShareReceipt>> {
    let request = json_body(body)?;

    let receipt = share_birthday(
        &state.repo,
        state.mailer.as_ref(),
        &state.config.app_url,
        &state.config.mail.from_name,
        &request,
    )
    .await?;

    Ok(Json(receipt))
}
