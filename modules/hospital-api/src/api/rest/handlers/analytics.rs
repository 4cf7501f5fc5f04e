use axum::extract::State;
use axum::response::Json;

use crate::api::rest::dto::WeekBucketDto;
use crate::api::rest::error::ApiError;
use crate::api::rest::AppState;

/// Six ISO-week buckets of patient registrations, oldest first.
///
/// Deliberately wired without the authorization gate; see the design notes
/// before changing this.
pub async fn patients_per_week(
    State(state): State<AppState>,
) -> Result<Json<Vec<WeekBucketDto>>, ApiError> {
    let buckets = state.service.patients_per_week().await?;
    Ok(Json(buckets.into_iter().map(Into::into).collect()))
}
