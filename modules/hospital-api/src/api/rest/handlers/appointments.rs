use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Extension;
use tracing::info;
use uuid::Uuid;

use crate::api::rest::dto::{
    AppointmentDto, AppointmentsQuery, CreateAppointmentReq, MessageDto, UpdateAppointmentReq,
};
use crate::api::rest::error::{ApiError, Json};
use crate::api::rest::AppState;
use crate::domain::model::{AuthenticatedUser, Role};

/// Book an appointment slot.
pub async fn create_appointment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(req): Json<CreateAppointmentReq>,
) -> Result<(StatusCode, Json<AppointmentDto>), ApiError> {
    user.require_role(&[Role::Admin, Role::Doctor])?;
    info!(caller = %user.id, doctor = %req.doctor_id, "creating appointment");

    let view = state.service.create_appointment(&user, req.into()).await?;
    Ok((StatusCode::CREATED, Json(view.into())))
}

/// Filtered appointment listing for admin/doctor dashboards.
pub async fn list_appointments(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<AppointmentsQuery>,
) -> Result<Json<Vec<AppointmentDto>>, ApiError> {
    user.require_role(&[Role::Admin, Role::Doctor])?;

    let views = state.service.list_appointments(&query.into()).await?;
    Ok(Json(views.into_iter().map(Into::into).collect()))
}

/// Appointments of the caller's own patient profile.
pub async fn my_appointments(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<AppointmentDto>>, ApiError> {
    let views = state.service.my_appointments(user.id).await?;
    Ok(Json(views.into_iter().map(Into::into).collect()))
}

/// Appointments of the caller's own doctor profile.
pub async fn doctor_appointments(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<AppointmentDto>>, ApiError> {
    let views = state.service.doctor_appointments(user.id).await?;
    Ok(Json(views.into_iter().map(Into::into).collect()))
}

pub async fn get_appointment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AppointmentDto>, ApiError> {
    let view = state.service.get_appointment(id).await?;
    Ok(Json(view.into()))
}

/// Partial update of status and clinical fields.
pub async fn update_appointment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateAppointmentReq>,
) -> Result<Json<AppointmentDto>, ApiError> {
    user.require_role(&[Role::Admin, Role::Doctor])?;
    info!(caller = %user.id, appointment = %id, "updating appointment");

    let view = state.service.update_appointment(id, req.into()).await?;
    Ok(Json(view.into()))
}

pub async fn delete_appointment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageDto>, ApiError> {
    user.require_role(&[Role::Admin])?;
    info!(caller = %user.id, appointment = %id, "deleting appointment");

    state.service.delete_appointment(id).await?;
    Ok(Json(MessageDto::new("Appointment deleted successfully")))
}
