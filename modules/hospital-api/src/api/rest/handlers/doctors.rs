use axum::extract::{Path, State};
use axum::Extension;
use tracing::info;
use uuid::Uuid;

use crate::api::rest::dto::{DoctorDto, MessageDto, PatientDto, UpdateDoctorReq};
use crate::api::rest::error::{ApiError, Json};
use crate::api::rest::AppState;
use crate::domain::model::{AuthenticatedUser, Role};

pub async fn list_doctors(
    State(state): State<AppState>,
) -> Result<Json<Vec<DoctorDto>>, ApiError> {
    let views = state.service.list_doctors().await?;
    Ok(Json(views.into_iter().map(Into::into).collect()))
}

pub async fn get_doctor(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DoctorDto>, ApiError> {
    let view = state.service.get_doctor(id).await?;
    Ok(Json(view.into()))
}

/// Doctor profile looked up by its owning identity.
pub async fn get_doctor_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<DoctorDto>, ApiError> {
    let view = state.service.doctor_by_user(user_id).await?;
    Ok(Json(view.into()))
}

/// Case-insensitive specialization search, available doctors only.
pub async fn doctors_by_specialization(
    State(state): State<AppState>,
    Path(specialization): Path<String>,
) -> Result<Json<Vec<DoctorDto>>, ApiError> {
    let views = state
        .service
        .doctors_by_specialization(&specialization)
        .await?;
    Ok(Json(views.into_iter().map(Into::into).collect()))
}

pub async fn update_doctor(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateDoctorReq>,
) -> Result<Json<DoctorDto>, ApiError> {
    user.require_role(&[Role::Admin, Role::Doctor])?;
    info!(caller = %user.id, doctor = %id, "updating doctor");

    let view = state.service.update_doctor(id, req.into()).await?;
    Ok(Json(view.into()))
}

/// Delete a doctor: unassign its patients, drop its appointments, then the
/// record itself.
pub async fn delete_doctor(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageDto>, ApiError> {
    user.require_role(&[Role::Admin])?;
    info!(caller = %user.id, doctor = %id, "deleting doctor");

    state.service.delete_doctor(id).await?;
    Ok(Json(MessageDto::new("Doctor deleted successfully")))
}

/// Point a patient's assigned-doctor reference at the given doctor.
pub async fn assign_patient(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path((doctor_id, patient_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<PatientDto>, ApiError> {
    user.require_role(&[Role::Admin])?;
    info!(caller = %user.id, doctor = %doctor_id, patient = %patient_id, "assigning patient");

    let view = state.service.assign_patient(doctor_id, patient_id).await?;
    Ok(Json(view.into()))
}
