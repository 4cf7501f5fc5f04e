use axum::extract::{Path, State};
use axum::Extension;
use tracing::info;
use uuid::Uuid;

use crate::api::rest::dto::{MessageDto, PatientDto, UpdatePatientReq};
use crate::api::rest::error::{ApiError, Json};
use crate::api::rest::AppState;
use crate::domain::model::{AuthenticatedUser, Role};

pub async fn list_patients(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<PatientDto>>, ApiError> {
    user.require_role(&[Role::Admin, Role::Doctor])?;

    let views = state.service.list_patients().await?;
    Ok(Json(views.into_iter().map(Into::into).collect()))
}

pub async fn get_patient(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PatientDto>, ApiError> {
    let view = state.service.get_patient(id).await?;
    Ok(Json(view.into()))
}

/// Patient profile looked up by its owning identity.
pub async fn get_patient_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<PatientDto>, ApiError> {
    let view = state.service.patient_by_user(user_id).await?;
    Ok(Json(view.into()))
}

pub async fn update_patient(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePatientReq>,
) -> Result<Json<PatientDto>, ApiError> {
    user.require_role(&[Role::Admin, Role::Doctor])?;
    info!(caller = %user.id, patient = %id, "updating patient");

    let view = state.service.update_patient(id, req.into()).await?;
    Ok(Json(view.into()))
}

/// Delete a patient and every appointment referencing it.
pub async fn delete_patient(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageDto>, ApiError> {
    user.require_role(&[Role::Admin])?;
    info!(caller = %user.id, patient = %id, "deleting patient");

    state.service.delete_patient(id).await?;
    Ok(Json(MessageDto::new("Patient deleted successfully")))
}

/// Patients assigned to the given doctor.
pub async fn assigned_patients(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Vec<PatientDto>>, ApiError> {
    user.require_role(&[Role::Admin, Role::Doctor])?;

    let views = state.service.assigned_patients(doctor_id).await?;
    Ok(Json(views.into_iter().map(Into::into).collect()))
}
