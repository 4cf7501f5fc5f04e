use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::model::{DoctorPatch, DoctorView, PatientView};
use crate::domain::service::Service;
use crate::infra::storage::{self as storage};

impl Service {
    /// All doctors, newest first, identities populated.
    pub async fn list_doctors(&self) -> Result<Vec<DoctorView>, DomainError> {
        let models = storage::doctors::find_all(self.db()).await?;
        let mut views = Vec::with_capacity(models.len());
        for model in models {
            views.push(self.doctor_view(model).await?);
        }
        Ok(views)
    }

    pub async fn get_doctor(&self, id: Uuid) -> Result<DoctorView, DomainError> {
        let model = storage::doctors::find_by_id(self.db(), id)
            .await?
            .ok_or(DomainError::DoctorNotFound)?;
        self.doctor_view(model).await
    }

    pub async fn doctor_by_user(&self, user_id: Uuid) -> Result<DoctorView, DomainError> {
        let model = storage::doctors::find_by_user(self.db(), user_id)
            .await?
            .ok_or(DomainError::DoctorNotFound)?;
        self.doctor_view(model).await
    }

    /// Case-insensitive substring match on specialization, available doctors
    /// only, most experienced first.
    pub async fn doctors_by_specialization(
        &self,
        specialization: &str,
    ) -> Result<Vec<DoctorView>, DomainError> {
        let models = storage::doctors::find_by_specialization(self.db(), specialization).await?;
        let mut views = Vec::with_capacity(models.len());
        for model in models {
            views.push(self.doctor_view(model).await?);
        }
        Ok(views)
    }

    pub async fn update_doctor(
        &self,
        id: Uuid,
        patch: DoctorPatch,
    ) -> Result<DoctorView, DomainError> {
        storage::doctors::find_by_id(self.db(), id)
            .await?
            .ok_or(DomainError::DoctorNotFound)?;

        let availability = match patch.availability {
            Some(a) => {
                Some(serde_json::to_value(a).map_err(|e| DomainError::database(e.to_string()))?)
            }
            None => None,
        };

        let model = storage::doctors::update(
            self.db(),
            id,
            storage::doctors::UpdateDoctorEntity {
                specialization: patch.specialization,
                phone: patch.phone,
                experience_years: patch.experience_years,
                availability,
                is_available: patch.is_available,
                updated_at: Some(Utc::now()),
            },
        )
        .await?;

        self.doctor_view(model).await
    }

    /// Cascade: unassign patients pointing at the doctor, delete its
    /// appointments, then the doctor itself. Independent writes, no rollback.
    pub async fn delete_doctor(&self, id: Uuid) -> Result<(), DomainError> {
        storage::doctors::find_by_id(self.db(), id)
            .await?
            .ok_or(DomainError::DoctorNotFound)?;

        let unassigned = storage::patients::unassign_doctor(self.db(), id).await?;
        let removed = storage::appointments::delete_by_doctor(self.db(), id).await?;
        storage::doctors::delete(self.db(), id).await?;

        info!(doctor = %id, unassigned, appointments = removed, "doctor deleted");
        Ok(())
    }

    /// Admin operation: point the patient's assigned-doctor reference at the
    /// given doctor and return the populated patient.
    pub async fn assign_patient(
        &self,
        doctor_id: Uuid,
        patient_id: Uuid,
    ) -> Result<PatientView, DomainError> {
        storage::doctors::find_by_id(self.db(), doctor_id)
            .await?
            .ok_or(DomainError::DoctorNotFound)?;
        storage::patients::find_by_id(self.db(), patient_id)
            .await?
            .ok_or(DomainError::PatientNotFound)?;

        let model = storage::patients::set_assigned_doctor(
            self.db(),
            patient_id,
            doctor_id,
            Utc::now(),
        )
        .await?;

        self.patient_view(model).await
    }
}
