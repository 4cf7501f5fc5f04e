use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::model::{PatientPatch, PatientView};
use crate::domain::service::Service;
use crate::infra::storage::{self as storage};

impl Service {
    /// All patients, newest first, identities and assigned doctors populated.
    pub async fn list_patients(&self) -> Result<Vec<PatientView>, DomainError> {
        let models = storage::patients::find_all(self.db()).await?;
        let mut views = Vec::with_capacity(models.len());
        for model in models {
            views.push(self.patient_view(model).await?);
        }
        Ok(views)
    }

    pub async fn get_patient(&self, id: Uuid) -> Result<PatientView, DomainError> {
        let model = storage::patients::find_by_id(self.db(), id)
            .await?
            .ok_or(DomainError::PatientNotFound)?;
        self.patient_view(model).await
    }

    pub async fn patient_by_user(&self, user_id: Uuid) -> Result<PatientView, DomainError> {
        let model = storage::patients::find_by_user(self.db(), user_id)
            .await?
            .ok_or(DomainError::PatientNotFound)?;
        self.patient_view(model).await
    }

    pub async fn update_patient(
        &self,
        id: Uuid,
        patch: PatientPatch,
    ) -> Result<PatientView, DomainError> {
        storage::patients::find_by_id(self.db(), id)
            .await?
            .ok_or(DomainError::PatientNotFound)?;

        let model = storage::patients::update(
            self.db(),
            id,
            storage::patients::UpdatePatientEntity {
                date_of_birth: patch.date_of_birth,
                gender: patch.gender,
                phone: patch.phone,
                address: patch.address,
                updated_at: Some(Utc::now()),
            },
        )
        .await?;

        self.patient_view(model).await
    }

    /// Cascade: delete the patient's appointments, then the patient itself.
    /// The writes are independent; a failure mid-way leaves no rollback.
    pub async fn delete_patient(&self, id: Uuid) -> Result<(), DomainError> {
        storage::patients::find_by_id(self.db(), id)
            .await?
            .ok_or(DomainError::PatientNotFound)?;

        let removed = storage::appointments::delete_by_patient(self.db(), id).await?;
        storage::patients::delete(self.db(), id).await?;

        info!(patient = %id, appointments = removed, "patient deleted");
        Ok(())
    }

    pub async fn assigned_patients(
        &self,
        doctor_id: Uuid,
    ) -> Result<Vec<PatientView>, DomainError> {
        let models = storage::patients::find_by_assigned_doctor(self.db(), doctor_id).await?;
        let mut views = Vec::with_capacity(models.len());
        for model in models {
            views.push(self.patient_view(model).await?);
        }
        Ok(views)
    }
}
