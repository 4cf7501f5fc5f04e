use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::model::{
    AppointmentFilter, AppointmentPatch, AppointmentStatus, AppointmentView, AuthenticatedUser,
    NewAppointment,
};
use crate::domain::service::Service;
use crate::infra::storage::{self as storage};

/// Empty strings on updates are treated as absent rather than clearing the
/// stored value.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

impl Service {
    /// Book a slot. The patient is either given explicitly or resolved from
    /// the caller's own profile. An explicit `patient_id` is not checked
    /// against the caller; see the design notes.
    pub async fn create_appointment(
        &self,
        caller: &AuthenticatedUser,
        new: NewAppointment,
    ) -> Result<AppointmentView, DomainError> {
        let patient = match new.patient_id {
            Some(patient_id) => storage::patients::find_by_id(self.db(), patient_id).await?,
            None => storage::patients::find_by_user(self.db(), caller.id).await?,
        }
        .ok_or(DomainError::PatientNotFound)?;

        let doctor = storage::doctors::find_by_id(self.db(), new.doctor_id)
            .await?
            .ok_or(DomainError::DoctorNotFound)?;

        // Check-then-act: two concurrent requests can both pass this check.
        // The slot index is deliberately non-unique; see the design notes.
        if storage::appointments::slot_taken(self.db(), doctor.id, new.date, &new.time).await? {
            return Err(DomainError::SlotTaken);
        }

        let now = Utc::now();
        let model = storage::appointments::create(
            self.db(),
            storage::appointments::NewAppointmentEntity {
                id: Uuid::new_v4(),
                patient_id: patient.id,
                doctor_id: doctor.id,
                date: new.date,
                time: new.time,
                status: AppointmentStatus::Scheduled.as_str().to_string(),
                reason: new.reason,
                notes: new.notes,
                is_urgent: new.is_urgent,
                created_at: now,
                updated_at: now,
            },
        )
        .await?;

        info!(appointment = %model.id, doctor = %doctor.id, date = %model.date, time = %model.time, "appointment booked");

        self.appointment_view(model).await
    }

    pub async fn list_appointments(
        &self,
        filter: &AppointmentFilter,
    ) -> Result<Vec<AppointmentView>, DomainError> {
        let models = storage::appointments::find_filtered(self.db(), filter).await?;
        let mut views = Vec::with_capacity(models.len());
        for model in models {
            views.push(self.appointment_view(model).await?);
        }
        Ok(views)
    }

    /// Appointments of the caller's own patient profile.
    pub async fn my_appointments(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<AppointmentView>, DomainError> {
        let patient = storage::patients::find_by_user(self.db(), user_id)
            .await?
            .ok_or(DomainError::PatientNotFound)?;
        let models = storage::appointments::find_by_patient(self.db(), patient.id).await?;
        let mut views = Vec::with_capacity(models.len());
        for model in models {
            views.push(self.appointment_view(model).await?);
        }
        Ok(views)
    }

    /// Appointments of the caller's own doctor profile.
    pub async fn doctor_appointments(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<AppointmentView>, DomainError> {
        let doctor = storage::doctors::find_by_user(self.db(), user_id)
            .await?
            .ok_or(DomainError::DoctorNotFound)?;
        let models = storage::appointments::find_by_doctor(self.db(), doctor.id).await?;
        let mut views = Vec::with_capacity(models.len());
        for model in models {
            views.push(self.appointment_view(model).await?);
        }
        Ok(views)
    }

    pub async fn get_appointment(&self, id: Uuid) -> Result<AppointmentView, DomainError> {
        let model = storage::appointments::find_by_id(self.db(), id)
            .await?
            .ok_or(DomainError::AppointmentNotFound)?;
        self.appointment_view(model).await
    }

    /// Partial update. Any status value may replace any other; there is no
    /// transition table.
    pub async fn update_appointment(
        &self,
        id: Uuid,
        patch: AppointmentPatch,
    ) -> Result<AppointmentView, DomainError> {
        storage::appointments::find_by_id(self.db(), id)
            .await?
            .ok_or(DomainError::AppointmentNotFound)?;

        let model = storage::appointments::update(
            self.db(),
            id,
            storage::appointments::UpdateAppointmentEntity {
                status: patch.status.map(|s| s.as_str().to_string()),
                notes: non_empty(patch.notes),
                diagnosis: non_empty(patch.diagnosis),
                prescription: non_empty(patch.prescription),
                follow_up_date: patch.follow_up_date,
                updated_at: Some(Utc::now()),
            },
        )
        .await?;

        self.appointment_view(model).await
    }

    pub async fn delete_appointment(&self, id: Uuid) -> Result<(), DomainError> {
        let deleted = storage::appointments::delete(self.db(), id).await?;
        if !deleted {
            return Err(DomainError::AppointmentNotFound);
        }
        info!(appointment = %id, "appointment deleted");
        Ok(())
    }
}
