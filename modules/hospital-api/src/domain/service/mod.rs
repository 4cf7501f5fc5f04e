use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::domain::auth::TokenSigner;
use crate::domain::error::DomainError;
use crate::domain::model::{
    AppointmentView, DoctorView, PatientView, UserSummary,
};
use crate::infra::storage::{self as storage, mapper};

mod analytics;
mod appointments;
mod doctors;
mod identity;
mod patients;

/// Domain service: one pooled connection handle plus the token signer,
/// shared read-only across request handlers.
pub struct Service {
    db: DatabaseConnection,
    tokens: TokenSigner,
}

impl Service {
    pub fn new(db: DatabaseConnection, tokens: TokenSigner) -> Self {
        Self { db, tokens }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn issue_token(&self, user_id: Uuid) -> Result<String, DomainError> {
        self.tokens.issue(user_id)
    }

    pub(crate) fn tokens(&self) -> &TokenSigner {
        &self.tokens
    }

    /// Load the identity summary a profile reference points at. A profile
    /// whose owner row is gone is corrupt data, not a caller error.
    pub(crate) async fn user_summary(&self, user_id: Uuid) -> Result<UserSummary, DomainError> {
        let user = storage::users::find_by_id(&self.db, user_id)
            .await?
            .ok_or_else(|| DomainError::database(format!("dangling user reference {user_id}")))?;
        let user = mapper::user_to_domain(user)?;
        Ok(UserSummary::from(&user))
    }

    pub(crate) async fn doctor_view(
        &self,
        model: storage::doctors::Model,
    ) -> Result<DoctorView, DomainError> {
        let doctor = mapper::doctor_to_domain(model)?;
        let user = self.user_summary(doctor.user_id).await?;
        Ok(DoctorView { doctor, user })
    }

    pub(crate) async fn patient_view(
        &self,
        model: storage::patients::Model,
    ) -> Result<PatientView, DomainError> {
        let patient = mapper::patient_to_domain(model);
        let user = self.user_summary(patient.user_id).await?;

        let assigned_doctor = match patient.assigned_doctor_id {
            Some(doctor_id) => match storage::doctors::find_by_id(&self.db, doctor_id).await? {
                Some(doctor) => Some(self.doctor_view(doctor).await?),
                None => None,
            },
            None => None,
        };

        Ok(PatientView {
            patient,
            user,
            assigned_doctor,
        })
    }

    pub(crate) async fn appointment_view(
        &self,
        model: storage::appointments::Model,
    ) -> Result<AppointmentView, DomainError> {
        let appointment = mapper::appointment_to_domain(model)?;

        let patient_model = storage::patients::find_by_id(&self.db, appointment.patient_id)
            .await?
            .ok_or(DomainError::PatientNotFound)?;
        let patient = mapper::patient_to_domain(patient_model);
        let patient_user = self.user_summary(patient.user_id).await?;

        let doctor_model = storage::doctors::find_by_id(&self.db, appointment.doctor_id)
            .await?
            .ok_or(DomainError::DoctorNotFound)?;
        let doctor = mapper::doctor_to_domain(doctor_model)?;
        let doctor_user = self.user_summary(doctor.user_id).await?;

        Ok(AppointmentView {
            appointment,
            patient,
            patient_user,
            doctor,
            doctor_user,
        })
    }
}
