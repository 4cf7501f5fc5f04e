use thiserror::Error;

use crate::domain::model::Role;

/// Domain-specific errors using thiserror. The messages are what the API
/// layer returns in `{message}` bodies, so the authentication variants stay
/// deliberately vague about which check failed.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Not authorized")]
    Unauthenticated,

    #[error("User role {role} is not authorized to access this route")]
    Forbidden { role: Role },

    #[error("User not found")]
    UserNotFound,

    #[error("Patient not found")]
    PatientNotFound,

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Appointment not found")]
    AppointmentNotFound,

    #[error("User already exists")]
    EmailTaken { email: String },

    #[error("License number already registered")]
    LicenseTaken { license: String },

    #[error("Time slot already booked")]
    SlotTaken,

    #[error("{field}: {message}")]
    Validation { field: String, message: String },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn forbidden(role: Role) -> Self {
        Self::Forbidden { role }
    }

    pub fn email_taken(email: impl Into<String>) -> Self {
        Self::EmailTaken {
            email: email.into(),
        }
    }

    pub fn license_taken(license: impl Into<String>) -> Self {
        Self::LicenseTaken {
            license: license.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::database(err.to_string())
    }
}
