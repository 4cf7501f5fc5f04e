use crate::domain::error::DomainError;
use crate::domain::model::{
    Appointment, AppointmentStatus, Doctor, Patient, Role, User, WeeklyAvailability,
};
use crate::infra::storage::{appointments, doctors, patients, users};

/// Convert a user row to the domain model. Role strings are only ever
/// written from `Role::as_str`, so an unknown value is corrupt data.
pub fn user_to_domain(entity: users::Model) -> Result<User, DomainError> {
    let role = Role::parse(&entity.role)
        .ok_or_else(|| DomainError::database(format!("unknown role '{}'", entity.role)))?;
    Ok(User {
        id: entity.id,
        name: entity.name,
        email: entity.email,
        password_hash: entity.password_hash,
        role,
        is_active: entity.is_active,
        created_at: entity.created_at,
        updated_at: entity.updated_at,
    })
}

pub fn patient_to_domain(entity: patients::Model) -> Patient {
    Patient {
        id: entity.id,
        user_id: entity.user_id,
        assigned_doctor_id: entity.assigned_doctor_id,
        date_of_birth: entity.date_of_birth,
        gender: entity.gender,
        phone: entity.phone,
        address: entity.address,
        created_at: entity.created_at,
        updated_at: entity.updated_at,
    }
}

pub fn doctor_to_domain(entity: doctors::Model) -> Result<Doctor, DomainError> {
    let availability: WeeklyAvailability = serde_json::from_value(entity.availability)
        .map_err(|e| DomainError::database(format!("bad availability JSON: {e}")))?;
    Ok(Doctor {
        id: entity.id,
        user_id: entity.user_id,
        specialization: entity.specialization,
        license_number: entity.license_number,
        phone: entity.phone,
        experience_years: entity.experience_years,
        availability,
        is_available: entity.is_available,
        created_at: entity.created_at,
        updated_at: entity.updated_at,
    })
}

pub fn appointment_to_domain(entity: appointments::Model) -> Result<Appointment, DomainError> {
    let status = AppointmentStatus::parse(&entity.status)
        .ok_or_else(|| DomainError::database(format!("unknown status '{}'", entity.status)))?;
    Ok(Appointment {
        id: entity.id,
        patient_id: entity.patient_id,
        doctor_id: entity.doctor_id,
        date: entity.date,
        time: entity.time,
        status,
        reason: entity.reason,
        notes: entity.notes,
        diagnosis: entity.diagnosis,
        prescription: entity.prescription,
        follow_up_date: entity.follow_up_date,
        is_urgent: entity.is_urgent,
        created_at: entity.created_at,
        updated_at: entity.updated_at,
    })
}
