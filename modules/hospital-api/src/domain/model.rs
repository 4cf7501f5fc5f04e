use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account role. Stored as a lowercase string, carried on every
/// authenticated request for role checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Doctor,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Patient => "patient",
            Role::Doctor => "doctor",
            Role::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "patient" => Some(Role::Patient),
            "doctor" => Some(Role::Doctor),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Appointment lifecycle status. The set of values is closed but the
/// transitions are not: any authorized update may set any status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "scheduled" => Some(AppointmentStatus::Scheduled),
            "confirmed" => Some(AppointmentStatus::Confirmed),
            "completed" => Some(AppointmentStatus::Completed),
            "cancelled" => Some(AppointmentStatus::Cancelled),
            _ => None,
        }
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full identity record. The password hash never crosses the API boundary;
/// DTO conversions drop it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Identity summary used when populating references for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// The caller resolved by the authorization gate, hash already stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl AuthenticatedUser {
    /// Role check: pass through when the caller's role is in the allow-list.
    pub fn require_role(&self, allowed: &[Role]) -> Result<(), crate::domain::error::DomainError> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(crate::domain::error::DomainError::forbidden(self.role))
        }
    }
}

impl From<&User> for AuthenticatedUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// Result of register/login: identity summary plus a freshly signed token.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: AuthenticatedUser,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patient {
    pub id: Uuid,
    pub user_id: Uuid,
    pub assigned_doctor_id: Option<Uuid>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One start/end pair of a doctor's weekly availability table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySlot {
    pub start: String,
    pub end: String,
}

/// Seven optional start/end pairs, persisted as a JSON column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeeklyAvailability {
    pub monday: Option<DaySlot>,
    pub tuesday: Option<DaySlot>,
    pub wednesday: Option<DaySlot>,
    pub thursday: Option<DaySlot>,
    pub friday: Option<DaySlot>,
    pub saturday: Option<DaySlot>,
    pub sunday: Option<DaySlot>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Doctor {
    pub id: Uuid,
    pub user_id: Uuid,
    pub specialization: String,
    pub license_number: String,
    pub phone: Option<String>,
    pub experience_years: i32,
    pub availability: WeeklyAvailability,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub time: String,
    pub status: AppointmentStatus,
    pub reason: String,
    pub notes: Option<String>,
    pub diagnosis: Option<String>,
    pub prescription: Option<String>,
    pub follow_up_date: Option<NaiveDate>,
    pub is_urgent: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Doctor with its owning identity populated.
#[derive(Debug, Clone)]
pub struct DoctorView {
    pub doctor: Doctor,
    pub user: UserSummary,
}

/// Patient with its owning identity and assigned doctor populated.
#[derive(Debug, Clone)]
pub struct PatientView {
    pub patient: Patient,
    pub user: UserSummary,
    pub assigned_doctor: Option<DoctorView>,
}

/// Appointment with both profiles and their identities populated.
#[derive(Debug, Clone)]
pub struct AppointmentView {
    pub appointment: Appointment,
    pub patient: Patient,
    pub patient_user: UserSummary,
    pub doctor: Doctor,
    pub doctor_user: UserSummary,
}

/// Role-specific profile returned by the profile endpoint.
#[derive(Debug, Clone)]
pub enum RoleProfile {
    Patient(Patient),
    Doctor(Doctor),
}

/// Registration input. Profile fields beyond the identity ones apply to the
/// profile record created for the chosen role.
#[derive(Debug, Clone, Default)]
pub struct NewRegistration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Option<Role>,
    pub profile: ProfileFields,
}

/// Extra fields accepted at registration and profile update. Patient and
/// doctor fields share one bag; the role decides which half applies.
#[derive(Debug, Clone, Default)]
pub struct ProfileFields {
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub specialization: Option<String>,
    pub license_number: Option<String>,
    pub experience_years: Option<i32>,
    pub availability: Option<WeeklyAvailability>,
    pub is_available: Option<bool>,
}

/// Partial update of the caller's identity + role profile.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub profile: ProfileFields,
}

#[derive(Debug, Clone, Default)]
pub struct PatientPatch {
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct DoctorPatch {
    pub specialization: Option<String>,
    pub phone: Option<String>,
    pub experience_years: Option<i32>,
    pub availability: Option<WeeklyAvailability>,
    pub is_available: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub patient_id: Option<Uuid>,
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub time: String,
    pub reason: String,
    pub notes: Option<String>,
    pub is_urgent: bool,
}

/// Partial appointment update. Empty strings are dropped by the service
/// instead of clearing the stored value.
#[derive(Debug, Clone, Default)]
pub struct AppointmentPatch {
    pub status: Option<AppointmentStatus>,
    pub notes: Option<String>,
    pub diagnosis: Option<String>,
    pub prescription: Option<String>,
    pub follow_up_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default)]
pub struct AppointmentFilter {
    pub status: Option<AppointmentStatus>,
    pub date: Option<NaiveDate>,
    pub doctor_id: Option<Uuid>,
}

/// One analytics bucket: ISO week label and patient count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekBucket {
    pub week: String,
    pub count: u64,
}

/// Admin dashboard counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub total_users: u64,
    pub total_patients: u64,
    pub total_doctors: u64,
    pub total_appointments: u64,
}
