use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::model::{
    Appointment, AppointmentFilter, AppointmentPatch, AppointmentStatus, AppointmentView,
    AuthSession, Doctor, DoctorPatch, DoctorView, NewAppointment, NewRegistration, Patient,
    PatientPatch, PatientView, ProfileFields, ProfileUpdate, Role, RoleProfile, Stats, User,
    WeekBucket, WeeklyAvailability,
};

/// Registration request. Fields beyond the identity ones feed the profile
/// record created for the chosen role; irrelevant extras are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterReq {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Option<Role>,
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

impl From<RegisterReq> for NewRegistration {
    fn from(req: RegisterReq) -> Self {
        Self {
            name: req.name,
            email: req.email,
            password: req.password,
            role: req.role,
            profile: ProfileFields {
                date_of_birth: req.date_of_birth,
                gender: req.gender,
                phone: req.phone,
                address: req.address,
                specialization: req.specialization,
                license_number: req.license_number,
                experience_years: req.experience_years,
                availability: req.availability,
                is_available: req.is_available,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginReq {
    pub email: String,
    pub password: String,
}

/// Identity summary plus token, returned by register/login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthRes {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub token: String,
}

impl From<AuthSession> for AuthRes {
    fn from(session: AuthSession) -> Self {
        Self {
            id: session.user.id,
            name: session.user.name,
            email: session.user.email,
            role: session.user.role,
            token: session.token,
        }
    }
}

/// Full identity representation; the password hash never appears here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummaryDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<crate::domain::model::UserSummary> for UserSummaryDto {
    fn from(summary: crate::domain::model::UserSummary) -> Self {
        Self {
            id: summary.id,
            name: summary.name,
            email: summary.email,
        }
    }
}

/// Unpopulated patient profile, as returned by the profile endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientProfileDto {
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

impl From<Patient> for PatientProfileDto {
    fn from(patient: Patient) -> Self {
        Self {
            id: patient.id,
            user_id: patient.user_id,
            assigned_doctor_id: patient.assigned_doctor_id,
            date_of_birth: patient.date_of_birth,
            gender: patient.gender,
            phone: patient.phone,
            address: patient.address,
            created_at: patient.created_at,
            updated_at: patient.updated_at,
        }
    }
}

/// Unpopulated doctor profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorProfileDto {
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

impl From<Doctor> for DoctorProfileDto {
    fn from(doctor: Doctor) -> Self {
        Self {
            id: doctor.id,
            user_id: doctor.user_id,
            specialization: doctor.specialization,
            license_number: doctor.license_number,
            phone: doctor.phone,
            experience_years: doctor.experience_years,
            availability: doctor.availability,
            is_available: doctor.is_available,
            created_at: doctor.created_at,
            updated_at: doctor.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ProfileDto {
    Patient(PatientProfileDto),
    Doctor(DoctorProfileDto),
}

impl From<RoleProfile> for ProfileDto {
    fn from(profile: RoleProfile) -> Self {
        match profile {
            RoleProfile::Patient(p) => ProfileDto::Patient(p.into()),
            RoleProfile::Doctor(d) => ProfileDto::Doctor(d.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileRes {
    pub user: UserDto,
    pub profile: Option<ProfileDto>,
    pub token: String,
}

/// Partial update of the caller's identity and role profile.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileReq {
    pub name: Option<String>,
    pub email: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub specialization: Option<String>,
    pub experience_years: Option<i32>,
    pub availability: Option<WeeklyAvailability>,
    pub is_available: Option<bool>,
}

impl From<UpdateProfileReq> for ProfileUpdate {
    fn from(req: UpdateProfileReq) -> Self {
        Self {
            name: req.name,
            email: req.email,
            profile: ProfileFields {
                date_of_birth: req.date_of_birth,
                gender: req.gender,
                phone: req.phone,
                address: req.address,
                specialization: req.specialization,
                license_number: None,
                experience_years: req.experience_years,
                availability: req.availability,
                is_available: req.is_available,
            },
        }
    }
}

/// Doctor with identity populated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorDto {
    pub id: Uuid,
    pub user: UserSummaryDto,
    pub specialization: String,
    pub license_number: String,
    pub phone: Option<String>,
    pub experience_years: i32,
    pub availability: WeeklyAvailability,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DoctorView> for DoctorDto {
    fn from(view: DoctorView) -> Self {
        Self {
            id: view.doctor.id,
            user: view.user.into(),
            specialization: view.doctor.specialization,
            license_number: view.doctor.license_number,
            phone: view.doctor.phone,
            experience_years: view.doctor.experience_years,
            availability: view.doctor.availability,
            is_available: view.doctor.is_available,
            created_at: view.doctor.created_at,
            updated_at: view.doctor.updated_at,
        }
    }
}

/// Patient with identity and assigned doctor populated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientDto {
    pub id: Uuid,
    pub user: UserSummaryDto,
    pub assigned_doctor: Option<DoctorDto>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PatientView> for PatientDto {
    fn from(view: PatientView) -> Self {
        Self {
            id: view.patient.id,
            user: view.user.into(),
            assigned_doctor: view.assigned_doctor.map(Into::into),
            date_of_birth: view.patient.date_of_birth,
            gender: view.patient.gender,
            phone: view.patient.phone,
            address: view.patient.address,
            created_at: view.patient.created_at,
            updated_at: view.patient.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePatientReq {
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl From<UpdatePatientReq> for PatientPatch {
    fn from(req: UpdatePatientReq) -> Self {
        Self {
            date_of_birth: req.date_of_birth,
            gender: req.gender,
            phone: req.phone,
            address: req.address,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDoctorReq {
    pub specialization: Option<String>,
    pub phone: Option<String>,
    pub experience_years: Option<i32>,
    pub availability: Option<WeeklyAvailability>,
    pub is_available: Option<bool>,
}

impl From<UpdateDoctorReq> for DoctorPatch {
    fn from(req: UpdateDoctorReq) -> Self {
        Self {
            specialization: req.specialization,
            phone: req.phone,
            experience_years: req.experience_years,
            availability: req.availability,
            is_available: req.is_available,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentReq {
    pub patient_id: Option<Uuid>,
    pub doctor_id: Uuid,
    pub appointment_date: NaiveDate,
    pub appointment_time: String,
    pub reason: String,
    pub notes: Option<String>,
    pub is_urgent: Option<bool>,
}

impl From<CreateAppointmentReq> for NewAppointment {
    fn from(req: CreateAppointmentReq) -> Self {
        Self {
            patient_id: req.patient_id,
            doctor_id: req.doctor_id,
            date: req.appointment_date,
            time: req.appointment_time,
            reason: req.reason,
            notes: req.notes,
            is_urgent: req.is_urgent.unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppointmentReq {
    pub status: Option<AppointmentStatus>,
    pub notes: Option<String>,
    pub diagnosis: Option<String>,
    pub prescription: Option<String>,
    pub follow_up_date: Option<NaiveDate>,
}

impl From<UpdateAppointmentReq> for AppointmentPatch {
    fn from(req: UpdateAppointmentReq) -> Self {
        Self {
            status: req.status,
            notes: req.notes,
            diagnosis: req.diagnosis,
            prescription: req.prescription,
            follow_up_date: req.follow_up_date,
        }
    }
}

/// Query filters for the admin/doctor appointment listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentsQuery {
    pub status: Option<AppointmentStatus>,
    pub date: Option<NaiveDate>,
    pub doctor_id: Option<Uuid>,
}

impl From<AppointmentsQuery> for AppointmentFilter {
    fn from(query: AppointmentsQuery) -> Self {
        Self {
            status: query.status,
            date: query.date,
            doctor_id: query.doctor_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentPatientDto {
    pub id: Uuid,
    pub user: UserSummaryDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentDoctorDto {
    pub id: Uuid,
    pub user: UserSummaryDto,
    pub specialization: String,
}

/// Appointment with both parties and their identities populated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDto {
    pub id: Uuid,
    pub patient: AppointmentPatientDto,
    pub doctor: AppointmentDoctorDto,
    pub appointment_date: NaiveDate,
    pub appointment_time: String,
    pub status: AppointmentStatus,
    pub reason: String,
    pub notes: Option<String>,
    pub diagnosis: Option<String>,
    pub prescription: Option<String>,
    pub follow_up_date: Option<NaiveDate>,
    pub is_urgent: bool,
    pub created_at: DateTime<Utc>,
}

impl From<AppointmentView> for AppointmentDto {
    fn from(view: AppointmentView) -> Self {
        let Appointment {
            id,
            date,
            time,
            status,
            reason,
            notes,
            diagnosis,
            prescription,
            follow_up_date,
            is_urgent,
            created_at,
            ..
        } = view.appointment;

        Self {
            id,
            patient: AppointmentPatientDto {
                id: view.patient.id,
                user: view.patient_user.into(),
            },
            doctor: AppointmentDoctorDto {
                id: view.doctor.id,
                user: view.doctor_user.into(),
                specialization: view.doctor.specialization,
            },
            appointment_date: date,
            appointment_time: time,
            status,
            reason,
            notes,
            diagnosis,
            prescription,
            follow_up_date,
            is_urgent,
            created_at,
        }
    }
}

/// Admin dashboard counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsDto {
    pub total_users: u64,
    pub total_patients: u64,
    pub total_doctors: u64,
    pub total_appointments: u64,
}

impl From<Stats> for StatsDto {
    fn from(stats: Stats) -> Self {
        Self {
            total_users: stats.total_users,
            total_patients: stats.total_patients,
            total_doctors: stats.total_doctors,
            total_appointments: stats.total_appointments,
        }
    }
}

/// One analytics bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekBucketDto {
    pub week: String,
    pub count: u64,
}

impl From<WeekBucket> for WeekBucketDto {
    fn from(bucket: WeekBucket) -> Self {
        Self {
            week: bucket.week,
            count: bucket.count,
        }
    }
}

/// Plain `{message}` body used by logout, deletes and profile updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDto {
    pub message: String,
}

impl MessageDto {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
