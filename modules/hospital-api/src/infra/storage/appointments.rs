use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::domain::model::{AppointmentFilter, AppointmentStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "appointments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub time: String,
    pub status: String,
    pub reason: String,
    pub notes: Option<String>,
    pub diagnosis: Option<String>,
    pub prescription: Option<String>,
    pub follow_up_date: Option<NaiveDate>,
    pub is_urgent: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Data for creating a new appointment row.
pub struct NewAppointmentEntity {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub time: String,
    pub status: String,
    pub reason: String,
    pub notes: Option<String>,
    pub is_urgent: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update of an appointment row.
#[derive(Default)]
pub struct UpdateAppointmentEntity {
    pub status: Option<String>,
    pub notes: Option<String>,
    pub diagnosis: Option<String>,
    pub prescription: Option<String>,
    pub follow_up_date: Option<NaiveDate>,
    pub updated_at: Option<DateTime<Utc>>,
}

pub async fn find_by_id(db: &DatabaseConnection, id: Uuid) -> Result<Option<Model>, DbErr> {
    Entity::find_by_id(id).one(db).await
}

/// Filtered listing ordered by date then time.
pub async fn find_filtered(
    db: &DatabaseConnection,
    filter: &AppointmentFilter,
) -> Result<Vec<Model>, DbErr> {
    let mut query = Entity::find();

    if let Some(status) = filter.status {
        query = query.filter(Column::Status.eq(status.as_str()));
    }
    if let Some(date) = filter.date {
        query = query.filter(Column::Date.eq(date));
    }
    if let Some(doctor_id) = filter.doctor_id {
        query = query.filter(Column::DoctorId.eq(doctor_id));
    }

    query
        .order_by_asc(Column::Date)
        .order_by_asc(Column::Time)
        .all(db)
        .await
}

pub async fn find_by_patient(
    db: &DatabaseConnection,
    patient_id: Uuid,
) -> Result<Vec<Model>, DbErr> {
    Entity::find()
        .filter(Column::PatientId.eq(patient_id))
        .order_by_asc(Column::Date)
        .order_by_asc(Column::Time)
        .all(db)
        .await
}

pub async fn find_by_doctor(
    db: &DatabaseConnection,
    doctor_id: Uuid,
) -> Result<Vec<Model>, DbErr> {
    Entity::find()
        .filter(Column::DoctorId.eq(doctor_id))
        .order_by_asc(Column::Date)
        .order_by_asc(Column::Time)
        .all(db)
        .await
}

/// True when a scheduled or confirmed appointment already occupies the
/// (doctor, date, time) slot. Read-then-write check with no transactional
/// guarantee; the race window is a documented property of the system.
pub async fn slot_taken(
    db: &DatabaseConnection,
    doctor_id: Uuid,
    date: NaiveDate,
    time: &str,
) -> Result<bool, DbErr> {
    let count = Entity::find()
        .filter(Column::DoctorId.eq(doctor_id))
        .filter(Column::Date.eq(date))
        .filter(Column::Time.eq(time))
        .filter(Column::Status.is_in([
            AppointmentStatus::Scheduled.as_str(),
            AppointmentStatus::Confirmed.as_str(),
        ]))
        .count(db)
        .await?;
    Ok(count > 0)
}

pub async fn create(
    db: &DatabaseConnection,
    new_appointment: NewAppointmentEntity,
) -> Result<Model, DbErr> {
    let active_model = ActiveModel {
        id: Set(new_appointment.id),
        patient_id: Set(new_appointment.patient_id),
        doctor_id: Set(new_appointment.doctor_id),
        date: Set(new_appointment.date),
        time: Set(new_appointment.time),
        status: Set(new_appointment.status),
        reason: Set(new_appointment.reason),
        notes: Set(new_appointment.notes),
        diagnosis: Set(None),
        prescription: Set(None),
        follow_up_date: Set(None),
        is_urgent: Set(new_appointment.is_urgent),
        created_at: Set(new_appointment.created_at),
        updated_at: Set(new_appointment.updated_at),
    };

    active_model.insert(db).await
}

pub async fn update(
    db: &DatabaseConnection,
    id: Uuid,
    update_data: UpdateAppointmentEntity,
) -> Result<Model, DbErr> {
    let mut active_model = ActiveModel {
        id: Set(id),
        ..Default::default()
    };

    if let Some(status) = update_data.status {
        active_model.status = Set(status);
    }
    if let Some(notes) = update_data.notes {
        active_model.notes = Set(Some(notes));
    }
    if let Some(diagnosis) = update_data.diagnosis {
        active_model.diagnosis = Set(Some(diagnosis));
    }
    if let Some(prescription) = update_data.prescription {
        active_model.prescription = Set(Some(prescription));
    }
    if let Some(follow_up_date) = update_data.follow_up_date {
        active_model.follow_up_date = Set(Some(follow_up_date));
    }
    if let Some(updated_at) = update_data.updated_at {
        active_model.updated_at = Set(updated_at);
    }

    active_model.update(db).await
}

pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<bool, DbErr> {
    let result = Entity::delete_by_id(id).exec(db).await?;
    Ok(result.rows_affected > 0)
}

/// Doctor-deletion cascade: remove every appointment referencing the doctor.
pub async fn delete_by_doctor(db: &DatabaseConnection, doctor_id: Uuid) -> Result<u64, DbErr> {
    let result = Entity::delete_many()
        .filter(Column::DoctorId.eq(doctor_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// Patient-deletion cascade: remove every appointment referencing the patient.
pub async fn delete_by_patient(db: &DatabaseConnection, patient_id: Uuid) -> Result<u64, DbErr> {
    let result = Entity::delete_many()
        .filter(Column::PatientId.eq(patient_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

pub async fn count(db: &DatabaseConnection) -> Result<u64, DbErr> {
    Entity::find().count(db).await
}
