use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "patients")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_id: Uuid,
    pub assigned_doctor_id: Option<Uuid>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Data for creating a new patient row.
pub struct NewPatientEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update of a patient row's demographic fields.
#[derive(Default)]
pub struct UpdatePatientEntity {
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

pub async fn find_by_id(db: &DatabaseConnection, id: Uuid) -> Result<Option<Model>, DbErr> {
    Entity::find_by_id(id).one(db).await
}

pub async fn find_by_user(db: &DatabaseConnection, user_id: Uuid) -> Result<Option<Model>, DbErr> {
    Entity::find()
        .filter(Column::UserId.eq(user_id))
        .one(db)
        .await
}

/// All patients, newest first.
pub async fn find_all(db: &DatabaseConnection) -> Result<Vec<Model>, DbErr> {
    Entity::find()
        .order_by_desc(Column::CreatedAt)
        .all(db)
        .await
}

pub async fn find_by_assigned_doctor(
    db: &DatabaseConnection,
    doctor_id: Uuid,
) -> Result<Vec<Model>, DbErr> {
    Entity::find()
        .filter(Column::AssignedDoctorId.eq(doctor_id))
        .order_by_desc(Column::CreatedAt)
        .all(db)
        .await
}

pub async fn create(db: &DatabaseConnection, new_patient: NewPatientEntity) -> Result<Model, DbErr> {
    let active_model = ActiveModel {
        id: Set(new_patient.id),
        user_id: Set(new_patient.user_id),
        assigned_doctor_id: Set(None),
        date_of_birth: Set(new_patient.date_of_birth),
        gender: Set(new_patient.gender),
        phone: Set(new_patient.phone),
        address: Set(new_patient.address),
        created_at: Set(new_patient.created_at),
        updated_at: Set(new_patient.updated_at),
    };

    active_model.insert(db).await
}

pub async fn update(
    db: &DatabaseConnection,
    id: Uuid,
    update_data: UpdatePatientEntity,
) -> Result<Model, DbErr> {
    let mut active_model = ActiveModel {
        id: Set(id),
        ..Default::default()
    };

    if let Some(date_of_birth) = update_data.date_of_birth {
        active_model.date_of_birth = Set(Some(date_of_birth));
    }
    if let Some(gender) = update_data.gender {
        active_model.gender = Set(Some(gender));
    }
    if let Some(phone) = update_data.phone {
        active_model.phone = Set(Some(phone));
    }
    if let Some(address) = update_data.address {
        active_model.address = Set(Some(address));
    }
    if let Some(updated_at) = update_data.updated_at {
        active_model.updated_at = Set(updated_at);
    }

    active_model.update(db).await
}

pub async fn set_assigned_doctor(
    db: &DatabaseConnection,
    id: Uuid,
    doctor_id: Uuid,
    updated_at: DateTime<Utc>,
) -> Result<Model, DbErr> {
    let active_model = ActiveModel {
        id: Set(id),
        assigned_doctor_id: Set(Some(doctor_id)),
        updated_at: Set(updated_at),
        ..Default::default()
    };

    active_model.update(db).await
}

/// Clear the assigned-doctor reference on every patient pointing at the
/// given doctor. Part of the doctor-deletion cascade.
pub async fn unassign_doctor(db: &DatabaseConnection, doctor_id: Uuid) -> Result<u64, DbErr> {
    let result = Entity::update_many()
        .col_expr(Column::AssignedDoctorId, Expr::value(None::<Uuid>))
        .filter(Column::AssignedDoctorId.eq(doctor_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<bool, DbErr> {
    let result = Entity::delete_by_id(id).exec(db).await?;
    Ok(result.rows_affected > 0)
}

pub async fn count(db: &DatabaseConnection) -> Result<u64, DbErr> {
    Entity::find().count(db).await
}

/// Patients created in the half-open interval `[start, end)`; feeds the
/// weekly analytics buckets.
pub async fn count_created_between(
    db: &DatabaseConnection,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<u64, DbErr> {
    Entity::find()
        .filter(Column::CreatedAt.gte(start))
        .filter(Column::CreatedAt.lt(end))
        .count(db)
        .await
}
