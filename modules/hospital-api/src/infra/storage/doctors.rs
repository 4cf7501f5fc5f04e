use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "doctors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_id: Uuid,
    pub specialization: String,
    #[sea_orm(unique)]
    pub license_number: String,
    pub phone: Option<String>,
    pub experience_years: i32,
    /// Weekly availability table serialized as JSON.
    pub availability: Json,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Data for creating a new doctor row.
pub struct NewDoctorEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub specialization: String,
    pub license_number: String,
    pub phone: Option<String>,
    pub experience_years: i32,
    pub availability: Json,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update of a doctor row.
#[derive(Default)]
pub struct UpdateDoctorEntity {
    pub specialization: Option<String>,
    pub phone: Option<String>,
    pub experience_years: Option<i32>,
    pub availability: Option<Json>,
    pub is_available: Option<bool>,
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

/// All doctors, newest first.
pub async fn find_all(db: &DatabaseConnection) -> Result<Vec<Model>, DbErr> {
    Entity::find()
        .order_by_desc(Column::CreatedAt)
        .all(db)
        .await
}

/// Case-insensitive substring match on specialization, restricted to
/// available doctors, most experienced first.
pub async fn find_by_specialization(
    db: &DatabaseConnection,
    specialization: &str,
) -> Result<Vec<Model>, DbErr> {
    let needle = format!("%{}%", specialization.to_lowercase());
    Entity::find()
        .filter(Expr::expr(Func::lower(Expr::col(Column::Specialization))).like(needle))
        .filter(Column::IsAvailable.eq(true))
        .order_by_desc(Column::ExperienceYears)
        .all(db)
        .await
}

pub async fn license_exists(db: &DatabaseConnection, license_number: &str) -> Result<bool, DbErr> {
    let count = Entity::find()
        .filter(Column::LicenseNumber.eq(license_number))
        .count(db)
        .await?;
    Ok(count > 0)
}

pub async fn create(db: &DatabaseConnection, new_doctor: NewDoctorEntity) -> Result<Model, DbErr> {
    let active_model = ActiveModel {
        id: Set(new_doctor.id),
        user_id: Set(new_doctor.user_id),
        specialization: Set(new_doctor.specialization),
        license_number: Set(new_doctor.license_number),
        phone: Set(new_doctor.phone),
        experience_years: Set(new_doctor.experience_years),
        availability: Set(new_doctor.availability),
        is_available: Set(new_doctor.is_available),
        created_at: Set(new_doctor.created_at),
        updated_at: Set(new_doctor.updated_at),
    };

    active_model.insert(db).await
}

pub async fn update(
    db: &DatabaseConnection,
    id: Uuid,
    update_data: UpdateDoctorEntity,
) -> Result<Model, DbErr> {
    let mut active_model = ActiveModel {
        id: Set(id),
        ..Default::default()
    };

    if let Some(specialization) = update_data.specialization {
        active_model.specialization = Set(specialization);
    }
    if let Some(phone) = update_data.phone {
        active_model.phone = Set(Some(phone));
    }
    if let Some(experience_years) = update_data.experience_years {
        active_model.experience_years = Set(experience_years);
    }
    if let Some(availability) = update_data.availability {
        active_model.availability = Set(availability);
    }
    if let Some(is_available) = update_data.is_available {
        active_model.is_available = Set(is_available);
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

pub async fn count(db: &DatabaseConnection) -> Result<u64, DbErr> {
    Entity::find().count(db).await
}
