use sea_orm_migration::prelude::*;
use sea_orm_migration::MigratorTrait;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20250801_000001_create_tables::Migration)]
    }
}

mod m20250801_000001_create_tables {
    use sea_orm_migration::prelude::*;

    #[derive(DeriveMigrationName)]
    pub struct Migration;

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                        .col(
                            ColumnDef::new(Users::Email)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Users::Name).string().not_null())
                        .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                        .col(ColumnDef::new(Users::Role).string().not_null())
                        .col(ColumnDef::new(Users::IsActive).boolean().not_null())
                        .col(
                            ColumnDef::new(Users::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Users::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Patients::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Patients::Id).uuid().not_null().primary_key())
                        .col(
                            ColumnDef::new(Patients::UserId)
                                .uuid()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Patients::AssignedDoctorId).uuid())
                        .col(ColumnDef::new(Patients::DateOfBirth).date())
                        .col(ColumnDef::new(Patients::Gender).string())
                        .col(ColumnDef::new(Patients::Phone).string())
                        .col(ColumnDef::new(Patients::Address).string())
                        .col(
                            ColumnDef::new(Patients::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Patients::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Doctors::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Doctors::Id).uuid().not_null().primary_key())
                        .col(
                            ColumnDef::new(Doctors::UserId)
                                .uuid()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Doctors::Specialization).string().not_null())
                        .col(
                            ColumnDef::new(Doctors::LicenseNumber)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Doctors::Phone).string())
                        .col(
                            ColumnDef::new(Doctors::ExperienceYears)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Doctors::Availability).json_binary().not_null())
                        .col(ColumnDef::new(Doctors::IsAvailable).boolean().not_null())
                        .col(
                            ColumnDef::new(Doctors::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Doctors::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Appointments::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Appointments::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Appointments::PatientId).uuid().not_null())
                        .col(ColumnDef::new(Appointments::DoctorId).uuid().not_null())
                        .col(ColumnDef::new(Appointments::Date).date().not_null())
                        .col(ColumnDef::new(Appointments::Time).string().not_null())
                        .col(ColumnDef::new(Appointments::Status).string().not_null())
                        .col(ColumnDef::new(Appointments::Reason).string().not_null())
                        .col(ColumnDef::new(Appointments::Notes).string())
                        .col(ColumnDef::new(Appointments::Diagnosis).string())
                        .col(ColumnDef::new(Appointments::Prescription).string())
                        .col(ColumnDef::new(Appointments::FollowUpDate).date())
                        .col(ColumnDef::new(Appointments::IsUrgent).boolean().not_null())
                        .col(
                            ColumnDef::new(Appointments::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Appointments::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            // Lookup index for the slot conflict check. Deliberately not
            // unique; see the design notes on the booking race.
            manager
                .create_index(
                    Index::create()
                        .name("idx_appointments_slot")
                        .table(Appointments::Table)
                        .col(Appointments::DoctorId)
                        .col(Appointments::Date)
                        .col(Appointments::Time)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Appointments::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Doctors::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Patients::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await?;
            Ok(())
        }
    }

    #[derive(DeriveIden)]
    enum Users {
        Table,
        Id,
        Email,
        Name,
        PasswordHash,
        Role,
        IsActive,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Patients {
        Table,
        Id,
        UserId,
        AssignedDoctorId,
        DateOfBirth,
        Gender,
        Phone,
        Address,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Doctors {
        Table,
        Id,
        UserId,
        Specialization,
        LicenseNumber,
        Phone,
        ExperienceYears,
        Availability,
        IsAvailable,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Appointments {
        Table,
        Id,
        PatientId,
        DoctorId,
        Date,
        Time,
        Status,
        Reason,
        Notes,
        Diagnosis,
        Prescription,
        FollowUpDate,
        IsUrgent,
        CreatedAt,
        UpdatedAt,
    }
}
