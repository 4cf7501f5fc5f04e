use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::domain::auth::{hash_password, verify_password};
use crate::domain::error::DomainError;
use crate::domain::model::{
    AuthSession, AuthenticatedUser, NewRegistration, ProfileUpdate, Role, RoleProfile, Stats, User,
};
use crate::domain::service::Service;
use crate::infra::storage::{self as storage, mapper};

impl Service {
    /// Register a new identity and, for patient/doctor roles, the matching
    /// profile record. Admin accounts get no profile.
    pub async fn register(&self, reg: NewRegistration) -> Result<AuthSession, DomainError> {
        if reg.name.trim().is_empty() {
            return Err(DomainError::validation("name", "cannot be empty"));
        }
        if !reg.email.contains('@') {
            return Err(DomainError::validation("email", "invalid email address"));
        }
        if reg.password.len() < 6 {
            return Err(DomainError::validation(
                "password",
                "must be at least 6 characters",
            ));
        }

        let role = reg.role.unwrap_or(Role::Patient);

        if storage::users::email_exists(self.db(), &reg.email).await? {
            return Err(DomainError::email_taken(reg.email));
        }

        // Doctor profiles carry mandatory fields; validate before any write
        // so a failed registration leaves nothing behind.
        if role == Role::Doctor {
            if reg
                .profile
                .specialization
                .as_deref()
                .unwrap_or("")
                .is_empty()
            {
                return Err(DomainError::validation("specialization", "is required"));
            }
            let license = reg.profile.license_number.as_deref().unwrap_or("");
            if license.is_empty() {
                return Err(DomainError::validation("licenseNumber", "is required"));
            }
            if storage::doctors::license_exists(self.db(), license).await? {
                return Err(DomainError::license_taken(license));
            }
        }

        let now = Utc::now();
        let user_id = Uuid::new_v4();
        let password_hash = hash_password(&reg.password)?;

        let user = storage::users::create(
            self.db(),
            storage::users::NewUserEntity {
                id: user_id,
                email: reg.email,
                name: reg.name,
                password_hash,
                role: role.as_str().to_string(),
                is_active: true,
                created_at: now,
                updated_at: now,
            },
        )
        .await?;

        match role {
            Role::Patient => {
                storage::patients::create(
                    self.db(),
                    storage::patients::NewPatientEntity {
                        id: Uuid::new_v4(),
                        user_id,
                        date_of_birth: reg.profile.date_of_birth,
                        gender: reg.profile.gender,
                        phone: reg.profile.phone,
                        address: reg.profile.address,
                        created_at: now,
                        updated_at: now,
                    },
                )
                .await?;
            }
            Role::Doctor => {
                let availability = reg.profile.availability.unwrap_or_default();
                storage::doctors::create(
                    self.db(),
                    storage::doctors::NewDoctorEntity {
                        id: Uuid::new_v4(),
                        user_id,
                        specialization: reg.profile.specialization.unwrap_or_default(),
                        license_number: reg.profile.license_number.unwrap_or_default(),
                        phone: reg.profile.phone,
                        experience_years: reg.profile.experience_years.unwrap_or(0),
                        availability: serde_json::to_value(availability)
                            .map_err(|e| DomainError::database(e.to_string()))?,
                        is_available: reg.profile.is_available.unwrap_or(true),
                        created_at: now,
                        updated_at: now,
                    },
                )
                .await?;
            }
            Role::Admin => {}
        }

        info!(user = %user_id, %role, "registered new account");

        let user = mapper::user_to_domain(user)?;
        let token = self.issue_token(user_id)?;
        Ok(AuthSession {
            user: AuthenticatedUser::from(&user),
            token,
        })
    }

    /// Login succeeds iff the email exists, the password matches and the
    /// account is active. All failures map to the same vague error.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, DomainError> {
        let user = storage::users::find_by_email(self.db(), email)
            .await?
            .ok_or(DomainError::Unauthenticated)?;
        let user = mapper::user_to_domain(user)?;

        if !verify_password(password, &user.password_hash) {
            return Err(DomainError::Unauthenticated);
        }
        if !user.is_active {
            return Err(DomainError::Unauthenticated);
        }

        let token = self.issue_token(user.id)?;
        Ok(AuthSession {
            user: AuthenticatedUser::from(&user),
            token,
        })
    }

    /// The authorization gate: verify the bearer token, load the identity,
    /// reject unknown or deactivated accounts.
    pub async fn authenticate(&self, token: &str) -> Result<AuthenticatedUser, DomainError> {
        let user_id = self.tokens().verify(token)?;
        let user = storage::users::find_by_id(self.db(), user_id)
            .await?
            .ok_or(DomainError::Unauthenticated)?;
        let user = mapper::user_to_domain(user)?;
        if !user.is_active {
            return Err(DomainError::Unauthenticated);
        }
        Ok(AuthenticatedUser::from(&user))
    }

    /// The caller's identity plus role profile, with a fresh token for
    /// frontend compatibility.
    pub async fn profile(
        &self,
        user_id: Uuid,
    ) -> Result<(User, Option<RoleProfile>, String), DomainError> {
        let user = storage::users::find_by_id(self.db(), user_id)
            .await?
            .ok_or(DomainError::UserNotFound)?;
        let user = mapper::user_to_domain(user)?;

        let profile = match user.role {
            Role::Patient => storage::patients::find_by_user(self.db(), user_id)
                .await?
                .map(|p| RoleProfile::Patient(mapper::patient_to_domain(p))),
            Role::Doctor => match storage::doctors::find_by_user(self.db(), user_id).await? {
                Some(d) => Some(RoleProfile::Doctor(mapper::doctor_to_domain(d)?)),
                None => None,
            },
            Role::Admin => None,
        };

        let token = self.issue_token(user_id)?;
        Ok((user, profile, token))
    }

    /// Apply provided identity fields and any role-profile fields.
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        update: ProfileUpdate,
    ) -> Result<(), DomainError> {
        let user = storage::users::find_by_id(self.db(), user_id)
            .await?
            .ok_or(DomainError::UserNotFound)?;
        let user = mapper::user_to_domain(user)?;

        if let Some(email) = &update.email {
            if email != &user.email && storage::users::email_exists(self.db(), email).await? {
                return Err(DomainError::email_taken(email.clone()));
            }
        }

        let now = Utc::now();
        if update.name.is_some() || update.email.is_some() {
            storage::users::update(
                self.db(),
                user_id,
                storage::users::UpdateUserEntity {
                    name: update.name,
                    email: update.email,
                    is_active: None,
                    updated_at: Some(now),
                },
            )
            .await?;
        }

        match user.role {
            Role::Patient => {
                if let Some(patient) = storage::patients::find_by_user(self.db(), user_id).await? {
                    storage::patients::update(
                        self.db(),
                        patient.id,
                        storage::patients::UpdatePatientEntity {
                            date_of_birth: update.profile.date_of_birth,
                            gender: update.profile.gender,
                            phone: update.profile.phone,
                            address: update.profile.address,
                            updated_at: Some(now),
                        },
                    )
                    .await?;
                }
            }
            Role::Doctor => {
                if let Some(doctor) = storage::doctors::find_by_user(self.db(), user_id).await? {
                    let availability = match update.profile.availability {
                        Some(a) => Some(
                            serde_json::to_value(a)
                                .map_err(|e| DomainError::database(e.to_string()))?,
                        ),
                        None => None,
                    };
                    storage::doctors::update(
                        self.db(),
                        doctor.id,
                        storage::doctors::UpdateDoctorEntity {
                            specialization: update.profile.specialization,
                            phone: update.profile.phone,
                            experience_years: update.profile.experience_years,
                            availability,
                            is_available: update.profile.is_available,
                            updated_at: Some(now),
                        },
                    )
                    .await?;
                }
            }
            Role::Admin => {}
        }

        Ok(())
    }

    /// Admin dashboard counters.
    pub async fn stats(&self) -> Result<Stats, DomainError> {
        Ok(Stats {
            total_users: storage::users::count(self.db()).await?,
            total_patients: storage::patients::count(self.db()).await?,
            total_doctors: storage::doctors::count(self.db()).await?,
            total_appointments: storage::appointments::count(self.db()).await?,
        })
    }

    /// Deactivate an account. Test and admin tooling hook; there is no
    /// public route for it.
    pub async fn set_active(&self, user_id: Uuid, is_active: bool) -> Result<(), DomainError> {
        storage::users::find_by_id(self.db(), user_id)
            .await?
            .ok_or(DomainError::UserNotFound)?;
        storage::users::update(
            self.db(),
            user_id,
            storage::users::UpdateUserEntity {
                name: None,
                email: None,
                is_active: Some(is_active),
                updated_at: Some(Utc::now()),
            },
        )
        .await?;
        Ok(())
    }
}
