//! SeaORM implementation of AgentRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::auth::{hash_password, verify_password};
use crate::domain::validation::{self, AGENT_FIELD_MAX};
use crate::domain::{AgentRepository, CreateAgentInput, DomainError, UpdateAgentInput};
use crate::models::UploadDir;
use crate::models::agent::{ActiveModel, Column, Entity as AgentEntity, Model as Agent};

/// SeaORM-based implementation of AgentRepository
pub struct SeaOrmAgentRepository {
    db: DatabaseConnection,
}

impl SeaOrmAgentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn get(&self, id: i32) -> Result<Agent, DomainError> {
        AgentEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound("agent"))
    }
}

/// Trimmed, lowercased location used for matching.
pub(crate) fn normalize_location(location: &str) -> String {
    location.trim().to_lowercase()
}

#[async_trait]
impl AgentRepository for SeaOrmAgentRepository {
    async fn find_all(&self) -> Result<Vec<Agent>, DomainError> {
        Ok(AgentEntity::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?)
    }

    async fn find_active(&self) -> Result<Vec<Agent>, DomainError> {
        Ok(AgentEntity::find()
            .filter(Column::IsActive.eq(true))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Agent>, DomainError> {
        Ok(AgentEntity::find_by_id(id).one(&self.db).await?)
    }

    async fn find_by_location(&self, location: &str) -> Result<Vec<Agent>, DomainError> {
        let location = normalize_location(location);
        if location.is_empty() {
            return Ok(Vec::new());
        }

        // Locations are stored normalized, so equality is enough here
        Ok(AgentEntity::find()
            .filter(Column::IsActive.eq(true))
            .filter(Column::Location.eq(location))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?)
    }

    async fn create(&self, input: CreateAgentInput) -> Result<Agent, DomainError> {
        let user_name = validation::required("user_name", &input.user_name, AGENT_FIELD_MAX)?;
        let email = validation::email("email", &input.email, AGENT_FIELD_MAX)?;
        let phone = validation::required("phone", &input.phone, AGENT_FIELD_MAX)?;
        let picture = validation::required("profile_picture", &input.profile_picture, 255)?;
        let location = validation::optional("location", input.location, AGENT_FIELD_MAX)?
            .map(|l| normalize_location(&l));
        let password_hash = hash_password(&input.password)?;
        let now = chrono::Utc::now().to_rfc3339();

        let agent = ActiveModel {
            profile_picture: Set(UploadDir::AgentProfile.stored_path(&picture)),
            user_name: Set(user_name),
            password_hash: Set(password_hash),
            email: Set(email),
            phone: Set(phone),
            location: Set(location),
            created_at: Set(now.clone()),
            updated_date: Set(now),
            is_active: Set(true),
            ..Default::default()
        };

        let result = agent.insert(&self.db).await?;
        tracing::info!("Created agent {} ({})", result.id, result.user_name);
        Ok(result)
    }

    async fn update(&self, id: i32, input: UpdateAgentInput) -> Result<Agent, DomainError> {
        let existing = self.get(id).await?;
        let mut active: ActiveModel = existing.into();

        if let Some(picture) = input.profile_picture {
            let picture = validation::required("profile_picture", &picture, 255)?;
            active.profile_picture = Set(UploadDir::AgentProfile.stored_path(&picture));
        }
        if let Some(user_name) = input.user_name {
            active.user_name = Set(validation::required(
                "user_name",
                &user_name,
                AGENT_FIELD_MAX,
            )?);
        }
        if let Some(email) = input.email {
            active.email = Set(validation::email("email", &email, AGENT_FIELD_MAX)?);
        }
        if let Some(phone) = input.phone {
            active.phone = Set(validation::required("phone", &phone, AGENT_FIELD_MAX)?);
        }
        if let Some(location) = input.location {
            active.location = Set(validation::optional("location", location, AGENT_FIELD_MAX)?
                .map(|l| normalize_location(&l)));
        }
        active.updated_date = Set(chrono::Utc::now().to_rfc3339());

        Ok(active.update(&self.db).await?)
    }

    async fn set_active(&self, id: i32, is_active: bool) -> Result<Agent, DomainError> {
        let existing = self.get(id).await?;
        let mut active: ActiveModel = existing.into();
        active.is_active = Set(is_active);
        active.updated_date = Set(chrono::Utc::now().to_rfc3339());

        let result = active.update(&self.db).await?;
        tracing::info!(
            "Agent {} {}",
            result.id,
            if is_active { "activated" } else { "deactivated" }
        );
        Ok(result)
    }

    async fn change_password(&self, id: i32, new_password: &str) -> Result<(), DomainError> {
        let existing = self.get(id).await?;
        let mut active: ActiveModel = existing.into();
        active.password_hash = Set(hash_password(new_password)?);
        active.updated_date = Set(chrono::Utc::now().to_rfc3339());
        active.update(&self.db).await?;
        Ok(())
    }

    async fn verify_credentials(
        &self,
        user_name: &str,
        password: &str,
    ) -> Result<Agent, DomainError> {
        // User names are not unique, so try each candidate
        let candidates = AgentEntity::find()
            .filter(Column::UserName.eq(user_name.trim()))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;

        for agent in candidates {
            if verify_password(password, &agent.password_hash)? {
                return Ok(agent);
            }
        }

        tracing::warn!("Rejected credentials for agent '{}'", user_name);
        Err(DomainError::InvalidCredential)
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let result = AgentEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound("agent"));
        }

        tracing::info!("Deleted agent {} and its dependents", id);
        Ok(())
    }
}
