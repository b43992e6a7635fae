//! Repository trait definitions
//!
//! These traits define the contract for data access.
//! Implementations live in the infrastructure layer.

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::DomainError;
use crate::models::agent::Model as Agent;
use crate::models::property::Model as Property;

/// Input for creating an agent. `password` is hashed before storage.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct CreateAgentInput {
    pub profile_picture: String,
    pub user_name: String,
    pub password: String,
    pub email: String,
    pub phone: String,
    pub location: Option<String>,
}

/// Input for updating an agent
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct UpdateAgentInput {
    pub profile_picture: Option<String>,
    pub user_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<Option<String>>,
}

/// Repository trait for Agent entity
#[async_trait]
pub trait AgentRepository: Send + Sync {
    /// Find all agents, active or not
    async fn find_all(&self) -> Result<Vec<Agent>, DomainError>;

    /// Find agents eligible for new assignments
    async fn find_active(&self) -> Result<Vec<Agent>, DomainError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Agent>, DomainError>;

    /// Active agents covering `location`, lowest id first
    async fn find_by_location(&self, location: &str) -> Result<Vec<Agent>, DomainError>;

    async fn create(&self, input: CreateAgentInput) -> Result<Agent, DomainError>;

    async fn update(&self, id: i32, input: UpdateAgentInput) -> Result<Agent, DomainError>;

    /// Activate or deactivate an agent
    async fn set_active(&self, id: i32, active: bool) -> Result<Agent, DomainError>;

    async fn change_password(&self, id: i32, new_password: &str) -> Result<(), DomainError>;

    /// Check a user name / password pair against the stored hash
    async fn verify_credentials(&self, user_name: &str, password: &str)
    -> Result<Agent, DomainError>;

    /// Delete an agent together with its leads, tasks, sales, commissions
    /// and balances
    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}

/// Filter criteria for property queries
#[derive(Debug, Default, Clone)]
pub struct PropertyFilter {
    pub district_id: Option<i32>,
    pub city_id: Option<i32>,
    pub category_id: Option<i32>,
    pub admin_approval: Option<bool>,
    pub is_active: Option<bool>,
    pub sold_out: Option<bool>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub min_bhk: Option<i32>,
}

impl PropertyFilter {
    /// Listings visible to the public: approved, active, not sold.
    pub fn approved() -> Self {
        Self {
            admin_approval: Some(true),
            is_active: Some(true),
            sold_out: Some(false),
            ..Default::default()
        }
    }
}

/// Input for creating a property
#[derive(Debug, Clone, serde::Deserialize)]
pub struct CreatePropertyInput {
    pub price: Decimal,
    pub district_id: i32,
    pub city_id: i32,
    pub address: String,
    pub sqft: i32,
    pub bhk: i32,
    pub category_id: i32,
    pub year_of_construction: i32,
    pub images: [String; 4],
    #[serde(default)]
    pub admin_approval: bool,
}

/// Input for updating a property
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct UpdatePropertyInput {
    pub price: Option<Decimal>,
    pub district_id: Option<i32>,
    pub city_id: Option<i32>,
    pub address: Option<String>,
    pub sqft: Option<i32>,
    pub bhk: Option<i32>,
    pub category_id: Option<i32>,
    pub year_of_construction: Option<i32>,
    pub images: Option<[String; 4]>,
    pub is_active: Option<bool>,
}

/// Repository trait for Property entity
#[async_trait]
pub trait PropertyRepository: Send + Sync {
    /// Find all properties matching the filter, newest first
    async fn find_all(&self, filter: PropertyFilter) -> Result<Vec<Property>, DomainError>;

    /// Publicly listed properties only
    async fn find_approved(&self) -> Result<Vec<Property>, DomainError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Property>, DomainError>;

    async fn create(&self, input: CreatePropertyInput) -> Result<Property, DomainError>;

    async fn update(&self, id: i32, input: UpdatePropertyInput) -> Result<Property, DomainError>;

    /// Grant or withdraw admin approval
    async fn set_approval(&self, id: i32, approved: bool) -> Result<Property, DomainError>;

    async fn mark_sold_out(&self, id: i32, sold_out: bool) -> Result<Property, DomainError>;

    /// Delete a property together with its leads and sales
    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}
