use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Brokerage agent, created by an administrator.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "agents")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub profile_picture: String, // under Agent_profile/
    pub user_name: String,
    /// Argon2 PHC string. Never the raw password.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub email: String,
    pub phone: String,
    /// Area the agent covers, used by lead auto-assignment.
    pub location: Option<String>,
    pub created_at: String,
    pub updated_date: String,
    /// Admins deactivate agents instead of deleting them.
    #[sea_orm(default_value = true)]
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::lead::Entity")]
    Leads,
    #[sea_orm(has_many = "super::task::Entity")]
    Tasks,
    #[sea_orm(has_many = "super::sale::Entity")]
    Sales,
    #[sea_orm(has_many = "super::commission::Entity")]
    Commissions,
    #[sea_orm(has_many = "super::account_balance::Entity")]
    AccountBalances,
}

impl Related<super::lead::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Leads.def()
    }
}

impl Related<super::task::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tasks.def()
    }
}

impl Related<super::sale::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sales.def()
    }
}

impl Related<super::commission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Commissions.def()
    }
}

impl Related<super::account_balance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AccountBalances.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.user_name)
    }
}
