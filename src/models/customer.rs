use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub user_id: i32,
    /// Unique when present. Several customers may have no phone at all.
    #[sea_orm(unique)]
    pub phone_number: Option<String>,
    pub profile_picture: Option<String>, // under customer_profiles/
    pub date_of_birth: Option<String>,   // YYYY-MM-DD
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::lead::Entity")]
    Leads,
    #[sea_orm(has_many = "super::sale::Entity")]
    Sales,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::lead::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Leads.def()
    }
}

impl Related<super::sale::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sales.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Input for creating or updating a customer together with its identity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerDto {
    pub id: Option<i32>,
    pub username: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub profile_picture: Option<String>,
    pub date_of_birth: Option<String>,
}

/// Customer joined with its identity record.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerProfile {
    pub id: i32,
    pub user_id: i32,
    pub username: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub profile_picture: Option<String>,
    pub date_of_birth: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl CustomerProfile {
    pub fn from_parts(customer: Model, user: super::user::Model) -> Self {
        Self {
            id: customer.id,
            user_id: customer.user_id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            phone_number: customer.phone_number,
            profile_picture: customer.profile_picture,
            date_of_birth: customer.date_of_birth,
            created_at: customer.created_at,
            updated_at: customer.updated_at,
        }
    }
}

impl std::fmt::Display for CustomerProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.username)
    }
}
