use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::InvalidChoice;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "leads")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub customer_id: i32,
    pub property_id: i32,
    /// Agent the lead is assigned to.
    pub agent_id: i32,
    pub lead_status: LeadStatus,
    pub created_date: String,
    pub updated_date: String,
}

/// Temperature of a lead.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    #[sea_orm(string_value = "cold")]
    Cold,
    #[sea_orm(string_value = "warm")]
    Warm,
    #[sea_orm(string_value = "hot")]
    Hot,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 3] = [LeadStatus::Cold, LeadStatus::Warm, LeadStatus::Hot];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::Cold => "cold",
            LeadStatus::Warm => "warm",
            LeadStatus::Hot => "hot",
        }
    }
}

impl FromStr for LeadStatus {
    type Err = InvalidChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cold" => Ok(LeadStatus::Cold),
            "warm" => Ok(LeadStatus::Warm),
            "hot" => Ok(LeadStatus::Hot),
            other => Err(InvalidChoice::new("lead_status", other)),
        }
    }
}

impl std::fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::CustomerId",
        to = "super::customer::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Customer,
    #[sea_orm(
        belongs_to = "super::property::Entity",
        from = "Column::PropertyId",
        to = "super::property::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Property,
    #[sea_orm(
        belongs_to = "super::agent::Entity",
        from = "Column::AgentId",
        to = "super::agent::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Agent,
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl Related<super::property::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Property.def()
    }
}

impl Related<super::agent::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Agent.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Lead input as received from callers. The status stays a string until
/// the service validates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadDto {
    pub id: Option<i32>,
    pub customer_id: i32,
    pub property_id: i32,
    pub agent_id: i32,
    pub lead_status: String,
}
