use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "properties")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub price: Decimal,
    pub district_id: i32,
    pub city_id: i32,
    pub address: String,
    pub sqft: i32,
    pub bhk: i32,
    pub category_id: i32,
    pub year_of_construction: i32,
    // Image slots, relative to property_images/
    pub images1: String,
    pub images2: String,
    pub images3: String,
    pub images4: String,
    pub created_at: String,
    pub updated_at: String,
    #[sea_orm(default_value = true)]
    pub is_active: bool,
    #[sea_orm(default_value = false)]
    pub sold_out: bool,
    /// Manager approval. A listing is public only once this is set.
    #[sea_orm(default_value = false)]
    pub admin_approval: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::district::Entity",
        from = "Column::DistrictId",
        to = "super::district::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    District,
    #[sea_orm(
        belongs_to = "super::city::Entity",
        from = "Column::CityId",
        to = "super::city::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    City,
    #[sea_orm(
        belongs_to = "super::property_category::Entity",
        from = "Column::CategoryId",
        to = "super::property_category::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Category,
    #[sea_orm(has_many = "super::lead::Entity")]
    Leads,
    #[sea_orm(has_many = "super::sale::Entity")]
    Sales,
}

impl Related<super::district::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::District.def()
    }
}

impl Related<super::city::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::City.def()
    }
}

impl Related<super::property_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
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

impl Model {
    /// Approved, active and still on the market.
    pub fn is_publicly_listed(&self) -> bool {
        self.admin_approval && self.is_active && !self.sold_out
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.address)
    }
}
