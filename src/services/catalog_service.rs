//! Catalog Service - property categories, districts and cities
//!
//! The three lookup tables share one shape (id + name), so each gets the
//! same create/list/rename/delete functions. Deleting an entry removes every
//! property that references it.

use sea_orm::*;

use crate::domain::DomainError;
use crate::domain::validation::{self, CATEGORY_NAME_MAX, CITY_NAME_MAX, DISTRICT_NAME_MAX};
use crate::models::{city, district, property_category};

/// Lookup entry as returned to callers
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CatalogEntry {
    pub id: i32,
    pub name: String,
}

impl std::fmt::Display for CatalogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

macro_rules! catalog_entry_from {
    ($($module:ident),*) => {
        $(impl From<$module::Model> for CatalogEntry {
            fn from(model: $module::Model) -> Self {
                Self { id: model.id, name: model.name }
            }
        })*
    };
}

catalog_entry_from!(property_category, district, city);

pub async fn create_category(
    db: &DatabaseConnection,
    name: &str,
) -> Result<CatalogEntry, DomainError> {
    let saved = property_category::ActiveModel {
        name: Set(validation::required("name", name, CATEGORY_NAME_MAX)?),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(saved.into())
}

pub async fn list_categories(db: &DatabaseConnection) -> Result<Vec<CatalogEntry>, DomainError> {
    let rows = property_category::Entity::find()
        .order_by_asc(property_category::Column::Name)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(CatalogEntry::from).collect())
}

pub async fn rename_category(
    db: &DatabaseConnection,
    id: i32,
    name: &str,
) -> Result<CatalogEntry, DomainError> {
    let found = property_category::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DomainError::NotFound("property category"))?;
    let mut active: property_category::ActiveModel = found.into();
    active.name = Set(validation::required("name", name, CATEGORY_NAME_MAX)?);
    Ok(active.update(db).await?.into())
}

/// Delete a category and, by cascade, its properties
pub async fn delete_category(db: &DatabaseConnection, id: i32) -> Result<(), DomainError> {
    let result = property_category::Entity::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(DomainError::NotFound("property category"));
    }
    Ok(())
}

pub async fn create_district(
    db: &DatabaseConnection,
    name: &str,
) -> Result<CatalogEntry, DomainError> {
    let saved = district::ActiveModel {
        name: Set(validation::required("name", name, DISTRICT_NAME_MAX)?),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(saved.into())
}

pub async fn list_districts(db: &DatabaseConnection) -> Result<Vec<CatalogEntry>, DomainError> {
    let rows = district::Entity::find()
        .order_by_asc(district::Column::Name)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(CatalogEntry::from).collect())
}

pub async fn rename_district(
    db: &DatabaseConnection,
    id: i32,
    name: &str,
) -> Result<CatalogEntry, DomainError> {
    let found = district::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DomainError::NotFound("district"))?;
    let mut active: district::ActiveModel = found.into();
    active.name = Set(validation::required("name", name, DISTRICT_NAME_MAX)?);
    Ok(active.update(db).await?.into())
}

pub async fn delete_district(db: &DatabaseConnection, id: i32) -> Result<(), DomainError> {
    let result = district::Entity::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(DomainError::NotFound("district"));
    }
    Ok(())
}

pub async fn create_city(db: &DatabaseConnection, name: &str) -> Result<CatalogEntry, DomainError> {
    let saved = city::ActiveModel {
        name: Set(validation::required("name", name, CITY_NAME_MAX)?),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(saved.into())
}

pub async fn list_cities(db: &DatabaseConnection) -> Result<Vec<CatalogEntry>, DomainError> {
    let rows = city::Entity::find()
        .order_by_asc(city::Column::Name)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(CatalogEntry::from).collect())
}

pub async fn rename_city(
    db: &DatabaseConnection,
    id: i32,
    name: &str,
) -> Result<CatalogEntry, DomainError> {
    let found = city::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DomainError::NotFound("city"))?;
    let mut active: city::ActiveModel = found.into();
    active.name = Set(validation::required("name", name, CITY_NAME_MAX)?);
    Ok(active.update(db).await?.into())
}

pub async fn delete_city(db: &DatabaseConnection, id: i32) -> Result<(), DomainError> {
    let result = city::Entity::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(DomainError::NotFound("city"));
    }
    Ok(())
}
