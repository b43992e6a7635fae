//! SeaORM implementation of PropertyRepository

use async_trait::async_trait;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::validation::{self, ADDRESS_MAX};
use crate::domain::{
    CreatePropertyInput, DomainError, PropertyFilter, PropertyRepository, UpdatePropertyInput,
};
use crate::models::property::{ActiveModel, Column, Entity as PropertyEntity, Model as Property};
use crate::models::{UploadDir, city, district, property_category};

/// Largest price that fits in 12 digits with 2 decimals (9999999999.99).
const MAX_PRICE: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

/// SeaORM-based implementation of PropertyRepository
pub struct SeaOrmPropertyRepository {
    db: DatabaseConnection,
}

impl SeaOrmPropertyRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn get(&self, id: i32) -> Result<Property, DomainError> {
        PropertyEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DomainError::NotFound("property"))
    }

    async fn check_references(
        &self,
        district_id: Option<i32>,
        city_id: Option<i32>,
        category_id: Option<i32>,
    ) -> Result<(), DomainError> {
        if let Some(id) = district_id {
            district::Entity::find_by_id(id)
                .one(&self.db)
                .await?
                .ok_or(DomainError::NotFound("district"))?;
        }
        if let Some(id) = city_id {
            city::Entity::find_by_id(id)
                .one(&self.db)
                .await?
                .ok_or(DomainError::NotFound("city"))?;
        }
        if let Some(id) = category_id {
            property_category::Entity::find_by_id(id)
                .one(&self.db)
                .await?
                .ok_or(DomainError::NotFound("property category"))?;
        }
        Ok(())
    }
}

fn validate_price(price: Decimal) -> Result<Decimal, DomainError> {
    let price = price.round_dp(2);
    if price.is_sign_negative() || price > MAX_PRICE {
        return Err(DomainError::Validation(
            "price must be between 0 and 9999999999.99".to_string(),
        ));
    }
    Ok(price)
}

fn validate_count(field: &str, value: i32) -> Result<i32, DomainError> {
    if value < 0 {
        return Err(DomainError::Validation(format!(
            "{} must not be negative",
            field
        )));
    }
    Ok(value)
}

fn stored_images(images: [String; 4]) -> Result<[String; 4], DomainError> {
    let mut stored: [String; 4] = Default::default();
    for (slot, image) in images.iter().enumerate() {
        let field = format!("images{}", slot + 1);
        let image = validation::required(&field, image, 255)?;
        stored[slot] = UploadDir::PropertyImages.stored_path(&image);
    }
    Ok(stored)
}

fn filter_condition(filter: &PropertyFilter) -> Condition {
    let mut condition = Condition::all();

    if let Some(id) = filter.district_id {
        condition = condition.add(Column::DistrictId.eq(id));
    }
    if let Some(id) = filter.city_id {
        condition = condition.add(Column::CityId.eq(id));
    }
    if let Some(id) = filter.category_id {
        condition = condition.add(Column::CategoryId.eq(id));
    }
    if let Some(approved) = filter.admin_approval {
        condition = condition.add(Column::AdminApproval.eq(approved));
    }
    if let Some(active) = filter.is_active {
        condition = condition.add(Column::IsActive.eq(active));
    }
    if let Some(sold_out) = filter.sold_out {
        condition = condition.add(Column::SoldOut.eq(sold_out));
    }
    if let Some(min) = filter.min_price {
        condition = condition.add(Column::Price.gte(min));
    }
    if let Some(max) = filter.max_price {
        condition = condition.add(Column::Price.lte(max));
    }
    if let Some(bhk) = filter.min_bhk {
        condition = condition.add(Column::Bhk.gte(bhk));
    }

    condition
}

#[async_trait]
impl PropertyRepository for SeaOrmPropertyRepository {
    async fn find_all(&self, filter: PropertyFilter) -> Result<Vec<Property>, DomainError> {
        Ok(PropertyEntity::find()
            .filter(filter_condition(&filter))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await?)
    }

    async fn find_approved(&self) -> Result<Vec<Property>, DomainError> {
        self.find_all(PropertyFilter::approved()).await
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Property>, DomainError> {
        Ok(PropertyEntity::find_by_id(id).one(&self.db).await?)
    }

    async fn create(&self, input: CreatePropertyInput) -> Result<Property, DomainError> {
        let price = validate_price(input.price)?;
        let address = validation::required("address", &input.address, ADDRESS_MAX)?;
        let sqft = validate_count("sqft", input.sqft)?;
        let bhk = validate_count("bhk", input.bhk)?;
        let year = validate_count("year_of_construction", input.year_of_construction)?;
        let [images1, images2, images3, images4] = stored_images(input.images)?;
        self.check_references(
            Some(input.district_id),
            Some(input.city_id),
            Some(input.category_id),
        )
        .await?;

        let now = chrono::Utc::now().to_rfc3339();
        let property = ActiveModel {
            price: Set(price),
            district_id: Set(input.district_id),
            city_id: Set(input.city_id),
            address: Set(address),
            sqft: Set(sqft),
            bhk: Set(bhk),
            category_id: Set(input.category_id),
            year_of_construction: Set(year),
            images1: Set(images1),
            images2: Set(images2),
            images3: Set(images3),
            images4: Set(images4),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            is_active: Set(true),
            sold_out: Set(false),
            admin_approval: Set(input.admin_approval),
            ..Default::default()
        };

        let result = property.insert(&self.db).await?;
        tracing::info!(
            "Created property {} at '{}' (approved: {})",
            result.id,
            result.address,
            result.admin_approval
        );
        Ok(result)
    }

    async fn update(&self, id: i32, input: UpdatePropertyInput) -> Result<Property, DomainError> {
        let existing = self.get(id).await?;
        self.check_references(input.district_id, input.city_id, input.category_id)
            .await?;

        let mut active: ActiveModel = existing.into();

        if let Some(price) = input.price {
            active.price = Set(validate_price(price)?);
        }
        if let Some(id) = input.district_id {
            active.district_id = Set(id);
        }
        if let Some(id) = input.city_id {
            active.city_id = Set(id);
        }
        if let Some(address) = input.address {
            active.address = Set(validation::required("address", &address, ADDRESS_MAX)?);
        }
        if let Some(sqft) = input.sqft {
            active.sqft = Set(validate_count("sqft", sqft)?);
        }
        if let Some(bhk) = input.bhk {
            active.bhk = Set(validate_count("bhk", bhk)?);
        }
        if let Some(id) = input.category_id {
            active.category_id = Set(id);
        }
        if let Some(year) = input.year_of_construction {
            active.year_of_construction = Set(validate_count("year_of_construction", year)?);
        }
        if let Some(images) = input.images {
            let [images1, images2, images3, images4] = stored_images(images)?;
            active.images1 = Set(images1);
            active.images2 = Set(images2);
            active.images3 = Set(images3);
            active.images4 = Set(images4);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        Ok(active.update(&self.db).await?)
    }

    async fn set_approval(&self, id: i32, approved: bool) -> Result<Property, DomainError> {
        let existing = self.get(id).await?;
        let mut active: ActiveModel = existing.into();
        active.admin_approval = Set(approved);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let result = active.update(&self.db).await?;
        tracing::info!("Property {} approval set to {}", id, approved);
        Ok(result)
    }

    async fn mark_sold_out(&self, id: i32, sold_out: bool) -> Result<Property, DomainError> {
        let existing = self.get(id).await?;
        let mut active: ActiveModel = existing.into();
        active.sold_out = Set(sold_out);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        Ok(active.update(&self.db).await?)
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let result = PropertyEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound("property"));
        }

        tracing::info!("Deleted property {} with its leads and sales", id);
        Ok(())
    }
}
