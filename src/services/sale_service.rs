//! Sale Service - Business logic for closed property sales

use sea_orm::*;

use crate::domain::DomainError;
use crate::models::agent::Entity as Agent;
use crate::models::customer::Entity as Customer;
use crate::models::property::{self, Entity as Property};
use crate::models::sale::{self, Entity as Sale, SaleDto};

/// Enriched sale with related data
#[derive(Debug, Clone, serde::Serialize)]
pub struct SaleWithDetails {
    pub id: i32,
    pub agent_id: i32,
    pub property_id: i32,
    pub customer_id: i32,
    pub sale_price: i64,
    pub sale_date: String,
    pub property_address: String,
}

impl std::fmt::Display for SaleWithDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sale for {}", self.property_address)
    }
}

/// Filter parameters for listing sales
#[derive(Debug, Default, Clone)]
pub struct SaleFilter {
    pub agent_id: Option<i32>,
    pub customer_id: Option<i32>,
    pub property_id: Option<i32>,
}

/// Record a new sale and take the property off the market
pub async fn record_sale(db: &DatabaseConnection, dto: SaleDto) -> Result<sale::Model, DomainError> {
    if dto.sale_price < 0 {
        return Err(DomainError::Validation(
            "sale_price must not be negative".to_string(),
        ));
    }

    let txn = db.begin().await?;

    // 1. Check the parties exist
    Agent::find_by_id(dto.agent_id)
        .one(&txn)
        .await?
        .ok_or(DomainError::NotFound("agent"))?;
    Customer::find_by_id(dto.customer_id)
        .one(&txn)
        .await?
        .ok_or(DomainError::NotFound("customer"))?;
    let sold = Property::find_by_id(dto.property_id)
        .one(&txn)
        .await?
        .ok_or(DomainError::NotFound("property"))?;

    if sold.sold_out {
        return Err(DomainError::Validation(format!(
            "property {} is already sold",
            sold.id
        )));
    }

    // 2. Create Sale
    let now = chrono::Utc::now().to_rfc3339();
    let saved = sale::ActiveModel {
        agent_id: Set(dto.agent_id),
        property_id: Set(dto.property_id),
        customer_id: Set(dto.customer_id),
        sale_price: Set(dto.sale_price),
        sale_date: Set(now.clone()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    // 3. Mark the property sold out
    let mut listing: property::ActiveModel = sold.into();
    listing.sold_out = Set(true);
    listing.updated_at = Set(now);
    listing.update(&txn).await?;

    txn.commit().await?;

    tracing::info!(
        "Sale {} recorded: property {} to customer {} by agent {} for {}",
        saved.id,
        saved.property_id,
        saved.customer_id,
        saved.agent_id,
        saved.sale_price
    );
    Ok(saved)
}

pub async fn get_sale(db: &DatabaseConnection, id: i32) -> Result<SaleWithDetails, DomainError> {
    let (found, listing) = Sale::find_by_id(id)
        .find_also_related(Property)
        .one(db)
        .await?
        .ok_or(DomainError::NotFound("sale"))?;

    Ok(details(found, listing.map(|p| p.address)))
}

fn details(sale: sale::Model, address: Option<String>) -> SaleWithDetails {
    SaleWithDetails {
        id: sale.id,
        agent_id: sale.agent_id,
        property_id: sale.property_id,
        customer_id: sale.customer_id,
        sale_price: sale.sale_price,
        sale_date: sale.sale_date,
        property_address: address.unwrap_or_else(|| "Unknown".to_string()),
    }
}

/// List sales, newest first
pub async fn list_sales(
    db: &DatabaseConnection,
    filter: SaleFilter,
) -> Result<Vec<SaleWithDetails>, DomainError> {
    let mut condition = Condition::all();

    if let Some(agent_id) = filter.agent_id {
        condition = condition.add(sale::Column::AgentId.eq(agent_id));
    }
    if let Some(customer_id) = filter.customer_id {
        condition = condition.add(sale::Column::CustomerId.eq(customer_id));
    }
    if let Some(property_id) = filter.property_id {
        condition = condition.add(sale::Column::PropertyId.eq(property_id));
    }

    let rows = Sale::find()
        .filter(condition)
        .order_by_desc(sale::Column::SaleDate)
        .order_by_desc(sale::Column::Id)
        .find_also_related(Property)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(sale, listing)| details(sale, listing.map(|p| p.address)))
        .collect())
}

/// Delete a sale record. The property stays marked as sold.
pub async fn delete_sale(db: &DatabaseConnection, id: i32) -> Result<(), DomainError> {
    let result = Sale::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(DomainError::NotFound("sale"));
    }
    Ok(())
}

/// Sum of sale prices closed by one agent
pub async fn total_sales_for_agent(db: &DatabaseConnection, agent_id: i32) -> Result<i64, DomainError> {
    let sales = Sale::find()
        .filter(sale::Column::AgentId.eq(agent_id))
        .all(db)
        .await?;

    Ok(sales.iter().map(|s| s.sale_price).sum())
}
