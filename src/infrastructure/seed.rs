//! Demo data: one district, city and category, a listing awaiting approval,
//! an agent covering Springvale, a customer and a lead between them.
//!
//! Safe to run more than once; existing rows are looked up by name.

use rust_decimal::Decimal;
use sea_orm::*;

use crate::domain::{
    AgentRepository, CreateAgentInput, CreatePropertyInput, DomainError, PropertyRepository,
};
use crate::infrastructure::{SeaOrmAgentRepository, SeaOrmPropertyRepository};
use crate::models::customer::CustomerDto;
use crate::models::lead::{self, LeadDto};
use crate::models::{agent, city, district, property, property_category, user};
use crate::services::{customer_service, lead_service};

pub const DEMO_DISTRICT: &str = "Springvale";
pub const DEMO_CITY: &str = "Lakeside";
pub const DEMO_CATEGORY: &str = "Apartment";
pub const DEMO_ADDRESS: &str = "12 Elm St";
pub const DEMO_AGENT: &str = "demo_agent";
pub const DEMO_CUSTOMER: &str = "demo_customer";

pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<(), DomainError> {
    // 1. Lookup tables
    let district_id = match district::Entity::find()
        .filter(district::Column::Name.eq(DEMO_DISTRICT))
        .one(db)
        .await?
    {
        Some(d) => d.id,
        None => {
            district::ActiveModel {
                name: Set(DEMO_DISTRICT.to_owned()),
                ..Default::default()
            }
            .insert(db)
            .await?
            .id
        }
    };

    let city_id = match city::Entity::find()
        .filter(city::Column::Name.eq(DEMO_CITY))
        .one(db)
        .await?
    {
        Some(c) => c.id,
        None => {
            city::ActiveModel {
                name: Set(DEMO_CITY.to_owned()),
                ..Default::default()
            }
            .insert(db)
            .await?
            .id
        }
    };

    let category_id = match property_category::Entity::find()
        .filter(property_category::Column::Name.eq(DEMO_CATEGORY))
        .one(db)
        .await?
    {
        Some(c) => c.id,
        None => {
            property_category::ActiveModel {
                name: Set(DEMO_CATEGORY.to_owned()),
                ..Default::default()
            }
            .insert(db)
            .await?
            .id
        }
    };

    // 2. Listing, not yet approved
    let property_id = match property::Entity::find()
        .filter(property::Column::Address.eq(DEMO_ADDRESS))
        .one(db)
        .await?
    {
        Some(p) => p.id,
        None => {
            let repo = SeaOrmPropertyRepository::new(db.clone());
            repo.create(CreatePropertyInput {
                price: Decimal::new(25_000_000, 2),
                district_id,
                city_id,
                address: DEMO_ADDRESS.to_owned(),
                sqft: 900,
                bhk: 2,
                category_id,
                year_of_construction: 2010,
                images: [
                    "elm-front.jpg".to_owned(),
                    "elm-living.jpg".to_owned(),
                    "elm-kitchen.jpg".to_owned(),
                    "elm-bedroom.jpg".to_owned(),
                ],
                admin_approval: false,
            })
            .await?
            .id
        }
    };

    // 3. Agent
    let agent_id = match agent::Entity::find()
        .filter(agent::Column::UserName.eq(DEMO_AGENT))
        .one(db)
        .await?
    {
        Some(a) => a.id,
        None => {
            let repo = SeaOrmAgentRepository::new(db.clone());
            repo.create(CreateAgentInput {
                profile_picture: "demo_agent.png".to_owned(),
                user_name: DEMO_AGENT.to_owned(),
                password: "agent".to_owned(),
                email: "agent@example.com".to_owned(),
                phone: "555-0100".to_owned(),
                location: Some(DEMO_DISTRICT.to_owned()),
            })
            .await?
            .id
        }
    };

    // 4. Customer
    let existing = user::Entity::find()
        .filter(user::Column::Username.eq(DEMO_CUSTOMER))
        .find_also_related(crate::models::customer::Entity)
        .one(db)
        .await?;
    let customer_id = match existing {
        Some((_, Some(c))) => c.id,
        Some((_, None)) => {
            return Err(DomainError::Validation(format!(
                "user '{}' exists without a customer record",
                DEMO_CUSTOMER
            )));
        }
        None => {
            customer_service::create_customer(
                db,
                CustomerDto {
                    username: DEMO_CUSTOMER.to_owned(),
                    email: Some("customer@example.com".to_owned()),
                    first_name: Some("Dana".to_owned()),
                    ..Default::default()
                },
            )
            .await?
            .id
        }
    };

    // 5. Lead
    let has_lead = lead::Entity::find()
        .filter(lead::Column::CustomerId.eq(customer_id))
        .filter(lead::Column::PropertyId.eq(property_id))
        .count(db)
        .await?
        > 0;
    if !has_lead {
        lead_service::create_lead(
            db,
            LeadDto {
                id: None,
                customer_id,
                property_id,
                agent_id,
                lead_status: "warm".to_owned(),
            },
        )
        .await?;
    }

    tracing::info!(
        "Demo data ready (property {}, agent {}, customer {})",
        property_id,
        agent_id,
        customer_id
    );
    Ok(())
}
