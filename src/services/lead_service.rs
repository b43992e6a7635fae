//! Lead Service - Pure business logic for leads

use sea_orm::*;
use std::collections::HashMap;
use std::str::FromStr;

use crate::domain::DomainError;
use crate::models::agent::{self, Entity as Agent};
use crate::models::customer::Entity as Customer;
use crate::models::lead::{self, Entity as Lead, LeadDto, LeadStatus};
use crate::models::property::{self, Entity as Property};
use crate::models::user::Entity as User;

/// Lead with the names needed to display it
#[derive(Debug, Clone, serde::Serialize)]
pub struct LeadWithDetails {
    pub id: i32,
    pub customer_id: i32,
    pub property_id: i32,
    pub agent_id: i32,
    pub lead_status: LeadStatus,
    pub created_date: String,
    pub updated_date: String,
    pub property_address: String,
    pub agent_name: String,
    pub customer_name: String,
}

impl std::fmt::Display for LeadWithDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Lead for {} ({})",
            self.property_address, self.lead_status
        )
    }
}

/// Filter parameters for listing leads
#[derive(Debug, Default, Clone)]
pub struct LeadFilter {
    pub agent_id: Option<i32>,
    pub customer_id: Option<i32>,
    pub property_id: Option<i32>,
    pub lead_status: Option<LeadStatus>,
}

pub(crate) async fn require_active_agent<C: ConnectionTrait>(
    db: &C,
    agent_id: i32,
) -> Result<agent::Model, DomainError> {
    let found = Agent::find_by_id(agent_id)
        .one(db)
        .await?
        .ok_or(DomainError::NotFound("agent"))?;
    if !found.is_active {
        return Err(DomainError::Validation(format!(
            "agent {} is inactive and cannot take new assignments",
            agent_id
        )));
    }
    Ok(found)
}

/// Create a lead. The status must be exactly one of cold, warm or hot.
pub async fn create_lead(db: &DatabaseConnection, dto: LeadDto) -> Result<lead::Model, DomainError> {
    let status = LeadStatus::from_str(&dto.lead_status)?;

    Customer::find_by_id(dto.customer_id)
        .one(db)
        .await?
        .ok_or(DomainError::NotFound("customer"))?;
    Property::find_by_id(dto.property_id)
        .one(db)
        .await?
        .ok_or(DomainError::NotFound("property"))?;
    require_active_agent(db, dto.agent_id).await?;

    let now = chrono::Utc::now().to_rfc3339();
    let saved = lead::ActiveModel {
        customer_id: Set(dto.customer_id),
        property_id: Set(dto.property_id),
        agent_id: Set(dto.agent_id),
        lead_status: Set(status),
        created_date: Set(now.clone()),
        updated_date: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    tracing::info!(
        "Lead {} created for property {} and assigned to agent {}",
        saved.id,
        saved.property_id,
        saved.agent_id
    );
    Ok(saved)
}

pub async fn get_lead(db: &DatabaseConnection, id: i32) -> Result<LeadWithDetails, DomainError> {
    let found = Lead::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DomainError::NotFound("lead"))?;

    with_details(db, vec![found])
        .await?
        .pop()
        .ok_or(DomainError::NotFound("lead"))
}

/// List leads, most recent first
pub async fn list_leads(
    db: &DatabaseConnection,
    filter: LeadFilter,
) -> Result<Vec<LeadWithDetails>, DomainError> {
    let mut condition = Condition::all();

    if let Some(agent_id) = filter.agent_id {
        condition = condition.add(lead::Column::AgentId.eq(agent_id));
    }
    if let Some(customer_id) = filter.customer_id {
        condition = condition.add(lead::Column::CustomerId.eq(customer_id));
    }
    if let Some(property_id) = filter.property_id {
        condition = condition.add(lead::Column::PropertyId.eq(property_id));
    }
    if let Some(status) = filter.lead_status {
        condition = condition.add(lead::Column::LeadStatus.eq(status));
    }

    let leads = Lead::find()
        .filter(condition)
        .order_by_desc(lead::Column::CreatedDate)
        .order_by_desc(lead::Column::Id)
        .all(db)
        .await?;

    with_details(db, leads).await
}

async fn with_details(
    db: &DatabaseConnection,
    leads: Vec<lead::Model>,
) -> Result<Vec<LeadWithDetails>, DomainError> {
    if leads.is_empty() {
        return Ok(Vec::new());
    }

    let property_ids: Vec<i32> = leads.iter().map(|l| l.property_id).collect();
    let agent_ids: Vec<i32> = leads.iter().map(|l| l.agent_id).collect();
    let customer_ids: Vec<i32> = leads.iter().map(|l| l.customer_id).collect();

    let addresses: HashMap<i32, String> = Property::find()
        .filter(property::Column::Id.is_in(property_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|p| (p.id, p.address))
        .collect();

    let agent_names: HashMap<i32, String> = Agent::find()
        .filter(agent::Column::Id.is_in(agent_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|a| (a.id, a.user_name))
        .collect();

    let customer_names: HashMap<i32, String> = Customer::find()
        .filter(crate::models::customer::Column::Id.is_in(customer_ids))
        .find_also_related(User)
        .all(db)
        .await?
        .into_iter()
        .filter_map(|(c, u)| u.map(|u| (c.id, u.username)))
        .collect();

    Ok(leads
        .into_iter()
        .map(|l| LeadWithDetails {
            property_address: addresses.get(&l.property_id).cloned().unwrap_or_default(),
            agent_name: agent_names.get(&l.agent_id).cloned().unwrap_or_default(),
            customer_name: customer_names.get(&l.customer_id).cloned().unwrap_or_default(),
            id: l.id,
            customer_id: l.customer_id,
            property_id: l.property_id,
            agent_id: l.agent_id,
            lead_status: l.lead_status,
            created_date: l.created_date,
            updated_date: l.updated_date,
        })
        .collect())
}

/// Change how warm a lead is
pub async fn update_lead_status(
    db: &DatabaseConnection,
    id: i32,
    status: &str,
) -> Result<lead::Model, DomainError> {
    let status = LeadStatus::from_str(status)?;
    let found = Lead::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DomainError::NotFound("lead"))?;

    let mut active: lead::ActiveModel = found.into();
    active.lead_status = Set(status);
    active.updated_date = Set(chrono::Utc::now().to_rfc3339());
    Ok(active.update(db).await?)
}

/// Hand a lead over to another active agent
pub async fn reassign_lead(
    db: &DatabaseConnection,
    id: i32,
    agent_id: i32,
) -> Result<lead::Model, DomainError> {
    let found = Lead::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DomainError::NotFound("lead"))?;
    require_active_agent(db, agent_id).await?;

    let mut active: lead::ActiveModel = found.into();
    active.agent_id = Set(agent_id);
    active.updated_date = Set(chrono::Utc::now().to_rfc3339());

    let updated = active.update(db).await?;
    tracing::info!("Lead {} reassigned to agent {}", id, agent_id);
    Ok(updated)
}

pub async fn delete_lead(db: &DatabaseConnection, id: i32) -> Result<(), DomainError> {
    let result = Lead::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(DomainError::NotFound("lead"));
    }
    Ok(())
}

/// Count leads per status
pub async fn count_by_status(
    db: &DatabaseConnection,
) -> Result<HashMap<LeadStatus, u64>, DomainError> {
    let mut counts = HashMap::new();
    for status in LeadStatus::ALL {
        let count = Lead::find()
            .filter(lead::Column::LeadStatus.eq(status))
            .count(db)
            .await?;
        counts.insert(status, count);
    }
    Ok(counts)
}
