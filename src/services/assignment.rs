//! Lead auto-assignment by location
//!
//! An agent matches when it is active and its stored location equals the
//! requested one after trimming and lowercasing. Ties go to the lowest id.

use sea_orm::DatabaseConnection;

use crate::domain::{AgentRepository, DomainError};
use crate::infrastructure::SeaOrmAgentRepository;
use crate::infrastructure::repositories::agent_repository::normalize_location;
use crate::models::agent;
use crate::models::lead::{self, LeadDto, LeadStatus};

/// Pick the agent covering `location` from an explicit list of agents.
pub fn pick_agent_for_location<'a>(
    agents: &'a [agent::Model],
    location: &str,
) -> Option<&'a agent::Model> {
    let wanted = normalize_location(location);
    if wanted.is_empty() {
        return None;
    }

    agents
        .iter()
        .filter(|a| a.is_active)
        .filter(|a| {
            a.location
                .as_deref()
                .is_some_and(|l| normalize_location(l) == wanted)
        })
        .min_by_key(|a| a.id)
}

/// Find the agent a new lead from `location` should go to.
///
/// No matching agent is not an error: the caller gets `Ok(None)` and decides.
pub async fn assign_lead_based_on_location(
    db: &DatabaseConnection,
    location: &str,
) -> Result<Option<agent::Model>, DomainError> {
    let agents = SeaOrmAgentRepository::new(db.clone())
        .find_by_location(location)
        .await?;

    let picked = pick_agent_for_location(&agents, location).cloned();
    match &picked {
        Some(a) => tracing::debug!("Location '{}' assigned to agent {}", location.trim(), a.id),
        None => tracing::info!("No agent covers location '{}'", location.trim()),
    }
    Ok(picked)
}

/// Create a lead for whichever agent covers `location`.
///
/// Returns `Ok(None)` without writing anything when no agent matches.
pub async fn auto_assign_lead(
    db: &DatabaseConnection,
    customer_id: i32,
    property_id: i32,
    location: &str,
    status: LeadStatus,
) -> Result<Option<lead::Model>, DomainError> {
    let Some(agent) = assign_lead_based_on_location(db, location).await? else {
        return Ok(None);
    };

    let saved = super::lead_service::create_lead(
        db,
        LeadDto {
            id: None,
            customer_id,
            property_id,
            agent_id: agent.id,
            lead_status: status.as_str().to_string(),
        },
    )
    .await?;
    Ok(Some(saved))
}
