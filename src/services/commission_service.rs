//! Commission Service - commission records per agent

use sea_orm::*;

use crate::domain::DomainError;
use crate::domain::validation;
use crate::models::agent::Entity as Agent;
use crate::models::commission::{self, CommissionDto, Entity as Commission};

#[derive(Debug, Clone, serde::Serialize)]
pub struct CommissionWithAgent {
    #[serde(flatten)]
    pub commission: commission::Model,
    pub agent_name: String,
}

impl std::fmt::Display for CommissionWithAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Commission for {}", self.agent_name)
    }
}

fn validated(dto: &CommissionDto) -> Result<(f64, f64), DomainError> {
    let percentage = validation::non_negative("percentage", dto.percentage)?;
    if percentage > 100.0 {
        return Err(DomainError::Validation(
            "percentage must be at most 100".to_string(),
        ));
    }
    let amount = validation::non_negative("commission_amount", dto.commission_amount)?;
    Ok((percentage, amount))
}

pub async fn create_commission(
    db: &DatabaseConnection,
    dto: CommissionDto,
) -> Result<commission::Model, DomainError> {
    let (percentage, amount) = validated(&dto)?;
    Agent::find_by_id(dto.agent_id)
        .one(db)
        .await?
        .ok_or(DomainError::NotFound("agent"))?;

    let saved = commission::ActiveModel {
        agent_id: Set(dto.agent_id),
        percentage: Set(percentage),
        commission_amount: Set(amount),
        ..Default::default()
    }
    .insert(db)
    .await?;

    tracing::debug!("Commission {} recorded for agent {}", saved.id, saved.agent_id);
    Ok(saved)
}

pub async fn get_commission(
    db: &DatabaseConnection,
    id: i32,
) -> Result<CommissionWithAgent, DomainError> {
    let (found, agent) = Commission::find_by_id(id)
        .find_also_related(Agent)
        .one(db)
        .await?
        .ok_or(DomainError::NotFound("commission"))?;

    Ok(CommissionWithAgent {
        commission: found,
        agent_name: agent.map(|a| a.user_name).unwrap_or_default(),
    })
}

/// List commissions, optionally for a single agent
pub async fn list_commissions(
    db: &DatabaseConnection,
    agent_id: Option<i32>,
) -> Result<Vec<CommissionWithAgent>, DomainError> {
    let mut query = Commission::find();
    if let Some(agent_id) = agent_id {
        query = query.filter(commission::Column::AgentId.eq(agent_id));
    }

    let rows = query
        .order_by_asc(commission::Column::Id)
        .find_also_related(Agent)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(commission, agent)| CommissionWithAgent {
            commission,
            agent_name: agent.map(|a| a.user_name).unwrap_or_default(),
        })
        .collect())
}

pub async fn update_commission(
    db: &DatabaseConnection,
    id: i32,
    dto: CommissionDto,
) -> Result<commission::Model, DomainError> {
    let (percentage, amount) = validated(&dto)?;
    let found = Commission::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DomainError::NotFound("commission"))?;

    let mut active: commission::ActiveModel = found.clone().into();
    if dto.agent_id != found.agent_id {
        Agent::find_by_id(dto.agent_id)
            .one(db)
            .await?
            .ok_or(DomainError::NotFound("agent"))?;
        active.agent_id = Set(dto.agent_id);
    }
    active.percentage = Set(percentage);
    active.commission_amount = Set(amount);
    Ok(active.update(db).await?)
}

pub async fn delete_commission(db: &DatabaseConnection, id: i32) -> Result<(), DomainError> {
    let result = Commission::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(DomainError::NotFound("commission"));
    }
    Ok(())
}

/// Sum of recorded commission amounts for an agent
pub async fn total_for_agent(db: &DatabaseConnection, agent_id: i32) -> Result<f64, DomainError> {
    let rows = Commission::find()
        .filter(commission::Column::AgentId.eq(agent_id))
        .all(db)
        .await?;
    Ok(rows.iter().map(|c| c.commission_amount).sum())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto(percentage: f64, amount: f64) -> CommissionDto {
        CommissionDto {
            agent_id: 1,
            percentage,
            commission_amount: amount,
        }
    }

    #[test]
    fn accepts_figures_as_given() {
        assert_eq!(validated(&dto(10.0, 7.5)).unwrap(), (10.0, 7.5));
        assert_eq!(validated(&dto(0.0, 0.0)).unwrap(), (0.0, 0.0));
    }

    #[test]
    fn rejects_out_of_range_figures() {
        assert!(validated(&dto(-1.0, 5.0)).is_err());
        assert!(validated(&dto(120.0, 5.0)).is_err());
        assert!(validated(&dto(5.0, f64::NAN)).is_err());
    }
}
