//! Account Service - running balances per agent

use sea_orm::*;

use crate::domain::DomainError;
use crate::domain::validation;
use crate::models::account_balance::{self, AccountBalanceDto, Entity as AccountBalance};
use crate::models::agent::Entity as Agent;

#[derive(Debug, Clone, serde::Serialize)]
pub struct BalanceWithAgent {
    #[serde(flatten)]
    pub balance: account_balance::Model,
    pub agent_name: String,
}

impl std::fmt::Display for BalanceWithAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Balance for {}", self.agent_name)
    }
}

/// `balance` may go negative (payouts ahead of earnings); the totals may not.
fn validated(dto: &AccountBalanceDto) -> Result<(f64, f64, f64), DomainError> {
    let total_sales = validation::non_negative("total_sales", dto.total_sales)?;
    let earned = validation::non_negative("commission_earned", dto.commission_earned)?;
    if !dto.balance.is_finite() {
        return Err(DomainError::Validation("balance must be a number".to_string()));
    }
    Ok((total_sales, earned, dto.balance))
}

pub async fn create_balance(
    db: &DatabaseConnection,
    dto: AccountBalanceDto,
) -> Result<account_balance::Model, DomainError> {
    let (total_sales, earned, balance) = validated(&dto)?;
    Agent::find_by_id(dto.agent_id)
        .one(db)
        .await?
        .ok_or(DomainError::NotFound("agent"))?;

    let saved = account_balance::ActiveModel {
        agent_id: Set(dto.agent_id),
        total_sales: Set(total_sales),
        commission_earned: Set(earned),
        balance: Set(balance),
        ..Default::default()
    }
    .insert(db)
    .await?;

    Ok(saved)
}

pub async fn get_balance(db: &DatabaseConnection, id: i32) -> Result<BalanceWithAgent, DomainError> {
    let (found, agent) = AccountBalance::find_by_id(id)
        .find_also_related(Agent)
        .one(db)
        .await?
        .ok_or(DomainError::NotFound("account balance"))?;

    Ok(BalanceWithAgent {
        balance: found,
        agent_name: agent.map(|a| a.user_name).unwrap_or_default(),
    })
}

/// All balance rows of one agent, oldest first
pub async fn get_balances_for_agent(
    db: &DatabaseConnection,
    agent_id: i32,
) -> Result<Vec<account_balance::Model>, DomainError> {
    Ok(AccountBalance::find()
        .filter(account_balance::Column::AgentId.eq(agent_id))
        .order_by_asc(account_balance::Column::Id)
        .all(db)
        .await?)
}

pub async fn list_balances(db: &DatabaseConnection) -> Result<Vec<BalanceWithAgent>, DomainError> {
    let rows = AccountBalance::find()
        .order_by_asc(account_balance::Column::Id)
        .find_also_related(Agent)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(balance, agent)| BalanceWithAgent {
            balance,
            agent_name: agent.map(|a| a.user_name).unwrap_or_default(),
        })
        .collect())
}

pub async fn update_balance(
    db: &DatabaseConnection,
    id: i32,
    dto: AccountBalanceDto,
) -> Result<account_balance::Model, DomainError> {
    let (total_sales, earned, balance) = validated(&dto)?;
    let found = AccountBalance::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DomainError::NotFound("account balance"))?;

    let mut active: account_balance::ActiveModel = found.clone().into();
    if dto.agent_id != found.agent_id {
        Agent::find_by_id(dto.agent_id)
            .one(db)
            .await?
            .ok_or(DomainError::NotFound("agent"))?;
        active.agent_id = Set(dto.agent_id);
    }
    active.total_sales = Set(total_sales);
    active.commission_earned = Set(earned);
    active.balance = Set(balance);
    Ok(active.update(db).await?)
}

pub async fn delete_balance(db: &DatabaseConnection, id: i32) -> Result<(), DomainError> {
    let result = AccountBalance::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(DomainError::NotFound("account balance"));
    }
    Ok(())
}
