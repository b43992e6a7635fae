//! Task Service - work items handed to agents

use sea_orm::*;
use std::str::FromStr;

use crate::domain::DomainError;
use crate::domain::validation;
use crate::models::agent::Entity as Agent;
use crate::models::task::{self, Entity as Task, TaskDto, TaskStatus};

/// Task together with the assignee's name
#[derive(Debug, Clone, serde::Serialize)]
pub struct TaskWithAgent {
    #[serde(flatten)]
    pub task: task::Model,
    pub agent_name: String,
}

impl std::fmt::Display for TaskWithAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Task for {} - {}", self.agent_name, self.task.task_status)
    }
}

#[derive(Debug, Default, Clone)]
pub struct TaskFilter {
    pub agent_id: Option<i32>,
    pub task_status: Option<TaskStatus>,
}

/// Only an absent status means the default; anything given must match exactly.
fn parse_status(status: Option<&str>) -> Result<TaskStatus, DomainError> {
    match status {
        None => Ok(TaskStatus::default()),
        Some(s) => Ok(TaskStatus::from_str(s)?),
    }
}

/// Create a task. Without an explicit status it starts as "Not accepted".
pub async fn create_task(db: &DatabaseConnection, dto: TaskDto) -> Result<task::Model, DomainError> {
    let status = parse_status(dto.task_status.as_deref())?;
    let deadline = validation::timestamp("deadline", &dto.deadline)?;
    let description = dto.description.trim().to_string();
    if description.is_empty() {
        return Err(DomainError::Validation("description is required".to_string()));
    }
    super::lead_service::require_active_agent(db, dto.agent_id).await?;

    let saved = task::ActiveModel {
        agent_id: Set(dto.agent_id),
        deadline: Set(deadline),
        description: Set(description),
        task_status: Set(status),
        ..Default::default()
    }
    .insert(db)
    .await?;

    tracing::debug!("Task {} assigned to agent {}", saved.id, saved.agent_id);
    Ok(saved)
}

pub async fn get_task(db: &DatabaseConnection, id: i32) -> Result<TaskWithAgent, DomainError> {
    let (found, agent) = Task::find_by_id(id)
        .find_also_related(Agent)
        .one(db)
        .await?
        .ok_or(DomainError::NotFound("task"))?;

    Ok(TaskWithAgent {
        task: found,
        agent_name: agent.map(|a| a.user_name).unwrap_or_default(),
    })
}

/// List tasks by nearest deadline
pub async fn list_tasks(
    db: &DatabaseConnection,
    filter: TaskFilter,
) -> Result<Vec<TaskWithAgent>, DomainError> {
    let mut query = Task::find();

    if let Some(agent_id) = filter.agent_id {
        query = query.filter(task::Column::AgentId.eq(agent_id));
    }
    if let Some(status) = filter.task_status {
        query = query.filter(task::Column::TaskStatus.eq(status));
    }

    let rows = query
        .order_by_asc(task::Column::Deadline)
        .find_also_related(Agent)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(task, agent)| TaskWithAgent {
            task,
            agent_name: agent.map(|a| a.user_name).unwrap_or_default(),
        })
        .collect())
}

/// Move a task to any status; there is no fixed workflow.
pub async fn update_task_status(
    db: &DatabaseConnection,
    id: i32,
    status: &str,
) -> Result<task::Model, DomainError> {
    let status = TaskStatus::from_str(status)?;
    let found = Task::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DomainError::NotFound("task"))?;

    let mut active: task::ActiveModel = found.into();
    active.task_status = Set(status);
    Ok(active.update(db).await?)
}

/// Update deadline, description and assignee of a task
pub async fn update_task(
    db: &DatabaseConnection,
    id: i32,
    dto: TaskDto,
) -> Result<task::Model, DomainError> {
    let found = Task::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DomainError::NotFound("task"))?;

    let mut active: task::ActiveModel = found.clone().into();
    if dto.agent_id != found.agent_id {
        super::lead_service::require_active_agent(db, dto.agent_id).await?;
        active.agent_id = Set(dto.agent_id);
    }
    active.deadline = Set(validation::timestamp("deadline", &dto.deadline)?);
    let description = dto.description.trim().to_string();
    if description.is_empty() {
        return Err(DomainError::Validation("description is required".to_string()));
    }
    active.description = Set(description);
    if let Some(status) = dto.task_status.as_deref() {
        active.task_status = Set(parse_status(Some(status))?);
    }

    Ok(active.update(db).await?)
}

pub async fn delete_task(db: &DatabaseConnection, id: i32) -> Result<(), DomainError> {
    let result = Task::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(DomainError::NotFound("task"));
    }
    Ok(())
}
