use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::InvalidChoice;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub agent_id: i32,
    pub deadline: String,
    pub description: String,
    pub task_status: TaskStatus,
}

/// Progress of a task. Any status may follow any other.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(32))")]
pub enum TaskStatus {
    #[default]
    #[sea_orm(string_value = "Not accepted")]
    #[serde(rename = "Not accepted")]
    NotAccepted,
    #[sea_orm(string_value = "Accepted")]
    Accepted,
    #[sea_orm(string_value = "Completed")]
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::NotAccepted => "Not accepted",
            TaskStatus::Accepted => "Accepted",
            TaskStatus::Completed => "Completed",
        }
    }
}

impl FromStr for TaskStatus {
    type Err = InvalidChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Not accepted" => Ok(TaskStatus::NotAccepted),
            "Accepted" => Ok(TaskStatus::Accepted),
            "Completed" => Ok(TaskStatus::Completed),
            other => Err(InvalidChoice::new("task_status", other)),
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::agent::Entity",
        from = "Column::AgentId",
        to = "super::agent::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Agent,
}

impl Related<super::agent::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Agent.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDto {
    pub id: Option<i32>,
    pub agent_id: i32,
    pub deadline: String,
    pub description: String,
    /// Defaults to "Not accepted" when absent.
    pub task_status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_status_is_not_accepted() {
        assert_eq!(TaskStatus::default(), TaskStatus::NotAccepted);
        assert_eq!(TaskStatus::default().as_str(), "Not accepted");
    }

    #[test]
    fn round_trips_display_names() {
        for status in [
            TaskStatus::NotAccepted,
            TaskStatus::Accepted,
            TaskStatus::Completed,
        ] {
            assert_eq!(status.as_str().parse::<TaskStatus>().unwrap(), status);
        }
        assert!("not accepted".parse::<TaskStatus>().is_err());
    }
}
