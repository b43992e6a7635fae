//! Application state containing repositories and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::domain::{AgentRepository, PropertyRepository};
use crate::infrastructure::{SeaOrmAgentRepository, SeaOrmPropertyRepository};

/// State shared by everything that talks to the store
#[derive(Clone)]
pub struct AppState {
    /// Database connection, used directly by the service functions
    db: DatabaseConnection,
    /// Agent repository
    pub agent_repo: Arc<dyn AgentRepository>,
    /// Property repository
    pub property_repo: Arc<dyn PropertyRepository>,
}

impl AppState {
    /// Create a new AppState with all repositories initialized
    pub fn new(db: DatabaseConnection) -> Self {
        let agent_repo = Arc::new(SeaOrmAgentRepository::new(db.clone()));
        let property_repo = Arc::new(SeaOrmPropertyRepository::new(db.clone()));

        Self {
            db,
            agent_repo,
            property_repo,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl AsRef<DatabaseConnection> for AppState {
    fn as_ref(&self) -> &DatabaseConnection {
        &self.db
    }
}
