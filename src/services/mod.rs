//! Services Layer
//!
//! Business logic for the entities that are not behind a repository trait.
//! Agents and properties go through `domain::AgentRepository` and
//! `domain::PropertyRepository` instead.

pub mod account_service;
pub mod assignment;
pub mod catalog_service;
pub mod commission_service;
pub mod customer_service;
pub mod lead_service;
pub mod sale_service;
pub mod task_service;

// Re-export for convenience
pub use assignment::{assign_lead_based_on_location, auto_assign_lead, pick_agent_for_location};
