//! Repository implementations using SeaORM

pub mod agent_repository;
pub mod property_repository;

pub use agent_repository::SeaOrmAgentRepository;
pub use property_repository::SeaOrmPropertyRepository;
