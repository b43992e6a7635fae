pub mod account_balance;
pub mod agent;
pub mod city;
pub mod commission;
pub mod customer;
pub mod district;
pub mod lead;
pub mod media;
pub mod property;
pub mod property_category;
pub mod sale;
pub mod task;
pub mod user;

pub use lead::LeadStatus;
pub use media::UploadDir;
pub use task::TaskStatus;

/// A value outside the allowed set for an enumerated column.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {field}: '{value}'")]
pub struct InvalidChoice {
    pub field: &'static str,
    pub value: String,
}

impl InvalidChoice {
    pub fn new(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: value.to_string(),
        }
    }
}
