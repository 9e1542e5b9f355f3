//! Database models and DTOs for all domain entities.

pub mod change_log;
pub mod deliveryservice_request;
pub mod regex;
