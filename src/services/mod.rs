//! Business logic services.

pub mod change_log;
pub mod deliveryservice_request;
pub mod regex;
