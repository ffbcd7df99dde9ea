//! Application-level configuration.
//!
//! - [`HearingParams`]: protocol rules and pacing for each hearing
//! - [`RoleModels`]: which model backs which role

pub mod hearing_params;
pub mod role_models;

pub use hearing_params::HearingParams;
pub use role_models::RoleModels;
