//! Configuration module
//!
//! YAML schema, loading with environment overrides, and validation.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{ConfigLoader, LoadResult, LoadWarning};
pub use schema::{AutofisherConfig, AutomationConfig, SimulationConfig};
