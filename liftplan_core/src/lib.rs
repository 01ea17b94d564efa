#![forbid(unsafe_code)]

//! Core domain model and business logic for starter plan generation.
//!
//! This crate provides:
//! - Domain types (movement patterns, catalog records, plan rows, warnings)
//! - Movement classifier and session blueprints
//! - Catalog providers (CSV and built-in)
//! - Exercise selection, load prescription and volume balancing
//! - Plan assembly and persistence (file-backed plan store)

pub mod types;
pub mod error;
pub mod classifier;
pub mod blueprint;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod selector;
pub mod prescription;
pub mod balancer;
pub mod store;
pub mod persist;
pub mod engine;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use classifier::classify;
pub use blueprint::{get_blueprint, SlotDefinition};
pub use catalog::{validate_catalog, BuiltinCatalog, CatalogProvider, CsvCatalog};
pub use config::{Config, GeneratorConfig};
pub use store::{JsonPlanStore, PlanStore, WorkoutLogEntry};
pub use persist::{persist, PersistReport};
pub use engine::{
    generate_starter_plan, GenerationOutcome, PersistenceOutcome, PlanGenerator, StarterPlanReport,
};
