//! # Domain Layer
//!
//! Entities, value objects, events and errors of the settlement domain.
//!
//! This layer has no knowledge of ledgers, databases or price feeds;
//! it enforces the lifecycle graphs and financial invariants that the
//! application services orchestrate against the outside world.

pub mod entities;
pub mod errors;
pub mod events;
pub mod value_objects;

pub use errors::{DomainError, DomainResult};
