//! Project requirements and stock sufficiency.
//!
//! Deterministic domain logic only: requirement data contracts plus the
//! evaluator that decides whether a requirement can be issued from a stock
//! snapshot (no IO, no HTTP, no storage).

pub mod requirement;
pub mod sufficiency;

pub use requirement::{
    NewRequirement, NewRequirementLine, Requirement, RequirementLineItem, RequirementStatus,
};
pub use sufficiency::{Availability, ItemAvailability, SufficiencyReport, evaluate, evaluate_lines};
