//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate load → workflow operation → persist for chores.
//! - Instantiate chores from drafts and templates (the chore factory).
//! - Run the reminder sweep and the act/area triggers that spawn chores.
//!
//! # Invariants
//! - Services persist only after a transition reports a change.
//! - Service layer remains storage-agnostic through repository traits.

pub mod act_service;
pub mod area_service;
pub mod chore_service;
