//! Domain model for people, chores, templates, acts and areas.
//!
//! # Responsibility
//! - Define canonical records used by workflow and persistence code.
//! - Keep the JSON-shaped `data` maps typed for known keys.
//!
//! # Invariants
//! - Every stored record is identified by a caller-assigned UUID.
//! - Known `data` keys keep their original JSON names.

pub mod act;
pub mod area;
pub mod chore;
pub mod person;
pub mod template;
