//! Domain layer - Novel workflow data with no infrastructure dependencies
//!
//! This layer contains:
//! - Entities: the per-step state of the wizard (genre, characters, timeline, ...)
//! - Value Objects: identifiers, workflow steps, enumerations
//! - Errors: validation failures raised at the mutation boundary

pub mod entities;
pub mod errors;
pub mod value_objects;
