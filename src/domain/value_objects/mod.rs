//! Value objects - Immutable objects defined by their attributes

mod genre;
mod ids;
mod narrative;
mod relationship;
mod workflow_step;

pub use genre::{Genre, GenreApproach};
pub use ids::*;
pub use narrative::{CharacterRole, ContentRating, Pacing, PlotStructureKind, PointOfView, Tense};
pub use relationship::{RelationshipType, MAX_STRENGTH, MIN_STRENGTH};
pub use workflow_step::WorkflowStep;
