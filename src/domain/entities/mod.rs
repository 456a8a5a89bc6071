//! Entities - The state behind each step of the wizard
//!
//! Every type here implements [`SliceState`] and is held by exactly one slice.

mod character;
mod cultural_elements;
mod genre_selection;
mod parameters;
mod plot_structure;
mod relationship;
mod slice_state;
mod timeline;
mod wizard;
mod world_settings;

pub use character::{CharacterProfile, CharacterUpdate, CharactersState};
pub use cultural_elements::{CulturalElementsState, SUGGESTED_ELEMENTS};
pub use genre_selection::GenreState;
pub use parameters::ParametersState;
pub use plot_structure::{PlotPoint, PlotStructureState};
pub use relationship::{Relationship, RelationshipDraft, RelationshipUpdate, RelationshipsState};
pub use slice_state::SliceState;
pub use timeline::{TimelineEvent, TimelineState};
pub use wizard::{BasicInfo, WizardState};
pub use world_settings::{MagicLevel, TechnologyLevel, WorldSettingsState, WorldType};
