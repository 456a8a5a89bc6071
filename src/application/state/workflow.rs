//! Novel workflow - the registry of every slice behind the wizard
//!
//! Typed access goes through the public slice fields; the aggregator,
//! auto-save coordinator and reset orchestrator only ever see the slices
//! through [`NovelWorkflow::slices`] / [`NovelWorkflow::slices_mut`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use super::{aggregator, autosave, reset, Dirtyable, ResetReport, Slice};
use crate::application::ports::outbound::{SliceStorage, StorageError};
use crate::domain::entities::{
    CharactersState, CulturalElementsState, GenreState, ParametersState, PlotStructureState,
    RelationshipDraft, RelationshipsState, SliceState, TimelineState, WizardState,
    WorldSettingsState,
};
use crate::domain::errors::ValidationError;
use crate::domain::value_objects::{RelationshipId, WorkflowStep};

pub const SLICE_COUNT: usize = 9;

pub struct NovelWorkflow {
    pub wizard: Slice<WizardState>,
    pub genre: Slice<GenreState>,
    pub world: Slice<WorldSettingsState>,
    pub plot: Slice<PlotStructureState>,
    pub characters: Slice<CharactersState>,
    pub relationships: Slice<RelationshipsState>,
    pub timeline: Slice<TimelineState>,
    pub cultural: Slice<CulturalElementsState>,
    pub parameters: Slice<ParametersState>,
    pub generation: GenerationStatus,
}

/// Progress of the final generation request. Lives beside the slices: never
/// persisted, never makes the workflow dirty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationStatus {
    pub is_generating: bool,
    pub last_error: Option<String>,
}

/// Everything entered in the wizard, as shown on the review step
#[derive(Debug, Clone, Serialize)]
pub struct NovelBlueprint {
    pub wizard: WizardState,
    pub genre: GenreState,
    pub world: WorldSettingsState,
    pub plot: PlotStructureState,
    pub characters: CharactersState,
    pub relationships: RelationshipsState,
    pub timeline: TimelineState,
    pub cultural: CulturalElementsState,
    pub parameters: ParametersState,
    pub incomplete_steps: Vec<WorkflowStep>,
    pub generated_at: DateTime<Utc>,
}

impl NovelWorkflow {
    pub fn load(storage: Arc<dyn SliceStorage>) -> Self {
        let workflow = Self {
            wizard: Slice::load(storage.clone()),
            genre: Slice::load(storage.clone()),
            world: Slice::load(storage.clone()),
            plot: Slice::load(storage.clone()),
            characters: Slice::load(storage.clone()),
            relationships: Slice::load(storage.clone()),
            timeline: Slice::load(storage.clone()),
            cultural: Slice::load(storage.clone()),
            parameters: Slice::load(storage),
            generation: GenerationStatus::default(),
        };
        info!(step = %workflow.current_step(), "Workflow loaded");
        workflow
    }

    /// Every registered slice, in a fixed order
    pub fn slices(&self) -> [&dyn Dirtyable; SLICE_COUNT] {
        [
            &self.wizard,
            &self.genre,
            &self.world,
            &self.plot,
            &self.characters,
            &self.relationships,
            &self.timeline,
            &self.cultural,
            &self.parameters,
        ]
    }

    pub fn slices_mut(&mut self) -> [&mut dyn Dirtyable; SLICE_COUNT] {
        [
            &mut self.wizard,
            &mut self.genre,
            &mut self.world,
            &mut self.plot,
            &mut self.characters,
            &mut self.relationships,
            &mut self.timeline,
            &mut self.cultural,
            &mut self.parameters,
        ]
    }

    pub fn is_dirty(&self) -> bool {
        aggregator::is_workflow_dirty(self.slices())
    }

    pub fn dirty_slices(&self) -> Vec<&'static str> {
        aggregator::dirty_slices(self.slices())
    }

    /// Sum of slice revisions; grows with every mutation or reset anywhere
    pub fn revision(&self) -> u64 {
        self.slices().iter().map(|s| s.revision()).sum()
    }

    /// Explicit save: mark every slice clean
    pub fn flush(&mut self) -> usize {
        let cleaned = autosave::flush(self.slices_mut());
        info!(cleaned, "Workflow saved");
        cleaned
    }

    pub fn reset_all(&mut self) -> ResetReport {
        self.generation = GenerationStatus::default();
        reset::reset_all(self.slices_mut())
    }

    /// Storage warnings collected since the last call, by slice key
    pub fn take_warnings(&mut self) -> Vec<(&'static str, StorageError)> {
        self.slices_mut()
            .into_iter()
            .filter_map(|slice| {
                let key = slice.key();
                slice.take_warning().map(|w| (key, w))
            })
            .collect()
    }

    /// Merge fields into the slice stored under `key`
    pub fn set_partial(&mut self, key: &str, patch: serde_json::Value) -> Result<(), ValidationError> {
        debug!(key, "Merging fields into slice");
        match key {
            WizardState::KEY => self.wizard.set_partial(patch),
            GenreState::KEY => self.genre.set_partial(patch),
            WorldSettingsState::KEY => self.world.set_partial(patch),
            PlotStructureState::KEY => self.plot.set_partial(patch),
            CharactersState::KEY => self.characters.set_partial(patch),
            RelationshipsState::KEY => self.relationships.set_partial(patch),
            TimelineState::KEY => self.timeline.set_partial(patch),
            CulturalElementsState::KEY => self.cultural.set_partial(patch),
            ParametersState::KEY => self.parameters.set_partial(patch),
            other => Err(unknown_slice(other)),
        }
    }

    /// Current fields of the slice stored under `key`, as JSON
    pub fn snapshot(&self, key: &str) -> Result<serde_json::Value, ValidationError> {
        let value = match key {
            WizardState::KEY => serde_json::to_value(self.wizard.get()),
            GenreState::KEY => serde_json::to_value(self.genre.get()),
            WorldSettingsState::KEY => serde_json::to_value(self.world.get()),
            PlotStructureState::KEY => serde_json::to_value(self.plot.get()),
            CharactersState::KEY => serde_json::to_value(self.characters.get()),
            RelationshipsState::KEY => serde_json::to_value(self.relationships.get()),
            TimelineState::KEY => serde_json::to_value(self.timeline.get()),
            CulturalElementsState::KEY => serde_json::to_value(self.cultural.get()),
            ParametersState::KEY => serde_json::to_value(self.parameters.get()),
            other => return Err(unknown_slice(other)),
        };
        value.map_err(|e| ValidationError::Schema {
            slice: "workflow",
            message: e.to_string(),
        })
    }

    pub fn current_step(&self) -> WorkflowStep {
        self.wizard.get().current_step
    }

    pub fn go_to_step(&mut self, step: WorkflowStep) -> Result<(), ValidationError> {
        self.wizard.update(|w| w.set_current_step(step))
    }

    /// Whether the given step has what it needs; review needs every other step
    pub fn step_complete(&self, step: WorkflowStep) -> bool {
        match step {
            WorkflowStep::Start => true,
            WorkflowStep::BasicInfo => self.wizard.can_continue(),
            WorkflowStep::Genre => self.genre.can_continue(),
            WorkflowStep::WorldSettings => {
                self.world.can_continue() && self.cultural.can_continue()
            }
            WorkflowStep::PlotStructure => self.plot.can_continue(),
            WorkflowStep::Characters => self.characters.can_continue(),
            WorkflowStep::Relationships => self.relationships.can_continue(),
            WorkflowStep::Timeline => self.timeline.can_continue(),
            WorkflowStep::Parameters => self.parameters.can_continue(),
            WorkflowStep::Review => self.incomplete_steps().is_empty(),
        }
    }

    pub fn incomplete_steps(&self) -> Vec<WorkflowStep> {
        WorkflowStep::ALL
            .iter()
            .copied()
            .filter(|step| *step != WorkflowStep::Review && !self.step_complete(*step))
            .collect()
    }

    /// Add a relationship after checking both ends exist in the character roster
    pub fn add_relationship(
        &mut self,
        draft: RelationshipDraft,
    ) -> Result<RelationshipId, ValidationError> {
        let roster = self.characters.get();
        for (field, id) in [
            ("character1_id", draft.character1_id),
            ("character2_id", draft.character2_id),
        ] {
            if !roster.contains(id) {
                return Err(ValidationError::DanglingReference {
                    field,
                    id: id.to_string(),
                });
            }
        }
        self.relationships.try_update(|r| r.add_relationship(draft))
    }

    /// Start generating from the blueprint. Every step must be complete and
    /// only one generation may run at a time.
    pub fn begin_generation(&mut self) -> Result<NovelBlueprint, ValidationError> {
        if self.generation.is_generating {
            return Err(ValidationError::invalid("generation", "already in progress"));
        }
        if let Some(step) = self.incomplete_steps().first() {
            return Err(ValidationError::invalid(
                "generation",
                format!("step `{}` is not complete", step),
            ));
        }
        self.generation = GenerationStatus {
            is_generating: true,
            last_error: None,
        };
        info!("Novel generation started");
        Ok(self.blueprint())
    }

    pub fn finish_generation(&mut self, result: Result<(), String>) {
        if let Err(ref error) = result {
            tracing::warn!(%error, "Novel generation failed");
        }
        self.generation = GenerationStatus {
            is_generating: false,
            last_error: result.err(),
        };
    }

    pub fn blueprint(&self) -> NovelBlueprint {
        NovelBlueprint {
            wizard: self.wizard.get().clone(),
            genre: self.genre.get().clone(),
            world: self.world.get().clone(),
            plot: self.plot.get().clone(),
            characters: self.characters.get().clone(),
            relationships: self.relationships.get().clone(),
            timeline: self.timeline.get().clone(),
            cultural: self.cultural.get().clone(),
            parameters: self.parameters.get().clone(),
            incomplete_steps: self.incomplete_steps(),
            generated_at: Utc::now(),
        }
    }
}

impl std::fmt::Debug for NovelWorkflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NovelWorkflow")
            .field("current_step", &self.current_step())
            .field("dirty_slices", &self.dirty_slices())
            .field("revision", &self.revision())
            .field("generation", &self.generation)
            .finish()
    }
}

fn unknown_slice(key: &str) -> ValidationError {
    ValidationError::UnknownValue {
        field: "slice",
        value: key.to_string(),
    }
}
