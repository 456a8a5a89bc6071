//! Relationship web - bonds between pairs of characters

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::SliceState;
use crate::domain::errors::ValidationError;
use crate::domain::value_objects::{
    CharacterId, RelationshipId, RelationshipType, MAX_STRENGTH, MIN_STRENGTH,
};

/// A directed-by-convention bond between two characters.
///
/// Character ids are not checked against the roster here; see
/// `NovelWorkflow::add_relationship` for the checked variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: RelationshipId,
    pub character1_id: CharacterId,
    pub character2_id: CharacterId,
    #[serde(rename = "type")]
    pub relationship_type: RelationshipType,
    /// 1 (acquaintance) to 10 (defining bond)
    pub strength: u8,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub history: String,
    /// Appended in order, duplicates allowed
    #[serde(default)]
    pub dynamics: Vec<String>,
    /// Appended in order, duplicates allowed
    #[serde(default)]
    pub conflicts: Vec<String>,
}

impl Relationship {
    pub fn involves(&self, character: CharacterId) -> bool {
        self.character1_id == character || self.character2_id == character
    }

    /// The other side of the relationship, if `character` takes part in it
    pub fn counterpart(&self, character: CharacterId) -> Option<CharacterId> {
        if self.character1_id == character {
            Some(self.character2_id)
        } else if self.character2_id == character {
            Some(self.character1_id)
        } else {
            None
        }
    }
}

/// Input for a new relationship; the id is assigned on insert
#[derive(Debug, Clone)]
pub struct RelationshipDraft {
    pub character1_id: CharacterId,
    pub character2_id: CharacterId,
    pub relationship_type: RelationshipType,
    pub strength: u8,
    pub description: String,
    pub history: String,
}

impl RelationshipDraft {
    pub fn new(
        character1_id: CharacterId,
        character2_id: CharacterId,
        relationship_type: RelationshipType,
        strength: u8,
    ) -> Self {
        Self {
            character1_id,
            character2_id,
            relationship_type,
            strength,
            description: String::new(),
            history: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_history(mut self, history: impl Into<String>) -> Self {
        self.history = history.into();
        self
    }
}

/// Requested changes to a relationship; `None` leaves the field alone
#[derive(Debug, Clone, Default)]
pub struct RelationshipUpdate {
    pub relationship_type: Option<RelationshipType>,
    pub strength: Option<u8>,
    pub description: Option<String>,
    pub history: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelationshipsState {
    pub relationships: BTreeMap<RelationshipId, Relationship>,
}

impl RelationshipsState {
    pub fn add_relationship(
        &mut self,
        draft: RelationshipDraft,
    ) -> Result<RelationshipId, ValidationError> {
        validate_strength(draft.strength)?;
        if draft.character1_id == draft.character2_id {
            return Err(ValidationError::invalid(
                "character2_id",
                "a character cannot be in a relationship with itself",
            ));
        }
        let id = RelationshipId::new();
        self.relationships.insert(
            id,
            Relationship {
                id,
                character1_id: draft.character1_id,
                character2_id: draft.character2_id,
                relationship_type: draft.relationship_type,
                strength: draft.strength,
                description: draft.description,
                history: draft.history,
                dynamics: Vec::new(),
                conflicts: Vec::new(),
            },
        );
        Ok(id)
    }

    pub fn update_relationship(
        &mut self,
        id: RelationshipId,
        update: RelationshipUpdate,
    ) -> Result<(), ValidationError> {
        if let Some(strength) = update.strength {
            validate_strength(strength)?;
        }
        let relationship = self.get_mut(id)?;
        if let Some(relationship_type) = update.relationship_type {
            relationship.relationship_type = relationship_type;
        }
        if let Some(strength) = update.strength {
            relationship.strength = strength;
        }
        if let Some(description) = update.description {
            relationship.description = description;
        }
        if let Some(history) = update.history {
            relationship.history = history;
        }
        Ok(())
    }

    pub fn remove_relationship(&mut self, id: RelationshipId) -> Result<Relationship, ValidationError> {
        self.relationships
            .remove(&id)
            .ok_or_else(|| ValidationError::not_found("Relationship", id))
    }

    pub fn add_dynamic(&mut self, id: RelationshipId, dynamic: impl Into<String>) -> Result<(), ValidationError> {
        self.get_mut(id)?.dynamics.push(dynamic.into());
        Ok(())
    }

    pub fn remove_dynamic(&mut self, id: RelationshipId, index: usize) -> Result<String, ValidationError> {
        let dynamics = &mut self.get_mut(id)?.dynamics;
        if index >= dynamics.len() {
            return Err(ValidationError::not_found("Dynamic", index));
        }
        Ok(dynamics.remove(index))
    }

    pub fn add_conflict(&mut self, id: RelationshipId, conflict: impl Into<String>) -> Result<(), ValidationError> {
        self.get_mut(id)?.conflicts.push(conflict.into());
        Ok(())
    }

    pub fn remove_conflict(&mut self, id: RelationshipId, index: usize) -> Result<String, ValidationError> {
        let conflicts = &mut self.get_mut(id)?.conflicts;
        if index >= conflicts.len() {
            return Err(ValidationError::not_found("Conflict", index));
        }
        Ok(conflicts.remove(index))
    }

    pub fn get(&self, id: RelationshipId) -> Option<&Relationship> {
        self.relationships.get(&id)
    }

    pub fn involving(&self, character: CharacterId) -> impl Iterator<Item = &Relationship> {
        self.relationships
            .values()
            .filter(move |r| r.involves(character))
    }

    fn get_mut(&mut self, id: RelationshipId) -> Result<&mut Relationship, ValidationError> {
        self.relationships
            .get_mut(&id)
            .ok_or_else(|| ValidationError::not_found("Relationship", id))
    }
}

fn validate_strength(strength: u8) -> Result<(), ValidationError> {
    if (MIN_STRENGTH..=MAX_STRENGTH).contains(&strength) {
        Ok(())
    } else {
        Err(ValidationError::out_of_range(
            "strength",
            MIN_STRENGTH as i64,
            MAX_STRENGTH as i64,
            strength as i64,
        ))
    }
}

impl SliceState for RelationshipsState {
    const KEY: &'static str = "novel-relationships-storage";

    fn validate(&self) -> Result<(), ValidationError> {
        for (key, relationship) in &self.relationships {
            if *key != relationship.id {
                return Err(ValidationError::invalid(
                    "relationship id",
                    format!("stored under {} but carries {}", key, relationship.id),
                ));
            }
            validate_strength(relationship.strength)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rivals() -> (RelationshipsState, RelationshipId, CharacterId, CharacterId) {
        let mut state = RelationshipsState::default();
        let a = CharacterId::new();
        let b = CharacterId::new();
        let id = state
            .add_relationship(
                RelationshipDraft::new(a, b, RelationshipType::Rival, 7)
                    .with_description("Competing heirs"),
            )
            .unwrap();
        (state, id, a, b)
    }

    #[test]
    fn test_add_relationship_assigns_fresh_id() {
        let (mut state, first, a, b) = rivals();
        let second = state
            .add_relationship(RelationshipDraft::new(b, a, RelationshipType::Friend, 3))
            .unwrap();
        assert_ne!(first, second);
        assert_eq!(state.relationships.len(), 2);
        assert_eq!(state.get(first).map(|r| r.strength), Some(7));
        assert_eq!(state.involving(a).count(), 2);
        assert_eq!(state.get(first).and_then(|r| r.counterpart(a)), Some(b));
    }

    #[test]
    fn test_strength_is_bounded() {
        let (mut state, id, a, b) = rivals();
        for strength in [0, 11] {
            let result =
                state.add_relationship(RelationshipDraft::new(a, b, RelationshipType::Enemy, strength));
            assert!(matches!(result, Err(ValidationError::OutOfRange { .. })));
        }
        let update = RelationshipUpdate {
            strength: Some(12),
            description: Some("ignored".to_string()),
            ..Default::default()
        };
        assert!(state.update_relationship(id, update).is_err());
        assert_eq!(state.get(id).map(|r| r.description.as_str()), Some("Competing heirs"));
    }

    #[test]
    fn test_self_relationship_rejected() {
        let mut state = RelationshipsState::default();
        let a = CharacterId::new();
        let result = state.add_relationship(RelationshipDraft::new(a, a, RelationshipType::Custom, 5));
        assert!(result.is_err());
        assert!(state.relationships.is_empty());
    }

    #[test]
    fn test_dynamics_and_conflicts_keep_duplicates() {
        let (mut state, id, _, _) = rivals();
        state.add_dynamic(id, "mutual respect").unwrap();
        state.add_dynamic(id, "mutual respect").unwrap();
        state.add_conflict(id, "the inheritance").unwrap();

        let relationship = state.get(id).unwrap();
        assert_eq!(relationship.dynamics.len(), 2);
        assert_eq!(relationship.conflicts, vec!["the inheritance".to_string()]);

        assert_eq!(state.remove_dynamic(id, 0), Ok("mutual respect".to_string()));
        assert!(state.remove_conflict(id, 5).is_err());
        assert_eq!(state.get(id).map(|r| r.dynamics.len()), Some(1));
    }

    #[test]
    fn test_type_serializes_lowercase() {
        let (state, id, _, _) = rivals();
        let json = serde_json::to_value(state.get(id).unwrap()).unwrap();
        assert_eq!(json["type"], "rival");
    }
}
