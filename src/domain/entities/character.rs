//! Character roster - the cast sketched on the characters step

use serde::{Deserialize, Serialize};

use super::SliceState;
use crate::domain::errors::ValidationError;
use crate::domain::value_objects::{CharacterId, CharacterRole};

pub const MAX_NAME_LENGTH: usize = 255;

/// A character of the novel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterProfile {
    pub id: CharacterId,
    pub name: String,
    pub role: CharacterRole,
    pub description: String,
    /// Personality traits, kept unique
    #[serde(default)]
    pub traits: Vec<String>,
    #[serde(default)]
    pub goals: String,
    #[serde(default)]
    pub backstory: String,
}

impl CharacterProfile {
    pub fn new(name: impl Into<String>, role: CharacterRole) -> Self {
        Self {
            id: CharacterId::new(),
            name: name.into(),
            role,
            description: String::new(),
            traits: Vec::new(),
            goals: String::new(),
            backstory: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_goals(mut self, goals: impl Into<String>) -> Self {
        self.goals = goals.into();
        self
    }

    pub fn with_backstory(mut self, backstory: impl Into<String>) -> Self {
        self.backstory = backstory.into();
        self
    }

    pub fn with_trait(mut self, character_trait: impl Into<String>) -> Self {
        let character_trait = character_trait.into();
        if !self.traits.contains(&character_trait) {
            self.traits.push(character_trait);
        }
        self
    }
}

/// Requested changes to a character; `None` leaves the field alone
#[derive(Debug, Clone, Default)]
pub struct CharacterUpdate {
    pub name: Option<String>,
    pub role: Option<CharacterRole>,
    pub description: Option<String>,
    pub goals: Option<String>,
    pub backstory: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharactersState {
    pub characters: Vec<CharacterProfile>,
}

impl CharactersState {
    pub fn add_character(
        &mut self,
        profile: CharacterProfile,
    ) -> Result<CharacterId, ValidationError> {
        validate_name(&profile.name)?;
        if self.contains(profile.id) {
            return Err(ValidationError::invalid(
                "character id",
                format!("{} is already in use", profile.id),
            ));
        }
        let id = profile.id;
        self.characters.push(profile);
        Ok(id)
    }

    pub fn update_character(
        &mut self,
        id: CharacterId,
        update: CharacterUpdate,
    ) -> Result<(), ValidationError> {
        if let Some(ref name) = update.name {
            validate_name(name)?;
        }
        let character = self.get_mut(id)?;
        if let Some(name) = update.name {
            character.name = name;
        }
        if let Some(role) = update.role {
            character.role = role;
        }
        if let Some(description) = update.description {
            character.description = description;
        }
        if let Some(goals) = update.goals {
            character.goals = goals;
        }
        if let Some(backstory) = update.backstory {
            character.backstory = backstory;
        }
        Ok(())
    }

    /// Relationships and timeline events pointing at the character are left as they are
    pub fn remove_character(&mut self, id: CharacterId) -> Result<CharacterProfile, ValidationError> {
        let pos = self
            .characters
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| ValidationError::not_found("Character", id))?;
        Ok(self.characters.remove(pos))
    }

    pub fn add_trait(
        &mut self,
        id: CharacterId,
        character_trait: impl Into<String>,
    ) -> Result<bool, ValidationError> {
        let character_trait = character_trait.into();
        if character_trait.trim().is_empty() {
            return Err(ValidationError::Required("trait"));
        }
        let character = self.get_mut(id)?;
        if character.traits.contains(&character_trait) {
            return Ok(false);
        }
        character.traits.push(character_trait);
        Ok(true)
    }

    pub fn remove_trait(&mut self, id: CharacterId, character_trait: &str) -> Result<bool, ValidationError> {
        let character = self.get_mut(id)?;
        let before = character.traits.len();
        character.traits.retain(|t| t != character_trait);
        Ok(before != character.traits.len())
    }

    pub fn get(&self, id: CharacterId) -> Option<&CharacterProfile> {
        self.characters.iter().find(|c| c.id == id)
    }

    pub fn contains(&self, id: CharacterId) -> bool {
        self.get(id).is_some()
    }

    pub fn protagonists(&self) -> impl Iterator<Item = &CharacterProfile> {
        self.characters
            .iter()
            .filter(|c| c.role == CharacterRole::Protagonist)
    }

    fn get_mut(&mut self, id: CharacterId) -> Result<&mut CharacterProfile, ValidationError> {
        self.characters
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| ValidationError::not_found("Character", id))
    }
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::Required("character name"));
    }
    if name.len() > MAX_NAME_LENGTH {
        return Err(ValidationError::out_of_range(
            "character name length",
            1,
            MAX_NAME_LENGTH as i64,
            name.len() as i64,
        ));
    }
    Ok(())
}

impl SliceState for CharactersState {
    const KEY: &'static str = "novel-characters-storage";

    fn validate(&self) -> Result<(), ValidationError> {
        for (i, character) in self.characters.iter().enumerate() {
            validate_name(&character.name)?;
            if self.characters[..i].iter().any(|c| c.id == character.id) {
                return Err(ValidationError::invalid(
                    "character id",
                    format!("{} is already in use", character.id),
                ));
            }
        }
        Ok(())
    }

    fn can_continue(&self) -> bool {
        !self.characters.is_empty()
    }
}
