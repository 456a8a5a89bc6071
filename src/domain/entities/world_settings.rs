//! World settings - where and when the story takes place

use serde::{Deserialize, Serialize};

use super::SliceState;
use crate::domain::errors::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorldType {
    RealWorld,
    AlternateHistory,
    SecondaryWorld,
    PortalWorld,
    FarFuture,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TechnologyLevel {
    StoneAge,
    Ancient,
    Medieval,
    Renaissance,
    Industrial,
    Modern,
    NearFuture,
    Advanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MagicLevel {
    #[default]
    None,
    Low,
    Moderate,
    High,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldSettingsState {
    pub world_type: Option<WorldType>,
    pub time_period: String,
    pub technology_level: Option<TechnologyLevel>,
    pub magic_level: MagicLevel,
    /// Free-form description of how magic works, only meaningful with magic present
    pub magic_rules: String,
    pub geography: String,
    pub society: String,
    pub key_locations: Vec<String>,
}

impl WorldSettingsState {
    pub fn set_world_type(&mut self, world_type: WorldType) {
        self.world_type = Some(world_type);
    }

    pub fn set_time_period(&mut self, period: impl Into<String>) {
        self.time_period = period.into();
    }

    pub fn set_technology_level(&mut self, level: TechnologyLevel) {
        self.technology_level = Some(level);
    }

    /// Turning magic off drops the rules written for it
    pub fn set_magic_level(&mut self, level: MagicLevel) {
        self.magic_level = level;
        if level == MagicLevel::None {
            self.magic_rules.clear();
        }
    }

    pub fn set_magic_rules(&mut self, rules: impl Into<String>) -> Result<(), ValidationError> {
        if self.magic_level == MagicLevel::None {
            return Err(ValidationError::invalid(
                "magic rules",
                "the world has no magic",
            ));
        }
        self.magic_rules = rules.into();
        Ok(())
    }

    pub fn add_location(&mut self, name: impl Into<String>) -> Result<(), ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::Required("location name"));
        }
        if !self.key_locations.contains(&name) {
            self.key_locations.push(name);
        }
        Ok(())
    }

    pub fn remove_location(&mut self, name: &str) -> bool {
        let before = self.key_locations.len();
        self.key_locations.retain(|l| l != name);
        before != self.key_locations.len()
    }
}

impl SliceState for WorldSettingsState {
    const KEY: &'static str = "world-settings-storage";

    fn validate(&self) -> Result<(), ValidationError> {
        if self.magic_level == MagicLevel::None && !self.magic_rules.is_empty() {
            return Err(ValidationError::invalid(
                "magic rules",
                "the world has no magic",
            ));
        }
        Ok(())
    }

    fn can_continue(&self) -> bool {
        self.world_type.is_some() && !self.time_period.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabling_magic_clears_rules() {
        let mut state = WorldSettingsState::default();
        assert!(state.set_magic_rules("Blood for power").is_err());

        state.set_magic_level(MagicLevel::High);
        state.set_magic_rules("Blood for power").unwrap();
        state.set_magic_level(MagicLevel::None);
        assert!(state.magic_rules.is_empty());
        assert!(state.validate().is_ok());
    }

    #[test]
    fn test_locations_are_unique() {
        let mut state = WorldSettingsState::default();
        state.add_location("Harrowmere").unwrap();
        state.add_location("Harrowmere").unwrap();
        assert_eq!(state.key_locations.len(), 1);
        assert!(state.add_location("  ").is_err());
        assert!(state.remove_location("Harrowmere"));
        assert!(!state.remove_location("Harrowmere"));
    }

    #[test]
    fn test_continue_needs_world_type_and_period() {
        let mut state = WorldSettingsState::default();
        state.set_world_type(WorldType::SecondaryWorld);
        assert!(!state.can_continue());
        state.set_time_period("Age of Embers");
        assert!(state.can_continue());
    }
}
