//! Cultural elements - customs, religions, languages the world draws on

use serde::{Deserialize, Serialize};

use super::SliceState;
use crate::domain::errors::ValidationError;

/// Elements offered on the cultural step; authors may also add their own
pub const SUGGESTED_ELEMENTS: &[&str] = &[
    "Religion",
    "Language",
    "Cuisine",
    "Music",
    "Festivals",
    "Clothing",
    "Architecture",
    "Social Hierarchy",
    "Laws and Justice",
    "Myths and Legends",
    "Trade and Currency",
    "Rites of Passage",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CulturalElementsState {
    /// Selected elements in the order they were picked, without repeats
    pub selected_elements: Vec<String>,
    pub notes: String,
}

impl CulturalElementsState {
    /// Select the element, or deselect it when already selected.
    /// Returns whether the element is selected afterwards.
    pub fn toggle_element(&mut self, element: impl Into<String>) -> Result<bool, ValidationError> {
        let element = element.into();
        let element = element.trim();
        if element.is_empty() {
            return Err(ValidationError::Required("cultural element"));
        }
        if let Some(pos) = self.selected_elements.iter().position(|e| e == element) {
            self.selected_elements.remove(pos);
            Ok(false)
        } else {
            self.selected_elements.push(element.to_string());
            Ok(true)
        }
    }

    pub fn is_selected(&self, element: &str) -> bool {
        self.selected_elements.iter().any(|e| e == element)
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }
}

impl SliceState for CulturalElementsState {
    const KEY: &'static str = "novel-cultural-storage";

    fn validate(&self) -> Result<(), ValidationError> {
        for (i, element) in self.selected_elements.iter().enumerate() {
            if self.selected_elements[..i].contains(element) {
                return Err(ValidationError::invalid(
                    "selected elements",
                    format!("{} is selected twice", element),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_flips_membership() {
        let mut state = CulturalElementsState::default();
        assert_eq!(state.toggle_element("Religion"), Ok(true));
        assert_eq!(state.toggle_element("Cuisine"), Ok(true));
        assert_eq!(state.toggle_element(" Religion "), Ok(false));
        assert_eq!(state.selected_elements, vec!["Cuisine".to_string()]);
        assert!(state.toggle_element("").is_err());
    }

    #[test]
    fn test_repeated_elements_fail_validation() {
        let state = CulturalElementsState {
            selected_elements: vec!["Music".to_string(), "Music".to_string()],
            notes: String::new(),
        };
        assert!(state.validate().is_err());
    }
}
