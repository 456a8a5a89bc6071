//! Story timeline - ordered events, optionally tied to characters

use serde::{Deserialize, Serialize};

use super::SliceState;
use crate::domain::errors::ValidationError;
use crate::domain::value_objects::{CharacterId, TimelineEventId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub id: TimelineEventId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// In-world date or era label ("Year 312, late winter")
    #[serde(default)]
    pub when: String,
    #[serde(default)]
    pub character_ids: Vec<CharacterId>,
}

impl TimelineEvent {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: TimelineEventId::new(),
            title: title.into(),
            description: String::new(),
            when: String::new(),
            character_ids: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn at(mut self, when: impl Into<String>) -> Self {
        self.when = when.into();
        self
    }

    pub fn with_character(mut self, character: CharacterId) -> Self {
        if !self.character_ids.contains(&character) {
            self.character_ids.push(character);
        }
        self
    }
}

/// Events are kept in story order; list position is the order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineState {
    pub events: Vec<TimelineEvent>,
}

impl TimelineState {
    pub fn add_event(&mut self, event: TimelineEvent) -> Result<TimelineEventId, ValidationError> {
        if event.title.trim().is_empty() {
            return Err(ValidationError::Required("event title"));
        }
        let id = event.id;
        self.events.push(event);
        Ok(id)
    }

    pub fn update_event(&mut self, event: TimelineEvent) -> Result<(), ValidationError> {
        if event.title.trim().is_empty() {
            return Err(ValidationError::Required("event title"));
        }
        let existing = self
            .events
            .iter_mut()
            .find(|e| e.id == event.id)
            .ok_or_else(|| ValidationError::not_found("Timeline event", event.id))?;
        *existing = event;
        Ok(())
    }

    pub fn remove_event(&mut self, id: TimelineEventId) -> Result<TimelineEvent, ValidationError> {
        let pos = self.position(id)?;
        Ok(self.events.remove(pos))
    }

    /// Move an event to `index`, clamped to the end of the timeline
    pub fn move_event(&mut self, id: TimelineEventId, index: usize) -> Result<(), ValidationError> {
        let pos = self.position(id)?;
        let event = self.events.remove(pos);
        let index = index.min(self.events.len());
        self.events.insert(index, event);
        Ok(())
    }

    pub fn events_with(&self, character: CharacterId) -> impl Iterator<Item = &TimelineEvent> {
        self.events
            .iter()
            .filter(move |e| e.character_ids.contains(&character))
    }

    fn position(&self, id: TimelineEventId) -> Result<usize, ValidationError> {
        self.events
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| ValidationError::not_found("Timeline event", id))
    }
}

impl SliceState for TimelineState {
    const KEY: &'static str = "novel-timeline-storage";

    fn validate(&self) -> Result<(), ValidationError> {
        if self.events.iter().any(|e| e.title.trim().is_empty()) {
            return Err(ValidationError::Required("event title"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_keep_story_order() {
        let mut state = TimelineState::default();
        let hero = CharacterId::new();
        let fall = state.add_event(TimelineEvent::new("The fall of Oskar").at("Year 1")).unwrap();
        let exile = state
            .add_event(TimelineEvent::new("Exile").with_character(hero))
            .unwrap();

        state.move_event(exile, 0).unwrap();
        let order: Vec<_> = state.events.iter().map(|e| e.id).collect();
        assert_eq!(order, vec![exile, fall]);
        assert_eq!(state.events_with(hero).count(), 1);
    }

    #[test]
    fn test_update_and_remove() {
        let mut state = TimelineState::default();
        let mut event = TimelineEvent::new("Coronation");
        let id = state.add_event(event.clone()).unwrap();

        event.title = String::new();
        assert!(state.update_event(event.clone()).is_err());
        event.title = "Second coronation".to_string();
        state.update_event(event).unwrap();
        assert_eq!(state.events[0].title, "Second coronation");

        assert!(state.remove_event(id).is_ok());
        assert!(state.remove_event(id).is_err());
    }
}
