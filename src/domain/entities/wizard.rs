//! Wizard progress - basic novel info and the step the author is on

use serde::{Deserialize, Serialize};

use super::SliceState;
use crate::domain::errors::ValidationError;
use crate::domain::value_objects::WorkflowStep;

pub const MAX_TITLE_LENGTH: usize = 200;
pub const MAX_PREMISE_LENGTH: usize = 5000;

/// Title page information entered on the basic-info step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicInfo {
    pub title: String,
    pub author: String,
    pub premise: String,
    pub target_audience: Option<String>,
    pub language: String,
}

/// Persisted wizard state. Only the basic info and the current step live here;
/// generation progress is transient and kept outside of any slice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WizardState {
    pub basic_info: BasicInfo,
    pub current_step: WorkflowStep,
}

impl WizardState {
    pub fn set_basic_info(&mut self, info: BasicInfo) -> Result<(), ValidationError> {
        validate_basic_info(&info)?;
        self.basic_info = info;
        Ok(())
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), ValidationError> {
        let title = title.into();
        if title.len() > MAX_TITLE_LENGTH {
            return Err(ValidationError::out_of_range(
                "title length",
                0,
                MAX_TITLE_LENGTH as i64,
                title.len() as i64,
            ));
        }
        self.basic_info.title = title;
        Ok(())
    }

    pub fn set_current_step(&mut self, step: WorkflowStep) {
        self.current_step = step;
    }

    /// Move to the following step; stays on review once there
    pub fn advance(&mut self) -> WorkflowStep {
        if let Some(next) = self.current_step.next() {
            self.current_step = next;
        }
        self.current_step
    }

    pub fn retreat(&mut self) -> WorkflowStep {
        if let Some(previous) = self.current_step.previous() {
            self.current_step = previous;
        }
        self.current_step
    }
}

fn validate_basic_info(info: &BasicInfo) -> Result<(), ValidationError> {
    if info.title.len() > MAX_TITLE_LENGTH {
        return Err(ValidationError::out_of_range(
            "title length",
            0,
            MAX_TITLE_LENGTH as i64,
            info.title.len() as i64,
        ));
    }
    if info.premise.len() > MAX_PREMISE_LENGTH {
        return Err(ValidationError::out_of_range(
            "premise length",
            0,
            MAX_PREMISE_LENGTH as i64,
            info.premise.len() as i64,
        ));
    }
    Ok(())
}

impl SliceState for WizardState {
    const KEY: &'static str = "novel-gen-storage";

    fn validate(&self) -> Result<(), ValidationError> {
        validate_basic_info(&self.basic_info)
    }

    fn can_continue(&self) -> bool {
        !self.basic_info.title.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_and_retreat_stop_at_the_ends() {
        let mut state = WizardState::default();
        assert_eq!(state.retreat(), WorkflowStep::Start);
        assert_eq!(state.advance(), WorkflowStep::BasicInfo);

        state.set_current_step(WorkflowStep::Review);
        assert_eq!(state.advance(), WorkflowStep::Review);
    }

    #[test]
    fn test_title_required_to_continue() {
        let mut state = WizardState::default();
        assert!(!state.can_continue());
        state.set_title("The Glass Archive").unwrap();
        assert!(state.can_continue());
        assert!(state.set_title("x".repeat(MAX_TITLE_LENGTH + 1)).is_err());
        assert_eq!(state.basic_info.title, "The Glass Archive");
    }
}
