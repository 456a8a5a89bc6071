//! The ordered steps of the novel creation wizard

use serde::{Deserialize, Serialize};

use crate::domain::errors::ValidationError;

/// A page of the wizard. The declaration order is the intended progression,
/// but any step may be visited from any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkflowStep {
    #[default]
    Start,
    BasicInfo,
    Genre,
    WorldSettings,
    PlotStructure,
    Characters,
    Relationships,
    Timeline,
    Parameters,
    Review,
}

impl WorkflowStep {
    pub const ALL: [WorkflowStep; 10] = [
        WorkflowStep::Start,
        WorkflowStep::BasicInfo,
        WorkflowStep::Genre,
        WorkflowStep::WorldSettings,
        WorkflowStep::PlotStructure,
        WorkflowStep::Characters,
        WorkflowStep::Relationships,
        WorkflowStep::Timeline,
        WorkflowStep::Parameters,
        WorkflowStep::Review,
    ];

    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|step| *step == self)
            .unwrap_or_default()
    }

    pub fn next(self) -> Option<Self> {
        Self::ALL.get(self.index() + 1).copied()
    }

    pub fn previous(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn slug(self) -> &'static str {
        match self {
            WorkflowStep::Start => "start",
            WorkflowStep::BasicInfo => "basic-info",
            WorkflowStep::Genre => "genre",
            WorkflowStep::WorldSettings => "world-settings",
            WorkflowStep::PlotStructure => "plot-structure",
            WorkflowStep::Characters => "characters",
            WorkflowStep::Relationships => "relationships",
            WorkflowStep::Timeline => "timeline",
            WorkflowStep::Parameters => "parameters",
            WorkflowStep::Review => "review",
        }
    }

    /// Route of the page rendering this step
    pub fn path(self) -> String {
        match self {
            WorkflowStep::Start => "/create".to_string(),
            step => format!("/create/{}", step.slug()),
        }
    }

    /// Share of the wizard completed once this step is reached (0-100)
    pub fn progress_percent(self) -> u8 {
        let last = Self::ALL.len() - 1;
        ((self.index() * 100) / last) as u8
    }
}

impl std::fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

impl std::str::FromStr for WorkflowStep {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|step| step.slug() == s)
            .ok_or_else(|| ValidationError::UnknownValue {
                field: "step",
                value: s.to_string(),
            })
    }
}
