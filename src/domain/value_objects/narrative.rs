//! Enumerations used by the story parameter, plot and character steps

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PointOfView {
    FirstPerson,
    SecondPerson,
    #[default]
    ThirdPersonLimited,
    ThirdPersonOmniscient,
    Multiple,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tense {
    #[default]
    Past,
    Present,
    Future,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Pacing {
    Slow,
    #[default]
    Moderate,
    Fast,
    Varied,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ContentRating {
    AllAges,
    #[default]
    Teen,
    Mature,
    Adult,
}

/// Story skeleton the plot points hang off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlotStructureKind {
    ThreeAct,
    HerosJourney,
    SaveTheCat,
    SevenPoint,
    FreytagsPyramid,
    Kishotenketsu,
    Custom,
}

impl PlotStructureKind {
    /// Named acts or phases of the structure, in order
    pub fn acts(self) -> &'static [&'static str] {
        match self {
            PlotStructureKind::ThreeAct => &["Setup", "Confrontation", "Resolution"],
            PlotStructureKind::HerosJourney => &["Departure", "Initiation", "Return"],
            PlotStructureKind::SaveTheCat => &["Act One", "Act Two A", "Act Two B", "Act Three"],
            PlotStructureKind::SevenPoint => &[
                "Hook",
                "Plot Turn 1",
                "Pinch 1",
                "Midpoint",
                "Pinch 2",
                "Plot Turn 2",
                "Resolution",
            ],
            PlotStructureKind::FreytagsPyramid => &[
                "Exposition",
                "Rising Action",
                "Climax",
                "Falling Action",
                "Denouement",
            ],
            PlotStructureKind::Kishotenketsu => &["Ki", "Sho", "Ten", "Ketsu"],
            PlotStructureKind::Custom => &[],
        }
    }
}

/// Narrative function of a character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CharacterRole {
    Protagonist,
    Antagonist,
    Deuteragonist,
    Mentor,
    Ally,
    LoveInterest,
    #[default]
    Supporting,
    Minor,
}
