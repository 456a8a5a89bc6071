//! Relationship kinds between two characters

use serde::{Deserialize, Serialize};

/// Nature of the bond between two characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipType {
    Family,
    Friend,
    Rival,
    Mentor,
    Romantic,
    Professional,
    Enemy,
    Custom,
}

/// Bounds of a relationship's strength rating
pub const MIN_STRENGTH: u8 = 1;
pub const MAX_STRENGTH: u8 = 10;
