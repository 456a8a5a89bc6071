//! Genre selection - primary genre, subgenre, blended genres and approach

use serde::{Deserialize, Serialize};

use super::SliceState;
use crate::domain::errors::ValidationError;
use crate::domain::value_objects::{Genre, GenreApproach};

/// Genres that may be blended into the primary one
pub const MAX_BLEND: usize = 2;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenreState {
    pub primary_genre: Option<Genre>,
    pub subgenre: Option<String>,
    pub blend: Vec<Genre>,
    pub approach: Option<GenreApproach>,
}

impl GenreState {
    /// Choosing a primary genre invalidates the subgenre picked for the previous one
    pub fn set_primary_genre(&mut self, genre: Genre) {
        self.primary_genre = Some(genre);
        self.subgenre = None;
        self.blend.retain(|g| *g != genre);
    }

    pub fn set_primary_genre_named(&mut self, name: &str) -> Result<(), ValidationError> {
        let genre = name.parse::<Genre>()?;
        self.set_primary_genre(genre);
        Ok(())
    }

    pub fn set_subgenre(&mut self, subgenre: impl Into<String>) -> Result<(), ValidationError> {
        let subgenre = subgenre.into();
        let primary = self
            .primary_genre
            .ok_or(ValidationError::Required("primary genre"))?;
        if !primary.has_subgenre(&subgenre) {
            return Err(ValidationError::UnknownValue {
                field: "subgenre",
                value: subgenre,
            });
        }
        self.subgenre = Some(subgenre);
        Ok(())
    }

    pub fn clear_subgenre(&mut self) {
        self.subgenre = None;
    }

    /// Add the genre to the blend, or take it out if already there.
    /// Returns whether the genre is blended afterwards.
    pub fn toggle_blend(&mut self, genre: Genre) -> Result<bool, ValidationError> {
        if self.primary_genre == Some(genre) {
            return Err(ValidationError::invalid(
                "blend",
                format!("{} is already the primary genre", genre),
            ));
        }
        if let Some(pos) = self.blend.iter().position(|g| *g == genre) {
            self.blend.remove(pos);
            return Ok(false);
        }
        if self.blend.len() >= MAX_BLEND {
            return Err(ValidationError::out_of_range(
                "blended genres",
                0,
                MAX_BLEND as i64,
                self.blend.len() as i64 + 1,
            ));
        }
        self.blend.push(genre);
        Ok(true)
    }

    pub fn set_approach(&mut self, approach: GenreApproach) {
        self.approach = Some(approach);
    }
}

impl SliceState for GenreState {
    const KEY: &'static str = "novel-genre-storage";

    fn validate(&self) -> Result<(), ValidationError> {
        match (self.primary_genre, &self.subgenre) {
            (None, Some(_)) => return Err(ValidationError::Required("primary genre")),
            (Some(primary), Some(subgenre)) if !primary.has_subgenre(subgenre) => {
                return Err(ValidationError::UnknownValue {
                    field: "subgenre",
                    value: subgenre.clone(),
                });
            }
            _ => {}
        }
        if let Some(primary) = self.primary_genre {
            if self.blend.contains(&primary) {
                return Err(ValidationError::invalid(
                    "blend",
                    format!("{} is already the primary genre", primary),
                ));
            }
        }
        if self.blend.len() > MAX_BLEND {
            return Err(ValidationError::out_of_range(
                "blended genres",
                0,
                MAX_BLEND as i64,
                self.blend.len() as i64,
            ));
        }
        Ok(())
    }

    /// Same rule as `set_primary_genre`: setting the primary genre clears the
    /// subgenre, unless the same merge picks a new one.
    fn reconcile(&mut self, _previous: &Self, patched: &[String]) {
        let sets = |field: &str| patched.iter().any(|p| p == field);
        if sets("primary_genre") && !sets("subgenre") {
            self.subgenre = None;
        }
        if let Some(primary) = self.primary_genre {
            self.blend.retain(|g| *g != primary);
        }
    }

    fn can_continue(&self) -> bool {
        self.primary_genre.is_some() && self.subgenre.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_genre_resets_subgenre() {
        let mut state = GenreState::default();
        state.set_primary_genre(Genre::ScienceFiction);
        state.set_subgenre("Cyberpunk").unwrap();

        state.set_primary_genre_named("Fantasy").unwrap();
        assert_eq!(state.primary_genre, Some(Genre::Fantasy));
        assert_eq!(state.subgenre, None);
        assert!(!state.can_continue());

        state.set_subgenre("Epic Fantasy").unwrap();
        assert!(state.can_continue());
    }

    #[test]
    fn test_subgenre_must_match_primary() {
        let mut state = GenreState::default();
        assert_eq!(
            state.set_subgenre("Epic Fantasy"),
            Err(ValidationError::Required("primary genre"))
        );
        state.set_primary_genre(Genre::Mystery);
        assert!(state.set_subgenre("Epic Fantasy").is_err());
        assert_eq!(state.subgenre, None);
    }

    #[test]
    fn test_blend_toggles_and_is_bounded() {
        let mut state = GenreState::default();
        state.set_primary_genre(Genre::Fantasy);
        assert!(state.toggle_blend(Genre::Fantasy).is_err());
        assert_eq!(state.toggle_blend(Genre::Romance), Ok(true));
        assert_eq!(state.toggle_blend(Genre::Mystery), Ok(true));
        assert!(state.toggle_blend(Genre::Horror).is_err());
        assert_eq!(state.toggle_blend(Genre::Romance), Ok(false));
        assert_eq!(state.blend, vec![Genre::Mystery]);

        state.set_primary_genre(Genre::Mystery);
        assert!(state.blend.is_empty());
    }
}
