//! Story parameters - length, narration and tone of the finished novel

use serde::{Deserialize, Serialize};

use super::SliceState;
use crate::domain::errors::ValidationError;
use crate::domain::value_objects::{ContentRating, Pacing, PointOfView, Tense};

pub const MIN_WORD_COUNT: u32 = 1_000;
pub const MAX_WORD_COUNT: u32 = 500_000;
pub const MIN_CHAPTERS: u16 = 1;
pub const MAX_CHAPTERS: u16 = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParametersState {
    pub target_word_count: u32,
    pub chapter_count: u16,
    pub point_of_view: PointOfView,
    pub tense: Tense,
    pub tone: String,
    pub pacing: Pacing,
    pub content_rating: ContentRating,
}

impl Default for ParametersState {
    fn default() -> Self {
        Self {
            target_word_count: 80_000,
            chapter_count: 25,
            point_of_view: PointOfView::default(),
            tense: Tense::default(),
            tone: String::new(),
            pacing: Pacing::default(),
            content_rating: ContentRating::default(),
        }
    }
}

impl ParametersState {
    pub fn set_target_word_count(&mut self, words: u32) -> Result<(), ValidationError> {
        check_word_count(words)?;
        self.target_word_count = words;
        Ok(())
    }

    pub fn set_chapter_count(&mut self, chapters: u16) -> Result<(), ValidationError> {
        check_chapters(chapters)?;
        self.chapter_count = chapters;
        Ok(())
    }

    pub fn set_point_of_view(&mut self, pov: PointOfView) {
        self.point_of_view = pov;
    }

    pub fn set_tense(&mut self, tense: Tense) {
        self.tense = tense;
    }

    pub fn set_tone(&mut self, tone: impl Into<String>) {
        self.tone = tone.into();
    }

    pub fn set_pacing(&mut self, pacing: Pacing) {
        self.pacing = pacing;
    }

    pub fn set_content_rating(&mut self, rating: ContentRating) {
        self.content_rating = rating;
    }

    pub fn words_per_chapter(&self) -> u32 {
        self.target_word_count / u32::from(self.chapter_count.max(1))
    }
}

fn check_word_count(words: u32) -> Result<(), ValidationError> {
    if (MIN_WORD_COUNT..=MAX_WORD_COUNT).contains(&words) {
        Ok(())
    } else {
        Err(ValidationError::out_of_range(
            "target word count",
            MIN_WORD_COUNT as i64,
            MAX_WORD_COUNT as i64,
            words as i64,
        ))
    }
}

fn check_chapters(chapters: u16) -> Result<(), ValidationError> {
    if (MIN_CHAPTERS..=MAX_CHAPTERS).contains(&chapters) {
        Ok(())
    } else {
        Err(ValidationError::out_of_range(
            "chapter count",
            MIN_CHAPTERS as i64,
            MAX_CHAPTERS as i64,
            chapters as i64,
        ))
    }
}

impl SliceState for ParametersState {
    const KEY: &'static str = "novel-settings-storage";

    fn validate(&self) -> Result<(), ValidationError> {
        check_word_count(self.target_word_count)?;
        check_chapters(self.chapter_count)
    }

    fn can_continue(&self) -> bool {
        self.validate().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranges_enforced() {
        let mut state = ParametersState::default();
        assert!(state.set_target_word_count(999).is_err());
        assert!(state.set_chapter_count(0).is_err());
        assert!(state.set_chapter_count(201).is_err());
        assert_eq!(state, ParametersState::default());

        state.set_target_word_count(120_000).unwrap();
        state.set_chapter_count(40).unwrap();
        assert_eq!(state.words_per_chapter(), 3_000);
        assert!(state.can_continue());
    }

    #[test]
    fn test_enums_use_kebab_case() {
        let mut state = ParametersState::default();
        state.set_point_of_view(PointOfView::ThirdPersonOmniscient);
        state.set_content_rating(ContentRating::AllAges);
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["point_of_view"], "third-person-omniscient");
        assert_eq!(json["content_rating"], "all-ages");
        assert_eq!(json["tense"], "past");
    }
}
