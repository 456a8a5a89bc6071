//! Plot structure - the chosen story skeleton and its plot points

use serde::{Deserialize, Serialize};

use super::SliceState;
use crate::domain::errors::ValidationError;
use crate::domain::value_objects::{PlotPointId, PlotStructureKind};

/// A beat of the plot, placed in one act of the structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotPoint {
    pub id: PlotPointId,
    pub title: String,
    pub description: String,
    /// Index into the structure's acts
    pub act: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotStructureState {
    pub structure: Option<PlotStructureKind>,
    pub plot_points: Vec<PlotPoint>,
}

impl PlotStructureState {
    /// Plot points belong to the acts of a structure, so switching to a
    /// different structure starts them over.
    pub fn set_structure(&mut self, kind: PlotStructureKind) {
        if self.structure != Some(kind) {
            self.plot_points.clear();
        }
        self.structure = Some(kind);
    }

    pub fn add_plot_point(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
        act: usize,
    ) -> Result<PlotPointId, ValidationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ValidationError::Required("plot point title"));
        }
        self.check_act(act)?;
        let id = PlotPointId::new();
        self.plot_points.push(PlotPoint {
            id,
            title,
            description: description.into(),
            act,
        });
        Ok(id)
    }

    pub fn update_plot_point(
        &mut self,
        id: PlotPointId,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<(), ValidationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ValidationError::Required("plot point title"));
        }
        let point = self
            .plot_points
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ValidationError::not_found("Plot point", id))?;
        point.title = title;
        point.description = description.into();
        Ok(())
    }

    pub fn remove_plot_point(&mut self, id: PlotPointId) -> Result<(), ValidationError> {
        let pos = self
            .plot_points
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| ValidationError::not_found("Plot point", id))?;
        self.plot_points.remove(pos);
        Ok(())
    }

    /// Move a plot point to `index`, clamped to the end of the list
    pub fn move_plot_point(&mut self, id: PlotPointId, index: usize) -> Result<(), ValidationError> {
        let pos = self
            .plot_points
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| ValidationError::not_found("Plot point", id))?;
        let point = self.plot_points.remove(pos);
        let index = index.min(self.plot_points.len());
        self.plot_points.insert(index, point);
        Ok(())
    }

    pub fn points_in_act(&self, act: usize) -> impl Iterator<Item = &PlotPoint> {
        self.plot_points.iter().filter(move |p| p.act == act)
    }

    fn check_act(&self, act: usize) -> Result<(), ValidationError> {
        match self.structure {
            None => Err(ValidationError::Required("plot structure")),
            Some(PlotStructureKind::Custom) => Ok(()),
            Some(kind) => {
                let acts = kind.acts().len();
                if act < acts {
                    Ok(())
                } else {
                    Err(ValidationError::out_of_range(
                        "act",
                        0,
                        acts as i64 - 1,
                        act as i64,
                    ))
                }
            }
        }
    }
}

impl SliceState for PlotStructureState {
    const KEY: &'static str = "novel-plot-structure-storage";

    fn validate(&self) -> Result<(), ValidationError> {
        if self.structure.is_none() && !self.plot_points.is_empty() {
            return Err(ValidationError::Required("plot structure"));
        }
        self.plot_points
            .iter()
            .try_for_each(|point| self.check_act(point.act))
    }

    fn reconcile(&mut self, previous: &Self, patched: &[String]) {
        let sets = |field: &str| patched.iter().any(|p| p == field);
        if self.structure != previous.structure && !sets("plot_points") {
            self.plot_points.clear();
        }
    }

    fn can_continue(&self) -> bool {
        self.structure.is_some() && !self.plot_points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plot_points_need_a_structure() {
        let mut state = PlotStructureState::default();
        assert_eq!(
            state.add_plot_point("Inciting incident", "", 0),
            Err(ValidationError::Required("plot structure"))
        );

        state.set_structure(PlotStructureKind::ThreeAct);
        assert!(state.add_plot_point("Inciting incident", "", 0).is_ok());
        assert!(state.add_plot_point("Epilogue", "", 3).is_err());
        assert!(state.can_continue());
    }

    #[test]
    fn test_switching_structure_clears_points() {
        let mut state = PlotStructureState::default();
        state.set_structure(PlotStructureKind::SevenPoint);
        state.add_plot_point("Hook", "", 0).unwrap();

        state.set_structure(PlotStructureKind::SevenPoint);
        assert_eq!(state.plot_points.len(), 1);

        state.set_structure(PlotStructureKind::Kishotenketsu);
        assert!(state.plot_points.is_empty());
    }

    #[test]
    fn test_move_plot_point() {
        let mut state = PlotStructureState::default();
        state.set_structure(PlotStructureKind::Custom);
        let a = state.add_plot_point("A", "", 0).unwrap();
        let b = state.add_plot_point("B", "", 4).unwrap();
        let c = state.add_plot_point("C", "", 9).unwrap();

        state.move_plot_point(c, 0).unwrap();
        let order: Vec<_> = state.plot_points.iter().map(|p| p.id).collect();
        assert_eq!(order, vec![c, a, b]);

        state.move_plot_point(c, 99).unwrap();
        assert_eq!(state.plot_points.last().map(|p| p.id), Some(c));
        assert!(state.remove_plot_point(PlotPointId::new()).is_err());
    }
}
