//! Plan files: one JSON document per class.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use seatplan_logic::grid::SeatGrid;
use seatplan_logic::layout::auto_arrange;
use seatplan_logic::notes::TeacherNotes;
use seatplan_logic::roster::{placeholder_roster, Student};
use seatplan_logic::settings::ClassSettings;

/// Settings, roster, notes and an optional hand-edited template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanFile {
    #[serde(default)]
    pub settings: ClassSettings,
    #[serde(default)]
    pub students: Vec<Student>,
    #[serde(default)]
    pub notes: TeacherNotes,
    /// Saved template. Generated from the settings when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<SeatGrid>,
}

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("cannot read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is not a valid plan file")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{0} has a grid whose seats do not match its size")]
    MalformedGrid(PathBuf),
}

impl PlanFile {
    pub fn load(path: &Path) -> Result<Self, PlanError> {
        let text = fs::read_to_string(path).map_err(|source| PlanError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let plan: PlanFile = serde_json::from_str(&text).map_err(|source| PlanError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if plan.grid.as_ref().is_some_and(|g| !g.is_well_formed()) {
            return Err(PlanError::MalformedGrid(path.to_path_buf()));
        }
        log::debug!(
            "Loaded {}: {} students, {} rules",
            path.display(),
            plan.students.len(),
            plan.notes.together.len() + plan.notes.separate.len() + plan.notes.consideration.len()
        );
        Ok(plan)
    }

    pub fn save(&self, path: &Path) -> Result<(), PlanError> {
        let write_err = |source| PlanError::Write {
            path: path.to_path_buf(),
            source,
        };
        let mut text = serde_json::to_string_pretty(self).map_err(|e| write_err(e.into()))?;
        text.push('\n');
        fs::write(path, text).map_err(write_err)?;
        log::info!("Wrote {}", path.display());
        Ok(())
    }

    /// Settings with head counts taken from the roster when there is one.
    pub fn effective_settings(&self) -> ClassSettings {
        if self.students.is_empty() {
            self.settings.clone()
        } else {
            self.settings.clone().with_roster(&self.students)
        }
    }

    /// The roster, or placeholders matching the settings when none was imported.
    pub fn roster(&self) -> Vec<Student> {
        if self.students.is_empty() {
            placeholder_roster(self.settings.male_count, self.settings.female_count)
        } else {
            self.students.clone()
        }
    }

    /// The saved template, or a fresh auto-arranged one.
    pub fn template(&self) -> SeatGrid {
        if let Some(grid) = &self.grid {
            return grid.clone();
        }
        let settings = self.effective_settings();
        let mut grid = SeatGrid::for_class(&settings);
        auto_arrange(
            &mut grid,
            settings.composition(),
            settings.arrangement,
            settings.pairing,
        );
        grid
    }
}
