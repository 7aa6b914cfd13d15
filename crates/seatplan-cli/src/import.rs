//! Reading a class list out of a spreadsheet workbook.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Range, Reader};
use thiserror::Error;

use seatplan_logic::roster::{roster_from_rows, ImportedRoster, RosterError};
use seatplan_logic::settings::ClassSettings;

use crate::cli::ImportArgs;
use crate::plan::PlanFile;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("cannot open workbook {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },
    #[error("workbook has no worksheets")]
    NoSheets,
    #[error("no worksheet named {name:?} (available: {available})")]
    MissingSheet { name: String, available: String },
    #[error("cannot read worksheet {name:?}")]
    Sheet {
        name: String,
        #[source]
        source: calamine::Error,
    },
    #[error(transparent)]
    Roster(#[from] RosterError),
}

/// Cell values as text. Whole numbers print without a fraction so student
/// numbers stay "7", not "7.0".
pub fn range_to_rows(range: &Range<Data>) -> Vec<Vec<String>> {
    range
        .rows()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
                    other => other.to_string(),
                })
                .collect()
        })
        .collect()
}

/// Import the first worksheet, or the one named `sheet`.
pub fn import_workbook(path: &Path, sheet: Option<&str>) -> Result<ImportedRoster, ImportError> {
    let mut workbook = open_workbook_auto(path).map_err(|source| ImportError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let names = workbook.sheet_names();
    let name = match sheet {
        Some(wanted) => names
            .iter()
            .find(|n| n.as_str() == wanted)
            .cloned()
            .ok_or_else(|| ImportError::MissingSheet {
                name: wanted.to_string(),
                available: names.join(", "),
            })?,
        None => names.first().cloned().ok_or(ImportError::NoSheets)?,
    };

    let range = workbook
        .worksheet_range(&name)
        .map_err(|source| ImportError::Sheet {
            name: name.clone(),
            source,
        })?;
    log::info!(
        "Reading sheet {:?} of {} ({} rows)",
        name,
        path.display(),
        range.height()
    );

    Ok(roster_from_rows(&range_to_rows(&range))?)
}

/// A new plan for an imported class: grade and class from the sheet when
/// present, counts from the roster, no notes.
pub fn plan_from_import(imported: ImportedRoster) -> PlanFile {
    let defaults = ClassSettings::default();
    let settings = ClassSettings {
        grade: imported.grade.unwrap_or(defaults.grade),
        class_number: imported.class_number.unwrap_or(defaults.class_number),
        ..defaults
    }
    .with_roster(&imported.students);
    PlanFile {
        settings,
        students: imported.students,
        ..PlanFile::default()
    }
}

pub fn run_import(args: ImportArgs) -> Result<()> {
    let imported = import_workbook(&args.workbook, args.sheet.as_deref())
        .with_context(|| format!("importing {}", args.workbook.display()))?;
    let plan = plan_from_import(imported);
    eprintln!("{}", plan.settings.summary());

    match &args.output {
        Some(path) => plan.save(path)?,
        None => println!("{}", serde_json::to_string_pretty(&plan)?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use seatplan_logic::roster::{Gender, Student};
    use tempfile::tempdir;

    fn sheet(cells: &[&[Data]]) -> Range<Data> {
        let height = cells.len() as u32;
        let width = cells.iter().map(|r| r.len()).max().unwrap_or(0) as u32;
        let mut range = Range::new((0, 0), (height - 1, width - 1));
        for (r, row) in cells.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                range.set_value((r as u32, c as u32), value.clone());
            }
        }
        range
    }

    fn text(s: &str) -> Data {
        Data::String(s.to_string())
    }

    #[test]
    fn numbers_lose_their_fraction() {
        let range = sheet(&[
            &[text("번호"), text("이름"), text("성별")],
            &[Data::Float(7.0), text("김하늘"), text("여")],
            &[Data::Int(8), text("박준호"), Data::Empty],
        ]);
        let rows = range_to_rows(&range);
        assert_eq!(rows[1], vec!["7", "김하늘", "여"]);
        assert_eq!(rows[2], vec!["8", "박준호", ""]);
    }

    #[test]
    fn rows_become_a_roster() {
        let range = sheet(&[
            &[text("Grade"), text("Class"), text("No"), text("Name"), text("Gender")],
            &[Data::Float(3.0), Data::Float(2.0), Data::Float(1.0), text("Alice"), text("F")],
            &[Data::Float(3.0), Data::Float(2.0), Data::Float(2.0), text("Bob"), text("M")],
        ]);
        let imported = roster_from_rows(&range_to_rows(&range)).unwrap();
        assert_eq!(imported.grade, Some(3));
        assert_eq!(imported.class_number, Some(2));
        assert_eq!(imported.students.len(), 2);
        assert_eq!(imported.students[0].gender, Gender::Female);
        assert_eq!(imported.students[1].number, "2");
    }

    #[test]
    fn imported_plan_takes_class_from_sheet() {
        let imported = ImportedRoster {
            students: vec![
                Student::new("1", "Alice", Gender::Female),
                Student::new("2", "Bob", Gender::Male),
                Student::new("3", "Cara", Gender::Female),
            ],
            grade: Some(5),
            class_number: None,
        };
        let plan = plan_from_import(imported);
        assert_eq!(plan.settings.grade, 5);
        assert_eq!(plan.settings.class_number, 1);
        assert_eq!(plan.settings.student_count, 3);
        assert_eq!(plan.settings.female_count, 2);
        assert!(plan.notes.is_empty());
        assert!(plan.grid.is_none());
    }

    #[test]
    fn unreadable_workbook_is_an_open_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("roster.xlsx");
        std::fs::write(&path, b"definitely not a zip archive").unwrap();
        assert!(matches!(
            import_workbook(&path, None),
            Err(ImportError::Open { .. })
        ));
    }
}
