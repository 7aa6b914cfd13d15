//! Student roster — the people being seated.
//!
//! A roster is a plain `Vec<Student>`. This module provides:
//! - Gender parsing and per-gender composition counts
//! - Placeholder rosters for classes entered by head count only
//! - Editing helpers used by the roster table (resize, bulk gender)
//! - Conversion from raw spreadsheet rows into a roster
//!
//! Reading the workbook file itself lives in the CLI crate; everything here
//! works on `Vec<Vec<String>>` so it stays free of I/O.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Student gender, used for seat templates and pairing policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn label(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

/// A single student.
///
/// `name` is the key used by teacher notes, so names must be unique within
/// a roster for constraints to resolve unambiguously.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Student number as printed on the chart (free-form, e.g. "10203" or "M4").
    pub number: String,
    pub name: String,
    pub gender: Gender,
}

impl Student {
    pub fn new(number: impl Into<String>, name: impl Into<String>, gender: Gender) -> Self {
        Self {
            number: number.into(),
            name: name.into(),
            gender,
        }
    }
}

/// Head count by gender.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Composition {
    pub male: u32,
    pub female: u32,
}

impl Composition {
    pub fn new(male: u32, female: u32) -> Self {
        Self { male, female }
    }

    pub fn total(&self) -> u32 {
        self.male + self.female
    }

    pub fn of(&self, gender: Gender) -> u32 {
        match gender {
            Gender::Male => self.male,
            Gender::Female => self.female,
        }
    }
}

/// Count students by gender.
pub fn composition(students: &[Student]) -> Composition {
    students
        .iter()
        .fold(Composition::default(), |mut acc, s| {
            match s.gender {
                Gender::Male => acc.male += 1,
                Gender::Female => acc.female += 1,
            }
            acc
        })
}

/// Generate stand-in students for a class entered by head count only.
///
/// Boys are numbered `M1..Mn`, girls `F1..Fn`.
pub fn placeholder_roster(male: u32, female: u32) -> Vec<Student> {
    let boys = (1..=male).map(|i| Student::new(format!("M{i}"), format!("Boy {i}"), Gender::Male));
    let girls =
        (1..=female).map(|i| Student::new(format!("F{i}"), format!("Girl {i}"), Gender::Female));
    boys.chain(girls).collect()
}

/// Grow or shrink a roster to `count` entries.
///
/// New rows are blank male students numbered by their 1-based position.
pub fn resize_roster(students: &mut Vec<Student>, count: usize) {
    if count < students.len() {
        students.truncate(count);
        return;
    }
    for i in students.len()..count {
        students.push(Student::new((i + 1).to_string(), "", Gender::Male));
    }
}

/// Set every student's gender at once.
pub fn set_all_genders(students: &mut [Student], gender: Gender) {
    for s in students.iter_mut() {
        s.gender = gender;
    }
}

/// Interpret a free-form gender cell. Unrecognized values count as male.
pub fn parse_gender(value: &str) -> Gender {
    let v = value.trim().to_lowercase();
    if v.contains('여') || v == "f" || v == "female" || v == "girl" || v == "w" {
        Gender::Female
    } else {
        Gender::Male
    }
}

// ── Spreadsheet rows ────────────────────────────────────────────────────

/// Header aliases per column, matched as lowercase substrings.
const GRADE_HEADERS: &[&str] = &["학년", "grade"];
const CLASS_HEADERS: &[&str] = &["반", "class"];
const NUMBER_HEADERS: &[&str] = &["학번", "number", "no", "번호"];
const NAME_HEADERS: &[&str] = &["성명", "이름", "name", "학생명"];
const GENDER_HEADERS: &[&str] = &["성별", "gender", "남녀"];

/// Failure to turn rows into a roster.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("sheet needs a header row and at least one student row")]
    NotEnoughRows,
    #[error("no name column found in header {0:?}")]
    MissingNameColumn(Vec<String>),
    #[error("no rows with a student name")]
    NoStudents,
}

/// Result of importing a sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedRoster {
    pub students: Vec<Student>,
    /// Grade from the first data row, when present and numeric.
    pub grade: Option<u8>,
    /// Class number from the first data row, when present and numeric.
    pub class_number: Option<u8>,
}

fn find_column(headers: &[String], aliases: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| aliases.iter().any(|alias| h.contains(alias)))
}

fn cell(row: &[String], col: Option<usize>) -> Option<&str> {
    let value = row.get(col?)?.trim();
    (!value.is_empty()).then_some(value)
}

fn leading_number(value: &str) -> Option<u8> {
    let digits: String = value.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Build a roster from a sheet's rows. The first row is the header.
///
/// Rows without a name are skipped. A missing number column numbers
/// students by their row index.
pub fn roster_from_rows(rows: &[Vec<String>]) -> Result<ImportedRoster, RosterError> {
    if rows.len() < 2 {
        return Err(RosterError::NotEnoughRows);
    }

    let headers: Vec<String> = rows[0].iter().map(|h| h.trim().to_lowercase()).collect();
    // Number aliases include "no", so resolve the name column first and
    // never let another column claim it.
    let name_col = find_column(&headers, NAME_HEADERS)
        .ok_or_else(|| RosterError::MissingNameColumn(headers.clone()))?;
    let pick = |aliases: &[&str]| {
        headers
            .iter()
            .enumerate()
            .find(|(i, h)| *i != name_col && aliases.iter().any(|a| h.contains(a)))
            .map(|(i, _)| i)
    };
    let grade_col = pick(GRADE_HEADERS);
    let class_col = pick(CLASS_HEADERS);
    let number_col = pick(NUMBER_HEADERS);
    let gender_col = pick(GENDER_HEADERS);

    let mut grade = None;
    let mut class_number = None;
    let mut students = Vec::new();

    for (i, row) in rows.iter().enumerate().skip(1) {
        let Some(name) = cell(row, Some(name_col)) else {
            continue;
        };
        if i == 1 {
            grade = cell(row, grade_col).and_then(leading_number);
            class_number = cell(row, class_col).and_then(leading_number);
        }
        let gender = cell(row, gender_col).map_or(Gender::Male, parse_gender);
        let number = cell(row, number_col).map_or_else(|| i.to_string(), str::to_string);
        students.push(Student::new(number, name, gender));
    }

    if students.is_empty() {
        return Err(RosterError::NoStudents);
    }

    let comp = composition(&students);
    log::info!(
        "Imported {} students ({} male, {} female)",
        students.len(),
        comp.male,
        comp.female
    );

    Ok(ImportedRoster {
        students,
        grade,
        class_number,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn placeholder_roster_numbers_by_gender() {
        let roster = placeholder_roster(2, 1);
        assert_eq!(roster.len(), 3);
        assert_eq!(roster[0].number, "M1");
        assert_eq!(roster[1].name, "Boy 2");
        assert_eq!(roster[2].number, "F1");
        assert_eq!(roster[2].gender, Gender::Female);
    }

    #[test]
    fn composition_counts() {
        let roster = placeholder_roster(5, 3);
        let comp = composition(&roster);
        assert_eq!(comp, Composition::new(5, 3));
        assert_eq!(comp.total(), 8);
        assert_eq!(comp.of(Gender::Female), 3);
    }

    #[test]
    fn resize_grows_with_blank_males() {
        let mut roster = placeholder_roster(0, 2);
        resize_roster(&mut roster, 4);
        assert_eq!(roster.len(), 4);
        assert_eq!(roster[2].number, "3");
        assert_eq!(roster[3].gender, Gender::Male);
        assert!(roster[3].name.is_empty());

        resize_roster(&mut roster, 1);
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].number, "F1");
    }

    #[test]
    fn bulk_gender_change() {
        let mut roster = placeholder_roster(3, 3);
        set_all_genders(&mut roster, Gender::Female);
        assert_eq!(composition(&roster), Composition::new(0, 6));
    }

    #[test]
    fn gender_parsing() {
        assert_eq!(parse_gender("여"), Gender::Female);
        assert_eq!(parse_gender("여자"), Gender::Female);
        assert_eq!(parse_gender(" F "), Gender::Female);
        assert_eq!(parse_gender("Female"), Gender::Female);
        assert_eq!(parse_gender("남"), Gender::Male);
        assert_eq!(parse_gender("M"), Gender::Male);
        assert_eq!(parse_gender("?"), Gender::Male);
    }

    #[test]
    fn rows_with_korean_headers() {
        let sheet = rows(&[
            &["학년", "반", "학번", "성명", "성별"],
            &["3", "2", "30201", "김민준", "남"],
            &["3", "2", "30202", "이서연", "여"],
        ]);
        let imported = roster_from_rows(&sheet).unwrap();
        assert_eq!(imported.grade, Some(3));
        assert_eq!(imported.class_number, Some(2));
        assert_eq!(imported.students.len(), 2);
        assert_eq!(imported.students[1].number, "30202");
        assert_eq!(imported.students[1].gender, Gender::Female);
    }

    #[test]
    fn rows_with_english_headers_and_gaps() {
        let sheet = rows(&[
            &["No", "Name", "Gender"],
            &["1", "Alice", "F"],
            &["2", "", "M"],
            &["3", "Bob", ""],
        ]);
        let imported = roster_from_rows(&sheet).unwrap();
        assert_eq!(imported.students.len(), 2);
        assert_eq!(imported.students[0].name, "Alice");
        assert_eq!(imported.students[0].gender, Gender::Female);
        assert_eq!(imported.students[1].number, "3");
        assert_eq!(imported.students[1].gender, Gender::Male);
        assert_eq!(imported.grade, None);
    }

    #[test]
    fn missing_number_column_uses_row_index() {
        let sheet = rows(&[&["이름"], &["가"], &["나"]]);
        let imported = roster_from_rows(&sheet).unwrap();
        assert_eq!(imported.students[0].number, "1");
        assert_eq!(imported.students[1].number, "2");
    }

    #[test]
    fn import_errors() {
        assert_eq!(
            roster_from_rows(&rows(&[&["name"]])),
            Err(RosterError::NotEnoughRows)
        );
        assert!(matches!(
            roster_from_rows(&rows(&[&["id", "gender"], &["1", "m"]])),
            Err(RosterError::MissingNameColumn(_))
        ));
        assert_eq!(
            roster_from_rows(&rows(&[&["name"], &[""], &["  "]])),
            Err(RosterError::NoStudents)
        );
    }
}
