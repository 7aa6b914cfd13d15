//! Class settings — the form a teacher fills in before arranging seats.
//!
//! This module provides the data model and validation logic for that form,
//! independent of any UI.
//!
//! ```
//! use seatplan_logic::settings::{validate_settings, ClassSettings};
//!
//! let mut settings = ClassSettings::default();
//! settings.student_count = 20;
//! settings.male_count = 11;
//! settings.female_count = 9;
//! assert!(validate_settings(&settings).is_empty());
//! ```

use serde::{Deserialize, Serialize};

use crate::roster::{composition, Composition, Student};

/// How desks are laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatArrangement {
    /// Two-seat desks separated by aisles.
    #[default]
    Pair,
    /// One-seat desks, every column is its own section.
    Single,
}

impl SeatArrangement {
    pub fn label(self) -> &'static str {
        match self {
            SeatArrangement::Pair => "pairs",
            SeatArrangement::Single => "single desks",
        }
    }
}

/// Who shares a two-seat desk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PairingType {
    /// A boy and a girl per desk while both remain.
    #[default]
    Mixed,
    /// Boys with boys, girls with girls.
    #[serde(alias = "samegender")]
    SameGender,
    /// Boys' school.
    #[serde(rename = "male")]
    MaleOnly,
    /// Girls' school.
    #[serde(rename = "female")]
    FemaleOnly,
}

impl PairingType {
    pub fn label(self) -> &'static str {
        match self {
            PairingType::Mixed => "boy-girl",
            PairingType::SameGender => "same gender",
            PairingType::MaleOnly => "boys' school",
            PairingType::FemaleOnly => "girls' school",
        }
    }
}

/// Teacher-editable class settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSettings {
    /// School year (1–6).
    pub grade: u8,
    /// Class within the grade (1–10).
    pub class_number: u8,
    pub student_count: u32,
    pub male_count: u32,
    pub female_count: u32,
    pub pairing: PairingType,
    pub arrangement: SeatArrangement,
}

impl Default for ClassSettings {
    fn default() -> Self {
        Self {
            grade: 1,
            class_number: 1,
            student_count: 24,
            male_count: 12,
            female_count: 12,
            pairing: PairingType::Mixed,
            arrangement: SeatArrangement::Pair,
        }
    }
}

impl ClassSettings {
    /// Take head counts from a roster. The roster wins over typed counts.
    pub fn with_roster(mut self, students: &[Student]) -> Self {
        let comp = composition(students);
        self.student_count = comp.total();
        self.male_count = comp.male;
        self.female_count = comp.female;
        self
    }

    pub fn composition(&self) -> Composition {
        Composition::new(self.male_count, self.female_count)
    }

    /// One-line description, e.g. "Grade 3 Class 2 · 24 students (12 M, 12 F) · pairs (boy-girl)".
    pub fn summary(&self) -> String {
        let layout = match self.arrangement {
            SeatArrangement::Pair => format!("{} ({})", self.arrangement.label(), self.pairing.label()),
            SeatArrangement::Single => self.arrangement.label().to_string(),
        };
        format!(
            "Grade {} Class {} · {} students ({} M, {} F) · {}",
            self.grade,
            self.class_number,
            self.student_count,
            self.male_count,
            self.female_count,
            layout
        )
    }
}

/// Settings validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    InvalidGrade(u8),
    InvalidClassNumber(u8),
    /// Outside 1..=50.
    InvalidStudentCount(u32),
    /// male + female does not add up to the student count.
    CountMismatch { total: u32, male: u32, female: u32 },
    /// Single-gender pairing with students of the other gender.
    PairingExcludesGender(PairingType),
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsError::InvalidGrade(g) => write!(f, "grade {g} is outside 1-6"),
            SettingsError::InvalidClassNumber(c) => write!(f, "class {c} is outside 1-10"),
            SettingsError::InvalidStudentCount(n) => {
                write!(f, "student count {n} is outside 1-50")
            }
            SettingsError::CountMismatch { total, male, female } => write!(
                f,
                "{male} male + {female} female does not match {total} students"
            ),
            SettingsError::PairingExcludesGender(p) => {
                write!(f, "{} pairing cannot seat the other gender", p.label())
            }
        }
    }
}

/// Validate class settings, returning all errors found.
pub fn validate_settings(settings: &ClassSettings) -> Vec<SettingsError> {
    let mut errors = Vec::new();

    if !(1..=6).contains(&settings.grade) {
        errors.push(SettingsError::InvalidGrade(settings.grade));
    }
    if !(1..=10).contains(&settings.class_number) {
        errors.push(SettingsError::InvalidClassNumber(settings.class_number));
    }
    if !(1..=50).contains(&settings.student_count) {
        errors.push(SettingsError::InvalidStudentCount(settings.student_count));
    }
    if settings.male_count.checked_add(settings.female_count) != Some(settings.student_count) {
        errors.push(SettingsError::CountMismatch {
            total: settings.student_count,
            male: settings.male_count,
            female: settings.female_count,
        });
    }

    if settings.arrangement == SeatArrangement::Pair {
        let excluded = match settings.pairing {
            PairingType::MaleOnly => settings.female_count > 0,
            PairingType::FemaleOnly => settings.male_count > 0,
            _ => false,
        };
        if excluded {
            errors.push(SettingsError::PairingExcludesGender(settings.pairing));
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::placeholder_roster;

    #[test]
    fn default_settings_are_valid() {
        let settings = ClassSettings::default();
        let errors = validate_settings(&settings);
        assert!(errors.is_empty(), "default settings should be valid: {errors:?}");
    }

    #[test]
    fn grade_and_class_ranges() {
        let mut settings = ClassSettings::default();
        settings.grade = 7;
        settings.class_number = 0;
        let errors = validate_settings(&settings);
        assert!(errors.contains(&SettingsError::InvalidGrade(7)));
        assert!(errors.contains(&SettingsError::InvalidClassNumber(0)));
    }

    #[test]
    fn student_count_range() {
        let mut settings = ClassSettings::default();
        settings.student_count = 0;
        settings.male_count = 0;
        settings.female_count = 0;
        assert!(validate_settings(&settings).contains(&SettingsError::InvalidStudentCount(0)));
    }

    #[test]
    fn count_mismatch() {
        let mut settings = ClassSettings::default();
        settings.male_count = 13;
        assert!(validate_settings(&settings).contains(&SettingsError::CountMismatch {
            total: 24,
            male: 13,
            female: 12
        }));
    }

    #[test]
    fn huge_counts_are_a_mismatch() {
        let mut settings = ClassSettings::default();
        settings.male_count = u32::MAX;
        settings.female_count = 1;
        assert!(validate_settings(&settings).contains(&SettingsError::CountMismatch {
            total: 24,
            male: u32::MAX,
            female: 1
        }));
    }

    #[test]
    fn single_gender_pairing_with_other_gender() {
        let mut settings = ClassSettings::default();
        settings.pairing = PairingType::MaleOnly;
        assert!(validate_settings(&settings)
            .contains(&SettingsError::PairingExcludesGender(PairingType::MaleOnly)));

        // Single desks ignore the pairing policy.
        settings.arrangement = SeatArrangement::Single;
        assert!(validate_settings(&settings).is_empty());
    }

    #[test]
    fn roster_overrides_counts() {
        let settings = ClassSettings::default().with_roster(&placeholder_roster(4, 7));
        assert_eq!(settings.student_count, 11);
        assert_eq!(settings.male_count, 4);
        assert_eq!(settings.female_count, 7);
    }

    #[test]
    fn serde_uses_form_names() {
        let json = serde_json::to_string(&ClassSettings::default()).unwrap();
        assert!(json.contains("\"classNumber\":1"));
        assert!(json.contains("\"pairing\":\"mixed\""));
        assert!(json.contains("\"arrangement\":\"pair\""));

        let parsed: PairingType = serde_json::from_str("\"same-gender\"").unwrap();
        assert_eq!(parsed, PairingType::SameGender);
        let parsed: PairingType = serde_json::from_str("\"female\"").unwrap();
        assert_eq!(parsed, PairingType::FemaleOnly);
        // Older plan files spell it without the hyphen.
        let parsed: PairingType = serde_json::from_str("\"samegender\"").unwrap();
        assert_eq!(parsed, PairingType::SameGender);
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"same-gender\"");
    }

    #[test]
    fn summary_mentions_layout() {
        let summary = ClassSettings::default().summary();
        assert!(summary.contains("Grade 1 Class 1"));
        assert!(summary.contains("pairs (boy-girl)"));
    }
}
