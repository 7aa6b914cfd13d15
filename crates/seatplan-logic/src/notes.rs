//! Teacher notes — soft constraints on who sits where.
//!
//! Students are referenced by name. Three kinds of rule:
//! - **together**: two students share a desk
//! - **separate**: two students are never neighbours (any of 8 directions)
//! - **consideration**: a student sits in a zone of the room
//!
//! Notes belong to one roster; they are dropped whenever the roster changes.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::roster::Student;

/// Zone of the classroom for a consideration rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    /// Row nearest the teacher's desk.
    Front,
    /// Back row (plus the row ahead of it when the back row is nearly full).
    Back,
    Left,
    Right,
}

impl Zone {
    pub fn label(self) -> &'static str {
        match self {
            Zone::Front => "front",
            Zone::Back => "back",
            Zone::Left => "left",
            Zone::Right => "right",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TogetherRule {
    pub students: [String; 2],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeparateRule {
    pub students: [String; 2],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsiderationRule {
    pub student: String,
    #[serde(alias = "position")]
    pub zone: Zone,
}

/// All constraints for one roster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeacherNotes {
    #[serde(alias = "togetherStudents")]
    pub together: Vec<TogetherRule>,
    #[serde(alias = "separateStudents")]
    pub separate: Vec<SeparateRule>,
    #[serde(alias = "considerationStudents")]
    pub consideration: Vec<ConsiderationRule>,
}

/// Problem found while checking notes against a roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteIssue {
    UnknownStudent(String),
    SamePerson(String),
    /// The same two students are to sit together and apart.
    Contradiction(String, String),
}

impl std::fmt::Display for NoteIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoteIssue::UnknownStudent(name) => write!(f, "no student named {name:?}"),
            NoteIssue::SamePerson(name) => write!(f, "{name:?} is paired with themselves"),
            NoteIssue::Contradiction(a, b) => {
                write!(f, "{a:?} and {b:?} are marked both together and separate")
            }
        }
    }
}

fn same_pair(x: &[String; 2], y: &[String; 2]) -> bool {
    (x[0] == y[0] && x[1] == y[1]) || (x[0] == y[1] && x[1] == y[0])
}

impl TeacherNotes {
    pub fn is_empty(&self) -> bool {
        self.together.is_empty() && self.separate.is_empty() && self.consideration.is_empty()
    }

    pub fn add_together(&mut self, a: impl Into<String>, b: impl Into<String>) {
        self.together.push(TogetherRule {
            students: [a.into(), b.into()],
        });
    }

    pub fn add_separate(&mut self, a: impl Into<String>, b: impl Into<String>) {
        self.separate.push(SeparateRule {
            students: [a.into(), b.into()],
        });
    }

    pub fn add_consideration(&mut self, student: impl Into<String>, zone: Zone) {
        self.consideration.push(ConsiderationRule {
            student: student.into(),
            zone,
        });
    }

    /// Whether a separate rule names both students.
    pub fn is_separated(&self, a: &str, b: &str) -> bool {
        self.separate.iter().any(|rule| {
            let [x, y] = &rule.students;
            (x == a && y == b) || (x == b && y == a)
        })
    }

    /// Whether `name` appears in any separate rule.
    pub fn has_separation(&self, name: &str) -> bool {
        self.separate
            .iter()
            .any(|rule| rule.students.iter().any(|s| s == name))
    }

    /// Check every rule against the roster, returning all issues found.
    pub fn validate(&self, roster: &[Student]) -> Vec<NoteIssue> {
        let names: HashSet<&str> = roster.iter().map(|s| s.name.as_str()).collect();
        let mut issues = Vec::new();
        let unknown = |name: &str, issues: &mut Vec<NoteIssue>| {
            let issue = NoteIssue::UnknownStudent(name.to_string());
            if !names.contains(name) && !issues.contains(&issue) {
                issues.push(issue);
            }
        };

        let pairs = self
            .together
            .iter()
            .map(|r| &r.students)
            .chain(self.separate.iter().map(|r| &r.students));
        for [a, b] in pairs {
            unknown(a, &mut issues);
            unknown(b, &mut issues);
            if a == b {
                issues.push(NoteIssue::SamePerson(a.clone()));
            }
        }
        for rule in &self.consideration {
            unknown(&rule.student, &mut issues);
        }

        for t in &self.together {
            if self.separate.iter().any(|s| same_pair(&t.students, &s.students)) {
                let [a, b] = &t.students;
                issues.push(NoteIssue::Contradiction(a.clone(), b.clone()));
            }
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::Gender;

    fn roster() -> Vec<Student> {
        ["Ana", "Ben", "Cho", "Dae"]
            .iter()
            .enumerate()
            .map(|(i, n)| Student::new((i + 1).to_string(), *n, Gender::Male))
            .collect()
    }

    #[test]
    fn separation_is_symmetric() {
        let mut notes = TeacherNotes::default();
        notes.add_separate("Ana", "Ben");
        assert!(notes.is_separated("Ana", "Ben"));
        assert!(notes.is_separated("Ben", "Ana"));
        assert!(!notes.is_separated("Ana", "Cho"));
        assert!(notes.has_separation("Ben"));
        assert!(!notes.has_separation("Dae"));
    }

    #[test]
    fn valid_notes_have_no_issues() {
        let mut notes = TeacherNotes::default();
        notes.add_together("Ana", "Ben");
        notes.add_separate("Cho", "Dae");
        notes.add_consideration("Cho", Zone::Front);
        assert!(notes.validate(&roster()).is_empty());
    }

    #[test]
    fn unknown_names_are_reported_once() {
        let mut notes = TeacherNotes::default();
        notes.add_together("Ana", "Zed");
        notes.add_consideration("Zed", Zone::Back);
        let issues = notes.validate(&roster());
        assert_eq!(issues, vec![NoteIssue::UnknownStudent("Zed".into())]);
    }

    #[test]
    fn same_person_and_contradiction() {
        let mut notes = TeacherNotes::default();
        notes.add_together("Ana", "Ana");
        notes.add_together("Ben", "Cho");
        notes.add_separate("Cho", "Ben");
        let issues = notes.validate(&roster());
        assert!(issues.contains(&NoteIssue::SamePerson("Ana".into())));
        assert!(issues.contains(&NoteIssue::Contradiction("Ben".into(), "Cho".into())));
    }

    #[test]
    fn deserializes_form_field_names() {
        let json = r#"{
            "togetherStudents": [{"students": ["Ana", "Ben"]}],
            "considerationStudents": [{"student": "Cho", "position": "left"}]
        }"#;
        let notes: TeacherNotes = serde_json::from_str(json).unwrap();
        assert_eq!(notes.together.len(), 1);
        assert!(notes.separate.is_empty());
        assert_eq!(notes.consideration[0].zone, Zone::Left);
    }
}
