//! Seat placement engine — draws named students into a seat template.
//!
//! Hard constraints: the template must hold exactly as many male and female
//! seats as the roster has students, and every student ends up in exactly
//! one marked seat. Soft constraints come from [`TeacherNotes`] and are
//! satisfied best-effort, in priority order:
//!
//! 1. **Consideration** students are seated first, inside their zone.
//! 2. **Together** pairs take a random free desk, or the free seat beside a
//!    partner who was already seated in step 1.
//! 3. Everyone else takes a random free seat, avoiding separated partners.
//!
//! Seat markers are preferred matches for gender, so the pairing policy of
//! the template carries through. A student who cannot avoid a separated
//! partner is still seated and the rule is reported as unmet.
//!
//! One pass is cheap, so the engine runs up to `max_attempts` passes. The
//! first pass with no unmet rules wins; otherwise the one with the fewest,
//! with gender mismatches breaking ties when seat markers are followed.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::grid::{SeatGrid, SeatKind, SeatPos};
use crate::layout::{placement_status, PlacementStatus};
use crate::notes::{TeacherNotes, Zone};
use crate::roster::{composition, placeholder_roster, Student};

/// Tuning knobs for [`assign_seats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlacementOptions {
    /// Passes to try before settling for the best one. At least 1.
    pub max_attempts: u32,
    /// Prefer seats whose template marker matches the student's gender.
    pub match_seat_gender: bool,
}

impl Default for PlacementOptions {
    fn default() -> Self {
        Self {
            max_attempts: 20,
            match_seat_gender: true,
        }
    }
}

/// Everything the engine needs.
#[derive(Debug, Clone, Copy)]
pub struct PlacementRequest<'a> {
    pub grid: &'a SeatGrid,
    /// Students to seat. Empty means "use placeholders for the template counts".
    pub roster: &'a [Student],
    pub notes: &'a TeacherNotes,
    pub options: PlacementOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("the seat template has no seats")]
    NoSeats,
    #[error("seat template does not match the class: {}", .0.problems().join("; "))]
    Unbalanced(PlacementStatus),
    #[error("student name {0:?} appears more than once")]
    DuplicateName(String),
}

/// A soft constraint the chosen arrangement does not satisfy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "lowercase")]
pub enum UnmetRule {
    Consideration { student: String, zone: Zone },
    Together { a: String, b: String },
    Separate { a: String, b: String },
}

impl std::fmt::Display for UnmetRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnmetRule::Consideration { student, zone } => {
                write!(f, "{student} could not be seated at the {}", zone.label())
            }
            UnmetRule::Together { a, b } => write!(f, "{a} and {b} could not share a desk"),
            UnmetRule::Separate { a, b } => write!(f, "{a} and {b} ended up next to each other"),
        }
    }
}

/// How the chosen pass went.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementReport {
    /// Passes run before stopping.
    pub attempts: u32,
    pub unmet: Vec<UnmetRule>,
    /// Students sitting in a seat reserved for the other gender.
    pub gender_mismatches: u32,
}

impl PlacementReport {
    pub fn is_clean(&self) -> bool {
        self.unmet.is_empty()
    }

    /// Lower is better. Mismatches only break ties when seat markers are
    /// meant to be followed.
    fn score(&self, match_seat_gender: bool) -> (usize, u32) {
        let mismatches = if match_seat_gender {
            self.gender_mismatches
        } else {
            0
        };
        (self.unmet.len(), mismatches)
    }
}

/// Final arrangement: the template plus the student in each seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatPlan {
    grid: SeatGrid,
    seats: Vec<Option<Student>>,
}

impl SeatPlan {
    pub fn grid(&self) -> &SeatGrid {
        &self.grid
    }

    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    pub fn get(&self, pos: SeatPos) -> Option<&Student> {
        if pos.row >= self.rows() || pos.col >= self.cols() {
            return None;
        }
        self.seats[pos.row * self.cols() + pos.col].as_ref()
    }

    pub fn position_of(&self, name: &str) -> Option<SeatPos> {
        let i = self
            .seats
            .iter()
            .position(|s| s.as_ref().is_some_and(|s| s.name == name))?;
        Some(SeatPos::new(i / self.cols(), i % self.cols()))
    }

    /// Seated students, back row first, left to right.
    pub fn students(&self) -> impl Iterator<Item = (SeatPos, &Student)> + '_ {
        self.grid.positions().filter_map(|p| self.get(p).map(|s| (p, s)))
    }

    pub fn seated_count(&self) -> usize {
        self.seats.iter().flatten().count()
    }

    pub fn are_desk_mates(&self, a: &str, b: &str) -> bool {
        match (self.position_of(a), self.position_of(b)) {
            (Some(pa), Some(pb)) => self.grid.is_desk_mate(pa, pb),
            _ => false,
        }
    }

    pub fn are_neighbours(&self, a: &str, b: &str) -> bool {
        match (self.position_of(a), self.position_of(b)) {
            (Some(pa), Some(pb)) => self.grid.neighbours(pa).contains(&pb),
            _ => false,
        }
    }

    /// The chart as seen from the teacher's desk.
    pub fn flipped(&self) -> SeatPlan {
        let mut seats = self.seats.clone();
        seats.reverse();
        SeatPlan {
            grid: self.grid.rotated(),
            seats,
        }
    }
}

/// Outcome of [`assign_seats`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub plan: SeatPlan,
    pub report: PlacementReport,
}

/// Seat every student of the request into the template.
///
/// Randomness comes from `rng`; a seeded RNG gives a reproducible chart.
pub fn assign_seats<R: Rng + ?Sized>(
    request: &PlacementRequest<'_>,
    rng: &mut R,
) -> Result<Placement, PlacementError> {
    let grid = request.grid;
    let capacity = grid.counts();
    if capacity.total() == 0 {
        return Err(PlacementError::NoSeats);
    }

    let placeholders;
    let roster = if request.roster.is_empty() {
        placeholders = placeholder_roster(capacity.male, capacity.female);
        placeholders.as_slice()
    } else {
        request.roster
    };

    let status = placement_status(grid, composition(roster));
    if !status.is_balanced() {
        return Err(PlacementError::Unbalanced(status));
    }

    let mut by_name = HashMap::with_capacity(roster.len());
    for (i, s) in roster.iter().enumerate() {
        if by_name.insert(s.name.as_str(), i).is_some() {
            return Err(PlacementError::DuplicateName(s.name.clone()));
        }
    }

    let max_attempts = request.options.max_attempts.max(1);
    let mut best: Option<(Vec<Option<usize>>, PlacementReport)> = None;
    let mut attempts = 0;

    for attempt in 1..=max_attempts {
        attempts = attempt;
        let mut pass = Pass::new(grid, roster, &by_name, request.notes, request.options);
        pass.run(rng);
        let (seated, report) = pass.finish();
        log::debug!(
            "Placement pass {attempt}: {} unmet, {} gender mismatches",
            report.unmet.len(),
            report.gender_mismatches
        );

        let done = report.is_clean();
        let score = report.score(request.options.match_seat_gender);
        if best
            .as_ref()
            .map_or(true, |(_, b)| score < b.score(request.options.match_seat_gender))
        {
            best = Some((seated, report));
        }
        if done {
            break;
        }
    }

    let Some((seated, mut report)) = best else {
        unreachable!("at least one placement pass runs");
    };
    report.attempts = attempts;

    log::info!(
        "Seated {} students on a {}x{} grid ({} unmet rules)",
        roster.len(),
        grid.rows(),
        grid.cols(),
        report.unmet.len()
    );

    let seats = seated
        .into_iter()
        .map(|slot| slot.map(|i| roster[i].clone()))
        .collect();
    Ok(Placement {
        plan: SeatPlan {
            grid: grid.clone(),
            seats,
        },
        report,
    })
}

/// One randomized pass over the roster.
struct Pass<'a> {
    grid: &'a SeatGrid,
    roster: &'a [Student],
    by_name: &'a HashMap<&'a str, usize>,
    notes: &'a TeacherNotes,
    options: PlacementOptions,
    /// Student index per grid cell (row-major).
    seated: Vec<Option<usize>>,
    /// Seat per student.
    placed: Vec<Option<SeatPos>>,
    /// Marked seats still free.
    free: Vec<SeatPos>,
    unmet: Vec<UnmetRule>,
}

impl<'a> Pass<'a> {
    fn new(
        grid: &'a SeatGrid,
        roster: &'a [Student],
        by_name: &'a HashMap<&'a str, usize>,
        notes: &'a TeacherNotes,
        options: PlacementOptions,
    ) -> Self {
        Self {
            grid,
            roster,
            by_name,
            notes,
            options,
            seated: vec![None; grid.rows() * grid.cols()],
            placed: vec![None; roster.len()],
            free: grid.occupied_positions(),
            unmet: Vec::new(),
        }
    }

    fn run<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.seat_considerations(rng);
        self.seat_together_pairs(rng);
        self.seat_everyone_else(rng);
        self.check_together_pairs();
    }

    /// Together rules are judged on the finished pass, so a partner who
    /// ends up at the desk anyway counts as met.
    fn check_together_pairs(&mut self) {
        let notes = self.notes;
        for rule in &notes.together {
            let [a_name, b_name] = &rule.students;
            let a = self.by_name.get(a_name.as_str()).copied();
            let b = self.by_name.get(b_name.as_str()).copied();
            let (Some(a), Some(b)) = (a, b) else {
                continue;
            };
            if a == b {
                continue;
            }
            let met = match (self.placed[a], self.placed[b]) {
                (Some(pa), Some(pb)) => self.grid.is_desk_mate(pa, pb),
                _ => false,
            };
            if !met {
                self.unmet.push(UnmetRule::Together {
                    a: a_name.clone(),
                    b: b_name.clone(),
                });
            }
        }
    }

    fn finish(self) -> (Vec<Option<usize>>, PlacementReport) {
        let gender_mismatches = self
            .placed
            .iter()
            .enumerate()
            .filter(|(i, pos)| {
                pos.and_then(|p| self.grid.get(p))
                    .and_then(SeatKind::gender)
                    .is_some_and(|g| g != self.roster[*i].gender)
            })
            .count() as u32;
        (
            self.seated,
            PlacementReport {
                attempts: 0,
                unmet: self.unmet,
                gender_mismatches,
            },
        )
    }

    fn lookup(&self, name: &str) -> Option<usize> {
        let found = self.by_name.get(name).copied();
        if found.is_none() {
            log::debug!("Teacher note names unknown student {name:?}; ignored");
        }
        found
    }

    fn occupant(&self, pos: SeatPos) -> Option<usize> {
        self.seated[pos.row * self.grid.cols() + pos.col]
    }

    fn seat(&mut self, student: usize, pos: SeatPos) {
        self.seated[pos.row * self.grid.cols() + pos.col] = Some(student);
        self.placed[student] = Some(pos);
        self.free.retain(|&p| p != pos);
    }

    /// Separated partners of `student` already sitting around `pos`.
    fn conflicts(&self, student: usize, pos: SeatPos) -> Vec<usize> {
        let name = self.roster[student].name.as_str();
        if !self.notes.has_separation(name) {
            return Vec::new();
        }
        self.grid
            .neighbours(pos)
            .into_iter()
            .filter_map(|n| self.occupant(n))
            .filter(|&other| self.notes.is_separated(name, &self.roster[other].name))
            .collect()
    }

    fn fits(&self, student: usize, pos: SeatPos) -> bool {
        self.conflicts(student, pos).is_empty()
    }

    fn matches_gender(&self, student: usize, pos: SeatPos) -> bool {
        self.grid.get(pos).and_then(SeatKind::gender) == Some(self.roster[student].gender)
    }

    /// First candidate that avoids separated partners, gender matches first.
    fn pick(&self, student: usize, candidates: &[SeatPos]) -> Option<SeatPos> {
        let mut fallback = None;
        for &p in candidates {
            if !self.fits(student, p) {
                continue;
            }
            if !self.options.match_seat_gender || self.matches_gender(student, p) {
                return Some(p);
            }
            fallback.get_or_insert(p);
        }
        fallback
    }

    fn zone_seats(&self, zone: Zone) -> Vec<SeatPos> {
        let front = self.grid.rows() - 1;
        let mid = self.grid.cols() / 2;
        match zone {
            Zone::Front => self.free.iter().copied().filter(|p| p.row == front).collect(),
            Zone::Back => {
                let back_free = self.free.iter().filter(|p| p.row == 0).count();
                let last = if back_free <= 1 && self.grid.rows() > 1 { 1 } else { 0 };
                self.free.iter().copied().filter(|p| p.row <= last).collect()
            }
            Zone::Left => self.free.iter().copied().filter(|p| p.col < mid).collect(),
            Zone::Right => self.free.iter().copied().filter(|p| p.col >= mid).collect(),
        }
    }

    fn seat_considerations<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let notes = self.notes;
        for rule in &notes.consideration {
            let Some(student) = self.lookup(&rule.student) else {
                continue;
            };
            if self.placed[student].is_some() {
                continue;
            }
            let mut candidates = self.zone_seats(rule.zone);
            candidates.shuffle(rng);
            match self.pick(student, &candidates) {
                Some(pos) => self.seat(student, pos),
                None => self.unmet.push(UnmetRule::Consideration {
                    student: rule.student.clone(),
                    zone: rule.zone,
                }),
            }
        }
    }

    fn seat_together_pairs<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let notes = self.notes;
        for rule in &notes.together {
            let [a_name, b_name] = &rule.students;
            let (Some(a), Some(b)) = (self.lookup(a_name), self.lookup(b_name)) else {
                continue;
            };
            if a == b {
                continue;
            }

            match (self.placed[a], self.placed[b]) {
                (None, None) => {}
                (Some(seated), None) => {
                    self.seat_beside(b, seated, rng);
                    continue;
                }
                (None, Some(seated)) => {
                    self.seat_beside(a, seated, rng);
                    continue;
                }
                (Some(_), Some(_)) => continue,
            }

            // Both orientations of every free desk.
            let mut desks = Vec::new();
            for &left in &self.free {
                let right = SeatPos::new(left.row, left.col + 1);
                if self.free.contains(&right) && self.grid.is_desk_mate(left, right) {
                    desks.push((left, right));
                    desks.push((right, left));
                }
            }
            desks.retain(|&(pa, pb)| self.fits(a, pa) && self.fits(b, pb));

            if self.options.match_seat_gender {
                let matching: Vec<_> = desks
                    .iter()
                    .copied()
                    .filter(|&(pa, pb)| self.matches_gender(a, pa) && self.matches_gender(b, pb))
                    .collect();
                if !matching.is_empty() {
                    desks = matching;
                }
            }

            if let Some(&(pa, pb)) = desks.choose(rng) {
                self.seat(a, pa);
                self.seat(b, pb);
            }
        }
    }

    /// Put `student` on a free seat sharing a desk with `partner_seat`.
    /// Leaves the student unseated when no such seat avoids a separation.
    fn seat_beside<R: Rng + ?Sized>(&mut self, student: usize, partner_seat: SeatPos, rng: &mut R) {
        let mut candidates: Vec<SeatPos> = self
            .free
            .iter()
            .copied()
            .filter(|&p| self.grid.is_desk_mate(partner_seat, p))
            .collect();
        candidates.shuffle(rng);
        if let Some(pos) = self.pick(student, &candidates) {
            self.seat(student, pos);
        }
    }

    fn seat_everyone_else<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut waiting: Vec<usize> = (0..self.roster.len())
            .filter(|&i| self.placed[i].is_none())
            .collect();
        waiting.shuffle(rng);

        for student in waiting {
            let mut candidates = self.free.clone();
            candidates.shuffle(rng);
            if let Some(pos) = self.pick(student, &candidates) {
                self.seat(student, pos);
                continue;
            }

            // Nowhere avoids a separated partner; seat anyway and report it.
            let fallback = candidates
                .iter()
                .copied()
                .find(|&p| self.options.match_seat_gender && self.matches_gender(student, p))
                .or_else(|| candidates.first().copied());
            let Some(pos) = fallback else {
                log::warn!("No free seat left for {}", self.roster[student].name);
                continue;
            };
            for other in self.conflicts(student, pos) {
                self.unmet.push(UnmetRule::Separate {
                    a: self.roster[student].name.clone(),
                    b: self.roster[other].name.clone(),
                });
            }
            self.seat(student, pos);
        }
    }
}
