//! Classroom grid model.
//!
//! A `SeatGrid` is `rows × cols` seats stored row-major, plus a set of aisle
//! boundaries. Aisle `a` sits between column `a` and column `a + 1` and
//! breaks desk-mate adjacency. Row 0 is the back of the room; the last row
//! is nearest the teacher's desk.
//!
//! Each seat carries a `SeatKind` marker: whether a student sits there, and
//! which gender the template reserved it for.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::roster::{Composition, Gender};
use crate::settings::{ClassSettings, SeatArrangement};

/// Default grid size before the class outgrows it.
pub const DEFAULT_ROWS: usize = 5;
pub const DEFAULT_COLS: usize = 6;

/// Template marker for one seat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatKind {
    #[default]
    Empty,
    Male,
    Female,
}

impl SeatKind {
    pub fn is_occupied(self) -> bool {
        self != SeatKind::Empty
    }

    pub fn gender(self) -> Option<Gender> {
        match self {
            SeatKind::Empty => None,
            SeatKind::Male => Some(Gender::Male),
            SeatKind::Female => Some(Gender::Female),
        }
    }

    /// Seat-click cycle: empty → male → female → empty.
    pub fn next(self) -> SeatKind {
        match self {
            SeatKind::Empty => SeatKind::Male,
            SeatKind::Male => SeatKind::Female,
            SeatKind::Female => SeatKind::Empty,
        }
    }
}

impl From<Gender> for SeatKind {
    fn from(g: Gender) -> Self {
        match g {
            Gender::Male => SeatKind::Male,
            Gender::Female => SeatKind::Female,
        }
    }
}

/// Grid coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeatPos {
    pub row: usize,
    pub col: usize,
}

impl SeatPos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Aisles for a fresh grid: between every desk pair, or between every column.
pub fn default_aisles(cols: usize, arrangement: SeatArrangement) -> BTreeSet<usize> {
    let last = cols.saturating_sub(1);
    match arrangement {
        SeatArrangement::Pair => (1..last).step_by(2).collect(),
        SeatArrangement::Single => (0..last).collect(),
    }
}

/// Rows × columns of seat markers with aisle boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatGrid {
    rows: usize,
    cols: usize,
    seats: Vec<SeatKind>,
    aisles: BTreeSet<usize>,
}

impl SeatGrid {
    /// Empty grid with no aisles. Dimensions are clamped to at least 1×1.
    pub fn new(rows: usize, cols: usize) -> Self {
        let rows = rows.max(1);
        let cols = cols.max(1);
        Self {
            rows,
            cols,
            seats: vec![SeatKind::Empty; rows * cols],
            aisles: BTreeSet::new(),
        }
    }

    /// Empty grid sized for a class, with the arrangement's default aisles.
    ///
    /// Starts from 5 × 6 and grows only when the class does not fit.
    pub fn for_class(settings: &ClassSettings) -> Self {
        let n = settings.student_count as usize;
        let (rows, cols) = if n == 0 {
            (DEFAULT_ROWS, DEFAULT_COLS)
        } else {
            match settings.arrangement {
                SeatArrangement::Single => {
                    let cols = DEFAULT_COLS.max(((n as f64 * 1.2).sqrt()).ceil() as usize);
                    (DEFAULT_ROWS.max(n.div_ceil(cols)), cols)
                }
                SeatArrangement::Pair => {
                    // One spare desk: a policy may leave a boy and a girl
                    // each without a partner.
                    let desks = n / 2 + 1;
                    let mut cols = ((desks as f64 * 1.5).sqrt()).ceil() as usize;
                    cols += cols % 2;
                    let cols = DEFAULT_COLS.max(cols);
                    (DEFAULT_ROWS.max(desks.div_ceil(cols / 2)), cols)
                }
            }
        };
        let mut grid = Self::new(rows, cols);
        grid.aisles = default_aisles(cols, settings.arrangement);
        grid
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn aisles(&self) -> &BTreeSet<usize> {
        &self.aisles
    }

    /// True when the seat vector and aisles agree with the dimensions.
    /// Grids loaded from files should be checked before use.
    pub fn is_well_formed(&self) -> bool {
        self.rows > 0
            && self.cols > 0
            && self.seats.len() == self.rows * self.cols
            && self.aisles.iter().all(|&a| a + 1 < self.cols)
    }

    fn index(&self, pos: SeatPos) -> Option<usize> {
        (pos.row < self.rows && pos.col < self.cols).then(|| pos.row * self.cols + pos.col)
    }

    pub fn get(&self, pos: SeatPos) -> Option<SeatKind> {
        self.index(pos).map(|i| self.seats[i])
    }

    /// Set a seat marker. Out-of-bounds positions are ignored.
    pub fn set(&mut self, pos: SeatPos, kind: SeatKind) {
        if let Some(i) = self.index(pos) {
            self.seats[i] = kind;
        }
    }

    /// Advance a seat through empty → male → female → empty.
    pub fn cycle_seat(&mut self, pos: SeatPos) {
        if let Some(kind) = self.get(pos) {
            self.set(pos, kind.next());
        }
    }

    /// All positions, back row first, left to right.
    pub fn positions(&self) -> impl Iterator<Item = SeatPos> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.cols).map(move |col| SeatPos::new(row, col)))
    }

    /// Positions holding a marker.
    pub fn occupied_positions(&self) -> Vec<SeatPos> {
        self.positions()
            .filter(|&p| self.get(p).is_some_and(SeatKind::is_occupied))
            .collect()
    }

    /// Marker counts by gender.
    pub fn counts(&self) -> Composition {
        self.seats.iter().fold(Composition::default(), |mut c, kind| {
            match kind {
                SeatKind::Male => c.male += 1,
                SeatKind::Female => c.female += 1,
                SeatKind::Empty => {}
            }
            c
        })
    }

    /// The same room seen from the teacher's desk: rows and columns reversed,
    /// aisles mirrored so each boundary stays between the same two seats.
    pub fn rotated(&self) -> SeatGrid {
        let mut seats = self.seats.clone();
        seats.reverse();
        SeatGrid {
            rows: self.rows,
            cols: self.cols,
            seats,
            aisles: self.aisles.iter().map(|&a| self.cols - 2 - a).collect(),
        }
    }

    /// Clear every marker. Aisles are kept.
    pub fn clear(&mut self) {
        self.seats.fill(SeatKind::Empty);
    }

    // ── Aisles & adjacency ──────────────────────────────────────────────

    /// Toggle the aisle between column `a` and `a + 1`.
    pub fn toggle_aisle(&mut self, a: usize) {
        if a + 1 >= self.cols {
            return;
        }
        if !self.aisles.remove(&a) {
            self.aisles.insert(a);
        }
    }

    /// Whether any aisle separates the two columns.
    pub fn has_aisle_between(&self, c1: usize, c2: usize) -> bool {
        let (lo, hi) = if c1 <= c2 { (c1, c2) } else { (c2, c1) };
        self.aisles.range(lo..hi).next().is_some()
    }

    /// Two seats share a desk: same row, neighbouring columns, no aisle between.
    pub fn is_desk_mate(&self, a: SeatPos, b: SeatPos) -> bool {
        a.row == b.row && a.col.abs_diff(b.col) == 1 && !self.has_aisle_between(a.col, b.col)
    }

    /// The up-to-eight in-bounds positions around `pos`. Aisles do not
    /// interrupt this neighbourhood.
    pub fn neighbours(&self, pos: SeatPos) -> Vec<SeatPos> {
        let mut out = Vec::with_capacity(8);
        for dr in -1i64..=1 {
            for dc in -1i64..=1 {
                if dr == 0 && dc == 0 {
                    continue;
                }
                let r = pos.row as i64 + dr;
                let c = pos.col as i64 + dc;
                if r >= 0 && c >= 0 && (r as usize) < self.rows && (c as usize) < self.cols {
                    out.push(SeatPos::new(r as usize, c as usize));
                }
            }
        }
        out
    }

    /// Section (run of columns between aisles) containing `col`.
    pub fn section_index(&self, col: usize) -> usize {
        self.aisles.range(..col).count()
    }

    // ── Structural edits ────────────────────────────────────────────────

    pub fn add_row_top(&mut self) {
        self.seats
            .splice(0..0, std::iter::repeat(SeatKind::Empty).take(self.cols));
        self.rows += 1;
    }

    pub fn add_row_bottom(&mut self) {
        self.seats
            .extend(std::iter::repeat(SeatKind::Empty).take(self.cols));
        self.rows += 1;
    }

    pub fn remove_row_top(&mut self) {
        if self.rows > 1 {
            self.seats.drain(0..self.cols);
            self.rows -= 1;
        }
    }

    pub fn remove_row_bottom(&mut self) {
        if self.rows > 1 {
            self.seats.truncate((self.rows - 1) * self.cols);
            self.rows -= 1;
        }
    }

    pub fn add_col_left(&mut self) {
        self.rebuild_columns(self.cols + 1, |new_col| new_col.checked_sub(1));
        self.aisles = self.aisles.iter().map(|a| a + 1).collect();
    }

    pub fn add_col_right(&mut self) {
        let old = self.cols;
        self.rebuild_columns(old + 1, |new_col| (new_col < old).then_some(new_col));
    }

    pub fn remove_col_left(&mut self) {
        if self.cols > 1 {
            self.rebuild_columns(self.cols - 1, |new_col| Some(new_col + 1));
            self.aisles = self
                .aisles
                .iter()
                .filter(|&&a| a > 0)
                .map(|a| a - 1)
                .collect();
        }
    }

    pub fn remove_col_right(&mut self) {
        if self.cols > 1 {
            self.rebuild_columns(self.cols - 1, Some);
            let cols = self.cols;
            self.aisles.retain(|&a| a + 1 < cols);
        }
    }

    /// Rebuild the seat vector with `new_cols` columns; `source` maps a new
    /// column to the old column it copies, or `None` for a fresh empty seat.
    fn rebuild_columns(&mut self, new_cols: usize, source: impl Fn(usize) -> Option<usize>) {
        let mut seats = Vec::with_capacity(self.rows * new_cols);
        for row in 0..self.rows {
            for col in 0..new_cols {
                let kind = source(col)
                    .and_then(|old| self.get(SeatPos::new(row, old)))
                    .unwrap_or_default();
                seats.push(kind);
            }
        }
        self.seats = seats;
        self.cols = new_cols;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::PairingType;

    fn settings(n: u32, arrangement: SeatArrangement) -> ClassSettings {
        ClassSettings {
            student_count: n,
            male_count: n / 2,
            female_count: n - n / 2,
            arrangement,
            pairing: PairingType::Mixed,
            ..ClassSettings::default()
        }
    }

    #[test]
    fn default_aisles_pair_and_single() {
        let pair: Vec<_> = default_aisles(6, SeatArrangement::Pair).into_iter().collect();
        assert_eq!(pair, vec![1, 3]);
        let pair8: Vec<_> = default_aisles(8, SeatArrangement::Pair).into_iter().collect();
        assert_eq!(pair8, vec![1, 3, 5]);
        let single: Vec<_> = default_aisles(4, SeatArrangement::Single).into_iter().collect();
        assert_eq!(single, vec![0, 1, 2]);
        assert!(default_aisles(1, SeatArrangement::Single).is_empty());
    }

    #[test]
    fn for_class_keeps_default_size_for_small_classes() {
        let grid = SeatGrid::for_class(&settings(24, SeatArrangement::Pair));
        assert_eq!((grid.rows(), grid.cols()), (5, 6));
        let grid = SeatGrid::for_class(&settings(0, SeatArrangement::Single));
        assert_eq!((grid.rows(), grid.cols()), (5, 6));
    }

    #[test]
    fn for_class_grows_to_fit() {
        for n in [1, 17, 30, 31, 40, 49, 50] {
            for arrangement in [SeatArrangement::Pair, SeatArrangement::Single] {
                let grid = SeatGrid::for_class(&settings(n, arrangement));
                assert!(
                    grid.rows() * grid.cols() >= n as usize,
                    "{n} students do not fit {}x{}",
                    grid.rows(),
                    grid.cols()
                );
                if arrangement == SeatArrangement::Pair {
                    assert_eq!(grid.cols() % 2, 0);
                    assert!(grid.rows() * grid.cols() / 2 > n as usize / 2);
                }
                assert!(grid.is_well_formed());
            }
        }
    }

    #[test]
    fn cycle_seat_wraps() {
        let mut grid = SeatGrid::new(2, 2);
        let p = SeatPos::new(1, 1);
        grid.cycle_seat(p);
        assert_eq!(grid.get(p), Some(SeatKind::Male));
        grid.cycle_seat(p);
        assert_eq!(grid.get(p), Some(SeatKind::Female));
        grid.cycle_seat(p);
        assert_eq!(grid.get(p), Some(SeatKind::Empty));
        assert_eq!(grid.get(SeatPos::new(2, 0)), None);
    }

    #[test]
    fn desk_mates_respect_aisles() {
        let grid = SeatGrid::for_class(&settings(24, SeatArrangement::Pair));
        assert!(grid.is_desk_mate(SeatPos::new(0, 0), SeatPos::new(0, 1)));
        assert!(!grid.is_desk_mate(SeatPos::new(0, 1), SeatPos::new(0, 2)));
        assert!(grid.is_desk_mate(SeatPos::new(3, 3), SeatPos::new(3, 2)));
        assert!(!grid.is_desk_mate(SeatPos::new(0, 0), SeatPos::new(1, 0)));
        assert!(!grid.is_desk_mate(SeatPos::new(0, 0), SeatPos::new(0, 2)));
    }

    #[test]
    fn neighbours_at_corner_and_middle() {
        let grid = SeatGrid::new(3, 3);
        assert_eq!(grid.neighbours(SeatPos::new(0, 0)).len(), 3);
        assert_eq!(grid.neighbours(SeatPos::new(1, 1)).len(), 8);
        assert_eq!(grid.neighbours(SeatPos::new(2, 1)).len(), 5);
    }

    #[test]
    fn section_index_counts_aisles_to_the_left() {
        let grid = SeatGrid::for_class(&settings(24, SeatArrangement::Pair));
        let sections: Vec<_> = (0..6).map(|c| grid.section_index(c)).collect();
        assert_eq!(sections, vec![0, 0, 1, 1, 2, 2]);
    }

    #[test]
    fn toggle_aisle_bounds() {
        let mut grid = SeatGrid::new(2, 3);
        grid.toggle_aisle(0);
        grid.toggle_aisle(2);
        assert_eq!(grid.aisles().iter().copied().collect::<Vec<_>>(), vec![0]);
        grid.toggle_aisle(0);
        assert!(grid.aisles().is_empty());
    }

    #[test]
    fn column_edits_shift_aisles() {
        let mut grid = SeatGrid::new(2, 4);
        grid.toggle_aisle(1);
        grid.set(SeatPos::new(0, 0), SeatKind::Female);

        grid.add_col_left();
        assert_eq!(grid.cols(), 5);
        assert_eq!(grid.get(SeatPos::new(0, 1)), Some(SeatKind::Female));
        assert_eq!(grid.get(SeatPos::new(0, 0)), Some(SeatKind::Empty));
        assert!(grid.aisles().contains(&2));

        grid.remove_col_left();
        grid.remove_col_left();
        assert_eq!(grid.cols(), 3);
        assert!(grid.aisles().contains(&0));

        grid.remove_col_right();
        grid.remove_col_right();
        assert_eq!(grid.cols(), 1);
        assert!(grid.aisles().is_empty());
        grid.remove_col_right();
        assert_eq!(grid.cols(), 1);
        assert!(grid.is_well_formed());
    }

    #[test]
    fn row_edits() {
        let mut grid = SeatGrid::new(2, 2);
        grid.set(SeatPos::new(0, 0), SeatKind::Male);
        grid.add_row_top();
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.get(SeatPos::new(1, 0)), Some(SeatKind::Male));
        grid.add_row_bottom();
        grid.remove_row_top();
        assert_eq!(grid.get(SeatPos::new(0, 0)), Some(SeatKind::Male));
        grid.remove_row_bottom();
        grid.remove_row_bottom();
        grid.remove_row_bottom();
        assert_eq!(grid.rows(), 1);
        assert!(grid.is_well_formed());
    }

    #[test]
    fn rotation_mirrors_seats_and_aisles() {
        let mut grid = SeatGrid::new(2, 5);
        grid.toggle_aisle(0);
        grid.toggle_aisle(2);
        grid.set(SeatPos::new(0, 0), SeatKind::Male);
        let turned = grid.rotated();
        assert_eq!(turned.get(SeatPos::new(1, 4)), Some(SeatKind::Male));
        assert_eq!(turned.aisles().iter().copied().collect::<Vec<_>>(), vec![1, 3]);
        // Column 0 sat alone left of aisle 0; its mirror sits alone right of aisle 3.
        assert!(!turned.is_desk_mate(SeatPos::new(1, 3), SeatPos::new(1, 4)));
        assert_eq!(turned.rotated(), grid);
    }

    #[test]
    fn counts_and_clear() {
        let mut grid = SeatGrid::new(2, 2);
        grid.set(SeatPos::new(0, 0), SeatKind::Male);
        grid.set(SeatPos::new(0, 1), SeatKind::Female);
        grid.set(SeatPos::new(1, 1), SeatKind::Female);
        assert_eq!(grid.counts(), Composition::new(1, 2));
        assert_eq!(grid.occupied_positions().len(), 3);
        grid.toggle_aisle(0);
        grid.clear();
        assert_eq!(grid.counts().total(), 0);
        assert_eq!(grid.aisles().len(), 1);
    }
}
