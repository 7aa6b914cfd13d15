//! Seat templates — which seats are used, and by which gender.
//!
//! Before names are drawn, the grid is filled with gendered markers that
//! follow the pairing policy. `auto_arrange` produces the default template;
//! the teacher may then edit individual seats. `placement_status` compares
//! a template against the class composition and reports overflow/underflow.

use serde::{Deserialize, Serialize};

use crate::grid::{SeatGrid, SeatKind, SeatPos};
use crate::roster::{Composition, Gender};
use crate::settings::{PairingType, SeatArrangement};

/// Remaining head count while filling a template.
struct Remaining {
    male: u32,
    female: u32,
}

impl Remaining {
    fn take(&mut self, gender: Gender) {
        match gender {
            Gender::Male => self.male -= 1,
            Gender::Female => self.female -= 1,
        }
    }

    /// Next student for a seat without a desk mate: boys first.
    fn take_single(&mut self) -> Option<Gender> {
        let gender = if self.male > 0 {
            Gender::Male
        } else if self.female > 0 {
            Gender::Female
        } else {
            return None;
        };
        self.take(gender);
        Some(gender)
    }

    /// A desk pair allowed by the pairing policy, if one remains.
    fn pair_for(&self, pairing: PairingType) -> Option<(Gender, Gender)> {
        let boys = self.male >= 2;
        let girls = self.female >= 2;
        match pairing {
            PairingType::Mixed if self.male > 0 && self.female > 0 => {
                Some((Gender::Male, Gender::Female))
            }
            PairingType::Mixed | PairingType::SameGender if boys => {
                Some((Gender::Male, Gender::Male))
            }
            PairingType::Mixed | PairingType::SameGender if girls => {
                Some((Gender::Female, Gender::Female))
            }
            PairingType::MaleOnly if boys => Some((Gender::Male, Gender::Male)),
            PairingType::FemaleOnly if girls => Some((Gender::Female, Gender::Female)),
            _ => None,
        }
    }
}

/// Fill `grid` with a template for `composition`.
///
/// Seats are visited front row first, left to right. With paired desks each
/// desk takes two students chosen by the pairing policy. A desk for which no
/// valid pair remains takes one student and its other seat stays empty;
/// seats without a desk mate also take one student (boys first). Existing
/// markers are cleared; aisles are kept.
pub fn auto_arrange(
    grid: &mut SeatGrid,
    composition: Composition,
    arrangement: SeatArrangement,
    pairing: PairingType,
) {
    grid.clear();

    let cols = grid.cols();
    let order: Vec<SeatPos> = (0..grid.rows())
        .rev()
        .flat_map(|row| (0..cols).map(move |col| SeatPos::new(row, col)))
        .collect();

    let mut left = Remaining {
        male: composition.male,
        female: composition.female,
    };
    let mut i = 0;

    while i < order.len() && left.male + left.female > 0 {
        let seat = order[i];

        if arrangement == SeatArrangement::Pair {
            let mate = order.get(i + 1).copied().filter(|&m| grid.is_desk_mate(seat, m));
            if let Some(mate) = mate {
                match left.pair_for(pairing) {
                    Some((a, b)) => {
                        grid.set(seat, a.into());
                        grid.set(mate, b.into());
                        left.take(a);
                        left.take(b);
                    }
                    None => {
                        if let Some(gender) = left.take_single() {
                            grid.set(seat, gender.into());
                        }
                    }
                }
                i += 2;
                continue;
            }
        }

        if let Some(gender) = left.take_single() {
            grid.set(seat, gender.into());
        }
        i += 1;
    }

    let placed = grid.counts();
    if placed.total() < composition.total() {
        log::warn!(
            "Template holds {} of {} students; grid is too small",
            placed.total(),
            composition.total()
        );
    } else {
        log::debug!(
            "Template arranged: {} male, {} female seats",
            placed.male,
            placed.female
        );
    }
}

/// Template vs. class composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementStatus {
    pub placed: Composition,
    pub target: Composition,
}

impl PlacementStatus {
    pub fn total_overflow(&self) -> bool {
        self.placed.total() > self.target.total()
    }

    pub fn total_underflow(&self) -> bool {
        self.placed.total() < self.target.total()
    }

    pub fn overflow(&self, gender: Gender) -> bool {
        self.placed.of(gender) > self.target.of(gender)
    }

    pub fn underflow(&self, gender: Gender) -> bool {
        self.placed.of(gender) < self.target.of(gender)
    }

    pub fn any_overflow(&self) -> bool {
        self.total_overflow() || self.overflow(Gender::Male) || self.overflow(Gender::Female)
    }

    /// Markers match the class exactly.
    pub fn is_balanced(&self) -> bool {
        self.placed == self.target
    }

    /// Human-readable discrepancies, one per line.
    pub fn problems(&self) -> Vec<String> {
        let mut out = Vec::new();
        for gender in [Gender::Male, Gender::Female] {
            let placed = self.placed.of(gender);
            let target = self.target.of(gender);
            if placed > target {
                out.push(format!(
                    "{} more {} seat(s) than {} students",
                    placed - target,
                    gender.label(),
                    gender.label()
                ));
            } else if placed < target {
                out.push(format!(
                    "{} {} student(s) without a seat",
                    target - placed,
                    gender.label()
                ));
            }
        }
        out
    }
}

/// Compare a template's markers with the class composition.
pub fn placement_status(grid: &SeatGrid, target: Composition) -> PlacementStatus {
    PlacementStatus {
        placed: grid.counts(),
        target,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::default_aisles;

    fn pair_grid(rows: usize, cols: usize) -> SeatGrid {
        let mut grid = SeatGrid::new(rows, cols);
        for a in default_aisles(cols, SeatArrangement::Pair) {
            grid.toggle_aisle(a);
        }
        grid
    }

    fn row_kinds(grid: &SeatGrid, row: usize) -> Vec<SeatKind> {
        (0..grid.cols())
            .map(|c| grid.get(SeatPos::new(row, c)).unwrap())
            .collect()
    }

    #[test]
    fn mixed_pairs_fill_front_row_first() {
        let mut grid = pair_grid(5, 6);
        auto_arrange(
            &mut grid,
            Composition::new(12, 12),
            SeatArrangement::Pair,
            PairingType::Mixed,
        );
        use SeatKind::*;
        assert_eq!(row_kinds(&grid, 4), vec![Male, Female, Male, Female, Male, Female]);
        assert_eq!(row_kinds(&grid, 0), vec![Empty; 6]);
        assert_eq!(grid.counts(), Composition::new(12, 12));
    }

    #[test]
    fn mixed_pairs_fall_back_to_same_gender() {
        let mut grid = pair_grid(2, 6);
        auto_arrange(
            &mut grid,
            Composition::new(5, 1),
            SeatArrangement::Pair,
            PairingType::Mixed,
        );
        use SeatKind::*;
        assert_eq!(row_kinds(&grid, 1), vec![Male, Female, Male, Male, Male, Male]);
        assert!(placement_status(&grid, Composition::new(5, 1)).is_balanced());
    }

    #[test]
    fn same_gender_leaves_odd_students_alone() {
        let mut grid = pair_grid(2, 4);
        auto_arrange(
            &mut grid,
            Composition::new(3, 3),
            SeatArrangement::Pair,
            PairingType::SameGender,
        );
        use SeatKind::*;
        // MM desk, FF desk, then one boy and one girl that cannot share.
        assert_eq!(row_kinds(&grid, 1), vec![Male, Male, Female, Female]);
        assert_eq!(row_kinds(&grid, 0), vec![Male, Empty, Female, Empty]);
        assert!(placement_status(&grid, Composition::new(3, 3)).is_balanced());
    }

    #[test]
    fn single_desks_place_boys_then_girls() {
        let mut grid = SeatGrid::new(2, 3);
        auto_arrange(
            &mut grid,
            Composition::new(2, 2),
            SeatArrangement::Single,
            PairingType::Mixed,
        );
        use SeatKind::*;
        assert_eq!(row_kinds(&grid, 1), vec![Male, Male, Female]);
        assert_eq!(row_kinds(&grid, 0), vec![Female, Empty, Empty]);
    }

    #[test]
    fn too_small_grid_underflows() {
        let mut grid = pair_grid(1, 2);
        auto_arrange(
            &mut grid,
            Composition::new(2, 2),
            SeatArrangement::Pair,
            PairingType::Mixed,
        );
        let status = placement_status(&grid, Composition::new(2, 2));
        assert!(status.total_underflow());
        assert!(!status.is_balanced());
        assert_eq!(status.problems().len(), 2);
    }

    #[test]
    fn status_reports_overflow() {
        let mut grid = SeatGrid::new(1, 3);
        grid.set(SeatPos::new(0, 0), SeatKind::Male);
        grid.set(SeatPos::new(0, 1), SeatKind::Male);
        let status = placement_status(&grid, Composition::new(1, 1));
        assert!(status.overflow(Gender::Male));
        assert!(status.underflow(Gender::Female));
        assert!(status.any_overflow());
        assert!(!status.total_overflow());
        let problems = status.problems();
        assert!(problems[0].contains("1 more male"));
        assert!(problems[1].contains("1 female student(s) without a seat"));
    }
}
