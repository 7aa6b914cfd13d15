//! Pure seating logic for SeatPlan.
//!
//! This crate contains all classroom-seating logic that is independent of
//! any UI, file format, or runtime. Functions take plain data and return
//! results, making them unit-testable and usable from the CLI, the headless
//! harness, and any future front end.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`grid`] | Seat grid, aisles, desk-mate adjacency, structural edits |
//! | [`layout`] | Gendered seat templates from pairing policy; overflow/underflow status |
//! | [`notes`] | Teacher rules: together, separate, zone consideration |
//! | [`placement`] | Randomized constrained placement of named students |
//! | [`render`] | Printable text charts (student or teacher perspective) |
//! | [`roster`] | Students, gender composition, spreadsheet-row import |
//! | [`settings`] | Class settings form, defaults, validation |
//!
//! # Pipeline
//!
//! ```
//! use rand::{rngs::StdRng, SeedableRng};
//! use seatplan_logic::grid::SeatGrid;
//! use seatplan_logic::layout::auto_arrange;
//! use seatplan_logic::notes::TeacherNotes;
//! use seatplan_logic::placement::{assign_seats, PlacementOptions, PlacementRequest};
//! use seatplan_logic::roster::placeholder_roster;
//! use seatplan_logic::settings::ClassSettings;
//!
//! let settings = ClassSettings::default();
//! let roster = placeholder_roster(settings.male_count, settings.female_count);
//! let mut grid = SeatGrid::for_class(&settings);
//! auto_arrange(&mut grid, settings.composition(), settings.arrangement, settings.pairing);
//!
//! let notes = TeacherNotes::default();
//! let request = PlacementRequest {
//!     grid: &grid,
//!     roster: &roster,
//!     notes: &notes,
//!     options: PlacementOptions::default(),
//! };
//! let placement = assign_seats(&request, &mut StdRng::seed_from_u64(42)).unwrap();
//! assert_eq!(placement.plan.seated_count(), 24);
//! ```

pub mod grid;
pub mod layout;
pub mod notes;
pub mod placement;
pub mod render;
pub mod roster;
pub mod settings;
