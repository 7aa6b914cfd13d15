//! SeatPlan Headless Placement Harness
//!
//! Sweeps class sizes, layouts, pairing policies and seeds through the pure
//! seating logic and checks the invariants every chart must hold.
//! Runs entirely in-process: no files, no terminal UI.
//!
//! Usage:
//!   cargo run -p seatplan-simtest
//!   cargo run -p seatplan-simtest -- --verbose

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::SeedableRng;

use seatplan_logic::grid::{SeatGrid, SeatKind, SeatPos};
use seatplan_logic::layout::{auto_arrange, placement_status};
use seatplan_logic::notes::{TeacherNotes, Zone};
use seatplan_logic::placement::{
    assign_seats, PlacementError, PlacementOptions, PlacementRequest, UnmetRule,
};
use seatplan_logic::render::{render_chart, DisplayMode, Perspective, RenderOptions};
use seatplan_logic::roster::placeholder_roster;
use seatplan_logic::settings::{validate_settings, ClassSettings, PairingType, SeatArrangement};

// ── Sample notes (same JSON shape plan files use) ──────────────────────
const SAMPLE_NOTES_JSON: &str = r#"{
    "togetherStudents": [{ "students": ["Boy 3", "Girl 3"] }],
    "separateStudents": [
        { "students": ["Boy 1", "Boy 2"] },
        { "students": ["Girl 1", "Girl 4"] }
    ],
    "considerationStudents": [
        { "student": "Girl 6", "position": "front" },
        { "student": "Boy 9", "position": "back" }
    ]
}"#;

const SEEDS_PER_CASE: u64 = 25;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== SeatPlan Placement Harness ===\n");

    let mut results = Vec::new();

    // 1. Settings validation
    results.extend(validate_settings_rules(verbose));

    // 2. Template generation sweep
    results.extend(validate_templates(verbose));

    // 3. Placement sweep without notes
    results.extend(validate_plain_placement(verbose));

    // 4. Placement with teacher notes
    results.extend(validate_noted_placement(verbose));

    // 5. Grid editing
    results.extend(validate_grid_edits(verbose));

    // 6. Chart rendering
    results.extend(validate_rendering(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn class(male: u32, female: u32, arrangement: SeatArrangement, pairing: PairingType) -> ClassSettings {
    ClassSettings {
        student_count: male + female,
        male_count: male,
        female_count: female,
        arrangement,
        pairing,
        ..ClassSettings::default()
    }
}

fn template_for(settings: &ClassSettings) -> SeatGrid {
    let mut grid = SeatGrid::for_class(settings);
    auto_arrange(&mut grid, settings.composition(), settings.arrangement, settings.pairing);
    grid
}

const LAYOUTS: [(SeatArrangement, PairingType); 5] = [
    (SeatArrangement::Pair, PairingType::Mixed),
    (SeatArrangement::Pair, PairingType::SameGender),
    (SeatArrangement::Pair, PairingType::MaleOnly),
    (SeatArrangement::Pair, PairingType::FemaleOnly),
    (SeatArrangement::Single, PairingType::Mixed),
];

const COMPOSITIONS: [(u32, u32); 7] = [(1, 0), (0, 1), (12, 12), (15, 9), (7, 14), (20, 20), (3, 0)];

// ── 1. Settings ─────────────────────────────────────────────────────────

fn validate_settings_rules(_verbose: bool) -> Vec<TestResult> {
    println!("--- Settings ---");
    let mut results = Vec::new();

    let defaults = ClassSettings::default();
    let errors = validate_settings(&defaults);
    results.push(TestResult {
        name: "settings_defaults_valid".into(),
        passed: errors.is_empty(),
        detail: format!("{} ({} errors)", defaults.summary(), errors.len()),
    });

    let mismatch = ClassSettings {
        student_count: 25,
        ..ClassSettings::default()
    };
    results.push(TestResult {
        name: "settings_count_mismatch_rejected".into(),
        passed: !validate_settings(&mismatch).is_empty(),
        detail: "25 students with 12 M + 12 F".into(),
    });

    let bad_grade = ClassSettings {
        grade: 7,
        ..ClassSettings::default()
    };
    results.push(TestResult {
        name: "settings_grade_range".into(),
        passed: !validate_settings(&bad_grade).is_empty(),
        detail: "grade 7 rejected".into(),
    });

    let girls_only = class(3, 5, SeatArrangement::Pair, PairingType::FemaleOnly);
    results.push(TestResult {
        name: "settings_pairing_excludes_gender".into(),
        passed: !validate_settings(&girls_only).is_empty(),
        detail: "female-only pairing with boys in the class rejected".into(),
    });

    results
}

// ── 2. Templates ────────────────────────────────────────────────────────

fn validate_templates(verbose: bool) -> Vec<TestResult> {
    println!("--- Template Generation ---");
    let mut results = Vec::new();

    let mut unbalanced = Vec::new();
    let mut bad_pairs = Vec::new();
    let mut cases = 0;

    for &(arrangement, pairing) in &LAYOUTS {
        for &(male, female) in &COMPOSITIONS {
            // Single-gender pairing only applies to single-gender classes.
            if (pairing == PairingType::MaleOnly && female > 0)
                || (pairing == PairingType::FemaleOnly && male > 0)
            {
                continue;
            }
            cases += 1;
            let settings = class(male, female, arrangement, pairing);
            let grid = template_for(&settings);
            let status = placement_status(&grid, settings.composition());
            if !status.is_balanced() {
                unbalanced.push(format!("{male}M/{female}F {pairing:?} → {:?}", status.problems()));
            }

            if arrangement == SeatArrangement::Pair {
                for pos in grid.occupied_positions() {
                    let mate = SeatPos::new(pos.row, pos.col + 1);
                    let (Some(a), Some(b)) = (grid.get(pos), grid.get(mate)) else {
                        continue;
                    };
                    if !grid.is_desk_mate(pos, mate) || !b.is_occupied() {
                        continue;
                    }
                    let ok = match pairing {
                        PairingType::Mixed => a != b || male != female,
                        PairingType::SameGender => a == b,
                        PairingType::MaleOnly => a == SeatKind::Male && b == SeatKind::Male,
                        PairingType::FemaleOnly => a == SeatKind::Female && b == SeatKind::Female,
                    };
                    if !ok {
                        bad_pairs.push(format!("{male}M/{female}F {pairing:?} at {pos:?}"));
                    }
                }
            }

            if verbose && male == 12 && female == 12 {
                println!("  {} / {}:", arrangement.label(), pairing.label());
                for line in seatplan_logic::render::render_template(&grid).lines() {
                    println!("    {line}");
                }
            }
        }
    }

    results.push(TestResult {
        name: "template_matches_composition".into(),
        passed: unbalanced.is_empty(),
        detail: if unbalanced.is_empty() {
            format!("{cases} templates balanced")
        } else {
            unbalanced.join("; ")
        },
    });

    results.push(TestResult {
        name: "template_respects_pairing".into(),
        passed: bad_pairs.is_empty(),
        detail: if bad_pairs.is_empty() {
            "every desk follows its pairing policy".into()
        } else {
            format!("{} bad desks: {}", bad_pairs.len(), bad_pairs.join(", "))
        },
    });

    results
}

// ── 3. Plain placement ──────────────────────────────────────────────────

fn validate_plain_placement(_verbose: bool) -> Vec<TestResult> {
    println!("--- Placement (no notes) ---");
    let mut results = Vec::new();

    let notes = TeacherNotes::default();
    let mut failures = Vec::new();
    let mut runs = 0;

    for &(arrangement, pairing) in &LAYOUTS {
        for &(male, female) in &COMPOSITIONS {
            if (pairing == PairingType::MaleOnly && female > 0)
                || (pairing == PairingType::FemaleOnly && male > 0)
            {
                continue;
            }
            let settings = class(male, female, arrangement, pairing);
            let grid = template_for(&settings);
            let roster = placeholder_roster(male, female);
            for seed in 0..SEEDS_PER_CASE {
                runs += 1;
                let request = PlacementRequest {
                    grid: &grid,
                    roster: &roster,
                    notes: &notes,
                    options: PlacementOptions::default(),
                };
                let placement = match assign_seats(&request, &mut StdRng::seed_from_u64(seed)) {
                    Ok(p) => p,
                    Err(e) => {
                        failures.push(format!("{male}M/{female}F seed {seed}: {e}"));
                        continue;
                    }
                };
                let plan = &placement.plan;
                let names: HashSet<_> = plan.students().map(|(_, s)| s.name.as_str()).collect();
                if plan.seated_count() != roster.len() || names.len() != roster.len() {
                    failures.push(format!(
                        "{male}M/{female}F seed {seed}: {} seated, {} distinct",
                        plan.seated_count(),
                        names.len()
                    ));
                }
                let stray = plan
                    .students()
                    .filter(|(pos, _)| !grid.get(*pos).is_some_and(SeatKind::is_occupied))
                    .count();
                if stray > 0 || placement.report.gender_mismatches > 0 {
                    failures.push(format!(
                        "{male}M/{female}F seed {seed}: {stray} stray, {} mismatched",
                        placement.report.gender_mismatches
                    ));
                }
            }
        }
    }

    results.push(TestResult {
        name: "placement_seats_everyone_once".into(),
        passed: failures.is_empty(),
        detail: if failures.is_empty() {
            format!("{runs} placements valid")
        } else {
            failures.join("; ")
        },
    });

    // A template with too few seats must be refused, not silently truncated.
    let settings = ClassSettings::default();
    let mut grid = template_for(&settings);
    grid.set(SeatPos::new(grid.rows() - 1, 0), SeatKind::Empty);
    let roster = placeholder_roster(12, 12);
    let request = PlacementRequest {
        grid: &grid,
        roster: &roster,
        notes: &notes,
        options: PlacementOptions::default(),
    };
    let refused = matches!(
        assign_seats(&request, &mut StdRng::seed_from_u64(0)),
        Err(PlacementError::Unbalanced(_))
    );
    results.push(TestResult {
        name: "placement_refuses_short_template".into(),
        passed: refused,
        detail: "23 seats for 24 students rejected".into(),
    });

    results
}

// ── 4. Noted placement ──────────────────────────────────────────────────

fn validate_noted_placement(verbose: bool) -> Vec<TestResult> {
    println!("--- Placement (teacher notes) ---");
    let mut results = Vec::new();

    let notes: TeacherNotes = match serde_json::from_str(SAMPLE_NOTES_JSON) {
        Ok(n) => n,
        Err(e) => {
            results.push(TestResult {
                name: "notes_parse".into(),
                passed: false,
                detail: format!("JSON parse error: {}", e),
            });
            return results;
        }
    };

    let settings = ClassSettings::default();
    let grid = template_for(&settings);
    let roster = placeholder_roster(12, 12);

    let issues = notes.validate(&roster);
    results.push(TestResult {
        name: "notes_reference_roster".into(),
        passed: issues.is_empty(),
        detail: format!("{} rules, {} issues", rule_count(&notes), issues.len()),
    });

    let mut clean = 0;
    let mut broken = Vec::new();
    for seed in 0..SEEDS_PER_CASE {
        let request = PlacementRequest {
            grid: &grid,
            roster: &roster,
            notes: &notes,
            options: PlacementOptions::default(),
        };
        let Ok(placement) = assign_seats(&request, &mut StdRng::seed_from_u64(seed)) else {
            broken.push(format!("seed {seed}: placement failed"));
            continue;
        };
        let plan = &placement.plan;

        // Whatever the report says must match the chart.
        for rule in &notes.together {
            let [a, b] = &rule.students;
            let met = plan.are_desk_mates(a, b);
            let reported = placement.report.unmet.iter().any(
                |u| matches!(u, UnmetRule::Together { a: x, b: y } if x == a && y == b),
            );
            if !met && !reported {
                broken.push(format!("seed {seed}: {a}/{b} apart but not reported"));
            }
        }
        for rule in &notes.separate {
            let [a, b] = &rule.students;
            let met = !plan.are_neighbours(a, b);
            let reported = placement.report.unmet.iter().any(|u| match u {
                UnmetRule::Separate { a: x, b: y } => (x == a && y == b) || (x == b && y == a),
                _ => false,
            });
            if !met && !reported {
                broken.push(format!("seed {seed}: {a}/{b} adjacent but not reported"));
            }
        }
        for rule in &notes.consideration {
            let Some(pos) = plan.position_of(&rule.student) else {
                broken.push(format!("seed {seed}: {} not seated", rule.student));
                continue;
            };
            if rule.zone == Zone::Front && pos.row != plan.rows() - 1 && placement.report.is_clean() {
                broken.push(format!("seed {seed}: {} not in front row", rule.student));
            }
        }
        if placement.report.is_clean() {
            clean += 1;
        } else if verbose {
            for u in &placement.report.unmet {
                println!("    seed {seed}: unmet {u}");
            }
        }
    }

    results.push(TestResult {
        name: "notes_report_matches_chart".into(),
        passed: broken.is_empty(),
        detail: if broken.is_empty() {
            "every unmet rule is reported".into()
        } else {
            broken.join("; ")
        },
    });

    results.push(TestResult {
        name: "notes_usually_satisfiable".into(),
        passed: clean * 10 >= SEEDS_PER_CASE * 9,
        detail: format!("{clean}/{SEEDS_PER_CASE} seeds fully satisfied"),
    });

    results
}

fn rule_count(notes: &TeacherNotes) -> usize {
    notes.together.len() + notes.separate.len() + notes.consideration.len()
}

// ── 5. Grid editing ─────────────────────────────────────────────────────

fn validate_grid_edits(_verbose: bool) -> Vec<TestResult> {
    println!("--- Grid Editing ---");
    let mut results = Vec::new();

    let settings = ClassSettings::default();
    let grid = template_for(&settings);

    let twice = grid.rotated().rotated();
    results.push(TestResult {
        name: "grid_rotation_involution".into(),
        passed: twice == grid,
        detail: "rotating twice restores the grid".into(),
    });

    let mut shrunk = grid.clone();
    for _ in 0..10 {
        shrunk.remove_col_right();
        shrunk.remove_row_top();
    }
    results.push(TestResult {
        name: "grid_minimum_size".into(),
        passed: shrunk.rows() == 1 && shrunk.cols() == 1 && shrunk.is_well_formed(),
        detail: format!("{}×{} after shrinking", shrunk.rows(), shrunk.cols()),
    });

    let mut grown = grid.clone();
    grown.add_col_left();
    grown.add_row_top();
    let shifted = grid
        .positions()
        .all(|p| grown.get(SeatPos::new(p.row + 1, p.col + 1)) == grid.get(p));
    results.push(TestResult {
        name: "grid_growth_keeps_markers".into(),
        passed: shifted && grown.is_well_formed() && grown.counts() == grid.counts(),
        detail: format!("{}×{} after growing", grown.rows(), grown.cols()),
    });

    let mut cycled = SeatGrid::new(1, 1);
    let mut seen = Vec::new();
    for _ in 0..3 {
        cycled.cycle_seat(SeatPos::new(0, 0));
        seen.push(cycled.get(SeatPos::new(0, 0)));
    }
    results.push(TestResult {
        name: "grid_cycle_seat".into(),
        passed: seen == [Some(SeatKind::Male), Some(SeatKind::Female), Some(SeatKind::Empty)],
        detail: format!("{:?}", seen),
    });

    results
}

// ── 6. Rendering ────────────────────────────────────────────────────────

fn validate_rendering(verbose: bool) -> Vec<TestResult> {
    println!("--- Chart Rendering ---");
    let mut results = Vec::new();

    let settings = ClassSettings::default();
    let grid = template_for(&settings);
    let roster = placeholder_roster(12, 12);
    let notes = TeacherNotes::default();
    let request = PlacementRequest {
        grid: &grid,
        roster: &roster,
        notes: &notes,
        options: PlacementOptions::default(),
    };
    let placement = match assign_seats(&request, &mut StdRng::seed_from_u64(7)) {
        Ok(p) => p,
        Err(e) => {
            results.push(TestResult {
                name: "render_setup".into(),
                passed: false,
                detail: e.to_string(),
            });
            return results;
        }
    };

    for (mode, perspective) in [
        (DisplayMode::NameAndId, Perspective::Students),
        (DisplayMode::NameOnly, Perspective::Teacher),
        (DisplayMode::IdOnly, Perspective::Students),
    ] {
        let chart = render_chart(
            &placement.plan,
            &RenderOptions {
                display: mode,
                perspective,
                ..RenderOptions::default()
            },
        );
        let missing: Vec<_> = roster
            .iter()
            .filter(|s| match mode {
                DisplayMode::IdOnly => !chart.contains(&s.number),
                _ => !chart.contains(&s.name),
            })
            .map(|s| s.name.as_str())
            .collect();
        let desk_first = chart.find("TEACHER'S DESK") < chart.find("BACK");
        let orientation_ok = desk_first == (perspective == Perspective::Teacher);
        results.push(TestResult {
            name: format!("render_{mode:?}_{perspective:?}").to_lowercase(),
            passed: missing.is_empty() && orientation_ok,
            detail: if missing.is_empty() {
                format!("{} lines", chart.lines().count())
            } else {
                format!("missing {}", missing.join(", "))
            },
        });
        if verbose && mode == DisplayMode::NameAndId {
            println!("{chart}");
        }
    }

    results
}
