use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

use seatplan_logic::placement::{assign_seats, Placement, PlacementOptions, PlacementRequest};
use seatplan_logic::render::{
    chart_title, export_file_name, render_chart, Perspective, RenderOptions,
};
use seatplan_logic::settings::validate_settings;

use crate::cli::AssignArgs;
use crate::plan::PlanFile;

/// Seat the class described by `plan`.
pub fn place(plan: &PlanFile, seed: u64, attempts: Option<u32>) -> Result<Placement> {
    let grid = plan.template();
    let roster = plan.roster();
    let defaults = PlacementOptions::default();
    let request = PlacementRequest {
        grid: &grid,
        roster: &roster,
        notes: &plan.notes,
        options: PlacementOptions {
            max_attempts: attempts.unwrap_or(defaults.max_attempts).max(1),
            ..defaults
        },
    };
    let placement = assign_seats(&request, &mut StdRng::seed_from_u64(seed))
        .context("cannot seat this class with the current template")?;
    log::info!(
        "Seated {} students (seed {seed}, {} passes)",
        placement.plan.seated_count(),
        placement.report.attempts
    );
    Ok(placement)
}

pub fn run_assign(args: AssignArgs) -> Result<()> {
    let plan = PlanFile::load(&args.plan)?;
    let settings = plan.effective_settings();
    let errors = validate_settings(&settings);
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("✗ {e}");
        }
        bail!("{} settings problem(s)", errors.len());
    }

    for issue in plan.notes.validate(&plan.roster()) {
        log::warn!("Note ignored: {issue}");
    }

    // Always draw a concrete seed so any chart can be reproduced.
    let seed = args.seed.unwrap_or_else(rand::random);
    let placement = place(&plan, seed, args.attempts)?;

    for unmet in &placement.report.unmet {
        eprintln!("✗ {unmet}");
    }
    if placement.report.gender_mismatches > 0 {
        eprintln!(
            "✗ {} student(s) sit in a seat marked for the other gender",
            placement.report.gender_mismatches
        );
    }

    let text = if args.json {
        let mut json = serde_json::to_string_pretty(&placement)?;
        json.push('\n');
        json
    } else {
        let options = RenderOptions {
            display: args.display.into(),
            perspective: if args.teacher_view {
                Perspective::Teacher
            } else {
                Perspective::Students
            },
            title: Some(chart_title(&settings)),
            date: Some(
                args.date
                    .clone()
                    .unwrap_or_else(|| chrono::Local::now().format("%Y-%m-%d").to_string()),
            ),
            cell_width: None,
        };
        render_chart(&placement.plan, &options)
    };

    let target = match (&args.output, &args.export_dir) {
        (Some(path), _) => Some(path.clone()),
        (None, Some(dir)) => {
            let landscape = placement.plan.cols() > placement.plan.rows();
            let today = chrono::Local::now().format("%Y%m%d").to_string();
            Some(dir.join(export_file_name(&settings, &today, landscape)))
        }
        (None, None) => None,
    };

    match target {
        Some(path) => write_chart(&path, &text)?,
        None => print!("{text}"),
    }
    Ok(())
}

fn write_chart(path: &Path, text: &str) -> Result<()> {
    fs::write(path, text).with_context(|| format!("cannot write {}", path.display()))?;
    eprintln!("Saved {}", path.display());
    Ok(())
}
