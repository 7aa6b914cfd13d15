use anyhow::{bail, Result};

use seatplan_logic::layout::placement_status;
use seatplan_logic::render::render_template;
use seatplan_logic::settings::{validate_settings, ClassSettings};

use crate::cli::TemplateArgs;
use crate::plan::PlanFile;

/// Plan from `--plan` (or defaults) with the count and layout flags applied.
fn plan_with_overrides(args: &TemplateArgs) -> Result<PlanFile> {
    let mut plan = match &args.plan {
        Some(path) => PlanFile::load(path)?,
        None => PlanFile::default(),
    };
    let counts_given = args.students.is_some() || args.male.is_some() || args.female.is_some();
    if counts_given && !plan.students.is_empty() {
        bail!("head counts come from the roster in this plan; drop --students/--male/--female");
    }

    let s: &mut ClassSettings = &mut plan.settings;
    if let Some(n) = args.students {
        s.student_count = n;
    }
    match (args.male, args.female) {
        (Some(m), Some(f)) => {
            s.male_count = m;
            s.female_count = f;
        }
        (Some(m), None) => {
            s.male_count = m;
            s.female_count = s.student_count.saturating_sub(m);
        }
        (None, Some(f)) => {
            s.female_count = f;
            s.male_count = s.student_count.saturating_sub(f);
        }
        // An even split, extra student to the boys.
        (None, None) if args.students.is_some() => {
            s.female_count = s.student_count / 2;
            s.male_count = s.student_count - s.female_count;
        }
        (None, None) => {}
    }
    if args.students.is_none() && (args.male.is_some() || args.female.is_some()) {
        s.student_count = s.male_count + s.female_count;
    }
    if let Some(a) = args.arrangement {
        s.arrangement = a.into();
    }
    if let Some(p) = args.pairing {
        s.pairing = p.into();
    }
    // Changed settings invalidate a saved template.
    if counts_given || args.arrangement.is_some() || args.pairing.is_some() {
        plan.grid = None;
    }
    Ok(plan)
}

pub fn run_template(args: TemplateArgs) -> Result<()> {
    let plan = plan_with_overrides(&args)?;
    let settings = plan.effective_settings();

    let errors = validate_settings(&settings);
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("✗ {e}");
        }
        bail!("{} settings problem(s)", errors.len());
    }

    let grid = plan.template();
    println!("{}", settings.summary());
    println!();
    print!("{}", render_template(&grid));

    let status = placement_status(&grid, settings.composition());
    let counts = grid.counts();
    println!();
    println!(
        "{} seats marked ({} M, {} F) for {} students",
        counts.total(),
        counts.male,
        counts.female,
        settings.student_count
    );
    for problem in status.problems() {
        println!("✗ {problem}");
    }
    Ok(())
}
