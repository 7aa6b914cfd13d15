use std::process::ExitCode;

use anyhow::Result;

use seatplan_logic::layout::placement_status;
use seatplan_logic::roster::composition;
use seatplan_logic::settings::{validate_settings, SettingsError};

use crate::cli::CheckArgs;
use crate::plan::PlanFile;

/// Everything wrong with a plan, as printable lines. Empty means ready.
pub fn plan_problems(plan: &PlanFile) -> Vec<String> {
    let mut problems = Vec::new();
    let settings = plan.effective_settings();

    if !plan.students.is_empty() {
        let typed = plan.settings.composition();
        let actual = composition(&plan.students);
        if typed != actual {
            log::info!(
                "Roster has {} M / {} F; settings said {} M / {} F",
                actual.male,
                actual.female,
                typed.male,
                typed.female
            );
        }
    }

    let errors = validate_settings(&settings);
    problems.extend(errors.iter().map(|e| format!("settings: {e}")));
    // Placeholders and templates are sized from the counts.
    if errors.iter().any(|e| {
        matches!(e, SettingsError::InvalidStudentCount(_) | SettingsError::CountMismatch { .. })
    }) {
        return problems;
    }

    problems.extend(
        plan.notes
            .validate(&plan.roster())
            .iter()
            .map(|issue| format!("notes: {issue}")),
    );
    let status = placement_status(&plan.template(), settings.composition());
    problems.extend(status.problems().into_iter().map(|p| format!("template: {p}")));
    problems
}

pub fn run_check(args: CheckArgs) -> Result<ExitCode> {
    let plan = PlanFile::load(&args.plan)?;
    println!("{}", plan.effective_settings().summary());

    let problems = plan_problems(&plan);
    if problems.is_empty() {
        println!("✓ ready to assign seats");
        return Ok(ExitCode::SUCCESS);
    }
    for p in &problems {
        println!("✗ {p}");
    }
    println!("{} problem(s)", problems.len());
    Ok(ExitCode::FAILURE)
}
