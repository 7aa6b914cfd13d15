use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};

use seatplan_logic::render::DisplayMode;
use seatplan_logic::settings::{PairingType, SeatArrangement};

use crate::assign::run_assign;
use crate::check::run_check;
use crate::import::run_import;
use crate::template::run_template;

#[derive(Debug, Parser)]
#[command(
    name = "seatplan",
    about = "Classroom seating charts: roster import, seat templates, randomized placement",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Read a class list from a spreadsheet into a plan file.
    Import(ImportArgs),

    /// Print the auto-arranged seat template for a class.
    Template(TemplateArgs),

    /// Seat the class and print the chart.
    Assign(AssignArgs),

    /// Validate a plan file: settings, notes, template.
    Check(CheckArgs),
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Workbook to read (.xlsx, .xls, .ods).
    pub workbook: PathBuf,

    /// Worksheet name; the first sheet when omitted.
    #[arg(long)]
    pub sheet: Option<String>,

    /// Plan file to write; printed to stdout when omitted.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct TemplateArgs {
    /// Start from this plan file's settings and roster.
    #[arg(long)]
    pub plan: Option<PathBuf>,

    #[arg(long)]
    pub students: Option<u32>,

    #[arg(long)]
    pub male: Option<u32>,

    #[arg(long)]
    pub female: Option<u32>,

    #[arg(long, value_enum)]
    pub arrangement: Option<ArrangementArg>,

    #[arg(long, value_enum)]
    pub pairing: Option<PairingArg>,
}

#[derive(Debug, Args)]
pub struct AssignArgs {
    #[arg(long)]
    pub plan: PathBuf,

    /// Seed for a reproducible chart; random when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Placement passes before settling for the best one.
    #[arg(long)]
    pub attempts: Option<u32>,

    #[arg(long, value_enum, default_value_t = DisplayArg::NameAndId)]
    pub display: DisplayArg,

    /// Rotate the chart so the teacher's desk is on top.
    #[arg(long)]
    pub teacher_view: bool,

    /// Print the placement as JSON instead of a chart.
    #[arg(long)]
    pub json: bool,

    /// Date printed under the title; today when omitted.
    #[arg(long)]
    pub date: Option<String>,

    /// Write the chart to this file.
    #[arg(short, long, conflicts_with = "export_dir")]
    pub output: Option<PathBuf>,

    /// Write the chart into this directory under its default file name.
    #[arg(long)]
    pub export_dir: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    #[arg(long)]
    pub plan: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ArrangementArg {
    Pair,
    Single,
}

impl From<ArrangementArg> for SeatArrangement {
    fn from(arg: ArrangementArg) -> Self {
        match arg {
            ArrangementArg::Pair => SeatArrangement::Pair,
            ArrangementArg::Single => SeatArrangement::Single,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PairingArg {
    Mixed,
    SameGender,
    Male,
    Female,
}

impl From<PairingArg> for PairingType {
    fn from(arg: PairingArg) -> Self {
        match arg {
            PairingArg::Mixed => PairingType::Mixed,
            PairingArg::SameGender => PairingType::SameGender,
            PairingArg::Male => PairingType::MaleOnly,
            PairingArg::Female => PairingType::FemaleOnly,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DisplayArg {
    NameAndId,
    Name,
    Id,
}

impl From<DisplayArg> for DisplayMode {
    fn from(arg: DisplayArg) -> Self {
        match arg {
            DisplayArg::NameAndId => DisplayMode::NameAndId,
            DisplayArg::Name => DisplayMode::NameOnly,
            DisplayArg::Id => DisplayMode::IdOnly,
        }
    }
}

pub fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Import(args) => run_import(args).map(|()| ExitCode::SUCCESS),
        Commands::Template(args) => run_template(args).map(|()| ExitCode::SUCCESS),
        Commands::Assign(args) => run_assign(args).map(|()| ExitCode::SUCCESS),
        Commands::Check(args) => run_check(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn assign_flags_parse() {
        let cli = Cli::try_parse_from([
            "seatplan",
            "assign",
            "--plan",
            "plan.json",
            "--seed",
            "42",
            "--display",
            "name",
            "--teacher-view",
        ])
        .unwrap();
        let Commands::Assign(args) = cli.command else {
            panic!("expected assign");
        };
        assert_eq!(args.seed, Some(42));
        assert_eq!(args.display, DisplayArg::Name);
        assert!(args.teacher_view);
        assert!(!args.json);
    }

    #[test]
    fn template_pairing_names() {
        let cli = Cli::try_parse_from([
            "seatplan",
            "template",
            "--students",
            "20",
            "--male",
            "10",
            "--female",
            "10",
            "--pairing",
            "same-gender",
        ])
        .unwrap();
        let Commands::Template(args) = cli.command else {
            panic!("expected template");
        };
        assert_eq!(args.pairing.map(PairingType::from), Some(PairingType::SameGender));
        assert_eq!(args.students, Some(20));
    }

    #[test]
    fn output_and_export_dir_conflict() {
        let err = Cli::try_parse_from([
            "seatplan", "assign", "--plan", "p.json", "-o", "a.txt", "--export-dir", ".",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }
}
