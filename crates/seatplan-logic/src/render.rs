//! Printable text charts.
//!
//! Two views of the same arrangement:
//! - **Students** (default): back of the room at the top, teacher's desk at
//!   the bottom, as the class sees it.
//! - **Teacher**: rotated 180° so the desk is at the top.
//!
//! Cells are padded by terminal display width, so Hangul and other wide
//! names line up with Latin ones.

use serde::{Deserialize, Serialize};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::grid::{SeatGrid, SeatKind, SeatPos};
use crate::placement::SeatPlan;
use crate::roster::Student;
use crate::settings::ClassSettings;

/// Gap between seats of one section.
const SEAT_GAP: &str = " ";
/// Gap at an aisle.
const AISLE_GAP: &str = "    ";
const MIN_CELL_WIDTH: usize = 4;
const MAX_CELL_WIDTH: usize = 20;

/// What each seat shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayMode {
    #[default]
    NameAndId,
    NameOnly,
    IdOnly,
}

/// Which way the chart faces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Perspective {
    #[default]
    Students,
    Teacher,
}

#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub display: DisplayMode,
    pub perspective: Perspective,
    /// First line of the chart, e.g. from [`chart_title`].
    pub title: Option<String>,
    /// Shown after the title.
    pub date: Option<String>,
    /// Fixed cell width; derived from the longest label when `None`.
    pub cell_width: Option<usize>,
}

/// "Grade 3 Class 2 seating chart".
pub fn chart_title(settings: &ClassSettings) -> String {
    format!(
        "Grade {} Class {} seating chart",
        settings.grade, settings.class_number
    )
}

/// Default file name for a saved chart.
///
/// `date` is expected as `yyyymmdd`.
pub fn export_file_name(settings: &ClassSettings, date: &str, landscape: bool) -> String {
    let orientation = if landscape { "landscape" } else { "portrait" };
    format!(
        "{}-{} seating chart ({}_{}).txt",
        settings.grade, settings.class_number, date, orientation
    )
}

/// Name as printed in name-only mode: two-letter names are spread out to
/// fill the cell the way a longer name would.
fn shaped_name(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() == 2 {
        format!("{}  {}", chars[0], chars[1])
    } else {
        name.to_string()
    }
}

/// Text lines shown inside a seat for `mode`.
fn labels(student: &Student, mode: DisplayMode) -> Vec<String> {
    match mode {
        DisplayMode::NameAndId => vec![student.name.clone(), student.number.clone()],
        DisplayMode::NameOnly => vec![shaped_name(&student.name)],
        DisplayMode::IdOnly => vec![student.number.clone()],
    }
}

/// Cut `text` to at most `width` columns, marking the cut with "…".
fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Center `text` in exactly `width` columns.
fn center(text: &str, width: usize) -> String {
    let text = truncate(text, width);
    let pad = width.saturating_sub(text.width());
    let left = pad / 2;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(pad - left))
}

fn gap_before(grid: &SeatGrid, col: usize) -> &'static str {
    match col {
        0 => "",
        c if grid.aisles().contains(&(c - 1)) => AISLE_GAP,
        _ => SEAT_GAP,
    }
}

/// Lay out one text line per grid row; `cell` returns the seat content.
fn grid_line(grid: &SeatGrid, row: usize, mut cell: impl FnMut(SeatPos) -> String) -> String {
    let mut line = String::new();
    for col in 0..grid.cols() {
        line.push_str(gap_before(grid, col));
        line.push_str(&cell(SeatPos::new(row, col)));
    }
    line.trim_end().to_string()
}

fn line_width(grid: &SeatGrid, cell_width: usize) -> usize {
    (0..grid.cols())
        .map(|c| gap_before(grid, c).len() + cell_width)
        .sum()
}

/// Render a seating chart as plain text.
pub fn render_chart(plan: &SeatPlan, options: &RenderOptions) -> String {
    let flipped;
    let plan = match options.perspective {
        Perspective::Students => plan,
        Perspective::Teacher => {
            flipped = plan.flipped();
            &flipped
        }
    };
    let grid = plan.grid();

    let lines_per_seat = match options.display {
        DisplayMode::NameAndId => 2,
        DisplayMode::NameOnly | DisplayMode::IdOnly => 1,
    };
    let inner = options.cell_width.unwrap_or_else(|| {
        plan.students()
            .flat_map(|(_, s)| labels(s, options.display))
            .map(|l| l.width())
            .max()
            .unwrap_or(0)
            .clamp(MIN_CELL_WIDTH, MAX_CELL_WIDTH)
    });
    // Brackets around every seat.
    let cell_width = inner + 2;
    let total_width = line_width(grid, cell_width);

    let (top, bottom) = match options.perspective {
        Perspective::Students => ("BACK", "FRONT · TEACHER'S DESK"),
        Perspective::Teacher => ("FRONT · TEACHER'S DESK", "BACK"),
    };

    let mut out = Vec::new();
    if let Some(title) = &options.title {
        match &options.date {
            Some(date) => out.push(format!("{title} ({date})")),
            None => out.push(title.clone()),
        }
        out.push(String::new());
    }
    out.push(center(top, total_width).trim_end().to_string());
    out.push(String::new());

    for row in 0..grid.rows() {
        for line in 0..lines_per_seat {
            out.push(grid_line(grid, row, |pos| {
                let marked = grid.get(pos).is_some_and(SeatKind::is_occupied);
                match plan.get(pos) {
                    Some(student) => {
                        let text = labels(student, options.display)
                            .get(line)
                            .cloned()
                            .unwrap_or_default();
                        format!("[{}]", center(&text, inner))
                    }
                    None if marked => format!("[{}]", " ".repeat(inner)),
                    None => " ".repeat(cell_width),
                }
            }));
        }
        if lines_per_seat > 1 && row + 1 < grid.rows() {
            out.push(String::new());
        }
    }

    out.push(String::new());
    out.push(center(bottom, total_width).trim_end().to_string());
    let mut text = out.join("\n");
    text.push('\n');
    text
}

/// Render a seat template: `M`/`F` for reserved seats, `.` for unused ones.
pub fn render_template(grid: &SeatGrid) -> String {
    let width = line_width(grid, 1);
    let mut out = vec![center("BACK", width).trim_end().to_string()];
    for row in 0..grid.rows() {
        out.push(grid_line(grid, row, |pos| {
            match grid.get(pos).unwrap_or_default() {
                SeatKind::Male => "M",
                SeatKind::Female => "F",
                SeatKind::Empty => ".",
            }
            .to_string()
        }));
    }
    out.push(center("FRONT", width).trim_end().to_string());
    let mut text = out.join("\n");
    text.push('\n');
    text
}
