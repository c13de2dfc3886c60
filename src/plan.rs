//! Fit plan

use std::{fmt::Write, io};

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::FromPrimitive};
use smallvec::{SmallVec, smallvec};
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    candidates::CandidateSet,
    engine::Engine,
    inventory::{Inventory, InventoryError, ShimKey, ShimOrigin},
    shims::ShimSize,
    solvers::{Choice, Solution, Weight},
    units::Inches,
    valves::ValveKind,
};

/// Errors that can occur when interpreting a solution as a fit plan.
#[derive(Debug, Error)]
pub enum PlanError {
    /// The solution does not cover every valve of the engine.
    #[error("Expected {expected} choices, got {actual}")]
    PositionCount {
        /// Number of valves on the engine.
        expected: usize,

        /// Number of choices in the solution.
        actual: usize,
    },

    /// An item id in the solution has no inventory shim behind it.
    #[error("Unknown item chosen for valve {position}")]
    UnknownItem {
        /// Index of the valve in measurement order.
        position: usize,
    },

    /// No purchasable size was recorded for a valve.
    #[error("No purchase size recorded for valve {position}")]
    MissingNominal {
        /// Index of the valve in measurement order.
        position: usize,
    },

    /// A change refers to a valve the engine does not have.
    #[error("Valve index {0} is out of range")]
    ValveNotFound(usize),

    /// Wrapper for inventory errors.
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// Where one valve's next shim comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fitment {
    /// An in-stock shim moves to this valve.
    Reuse {
        /// Inventory key of the shim.
        key: ShimKey,

        /// Size of the shim.
        size: ShimSize,

        /// Where the shim sat before the overhaul.
        origin: ShimOrigin,
    },

    /// A new shim has to be bought.
    Purchase {
        /// Catalog size to order.
        size: ShimSize,
    },
}

impl Fitment {
    /// Size of the shim this valve receives.
    #[must_use]
    pub const fn size(&self) -> ShimSize {
        match self {
            Self::Reuse { size, .. } | Self::Purchase { size } => *size,
        }
    }
}

/// One valve's line in the plan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShimChange {
    valve: usize,
    fitment: Fitment,
    new_lash: Inches,
    deviation: Inches,
}

impl ShimChange {
    /// Index of the valve in measurement order.
    #[must_use]
    pub const fn valve(&self) -> usize {
        self.valve
    }

    /// Where the valve's next shim comes from.
    #[must_use]
    pub const fn fitment(&self) -> Fitment {
        self.fitment
    }

    /// The lash the valve will have once the shim is fitted.
    #[must_use]
    pub const fn new_lash(&self) -> Inches {
        self.new_lash
    }

    /// Signed distance between the new lash and the target lash.
    #[must_use]
    pub const fn deviation(&self) -> Inches {
        self.deviation
    }
}

/// Final re-shimming plan for a measured engine.
#[derive(Debug, Clone)]
pub struct FitPlan {
    /// One change per valve, in measurement order.
    changes: Vec<ShimChange>,

    /// The solver's objective value, in weight units.
    total: Weight,

    /// Number of valves that need a shim bought.
    purchases: usize,

    /// Number of valves covered from stock.
    reuses: usize,

    /// Sum of the absolute lash deviations across all valves.
    total_deviation: Inches,
}

impl FitPlan {
    /// Interprets a solver solution against the engine it was built for.
    ///
    /// # Errors
    ///
    /// Returns a [`PlanError`] if the solution's shape does not match the
    /// engine or one of its choices cannot be resolved.
    pub fn from_solution(
        engine: &Engine,
        inventory: &Inventory,
        candidates: &CandidateSet,
        solution: &Solution,
    ) -> Result<Self, PlanError> {
        if solution.choices.len() != engine.len() {
            return Err(PlanError::PositionCount {
                expected: engine.len(),
                actual: solution.choices.len(),
            });
        }

        let mut changes = Vec::with_capacity(engine.len());
        let mut purchases = 0;
        let mut reuses = 0;
        let mut total_deviation = Inches::ZERO;

        for (valve, (choice, measurement)) in solution
            .choices
            .iter()
            .zip(engine.valves())
            .enumerate()
        {
            let spec = engine.spec(measurement.kind());
            let gap = measurement.gap();

            let fitment = match choice {
                Choice::Item(id) => {
                    let key = candidates
                        .shim(*id)
                        .ok_or(PlanError::UnknownItem { position: valve })?;

                    let shim = inventory.shim(key)?;

                    reuses += 1;

                    Fitment::Reuse {
                        key,
                        size: shim.size(),
                        origin: shim.origin(),
                    }
                }
                Choice::Purchase => {
                    let size = candidates
                        .nominal(valve)
                        .ok_or(PlanError::MissingNominal { position: valve })?;

                    purchases += 1;

                    Fitment::Purchase { size }
                }
            };

            let new_lash = gap - fitment.size().thickness();
            let deviation = new_lash - spec.target();

            total_deviation = total_deviation + deviation.abs();

            changes.push(ShimChange {
                valve,
                fitment,
                new_lash,
                deviation,
            });
        }

        Ok(FitPlan {
            changes,
            total: solution.total,
            purchases,
            reuses,
            total_deviation,
        })
    }

    /// One change per valve, in measurement order.
    #[must_use]
    pub fn changes(&self) -> &[ShimChange] {
        &self.changes
    }

    /// The solver's objective value for the plan.
    #[must_use]
    pub const fn total(&self) -> Weight {
        self.total
    }

    /// Number of valves that need a shim bought.
    #[must_use]
    pub const fn purchases(&self) -> usize {
        self.purchases
    }

    /// Number of valves covered from stock.
    #[must_use]
    pub const fn reuses(&self) -> usize {
        self.reuses
    }

    /// Sum of the absolute lash deviations across all valves.
    #[must_use]
    pub const fn total_deviation(&self) -> Inches {
        self.total_deviation
    }

    /// Fraction of valves covered from stock.
    #[must_use]
    pub fn coverage(&self) -> Percentage {
        if self.changes.is_empty() {
            return Percentage::from(0.0);
        }

        let reused = Decimal::from_usize(self.reuses).unwrap_or(Decimal::ZERO);
        let valves = Decimal::from_usize(self.changes.len()).unwrap_or(Decimal::ZERO);

        Percentage::from(reused / valves)
    }

    /// Prints the plan as a table with a summary underneath.
    ///
    /// # Errors
    ///
    /// Returns an error if the plan cannot be printed.
    pub fn write_to(&self, mut out: impl io::Write, engine: &Engine) -> Result<(), PlanError> {
        let mut builder = Builder::default();

        push_plan_header(&mut builder);

        let mut kind_boundary_rows: SmallVec<[usize; 4]> = smallvec![];
        let mut color_ops: SmallVec<[(usize, usize, Color); 32]> = smallvec![];

        append_change_rows(
            self,
            engine,
            &mut builder,
            &mut kind_boundary_rows,
            &mut color_ops,
        )?;

        write_plan_table(&mut out, builder, &kind_boundary_rows, color_ops)?;

        write_plan_summary(&mut out, self)?;

        Ok(())
    }
}

fn push_plan_header(builder: &mut Builder) {
    builder.push_record([
        "",
        "Valve",
        "Fitted",
        "Lash",
        "Next Shim",
        "Source",
        "New Lash",
        "Deviation",
    ]);
}

fn append_change_rows(
    plan: &FitPlan,
    engine: &Engine,
    builder: &mut Builder,
    kind_boundary_rows: &mut SmallVec<[usize; 4]>,
    color_ops: &mut SmallVec<[(usize, usize, Color); 32]>,
) -> Result<(), PlanError> {
    let mut previous_kind: Option<ValveKind> = None;

    for (row, change) in plan.changes.iter().enumerate() {
        let measurement = engine
            .valves()
            .get(change.valve())
            .ok_or(PlanError::ValveNotFound(change.valve()))?;

        let current_row = row + 1; // header is row 0

        if previous_kind.is_some_and(|kind| kind != measurement.kind()) {
            kind_boundary_rows.push(current_row);
        }

        previous_kind = Some(measurement.kind());

        let (source, source_color) = source_display(change, engine)?;

        builder.push_record([
            format!("#{:<3}", change.valve() + 1),
            format!("{} #{}", measurement.kind(), measurement.number()),
            format!("{}", measurement.fitted()),
            format!("{}", measurement.lash()),
            format!("{}", change.fitment().size()),
            source,
            format!("{}", change.new_lash()),
            signed_inches(change.deviation()),
        ]);

        color_ops.push((current_row, 1, color_dark_grey()));
        color_ops.push((current_row, 3, color_dark_grey()));
        color_ops.push((current_row, 5, source_color));
    }

    Ok(())
}

/// Cell text and color for the source column.
fn source_display(change: &ShimChange, engine: &Engine) -> Result<(String, Color), PlanError> {
    match change.fitment() {
        Fitment::Reuse {
            origin: ShimOrigin::Spare,
            ..
        } => Ok(("spare".to_string(), Color::FG_GREEN)),

        Fitment::Reuse {
            origin: ShimOrigin::Fitted { valve },
            ..
        } => {
            if valve == change.valve() {
                return Ok(("kept".to_string(), Color::FG_GREEN));
            }

            let donor = engine
                .valves()
                .get(valve)
                .ok_or(PlanError::ValveNotFound(valve))?;

            Ok((
                format!("from {} #{}", donor.kind(), donor.number()),
                Color::FG_GREEN,
            ))
        }

        Fitment::Purchase { .. } => Ok(("purchase".to_string(), color_yellow())),
    }
}

fn write_plan_table(
    out: &mut impl io::Write,
    builder: Builder,
    kind_boundary_rows: &[usize],
    color_ops: SmallVec<[(usize, usize, Color); 32]>,
) -> Result<(), PlanError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    for &row in kind_boundary_rows {
        if row > 1 {
            theme.insert_horizontal_line(row, separator);
        }
    }

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(2..5), Alignment::right());
    table.modify(Columns::new(6..8), Alignment::right());

    for (row, col, color) in color_ops {
        table.modify((row, col), color);
    }

    let table_str = colorize_borders(&table.to_string());

    writeln!(out, "\n{table_str}").map_err(|_err| PlanError::IO)
}

fn write_plan_summary(out: &mut impl io::Write, plan: &FitPlan) -> Result<(), PlanError> {
    let coverage_points = percent_points_from_fractional_percentage(plan.coverage());

    let reused_label = " Reused:";
    let purchased_label = " Purchased:";
    let deviation_label = " \x1b[1mTotal deviation:\x1b[0m";

    let reused_val = format!(
        "({coverage_points:.2}%) {} of {}  ",
        plan.reuses(),
        plan.changes().len()
    );
    let purchased_val = format!("{}  ", plan.purchases());
    let deviation_val = format!("{} in  ", plan.total_deviation());

    let label_width = visible_width(reused_label)
        .max(visible_width(purchased_label))
        .max(visible_width(deviation_label));

    let value_width = reused_val
        .len()
        .max(purchased_val.len())
        .max(deviation_val.len());

    write_summary_line(out, reused_label, &reused_val, label_width, value_width)?;

    write_summary_line(out, purchased_label, &purchased_val, label_width, value_width)?;

    write_summary_line(
        out,
        deviation_label,
        &format!("\x1b[1m{deviation_val}\x1b[0m"),
        label_width,
        value_width,
    )?;

    writeln!(out).map_err(|_err| PlanError::IO)
}

/// Converts a fractional percentage to percent points for display.
fn percent_points_from_fractional_percentage(percentage: Percentage) -> Decimal {
    // `Percentage` is a fraction (e.g. 0.25), so multiply by 100 to print percent points.
    ((percentage * Decimal::ONE) * Decimal::from_i64(100).unwrap_or(Decimal::ZERO)).round_dp(2)
}

/// Deviations print with an explicit sign, so slack and tightness read
/// apart at a glance.
fn signed_inches(value: Inches) -> String {
    if value.as_decimal().is_sign_negative() {
        format!("{value}")
    } else {
        format!("+{value}")
    }
}

/// Wraps runs of UTF-8 box-drawing characters in ANSI dark-grey escape codes.
///
/// Box-drawing characters occupy the Unicode range U+2500..U+257F. This function
/// scans each character, grouping consecutive border characters and emitting a
/// single grey escape sequence around each run, leaving cell content untouched.
fn colorize_borders(table: &str) -> String {
    let mut out = String::with_capacity(table.len() + 256);
    let mut in_run = false;

    for ch in table.chars() {
        let box_char = ('\u{2500}'..='\u{257F}').contains(&ch);

        if box_char && !in_run {
            _ = out.write_str("\x1b[90m");
            in_run = true;
        } else if !box_char && in_run {
            _ = out.write_str("\x1b[0m");
            in_run = false;
        }

        out.push(ch);
    }

    if in_run {
        _ = out.write_str("\x1b[0m");
    }

    out
}

/// Returns the visible (non-ANSI) width of a string.
fn visible_width(s: &str) -> usize {
    let mut width = 0usize;
    let mut in_escape = false;

    for ch in s.chars() {
        if in_escape {
            if ch.is_ascii_alphabetic() {
                in_escape = false;
            }
        } else if ch == '\x1b' {
            in_escape = true;
        } else {
            width += 1;
        }
    }

    width
}

/// Writes a summary line with a right-aligned label and a fixed-width value column.
fn write_summary_line(
    out: &mut impl io::Write,
    label: &str,
    value: &str,
    label_col_width: usize,
    value_col_width: usize,
) -> Result<(), PlanError> {
    let label_vis = visible_width(label);
    let value_vis = visible_width(value);

    // 2 chars of spacing between label and value column.
    let label_pad = label_col_width.saturating_sub(label_vis);
    let value_pad = value_col_width.saturating_sub(value_vis);

    writeln!(
        out,
        "{:>label_pad$}{label}  {value_pad}{value}",
        "",
        value_pad = " ".repeat(value_pad)
    )
    .map_err(|_err| PlanError::IO)
}

/// ANSI dark grey foreground.
fn color_dark_grey() -> Color {
    Color::new("\x1b[90m", "\x1b[0m")
}

/// ANSI yellow (a shim that has to be bought).
fn color_yellow() -> Color {
    Color::new("\x1b[33m", "\x1b[0m")
}
