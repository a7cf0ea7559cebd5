//! Non-interactive output: run a program, apply a fixed list of choices and
//! print the resulting history.

use std::io::Write;

use crossterm::style::Stylize;
use serde::Serialize;

use crate::controller::Controller;
use crate::diff::Fragment;
use crate::engine::{ReductionChoice, ReductionEngine};
use crate::history::RenderedRow;

use super::components::{from_column_width, pad_to_width};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Plain,
    /// Plain text with changed fragments colored
    Color,
    Json,
}

#[derive(Debug, Serialize)]
struct BatchReport<'a> {
    rows: &'a [RenderedRow],
    choices: &'a [ReductionChoice],
    normal_form: bool,
}

/// Run `source`, then apply `picks` in order. Picks are 1-based positions in
/// the choice list, as typed in the interactive view.
pub fn run_batch<E: ReductionEngine>(
    controller: &mut Controller<E>,
    source: &str,
    picks: &[usize],
    format: OutputFormat,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    controller.run(source)?;
    for (n, &pick) in picks.iter().enumerate() {
        if pick == 0 {
            anyhow::bail!("choice {} is 0; choices are numbered from 1", n + 1);
        }
        controller.apply(pick - 1).map_err(|e| {
            anyhow::anyhow!("step {}: cannot apply choice {pick}: {e}", n + 1)
        })?;
    }

    let rows = controller.rows();
    match format {
        OutputFormat::Json => {
            let report = BatchReport {
                rows: &rows,
                choices: controller.choices(),
                normal_form: controller.is_terminal(),
            };
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)?;
        }
        OutputFormat::Plain | OutputFormat::Color => {
            let color = format == OutputFormat::Color;
            for row in &rows {
                write_row(out, row, color)?;
            }
            write_choices(out, controller.choices())?;
        }
    }
    Ok(())
}

fn write_row(out: &mut impl Write, row: &RenderedRow, color: bool) -> std::io::Result<()> {
    write!(out, "#{:<3} ", row.index)?;
    for fragment in &row.fragments {
        match fragment {
            Fragment::Changed { new, .. } if color => write!(out, "{}", new.as_str().green().bold())?,
            other => write!(out, "{}", other.new_text())?,
        }
    }
    if let Some(label) = &row.label {
        write!(out, "  ({label})")?;
    }
    writeln!(out)?;

    for (old, new) in row.details() {
        if color {
            writeln!(out, "      {} ⇒ {}", old.red(), new.green())?;
        } else {
            writeln!(out, "      {old} ⇒ {new}")?;
        }
    }
    Ok(())
}

fn write_choices(out: &mut impl Write, choices: &[ReductionChoice]) -> std::io::Result<()> {
    if choices.is_empty() {
        return writeln!(out, "normal form");
    }
    writeln!(out, "choices:")?;
    let width = from_column_width(choices);
    for (i, choice) in choices.iter().enumerate() {
        let from = pad_to_width(&choice.from_text, width);
        write!(out, "  {}  {from} ⇒ {}", i + 1, choice.to_text)?;
        if let Some(label) = &choice.label {
            write!(out, "  {label}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}
