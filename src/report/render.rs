use crate::error::RenderError;
use crate::report::{Align, Report, Section, SectionBody, Table};
use std::fmt::Write;
use unicode_width::UnicodeWidthStr;

const RULE_WIDTH: usize = 72;
const COLUMN_GAP: &str = "  ";
const EMPTY_TABLE: &str = "(none)";

pub fn render_report(report: &Report) -> Result<String, RenderError> {
    let mut out = String::new();
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out, "{}", report.title)?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    for section in &report.sections {
        writeln!(out)?;
        render_section(&mut out, section)?;
    }
    Ok(out)
}

fn render_section(out: &mut String, section: &Section) -> Result<(), RenderError> {
    writeln!(out, "{}", section.title)?;
    writeln!(out, "{}", "-".repeat(section.title.width().max(3)))?;
    match &section.body {
        SectionBody::Fields(fields) => {
            let label_width = fields.iter().map(|(label, _)| label.width()).max().unwrap_or(0);
            for (label, value) in fields {
                writeln!(out, "{}  {}", pad(label, label_width + 1, Align::Left, ":"), value)?;
            }
        }
        SectionBody::Table(table) => render_table(out, &section.title, table)?,
        SectionBody::Lines { lines, empty } => {
            if lines.is_empty() {
                writeln!(out, "{}", empty)?;
            }
            for line in lines {
                writeln!(out, "- {}", line)?;
            }
        }
        SectionBody::Unavailable(reason) => writeln!(out, "N/A ({})", reason)?,
    }
    Ok(())
}

/// Fixed-width table: every column is as wide as its widest cell or title.
pub fn render_table(out: &mut String, name: &str, table: &Table) -> Result<(), RenderError> {
    let expected = table.columns.len();
    for (row, cells) in table.rows.iter().enumerate() {
        if cells.len() != expected {
            return Err(RenderError::RowWidth {
                table: name.to_string(),
                row,
                found: cells.len(),
                expected,
            });
        }
    }

    let widths: Vec<usize> = table
        .columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            table
                .rows
                .iter()
                .map(|cells| cells[i].width())
                .chain(std::iter::once(column.title.width()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header: Vec<String> = table
        .columns
        .iter()
        .zip(&widths)
        .map(|(column, width)| pad(&column.title, *width, column.align, ""))
        .collect();
    writeln!(out, "{}", header.join(COLUMN_GAP).trim_end())?;

    let underline: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    writeln!(out, "{}", underline.join(COLUMN_GAP))?;

    if table.rows.is_empty() {
        writeln!(out, "{}", EMPTY_TABLE)?;
    }
    for cells in &table.rows {
        let line: Vec<String> = cells
            .iter()
            .zip(table.columns.iter().zip(&widths))
            .map(|(cell, (column, width))| pad(cell, *width, column.align, ""))
            .collect();
        writeln!(out, "{}", line.join(COLUMN_GAP).trim_end())?;
    }
    Ok(())
}

fn pad(text: &str, width: usize, align: Align, suffix: &str) -> String {
    let text = format!("{}{}", text, suffix);
    let fill = " ".repeat(width.saturating_sub(text.width()));
    match align {
        Align::Left => format!("{}{}", text, fill),
        Align::Right => format!("{}{}", fill, text),
    }
}
