use std::fmt::Write;

use themesync_engine::{OrderingOutcome, SyncReport};

/// Human-readable summary of a run.
pub fn render_text(report: &SyncReport) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut out, report);
    out
}

fn write_report(out: &mut String, report: &SyncReport) -> std::fmt::Result {
    let action = if report.is_new { "created" } else { "updated" };
    write!(
        out,
        "Theme `{}` ({} mode): {action} row {}",
        report.theme_name,
        report.mode.as_str(),
        report.row_index
    )?;
    match report.record_id {
        Some(id) => writeln!(out, ", id {id}")?,
        None => writeln!(out)?,
    }

    if let Some(sibling) = &report.sibling {
        write!(out, "  sibling: `{}` (row {}", sibling.name, sibling.row_index)?;
        match sibling.id {
            Some(id) => writeln!(out, ", id {id})")?,
            None => writeln!(out, ")")?,
        }
    }

    let written = report.channels.iter().filter(|c| !c.skipped).count();
    writeln!(
        out,
        "  channels: {written} written, {} default",
        report.default_channel_count()
    )?;
    for channel in &report.channels {
        if channel.skipped {
            writeln!(out, "    {:<4} skipped", channel.channel)?;
            continue;
        }
        let source = if channel.implicit {
            "-"
        } else {
            channel.source_code.as_str()
        };
        let marker = if channel.is_default { " (default)" } else { "" };
        writeln!(
            out,
            "    {:<4} <- {:<6} {}{marker}",
            channel.channel, source, channel.value
        )?;
    }

    writeln!(
        out,
        "  fields: {} written, {} corrected",
        report.fields.len(),
        report.corrected_field_count()
    )?;
    for field in &report.fields {
        let corrected = if field.was_corrected { ", corrected" } else { "" };
        writeln!(
            out,
            "    {}.{} = {} ({}{corrected})",
            field.sheet,
            field.field,
            field.value,
            field.origin.as_str()
        )?;
    }

    if !report.series.is_empty() {
        writeln!(out, "  series:")?;
        for copy in &report.series {
            let from = if copy.from_sibling { "sibling" } else { "default" };
            writeln!(out, "    {} = {} (from {from})", copy.column, copy.value)?;
        }
    }

    match &report.ordering {
        OrderingOutcome::Appended { row_index, order } => {
            writeln!(out, "  ordering: appended {order} at row {row_index}")?
        }
        OrderingOutcome::Inserted {
            row_index,
            order,
            predecessor,
        } => writeln!(
            out,
            "  ordering: inserted {order} after {predecessor} at row {row_index}"
        )?,
        OrderingOutcome::Skipped => {}
    }

    if report.warnings.is_empty() {
        writeln!(out, "  warnings: none")?;
    } else {
        writeln!(out, "  warnings: {}", report.warnings.len())?;
        for warning in &report.warnings {
            writeln!(out, "    - {warning}")?;
        }
    }
    Ok(())
}
