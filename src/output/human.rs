#![forbid(unsafe_code)]

//! Human-readable output with optional color

use crate::diagnostics::{Diagnostic, Level};
use crate::output::report::{Record, Report};
use std::io;
use termcolor::{BufferWriter, Color, ColorChoice, ColorSpec, WriteColor};

/// Human-readable formatter
pub struct HumanFormatter {
    choice: ColorChoice,
}

impl HumanFormatter {
    pub fn new(choice: ColorChoice) -> Self {
        HumanFormatter { choice }
    }

    /// Renders a report: records, then diagnostics, then a summary line
    pub fn render<W: WriteColor>(&self, report: &Report, out: &mut W) -> io::Result<()> {
        for record in &report.records {
            write_record(record, out)?;
        }

        if !report.diagnostics.is_empty() {
            writeln!(out)?;
            for diagnostic in &report.diagnostics {
                write_diagnostic(diagnostic, out)?;
            }
        }

        writeln!(out)?;
        let errors = report.error_count();
        if errors == 0 {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
            write!(out, "OK")?;
        } else {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
            write!(out, "FAILED")?;
        }
        out.reset()?;
        writeln!(
            out,
            ": {} record(s), {} error(s) reported",
            report.records.len(),
            errors
        )
    }

    /// Writes the rendered report to stdout
    pub fn write_to_stdout(&self, report: &Report) -> io::Result<()> {
        let writer = BufferWriter::stdout(self.choice);
        let mut buffer = writer.buffer();
        self.render(report, &mut buffer)?;
        writer.print(&buffer)
    }
}

impl Default for HumanFormatter {
    fn default() -> Self {
        Self::new(ColorChoice::Auto)
    }
}

fn write_record<W: WriteColor>(record: &Record, out: &mut W) -> io::Result<()> {
    match record {
        Record::Classification {
            namespace,
            key: Some(key),
            wild_key,
        } => writeln!(
            out,
            "{}: {} ({})",
            namespace,
            key,
            wild_key.as_deref().unwrap_or("-")
        ),
        Record::Classification { namespace, .. } => {
            write!(out, "{}: ", namespace)?;
            out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
            write!(out, "unclassified")?;
            out.reset()?;
            writeln!(out)
        }
        Record::Artifact {
            name,
            entries,
            cached,
        } => {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
            write!(out, "{}", if *cached { "Cached" } else { "Built" })?;
            out.reset()?;
            writeln!(out, " {} ({} entries)", name, entries)
        }
        Record::Row {
            index,
            validation,
            xbrl_names,
            forms,
        } => writeln!(
            out,
            "row {} [{}] {}: forms {}",
            index,
            validation.as_deref().unwrap_or("store"),
            xbrl_names.join(", "),
            forms.join(", ")
        ),
        Record::NonNegative { concept } => writeln!(out, "non-negative {}", concept),
        Record::ExcludedMember { member } => writeln!(out, "excluded member {}", member),
        Record::ExcludedAxis { axis, members } => {
            writeln!(out, "excluded axis {}: {}", axis, members.join(", "))
        }
        Record::MemberPattern { pattern } => writeln!(
            out,
            "excluded member pattern: {}",
            pattern.as_deref().unwrap_or("none")
        ),
        Record::AxisMatch {
            name,
            standard_axis: Some(standard),
        } => writeln!(out, "{} -> {}", name, standard),
        Record::AxisMatch { name, .. } => writeln!(out, "{}: no standard axis", name),
    }
}

fn write_diagnostic<W: WriteColor>(diagnostic: &Diagnostic, out: &mut W) -> io::Result<()> {
    match diagnostic.level {
        Level::Error => {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
            write!(out, "error")?;
            out.reset()?;
            write!(out, "[{}]: {}", diagnostic.code, diagnostic.message)?;
        }
        Level::Info => {
            out.set_color(ColorSpec::new().set_dimmed(true))?;
            write!(out, "info: {}", diagnostic.message)?;
            out.reset()?;
        }
    }
    if !diagnostic.context.is_empty() {
        let context: Vec<String> = diagnostic
            .context
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        write!(out, " ({})", context.join(", "))?;
    }
    writeln!(out)
}
