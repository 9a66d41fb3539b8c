//! `ret check`: lint template files from the command line.

use std::fs;
use std::io::{IsTerminal, Write};
use std::ops::Range;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use clap::ValueEnum;
use serde::Serialize;

use ret_lint_core::{Diagnostic, DiagnosticSeverity, Document, get_diagnostics};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Source snippets with labelled spans
    #[default]
    Human,
    /// One `path:line:column: severity[code]: message` line per diagnostic
    Short,
    /// A JSON array with one entry per file
    Json,
}

#[derive(Debug, Serialize)]
pub struct FileReport {
    pub path: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Diagnostics for every checked file, in command-line order.
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct CheckOutcome {
    pub files: Vec<FileReport>,
}

impl CheckOutcome {
    pub fn has_errors(&self) -> bool {
        self.count(DiagnosticSeverity::Error) > 0
    }

    pub fn count(&self, severity: DiagnosticSeverity) -> usize {
        self.files
            .iter()
            .flat_map(|file| &file.diagnostics)
            .filter(|d| d.severity == severity)
            .count()
    }

    pub fn summary(&self) -> String {
        let errors = self.count(DiagnosticSeverity::Error);
        let warnings = self.count(DiagnosticSeverity::Warning);
        format!(
            "{}, {} in {}",
            plural(errors, "error"),
            plural(warnings, "warning"),
            plural(self.files.len(), "file")
        )
    }
}

fn plural(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{n} {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

/// Check `files` and print the diagnostics to stdout in `format`.
pub fn execute(files: &[PathBuf], format: OutputFormat) -> Result<CheckOutcome> {
    let stdout = std::io::stdout();
    let color = stdout.is_terminal();
    let mut out = stdout.lock();
    let mut outcome = CheckOutcome::default();

    for path in files {
        let doc = load(path)?;
        let diagnostics = get_diagnostics(&doc);
        tracing::debug!(path = %path.display(), diagnostics = diagnostics.len(), "checked file");

        match format {
            OutputFormat::Human => out.write_all(render_human(&doc, &diagnostics, color).as_bytes())?,
            OutputFormat::Short => out.write_all(render_short(doc.uri(), &diagnostics).as_bytes())?,
            OutputFormat::Json => {}
        }
        outcome.files.push(FileReport {
            path: doc.uri().to_string(),
            diagnostics,
        });
    }

    match format {
        OutputFormat::Human => writeln!(out, "{}", outcome.summary())?,
        OutputFormat::Short => {}
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &outcome)?;
            writeln!(out)?;
        }
    }
    out.flush()?;

    Ok(outcome)
}

fn load(path: &Path) -> Result<Document> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read template '{}'", path.display()))?;
    Ok(Document::new(path.display().to_string(), content))
}

/// One line per diagnostic, with 1-based line and column.
pub fn render_short(path: &str, diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(|d| {
            format!(
                "{}:{}:{}: {}[{}]: {}\n",
                path,
                d.range.start.line + 1,
                d.range.start.character + 1,
                d.severity.as_str(),
                d.code.as_deref().unwrap_or("ret"),
                d.message
            )
        })
        .collect()
}

/// Render diagnostics as ariadne reports over the document source.
pub fn render_human(doc: &Document, diagnostics: &[Diagnostic], color: bool) -> String {
    let path = doc.uri().to_string();
    let mut output = Vec::new();

    for diag in diagnostics {
        let span = char_span(doc, diag);
        let (report_kind, label_color) = match diag.severity {
            DiagnosticSeverity::Error => (ReportKind::Error, Color::Red),
            DiagnosticSeverity::Warning => (ReportKind::Warning, Color::Yellow),
        };

        let mut report = Report::build(report_kind, path.clone(), span.start)
            .with_config(Config::default().with_color(color));
        report = match &diag.code {
            Some(code) => report.with_message(format!("[{}] {}", code, diag.message)),
            None => report.with_message(&diag.message),
        };
        report = report.with_label(
            Label::new((path.clone(), span))
                .with_message(&diag.message)
                .with_color(label_color),
        );

        if let Err(err) = report
            .finish()
            .write((path.clone(), Source::from(doc.content())), &mut output)
        {
            tracing::warn!(error = %err, "failed to render diagnostic");
        }
    }

    String::from_utf8_lossy(&output).into_owned()
}

/// The diagnostic range as a char-indexed span, at least one char wide
/// where the source allows.
fn char_span(doc: &Document, diag: &Diagnostic) -> Range<usize> {
    let text = doc.content();
    let total = text.chars().count();
    let to_char = |position| {
        doc.offset_at(position)
            .and_then(|byte| text.get(..byte))
            .map(|prefix| prefix.chars().count())
    };

    let start = to_char(diag.range.start).unwrap_or(0).min(total);
    let end = to_char(diag.range.end).unwrap_or(start).clamp(start, total);
    if start == end && end < total {
        start..end + 1
    } else {
        start..end
    }
}
