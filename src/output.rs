use std::io::{self, Write};

use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::eval::EvalSummary;
use crate::runner::Report;
use crate::search::{MatchResult, RecordKind};

pub fn print_report(format: OutputFormat, report: &Report) -> Result<()> {
    let mut out = io::stdout().lock();
    match format {
        OutputFormat::Text => write_text(&mut out, report),
        OutputFormat::Json => write_json(&mut out, report),
    }
}

pub fn write_text<W: Write>(out: &mut W, report: &Report) -> Result<()> {
    match report {
        Report::Answer { answer, .. } => writeln!(out, "{answer}")?,
        Report::Normalized { normalized, .. } => writeln!(out, "{normalized}")?,
        Report::Search { query, results } => {
            if query.is_empty() {
                writeln!(out, "No query given.")?;
            } else if results.is_empty() {
                writeln!(out, "No results for \"{query}\".")?;
            } else {
                writeln!(out, "Results for \"{query}\": {}", results.len())?;
                for result in results {
                    write_match(out, result)?;
                }
            }
        }
        Report::Eval {
            run_id,
            required_pass_rate,
            summary,
        } => write_eval(out, run_id, *required_pass_rate, summary)?,
    }
    Ok(())
}

fn write_match<W: Write>(out: &mut W, result: &MatchResult) -> Result<()> {
    let (head, body) = match result.kind {
        RecordKind::Diary => ("title", "content"),
        RecordKind::Meme => ("filename", "description"),
    };
    writeln!(
        out,
        "[{}] {}: {}",
        result.kind.as_str(),
        result.field(head).unwrap_or_default(),
        result.field(body).unwrap_or_default()
    )?;
    Ok(())
}

fn write_eval<W: Write>(
    out: &mut W,
    run_id: &str,
    required: f32,
    summary: &EvalSummary,
) -> Result<()> {
    writeln!(
        out,
        "run_id={} total={} passed={} failed={} pass_rate={:.4} required={:.4} meets_threshold={}",
        run_id,
        summary.total,
        summary.passed,
        summary.failed,
        summary.pass_rate,
        required,
        summary.meets(required)
    )?;
    for o in &summary.outcomes {
        writeln!(
            out,
            "case={} passed={} fired=[{}] latency={:.3}ms",
            o.case_id,
            o.passed,
            o.fired.join(", "),
            o.latency_ms
        )?;
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
enum JsonReport<'a> {
    Ask {
        question: &'a str,
        answer: &'a str,
    },
    Search {
        query: &'a str,
        results: &'a [MatchResult],
    },
    Normalize {
        text: &'a str,
        normalized: &'a str,
    },
    Eval {
        run_id: &'a str,
        required_pass_rate: f32,
        meets_threshold: bool,
        summary: &'a EvalSummary,
    },
}

pub fn write_json<W: Write>(out: &mut W, report: &Report) -> Result<()> {
    let json = match report {
        Report::Answer { question, answer } => JsonReport::Ask { question, answer },
        Report::Search { query, results } => JsonReport::Search { query, results },
        Report::Normalized { text, normalized } => JsonReport::Normalize { text, normalized },
        Report::Eval {
            run_id,
            required_pass_rate,
            summary,
        } => JsonReport::Eval {
            run_id,
            required_pass_rate: *required_pass_rate,
            meets_threshold: summary.meets(*required_pass_rate),
            summary,
        },
    };
    serde_json::to_writer_pretty(&mut *out, &json)?;
    writeln!(out)?;
    Ok(())
}
