//! Terminal rendering of questions and finished reports.

use std::io::Write;

use anyhow::Result;
use comfy_table::{Cell, Table};

use quizrun_core::report::Report;
use quizrun_core::QuestionView;

/// Print a question with its options, marking chosen and correct ones.
pub fn write_question<W: Write>(out: &mut W, view: &QuestionView) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "Question {}/{}", view.index + 1, view.total)?;
    writeln!(out, "{}", view.text)?;
    for option in &view.options {
        let marker = match (option.marked_correct, option.chosen) {
            (true, _) => "  ✓",
            (false, true) => "  ✗",
            _ => "",
        };
        writeln!(out, "  {}. {}{marker}", option.key.label(), option.text)?;
    }
    Ok(())
}

/// Score summary as a table.
pub fn summary_table(report: &Report) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Bank", "Mode", "Answered", "Score", "Percent", "Result"]);
    table.add_row(vec![
        Cell::new(report.bank.as_ref().map(|b| b.name.as_str()).unwrap_or("-")),
        Cell::new(report.settings.mode),
        Cell::new(format!("{}/{}", report.answered, report.total)),
        Cell::new(format!("{}/{}", report.score, report.total)),
        Cell::new(format!("{}%", report.percentage)),
        Cell::new(report.tier),
    ]);
    table
}

/// Print the summary table, tier message and per-question breakdown.
pub fn write_report<W: Write>(out: &mut W, report: &Report) -> Result<()> {
    writeln!(out, "\n{}", summary_table(report))?;
    writeln!(out, "{}", report.tier.message())?;
    if report.answered < report.total {
        writeln!(
            out,
            "Session ended early: {} of {} questions answered.",
            report.answered, report.total
        )?;
    }

    writeln!(out)?;
    for q in &report.questions {
        let text = report.display_text(q);
        let correct = q.correct_key.label();
        match q.chosen_key {
            Some(chosen) if q.is_correct => {
                writeln!(out, "✓ {}. {text} (your answer: {})", q.index + 1, chosen.label())?
            }
            Some(chosen) => writeln!(
                out,
                "✗ {}. {text} (your answer: {}, correct: {correct})",
                q.index + 1,
                chosen.label()
            )?,
            None => writeln!(
                out,
                "- {}. {text} (not answered, correct: {correct})",
                q.index + 1
            )?,
        }
    }
    Ok(())
}
