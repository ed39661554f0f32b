//! Markdown report generator.

use quizrun_core::report::Report;

/// Escape characters that would break a markdown table cell.
fn cell(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}

/// Generate a markdown summary with a per-question table.
pub fn generate_markdown(report: &Report) -> String {
    let mut md = String::from("## Quiz Report\n\n");

    if let Some(bank) = &report.bank {
        md.push_str(&format!("**Bank:** {} (`{}`)\n\n", bank.name, bank.id));
    }
    md.push_str(&format!(
        "**Mode:** {} | **Date:** {}\n\n",
        report.settings.mode,
        report.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    md.push_str(&format!(
        "**Score:** {}/{} ({}%) — {}\n\n",
        report.score,
        report.total,
        report.percentage,
        report.tier.message()
    ));
    if report.answered < report.total {
        md.push_str(&format!(
            "_Session ended early: {} of {} questions answered._\n\n",
            report.answered, report.total
        ));
    }

    md.push_str("| # | Question | Your answer | Correct | Result |\n");
    md.push_str("|---|----------|-------------|---------|--------|\n");
    for q in &report.questions {
        let chosen = q
            .chosen_key
            .map(|k| k.label().to_string())
            .unwrap_or_else(|| "-".to_string());
        let result = match (q.is_answered(), q.is_correct) {
            (_, true) => "✓",
            (true, false) => "✗",
            (false, false) => "skipped",
        };
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            q.index + 1,
            cell(&report.display_text(q)),
            chosen,
            q.correct_key.label(),
            result
        ));
    }

    let missed: Vec<_> = report.missed().collect();
    if !missed.is_empty() {
        md.push_str("\n### Review\n\n");
        for q in missed {
            md.push_str(&format!("**{}. {}**\n\n", q.index + 1, report.display_text(q)));
            for option in &q.options {
                let marker = match (option.is_correct, option.is_chosen) {
                    (true, _) => " ✓",
                    (false, true) => " ✗",
                    _ => "",
                };
                md.push_str(&format!(
                    "- {}. {}{}\n",
                    option.key.label(),
                    option.text,
                    marker
                ));
            }
            md.push('\n');
        }
    }

    md
}
