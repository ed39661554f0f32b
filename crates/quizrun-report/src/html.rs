//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined.

use anyhow::Result;
use std::path::Path;

use quizrun_core::report::{QuestionOutcome, Report, Tier};

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn tier_color(tier: Tier) -> &'static str {
    match tier {
        Tier::Excellent => "#22c55e",
        Tier::Good => "#eab308",
        Tier::NeedsReview => "#ef4444",
    }
}

/// Generate an HTML report from a session report.
pub fn generate_html(report: &Report) -> String {
    let mut html = String::new();
    let bank_name = report
        .bank
        .as_ref()
        .map(|b| b.name.as_str())
        .unwrap_or("Quiz");

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>quizrun report — {}</title>\n",
        html_escape(bank_name)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>quizrun report</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Bank: <strong>{}</strong> | {} mode | {} questions | {}</p>\n",
        html_escape(bank_name),
        report.settings.mode,
        report.total,
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Score summary
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Summary</h2>\n");
    html.push_str(&format!(
        "<p class=\"score\"><span class=\"big\">{}/{}</span> ({}%)</p>\n",
        report.score, report.total, report.percentage
    ));
    html.push_str(&format!(
        "<p class=\"tier\" style=\"color: {}\">{}</p>\n",
        tier_color(report.tier),
        html_escape(report.tier.message())
    ));
    if report.answered < report.total {
        html.push_str(&format!(
            "<p class=\"meta\">Session ended early: {} of {} questions answered.</p>\n",
            report.answered, report.total
        ));
    }
    html.push_str(&generate_score_bar(report));
    html.push_str("</section>\n");

    // Per-question breakdown
    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Questions</h2>\n");
    html.push_str(
        "<label><input type=\"checkbox\" id=\"missed-only\" onchange=\"toggleMissed(this.checked)\"> Show missed questions only</label>\n",
    );
    for question in &report.questions {
        html.push_str(&question_card(report, question));
    }
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(
        &serde_json::to_string_pretty(report)
            .unwrap_or_default()
            .replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;"),
    );
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

fn question_card(report: &Report, question: &QuestionOutcome) -> String {
    let status = if question.is_correct { "pass" } else { "fail" };
    let mut card = format!(
        "<article class=\"question {status}\">\n<h3>{}. {}</h3>\n<ul>\n",
        question.index + 1,
        html_escape(&report.display_text(question))
    );

    for option in &question.options {
        let class = if option.is_correct {
            "correct"
        } else if option.is_chosen {
            "chosen"
        } else {
            "other"
        };
        let badge = match (option.is_correct, option.is_chosen) {
            (true, _) => " <span class=\"badge ok\">✓ correct</span>",
            (false, true) => " <span class=\"badge bad\">✗ your answer</span>",
            _ => "",
        };
        card.push_str(&format!(
            "<li class=\"{class}\"><b>{}</b> {}{badge}</li>\n",
            option.key.label(),
            html_escape(&option.text)
        ));
    }
    card.push_str("</ul>\n");

    if !question.is_answered() {
        card.push_str("<p class=\"note\">Not answered.</p>\n");
    }
    if !question.is_correct {
        card.push_str(&format!(
            "<p class=\"note\">Correct answer: <strong>{}</strong></p>\n",
            question.correct_key.label()
        ));
    }
    card.push_str("</article>\n");
    card
}

/// A horizontal bar for the overall percentage with one tick per question.
fn generate_score_bar(report: &Report) -> String {
    let bar_height = 24;
    let max_width = 400;
    let padding = 10;
    let tick_height = 10;

    let width = (report.percentage.min(100) as usize * max_width) / 100;
    let total_height = bar_height + tick_height + padding * 3;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        max_width + 60,
        total_height
    );
    svg.push_str(&format!(
        "  <rect x=\"0\" y=\"{padding}\" width=\"{max_width}\" height=\"{bar_height}\" fill=\"var(--border)\" rx=\"4\"/>\n"
    ));
    svg.push_str(&format!(
        "  <rect x=\"0\" y=\"{padding}\" width=\"{width}\" height=\"{bar_height}\" fill=\"{}\" rx=\"4\"/>\n",
        tier_color(report.tier)
    ));
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{}%</text>\n",
        max_width + 8,
        padding + bar_height / 2,
        report.percentage
    ));

    if !report.questions.is_empty() {
        let step = max_width as f64 / report.questions.len() as f64;
        let y = padding * 2 + bar_height;
        for (i, question) in report.questions.iter().enumerate() {
            let color = if question.is_correct {
                "#22c55e"
            } else if question.is_answered() {
                "#ef4444"
            } else {
                "#9ca3af"
            };
            svg.push_str(&format!(
                "  <rect x=\"{:.1}\" y=\"{y}\" width=\"{:.1}\" height=\"{tick_height}\" fill=\"{color}\"/>\n",
                i as f64 * step,
                (step - 1.0).max(1.0)
            ));
        }
    }

    svg.push_str("</svg>\n");
    svg
}

/// Write an HTML report to a file.
pub fn write_html_report(report: &Report, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --fail: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --fail: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); max-width: 960px; }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
.big { font-size: 2.5rem; font-weight: bold; }
.tier { font-weight: bold; }
article.question { border: 1px solid var(--border); border-left-width: 6px; border-radius: 8px; padding: 0.5rem 1rem; margin: 1rem 0; }
article.pass { border-left-color: #22c55e; }
article.fail { border-left-color: #ef4444; }
ul { list-style: none; padding: 0; }
li { padding: 0.4rem 0.6rem; margin: 0.2rem 0; border-radius: 6px; border: 1px solid var(--border); }
li.correct { background: var(--pass); font-weight: bold; }
li.chosen { background: var(--fail); }
li.other { opacity: 0.7; }
.badge { font-size: 0.75rem; margin-left: 0.5rem; }
.note { font-size: 0.9rem; }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;

const JS: &str = r#"
function toggleMissed(only) {
  document.querySelectorAll('article.question.pass').forEach(a => {
    a.style.display = only ? 'none' : '';
  });
}
"#;
