//! The `quizrun report` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use quizrun_core::report::Report;

use crate::render;

pub fn execute(path: PathBuf, format: String, output: Option<PathBuf>) -> Result<()> {
    let report = Report::load_json(&path)?;

    let rendered = match format.as_str() {
        "text" => {
            let mut buf = Vec::new();
            render::write_report(&mut buf, &report)?;
            String::from_utf8(buf).context("report text is not valid UTF-8")?
        }
        "markdown" | "md" => quizrun_report::generate_markdown(&report),
        "html" => quizrun_report::generate_html(&report),
        "json" => serde_json::to_string_pretty(&report)?,
        other => anyhow::bail!("unknown format: {other}. Expected text, markdown, html or json"),
    };

    match output {
        Some(out) => {
            std::fs::write(&out, rendered)
                .with_context(|| format!("failed to write {}", out.display()))?;
            eprintln!("Report written to: {}", out.display());
        }
        None => println!("{rendered}"),
    }

    Ok(())
}
