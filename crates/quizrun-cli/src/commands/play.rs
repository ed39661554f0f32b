//! The `quizrun play` command.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

use quizrun_core::bank::{load_bank, BankSource, DirectorySource};
use quizrun_core::report::Report;
use quizrun_core::{EngineState, OptionKey, QuestionStore, Quiz, QuizMode};

use crate::config::{load_config_from, QuizrunConfig};
use crate::render;

/// Flags accepted by `quizrun play`.
#[derive(Debug, Default)]
pub struct PlayArgs {
    pub bank_dir: Option<PathBuf>,
    pub bank: Option<String>,
    pub file: Option<PathBuf>,
    pub mode: Option<QuizMode>,
    pub limit: Option<usize>,
    pub no_shuffle: bool,
    pub no_clean: bool,
    pub seed: Option<u64>,
    pub output: Option<PathBuf>,
    pub format: Option<String>,
    pub config: Option<PathBuf>,
}

/// How the interactive loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Finished,
    Abandoned,
}

pub fn execute(args: PlayArgs) -> Result<()> {
    let config = load_config_from(args.config.as_deref())?;
    let store = load_store(&args, &config)?;

    let mut quiz = Quiz::new(store);
    quiz.set_mode(args.mode.unwrap_or(config.mode))?;
    if let Some(limit) = args.limit.or(config.limit) {
        quiz.set_limit(limit)?;
    }
    quiz.set_shuffle(config.shuffle && !args.no_shuffle)?;
    quiz.set_clean_question_text(config.clean_question_text && !args.no_clean)?;

    match args.seed {
        Some(seed) => quiz.start_session_with(&mut StdRng::seed_from_u64(seed))?,
        None => quiz.start_session()?,
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let outcome = run_session(&mut quiz, stdin.lock(), &mut out)?;
    tracing::info!(?outcome, score = quiz.score(), "session ended");

    let report = quiz.report().context("no session was started")?;
    render::write_report(&mut out, &report)?;
    out.flush()?;

    let formats = match &args.format {
        Some(list) => parse_formats(list),
        None => config.formats.clone(),
    };
    let output = args.output.unwrap_or(config.output_dir);
    write_reports(&report, &output, &formats)?;

    Ok(())
}

/// Pick the bank from `--file`, `--bank`, the configured default, or a
/// manifest holding a single bank.
fn load_store(args: &PlayArgs, config: &QuizrunConfig) -> Result<QuestionStore> {
    if let Some(file) = &args.file {
        return load_bank(file);
    }

    let dir = args.bank_dir.as_ref().unwrap_or(&config.bank_dir);
    let source = DirectorySource::new(dir);
    match args.bank.as_ref().or(config.default_bank.as_ref()) {
        Some(id) => source.load_by_id(id),
        None => {
            let manifest = source.manifest()?;
            match manifest.as_slice() {
                [only] => source.load(only),
                [] => anyhow::bail!("no banks listed in {}", dir.display()),
                entries => {
                    let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
                    anyhow::bail!("several banks available, choose one with --bank: {ids:?}")
                }
            }
        }
    }
}

/// Drive a started session from `input` until it finishes or the user quits.
///
/// Instant mode asks for `r` (reveal) or `n` (next) after each answer. End of
/// input abandons the session like `q`.
pub fn run_session<R: BufRead, W: Write>(
    quiz: &mut Quiz,
    mut input: R,
    out: &mut W,
) -> Result<SessionOutcome> {
    let mode = quiz.session_config().map(|c| c.mode).unwrap_or_default();

    while quiz.state() == EngineState::Playing {
        let Some(view) = quiz.current_question() else {
            break;
        };
        render::write_question(out, &view)?;

        let key = loop {
            write!(out, "Your answer [a-d, q to quit]: ")?;
            out.flush()?;
            match read_command(&mut input)?.as_deref() {
                None | Some("q") => return Ok(SessionOutcome::Abandoned),
                Some(line) => match line.parse::<OptionKey>() {
                    Ok(key) => break key,
                    Err(_) => writeln!(out, "Please enter a, b, c or d.")?,
                },
            }
        };

        if let Some(violation) = quiz.submit_answer(key).violation() {
            tracing::warn!(%violation, "answer not accepted");
            continue;
        }
        if mode == QuizMode::Exam {
            continue;
        }

        if let Some(view) = quiz.current_question() {
            let verdict = if view.correct_key == key {
                "Correct!"
            } else {
                "Wrong."
            };
            writeln!(out, "{verdict}")?;
        }

        loop {
            write!(out, "[r] reveal, [n] next, [q] quit: ")?;
            out.flush()?;
            match read_command(&mut input)?.as_deref() {
                None | Some("q") => return Ok(SessionOutcome::Abandoned),
                Some("r") => {
                    if quiz.reveal_answer().is_applied() {
                        if let Some(view) = quiz.current_question() {
                            render::write_question(out, &view)?;
                        }
                    } else {
                        writeln!(out, "The answer is already shown.")?;
                    }
                }
                Some("n") | Some("") => {
                    let _ = quiz.advance();
                    break;
                }
                Some(_) => writeln!(out, "Please enter r, n or q.")?,
            }
        }
    }

    Ok(SessionOutcome::Finished)
}

/// Next trimmed, lowercased line. `None` at end of input.
fn read_command<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    let read = input.read_line(&mut line).context("failed to read input")?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_lowercase()))
}

/// Split a `--format` value. `all` expands to every format, `none` to nothing.
pub fn parse_formats(list: &str) -> Vec<String> {
    let mut formats = Vec::new();
    for fmt in list.split(',').map(str::trim).filter(|f| !f.is_empty()) {
        match fmt {
            "all" => formats.extend(["json", "html", "markdown"].map(String::from)),
            "none" => {}
            other => formats.push(other.to_string()),
        }
    }
    formats
}

/// Save the report in each requested format under `output`.
pub fn write_reports(report: &Report, output: &Path, formats: &[String]) -> Result<()> {
    if formats.is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(output)
        .with_context(|| format!("failed to create output directory: {}", output.display()))?;

    let timestamp = report.created_at.format("%Y-%m-%dT%H%M%S");
    for fmt in formats {
        match fmt.as_str() {
            "json" => {
                let path = output.join(format!("report-{timestamp}.json"));
                report.save_json(&path)?;
                eprintln!("Results saved to: {}", path.display());
            }
            "html" => {
                let path = output.join(format!("report-{timestamp}.html"));
                quizrun_report::write_html_report(report, &path)?;
                eprintln!("HTML report: {}", path.display());
            }
            "markdown" | "md" => {
                let path = output.join(format!("report-{timestamp}.md"));
                std::fs::write(&path, quizrun_report::generate_markdown(report))
                    .with_context(|| format!("failed to write {}", path.display()))?;
                eprintln!("Markdown report: {}", path.display());
            }
            other => eprintln!("Unknown format: {other}"),
        }
    }
    Ok(())
}
