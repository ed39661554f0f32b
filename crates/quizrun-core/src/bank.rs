//! Question bank loading.
//!
//! Reads CSV banks (header row + data rows) into a [`QuestionStore`], reads the
//! bank manifest, and validates bank files without failing on the first issue.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::DataError;
use crate::model::{BankEntry, OptionKey, QuestionRecord};

/// Name of the manifest file inside a bank directory.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Immutable collection of questions for one bank.
#[derive(Debug, Clone, Default)]
pub struct QuestionStore {
    bank: Option<BankEntry>,
    questions: Vec<Arc<QuestionRecord>>,
}

impl QuestionStore {
    pub fn new(questions: Vec<QuestionRecord>) -> Self {
        Self {
            bank: None,
            questions: questions.into_iter().map(Arc::new).collect(),
        }
    }

    /// Tag the store with the manifest entry it was loaded from.
    pub fn with_bank(mut self, bank: BankEntry) -> Self {
        self.bank = Some(bank);
        self
    }

    pub fn bank(&self) -> Option<&BankEntry> {
        self.bank.as_ref()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Arc<QuestionRecord>> {
        self.questions.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<QuestionRecord>> {
        self.questions.iter()
    }
}

/// One CSV row as written in the bank file.
#[derive(Debug, Deserialize)]
struct RawQuestion {
    #[serde(rename = "câu hỏi", alias = "question", default)]
    text: String,
    #[serde(rename = "đáp án a", alias = "a", default)]
    option_a: String,
    #[serde(rename = "đáp án b", alias = "b", default)]
    option_b: String,
    #[serde(rename = "đáp án c", alias = "c", default)]
    option_c: String,
    #[serde(rename = "đáp án d", alias = "d", default)]
    option_d: String,
    #[serde(rename = "đáp án đúng", alias = "answer", default)]
    answer: String,
}

impl RawQuestion {
    fn options(&self) -> [&str; 4] {
        [
            self.option_a.as_str(),
            self.option_b.as_str(),
            self.option_c.as_str(),
            self.option_d.as_str(),
        ]
    }
}

/// How an answer column was turned into a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AnswerSource {
    Letter,
    OptionText,
}

/// Resolve the answer column to a key.
///
/// Accepts an option letter in any case. Failing that, the answer is compared
/// against each option's text, since some banks store the correct option's
/// content instead of its letter.
fn resolve_answer(raw: &RawQuestion) -> Option<(OptionKey, AnswerSource)> {
    let answer = raw.answer.trim();
    if let Ok(key) = answer.parse::<OptionKey>() {
        return Some((key, AnswerSource::Letter));
    }
    if answer.is_empty() {
        return None;
    }
    OptionKey::ALL
        .into_iter()
        .zip(raw.options())
        .find(|(_, text)| text.trim() == answer)
        .map(|(key, _)| (key, AnswerSource::OptionText))
}

const QUESTION_COLUMNS: [&str; 2] = ["câu hỏi", "question"];
const ANSWER_COLUMNS: [&str; 2] = ["đáp án đúng", "answer"];

fn check_headers(headers: &csv::StringRecord) -> Result<(), DataError> {
    let has = |names: &[&str]| headers.iter().any(|h| names.contains(&h));
    if !has(&QUESTION_COLUMNS) {
        return Err(DataError::MissingColumn(QUESTION_COLUMNS[0].into()));
    }
    if !has(&ANSWER_COLUMNS) {
        return Err(DataError::MissingColumn(ANSWER_COLUMNS[0].into()));
    }
    Ok(())
}

fn csv_reader(content: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(content.trim_start_matches('\u{feff}').as_bytes())
}

/// A CSV row with its line number.
struct Row {
    line: u64,
    raw: RawQuestion,
}

fn read_rows(content: &str, source_path: &Path) -> Result<Vec<Row>> {
    let mut reader = csv_reader(content);
    let headers = reader
        .headers()
        .with_context(|| format!("failed to read CSV header: {}", source_path.display()))?
        .clone();
    check_headers(&headers)
        .with_context(|| format!("invalid bank header: {}", source_path.display()))?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record
            .with_context(|| format!("failed to read CSV row: {}", source_path.display()))?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let raw: RawQuestion = record
            .deserialize(Some(&headers))
            .with_context(|| format!("{}: malformed row at line {line}", source_path.display()))?;
        rows.push(Row { line, raw });
    }
    Ok(rows)
}

/// Parse a CSV string into a question store (useful for testing).
///
/// Rows with an empty question column are dropped. A row whose answer cannot
/// be resolved fails the whole load.
pub fn parse_bank_str(content: &str, source_path: &Path) -> Result<QuestionStore> {
    let rows = read_rows(content, source_path)?;
    let total = rows.len();

    let mut questions = Vec::with_capacity(total);
    for Row { line, raw } in rows {
        if raw.text.trim().is_empty() {
            continue;
        }
        let (key, _) = resolve_answer(&raw).ok_or_else(|| DataError::UnresolvedAnswer {
            line,
            value: raw.answer.trim().to_string(),
        })?;
        let [a, b, c, d] = raw.options().map(str::to_string);
        let record = QuestionRecord::new(raw.text, [a, b, c, d], key)?;
        questions.push(record);
    }

    let dropped = total - questions.len();
    if dropped > 0 {
        tracing::debug!(
            path = %source_path.display(),
            dropped,
            "dropped rows without question text"
        );
    }

    Ok(QuestionStore::new(questions))
}

/// Load a single CSV bank file.
pub fn load_bank(path: &Path) -> Result<QuestionStore> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read bank file: {}", path.display()))?;
    let store = parse_bank_str(&content, path)?;

    let id = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "bank".to_string());
    Ok(store.with_bank(BankEntry {
        name: id.clone(),
        id,
        file: path.display().to_string(),
        question_count: None,
    }))
}

/// A warning from bank validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// CSV line the warning refers to (if applicable).
    pub line: Option<u64>,
    /// Whether the issue would make loading fail.
    pub fatal: bool,
    /// Warning message.
    pub message: String,
}

/// Validate a bank without failing on the first problem.
pub fn validate_bank_str(content: &str, source_path: &Path) -> Result<Vec<ValidationWarning>> {
    let rows = read_rows(content, source_path)?;
    let mut warnings = Vec::new();
    let mut seen_texts = HashSet::new();
    let mut dropped = 0usize;

    for Row { line, raw } in &rows {
        let text = raw.text.trim();
        if text.is_empty() {
            dropped += 1;
            continue;
        }

        match resolve_answer(raw) {
            None => warnings.push(ValidationWarning {
                line: Some(*line),
                fatal: true,
                message: format!("answer '{}' does not name an option", raw.answer.trim()),
            }),
            Some((key, AnswerSource::OptionText)) => warnings.push(ValidationWarning {
                line: Some(*line),
                fatal: false,
                message: format!("answer given as option text, resolved to '{key}'"),
            }),
            Some((_, AnswerSource::Letter)) => {}
        }

        for (key, option) in OptionKey::ALL.into_iter().zip(raw.options()) {
            if option.trim().is_empty() {
                warnings.push(ValidationWarning {
                    line: Some(*line),
                    fatal: false,
                    message: format!("option '{key}' is empty"),
                });
            }
        }

        if !seen_texts.insert(text) {
            warnings.push(ValidationWarning {
                line: Some(*line),
                fatal: false,
                message: "duplicate question text".into(),
            });
        }
    }

    if dropped > 0 {
        warnings.push(ValidationWarning {
            line: None,
            fatal: false,
            message: format!("{dropped} row(s) without question text will be skipped"),
        });
    }
    if rows.len() == dropped {
        warnings.push(ValidationWarning {
            line: None,
            fatal: true,
            message: "bank contains no questions".into(),
        });
    }

    Ok(warnings)
}

/// Validate a bank file.
pub fn validate_bank(path: &Path) -> Result<Vec<ValidationWarning>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read bank file: {}", path.display()))?;
    validate_bank_str(&content, path)
}

/// Parse a manifest JSON string.
pub fn parse_manifest_str(content: &str, source_path: &Path) -> Result<Vec<BankEntry>> {
    let entries: Vec<BankEntry> = serde_json::from_str(content)
        .with_context(|| format!("failed to parse manifest: {}", source_path.display()))?;

    let mut seen = HashSet::new();
    for entry in &entries {
        if !seen.insert(entry.id.as_str()) {
            anyhow::bail!("duplicate bank id '{}' in {}", entry.id, source_path.display());
        }
    }
    Ok(entries)
}

/// Where banks come from.
pub trait BankSource {
    /// Enumerate available banks.
    fn manifest(&self) -> Result<Vec<BankEntry>>;

    /// Load one bank's questions.
    fn load(&self, entry: &BankEntry) -> Result<QuestionStore>;

    /// Look up a bank by id and load it.
    fn load_by_id(&self, id: &str) -> Result<QuestionStore> {
        let manifest = self.manifest()?;
        let entry = manifest.iter().find(|e| e.id == id).with_context(|| {
            let ids: Vec<&str> = manifest.iter().map(|e| e.id.as_str()).collect();
            format!("bank '{id}' not found. Available: {ids:?}")
        })?;
        self.load(entry)
    }
}

/// Banks stored as a directory holding `manifest.json` and CSV files.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Map a manifest `file` value to a path under the bank directory.
    ///
    /// Locators are written as site paths (`/bank/x.csv`), so a leading `/` is
    /// dropped. If that path does not exist the bare file name is tried.
    pub fn resolve(&self, file: &str) -> PathBuf {
        let relative = file.trim_start_matches('/');
        let candidate = self.root.join(relative);
        if candidate.exists() {
            return candidate;
        }
        match Path::new(relative).file_name() {
            Some(name) => self.root.join(name),
            None => candidate,
        }
    }
}

impl BankSource for DirectorySource {
    fn manifest(&self) -> Result<Vec<BankEntry>> {
        let path = self.root.join(MANIFEST_FILE);
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;
        parse_manifest_str(&content, &path)
    }

    fn load(&self, entry: &BankEntry) -> Result<QuestionStore> {
        let path = self.resolve(&entry.file);
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read bank '{}': {}", entry.id, path.display()))?;
        let store = parse_bank_str(&content, &path)?;

        if let Some(expected) = entry.question_count {
            if expected != store.len() {
                tracing::warn!(
                    bank = %entry.id,
                    expected,
                    loaded = store.len(),
                    "manifest question count differs from bank contents"
                );
            }
        }
        tracing::info!(bank = %entry.id, questions = store.len(), "bank loaded");

        Ok(store.with_bank(entry.clone()))
    }
}
