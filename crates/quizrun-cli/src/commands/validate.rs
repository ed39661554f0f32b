//! The `quizrun validate` command.

use std::path::PathBuf;

use anyhow::Result;

use quizrun_core::bank::{load_bank, validate_bank, BankSource, DirectorySource, ValidationWarning};

pub fn execute(path: PathBuf) -> Result<()> {
    let files: Vec<(String, PathBuf)> = if path.is_dir() {
        let source = DirectorySource::new(&path);
        source
            .manifest()?
            .into_iter()
            .map(|entry| {
                let file = source.resolve(&entry.file);
                (entry.name, file)
            })
            .collect()
    } else {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        vec![(name, path.clone())]
    };

    let mut total_warnings = 0;
    let mut total_errors = 0;

    for (name, file) in &files {
        let warnings = validate_bank(file)?;
        let errors = warnings.iter().filter(|w| w.fatal).count();

        if errors == 0 {
            let store = load_bank(file)?;
            println!("Bank: {name} ({} questions)", store.len());
        } else {
            println!("Bank: {name} ({})", file.display());
        }
        for w in &warnings {
            println!("{}", format_warning(w));
        }

        total_errors += errors;
        total_warnings += warnings.len() - errors;
    }

    if total_errors > 0 {
        anyhow::bail!("{total_errors} error(s) found in {}", path.display());
    }
    if total_warnings == 0 {
        println!("All banks valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}

fn format_warning(w: &ValidationWarning) -> String {
    let prefix = w
        .line
        .map(|line| format!("  [line {line}]"))
        .unwrap_or_else(|| "  ".to_string());
    let level = if w.fatal { "ERROR" } else { "WARNING" };
    format!("{prefix} {level}: {}", w.message)
}
