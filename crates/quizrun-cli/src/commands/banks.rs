//! The `quizrun banks` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use quizrun_core::bank::{BankSource, DirectorySource};

use crate::config::load_config_from;

pub fn execute(bank_dir: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let dir = bank_dir.unwrap_or(config.bank_dir);
    let source = DirectorySource::new(&dir);
    let manifest = source.manifest()?;

    if manifest.is_empty() {
        println!("No banks listed in {}.", dir.display());
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Questions", "File"]);
    for entry in &manifest {
        let count = entry
            .question_count
            .map(|n| n.to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            Cell::new(&entry.id),
            Cell::new(&entry.name),
            Cell::new(count),
            Cell::new(source.resolve(&entry.file).display()),
        ]);
    }
    println!("{table}");
    println!("{} bank(s) in {}", manifest.len(), dir.display());

    Ok(())
}
