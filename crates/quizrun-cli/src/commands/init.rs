//! The `quizrun init` command.

use std::path::Path;

use anyhow::{Context, Result};

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("quizrun.toml"), SAMPLE_CONFIG)?;

    std::fs::create_dir_all("banks").context("failed to create banks/")?;
    write_if_missing(Path::new("banks/manifest.json"), SAMPLE_MANIFEST)?;
    write_if_missing(Path::new("banks/sample.csv"), SAMPLE_BANK)?;

    println!("\nNext steps:");
    println!("  1. Add your own CSV banks to banks/ and list them in banks/manifest.json");
    println!("  2. Run: quizrun validate banks");
    println!("  3. Run: quizrun play --bank sample");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizrun configuration

bank_dir = "./banks"
default_bank = "sample"

# "instant" shows feedback after each answer, "exam" only at the end.
mode = "instant"
# limit = 20
shuffle = true
clean_question_text = true

output_dir = "./quizrun-results"
formats = ["json"]
"#;

const SAMPLE_MANIFEST: &str = r#"[
  {
    "id": "sample",
    "name": "Sample bank",
    "file": "sample.csv",
    "questionCount": 3
  }
]
"#;

const SAMPLE_BANK: &str = "\
câu hỏi,đáp án a,đáp án b,đáp án c,đáp án d,đáp án đúng
Câu 1. Tim người có mấy ngăn?,2,3,4,5,C
Câu 2. Cơ quan nào lọc máu tạo nước tiểu?,Gan,Lách,Thận,Phổi,C
Câu 3. Hồng cầu có chức năng chính là gì?,Vận chuyển oxy,Đông máu,Miễn dịch,Tiêu hóa,A
";
