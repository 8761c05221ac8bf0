//! Submit command - send a solution and wait for the verdict

use super::{print_json, print_report, CliSink};
use crate::print_banner;
use crate::style::*;
use anyhow::{anyhow, Context, Result};
use judge_client::{
    CancellationToken, JudgeClient, JudgeConfig, Language, SubmissionController,
};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub async fn run(
    config: &JudgeConfig,
    file: PathBuf,
    lang: Option<Language>,
    json: bool,
    cancel: CancellationToken,
) -> Result<()> {
    let language = resolve_language(&file, lang)?;
    let source = read_source(&file)?;

    if !json {
        print_banner();
        print_header("Submit Solution");
        print_key_value("File", &file.display().to_string());
        print_key_value("Problem", &config.problem_id);
        print_key_value("Language", language.as_str());
        print_key_value("Size", &format!("{} bytes", source.len()));
        print_key_value("Judge", &config.base_url);
        if let Some(deadline) = config.poll_deadline() {
            print_key_value("Deadline", &format!("{}s", deadline.as_secs()));
        }
        eprintln!();
    }

    let client = JudgeClient::new(config)?;
    let controller = SubmissionController::new(
        Arc::new(client),
        Arc::new(CliSink::default()),
        config.poll_options(),
    );

    let score = controller
        .submit(&config.problem_id, language, &source, &cancel)
        .await?;

    if json {
        print_json(&score)?;
    } else {
        eprintln!();
        print_report(&score);
    }
    Ok(())
}

fn resolve_language(file: &Path, lang: Option<Language>) -> Result<Language> {
    lang.or_else(|| Language::from_path(file)).ok_or_else(|| {
        anyhow!(
            "Cannot infer language from {}; pass --lang (python, cpp, java)",
            file.display()
        )
    })
}

/// `-` reads the solution from stdin
fn read_source(file: &Path) -> Result<String> {
    if file == Path::new("-") {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .context("Failed to read source from stdin")?;
        return Ok(source);
    }
    if !file.exists() {
        return Err(anyhow!("File not found: {}", file.display()));
    }
    std::fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))
}
