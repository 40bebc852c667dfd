use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use got_explorer::knowledge::{KeywordResponder, DEFAULT_ANSWER};
use got_explorer::models::AnswerResult;
use got_explorer::{AnswerResolver, AppConfig};

#[derive(Parser, Debug)]
#[command(name = "eval")]
#[command(about = "Run a question set through the answer pipeline and score it")]
struct Cli {
    #[arg(long, default_value = "eval/prompts.jsonl")]
    file: String,
    #[arg(long, default_value_t = false)]
    verbose: bool,
    /// Skip the knowledge service and answer from the keyword table only.
    #[arg(long, default_value_t = false)]
    offline: bool,
}

#[derive(Debug, Deserialize)]
struct EvalPrompt {
    id: String,
    question: String,
    #[serde(default)]
    expect_contains: Vec<String>,
    #[serde(default)]
    expect_house: Option<String>,
    #[serde(default)]
    expect_default: Option<bool>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = AppConfig::from_env();

    let responder = match &config.knowledge_path {
        Some(path) => KeywordResponder::load(path)?,
        None => KeywordResponder::default(),
    };
    let resolver = AnswerResolver::new(&config.upstream, responder.clone());

    let prompts = load_prompts(&cli.file)?;
    if prompts.is_empty() {
        anyhow::bail!("no prompts found in {}", cli.file);
    }

    let mut total = 0usize;
    let mut passed = 0usize;
    let mut tagged = 0usize;
    let mut default_count = 0usize;

    for prompt in prompts {
        total += 1;
        let answer: AnswerResult = if cli.offline {
            responder.lookup(&prompt.question)
        } else {
            resolver.resolve(&prompt.question).await
        };

        let answer_lower = answer.text.to_lowercase();
        let is_default = answer.text == DEFAULT_ANSWER;
        if is_default {
            default_count += 1;
        }
        if answer.source_house.is_some() {
            tagged += 1;
        }

        let mut pass = answer.is_success()
            && prompt
                .expect_contains
                .iter()
                .all(|needle| answer_lower.contains(&needle.to_lowercase()));

        if let Some(expected) = &prompt.expect_default {
            pass &= *expected == is_default;
        }
        if let Some(expected) = &prompt.expect_house {
            let actual = answer.source_house.map(|house| house.as_str());
            pass &= actual == Some(expected.to_lowercase().as_str());
        }

        if pass {
            passed += 1;
        }

        if cli.verbose {
            println!("--- {} [{}] ---", prompt.id, if pass { "pass" } else { "FAIL" });
            println!("Q: {}", prompt.question);
            println!("A: {}", answer.text.replace('\n', " "));
            println!(
                "House: {}",
                answer.source_house.map(|h| h.label()).unwrap_or("-")
            );
            println!();
        }
    }

    println!("Eval prompts: {}", total);
    println!("Expectation accuracy: {:.1}%", percent(passed, total));
    println!("House-tag rate: {:.1}%", percent(tagged, total));
    println!("Default-answer rate: {:.1}%", percent(default_count, total));

    Ok(())
}

/// Parses JSONL prompts, skipping blank lines and `#` comments.
fn load_prompts(path: &str) -> Result<Vec<EvalPrompt>> {
    let raw =
        std::fs::read_to_string(path).with_context(|| format!("failed reading {}", path))?;

    raw.lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line_no, line)| {
            serde_json::from_str::<EvalPrompt>(line)
                .with_context(|| format!("invalid JSON at {} line {}", path, line_no))
        })
        .collect()
}

fn percent(count: usize, total: usize) -> f32 {
    match total {
        0 => 0.0,
        _ => count as f32 * 100.0 / total as f32,
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn prompts_skip_comments_and_blank_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# header").unwrap();
        writeln!(file).unwrap();
        writeln!(
            file,
            r#"{{"id": "ned", "question": "Who was Ned Stark?", "expect_house": "stark"}}"#
        )
        .unwrap();

        let prompts = load_prompts(file.path().to_str().unwrap()).unwrap();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].id, "ned");
        assert_eq!(prompts[0].expect_house.as_deref(), Some("stark"));
        assert!(prompts[0].expect_contains.is_empty());
    }

    #[test]
    fn invalid_prompt_reports_line_number() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# header").unwrap();
        writeln!(file, "{{not json").unwrap();

        let err = load_prompts(file.path().to_str().unwrap()).unwrap_err();
        assert!(err.to_string().ends_with("line 2"));
    }

    #[test]
    fn percent_handles_empty_runs() {
        assert_eq!(percent(0, 0), 0.0);
        assert_eq!(percent(1, 4), 25.0);
    }
}
