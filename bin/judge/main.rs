//! Judge CLI
//!
//! Submits solutions to the remote judge and reports per-case verdicts.

mod commands;
mod style;

use anyhow::Result;
use clap::{Parser, Subcommand};
use judge_client::{CancellationToken, JudgeConfig, Language};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::style::*;

#[derive(Parser, Debug)]
#[command(name = "judge", version, about = "Submit solutions to a remote judge")]
struct Cli {
    /// TOML config file
    #[arg(long, global = true, env = "JUDGE_CONFIG")]
    config: Option<PathBuf>,

    /// Judge service base URL
    #[arg(long, global = true, env = "JUDGE_URL")]
    url: Option<String>,

    /// Delay between result polls
    #[arg(long, global = true, env = "JUDGE_POLL_INTERVAL_MS")]
    poll_interval_ms: Option<u64>,

    /// Stop polling after this many seconds (default: never)
    #[arg(long, global = true, env = "JUDGE_DEADLINE_SECS")]
    deadline_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Submit a solution and wait for its verdict
    Submit {
        /// Source file, or - for stdin
        file: PathBuf,

        /// Language (inferred from the file extension when omitted)
        #[arg(short, long)]
        lang: Option<Language>,

        /// Problem id
        #[arg(short, long, env = "JUDGE_PROBLEM")]
        problem: Option<String>,

        /// Print the scored result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the verdict of an earlier submission
    Status {
        /// Submission id returned by submit
        sid: String,

        /// Keep polling until the judge reports done
        #[arg(short, long)]
        watch: bool,

        #[arg(long)]
        json: bool,
    },

    /// Score a saved result payload without contacting the judge
    Score {
        /// JSON file with {status, cases}
        file: PathBuf,

        #[arg(long)]
        json: bool,
    },
}

pub fn print_banner() {
    eprintln!(
        "{}",
        style_bold(&style_cyan("judge · solution submission client"))
    );
}

fn build_config(cli: &Cli) -> Result<JudgeConfig> {
    let mut config = JudgeConfig::load(cli.config.as_deref())?;
    if let Some(url) = &cli.url {
        config.base_url = url.clone();
    }
    if let Some(ms) = cli.poll_interval_ms {
        config.poll_interval_ms = ms;
    }
    if let Some(secs) = cli.deadline_secs {
        config.poll_deadline_secs = Some(secs);
    }
    if let Commands::Submit {
        problem: Some(problem),
        ..
    } = &cli.command
    {
        config.problem_id = problem.clone();
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = build_config(&cli)?;
    debug!(?config, "Resolved configuration");

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        });
    }

    match cli.command {
        Commands::Submit {
            file, lang, json, ..
        } => commands::submit::run(&config, file, lang, json, cancel).await,
        Commands::Status { sid, watch, json } => {
            commands::status::run(&config, sid, watch, json, cancel).await
        }
        Commands::Score { file, json } => commands::score::run(file, json),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from([
            "judge",
            "--url",
            "http://localhost:9000",
            "--deadline-secs",
            "60",
            "submit",
            "sol.cpp",
            "--problem",
            "ahc002",
        ]);
        let config = build_config(&cli).unwrap();
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.poll_deadline_secs, Some(60));
        assert_eq!(config.problem_id, "ahc002");
    }

    #[test]
    fn test_lang_flag_parses() {
        let cli = Cli::parse_from(["judge", "submit", "-", "--lang", "c++"]);
        match cli.command {
            Commands::Submit { lang, .. } => assert_eq!(lang, Some(Language::Cpp)),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_bad_url_rejected() {
        let cli = Cli::parse_from(["judge", "--url", "nope", "score", "r.json"]);
        assert!(build_config(&cli).is_err());
    }
}
