//! CLI binary for websift.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::io::{AsyncBufReadExt, BufReader};

use websift::tool::ERROR_STAGE;
use websift::{ToolError, ToolHost, ToolInvocation, ToolOutcome, WebSearchTool, WebSiftConfig};

/// websift: search the web, crawl the hits and print a ranked summary.
#[derive(Parser)]
#[command(name = "websift", version, about)]
struct Cli {
    /// Search query (several words are joined with spaces).
    query: Vec<String>,

    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run without asking for confirmation.
    #[arg(short = 'y', long)]
    yes: bool,

    /// Maximum number of results in the report.
    #[arg(long)]
    max_results: Option<usize>,

    /// Per-page crawl timeout in seconds.
    #[arg(long)]
    page_timeout: Option<u64>,
}

/// Terminal host: prompts on stderr, reports on stdout.
struct TerminalHost {
    auto_approve: bool,
}

impl ToolHost for TerminalHost {
    async fn ask_approval(&mut self, preview: &str) -> websift::Result<bool> {
        eprintln!("{preview}");
        if self.auto_approve {
            return Ok(true);
        }
        eprint!("Proceed? [y/N] ");

        let mut answer = String::new();
        BufReader::new(tokio::io::stdin())
            .read_line(&mut answer)
            .await
            .map_err(ToolError::Io)?;
        Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
    }

    fn say_partial(&mut self, preview: &str) {
        eprintln!("{preview}");
    }

    fn report_error(&mut self, stage: &str, error: &ToolError) {
        eprintln!("error while {stage}: {}", error.message());
    }

    fn push_result(&mut self, text: &str) {
        println!("{text}");
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    websift::logging::init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error while {ERROR_STAGE}: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut config = load_config(cli.config.as_ref())?;
    if let Some(max_results) = cli.max_results {
        config.search.max_results = max_results;
    }
    if let Some(page_timeout) = cli.page_timeout {
        config.search.page_timeout_seconds = page_timeout;
    }
    config.validate()?;

    let mut host = TerminalHost {
        auto_approve: cli.yes || config.tool.auto_approve,
    };
    let invocation = ToolInvocation::query(cli.query.join(" "));
    let tool = WebSearchTool::new(config);

    let outcome = tool.handle(&invocation, &mut host).await;
    tracing::debug!(?outcome, "invocation finished");
    Ok(match outcome {
        ToolOutcome::MissingParameter => ExitCode::from(2),
        ToolOutcome::Failed => ExitCode::FAILURE,
        ToolOutcome::Partial | ToolOutcome::Declined | ToolOutcome::Completed { .. } => {
            ExitCode::SUCCESS
        }
    })
}

/// Explicit path must exist; the default path is optional.
fn load_config(path: Option<&PathBuf>) -> anyhow::Result<WebSiftConfig> {
    let path = match path {
        Some(path) => path.clone(),
        None => {
            let default_path = WebSiftConfig::default_config_path();
            if !default_path.exists() {
                return Ok(WebSiftConfig::default());
            }
            default_path
        }
    };
    WebSiftConfig::from_file(&path)
        .with_context(|| format!("failed to load config from {}", path.display()))
}
