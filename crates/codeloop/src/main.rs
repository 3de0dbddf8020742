//! The command-line entry for the coding agent.

use std::env;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use codeloop::SessionBuilder;
use codeloop_openai_model::{OpenAIConfigBuilder, OpenAIProvider};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

const BAR_CHAR: &str = "▎";

/// A coding agent that plans, verifies with Python, then implements.
#[derive(Parser)]
#[command(name = "codeloop", version)]
struct Cli {
    /// The task to hand to the agent.
    #[arg(required = true)]
    task: Vec<String>,

    /// Maximum number of model turns for this task.
    #[arg(long, default_value_t = 10)]
    max_turns: u32,

    /// Wall-clock budget in seconds for each Python execution.
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// The model to use, overriding the OPENAI_MODEL environment
    /// variable.
    #[arg(long)]
    model: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let task = cli.task.join(" ");

    let Ok(api_key) = env::var("OPENAI_API_KEY") else {
        eprintln!("OPENAI_API_KEY environment variable is not set");
        return ExitCode::FAILURE;
    };
    let Some(model) = cli.model.or_else(|| env::var("OPENAI_MODEL").ok())
    else {
        eprintln!("pass --model or set the OPENAI_MODEL environment variable");
        return ExitCode::FAILURE;
    };

    let mut config =
        OpenAIConfigBuilder::with_api_key(api_key).with_model(model);
    if let Ok(base_url) = env::var("OPENAI_BASE_URL") {
        config = config.with_base_url(base_url);
    }
    let model_provider = OpenAIProvider::new(config.build());

    let session = SessionBuilder::with_model_provider(model_provider)
        .with_max_turns(cli.max_turns)
        .with_python_timeout(Duration::from_secs(cli.timeout))
        .build();

    let progress_style = ProgressStyle::with_template("{spinner} {wide_msg}")
        .unwrap()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
    let progress_bar = ProgressBar::new_spinner();
    progress_bar.set_style(progress_style);
    progress_bar.set_message("🤔 Thinking...");
    progress_bar.enable_steady_tick(Duration::from_millis(100));

    let outcome = session.run(&task).await;
    progress_bar.finish_and_clear();

    match outcome {
        Ok(result) => {
            println!(
                "{}🤖 {}",
                BAR_CHAR.bright_cyan(),
                result.response.output_text.bright_white()
            );
            println!(
                "{}",
                format!(
                    "{} turns, {} tokens",
                    result.turns, result.response.usage.total_tokens
                )
                .dimmed()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{} {err}", "error:".bright_red());
            ExitCode::FAILURE
        }
    }
}
