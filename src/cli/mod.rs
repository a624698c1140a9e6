//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod chat;
pub mod render;
pub mod say;

use std::error::Error;
use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use ratatui::crossterm::terminal;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use crate::api::ChatMessage;
use crate::core::chat_task::RequestParams;
use crate::core::config::{Config, ConfigError};
use crate::ui::theme::Theme;
use crate::utils::color::{detect_color_depth, forced_color_depth, COLOR_ENV};

#[derive(Parser)]
#[command(name = "schoolbot")]
#[command(about = "A terminal chat client with syntax-highlighted code blocks")]
#[command(
    long_about = "Schoolbot sends your messages to an OpenAI-compatible completions API \
and prints the replies with fenced code blocks highlighted.\n\n\
Environment Variables:\n\
  OPENROUTER_API_KEY    API key (the variable name can be changed with api_key_env)\n\
  SCHOOLBOT_CONFIG_DIR  Directory holding config.toml\n\
  SCHOOLBOT_COLOR       Force colour depth: truecolor, 256 or 16\n\
  RUST_LOG              Log filter (default: warn)\n\n\
Chat commands:\n\
  /cancel           Drop the pending reply\n\
  /quit             Leave (Ctrl+D works too)"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Model to use instead of the configured one
    #[arg(short = 'm', long, global = true, value_name = "MODEL")]
    pub model: Option<String>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true, value_name = "FILE")]
    pub log: Option<PathBuf>,

    /// Print code blocks without syntax colours
    #[arg(long, global = true)]
    pub no_syntax: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start a line-oriented chat session (default)
    Chat,
    /// Send one prompt and print the reply
    Say {
        /// Prompt text; multiple words are joined with spaces
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        prompt: Vec<String>,
    },
    /// Render a message from a file (or stdin) as the assistant would see it
    Render {
        /// Input file; `-` or nothing reads stdin
        file: Option<PathBuf>,
    },
    /// Highlight raw source code
    Highlight {
        /// Language tag, e.g. rust, py, js
        #[arg(short = 'l', long)]
        language: String,
        /// Input file; `-` or nothing reads stdin
        file: Option<PathBuf>,
    },
}

impl Args {
    /// The on-disk config with command-line overrides applied.
    fn config(&self) -> Result<Config, ConfigError> {
        let mut config = Config::load()?;
        if let Some(model) = &self.model {
            config.model = Some(model.clone());
        }
        if self.no_syntax {
            config.syntax = Some(false);
        }
        Ok(config)
    }
}

fn init_logging(log: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    match log {
        Some(path) => {
            let file = File::create(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .init();
        }
    }
    Ok(())
}

/// Theme for stdout: full colour on a terminal, plain when piped unless
/// SCHOOLBOT_COLOR forces a depth.
pub(crate) fn output_theme(config: &Config) -> Theme {
    let forced = std::env::var(COLOR_ENV).ok();
    theme_for(config, io::stdout().is_terminal(), forced.as_deref())
}

fn theme_for(config: &Config, is_terminal: bool, forced: Option<&str>) -> Theme {
    let depth = match forced_color_depth(forced) {
        Some(depth) => depth,
        None if is_terminal => detect_color_depth(),
        None => return Theme::monochrome(),
    };
    Theme::dark_default().with_config(config).quantized(depth)
}

pub(crate) fn terminal_width() -> Option<usize> {
    terminal::size().ok().map(|(w, _)| w as usize)
}

pub(crate) fn request_params(
    config: &Config,
    client: &reqwest::Client,
    api_key: String,
    messages: Vec<ChatMessage>,
    request_id: u64,
    cancel_token: CancellationToken,
) -> RequestParams {
    RequestParams {
        client: client.clone(),
        base_url: config.base_url().to_string(),
        api_key,
        referer: config.referer.clone(),
        model: config.model().to_string(),
        messages,
        cancel_token,
        request_id,
    }
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging(args.log.as_deref())?;
    tokio::runtime::Runtime::new()?.block_on(async_main(args))
}

async fn async_main(args: Args) -> Result<(), Box<dyn Error>> {
    let config = args.config()?;

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Chat => chat::run_chat(config).await,
        Commands::Say { prompt } => say::run_say(prompt, config).await,
        Commands::Render { file } => render::run_render(file.as_deref(), &config),
        Commands::Highlight { language, file } => {
            render::run_highlight(&language, file.as_deref(), &config)
        }
    }
}
