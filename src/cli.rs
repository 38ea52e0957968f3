//! Command-line interface components.

use crate::config::LookupConfig;
use crate::render::{html, text};
use crate::session::Session;
use crate::source::source_from_config;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::*;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::debug;

#[derive(Parser, Debug, Clone)]
#[command(name = "trafo-lookup")]
#[command(about = "Look up a transformer by code or registration number")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Codes to look up; without any, an interactive prompt is started
    #[arg(value_name = "QUERY")]
    pub queries: Vec<String>,

    /// Resource root: http(s) URL of the published site or the generated directory
    #[arg(short, long, value_name = "URL|DIR")]
    pub source: Option<String>,

    /// Config file (defaults to trafo-lookup.toml in the user config directory)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Write HTML output to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Html,
}

impl Args {
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Configuration from file and environment, with CLI overrides applied
    pub fn load_config(&self) -> Result<LookupConfig> {
        let mut config =
            LookupConfig::load(self.config.as_deref()).context("Failed to load configuration")?;
        if let Some(source) = &self.source {
            config = config.with_source_root(source.clone());
        }
        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}

/// Set up structured logging on stderr so stdout stays clean for output
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("trafo_lookup={}", log_level)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init();

    debug!("Logging initialized at level: {}", log_level);
}

/// Run the lookup tool
pub async fn run(args: Args) -> Result<()> {
    setup_logging(&args);
    debug!("Command line arguments: {:?}", args);

    let config = args.load_config()?;
    let source = source_from_config(&config).context("Failed to set up resource source")?;
    let session = Session::new(source, config);

    // Startup load; a failure only shows up on the status line
    session.load_index().await;

    if args.queries.is_empty() {
        run_interactive(&args, &session, BufReader::new(tokio::io::stdin())).await
    } else {
        for query in &args.queries {
            session.perform_search(query).await;
            present(&args, &session)?;
        }
        Ok(())
    }
}

/// Prompt loop: each line submitted with Enter runs one search
pub async fn run_interactive<R>(args: &Args, session: &Session, input: R) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    if !session.page().status().is_empty() {
        present(args, session)?;
    }

    let mut lines = input.lines();
    loop {
        prompt()?;
        let Some(line) = lines.next_line().await.context("Failed to read user input")? else {
            break;
        };
        session.perform_search(&line).await;
        present(args, session)?;
    }

    Ok(())
}

fn prompt() -> Result<()> {
    eprint!("{}", "Buscar transformador (código o matrícula): ".bright_white());
    std::io::stderr().flush().context("Failed to flush prompt")
}

fn present(args: &Args, session: &Session) -> Result<()> {
    let page = session.page();
    match args.format {
        OutputFormat::Text => {
            print!("{}", text::render_page(&page));
            std::io::stdout().flush().context("Failed to flush stdout")?;
        }
        OutputFormat::Html => {
            let document = html::render_page(&page, chrono::Local::now())
                .context("Failed to render HTML page")?;
            match &args.output {
                Some(path) => std::fs::write(path, document)
                    .with_context(|| format!("Failed to write {}", path.display()))?,
                None => print!("{}", document),
            }
        }
    }
    Ok(())
}
