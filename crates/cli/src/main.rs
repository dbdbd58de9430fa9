use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use inshort_core::logging::{self, LogGuard, LoggingConfig};
use inshort_core::{Config, FileLoggingConfig};
use inshort_providers::{HttpSummaryProvider, MockProvider, SummaryProvider};
use inshort_ui::{App, ChatController, ChatError, TurnStatus, app::event_loop};
use owo_colors::OwoColorize;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

/// InShort - personalized news and insights in your terminal
#[derive(Parser, Debug)]
#[command(name = "inshort")]
#[command(about = "Terminal chat client for the InShort summarization service", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config.toml (default: the platform config directory)
    #[arg(short, long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Base URL of the summarization service (overrides config and INSHORT_BACKEND_URL)
    #[arg(long, value_name = "URL", global = true)]
    backend_url: Option<String>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the interactive chat (default)
    Chat,
    /// Send a single query and print the answer
    Ask {
        /// Query text; multiple words are joined with spaces
        #[arg(required = true, value_name = "QUERY")]
        query: Vec<String>,

        /// Answer locally with this text instead of calling the service
        #[arg(long, value_name = "TEXT")]
        mock_answer: Option<String>,
    },
    /// Print the resolved configuration
    Config {
        /// Print an annotated example config instead
        #[arg(long)]
        example: bool,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Chat);

    match command {
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "inshort", &mut std::io::stdout());
            Ok(())
        }
        Commands::Config { example: true } => {
            print!("{}", Config::example());
            Ok(())
        }
        Commands::Config { example: false } => {
            let config = resolve_config(cli.config, cli.backend_url)?;
            cmd_config(&config, &mut std::io::stdout())
        }
        Commands::Ask { query, mock_answer } => {
            let config = resolve_config(cli.config, cli.backend_url)?;
            let _guard = init_logging(&config, cli.verbose, false)?;
            cmd_ask(&config, &query.join(" "), mock_answer, &mut std::io::stdout())
        }
        Commands::Chat => {
            let config = resolve_config(cli.config, cli.backend_url)?;
            let _guard = init_logging(&config, cli.verbose, true)?;
            cmd_chat(&config)
        }
    }
}

/// Defaults, then the config file, then the environment, then the command line
fn resolve_config(path: Option<PathBuf>, backend_url: Option<String>) -> Result<Config> {
    let mut config = Config::load(path.as_deref()).context("Failed to load config")?;
    config.apply_env().context("Invalid environment override")?;

    if let Some(url) = backend_url {
        config = config.with_backend_url(url).context("Invalid --backend-url")?;
    }

    Ok(config)
}

/// The TUI owns the terminal, so interactive sessions log to the rolling file only
fn init_logging(config: &Config, verbose: bool, interactive: bool) -> Result<LogGuard> {
    let mut logging_config = LoggingConfig::from(config.logging.clone());
    if verbose {
        logging_config = logging_config
            .with_level("debug")
            .with_file_logging(FileLoggingConfig { enabled: true, level: "debug".to_string() });
    }
    if interactive {
        logging_config = logging_config.without_stderr();
    }

    logging::init_logging(Some(logging_config)).context("Failed to initialize logging")
}

fn build_provider(config: &Config, mock_answer: Option<String>) -> Result<Arc<dyn SummaryProvider>> {
    match mock_answer {
        Some(answer) => Ok(Arc::new(MockProvider::always(answer))),
        None => {
            let provider = HttpSummaryProvider::new(&config.backend_url, config.request_timeout())
                .context("Failed to create HTTP client")?;
            tracing::debug!(endpoint = provider.endpoint(), "using summarization service");
            Ok(Arc::new(provider))
        }
    }
}

/// Run the interactive chat until the user quits
fn cmd_chat(config: &Config) -> Result<()> {
    let provider = build_provider(config, None)?;
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;

    runtime.block_on(async {
        let controller = ChatController::new(config.chat_config(), provider)?;
        let mut app = App::new(controller);
        event_loop::run(&mut app).await.context("Terminal error")?;
        Ok::<(), anyhow::Error>(())
    })
}

/// Submit one query through the chat controller and print the answer
fn cmd_ask(config: &Config, query: &str, mock_answer: Option<String>, out: &mut dyn Write) -> Result<()> {
    let provider = build_provider(config, mock_answer)?;
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;

    let answer = runtime.block_on(async {
        let mut controller = ChatController::new(config.chat_config(), provider)?;
        controller.set_draft(query);
        let index = controller.try_submit().ok_or(ChatError::EmptySubmission)?;

        let turn = controller
            .settle(index)
            .await
            .ok_or_else(|| anyhow!("turn {} disappeared", index))?;

        match turn.status() {
            TurnStatus::Answered => Ok::<String, anyhow::Error>(turn.ai_text().to_string()),
            TurnStatus::Failed(err) => Err(anyhow!(err.clone())),
            TurnStatus::Pending => Err(anyhow!("request did not complete")),
        }
    })?;

    writeln!(out, "{}", answer)?;
    Ok(())
}

fn cmd_config(config: &Config, out: &mut dyn Write) -> Result<()> {
    let rendered = toml::to_string_pretty(config).context("Failed to serialize config")?;
    write!(out, "{}", rendered)?;
    Ok(())
}
