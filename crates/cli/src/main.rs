use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ollaix_core::logging::{LoggingConfig, init_logging};
use ollaix_core::{Config, I18n, Locale};
use ollaix_providers::{
    ChatController, ControllerFactory, HttpUpdateProbe, ReleaseRegistration, SharedConnectivity, UpdateChecker,
};
use ollaix_ui::{App, AppExit, AppState, UiStrings};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Ollaix - chat with local and hosted models from the terminal
#[derive(Parser, Debug)]
#[command(name = "ollaix")]
#[command(about = "A terminal chat client for Ollaix models", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to ollaix.toml (default: ~/.ollaix/ollaix.toml)
    #[arg(short, long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the interactive chat
    Start {
        /// UI language (overrides the config file)
        #[arg(short, long, value_name = "TAG")]
        locale: Option<String>,

        /// Model selected at startup (overrides the config file)
        #[arg(short, long, value_name = "ID")]
        model: Option<String>,

        /// Replay scripted replies from a TOML file instead of the dummy backend
        #[arg(long, value_name = "PATH")]
        mock: Option<PathBuf>,

        /// Fail a reply after this many seconds without output
        #[arg(long, value_name = "SECS")]
        stall_timeout: Option<u64>,
    },
    /// List available models
    Models {
        /// Print as JSON
        #[arg(long)]
        json: bool,

        /// Read models from a mock TOML file
        #[arg(long, value_name = "PATH")]
        mock: Option<PathBuf>,
    },
    /// Write an example config file
    Init {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config_path = match cli.config {
        Some(path) => path,
        None => default_config_path()?,
    };

    match cli.command {
        Commands::Init { force } => cmd_init(&config_path, force),
        Commands::Models { json, mock } => {
            let config = load_config(&config_path, cli.verbose)?;
            let _guard = init_logging(Some(cli_logging(&config, cli.verbose))).context("Failed to initialize logging")?;
            cmd_models(mock.as_deref(), json).await
        }
        Commands::Start { locale, model, mock, stall_timeout } => {
            let mut config = load_config(&config_path, cli.verbose)?;
            if let Some(locale) = locale {
                config.locale = Some(locale);
            }
            if let Some(model) = model {
                config.default_model_id = Some(model);
            }
            let options = StartOptions { mock, stall_timeout: stall_timeout.map(Duration::from_secs) };
            match cmd_start(config, options).await? {
                AppExit::Quit => Ok(()),
                AppExit::Reload => restart(),
            }
        }
    }
}

/// `~/.ollaix/ollaix.toml`
fn default_config_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".ollaix").join("ollaix.toml"))
}

/// Load config from file, or defaults when the file does not exist
fn load_config(path: &Path, verbose: bool) -> Result<Config> {
    if path.exists() {
        if verbose {
            println!("{} Loading config from {}", "Info:".green().bold(), path.display());
        }
        Config::from_file(path).with_context(|| format!("Failed to load config from {}", path.display()))
    } else {
        if verbose {
            println!(
                "{} No config at {}, using defaults (run `ollaix init` to create one)",
                "Info:".blue().bold(),
                path.display()
            );
        }
        Ok(Config::default())
    }
}

/// Stderr logging for the non-interactive commands
fn cli_logging(config: &Config, verbose: bool) -> LoggingConfig {
    let logging = LoggingConfig::from(config.logging.clone());
    if verbose { logging.with_level("debug") } else { logging }
}

fn build_controller(mock: Option<&Path>, stall_timeout: Option<Duration>) -> Result<Arc<dyn ChatController>> {
    let kind = ControllerFactory::from_mock_path(mock);
    ControllerFactory::create(&kind, stall_timeout).context("Failed to create chat controller")
}

/// Write the example config
fn cmd_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }
    std::fs::write(path, Config::example()).context("Failed to write config")?;

    println!("{} Created config at {}", "Success:".green().bold(), path.display());
    Ok(())
}

/// Print the models the controller offers
async fn cmd_models(mock: Option<&Path>, json: bool) -> Result<()> {
    let controller = build_controller(mock, None)?;
    let models = controller.list_models().await.context("Failed to list models")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&models)?);
        return Ok(());
    }

    for model in &models {
        println!("{} {} ({})", model.id.cyan(), model.name, model.provider.as_str().dimmed());
        if !model.description.is_empty() {
            println!("    {}", model.description.dimmed());
        }
    }
    Ok(())
}

struct StartOptions {
    mock: Option<PathBuf>,
    stall_timeout: Option<Duration>,
}

/// Run the interactive chat
async fn cmd_start(config: Config, options: StartOptions) -> Result<AppExit> {
    let locale: Locale = config.locale().context("Invalid locale")?;
    let i18n = I18n::new(locale).context("Locale table is incomplete")?;
    let strings = UiStrings::resolve(&i18n).context("Failed to resolve UI strings")?;

    let _guard = init_logging(Some(LoggingConfig::from(config.logging.clone()).for_tui()))
        .context("Failed to initialize logging")?;
    tracing::info!(locale = %locale, "starting ollaix");

    let controller = build_controller(options.mock.as_deref(), options.stall_timeout)?;
    let update_rx = spawn_update_checker(&config)?;

    let mut app = App::new(AppState::new(config, strings), controller);
    if let Some(rx) = update_rx {
        app = app.with_update_events(rx);
    }

    let exit = app.run().await.context("Terminal error")?;
    tracing::info!(?exit, "ollaix exited");
    Ok(exit)
}

/// Start periodic update checks when a probe URL is configured
fn spawn_update_checker(config: &Config) -> Result<Option<mpsc::Receiver<ollaix_providers::UpdateEvent>>> {
    let Some(url) = config.update.probe_url.as_deref().filter(|_| config.update.enabled) else {
        return Ok(None);
    };

    let probe = HttpUpdateProbe::new(url).context("Failed to create update probe")?;
    let registration =
        ReleaseRegistration::new(url, env!("CARGO_PKG_VERSION")).context("Failed to create update registration")?;

    let (tx, rx) = mpsc::channel(4);
    let checker =
        UpdateChecker::new(Arc::new(probe), Arc::new(registration), Arc::new(SharedConnectivity::default()), tx);
    let period = config.update.interval();
    tokio::spawn(checker.run(period));

    Ok(Some(rx))
}

/// Replace this process with a fresh copy of itself
fn restart() -> Result<()> {
    let exe = std::env::current_exe().context("Failed to locate executable")?;
    let mut command = std::process::Command::new(exe);
    command.args(std::env::args_os().skip(1));

    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        let err = command.exec();
        return Err(err).context("Failed to restart");
    }

    #[cfg(not(unix))]
    {
        let status = command.status().context("Failed to restart")?;
        std::process::exit(status.code().unwrap_or(1));
    }
}
