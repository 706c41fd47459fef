mod loading;
mod render;

use std::fs;
use std::io::{self, IsTerminal, Read};

use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use dialoguer::{Input, theme::ColorfulTheme};
use saramsa_analyze::{AnalyzeClient, Orchestrator, ViewState};
use saramsa_config::{
    SaramsaConfig, Theme, config_exists, config_path, load_config, open_in_editor,
    resolve_endpoint, resolve_json_output, resolve_simple_output, resolve_theme, save_theme,
    set_config_value,
};
use saramsa_core::{SaramsaError, SaramsaResult, validate_url};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::loading::Loading;
use crate::render::{OutputMode, Palette, render};

const LOG_ENV: &str = "SARAMSA_LOG";

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Switch the colour theme used for results
    Theme {
        #[arg(value_enum, default_value_t = ThemeMode::Toggle)]
        mode: ThemeMode,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Get a configuration value
    Get { key: String },
    /// Set a configuration value
    Set { key: String, value: String },
    /// List all configuration values
    List,
    /// Open config file in editor
    Edit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ThemeMode {
    Light,
    Dark,
    Toggle,
}

#[derive(Debug, Parser)]
#[command(name = "saramsa")]
#[command(version, about = "Extract insights from social content", long_about = None)]
struct Cli {
    /// Read URLs from a file, one per line
    #[arg(long)]
    input: Option<String>,
    /// Print only the transcript
    #[arg(long)]
    simple: bool,
    /// Print the result as JSON
    #[arg(long, conflicts_with = "simple")]
    json: bool,
    /// Analysis endpoint to call instead of the configured one
    #[arg(long)]
    endpoint: Option<String>,
    #[arg(value_name = "URL")]
    urls: Vec<String>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Config { action }) => {
            if let Err(err) = handle_config_command(action) {
                fail(err);
            }
            return;
        }
        Some(Commands::Theme { mode }) => {
            if let Err(err) = handle_theme_command(mode) {
                fail(err);
            }
            return;
        }
        None => {}
    }

    let config = load_config().unwrap_or_else(|err| fail(err));
    let endpoint = resolve_cli_endpoint(cli.endpoint.as_deref(), &config).unwrap_or_else(|err| fail(err));
    let urls = gather_inputs(&cli).unwrap_or_else(|err| fail(err));

    if urls.is_empty() {
        fail(SaramsaError::InvalidInput("no input URLs provided".to_string()));
    }

    let mode = output_mode(&cli, &config);
    let palette = Palette::for_theme(resolve_theme(&config));
    let client = AnalyzeClient::new(endpoint).unwrap_or_else(|err| fail(err));
    let mut orchestrator = Orchestrator::new(client);
    let loading = Loading::new(orchestrator.subscribe_busy());

    let mut success = 0usize;
    let mut failed = 0usize;

    for (index, url) in urls.iter().enumerate() {
        debug!(index, input = %url, "submitting input");
        match loading.run(orchestrator.submit(url)).await {
            ViewState::Succeeded(data) => {
                success += 1;
                print!("{}", render(data, mode, &palette));
                if mode == OutputMode::Full {
                    println!();
                }
            }
            ViewState::Failed(message) => {
                failed += 1;
                eprintln!("{} {url}: {message}", style("Failed").red());
            }
            ViewState::Idle | ViewState::Pending => {}
        }
    }

    if mode == OutputMode::Full || failed > 0 {
        print_summary(success + failed, success, failed);
    }
    if failed > 0 {
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn fail(err: SaramsaError) -> ! {
    eprintln!("{} {err}", style("Error:").red());
    std::process::exit(1);
}

fn resolve_cli_endpoint(explicit: Option<&str>, config: &SaramsaConfig) -> SaramsaResult<String> {
    match explicit {
        Some(endpoint) => {
            validate_url(endpoint)?;
            Ok(endpoint.to_string())
        }
        None => resolve_endpoint(config),
    }
}

fn output_mode(cli: &Cli, config: &SaramsaConfig) -> OutputMode {
    if cli.json {
        OutputMode::Json
    } else if cli.simple {
        OutputMode::Simple
    } else if resolve_json_output(config) {
        OutputMode::Json
    } else if resolve_simple_output(config).unwrap_or(false) {
        OutputMode::Simple
    } else {
        OutputMode::Full
    }
}

fn gather_inputs(cli: &Cli) -> SaramsaResult<Vec<String>> {
    let mut urls = cli.urls.clone();

    if let Some(path) = &cli.input {
        let content = fs::read_to_string(path)
            .map_err(|err| SaramsaError::InvalidInput(format!("failed to read input file: {err}")))?;
        urls.extend(parse_lines(&content));
    }

    if urls.is_empty() {
        if io::stdin().is_terminal() {
            urls.push(prompt_url()?);
        } else {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|err| SaramsaError::InvalidInput(format!("failed to read stdin: {err}")))?;
            urls.extend(parse_lines(&buffer));
        }
    }

    Ok(urls)
}

fn prompt_url() -> SaramsaResult<String> {
    Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Paste content URL here")
        .allow_empty(true)
        .interact_text()
        .map_err(|err| SaramsaError::InvalidInput(format!("prompt failed: {err}")))
}

fn parse_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.to_string())
        .collect()
}

fn handle_theme_command(mode: ThemeMode) -> SaramsaResult<()> {
    let config = load_config()?;
    let next = next_theme(config.display.theme.unwrap_or_default(), mode);
    save_theme(next)?;
    println!("{} Theme set to {}", style("✓").green(), next);
    Ok(())
}

fn next_theme(current: Theme, mode: ThemeMode) -> Theme {
    match mode {
        ThemeMode::Light => Theme::Light,
        ThemeMode::Dark => Theme::Dark,
        ThemeMode::Toggle => current.toggled(),
    }
}

fn handle_config_command(action: ConfigAction) -> SaramsaResult<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = load_config()?;
            match get_nested_config_value(&config, &key) {
                Some(v) => println!("{key} = {v}"),
                None => println!("{key} = <null>"),
            }
            Ok(())
        }
        ConfigAction::Set { key, value } => {
            set_config_value(&key, &value)?;
            println!("{} Set {} = {}", style("✓").green(), key, value);
            Ok(())
        }
        ConfigAction::List => {
            let config = load_config()?;
            let path = config_path()?;
            if config_exists()? {
                println!("Current configuration ({}):", path.display());
            } else {
                println!("No config file at {}; showing defaults:", path.display());
            }
            println!("\n[api]");
            println!("endpoint = {}", resolve_endpoint(&config)?);
            println!("\n[output]");
            println!("simple = {}", config.output.simple.unwrap_or(false));
            println!("json = {}", config.output.json.unwrap_or(false));
            println!("\n[display]");
            println!("theme = {}", config.display.theme.unwrap_or_default());
            Ok(())
        }
        ConfigAction::Edit => open_in_editor(),
    }
}

fn get_nested_config_value(config: &SaramsaConfig, key_path: &str) -> Option<String> {
    let parts: Vec<&str> = key_path.split('.').collect();

    match parts.as_slice() {
        ["api", "endpoint"] => config.api.endpoint.clone(),
        ["output", "simple"] => config.output.simple.map(|b| b.to_string()),
        ["output", "json"] => config.output.json.map(|b| b.to_string()),
        ["display", "theme"] => config.display.theme.map(|theme| theme.to_string()),
        _ => None,
    }
}

fn print_summary(total: usize, success: usize, failed: usize) {
    println!(
        "{} Total: {} | Success: {} | Failed: {}",
        style("Summary:").bold(),
        total,
        success,
        failed
    );
}
