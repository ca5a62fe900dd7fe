use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Text};
use tracing::{debug, info};
use weather_core::{CompletionOrder, Config, RequestState, WeatherRequestController};

use crate::render::render;

/// Typed at the search prompt to leave `watch`.
const QUIT: &str = ":q";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather for any city")]
pub struct Cli {
    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key, default city and provider URL.
    Configure,

    /// Fetch and print the current weather once.
    Show {
        /// City to look up; the configured default city when omitted.
        city: Option<String>,
    },

    /// Interactive search: every state change is printed as it happens.
    Watch,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city } => show(city).await,
            Command::Watch => watch().await,
        }
    }
}

/// Config from disk plus `WEATHER_*` overrides, validated.
fn load_config() -> anyhow::Result<Config> {
    let mut config = Config::load()?;
    config.apply_env_overrides();
    config.validate()?;
    Ok(config)
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("weatherapi.com API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    if !api_key.trim().is_empty() {
        config.api_key = api_key.trim().to_string();
    }

    config.default_city = Text::new("Default city:")
        .with_default(&config.default_city)
        .prompt()
        .context("Failed to read default city")?;

    config.base_url = Text::new("Provider base URL:")
        .with_default(&config.base_url)
        .prompt()
        .context("Failed to read provider base URL")?;

    config.validate()?;
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(city: Option<String>) -> anyhow::Result<()> {
    let mut config = load_config()?;

    // The default-city fetch started by the controller must not overwrite
    // the city asked for on the command line.
    config.completion_order = CompletionOrder::LastIssuedWins;
    let controller = WeatherRequestController::from_config(&config);

    let state = match city {
        Some(city) => search(&controller, &city).await?,
        None => controller.settled().await,
    };

    match state {
        RequestState::Error(message) => bail!("Something went wrong: {message}"),
        state => println!("{}", render(&state)),
    }
    Ok(())
}

async fn watch() -> anyhow::Result<()> {
    let config = load_config()?;
    let controller = WeatherRequestController::from_config(&config);
    info!(default_city = %config.default_city, "starting interactive search");

    // Output only happens between prompts: inquire owns the terminal in raw
    // mode while a prompt is active.
    println!("{}", render(&RequestState::Loading));
    println!("\n{}\n", render(&controller.settled().await));

    loop {
        let answer = tokio::task::spawn_blocking(|| {
            Text::new("City:")
                .with_help_message("empty = default city, :q or Esc to quit")
                .prompt()
        })
        .await
        .context("Prompt task failed")?;

        match answer {
            Ok(input) if input.trim() == QUIT => break,
            Ok(input) => {
                debug!(input = %input, "search submitted");
                println!("{}", render(&RequestState::Loading));
                let state = search(&controller, &input).await?;
                println!("\n{}\n", render(&state));
            }
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Failed to read city"),
        }
    }

    Ok(())
}

/// Request `input` (blank means the default city) and wait for its result.
async fn search(
    controller: &WeatherRequestController,
    input: &str,
) -> anyhow::Result<RequestState> {
    controller.request_city(input.trim()).await.context("Weather request task failed")?;
    Ok(controller.state())
}
