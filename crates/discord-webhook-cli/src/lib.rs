//! # Discord Webhook CLI
//!
//! Command-line driver for the Discord webhook SDK.
//!
//! This module provides CLI commands for:
//! - Managing the channel's webhooks
//! - Sending, editing, fetching and deleting messages
//! - Listing, adding and removing pins
//! - Inspecting the resolved configuration

use clap::{Parser, Subcommand};
use discord_webhook_sdk::client::{ApiOutcome, ClientConfig, DiscordClient, Transport};
use discord_webhook_sdk::{
    ApiError, Credentials, Message, MessageId, Precondition, ValidationError, Webhook,
    WebhookRef, WebhookSummary,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Optional configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config/discord-webhook";

/// Prefix of configuration environment variables, e.g. `DISCORD_WEBHOOK__TOKEN`.
pub const ENV_PREFIX: &str = "DISCORD_WEBHOOK";

// ============================================================================
// CLI Structure
// ============================================================================

/// Discord webhook CLI - manage channel webhooks, messages and pins
#[derive(Parser)]
#[command(name = "discord-webhook")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Manage Discord channel webhooks and their messages")]
#[command(
    long_about = "Creates and manages the webhooks of a Discord channel, posts messages through them and manages pins with a bot token"
)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "DISCORD_WEBHOOK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Logging level
    #[arg(short, long, default_value = "info")]
    pub log_level: String,

    /// Enable JSON logging
    #[arg(long)]
    pub json_logs: bool,

    /// Webhook URL to make active before the command runs
    #[arg(short, long, env = "DISCORD_WEBHOOK_URL")]
    pub webhook_url: Option<String>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Webhook management commands
    Webhooks {
        #[command(subcommand)]
        action: WebhookCommands,
    },

    /// Message commands
    Messages {
        #[command(subcommand)]
        action: MessageCommands,
    },

    /// Pin management commands
    Pins {
        #[command(subcommand)]
        action: PinCommands,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON output
    Json,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Webhook management subcommands
#[derive(Subcommand)]
pub enum WebhookCommands {
    /// List the channel's webhooks
    List,

    /// Create a webhook and make it active
    Create {
        /// Webhook name
        name: String,
    },

    /// Show webhook details
    Info {
        /// Webhook URL (defaults to the active webhook)
        #[arg(short, long)]
        url: Option<String>,
    },

    /// Rename a webhook
    Update {
        /// New webhook name
        name: String,

        /// Webhook URL (defaults to the active webhook)
        #[arg(short, long)]
        url: Option<String>,
    },

    /// Delete a webhook
    Delete {
        /// Webhook URL (defaults to the active webhook)
        #[arg(short, long)]
        url: Option<String>,
    },
}

/// Message subcommands
#[derive(Subcommand)]
pub enum MessageCommands {
    /// Send a message through the active webhook
    Send {
        /// Message text
        content: String,

        /// Image to embed
        #[arg(short, long)]
        image_url: Option<String>,
    },

    /// Replace the text of a webhook message
    Edit {
        /// Message ID
        message_id: MessageId,

        /// Replacement text
        content: String,
    },

    /// Delete a webhook message
    Delete {
        /// Message ID
        message_id: MessageId,
    },

    /// Fetch a channel message
    Get {
        /// Message ID
        message_id: MessageId,
    },
}

/// Pin management subcommands
#[derive(Subcommand)]
pub enum PinCommands {
    /// List pinned message IDs
    List,

    /// Pin a message
    Add {
        /// Message ID
        message_id: MessageId,
    },

    /// Unpin a message
    Remove {
        /// Message ID
        message_id: MessageId,
    },
}

/// Configuration subcommands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the resolved configuration with secrets redacted
    Show,
}

// ============================================================================
// CLI Error Types
// ============================================================================

/// CLI-specific errors
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Discord API error: {0}")]
    Api(#[from] ApiError),

    #[error("Request rejected with HTTP status {status}")]
    Rejected { status: u16 },

    #[error("Operation not attempted: {0}")]
    Precondition(Precondition),

    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Configuration(_) => 1,
            Self::Api(_) => 2,
            Self::Rejected { .. } => 3,
            Self::Precondition(_) => 4,
            Self::Output(_) => 5,
        }
    }
}

/// Configuration-related errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Invalid configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Missing required configuration: {key}")]
    MissingRequired { key: String },
}

// ============================================================================
// Configuration Types
// ============================================================================

/// Resolved CLI configuration
#[derive(Clone, Default, serde::Deserialize, Serialize)]
pub struct CliConfig {
    /// Bot token
    #[serde(default)]
    pub token: String,

    /// Channel the commands operate on. Also read as `channelId`.
    #[serde(default, alias = "channelId", alias = "channelid")]
    pub channel_id: String,

    /// Webhook to make active at startup
    #[serde(default)]
    pub webhook_url: Option<String>,

    /// Override for the API base URL
    #[serde(default)]
    pub api_base_url: Option<String>,

    /// Request timeout in seconds
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

impl CliConfig {
    /// Check that a client can be built from this configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.token.trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                key: "token".to_string(),
            });
        }
        if self.channel_id.trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                key: "channel_id".to_string(),
            });
        }
        if let Some(url) = &self.webhook_url {
            WebhookRef::parse(url.as_str())?;
        }
        Ok(())
    }

    /// Bot credentials for the SDK client.
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.token.trim(), self.channel_id.trim())
    }

    /// SDK client configuration with any overrides applied.
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::default();
        if let Some(url) = &self.api_base_url {
            config = config.with_api_base_url(url);
        }
        if let Some(seconds) = self.timeout_seconds {
            config = config.with_timeout(Duration::from_secs(seconds));
        }
        config
    }

    /// Copy with the bot token and webhook secret masked.
    pub fn redacted(&self) -> Self {
        let mut redacted = self.clone();
        if !redacted.token.is_empty() {
            redacted.token = "<REDACTED>".to_string();
        }
        redacted.webhook_url = redacted.webhook_url.as_deref().map(redact_webhook_url);
        redacted
    }
}

// Security: never print the token or the webhook secret
impl std::fmt::Debug for CliConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redacted = self.redacted();
        f.debug_struct("CliConfig")
            .field("token", &redacted.token)
            .field("channel_id", &redacted.channel_id)
            .field("webhook_url", &redacted.webhook_url)
            .field("api_base_url", &redacted.api_base_url)
            .field("timeout_seconds", &redacted.timeout_seconds)
            .finish()
    }
}

/// Replace the trailing token segment of a webhook URL.
fn redact_webhook_url(url: &str) -> String {
    match url.rsplit_once('/') {
        Some((head, _)) => format!("{}/<REDACTED>", head),
        None => "<REDACTED>".to_string(),
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

/// Main CLI entry point
pub async fn run_cli() -> Result<(), CliError> {
    let cli = Cli::parse();

    // Initialize logging
    initialize_logging(&cli);

    let output = run(cli).await?;
    println!("{}", output);
    Ok(())
}

/// Execute a parsed command line and return the rendered output.
pub async fn run(cli: Cli) -> Result<String, CliError> {
    // Load configuration
    let mut config = load_configuration(cli.config.as_deref())?;
    if let Some(url) = cli.webhook_url {
        config.webhook_url = Some(url);
    }

    let format = cli.format;
    match cli.command {
        Commands::Config { action } => execute_config_command(action, &config, format),
        Commands::Webhooks { action } => {
            let client = build_client(&config)?;
            execute_webhooks_command(&client, action, format).await
        }
        Commands::Messages { action } => {
            let client = build_client(&config)?;
            execute_messages_command(&client, action, format).await
        }
        Commands::Pins { action } => {
            let client = build_client(&config)?;
            execute_pins_command(&client, action, format).await
        }
    }
}

/// Initialize logging based on CLI arguments
///
/// `RUST_LOG` takes precedence over `--log-level`. Logs go to stderr so
/// command output on stdout stays machine readable.
pub fn initialize_logging(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let json_layer = cli.json_logs.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
    });
    let text_layer =
        (!cli.json_logs).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

/// Load configuration from files and environment
///
/// Sources, later ones overriding earlier ones:
///  1. `config/discord-webhook.{toml,json,yaml,...}` if present
///  2. the explicit `--config` file, which must exist
///  3. environment variables prefixed `DISCORD_WEBHOOK__`
pub fn load_configuration(config_path: Option<&Path>) -> Result<CliConfig, ConfigError> {
    let mut builder = config::Config::builder()
        .add_source(config::File::with_name(DEFAULT_CONFIG_FILE).required(false));

    if let Some(path) = config_path {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        builder = builder.add_source(config::File::from(path).required(true));
        debug!(path = %path.display(), "Loading configuration from explicit path");
    }

    let config = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    Ok(config.try_deserialize()?)
}

/// Build an SDK client from validated configuration.
pub fn build_client(config: &CliConfig) -> Result<DiscordClient, CliError> {
    config.validate()?;

    let mut builder = DiscordClient::builder(config.credentials()).config(config.client_config());
    if let Some(url) = &config.webhook_url {
        builder = builder.webhook_url(url.as_str());
    }

    Ok(builder.build()?)
}

// ============================================================================
// Command Implementations
// ============================================================================

/// Execute config command
fn execute_config_command(
    action: ConfigCommands,
    config: &CliConfig,
    format: OutputFormat,
) -> Result<String, CliError> {
    match action {
        ConfigCommands::Show => {
            let redacted = config.redacted();
            match format {
                OutputFormat::Json => Ok(serde_json::to_string_pretty(&redacted)?),
                OutputFormat::Text => Ok(format!(
                    "token: {}\nchannel_id: {}\nwebhook_url: {}\napi_base_url: {}\ntimeout_seconds: {}",
                    redacted.token,
                    redacted.channel_id,
                    redacted.webhook_url.as_deref().unwrap_or("-"),
                    redacted.api_base_url.as_deref().unwrap_or("-"),
                    redacted
                        .timeout_seconds
                        .map(|seconds| seconds.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                )),
            }
        }
    }
}

/// Execute webhooks command
pub async fn execute_webhooks_command<T: Transport>(
    client: &DiscordClient<T>,
    action: WebhookCommands,
    format: OutputFormat,
) -> Result<String, CliError> {
    match action {
        WebhookCommands::List => {
            info!("Listing webhooks");
            let outcome = client.list_webhooks().await?;
            render(outcome, format, |webhooks: &Vec<WebhookSummary>| {
                if webhooks.is_empty() {
                    return "No webhooks".to_string();
                }
                webhooks
                    .iter()
                    .map(|webhook| format!("{}\t{}", webhook.name, webhook.url))
                    .collect::<Vec<_>>()
                    .join("\n")
            })
        }
        WebhookCommands::Create { name } => {
            info!(name = %name, "Creating webhook");
            let outcome = client.create_webhook(&name).await?;
            render(outcome, format, |url: &String| url.clone())
        }
        WebhookCommands::Info { url } => {
            info!(explicit_url = url.is_some(), "Fetching webhook info");
            let outcome = client.get_webhook_info(url.as_deref()).await?;
            render(outcome, format, render_webhook)
        }
        WebhookCommands::Update { name, url } => {
            info!(name = %name, explicit_url = url.is_some(), "Renaming webhook");
            let outcome = client.update_webhook(&name, url.as_deref()).await?;
            render(outcome, format, render_status)
        }
        WebhookCommands::Delete { url } => {
            info!(explicit_url = url.is_some(), "Deleting webhook");
            let outcome = client.delete_webhook(url.as_deref()).await?;
            render(outcome, format, render_status)
        }
    }
}

/// Execute messages command
pub async fn execute_messages_command<T: Transport>(
    client: &DiscordClient<T>,
    action: MessageCommands,
    format: OutputFormat,
) -> Result<String, CliError> {
    match action {
        MessageCommands::Send { content, image_url } => {
            info!(with_image = image_url.is_some(), "Sending message");
            let outcome = client.send_message(&content, image_url.as_deref()).await?;
            render(outcome, format, |id: &MessageId| id.to_string())
        }
        MessageCommands::Edit {
            message_id,
            content,
        } => {
            info!(message_id = %message_id, "Editing message");
            let outcome = client.edit_message(&message_id, &content).await?;
            render(outcome, format, render_status)
        }
        MessageCommands::Delete { message_id } => {
            info!(message_id = %message_id, "Deleting message");
            let outcome = client.delete_message(&message_id).await?;
            render(outcome, format, render_status)
        }
        MessageCommands::Get { message_id } => {
            info!(message_id = %message_id, "Fetching message");
            let outcome = client.get_message(&message_id).await?;
            render(outcome, format, render_message)
        }
    }
}

/// Execute pins command
pub async fn execute_pins_command<T: Transport>(
    client: &DiscordClient<T>,
    action: PinCommands,
    format: OutputFormat,
) -> Result<String, CliError> {
    match action {
        PinCommands::List => {
            info!("Listing pinned messages");
            let outcome = client.get_pinned_messages().await?;
            render(outcome, format, |ids: &Vec<MessageId>| {
                if ids.is_empty() {
                    return "No pinned messages".to_string();
                }
                ids.iter()
                    .map(MessageId::to_string)
                    .collect::<Vec<_>>()
                    .join("\n")
            })
        }
        PinCommands::Add { message_id } => {
            info!(message_id = %message_id, "Pinning message");
            let outcome = client.pin_message(&message_id).await?;
            render(outcome, format, render_status)
        }
        PinCommands::Remove { message_id } => {
            info!(message_id = %message_id, "Unpinning message");
            let outcome = client.unpin_message(&message_id).await?;
            render(outcome, format, render_status)
        }
    }
}

// ============================================================================
// Output Rendering
// ============================================================================

/// Render a success payload, turning rejections and preconditions into errors.
fn render<T: Serialize>(
    outcome: ApiOutcome<T>,
    format: OutputFormat,
    text: impl FnOnce(&T) -> String,
) -> Result<String, CliError> {
    match outcome {
        ApiOutcome::Success(value) => match format {
            OutputFormat::Text => Ok(text(&value)),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&value)?),
        },
        ApiOutcome::Failure(status) => Err(CliError::Rejected { status }),
        ApiOutcome::Precondition(reason) => Err(CliError::Precondition(reason)),
    }
}

fn render_status(status: &u16) -> String {
    format!("OK ({})", status)
}

fn render_webhook(webhook: &Webhook) -> String {
    format!(
        "id: {}\nname: {}\nchannel_id: {}\nurl: {}",
        webhook.id,
        webhook.name.as_deref().unwrap_or("-"),
        webhook
            .channel_id
            .as_ref()
            .map(|channel| channel.to_string())
            .unwrap_or_else(|| "-".to_string()),
        webhook.url.as_deref().unwrap_or("-"),
    )
}

fn render_message(message: &Message) -> String {
    let mut lines = vec![format!("[{}] {}", message.id, message.content)];
    if message.pinned {
        lines.push("pinned".to_string());
    }
    for image in message.embeds.iter().filter_map(|embed| embed.image.as_ref()) {
        lines.push(format!("image: {}", image.url));
    }
    lines.join("\n")
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
