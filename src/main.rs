use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use vodchat::config::Config;
use vodchat::links::{LinkRecognizer, TldSet};
use vodchat::search::{self, ChannelIndex, ChatMessage, ScrollAnchor};
use vodchat::twitch::{ApiClient, EmoteProvider, FetchError};
use vodchat::util::{human_file_size, sanitize_for_terminal, truncate_to_width};

/// Widest chat line printed before truncation.
const MAX_LINE_WIDTH: usize = 160;

/// Get the config directory path (~/.config/vodchat/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    let config_dir = PathBuf::from(home).join(".config").join("vodchat");
    Ok(config_dir)
}

#[derive(Parser, Debug)]
#[command(
    name = "vodchat",
    about = "Twitch VOD archive and chat-log toolkit",
    version
)]
struct Args {
    /// Config file (defaults to ~/.config/vodchat/config.toml)
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Find links in chat text
    Links {
        /// Text to scan; multiple arguments are joined with spaces
        #[arg(required = true)]
        text: Vec<String>,

        /// Print links as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search a chat log (JSON array of messages)
    Search {
        #[arg(long, value_name = "LOG.json")]
        file: PathBuf,

        /// Query: plain text (fuzzy), regex:, in:, channel:, from:, user:, username:
        #[arg(long, default_value = "")]
        query: String,

        /// Where the chat view is anchored: live, top or bottom
        #[arg(long, default_value = "live")]
        anchor: ScrollAnchor,

        /// Print at most this many messages
        #[arg(long, value_name = "N")]
        limit: Option<usize>,
    },

    /// List broadcasters in the VOD archive
    Users,

    /// Look up one broadcaster by login
    User { login: String },

    /// List emotes from a third-party provider (bttv, ffz, 7tv)
    Emotes {
        provider: EmoteProvider,

        /// Twitch user id; global emotes when omitted
        #[arg(long, value_name = "ID")]
        channel: Option<String>,
    },

    /// List chat badges
    Badges {
        /// Twitch user id; global badges when omitted
        #[arg(long, value_name = "ID")]
        channel: Option<String>,
    },

    /// Fuzzy-find archived chat-log channels by name
    Channels {
        query: String,

        /// Print matches as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing for debug logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => get_config_dir()?.join("config.toml"),
    };
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    match args.command {
        Command::Links { text, json } => run_links(&config, &text.join(" "), json),
        Command::Search {
            file,
            query,
            anchor,
            limit,
        } => run_search(&file, &query, anchor, limit),
        Command::Users => {
            let client = api_client(&config)?;
            let users = client.users().await.context("Failed to load users")?;
            for user in &users {
                println!(
                    "{:<25} {:<25} {:>10} followers{}",
                    user.login,
                    sanitize_for_terminal(&user.display_name),
                    user.followers,
                    if user.is_partner() { "  [partner]" } else { "" }
                );
            }
            println!("{} users", users.len());
            Ok(())
        }
        Command::User { login } => {
            let client = api_client(&config)?;
            match client.user(&login).await {
                Ok(user) => {
                    println!("{} ({})", sanitize_for_terminal(&user.display_name), user.login);
                    println!("  twitch id:  {}", user.twitch_id);
                    println!("  followers:  {}", user.followers);
                    if let Some(contract) = user.contract_type {
                        println!("  contract:   {contract:?}");
                    }
                    if let Some(description) = user.description.as_deref() {
                        println!(
                            "  about:      {}",
                            truncate_to_width(&sanitize_for_terminal(description), MAX_LINE_WIDTH)
                        );
                    }
                    for social in &user.socials {
                        println!("  {}: {}", social.title, social.url);
                    }
                    Ok(())
                }
                Err(FetchError::NotFound(login)) => {
                    eprintln!("User not found: {login}");
                    std::process::exit(2);
                }
                Err(e) => Err(e).context("Failed to load user"),
            }
        }
        Command::Emotes { provider, channel } => {
            let client = api_client(&config)?;
            let emotes = match channel.as_deref() {
                Some(id) => client.channel_emotes(provider, id).await,
                None => client.global_emotes(provider).await,
            }
            .with_context(|| format!("Failed fetching {provider} emotes"))?;

            for emote in &emotes {
                println!("{:<30} {}", sanitize_for_terminal(emote.label()), emote.id);
            }
            println!("{} {provider} emotes", emotes.len());
            Ok(())
        }
        Command::Badges { channel } => {
            let client = api_client(&config)?;
            let badges = match channel.as_deref() {
                Some(id) => client.channel_badges(id).await,
                None => client.global_badges().await,
            }
            .context("Failed fetching Twitch badges")?;

            for badge in &badges {
                println!("{}", badge.set_id);
                for version in &badge.versions {
                    println!("  {:<8} {}", version.id, sanitize_for_terminal(&version.title));
                }
            }
            Ok(())
        }
        Command::Channels { query, json } => {
            let client = api_client(&config)?;
            let channels = client
                .log_channels()
                .await
                .context("Failed to load log channels")?;
            let index = ChannelIndex::new(channels.into_iter().map(|c| c.name));
            let matches = index.search(&query);

            if json {
                println!("{}", serde_json::to_string_pretty(&matches)?);
            } else if matches.is_empty() {
                println!("No channel matches '{}' ({} indexed)", query, index.len());
            } else {
                for m in &matches {
                    println!("{:<25} {:.2}", m.name, m.score);
                }
            }
            Ok(())
        }
    }
}

fn api_client(config: &Config) -> Result<ApiClient> {
    ApiClient::new(&config.endpoints, config.request_timeout())
        .context("Invalid endpoint configuration")
}

fn run_links(config: &Config, text: &str, json: bool) -> Result<()> {
    let tlds = match &config.tld_file {
        Some(path) => TldSet::load(path)
            .with_context(|| format!("Failed to load TLD list from {}", path.display()))?,
        None => TldSet::builtin(),
    };
    let recognizer = LinkRecognizer::new(tlds);
    let links = recognizer.find_links(text);
    tracing::debug!(
        tlds = recognizer.tlds().len(),
        found = links.len(),
        "Scanned text for links"
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&links)?);
        return Ok(());
    }

    if links.is_empty() {
        println!("No links found");
    }
    for link in &links {
        println!(
            "{}\n  protocol: {}\n  host:     {}\n  rest:     {}",
            sanitize_for_terminal(link.link),
            if link.protocol.is_empty() { "-" } else { link.protocol },
            sanitize_for_terminal(link.host),
            sanitize_for_terminal(link.rest),
        );
    }
    Ok(())
}

fn run_search(file: &Path, query: &str, anchor: ScrollAnchor, limit: Option<usize>) -> Result<()> {
    let bytes = std::fs::read(file)
        .with_context(|| format!("Failed to read chat log: {}", file.display()))?;
    let messages: Vec<ChatMessage> = serde_json::from_slice(&bytes)
        .with_context(|| format!("Chat log is not a JSON array of messages: {}", file.display()))?;

    let results = search::search(query, &messages, anchor);
    tracing::debug!(query, ?anchor, matched = results.len(), "Search finished");

    let shown = limit.unwrap_or(results.len()).min(results.len());
    for message in &results[..shown] {
        let line = match message.channel.as_deref() {
            Some(channel) => format!(
                "{} [{}] {}: {}",
                message.timestamp, channel, message.display_name, message.text
            ),
            None => format!(
                "{} {}: {}",
                message.timestamp, message.display_name, message.text
            ),
        };
        println!(
            "{}",
            truncate_to_width(&sanitize_for_terminal(&line), MAX_LINE_WIDTH)
        );
    }

    println!(
        "{} of {} messages matched ({} log{})",
        results.len(),
        messages.len(),
        human_file_size(bytes.len() as u64),
        if shown < results.len() {
            format!(", showing {shown}")
        } else {
            String::new()
        }
    );
    Ok(())
}
