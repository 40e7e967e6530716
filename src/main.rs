//! Wren - A tiny status composer
#![allow(clippy::uninlined_format_args)]

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use wren::api::{LocalApi, StatusApi};
use wren::models::{Item, relative_time};
use wren::{ComposeEvent, ComposeSession, Config, Database, EventOutcome, ListUpdate};

/// Width used when wrapping previous statuses
const WRAP_WIDTH: usize = 60;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (RUST_LOG=debug for verbose output)
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Parse CLI arguments
    match parse_args()? {
        Command::Compose { initial } => compose(initial).await,
        Command::Post { content } => post_cli(&content).await,
        Command::History { limit, json } => history_cli(limit, json).await,
        Command::Clear => clear_cli().await,
        Command::Config { init } => config_cli(init),
        Command::Help => {
            print_help();
            Ok(())
        }
        Command::Version => {
            print_version();
            Ok(())
        }
    }
}

/// CLI commands
enum Command {
    Compose { initial: Option<String> },
    Post { content: String },
    History { limit: usize, json: bool },
    Clear,
    Config { init: bool },
    Help,
    Version,
}

fn parse_args() -> Result<Command> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() == 1 {
        return Ok(Command::Compose { initial: None });
    }

    match args[1].as_str() {
        "-h" | "--help" | "help" => Ok(Command::Help),
        "-v" | "--version" | "version" => Ok(Command::Version),

        "compose" => Ok(Command::Compose {
            initial: args.get(2).cloned(),
        }),

        "post" => {
            let content = args
                .get(2)
                .ok_or_else(|| anyhow::anyhow!("Missing status content"))?
                .clone();
            Ok(Command::Post { content })
        }

        "history" => {
            let json = args.iter().any(|a| a == "--json");
            let limit = args
                .iter()
                .position(|a| a == "--limit" || a == "-l")
                .and_then(|i| args.get(i + 1))
                .and_then(|s| s.parse().ok())
                .unwrap_or(20);
            Ok(Command::History { limit, json })
        }

        "clear" => Ok(Command::Clear),

        "config" => Ok(Command::Config {
            init: args.get(2).is_some_and(|a| a == "init"),
        }),

        other => Err(anyhow::anyhow!(
            "Unknown command: {other}\nRun 'wren --help' for usage"
        )),
    }
}

fn print_help() {
    let config_path = Config::default_path()
        .map_or_else(|_| "Unknown".to_string(), |p| p.display().to_string());

    println!(
        r#"🐦 Wren - A tiny status composer

USAGE:
    wren                               Start composing
    wren [COMMAND]

COMMANDS:
    compose [text]                     Start composing, optionally pre-filled
    post <content>                     Post a status directly
    history [OPTIONS]                  Show previously posted statuses
      Options:
        -l, --limit <n>                Number of statuses (default: 20)
        --json                         Print as JSON
    clear                              Forget all previously posted statuses
    config [init]                      Show the configuration, or write the defaults

OPTIONS:
    -h, --help                         Show this help message
    -v, --version                      Show version information

WHILE COMPOSING:
    <text>          Replace the draft
    /send           Send the draft
    /clear          Discard the draft
    /keep on|off    Keep composing after sending
    /thread on|off  Post as a thread continuing the previous status
    /max <n>        Change the maximum length
    /forget         Forget previously posted statuses
    /quit           Stop composing
    //text          Draft starting with a slash

CONFIG:
    {}
"#,
        config_path
    );
}

fn print_version() {
    println!("wren {}", wren::VERSION);
}

/// A line typed while composing
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Event(ComposeEvent),
    Quit,
    Unknown(String),
}

fn parse_input(line: &str) -> Input {
    let line = line.trim_end_matches(['\r', '\n']);

    if let Some(text) = line.strip_prefix("//") {
        return Input::Event(ComposeEvent::StatusChanged(format!("/{text}")));
    }
    let Some(command) = line.strip_prefix('/') else {
        return Input::Event(ComposeEvent::StatusChanged(line.to_string()));
    };

    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let arg = parts.next();
    let toggle = |arg: Option<&str>| match arg {
        Some("on") => Some(true),
        Some("off") => Some(false),
        _ => None,
    };

    match (name, arg) {
        ("send", None) => Input::Event(ComposeEvent::Send),
        ("clear", None) => Input::Event(ComposeEvent::Clear),
        ("forget", None) => Input::Event(ComposeEvent::ClearHistory),
        ("quit" | "q", None) => Input::Quit,
        ("keep", arg) if toggle(arg).is_some() => {
            Input::Event(ComposeEvent::KeepOpenChanged(toggle(arg) == Some(true)))
        }
        ("thread", arg) if toggle(arg).is_some() => {
            Input::Event(ComposeEvent::EnableThreadChanged(toggle(arg) == Some(true)))
        }
        ("max", Some(n)) => match n.parse() {
            Ok(max) => Input::Event(ComposeEvent::MaxLengthChanged(max)),
            Err(_) => Input::Unknown(line.to_string()),
        },
        _ => Input::Unknown(line.to_string()),
    }
}

async fn compose(initial: Option<String>) -> Result<()> {
    let config = Config::load()?;
    let api = LocalApi::new(Database::open()?);
    let (adapter, mut updates) = wren::spawn_adapter();

    let renderer = tokio::spawn(async move {
        while let Some(update) = updates.recv().await {
            render(&update);
        }
    });

    let mut session = ComposeSession::new(api, adapter.clone(), config);
    session.start(initial).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let event = match parse_input(&line) {
            Input::Event(event) => event,
            Input::Quit => break,
            Input::Unknown(input) => {
                eprintln!("✗ Unknown command: {input}");
                continue;
            }
        };

        match session.handle(event).await {
            Ok(EventOutcome::Posted { tweet, close }) => {
                println!("✓ Posted #{}", tweet.id);
                if close {
                    break;
                }
            }
            Ok(EventOutcome::Rejected(reason)) => eprintln!("✗ {reason}"),
            Ok(EventOutcome::Updated | EventOutcome::Unchanged) => {}
            Err(e) => eprintln!("✗ {e:#}"),
        }
    }

    if session.has_unsent_draft() {
        eprintln!("Draft discarded");
    }

    // The renderer finishes once the adapter drops its update sender
    adapter.shutdown().await?;
    renderer.await?;
    Ok(())
}

fn render(update: &ListUpdate) {
    if update.script.is_empty() {
        return;
    }

    let ops: Vec<String> = update.script.iter().map(ToString::to_string).collect();
    println!("── revision {} [{}]", update.revision, ops.join(" "));

    for item in &update.items {
        match item {
            Item::PreviousStatus(previous) => {
                println!("│ #{} · {}", previous.id, relative_time(previous.created_at));
                for line in textwrap::wrap(&previous.text, WRAP_WIDTH) {
                    println!("│   {line}");
                }
            }
            Item::Editor(editor) => {
                let mut flags = Vec::new();
                if editor.keep_open {
                    flags.push("keep");
                }
                if editor.enable_thread {
                    flags.push("thread");
                }
                let marker = if editor.valid { "✓" } else { "·" };
                println!(
                    "> {} [{}/{}] {} {}",
                    editor.status,
                    editor.status_length,
                    editor.max_length,
                    marker,
                    flags.join(",")
                );
            }
        }
    }
}

async fn post_cli(content: &str) -> Result<()> {
    let config = Config::load()?;
    let info = wren::length::StatusInfo::check(content, config.max_status_length);
    if info.status.trim().is_empty() {
        return Err(anyhow::anyhow!("Status is empty"));
    }
    if !info.valid {
        return Err(anyhow::anyhow!(
            "Status is {} characters too long ({}/{})",
            -info.remaining(),
            info.length,
            info.max_length
        ));
    }

    let api = LocalApi::new(Database::open()?);
    let in_reply_to = if config.enable_thread {
        api.recent(1).await?.last().map(|t| t.id)
    } else {
        None
    };
    let tweet = api.post(content, in_reply_to).await?;
    println!("✓ Posted #{}", tweet.id);
    Ok(())
}

async fn history_cli(limit: usize, json: bool) -> Result<()> {
    let api = LocalApi::new(Database::open()?);
    let tweets = api.recent(limit).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&tweets)?);
        return Ok(());
    }

    if tweets.is_empty() {
        println!("No statuses posted yet.");
        return Ok(());
    }

    for tweet in tweets {
        println!("\n#{} · {}", tweet.id, tweet.relative_time());
        for line in textwrap::wrap(&tweet.text, WRAP_WIDTH) {
            println!("{line}");
        }
    }

    Ok(())
}

async fn clear_cli() -> Result<()> {
    let api = LocalApi::new(Database::open()?);
    api.clear().await?;
    println!("✓ History cleared");
    Ok(())
}

fn config_cli(init: bool) -> Result<()> {
    let path = Config::default_path()?;

    if init {
        if path.exists() {
            return Err(anyhow::anyhow!("Config already exists at {}", path.display()));
        }
        Config::default().save()?;
        println!("✓ Wrote default config to {}", path.display());
        return Ok(());
    }

    let config = Config::load()?;
    println!("# {}", path.display());
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_lines_replace_draft() {
        assert_eq!(
            parse_input("hello world"),
            Input::Event(ComposeEvent::StatusChanged("hello world".to_string()))
        );
        assert_eq!(
            parse_input("//etc/hosts"),
            Input::Event(ComposeEvent::StatusChanged("/etc/hosts".to_string()))
        );
    }

    #[test]
    fn test_commands() {
        assert_eq!(parse_input("/send"), Input::Event(ComposeEvent::Send));
        assert_eq!(parse_input("/quit"), Input::Quit);
        assert_eq!(
            parse_input("/keep off"),
            Input::Event(ComposeEvent::KeepOpenChanged(false))
        );
        assert_eq!(
            parse_input("/thread on"),
            Input::Event(ComposeEvent::EnableThreadChanged(true))
        );
        assert_eq!(
            parse_input("/max 140"),
            Input::Event(ComposeEvent::MaxLengthChanged(140))
        );
        assert_eq!(
            parse_input("/keep maybe"),
            Input::Unknown("/keep maybe".to_string())
        );
    }
}
