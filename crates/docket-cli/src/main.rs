//! docket console shell.
//!
//! Wires a [`LoopbackGateway`] to a rustyline loop so the report
//! engine can be driven from a terminal. Plain lines become text
//! events from the simulated actor; slash commands steer the
//! simulation:
//!
//! - `/actor <id>` speaks as a different actor
//! - `/react <glyph>` reacts to the most recent prompt
//! - `/quit` exits
//!
//! `report ...` lines invoke the command layer; everything the
//! engine sends back prints as `bot>` lines. This is a demo shell
//! around the engine, not a chat transport.

mod config;

use anyhow::Result;
use clap::Parser;
use config::DocketConfig;
use docket_gateway::{LoopbackGateway, Outbound};
use docket_report::{
    CommandError, DispatchRegistry, EditTarget, MemoryStore, NotFoundKind, ReportCommands,
};
use docket_types::{ActorId, ChannelId, MessageId, ReportId};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// docket - conversational moderation-report console
#[derive(Parser, Debug)]
#[command(name = "docket")]
#[command(version, about, long_about = None)]
struct Args {
    /// Config file path
    #[arg(long, default_value = "docket.toml")]
    config: PathBuf,

    /// Actor id to speak as (overrides the config file)
    #[arg(long)]
    actor: Option<u64>,

    /// Channel id to simulate (overrides the config file)
    #[arg(long)]
    channel: Option<u64>,

    /// Owner actor id, exempt from session serialization
    #[arg(long)]
    owner: Option<u64>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

/// What the readline thread hands to the async loop.
enum ReadlineEvent {
    Line(String),
    Eof,
}

/// One parsed `report ...` line.
#[derive(Debug)]
enum ReportCommand {
    New,
    Show(ReportId),
    Info(String),
    Edit(ReportId, EditTarget),
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = DocketConfig::load(&args.config)?;

    // RUST_LOG wins; --debug beats the config default.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if args.debug {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new(&config.log_filter)
        }
    });
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(filter)
        .init();

    let owner = args.owner.or(config.owner).map(ActorId::new);
    let mut actor = ActorId::new(args.actor.unwrap_or(config.actor));
    let channel = ChannelId::new(args.channel.unwrap_or(config.channel));

    let (gateway, mut outbound) = LoopbackGateway::new(64);
    let gateway = Arc::new(gateway);
    let store = Arc::new(MemoryStore::new());
    let commands = Arc::new(
        ReportCommands::new(Arc::clone(&gateway), store, owner)
            .with_staff(config.staff.iter().copied().map(ActorId::new).collect()),
    );
    let registry = Arc::new(DispatchRegistry::with_defaults());

    // Command tasks report back through this channel so their output
    // interleaves cleanly with outbound gateway traffic.
    let (say_tx, mut say_rx) = tokio::sync::mpsc::unbounded_channel::<String>();

    let mut lines = spawn_readline_thread();
    let mut last_prompt: Option<MessageId> = None;

    println!("docket v{}", env!("CARGO_PKG_VERSION"));
    println!("Speaking as {actor} in {channel}. `report new` starts an intake, `/quit` exits.");

    loop {
        tokio::select! {
            event = lines.recv() => {
                match event {
                    Some(ReadlineEvent::Line(line)) => {
                        let line = line.trim();
                        if line.is_empty() {
                            continue;
                        }
                        if line == "/quit" || line == "/exit" {
                            break;
                        }
                        if let Some(rest) = line.strip_prefix("/actor") {
                            match rest.trim().parse::<u64>() {
                                Ok(id) => {
                                    actor = ActorId::new(id);
                                    println!("Now speaking as {actor}.");
                                }
                                Err(_) => println!("Usage: /actor <id>"),
                            }
                            continue;
                        }
                        if let Some(glyph) = line.strip_prefix("/react") {
                            match last_prompt {
                                Some(message) => {
                                    gateway.inject_reaction(actor, message, glyph.trim());
                                }
                                None => println!("Nothing to react to yet."),
                            }
                            continue;
                        }
                        if line == "report" || line.starts_with("report ") {
                            let rest = &line["report".len()..];
                            match parse_report_command(rest) {
                                Ok(command) => dispatch_command(
                                    command,
                                    actor,
                                    channel,
                                    &commands,
                                    &registry,
                                    &say_tx,
                                ),
                                Err(usage) => println!("{usage}"),
                            }
                            continue;
                        }
                        gateway.inject_text(actor, channel, line);
                    }
                    Some(ReadlineEvent::Eof) | None => break,
                }
            }
            item = outbound.recv() => {
                match item {
                    Some(Outbound::Prompt { handle, text }) => {
                        last_prompt = Some(handle.message);
                        println!("bot> {text}");
                    }
                    Some(Outbound::Glyph { glyph, .. }) => {
                        println!("     [{glyph}]");
                    }
                    None => break,
                }
            }
            Some(text) = say_rx.recv() => {
                println!("bot> {text}");
            }
        }
    }

    tracing::debug!("console shutting down");
    Ok(())
}

fn parse_report_command(rest: &str) -> Result<ReportCommand, String> {
    const USAGE: &str = "Usage: report new | report id <n> | report info <user> | report edit <n> <field>";

    let mut words = rest.split_whitespace();
    match words.next() {
        Some("new") => Ok(ReportCommand::New),
        Some("id") => {
            let id = words
                .next()
                .and_then(|w| w.parse::<u64>().ok())
                .ok_or_else(|| USAGE.to_string())?;
            Ok(ReportCommand::Show(ReportId::new(id)))
        }
        Some("info") => {
            let subject = words.next().ok_or_else(|| USAGE.to_string())?;
            Ok(ReportCommand::Info(subject.to_string()))
        }
        Some("edit") => {
            let id = words
                .next()
                .and_then(|w| w.parse::<u64>().ok())
                .ok_or_else(|| USAGE.to_string())?;
            // Field names may contain a space ("image links").
            let field = words.collect::<Vec<_>>().join(" ");
            let target = EditTarget::parse(&field).ok_or_else(|| {
                DispatchRegistry::with_defaults()
                    .resolve(&CommandError::NotFound(NotFoundKind::Field))
                    .unwrap_or_else(|| USAGE.to_string())
            })?;
            Ok(ReportCommand::Edit(ReportId::new(id), target))
        }
        _ => Err(USAGE.to_string()),
    }
}

/// Runs one command as a task so the console stays responsive while
/// an intake session waits for replies.
fn dispatch_command(
    command: ReportCommand,
    actor: ActorId,
    channel: ChannelId,
    commands: &Arc<ReportCommands<LoopbackGateway, MemoryStore>>,
    registry: &Arc<DispatchRegistry>,
    say_tx: &tokio::sync::mpsc::UnboundedSender<String>,
) {
    let commands = Arc::clone(commands);
    let registry = Arc::clone(registry);
    let say = say_tx.clone();
    tokio::spawn(async move {
        let result = match command {
            ReportCommand::New => commands.new_report(actor, channel).await,
            ReportCommand::Show(id) => commands.show(actor, id).await,
            ReportCommand::Info(subject) => commands.info(actor, &subject).await,
            ReportCommand::Edit(id, target) => commands.edit(actor, channel, id, target).await,
        };
        let text = match result {
            Ok(text) => Some(text),
            Err(error) => registry.resolve(&error),
        };
        if let Some(text) = text {
            // The console may already be gone on shutdown.
            let _ = say.send(text);
        }
    });
}

/// Runs rustyline on a dedicated OS thread feeding the async loop.
///
/// History persists to `.docket_history` in the working directory,
/// saved after every line.
fn spawn_readline_thread() -> tokio::sync::mpsc::UnboundedReceiver<ReadlineEvent> {
    let (event_tx, event_rx) = tokio::sync::mpsc::unbounded_channel();

    if let Err(e) = std::thread::Builder::new()
        .name("docket-readline".into())
        .spawn(move || {
            let config = rustyline::Config::builder().auto_add_history(true).build();
            let mut rl = match rustyline::DefaultEditor::with_config(config) {
                Ok(editor) => editor,
                Err(e) => {
                    tracing::error!(error = %e, "failed to create readline editor");
                    let _ = event_tx.send(ReadlineEvent::Eof);
                    return;
                }
            };

            let history = PathBuf::from(".docket_history");
            if let Err(e) = rl.load_history(&history) {
                tracing::debug!(error = %e, "no readline history loaded");
            }

            loop {
                match rl.readline("docket> ") {
                    Ok(line) => {
                        let _ = rl.save_history(&history);
                        if event_tx.send(ReadlineEvent::Line(line)).is_err() {
                            break;
                        }
                    }
                    // Ctrl+C clears the current line and keeps going.
                    Err(rustyline::error::ReadlineError::Interrupted) => continue,
                    Err(rustyline::error::ReadlineError::Eof) => {
                        let _ = event_tx.send(ReadlineEvent::Eof);
                        break;
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "readline failed");
                        let _ = event_tx.send(ReadlineEvent::Eof);
                        break;
                    }
                }
            }

            let _ = rl.save_history(&history);
        })
    {
        tracing::error!(error = %e, "failed to spawn readline thread");
    }

    event_rx
}
