// emotion — command-line front end for the emotion engine.
// Every invocation opens the SQLite store, loads the user's vector, runs one
// command and writes the vector back, so state carries across invocations.

use chrono::Utc;
use clap::{Parser, Subcommand};
use emotion_engine::engine::paths;
use emotion_engine::{
    analyze_emotion, render, EmotionEngine, EmotionKind, EngineConfig, EngineResult, EventMemory,
    EventMemoryEntry, ProcessedEvent, SqliteEmotionStore, UserEmotionVector,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "emotion", version, about = "Track per-user emotional state from conversation events")]
struct Cli {
    /// SQLite database path (overrides config)
    #[arg(long, global = true, env = "EMOTION_DB")]
    db: Option<PathBuf>,

    /// TOML config file
    #[arg(long, global = true, env = "EMOTION_CONFIG")]
    config: Option<PathBuf>,

    /// Log filter (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Feed one event for a user (decays first, replays quoted "上次" references)
    Event {
        user: String,
        text: String,
        /// Detected emotion; inferred from the text when omitted
        #[arg(long)]
        emotion: Option<EmotionKind>,
    },
    /// Show the user's current emotional state
    Show { user: String },
    /// Apply time decay and persist the result
    Tick { user: String },
    /// Re-live the latest remembered event matching a keyword
    Replay { user: String, keyword: String },
    /// List remembered events, newest last
    History {
        user: String,
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Apply today's anniversary boost
    Boost { user: String, count: usize },
}

/// `event` output: an optional replay triggered by the text, then the event.
#[derive(Serialize)]
struct EventReport<'a> {
    replayed: Option<&'a EventMemoryEntry>,
    #[serde(flatten)]
    outcome: &'a ProcessedEvent,
}

struct Context {
    engine: EmotionEngine,
    store: Arc<SqliteEmotionStore>,
    json: bool,
}

impl Context {
    fn open(cli: &Cli) -> EngineResult<Self> {
        let config_path = cli.config.clone().unwrap_or_else(paths::config_path);
        let mut config = EngineConfig::load(&config_path)?;
        if let Some(db) = &cli.db {
            config.db_path = Some(db.clone());
        }
        let store = Arc::new(SqliteEmotionStore::from_config(&config)?);
        let engine = EmotionEngine::with_config(EventMemory::new(store.clone()), config);
        Ok(Self {
            engine,
            store,
            json: cli.json,
        })
    }

    fn load(&self, user: &str) -> EngineResult<UserEmotionVector> {
        Ok(self
            .store
            .load_vector(user)?
            .unwrap_or_else(|| UserEmotionVector::new(user)))
    }

    fn emit<T: Serialize>(&self, value: &T, human: impl FnOnce() -> String) -> EngineResult<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{}", human());
        }
        Ok(())
    }
}

fn main() {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .init();

    if let Err(e) = run(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> EngineResult<()> {
    let ctx = Context::open(&cli)?;
    let now = Utc::now();

    match cli.command {
        Command::Event {
            user,
            text,
            emotion,
        } => {
            let detected = emotion.unwrap_or_else(|| analyze_emotion(&text));
            let mut vector = ctx.load(&user)?;
            ctx.engine.apply_time_decay(&mut vector, now);
            let replayed = ctx.engine.replay_from_text(&user, &mut vector, &text, now)?;
            let outcome = ctx
                .engine
                .process_event_detailed(&user, &mut vector, &text, detected, now)?;
            ctx.store.save_vector(&vector)?;
            let report = EventReport {
                replayed: replayed.as_ref(),
                outcome: &outcome,
            };
            ctx.emit(&report, || {
                let replay_line = match &replayed {
                    Some(entry) => format!(
                        "Replayed \"{}\": {} {:+.3}\n",
                        entry.event, entry.kind, entry.intensity
                    ),
                    None => String::new(),
                };
                let deltas: Vec<String> = outcome
                    .changes
                    .iter()
                    .map(|(kind, delta)| format!("{} {:+.3}", kind, delta))
                    .collect();
                format!(
                    "{}{} (detected {}): {} [fatigue x{}, surprise x{}]",
                    replay_line,
                    outcome.category,
                    detected,
                    deltas.join(", "),
                    outcome.fatigue_factor,
                    outcome.surprise_factor
                )
            })
        }
        Command::Show { user } => {
            let vector = ctx.load(&user)?;
            let snapshot = render(&vector, now);
            ctx.emit(&snapshot, || {
                let mut lines = vec![format!(
                    "{}: {} {:.3} (tone: {})",
                    snapshot.user_id, snapshot.primary, snapshot.intensity, snapshot.tone
                )];
                lines.extend(
                    snapshot
                        .all
                        .iter()
                        .map(|(kind, value)| format!("  {:<9} {:.3}", kind.as_str(), value)),
                );
                lines.push(snapshot.summary.clone());
                lines.join("\n")
            })
        }
        Command::Tick { user } => {
            let mut vector = ctx.load(&user)?;
            ctx.engine.apply_time_decay(&mut vector, now);
            ctx.store.save_vector(&vector)?;
            let active = vector.active(now);
            ctx.emit(&active, || format!("Decayed {} kinds for {}", vector.len(), user))
        }
        Command::Replay { user, keyword } => {
            let mut vector = ctx.load(&user)?;
            let hit = ctx.engine.replay(&user, &mut vector, &keyword, now)?;
            if hit.is_some() {
                ctx.store.save_vector(&vector)?;
            }
            ctx.emit(&hit, || match &hit {
                Some(entry) => format!(
                    "Replayed \"{}\": {} {:+.3}",
                    entry.event, entry.kind, entry.intensity
                ),
                None => format!("No memory matching \"{}\"", keyword),
            })
        }
        Command::History { user, limit } => {
            let entries = ctx.engine.memory().entries(&user)?;
            let skip = entries.len().saturating_sub(limit);
            let recent = &entries[skip..];
            ctx.emit(&recent, || {
                if recent.is_empty() {
                    return format!("No events remembered for {}", user);
                }
                recent
                    .iter()
                    .map(|e| {
                        format!(
                            "{}  {:<10} {:<9} {:.3}  {}",
                            e.timestamp.format("%Y-%m-%d %H:%M"),
                            e.category.as_str(),
                            e.kind.as_str(),
                            e.intensity,
                            e.event
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            })
        }
        Command::Boost { user, count } => {
            let mut vector = ctx.load(&user)?;
            let boost = ctx.engine.apply_anniversary_boost(&mut vector, count, now);
            ctx.store.save_vector(&vector)?;
            ctx.emit(&boost, || format!("HAPPY +{:.2} for {}", boost, user))
        }
    }
}
