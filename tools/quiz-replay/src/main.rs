use std::collections::VecDeque;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use radar_quiz_core::prelude::*;
use tracing::{Level, debug, info};
use tracing_subscriber::{filter::FilterFn, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "quiz-replay",
    author,
    version,
    about = "Replay a scripted radar quiz session and print the effects it produces",
    long_about = "Loads a city's markers, feeds a JSON list of game events through a quiz \
                  session and prints every resulting effect as one JSON object per line.\n\n\
                  Marker fetches and dismiss timers requested by the session are carried out \
                  immediately and their results fed back before the next scripted event."
)]
struct Args {
    /// JSON file containing an array of game events
    #[arg(short, long)]
    script: PathBuf,

    /// City to load before the script runs (defaults to the first configured city)
    #[arg(short = 'C', long)]
    city: Option<String>,

    /// Game config JSON file; built-in defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start with the proximity check bypassed
    #[arg(long)]
    bypass: bool,

    /// Verbose output (show debug messages)
    #[arg(short, long)]
    verbose: bool,
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = FilterFn::new(move |meta| {
        *meta.level() <= level
            && (meta.module_path().unwrap_or_default().starts_with("radar_quiz")
                || meta.module_path().unwrap_or_default().starts_with("quiz_replay"))
    });
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .without_time();

    tracing_subscriber::registry().with(layer).with(filter).init();
}

fn print_effect(out: &mut impl Write, effect: &Effect) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string(effect)?)?;
    Ok(())
}

/// Run `events` through `session`, printing every effect. Fetches and dismiss
/// timers requested along the way are resolved immediately and their events
/// handled before the next scripted one.
async fn replay<F: DataFetcher>(
    session: &mut QuizSession,
    loader: &MarkerLoader<F>,
    events: Vec<GameEvent>,
    out: &mut impl Write,
) -> Result<()> {
    for effect in session.start() {
        print_effect(out, &effect)?;
    }

    let mut pending = VecDeque::from(events);
    while let Some(event) = pending.pop_front() {
        let mut follow_ups = Vec::new();

        for effect in session.dispatch(event) {
            print_effect(out, &effect)?;

            match effect {
                Effect::FetchMarkers { ticket, source } => {
                    follow_ups.push(loader.load(ticket, &source).await);
                }
                Effect::ScheduleDismiss { after_ms, token } => {
                    debug!(after_ms, ?token, "firing dismiss timer");
                    follow_ups.push(GameEvent::DismissTimerFired { token });
                }
                _ => {}
            }
        }

        for event in follow_ups.into_iter().rev() {
            pending.push_front(event);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose);

    let config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => GameConfig::default(),
    };

    let city = match &args.city {
        Some(city) => CityIdentifier::new(city),
        None => match config.cities.first() {
            Some(city) => city.id.clone(),
            None => bail!("No cities configured"),
        },
    };
    if !config.cities.iter().any(|c| c.id == city) {
        let known: Vec<_> = config.cities.iter().map(|c| c.id.to_string()).collect();
        bail!("Unknown city {city}; configured cities: {}", known.join(", "));
    }

    let script = std::fs::read_to_string(&args.script)
        .with_context(|| format!("Failed to read script {}", args.script.display()))?;
    let script: Vec<GameEvent> =
        serde_json::from_str(&script).context("Script must be a JSON array of game events")?;

    info!("=== Radar Quiz Replay ===");
    info!("City: {city}");
    info!("Script: {} ({} events)", args.script.display(), script.len());

    let mut session = QuizSession::new(config);
    let loader = MarkerLoader::new(SourceFetcher::default());
    let mut out = std::io::stdout().lock();

    let mut events = Vec::with_capacity(script.len() + 2);
    if args.bypass {
        events.push(GameEvent::BypassToggled { enabled: true });
    }
    events.push(GameEvent::CitySelected { city });
    events.extend(script);

    replay(&mut session, &loader, events, &mut out).await?;

    let score = session.score();
    info!("Score: {}/{}", score.correct, score.total);

    Ok(())
}
