use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use subcue::config::{Config, LineJoin, OutputFormat};
use subcue::playback::{track_end, CaptionChange, CaptionTracker, PlaybackClock};
use subcue::source::open_source;
use subcue::subtitle::{
    create_formatter, format_timestamp, json::JsonFormatter, SubtitleFormatter,
};
use subcue::{CaptionStore, SubtitleLoader};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "subcue")]
#[command(version, about = "Parse WebVTT/SRT captions and look up the active cue")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Keep <...> tags in caption text
    #[arg(long, global = true)]
    keep_markup: bool,

    /// Join multi-line payloads with: newline, space
    #[arg(long, global = true)]
    join: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the parsed cue list
    Parse {
        /// Subtitle file path or http(s) URL
        source: String,

        /// Output format: srt, vtt, json
        #[arg(short, long, default_value = "srt")]
        format: String,
    },
    /// Print the caption active at each time (seconds)
    At {
        /// Subtitle file path or http(s) URL
        source: String,

        #[arg(required = true)]
        times: Vec<f64>,
    },
    /// Play the track against a wall clock, printing caption changes
    Follow {
        /// Subtitle file path or http(s) URL
        source: String,

        /// Start position in seconds
        #[arg(long, default_value = "0")]
        from: f64,

        /// Playback rate
        #[arg(long, default_value = "1.0")]
        rate: f64,

        /// Clock tick interval in milliseconds
        #[arg(long, default_value = "100")]
        tick_ms: u64,
    },
}

impl Command {
    fn source(&self) -> &str {
        match self {
            Command::Parse { source, .. }
            | Command::At { source, .. }
            | Command::Follow { source, .. } => source,
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

/// Config file and environment first, command-line flags on top.
fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load().context("Failed to load configuration")?;

    if cli.keep_markup {
        config.strip_markup = false;
    }
    if let Some(ref join) = cli.join {
        config.line_join = join
            .parse::<LineJoin>()
            .map_err(|e: String| anyhow::anyhow!(e))?;
    }

    config
        .validate()
        .context("Configuration validation failed")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config = resolve_config(&cli)?;
    let location = cli.command.source();

    let source = open_source(location, &config)
        .with_context(|| format!("Cannot open subtitle source {}", location))?;
    let loader = SubtitleLoader::new(source).with_options(config.parse_options());

    let mut store = CaptionStore::new();
    let count = loader
        .load(location, &mut store)
        .await
        .with_context(|| format!("Failed to load subtitles from {}", location))?;
    debug!("{} cues from {}", count, location);

    match cli.command {
        Command::Parse { ref format, .. } => {
            let format: OutputFormat = format.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            let output = match format {
                OutputFormat::Json => JsonFormatter {
                    source: Some(location.to_string()),
                }
                .format(store.cues()),
                other => create_formatter(other).format(store.cues()),
            };
            print!("{}", output);
        }
        Command::At { ref times, .. } => {
            for &time in times {
                let caption = store.caption_at(time)?;
                println!(
                    "{}\t{}",
                    format_timestamp(time, '.'),
                    caption.replace('\n', " / ")
                );
            }
        }
        Command::Follow {
            from,
            rate,
            tick_ms,
            ..
        } => follow(&store, from, rate, tick_ms).await?,
    }

    Ok(())
}

/// Advance a clock over the track until it ends or Ctrl+C, printing changes.
async fn follow(store: &CaptionStore, from: f64, rate: f64, tick_ms: u64) -> Result<()> {
    if !(rate.is_finite() && rate > 0.0) {
        anyhow::bail!("Playback rate must be a positive number, got {}", rate);
    }

    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&interrupted);
    ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
        .context("Failed to install Ctrl+C handler")?;

    let end = track_end(store.cues());
    let clock = PlaybackClock::start(from, rate);
    let mut tracker = CaptionTracker::new();
    let mut ticker = tokio::time::interval(Duration::from_millis(tick_ms.max(1)));

    info!("Following {} cues from {:.3}s at {}x", store.len(), from, rate);

    loop {
        ticker.tick().await;

        if interrupted.load(Ordering::SeqCst) {
            info!("Interrupted");
            break;
        }

        let position = clock.position();
        match tracker.update(store, position)? {
            Some(CaptionChange::Show(text)) => println!(
                "[{}] {}",
                format_timestamp(position, '.'),
                text.replace('\n', " / ")
            ),
            Some(CaptionChange::Hide) => println!("[{}] -", format_timestamp(position, '.')),
            None => {}
        }

        if position >= end {
            break;
        }
    }

    Ok(())
}
