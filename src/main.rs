// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{warn, info, debug, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use std::time::Duration;
use clap::{Args, Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};
use tokio_util::sync::CancellationToken;

use cuedub::app_config::{self, Config, SpeechEngineKind, TranslationProvider};
use cuedub::clock::{self, ClockOptions, PausePoint};
use cuedub::cue_index::CueIndex;
use cuedub::cue_track::CueTrack;
use cuedub::orchestrator::{SessionContext, SpeechOrchestrator};
use cuedub::session::PlaybackSession;
use cuedub::{language_utils, providers, speech, timecode};

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Google,
    Mock,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Google => TranslationProvider::Google,
            CliTranslationProvider::Mock => TranslationProvider::Mock,
        }
    }
}

/// CLI Wrapper for SpeechEngineKind to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliSpeechEngine {
    Log,
    Command,
}

impl From<CliSpeechEngine> for SpeechEngineKind {
    fn from(cli_engine: CliSpeechEngine) -> Self {
        match cli_engine {
            CliSpeechEngine::Log => SpeechEngineKind::Log,
            CliSpeechEngine::Command => SpeechEngineKind::Command,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// Options shared by every command that reads the configuration
#[derive(Args, Debug)]
struct ConfigArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Source language code (e.g., 'en', 'es', 'fr')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g., 'pt-BR', 'es', 'fr')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Speech engine to use
    #[arg(short, long, value_enum)]
    engine: Option<CliSpeechEngine>,

    /// Voice name to speak with
    #[arg(long)]
    voice: Option<String>,
}

#[derive(Args, Debug)]
struct PlayArgs {
    /// Cue track to play
    #[arg(value_name = "TRACK")]
    track: PathBuf,

    #[command(flatten)]
    config: ConfigArgs,

    /// Translate and speak every new cue
    #[arg(short = 'T', long)]
    translate: bool,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Playback speed multiplier
    #[arg(long)]
    speed: Option<f32>,

    /// Start position (seconds or HH:MM:SS.mmm)
    #[arg(long, value_parser = parse_position)]
    start: Option<f64>,

    /// Pause playback at this position; may be repeated
    #[arg(long = "pause-at", value_parser = parse_position)]
    pause_at: Vec<f64>,

    /// How long each pause lasts, in milliseconds
    #[arg(long, default_value_t = 2000)]
    pause_ms: u64,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Play a cue track against a simulated clock
    Play(PlayArgs),

    /// Parse a cue track and list its cues
    Cues {
        /// Cue track to read
        #[arg(value_name = "TRACK")]
        track: PathBuf,
    },

    /// Show the cue active at a position
    Lookup {
        /// Cue track to read
        #[arg(value_name = "TRACK")]
        track: PathBuf,

        /// Position (seconds or HH:MM:SS.mmm)
        #[arg(value_name = "TIME", value_parser = parse_position)]
        time: f64,
    },

    /// List the voices available for the target language
    Voices(ConfigArgs),

    /// Generate shell completions for cuedub
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// cuedub - spoken translations for timed subtitles
///
/// Follows a playback clock through a cue track, translates each new cue
/// and speaks the translation.
#[derive(Parser, Debug)]
#[command(name = "cuedub")]
#[command(version)]
#[command(about = "Translate and speak subtitle cues as they appear")]
#[command(long_about = "cuedub follows a playback clock through a cue track and speaks a translation of every new cue.

EXAMPLES:
    cuedub cues talk.vtt                          # List the cues of a track
    cuedub lookup talk.vtt 00:01:02.500           # Show the cue active at a position
    cuedub play talk.vtt                          # Show cues as they appear
    cuedub play -T talk.vtt                       # Translate and speak with the default config
    cuedub play -T -t es -e command talk.vtt      # Speak Spanish through espeak-ng
    cuedub play -T --pause-at 12 talk.vtt         # Pause for two seconds at 12s
    cuedub voices -t pt-BR -e command             # Voices for Brazilian Portuguese
    cuedub completions bash > cuedub.bash         # Generate bash completions

CONFIGURATION:
    Configuration is read from conf.json by default. You can specify a different
    config file with --config-path. Defaults are used when the file is missing.

SUPPORTED PROVIDERS:
    google - Public Google translate endpoint
    mock   - Offline provider that tags text with the target language")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color code for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let level = record.level();

            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {} {}\x1B[0m",
                Self::get_color_for_level(level),
                now,
                Self::get_emoji_for_level(level),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Accept either plain seconds or a timestamp
fn parse_position(value: &str) -> Result<f64, String> {
    if value.contains(':') {
        return timecode::parse(value).map_err(|e| e.to_string());
    }
    value
        .parse::<f64>()
        .ok()
        .filter(|seconds| seconds.is_finite() && *seconds >= 0.0)
        .ok_or_else(|| format!("Invalid position '{}'", value))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger with the widest level; the effective level
    // is set once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "cuedub", &mut std::io::stdout());
            Ok(())
        }
        Commands::Cues { track } => run_cues(&track),
        Commands::Lookup { track, time } => run_lookup(&track, time),
        Commands::Voices(args) => run_voices(args).await,
        Commands::Play(args) => run_play(args).await,
    }
}

/// Load the configuration, apply CLI overrides and validate the result
fn load_config(args: &ConfigArgs) -> Result<Config> {
    if let Some(log_level) = &args.log_level {
        let level: app_config::LogLevel = log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let config_path = &args.config_path;
    let mut config = if Path::new(config_path).exists() {
        Config::from_file(config_path)?
    } else {
        warn!("Config file not found at '{}', using defaults.", config_path);
        Config::default()
    };

    if let Some(source_lang) = &args.source_language {
        config.source_language = source_lang.clone();
    }
    if let Some(target_lang) = &args.target_language {
        config.target_language = target_lang.clone();
    }
    if let Some(engine) = &args.engine {
        config.speech.engine = engine.clone().into();
    }
    if let Some(voice) = &args.voice {
        config.speech.voice = Some(voice.clone());
    }
    if let Some(log_level) = &args.log_level {
        config.log_level = log_level.clone().into();
    }

    config.validate().context("Configuration validation failed")?;

    if args.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    Ok(config)
}

fn read_track(path: &Path) -> Result<CueTrack> {
    CueTrack::from_file(path).with_context(|| format!("Failed to load cue track: {:?}", path))
}

fn run_cues(path: &Path) -> Result<()> {
    let track = read_track(path)?;
    print!("{}", track);
    for cue in &track {
        println!("{}", cue);
    }
    Ok(())
}

fn run_lookup(path: &Path, time: f64) -> Result<()> {
    let index = CueIndex::new(read_track(path)?);

    match index.lookup(time) {
        Some(cue) => println!("{}", cue),
        None => info!("No cue at {}", timecode::format(time)),
    }
    Ok(())
}

async fn run_voices(args: ConfigArgs) -> Result<()> {
    let config = load_config(&args)?;
    let engine = speech::from_config(&config.speech);

    let voices = engine
        .voices()
        .await
        .map_err(|e| anyhow!("Failed to list voices: {}", e))?;
    if voices.is_empty() {
        warn!("The {:?} speech engine does not list voices", config.speech.engine);
        return Ok(());
    }

    let language = language_utils::get_language_name(&config.target_language)
        .unwrap_or_else(|_| config.target_language.clone());
    info!("Voices for {}:", language);
    for voice in speech::voices_for_language(&voices, &config.target_language) {
        println!("{}\t{}", voice.name, voice.language);
    }
    Ok(())
}

async fn run_play(options: PlayArgs) -> Result<()> {
    let mut config = load_config(&options.config)?;
    if let Some(provider) = &options.provider {
        config.translation.provider = provider.clone().into();
    }
    if let Some(speed) = options.speed {
        config.playback.speed = speed;
    }
    if options.translate {
        config.translation_enabled = true;
    }
    config.validate().context("Configuration validation failed")?;

    let track = read_track(&options.track)?;
    if track.is_empty() {
        warn!("Cue track {:?} has no cues", options.track);
    }

    let translator = providers::from_config(&config.translation);
    if config.translation_enabled {
        info!(
            "Translating {} → {} with {}",
            config.source_language,
            config.target_language,
            config.translation.provider.display_name()
        );
        if let Err(e) = translator.test_connection().await {
            warn!("Translation provider check failed: {}", e);
        }
    }

    let engine = speech::from_config(&config.speech);
    let mut context = SessionContext::from_config(&config);
    if let Some(voice) = speech::select_voice(
        engine.as_ref(),
        &config.target_language,
        config.speech.voice.as_deref(),
    )
    .await
    {
        context.voice = Some(voice.name);
    }

    let duration = track.duration();
    let orchestrator = SpeechOrchestrator::new(context, translator, engine, config.translation_enabled);
    let mut session = PlaybackSession::with_track(track, orchestrator);

    let mut clock_options = ClockOptions::new(
        duration,
        Duration::from_millis(config.playback.tick_interval_ms),
    );
    clock_options.speed = f64::from(config.playback.speed);
    clock_options.start_at = options.start.unwrap_or(0.0);
    clock_options.pause_points = options
        .pause_at
        .iter()
        .map(|&at| PausePoint { at, hold: Duration::from_millis(options.pause_ms) })
        .collect();

    let cancel = CancellationToken::new();
    let events = clock::spawn_clock(clock_options, cancel.clone());
    debug!("Playing {:?} ({})", options.track, timecode::format(duration));

    tokio::select! {
        _ = session.run(events) => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted");
            cancel.cancel();
            session.shutdown();
        }
    }

    Ok(())
}
