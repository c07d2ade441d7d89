// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{debug, error, info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use srtclip::app_config::{self, Config};
use srtclip::app_controller::Controller;
use srtclip::caption_processor::rows_from_records;
use srtclip::errors::AppError;

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

#[derive(Subcommand, Debug)]
enum Commands {
    /// Cut one clip per caption into an output directory
    Batch {
        /// Caption (.srt) file
        #[arg(value_name = "CAPTION")]
        caption: PathBuf,

        /// Audio file to cut
        #[arg(value_name = "AUDIO")]
        audio: PathBuf,

        /// Output directory (created if missing)
        #[arg(short, long, default_value = "output_clips")]
        output_dir: PathBuf,

        /// Silence added before and after each clip, in ms
        #[arg(long)]
        silence_ms: Option<u64>,
    },

    /// Print the captions of a file as tab-separated rows
    List {
        /// Caption (.srt) file
        #[arg(value_name = "CAPTION")]
        caption: PathBuf,
    },

    /// Cut a single caption next to the audio file for preview
    Extract {
        /// Caption (.srt) file
        #[arg(value_name = "CAPTION")]
        caption: PathBuf,

        /// Audio file to cut
        #[arg(value_name = "AUDIO")]
        audio: PathBuf,

        /// Index of the caption to cut
        #[arg(short, long)]
        index: u64,

        /// Silence added before and after the clip, in ms
        #[arg(long)]
        silence_ms: Option<u64>,
    },

    /// Move a previewed clip and its caption into a directory
    Save {
        /// Caption file written by `extract`
        #[arg(value_name = "CLIP_CAPTION")]
        clip_caption: PathBuf,

        /// Existing destination directory
        #[arg(value_name = "DESTINATION_DIR")]
        destination: String,
    },

    /// Rewrite a caption file from edited tab-separated rows
    SaveTable {
        /// Caption (.srt) file to overwrite
        #[arg(value_name = "CAPTION")]
        caption: PathBuf,

        /// Rows file: index, start, end, text separated by tabs
        #[arg(value_name = "ROWS_TSV")]
        rows: PathBuf,
    },

    /// Generate shell completions for srtclip
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// srtclip - cut audio into per-caption clips
///
/// Splits a recording into one silence-padded clip per caption of its SRT
/// file, each paired with a caption re-timed to the clip.
#[derive(Parser, Debug)]
#[command(name = "srtclip")]
#[command(version)]
#[command(about = "Cut audio into per-caption clips with matching captions")]
#[command(long_about = "srtclip cuts an audio recording into one clip per caption of an SRT file.

EXAMPLES:
    srtclip batch lesson1.srt lesson1.mp3 -o clips     # lesson1_001.wav/.srt, ...
    srtclip list lesson1.srt                           # show captions as rows
    srtclip extract lesson1.srt lesson1.mp3 -i 12      # preview clip next to the audio
    srtclip save lesson1_12.srt ~/cards                # keep the previewed clip
    srtclip completions bash > srtclip.bash            # generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. If the config file doesn't
    exist, a default one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
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

    // @returns: ANSI colour for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::color_for_level(record.level());
            let _ = writeln!(
                std::io::stderr(),
                "{}{} {:5} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() {
    if let Err(e) = run() {
        error!("{:#}", e);
        let app_error = AppError::from(e);
        debug!("Exiting with {:?}", app_error);
        std::process::exit(app_error.exit_code());
    }
}

fn run() -> Result<()> {
    // Trace-capable logger; the effective level is set through log::set_max_level
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "srtclip", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(level) = &cli.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.into());
    }

    let mut config = Config::load_or_create(&cli.config_path)?;
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone().into();
    }
    log::set_max_level(config.log_level.into());

    match cli.command {
        Commands::Batch { caption, audio, output_dir, silence_ms } => {
            if let Some(silence_ms) = silence_ms {
                config.silence_ms = silence_ms;
            }
            let controller = Controller::with_config(config)?;
            let report = controller.run_batch(&caption, &audio, &output_dir)?;
            if report.total() > 0 && report.written.is_empty() {
                return Err(anyhow!("No clips could be cut from {:?}", audio));
            }
        }
        Commands::List { caption } => {
            let controller = Controller::with_config(config)?;
            let document = controller.load_captions(&caption)?;
            for row in rows_from_records(&document.records) {
                println!("{}", row.join("\t"));
            }
            for diagnostic in &document.diagnostics {
                warn!("{}", diagnostic.to_error());
            }
        }
        Commands::Extract { caption, audio, index, silence_ms } => {
            if let Some(silence_ms) = silence_ms {
                config.silence_ms = silence_ms;
            }
            let controller = Controller::with_config(config)?;
            let paths = controller.extract_selected(&caption, &audio, index)?;
            println!("{}", paths.audio_path.display());
            println!("{}", paths.caption_path.display());
        }
        Commands::Save { clip_caption, destination } => {
            let controller = Controller::with_config(config)?;
            // A rejected save is a notice, not a failure of the command
            controller.save_clip(&clip_caption, &destination);
        }
        Commands::SaveTable { caption, rows } => {
            let controller = Controller::with_config(config)?;
            let skipped = controller.save_table(&caption, &rows)?;
            if !skipped.is_empty() {
                info!("{} row(s) were not saved", skipped.len());
            }
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}
