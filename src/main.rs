// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info};
use std::io::Write;
use std::path::{Path, PathBuf};

use sly_lyrics::app_config::{self, Config};
use sly_lyrics::app_controller::Controller;
use sly_lyrics::file_utils::FileManager;
use sly_lyrics::language_utils;
use sly_lyrics::romanization::Availability;
use sly_lyrics::script_detection::detect_script;

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

/// Options shared by every command that loads the configuration
#[derive(clap::Args, Debug, Clone)]
struct CommonArgs {
    /// Target language code (e.g., 'en', 'fr', 'zh-CN')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate and romanize a lyrics file or directory (default command)
    #[command(alias = "translate")]
    Process(ProcessArgs),

    /// Romanize a single line, mixed scripts allowed
    Romanize {
        /// Text to romanize
        text: String,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Print the dominant script of a lyrics file or of literal text
    Detect {
        /// Lyrics file, or text when no such file exists
        input: String,
    },

    /// Show which romanization tiers are available for each script
    Providers {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Generate shell completions for sly-lyrics
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(clap::Args, Debug)]
struct ProcessArgs {
    /// Lyrics file (.txt or .lrc) or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Print the result as JSON instead of writing a file
    #[arg(long)]
    stdout: bool,

    #[command(flatten)]
    common: CommonArgs,
}

/// sly-lyrics - lyrics translation and romanization
#[derive(Parser, Debug)]
#[command(name = "sly-lyrics")]
#[command(version)]
#[command(about = "Translate song lyrics and romanize them line by line")]
#[command(long_about = "sly-lyrics translates lyrics into a target language and romanizes every line \
according to its writing system.

EXAMPLES:
    sly-lyrics song.lrc                         # Process using default config
    sly-lyrics -t fr song.txt                   # Translate into French
    sly-lyrics --stdout song.lrc                # Print JSON instead of writing a file
    sly-lyrics -f /music/lyrics/                # Process a directory, overwriting outputs
    sly-lyrics romanize '사랑해 baby'            # Romanize a single line
    sly-lyrics detect song.lrc                  # Print the dominant script
    sly-lyrics completions bash > sly.bash      # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Lyrics file (.txt or .lrc) or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Print the result as JSON instead of writing a file
    #[arg(long)]
    stdout: bool,

    #[command(flatten)]
    common: CommonArgs,
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
        // The logger itself accepts everything; `log::set_max_level` does the filtering
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌",
            Level::Warn => "🚧",
            Level::Info => "🎵",
            Level::Debug => "🔍",
            Level::Trace => "📋",
        }
    }

    // @returns: ANSI color for log level
    fn get_color_for_level(level: Level) -> &'static str {
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
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let level = record.level();

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
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

#[tokio::main]
async fn main() -> Result<()> {
    // Info until the configuration says otherwise
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "sly-lyrics", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Process(args)) => run_process(args).await,
        Some(Commands::Romanize { text, common }) => run_romanize(&text, &common).await,
        Some(Commands::Detect { input }) => run_detect(&input),
        Some(Commands::Providers { common }) => run_providers(&common).await,
        None => {
            let input_path = cli.input_path.ok_or_else(|| {
                anyhow!("INPUT_PATH is required when no subcommand is specified")
            })?;

            let args = ProcessArgs {
                input_path,
                force_overwrite: cli.force_overwrite,
                stdout: cli.stdout,
                common: cli.common,
            };
            run_process(args).await
        }
    }
}

/// Load the configuration, apply command line overrides and the log level
fn load_config(common: &CommonArgs) -> Result<Config> {
    if let Some(level) = &common.log_level {
        log::set_max_level(app_config::LogLevel::from(level.clone()).to_level_filter());
    }

    let mut config = Config::load_or_create(Path::new(&common.config_path))?;

    if let Some(target_language) = &common.target_language {
        config.target_language = language_utils::normalize_language_code(target_language)
            .context("Invalid target language")?;
    }
    if let Some(level) = &common.log_level {
        config.log_level = level.clone().into();
    }

    config.validate().context("Configuration validation failed")?;

    if common.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    Ok(config)
}

async fn run_process(args: ProcessArgs) -> Result<()> {
    let config = load_config(&args.common)?;
    info!(
        "Target language: {} ({})",
        config.target_language,
        language_utils::get_language_name(&config.target_language)?
    );
    let controller = Controller::with_config(config)?;

    if args.input_path.is_file() {
        if args.stdout {
            let document = controller.process_file(&args.input_path).await?;
            println!("{}", serde_json::to_string_pretty(&document)?);
        } else {
            let output_dir = args.input_path.parent().unwrap_or(Path::new(".")).to_path_buf();
            controller.run(args.input_path.clone(), output_dir, args.force_overwrite).await?;
        }
    } else if args.input_path.is_dir() {
        controller.run_folder(args.input_path.clone(), args.force_overwrite).await?;
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", args.input_path));
    }

    Ok(())
}

async fn run_romanize(text: &str, common: &CommonArgs) -> Result<()> {
    let config = load_config(common)?;
    let controller = Controller::with_config(config)?;
    println!("{}", controller.pipeline().romanize_line(text).await);
    Ok(())
}

fn run_detect(input: &str) -> Result<()> {
    let path = Path::new(input);
    let lines = if FileManager::file_exists(path) {
        FileManager::read_lyrics(path)?
    } else {
        input.lines().map(str::to_string).collect()
    };
    println!("{}", detect_script(&lines));
    Ok(())
}

async fn run_providers(common: &CommonArgs) -> Result<()> {
    let config = load_config(common)?;
    let controller = Controller::with_config(config)?;

    for status in controller.pipeline().registry().resolve_availability().await {
        match status.availability {
            Availability::Ready => {
                println!("{:<11} {:<40} ready", status.script.as_str(), status.tier)
            }
            Availability::Disabled(reason) => {
                println!("{:<11} {:<40} disabled: {}", status.script.as_str(), status.tier, reason)
            }
        }
    }
    Ok(())
}
