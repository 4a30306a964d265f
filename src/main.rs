// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{error, warn, info, debug, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use std::fs::File;
use std::io::BufReader;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand, Args};
use clap_complete::{generate, Shell};

use edml::app_config::{self, Config, SortOrder};
use edml::file_utils::FileManager;
use edml::Document;

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

/// CLI Wrapper for SortOrder to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliSortOrder {
    None,
    Channel,
    Time,
}

impl From<CliSortOrder> for SortOrder {
    fn from(cli_order: CliSortOrder) -> Self {
        match cli_order {
            CliSortOrder::None => SortOrder::None,
            CliSortOrder::Channel => SortOrder::Channel,
            CliSortOrder::Time => SortOrder::Time,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse ADL files and report their validation messages
    Check {
        /// ADL file or directory to check
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,
    },

    /// Parse an ADL file and write it back in normalized form
    Rewrite(RewriteArgs),

    /// Generate shell completions for edml
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct RewriteArgs {
    /// ADL file to rewrite
    #[arg(value_name = "INPUT_FILE")]
    input_file: PathBuf,

    /// Output file (default: next to the input, with the configured suffix)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Sort the event list before writing
    #[arg(short, long, value_enum)]
    sort: Option<CliSortOrder>,

    /// Convert every position to this sample rate (e.g. S96000)
    #[arg(short, long)]
    resample: Option<String>,

    /// Copy Nuendo cue points into the marker list
    #[arg(long)]
    import_cues: bool,

    /// Force overwrite of an existing output file
    #[arg(short, long)]
    force_overwrite: bool,
}

/// edml - AES31-3 Audio Decision List toolkit
///
/// Reads, checks and rewrites EDML/ADL documents.
#[derive(Parser, Debug)]
#[command(name = "edml")]
#[command(version)]
#[command(about = "AES31-3 Audio Decision List toolkit")]
#[command(long_about = "edml reads AES31-3 ADL documents, reports structural and field errors, and writes them back normalized.

EXAMPLES:
    edml check session.adl                       # Report problems in one file
    edml check /projects/                        # Check every ADL file in a directory
    edml rewrite session.adl                     # Write session.normalized.adl
    edml rewrite -s channel session.adl          # Sort the event list by channel
    edml rewrite -r S96000 -o out.adl in.adl     # Resample to 96 kHz
    edml completions bash > edml.bash            # Generate bash completions

CONFIGURATION:
    Configuration is stored in edml.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "edml.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Treat structural errors as fatal
    #[arg(long, global = true)]
    strict: bool,
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

    // @returns: ANSI color and label for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "ERROR"),
            Level::Warn => ("1;33", "WARN "),
            Level::Info => ("1;32", "INFO "),
            Level::Debug => ("1;36", "DEBUG"),
            Level::Trace => ("1;35", "TRACE"),
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
            let (color, label) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                color, now, label, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

fn main() -> Result<()> {
    // Accept everything here; the effective level is set once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "edml", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli)?;
    log::set_max_level(level_filter(&config.log_level));

    match cli.command {
        Commands::Check { input_path } => run_check(&input_path, &config),
        Commands::Rewrite(args) => run_rewrite(args, config),
        Commands::Completions { .. } => Ok(()),
    }
}

// Load or create the configuration, then apply command line overrides
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let config_path = &cli.config_path;
    let mut config = if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }

    if cli.strict {
        config.parser.strict = true;
    }

    config.validate()
        .context("Configuration validation failed")?;

    Ok(config)
}

fn run_check(input_path: &Path, config: &Config) -> Result<()> {
    let files = if input_path.is_file() {
        vec![input_path.to_path_buf()]
    } else if input_path.is_dir() {
        FileManager::find_adl_files(input_path)?
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", input_path));
    };

    if files.is_empty() {
        warn!("No ADL files found in {:?}", input_path);
        return Ok(());
    }

    let mut failed = 0;
    for file in &files {
        match FileManager::read_document(file, &config.parser) {
            Ok(document) => {
                let count = document.error_count();
                if count == 0 {
                    info!("{:?}: ok", file);
                } else {
                    failed += 1;
                    warn!("{:?}: {} problem(s)", file, count);
                    for message in document.errors() {
                        println!("{}: {}", file.display(), message);
                    }
                }
            }
            Err(e) => {
                failed += 1;
                error!("{:#}", e);
            }
        }
    }

    info!("Checked {} file(s), {} with problems", files.len(), failed);
    if failed > 0 {
        return Err(anyhow!("{} of {} file(s) have problems", failed, files.len()));
    }
    Ok(())
}

fn run_rewrite(args: RewriteArgs, mut config: Config) -> Result<()> {
    if let Some(sort) = args.sort {
        config.output.sort = sort.into();
    }
    if let Some(rate) = args.resample {
        config.output.resample_to = Some(rate);
    }
    config.validate()
        .context("Configuration validation failed")?;

    let output_path = args.output.unwrap_or_else(|| {
        FileManager::generate_output_path(
            &args.input_file,
            args.input_file.parent().unwrap_or(Path::new(".")),
            &config.output.output_suffix,
        )
    });

    if FileManager::file_exists(&output_path) && !args.force_overwrite {
        return Err(anyhow!("Output file already exists: {:?} (use --force-overwrite)", output_path));
    }

    let mut document = FileManager::read_document(&args.input_file, &config.parser)?;
    if document.error_count() > 0 {
        warn!("{:?} has {} problem(s):\n{}", args.input_file, document.error_count(), document.error_text());
    }

    apply_output_settings(&mut document, &config, args.import_cues)?;

    FileManager::write_document(&output_path, &document)?;
    info!("Wrote {:?}", output_path);
    Ok(())
}

fn apply_output_settings(document: &mut Document, config: &Config, import_cues: bool) -> Result<()> {
    if import_cues {
        let count = document.import_cues();
        debug!("Imported {} cue point(s)", count);
    }

    if let Some(rate) = config.target_sample_rate()? {
        debug!("Resampling to {}", rate);
        document.resample(rate);
    }

    if let Some(events) = document.event_list_mut() {
        match config.output.sort {
            SortOrder::None => {}
            SortOrder::Channel => events.sort_by_channel_then_time(),
            SortOrder::Time => events.sort_by_time(),
        }
    }

    Ok(())
}
