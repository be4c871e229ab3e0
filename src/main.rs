// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};

use cve_translator::app_config::{Config, LogLevel};
use cve_translator::app_controller::{Controller, RunOptions};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate a security advisory
    Translate(TranslateArgs),

    /// List the protected technical terms of an advisory (offline)
    Terms {
        /// Input text file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Configuration file path
        #[arg(short, long, default_value = "conf.json")]
        config_path: String,
    },

    /// Generate shell completions for cve-translator
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Input text file to translate
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file (default: <stem>.<target>.<ext> next to the input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Source language code (e.g., 'en')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g., 'ja')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Send technical terms to the translator unmasked
    #[arg(long)]
    no_preserve: bool,

    /// Skip semantic validation
    #[arg(long)]
    no_validate: bool,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Write a JSON report of every block
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,
}

/// cve-translator - security advisory translation with term preservation
#[derive(Parser, Debug)]
#[command(name = "cve-translator")]
#[command(version)]
#[command(about = "Translate CVE advisories while preserving technical terms")]
#[command(long_about = "cve-translator translates security advisories with an OpenAI or Azure OpenAI model.
CVE IDs, CVSS scores, product names, versions, URLs and other identifiers are masked
before translation and restored afterwards, then every block is checked for lost terms
and scored for semantic similarity.

EXAMPLES:
    cve-translator translate advisory.txt                 # Translate using conf.json
    cve-translator translate -t ja -o out.txt advisory.txt
    cve-translator translate --report report.json advisory.txt
    cve-translator terms advisory.txt                     # List protected terms
    cve-translator completions bash > cve-translator.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. If the file doesn't exist, a
    default one is created. OPENAI_API_KEY, AZURE_OPENAI_KEY, AZURE_OPENAI_ENDPOINT
    and AZURE_OPENAI_API_VERSION override the file.")]
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
        // Filtering is left to log::set_max_level so it can change after init
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and label for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
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
            let _ = writeln!(std::io::stderr(), "{}{} {} {}\x1B[0m", color, now, label, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Info by default; updated once the config is loaded
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "cve-translator", &mut std::io::stdout());
            Ok(())
        }
        Commands::Terms { input, config_path } => run_terms(&input, &config_path),
        Commands::Translate(args) => run_translate(args).await,
    }
}

/// Load the config file, creating a default one when missing
fn load_or_create_config(config_path: &str) -> Result<Config> {
    if Path::new(config_path).exists() {
        Config::load(config_path)
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);
        let config = Config::default();
        config.save(config_path)?;
        Ok(config)
    }
}

fn run_terms(input: &Path, config_path: &str) -> Result<()> {
    let config = if Path::new(config_path).exists() {
        Config::load(config_path)?
    } else {
        Config::default()
    };
    log::set_max_level(config.log_level.to_level_filter());

    let text = std::fs::read_to_string(input).with_context(|| format!("Failed to read {:?}", input))?;
    let mut stdout = std::io::stdout();
    for (category, terms) in Controller::list_terms(&config, &text) {
        writeln!(stdout, "{} ({})", category, terms.len())?;
        for term in terms {
            writeln!(stdout, "  {}", term)?;
        }
    }
    Ok(())
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let level: LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = load_or_create_config(&options.config_path)?;

    if let Some(source_lang) = &options.source_language {
        config.source_language = source_lang.clone();
    }
    if let Some(target_lang) = &options.target_language {
        config.target_language = target_lang.clone();
    }
    if options.no_validate {
        config.validation.enabled = false;
    }
    if options.no_preserve {
        config.preservation.enabled = false;
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    } else {
        log::set_max_level(config.log_level.to_level_filter());
    }

    config.apply_env_overrides();
    info!("{}", config.display_summary());

    if !options.input.exists() {
        return Err(anyhow!("Input path does not exist: {:?}", options.input));
    }

    let preserve_terms = config.preservation.enabled;
    let controller = Controller::with_config(config)?;
    let report = controller
        .run(
            &options.input,
            RunOptions {
                output: options.output,
                report: options.report,
                preserve_terms,
                show_progress: true,
            },
        )
        .await?;

    info!(
        "{}/{} blocks translated, {} failed, {} abandoned",
        report.stats.successful_blocks,
        report.stats.translatable_blocks,
        report.stats.failed_blocks,
        report.stats.abandoned_blocks
    );

    Ok(())
}
