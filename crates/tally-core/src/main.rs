//! Tally - interval event counter
//!
//! The main entry point for the `tally` binary, handling:
//! - Interactive interval collection (`run`)
//! - One-shot analysis of a recorded series (`analyze`)
//! - Review of saved history (`history`)
//! - Settings inspection and validation (`config`)

use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use chrono::Local;
use clap::{Args, Parser, Subcommand};
use tally_config::{load_settings, ResolvedSettings, Settings, ValidationError, CONFIG_SCHEMA_VERSION};
use tally_core::analysis::{analyze, render_markdown, render_summary, AnalysisParams};
use tally_core::chart::{chart_feed, render_chart};
use tally_core::config::{SessionOptions, SessionOverrides};
use tally_core::coordinator::Coordinator;
use tally_core::exit_codes::ExitCode;
use tally_core::log_event;
use tally_core::logging::{
    event_names, generate_run_id, init_logging, session_label, LogConfig, LogContext, LogLevel,
    Stage,
};
use tally_core::observation::ObservationLog;
use tally_core::output::OutputFormat;
use tally_core::recorder::HistoryRecorder;
use tally_core::session::{run_session, spawn_line_reader, spawn_ticker, SessionInput};
use tally_history::{read_history, CsvHistoryWriter, HistoryError, HistoryRecord};

/// Tally - count events per interval and watch the Poisson diagnostics evolve
#[derive(Parser)]
#[command(name = "tally")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Settings file (overrides TALLY_CONFIG and the XDG lookup)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (quiet mode)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive collection: count events per interval, analyze after each entry
    Run(RunArgs),

    /// Analyze a recorded series without the timer
    Analyze(AnalyzeArgs),

    /// Show how saved estimates evolved over time
    History(HistoryArgs),

    /// Inspect or validate settings
    Config(ConfigArgs),

    /// Print version information
    Version,
}

#[derive(Args, Debug, Default)]
struct RunArgs {
    /// Interval length in seconds
    #[arg(long)]
    interval: Option<u64>,

    /// History file to append to
    #[arg(long)]
    history: Option<PathBuf>,

    /// Do not save history
    #[arg(long, conflicts_with = "history")]
    no_history: bool,
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Counts, one per interval
    values: Vec<String>,

    /// Read counts from a file (whitespace or comma separated)
    #[arg(long)]
    file: Option<PathBuf>,

    /// Include the chart feed (JSON) or a text chart (md/summary)
    #[arg(long)]
    chart: bool,
}

#[derive(Args, Debug)]
struct HistoryArgs {
    /// History file (defaults to the configured path)
    #[arg(long)]
    path: Option<PathBuf>,

    /// Show only the most recent N saves
    #[arg(long)]
    limit: Option<usize>,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show the resolved settings and where they came from
    Show,

    /// Validate a settings file
    Validate {
        /// File to validate (defaults to the resolved settings file)
        path: Option<PathBuf>,
    },

    /// Print the JSON schema for settings.json
    Schema,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() {
                ExitCode::ArgsError
            } else {
                ExitCode::Clean
            };
            let _ = e.print();
            std::process::exit(code.as_i32());
        }
    };

    let cli_level = LogLevel::from_verbosity(cli.global.verbose, cli.global.quiet);
    let log_config = LogConfig::from_env(cli_level, None);
    init_logging(&log_config);

    let ctx = LogContext::new(generate_run_id());

    let exit_code = match cli.command {
        None => run_collect(&cli.global, &RunArgs::default(), &ctx),
        Some(Commands::Run(args)) => run_collect(&cli.global, &args, &ctx),
        Some(Commands::Analyze(args)) => run_analyze(&cli.global, &args, &ctx),
        Some(Commands::History(args)) => run_history(&cli.global, &args, &ctx),
        Some(Commands::Config(args)) => run_config(&cli.global, &args, &ctx),
        Some(Commands::Version) => {
            print_version(&cli.global);
            ExitCode::Clean
        }
    };

    std::process::exit(exit_code.as_i32());
}

// ============================================================================
// Command implementations
// ============================================================================

fn run_collect(global: &GlobalOpts, args: &RunArgs, ctx: &LogContext) -> ExitCode {
    let resolved = match resolve_settings(global, ctx) {
        Ok(r) => r,
        Err(code) => return code,
    };

    if args.interval == Some(0) {
        return output_error(global, "run", ExitCode::ArgsError, "--interval must be at least 1 second");
    }

    let options = SessionOptions::from_settings(&resolved.settings).with_overrides(&SessionOverrides {
        interval_secs: args.interval,
        history_path: args.history.clone(),
        no_history: args.no_history,
    });

    let ctx = ctx
        .clone()
        .with_session_id(session_label(Local::now().naive_local()));

    let recorder = match &options.history_path {
        Some(path) => HistoryRecorder::new(CsvHistoryWriter::new(path), options.save_every),
        None => HistoryRecorder::disabled(),
    };
    let mut coordinator =
        Coordinator::new(options.interval_secs, options.analysis, recorder).with_log_context(ctx);

    let history_text = options
        .history_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "disabled".to_string());
    println!(
        "tally: {} s intervals, history: {}. Type 'help' for commands.",
        options.interval_secs, history_text
    );

    let (tx, rx) = mpsc::channel::<SessionInput>();
    spawn_ticker(tx.clone(), options.tick);
    spawn_line_reader(BufReader::new(io::stdin()), tx);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = match run_session(&mut coordinator, &rx, &mut out) {
        Ok(summary) => summary,
        Err(e) => {
            return output_error(global, "run", ExitCode::IoError, &format!("display failed: {}", e));
        }
    };

    let result = match global.format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "command": "run",
                "generated_at": Local::now().to_rfc3339(),
                "summary": summary,
                "analysis": coordinator.latest(),
            });
            writeln!(out, "{}", to_pretty(&response))
        }
        OutputFormat::Md => writeln!(
            out,
            "# Session summary\n\n{}\n\nHistory rows saved: {}",
            render_markdown(coordinator.latest()),
            summary.records_written
        ),
        OutputFormat::Summary => writeln!(
            out,
            "session ended: {} interval(s), {} history row(s) saved",
            summary.observations, summary.records_written
        ),
    };
    match result {
        Ok(()) => ExitCode::Clean,
        Err(_) => ExitCode::IoError,
    }
}

fn run_analyze(global: &GlobalOpts, args: &AnalyzeArgs, ctx: &LogContext) -> ExitCode {
    let mut tokens: Vec<String> = args.values.clone();
    if let Some(path) = &args.file {
        match std::fs::read_to_string(path) {
            Ok(content) => tokens.extend(split_series(&content)),
            Err(e) => {
                return output_error(
                    global,
                    "analyze",
                    ExitCode::IoError,
                    &format!("cannot read {}: {}", path.display(), e),
                );
            }
        }
    }

    let mut log = ObservationLog::new();
    for (i, token) in tokens.iter().enumerate() {
        if let Err(e) = log.append(token) {
            log_event!(ctx, INFO, event_names::ENTRY_REJECTED, Stage::Entry, "invalid value", position = i + 1);
            return output_error(
                global,
                "analyze",
                ExitCode::InputError,
                &format!("value {}: {}", i + 1, e),
            );
        }
    }

    let resolved = match resolve_settings(global, ctx) {
        Ok(r) => r,
        Err(code) => return code,
    };
    let params = AnalysisParams::from(&resolved.settings.analysis);
    let snapshot = analyze(log.as_slice(), &params);
    log_event!(
        ctx,
        DEBUG,
        event_names::ANALYZE_FINISHED,
        Stage::Analyze,
        "series analyzed",
        observations = log.len()
    );
    let feed = chart_feed(log.as_slice(), &snapshot);

    match global.format {
        OutputFormat::Json => {
            let mut response = serde_json::json!({
                "command": "analyze",
                "generated_at": Local::now().to_rfc3339(),
                "series": log.as_slice(),
                "analysis": &snapshot,
            });
            if args.chart {
                response["chart"] = serde_json::to_value(&feed).unwrap_or_default();
            }
            println!("{}", to_pretty(&response));
        }
        OutputFormat::Md => {
            print!("{}", render_markdown(&snapshot));
            if args.chart && !feed.is_empty() {
                println!("\n## Chart\n\n```text\n{}```", render_chart(&feed));
            }
        }
        OutputFormat::Summary => {
            println!("{}", render_summary(&snapshot));
            if args.chart {
                print!("{}", render_chart(&feed));
            }
        }
    }

    if log.is_empty() {
        ExitCode::NoData
    } else {
        ExitCode::Clean
    }
}

fn run_history(global: &GlobalOpts, args: &HistoryArgs, ctx: &LogContext) -> ExitCode {
    let path = match &args.path {
        Some(p) => p.clone(),
        None => match resolve_settings(global, ctx) {
            Ok(r) => r.settings.history.path,
            Err(code) => return code,
        },
    };

    if !path.exists() {
        return output_message(global, "history", &path, "no history found");
    }

    let mut records = match read_history(&path) {
        Ok(records) => records,
        Err(e @ HistoryError::Io { .. }) => {
            return output_error(global, "history", ExitCode::IoError, &e.to_string());
        }
        Err(e @ HistoryError::Malformed { .. }) => {
            return output_error(global, "history", ExitCode::InputError, &e.to_string());
        }
    };

    if records.is_empty() {
        return output_message(global, "history", &path, "history file is empty");
    }

    let total = records.len();
    if let Some(limit) = args.limit {
        records = records.split_off(total.saturating_sub(limit));
    }

    match global.format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "command": "history",
                "path": path.display().to_string(),
                "total": total,
                "records": records,
            });
            println!("{}", to_pretty(&response));
        }
        OutputFormat::Md => {
            println!("# History: {}\n", path.display());
            println!("| Saved at | Intervals | λ | Variance | Autocorr(1) | Stationarity |");
            println!("|----------|-----------|---|----------|-------------|--------------|");
            for r in &records {
                println!(
                    "| {} | {} | {:.3} | {:.3} | {} | {} |",
                    r.recorded_at.format("%Y-%m-%d %H:%M:%S"),
                    r.observation_count,
                    r.lambda,
                    r.variance,
                    autocorr_cell(r),
                    stationarity_cell(r),
                );
            }
        }
        OutputFormat::Summary => {
            for r in &records {
                println!(
                    "{} n={} λ={:.3} r1={} stationarity={}",
                    r.recorded_at.format("%Y-%m-%d %H:%M:%S"),
                    r.observation_count,
                    r.lambda,
                    autocorr_cell(r),
                    stationarity_cell(r),
                );
            }
        }
    }
    ExitCode::Clean
}

fn run_config(global: &GlobalOpts, args: &ConfigArgs, ctx: &LogContext) -> ExitCode {
    match &args.command {
        ConfigCommands::Show => {
            let resolved = match resolve_settings(global, ctx) {
                Ok(r) => r,
                Err(code) => return code,
            };
            let response = serde_json::json!({
                "schema_version": CONFIG_SCHEMA_VERSION,
                "source": resolved.source.to_string(),
                "path": resolved.path.as_ref().map(|p| p.display().to_string()),
                "settings": &resolved.settings,
            });
            match global.format {
                OutputFormat::Json => println!("{}", to_pretty(&response)),
                OutputFormat::Md => {
                    println!("# Configuration\n");
                    println!("Source: {}\n", resolved.source);
                    println!("```json\n{}\n```", to_pretty(&response["settings"]));
                }
                OutputFormat::Summary => println!(
                    "settings from {} ({})",
                    resolved.source,
                    resolved
                        .path
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "defaults".to_string())
                ),
            }
            ExitCode::Clean
        }
        ConfigCommands::Validate { path } => {
            let target = path.as_deref().or(global.config.as_deref());
            match load_settings(target) {
                Ok(resolved) => {
                    let shown = resolved
                        .path
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "builtin defaults".to_string());
                    match global.format {
                        OutputFormat::Json => println!(
                            "{}",
                            to_pretty(&serde_json::json!({
                                "command": "config validate",
                                "status": "valid",
                                "path": shown,
                            }))
                        ),
                        _ => println!("{}: valid", shown),
                    }
                    ExitCode::Clean
                }
                Err(e) => output_config_error(global, &e),
            }
        }
        ConfigCommands::Schema => {
            let schema = schemars::schema_for!(Settings);
            match serde_json::to_string_pretty(&schema) {
                Ok(text) => {
                    println!("{}", text);
                    ExitCode::Clean
                }
                Err(e) => output_error(global, "config schema", ExitCode::InternalError, &e.to_string()),
            }
        }
    }
}

fn print_version(global: &GlobalOpts) {
    match global.format {
        OutputFormat::Json => {
            let version_info = serde_json::json!({
                "name": "tally",
                "version": env!("CARGO_PKG_VERSION"),
                "config_schema_version": CONFIG_SCHEMA_VERSION,
            });
            println!("{}", to_pretty(&version_info));
        }
        _ => {
            println!("tally {}", env!("CARGO_PKG_VERSION"));
            println!("config schema version: {}", CONFIG_SCHEMA_VERSION);
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Load settings, reporting failures in the selected format.
fn resolve_settings(global: &GlobalOpts, ctx: &LogContext) -> Result<ResolvedSettings, ExitCode> {
    match load_settings(global.config.as_deref()) {
        Ok(resolved) => {
            let source = resolved.source.to_string();
            log_event!(
                ctx,
                DEBUG,
                event_names::CONFIG_LOADED,
                Stage::Init,
                "settings resolved",
                source = source.as_str()
            );
            Ok(resolved)
        }
        Err(e) => {
            log_event!(
                ctx,
                WARN,
                event_names::CONFIG_ERROR,
                Stage::Init,
                "settings rejected",
                code = e.code()
            );
            Err(output_config_error(global, &e))
        }
    }
}

/// Split file content on whitespace and commas.
fn split_series(content: &str) -> impl Iterator<Item = String> + '_ {
    content
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

fn autocorr_cell(record: &HistoryRecord) -> String {
    record
        .autocorrelation
        .map(|r| format!("{:.3}", r))
        .unwrap_or_else(|| "undetermined".to_string())
}

fn stationarity_cell(record: &HistoryRecord) -> &'static str {
    match record.stationarity.as_field() {
        "" => "unknown",
        flag => flag,
    }
}

fn to_pretty(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Report an informational outcome with nothing to show.
fn output_message(global: &GlobalOpts, command: &str, path: &Path, message: &str) -> ExitCode {
    match global.format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "command": command,
                "path": path.display().to_string(),
                "status": ExitCode::NoData.code_name(),
                "message": message,
            });
            println!("{}", to_pretty(&response));
        }
        _ => println!("{}: {}", message, path.display()),
    }
    ExitCode::NoData
}

fn output_error(global: &GlobalOpts, command: &str, code: ExitCode, message: &str) -> ExitCode {
    match global.format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "command": command,
                "status": "error",
                "error": {
                    "code": code.code_name(),
                    "exit_code": code.as_i32(),
                    "message": message,
                }
            });
            eprintln!("{}", to_pretty(&response));
        }
        OutputFormat::Summary => eprintln!("[{}] {}: {}", code.code_name(), command, message),
        OutputFormat::Md => {
            eprintln!("# Error: {} [{}]", command, code);
            eprintln!();
            eprintln!("{}", message);
        }
    }
    code
}

fn output_config_error(global: &GlobalOpts, error: &ValidationError) -> ExitCode {
    match global.format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "status": "error",
                "error": {
                    "code": ExitCode::ConfigError.code_name(),
                    "detail_code": error.code(),
                    "exit_code": ExitCode::ConfigError.as_i32(),
                    "message": error.to_string(),
                }
            });
            eprintln!("{}", to_pretty(&response));
        }
        OutputFormat::Summary => eprintln!("[{}] config error: {}", ExitCode::ConfigError.code_name(), error),
        OutputFormat::Md => {
            eprintln!("# Configuration Error");
            eprintln!();
            eprintln!("Error: {}", error);
        }
    }
    ExitCode::ConfigError
}
