use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use reportcheck::roster::{load_roster, save_roster};
use reportcheck::scan::InsurerPolicy;
use reportcheck::{
    client_statuses, misplaced, relocate_misplaced, Config, FilenameParser, ReportPeriod, Scanner, WalkResult,
};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "reportcheck")]
#[command(about = "Reconcile health-insurance report files against the client roster")]
struct Cli {
    /// Reject files without a recognisable insurer (overrides config)
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan the reports directory and list parsed files and errors
    Scan {
        /// Reports root (defaults to reports_root from config.toml)
        #[arg(long)]
        root: Option<PathBuf>,
        /// Print the scan result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Report which clients are missing reports for a month
    Check {
        #[arg(long)]
        root: Option<PathBuf>,
        /// Client roster JSON (defaults to roster_path from config.toml)
        #[arg(long)]
        roster: Option<PathBuf>,
        /// Target month as YYYY-MM (defaults to the previous month)
        #[arg(long)]
        period: Option<ReportPeriod>,
        /// Write the updated roster to this file
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Move files found in the wrong folder into their insurer's folder
    Organize {
        #[arg(long)]
        root: Option<PathBuf>,
        /// Only list what would be moved
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // The config is optional when every path is passed on the command line
    let config = Config::load();
    let log_level = config
        .as_ref()
        .map(|c| c.reportcheck.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("RUST_LOG", log_level)).init();

    let policy = match (&config, cli.strict) {
        (_, true) => InsurerPolicy::Strict,
        (Ok(c), false) => c.insurer_policy(),
        (Err(_), false) => InsurerPolicy::Tolerant,
    };
    let scanner = Scanner::new(FilenameParser::with_policy(policy));

    match cli.command {
        Command::Scan { root, json } => {
            let root = resolve_path(root, &config, Config::reports_root)?;
            run_scan(&scanner, &root, json)
        }
        Command::Check {
            root,
            roster,
            period,
            output,
            json,
        } => {
            let root = resolve_path(root, &config, Config::reports_root)?;
            let roster = resolve_path(roster, &config, Config::roster_path)?;
            let period = period.unwrap_or_else(|| ReportPeriod::previous_month(chrono::Local::now().date_naive()));
            run_check(&scanner, &root, &roster, period, output.as_deref(), json)
        }
        Command::Organize { root, dry_run } => {
            let root = resolve_path(root, &config, Config::reports_root)?;
            run_organize(&scanner, &root, dry_run)
        }
    }
}

/// Command-line path if given, otherwise the configured one.
fn resolve_path(arg: Option<PathBuf>, config: &Result<Config>, pick: fn(&Config) -> &Path) -> Result<PathBuf> {
    match (arg, config) {
        (Some(path), _) => Ok(path),
        (None, Ok(config)) => Ok(pick(config).to_path_buf()),
        (None, Err(e)) => anyhow::bail!("No path given on the command line and config could not be loaded: {:#}", e),
    }
}

/// Walk `root`, failing when the root itself could not be read so callers
/// never act on an empty scan.
fn scan_root(scanner: &Scanner, root: &Path) -> Result<WalkResult> {
    let result = scanner.walk(root);
    if let Some(error) = result.root_error() {
        anyhow::bail!("Cannot scan {}: {}", error.file_name, error.error_message);
    }
    Ok(result)
}

fn print_errors(result: &WalkResult) {
    for error in result.errors() {
        println!("  ✗ {}: {}", error.file_name, error.error_message);
    }
}

fn run_scan(scanner: &Scanner, root: &Path, json: bool) -> Result<()> {
    let result = scanner.walk(root);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("\n=== Parsed files ({}) ===\n", result.parsed_file_names().len());
    for parsed in result.parsed_file_names() {
        let marker = if parsed.invalid_directory { "⚠ wrong folder" } else { "" };
        println!(
            "  {} {} {:<5} {} {}",
            parsed.ico,
            parsed.report_date.format("%Y-%m"),
            parsed.insurer,
            parsed.file_path,
            marker
        );
    }

    if !result.errors().is_empty() {
        println!("\n=== Errors ({}) ===\n", result.errors().len());
        print_errors(&result);
    }
    Ok(())
}

fn run_check(
    scanner: &Scanner,
    root: &Path,
    roster_path: &Path,
    period: ReportPeriod,
    output: Option<&Path>,
    json: bool,
) -> Result<()> {
    log::info!("Checking reports for {} in {}", period, root.display());

    let clients = load_roster(roster_path)
        .with_context(|| format!("Failed to load roster: {}", roster_path.display()))?;
    let result = scan_root(scanner, root)?;
    if !result.errors().is_empty() {
        log::warn!("{} files could not be parsed (run `scan` for details)", result.errors().len());
    }

    let statuses = client_statuses(&clients, result.parsed_file_names(), period.year(), period.month());

    if let Some(output) = output {
        let updated: Vec<_> = statuses.iter().map(|s| s.client.clone()).collect();
        save_roster(output, &updated).with_context(|| format!("Failed to write roster: {}", output.display()))?;
        log::info!("Updated roster written to {}", output.display());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&statuses)?);
        return Ok(());
    }

    let missing: Vec<_> = statuses.iter().filter(|s| !s.client.report_generated).collect();
    println!("\n=== Reports for {} ===\n", period);
    println!("Clients: {}", statuses.len());
    println!("Complete: {}", statuses.len() - missing.len());
    println!("Missing: {}", missing.len());

    if !missing.is_empty() {
        println!();
        for status in missing {
            let detail = if status.client.required_insurers.is_empty() {
                "no report found".to_string()
            } else {
                let names: Vec<String> = status.missing.iter().map(|i| i.to_string()).collect();
                format!("missing {}", names.join(", "))
            };
            println!("  {} ({}): {}", status.client.name, status.client.ico.trim(), detail);
        }
    }
    Ok(())
}

fn run_organize(scanner: &Scanner, root: &Path, dry_run: bool) -> Result<()> {
    let result = scan_root(scanner, root)?;
    let unattributed = result
        .parsed_file_names()
        .iter()
        .filter(|p| p.invalid_directory && p.insurer_defaulted)
        .count();
    if unattributed > 0 {
        log::warn!("{} files in the wrong folder have no recognisable insurer and stay put", unattributed);
    }
    let to_move: Vec<_> = misplaced(result.parsed_file_names()).collect();

    if to_move.is_empty() {
        println!("Nothing to move.");
        return Ok(());
    }

    if dry_run {
        println!("Would move {} files:", to_move.len());
        for parsed in to_move {
            println!("  {} → {}", parsed.file_path, parsed.insurer.display_name());
        }
        return Ok(());
    }

    let relocations = relocate_misplaced(root, result.parsed_file_names())
        .context("Relocation stopped; files moved before the failure stay moved")?;
    for relocation in &relocations {
        println!("  {} → {}", relocation.from.display(), relocation.to.display());
    }
    println!("Moved {} files.", relocations.len());
    Ok(())
}
