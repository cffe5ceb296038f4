use anyhow::Result;
use clap::{ArgAction, CommandFactory, Parser};
use clap_complete::{generate, Shell};
use env_logger::Builder;
use log::{info, LevelFilter};
use misspell::cli::interactive::{self, CorrectionSession, TerminalPrompter};
use misspell::cli::output::{self, OutputFormat};
use misspell::cli::sed;
use misspell::files::{self, FileFilter};
use misspell::{fix, Config, ScanReport, Scanner};
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process;

/// Exit code when files or dictionary lines could not be processed.
const EXIT_ERRORS: i32 = 2;

#[derive(Parser, Debug)]
#[command(name = "misspell")]
#[command(version, about = "Find and fix commonly misspelled words in source files", long_about = None)]
struct Cli {
    /// Files or directories to check (directories are walked recursively)
    #[arg(value_name = "PATHS")]
    paths: Vec<PathBuf>,

    /// Misspelling table to use instead of the built-in one
    #[arg(short, long, value_name = "FILE")]
    dictionary: Option<PathBuf>,

    /// Print the misspelling table and exit
    #[arg(short, long)]
    list: bool,

    /// Also match words whose lowercase form is a known misspelling
    #[arg(short = 'I', long)]
    ignore_case: bool,

    /// Rewrite files in place, applying corrections that have a single suggestion
    #[arg(short, long, conflicts_with_all = ["interactive", "sed"])]
    write: bool,

    /// Choose a correction for each finding interactively
    #[arg(short, long, conflicts_with = "sed")]
    interactive: bool,

    /// Print a sed script that applies the corrections
    #[arg(long)]
    sed: bool,

    /// Output format (text, json)
    #[arg(short = 'o', long, default_value = "text")]
    format: OutputFormat,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Exit with code 0 even if misspellings are found
    #[arg(long)]
    no_fail: bool,

    /// Scan files one at a time instead of in parallel
    #[arg(long)]
    sequential: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL")]
    completion: Option<Shell>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    Builder::new()
        .filter_level(log_level)
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();

    if let Some(shell) = cli.completion {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "misspell", &mut io::stdout());
        return Ok(());
    }

    let use_color = !cli.no_color && io::stdout().is_terminal();
    if !use_color {
        colored::control::set_override(false);
    }

    let config = Config::load(cli.dictionary.clone(), cli.ignore_case, cli.sequential)?;

    // A missing override table aborts here, before anything is scanned.
    let (scanner, load_errors) = Scanner::from_config(&config)?;

    if cli.list {
        print!("{}", output::format_dump(scanner.dictionary()));
        output::print_errors(&load_errors, use_color);
        process::exit(if load_errors.is_empty() { 0 } else { EXIT_ERRORS });
    }

    if cli.paths.is_empty() {
        anyhow::bail!("No paths specified. Use --help for usage information.");
    }

    let (targets, walk_errors) = files::expand(&cli.paths, &FileFilter::from_config(&config));
    info!("scanning {} files", targets.len());

    let mut report = scanner.scan(&targets);
    let mut early_errors = load_errors;
    early_errors.extend(walk_errors);
    report.prepend_errors(early_errors);

    let fixing = cli.write || cli.interactive;
    if cli.sed {
        print!("{}", sed::script(&report.findings));
    } else if cli.interactive {
        let mut session = CorrectionSession::new();
        let mut prompter = TerminalPrompter::new(use_color);
        let groups = interactive::run(&report.findings, &mut session, &mut prompter)?;
        apply_groups(&groups, use_color)?;
    } else if cli.write {
        let groups = fix::group_by_file(&report.findings, |f| f.unambiguous().map(str::to_string));
        let ambiguous: Vec<_> = report
            .findings
            .iter()
            .filter(|f| f.unambiguous().is_none())
            .cloned()
            .collect();
        output::print_findings(&ambiguous, use_color);
        apply_groups(&groups, use_color)?;
    } else {
        print_report(&report, cli.format, use_color)?;
    }

    output::print_errors(&report.errors, use_color);

    let code = if !report.errors.is_empty() {
        EXIT_ERRORS
    } else if !report.findings.is_empty() && !cli.no_fail && !fixing && !cli.sed {
        1
    } else {
        0
    };
    if code != 0 {
        process::exit(code);
    }

    Ok(())
}

fn print_report(report: &ScanReport, format: OutputFormat, colored: bool) -> Result<()> {
    match format {
        OutputFormat::Text => {
            output::print_findings(&report.findings, colored);
            output::print_check_summary(report, colored);
        }
        OutputFormat::Json => println!("{}", output::render_json(report)?),
    }
    Ok(())
}

fn apply_groups(groups: &[(PathBuf, Vec<fix::Correction>)], colored: bool) -> Result<()> {
    let mut total_fixed = 0;
    let mut files_changed = 0;

    for (path, corrections) in groups {
        let applied = fix::fix_file(path, corrections)?;
        if applied > 0 {
            total_fixed += applied;
            files_changed += 1;
        }
    }

    output::print_fix_summary(total_fixed, files_changed, colored);
    Ok(())
}
