use crate::checker::dictionary::Dictionary;
use crate::{Finding, ScanError, ScanReport};
use colored::*;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// `path:line: word ==> s1, s2`
pub fn format_finding(finding: &Finding, colored_output: bool) -> String {
    let location = format!("{}:{}", finding.path.display(), finding.line);
    let suggestions = finding.suggestions.join(", ");

    if colored_output {
        format!(
            "{}: {} {} {}",
            location.bold(),
            finding.word.red().bold(),
            "==>".dimmed(),
            suggestions.green()
        )
    } else {
        format!("{}: {} ==> {}", location, finding.word, suggestions)
    }
}

pub fn format_error(error: &ScanError, colored_output: bool) -> String {
    if colored_output {
        format!("{} {}", "error:".red().bold(), error)
    } else {
        format!("error: {}", error)
    }
}

pub fn print_findings(findings: &[Finding], colored_output: bool) {
    for finding in findings {
        println!("{}", format_finding(finding, colored_output));
    }
}

/// Errors go to stderr, after the findings.
pub fn print_errors(errors: &[ScanError], colored_output: bool) {
    for error in errors {
        eprintln!("{}", format_error(error, colored_output));
    }
}

pub fn render_json(report: &ScanReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

pub fn format_dump(dictionary: &Dictionary) -> String {
    dictionary
        .dump()
        .into_iter()
        .map(|(misspelling, corrections)| format!("{} -> {}\n", misspelling, corrections))
        .collect()
}

pub fn print_check_summary(report: &ScanReport, colored: bool) {
    let total = report.findings.len();
    let files = report.files_scanned;
    let file_word = if files == 1 { "file" } else { "files" };

    println!();
    if total == 0 {
        let message = format!("✓ No misspellings found in {} {}", files, file_word);
        if colored {
            println!("{}", message.green().bold());
        } else {
            println!("{}", message);
        }
    } else {
        let word = if total == 1 { "misspelling" } else { "misspellings" };
        if colored {
            println!(
                "{} {} {} found in {} {}",
                "✗".red().bold(),
                total.to_string().red().bold(),
                word,
                files,
                file_word
            );
        } else {
            println!("✗ {} {} found in {} {}", total, word, files, file_word);
        }
    }
}

pub fn print_fix_summary(total_fixed: usize, files_changed: usize, colored: bool) {
    println!();
    if total_fixed == 0 {
        if colored {
            println!("{}", "No corrections applied".yellow().bold());
        } else {
            println!("No corrections applied");
        }
        return;
    }

    let fix_word = if total_fixed == 1 { "correction" } else { "corrections" };
    let file_word = if files_changed == 1 { "file" } else { "files" };
    if colored {
        println!(
            "{} {} {} applied to {} {}",
            "✓".green().bold(),
            total_fixed.to_string().green().bold(),
            fix_word,
            files_changed,
            file_word
        );
    } else {
        println!("✓ {} {} applied to {} {}", total_fixed, fix_word, files_changed, file_word);
    }
}
