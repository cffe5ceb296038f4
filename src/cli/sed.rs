//! Emits a POSIX shell script of GNU `sed` edits for a set of findings.
//!
//! Paths and sed expressions are single-quoted for `sh`; pattern and
//! replacement text are escaped for sed's basic regular expressions.
//! Findings with more than one suggestion become comments.

use crate::Finding;

/// Render a whole script for `findings`, one line per finding.
pub fn script(findings: &[Finding]) -> String {
    let mut out = String::from("#!/bin/sh\nset -e\n");
    for finding in findings {
        out.push_str(&line_for(finding));
        out.push('\n');
    }
    out
}

fn line_for(finding: &Finding) -> String {
    match finding.unambiguous() {
        Some(replacement) => command(finding, replacement),
        None => format!(
            "# {}:{}: {} ==> {}",
            finding.path.display(),
            finding.line,
            comment_safe(&finding.word),
            comment_safe(&finding.suggestions.join(", "))
        ),
    }
}

/// `sed -i -e '<line>s/\b<word>\b/<replacement>/' -- '<path>'`
pub fn command(finding: &Finding, replacement: &str) -> String {
    let expression = format!(
        "{}s/\\b{}\\b/{}/",
        finding.line,
        escape_pattern(&finding.word),
        escape_replacement(replacement)
    );
    format!(
        "sed -i -e {} -- {}",
        shell_quote(&expression),
        shell_quote(&finding.path.display().to_string())
    )
}

pub fn shell_quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', r"'\''"))
}

fn escape_pattern(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '\\' | '/' | '.' | '*' | '[' | ']' | '^' | '$') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

fn escape_replacement(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' | '/' | '&' => {
                out.push('\\');
                out.push(ch);
            }
            '\n' => out.push_str("\\n"),
            _ => out.push(ch),
        }
    }
    out
}

fn comment_safe(text: &str) -> String {
    text.replace(['\n', '\r'], " ")
}
