use crate::cli::output::format_finding;
use crate::fix::{group_by_file, Correction};
use crate::Finding;
use anyhow::Result;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Select;
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    Replace(String),
    Skip,
    Quit,
}

/// Asks the user what to do with one finding.
///
/// `default` indexes into `finding.suggestions`.
pub trait Prompter {
    fn choose(&mut self, finding: &Finding, default: usize) -> Result<Choice>;
}

/// Remembers the last replacement picked for each word during one run.
#[derive(Debug, Default)]
pub struct CorrectionSession {
    last_choice: HashMap<String, String>,
}

impl CorrectionSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remembered(&self, word: &str) -> Option<&str> {
        self.last_choice.get(word).map(String::as_str)
    }

    pub fn remember(&mut self, word: &str, replacement: &str) {
        self.last_choice.insert(word.to_string(), replacement.to_string());
    }

    /// Suggestion to pre-select: the last choice for this word, else the first.
    pub fn default_index(&self, finding: &Finding) -> usize {
        self.remembered(&finding.word)
            .and_then(|prev| finding.suggestions.iter().position(|s| s == prev))
            .unwrap_or(0)
    }
}

/// Prompt for every finding in order and return the accepted corrections
/// grouped by file. Stops prompting at `Quit`; earlier choices are kept.
pub fn run<P: Prompter>(
    findings: &[Finding],
    session: &mut CorrectionSession,
    prompter: &mut P,
) -> Result<Vec<(PathBuf, Vec<Correction>)>> {
    let mut chosen: Vec<Option<String>> = Vec::with_capacity(findings.len());

    for finding in findings {
        let default = session.default_index(finding);
        match prompter.choose(finding, default)? {
            Choice::Replace(replacement) => {
                session.remember(&finding.word, &replacement);
                chosen.push(Some(replacement));
            }
            Choice::Skip => chosen.push(None),
            Choice::Quit => break,
        }
    }

    let mut choices = chosen.into_iter();
    Ok(group_by_file(findings, |_| choices.next().flatten()))
}

/// Terminal prompter backed by `dialoguer`.
pub struct TerminalPrompter {
    colored: bool,
}

impl TerminalPrompter {
    pub fn new(colored: bool) -> Self {
        Self { colored }
    }
}

impl Prompter for TerminalPrompter {
    fn choose(&mut self, finding: &Finding, default: usize) -> Result<Choice> {
        let skip = finding.suggestions.len();
        let quit = skip + 1;

        let mut items: Vec<String> = finding.suggestions.clone();
        items.push("(skip)".to_string());
        items.push("(quit)".to_string());

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(format_finding(finding, self.colored))
            .items(&items)
            .default(default)
            .interact_opt()?;

        Ok(match selection {
            Some(idx) if idx < skip => Choice::Replace(finding.suggestions[idx].clone()),
            Some(idx) if idx == quit => Choice::Quit,
            _ => Choice::Skip,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Replays canned answers and records the defaults it was offered.
    struct Scripted {
        answers: Vec<Choice>,
        defaults: Vec<usize>,
    }

    impl Prompter for Scripted {
        fn choose(&mut self, _finding: &Finding, default: usize) -> Result<Choice> {
            self.defaults.push(default);
            Ok(self.answers.remove(0))
        }
    }

    fn finding(path: &str, line: usize, word: &str, suggestions: &[&str]) -> Finding {
        Finding {
            path: PathBuf::from(path),
            line,
            column: 1,
            word: word.to_string(),
            suggestions: suggestions.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_session_preselects_last_choice() {
        let findings = vec![
            finding("a.txt", 1, "wich", &["which", "witch"]),
            finding("a.txt", 2, "wich", &["which", "witch"]),
            finding("b.txt", 1, "teh", &["the"]),
        ];
        let mut prompter = Scripted {
            answers: vec![
                Choice::Replace("witch".to_string()),
                Choice::Replace("witch".to_string()),
                Choice::Skip,
            ],
            defaults: Vec::new(),
        };
        let mut session = CorrectionSession::new();

        let groups = run(&findings, &mut session, &mut prompter).unwrap();

        assert_eq!(prompter.defaults, vec![0, 1, 0]);
        assert_eq!(session.remembered("wich"), Some("witch"));
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].1.len(), 2);
        assert!(groups[0].1.iter().all(|c| c.replacement == "witch"));
    }

    #[test]
    fn test_quit_keeps_earlier_choices() {
        let findings = vec![
            finding("a.txt", 1, "teh", &["the"]),
            finding("a.txt", 2, "teh", &["the"]),
            finding("a.txt", 3, "teh", &["the"]),
        ];
        let mut prompter = Scripted {
            answers: vec![Choice::Replace("the".to_string()), Choice::Quit],
            defaults: Vec::new(),
        };
        let mut session = CorrectionSession::new();

        let groups = run(&findings, &mut session, &mut prompter).unwrap();

        assert_eq!(prompter.defaults.len(), 2);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].1.len(), 1);
        assert_eq!(groups[0].1[0].line, 1);
    }

    #[test]
    fn test_sessions_are_independent() {
        let mut first = CorrectionSession::new();
        first.remember("wich", "witch");
        let second = CorrectionSession::new();
        assert!(second.remembered("wich").is_none());
    }
}
