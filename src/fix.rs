use crate::checker::tokenizer;
use crate::Finding;
use anyhow::{Context, Result};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// A replacement for one token at an exact position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correction {
    pub line: usize,
    pub column: usize,
    pub word: String,
    pub replacement: String,
}

impl Correction {
    pub fn new(finding: &Finding, replacement: impl Into<String>) -> Self {
        Self {
            line: finding.line,
            column: finding.column,
            word: finding.word.clone(),
            replacement: replacement.into(),
        }
    }
}

/// Rewrite `content`, returning the new text and how many tokens changed.
///
/// A correction only applies if the token at its line and column still reads
/// `word`; line endings are preserved.
pub fn apply(content: &str, corrections: &[Correction]) -> (String, usize) {
    let mut output = String::with_capacity(content.len());
    let mut applied = 0;

    for (idx, raw) in content.split_inclusive('\n').enumerate() {
        let line_number = idx + 1;
        let pending: Vec<&Correction> = corrections.iter().filter(|c| c.line == line_number).collect();
        if pending.is_empty() {
            output.push_str(raw);
            continue;
        }

        let body = raw.strip_suffix('\n').unwrap_or(raw);
        let body = body.strip_suffix('\r').unwrap_or(body);
        let ending = &raw[body.len()..];

        let mut last = 0;
        for token in tokenizer::tokens(body, line_number) {
            let column = token.column(body);
            let hit = pending
                .iter()
                .find(|c| c.column == column && c.word == token.text);
            if let Some(correction) = hit {
                output.push_str(&body[last..token.start]);
                output.push_str(&correction.replacement);
                last = token.start + token.text.len();
                applied += 1;
            }
        }
        output.push_str(&body[last..]);
        output.push_str(ending);
    }

    (output, applied)
}

/// Apply corrections to a file in place. The file is only written when
/// something changed.
pub fn fix_file(path: &Path, corrections: &[Correction]) -> Result<usize> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    let (updated, applied) = apply(&content, corrections);
    if applied > 0 {
        fs::write(path, updated)
            .with_context(|| format!("Failed to write file: {}", path.display()))?;
        info!("{}: applied {} corrections", path.display(), applied);
    }

    Ok(applied)
}

/// Group chosen corrections by file, keeping the findings' file order.
pub fn group_by_file<'a, F>(findings: &'a [Finding], mut choose: F) -> Vec<(PathBuf, Vec<Correction>)>
where
    F: FnMut(&'a Finding) -> Option<String>,
{
    let mut groups: Vec<(PathBuf, Vec<Correction>)> = Vec::new();

    for finding in findings {
        let Some(replacement) = choose(finding) else {
            continue;
        };
        let correction = Correction::new(finding, replacement);
        match groups.last_mut() {
            Some((path, list)) if *path == finding.path => list.push(correction),
            _ => groups.push((finding.path.clone(), vec![correction])),
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn correction(line: usize, column: usize, word: &str, replacement: &str) -> Correction {
        Correction {
            line,
            column,
            word: word.to_string(),
            replacement: replacement.to_string(),
        }
    }

    #[test]
    fn test_replaces_only_targeted_occurrence() {
        let content = "teh cat saw teh dog\nteh end\n";
        let (out, n) = apply(content, &[correction(1, 13, "teh", "the")]);
        assert_eq!(n, 1);
        assert_eq!(out, "teh cat saw the dog\nteh end\n");
    }

    #[test]
    fn test_preserves_crlf_and_missing_trailing_newline() {
        let content = "a teh\r\nb wich";
        let (out, n) = apply(
            content,
            &[correction(1, 3, "teh", "the"), correction(2, 3, "wich", "which")],
        );
        assert_eq!(n, 2);
        assert_eq!(out, "a the\r\nb which");
    }

    #[test]
    fn test_stale_correction_is_ignored() {
        let content = "the cat\n";
        let (out, n) = apply(content, &[correction(1, 1, "teh", "the")]);
        assert_eq!(n, 0);
        assert_eq!(out, content);
    }

    #[test]
    fn test_fix_file_writes_changes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.txt");
        fs::write(&path, "I recieve mail\n").unwrap();

        let applied = fix_file(&path, &[correction(1, 3, "recieve", "receive")]).unwrap();
        assert_eq!(applied, 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), "I receive mail\n");
    }

    #[test]
    fn test_group_by_file_keeps_order_and_skips_unchosen() {
        let finding = |path: &str, line: usize, suggestions: &[&str]| Finding {
            path: PathBuf::from(path),
            line,
            column: 1,
            word: "teh".to_string(),
            suggestions: suggestions.iter().map(|s| s.to_string()).collect(),
        };
        let findings = vec![
            finding("b.txt", 1, &["the"]),
            finding("b.txt", 2, &["the", "tea"]),
            finding("a.txt", 4, &["the"]),
        ];

        let groups = group_by_file(&findings, |f| f.unambiguous().map(str::to_string));
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, PathBuf::from("b.txt"));
        assert_eq!(groups[0].1.len(), 1);
        assert_eq!(groups[1].0, PathBuf::from("a.txt"));
        assert_eq!(groups[1].1[0].line, 4);
    }
}
