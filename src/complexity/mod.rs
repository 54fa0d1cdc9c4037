//! Metric extractor: cyclomatic complexity, nesting depth and length for
//! each scanned method span, aggregated per class.
//!
//! Complexity is approximated by a single forward token scan: start at 1 for
//! the method itself and add one per control-flow or short-circuit token.
//! The counter is only ever incremented.

use crate::config::ScannerConfig;
use crate::core::{CodeClass, CodeMethod, ScanError, ScanErrorKind, SourceUnit};
use crate::scanner::ScanOutcome;

pub struct ExtractedMetrics {
    pub methods: Vec<CodeMethod>,
    pub classes: Vec<CodeClass>,
    pub errors: Vec<ScanError>,
}

pub fn extract_metrics(
    unit: &SourceUnit,
    outcome: &ScanOutcome,
    config: &ScannerConfig,
) -> ExtractedMetrics {
    let raw_lines: Vec<&str> = unit.content.lines().collect();
    let mut methods = Vec::new();
    let mut method_class: Vec<Option<usize>> = Vec::new();
    let mut errors = Vec::new();

    for boundary in &outcome.methods {
        if boundary.start_line == 0
            || boundary.end_line < boundary.start_line
            || boundary.end_line > raw_lines.len()
        {
            errors.push(ScanError::new(
                ScanErrorKind::DegenerateSpan,
                unit.path.clone(),
                format!(
                    "method '{}' has degenerate span {}..{}",
                    boundary.name, boundary.start_line, boundary.end_line
                ),
            ));
            continue;
        }

        let mut method = CodeMethod::new(
            boundary.name.clone(),
            unit.path.clone(),
            boundary.start_line,
            boundary.end_line,
        );

        let span = boundary.start_line - 1..boundary.end_line;

        for code in &outcome.code_lines[span.clone()] {
            method.cyclomatic += count_branch_tokens(code, &config.branch_tokens);
        }

        method.nesting = outcome.depth_trace[span.clone()]
            .iter()
            .map(|depth| depth.saturating_sub(boundary.body_depth))
            .max()
            .unwrap_or(0);

        method.length = raw_lines[span]
            .iter()
            .filter(|line| !line.trim().is_empty())
            .count();

        if method.length == 0 {
            errors.push(ScanError::new(
                ScanErrorKind::DegenerateSpan,
                unit.path.clone(),
                format!("method '{}' span contains no code lines", boundary.name),
            ));
            continue;
        }

        methods.push(method);
        method_class.push(boundary.class_index);
    }

    let classes = outcome
        .classes
        .iter()
        .enumerate()
        .map(|(index, class)| CodeClass {
            name: class.name.clone(),
            file: unit.path.clone(),
            start_line: class.start_line,
            end_line: class.end_line,
            methods: methods
                .iter()
                .zip(&method_class)
                .filter(|(_, owner)| **owner == Some(index))
                .map(|(method, _)| method.clone())
                .collect(),
        })
        .collect();

    ExtractedMetrics {
        methods,
        classes,
        errors,
    }
}

/// Count control-flow and short-circuit tokens in one blanked code line.
/// Word tokens match on word boundaries only; `&&`, `||` and the ternary
/// `?` are scanned as operators.
pub fn count_branch_tokens(code: &str, branch_tokens: &[String]) -> u32 {
    let mut count = 0;

    for token in branch_tokens {
        count += count_word(code, token);
    }

    let bytes = code.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'&' if bytes.get(i + 1) == Some(&b'&') => {
                count += 1;
                i += 2;
            }
            b'|' if bytes.get(i + 1) == Some(&b'|') => {
                count += 1;
                i += 2;
            }
            // Ternary conditional; `??` and `?.` are chaining operators,
            // not branches.
            b'?' => {
                let next = bytes.get(i + 1);
                if next != Some(&b'?') && next != Some(&b'.') {
                    count += 1;
                }
                i += match next {
                    Some(&b'?') => 2,
                    _ => 1,
                };
            }
            _ => i += 1,
        }
    }

    count
}

fn count_word(code: &str, word: &str) -> u32 {
    if word.is_empty() {
        return 0;
    }

    let mut count = 0;
    let mut search = code;
    let mut offset = 0;

    while let Some(pos) = search.find(word) {
        let absolute = offset + pos;
        let before_ok = absolute == 0 || !is_word_char(code.as_bytes()[absolute - 1]);
        let after = absolute + word.len();
        let after_ok = after >= code.len() || !is_word_char(code.as_bytes()[after]);

        if before_ok && after_ok {
            count += 1;
        }

        offset = absolute + word.len();
        search = &code[offset..];
    }

    count
}

fn is_word_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}
