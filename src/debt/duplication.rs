//! Duplication detection over normalized method bodies.
//!
//! Bodies at or above the size floor are normalized and content-hashed;
//! methods sharing a hash are near-duplicates. Normalization erases
//! formatting variance and, by default, masks literal values, so copies
//! differing only in constants still match. That catches copy-paste
//! duplication, not semantic equivalence; a known heuristic limitation.

use crate::config::{DuplicationConfig, NormalizationPolicy};
use crate::core::{CodeMethod, Severity, Violation, ViolationKind};
use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// Normalize one method body according to policy.
pub fn normalize_body(lines: &[&str], policy: &NormalizationPolicy) -> String {
    lines
        .iter()
        .map(|line| {
            if policy.trim_lines {
                line.trim()
            } else {
                line
            }
        })
        .filter(|line| !policy.drop_blank_lines || !line.is_empty())
        .filter(|line| {
            !policy.drop_line_comments || !(line.starts_with("//") || line.starts_with('#'))
        })
        .map(|line| {
            let line = if policy.mask_literals {
                mask_line_literals(line)
            } else {
                line.to_string()
            };
            if policy.collapse_whitespace {
                line.split_whitespace().collect::<Vec<_>>().join(" ")
            } else {
                line
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Replace string literal contents with nothing and numeric literals with
/// `0`. Digits inside identifiers (`step2`) are left alone.
fn mask_line_literals(line: &str) -> String {
    let chars: Vec<char> = line.chars().collect();
    let mut out = String::with_capacity(line.len());
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        if ch == '"' {
            out.push('"');
            i += 1;
            while i < chars.len() {
                if chars[i] == '\\' {
                    i += 2;
                } else if chars[i] == '"' {
                    i += 1;
                    break;
                } else {
                    i += 1;
                }
            }
            out.push('"');
        } else if ch.is_ascii_digit()
            && !out
                .chars()
                .next_back()
                .is_some_and(|prev| prev.is_alphanumeric() || prev == '_')
        {
            out.push('0');
            while i < chars.len()
                && (chars[i].is_ascii_alphanumeric() || chars[i] == '_' || chars[i] == '.')
            {
                i += 1;
            }
        } else {
            out.push(ch);
            i += 1;
        }
    }

    out
}

pub fn hash_body(lines: &[&str], policy: &NormalizationPolicy) -> String {
    let normalized = normalize_body(lines, policy);
    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Group hashed methods and flag every member beyond the canonical first.
/// The canonical original is the first method in the fixed total order
/// (file path, then start line); it is never flagged.
pub fn detect_duplication(methods: &[CodeMethod], config: &DuplicationConfig) -> Vec<Violation> {
    let mut groups: HashMap<&str, Vec<&CodeMethod>> = HashMap::new();

    for method in methods {
        if let Some(hash) = method.body_hash.as_deref() {
            groups.entry(hash).or_default().push(method);
        }
    }

    let mut duplicate_groups: Vec<Vec<&CodeMethod>> = groups
        .into_values()
        .filter(|members| members.len() > 1)
        .collect();

    // Hash-map iteration order must not leak into the output.
    for members in duplicate_groups.iter_mut() {
        members.sort_by(|a, b| (&a.file, a.start_line).cmp(&(&b.file, b.start_line)));
    }
    duplicate_groups.sort_by(|a, b| (&a[0].file, a[0].start_line).cmp(&(&b[0].file, b[0].start_line)));

    let mut violations = Vec::new();
    for members in duplicate_groups {
        let severity = if members.len() >= config.high_count {
            Severity::Critical
        } else {
            Severity::Warning
        };

        for method in members.iter().skip(1) {
            violations.push(Violation {
                kind: ViolationKind::Duplication,
                severity,
                subject: method.subject(),
                file: Some(method.file.clone()),
                line: Some(method.start_line),
                observed: members.len() as f64,
                threshold: 2.0,
            });
        }
    }

    violations
}
