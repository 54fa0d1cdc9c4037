//! Per-file analysis: the pure unit of work the parallel map runs.
//!
//! One call scans a unit, extracts its metrics and hashes duplication
//! candidates, returning an owned `FileAnalysis`. No shared state is
//! touched; merging happens later in the sequential reduce phase.

use crate::complexity::extract_metrics;
use crate::config::AnalysisConfig;
use crate::core::{FileAnalysis, SourceUnit};
use crate::debt::duplication::hash_body;
use crate::scanner::scan_unit;

pub fn analyze_unit(unit: &SourceUnit, config: &AnalysisConfig) -> FileAnalysis {
    let outcome = scan_unit(unit, &config.scanner);
    let mut extracted = extract_metrics(unit, &outcome, &config.scanner);

    let raw_lines: Vec<&str> = unit.content.lines().collect();
    for method in extracted.methods.iter_mut() {
        if method.length >= config.duplication.min_lines {
            let span = &raw_lines[method.start_line - 1..method.end_line];
            method.body_hash = Some(hash_body(span, &config.duplication.normalization));
        }
    }

    let mut errors = outcome.errors;
    errors.extend(extracted.errors);

    FileAnalysis {
        path: unit.path.clone(),
        language: unit.language,
        line_count: unit.line_count,
        methods: extracted.methods,
        classes: extracted.classes,
        partial: outcome.partial,
        errors,
    }
}
