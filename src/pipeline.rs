//! Analysis pipeline: parallel map over source units, sequential reduce.
//!
//! Workers produce owned `FileAnalysis` values; the reduce phase is the
//! only place shared aggregates are built, and it runs single-threaded on
//! the caller. Final lists are sorted by a fixed total order so report
//! content is independent of scheduling order and thread count.

use crate::analyzers::analyze_unit;
use crate::config::AnalysisConfig;
use crate::core::errors::Result;
use crate::core::{metrics, AnalysisReport, FileAnalysis, ScanError, SourceUnit, UnitSummary};
use crate::debt::classify::classify;
use crate::debt::duplication::detect_duplication;
use crate::debt::estimate::{estimate_debt, findings_to_violations};
use crate::debt::plan::plan_remediation;
use chrono::Utc;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};

/// Run the full pipeline to completion.
pub fn analyze(units: &[SourceUnit], config: &AnalysisConfig) -> Result<AnalysisReport> {
    analyze_units(units, Vec::new(), config, &AtomicBool::new(false))
}

/// Run the full pipeline with carried-in read errors and a cooperative
/// cancellation flag, checked at each file boundary. A cancelled run
/// returns a report explicitly marked incomplete, never a silently
/// partial one.
pub fn analyze_units(
    units: &[SourceUnit],
    read_errors: Vec<ScanError>,
    config: &AnalysisConfig,
    cancel: &AtomicBool,
) -> Result<AnalysisReport> {
    config.validate()?;

    log::debug!("Analyzing {} source units", units.len());

    // Map phase: independent per-file work, no shared mutable state.
    let analyses: Vec<FileAnalysis> = units
        .par_iter()
        .filter_map(|unit| {
            if cancel.load(Ordering::Relaxed) {
                None
            } else {
                Some(analyze_unit(unit, config))
            }
        })
        .collect();

    let complete = !cancel.load(Ordering::Relaxed) && analyses.len() == units.len();
    if !complete {
        log::warn!(
            "Run cancelled after {} of {} units; report marked incomplete",
            analyses.len(),
            units.len()
        );
    }

    Ok(reduce(analyses, read_errors, config, complete))
}

/// Reduce phase: strictly sequential merge of per-file results into the
/// report.
fn reduce(
    mut analyses: Vec<FileAnalysis>,
    read_errors: Vec<ScanError>,
    config: &AnalysisConfig,
    complete: bool,
) -> AnalysisReport {
    analyses.sort_by(|a, b| a.path.cmp(&b.path));

    let mut units = Vec::with_capacity(analyses.len());
    let mut methods = Vec::new();
    let mut classes = Vec::new();
    let mut scan_errors = read_errors;

    for analysis in analyses {
        units.push(UnitSummary {
            path: analysis.path.clone(),
            language: analysis.language,
            line_count: analysis.line_count,
            method_count: analysis.methods.len(),
            class_count: analysis.classes.len(),
            partial: analysis.partial,
        });
        methods.extend(analysis.methods);
        classes.extend(analysis.classes);
        scan_errors.extend(analysis.errors);
    }

    methods.sort_by(|a, b| (&a.file, a.start_line, &a.name).cmp(&(&b.file, b.start_line, &b.name)));
    classes.sort_by(|a, b| (&a.file, a.start_line, &a.name).cmp(&(&b.file, b.start_line, &b.name)));
    scan_errors.sort_by(|a, b| (&a.file, a.kind, &a.detail).cmp(&(&b.file, b.kind, &b.detail)));

    let mut violations = classify(&methods, &classes, &config.thresholds);
    violations.extend(detect_duplication(&methods, &config.duplication));
    violations.extend(findings_to_violations(&config.findings));
    violations.sort_by(|a, b| a.total_cmp(b));

    let total_loc: usize = units.iter().map(|u| u.line_count).sum();
    let estimate = estimate_debt(&violations, &config.pricing, total_loc);
    let tasks = plan_remediation(&violations, &config.pricing, &config.planning);
    let summary = metrics::summarize(&methods, config.thresholds.method_complexity_warning);

    log::debug!(
        "Reduced {} methods into {} violations, {:.1} debt hours",
        methods.len(),
        violations.len(),
        estimate.total_hours
    );

    AnalysisReport {
        timestamp: Utc::now(),
        units,
        violations,
        categories: estimate.categories,
        total_debt_hours: estimate.total_hours,
        total_loc,
        debt_density: estimate.debt_density,
        sustainability_index: estimate.sustainability_index,
        tasks,
        scan_errors,
        summary,
        complete,
    }
}
