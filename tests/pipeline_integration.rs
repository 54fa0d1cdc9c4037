use debtscan::*;
use pretty_assertions::assert_eq;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;

fn fixture_units() -> Vec<SourceUnit> {
    let mut units = Vec::new();

    let mut branchy = String::from("fn busy(a: i32) -> i32 {\n");
    for k in 0..20 {
        branchy.push_str(&format!("    if a > {k} {{\n        work();\n    }}\n"));
    }
    branchy.push_str("    a\n}\n");
    units.push(SourceUnit::new(PathBuf::from("src/busy.rs"), branchy));

    let long: String = {
        let mut s = String::from("fn lengthy() {\n");
        for k in 0..70 {
            s.push_str(&format!("    step{k}();\n"));
        }
        s.push_str("}\n");
        s
    };
    units.push(SourceUnit::new(PathBuf::from("src/long_a.rs"), long.clone()));
    units.push(SourceUnit::new(PathBuf::from("src/long_b.rs"), long));

    units.push(SourceUnit::new(
        PathBuf::from("src/tidy.py"),
        "def tidy(x):\n    return x\n".to_string(),
    ));

    units
}

fn findings_config() -> AnalysisConfig {
    let mut config = AnalysisConfig::default();
    config.findings.coupling_modules = vec!["billing".to_string()];
    config.findings.dependency_cycles =
        vec![vec!["a".to_string(), "b".to_string(), "a".to_string()]];
    config.findings.memory_issues = vec![FindingSite {
        subject: "cache.rs:40".to_string(),
        detail: "unbounded map".to_string(),
    }];
    config
}

/// Everything except the timestamp, which legitimately differs per run.
fn comparable(report: &AnalysisReport) -> (Vec<UnitSummary>, Vec<Violation>, Vec<RemediationTask>, String) {
    (
        report.units.clone(),
        report.violations.clone(),
        report.tasks.clone(),
        format!(
            "{:.6}/{:.6}/{:.6}",
            report.total_debt_hours, report.debt_density, report.sustainability_index
        ),
    )
}

#[test]
fn rerun_is_byte_identical_modulo_timestamp() {
    let config = findings_config();
    let first = analyze(&fixture_units(), &config).unwrap();
    let second = analyze(&fixture_units(), &config).unwrap();
    assert_eq!(comparable(&first), comparable(&second));
}

#[test]
fn report_is_independent_of_thread_count() {
    let config = findings_config();

    let single = rayon::ThreadPoolBuilder::new()
        .num_threads(1)
        .build()
        .unwrap()
        .install(|| analyze(&fixture_units(), &config).unwrap());
    let many = rayon::ThreadPoolBuilder::new()
        .num_threads(8)
        .build()
        .unwrap()
        .install(|| analyze(&fixture_units(), &config).unwrap());

    assert_eq!(comparable(&single), comparable(&many));
}

#[test]
fn violations_are_sorted_by_path_line_kind() {
    let report = analyze(&fixture_units(), &findings_config()).unwrap();
    let mut sorted = report.violations.clone();
    sorted.sort_by(|a, b| a.total_cmp(b));
    assert_eq!(report.violations, sorted);
}

#[test]
fn unbalanced_braces_degrade_to_partial_analysis() {
    let bad = SourceUnit::new(
        PathBuf::from("src/broken.rs"),
        "fn broken() {\n    if x {\n        work();\n}\n".to_string(),
    );
    let good = SourceUnit::new(
        PathBuf::from("src/fine.rs"),
        "fn fine() {\n    work();\n}\n".to_string(),
    );

    let report = analyze(&[bad, good], &AnalysisConfig::default()).unwrap();

    assert!(report.complete, "scan errors never abort the run");
    let ambiguity: Vec<_> = report
        .scan_errors
        .iter()
        .filter(|e| e.kind == ScanErrorKind::StructuralAmbiguity)
        .collect();
    assert_eq!(ambiguity.len(), 1);
    assert_eq!(ambiguity[0].file, PathBuf::from("src/broken.rs"));

    let broken = report
        .units
        .iter()
        .find(|u| u.path == PathBuf::from("src/broken.rs"))
        .unwrap();
    assert!(broken.partial);
    let fine = report
        .units
        .iter()
        .find(|u| u.path == PathBuf::from("src/fine.rs"))
        .unwrap();
    assert!(!fine.partial);
}

#[test]
fn invalid_configuration_yields_no_report() {
    let mut config = AnalysisConfig::default();
    config.thresholds.method_length_warning = 200;
    // warning above critical
    let result = analyze(&fixture_units(), &config);
    assert!(matches!(result, Err(Error::Configuration(_))));
}

#[test]
fn cancelled_run_is_marked_incomplete() {
    let cancel = AtomicBool::new(true);
    let report = analyze_units(
        &fixture_units(),
        Vec::new(),
        &AnalysisConfig::default(),
        &cancel,
    )
    .unwrap();
    assert!(!report.complete);
    assert!(report.units.is_empty());
}

#[test]
fn carried_read_errors_appear_in_report() {
    let read_errors = vec![ScanError::new(
        ScanErrorKind::UnreadableFile,
        PathBuf::from("src/gone.rs"),
        "permission denied",
    )];
    let cancel = AtomicBool::new(false);
    let report = analyze_units(
        &fixture_units(),
        read_errors,
        &AnalysisConfig::default(),
        &cancel,
    )
    .unwrap();
    assert!(report
        .scan_errors
        .iter()
        .any(|e| e.kind == ScanErrorKind::UnreadableFile));
    assert!(report.complete);
}

#[test]
fn report_round_trips_through_json() {
    let report = analyze(&fixture_units(), &findings_config()).unwrap();
    let json = serde_json::to_string(&report).unwrap();
    let back: AnalysisReport = serde_json::from_str(&json).unwrap();
    assert_eq!(comparable(&report), comparable(&back));
    assert_eq!(back.total_loc, report.total_loc);
}

#[test]
fn external_findings_flow_into_categories_and_tasks() {
    let report = analyze(&fixture_units(), &findings_config()).unwrap();

    let architectural = &report.categories[1];
    assert_eq!(architectural.name, CategoryName::Architectural);
    assert_eq!(architectural.hours, 24.0, "8h coupling + 16h cycle");

    let performance = &report.categories[2];
    assert_eq!(performance.hours, 12.0, "one memory issue");

    let cycle_task = report
        .tasks
        .iter()
        .find(|t| t.subject == "a -> b -> a")
        .unwrap();
    assert_eq!(cycle_task.bucket, Bucket::LongTerm);
    assert_eq!(cycle_task.impact, Impact::High);
}
