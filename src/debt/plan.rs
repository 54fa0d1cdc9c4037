//! Remediation planner: violations to a prioritized task list.
//!
//! Bucketing is mechanical: cheap Quality violations fixable by extraction
//! are quick wins, coupling work is medium-term, cycles and performance
//! findings are long-term. The final ordering is stable and total so the
//! plan is reproducible run over run.

use crate::config::{DebtPricing, PlanningConfig};
use crate::core::{Bucket, CategoryName, Impact, RemediationTask, Severity, Violation, ViolationKind};
use crate::debt::estimate::{category_of, price_violation};
use std::cmp::Ordering;

pub fn plan_remediation(
    violations: &[Violation],
    pricing: &DebtPricing,
    planning: &PlanningConfig,
) -> Vec<RemediationTask> {
    let mut tasks: Vec<RemediationTask> = violations
        .iter()
        .map(|violation| build_task(violation, pricing, planning))
        .collect();

    tasks.sort_by(compare_tasks);
    tasks
}

fn build_task(
    violation: &Violation,
    pricing: &DebtPricing,
    planning: &PlanningConfig,
) -> RemediationTask {
    let hours = price_violation(violation, pricing);
    let category = category_of(violation.kind);
    let bucket = assign_bucket(violation, category, hours, planning);

    let impact = if violation.severity == Severity::Critical {
        Impact::Critical
    } else if category != CategoryName::Quality {
        Impact::High
    } else {
        Impact::Medium
    };

    RemediationTask {
        title: task_title(violation),
        subject: violation.subject.clone(),
        effort_min_hours: hours,
        effort_max_hours: hours * planning.effort_spread,
        impact,
        bucket,
        auto_fixable: bucket == Bucket::QuickWin && violation.kind == ViolationKind::MethodLength,
    }
}

fn assign_bucket(
    violation: &Violation,
    category: CategoryName,
    hours: f64,
    planning: &PlanningConfig,
) -> Bucket {
    match violation.kind {
        ViolationKind::MethodLength | ViolationKind::MethodComplexity
            if hours <= planning.quick_win_max_hours =>
        {
            Bucket::QuickWin
        }
        ViolationKind::CircularDependency => Bucket::LongTerm,
        _ if category == CategoryName::Performance => Bucket::LongTerm,
        // Coupling, and Quality work too structural for mechanical
        // extraction, lands in the medium bucket.
        _ => Bucket::MediumTerm,
    }
}

fn task_title(violation: &Violation) -> String {
    match violation.kind {
        ViolationKind::MethodComplexity => format!("Reduce complexity of {}", violation.subject),
        ViolationKind::ClassComplexity => format!("Split class {}", violation.subject),
        ViolationKind::NestingDepth => format!("Flatten nesting in {}", violation.subject),
        ViolationKind::MethodLength => {
            format!("Extract smaller functions from {}", violation.subject)
        }
        ViolationKind::Duplication => format!("Deduplicate {}", violation.subject),
        ViolationKind::Coupling => format!("Decouple module {}", violation.subject),
        ViolationKind::CircularDependency => {
            format!("Break dependency cycle {}", violation.subject)
        }
        ViolationKind::MemoryDebt => format!("Fix memory issue at {}", violation.subject),
        ViolationKind::AlgorithmDebt => {
            format!("Replace inefficient algorithm at {}", violation.subject)
        }
    }
}

/// Quick wins first by ascending effort; then medium-term, then long-term
/// by descending impact and ascending effort. Subject breaks every tie so
/// the order is total.
fn compare_tasks(a: &RemediationTask, b: &RemediationTask) -> Ordering {
    a.bucket.cmp(&b.bucket).then_with(|| {
        let by_bucket = match a.bucket {
            Bucket::QuickWin => a.effort_min_hours.total_cmp(&b.effort_min_hours),
            Bucket::MediumTerm | Bucket::LongTerm => b
                .impact
                .cmp(&a.impact)
                .then(a.effort_min_hours.total_cmp(&b.effort_min_hours)),
        };
        by_bucket.then_with(|| a.subject.cmp(&b.subject))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn violation(kind: ViolationKind, severity: Severity, subject: &str) -> Violation {
        Violation {
            kind,
            severity,
            subject: subject.to_string(),
            file: None,
            line: None,
            observed: 0.0,
            threshold: 0.0,
        }
    }

    fn plan(violations: &[Violation]) -> Vec<RemediationTask> {
        plan_remediation(violations, &DebtPricing::default(), &PlanningConfig::default())
    }

    #[test]
    fn warning_method_complexity_is_quick_win() {
        let tasks = plan(&[violation(
            ViolationKind::MethodComplexity,
            Severity::Warning,
            "a.rs::m",
        )]);
        assert_eq!(tasks[0].bucket, Bucket::QuickWin);
        assert_eq!(tasks[0].effort_min_hours, 2.0);
        assert_eq!(tasks[0].effort_max_hours, 4.0);
        assert_eq!(tasks[0].impact, Impact::Medium);
        assert!(!tasks[0].auto_fixable);
    }

    #[test]
    fn quick_win_method_length_is_auto_fixable() {
        let tasks = plan(&[violation(
            ViolationKind::MethodLength,
            Severity::Warning,
            "a.rs::m",
        )]);
        assert!(tasks[0].auto_fixable);
    }

    #[test]
    fn nesting_violations_are_never_quick_wins() {
        let tasks = plan(&[violation(
            ViolationKind::NestingDepth,
            Severity::Warning,
            "a.rs::m",
        )]);
        assert_eq!(tasks[0].bucket, Bucket::MediumTerm);
    }

    #[test]
    fn coupling_is_medium_and_cycles_are_long_term() {
        let tasks = plan(&[
            violation(ViolationKind::CircularDependency, Severity::Warning, "a -> b -> a"),
            violation(ViolationKind::Coupling, Severity::Warning, "billing"),
        ]);
        assert_eq!(tasks[0].bucket, Bucket::MediumTerm);
        assert_eq!(tasks[0].impact, Impact::High);
        assert_eq!(tasks[1].bucket, Bucket::LongTerm);
    }

    #[test]
    fn performance_findings_are_long_term() {
        let tasks = plan(&[violation(
            ViolationKind::AlgorithmDebt,
            Severity::Warning,
            "search.rs:12",
        )]);
        assert_eq!(tasks[0].bucket, Bucket::LongTerm);
        assert_eq!(tasks[0].effort_min_hours, 20.0);
    }

    #[test]
    fn critical_severity_raises_impact() {
        let tasks = plan(&[violation(
            ViolationKind::Duplication,
            Severity::Critical,
            "a.rs::m",
        )]);
        assert_eq!(tasks[0].impact, Impact::Critical);
    }

    #[test]
    fn ordering_is_bucket_then_effort_then_subject() {
        let tasks = plan(&[
            violation(ViolationKind::AlgorithmDebt, Severity::Warning, "perf"),
            violation(ViolationKind::MethodComplexity, Severity::Warning, "b.rs::m"),
            violation(ViolationKind::MethodComplexity, Severity::Warning, "a.rs::m"),
            violation(ViolationKind::Coupling, Severity::Warning, "billing"),
        ]);
        let subjects: Vec<&str> = tasks.iter().map(|t| t.subject.as_str()).collect();
        assert_eq!(subjects, vec!["a.rs::m", "b.rs::m", "billing", "perf"]);
    }
}
