//! Violation classifier: pure threshold comparison.
//!
//! Deterministic given identical metrics and configuration. At most one
//! violation is emitted per (subject, kind); when a metric exceeds both
//! bounds the Critical classification shadows the Warning one.

use crate::config::ThresholdsConfig;
use crate::core::{CodeClass, CodeMethod, Severity, Violation, ViolationKind};
use std::path::PathBuf;

pub fn classify(
    methods: &[CodeMethod],
    classes: &[CodeClass],
    thresholds: &ThresholdsConfig,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    for method in methods {
        violations.extend(classify_method(method, thresholds));
    }
    for class in classes {
        violations.extend(classify_class(class, thresholds));
    }

    violations
}

pub fn classify_method(method: &CodeMethod, thresholds: &ThresholdsConfig) -> Vec<Violation> {
    let mut violations = Vec::new();

    if let Some(v) = check(
        ViolationKind::MethodComplexity,
        method.cyclomatic as f64,
        thresholds.method_complexity_warning as f64,
        thresholds.method_complexity_critical as f64,
        method.subject(),
        &method.file,
        method.start_line,
    ) {
        violations.push(v);
    }

    if let Some(v) = check(
        ViolationKind::NestingDepth,
        method.nesting as f64,
        thresholds.nesting_warning as f64,
        thresholds.nesting_critical as f64,
        method.subject(),
        &method.file,
        method.start_line,
    ) {
        violations.push(v);
    }

    if let Some(v) = check(
        ViolationKind::MethodLength,
        method.length as f64,
        thresholds.method_length_warning as f64,
        thresholds.method_length_critical as f64,
        method.subject(),
        &method.file,
        method.start_line,
    ) {
        violations.push(v);
    }

    violations
}

pub fn classify_class(class: &CodeClass, thresholds: &ThresholdsConfig) -> Option<Violation> {
    check(
        ViolationKind::ClassComplexity,
        class.total_complexity() as f64,
        thresholds.class_complexity_warning as f64,
        thresholds.class_complexity_critical as f64,
        class.subject(),
        &class.file,
        class.start_line,
    )
}

fn check(
    kind: ViolationKind,
    observed: f64,
    warning: f64,
    critical: f64,
    subject: String,
    file: &PathBuf,
    line: usize,
) -> Option<Violation> {
    let (severity, threshold) = if observed > critical {
        (Severity::Critical, critical)
    } else if observed > warning {
        (Severity::Warning, warning)
    } else {
        return None;
    };

    Some(Violation {
        kind,
        severity,
        subject,
        file: Some(file.clone()),
        line: Some(line),
        observed,
        threshold,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method(cyclomatic: u32, nesting: u32, length: usize) -> CodeMethod {
        let mut m = CodeMethod::new("m".to_string(), PathBuf::from("a.rs"), 1, length.max(1));
        m.cyclomatic = cyclomatic;
        m.nesting = nesting;
        m.length = length;
        m
    }

    #[test]
    fn metric_at_threshold_is_not_a_violation() {
        let violations = classify_method(&method(15, 4, 50), &ThresholdsConfig::default());
        assert!(violations.is_empty());
    }

    #[test]
    fn critical_shadows_warning() {
        let violations = classify_method(&method(26, 0, 1), &ThresholdsConfig::default());
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].severity, Severity::Critical);
        assert_eq!(violations[0].threshold, 25.0);
    }

    #[test]
    fn each_metric_classified_independently() {
        let violations = classify_method(&method(17, 5, 60), &ThresholdsConfig::default());
        let kinds: Vec<_> = violations.iter().map(|v| v.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ViolationKind::MethodComplexity,
                ViolationKind::NestingDepth,
                ViolationKind::MethodLength,
            ]
        );
        assert!(violations.iter().all(|v| v.severity == Severity::Warning));
    }

    #[test]
    fn class_complexity_from_method_sum() {
        let class = CodeClass {
            name: "C".to_string(),
            file: PathBuf::from("a.rs"),
            start_line: 1,
            end_line: 50,
            methods: vec![method(6, 0, 5), method(7, 0, 5)],
        };
        let violation = classify_class(&class, &ThresholdsConfig::default()).unwrap();
        assert_eq!(violation.kind, ViolationKind::ClassComplexity);
        assert_eq!(violation.observed, 13.0);
        assert_eq!(violation.severity, Severity::Warning);
    }
}
