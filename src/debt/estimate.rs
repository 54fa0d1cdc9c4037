//! Debt estimator: violations to engineer-hours.
//!
//! Quality violations are priced per severity; architectural and
//! performance findings carry fixed per-item costs. The density and
//! sustainability formulas are fixed so independent implementations agree
//! bit-for-bit on rational inputs.

use crate::config::{DebtPricing, ExternalFindings};
use crate::core::{CategoryName, DebtCategory, Severity, Violation, ViolationKind};

#[derive(Clone, Debug)]
pub struct DebtEstimate {
    pub categories: Vec<DebtCategory>,
    pub total_hours: f64,
    pub debt_density: f64,
    pub sustainability_index: f64,
}

pub fn category_of(kind: ViolationKind) -> CategoryName {
    match kind {
        ViolationKind::MethodComplexity
        | ViolationKind::ClassComplexity
        | ViolationKind::NestingDepth
        | ViolationKind::MethodLength
        | ViolationKind::Duplication => CategoryName::Quality,
        ViolationKind::Coupling | ViolationKind::CircularDependency => CategoryName::Architectural,
        ViolationKind::MemoryDebt | ViolationKind::AlgorithmDebt => CategoryName::Performance,
    }
}

/// Hours for one violation, from the pricing table.
pub fn price_violation(violation: &Violation, pricing: &DebtPricing) -> f64 {
    match violation.kind {
        ViolationKind::Coupling => pricing.coupling_hours,
        ViolationKind::CircularDependency => pricing.cycle_hours,
        ViolationKind::MemoryDebt => pricing.memory_hours,
        ViolationKind::AlgorithmDebt => pricing.algorithm_hours,
        _ => match violation.severity {
            Severity::Critical => pricing.critical_hours,
            Severity::Warning => pricing.warning_hours,
            Severity::Info => pricing.info_hours,
        },
    }
}

/// Lift pre-identified architectural and performance findings into
/// violations. The engine never computes these; it only prices what the
/// external dependency-graph analyzer and profiler supplied.
pub fn findings_to_violations(findings: &ExternalFindings) -> Vec<Violation> {
    let mut violations = Vec::new();

    for module in &findings.coupling_modules {
        violations.push(Violation {
            kind: ViolationKind::Coupling,
            severity: Severity::Warning,
            subject: module.clone(),
            file: None,
            line: None,
            observed: 1.0,
            threshold: 0.0,
        });
    }

    for cycle in &findings.dependency_cycles {
        violations.push(Violation {
            kind: ViolationKind::CircularDependency,
            severity: Severity::Warning,
            subject: cycle.join(" -> "),
            file: None,
            line: None,
            observed: cycle.len() as f64,
            threshold: 0.0,
        });
    }

    for site in &findings.memory_issues {
        violations.push(Violation {
            kind: ViolationKind::MemoryDebt,
            severity: Severity::Warning,
            subject: site.subject.clone(),
            file: None,
            line: None,
            observed: 1.0,
            threshold: 0.0,
        });
    }

    for site in &findings.algorithm_issues {
        violations.push(Violation {
            kind: ViolationKind::AlgorithmDebt,
            severity: Severity::Warning,
            subject: site.subject.clone(),
            file: None,
            line: None,
            observed: 1.0,
            threshold: 0.0,
        });
    }

    violations
}

/// Aggregate all violations into the three categories and the run-level
/// scores:
///
/// totalDebtHours = sum(categoryHours)
/// debtDensity    = totalDebtHours / (totalLOC / 1000)
/// sustainability = clamp(1 - debtDensity / densityCeiling, 0, 1)
pub fn estimate_debt(
    violations: &[Violation],
    pricing: &DebtPricing,
    total_loc: usize,
) -> DebtEstimate {
    let categories: Vec<DebtCategory> = [
        CategoryName::Quality,
        CategoryName::Architectural,
        CategoryName::Performance,
    ]
    .into_iter()
    .map(|name| {
        let members: Vec<Violation> = violations
            .iter()
            .filter(|v| category_of(v.kind) == name)
            .cloned()
            .collect();
        let hours = members.iter().map(|v| price_violation(v, pricing)).sum();
        DebtCategory {
            name,
            violations: members,
            hours,
        }
    })
    .collect();

    let total_hours: f64 = categories.iter().map(|c| c.hours).sum();

    let debt_density = if total_loc == 0 {
        // No measured code: any priced debt saturates density.
        if total_hours > 0.0 {
            pricing.density_ceiling
        } else {
            0.0
        }
    } else {
        total_hours / (total_loc as f64 / 1000.0)
    };

    let sustainability_index = (1.0 - debt_density / pricing.density_ceiling).clamp(0.0, 1.0);

    DebtEstimate {
        categories,
        total_hours,
        debt_density,
        sustainability_index,
    }
}
