use crate::core::{CodeMethod, ComplexitySummary};

pub fn calculate_average_complexity(methods: &[CodeMethod]) -> f64 {
    if methods.is_empty() {
        return 0.0;
    }

    let total: u32 = methods.iter().map(|m| m.cyclomatic).sum();
    total as f64 / methods.len() as f64
}

pub fn find_max_complexity(methods: &[CodeMethod]) -> u32 {
    methods.iter().map(|m| m.cyclomatic).max().unwrap_or(0)
}

pub fn count_high_complexity(methods: &[CodeMethod], threshold: u32) -> usize {
    methods.iter().filter(|m| m.cyclomatic > threshold).count()
}

pub fn summarize(methods: &[CodeMethod], high_threshold: u32) -> ComplexitySummary {
    ComplexitySummary {
        total_functions: methods.len(),
        average_complexity: calculate_average_complexity(methods),
        max_complexity: find_max_complexity(methods),
        high_complexity_count: count_high_complexity(methods, high_threshold),
    }
}
