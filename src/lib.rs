// Export modules for library usage
pub mod analyzers;
pub mod complexity;
pub mod config;
pub mod core;
pub mod debt;
pub mod io;
pub mod pipeline;
pub mod scanner;

// Re-export commonly used types
pub use crate::core::{
    AnalysisReport, Bucket, CategoryName, CodeClass, CodeMethod, ComplexitySummary, DebtCategory,
    FileAnalysis, Impact, Language, RemediationTask, ScanError, ScanErrorKind, Severity,
    SourceUnit, UnitSummary, Violation, ViolationKind,
};

pub use crate::core::errors::{Error, Result};

pub use crate::config::{
    loader::{load_config, parse_config},
    AnalysisConfig, DebtPricing, DuplicationConfig, ExternalFindings, FindingSite,
    NormalizationPolicy, PlanningConfig, ScannerConfig, ThresholdsConfig,
};

pub use crate::core::metrics::{
    calculate_average_complexity, count_high_complexity, find_max_complexity,
};

pub use crate::analyzers::analyze_unit;
pub use crate::debt::{
    classify::classify, duplication::detect_duplication, estimate::estimate_debt,
    plan::plan_remediation,
};
pub use crate::io::read_units;
pub use crate::pipeline::{analyze, analyze_units};
