pub mod loader;

use crate::core::errors::{Error, Result};
use serde::{Deserialize, Serialize};

/// Complete engine configuration. Every field carries a serde default so a
/// partial TOML file only overrides what it names.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub thresholds: ThresholdsConfig,

    #[serde(default)]
    pub duplication: DuplicationConfig,

    #[serde(default)]
    pub pricing: DebtPricing,

    #[serde(default)]
    pub planning: PlanningConfig,

    #[serde(default)]
    pub scanner: ScannerConfig,

    /// Pre-identified architectural and performance findings supplied by
    /// external analyzers. The engine prices them; it never computes them.
    #[serde(default)]
    pub findings: ExternalFindings,
}

impl AnalysisConfig {
    /// Fatal validation pass. A run must not start on a config that would
    /// make downstream pricing or planning meaningless.
    pub fn validate(&self) -> Result<()> {
        self.thresholds.validate()?;
        self.duplication.validate()?;
        self.pricing.validate()?;
        self.planning.validate()?;
        self.scanner.validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdsConfig {
    #[serde(default = "default_method_complexity_warning")]
    pub method_complexity_warning: u32,

    #[serde(default = "default_method_complexity_critical")]
    pub method_complexity_critical: u32,

    #[serde(default = "default_nesting_warning")]
    pub nesting_warning: u32,

    #[serde(default = "default_nesting_critical")]
    pub nesting_critical: u32,

    #[serde(default = "default_method_length_warning")]
    pub method_length_warning: usize,

    #[serde(default = "default_method_length_critical")]
    pub method_length_critical: usize,

    #[serde(default = "default_class_complexity_warning")]
    pub class_complexity_warning: u32,

    #[serde(default = "default_class_complexity_critical")]
    pub class_complexity_critical: u32,
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        Self {
            method_complexity_warning: default_method_complexity_warning(),
            method_complexity_critical: default_method_complexity_critical(),
            nesting_warning: default_nesting_warning(),
            nesting_critical: default_nesting_critical(),
            method_length_warning: default_method_length_warning(),
            method_length_critical: default_method_length_critical(),
            class_complexity_warning: default_class_complexity_warning(),
            class_complexity_critical: default_class_complexity_critical(),
        }
    }
}

impl ThresholdsConfig {
    fn validate(&self) -> Result<()> {
        let ordered = [
            (
                "method_complexity",
                self.method_complexity_warning as u64,
                self.method_complexity_critical as u64,
            ),
            (
                "nesting",
                self.nesting_warning as u64,
                self.nesting_critical as u64,
            ),
            (
                "method_length",
                self.method_length_warning as u64,
                self.method_length_critical as u64,
            ),
            (
                "class_complexity",
                self.class_complexity_warning as u64,
                self.class_complexity_critical as u64,
            ),
        ];

        for (name, warning, critical) in ordered {
            if warning == 0 {
                return Err(Error::config(format!(
                    "{name} warning threshold must be positive"
                )));
            }
            if warning >= critical {
                return Err(Error::config(format!(
                    "{name} warning threshold ({warning}) must be below critical ({critical})"
                )));
            }
        }
        Ok(())
    }
}

fn default_method_complexity_warning() -> u32 {
    15
}
fn default_method_complexity_critical() -> u32 {
    25
}
fn default_nesting_warning() -> u32 {
    4
}
fn default_nesting_critical() -> u32 {
    6
}
fn default_method_length_warning() -> usize {
    50
}
fn default_method_length_critical() -> usize {
    100
}
fn default_class_complexity_warning() -> u32 {
    10
}
fn default_class_complexity_critical() -> u32 {
    20
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicationConfig {
    /// Minimum non-blank method length before a body is hashed at all.
    #[serde(default = "default_duplication_min_lines")]
    pub min_lines: usize,

    /// Group size at which duplication escalates from Warning to Critical.
    #[serde(default = "default_duplication_high_count")]
    pub high_count: usize,

    #[serde(default)]
    pub normalization: NormalizationPolicy,
}

impl Default for DuplicationConfig {
    fn default() -> Self {
        Self {
            min_lines: default_duplication_min_lines(),
            high_count: default_duplication_high_count(),
            normalization: NormalizationPolicy::default(),
        }
    }
}

impl DuplicationConfig {
    fn validate(&self) -> Result<()> {
        if self.min_lines == 0 {
            return Err(Error::config("duplication min_lines must be positive"));
        }
        if self.high_count < 2 {
            return Err(Error::config(
                "duplication high_count must be at least 2 (a group needs two members)",
            ));
        }
        Ok(())
    }
}

fn default_duplication_min_lines() -> usize {
    50
}
fn default_duplication_high_count() -> usize {
    4
}

/// Which variance is erased before hashing method bodies: formatting
/// always, literal values by default. Deliberately catches copy-paste
/// duplication, not semantic equivalence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizationPolicy {
    #[serde(default = "default_true")]
    pub trim_lines: bool,

    #[serde(default = "default_true")]
    pub drop_blank_lines: bool,

    #[serde(default = "default_true")]
    pub drop_line_comments: bool,

    /// Replace numeric literals with `0` and string literal contents with
    /// the empty string, so copies differing only in constants still match.
    #[serde(default = "default_true")]
    pub mask_literals: bool,

    #[serde(default)]
    pub collapse_whitespace: bool,
}

impl Default for NormalizationPolicy {
    fn default() -> Self {
        Self {
            trim_lines: true,
            drop_blank_lines: true,
            drop_line_comments: true,
            mask_literals: true,
            collapse_whitespace: false,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Debt pricing table: severity and finding kind to engineer-hours.
/// Data-driven so pricing stays testable independent of classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebtPricing {
    #[serde(default = "default_critical_hours")]
    pub critical_hours: f64,

    #[serde(default = "default_warning_hours")]
    pub warning_hours: f64,

    #[serde(default = "default_info_hours")]
    pub info_hours: f64,

    #[serde(default = "default_coupling_hours")]
    pub coupling_hours: f64,

    #[serde(default = "default_cycle_hours")]
    pub cycle_hours: f64,

    #[serde(default = "default_memory_hours")]
    pub memory_hours: f64,

    #[serde(default = "default_algorithm_hours")]
    pub algorithm_hours: f64,

    /// Debt density (hours per 1000 LOC) at which sustainability reaches
    /// zero.
    #[serde(default = "default_density_ceiling")]
    pub density_ceiling: f64,
}

impl Default for DebtPricing {
    fn default() -> Self {
        Self {
            critical_hours: default_critical_hours(),
            warning_hours: default_warning_hours(),
            info_hours: default_info_hours(),
            coupling_hours: default_coupling_hours(),
            cycle_hours: default_cycle_hours(),
            memory_hours: default_memory_hours(),
            algorithm_hours: default_algorithm_hours(),
            density_ceiling: default_density_ceiling(),
        }
    }
}

impl DebtPricing {
    fn validate(&self) -> Result<()> {
        let hours = [
            ("critical_hours", self.critical_hours),
            ("warning_hours", self.warning_hours),
            ("info_hours", self.info_hours),
            ("coupling_hours", self.coupling_hours),
            ("cycle_hours", self.cycle_hours),
            ("memory_hours", self.memory_hours),
            ("algorithm_hours", self.algorithm_hours),
        ];
        for (name, value) in hours {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::config(format!(
                    "pricing {name} must be a non-negative finite number"
                )));
            }
        }
        if !self.density_ceiling.is_finite() || self.density_ceiling <= 0.0 {
            return Err(Error::config("pricing density_ceiling must be positive"));
        }
        Ok(())
    }
}

fn default_critical_hours() -> f64 {
    4.0
}
fn default_warning_hours() -> f64 {
    2.0
}
fn default_info_hours() -> f64 {
    1.0
}
fn default_coupling_hours() -> f64 {
    8.0
}
fn default_cycle_hours() -> f64 {
    16.0
}
fn default_memory_hours() -> f64 {
    12.0
}
fn default_algorithm_hours() -> f64 {
    20.0
}
fn default_density_ceiling() -> f64 {
    50.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanningConfig {
    /// Quality violations priced at or below this are quick-win candidates.
    #[serde(default = "default_quick_win_max_hours")]
    pub quick_win_max_hours: f64,

    /// Effort range spread: a task priced at H hours is planned as
    /// [H, H * effort_spread].
    #[serde(default = "default_effort_spread")]
    pub effort_spread: f64,
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            quick_win_max_hours: default_quick_win_max_hours(),
            effort_spread: default_effort_spread(),
        }
    }
}

impl PlanningConfig {
    fn validate(&self) -> Result<()> {
        if !self.quick_win_max_hours.is_finite() || self.quick_win_max_hours <= 0.0 {
            return Err(Error::config("planning quick_win_max_hours must be positive"));
        }
        if !self.effort_spread.is_finite() || self.effort_spread < 1.0 {
            return Err(Error::config(
                "planning effort_spread must be at least 1.0 (upper bound below lower bound)",
            ));
        }
        Ok(())
    }
}

fn default_quick_win_max_hours() -> f64 {
    4.0
}
fn default_effort_spread() -> f64 {
    2.0
}

/// Signature patterns driving heuristic boundary detection. These are word
/// tables, not grammar; detection stays deterministic and total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Keywords that introduce a method on their own (`fn name(`, `def name(`).
    #[serde(default = "default_method_keywords")]
    pub method_keywords: Vec<String>,

    /// Access modifiers and decorations allowed ahead of a signature.
    #[serde(default = "default_modifiers")]
    pub modifiers: Vec<String>,

    #[serde(default = "default_class_keywords")]
    pub class_keywords: Vec<String>,

    /// Leading keywords that disqualify a line from being a signature.
    #[serde(default = "default_control_keywords")]
    pub control_keywords: Vec<String>,

    /// Word tokens counted toward cyclomatic complexity.
    #[serde(default = "default_branch_tokens")]
    pub branch_tokens: Vec<String>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            method_keywords: default_method_keywords(),
            modifiers: default_modifiers(),
            class_keywords: default_class_keywords(),
            control_keywords: default_control_keywords(),
            branch_tokens: default_branch_tokens(),
        }
    }
}

impl ScannerConfig {
    fn validate(&self) -> Result<()> {
        if self.method_keywords.is_empty() && self.modifiers.is_empty() {
            return Err(Error::config(
                "scanner needs at least one method keyword or modifier pattern",
            ));
        }
        if self.class_keywords.is_empty() {
            return Err(Error::config("scanner class_keywords must not be empty"));
        }
        if self.branch_tokens.is_empty() {
            return Err(Error::config("scanner branch_tokens must not be empty"));
        }
        Ok(())
    }
}

fn default_method_keywords() -> Vec<String> {
    ["fn", "def", "function"].iter().map(|s| s.to_string()).collect()
}

fn default_modifiers() -> Vec<String> {
    [
        "pub", "public", "private", "protected", "internal", "static", "final", "async",
        "override", "virtual", "abstract", "const", "unsafe", "export",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_class_keywords() -> Vec<String> {
    ["class", "struct", "interface", "trait", "impl", "enum"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_control_keywords() -> Vec<String> {
    [
        "if", "else", "for", "foreach", "while", "do", "switch", "match", "case", "catch",
        "return", "new", "try", "loop",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_branch_tokens() -> Vec<String> {
    ["if", "for", "foreach", "while", "case", "catch"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Findings the engine only prices, never computes.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExternalFindings {
    /// Modules flagged for high coupling by a dependency-graph analyzer.
    #[serde(default)]
    pub coupling_modules: Vec<String>,

    /// Each cycle is the ordered module list forming it.
    #[serde(default)]
    pub dependency_cycles: Vec<Vec<String>>,

    /// Leak or excessive-allocation sites from a profiler.
    #[serde(default)]
    pub memory_issues: Vec<FindingSite>,

    /// Inefficient-algorithm sites from a profiler.
    #[serde(default)]
    pub algorithm_issues: Vec<FindingSite>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FindingSite {
    pub subject: String,
    #[serde(default)]
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(AnalysisConfig::default().validate().is_ok());
    }

    #[test]
    fn warning_at_or_above_critical_is_fatal() {
        let mut config = AnalysisConfig::default();
        config.thresholds.method_complexity_warning = 25;
        config.thresholds.method_complexity_critical = 25;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_duplication_floor_is_fatal() {
        let mut config = AnalysisConfig::default();
        config.duplication.min_lines = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn non_positive_density_ceiling_is_fatal() {
        let mut config = AnalysisConfig::default();
        config.pricing.density_ceiling = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn effort_spread_below_one_is_fatal() {
        let mut config = AnalysisConfig::default();
        config.planning.effort_spread = 0.5;
        assert!(config.validate().is_err());
    }
}
