pub mod errors;
pub mod metrics;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};

/// One source file handed to the engine: raw text plus derived tags.
/// Created once per scan by the io layer; read-only downstream.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SourceUnit {
    pub path: PathBuf,
    pub content: String,
    pub line_count: usize,
    pub language: Language,
}

impl SourceUnit {
    pub fn new(path: PathBuf, content: String) -> Self {
        let line_count = content.lines().count();
        let language = Language::from_path(&path);
        Self {
            path,
            content,
            line_count,
            language,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CodeMethod {
    pub name: String,
    pub file: PathBuf,
    pub start_line: usize,
    pub end_line: usize,
    pub cyclomatic: u32,
    pub nesting: u32,
    pub length: usize,
    /// Present only when `length` reaches the duplication floor.
    pub body_hash: Option<String>,
}

impl CodeMethod {
    pub fn new(name: String, file: PathBuf, start_line: usize, end_line: usize) -> Self {
        Self {
            name,
            file,
            start_line,
            end_line,
            cyclomatic: 1,
            nesting: 0,
            length: 0,
            body_hash: None,
        }
    }

    pub fn subject(&self) -> String {
        format!("{}::{}", self.file.display(), self.name)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CodeClass {
    pub name: String,
    pub file: PathBuf,
    pub start_line: usize,
    pub end_line: usize,
    pub methods: Vec<CodeMethod>,
}

impl CodeClass {
    /// Aggregated complexity, always recomputed from the current method
    /// list rather than cached.
    pub fn total_complexity(&self) -> u32 {
        self.methods.iter().map(|m| m.cyclomatic).sum()
    }

    pub fn subject(&self) -> String {
        format!("{}::{}", self.file.display(), self.name)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Copy, PartialOrd, Ord)]
pub enum ViolationKind {
    MethodComplexity,
    ClassComplexity,
    NestingDepth,
    MethodLength,
    Duplication,
    Coupling,
    CircularDependency,
    MemoryDebt,
    AlgorithmDebt,
}

impl std::fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        static DISPLAY_STRINGS: &[(ViolationKind, &str)] = &[
            (ViolationKind::MethodComplexity, "Method Complexity"),
            (ViolationKind::ClassComplexity, "Class Complexity"),
            (ViolationKind::NestingDepth, "Nesting Depth"),
            (ViolationKind::MethodLength, "Method Length"),
            (ViolationKind::Duplication, "Duplication"),
            (ViolationKind::Coupling, "Coupling"),
            (ViolationKind::CircularDependency, "Circular Dependency"),
            (ViolationKind::MemoryDebt, "Memory Debt"),
            (ViolationKind::AlgorithmDebt, "Algorithm Debt"),
        ];

        let display_str = DISPLAY_STRINGS
            .iter()
            .find(|(k, _)| k == self)
            .map(|(_, s)| *s)
            .unwrap_or("Unknown");

        write!(f, "{display_str}")
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Copy, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Severity::Info => "Info",
            Severity::Warning => "Warning",
            Severity::Critical => "Critical",
        };
        write!(f, "{s}")
    }
}

/// Immutable record of one threshold breach or finding.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Violation {
    pub kind: ViolationKind,
    pub severity: Severity,
    pub subject: String,
    pub file: Option<PathBuf>,
    pub line: Option<usize>,
    pub observed: f64,
    pub threshold: f64,
}

impl Violation {
    /// Fixed total order: file path, then line, then kind, then subject.
    /// Report content must not depend on scheduling order.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.file
            .cmp(&other.file)
            .then(self.line.cmp(&other.line))
            .then(self.kind.cmp(&other.kind))
            .then(self.subject.cmp(&other.subject))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Copy, PartialOrd, Ord)]
pub enum CategoryName {
    Quality,
    Architectural,
    Performance,
}

impl std::fmt::Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CategoryName::Quality => "Quality",
            CategoryName::Architectural => "Architectural",
            CategoryName::Performance => "Performance",
        };
        write!(f, "{s}")
    }
}

/// A debt category and its priced violations. `hours` is derived from
/// `violations` by the estimator, never maintained independently.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DebtCategory {
    pub name: CategoryName,
    pub violations: Vec<Violation>,
    pub hours: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Copy, PartialOrd, Ord)]
pub enum Impact {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for Impact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Impact::Low => "Low",
            Impact::Medium => "Medium",
            Impact::High => "High",
            Impact::Critical => "Critical",
        };
        write!(f, "{s}")
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Copy, PartialOrd, Ord)]
pub enum Bucket {
    QuickWin,
    MediumTerm,
    LongTerm,
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Bucket::QuickWin => "Quick Win",
            Bucket::MediumTerm => "Medium Term",
            Bucket::LongTerm => "Long Term",
        };
        write!(f, "{s}")
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RemediationTask {
    pub title: String,
    pub subject: String,
    pub effort_min_hours: f64,
    pub effort_max_hours: f64,
    pub impact: Impact,
    pub bucket: Bucket,
    pub auto_fixable: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Copy, PartialOrd, Ord)]
pub enum ScanErrorKind {
    StructuralAmbiguity,
    DegenerateSpan,
    UnreadableFile,
}

impl std::fmt::Display for ScanErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ScanErrorKind::StructuralAmbiguity => "Structural Ambiguity",
            ScanErrorKind::DegenerateSpan => "Degenerate Span",
            ScanErrorKind::UnreadableFile => "Unreadable File",
        };
        write!(f, "{s}")
    }
}

/// Non-fatal, per-file problem. Collected into the report; never thrown
/// past the reduction boundary.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScanError {
    pub kind: ScanErrorKind,
    pub file: PathBuf,
    pub detail: String,
}

impl ScanError {
    pub fn new(kind: ScanErrorKind, file: impl Into<PathBuf>, detail: impl Into<String>) -> Self {
        Self {
            kind,
            file: file.into(),
            detail: detail.into(),
        }
    }
}

/// Owned, immutable result a worker returns for one file. Workers never
/// touch shared state; these are merged in the sequential reduce phase.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FileAnalysis {
    pub path: PathBuf,
    pub language: Language,
    pub line_count: usize,
    pub methods: Vec<CodeMethod>,
    pub classes: Vec<CodeClass>,
    pub errors: Vec<ScanError>,
    pub partial: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UnitSummary {
    pub path: PathBuf,
    pub language: Language,
    pub line_count: usize,
    pub method_count: usize,
    pub class_count: usize,
    pub partial: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ComplexitySummary {
    pub total_functions: usize,
    pub average_complexity: f64,
    pub max_complexity: u32,
    pub high_complexity_count: usize,
}

/// The single output of a run. Constructed once, never mutated after
/// return; rendering and CI gating happen outside the core.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub timestamp: DateTime<Utc>,
    pub units: Vec<UnitSummary>,
    pub violations: Vec<Violation>,
    pub categories: Vec<DebtCategory>,
    pub total_debt_hours: f64,
    pub total_loc: usize,
    pub debt_density: f64,
    pub sustainability_index: f64,
    pub tasks: Vec<RemediationTask>,
    pub scan_errors: Vec<ScanError>,
    pub summary: ComplexitySummary,
    /// False when the run was cancelled between file units.
    pub complete: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Copy, Hash)]
pub enum Language {
    Rust,
    Python,
    JavaScript,
    TypeScript,
    Java,
    CSharp,
    Unknown,
}

impl Language {
    pub fn from_extension(ext: &str) -> Self {
        static EXTENSION_MAP: &[(&[&str], Language)] = &[
            (&["rs"], Language::Rust),
            (&["py"], Language::Python),
            (&["js", "jsx", "mjs", "cjs"], Language::JavaScript),
            (&["ts", "tsx", "mts", "cts"], Language::TypeScript),
            (&["java"], Language::Java),
            (&["cs"], Language::CSharp),
        ];

        EXTENSION_MAP
            .iter()
            .find(|(exts, _)| exts.contains(&ext))
            .map(|(_, lang)| *lang)
            .unwrap_or(Language::Unknown)
    }

    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Language::Unknown)
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        static DISPLAY_STRINGS: &[(Language, &str)] = &[
            (Language::Rust, "Rust"),
            (Language::Python, "Python"),
            (Language::JavaScript, "JavaScript"),
            (Language::TypeScript, "TypeScript"),
            (Language::Java, "Java"),
            (Language::CSharp, "C#"),
            (Language::Unknown, "Unknown"),
        ];

        let display_str = DISPLAY_STRINGS
            .iter()
            .find(|(l, _)| l == self)
            .map(|(_, s)| *s)
            .unwrap_or("Unknown");

        write!(f, "{display_str}")
    }
}
