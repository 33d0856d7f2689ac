//! Shared data models: the input specification, the resolved rendering model,
//! findings, and the report shapes consumed by printers.

pub mod finding;
pub mod resolved;
pub mod spec;

use finding::Finding;
use serde::{Deserialize, Serialize};
use spec::Specification;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Audit categories, in the fixed order used for report aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Color,
    Scales,
    Text,
    Accessibility,
    Labels,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Color,
        Category::Scales,
        Category::Text,
        Category::Accessibility,
        Category::Labels,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Color => "color",
            Category::Scales => "scales",
            Category::Text => "text",
            Category::Accessibility => "accessibility",
            Category::Labels => "labels",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "color" | "colour" | "colors" => Ok(Category::Color),
            "scales" | "scale" => Ok(Category::Scales),
            "text" => Ok(Category::Text),
            "accessibility" | "a11y" => Ok(Category::Accessibility),
            "labels" | "label" => Ok(Category::Labels),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Issue,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A single categorized finding with its rendered message.
pub struct Issue {
    pub category: Category,
    pub severity: Severity,
    pub finding: Finding,
    pub message: String,
}

impl From<Finding> for Issue {
    fn from(finding: Finding) -> Self {
        Issue {
            category: finding.category(),
            severity: finding.severity(),
            message: finding.message(),
            finding,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
/// Output of one check module.
pub struct CheckResult {
    pub issues: Vec<Issue>,
    pub warnings: Vec<Issue>,
    pub suggestions: Vec<String>,
}

impl CheckResult {
    /// Record a finding in `issues` or `warnings` according to its severity.
    pub fn push(&mut self, finding: Finding) {
        let issue = Issue::from(finding);
        match issue.severity {
            Severity::Issue => self.issues.push(issue),
            Severity::Warning => self.warnings.push(issue),
        }
    }

    pub fn suggest(&mut self, text: impl Into<String>) {
        self.suggestions.push(text.into());
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty() && self.warnings.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
/// Snapshot of the audited plot's structure.
pub struct PlotInfo {
    pub layers: usize,
    pub geoms: Vec<String>,
    pub has_title: bool,
    pub has_subtitle: bool,
    pub has_caption: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
/// Merged audit results in fixed category order.
pub struct Report {
    pub plot_info: PlotInfo,
    pub issues: Vec<Issue>,
    pub warnings: Vec<Issue>,
    pub suggestions: Vec<String>,
    /// Categories that ran and found nothing.
    pub passed: Vec<Category>,
    /// Specification the report was produced from. Not serialized, so a
    /// report read back from JSON cannot drive auto-fixes.
    #[serde(skip)]
    pub origin: Option<Arc<Specification>>,
}

impl Report {
    pub fn summary(&self) -> Summary {
        Summary {
            issues: self.issues.len(),
            warnings: self.warnings.len(),
            suggestions: self.suggestions.len(),
            passed: self.passed.len(),
        }
    }

    /// Issues then warnings, in report order.
    pub fn entries(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().chain(self.warnings.iter())
    }

    pub fn has_code(&self, code: &str) -> bool {
        self.entries().any(|i| i.finding.code() == code)
    }

    /// Same report without the link to its specification.
    pub fn detached(&self) -> Report {
        Report {
            origin: None,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
/// Aggregated counts used by printers.
pub struct Summary {
    pub issues: usize,
    pub warnings: usize,
    pub suggestions: usize,
    pub passed: usize,
}
