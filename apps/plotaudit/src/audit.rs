//! Audit entry points: check selection, parallel check execution and the
//! ordered merge into a `Report`.
//!
//! Checks run on the rayon pool; the merge walks categories in their fixed
//! order so the report never depends on completion order.

use crate::checks::{self, Thresholds};
use crate::error::{AuditError, AuditResult};
use crate::features::{self, Features};
use crate::models::resolved::ResolvedModel;
use crate::models::spec::Specification;
use crate::models::{Category, CheckResult, PlotInfo, Report};
use rayon::prelude::*;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// Produces the resolved rendering model for a specification.
///
/// Building and resolving a plot is done by the plotting frontend; this is
/// the seam where it plugs in.
pub trait Resolve {
    fn resolve(&self, spec: &Specification) -> AuditResult<ResolvedModel>;
}

/// A model that was resolved ahead of time resolves to itself.
impl Resolve for ResolvedModel {
    fn resolve(&self, _spec: &Specification) -> AuditResult<ResolvedModel> {
        Ok(self.clone())
    }
}

/// Selected check categories, always iterated in report order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckSet {
    enabled: [bool; 5],
}

impl CheckSet {
    pub fn all() -> Self {
        Self { enabled: [true; 5] }
    }

    pub fn none() -> Self {
        Self {
            enabled: [false; 5],
        }
    }

    pub fn only(categories: impl IntoIterator<Item = Category>) -> Self {
        let mut set = Self::none();
        for c in categories {
            set.insert(c);
        }
        set
    }

    /// Parse `"all"` or a comma-separated list such as `"color,scales"`.
    pub fn parse(input: &str) -> AuditResult<Self> {
        let input = input.trim();
        if input.is_empty() || input.eq_ignore_ascii_case("all") {
            return Ok(Self::all());
        }
        let mut set = Self::none();
        for name in input.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            if name.eq_ignore_ascii_case("all") {
                return Ok(Self::all());
            }
            let category = name
                .parse::<Category>()
                .map_err(|_| AuditError::InvalidCheckName {
                    name: name.to_string(),
                    valid: valid_names(),
                })?;
            set.insert(category);
        }
        if set.is_empty() {
            return Err(AuditError::InvalidCheckName {
                name: input.to_string(),
                valid: valid_names(),
            });
        }
        Ok(set)
    }

    pub fn insert(&mut self, category: Category) {
        self.enabled[category as usize] = true;
    }

    pub fn contains(&self, category: Category) -> bool {
        self.enabled[category as usize]
    }

    pub fn is_empty(&self) -> bool {
        !self.enabled.iter().any(|e| *e)
    }

    pub fn iter(&self) -> impl Iterator<Item = Category> + '_ {
        Category::ALL.into_iter().filter(|c| self.contains(*c))
    }
}

impl Default for CheckSet {
    fn default() -> Self {
        Self::all()
    }
}

impl FromStr for CheckSet {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CheckSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self == &Self::all() {
            return f.write_str("all");
        }
        let names: Vec<&str> = self.iter().map(|c| c.as_str()).collect();
        f.write_str(&names.join(","))
    }
}

fn valid_names() -> String {
    let mut names = vec!["all"];
    names.extend(Category::ALL.iter().map(|c| c.as_str()));
    names.join(", ")
}

/// Audit `spec` against its resolved model.
///
/// Fails fast with `InvalidInput` when the specification is not
/// audit-compatible; everything found afterwards lands in the report.
pub fn audit(
    spec: &Specification,
    resolved: &ResolvedModel,
    checks: &CheckSet,
    thresholds: &Thresholds,
) -> AuditResult<Report> {
    spec.validate()?;
    let features = features::extract(spec, resolved);
    let results = run_checks(&features, checks, thresholds);
    let mut report = merge(results);
    report.plot_info = plot_info(spec, &features);
    report.origin = Some(Arc::new(spec.clone()));
    Ok(report)
}

/// Resolve `spec` with `resolver`, then audit it.
pub fn audit_with<R: Resolve + ?Sized>(
    resolver: &R,
    spec: &Specification,
    checks: &CheckSet,
    thresholds: &Thresholds,
) -> AuditResult<Report> {
    spec.validate()?;
    let resolved = resolver.resolve(spec)?;
    audit(spec, &resolved, checks, thresholds)
}

fn run_checks(
    features: &Features,
    checks: &CheckSet,
    thresholds: &Thresholds,
) -> Vec<(Category, CheckResult)> {
    let selected: Vec<Category> = checks.iter().collect();
    // indexed collect keeps category order
    selected
        .par_iter()
        .map(|category| {
            let res = checks::run(*category, features, thresholds);
            debug!(
                check = %category,
                issues = res.issues.len(),
                warnings = res.warnings.len(),
                "check finished"
            );
            (*category, res)
        })
        .collect()
}

/// Merge per-category results. Input order is report order.
pub fn merge(results: Vec<(Category, CheckResult)>) -> Report {
    let mut report = Report::default();
    for (category, res) in results {
        if res.is_clean() {
            report.passed.push(category);
        }
        report.issues.extend(res.issues);
        report.warnings.extend(res.warnings);
        report.suggestions.extend(res.suggestions);
    }
    report
}

fn plot_info(spec: &Specification, features: &Features) -> PlotInfo {
    let mut geoms: Vec<String> = Vec::new();
    for tag in features.geom_tags() {
        if !geoms.contains(&tag) {
            geoms.push(tag);
        }
    }
    let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
    PlotInfo {
        layers: spec.layers.len(),
        geoms,
        has_title: present(&spec.labels.title),
        has_subtitle: present(&spec.labels.subtitle),
        has_caption: present(&spec.labels.caption),
    }
}

fn single(
    category: Category,
    spec: &Specification,
    resolved: &ResolvedModel,
) -> AuditResult<CheckResult> {
    spec.validate()?;
    let features = features::extract(spec, resolved);
    Ok(checks::run(category, &features, &Thresholds::default()))
}

pub fn check_color(spec: &Specification, resolved: &ResolvedModel) -> AuditResult<CheckResult> {
    single(Category::Color, spec, resolved)
}

pub fn check_scales(spec: &Specification, resolved: &ResolvedModel) -> AuditResult<CheckResult> {
    single(Category::Scales, spec, resolved)
}

pub fn check_text(spec: &Specification, resolved: &ResolvedModel) -> AuditResult<CheckResult> {
    single(Category::Text, spec, resolved)
}

pub fn check_accessibility(
    spec: &Specification,
    resolved: &ResolvedModel,
) -> AuditResult<CheckResult> {
    single(Category::Accessibility, spec, resolved)
}

pub fn check_labels(spec: &Specification, resolved: &ResolvedModel) -> AuditResult<CheckResult> {
    single(Category::Labels, spec, resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::finding::Finding;

    fn spec(json: &str) -> Specification {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_check_set_parse() {
        assert_eq!(CheckSet::parse("all").unwrap(), CheckSet::all());
        let set = CheckSet::parse("scales, color").unwrap();
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec![Category::Color, Category::Scales]
        );
        assert_eq!(set.to_string(), "color,scales");
    }

    #[test]
    fn test_check_set_rejects_separator_only_lists() {
        for input in [",", " , ", ",,"] {
            assert!(
                matches!(
                    CheckSet::parse(input),
                    Err(AuditError::InvalidCheckName { .. })
                ),
                "{input:?}"
            );
        }
    }

    #[test]
    fn test_check_set_rejects_unknown_names() {
        let err = CheckSet::parse("color,nonexistent").unwrap_err();
        match err {
            AuditError::InvalidCheckName { name, valid } => {
                assert_eq!(name, "nonexistent");
                assert!(valid.contains("accessibility"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_merge_keeps_category_order_and_passed_markers() {
        let mut color = CheckResult::default();
        color.push(Finding::RedGreenConflict);
        color.suggest("viridis");
        let mut labels = CheckResult::default();
        labels.push(Finding::MissingTitle);
        labels.suggest("viridis");
        let report = merge(vec![
            (Category::Color, color),
            (Category::Text, CheckResult::default()),
            (Category::Labels, labels),
        ]);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.warnings[0].category, Category::Labels);
        assert_eq!(report.passed, vec![Category::Text]);
        // suggestions are not deduplicated
        assert_eq!(report.suggestions, vec!["viridis", "viridis"]);
    }

    #[test]
    fn test_audit_rejects_empty_spec() {
        let s = spec(r#"{"layers": []}"#);
        let err = audit(&s, &ResolvedModel::default(), &CheckSet::all(), &Thresholds::default());
        assert!(matches!(err, Err(AuditError::InvalidInput(_))));
    }

    #[test]
    fn test_audit_only_runs_selected_checks() {
        let s = spec(r#"{"layers": [{"geom": "point"}]}"#);
        let report = audit(
            &s,
            &ResolvedModel::default(),
            &CheckSet::only([Category::Labels]),
            &Thresholds::default(),
        )
        .unwrap();
        assert!(report.entries().all(|i| i.category == Category::Labels));
        assert!(report.has_code("LABEL_MISSING_TITLE"));
        assert!(report.origin.is_some());
        assert_eq!(report.plot_info.geoms, vec!["point"]);
    }

    #[test]
    fn test_standalone_check_validates_input() {
        let s = spec(r#"{"layers": []}"#);
        assert!(check_text(&s, &ResolvedModel::default()).is_err());
    }
}
