//! Fix suggestions and automatic fixes.
//!
//! `suggest` turns every issue and warning of a report into corrective
//! snippets. Findings with a deterministic remedy also yield an `AutoFix`,
//! which `apply` performs on a copy of the specification.

use crate::audit::{audit, CheckSet};
use crate::checks::Thresholds;
use crate::color::hue_signal;
use crate::error::{AuditError, AuditResult};
use crate::models::finding::{num, Finding};
use crate::models::resolved::ResolvedModel;
use crate::models::spec::{Aesthetic, LabelRole, ScaleKind, Specification};
use crate::models::{Category, Report};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Settings for generated snippets and automatic fixes (`[fix]` in config).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixOptions {
    /// Axis text size set when raising small axis text.
    pub axis_text_size: f64,
    /// Palette substituted for conflicting hues.
    pub palette: String,
}

impl Default for FixOptions {
    fn default() -> Self {
        Self {
            axis_text_size: 10.0,
            palette: "viridis".to_string(),
        }
    }
}

/// A mechanical transformation of the specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoFix {
    UniformColourScale,
    IncludeZeroY,
    RaiseAxisText,
    LabelLogScale,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FixSet {
    /// Snippet lines per category, in category order.
    pub snippets: BTreeMap<Category, Vec<String>>,
    /// Fixes that can be performed mechanically.
    pub applied: Vec<String>,
    /// Fixes that need human judgment.
    pub manual: Vec<String>,
    /// Distinct mechanical fixes, first-seen order.
    pub auto: Vec<AutoFix>,
}

impl FixSet {
    pub fn is_empty(&self) -> bool {
        self.applied.is_empty() && self.manual.is_empty()
    }
}

/// What fixes are derived from.
#[derive(Debug, Clone, Copy)]
pub enum FixSource<'a> {
    /// Audit the plot first, with default thresholds.
    Plot {
        spec: &'a Specification,
        resolved: &'a ResolvedModel,
    },
    Report(&'a Report),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FixOutcome {
    Suggestions(FixSet),
    /// Specification with the mechanical fixes applied; `fixes` still lists
    /// the manual remainder.
    Revised { spec: Specification, fixes: FixSet },
}

struct Remedy {
    lines: Vec<String>,
    summary: String,
    auto: Option<AutoFix>,
}

impl Remedy {
    fn manual(summary: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            lines,
            summary: summary.into(),
            auto: None,
        }
    }

    fn auto(fix: AutoFix, summary: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            lines,
            summary: summary.into(),
            auto: Some(fix),
        }
    }
}

fn palette_call(aes: &str, palette: &str) -> String {
    if palette.eq_ignore_ascii_case("viridis") {
        format!("scale_{aes}_viridis_d()")
    } else {
        format!("scale_{aes}_viridis_d(option = \"{palette}\")")
    }
}

/// A palette swap only reaches colors that come from a mapped colour/fill
/// scale; fixed red or green layer colors stay as written.
fn palette_swap_reaches(spec: &Specification) -> bool {
    let mapped = [Aesthetic::Colour, Aesthetic::Fill]
        .into_iter()
        .any(|aes| spec.mapped(aes).is_some());
    let fixed_hue = spec.layers.iter().any(|l| {
        [l.params.colour.as_deref(), l.params.fill.as_deref()]
            .into_iter()
            .flatten()
            .any(|c| hue_signal(c).is_some())
    });
    mapped && !fixed_hue
}

fn remedy(finding: &Finding, opts: &FixOptions, origin: Option<&Specification>) -> Remedy {
    use Finding::*;
    match finding {
        RedGreenConflict if origin.is_some_and(|s| !palette_swap_reaches(s)) => Remedy::manual(
            "Replace the fixed red/green layer colors with colorblind-safe ones",
            vec!["geom_point(colour = \"#440154\")".into()],
        ),
        RedGreenConflict => Remedy::auto(
            AutoFix::UniformColourScale,
            format!("Replace red-green hues with the {} palette", opts.palette),
            vec![
                palette_call("colour", &opts.palette),
                palette_call("fill", &opts.palette),
            ],
        ),
        TooManyColors { .. } => Remedy::manual(
            "Reduce the number of color groups (facet or merge categories)",
            vec!["facet_wrap(~ group)".into()],
        ),
        NonUniformPalette { .. } => Remedy::manual(
            "Switch to a perceptually uniform palette",
            vec![palette_call("colour", &opts.palette)],
        ),
        LowContrast { first, second, .. } => Remedy::manual(
            format!("Increase lightness contrast between {first} and {second}"),
            vec!["scale_colour_manual(values = c(...))".into()],
        ),
        CvdCollapse { .. } => Remedy::manual(
            "Choose colors that stay distinct under deuteranopia",
            vec![palette_call("colour", "cividis")],
        ),
        UnparseableColor { value } => Remedy::manual(
            format!("Replace the unrecognized color '{value}'"),
            vec![],
        ),
        BarNotZero { .. } => Remedy::auto(
            AutoFix::IncludeZeroY,
            "Start the bar axis at zero",
            vec!["expand_limits(y = 0)".into()],
        ),
        TruncatedAxis { data_lower, .. } => Remedy::manual(
            "Decide whether the y-axis should show the full data range",
            vec![format!("expand_limits(y = {})", num(*data_lower))],
        ),
        DualYAxes { .. } => Remedy::manual(
            "Replace the secondary y-axis with facets or separate plots",
            vec!["facet_wrap(~ series, scales = \"free_y\")".into()],
        ),
        AspectRatio { .. } => Remedy::manual(
            "Fix the aspect ratio",
            vec!["theme(aspect.ratio = 1)".into()],
        ),
        UnlabeledLogScale { .. } => Remedy::auto(
            AutoFix::LabelLogScale,
            "Mention the log scale in the y label",
            vec!["labs(y = \"... (log scale)\")".into()],
        ),
        SmallAxisText { .. } => Remedy::auto(
            AutoFix::RaiseAxisText,
            format!("Raise axis text to {}pt", num(opts.axis_text_size)),
            vec![format!(
                "theme(axis.text = element_text(size = {}))",
                num(opts.axis_text_size)
            )],
        ),
        SmallTitleText { min, .. } => Remedy::manual(
            "Enlarge the title",
            vec![format!("theme(plot.title = element_text(size = {}))", num(*min))],
        ),
        CrowdedTicks { .. } => Remedy::manual(
            "Rotate, thin out, or flip crowded x labels",
            vec![
                "theme(axis.text.x = element_text(angle = 45, hjust = 1))".into(),
                "coord_flip()".into(),
            ],
        ),
        LongTickLabels { .. } => Remedy::manual(
            "Shorten or wrap long tick labels",
            vec!["scale_x_discrete(labels = scales::label_wrap(15))".into()],
        ),
        MissingAxisLabel { axis } => Remedy::manual(
            format!("Write a descriptive {axis}-axis label"),
            vec![format!("labs({axis} = \"...\")")],
        ),
        SmallPoints { layer, .. } => Remedy::manual(
            format!("Enlarge points in layer {layer}"),
            vec!["geom_point(size = 3)".into()],
        ),
        ThinLines { layer, .. } => Remedy::manual(
            format!("Thicken lines in layer {layer}"),
            vec!["geom_line(linewidth = 1)".into()],
        ),
        ColorOnlyEncoding => Remedy::manual(
            "Add a redundant shape or linetype encoding",
            vec!["aes(shape = group)".into(), "aes(linetype = group)".into()],
        ),
        MissingTitle => Remedy::manual(
            "Write a title that states the main message",
            vec!["labs(title = \"...\")".into()],
        ),
        ProgrammingSyntax {
            role, replacement, ..
        } => Remedy::manual(
            format!("Rename the {role} label"),
            vec![format!("labs({role} = \"{replacement}\")")],
        ),
        UntitledLegend { role } => Remedy::manual(
            format!("Title the {role} legend"),
            vec![format!("labs({role} = \"...\")")],
        ),
    }
}

/// Map every issue, then every warning, of `report` to fixes.
///
/// A red-green conflict is only auto-applicable when the colors come from a
/// mapped scale of the attached specification.
pub fn suggest(report: &Report, opts: &FixOptions) -> FixSet {
    let mut set = FixSet::default();
    let origin = report.origin.as_deref();
    for entry in report.entries() {
        let r = remedy(&entry.finding, opts, origin);
        set.snippets
            .entry(entry.category)
            .or_default()
            .extend(r.lines);
        match r.auto {
            Some(fix) => {
                set.applied.push(r.summary);
                if !set.auto.contains(&fix) {
                    set.auto.push(fix);
                }
            }
            None => set.manual.push(r.summary),
        }
    }
    set
}

/// Apply the mechanical fixes of `fixes` to a copy of `spec`.
pub fn apply(spec: &Specification, fixes: &FixSet, opts: &FixOptions) -> Specification {
    let mut out = spec.clone();
    for fix in &fixes.auto {
        debug!(?fix, "applying fix");
        match fix {
            AutoFix::UniformColourScale => {
                let mut targets: Vec<Aesthetic> = [Aesthetic::Colour, Aesthetic::Fill]
                    .into_iter()
                    .filter(|aes| {
                        out.mapped(*aes).is_some() || out.scales.iter().any(|s| s.aesthetic == *aes)
                    })
                    .collect();
                if targets.is_empty() {
                    targets.push(Aesthetic::Colour);
                }
                for aes in targets {
                    let scale = out.scale_mut(aes, ScaleKind::Discrete);
                    scale.palette = Some(opts.palette.clone());
                    scale.values.clear();
                }
            }
            AutoFix::IncludeZeroY => {
                let scale = out.scale_mut(Aesthetic::Y, ScaleKind::Continuous);
                scale.include_zero = true;
                if let Some(limits) = scale.limits.as_mut() {
                    if limits[0].is_some_and(|lo| lo != 0.0) {
                        limits[0] = Some(0.0);
                    }
                }
            }
            AutoFix::RaiseAxisText => {
                let current = out.theme.effective_axis_text_size();
                out.theme.axis_text_size = Some(current.max(opts.axis_text_size));
            }
            AutoFix::LabelLogScale => {
                let label = out
                    .effective_label(LabelRole::Y)
                    .unwrap_or("y")
                    .to_string();
                if !label.to_ascii_lowercase().contains("log") {
                    out.labels.set(LabelRole::Y, format!("{label} (log scale)"));
                }
            }
        }
    }
    out
}

/// Derive fixes from a plot or an existing report; with `auto_fix` also
/// return the revised specification.
///
/// A report read back from JSON has no specification attached, so asking it
/// for an auto-fix fails with `MissingSpecification`.
pub fn suggest_fixes(
    source: FixSource<'_>,
    auto_fix: bool,
    opts: &FixOptions,
) -> AuditResult<FixOutcome> {
    let (report, spec) = match source {
        FixSource::Plot { spec, resolved } => {
            let report = audit(spec, resolved, &CheckSet::all(), &Thresholds::default())?;
            (report, Some(spec.clone()))
        }
        FixSource::Report(report) => (
            report.clone(),
            report.origin.as_deref().cloned(),
        ),
    };
    let fixes = suggest(&report, opts);
    if !auto_fix {
        return Ok(FixOutcome::Suggestions(fixes));
    }
    let spec = spec.ok_or(AuditError::MissingSpecification)?;
    let revised = apply(&spec, &fixes, opts);
    Ok(FixOutcome::Revised {
        spec: revised,
        fixes,
    })
}
