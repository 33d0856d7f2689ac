//! Structured findings emitted by the check modules.
//!
//! Each variant has a stable code and a small payload. Messages are rendered
//! from the payload, and fix generation switches on the variant, so message
//! wording can change freely.

use crate::models::spec::LabelRole;
use crate::models::{Category, Severity};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Axis::X => "x",
            Axis::Y => "y",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum Finding {
    #[serde(rename = "COLOR_RED_GREEN_CONFLICT")]
    RedGreenConflict,
    #[serde(rename = "COLOR_TOO_MANY")]
    TooManyColors { count: usize, max: usize },
    #[serde(rename = "COLOR_NON_UNIFORM")]
    NonUniformPalette { max_std_dev: f64 },
    #[serde(rename = "COLOR_LOW_CONTRAST")]
    LowContrast {
        first: String,
        second: String,
        ratio: f64,
        min: f64,
    },
    #[serde(rename = "COLOR_CVD_COLLAPSE")]
    CvdCollapse { before: usize, after: usize },
    /// A color value was skipped because it could not be parsed.
    #[serde(rename = "COLOR_UNPARSEABLE")]
    UnparseableColor { value: String },

    #[serde(rename = "SCALE_BAR_NOT_ZERO")]
    BarNotZero { lower: f64 },
    #[serde(rename = "SCALE_TRUNCATED_AXIS")]
    TruncatedAxis { axis_lower: f64, data_lower: f64 },
    #[serde(rename = "SCALE_DUAL_Y")]
    DualYAxes { count: usize },
    #[serde(rename = "SCALE_ASPECT_RATIO")]
    AspectRatio { ratio: f64, min: f64, max: f64 },
    #[serde(rename = "SCALE_UNLABELED_LOG")]
    UnlabeledLogScale { transform: String },

    #[serde(rename = "TEXT_SMALL_AXIS")]
    SmallAxisText { size: f64, min: f64 },
    #[serde(rename = "TEXT_SMALL_TITLE")]
    SmallTitleText { size: f64, min: f64 },
    #[serde(rename = "TEXT_CROWDED_TICKS")]
    CrowdedTicks { count: usize },
    #[serde(rename = "TEXT_LONG_TICKS")]
    LongTickLabels { max_len: usize },
    #[serde(rename = "TEXT_MISSING_AXIS_LABEL")]
    MissingAxisLabel { axis: Axis },

    /// `layer` is 1-based.
    #[serde(rename = "A11Y_SMALL_POINTS")]
    SmallPoints { layer: usize, size: f64 },
    #[serde(rename = "A11Y_THIN_LINES")]
    ThinLines { layer: usize, width: f64 },
    #[serde(rename = "A11Y_COLOR_ONLY")]
    ColorOnlyEncoding,

    #[serde(rename = "LABEL_MISSING_TITLE")]
    MissingTitle,
    #[serde(rename = "LABEL_PROGRAMMING_SYNTAX")]
    ProgrammingSyntax {
        role: LabelRole,
        label: String,
        replacement: String,
    },
    #[serde(rename = "LABEL_UNTITLED_LEGEND")]
    UntitledLegend { role: LabelRole },
}

impl Finding {
    pub fn category(&self) -> Category {
        use Finding::*;
        match self {
            RedGreenConflict
            | TooManyColors { .. }
            | NonUniformPalette { .. }
            | LowContrast { .. }
            | CvdCollapse { .. }
            | UnparseableColor { .. } => Category::Color,
            BarNotZero { .. }
            | TruncatedAxis { .. }
            | DualYAxes { .. }
            | AspectRatio { .. }
            | UnlabeledLogScale { .. } => Category::Scales,
            SmallAxisText { .. }
            | SmallTitleText { .. }
            | CrowdedTicks { .. }
            | LongTickLabels { .. }
            | MissingAxisLabel { .. } => Category::Text,
            SmallPoints { .. } | ThinLines { .. } | ColorOnlyEncoding => Category::Accessibility,
            MissingTitle | ProgrammingSyntax { .. } | UntitledLegend { .. } => Category::Labels,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Finding::RedGreenConflict
            | Finding::BarNotZero { .. }
            | Finding::DualYAxes { .. }
            | Finding::ProgrammingSyntax { .. } => Severity::Issue,
            _ => Severity::Warning,
        }
    }

    /// Stable identifier, identical to the serialized `code` tag.
    pub fn code(&self) -> &'static str {
        use Finding::*;
        match self {
            RedGreenConflict => "COLOR_RED_GREEN_CONFLICT",
            TooManyColors { .. } => "COLOR_TOO_MANY",
            NonUniformPalette { .. } => "COLOR_NON_UNIFORM",
            LowContrast { .. } => "COLOR_LOW_CONTRAST",
            CvdCollapse { .. } => "COLOR_CVD_COLLAPSE",
            UnparseableColor { .. } => "COLOR_UNPARSEABLE",
            BarNotZero { .. } => "SCALE_BAR_NOT_ZERO",
            TruncatedAxis { .. } => "SCALE_TRUNCATED_AXIS",
            DualYAxes { .. } => "SCALE_DUAL_Y",
            AspectRatio { .. } => "SCALE_ASPECT_RATIO",
            UnlabeledLogScale { .. } => "SCALE_UNLABELED_LOG",
            SmallAxisText { .. } => "TEXT_SMALL_AXIS",
            SmallTitleText { .. } => "TEXT_SMALL_TITLE",
            CrowdedTicks { .. } => "TEXT_CROWDED_TICKS",
            LongTickLabels { .. } => "TEXT_LONG_TICKS",
            MissingAxisLabel { .. } => "TEXT_MISSING_AXIS_LABEL",
            SmallPoints { .. } => "A11Y_SMALL_POINTS",
            ThinLines { .. } => "A11Y_THIN_LINES",
            ColorOnlyEncoding => "A11Y_COLOR_ONLY",
            MissingTitle => "LABEL_MISSING_TITLE",
            ProgrammingSyntax { .. } => "LABEL_PROGRAMMING_SYNTAX",
            UntitledLegend { .. } => "LABEL_UNTITLED_LEGEND",
        }
    }

    pub fn message(&self) -> String {
        use Finding::*;
        match self {
            RedGreenConflict => "Red-green color combination detected; it is hard to tell apart \
                                 for viewers with color-vision deficiency"
                .to_string(),
            TooManyColors { count, max } => format!(
                "{count} distinct colors used (more than {max}); groups become hard to tell apart"
            ),
            NonUniformPalette { max_std_dev } => format!(
                "Possible non-uniform / rainbow-like palette (channel std-dev up to {})",
                num(*max_std_dev)
            ),
            LowContrast {
                first,
                second,
                ratio,
                min,
            } => format!(
                "Low contrast pair: {first} vs {second} (ratio {} < {})",
                num(*ratio),
                num(*min)
            ),
            CvdCollapse { before, after } => format!(
                "Colors collapse under deuteranopia: {before} distinct colors become {after}"
            ),
            UnparseableColor { value } => {
                format!("Could not parse color '{value}'; it was left out of color analysis")
            }
            BarNotZero { lower } => format!(
                "Bar chart y-axis does not start at zero (starts at {})",
                num(*lower)
            ),
            TruncatedAxis {
                axis_lower,
                data_lower,
            } => format!(
                "Y-axis appears truncated: axis starts at {} while data minimum is {}",
                num(*axis_lower),
                num(*data_lower)
            ),
            DualYAxes { count } => format!(
                "Dual y-axes detected ({count} continuous y scales); they invite false comparisons"
            ),
            AspectRatio { ratio, min, max } => format!(
                "Aspect ratio {} is outside [{}, {}]; slopes may be misread",
                num(*ratio),
                num(*min),
                num(*max)
            ),
            UnlabeledLogScale { transform } => format!(
                "Scale uses a {transform} transform but no axis label mentions log scale"
            ),
            SmallAxisText { size, min } => format!(
                "Axis text size {} is small (below {}pt)",
                num(*size),
                num(*min)
            ),
            SmallTitleText { size, min } => format!(
                "Title text size {} is small (below {}pt)",
                num(*size),
                num(*min)
            ),
            CrowdedTicks { count } => {
                format!("Many labels on the x-axis ({count}), risk of overlap")
            }
            LongTickLabels { max_len } => format!(
                "Axis labels up to {max_len} characters long; labels may be truncated"
            ),
            MissingAxisLabel { axis } => format!("Missing {axis}-axis label"),
            SmallPoints { layer, size } => format!(
                "Point size {} in layer {layer} may be too small",
                num(*size)
            ),
            ThinLines { layer, width } => format!(
                "Line width {} in layer {layer} may be too thin",
                num(*width)
            ),
            ColorOnlyEncoding => "Color is the only visual distinction between groups".to_string(),
            MissingTitle => "Plot has no title".to_string(),
            ProgrammingSyntax { role, label, .. } => {
                format!("The {role} label '{label}' contains programming syntax")
            }
            UntitledLegend { role } => format!("The {role} legend has no title"),
        }
    }
}

/// Render a number with at most two decimals and no trailing zeros.
pub(crate) fn num(v: f64) -> String {
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_match_serialized_tag() {
        let findings = vec![
            Finding::RedGreenConflict,
            Finding::BarNotZero { lower: 10.0 },
            Finding::MissingAxisLabel { axis: Axis::Y },
            Finding::UntitledLegend {
                role: LabelRole::Fill,
            },
        ];
        for f in findings {
            let v = serde_json::to_value(&f).unwrap();
            assert_eq!(v["code"], f.code());
        }
    }

    #[test]
    fn test_num_trims_trailing_zeros() {
        assert_eq!(num(10.0), "10");
        assert_eq!(num(0.5), "0.5");
        assert_eq!(num(2.346), "2.35");
        assert_eq!(num(-0.001), "0");
    }

    #[test]
    fn test_bar_message_mentions_bound_and_zero() {
        let msg = Finding::BarNotZero { lower: 10.0 }.message();
        assert!(msg.contains("zero"));
        assert!(msg.contains("10"));
    }
}
