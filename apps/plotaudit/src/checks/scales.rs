//! Scale check: zero baselines for bars, truncated axes, dual y-axes,
//! aspect ratio, and labeling of logarithmic transforms.

use super::Thresholds;
use crate::features::Features;
use crate::models::finding::{num, Finding};
use crate::models::spec::{Aesthetic, Geom, ScaleKind};
use crate::models::CheckResult;
use tracing::debug;

const LOG_TRANSFORMS: [&str; 2] = ["log10", "log2"];

pub fn check(f: &Features, t: &Thresholds) -> CheckResult {
    let mut res = CheckResult::default();

    if f.has_geom(&Geom::Bar) {
        match f.y_range {
            Some([lower, _]) if lower != 0.0 => {
                res.push(Finding::BarNotZero { lower });
                res.suggest(
                    "Remove explicit y limits or add expand_limits(y = 0) so bars start at zero",
                );
            }
            Some(_) => {}
            None => debug!("y range unavailable; bar baseline check skipped"),
        }
    } else if let (Some([axis_lo, axis_hi]), Some([data_lo, data_hi])) = (f.y_range, f.y_data_range)
    {
        let axis_span = axis_hi - axis_lo;
        let data_span = data_hi - data_lo;
        if axis_span < t.truncation_factor * data_span && axis_lo > data_lo {
            res.push(Finding::TruncatedAxis {
                axis_lower: axis_lo,
                data_lower: data_lo,
            });
            res.suggest(format!(
                "Check whether the y-axis should include the data minimum ({})",
                num(data_lo)
            ));
        }
    }

    let dual = f
        .scales
        .iter()
        .filter(|s| s.aesthetic == Aesthetic::Y && s.kind == ScaleKind::Continuous)
        .count();
    if dual > 1 {
        res.push(Finding::DualYAxes { count: dual });
        res.suggest("Replace the secondary axis with facets, normalized values, or separate plots");
    }

    if f.has_geom(&Geom::Point) || f.has_geom(&Geom::Line) {
        if let (Some([x_lo, x_hi]), Some([y_lo, y_hi])) = (f.x_range, f.y_range) {
            let x_span = x_hi - x_lo;
            if x_span > 0.0 {
                let ratio = (y_hi - y_lo) / x_span;
                if ratio < t.aspect_min || ratio > t.aspect_max {
                    res.push(Finding::AspectRatio {
                        ratio,
                        min: t.aspect_min,
                        max: t.aspect_max,
                    });
                    res.suggest("Fix the aspect ratio with coord_fixed() or theme(aspect.ratio = 1)");
                }
            }
        }
    }

    let log_transform = f.scales.iter().find_map(|s| {
        s.transform
            .as_deref()
            .filter(|tr| LOG_TRANSFORMS.contains(&tr.to_ascii_lowercase().as_str()))
    });
    if let Some(transform) = log_transform {
        let mentions_log = [f.labels.x.as_deref(), f.labels.y.as_deref()]
            .into_iter()
            .flatten()
            .any(|l| l.to_ascii_lowercase().contains("log"));
        if !mentions_log {
            res.push(Finding::UnlabeledLogScale {
                transform: transform.to_string(),
            });
            res.suggest("Say so in the axis label, e.g. labs(y = \"Value (log scale)\")");
        }
    }

    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::fixtures;
    use crate::features::LayerFeature;
    use crate::models::resolved::ResolvedScale;

    fn bar(y_range: [f64; 2]) -> Features {
        let mut f = fixtures::clean();
        f.layers = vec![LayerFeature {
            index: 1,
            geom: Geom::Bar,
            size: None,
            linewidth: None,
        }];
        f.y_range = Some(y_range);
        f.y_data_range = Some([0.0, 30.0]);
        f
    }

    fn y_scale(transform: Option<&str>) -> ResolvedScale {
        ResolvedScale {
            aesthetic: Aesthetic::Y,
            kind: ScaleKind::Continuous,
            transform: transform.map(str::to_string),
        }
    }

    #[test]
    fn test_bar_not_starting_at_zero_is_issue() {
        let res = check(&bar([10.0, 30.0]), &Thresholds::default());
        assert_eq!(res.issues.len(), 1);
        let msg = &res.issues[0].message;
        assert!(msg.contains("zero") && msg.contains("10"), "{msg}");
    }

    #[test]
    fn test_bar_at_zero_passes() {
        assert!(check(&bar([0.0, 30.0]), &Thresholds::default()).is_clean());
    }

    #[test]
    fn test_truncated_axis_for_points() {
        let mut f = fixtures::clean();
        f.x_range = Some([0.0, 100.0]);
        f.y_range = Some([50.0, 100.0]);
        f.y_data_range = Some([0.0, 100.0]);
        let res = check(&f, &Thresholds::default());
        assert_eq!(res.warnings[0].finding.code(), "SCALE_TRUNCATED_AXIS");
    }

    #[test]
    fn test_dual_y_axes() {
        let mut f = fixtures::clean();
        f.scales = vec![y_scale(None), y_scale(None)];
        let res = check(&f, &Thresholds::default());
        assert_eq!(res.issues[0].finding, Finding::DualYAxes { count: 2 });
    }

    #[test]
    fn test_aspect_ratio_out_of_range() {
        let mut f = fixtures::clean();
        f.x_range = Some([0.0, 1.0]);
        f.y_range = Some([0.0, 10.0]);
        f.y_data_range = Some([0.0, 10.0]);
        let res = check(&f, &Thresholds::default());
        assert!(matches!(
            res.warnings[0].finding,
            Finding::AspectRatio { ratio, .. } if (ratio - 10.0).abs() < 1e-9
        ));
    }

    #[test]
    fn test_aspect_ratio_ignored_for_bars() {
        let mut f = bar([0.0, 100.0]);
        f.x_range = Some([0.0, 1.0]);
        assert!(check(&f, &Thresholds::default()).is_clean());
    }

    #[test]
    fn test_log_scale_needs_label() {
        let mut f = fixtures::clean();
        f.scales = vec![y_scale(Some("log10"))];
        let res = check(&f, &Thresholds::default());
        assert_eq!(res.warnings[0].finding.code(), "SCALE_UNLABELED_LOG");

        f.labels.y = Some("Population (Log10)".into());
        assert!(check(&f, &Thresholds::default()).is_clean());
    }
}
