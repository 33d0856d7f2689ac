//! Accessibility check: mark sizes, line widths, background contrast hint,
//! and redundant encoding of color groups.

use super::Thresholds;
use crate::color::{parse_color, Rgb};
use crate::features::Features;
use crate::models::finding::{num, Finding};
use crate::models::spec::Geom;
use crate::models::CheckResult;

const WHITE: Rgb = Rgb::new(255, 255, 255);

pub fn check(f: &Features, t: &Thresholds) -> CheckResult {
    let mut res = CheckResult::default();

    for layer in &f.layers {
        match layer.geom {
            Geom::Point => {
                if let Some(size) = layer.size.filter(|s| *s < t.min_point_size) {
                    res.push(Finding::SmallPoints {
                        layer: layer.index,
                        size,
                    });
                    res.suggest(format!(
                        "Use a point size of at least {} in layer {}",
                        num(t.recommended_point_size),
                        layer.index
                    ));
                }
            }
            Geom::Line => {
                if let Some(width) = layer.linewidth.filter(|w| *w < t.min_line_width) {
                    res.push(Finding::ThinLines {
                        layer: layer.index,
                        width,
                    });
                    res.suggest(format!(
                        "Use a line width of at least {} in layer {}",
                        num(t.recommended_line_width),
                        layer.index
                    ));
                }
            }
            _ => {}
        }
    }

    if is_default_background(f.panel_background.as_deref()) {
        res.suggest("Make sure data elements contrast enough with the white panel background");
    }

    let g = f.grouping;
    if g.colour && !g.shape && !g.linetype {
        res.push(Finding::ColorOnlyEncoding);
        res.suggest(
            "Encode groups redundantly: map the same variable to shape (points) or linetype (lines)",
        );
    }

    res
}

fn is_default_background(bg: Option<&str>) -> bool {
    match bg {
        None => true,
        Some(v) if v.trim().eq_ignore_ascii_case("default") => true,
        Some(v) => parse_color(v).map(|c| c == WHITE).unwrap_or(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::fixtures;
    use crate::features::{Grouping, LayerFeature};

    #[test]
    fn test_small_points_and_color_only() {
        let mut f = fixtures::clean();
        f.layers[0].size = Some(0.5);
        f.grouping = Grouping {
            colour: true,
            shape: false,
            linetype: false,
        };
        let res = check(&f, &Thresholds::default());
        let msgs: Vec<String> = res.warnings.iter().map(|w| w.message.to_lowercase()).collect();
        assert!(msgs.iter().any(|m| m.contains("point size")));
        assert!(msgs.iter().any(|m| m.contains("color is the only")));
    }

    #[test]
    fn test_shape_redundancy_clears_color_only() {
        let mut f = fixtures::clean();
        f.grouping = Grouping {
            colour: true,
            shape: true,
            linetype: false,
        };
        assert!(check(&f, &Thresholds::default()).is_clean());
    }

    #[test]
    fn test_thin_lines() {
        let mut f = fixtures::clean();
        f.layers.push(LayerFeature {
            index: 2,
            geom: Geom::Line,
            size: None,
            linewidth: Some(0.25),
        });
        let res = check(&f, &Thresholds::default());
        assert_eq!(
            res.warnings[0].finding,
            Finding::ThinLines {
                layer: 2,
                width: 0.25
            }
        );
    }

    #[test]
    fn test_white_background_is_only_a_suggestion() {
        let mut f = fixtures::clean();
        f.panel_background = Some("#FFFFFF".into());
        let res = check(&f, &Thresholds::default());
        assert!(res.is_clean());
        assert_eq!(res.suggestions.len(), 1);

        f.panel_background = Some("grey92".into());
        assert!(check(&f, &Thresholds::default()).suggestions.is_empty());
    }
}
