//! Color check: hue conflicts, palette size and uniformity, pairwise
//! contrast, and collapse under simulated deuteranopia.

use super::Thresholds;
use crate::color::{contrast_ratio, hue_signal, parse_color, CvdType, HueSignal, Rgb};
use crate::features::Features;
use crate::models::finding::Finding;
use crate::models::CheckResult;
use std::collections::HashSet;
use tracing::{debug, warn};

pub fn check(f: &Features, t: &Thresholds) -> CheckResult {
    let mut res = CheckResult::default();
    if f.colors.is_empty() {
        debug!("no colors in resolved data; color check skipped");
        return res;
    }

    let mut parsed: Vec<(&str, Rgb)> = Vec::with_capacity(f.colors.len());
    for c in &f.colors {
        match parse_color(c) {
            Ok(rgb) => parsed.push((c.as_str(), rgb)),
            Err(err) => {
                warn!(error = %err, "skipping color");
                res.push(Finding::UnparseableColor { value: c.clone() });
            }
        }
    }

    let signals: Vec<HueSignal> = f.colors.iter().filter_map(|c| hue_signal(c)).collect();
    if signals.contains(&HueSignal::Red) && signals.contains(&HueSignal::Green) {
        res.push(Finding::RedGreenConflict);
        res.suggest(
            "Use a colorblind-safe, perceptually uniform palette such as viridis \
             (scale_colour_viridis_d() / scale_fill_viridis_d())",
        );
    }

    if f.colors.len() > t.max_colors {
        res.push(Finding::TooManyColors {
            count: f.colors.len(),
            max: t.max_colors,
        });
        res.suggest("Facet the plot or merge small categories to reduce the number of colors");
    }

    if parsed.len() >= t.uniformity_min_colors {
        let max_std_dev = max_channel_std_dev(parsed.iter().map(|(_, c)| *c));
        if max_std_dev > t.uniformity_std_dev {
            res.push(Finding::NonUniformPalette { max_std_dev });
            res.suggest(
                "Prefer a perceptually uniform palette (viridis, cividis) over rainbow-like hues",
            );
        }
    }

    if parsed.len() >= 2 {
        if let Some((a, b, ratio)) = lowest_contrast_pair(&parsed) {
            if ratio < t.min_contrast {
                res.push(Finding::LowContrast {
                    first: a.to_string(),
                    second: b.to_string(),
                    ratio,
                    min: t.min_contrast,
                });
                res.suggest("Pick colors that differ more in lightness so groups stay distinguishable");
            }
        }

        let before: HashSet<Rgb> = parsed.iter().map(|(_, c)| *c).collect();
        let after: HashSet<Rgb> = before
            .iter()
            .map(|c| CvdType::Deutan.simulate(*c, 1.0))
            .collect();
        if after.len() < before.len() {
            res.push(Finding::CvdCollapse {
                before: before.len(),
                after: after.len(),
            });
            res.suggest("Preview the palette with `plotaudit colors <COLORS> --type deutan`");
        }
    }

    res
}

/// Largest per-channel sample standard deviation across the colors.
pub fn max_channel_std_dev(colors: impl Iterator<Item = Rgb>) -> f64 {
    let rows: Vec<[f64; 3]> = colors.map(|c| c.channels().map(f64::from)).collect();
    if rows.len() < 2 {
        return 0.0;
    }
    let n = rows.len() as f64;
    (0..3)
        .map(|ch| {
            let mean = rows.iter().map(|r| r[ch]).sum::<f64>() / n;
            let var = rows.iter().map(|r| (r[ch] - mean).powi(2)).sum::<f64>() / (n - 1.0);
            var.sqrt()
        })
        .fold(0.0, f64::max)
}

/// Lowest-contrast unordered pair; ties keep the first pair found.
fn lowest_contrast_pair<'a>(colors: &[(&'a str, Rgb)]) -> Option<(&'a str, &'a str, f64)> {
    let mut best: Option<(&'a str, &'a str, f64)> = None;
    for (i, (na, ca)) in colors.iter().enumerate() {
        for (nb, cb) in &colors[i + 1..] {
            let ratio = contrast_ratio(*ca, *cb);
            if best.map_or(true, |(_, _, r)| ratio < r) {
                best = Some((*na, *nb, ratio));
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::fixtures;

    fn with_colors(colors: &[&str]) -> Features {
        let mut f = fixtures::clean();
        f.colors = colors.iter().map(|c| c.to_string()).collect();
        f
    }

    fn codes(res: &CheckResult) -> Vec<&'static str> {
        res.issues
            .iter()
            .chain(res.warnings.iter())
            .map(|i| i.finding.code())
            .collect()
    }

    #[test]
    fn test_red_green_blue_flags_conflict() {
        let res = check(&with_colors(&["red", "green", "blue"]), &Thresholds::default());
        assert_eq!(res.issues.len(), 1);
        assert!(res.issues[0].message.to_lowercase().contains("red-green"));
        assert!(res.suggestions[0].contains("viridis"));
    }

    #[test]
    fn test_default_hue_palette_flags_conflict() {
        let res = check(
            &with_colors(&["#F8766D", "#00BA38", "#619CFF"]),
            &Thresholds::default(),
        );
        assert!(codes(&res).contains(&"COLOR_RED_GREEN_CONFLICT"));
    }

    #[test]
    fn test_named_colors_without_hue_words_flag_conflict() {
        let res = check(&with_colors(&["crimson", "lime"]), &Thresholds::default());
        assert!(codes(&res).contains(&"COLOR_RED_GREEN_CONFLICT"));
    }

    #[test]
    fn test_too_many_colors_and_rainbow() {
        let rainbow = [
            "#FF0000", "#FF7F00", "#FFFF00", "#00FF00", "#0000FF", "#4B0082", "#9400D3", "#000000",
        ];
        let res = check(&with_colors(&rainbow), &Thresholds::default());
        let c = codes(&res);
        assert!(c.contains(&"COLOR_TOO_MANY"));
        assert!(c.contains(&"COLOR_NON_UNIFORM"));
    }

    #[test]
    fn test_low_contrast_pair_reported_once() {
        let res = check(
            &with_colors(&["#777777", "#787878", "#797979"]),
            &Thresholds::default(),
        );
        let low: Vec<_> = res
            .warnings
            .iter()
            .filter(|w| w.finding.code() == "COLOR_LOW_CONTRAST")
            .collect();
        assert_eq!(low.len(), 1);
    }

    #[test]
    fn test_black_and_white_pass() {
        let res = check(&with_colors(&["black", "white"]), &Thresholds::default());
        assert!(res.is_clean(), "{:?}", res);
    }

    #[test]
    fn test_unparseable_color_degrades_to_warning() {
        let res = check(&with_colors(&["black", "mystery", "white"]), &Thresholds::default());
        assert!(res.issues.is_empty());
        assert_eq!(res.warnings.len(), 1);
        assert_eq!(res.warnings[0].finding.code(), "COLOR_UNPARSEABLE");
    }

    #[test]
    fn test_cvd_collapse_detected_for_near_duplicates() {
        // near-identical reds may round to one simulated value
        let colors = ["#FF0000", "#FE0000"];
        let parsed: Vec<Rgb> = colors.iter().map(|c| parse_color(c).unwrap()).collect();
        let sim: HashSet<Rgb> = parsed
            .iter()
            .map(|c| CvdType::Deutan.simulate(*c, 1.0))
            .collect();
        let res = check(&with_colors(&colors), &Thresholds::default());
        let collapsed = codes(&res).contains(&"COLOR_CVD_COLLAPSE");
        assert_eq!(collapsed, sim.len() < 2);
    }

    #[test]
    fn test_std_dev_of_identical_colors_is_zero() {
        let v = max_channel_std_dev(std::iter::repeat(Rgb::new(1, 2, 3)).take(6));
        assert_eq!(v, 0.0);
    }
}
