//! Text check: font sizes, tick-label crowding and length, axis labels.

use super::Thresholds;
use crate::features::Features;
use crate::models::finding::{num, Axis, Finding};
use crate::models::CheckResult;

pub fn check(f: &Features, t: &Thresholds) -> CheckResult {
    let mut res = CheckResult::default();

    if f.axis_text_size < t.min_axis_text {
        res.push(Finding::SmallAxisText {
            size: f.axis_text_size,
            min: t.min_axis_text,
        });
        res.suggest(format!(
            "Increase axis text to at least {0}pt: theme(axis.text = element_text(size = {0}))",
            num(t.recommended_axis_text)
        ));
    }

    if f.title_size < t.min_title_text {
        res.push(Finding::SmallTitleText {
            size: f.title_size,
            min: t.min_title_text,
        });
        res.suggest(format!(
            "Increase title size to at least {0}pt: theme(plot.title = element_text(size = {0}))",
            num(t.min_title_text)
        ));
    }

    if let Some(count) = f.x_tick_count {
        if count > t.max_tick_labels {
            res.push(Finding::CrowdedTicks { count });
            res.suggest(
                "Rotate x labels (theme(axis.text.x = element_text(angle = 45, hjust = 1))), \
                 show fewer categories, or flip the axes with coord_flip()",
            );
        }
    }

    if let Some(max_len) = f
        .tick_label_lengths
        .as_ref()
        .and_then(|lens| lens.iter().copied().max())
    {
        if max_len > t.max_tick_label_len {
            res.push(Finding::LongTickLabels { max_len });
            res.suggest("Abbreviate long labels or wrap them, e.g. scale_x_discrete(labels = label_wrap(15))");
        }
    }

    for (axis, label) in [(Axis::X, &f.labels.x), (Axis::Y, &f.labels.y)] {
        if label.as_deref().map_or(true, |l| l.trim().is_empty()) {
            res.push(Finding::MissingAxisLabel { axis });
            res.suggest(format!("Add a descriptive {axis}-axis label with labs({axis} = \"...\")"));
        }
    }

    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::fixtures;

    fn has(res: &CheckResult, code: &str) -> bool {
        res.warnings.iter().any(|w| w.finding.code() == code)
    }

    #[test]
    fn test_small_axis_text_threshold() {
        let mut f = fixtures::clean();
        f.axis_text_size = 6.0;
        let res = check(&f, &Thresholds::default());
        assert!(res.warnings[0].message.contains("small"));
        assert!(res.suggestions[0].contains("10"));

        f.axis_text_size = 11.0;
        assert!(!has(&check(&f, &Thresholds::default()), "TEXT_SMALL_AXIS"));
    }

    #[test]
    fn test_small_title() {
        let mut f = fixtures::clean();
        f.title_size = 9.0;
        assert!(has(&check(&f, &Thresholds::default()), "TEXT_SMALL_TITLE"));
    }

    #[test]
    fn test_crowded_and_long_ticks() {
        let mut f = fixtures::clean();
        f.x_tick_count = Some(16);
        f.tick_label_lengths = Some(vec![3, 21]);
        let res = check(&f, &Thresholds::default());
        assert!(has(&res, "TEXT_CROWDED_TICKS"));
        assert!(has(&res, "TEXT_LONG_TICKS"));
    }

    #[test]
    fn test_axis_labels_checked_independently() {
        let mut f = fixtures::clean();
        f.labels.x = Some("  ".into());
        let res = check(&f, &Thresholds::default());
        assert_eq!(
            res.warnings
                .iter()
                .map(|w| w.finding.clone())
                .collect::<Vec<_>>(),
            vec![Finding::MissingAxisLabel { axis: Axis::X }]
        );

        f.labels.y = None;
        assert_eq!(check(&f, &Thresholds::default()).warnings.len(), 2);
    }

    #[test]
    fn test_unavailable_ticks_are_skipped() {
        let mut f = fixtures::clean();
        f.x_tick_count = None;
        f.tick_label_lengths = None;
        assert!(check(&f, &Thresholds::default()).is_clean());
    }
}
