//! Label check: plot title, code-like axis and legend labels, untitled
//! legends.

use super::Thresholds;
use crate::features::Features;
use crate::models::finding::Finding;
use crate::models::spec::LabelRole;
use crate::models::CheckResult;
use regex::Regex;
use std::sync::OnceLock;

const CHECKED_ROLES: [LabelRole; 6] = [
    LabelRole::X,
    LabelRole::Y,
    LabelRole::Colour,
    LabelRole::Fill,
    LabelRole::Size,
    LabelRole::Shape,
];

/// Call syntax, cast prefixes, field access, or snake_case.
fn artifact_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"[A-Za-z_.][\w.]*\(|\bas[._][A-Za-z]\w*|\$|::|->|\b[A-Za-z]\w+\.[A-Za-z]\w+\b|_",
        )
        .expect("label artifact pattern is valid")
    })
}

fn call_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z_.][\w.]*\((.*)\)$").expect("call pattern is valid")
    })
}

/// True when `label` reads like source code rather than prose.
pub fn looks_like_code(label: &str) -> bool {
    artifact_pattern().is_match(label)
}

/// Human-readable replacement for a code-like label: `factor(cyl)` becomes
/// `Cyl`, `df$mpg_avg` becomes `Mpg avg`.
pub fn clean_label(label: &str) -> String {
    let mut s = label.trim().to_string();
    while let Some(inner) = call_pattern()
        .captures(&s)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
    {
        s = first_argument(&inner).trim().to_string();
    }
    for sep in ["$", "::", "->"] {
        if let Some((_, tail)) = s.rsplit_once(sep) {
            s = tail.to_string();
        }
    }
    let words: Vec<&str> = s
        .split(|c: char| c == '_' || c == '.' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .collect();
    let joined = words.join(" ");
    let mut chars = joined.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => label.trim().to_string(),
    }
}

/// Text before the first top-level comma.
fn first_argument(args: &str) -> &str {
    let mut depth = 0usize;
    for (i, c) in args.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => return &args[..i],
            _ => {}
        }
    }
    args
}

fn is_blank(label: Option<&str>) -> bool {
    label.map_or(true, |l| l.trim().is_empty())
}

pub fn check(f: &Features, _t: &Thresholds) -> CheckResult {
    let mut res = CheckResult::default();

    if is_blank(f.labels.title.as_deref()) {
        res.push(Finding::MissingTitle);
        res.suggest("Add a title that states the main message: labs(title = \"...\")");
    }

    for role in CHECKED_ROLES {
        let Some(label) = f.labels.get(role) else {
            continue;
        };
        if looks_like_code(label) {
            let replacement = clean_label(label);
            res.suggest(format!("labs({role} = \"{replacement}\")"));
            res.push(Finding::ProgrammingSyntax {
                role,
                label: label.to_string(),
                replacement,
            });
        }
    }

    for (present, role) in [
        (f.colour_legend, LabelRole::Colour),
        (f.fill_legend, LabelRole::Fill),
    ] {
        if present && is_blank(f.labels.get(role)) {
            res.push(Finding::UntitledLegend { role });
            res.suggest(format!("Give the {role} legend a title: labs({role} = \"...\")"));
        }
    }

    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::fixtures;

    #[test]
    fn test_detects_code_like_labels() {
        for l in ["factor(cyl)", "as.numeric(x)", "df$mpg", "pkg::col", "a->b", "disp_per_cyl", "data.value"] {
            assert!(looks_like_code(l), "{l}");
        }
        for l in [
            "Miles per gallon",
            "Weight (1000 lbs)",
            "Cylinders",
            "Rate, 2021-2023",
            "Price (U.S. dollars)",
            "Length, e.g. in cm",
            "Version 1.2",
        ] {
            assert!(!looks_like_code(l), "{l}");
        }
    }

    #[test]
    fn test_clean_label() {
        assert_eq!(clean_label("factor(cyl)"), "Cyl");
        assert_eq!(clean_label("as.factor(gear)"), "Gear");
        assert_eq!(clean_label("df$mpg_avg"), "Mpg avg");
        assert_eq!(clean_label("round(hp_total, 2)"), "Hp total");
        assert_eq!(clean_label("data.value"), "Data value");
    }

    #[test]
    fn test_programming_syntax_is_issue_with_replacement() {
        let mut f = fixtures::clean();
        f.labels.colour = Some("factor(cyl)".into());
        f.colour_legend = true;
        let res = check(&f, &Thresholds::default());
        assert_eq!(res.issues.len(), 1);
        assert_eq!(
            res.issues[0].finding,
            Finding::ProgrammingSyntax {
                role: LabelRole::Colour,
                label: "factor(cyl)".into(),
                replacement: "Cyl".into(),
            }
        );
        assert!(res.suggestions.iter().any(|s| s.contains("labs(colour = \"Cyl\")")));
    }

    #[test]
    fn test_missing_title_and_untitled_legend() {
        let mut f = fixtures::clean();
        f.labels.title = None;
        f.fill_legend = true;
        let res = check(&f, &Thresholds::default());
        let codes: Vec<_> = res.warnings.iter().map(|w| w.finding.code()).collect();
        assert_eq!(codes, vec!["LABEL_MISSING_TITLE", "LABEL_UNTITLED_LEGEND"]);
    }

    #[test]
    fn test_clean_plot_passes() {
        assert!(check(&fixtures::clean(), &Thresholds::default()).is_clean());
    }
}
