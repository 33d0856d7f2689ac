//! Output rendering for audit, fix and color commands.
//!
//! Supports `human` (default) and `json` outputs. The JSON form includes
//! per-file results and a top-level summary.

use crate::color::ColorSample;
use crate::error::ColorParseError;
use crate::fix::{FixOutcome, FixSet};
use crate::models::{Report, Severity};
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;

fn use_colors(output: &str) -> bool {
    output != "json" && std::env::var_os("NO_COLOR").is_none()
}

fn print_json(v: &JsonVal) {
    match serde_json::to_string_pretty(v) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("{} {e}", crate::utils::error_prefix()),
    }
}

fn paint(text: &str, color: bool, style: fn(&str) -> String) -> String {
    if color {
        style(text)
    } else {
        text.to_string()
    }
}

/// Print audit reports, one block per file, then a summary line.
pub fn print_reports(results: &[(String, Report)], output: &str) {
    if output == "json" {
        print_json(&compose_report_json(results));
        return;
    }
    let color = use_colors(output);
    for (file, report) in results {
        let info = &report.plot_info;
        let header = format!(
            "{} ({} layer{}: {})",
            file,
            info.layers,
            if info.layers == 1 { "" } else { "s" },
            info.geoms.join(", ")
        );
        println!("{}", paint(&header, color, |s| s.bold().to_string()));
        for is in report.entries() {
            let (icon, sev) = match is.severity {
                Severity::Issue => (
                    paint("✖", color, |s| s.red().to_string()),
                    paint("⟦issue⟧", color, |s| s.red().bold().to_string()),
                ),
                Severity::Warning => (
                    paint("▲", color, |s| s.yellow().to_string()),
                    paint("⟦warn⟧", color, |s| s.yellow().bold().to_string()),
                ),
            };
            println!("  {} {} ❲{}❳ — {}", icon, sev, is.category, is.message);
        }
        for s in &report.suggestions {
            println!("    {} {}", paint("→", color, |s| s.cyan().to_string()), s);
        }
        if !report.passed.is_empty() {
            let passed: Vec<&str> = report.passed.iter().map(|c| c.as_str()).collect();
            let line = format!("✔ passed: {}", passed.join(", "));
            println!("  {}", paint(&line, color, |s| s.green().to_string()));
        }
    }
    let (issues, warnings, suggestions) = totals(results);
    let summary = format!(
        "— Summary — issues={} warnings={} suggestions={} files={}",
        issues,
        warnings,
        suggestions,
        results.len()
    );
    println!("{}", paint(&summary, color, |s| s.bold().to_string()));
}

fn totals(results: &[(String, Report)]) -> (usize, usize, usize) {
    results.iter().fold((0, 0, 0), |acc, (_, r)| {
        let s = r.summary();
        (acc.0 + s.issues, acc.1 + s.warnings, acc.2 + s.suggestions)
    })
}

/// Compose audit JSON object (pure) for testing/snapshot purposes.
pub fn compose_report_json(results: &[(String, Report)]) -> JsonVal {
    let items: Vec<_> = results
        .iter()
        .map(|(file, report)| {
            json!({
                "file": file,
                "report": report,
                "summary": report.summary(),
            })
        })
        .collect();
    let (issues, warnings, suggestions) = totals(results);
    json!({
        "results": items,
        "summary": {
            "issues": issues,
            "warnings": warnings,
            "suggestions": suggestions,
            "files": results.len(),
        }
    })
}

fn fix_set(outcome: &FixOutcome) -> &FixSet {
    match outcome {
        FixOutcome::Suggestions(set) => set,
        FixOutcome::Revised { fixes, .. } => fixes,
    }
}

/// Print fix sets. `wrote` marks files whose revised bundle was saved.
pub fn print_fixes(results: &[(String, FixOutcome, bool)], output: &str) {
    if output == "json" {
        print_json(&compose_fix_json(results));
        return;
    }
    let color = use_colors(output);
    for (file, outcome, wrote) in results {
        println!("{}", paint(file, color, |s| s.bold().to_string()));
        let set = fix_set(outcome);
        if set.is_empty() {
            println!("  {}", paint("no fixes needed", color, |s| s.bright_black().to_string()));
            continue;
        }
        for (category, lines) in &set.snippets {
            if lines.is_empty() {
                continue;
            }
            println!("  # {category}");
            for l in lines {
                println!("  {l}");
            }
        }
        let applied_label = if matches!(outcome, FixOutcome::Revised { .. }) {
            "applied:"
        } else {
            "auto-applicable:"
        };
        for a in &set.applied {
            println!("  {} {}", paint(applied_label, color, |s| s.green().bold().to_string()), a);
        }
        for m in &set.manual {
            println!("  {} {}", paint("manual:", color, |s| s.yellow().bold().to_string()), m);
        }
        if *wrote {
            println!("  {}", paint("✏️  revised bundle written", color, |s| s.green().to_string()));
        }
    }
}

/// Compose fix JSON object (pure) for testing/snapshot purposes.
pub fn compose_fix_json(results: &[(String, FixOutcome, bool)]) -> JsonVal {
    let items: Vec<_> = results
        .iter()
        .map(|(file, outcome, wrote)| {
            let revised = match outcome {
                FixOutcome::Revised { spec, .. } => Some(spec),
                FixOutcome::Suggestions(_) => None,
            };
            json!({
                "file": file,
                "fixes": fix_set(outcome),
                "revised": revised,
                "wrote": wrote,
            })
        })
        .collect();
    let applied: usize = results.iter().map(|(_, o, _)| fix_set(o).applied.len()).sum();
    let manual: usize = results.iter().map(|(_, o, _)| fix_set(o).manual.len()).sum();
    json!({
        "results": items,
        "summary": {
            "applied": applied,
            "manual": manual,
            "wrote": results.iter().filter(|(_, _, w)| *w).count(),
            "files": results.len(),
        }
    })
}

/// Print simulated colors, original next to simulated.
pub fn print_colors(samples: &[Result<ColorSample, ColorParseError>], output: &str) {
    if output == "json" {
        print_json(&compose_colors_json(samples));
        return;
    }
    let color = use_colors(output);
    for s in samples {
        match s {
            Ok(sample) => {
                let sim = sample
                    .simulated
                    .as_ref()
                    .map(|v| format!("{} ({})", v.rgb, v.kind))
                    .unwrap_or_default();
                println!("{:<16} {} → {}", sample.input, sample.rgb, sim);
            }
            Err(e) => println!("{} {}", paint("▲", color, |s| s.yellow().to_string()), e),
        }
    }
}

/// Compose color JSON object (pure) for testing/snapshot purposes.
pub fn compose_colors_json(samples: &[Result<ColorSample, ColorParseError>]) -> JsonVal {
    let items: Vec<_> = samples
        .iter()
        .map(|s| match s {
            Ok(sample) => json!(sample),
            Err(e) => json!({ "input": e.0, "error": e.to_string() }),
        })
        .collect();
    json!({
        "colors": items,
        "summary": {
            "parsed": samples.iter().filter(|s| s.is_ok()).count(),
            "failed": samples.iter().filter(|s| s.is_err()).count(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{simulate_colors, CvdType};
    use crate::fix::AutoFix;
    use crate::models::finding::Finding;
    use crate::models::{Category, CheckResult};

    fn sample_report() -> Report {
        let mut color = CheckResult::default();
        color.push(Finding::RedGreenConflict);
        color.suggest("use viridis");
        crate::audit::merge(vec![
            (Category::Color, color),
            (Category::Text, CheckResult::default()),
        ])
    }

    #[test]
    fn test_compose_report_json_shape() {
        let out = compose_report_json(&[("a.plot.json".into(), sample_report())]);
        assert_eq!(out["summary"]["issues"], 1);
        assert_eq!(out["summary"]["files"], 1);
        let first = &out["results"][0]["report"]["issues"][0];
        assert_eq!(first["finding"]["code"], "COLOR_RED_GREEN_CONFLICT");
        assert_eq!(first["category"], "color");
        assert_eq!(out["results"][0]["report"]["passed"][0], "text");
    }

    #[test]
    fn test_compose_fix_json_summary() {
        let set = FixSet {
            applied: vec!["viridis".into()],
            manual: vec!["facet".into(), "title".into()],
            auto: vec![AutoFix::UniformColourScale],
            ..FixSet::default()
        };
        let out = compose_fix_json(&[("a.json".into(), FixOutcome::Suggestions(set), false)]);
        assert_eq!(out["summary"]["applied"], 1);
        assert_eq!(out["summary"]["manual"], 2);
        assert!(out["results"][0]["revised"].is_null());
        assert_eq!(out["results"][0]["fixes"]["auto"][0], "uniform_colour_scale");
    }

    #[test]
    fn test_compose_colors_json() {
        let samples = simulate_colors(&["#FFFFFF", "nope"], CvdType::Deutan, 1.0);
        let out = compose_colors_json(&samples);
        assert_eq!(out["summary"]["parsed"], 1);
        assert_eq!(out["colors"][0]["rgb"], "#FFFFFF");
        assert_eq!(out["colors"][1]["input"], "nope");
    }
}
