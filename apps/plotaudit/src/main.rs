//! plotaudit CLI binary entry point.
//! Delegates to library modules for audit/fix/simulation and prints results.

use clap::Parser;
use plotaudit::audit::audit;
use plotaudit::bundle::{self, BundleFormat, Plot};
use plotaudit::cli::{Cli, Commands};
use plotaudit::color::{simulate_colors, CvdType};
use plotaudit::config::{self, Effective};
use plotaudit::error::{AuditError, AuditResult};
use plotaudit::fix::{suggest_fixes, FixOutcome, FixSource};
use plotaudit::models::Report;
use plotaudit::output;
use plotaudit::simulate::simulate_cvd;
use plotaudit::utils::{display_path, error_prefix, info_prefix, note_prefix};
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_env("PLOTAUDIT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}

/// Print an input/config error and exit with status 2.
fn fail(err: AuditError) -> ! {
    eprintln!("{} {}", error_prefix(), err);
    std::process::exit(2);
}

fn announce_defaults(eff: &Effective) {
    if eff.output == "json" {
        return;
    }
    if eff.config_path.is_none() {
        eprintln!("{} No plotaudit.toml found; using defaults.", note_prefix());
    }
    if !eff.patterns_configured {
        eprintln!(
            "{} Using default patterns: [{}]",
            info_prefix(),
            eff.patterns.join(", ")
        );
    }
}

/// Expand patterns relative to `root` into a sorted, deduplicated file list.
fn collect_files(root: &Path, patterns: &[String]) -> AuditResult<Vec<PathBuf>> {
    let mut files: BTreeSet<PathBuf> = BTreeSet::new();
    for pat in patterns {
        let abs = root.join(pat);
        let pattern = abs.to_string_lossy().to_string();
        let entries = glob::glob(&pattern)
            .map_err(|e| AuditError::InvalidInput(format!("bad glob pattern '{pat}': {e}")))?;
        for p in entries.flatten() {
            if p.is_file() {
                files.insert(p);
            }
        }
    }
    debug!(count = files.len(), "bundles matched");
    Ok(files.into_iter().collect())
}

fn matched_files(eff: &Effective) -> Vec<PathBuf> {
    let files = collect_files(&eff.repo_root, &eff.patterns).unwrap_or_else(|e| fail(e));
    if files.is_empty() {
        fail(AuditError::InvalidInput(format!(
            "no plot bundles matched [{}] under {}",
            eff.patterns.join(", "),
            eff.repo_root.display()
        )));
    }
    files
}

/// Print every per-file error; true when there was at least one.
fn report_errors<T>(results: &[(String, AuditResult<T>)]) -> bool {
    let mut any = false;
    for (file, res) in results {
        if let Err(e) = res {
            eprintln!("{} {}: {}", error_prefix(), file, e);
            any = true;
        }
    }
    any
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Audit {
            patterns,
            checks,
            output,
            repo_root,
        } => {
            let eff = config::resolve_effective(
                repo_root.as_deref(),
                checks.as_deref(),
                output.as_deref(),
                &patterns,
                None,
            )
            .unwrap_or_else(|e| fail(e));
            announce_defaults(&eff);
            let files = matched_files(&eff);

            let mut results: Vec<(String, AuditResult<Report>)> = files
                .par_iter()
                .map(|path| {
                    let res = bundle::load_plot(path).and_then(|plot| {
                        audit(&plot.spec, &plot.resolved, &eff.checks, &eff.thresholds)
                    });
                    (display_path(path, &eff.repo_root), res)
                })
                .collect();
            // Deterministic ordering by file
            results.sort_by(|a, b| a.0.cmp(&b.0));

            let had_errors = report_errors(&results);
            let reports: Vec<(String, Report)> = results
                .into_iter()
                .filter_map(|(f, r)| r.ok().map(|r| (f, r)))
                .collect();
            output::print_reports(&reports, &eff.output);
            if had_errors {
                std::process::exit(2);
            }
            if reports.iter().any(|(_, r)| !r.issues.is_empty()) {
                std::process::exit(1);
            }
        }
        Commands::Fix {
            patterns,
            auto,
            write,
            output,
            repo_root,
        } => {
            let eff = config::resolve_effective(
                repo_root.as_deref(),
                None,
                output.as_deref(),
                &patterns,
                if write { Some(true) } else { None },
            )
            .unwrap_or_else(|e| fail(e));
            announce_defaults(&eff);
            let files = matched_files(&eff);
            // Writing only makes sense for revised bundles
            let auto = auto || eff.write;

            let mut results: Vec<(String, AuditResult<(FixOutcome, Plot, bool)>)> = files
                .par_iter()
                .map(|path| {
                    let res = bundle::load_plot(path).and_then(|plot| {
                        let report = audit(&plot.spec, &plot.resolved, &eff.checks, &eff.thresholds)?;
                        let outcome = suggest_fixes(FixSource::Report(&report), auto, &eff.fix)?;
                        let mut wrote = false;
                        if let FixOutcome::Revised { spec, fixes } = &outcome {
                            if eff.write && !fixes.auto.is_empty() {
                                let revised = Plot {
                                    spec: spec.clone(),
                                    resolved: plot.resolved.clone(),
                                };
                                bundle::write_plot(path, &revised)?;
                                wrote = true;
                            }
                        }
                        Ok((outcome, plot, wrote))
                    });
                    (display_path(path, &eff.repo_root), res)
                })
                .collect();
            results.sort_by(|a, b| a.0.cmp(&b.0));

            let had_errors = report_errors(&results);
            let mut printed: Vec<(String, FixOutcome, bool)> = Vec::new();
            let mut previews: Vec<(String, Plot)> = Vec::new();
            for (file, res) in results {
                let Ok((outcome, plot, wrote)) = res else {
                    continue;
                };
                if let FixOutcome::Revised { spec, .. } = &outcome {
                    if !wrote {
                        previews.push((
                            file.clone(),
                            Plot {
                                spec: spec.clone(),
                                resolved: plot.resolved,
                            },
                        ));
                    }
                }
                printed.push((file, outcome, wrote));
            }
            output::print_fixes(&printed, &eff.output);
            if eff.output != "json" {
                for (file, plot) in &previews {
                    let format =
                        BundleFormat::from_path(Path::new(file)).unwrap_or(BundleFormat::Json);
                    match bundle::render_plot(plot, format) {
                        Ok(text) => println!("--- {file} (revised)\n{text}"),
                        Err(e) => eprintln!("{} {}: {}", error_prefix(), file, e),
                    }
                }
            }
            if had_errors {
                std::process::exit(2);
            }
        }
        Commands::Simulate { file, kind, write } => {
            let kind: CvdType = kind.parse().unwrap_or_else(|e| fail(e));
            let path = PathBuf::from(&file);
            let plot = bundle::load_plot(&path).unwrap_or_else(|e| fail(e));
            let sim = simulate_cvd(&plot.spec, &plot.resolved, kind).unwrap_or_else(|e| fail(e));
            for d in &sim.degraded {
                eprintln!("{} {}", note_prefix(), d.message());
            }
            let revised = Plot {
                spec: sim.spec,
                resolved: plot.resolved,
            };
            match write {
                Some(dest) => {
                    bundle::write_plot(Path::new(&dest), &revised).unwrap_or_else(|e| fail(e));
                    eprintln!("{} Simulated {} bundle written to {}", info_prefix(), kind, dest);
                }
                None => {
                    let format = BundleFormat::from_path(&path).unwrap_or_else(|e| fail(e));
                    match bundle::render_plot(&revised, format) {
                        Ok(text) => print!("{text}"),
                        Err(e) => fail(AuditError::InvalidInput(e)),
                    }
                }
            }
        }
        Commands::Colors {
            colors,
            kind,
            severity,
            output,
        } => {
            let kind: CvdType = kind.parse().unwrap_or_else(|e| fail(e));
            if !(0.0..=1.0).contains(&severity) {
                fail(AuditError::InvalidInput(format!(
                    "severity must be between 0 and 1, got {severity}"
                )));
            }
            let output = output.unwrap_or_else(|| "human".to_string());
            let samples = simulate_colors(&colors, kind, severity);
            output::print_colors(&samples, &output);
            if samples.iter().any(|s| s.is_err()) {
                std::process::exit(2);
            }
        }
    }
}
