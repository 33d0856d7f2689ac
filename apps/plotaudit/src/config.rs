//! Configuration discovery and effective settings resolution.
//!
//! plotaudit reads `plotaudit.toml|yaml|yml` from the project root (or the
//! closest ancestor holding one) and merges it with CLI flags into an
//! `Effective` config. Defaults:
//! - `checks`: `all`
//! - `output`: `human`
//! - `patterns`: `**/*.plot.{json,yaml,yml,toml}`
//! - `thresholds`: built-in check limits
//! - `fix.axis_text_size`: 10, `fix.palette`: `viridis`, `fix.write`: false
//!
//! Overrides precedence: CLI > config file > defaults.

use crate::audit::CheckSet;
use crate::checks::Thresholds;
use crate::error::{AuditError, AuditResult};
use crate::fix::FixOptions;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_NAMES: [&str; 3] = ["plotaudit.toml", "plotaudit.yaml", "plotaudit.yml"];

pub const DEFAULT_PATTERNS: [&str; 4] = [
    "**/*.plot.json",
    "**/*.plot.yaml",
    "**/*.plot.yml",
    "**/*.plot.toml",
];

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
/// `checks = "color,scales"` or `checks = ["color", "scales"]`.
pub enum ChecksCfg {
    One(String),
    Many(Vec<String>),
}

impl ChecksCfg {
    fn joined(&self) -> String {
        match self {
            ChecksCfg::One(s) => s.clone(),
            ChecksCfg::Many(v) => v.join(","),
        }
    }
}

#[derive(Debug, Default, Deserialize, Clone)]
/// `[fix]` section.
pub struct FixCfg {
    pub axis_text_size: Option<f64>,
    pub palette: Option<String>,
    /// Default for `plotaudit fix --write`.
    pub write: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `plotaudit.toml|yaml`.
pub struct PlotauditConfig {
    pub checks: Option<ChecksCfg>,
    pub output: Option<String>,
    pub patterns: Option<Vec<String>>,
    /// Partial override; unset keys keep their defaults.
    pub thresholds: Option<Thresholds>,
    pub fix: Option<FixCfg>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub repo_root: PathBuf,
    pub config_path: Option<PathBuf>,
    pub checks: CheckSet,
    pub output: String,
    pub patterns: Vec<String>,
    pub patterns_configured: bool,
    pub thresholds: Thresholds,
    pub fix: FixOptions,
    pub write: bool,
}

/// Walk upward from `start` to detect the project root.
///
/// Stops when a `plotaudit.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if CONFIG_NAMES.iter().any(|n| cur.join(n).exists()) || cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Path of the config file under `root`, TOML first.
pub fn find_config(root: &Path) -> Option<PathBuf> {
    CONFIG_NAMES
        .iter()
        .map(|n| root.join(n))
        .find(|p| p.exists())
}

/// Load `PlotauditConfig` from `root` if a config file is present.
///
/// A file that exists but does not parse is an error, not a silent default.
pub fn load_config(root: &Path) -> AuditResult<Option<PlotauditConfig>> {
    let Some(path) = find_config(root) else {
        return Ok(None);
    };
    let invalid = |e: String| AuditError::InvalidInput(format!("{}: {e}", path.display()));
    let s = fs::read_to_string(&path).map_err(|e| invalid(e.to_string()))?;
    let is_toml = path.extension().is_some_and(|e| e == "toml");
    let cfg: PlotauditConfig = if is_toml {
        toml::from_str(&s).map_err(|e| invalid(e.to_string()))?
    } else {
        serde_yaml::from_str(&s).map_err(|e| invalid(e.to_string()))?
    };
    Ok(Some(cfg))
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(
    cli_repo_root: Option<&str>,
    cli_checks: Option<&str>,
    cli_output: Option<&str>,
    cli_patterns: &[String],
    cli_write: Option<bool>,
) -> AuditResult<Effective> {
    let start = PathBuf::from(cli_repo_root.unwrap_or("."));
    let repo_root = detect_repo_root(&start);
    let config_path = find_config(&repo_root);
    let cfg = load_config(&repo_root)?.unwrap_or_default();

    let checks = match cli_checks
        .map(str::to_string)
        .or_else(|| cfg.checks.as_ref().map(ChecksCfg::joined))
    {
        Some(list) => CheckSet::parse(&list)?,
        None => CheckSet::all(),
    };

    let output = cli_output
        .map(|s| s.to_string())
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());
    if output != "human" && output != "json" {
        return Err(AuditError::InvalidInput(format!(
            "output must be 'human' or 'json', got '{output}'"
        )));
    }

    let (patterns, patterns_configured) = if !cli_patterns.is_empty() {
        (cli_patterns.to_vec(), true)
    } else if let Some(p) = cfg.patterns.filter(|p| !p.is_empty()) {
        (p, true)
    } else {
        (DEFAULT_PATTERNS.iter().map(|s| s.to_string()).collect(), false)
    };

    let fix_cfg = cfg.fix.unwrap_or_default();
    let defaults = FixOptions::default();
    let fix = FixOptions {
        axis_text_size: fix_cfg.axis_text_size.unwrap_or(defaults.axis_text_size),
        palette: fix_cfg.palette.unwrap_or(defaults.palette),
    };
    let write = cli_write.or(fix_cfg.write).unwrap_or(false);

    Ok(Effective {
        repo_root,
        config_path,
        checks,
        output,
        patterns,
        patterns_configured,
        thresholds: cfg.thresholds.unwrap_or_default(),
        fix,
        write,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_detect_and_load_toml() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("plotaudit.toml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
checks = "color,labels"
output = "json"
patterns = ["plots/*.json"]
[thresholds]
max_colors = 5
[fix]
write = true
palette = "cividis"
    "#
        )
        .unwrap();

        // explicit repo_root avoids global CWD races
        let eff = resolve_effective(root.to_str(), None, None, &[], None).unwrap();
        assert_eq!(
            eff.checks.iter().collect::<Vec<_>>(),
            vec![Category::Color, Category::Labels]
        );
        assert_eq!(eff.output, "json");
        assert_eq!(eff.patterns, vec!["plots/*.json"]);
        assert!(eff.patterns_configured);
        assert_eq!(eff.thresholds.max_colors, 5);
        // unspecified thresholds keep defaults
        assert_eq!(eff.thresholds.min_contrast, 3.0);
        assert_eq!(eff.fix.palette, "cividis");
        assert_eq!(eff.fix.axis_text_size, 10.0);
        assert!(eff.write);
        assert!(eff.config_path.is_some());
    }

    #[test]
    fn test_load_yaml_and_defaults() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("plotaudit.yaml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
checks: [scales, text]
fix:
  axis_text_size: 12
            "#
        )
        .unwrap();

        let eff = resolve_effective(root.to_str(), None, None, &[], None).unwrap();
        assert!(eff.checks.contains(Category::Text));
        assert!(!eff.checks.contains(Category::Color));
        assert_eq!(eff.output, "human");
        assert!(!eff.patterns_configured);
        assert_eq!(eff.patterns.len(), DEFAULT_PATTERNS.len());
        assert_eq!(eff.fix.axis_text_size, 12.0);
        assert!(!eff.write);
    }

    #[test]
    fn test_cli_takes_precedence() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(
            root.join("plotaudit.toml"),
            "checks = \"color\"\noutput = \"json\"\n[fix]\nwrite = true\n",
        )
        .unwrap();
        let eff = resolve_effective(
            root.to_str(),
            Some("all"),
            Some("human"),
            &["a.json".to_string()],
            Some(false),
        )
        .unwrap();
        assert_eq!(eff.checks, CheckSet::all());
        assert_eq!(eff.output, "human");
        assert_eq!(eff.patterns, vec!["a.json"]);
        assert!(!eff.write);
    }

    #[test]
    fn test_detect_root_walks_up_to_git() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join(".git")).unwrap();
        let nested = root.join("a/b");
        fs::create_dir_all(&nested).unwrap();
        assert_eq!(detect_repo_root(&nested), root.to_path_buf());
    }

    #[test]
    fn test_invalid_config_and_values_are_errors() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("plotaudit.toml"), "checks = [1, 2").unwrap();
        assert!(matches!(
            resolve_effective(root.to_str(), None, None, &[], None),
            Err(AuditError::InvalidInput(_))
        ));

        fs::write(root.join("plotaudit.toml"), "checks = \"colors,typo\"\n").unwrap();
        assert!(matches!(
            resolve_effective(root.to_str(), None, None, &[], None),
            Err(AuditError::InvalidCheckName { .. })
        ));

        fs::write(root.join("plotaudit.toml"), "").unwrap();
        assert!(resolve_effective(root.to_str(), None, Some("xml"), &[], None).is_err());
    }
}
