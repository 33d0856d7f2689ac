//! Plot bundles: a specification plus the model its frontend resolved,
//! stored as JSON, YAML or TOML.

use crate::error::{AuditError, AuditResult};
use crate::models::resolved::ResolvedModel;
use crate::models::spec::Specification;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plot {
    pub spec: Specification,
    #[serde(default)]
    pub resolved: ResolvedModel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundleFormat {
    Json,
    Yaml,
    Toml,
}

impl BundleFormat {
    /// Format by file extension.
    pub fn from_path(path: &Path) -> AuditResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("json") => Ok(BundleFormat::Json),
            Some("yaml") | Some("yml") => Ok(BundleFormat::Yaml),
            Some("toml") => Ok(BundleFormat::Toml),
            _ => Err(AuditError::InvalidInput(format!(
                "{}: unsupported bundle extension (expected .json, .yaml, .yml or .toml)",
                path.display()
            ))),
        }
    }
}

pub fn parse_plot(text: &str, format: BundleFormat) -> Result<Plot, String> {
    match format {
        BundleFormat::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
        BundleFormat::Yaml => serde_yaml::from_str(text).map_err(|e| e.to_string()),
        BundleFormat::Toml => toml::from_str(text).map_err(|e| e.to_string()),
    }
}

pub fn render_plot(plot: &Plot, format: BundleFormat) -> Result<String, String> {
    match format {
        BundleFormat::Json => serde_json::to_string_pretty(plot)
            .map(|s| s + "\n")
            .map_err(|e| e.to_string()),
        BundleFormat::Yaml => serde_yaml::to_string(plot).map_err(|e| e.to_string()),
        BundleFormat::Toml => toml::to_string(plot).map_err(|e| e.to_string()),
    }
}

/// Read and parse a bundle. Every failure is `InvalidInput` naming the path.
pub fn load_plot(path: &Path) -> AuditResult<Plot> {
    let format = BundleFormat::from_path(path)?;
    let text = fs::read_to_string(path)
        .map_err(|e| AuditError::InvalidInput(format!("{}: {e}", path.display())))?;
    parse_plot(&text, format)
        .map_err(|e| AuditError::InvalidInput(format!("{}: {e}", path.display())))
}

/// Write `plot` in the format implied by `path`.
pub fn write_plot(path: &Path, plot: &Plot) -> AuditResult<()> {
    let format = BundleFormat::from_path(path)?;
    let text = render_plot(plot, format)
        .map_err(|e| AuditError::InvalidInput(format!("{}: {e}", path.display())))?;
    fs::write(path, text)
        .map_err(|e| AuditError::InvalidInput(format!("{}: {e}", path.display())))
}
