//! plotaudit core library.
//!
//! This crate audits declarative plot specifications for visual-design
//! defects and turns the findings into corrective snippets or automatic
//! fixes.
//!
//! High-level modules:
//! - `audit`: Check selection, parallel execution and the ordered report merge.
//! - `checks`: The five check modules (color, scales, text, accessibility, labels).
//! - `features`: Feature extraction and color sampling from the resolved model.
//! - `color`: Color parsing, WCAG contrast and CVD simulation of single colors.
//! - `simulate`: CVD simulation over a whole specification.
//! - `fix`: Fix suggestions and mechanical auto-fixes.
//! - `bundle`: Loading and writing plot bundles (JSON/YAML/TOML).
//! - `config`: Discovery and effective configuration resolution.
//! - `cli`: CLI argument parsing (binary uses this).
//! - `output`: Human/JSON printers for reports, fixes and colors.
//! - `models`: Specification, resolved model, findings and report types.
//! - `error`: Error kinds surfaced at the entry points.
//! - `utils`: Supporting helpers.
pub mod audit;
pub mod bundle;
pub mod checks;
pub mod cli;
pub mod color;
pub mod config;
pub mod error;
pub mod features;
pub mod fix;
pub mod models;
pub mod output;
pub mod simulate;
pub mod utils;

pub use audit::{
    audit, audit_with, check_accessibility, check_color, check_labels, check_scales, check_text,
    CheckSet, Resolve,
};
pub use color::{simulate_colors, CvdType};
pub use error::{AuditError, AuditResult};
pub use fix::{suggest_fixes, FixOutcome, FixSet, FixSource};
pub use simulate::{simulate_cvd, Simulation};
