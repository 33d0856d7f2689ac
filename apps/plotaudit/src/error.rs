//! Error types surfaced at the audit entry points.
//!
//! Only structural problems are errors. Data anomalies found while checking
//! (unparseable colors, absent resolved fields) degrade to warnings or
//! skipped checks and never reach this type.

use thiserror::Error;

pub type AuditResult<T> = Result<T, AuditError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AuditError {
    /// The argument is not an audit-compatible specification or bundle.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unknown check '{name}'; valid options are: {valid}")]
    InvalidCheckName { name: String, valid: String },

    #[error("unknown CVD type '{0}'; valid options are: deutan, protan, tritan")]
    InvalidCvdType(String),

    /// Auto-fix was requested from a report that carries no original specification.
    #[error("auto-fix needs the original specification; audit the plot again instead of passing a detached report")]
    MissingSpecification,
}

/// A color string that could not be turned into RGB.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("cannot parse color '{0}'")]
pub struct ColorParseError(pub String);
