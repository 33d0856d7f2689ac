//! Resolved rendering model produced by an external build step.
//!
//! Every field is optional on the wire: a missing piece only makes the
//! features depending on it unavailable.

use crate::models::spec::{string_or_number, Aesthetic, ScaleKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResolvedModel {
    #[serde(default)]
    pub layers: Vec<ResolvedLayer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub panel: Option<Panel>,
    #[serde(default)]
    pub scales: Vec<ResolvedScale>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResolvedLayer {
    #[serde(default)]
    pub data: Vec<Datum>,
}

/// One row of computed aesthetics.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Datum {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ymin: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ymax: Option<f64>,
    #[serde(default, alias = "color", skip_serializing_if = "Option::is_none")]
    pub colour: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub shape: Option<String>,
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub linetype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linewidth: Option<f64>,
}

/// Primary panel geometry: axis ranges and rendered tick labels.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Panel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_range: Option<[f64; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_range: Option<[f64; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_labels: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_labels: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedScale {
    pub aesthetic: Aesthetic,
    #[serde(default)]
    pub kind: ScaleKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<String>,
}
