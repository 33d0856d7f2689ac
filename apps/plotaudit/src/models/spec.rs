//! Declarative plot specification supplied by the caller.
//!
//! The tree mirrors a grammar-of-graphics description:
//! - `layers`: one entry per geometry with its own mapping and fixed parameters.
//! - `mapping`: global aesthetic mapping inherited by every layer.
//! - `scales`: explicit scale descriptors (transform, limits, palette).
//! - `theme`: text sizes and panel background.
//! - `labels`: title, subtitle, caption and per-aesthetic labels.
//!
//! The engine never mutates a `Specification`; fixes and simulations clone it.

use crate::error::{AuditError, AuditResult};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Aesthetic channel name -> mapped variable expression (e.g. `"factor(cyl)"`).
pub type Mapping = BTreeMap<Aesthetic, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aesthetic {
    X,
    Y,
    #[serde(alias = "color")]
    Colour,
    Fill,
    Shape,
    Size,
    Linetype,
    Linewidth,
    Alpha,
    Group,
}

impl Aesthetic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Aesthetic::X => "x",
            Aesthetic::Y => "y",
            Aesthetic::Colour => "colour",
            Aesthetic::Fill => "fill",
            Aesthetic::Shape => "shape",
            Aesthetic::Size => "size",
            Aesthetic::Linetype => "linetype",
            Aesthetic::Linewidth => "linewidth",
            Aesthetic::Alpha => "alpha",
            Aesthetic::Group => "group",
        }
    }
}

impl fmt::Display for Aesthetic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed set of geometry kinds the checks branch on.
///
/// Tags are normalized on load; anything unrecognized is kept verbatim in
/// `Other` so reports can still name it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Geom {
    Point,
    Line,
    Bar,
    Other(String),
}

impl Geom {
    pub fn tag(&self) -> &str {
        match self {
            Geom::Point => "point",
            Geom::Line => "line",
            Geom::Bar => "bar",
            Geom::Other(tag) => tag.as_str(),
        }
    }
}

impl From<String> for Geom {
    fn from(raw: String) -> Self {
        let tag = raw.trim().to_ascii_lowercase();
        let tag = tag.strip_prefix("geom_").unwrap_or(&tag);
        match tag {
            "point" | "jitter" | "scatter" | "count" => Geom::Point,
            "line" | "path" | "step" => Geom::Line,
            "bar" | "col" | "column" | "histogram" => Geom::Bar,
            other => Geom::Other(other.to_string()),
        }
    }
}

impl From<Geom> for String {
    fn from(g: Geom) -> Self {
        g.tag().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
/// Fixed (non-mapped) aesthetic values set directly on a layer.
pub struct AesParams {
    #[serde(default, alias = "color", skip_serializing_if = "Option::is_none")]
    pub colour: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(default, alias = "width", skip_serializing_if = "Option::is_none")]
    pub linewidth: Option<f64>,
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
    pub alpha: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub geom: Geom,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub mapping: Mapping,
    #[serde(default)]
    pub params: AesParams,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleKind {
    #[default]
    Continuous,
    Discrete,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    pub aesthetic: Aesthetic,
    #[serde(default)]
    pub kind: ScaleKind,
    /// Transform name, e.g. `log10`, `log2`, `sqrt`, `identity`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<String>,
    /// Explicit `[lower, upper]`; either bound may be null to keep the default.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "limits")]
    pub limits: Option<[Option<f64>; 2]>,
    /// Named palette such as `viridis`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub palette: Option<String>,
    /// Manual color values, in level order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
    /// Force the range to contain zero.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub include_zero: bool,
}

impl Scale {
    pub fn new(aesthetic: Aesthetic, kind: ScaleKind) -> Self {
        Self {
            aesthetic,
            kind,
            transform: None,
            limits: None,
            palette: None,
            values: Vec::new(),
            include_zero: false,
        }
    }
}

fn default_base_size() -> f64 {
    11.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default = "default_base_size")]
    pub base_size: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis_text_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub panel_background: Option<String>,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            base_size: default_base_size(),
            axis_text_size: None,
            title_size: None,
            panel_background: None,
        }
    }
}

impl Theme {
    /// Axis tick text size after applying the base-size fallback.
    pub fn effective_axis_text_size(&self) -> f64 {
        self.axis_text_size.unwrap_or(self.base_size * 0.8)
    }

    pub fn effective_title_size(&self) -> f64 {
        self.title_size.unwrap_or(self.base_size * 1.2)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Labels {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,
    #[serde(default, alias = "color", skip_serializing_if = "Option::is_none")]
    pub colour: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

/// Role a label plays on the rendered chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelRole {
    X,
    Y,
    Colour,
    Fill,
    Shape,
    Size,
    Title,
    Subtitle,
    Caption,
}

impl LabelRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            LabelRole::X => "x",
            LabelRole::Y => "y",
            LabelRole::Colour => "colour",
            LabelRole::Fill => "fill",
            LabelRole::Shape => "shape",
            LabelRole::Size => "size",
            LabelRole::Title => "title",
            LabelRole::Subtitle => "subtitle",
            LabelRole::Caption => "caption",
        }
    }

    /// Aesthetic whose mapping supplies the default label, if any.
    pub fn aesthetic(&self) -> Option<Aesthetic> {
        match self {
            LabelRole::X => Some(Aesthetic::X),
            LabelRole::Y => Some(Aesthetic::Y),
            LabelRole::Colour => Some(Aesthetic::Colour),
            LabelRole::Fill => Some(Aesthetic::Fill),
            LabelRole::Shape => Some(Aesthetic::Shape),
            LabelRole::Size => Some(Aesthetic::Size),
            LabelRole::Title | LabelRole::Subtitle | LabelRole::Caption => None,
        }
    }
}

impl fmt::Display for LabelRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Labels {
    pub fn get(&self, role: LabelRole) -> Option<&str> {
        let v = match role {
            LabelRole::X => &self.x,
            LabelRole::Y => &self.y,
            LabelRole::Colour => &self.colour,
            LabelRole::Fill => &self.fill,
            LabelRole::Shape => &self.shape,
            LabelRole::Size => &self.size,
            LabelRole::Title => &self.title,
            LabelRole::Subtitle => &self.subtitle,
            LabelRole::Caption => &self.caption,
        };
        v.as_deref()
    }

    pub fn set(&mut self, role: LabelRole, value: String) {
        let slot = match role {
            LabelRole::X => &mut self.x,
            LabelRole::Y => &mut self.y,
            LabelRole::Colour => &mut self.colour,
            LabelRole::Fill => &mut self.fill,
            LabelRole::Shape => &mut self.shape,
            LabelRole::Size => &mut self.size,
            LabelRole::Title => &mut self.title,
            LabelRole::Subtitle => &mut self.subtitle,
            LabelRole::Caption => &mut self.caption,
        };
        *slot = Some(value);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Root of the declarative chart description.
pub struct Specification {
    pub layers: Vec<Layer>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub mapping: Mapping,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scales: Vec<Scale>,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub labels: Labels,
}

impl Specification {
    /// Capability check run before any audit work.
    pub fn validate(&self) -> AuditResult<()> {
        if self.layers.is_empty() {
            return Err(AuditError::InvalidInput(
                "specification has no layers".to_string(),
            ));
        }
        if !(self.theme.base_size.is_finite() && self.theme.base_size > 0.0) {
            return Err(AuditError::InvalidInput(format!(
                "theme base_size must be a positive number, got {}",
                self.theme.base_size
            )));
        }
        Ok(())
    }

    /// Expression mapped to `aes`, looking at the global mapping first and
    /// then at the first layer that maps it.
    pub fn mapped(&self, aes: Aesthetic) -> Option<&str> {
        self.mapping
            .get(&aes)
            .or_else(|| self.layers.iter().find_map(|l| l.mapping.get(&aes)))
            .map(String::as_str)
    }

    /// Label shown for `role`: explicit label first, mapping expression otherwise.
    pub fn effective_label(&self, role: LabelRole) -> Option<&str> {
        self.labels
            .get(role)
            .or_else(|| role.aesthetic().and_then(|aes| self.mapped(aes)))
    }

    pub fn geoms(&self) -> impl Iterator<Item = &Geom> {
        self.layers.iter().map(|l| &l.geom)
    }

    pub fn has_geom(&self, geom: &Geom) -> bool {
        self.geoms().any(|g| g == geom)
    }

    /// Scale for `aes`, inserting a default one of `kind` when absent.
    pub fn scale_mut(&mut self, aes: Aesthetic, kind: ScaleKind) -> &mut Scale {
        let idx = match self.scales.iter().position(|s| s.aesthetic == aes) {
            Some(i) => i,
            None => {
                self.scales.push(Scale::new(aes, kind));
                self.scales.len() - 1
            }
        };
        &mut self.scales[idx]
    }
}

/// Accept either a string or a number (shape codes are often numeric).
pub(crate) fn string_or_number<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }
    Ok(Option::<Raw>::deserialize(de)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Int(i) => i.to_string(),
        Raw::Float(f) => f.to_string(),
    }))
}

/// Scale limits on the wire.
///
/// Reads `[lower, upper]` (bounds may be null) or `{ lower, upper }`. A
/// half-open range is written as the table form with the missing bound left
/// out, which TOML can hold.
mod limits {
    use super::*;
    use serde::Serializer;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Pair([Option<f64>; 2]),
        Bounds {
            #[serde(default)]
            lower: Option<f64>,
            #[serde(default)]
            upper: Option<f64>,
        },
    }

    #[derive(Serialize)]
    struct Bounds {
        #[serde(skip_serializing_if = "Option::is_none")]
        lower: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        upper: Option<f64>,
    }

    pub fn serialize<S>(value: &Option<[Option<f64>; 2]>, ser: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some([Some(lower), Some(upper)]) => [*lower, *upper].serialize(ser),
            Some([lower, upper]) => Bounds {
                lower: *lower,
                upper: *upper,
            }
            .serialize(ser),
            None => ser.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(de: D) -> Result<Option<[Option<f64>; 2]>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<Raw>::deserialize(de)?.map(|raw| match raw {
            Raw::Pair(pair) => pair,
            Raw::Bounds { lower, upper } => [lower, upper],
        }))
    }
}
