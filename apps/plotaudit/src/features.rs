//! Feature extraction from a specification and its resolved rendering model.
//!
//! Produces a flat `Features` value the check modules read from. Anything the
//! resolved model does not carry is `None`, and the checks depending on it
//! are skipped.

use crate::color;
use crate::models::resolved::{Datum, ResolvedModel, ResolvedScale};
use crate::models::spec::{Aesthetic, Geom, LabelRole, Labels, Specification};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq)]
pub struct LayerFeature {
    /// 1-based position in the specification.
    pub index: usize,
    pub geom: Geom,
    pub size: Option<f64>,
    pub linewidth: Option<f64>,
}

/// Which channels vary inside at least one layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Grouping {
    pub colour: bool,
    pub shape: bool,
    pub linetype: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Features {
    /// Distinct non-missing colors (stroke then fill), first-seen order.
    pub colors: Vec<String>,
    pub layers: Vec<LayerFeature>,
    pub x_range: Option<[f64; 2]>,
    pub y_range: Option<[f64; 2]>,
    /// Min/max over resolved `y`, `ymin`, `ymax`.
    pub y_data_range: Option<[f64; 2]>,
    pub x_tick_count: Option<usize>,
    /// Character lengths of all resolved tick labels (x then y).
    pub tick_label_lengths: Option<Vec<usize>>,
    pub axis_text_size: f64,
    pub title_size: f64,
    pub panel_background: Option<String>,
    /// Effective labels: explicit value or the mapped expression.
    pub labels: Labels,
    pub scales: Vec<ResolvedScale>,
    pub grouping: Grouping,
    pub colour_legend: bool,
    pub fill_legend: bool,
}

impl Features {
    pub fn has_geom(&self, geom: &Geom) -> bool {
        self.layers.iter().any(|l| &l.geom == geom)
    }

    pub fn geom_tags(&self) -> Vec<String> {
        self.layers.iter().map(|l| l.geom.tag().to_string()).collect()
    }
}

/// Extract every feature the checks need.
pub fn extract(spec: &Specification, resolved: &ResolvedModel) -> Features {
    let panel = resolved.panel.as_ref();
    let x_labels = panel.and_then(|p| p.x_labels.as_ref());
    let y_labels = panel.and_then(|p| p.y_labels.as_ref());
    let tick_label_lengths = match (x_labels, y_labels) {
        (None, None) => None,
        (x, y) => Some(
            x.into_iter()
                .chain(y)
                .flatten()
                .map(|l| l.chars().count())
                .collect(),
        ),
    };

    let layers = spec
        .layers
        .iter()
        .enumerate()
        .map(|(i, l)| LayerFeature {
            index: i + 1,
            geom: l.geom.clone(),
            size: l.params.size,
            linewidth: l.params.linewidth,
        })
        .collect();

    let mut labels = Labels::default();
    for role in [
        LabelRole::Title,
        LabelRole::Subtitle,
        LabelRole::Caption,
        LabelRole::X,
        LabelRole::Y,
        LabelRole::Colour,
        LabelRole::Fill,
        LabelRole::Shape,
        LabelRole::Size,
    ] {
        if let Some(v) = spec.effective_label(role) {
            labels.set(role, v.to_string());
        }
    }

    Features {
        colors: sample_colors(resolved),
        layers,
        x_range: panel.and_then(|p| p.x_range),
        y_range: panel.and_then(|p| p.y_range),
        y_data_range: y_data_range(resolved),
        x_tick_count: x_labels.map(Vec::len),
        tick_label_lengths,
        axis_text_size: spec.theme.effective_axis_text_size(),
        title_size: spec.theme.effective_title_size(),
        panel_background: spec.theme.panel_background.clone(),
        labels,
        scales: resolved.scales.clone(),
        grouping: grouping(resolved),
        colour_legend: spec.mapped(Aesthetic::Colour).is_some(),
        fill_legend: spec.mapped(Aesthetic::Fill).is_some(),
    }
}

/// Distinct non-missing colors across all layers: stroke and fill,
/// deduplicated, in first-seen order.
pub fn sample_colors(resolved: &ResolvedModel) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::new();
    for d in resolved.layers.iter().flat_map(|l| l.data.iter()) {
        for c in [d.colour.as_deref(), d.fill.as_deref()].into_iter().flatten() {
            let c = c.trim();
            if !color::is_missing(c) && seen.insert(c) {
                out.push(c.to_string());
            }
        }
    }
    out
}

fn y_data_range(resolved: &ResolvedModel) -> Option<[f64; 2]> {
    resolved
        .layers
        .iter()
        .flat_map(|l| l.data.iter())
        .flat_map(|d| [d.y, d.ymin, d.ymax])
        .flatten()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some([v, v]),
            Some([lo, hi]) => Some([lo.min(v), hi.max(v)]),
        })
}

fn varies(data: &[Datum], pick: fn(&Datum) -> Option<&str>) -> bool {
    data.iter()
        .filter_map(pick)
        .filter(|v| !color::is_missing(v))
        .collect::<HashSet<_>>()
        .len()
        > 1
}

fn grouping(resolved: &ResolvedModel) -> Grouping {
    let mut g = Grouping::default();
    for layer in &resolved.layers {
        g.colour |= varies(&layer.data, |d| d.colour.as_deref())
            || varies(&layer.data, |d| d.fill.as_deref());
        g.shape |= varies(&layer.data, |d| d.shape.as_deref());
        g.linetype |= varies(&layer.data, |d| d.linetype.as_deref());
    }
    g
}
