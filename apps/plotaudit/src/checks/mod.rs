//! The five check modules and their shared thresholds.
//!
//! Every check is a pure function `(&Features, &Thresholds) -> CheckResult`.
//! `run` maps a category to its check so callers never look checks up by
//! name.

pub mod accessibility;
pub mod color;
pub mod labels;
pub mod scales;
pub mod text;

use crate::features::Features;
use crate::models::{Category, CheckResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Numeric limits used by the checks. Overridable under `[thresholds]` in
/// the config file.
pub struct Thresholds {
    pub max_colors: usize,
    /// Minimum number of colors before the uniformity heuristic applies.
    pub uniformity_min_colors: usize,
    pub uniformity_std_dev: f64,
    pub min_contrast: f64,
    pub truncation_factor: f64,
    pub aspect_min: f64,
    pub aspect_max: f64,
    pub min_axis_text: f64,
    pub recommended_axis_text: f64,
    pub min_title_text: f64,
    pub max_tick_labels: usize,
    pub max_tick_label_len: usize,
    pub min_point_size: f64,
    pub recommended_point_size: f64,
    pub min_line_width: f64,
    pub recommended_line_width: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            max_colors: 7,
            uniformity_min_colors: 6,
            uniformity_std_dev: 100.0,
            min_contrast: 3.0,
            truncation_factor: 1.5,
            aspect_min: 0.33,
            aspect_max: 3.0,
            min_axis_text: 8.0,
            recommended_axis_text: 10.0,
            min_title_text: 11.0,
            max_tick_labels: 15,
            max_tick_label_len: 20,
            min_point_size: 2.0,
            recommended_point_size: 3.0,
            min_line_width: 0.5,
            recommended_line_width: 1.0,
        }
    }
}

/// Run the check for `category`.
pub fn run(category: Category, features: &Features, thresholds: &Thresholds) -> CheckResult {
    match category {
        Category::Color => color::check(features, thresholds),
        Category::Scales => scales::check(features, thresholds),
        Category::Text => text::check(features, thresholds),
        Category::Accessibility => accessibility::check(features, thresholds),
        Category::Labels => labels::check(features, thresholds),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::features::{Features, Grouping, LayerFeature};
    use crate::models::spec::{Geom, Labels};

    /// Features of a plain, defect-free single-layer point plot.
    pub fn clean() -> Features {
        Features {
            colors: vec!["#000000".into()],
            layers: vec![LayerFeature {
                index: 1,
                geom: Geom::Point,
                size: None,
                linewidth: None,
            }],
            x_range: Some([0.0, 10.0]),
            y_range: Some([0.0, 10.0]),
            y_data_range: Some([0.0, 10.0]),
            x_tick_count: Some(5),
            tick_label_lengths: Some(vec![1, 1, 1, 1, 2]),
            axis_text_size: 10.0,
            title_size: 14.0,
            panel_background: Some("grey92".into()),
            labels: Labels {
                title: Some("Fuel economy by weight".into()),
                x: Some("Weight (1000 lbs)".into()),
                y: Some("Miles per gallon".into()),
                ..Labels::default()
            },
            scales: vec![],
            grouping: Grouping::default(),
            colour_legend: false,
            fill_legend: false,
        }
    }
}
