//! Whole-specification CVD simulation.
//!
//! Rewrites every color the specification controls (fixed layer colors,
//! manual scale values, and the resolved colors of mapped aesthetics) as it
//! would appear under a deficiency. Values that cannot be parsed are kept
//! as-is and reported.

use crate::color::{is_missing, parse_color, CvdType};
use crate::error::AuditResult;
use crate::models::finding::Finding;
use crate::models::resolved::{Datum, ResolvedModel};
use crate::models::spec::{Aesthetic, ScaleKind, Specification};
use serde::Serialize;
use std::collections::HashSet;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Simulation {
    pub kind: CvdType,
    pub spec: Specification,
    /// One `COLOR_UNPARSEABLE` finding per value left untouched.
    pub degraded: Vec<Finding>,
}

struct Simulator {
    kind: CvdType,
    degraded: Vec<Finding>,
}

impl Simulator {
    fn convert(&mut self, value: &str) -> String {
        if is_missing(value) {
            return value.to_string();
        }
        match parse_color(value) {
            Ok(rgb) => self.kind.simulate(rgb, 1.0).to_hex(),
            Err(err) => {
                warn!(error = %err, kind = %self.kind, "color left unsimulated");
                let finding = Finding::UnparseableColor {
                    value: value.to_string(),
                };
                if !self.degraded.contains(&finding) {
                    self.degraded.push(finding);
                }
                value.to_string()
            }
        }
    }

    fn convert_opt(&mut self, value: &mut Option<String>) {
        if let Some(v) = value.as_mut() {
            *v = self.convert(v);
        }
    }
}

/// Simulate `kind` at full severity over every color of `spec`.
pub fn simulate_cvd(
    spec: &Specification,
    resolved: &ResolvedModel,
    kind: CvdType,
) -> AuditResult<Simulation> {
    spec.validate()?;
    let mut sim = Simulator {
        kind,
        degraded: Vec::new(),
    };
    let mut out = spec.clone();

    for layer in out.layers.iter_mut() {
        sim.convert_opt(&mut layer.params.colour);
        sim.convert_opt(&mut layer.params.fill);
    }
    for scale in out.scales.iter_mut() {
        for v in scale.values.iter_mut() {
            *v = sim.convert(v);
        }
    }

    // mapped aesthetics without manual values get one from the resolved data
    for (aes, pick) in [
        (Aesthetic::Colour, colour_of as fn(&Datum) -> Option<&str>),
        (Aesthetic::Fill, fill_of),
    ] {
        if out.mapped(aes).is_none() {
            continue;
        }
        let has_values = out
            .scales
            .iter()
            .any(|s| s.aesthetic == aes && !s.values.is_empty());
        if has_values {
            continue;
        }
        let levels = distinct(resolved, pick);
        if levels.is_empty() {
            continue;
        }
        let values: Vec<String> = levels.iter().map(|c| sim.convert(c)).collect();
        let scale = out.scale_mut(aes, ScaleKind::Discrete);
        scale.palette = None;
        scale.values = values;
    }

    Ok(Simulation {
        kind,
        spec: out,
        degraded: sim.degraded,
    })
}

fn colour_of(d: &Datum) -> Option<&str> {
    d.colour.as_deref()
}

fn fill_of(d: &Datum) -> Option<&str> {
    d.fill.as_deref()
}

fn distinct(resolved: &ResolvedModel, pick: fn(&Datum) -> Option<&str>) -> Vec<String> {
    let mut seen = HashSet::new();
    resolved
        .layers
        .iter()
        .flat_map(|l| l.data.iter())
        .filter_map(pick)
        .map(str::trim)
        .filter(|c| !is_missing(c) && seen.insert(*c))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resolved::ResolvedLayer;

    fn spec(json: &str) -> Specification {
        serde_json::from_str(json).unwrap()
    }

    fn datum(colour: &str) -> Datum {
        Datum {
            colour: Some(colour.into()),
            ..Datum::default()
        }
    }

    #[test]
    fn test_fixed_colors_are_simulated() {
        let s = spec(r#"{"layers": [{"geom": "line", "params": {"colour": "red", "fill": "NA"}}]}"#);
        let out = simulate_cvd(&s, &ResolvedModel::default(), CvdType::Deutan).unwrap();
        let colour = out.spec.layers[0].params.colour.clone().unwrap();
        assert!(colour.starts_with('#'));
        assert_ne!(colour, "#FF0000");
        assert_eq!(out.spec.layers[0].params.fill.as_deref(), Some("NA"));
        assert!(out.degraded.is_empty());
        // input untouched
        assert_eq!(s.layers[0].params.colour.as_deref(), Some("red"));
    }

    #[test]
    fn test_mapped_colour_gets_manual_scale() {
        let s = spec(r#"{"layers": [{"geom": "point"}], "mapping": {"colour": "grp"}}"#);
        let resolved = ResolvedModel {
            layers: vec![ResolvedLayer {
                data: vec![datum("#F8766D"), datum("#00BA38"), datum("#F8766D")],
            }],
            ..ResolvedModel::default()
        };
        let out = simulate_cvd(&s, &resolved, CvdType::Protan).unwrap();
        let scale = &out.spec.scales[0];
        assert_eq!(scale.aesthetic, Aesthetic::Colour);
        assert_eq!(scale.values.len(), 2);
    }

    #[test]
    fn test_unparseable_values_degrade() {
        let s = spec(
            r#"{"layers": [{"geom": "point"}],
                "scales": [{"aesthetic": "colour", "kind": "discrete", "values": ["blue", "notacolor", "notacolor"]}]}"#,
        );
        let out = simulate_cvd(&s, &ResolvedModel::default(), CvdType::Tritan).unwrap();
        assert_eq!(out.spec.scales[0].values[1], "notacolor");
        assert_eq!(
            out.degraded,
            vec![Finding::UnparseableColor {
                value: "notacolor".into()
            }]
        );
    }
}
