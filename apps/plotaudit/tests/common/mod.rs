//! Shared fixtures: a small resolver that stands in for a plotting frontend.

#![allow(dead_code)]

use plotaudit::models::resolved::{Datum, Panel, ResolvedLayer, ResolvedModel, ResolvedScale};
use plotaudit::models::spec::{Aesthetic, Geom, Scale, Specification};
use plotaudit::{AuditResult, Resolve};

/// Default discrete hue palette for up to three groups.
pub const HUE: [&str; 3] = ["#F8766D", "#00BA38", "#619CFF"];
/// Two-level viridis.
pub const VIRIDIS: [&str; 2] = ["#440154", "#FDE725"];

#[derive(Debug, Clone)]
pub struct Row {
    pub x: f64,
    pub y: f64,
    pub group: Option<&'static str>,
}

pub fn row(x: f64, y: f64, group: Option<&'static str>) -> Row {
    Row { x, y, group }
}

/// Resolves every layer against the same rows, roughly the way a
/// grammar-of-graphics frontend would: bars include zero, explicit limits
/// win, mapped colors come from the scale (manual values, viridis, or the
/// default hue palette).
#[derive(Debug, Clone)]
pub struct FixtureResolver {
    pub rows: Vec<Row>,
}

impl FixtureResolver {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    fn groups(&self) -> Vec<&'static str> {
        let mut out: Vec<&'static str> = Vec::new();
        for g in self.rows.iter().filter_map(|r| r.group) {
            if !out.contains(&g) {
                out.push(g);
            }
        }
        out
    }

    fn palette(spec: &Specification, aes: Aesthetic, n: usize) -> Vec<String> {
        let scale: Option<&Scale> = spec.scales.iter().find(|s| s.aesthetic == aes);
        if let Some(s) = scale {
            if !s.values.is_empty() {
                return s.values.clone();
            }
            if s.palette.as_deref() == Some("viridis") {
                return VIRIDIS.iter().cycle().take(n).map(|c| c.to_string()).collect();
            }
        }
        let hue: Vec<&str> = if n == 2 {
            vec!["#F8766D", "#00BFC4"]
        } else {
            HUE.to_vec()
        };
        hue.iter().cycle().take(n).map(|c| c.to_string()).collect()
    }
}

fn span(values: impl Iterator<Item = f64>) -> Option<[f64; 2]> {
    values.fold(None, |acc, v| match acc {
        None => Some([v, v]),
        Some([lo, hi]) => Some([lo.min(v), hi.max(v)]),
    })
}

impl Resolve for FixtureResolver {
    fn resolve(&self, spec: &Specification) -> AuditResult<ResolvedModel> {
        let groups = self.groups();
        let colour_mapped = spec.mapped(Aesthetic::Colour).is_some();
        let fill_mapped = spec.mapped(Aesthetic::Fill).is_some();
        let colour_pal = Self::palette(spec, Aesthetic::Colour, groups.len().max(1));
        let fill_pal = Self::palette(spec, Aesthetic::Fill, groups.len().max(1));
        let level = |r: &Row| {
            r.group
                .and_then(|g| groups.iter().position(|x| *x == g))
                .unwrap_or(0)
        };

        let layers = spec
            .layers
            .iter()
            .map(|layer| {
                let is_bar = layer.geom == Geom::Bar;
                let data = self
                    .rows
                    .iter()
                    .map(|r| Datum {
                        x: Some(r.x),
                        y: Some(r.y),
                        colour: Some(if colour_mapped {
                            colour_pal[level(r) % colour_pal.len()].clone()
                        } else {
                            layer
                                .params
                                .colour
                                .clone()
                                .unwrap_or_else(|| "black".to_string())
                        }),
                        fill: if fill_mapped {
                            Some(fill_pal[level(r) % fill_pal.len()].clone())
                        } else if is_bar {
                            Some(layer.params.fill.clone().unwrap_or_else(|| "#595959".into()))
                        } else {
                            None
                        },
                        size: layer.params.size,
                        linewidth: layer.params.linewidth,
                        ..Datum::default()
                    })
                    .collect();
                ResolvedLayer { data }
            })
            .collect();

        let mut y_range = span(self.rows.iter().map(|r| r.y));
        if spec.has_geom(&Geom::Bar) {
            y_range = y_range.map(|[lo, hi]| [lo.min(0.0), hi.max(0.0)]);
        }
        if let Some(y) = spec.scales.iter().find(|s| s.aesthetic == Aesthetic::Y) {
            if let (Some([lo, hi]), Some([l, u])) = (y_range, y.limits) {
                y_range = Some([l.unwrap_or(lo), u.unwrap_or(hi)]);
            }
            if y.include_zero {
                y_range = y_range.map(|[lo, hi]| [lo.min(0.0), hi.max(0.0)]);
            }
        }

        let mut x_labels: Vec<String> = Vec::new();
        for r in &self.rows {
            let l = format!("{}", r.x);
            if !x_labels.contains(&l) {
                x_labels.push(l);
            }
        }

        Ok(ResolvedModel {
            layers,
            panel: Some(Panel {
                x_range: span(self.rows.iter().map(|r| r.x)),
                y_range,
                x_labels: Some(x_labels),
                y_labels: None,
            }),
            scales: spec
                .scales
                .iter()
                .filter(|s| matches!(s.aesthetic, Aesthetic::X | Aesthetic::Y))
                .map(|s| ResolvedScale {
                    aesthetic: s.aesthetic,
                    kind: s.kind,
                    transform: s.transform.clone(),
                })
                .collect(),
        })
    }
}

pub fn spec(json: &str) -> Specification {
    serde_json::from_str(json).expect("fixture spec parses")
}

/// Four points on a square-ish panel, two groups.
pub fn grouped_rows() -> Vec<Row> {
    vec![
        row(1.0, 2.0, Some("a")),
        row(2.0, 3.0, Some("b")),
        row(3.0, 1.0, Some("a")),
        row(4.0, 4.0, Some("b")),
    ]
}
