//! Color parsing, luminance/contrast math, and color-vision-deficiency
//! simulation.
//!
//! Parsing accepts `#RGB`, `#RRGGBB`, `#RRGGBBAA` (alpha ignored), X11/CSS
//! color names and the `grey0`..`grey100` ramp. Luminance follows the WCAG
//! definition. CVD simulation applies a fixed 3x3 matrix per deficiency type
//! in linear RGB; it is an approximation, not a colorimetric model.

use crate::error::{AuditError, ColorParseError};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// 8-bit sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    const fn from_u32(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as u8,
            g: ((hex >> 8) & 0xFF) as u8,
            b: (hex & 0xFF) as u8,
        }
    }

    pub fn channels(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// WCAG relative luminance in `[0, 1]`.
    pub fn relative_luminance(&self) -> f64 {
        let [r, g, b] = self.channels().map(|c| srgb_to_linear(f64::from(c) / 255.0));
        0.2126 * r + 0.7152 * g + 0.0722 * b
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_color(s)
    }
}

fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.03928 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(c: f64) -> f64 {
    let c = c.clamp(0.0, 1.0);
    if c <= 0.03928 / 12.92 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// WCAG contrast ratio between two colors, in `[1, 21]`.
pub fn contrast_ratio(a: Rgb, b: Rgb) -> f64 {
    let la = a.relative_luminance();
    let lb = b.relative_luminance();
    let (hi, lo) = if la >= lb { (la, lb) } else { (lb, la) };
    (hi + 0.05) / (lo + 0.05)
}

/// Values that mean "no color" rather than a malformed one.
pub fn is_missing(value: &str) -> bool {
    let v = value.trim();
    v.is_empty()
        || v.eq_ignore_ascii_case("na")
        || v.eq_ignore_ascii_case("none")
        || v.eq_ignore_ascii_case("transparent")
}

/// Parse a color string into RGB.
pub fn parse_color(value: &str) -> Result<Rgb, ColorParseError> {
    let v = value.trim();
    let err = || ColorParseError(value.to_string());
    if let Some(hex) = v.strip_prefix('#') {
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }
        return match hex.len() {
            3 => {
                let n = u32::from_str_radix(hex, 16).map_err(|_| err())?;
                let expand = |d: u32| (d * 17) as u8;
                Ok(Rgb::new(
                    expand((n >> 8) & 0xF),
                    expand((n >> 4) & 0xF),
                    expand(n & 0xF),
                ))
            }
            6 => Ok(Rgb::from_u32(
                u32::from_str_radix(hex, 16).map_err(|_| err())?,
            )),
            8 => Ok(Rgb::from_u32(
                u32::from_str_radix(&hex[..6], 16).map_err(|_| err())?,
            )),
            _ => Err(err()),
        };
    }
    let name: String = v
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();
    if let Some(level) = name
        .strip_prefix("grey")
        .or_else(|| name.strip_prefix("gray"))
        .filter(|rest| !rest.is_empty())
    {
        let n: u32 = level.parse().map_err(|_| err())?;
        if n > 100 {
            return Err(err());
        }
        let c = ((f64::from(n) * 255.0 / 100.0).round()) as u8;
        return Ok(Rgb::new(c, c, c));
    }
    NAMED_COLORS
        .binary_search_by(|(n, _)| n.cmp(&name.as_str()))
        .map(|i| Rgb::from_u32(NAMED_COLORS[i].1))
        .map_err(|_| err())
}

/// Dominant-hue signal used by the red-green conflict heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HueSignal {
    Red,
    Green,
}

/// Classify a color string as red- or green-dominant.
///
/// Names containing `red` or `green` count directly. Anything else that
/// parses counts when its red or green byte is the unique maximum, so
/// `lime`, `crimson` and `#F8766D` are classified like their hex values.
pub fn hue_signal(value: &str) -> Option<HueSignal> {
    let name = value.trim().to_ascii_lowercase();
    if !name.starts_with('#') {
        if name.contains("red") {
            return Some(HueSignal::Red);
        }
        if name.contains("green") {
            return Some(HueSignal::Green);
        }
    }
    let c = parse_color(&name).ok()?;
    if c.r > c.g && c.r > c.b {
        Some(HueSignal::Red)
    } else if c.g > c.r && c.g > c.b {
        Some(HueSignal::Green)
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CvdType {
    Deutan,
    Protan,
    Tritan,
}

impl CvdType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CvdType::Deutan => "deutan",
            CvdType::Protan => "protan",
            CvdType::Tritan => "tritan",
        }
    }

    /// Full-severity transform in linear RGB (Machado et al. 2009).
    fn matrix(&self) -> [[f64; 3]; 3] {
        match self {
            CvdType::Deutan => [
                [0.367322, 0.860646, -0.227968],
                [0.280085, 0.672501, 0.047413],
                [-0.011820, 0.042940, 0.968881],
            ],
            CvdType::Protan => [
                [0.152286, 1.052583, -0.204868],
                [0.114503, 0.786281, 0.099216],
                [-0.003882, -0.048116, 1.051998],
            ],
            CvdType::Tritan => [
                [1.255528, -0.076749, -0.178779],
                [-0.078411, 0.930809, 0.147602],
                [0.004733, 0.691367, 0.303900],
            ],
        }
    }

    /// Simulate how `color` appears; `severity` in `[0, 1]` blends from
    /// identity to the full transform.
    pub fn simulate(&self, color: Rgb, severity: f64) -> Rgb {
        let s = severity.clamp(0.0, 1.0);
        let m = self.matrix();
        let lin = color.channels().map(|c| srgb_to_linear(f64::from(c) / 255.0));
        let mut out = [0u8; 3];
        for (i, row) in m.iter().enumerate() {
            let full: f64 = row.iter().zip(lin.iter()).map(|(w, c)| w * c).sum();
            let blended = (1.0 - s) * lin[i] + s * full;
            out[i] = (linear_to_srgb(blended) * 255.0).round() as u8;
        }
        Rgb::new(out[0], out[1], out[2])
    }
}

impl fmt::Display for CvdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CvdType {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "deutan" | "deuteranopia" => Ok(CvdType::Deutan),
            "protan" | "protanopia" => Ok(CvdType::Protan),
            "tritan" | "tritanopia" => Ok(CvdType::Tritan),
            _ => Err(AuditError::InvalidCvdType(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Simulated {
    pub kind: CvdType,
    pub rgb: Rgb,
}

/// A parsed color plus, optionally, how it looks under a deficiency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorSample {
    pub input: String,
    pub rgb: Rgb,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simulated: Option<Simulated>,
}

/// Standalone simulation over a list of color strings.
///
/// Each input yields either a sample or the parse error for that value.
pub fn simulate_colors<S: AsRef<str>>(
    colors: &[S],
    kind: CvdType,
    severity: f64,
) -> Vec<Result<ColorSample, ColorParseError>> {
    colors
        .iter()
        .map(|c| {
            let input = c.as_ref();
            let rgb = parse_color(input)?;
            Ok(ColorSample {
                input: input.to_string(),
                rgb,
                simulated: Some(Simulated {
                    kind,
                    rgb: kind.simulate(rgb, severity),
                }),
            })
        })
        .collect()
}

/// Sorted by name for binary search. Where CSS and X11 disagree the X11
/// value wins (`gray`, `green`, `maroon`, `purple`).
static NAMED_COLORS: &[(&str, u32)] = &[
    ("aliceblue", 0xF0F8FF),
    ("antiquewhite", 0xFAEBD7),
    ("aqua", 0x00FFFF),
    ("aquamarine", 0x7FFFD4),
    ("azure", 0xF0FFFF),
    ("beige", 0xF5F5DC),
    ("bisque", 0xFFE4C4),
    ("black", 0x000000),
    ("blanchedalmond", 0xFFEBCD),
    ("blue", 0x0000FF),
    ("blueviolet", 0x8A2BE2),
    ("brown", 0xA52A2A),
    ("burlywood", 0xDEB887),
    ("cadetblue", 0x5F9EA0),
    ("chartreuse", 0x7FFF00),
    ("chocolate", 0xD2691E),
    ("coral", 0xFF7F50),
    ("cornflowerblue", 0x6495ED),
    ("cornsilk", 0xFFF8DC),
    ("crimson", 0xDC143C),
    ("cyan", 0x00FFFF),
    ("darkblue", 0x00008B),
    ("darkcyan", 0x008B8B),
    ("darkgoldenrod", 0xB8860B),
    ("darkgray", 0xA9A9A9),
    ("darkgreen", 0x006400),
    ("darkgrey", 0xA9A9A9),
    ("darkkhaki", 0xBDB76B),
    ("darkmagenta", 0x8B008B),
    ("darkolivegreen", 0x556B2F),
    ("darkorange", 0xFF8C00),
    ("darkorchid", 0x9932CC),
    ("darkred", 0x8B0000),
    ("darksalmon", 0xE9967A),
    ("darkseagreen", 0x8FBC8F),
    ("darkslateblue", 0x483D8B),
    ("darkslategray", 0x2F4F4F),
    ("darkslategrey", 0x2F4F4F),
    ("darkturquoise", 0x00CED1),
    ("darkviolet", 0x9400D3),
    ("deeppink", 0xFF1493),
    ("deepskyblue", 0x00BFFF),
    ("dimgray", 0x696969),
    ("dimgrey", 0x696969),
    ("dodgerblue", 0x1E90FF),
    ("firebrick", 0xB22222),
    ("floralwhite", 0xFFFAF0),
    ("forestgreen", 0x228B22),
    ("fuchsia", 0xFF00FF),
    ("gainsboro", 0xDCDCDC),
    ("ghostwhite", 0xF8F8FF),
    ("gold", 0xFFD700),
    ("goldenrod", 0xDAA520),
    ("gray", 0xBEBEBE),
    ("green", 0x00FF00),
    ("greenyellow", 0xADFF2F),
    ("grey", 0xBEBEBE),
    ("honeydew", 0xF0FFF0),
    ("hotpink", 0xFF69B4),
    ("indianred", 0xCD5C5C),
    ("indigo", 0x4B0082),
    ("ivory", 0xFFFFF0),
    ("khaki", 0xF0E68C),
    ("lavender", 0xE6E6FA),
    ("lavenderblush", 0xFFF0F5),
    ("lawngreen", 0x7CFC00),
    ("lemonchiffon", 0xFFFACD),
    ("lightblue", 0xADD8E6),
    ("lightcoral", 0xF08080),
    ("lightcyan", 0xE0FFFF),
    ("lightgoldenrodyellow", 0xFAFAD2),
    ("lightgray", 0xD3D3D3),
    ("lightgreen", 0x90EE90),
    ("lightgrey", 0xD3D3D3),
    ("lightpink", 0xFFB6C1),
    ("lightsalmon", 0xFFA07A),
    ("lightseagreen", 0x20B2AA),
    ("lightskyblue", 0x87CEFA),
    ("lightslategray", 0x778899),
    ("lightslategrey", 0x778899),
    ("lightsteelblue", 0xB0C4DE),
    ("lightyellow", 0xFFFFE0),
    ("lime", 0x00FF00),
    ("limegreen", 0x32CD32),
    ("linen", 0xFAF0E6),
    ("magenta", 0xFF00FF),
    ("maroon", 0xB03060),
    ("mediumaquamarine", 0x66CDAA),
    ("mediumblue", 0x0000CD),
    ("mediumorchid", 0xBA55D3),
    ("mediumpurple", 0x9370DB),
    ("mediumseagreen", 0x3CB371),
    ("mediumslateblue", 0x7B68EE),
    ("mediumspringgreen", 0x00FA9A),
    ("mediumturquoise", 0x48D1CC),
    ("mediumvioletred", 0xC71585),
    ("midnightblue", 0x191970),
    ("mintcream", 0xF5FFFA),
    ("mistyrose", 0xFFE4E1),
    ("moccasin", 0xFFE4B5),
    ("navajowhite", 0xFFDEAD),
    ("navy", 0x000080),
    ("navyblue", 0x000080),
    ("oldlace", 0xFDF5E6),
    ("olive", 0x808000),
    ("olivedrab", 0x6B8E23),
    ("orange", 0xFFA500),
    ("orangered", 0xFF4500),
    ("orchid", 0xDA70D6),
    ("palegoldenrod", 0xEEE8AA),
    ("palegreen", 0x98FB98),
    ("paleturquoise", 0xAFEEEE),
    ("palevioletred", 0xDB7093),
    ("papayawhip", 0xFFEFD5),
    ("peachpuff", 0xFFDAB9),
    ("peru", 0xCD853F),
    ("pink", 0xFFC0CB),
    ("plum", 0xDDA0DD),
    ("powderblue", 0xB0E0E6),
    ("purple", 0xA020F0),
    ("rebeccapurple", 0x663399),
    ("red", 0xFF0000),
    ("rosybrown", 0xBC8F8F),
    ("royalblue", 0x4169E1),
    ("saddlebrown", 0x8B4513),
    ("salmon", 0xFA8072),
    ("sandybrown", 0xF4A460),
    ("seagreen", 0x2E8B57),
    ("seashell", 0xFFF5EE),
    ("sienna", 0xA0522D),
    ("silver", 0xC0C0C0),
    ("skyblue", 0x87CEEB),
    ("slateblue", 0x6A5ACD),
    ("slategray", 0x708090),
    ("slategrey", 0x708090),
    ("snow", 0xFFFAFA),
    ("springgreen", 0x00FF7F),
    ("steelblue", 0x4682B4),
    ("tan", 0xD2B48C),
    ("teal", 0x008080),
    ("thistle", 0xD8BFD8),
    ("tomato", 0xFF6347),
    ("turquoise", 0x40E0D0),
    ("violet", 0xEE82EE),
    ("violetred", 0xD02090),
    ("wheat", 0xF5DEB3),
    ("white", 0xFFFFFF),
    ("whitesmoke", 0xF5F5F5),
    ("yellow", 0xFFFF00),
    ("yellowgreen", 0x9ACD32),
];
