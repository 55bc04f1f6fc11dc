use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ColorFormat {
    #[default]
    Hex,
    Rgb,
    Hsl,
}

impl ColorFormat {
    pub const ALL: [ColorFormat; 3] = [ColorFormat::Hex, ColorFormat::Rgb, ColorFormat::Hsl];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorFormat::Hex => "HEX",
            ColorFormat::Rgb => "RGB",
            ColorFormat::Hsl => "HSL",
        }
    }
}

impl fmt::Display for ColorFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColorFormat::ALL
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown color format '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Hue in whole degrees [0, 360), saturation and lightness in whole percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hsl {
    pub h: u16,
    pub s: u8,
    pub l: u8,
}

/// Decode `#rrggbb` (leading `#` optional, any case) into channels.
pub fn parse_hex_triplet(token: &str) -> Option<Rgb> {
    let hex = token.strip_prefix('#').unwrap_or(token);
    // from_str_radix tolerates a sign, so check the digits ourselves
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Rgb { r, g, b })
}

pub fn is_color_token(token: &str) -> bool {
    parse_hex_triplet(token).is_some()
}

/// Canonical stored form: `#` prefixed, digit case preserved.
pub fn normalize_token(token: &str) -> Option<String> {
    if !is_color_token(token) {
        return None;
    }
    if token.starts_with('#') {
        Some(token.to_string())
    } else {
        Some(format!("#{}", token))
    }
}

/// Token equality ignoring hex digit case and an optional leading `#`.
pub fn same_color(a: &str, b: &str) -> bool {
    let a = a.strip_prefix('#').unwrap_or(a);
    let b = b.strip_prefix('#').unwrap_or(b);
    a.eq_ignore_ascii_case(b)
}

pub fn rgb_to_hsl(r: u8, g: u8, b: u8) -> Hsl {
    let r = r as f64 / 255.0;
    let g = g as f64 / 255.0;
    let b = b as f64 / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    let (h, s);
    if max == min {
        h = 0.0;
        s = 0.0;
    } else {
        let d = max - min;
        s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
        h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        } / 6.0;
    }
    Hsl {
        h: round_half_up(h * 360.0) as u16 % 360,
        s: round_half_up(s * 100.0) as u8,
        l: round_half_up(l * 100.0) as u8,
    }
}

fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Render a color token in the requested notation. Never fails: empty input
/// yields an empty string and unparsable input is echoed back for RGB/HSL.
pub fn format_color(token: &str, format: ColorFormat) -> String {
    if token.is_empty() {
        return String::new();
    }
    match format {
        ColorFormat::Hex => token.to_uppercase(),
        ColorFormat::Rgb => match parse_hex_triplet(token) {
            Some(rgb) => format!("rgb({}, {}, {})", rgb.r, rgb.g, rgb.b),
            None => token.to_string(),
        },
        ColorFormat::Hsl => match parse_hex_triplet(token) {
            Some(rgb) => {
                let hsl = rgb_to_hsl(rgb.r, rgb.g, rgb.b);
                format!("hsl({}°, {}%, {}%)", hsl.h, hsl.s, hsl.l)
            }
            None => token.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_with_and_without_hash() {
        assert_eq!(parse_hex_triplet("#1a2b3c"), Some(Rgb { r: 26, g: 43, b: 60 }));
        assert_eq!(parse_hex_triplet("1A2B3C"), Some(Rgb { r: 26, g: 43, b: 60 }));
        assert_eq!(parse_hex_triplet("#FFffFF"), Some(Rgb { r: 255, g: 255, b: 255 }));
    }

    #[test]
    fn parse_rejects_malformed_tokens() {
        for token in ["", "#", "#fff", "#ff00000", "##ff0000", "#gg0000", "#+f0000", "red", " #ff0000"] {
            assert_eq!(parse_hex_triplet(token), None, "{token:?} should not parse");
        }
    }

    #[test]
    fn decoded_channels_reencode_to_hex_format() {
        for token in ["#000000", "#ffffff", "#1a2b3c", "#AbCdEf", "#7f7f80", "#c0ffee"] {
            let rgb = parse_hex_triplet(token).unwrap();
            let channels: Vec<u8> = (0..3)
                .map(|i| u8::from_str_radix(&token[1 + 2 * i..3 + 2 * i], 16).unwrap())
                .collect();
            assert_eq!(channels, vec![rgb.r, rgb.g, rgb.b]);
            assert_eq!(rgb.to_hex().to_uppercase(), format_color(token, ColorFormat::Hex));
        }
    }

    #[test]
    fn achromatic_has_zero_hue_and_saturation() {
        for v in [0u8, 1, 64, 127, 128, 200, 255] {
            let hsl = rgb_to_hsl(v, v, v);
            assert_eq!((hsl.h, hsl.s), (0, 0));
        }
        assert_eq!(rgb_to_hsl(255, 255, 255).l, 100);
        assert_eq!(rgb_to_hsl(128, 128, 128).l, 50);
    }

    #[test]
    fn primaries() {
        assert_eq!(rgb_to_hsl(255, 0, 0), Hsl { h: 0, s: 100, l: 50 });
        assert_eq!(rgb_to_hsl(0, 255, 0), Hsl { h: 120, s: 100, l: 50 });
        assert_eq!(rgb_to_hsl(0, 0, 255), Hsl { h: 240, s: 100, l: 50 });
        assert_eq!(rgb_to_hsl(0, 128, 0), Hsl { h: 120, s: 100, l: 25 });
    }

    #[test]
    fn magenta_side_wraps_hue() {
        // red max with blue above green takes the +6 branch
        assert_eq!(rgb_to_hsl(255, 0, 255), Hsl { h: 300, s: 100, l: 50 });
        assert_eq!(rgb_to_hsl(255, 0, 128).h, 330);
    }

    #[test]
    fn hue_rounding_to_full_turn_reports_zero() {
        // 359.76 degrees rounds to 360
        assert_eq!(rgb_to_hsl(255, 0, 1).h, 0);
    }

    #[test]
    fn format_rgb_and_hsl() {
        assert_eq!(format_color("#1a2b3c", ColorFormat::Rgb), "rgb(26, 43, 60)");
        assert_eq!(format_color("#ff0000", ColorFormat::Hsl), "hsl(0°, 100%, 50%)");
        assert_eq!(format_color("#1a2b3c", ColorFormat::Hsl), "hsl(210°, 40%, 17%)");
    }

    #[test]
    fn format_hex_upper_cases_without_validation() {
        assert_eq!(format_color("#aabbcc", ColorFormat::Hex), "#AABBCC");
        assert_eq!(format_color("not-a-color", ColorFormat::Hex), "NOT-A-COLOR");
    }

    #[test]
    fn format_unparsable_is_identity() {
        assert_eq!(format_color("#abc", ColorFormat::Rgb), "#abc");
        assert_eq!(format_color("oops", ColorFormat::Hsl), "oops");
    }

    #[test]
    fn format_empty_is_empty() {
        for format in ColorFormat::ALL {
            assert_eq!(format_color("", format), "");
        }
    }

    #[test]
    fn format_names_parse_case_insensitively() {
        assert_eq!("hsl".parse::<ColorFormat>(), Ok(ColorFormat::Hsl));
        assert_eq!("RGB".parse::<ColorFormat>(), Ok(ColorFormat::Rgb));
        assert!("cmyk".parse::<ColorFormat>().is_err());
        assert_eq!(serde_json::to_string(&ColorFormat::Hex).unwrap(), "\"HEX\"");
    }

    #[test]
    fn token_helpers() {
        assert_eq!(normalize_token("aabbcc").as_deref(), Some("#aabbcc"));
        assert_eq!(normalize_token("#AABBCC").as_deref(), Some("#AABBCC"));
        assert_eq!(normalize_token("#aabb"), None);
        assert!(same_color("#AABBCC", "#aabbcc"));
        assert!(same_color("aabbcc", "#AABBCC"));
        assert!(!same_color("#aabbcc", "#aabbcd"));
        assert!(!same_color("##aabbcc", "#aabbcc"));
    }
}
