//! CSS color parsing and linear RGBA mixing for gradients

/// An RGBA color with 0-255 channels and 0-1 alpha
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

const NAMED_COLORS: &[(&str, (u8, u8, u8))] = &[
    ("black", (0, 0, 0)),
    ("silver", (192, 192, 192)),
    ("gray", (128, 128, 128)),
    ("grey", (128, 128, 128)),
    ("white", (255, 255, 255)),
    ("maroon", (128, 0, 0)),
    ("red", (255, 0, 0)),
    ("purple", (128, 0, 128)),
    ("fuchsia", (255, 0, 255)),
    ("magenta", (255, 0, 255)),
    ("green", (0, 128, 0)),
    ("lime", (0, 255, 0)),
    ("olive", (128, 128, 0)),
    ("yellow", (255, 255, 0)),
    ("navy", (0, 0, 128)),
    ("blue", (0, 0, 255)),
    ("teal", (0, 128, 128)),
    ("aqua", (0, 255, 255)),
    ("cyan", (0, 255, 255)),
    ("orange", (255, 165, 0)),
    ("pink", (255, 192, 203)),
    ("gold", (255, 215, 0)),
    ("brown", (165, 42, 42)),
    ("lightgreen", (144, 238, 144)),
    ("lightblue", (173, 216, 230)),
    ("salmon", (250, 128, 114)),
];

impl Rgba {
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: 1.0,
        }
    }

    /// Parse `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `rgb()`, `rgba()`,
    /// `transparent` or a named color
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim().to_ascii_lowercase();

        if text == "transparent" {
            return Some(Self {
                r: 0.0,
                g: 0.0,
                b: 0.0,
                a: 0.0,
            });
        }
        if let Some(hex) = text.strip_prefix('#') {
            return Self::parse_hex(hex);
        }
        if let Some(args) = text
            .strip_prefix("rgba(")
            .or_else(|| text.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return Self::parse_functional(args);
        }

        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == text)
            .map(|(_, (r, g, b))| Self::rgb(*r, *g, *b))
    }

    fn parse_hex(hex: &str) -> Option<Self> {
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(f64::from);
        let short = |i: usize| {
            let c = &hex[i..i + 1];
            channel(&format!("{c}{c}"))
        };
        let (r, g, b, a) = match hex.len() {
            3 => (short(0)?, short(1)?, short(2)?, 255.0),
            4 => (short(0)?, short(1)?, short(2)?, short(3)?),
            6 => (
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                255.0,
            ),
            8 => (
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                channel(&hex[6..8])?,
            ),
            _ => return None,
        };
        Some(Self {
            r,
            g,
            b,
            a: a / 255.0,
        })
    }

    fn parse_functional(args: &str) -> Option<Self> {
        let parts: Vec<f64> = args
            .split(',')
            .map(|p| p.trim().parse::<f64>().ok())
            .collect::<Option<Vec<_>>>()?;
        let in_range = |v: f64, hi: f64| (0.0..=hi).contains(&v);
        match parts.as_slice() {
            [r, g, b] if [r, g, b].iter().all(|c| in_range(**c, 255.0)) => Some(Self {
                r: *r,
                g: *g,
                b: *b,
                a: 1.0,
            }),
            [r, g, b, a]
                if [r, g, b].iter().all(|c| in_range(**c, 255.0)) && in_range(*a, 1.0) =>
            {
                Some(Self {
                    r: *r,
                    g: *g,
                    b: *b,
                    a: *a,
                })
            }
            _ => None,
        }
    }

    /// Linear mix; `amount` 0 gives `self`, 1 gives `other`
    pub fn mix(&self, other: &Rgba, amount: f64) -> Rgba {
        let lerp = |from: f64, to: f64| (to - from) * amount + from;
        Rgba {
            r: lerp(self.r, other.r),
            g: lerp(self.g, other.g),
            b: lerp(self.b, other.b),
            a: lerp(self.a, other.a),
        }
    }

    /// `rgb(r, g, b)`, or `rgba(r, g, b, a)` when not fully opaque
    pub fn to_rgb_string(&self) -> String {
        let (r, g, b) = (self.r.round(), self.g.round(), self.b.round());
        let a = (self.a * 100.0).round() / 100.0;
        if a >= 1.0 {
            format!("rgb({}, {}, {})", r, g, b)
        } else {
            format!("rgba({}, {}, {}, {})", r, g, b, a)
        }
    }
}

pub fn is_valid(text: &str) -> bool {
    Rgba::parse(text).is_some()
}

/// Color for `value` on a gradient spanning `min..=max`.
///
/// Values outside the range are clamped. When `min == max` the from color is
/// returned exactly as written.
pub fn gradient_color(value: f64, min: f64, max: f64, from: &str, to: &str) -> Option<String> {
    if min == max {
        return Some(from.to_string());
    }
    let ratio = ((value - min) / (max - min)).clamp(0.0, 1.0);
    let from = Rgba::parse(from)?;
    let to = Rgba::parse(to)?;
    Some(from.mix(&to, ratio).to_rgb_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_forms() {
        assert_eq!(Rgba::parse("green"), Some(Rgba::rgb(0, 128, 0)));
        assert_eq!(Rgba::parse("#f00"), Some(Rgba::rgb(255, 0, 0)));
        assert_eq!(Rgba::parse("#00FF00"), Some(Rgba::rgb(0, 255, 0)));
        assert_eq!(Rgba::parse("rgb(1, 2, 3)"), Some(Rgba::rgb(1, 2, 3)));
        assert_eq!(Rgba::parse("transparent").map(|c| c.a), Some(0.0));
        assert_eq!(Rgba::parse("#ff000080").map(|c| c.a), Some(128.0 / 255.0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(!is_valid("notacolor"));
        assert!(!is_valid("#12"));
        assert!(!is_valid("#ggg"));
        assert!(!is_valid("rgb(300, 0, 0)"));
    }

    #[test]
    fn test_gradient_endpoints_and_midpoint() {
        assert_eq!(
            gradient_color(0.0, 0.0, 100.0, "green", "red").unwrap(),
            "rgb(0, 128, 0)"
        );
        assert_eq!(
            gradient_color(100.0, 0.0, 100.0, "green", "red").unwrap(),
            "rgb(255, 0, 0)"
        );
        assert_eq!(
            gradient_color(50.0, 0.0, 100.0, "green", "red").unwrap(),
            "rgb(128, 64, 0)"
        );
    }

    #[test]
    fn test_gradient_clamps() {
        assert_eq!(
            gradient_color(-50.0, 0.0, 100.0, "green", "red").unwrap(),
            "rgb(0, 128, 0)"
        );
        assert_eq!(
            gradient_color(150.0, 0.0, 100.0, "green", "red").unwrap(),
            "rgb(255, 0, 0)"
        );
    }

    #[test]
    fn test_equal_bounds_return_from_as_written() {
        assert_eq!(
            gradient_color(100.0, 100.0, 100.0, "green", "red").unwrap(),
            "green"
        );
    }

    #[test]
    fn test_mix_toward_transparent_keeps_alpha() {
        assert_eq!(
            gradient_color(50.0, 0.0, 100.0, "blue", "transparent").unwrap(),
            "rgba(0, 0, 128, 0.5)"
        );
    }
}
