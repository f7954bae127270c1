use crate::context::RenderContext;
use deck_data::{Color, ColorBase, ColorModifier};
use std::fmt::Write as _;
use std::sync::Arc;

/// A concrete sRGB color with straight alpha in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha: f64,
}

impl ResolvedColor {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, alpha: 1.0 }
    }

    /// Parses `RRGGBB`, with or without a leading `#`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn with_alpha(self, alpha: f64) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            ..self
        }
    }

    pub fn is_opaque(&self) -> bool {
        self.alpha >= 1.0
    }

    /// `#RRGGBB`, alpha ignored.
    pub fn hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// `rgb(r,g,b)` when opaque, `rgba(r,g,b,a)` otherwise.
    pub fn css(&self) -> String {
        if self.is_opaque() {
            return format!("rgb({},{},{})", self.r, self.g, self.b);
        }
        let mut alpha = String::new();
        let _ = write!(alpha, "{:.3}", self.alpha);
        let alpha = alpha.trim_end_matches('0').trim_end_matches('.');
        format!("rgba({},{},{},{})", self.r, self.g, self.b, alpha)
    }

    /// Blends onto an opaque backdrop. The result is always opaque.
    pub fn composite_over(&self, backdrop: ResolvedColor) -> ResolvedColor {
        let a = self.alpha.clamp(0.0, 1.0);
        let mix = |fg: u8, bg: u8| (fg as f64 * a + bg as f64 * (1.0 - a)).round() as u8;
        ResolvedColor::rgb(
            mix(self.r, backdrop.r),
            mix(self.g, backdrop.g),
            mix(self.b, backdrop.b),
        )
    }

    pub(crate) fn to_rgba(self) -> Rgba {
        Rgba {
            r: self.r as f64 / 255.0,
            g: self.g as f64 / 255.0,
            b: self.b as f64 / 255.0,
            a: self.alpha,
        }
    }

    /// Applies modifiers in order, as a `a:srgbClr` child list would.
    pub fn modified(self, mods: &[ColorModifier]) -> ResolvedColor {
        let mut rgba = self.to_rgba();
        for m in mods {
            rgba.apply(m);
        }
        rgba.into()
    }
}

/// Working representation for modifier math: channels in `[0, 1]`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Rgba {
    r: f64,
    g: f64,
    b: f64,
    a: f64,
}

impl From<Rgba> for ResolvedColor {
    fn from(c: Rgba) -> Self {
        let channel = |v: f64| {
            let v = if v.is_finite() { v } else { 0.0 };
            (v.clamp(0.0, 1.0) * 255.0).round() as u8
        };
        ResolvedColor {
            r: channel(c.r),
            g: channel(c.g),
            b: channel(c.b),
            alpha: if c.a.is_finite() {
                c.a.clamp(0.0, 1.0)
            } else {
                1.0
            },
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Hsl {
    h: f64,
    s: f64,
    l: f64,
}

fn pct(val: i32) -> f64 {
    val as f64 / 100_000.0
}

impl Rgba {
    fn to_hsl(self) -> Hsl {
        let max = self.r.max(self.g).max(self.b);
        let min = self.r.min(self.g).min(self.b);
        let l = (max + min) / 2.0;
        let d = max - min;
        if d.abs() < f64::EPSILON {
            return Hsl { h: 0.0, s: 0.0, l };
        }
        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };
        let h = if max == self.r {
            (self.g - self.b) / d + if self.g < self.b { 6.0 } else { 0.0 }
        } else if max == self.g {
            (self.b - self.r) / d + 2.0
        } else {
            (self.r - self.g) / d + 4.0
        };
        Hsl { h: h * 60.0, s, l }
    }

    fn from_hsl(hsl: Hsl, a: f64) -> Self {
        let h = hsl.h.rem_euclid(360.0) / 360.0;
        let s = hsl.s.clamp(0.0, 1.0);
        let l = hsl.l.clamp(0.0, 1.0);
        if s == 0.0 {
            return Rgba { r: l, g: l, b: l, a };
        }
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        let hue = |mut t: f64| {
            if t < 0.0 {
                t += 1.0;
            }
            if t > 1.0 {
                t -= 1.0;
            }
            if t < 1.0 / 6.0 {
                p + (q - p) * 6.0 * t
            } else if t < 0.5 {
                q
            } else if t < 2.0 / 3.0 {
                p + (q - p) * (2.0 / 3.0 - t) * 6.0
            } else {
                p
            }
        };
        Rgba {
            r: hue(h + 1.0 / 3.0),
            g: hue(h),
            b: hue(h - 1.0 / 3.0),
            a,
        }
    }

    fn map_hsl(&mut self, f: impl FnOnce(&mut Hsl)) {
        let mut hsl = self.to_hsl();
        f(&mut hsl);
        hsl.s = hsl.s.clamp(0.0, 1.0);
        hsl.l = hsl.l.clamp(0.0, 1.0);
        *self = Rgba::from_hsl(hsl, self.a);
    }

    fn apply(&mut self, modifier: &ColorModifier) {
        match *modifier {
            ColorModifier::LumMod(v) => self.map_hsl(|c| c.l *= pct(v)),
            ColorModifier::LumOff(v) => self.map_hsl(|c| c.l += pct(v)),
            ColorModifier::SatMod(v) => self.map_hsl(|c| c.s *= pct(v)),
            ColorModifier::SatOff(v) => self.map_hsl(|c| c.s += pct(v)),
            ColorModifier::HueMod(v) => self.map_hsl(|c| c.h *= pct(v)),
            ColorModifier::HueOff(deg) => self.map_hsl(|c| c.h += deg),
            ColorModifier::Comp => self.map_hsl(|c| c.h += 180.0),
            ColorModifier::Tint(v) => {
                let t = pct(v).clamp(0.0, 1.0);
                for ch in [&mut self.r, &mut self.g, &mut self.b] {
                    *ch = *ch * t + (1.0 - t);
                }
            }
            ColorModifier::Shade(v) => {
                let s = pct(v).clamp(0.0, 1.0);
                for ch in [&mut self.r, &mut self.g, &mut self.b] {
                    *ch *= s;
                }
            }
            ColorModifier::Inv => {
                for ch in [&mut self.r, &mut self.g, &mut self.b] {
                    *ch = 1.0 - *ch;
                }
            }
            ColorModifier::Gray => {
                let y = 0.3 * self.r + 0.59 * self.g + 0.11 * self.b;
                self.r = y;
                self.g = y;
                self.b = y;
            }
            ColorModifier::Alpha(v) | ColorModifier::AlphaMod(v) => {
                self.a = (self.a * pct(v)).clamp(0.0, 1.0)
            }
            ColorModifier::AlphaOff(v) => self.a = (self.a + pct(v)).clamp(0.0, 1.0),
        }
        self.r = self.r.clamp(0.0, 1.0);
        self.g = self.g.clamp(0.0, 1.0);
        self.b = self.b.clamp(0.0, 1.0);
    }
}

/// Resolves a color through the per-pass cache. Repeated calls for the same
/// node within one pass return the same `Arc`.
pub fn resolve_color(color: &Color, ctx: &RenderContext) -> Arc<ResolvedColor> {
    ctx.caches
        .color_entry(color, ctx.placeholder_color, || compute_color(color, ctx))
}

/// Uncached resolution: base color, then modifiers in document order.
pub fn compute_color(color: &Color, ctx: &RenderContext) -> ResolvedColor {
    base_color(&color.base, ctx).modified(&color.mods)
}

fn base_color(base: &ColorBase, ctx: &RenderContext) -> ResolvedColor {
    match base {
        ColorBase::Srgb { val } => ResolvedColor::from_hex(val).unwrap_or_else(|| {
            tracing::debug!(value = %val, "malformed srgbClr, using black");
            ResolvedColor::BLACK
        }),
        ColorBase::Scheme { val } => scheme_color(val, ctx),
        ColorBase::System { val, last_clr } => last_clr
            .as_deref()
            .and_then(ResolvedColor::from_hex)
            .or_else(|| system_color(val))
            .unwrap_or(ResolvedColor::BLACK),
        ColorBase::Preset { val } => preset_color(val).unwrap_or_else(|| {
            tracing::debug!(preset = %val, "unknown preset color, using black");
            ResolvedColor::BLACK
        }),
        ColorBase::Hsl { hue, sat, lum } => Rgba::from_hsl(
            Hsl {
                h: *hue,
                s: pct(*sat),
                l: pct(*lum),
            },
            1.0,
        )
        .into(),
        ColorBase::ScRgb { r, g, b } => Rgba {
            r: linear_to_srgb(pct(*r)),
            g: linear_to_srgb(pct(*g)),
            b: linear_to_srgb(pct(*b)),
            a: 1.0,
        }
        .into(),
    }
}

/// Effective color map first, then the raw name as a scheme key, then black.
pub fn scheme_color(name: &str, ctx: &RenderContext) -> ResolvedColor {
    if name == "phClr" {
        return ctx.placeholder_color.unwrap_or(ResolvedColor::BLACK);
    }
    let scheme = &ctx.theme.color_scheme;
    let mapped = ctx
        .color_map
        .get(name)
        .and_then(|slot| scheme.get(slot))
        .and_then(ResolvedColor::from_hex);
    match mapped.or_else(|| scheme.get(name).and_then(ResolvedColor::from_hex)) {
        Some(c) => c,
        None => {
            tracing::debug!(slot = name, theme = %ctx.theme.name, "scheme slot not found, using black");
            ResolvedColor::BLACK
        }
    }
}

fn linear_to_srgb(c: f64) -> f64 {
    let c = c.clamp(0.0, 1.0);
    if c <= 0.003_130_8 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

fn system_color(name: &str) -> Option<ResolvedColor> {
    let hex = match name {
        "windowText" | "btnText" | "menuText" | "captionText" | "infoText"
        | "inactiveCaptionText" | "background" => "000000",
        "window" | "btnHighlight" | "highlightText" | "3dLight" => "FFFFFF",
        "btnFace" | "menu" | "menuBar" => "F0F0F0",
        "btnShadow" => "A0A0A0",
        "3dDkShadow" => "696969",
        "grayText" => "6D6D6D",
        "highlight" | "hotLight" => "0078D7",
        "activeCaption" => "99B4D1",
        "inactiveCaption" => "BFCDDB",
        "gradientActiveCaption" => "B9D1EA",
        "gradientInactiveCaption" => "D7E4F2",
        "activeBorder" => "B4B4B4",
        "inactiveBorder" => "F4F7FC",
        "appWorkspace" => "ABABAB",
        "infoBk" => "FFFFE1",
        "scrollBar" => "C8C8C8",
        "windowFrame" => "646464",
        "menuHighlight" => "3399FF",
        _ => return None,
    };
    ResolvedColor::from_hex(hex)
}

const PRESET_COLORS: &[(&str, &str)] = &[
    ("aliceBlue", "F0F8FF"),
    ("antiqueWhite", "FAEBD7"),
    ("aqua", "00FFFF"),
    ("aquamarine", "7FFFD4"),
    ("azure", "F0FFFF"),
    ("beige", "F5F5DC"),
    ("bisque", "FFE4C4"),
    ("black", "000000"),
    ("blanchedAlmond", "FFEBCD"),
    ("blue", "0000FF"),
    ("blueViolet", "8A2BE2"),
    ("brown", "A52A2A"),
    ("burlyWood", "DEB887"),
    ("cadetBlue", "5F9EA0"),
    ("chartreuse", "7FFF00"),
    ("chocolate", "D2691E"),
    ("coral", "FF7F50"),
    ("cornflowerBlue", "6495ED"),
    ("cornsilk", "FFF8DC"),
    ("crimson", "DC143C"),
    ("cyan", "00FFFF"),
    ("darkBlue", "00008B"),
    ("darkCyan", "008B8B"),
    ("darkGoldenrod", "B8860B"),
    ("darkGray", "A9A9A9"),
    ("darkGreen", "006400"),
    ("darkKhaki", "BDB76B"),
    ("darkMagenta", "8B008B"),
    ("darkOliveGreen", "556B2F"),
    ("darkOrange", "FF8C00"),
    ("darkOrchid", "9932CC"),
    ("darkRed", "8B0000"),
    ("darkSalmon", "E9967A"),
    ("darkSeaGreen", "8FBC8F"),
    ("darkSlateBlue", "483D8B"),
    ("darkSlateGray", "2F4F4F"),
    ("darkTurquoise", "00CED1"),
    ("darkViolet", "9400D3"),
    ("deepPink", "FF1493"),
    ("deepSkyBlue", "00BFFF"),
    ("dimGray", "696969"),
    ("dodgerBlue", "1E90FF"),
    ("firebrick", "B22222"),
    ("floralWhite", "FFFAF0"),
    ("forestGreen", "228B22"),
    ("fuchsia", "FF00FF"),
    ("gainsboro", "DCDCDC"),
    ("ghostWhite", "F8F8FF"),
    ("gold", "FFD700"),
    ("goldenrod", "DAA520"),
    ("gray", "808080"),
    ("green", "008000"),
    ("greenYellow", "ADFF2F"),
    ("honeydew", "F0FFF0"),
    ("hotPink", "FF69B4"),
    ("indianRed", "CD5C5C"),
    ("indigo", "4B0082"),
    ("ivory", "FFFFF0"),
    ("khaki", "F0E68C"),
    ("lavender", "E6E6FA"),
    ("lavenderBlush", "FFF0F5"),
    ("lawnGreen", "7CFC00"),
    ("lemonChiffon", "FFFACD"),
    ("lightBlue", "ADD8E6"),
    ("lightCoral", "F08080"),
    ("lightCyan", "E0FFFF"),
    ("lightGoldenrodYellow", "FAFAD2"),
    ("lightGray", "D3D3D3"),
    ("lightGreen", "90EE90"),
    ("lightPink", "FFB6C1"),
    ("lightSalmon", "FFA07A"),
    ("lightSeaGreen", "20B2AA"),
    ("lightSkyBlue", "87CEFA"),
    ("lightSlateGray", "778899"),
    ("lightSteelBlue", "B0C4DE"),
    ("lightYellow", "FFFFE0"),
    ("lime", "00FF00"),
    ("limeGreen", "32CD32"),
    ("linen", "FAF0E6"),
    ("magenta", "FF00FF"),
    ("maroon", "800000"),
    ("medAquamarine", "66CDAA"),
    ("medBlue", "0000CD"),
    ("medOrchid", "BA55D3"),
    ("medPurple", "9370DB"),
    ("medSeaGreen", "3CB371"),
    ("medSlateBlue", "7B68EE"),
    ("medSpringGreen", "00FA9A"),
    ("medTurquoise", "48D1CC"),
    ("medVioletRed", "C71585"),
    ("midnightBlue", "191970"),
    ("mintCream", "F5FFFA"),
    ("mistyRose", "FFE4E1"),
    ("moccasin", "FFE4B5"),
    ("navajoWhite", "FFDEAD"),
    ("navy", "000080"),
    ("oldLace", "FDF5E6"),
    ("olive", "808000"),
    ("oliveDrab", "6B8E23"),
    ("orange", "FFA500"),
    ("orangeRed", "FF4500"),
    ("orchid", "DA70D6"),
    ("paleGoldenrod", "EEE8AA"),
    ("paleGreen", "98FB98"),
    ("paleTurquoise", "AFEEEE"),
    ("paleVioletRed", "DB7093"),
    ("papayaWhip", "FFEFD5"),
    ("peachPuff", "FFDAB9"),
    ("peru", "CD853F"),
    ("pink", "FFC0CB"),
    ("plum", "DDA0DD"),
    ("powderBlue", "B0E0E6"),
    ("purple", "800080"),
    ("red", "FF0000"),
    ("rosyBrown", "BC8F8F"),
    ("royalBlue", "4169E1"),
    ("saddleBrown", "8B4513"),
    ("salmon", "FA8072"),
    ("sandyBrown", "F4A460"),
    ("seaGreen", "2E8B57"),
    ("seaShell", "FFF5EE"),
    ("sienna", "A0522D"),
    ("silver", "C0C0C0"),
    ("skyBlue", "87CEEB"),
    ("slateBlue", "6A5ACD"),
    ("slateGray", "708090"),
    ("snow", "FFFAFA"),
    ("springGreen", "00FF7F"),
    ("steelBlue", "4682B4"),
    ("tan", "D2B48C"),
    ("teal", "008080"),
    ("thistle", "D8BFD8"),
    ("tomato", "FF6347"),
    ("turquoise", "40E0D0"),
    ("violet", "EE82EE"),
    ("wheat", "F5DEB3"),
    ("white", "FFFFFF"),
    ("whiteSmoke", "F5F5F5"),
    ("yellow", "FFFF00"),
    ("yellowGreen", "9ACD32"),
];

/// `prstClr` lookup. DrawingML spells some names with `dk`/`lt`/`med`
/// prefixes; both spellings are accepted.
pub fn preset_color(name: &str) -> Option<ResolvedColor> {
    let normalized = if let Some(rest) = name.strip_prefix("dk") {
        format!("dark{rest}")
    } else if let Some(rest) = name.strip_prefix("lt") {
        format!("light{rest}")
    } else if let Some(rest) = name.strip_prefix("medium") {
        format!("med{rest}")
    } else {
        name.to_string()
    };
    PRESET_COLORS
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(&normalized))
        .and_then(|(_, hex)| ResolvedColor::from_hex(hex))
}
