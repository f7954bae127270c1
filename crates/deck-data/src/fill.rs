use serde::{Deserialize, Serialize};

// Colors

/// A DrawingML color: base color plus modifiers applied in document order.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Color {
    #[serde(flatten)]
    pub base: ColorBase,
    #[serde(default)]
    pub mods: Vec<ColorModifier>,
}

impl Color {
    pub fn srgb(hex: &str) -> Self {
        Self {
            base: ColorBase::Srgb {
                val: hex.to_string(),
            },
            mods: Vec::new(),
        }
    }

    pub fn scheme(name: &str) -> Self {
        Self {
            base: ColorBase::Scheme {
                val: name.to_string(),
            },
            mods: Vec::new(),
        }
    }

    pub fn with(mut self, modifier: ColorModifier) -> Self {
        self.mods.push(modifier);
        self
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ColorBase {
    /// `srgbClr`, six hex digits.
    Srgb { val: String },
    /// `schemeClr`: tx1, bg1, accent1, dk1, phClr...
    Scheme { val: String },
    /// `sysClr` with the last computed value when the writer stored one.
    System {
        val: String,
        #[serde(default, rename = "lastClr")]
        last_clr: Option<String>,
    },
    /// `prstClr`
    Preset { val: String },
    /// `hslClr`: hue in degrees, sat/lum in 1/1000 percent.
    Hsl { hue: f64, sat: i32, lum: i32 },
    /// `scrgbClr`: linear channels in 1/1000 percent.
    ScRgb { r: i32, g: i32, b: i32 },
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(tag = "op", content = "val", rename_all = "camelCase")]
pub enum ColorModifier {
    LumMod(i32),
    LumOff(i32),
    Tint(i32),
    Shade(i32),
    Alpha(i32),
    AlphaMod(i32),
    AlphaOff(i32),
    SatMod(i32),
    SatOff(i32),
    HueMod(i32),
    /// Hue offset in degrees.
    HueOff(f64),
    Comp,
    Inv,
    Gray,
}

// Fills

/// Paint specification of a shape, line, run or background.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Fill {
    None,
    Solid { color: Color },
    Gradient(GradientFill),
    Pattern(PatternFill),
    Blip(BlipFill),
    /// `grpFill`: use the fill of the enclosing group.
    Group,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GradientFill {
    pub stops: Vec<GradientStop>,
    #[serde(default)]
    pub shade: GradientShade,
    #[serde(default, rename = "rotWithShape")]
    pub rot_with_shape: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GradientStop {
    /// 0..=100000
    pub pos: u32,
    pub color: Color,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GradientShade {
    Linear {
        #[serde(default)]
        angle: f64,
        #[serde(default)]
        scaled: bool,
    },
    Path {
        path: PathShadeType,
        #[serde(default, rename = "fillToRect")]
        fill_to_rect: Option<RelativeRect>,
    },
}

impl Default for GradientShade {
    fn default() -> Self {
        GradientShade::Linear {
            angle: 0.0,
            scaled: false,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PathShadeType {
    Circle,
    Rect,
    Shape,
}

/// Inset rectangle in 1/1000 percent of the reference box (may be negative).
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub struct RelativeRect {
    #[serde(default)]
    pub l: i32,
    #[serde(default)]
    pub t: i32,
    #[serde(default)]
    pub r: i32,
    #[serde(default)]
    pub b: i32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PatternFill {
    /// `prst` value, e.g. `pct25`, `dkHorz`, `smGrid`.
    pub preset: String,
    #[serde(default)]
    pub fg: Option<Color>,
    #[serde(default)]
    pub bg: Option<Color>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct BlipFill {
    /// Relationship id of the image part.
    #[serde(default)]
    pub embed: Option<String>,
    #[serde(default, rename = "srcRect")]
    pub src_rect: Option<RelativeRect>,
    #[serde(default)]
    pub mode: BlipMode,
    /// `alphaModFix` amount, 1/1000 percent.
    #[serde(default)]
    pub alpha: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum BlipMode {
    Stretch {
        #[serde(default, rename = "fillRect")]
        fill_rect: Option<RelativeRect>,
    },
    Tile(TileInfo),
}

impl Default for BlipMode {
    fn default() -> Self {
        BlipMode::Stretch {
            fill_rect: Some(RelativeRect::default()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TileInfo {
    #[serde(default)]
    pub tx: f64,
    #[serde(default)]
    pub ty: f64,
    #[serde(default = "default_scale")]
    pub sx: i32,
    #[serde(default = "default_scale")]
    pub sy: i32,
    #[serde(default)]
    pub flip: TileFlip,
    #[serde(default = "default_tile_align")]
    pub algn: RectAlignment,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum TileFlip {
    #[default]
    None,
    X,
    Y,
    Xy,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum RectAlignment {
    #[serde(rename = "tl")]
    TopLeft,
    #[serde(rename = "t")]
    Top,
    #[serde(rename = "tr")]
    TopRight,
    #[serde(rename = "l")]
    Left,
    #[serde(rename = "ctr")]
    Center,
    #[serde(rename = "r")]
    Right,
    #[serde(rename = "bl")]
    BottomLeft,
    #[serde(rename = "b")]
    Bottom,
    #[serde(rename = "br")]
    BottomRight,
}

fn default_scale() -> i32 {
    100000
}

fn default_tile_align() -> RectAlignment {
    RectAlignment::TopLeft
}

fn default_shadow_align() -> RectAlignment {
    RectAlignment::Bottom
}

// Lines

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Line {
    /// Stroke width in px.
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub fill: Option<Fill>,
    #[serde(default)]
    pub dash: Option<Dash>,
    #[serde(default)]
    pub cap: Option<LineCap>,
    #[serde(default)]
    pub join: Option<LineJoin>,
    #[serde(default, rename = "headEnd")]
    pub head_end: Option<LineEnd>,
    #[serde(default, rename = "tailEnd")]
    pub tail_end: Option<LineEnd>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Dash {
    /// `prstDash`: solid, dot, dash, lgDash, dashDot, sysDash...
    Preset { val: String },
    /// `custDash`: dash and space lengths in 1/1000 percent of the width.
    Custom { stops: Vec<DashStop> },
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct DashStop {
    pub d: i32,
    pub sp: i32,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum LineCap {
    #[serde(rename = "flat")]
    Flat,
    #[serde(rename = "rnd")]
    Round,
    #[serde(rename = "sq")]
    Square,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum LineJoin {
    Round,
    Bevel,
    Miter,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct LineEnd {
    #[serde(rename = "type")]
    pub kind: LineEndKind,
    #[serde(default)]
    pub w: LineEndSize,
    #[serde(default)]
    pub len: LineEndSize,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum LineEndKind {
    None,
    Triangle,
    Stealth,
    Diamond,
    Oval,
    Arrow,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum LineEndSize {
    Sm,
    #[default]
    Med,
    Lg,
}

// Effects

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct EffectList {
    #[serde(default, rename = "outerShdw")]
    pub outer_shadow: Option<OuterShadow>,
    #[serde(default)]
    pub reflection: Option<Reflection>,
}

impl EffectList {
    pub fn is_empty(&self) -> bool {
        self.outer_shadow.is_none() && self.reflection.is_none()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OuterShadow {
    #[serde(default, rename = "blurRad")]
    pub blur_rad: f64,
    #[serde(default)]
    pub dist: f64,
    /// Direction in degrees, 0 = right, 90 = down.
    #[serde(default)]
    pub dir: f64,
    #[serde(default = "default_scale")]
    pub sx: i32,
    #[serde(default = "default_scale")]
    pub sy: i32,
    #[serde(default = "default_shadow_align")]
    pub algn: RectAlignment,
    pub color: Color,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Reflection {
    #[serde(default, rename = "blurRad")]
    pub blur_rad: f64,
    #[serde(default = "default_scale", rename = "stA")]
    pub st_a: i32,
    #[serde(default, rename = "endA")]
    pub end_a: i32,
    #[serde(default = "default_scale", rename = "endPos")]
    pub end_pos: i32,
    #[serde(default)]
    pub dist: f64,
}

// Style references

/// `lnRef`, `fillRef`, `effectRef`: theme list index plus the color that
/// stands in for `phClr`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StyleRef {
    pub idx: u32,
    #[serde(default)]
    pub color: Option<Color>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum FontCollection {
    Major,
    Minor,
    None,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FontRef {
    pub idx: FontCollection,
    #[serde(default)]
    pub color: Option<Color>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct ShapeStyle {
    #[serde(default, rename = "lnRef")]
    pub ln_ref: Option<StyleRef>,
    #[serde(default, rename = "fillRef")]
    pub fill_ref: Option<StyleRef>,
    #[serde(default, rename = "effectRef")]
    pub effect_ref: Option<StyleRef>,
    #[serde(default, rename = "fontRef")]
    pub font_ref: Option<FontRef>,
}
