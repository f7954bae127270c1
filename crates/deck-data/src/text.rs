use crate::fill::{Color, Fill, Line};
use crate::model::Hyperlink;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `txBody`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct TextBody {
    #[serde(default, rename = "bodyPr")]
    pub body: BodyProperties,
    #[serde(default, rename = "lstStyle")]
    pub list_style: Option<ListStyle>,
    #[serde(default)]
    pub paragraphs: Vec<Paragraph>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BodyProperties {
    #[serde(default)]
    pub insets: Insets,
    #[serde(default = "default_true")]
    pub wrap: bool,
    #[serde(default)]
    pub anchor: TextAnchor,
    #[serde(default)]
    pub autofit: Autofit,
}

impl Default for BodyProperties {
    fn default() -> Self {
        Self {
            insets: Insets::default(),
            wrap: true,
            anchor: TextAnchor::default(),
            autofit: Autofit::default(),
        }
    }
}

/// Text box insets in px. Defaults match `lIns`/`tIns` of 91440/45720 EMU.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Insets {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Default for Insets {
    fn default() -> Self {
        Self {
            left: 9.6,
            top: 4.8,
            right: 9.6,
            bottom: 4.8,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAnchor {
    #[default]
    #[serde(rename = "t")]
    Top,
    #[serde(rename = "ctr")]
    Middle,
    #[serde(rename = "b")]
    Bottom,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Autofit {
    /// `noAutofit`, or no autofit element at all.
    #[default]
    None,
    /// `spAutoFit`: the shape grows to the text.
    Shape,
    /// `normAutofit`. Both values absent means the writer never computed them.
    Normal {
        #[serde(default, rename = "fontScale")]
        font_scale: Option<i32>,
        #[serde(default, rename = "lnSpcReduction")]
        ln_spc_reduction: Option<i32>,
    },
}

/// `lstStyle`, master `titleStyle`/`bodyStyle`/`otherStyle`, and the
/// presentation `defaultTextStyle` all share this shape.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct ListStyle {
    #[serde(default, rename = "defPPr")]
    pub default: Option<ParagraphProps>,
    /// `lvl1pPr`..`lvl9pPr`, keyed by zero-based level.
    #[serde(default)]
    pub levels: BTreeMap<u8, ParagraphProps>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct ParagraphProps {
    #[serde(default, rename = "lvl")]
    pub level: Option<u8>,
    #[serde(default, rename = "algn")]
    pub align: Option<TextAlign>,
    /// First-line indent in px.
    #[serde(default)]
    pub indent: Option<f64>,
    /// `marL` in px.
    #[serde(default, rename = "marL")]
    pub margin_left: Option<f64>,
    #[serde(default, rename = "lnSpc")]
    pub line_spacing: Option<Spacing>,
    #[serde(default, rename = "spcBef")]
    pub space_before: Option<Spacing>,
    #[serde(default, rename = "spcAft")]
    pub space_after: Option<Spacing>,
    #[serde(default)]
    pub bullet: Option<Bullet>,
    #[serde(default, rename = "buClr")]
    pub bullet_color: Option<BulletColor>,
    #[serde(default, rename = "buSz")]
    pub bullet_size: Option<BulletSize>,
    #[serde(default, rename = "buFont")]
    pub bullet_font: Option<BulletFont>,
    /// `defTabSz` in EMU.
    #[serde(default, rename = "defTabSz")]
    pub default_tab_size: Option<i64>,
    #[serde(default, rename = "defRPr")]
    pub default_run: Option<RunProps>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    #[serde(rename = "l")]
    Left,
    #[serde(rename = "ctr")]
    Center,
    #[serde(rename = "r")]
    Right,
    #[serde(rename = "just")]
    Justify,
    #[serde(rename = "dist")]
    Distributed,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Spacing {
    /// `spcPct`, 1/1000 percent of the font size.
    Percent { val: i32 },
    /// `spcPts`, points.
    Points { val: f64 },
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Bullet {
    None,
    Char {
        char: String,
    },
    AutoNum {
        scheme: AutoNumberScheme,
        #[serde(default, rename = "startAt")]
        start_at: Option<u32>,
    },
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum AutoNumberScheme {
    ArabicPeriod,
    ArabicParenR,
    ArabicParenBoth,
    ArabicPlain,
    AlphaLcPeriod,
    AlphaUcPeriod,
    AlphaLcParenR,
    AlphaUcParenR,
    AlphaLcParenBoth,
    AlphaUcParenBoth,
    RomanLcPeriod,
    RomanUcPeriod,
    RomanLcParenR,
    RomanUcParenR,
    RomanLcParenBoth,
    RomanUcParenBoth,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum BulletColor {
    FollowText,
    Color { color: Color },
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum BulletSize {
    FollowText,
    Percent { val: i32 },
    Points { val: f64 },
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum BulletFont {
    FollowText,
    Typeface { typeface: String },
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Paragraph {
    #[serde(default, rename = "pPr")]
    pub props: ParagraphProps,
    #[serde(default)]
    pub runs: Vec<TextRun>,
    #[serde(default, rename = "endParaRPr")]
    pub end_props: Option<RunProps>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TextRun {
    Text {
        text: String,
        #[serde(default, rename = "rPr")]
        props: RunProps,
    },
    /// `a:br`
    Break {
        #[serde(default, rename = "rPr")]
        props: RunProps,
    },
    /// `a:fld` (slide number, date...). The text is the cached value.
    Field {
        text: String,
        #[serde(default, rename = "fieldType")]
        field_type: Option<String>,
        #[serde(default, rename = "rPr")]
        props: RunProps,
    },
}

impl TextRun {
    pub fn props(&self) -> &RunProps {
        match self {
            TextRun::Text { props, .. }
            | TextRun::Break { props }
            | TextRun::Field { props, .. } => props,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct RunProps {
    /// Points.
    #[serde(default, rename = "sz")]
    pub size: Option<f64>,
    #[serde(default, rename = "b")]
    pub bold: Option<bool>,
    #[serde(default, rename = "i")]
    pub italic: Option<bool>,
    /// `u` value: `sng`, `dbl`, `none`...
    #[serde(default, rename = "u")]
    pub underline: Option<String>,
    /// `strike` value: `sngStrike`, `dblStrike`, `noStrike`.
    #[serde(default)]
    pub strike: Option<String>,
    #[serde(default)]
    pub caps: Option<Caps>,
    /// 1/1000 percent; positive is superscript.
    #[serde(default)]
    pub baseline: Option<i32>,
    /// Character spacing in points.
    #[serde(default, rename = "spc")]
    pub spacing: Option<f64>,
    #[serde(default)]
    pub fill: Option<Fill>,
    #[serde(default, rename = "ln")]
    pub outline: Option<Line>,
    /// Latin typeface, possibly a theme token like `+mn-lt`.
    #[serde(default)]
    pub latin: Option<String>,
    #[serde(default, rename = "hlinkClick")]
    pub hyperlink: Option<Hyperlink>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Caps {
    None,
    Small,
    All,
}

fn default_true() -> bool {
    true
}
