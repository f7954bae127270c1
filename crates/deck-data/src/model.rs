use crate::fill::{BlipFill, EffectList, Fill, Line, ShapeStyle};
use crate::text::{ListStyle, TextBody};
use crate::theme::{ColorMap, Theme};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// Transforms

/// `a:xfrm` in px and degrees.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct Xfrm {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub w: f64,
    #[serde(default)]
    pub h: f64,
    #[serde(default)]
    pub rot: f64,
    #[serde(default, rename = "flipH")]
    pub flip_h: bool,
    #[serde(default, rename = "flipV")]
    pub flip_v: bool,
}

impl Xfrm {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            x,
            y,
            w,
            h,
            ..Default::default()
        }
    }
}

/// Group transform: own box plus the child coordinate space.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct GroupXfrm {
    #[serde(flatten)]
    pub frame: Xfrm,
    #[serde(default, rename = "chOffX")]
    pub ch_off_x: f64,
    #[serde(default, rename = "chOffY")]
    pub ch_off_y: f64,
    #[serde(default, rename = "chExtW")]
    pub ch_ext_w: f64,
    #[serde(default, rename = "chExtH")]
    pub ch_ext_h: f64,
}

// Geometry

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Geometry {
    Preset {
        name: String,
        #[serde(default)]
        adjust: Vec<AdjustValue>,
    },
    Custom {
        paths: Vec<CustomPath>,
    },
}

impl Geometry {
    pub fn preset(name: &str) -> Self {
        Geometry::Preset {
            name: name.to_string(),
            adjust: Vec::new(),
        }
    }

    pub fn preset_name(&self) -> Option<&str> {
        match self {
            Geometry::Preset { name, .. } => Some(name),
            Geometry::Custom { .. } => None,
        }
    }
}

/// `a:gd` inside `avLst`, e.g. `adj` = 16667.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AdjustValue {
    pub name: String,
    pub val: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CustomPath {
    #[serde(default)]
    pub fill: PathFillMode,
    #[serde(default = "default_true")]
    pub stroke: bool,
    #[serde(default)]
    pub commands: Vec<PathCommand>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum PathFillMode {
    #[default]
    Norm,
    None,
    Lighten,
    LightenLess,
    Darken,
    DarkenLess,
}

/// Path commands in a normalized 0..1 space, scaled to the shape size.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum PathCommand {
    MoveTo {
        x: f64,
        y: f64,
    },
    LineTo {
        x: f64,
        y: f64,
    },
    CubicTo {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x: f64,
        y: f64,
    },
    QuadTo {
        x1: f64,
        y1: f64,
        x: f64,
        y: f64,
    },
    /// Radii normalized like the coordinates, angles in degrees.
    ArcTo {
        wr: f64,
        hr: f64,
        #[serde(rename = "stAng")]
        st_ang: f64,
        #[serde(rename = "swAng")]
        sw_ang: f64,
    },
    Close,
}

// Shape tree

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PlaceholderRef {
    #[serde(default, rename = "type")]
    pub kind: PlaceholderKind,
    #[serde(default)]
    pub idx: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum PlaceholderKind {
    Title,
    CtrTitle,
    SubTitle,
    Body,
    #[default]
    Obj,
    Dt,
    SldNum,
    Ftr,
    Hdr,
    Chart,
    Tbl,
    Pic,
    Media,
    #[serde(other)]
    Other,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Hyperlink {
    #[serde(default, rename = "rId")]
    pub r_id: Option<String>,
    /// `ppaction://hlinksldjump`, `ppaction://hlinkshowjump?jump=nextslide`...
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub tooltip: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Shape {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub xfrm: Option<Xfrm>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub fill: Option<Fill>,
    #[serde(default)]
    pub line: Option<Line>,
    #[serde(default)]
    pub effects: Option<EffectList>,
    #[serde(default)]
    pub style: Option<ShapeStyle>,
    #[serde(default, rename = "txBody")]
    pub text: Option<TextBody>,
    #[serde(default)]
    pub placeholder: Option<PlaceholderRef>,
    #[serde(default, rename = "hlinkClick")]
    pub hyperlink: Option<Hyperlink>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Connector {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub xfrm: Option<Xfrm>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub line: Option<Line>,
    #[serde(default)]
    pub effects: Option<EffectList>,
    #[serde(default)]
    pub style: Option<ShapeStyle>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Picture {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub xfrm: Option<Xfrm>,
    #[serde(default)]
    pub blip: BlipFill,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub line: Option<Line>,
    #[serde(default)]
    pub effects: Option<EffectList>,
    #[serde(default)]
    pub style: Option<ShapeStyle>,
    #[serde(default)]
    pub placeholder: Option<PlaceholderRef>,
    #[serde(default, rename = "hlinkClick")]
    pub hyperlink: Option<Hyperlink>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Group {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub xfrm: GroupXfrm,
    #[serde(default)]
    pub fill: Option<Fill>,
    #[serde(default)]
    pub children: Vec<Element>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GraphicFrame {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub xfrm: Xfrm,
    pub content: FrameContent,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FrameContent {
    Table(Table),
    Chart {
        #[serde(rename = "rId")]
        r_id: String,
    },
    OleObject {
        #[serde(default, rename = "progId")]
        prog_id: Option<String>,
        #[serde(default)]
        fallback: Option<Box<Picture>>,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Table {
    /// Grid column widths in px.
    #[serde(default)]
    pub columns: Vec<f64>,
    #[serde(default)]
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct TableRow {
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub cells: Vec<TableCell>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TableCell {
    #[serde(default, rename = "txBody")]
    pub text: Option<TextBody>,
    #[serde(default)]
    pub fill: Option<Fill>,
    #[serde(default)]
    pub borders: CellBorders,
    #[serde(default = "default_span", rename = "gridSpan")]
    pub grid_span: u32,
    #[serde(default = "default_span", rename = "rowSpan")]
    pub row_span: u32,
    #[serde(default, rename = "hMerge")]
    pub h_merge: bool,
    #[serde(default, rename = "vMerge")]
    pub v_merge: bool,
}

impl Default for TableCell {
    fn default() -> Self {
        Self {
            text: None,
            fill: None,
            borders: CellBorders::default(),
            grid_span: 1,
            row_span: 1,
            h_merge: false,
            v_merge: false,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct CellBorders {
    #[serde(default, rename = "lnL")]
    pub left: Option<Line>,
    #[serde(default, rename = "lnT")]
    pub top: Option<Line>,
    #[serde(default, rename = "lnR")]
    pub right: Option<Line>,
    #[serde(default, rename = "lnB")]
    pub bottom: Option<Line>,
}

/// One entry of `spTree`. Unknown element kinds deserialize to `Unknown`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "kind")]
pub enum Element {
    #[serde(rename = "sp")]
    Shape(Shape),
    #[serde(rename = "cxnSp")]
    Connector(Connector),
    #[serde(rename = "pic")]
    Picture(Picture),
    #[serde(rename = "grpSp")]
    Group(Group),
    #[serde(rename = "graphicFrame")]
    GraphicFrame(GraphicFrame),
    #[serde(other)]
    Unknown,
}

impl Element {
    pub fn id(&self) -> Option<u32> {
        match self {
            Element::Shape(s) => Some(s.id),
            Element::Connector(c) => Some(c.id),
            Element::Picture(p) => Some(p.id),
            Element::Group(g) => Some(g.id),
            Element::GraphicFrame(f) => Some(f.id),
            Element::Unknown => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Element::Shape(s) => &s.name,
            Element::Connector(c) => &c.name,
            Element::Picture(p) => &p.name,
            Element::Group(g) => &g.name,
            Element::GraphicFrame(f) => &f.name,
            Element::Unknown => "",
        }
    }

    pub fn xfrm(&self) -> Option<Xfrm> {
        match self {
            Element::Shape(s) => s.xfrm,
            Element::Connector(c) => c.xfrm,
            Element::Picture(p) => p.xfrm,
            Element::Group(g) => Some(g.xfrm.frame),
            Element::GraphicFrame(f) => Some(f.xfrm),
            Element::Unknown => None,
        }
    }

    pub fn placeholder(&self) -> Option<&PlaceholderRef> {
        match self {
            Element::Shape(s) => s.placeholder.as_ref(),
            Element::Picture(p) => p.placeholder.as_ref(),
            _ => None,
        }
    }

    /// Preset name of the element geometry, if it is a preset shape.
    pub fn preset_name(&self) -> Option<&str> {
        match self {
            Element::Shape(s) => s.geometry.as_ref().and_then(Geometry::preset_name),
            Element::Connector(c) => c.geometry.as_ref().and_then(Geometry::preset_name),
            _ => None,
        }
    }
}

// Parts

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Relationship {
    #[serde(rename = "type")]
    pub rel_type: String,
    pub target: String,
    #[serde(default, rename = "targetMode")]
    pub target_mode: TargetMode,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetMode {
    #[default]
    Internal,
    External,
}

pub type Relationships = BTreeMap<String, Relationship>;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Background {
    /// `bgPr`
    Fill { fill: Fill },
    /// `bgRef`: theme fill style index plus `phClr` color.
    Ref { idx: u32, color: crate::fill::Color },
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct MasterTextStyles {
    #[serde(default, rename = "titleStyle")]
    pub title: Option<ListStyle>,
    #[serde(default, rename = "bodyStyle")]
    pub body: Option<ListStyle>,
    #[serde(default, rename = "otherStyle")]
    pub other: Option<ListStyle>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Master {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub theme: usize,
    #[serde(default, rename = "clrMap")]
    pub color_map: ColorMap,
    #[serde(default)]
    pub background: Option<Background>,
    #[serde(default)]
    pub shapes: Vec<Element>,
    #[serde(default, rename = "txStyles")]
    pub text_styles: MasterTextStyles,
    #[serde(default)]
    pub relationships: Relationships,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Layout {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub master: usize,
    #[serde(default, rename = "clrMapOvr")]
    pub color_map_override: Option<ColorMap>,
    #[serde(default)]
    pub background: Option<Background>,
    #[serde(default)]
    pub shapes: Vec<Element>,
    #[serde(default = "default_true", rename = "showMasterSp")]
    pub show_master_shapes: bool,
    #[serde(default)]
    pub relationships: Relationships,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            path: String::new(),
            master: 0,
            color_map_override: None,
            background: None,
            shapes: Vec::new(),
            show_master_shapes: true,
            relationships: Relationships::new(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Slide {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub layout: usize,
    #[serde(default, rename = "clrMapOvr")]
    pub color_map_override: Option<ColorMap>,
    #[serde(default)]
    pub background: Option<Background>,
    #[serde(default)]
    pub shapes: Vec<Element>,
    #[serde(default = "default_true", rename = "showMasterSp")]
    pub show_master_shapes: bool,
    #[serde(default)]
    pub relationships: Relationships,
}

impl Default for Slide {
    fn default() -> Self {
        Self {
            path: String::new(),
            layout: 0,
            color_map_override: None,
            background: None,
            shapes: Vec::new(),
            show_master_shapes: true,
            relationships: Relationships::new(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Document {
    #[serde(default = "default_slide_width", rename = "slideWidth")]
    pub slide_width: f64,
    #[serde(default = "default_slide_height", rename = "slideHeight")]
    pub slide_height: f64,
    #[serde(default, rename = "defaultTextStyle")]
    pub default_text_style: Option<ListStyle>,
    #[serde(default)]
    pub themes: Vec<Theme>,
    #[serde(default)]
    pub masters: Vec<Master>,
    #[serde(default)]
    pub layouts: Vec<Layout>,
    #[serde(default)]
    pub slides: Vec<Slide>,
    /// Media bytes keyed by normalized package path (`ppt/media/image1.png`).
    #[serde(default)]
    pub media: BTreeMap<String, Vec<u8>>,
}

fn default_true() -> bool {
    true
}

fn default_span() -> u32 {
    1
}

// 13.333in x 7.5in at 96 dpi
fn default_slide_width() -> f64 {
    1280.0
}

fn default_slide_height() -> f64 {
    720.0
}
