//! The visual tree handed to a drawing backend.

use crate::color::ResolvedColor;
use crate::effects::ResolvedEffects;
use crate::geometry::ShapePath;
use crate::hyperlink::LinkTarget;
use crate::line::LineStyle;
use crate::markers::Marker;
use crate::media::ImagePaint;
use crate::paint::Paint;
use crate::text::TextLayout;
use deck_data::Xfrm;
use kurbo::{Affine, BezPath, Rect, Size};

/// Placement of a node in its parent's coordinate space (px).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Degrees clockwise about the frame center.
    pub rotation: f64,
    pub flip_h: bool,
    pub flip_v: bool,
}

impl Frame {
    pub fn from_xfrm(xfrm: &Xfrm) -> Self {
        Self {
            x: xfrm.x,
            y: xfrm.y,
            width: xfrm.w,
            height: xfrm.h,
            rotation: xfrm.rot,
            flip_h: xfrm.flip_h,
            flip_v: xfrm.flip_v,
        }
    }

    /// Same position and orientation, different extent.
    pub fn with_size(self, size: Size) -> Self {
        Self {
            width: size.width,
            height: size.height,
            ..self
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Maps frame-local coordinates (origin at the top-left corner) into the
    /// parent space: flip, then rotate, both about the frame center.
    pub fn transform(&self) -> Affine {
        let center = kurbo::Vec2::new(self.width / 2.0, self.height / 2.0);
        let flip = Affine::scale_non_uniform(
            if self.flip_h { -1.0 } else { 1.0 },
            if self.flip_v { -1.0 } else { 1.0 },
        );
        Affine::translate((self.x, self.y))
            * Affine::translate(center)
            * Affine::rotate(self.rotation.to_radians())
            * flip
            * Affine::translate(-center)
    }
}

#[derive(Debug, Clone)]
pub struct VisualNode {
    pub id: Option<u32>,
    pub name: String,
    pub frame: Frame,
    pub content: VisualContent,
    /// Present only when a navigation callback is installed.
    pub link: Option<LinkTarget>,
}

#[derive(Debug, Clone)]
pub enum VisualContent {
    Shape(ShapeVisual),
    Picture(PictureVisual),
    /// Children in the group's own frame space.
    Group(Vec<VisualNode>),
    Table(TableVisual),
    Chart {
        /// Normalized path of the chart part.
        part: String,
    },
    Placeholder {
        reason: PlaceholderReason,
        message: String,
        color: ResolvedColor,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderReason {
    /// A child failed to resolve.
    Error,
    Unsupported,
    Missing,
}

#[derive(Debug, Clone)]
pub struct ShapeVisual {
    pub paths: Vec<ShapePath>,
    pub markers: Vec<Marker>,
    pub effects: ResolvedEffects,
    pub text: Option<TextLayout>,
}

#[derive(Debug, Clone)]
pub struct PictureVisual {
    pub image: ImagePaint,
    /// Clip outline when the picture carries a non-rectangular geometry.
    pub mask: Option<Vec<BezPath>>,
    pub line: Option<LineStyle>,
    pub effects: ResolvedEffects,
}

#[derive(Debug, Clone)]
pub struct TableVisual {
    pub cells: Vec<TableCellVisual>,
}

#[derive(Debug, Clone)]
pub struct TableCellVisual {
    pub row: usize,
    pub column: usize,
    /// In the table frame's space.
    pub rect: Rect,
    pub fill: Paint,
    pub borders: CellBorderStyles,
    pub text: Option<TextLayout>,
}

#[derive(Debug, Clone, Default)]
pub struct CellBorderStyles {
    pub left: Option<LineStyle>,
    pub top: Option<LineStyle>,
    pub right: Option<LineStyle>,
    pub bottom: Option<LineStyle>,
}

/// One resolved slide.
#[derive(Debug, Clone)]
pub struct VisualTree {
    pub width: f64,
    pub height: f64,
    pub background: Paint,
    pub nodes: Vec<VisualNode>,
}

impl VisualNode {
    pub fn children(&self) -> &[VisualNode] {
        match &self.content {
            VisualContent::Group(children) => children,
            _ => &[],
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.content, VisualContent::Placeholder { .. })
    }

    /// Depth-first walk over this node and its descendants.
    pub fn walk<'n>(&'n self, visit: &mut impl FnMut(&'n VisualNode)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    #[test]
    fn rotation_and_flip_about_center() {
        let frame = Frame {
            x: 10.0,
            y: 20.0,
            width: 100.0,
            height: 50.0,
            rotation: 180.0,
            ..Default::default()
        };
        let p = frame.transform() * Point::new(0.0, 0.0);
        assert!((p.x - 110.0).abs() < 1e-9);
        assert!((p.y - 70.0).abs() < 1e-9);

        let flipped = Frame {
            rotation: 0.0,
            flip_h: true,
            ..frame
        };
        let p = flipped.transform() * Point::new(0.0, 0.0);
        assert!((p.x - 110.0).abs() < 1e-9);
        assert!((p.y - 20.0).abs() < 1e-9);
    }
}
