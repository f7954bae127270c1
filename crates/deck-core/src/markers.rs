//! Arrowhead markers for line heads and tails.

use crate::config::RenderConfig;
use crate::geometry::PathDescriptor;
use crate::line::LineStyle;
use deck_data::{LineEnd, LineEndKind, LineEndSize};
use kurbo::{Affine, BezPath, Ellipse, PathEl, Point, Shape as _, Vec2};

/// Markers are drawn in a 10x10 box with the tip at (10, 5).
const BOX: f64 = 10.0;

#[derive(Debug, Clone)]
pub struct Marker {
    pub kind: LineEndKind,
    /// In shape space, tip on the line endpoint.
    pub path: BezPath,
    /// Open arrows are stroked with the line paint instead of filled.
    pub filled: bool,
}

fn size_factor(size: LineEndSize) -> f64 {
    match size {
        LineEndSize::Sm => 2.0,
        LineEndSize::Med => 3.0,
        LineEndSize::Lg => 5.0,
    }
}

fn marker_shape(kind: LineEndKind, tol: f64) -> Option<(BezPath, bool)> {
    let poly = |points: &[(f64, f64)], close: bool| {
        let mut path = BezPath::new();
        for (i, p) in points.iter().enumerate() {
            if i == 0 {
                path.move_to(*p);
            } else {
                path.line_to(*p);
            }
        }
        if close {
            path.close_path();
        }
        path
    };
    let shape = match kind {
        LineEndKind::Triangle => (poly(&[(10.0, 5.0), (0.0, 0.0), (0.0, 10.0)], true), true),
        LineEndKind::Stealth => (
            poly(&[(10.0, 5.0), (0.0, 0.0), (3.0, 5.0), (0.0, 10.0)], true),
            true,
        ),
        LineEndKind::Diamond => (
            poly(&[(10.0, 5.0), (5.0, 0.0), (0.0, 5.0), (5.0, 10.0)], true),
            true,
        ),
        LineEndKind::Oval => (Ellipse::new((5.0, 5.0), (5.0, 5.0), 0.0).to_path(tol), true),
        LineEndKind::Arrow => (poly(&[(0.0, 0.0), (10.0, 5.0), (0.0, 10.0)], false), false),
        LineEndKind::None | LineEndKind::Unknown => return None,
    };
    Some(shape)
}

/// Places a marker with its tip at `tip`, pointing along `direction`.
pub fn build_marker(
    end: &LineEnd,
    tip: Point,
    direction: Vec2,
    line_width: f64,
    config: &RenderConfig,
) -> Option<Marker> {
    let (mut path, filled) = marker_shape(end.kind, config.curve_tolerance)?;
    if direction.hypot() <= f64::EPSILON {
        return None;
    }
    let width = line_width * size_factor(end.w);
    let length = line_width * size_factor(end.len);
    let width = width.max(config.marker_min_box);
    let length = length.max(config.marker_min_box);

    let placement = Affine::translate(tip.to_vec2())
        * Affine::rotate(direction.atan2())
        * Affine::scale_non_uniform(length / BOX, width / BOX)
        * Affine::translate(Vec2::new(-BOX, -BOX / 2.0));
    path.apply_affine(placement);
    Some(Marker {
        kind: end.kind,
        path,
        filled,
    })
}

/// Start point of the first sub-path and the outward direction there.
fn head_of(path: &BezPath) -> Option<(Point, Vec2)> {
    let mut elements = path.elements().iter();
    let start = match elements.next()? {
        PathEl::MoveTo(p) => *p,
        _ => return None,
    };
    for el in elements {
        let next = match *el {
            PathEl::LineTo(p) => p,
            PathEl::QuadTo(c, _) => c,
            PathEl::CurveTo(c, _, _) => c,
            PathEl::MoveTo(_) | PathEl::ClosePath => return None,
        };
        if next != start {
            return Some((start, start - next));
        }
    }
    None
}

/// End point of the last sub-path and the outward direction there.
fn tail_of(path: &BezPath) -> Option<(Point, Vec2)> {
    let elements = path.elements();
    let last = elements.last()?;
    let (end, mut before) = match *last {
        PathEl::LineTo(p) => (p, None),
        PathEl::QuadTo(c, p) => (p, Some(c)),
        PathEl::CurveTo(_, c2, p) => (p, Some(c2)),
        _ => return None,
    };
    if before == Some(end) {
        before = None;
    }
    let before = match before {
        Some(b) => b,
        None => {
            let prev = elements.len().checked_sub(2).map(|i| elements[i])?;
            match prev {
                PathEl::MoveTo(p) | PathEl::LineTo(p) => p,
                PathEl::QuadTo(_, p) | PathEl::CurveTo(_, _, p) => p,
                PathEl::ClosePath => return None,
            }
        }
    };
    (before != end).then(|| (end, end - before))
}

/// Head and tail markers for the stroked, open sub-paths of a shape.
pub fn build_markers(paths: &[PathDescriptor], line: &LineStyle, config: &RenderConfig) -> Vec<Marker> {
    if !line.has_markers() {
        return Vec::new();
    }
    let Some(desc) = paths.iter().find(|p| p.stroke) else {
        return Vec::new();
    };
    let mut markers = Vec::new();
    if let (Some(end), Some((tip, dir))) = (line.head.as_ref(), head_of(&desc.path)) {
        markers.extend(build_marker(end, tip, dir, line.width, config));
    }
    if let (Some(end), Some((tip, dir))) = (line.tail.as_ref(), tail_of(&desc.path)) {
        markers.extend(build_marker(end, tip, dir, line.width, config));
    }
    markers
}
