use crate::line::LineStyle;
use crate::paint::Paint;
use crate::presets::preset_paths;
use deck_data::{ColorModifier, CustomPath, Geometry, PathCommand, PathFillMode};
use kurbo::{BezPath, Point, Rect, Shape as _, Size, Vec2};
use std::collections::HashSet;
use std::f64::consts::TAU;
use std::sync::{Mutex, OnceLock};

pub const DEFAULT_TOLERANCE: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}

/// One sub-path of a shape with its own fill/stroke treatment.
#[derive(Debug, Clone)]
pub struct PathDescriptor {
    pub path: BezPath,
    pub fill: PathFillMode,
    pub stroke: bool,
    pub fill_rule: FillRule,
}

impl PathDescriptor {
    pub fn filled(path: BezPath) -> Self {
        Self {
            path,
            fill: PathFillMode::Norm,
            stroke: true,
            fill_rule: FillRule::NonZero,
        }
    }

    /// Stroke-only layer.
    pub fn outline(path: BezPath) -> Self {
        Self {
            fill: PathFillMode::None,
            ..Self::filled(path)
        }
    }

    pub fn with_fill(mut self, fill: PathFillMode) -> Self {
        self.fill = fill;
        self
    }

    pub fn with_rule(mut self, rule: FillRule) -> Self {
        self.fill_rule = rule;
        self
    }

    pub fn without_stroke(mut self) -> Self {
        self.stroke = false;
        self
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedGeometry {
    /// Box size, never below 1 on either axis so hairline connectors stay
    /// visible and hit-testable.
    pub size: Size,
    pub paths: Vec<PathDescriptor>,
}

fn log_unknown_preset_once(name: &str) {
    static UNKNOWN_PRESETS: OnceLock<Mutex<HashSet<String>>> = OnceLock::new();
    let store = UNKNOWN_PRESETS.get_or_init(|| Mutex::new(HashSet::new()));
    if let Ok(mut seen) = store.lock() {
        if seen.insert(name.to_string()) {
            tracing::debug!(preset = name, "unknown preset geometry, drawing a rectangle");
        }
    }
}

pub fn resolve_geometry(geometry: Option<&Geometry>, size: Size) -> ResolvedGeometry {
    resolve_geometry_with(geometry, size, DEFAULT_TOLERANCE)
}

/// Builds the sub-paths of a geometry at `size`. No geometry means a
/// rectangle; so does a preset outside the catalogue.
pub fn resolve_geometry_with(geometry: Option<&Geometry>, size: Size, tol: f64) -> ResolvedGeometry {
    let sanitize = |v: f64| if v.is_finite() { v.max(0.0) } else { 0.0 };
    let (w, h) = (sanitize(size.width), sanitize(size.height));
    let rect = || vec![PathDescriptor::filled(Rect::new(0.0, 0.0, w, h).to_path(tol))];

    let paths = match geometry {
        None => rect(),
        Some(Geometry::Preset { name, adjust }) => {
            preset_paths(name, adjust, w, h, tol).unwrap_or_else(|| {
                log_unknown_preset_once(name);
                rect()
            })
        }
        Some(Geometry::Custom { paths }) => {
            let built: Vec<PathDescriptor> = paths
                .iter()
                .filter_map(|p| custom_path(p, w, h, tol))
                .collect();
            if built.is_empty() {
                tracing::debug!("custom geometry without drawable commands, drawing a rectangle");
                rect()
            } else {
                built
            }
        }
    };

    ResolvedGeometry {
        size: Size::new(w.max(1.0), h.max(1.0)),
        paths,
    }
}

/// Parametric angle (radians) of the point at visual angle `deg` on an
/// ellipse with radii `rx`, `ry`.
pub(crate) fn param_angle(rx: f64, ry: f64, deg: f64) -> f64 {
    let a = deg.to_radians();
    (rx * a.sin()).atan2(ry * a.cos())
}

/// Appends an elliptical arc starting at visual angle `start` and sweeping
/// `sweep` degrees (positive is clockwise). The path must already sit at the
/// start point.
pub(crate) fn ellipse_arc(path: &mut BezPath, center: Point, radii: Vec2, start: f64, sweep: f64, tol: f64) {
    if sweep == 0.0 {
        return;
    }
    if radii.x <= 0.0 || radii.y <= 0.0 {
        let t = param_angle(radii.x, radii.y, start + sweep);
        path.line_to((center.x + radii.x * t.cos(), center.y + radii.y * t.sin()));
        return;
    }
    let t0 = param_angle(radii.x, radii.y, start);
    let dt = if sweep.abs() >= 360.0 {
        TAU * sweep.signum()
    } else {
        let mut d = param_angle(radii.x, radii.y, start + sweep) - t0;
        if sweep > 0.0 && d <= 0.0 {
            d += TAU;
        } else if sweep < 0.0 && d >= 0.0 {
            d -= TAU;
        }
        d
    };
    let arc = kurbo::Arc {
        center,
        radii,
        start_angle: t0,
        sweep_angle: dt,
        x_rotation: 0.0,
    };
    path.extend(arc.append_iter(tol));
}

fn custom_path(custom: &CustomPath, w: f64, h: f64, tol: f64) -> Option<PathDescriptor> {
    let mut path = BezPath::new();
    let mut current = Point::ZERO;
    let mut open = false;
    let at = |x: f64, y: f64| Point::new(x * w, y * h);

    for cmd in &custom.commands {
        match *cmd {
            PathCommand::MoveTo { x, y } => {
                current = at(x, y);
                path.move_to(current);
                open = true;
            }
            PathCommand::LineTo { x, y } => {
                ensure_open(&mut path, &mut open, current);
                current = at(x, y);
                path.line_to(current);
            }
            PathCommand::CubicTo {
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => {
                ensure_open(&mut path, &mut open, current);
                current = at(x, y);
                path.curve_to(at(x1, y1), at(x2, y2), current);
            }
            PathCommand::QuadTo { x1, y1, x, y } => {
                ensure_open(&mut path, &mut open, current);
                current = at(x, y);
                path.quad_to(at(x1, y1), current);
            }
            PathCommand::ArcTo {
                wr,
                hr,
                st_ang,
                sw_ang,
            } => {
                ensure_open(&mut path, &mut open, current);
                let radii = Vec2::new(wr * w, hr * h);
                let t0 = param_angle(radii.x, radii.y, st_ang);
                let center = Point::new(current.x - radii.x * t0.cos(), current.y - radii.y * t0.sin());
                ellipse_arc(&mut path, center, radii, st_ang, sw_ang, tol);
                let t1 = param_angle(radii.x, radii.y, st_ang + sw_ang);
                current = Point::new(center.x + radii.x * t1.cos(), center.y + radii.y * t1.sin());
            }
            PathCommand::Close => {
                if open {
                    path.close_path();
                    open = false;
                }
            }
        }
    }

    if path.elements().is_empty() {
        return None;
    }
    Some(PathDescriptor {
        path,
        fill: custom.fill,
        stroke: custom.stroke,
        fill_rule: FillRule::NonZero,
    })
}

/// Drawing commands without a preceding `moveTo` start at the current point.
fn ensure_open(path: &mut BezPath, open: &mut bool, current: Point) {
    if !*open {
        path.move_to(current);
        *open = true;
    }
}

/// A sub-path with its final paints.
#[derive(Debug, Clone)]
pub struct ShapePath {
    pub path: BezPath,
    pub fill: Paint,
    pub stroke: Option<LineStyle>,
    pub fill_rule: FillRule,
}

/// Shading used for `darken`/`lighten` sub-paths.
pub fn fill_mode_modifier(mode: PathFillMode) -> Option<ColorModifier> {
    match mode {
        PathFillMode::Darken => Some(ColorModifier::Shade(60_000)),
        PathFillMode::DarkenLess => Some(ColorModifier::Shade(80_000)),
        PathFillMode::Lighten => Some(ColorModifier::Tint(60_000)),
        PathFillMode::LightenLess => Some(ColorModifier::Tint(80_000)),
        PathFillMode::Norm | PathFillMode::None => None,
    }
}

/// Assigns the shape's fill and line to each sub-path, honoring the
/// per-path fill mode and stroke flag.
pub fn attribute_paths(paths: &[PathDescriptor], fill: &Paint, line: &LineStyle) -> Vec<ShapePath> {
    paths
        .iter()
        .map(|desc| {
            let fill = match desc.fill {
                PathFillMode::None => Paint::Transparent,
                PathFillMode::Norm => fill.clone(),
                mode => match fill_mode_modifier(mode) {
                    Some(m) => fill.modified(&[m]),
                    None => fill.clone(),
                },
            };
            ShapePath {
                path: desc.path.clone(),
                fill,
                stroke: (desc.stroke && line.is_visible()).then(|| line.clone()),
                fill_rule: desc.fill_rule,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ResolvedColor;

    #[test]
    fn zero_height_connector_keeps_unit_box() {
        let geo = Geometry::preset("straightConnector1");
        let resolved = resolve_geometry(Some(&geo), Size::new(120.0, 0.0));
        assert_eq!(resolved.size, Size::new(120.0, 1.0));
        assert_eq!(resolved.paths.len(), 1);
        assert_eq!(resolved.paths[0].fill, PathFillMode::None);
    }

    #[test]
    fn unknown_preset_falls_back_to_rect() {
        let geo = Geometry::preset("notARealShape");
        let resolved = resolve_geometry(Some(&geo), Size::new(10.0, 20.0));
        let bounds = resolved.paths[0].path.bounding_box();
        assert_eq!(bounds, Rect::new(0.0, 0.0, 10.0, 20.0));
    }

    #[test]
    fn custom_arc_ends_on_ellipse() {
        let geo = Geometry::Custom {
            paths: vec![CustomPath {
                fill: PathFillMode::Norm,
                stroke: true,
                commands: vec![
                    PathCommand::MoveTo { x: 1.0, y: 0.5 },
                    PathCommand::ArcTo {
                        wr: 0.5,
                        hr: 0.5,
                        st_ang: 0.0,
                        sw_ang: 90.0,
                    },
                    PathCommand::Close,
                ],
            }],
        };
        let resolved = resolve_geometry(Some(&geo), Size::new(100.0, 100.0));
        let bounds = resolved.paths[0].path.bounding_box();
        // Quarter circle from (100, 50) clockwise to (50, 100).
        assert!((bounds.x0 - 50.0).abs() < 0.5);
        assert!((bounds.y1 - 100.0).abs() < 0.5);
    }

    #[test]
    fn darken_paths_are_shaded() {
        let paths = vec![
            PathDescriptor::filled(BezPath::new()),
            PathDescriptor::filled(BezPath::new())
                .with_fill(PathFillMode::Darken)
                .without_stroke(),
        ];
        let fill = Paint::Solid(ResolvedColor::rgb(200, 100, 50));
        let line = LineStyle {
            width: 1.0,
            paint: Paint::Solid(ResolvedColor::BLACK),
            ..LineStyle::none()
        };
        let out = attribute_paths(&paths, &fill, &line);
        assert_eq!(out[0].fill, fill);
        assert_eq!(out[1].fill, Paint::Solid(ResolvedColor::rgb(120, 60, 30)));
        assert!(out[0].stroke.is_some());
        assert!(out[1].stroke.is_none());
    }
}
