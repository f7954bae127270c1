//! Preset geometry catalogue. Each preset is built directly in shape space
//! (`0..w`, `0..h`) from its adjust values.

use crate::geometry::{ellipse_arc, FillRule, PathDescriptor};
use deck_data::{AdjustValue, PathFillMode};
use kurbo::{Affine, BezPath, Ellipse, Point, Rect, RoundedRect, Shape as _, Vec2};

/// Adjust values with the preset's defaults.
struct Adjust<'a>(&'a [AdjustValue]);

impl Adjust<'_> {
    /// Raw OOXML value, e.g. `50000` for half of the reference length.
    fn get(&self, name: &str, default: i64) -> f64 {
        self.0
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.val)
            .unwrap_or(default) as f64
    }

    /// `get` interpreted as a fraction of 100000, clamped to `[0, max]`.
    fn frac(&self, name: &str, default: i64, max: f64) -> f64 {
        (self.get(name, default) / 100_000.0).clamp(0.0, max)
    }

    /// `get` interpreted as an angle in 60000ths of a degree.
    fn angle(&self, name: &str, default: i64) -> f64 {
        self.get(name, default) / 60_000.0
    }
}

fn polygon(points: &[(f64, f64)]) -> BezPath {
    let mut path = BezPath::new();
    if let Some((first, rest)) = points.split_first() {
        path.move_to(*first);
        for p in rest {
            path.line_to(*p);
        }
        path.close_path();
    }
    path
}

fn polyline(points: &[(f64, f64)]) -> BezPath {
    let mut path = BezPath::new();
    if let Some((first, rest)) = points.split_first() {
        path.move_to(*first);
        for p in rest {
            path.line_to(*p);
        }
    }
    path
}

fn ellipse(cx: f64, cy: f64, rx: f64, ry: f64, tol: f64) -> BezPath {
    Ellipse::new((cx, cy), (rx.max(0.0), ry.max(0.0)), 0.0).to_path(tol)
}

fn on_ellipse(center: Point, radii: Vec2, deg: f64) -> Point {
    let t = crate::geometry::param_angle(radii.x, radii.y, deg);
    Point::new(center.x + radii.x * t.cos(), center.y + radii.y * t.sin())
}

fn merged(paths: impl IntoIterator<Item = BezPath>) -> BezPath {
    let mut out = BezPath::new();
    for p in paths {
        out.extend(p.elements().iter().copied());
    }
    out
}

fn single(path: BezPath) -> Vec<PathDescriptor> {
    vec![PathDescriptor::filled(path)]
}

fn open(path: BezPath) -> Vec<PathDescriptor> {
    vec![PathDescriptor::outline(path)]
}

fn regular_polygon(n: usize, w: f64, h: f64) -> BezPath {
    let points: Vec<(f64, f64)> = (0..n)
        .map(|i| {
            let a = (-90.0 + i as f64 * 360.0 / n as f64).to_radians();
            (w / 2.0 + w / 2.0 * a.cos(), h / 2.0 + h / 2.0 * a.sin())
        })
        .collect();
    polygon(&points)
}

fn star(points: usize, inner_ratio: f64, w: f64, h: f64) -> BezPath {
    let (hc, vc) = (w / 2.0, h / 2.0);
    let vertices: Vec<(f64, f64)> = (0..points * 2)
        .map(|i| {
            let a = (-90.0 + i as f64 * 180.0 / points as f64).to_radians();
            let r = if i % 2 == 0 { 1.0 } else { inner_ratio };
            (hc + hc * r * a.cos(), vc + vc * r * a.sin())
        })
        .collect();
    polygon(&vertices)
}

/// Straight block arrow pointing along +u in a `len x thick` frame.
fn block_arrow(len: f64, thick: f64, shaft: f64, head: f64) -> Vec<(f64, f64)> {
    let y1 = thick / 2.0 - thick * shaft / 2.0;
    let y2 = thick / 2.0 + thick * shaft / 2.0;
    let x1 = (len - head).max(0.0);
    vec![
        (0.0, y1),
        (x1, y1),
        (x1, 0.0),
        (len, thick / 2.0),
        (x1, thick),
        (x1, y2),
        (0.0, y2),
    ]
}

fn double_arrow(len: f64, thick: f64, shaft: f64, head: f64) -> Vec<(f64, f64)> {
    let y1 = thick / 2.0 - thick * shaft / 2.0;
    let y2 = thick / 2.0 + thick * shaft / 2.0;
    let x1 = head.min(len / 2.0);
    let x2 = len - x1;
    vec![
        (0.0, thick / 2.0),
        (x1, 0.0),
        (x1, y1),
        (x2, y1),
        (x2, 0.0),
        (len, thick / 2.0),
        (x2, thick),
        (x2, y2),
        (x1, y2),
        (x1, thick),
    ]
}

/// `(u, v)` frame point to shape space.
#[derive(Clone, Copy)]
enum Orient {
    Right,
    Left,
    Down,
    Up,
}

impl Orient {
    fn frame(self, w: f64, h: f64) -> (f64, f64) {
        match self {
            Orient::Right | Orient::Left => (w, h),
            Orient::Down | Orient::Up => (h, w),
        }
    }

    fn affine(self, w: f64, h: f64) -> Affine {
        match self {
            Orient::Right => Affine::IDENTITY,
            Orient::Left => Affine::new([-1.0, 0.0, 0.0, 1.0, w, 0.0]),
            Orient::Down => Affine::new([0.0, 1.0, 1.0, 0.0, 0.0, 0.0]),
            Orient::Up => Affine::new([0.0, -1.0, 1.0, 0.0, 0.0, h]),
        }
    }

    fn map(self, points: &[(f64, f64)], w: f64, h: f64) -> Vec<(f64, f64)> {
        let affine = self.affine(w, h);
        points
            .iter()
            .map(|&(u, v)| {
                let p = affine * Point::new(u, v);
                (p.x, p.y)
            })
            .collect()
    }
}

fn curved_arrow(orient: Orient, adj: &Adjust, w: f64, h: f64, tol: f64) -> Vec<PathDescriptor> {
    let (cw, ch) = orient.frame(w, h);
    let ss = cw.min(ch);
    let thickness = ss * adj.frac("adj1", 25_000, 1.0);
    let head_width = (ss * adj.frac("adj2", 50_000, 1.0) / 2.0).max(thickness / 2.0);
    let head_len = (ss * adj.frac("adj3", 25_000, 1.0)).min(cw);

    // Centerline: half ellipse hugging the leading edge, from top to bottom.
    let center = Point::new(cw - head_len, ch / 2.0);
    let rx = (cw - head_len).max(thickness / 2.0);
    let ry = (ch / 2.0 - head_width).max(thickness / 2.0);
    let outer = Vec2::new(rx + thickness / 2.0, ry + thickness / 2.0);
    let inner = Vec2::new((rx - thickness / 2.0).max(0.0), (ry - thickness / 2.0).max(0.0));

    let mut path = BezPath::new();
    path.move_to(on_ellipse(center, outer, 270.0));
    ellipse_arc(&mut path, center, outer, 270.0, -180.0, tol);
    let tip_y = center.y + ry;
    path.line_to((center.x, tip_y + head_width));
    path.line_to((cw, tip_y));
    path.line_to((center.x, tip_y - head_width));
    path.line_to(on_ellipse(center, inner, 90.0));
    ellipse_arc(&mut path, center, inner, 90.0, 180.0, tol);
    path.close_path();
    path.apply_affine(orient.affine(w, h));

    vec![PathDescriptor::filled(path).with_rule(FillRule::EvenOdd)]
}

fn circular_arrow(adj: &Adjust, w: f64, h: f64, tol: f64) -> Vec<PathDescriptor> {
    let ss = w.min(h);
    let thickness = ss * adj.frac("adj1", 12_500, 0.25);
    let head_angle = adj.angle("adj2", 1_142_319).clamp(0.0, 90.0);
    let end = adj.angle("adj3", 20_457_681);
    let start = adj.angle("adj4", 10_800_000);
    let wing = (ss * adj.frac("adj5", 12_500, 0.25)).max(thickness);

    let center = Point::new(w / 2.0, h / 2.0);
    let mid = Vec2::new(
        (w / 2.0 - wing).max(thickness),
        (h / 2.0 - wing).max(thickness),
    );
    let half = thickness / 2.0;
    let outer = Vec2::new(mid.x + half, mid.y + half);
    let inner = Vec2::new((mid.x - half).max(0.0), (mid.y - half).max(0.0));

    let sweep = (end - start).rem_euclid(360.0);
    let band = (sweep - head_angle).max(0.0);
    let head_start = start + band;

    let mut path = BezPath::new();
    path.move_to(on_ellipse(center, outer, start));
    ellipse_arc(&mut path, center, outer, start, band, tol);
    path.line_to(on_ellipse(center, Vec2::new(mid.x + wing, mid.y + wing), head_start));
    path.line_to(on_ellipse(center, mid, end));
    path.line_to(on_ellipse(
        center,
        Vec2::new((mid.x - wing).max(0.0), (mid.y - wing).max(0.0)),
        head_start,
    ));
    path.line_to(on_ellipse(center, inner, head_start));
    ellipse_arc(&mut path, center, inner, head_start, -band, tol);
    path.close_path();

    vec![PathDescriptor::filled(path).with_rule(FillRule::EvenOdd)]
}

fn action_button(icon: Option<BezPath>, w: f64, h: f64, tol: f64) -> Vec<PathDescriptor> {
    let frame = Rect::new(0.0, 0.0, w, h).to_path(tol);
    let Some(icon) = icon else {
        return single(frame);
    };
    vec![
        PathDescriptor::filled(frame.clone()).without_stroke(),
        PathDescriptor::filled(icon.clone())
            .with_fill(PathFillMode::Darken)
            .without_stroke(),
        PathDescriptor::outline(merged([frame, icon])),
    ]
}

fn action_icon(name: &str, w: f64, h: f64) -> Option<BezPath> {
    let (hc, vc) = (w / 2.0, h / 2.0);
    let g = w.min(h) * 3.0 / 8.0;
    let path = match name {
        "actionButtonHome" => polygon(&[
            (hc, vc - g),
            (hc + g, vc),
            (hc + 0.7 * g, vc),
            (hc + 0.7 * g, vc + g),
            (hc - 0.7 * g, vc + g),
            (hc - 0.7 * g, vc),
            (hc - g, vc),
        ]),
        "actionButtonForwardNext" => polygon(&[(hc - g, vc - g), (hc + g, vc), (hc - g, vc + g)]),
        "actionButtonBackPrevious" => polygon(&[(hc + g, vc - g), (hc - g, vc), (hc + g, vc + g)]),
        "actionButtonBeginning" => merged([
            polygon(&[
                (hc - g, vc - g),
                (hc - 0.6 * g, vc - g),
                (hc - 0.6 * g, vc + g),
                (hc - g, vc + g),
            ]),
            polygon(&[(hc + g, vc - g), (hc - 0.4 * g, vc), (hc + g, vc + g)]),
        ]),
        "actionButtonEnd" => merged([
            polygon(&[(hc - g, vc - g), (hc + 0.4 * g, vc), (hc - g, vc + g)]),
            polygon(&[
                (hc + 0.6 * g, vc - g),
                (hc + g, vc - g),
                (hc + g, vc + g),
                (hc + 0.6 * g, vc + g),
            ]),
        ]),
        _ => return None,
    };
    Some(path)
}

/// Builds a preset. `None` for names outside the catalogue.
pub fn preset_paths(
    name: &str,
    adjust: &[AdjustValue],
    w: f64,
    h: f64,
    tol: f64,
) -> Option<Vec<PathDescriptor>> {
    let adj = Adjust(adjust);
    let ss = w.min(h);
    let (hc, vc) = (w / 2.0, h / 2.0);

    let paths = match name {
        "rect" | "flowChartProcess" => single(Rect::new(0.0, 0.0, w, h).to_path(tol)),
        "roundRect" => {
            let r = ss * adj.frac("adj", 16_667, 0.5);
            single(RoundedRect::new(0.0, 0.0, w, h, r).to_path(tol))
        }
        "flowChartAlternateProcess" => {
            single(RoundedRect::new(0.0, 0.0, w, h, ss / 6.0).to_path(tol))
        }
        "flowChartTerminator" => single(RoundedRect::new(0.0, 0.0, w, h, ss / 2.0).to_path(tol)),
        "ellipse" | "flowChartConnector" => single(ellipse(hc, vc, hc, vc, tol)),
        "triangle" => {
            let x = w * adj.frac("adj", 50_000, 1.0);
            single(polygon(&[(x, 0.0), (w, h), (0.0, h)]))
        }
        "rtTriangle" => single(polygon(&[(0.0, 0.0), (w, h), (0.0, h)])),
        "diamond" | "flowChartDecision" => {
            single(polygon(&[(hc, 0.0), (w, vc), (hc, h), (0.0, vc)]))
        }
        "parallelogram" => {
            let x1 = (ss * adj.frac("adj", 25_000, 1.0)).min(w);
            single(polygon(&[(x1, 0.0), (w, 0.0), (w - x1, h), (0.0, h)]))
        }
        "trapezoid" => {
            let x1 = (ss * adj.frac("adj", 25_000, 1.0)).min(hc);
            single(polygon(&[(0.0, h), (x1, 0.0), (w - x1, 0.0), (w, h)]))
        }
        "pentagon" => single(regular_polygon(5, w, h)),
        "hexagon" => {
            let x1 = (ss * adj.frac("adj", 25_000, 1.0)).min(hc);
            single(polygon(&[
                (0.0, vc),
                (x1, 0.0),
                (w - x1, 0.0),
                (w, vc),
                (w - x1, h),
                (x1, h),
            ]))
        }
        "heptagon" => single(regular_polygon(7, w, h)),
        "octagon" => {
            let x1 = (ss * adj.frac("adj", 29_289, 0.5)).min(hc).min(vc);
            single(polygon(&[
                (x1, 0.0),
                (w - x1, 0.0),
                (w, x1),
                (w, h - x1),
                (w - x1, h),
                (x1, h),
                (0.0, h - x1),
                (0.0, x1),
            ]))
        }
        "decagon" => single(regular_polygon(10, w, h)),
        "dodecagon" => single(regular_polygon(12, w, h)),
        "plus" => {
            let x1 = (ss * adj.frac("adj", 25_000, 0.5)).min(hc).min(vc);
            let (x2, y2) = (w - x1, h - x1);
            single(polygon(&[
                (0.0, x1),
                (x1, x1),
                (x1, 0.0),
                (x2, 0.0),
                (x2, x1),
                (w, x1),
                (w, y2),
                (x2, y2),
                (x2, h),
                (x1, h),
                (x1, y2),
                (0.0, y2),
            ]))
        }
        "star4" | "star5" | "star6" | "star8" | "star10" | "star12" => {
            let (points, default) = match name {
                "star4" => (4, 12_500),
                "star5" => (5, 19_098),
                "star6" => (6, 28_868),
                "star8" => (8, 37_500),
                "star10" => (10, 42_533),
                _ => (12, 37_500),
            };
            let ratio = (adj.get("adj", default) / 50_000.0).clamp(0.0, 1.0);
            single(star(points, ratio, w, h))
        }
        "rightArrow" | "leftArrow" | "downArrow" | "upArrow" => {
            let orient = match name {
                "rightArrow" => Orient::Right,
                "leftArrow" => Orient::Left,
                "downArrow" => Orient::Down,
                _ => Orient::Up,
            };
            let (len, thick) = orient.frame(w, h);
            let head = ss * adj.frac("adj2", 50_000, 10.0);
            let points = block_arrow(len, thick, adj.frac("adj1", 50_000, 1.0), head);
            single(polygon(&orient.map(&points, w, h)))
        }
        "leftRightArrow" | "upDownArrow" => {
            let orient = if name == "leftRightArrow" {
                Orient::Right
            } else {
                Orient::Down
            };
            let (len, thick) = orient.frame(w, h);
            let head = ss * adj.frac("adj2", 50_000, 10.0);
            let points = double_arrow(len, thick, adj.frac("adj1", 50_000, 1.0), head);
            single(polygon(&orient.map(&points, w, h)))
        }
        "chevron" => {
            let x1 = (ss * adj.frac("adj", 50_000, 10.0)).min(w);
            single(polygon(&[
                (0.0, 0.0),
                (w - x1, 0.0),
                (w, vc),
                (w - x1, h),
                (0.0, h),
                (x1, vc),
            ]))
        }
        "homePlate" => {
            let x1 = (ss * adj.frac("adj", 50_000, 10.0)).min(w);
            single(polygon(&[
                (0.0, 0.0),
                (w - x1, 0.0),
                (w, vc),
                (w - x1, h),
                (0.0, h),
            ]))
        }
        "frame" => {
            let d = (ss * adj.frac("adj1", 12_500, 0.5)).min(hc).min(vc);
            let path = merged([
                Rect::new(0.0, 0.0, w, h).to_path(tol),
                Rect::new(d, d, w - d, h - d).to_path(tol),
            ]);
            vec![PathDescriptor::filled(path).with_rule(FillRule::EvenOdd)]
        }
        "donut" => {
            let d = (ss * adj.frac("adj", 25_000, 0.5)).min(hc).min(vc);
            let path = merged([
                ellipse(hc, vc, hc, vc, tol),
                ellipse(hc, vc, hc - d, vc - d, tol),
            ]);
            vec![PathDescriptor::filled(path).with_rule(FillRule::EvenOdd)]
        }
        "heart" => {
            let dx1 = w * 49.0 / 48.0;
            let dx2 = w * 10.0 / 48.0;
            let y1 = -h / 3.0;
            let mut path = BezPath::new();
            path.move_to((hc, h / 4.0));
            path.curve_to((hc + dx2, y1), (hc + dx1, h / 4.0), (hc, h));
            path.curve_to((hc - dx1, h / 4.0), (hc - dx2, y1), (hc, h / 4.0));
            path.close_path();
            single(path)
        }
        "pie" => {
            let start = adj.angle("adj1", 0);
            let sweep = pie_sweep(start, adj.angle("adj2", 16_200_000));
            single(pie_path(Point::new(hc, vc), Vec2::new(hc, vc), start, sweep, tol))
        }
        "arc" => {
            let start = adj.angle("adj1", 16_200_000);
            let sweep = pie_sweep(start, adj.angle("adj2", 0));
            let center = Point::new(hc, vc);
            let radii = Vec2::new(hc, vc);
            let mut stroke = BezPath::new();
            stroke.move_to(on_ellipse(center, radii, start));
            ellipse_arc(&mut stroke, center, radii, start, sweep, tol);
            vec![
                PathDescriptor::filled(pie_path(center, radii, start, sweep, tol))
                    .without_stroke(),
                PathDescriptor::outline(stroke),
            ]
        }
        "blockArc" => {
            let start = adj.angle("adj1", 10_800_000);
            let sweep = pie_sweep(start, adj.angle("adj2", 0));
            let d = (ss * adj.frac("adj3", 25_000, 0.5)).min(hc).min(vc);
            let center = Point::new(hc, vc);
            let outer = Vec2::new(hc, vc);
            let inner = Vec2::new(hc - d, vc - d);
            let mut path = BezPath::new();
            path.move_to(on_ellipse(center, outer, start));
            ellipse_arc(&mut path, center, outer, start, sweep, tol);
            path.line_to(on_ellipse(center, inner, start + sweep));
            ellipse_arc(&mut path, center, inner, start + sweep, -sweep, tol);
            path.close_path();
            single(path)
        }
        "can" => {
            let ry = (ss * adj.frac("adj", 25_000, 0.5) / 2.0).min(vc);
            let radii = Vec2::new(hc, ry);
            let top = Point::new(hc, ry);
            let bottom = Point::new(hc, h - ry);

            let mut body = BezPath::new();
            body.move_to((0.0, ry));
            body.line_to((0.0, h - ry));
            ellipse_arc(&mut body, bottom, radii, 180.0, -180.0, tol);
            body.line_to((w, ry));
            ellipse_arc(&mut body, top, radii, 0.0, 180.0, tol);
            body.close_path();

            let lid = ellipse(hc, ry, hc, ry, tol);
            vec![
                PathDescriptor::filled(body.clone()).without_stroke(),
                PathDescriptor::filled(lid.clone())
                    .with_fill(PathFillMode::Lighten)
                    .without_stroke(),
                PathDescriptor::outline(merged([body, lid])),
            ]
        }
        "cube" => {
            let d = (ss * adj.frac("adj", 25_000, 1.0)).min(w).min(h);
            let front = polygon(&[(0.0, d), (w - d, d), (w - d, h), (0.0, h)]);
            let top = polygon(&[(0.0, d), (d, 0.0), (w, 0.0), (w - d, d)]);
            let side = polygon(&[(w - d, d), (w, 0.0), (w, h - d), (w - d, h)]);
            vec![
                PathDescriptor::filled(front.clone()).without_stroke(),
                PathDescriptor::filled(top.clone())
                    .with_fill(PathFillMode::LightenLess)
                    .without_stroke(),
                PathDescriptor::filled(side.clone())
                    .with_fill(PathFillMode::DarkenLess)
                    .without_stroke(),
                PathDescriptor::outline(merged([front, top, side])),
            ]
        }
        "line" | "straightConnector1" => open(polyline(&[(0.0, 0.0), (w, h)])),
        "bentConnector2" => open(polyline(&[(0.0, 0.0), (w, 0.0), (w, h)])),
        "bentConnector3" => {
            let x1 = w * adj.get("adj1", 50_000) / 100_000.0;
            open(polyline(&[(0.0, 0.0), (x1, 0.0), (x1, h), (w, h)]))
        }
        "curvedConnector3" => {
            let x1 = w * adj.get("adj1", 50_000) / 100_000.0;
            let mut path = BezPath::new();
            path.move_to((0.0, 0.0));
            path.curve_to((x1 / 2.0, 0.0), (x1, h / 4.0), (x1, vc));
            path.curve_to((x1, h * 3.0 / 4.0), ((x1 + w) / 2.0, h), (w, h));
            open(path)
        }
        "circularArrow" => circular_arrow(&adj, w, h, tol),
        "curvedRightArrow" => curved_arrow(Orient::Right, &adj, w, h, tol),
        "curvedLeftArrow" => curved_arrow(Orient::Left, &adj, w, h, tol),
        "curvedDownArrow" => curved_arrow(Orient::Down, &adj, w, h, tol),
        "curvedUpArrow" => curved_arrow(Orient::Up, &adj, w, h, tol),
        "actionButtonBlank" | "actionButtonHome" | "actionButtonForwardNext"
        | "actionButtonBackPrevious" | "actionButtonBeginning" | "actionButtonEnd" => {
            action_button(action_icon(name, w, h), w, h, tol)
        }
        _ => return None,
    };
    Some(paths)
}

/// Clockwise sweep from `start` to `end`; equal angles sweep a full turn.
fn pie_sweep(start: f64, end: f64) -> f64 {
    let sweep = (end - start).rem_euclid(360.0);
    if sweep == 0.0 {
        360.0
    } else {
        sweep
    }
}

fn pie_path(center: Point, radii: Vec2, start: f64, sweep: f64, tol: f64) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(center);
    path.line_to(on_ellipse(center, radii, start));
    ellipse_arc(&mut path, center, radii, start, sweep, tol);
    path.close_path();
    path
}

pub fn is_curved_arrow(name: &str) -> bool {
    matches!(
        name,
        "circularArrow" | "curvedRightArrow" | "curvedLeftArrow" | "curvedUpArrow" | "curvedDownArrow"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 0.1;

    #[test]
    fn curved_arrows_use_even_odd() {
        for name in [
            "circularArrow",
            "curvedRightArrow",
            "curvedLeftArrow",
            "curvedUpArrow",
            "curvedDownArrow",
        ] {
            let paths = preset_paths(name, &[], 200.0, 100.0, TOL).unwrap();
            assert!(paths.iter().all(|p| p.fill_rule == FillRule::EvenOdd), "{name}");
            assert!(is_curved_arrow(name));
        }
    }

    #[test]
    fn can_is_layered() {
        let paths = preset_paths("can", &[], 100.0, 200.0, TOL).unwrap();
        assert_eq!(paths.len(), 3);
        assert_eq!(paths[1].fill, PathFillMode::Lighten);
        assert_eq!(paths[2].fill, PathFillMode::None);
        assert!(paths[2].stroke);
        assert!(!paths[0].stroke);
    }

    #[test]
    fn action_button_icon_is_darkened() {
        let paths = preset_paths("actionButtonHome", &[], 80.0, 80.0, TOL).unwrap();
        assert_eq!(paths.len(), 3);
        assert_eq!(paths[1].fill, PathFillMode::Darken);
        let blank = preset_paths("actionButtonBlank", &[], 80.0, 80.0, TOL).unwrap();
        assert_eq!(blank.len(), 1);
    }

    #[test]
    fn right_arrow_tip_touches_right_edge() {
        let paths = preset_paths("rightArrow", &[], 200.0, 100.0, TOL).unwrap();
        let bounds = paths[0].path.bounding_box();
        assert!((bounds.x1 - 200.0).abs() < 1e-9);
        assert!((bounds.y1 - 100.0).abs() < 1e-9);
    }

    #[test]
    fn adjust_values_override_defaults() {
        let adj = [AdjustValue {
            name: "adj".into(),
            val: 0,
        }];
        let paths = preset_paths("triangle", &adj, 100.0, 100.0, TOL).unwrap();
        let first = paths[0].path.elements()[0];
        assert_eq!(first, kurbo::PathEl::MoveTo(Point::new(0.0, 0.0)));
    }

    #[test]
    fn unknown_preset_is_none() {
        assert!(preset_paths("wavyThing", &[], 10.0, 10.0, TOL).is_none());
    }
}
