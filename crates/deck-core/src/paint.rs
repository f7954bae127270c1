use crate::color::{resolve_color, ResolvedColor};
use crate::context::RenderContext;
use crate::media::{resolve_blip, ImagePaint};
use crate::pattern::{resolve_pattern, PatternPaint};
use deck_data::{ColorModifier, Fill, GradientFill, GradientShade, PathShadeType, StyleRef};
use glam::DVec2;

/// A resolved fill or stroke paint.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    /// No explicit fill: let whatever is underneath show through.
    Empty,
    /// Explicit `noFill`.
    Transparent,
    Solid(ResolvedColor),
    LinearGradient(LinearGradient),
    RadialGradient(RadialGradient),
    Pattern(PatternPaint),
    Image(ImagePaint),
}

impl Paint {
    pub fn is_visible(&self) -> bool {
        match self {
            Paint::Empty | Paint::Transparent => false,
            Paint::Solid(c) => c.alpha > 0.0,
            _ => true,
        }
    }

    pub fn solid_color(&self) -> Option<ResolvedColor> {
        match self {
            Paint::Solid(c) => Some(*c),
            _ => None,
        }
    }

    /// Applies color modifiers to every color this paint carries. Image
    /// paints are returned unchanged.
    pub fn modified(&self, mods: &[ColorModifier]) -> Paint {
        match self {
            Paint::Solid(c) => Paint::Solid(c.modified(mods)),
            Paint::LinearGradient(g) => Paint::LinearGradient(LinearGradient {
                stops: modify_stops(&g.stops, mods),
                ..g.clone()
            }),
            Paint::RadialGradient(g) => Paint::RadialGradient(RadialGradient {
                stops: modify_stops(&g.stops, mods),
                ..g.clone()
            }),
            Paint::Pattern(p) => Paint::Pattern(p.map_colors(|c| c.modified(mods))),
            other => other.clone(),
        }
    }
}

fn modify_stops(stops: &[GradientStop], mods: &[ColorModifier]) -> Vec<GradientStop> {
    stops
        .iter()
        .map(|s| GradientStop {
            offset: s.offset,
            color: s.color.modified(mods),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    /// `0.0..=1.0`, non-decreasing within a gradient.
    pub offset: f64,
    pub color: ResolvedColor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    /// Degrees clockwise from the positive x axis.
    pub angle: f64,
    pub scaled: bool,
    pub rotate_with_shape: bool,
    pub stops: Vec<GradientStop>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadialShape {
    Circle,
    Rect,
    Shape,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    pub shape: RadialShape,
    /// Center in fractions of the shape box.
    pub center: DVec2,
    pub rotate_with_shape: bool,
    pub stops: Vec<GradientStop>,
}

/// Resolves a container's fill. `None` means the container declared nothing.
pub fn resolve_fill(fill: Option<&Fill>, ctx: &RenderContext) -> Paint {
    let Some(fill) = fill else {
        return Paint::Empty;
    };
    match fill {
        Fill::None => Paint::Transparent,
        Fill::Solid { color } => Paint::Solid(*resolve_color(color, ctx)),
        Fill::Gradient(gradient) => resolve_gradient(gradient, ctx),
        Fill::Pattern(pattern) => Paint::Pattern(resolve_pattern(pattern, ctx)),
        Fill::Blip(blip) => Paint::Image(resolve_blip(blip, ctx)),
        Fill::Group => match ctx.group_fill {
            // The exposed group fill is always concrete; clear it so a
            // malformed model cannot loop.
            Some(group_fill) => resolve_fill(Some(group_fill), &ctx.with_group_fill(None)),
            None => Paint::Empty,
        },
    }
}

pub fn resolve_gradient(gradient: &GradientFill, ctx: &RenderContext) -> Paint {
    let mut stops: Vec<GradientStop> = gradient
        .stops
        .iter()
        .map(|s| GradientStop {
            offset: (s.pos as f64 / 100_000.0).clamp(0.0, 1.0),
            color: *resolve_color(&s.color, ctx),
        })
        .collect();
    stops.sort_by(|a, b| a.offset.total_cmp(&b.offset));

    match &gradient.shade {
        GradientShade::Linear { angle, scaled } => Paint::LinearGradient(LinearGradient {
            angle: *angle,
            scaled: *scaled,
            rotate_with_shape: gradient.rot_with_shape,
            stops,
        }),
        GradientShade::Path { path, fill_to_rect } => {
            let center = match fill_to_rect {
                Some(r) => {
                    let f = |v: i32| v as f64 / 100_000.0;
                    DVec2::new((f(r.l) + (1.0 - f(r.r))) / 2.0, (f(r.t) + (1.0 - f(r.b))) / 2.0)
                }
                None => DVec2::splat(0.5),
            };
            Paint::RadialGradient(RadialGradient {
                shape: match path {
                    PathShadeType::Circle => RadialShape::Circle,
                    PathShadeType::Rect => RadialShape::Rect,
                    PathShadeType::Shape => RadialShape::Shape,
                },
                center,
                rotate_with_shape: gradient.rot_with_shape,
                stops,
            })
        }
    }
}

/// `fillRef`: 0 is transparent, 1..=999 index `fillStyles`, 1001 and up
/// index `bgFillStyles`. The reference color stands in for `phClr`.
pub fn resolve_fill_ref(style_ref: &StyleRef, ctx: &RenderContext) -> Paint {
    let styles = &ctx.theme.format_scheme;
    let entry = match style_ref.idx {
        0 => return Paint::Transparent,
        idx @ 1..=999 => styles.fill_styles.get(idx as usize - 1),
        1000 => None,
        idx => styles.bg_fill_styles.get(idx as usize - 1001),
    };
    match entry {
        Some(fill) => resolve_fill(Some(fill), &style_ctx(style_ref, ctx)),
        None => {
            tracing::debug!(idx = style_ref.idx, "fill style reference out of range");
            Paint::Empty
        }
    }
}

/// Context for resolving a theme style entry: `phClr` becomes the
/// reference color.
pub(crate) fn style_ctx<'a>(style_ref: &StyleRef, ctx: &RenderContext<'a>) -> RenderContext<'a> {
    let color = style_ref
        .color
        .as_ref()
        .map(|c| crate::color::compute_color(c, ctx));
    ctx.with_placeholder_color(color.or(ctx.placeholder_color))
}

/// Explicit fill, else the shape style's `fillRef`, else nothing.
pub fn shape_fill(fill: Option<&Fill>, fill_ref: Option<&StyleRef>, ctx: &RenderContext) -> Paint {
    match (fill, fill_ref) {
        (Some(fill), _) => resolve_fill(Some(fill), ctx),
        (None, Some(style_ref)) => resolve_fill_ref(style_ref, ctx),
        (None, None) => Paint::Empty,
    }
}
