use crate::color::{resolve_color, ResolvedColor};
use crate::context::RenderContext;
use crate::paint::style_ctx;
use deck_data::{EffectList, OuterShadow, RectAlignment, Reflection, StyleRef};
use glam::DVec2;
use kurbo::Size;

#[derive(Debug, Clone, PartialEq)]
pub struct ShadowEffect {
    pub color: ResolvedColor,
    pub blur: f64,
    /// Total displacement of the shadow box center (px).
    pub offset: DVec2,
    /// Growth of the shadow box on each side (px), from `sx`/`sy`.
    pub spread: DVec2,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReflectionEffect {
    pub blur: f64,
    /// Gap between the shape's bottom edge and the mirrored copy (px).
    pub distance: f64,
    pub start_alpha: f64,
    pub end_alpha: f64,
    /// Fraction of the copy over which the fade runs.
    pub end_position: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedEffects {
    pub shadow: Option<ShadowEffect>,
    pub reflection: Option<ReflectionEffect>,
}

impl ResolvedEffects {
    pub fn is_empty(&self) -> bool {
        self.shadow.is_none() && self.reflection.is_none()
    }
}

/// Explicit effect list, else the theme effect style named by `effectRef`.
/// An explicit (even empty) list always wins; `effectRef idx = 0` means none.
pub fn resolve_effects(
    effects: Option<&EffectList>,
    effect_ref: Option<&StyleRef>,
    size: Size,
    ctx: &RenderContext,
) -> ResolvedEffects {
    if let Some(list) = effects {
        return resolve_list(list, size, ctx);
    }
    let Some(style_ref) = effect_ref else {
        return ResolvedEffects::default();
    };
    if style_ref.idx == 0 {
        return ResolvedEffects::default();
    }
    match ctx
        .theme
        .format_scheme
        .effect_styles
        .get(style_ref.idx as usize - 1)
    {
        Some(list) => resolve_list(list, size, &style_ctx(style_ref, ctx)),
        None => {
            tracing::debug!(idx = style_ref.idx, "effect style reference out of range");
            ResolvedEffects::default()
        }
    }
}

fn resolve_list(list: &EffectList, size: Size, ctx: &RenderContext) -> ResolvedEffects {
    ResolvedEffects {
        shadow: list
            .outer_shadow
            .as_ref()
            .map(|s| resolve_shadow(s, size, ctx)),
        reflection: list.reflection.as_ref().map(resolve_reflection),
    }
}

/// Anchor of a scaled shadow as a fraction of the box; `None` for center.
fn alignment_anchor(align: RectAlignment) -> Option<DVec2> {
    let anchor = match align {
        RectAlignment::Center => return None,
        RectAlignment::TopLeft => DVec2::new(0.0, 0.0),
        RectAlignment::Top => DVec2::new(0.5, 0.0),
        RectAlignment::TopRight => DVec2::new(1.0, 0.0),
        RectAlignment::Left => DVec2::new(0.0, 0.5),
        RectAlignment::Right => DVec2::new(1.0, 0.5),
        RectAlignment::BottomLeft => DVec2::new(0.0, 1.0),
        RectAlignment::Bottom => DVec2::new(0.5, 1.0),
        RectAlignment::BottomRight => DVec2::new(1.0, 1.0),
    };
    Some(anchor)
}

pub fn resolve_shadow(shadow: &OuterShadow, size: Size, ctx: &RenderContext) -> ShadowEffect {
    let dir = shadow.dir.to_radians();
    let distance = DVec2::new(dir.cos(), dir.sin()) * shadow.dist;
    let scale = DVec2::new(shadow.sx as f64, shadow.sy as f64) / 100_000.0;
    let extent = DVec2::new(size.width, size.height);

    // Scaling happens about the alignment anchor. The box center moves away
    // from the anchor by (center - anchor) * (scale - 1); a centered anchor
    // scales symmetrically and never shifts.
    let anchor_shift = match alignment_anchor(shadow.algn) {
        None => DVec2::ZERO,
        Some(anchor) => (DVec2::splat(0.5) - anchor) * extent * (scale - DVec2::ONE),
    };

    ShadowEffect {
        color: *resolve_color(&shadow.color, ctx),
        blur: shadow.blur_rad.max(0.0),
        offset: distance + anchor_shift,
        spread: extent * (scale - DVec2::ONE) / 2.0,
    }
}

pub fn resolve_reflection(reflection: &Reflection) -> ReflectionEffect {
    let frac = |v: i32| (v as f64 / 100_000.0).clamp(0.0, 1.0);
    ReflectionEffect {
        blur: reflection.blur_rad.max(0.0),
        distance: reflection.dist.max(0.0),
        start_alpha: frac(reflection.st_a),
        end_alpha: frac(reflection.end_a),
        end_position: frac(reflection.end_pos),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderConfig;
    use crate::context::ResolveCaches;
    use deck_data::{Color, ColorMap, Theme};

    fn shadow(algn: RectAlignment, sx: i32, sy: i32) -> OuterShadow {
        OuterShadow {
            blur_rad: 4.0,
            dist: 0.0,
            dir: 0.0,
            sx,
            sy,
            algn,
            color: Color::srgb("000000"),
        }
    }

    fn with_ctx(f: impl FnOnce(&RenderContext)) {
        let theme = Theme::default();
        let map = ColorMap::default();
        let config = RenderConfig::default();
        let caches = ResolveCaches::new();
        f(&RenderContext::new(&theme, &map, &config, &caches));
    }

    #[test]
    fn centered_shadow_scales_without_shift() {
        with_ctx(|ctx| {
            let s = resolve_shadow(
                &shadow(RectAlignment::Center, 120_000, 120_000),
                Size::new(100.0, 50.0),
                ctx,
            );
            assert_eq!(s.offset, DVec2::ZERO);
            assert!((s.spread.x - 10.0).abs() < 1e-9);
            assert!((s.spread.y - 5.0).abs() < 1e-9);
        });
    }

    #[test]
    fn left_and_right_alignment_shift_in_opposite_directions() {
        with_ctx(|ctx| {
            let size = Size::new(100.0, 50.0);
            let left = resolve_shadow(&shadow(RectAlignment::Left, 120_000, 100_000), size, ctx);
            let right = resolve_shadow(&shadow(RectAlignment::Right, 120_000, 100_000), size, ctx);
            assert!((left.offset.x - 10.0).abs() < 1e-9);
            assert!((right.offset.x + 10.0).abs() < 1e-9);
            assert_eq!(left.offset.y, 0.0);
        });
    }

    #[test]
    fn direction_and_distance_offset() {
        with_ctx(|ctx| {
            let mut s = shadow(RectAlignment::Bottom, 100_000, 100_000);
            s.dist = 10.0;
            s.dir = 90.0;
            let out = resolve_shadow(&s, Size::new(10.0, 10.0), ctx);
            assert!(out.offset.x.abs() < 1e-9);
            assert!((out.offset.y - 10.0).abs() < 1e-9);
        });
    }

    #[test]
    fn explicit_empty_list_suppresses_theme_effect() {
        with_ctx(|ctx| {
            let style_ref = StyleRef {
                idx: 1,
                color: None,
            };
            let out = resolve_effects(
                Some(&EffectList::default()),
                Some(&style_ref),
                Size::new(10.0, 10.0),
                ctx,
            );
            assert!(out.is_empty());
        });
    }
}
