use deck_core::context::{RenderContext, ResolveCaches};
use deck_core::error::{ResolveError, Result};
use deck_core::group::{compose_elements, render_order, ChildSpace, LeafRenderer};
use deck_core::paint::resolve_gradient;
use deck_core::renderer::{Frame, VisualNode};
use deck_core::{Paint, RenderConfig, ResolvedColor, ShapeRenderer};
use deck_data::{
    Color, ColorMap, ColorModifier, Element, Geometry, GradientFill, GradientShade, GradientStop, GroupXfrm,
    Shape, Theme, Xfrm,
};
use proptest::prelude::*;

fn modifier() -> impl Strategy<Value = ColorModifier> {
    prop_oneof![
        (0..=100_000i32).prop_map(ColorModifier::LumMod),
        (0..=100_000i32).prop_map(ColorModifier::LumOff),
        (0..=100_000i32).prop_map(ColorModifier::Tint),
        (0..=100_000i32).prop_map(ColorModifier::Shade),
        (0..=100_000i32).prop_map(ColorModifier::Alpha),
        (0..=200_000i32).prop_map(ColorModifier::AlphaMod),
        (0..=200_000i32).prop_map(ColorModifier::SatMod),
        (-360.0..360.0f64).prop_map(ColorModifier::HueOff),
        Just(ColorModifier::Comp),
        Just(ColorModifier::Inv),
        Just(ColorModifier::Gray),
    ]
}

fn shape(id: u32, preset: &str) -> Element {
    Element::Shape(Shape {
        id,
        xfrm: Some(Xfrm::new(0.0, 0.0, 10.0, 10.0)),
        geometry: Some(Geometry::preset(preset)),
        ..Default::default()
    })
}

/// HSL lightness of an 8-bit color, in [0, 1].
fn lightness(c: ResolvedColor) -> f64 {
    let max = c.r.max(c.g).max(c.b) as f64;
    let min = c.r.min(c.g).min(c.b) as f64;
    (max + min) / 510.0
}

const ONE_STEP: f64 = 1.0 / 255.0;

struct FailAt(u32);

impl LeafRenderer for FailAt {
    fn render<'a>(&self, element: &'a Element, frame: Frame, ctx: &RenderContext<'a>) -> Result<VisualNode> {
        if element.id() == Some(self.0) {
            return Err(ResolveError::Leaf("forced".into()));
        }
        ShapeRenderer.render(element, frame, ctx)
    }
}

proptest! {
    #[test]
    fn modifiers_stay_in_range(
        r in any::<u8>(),
        g in any::<u8>(),
        b in any::<u8>(),
        mods in prop::collection::vec(modifier(), 0..6),
    ) {
        let out = ResolvedColor::rgb(r, g, b).modified(&mods);
        prop_assert!((0.0..=1.0).contains(&out.alpha));
        prop_assert_eq!(out.hex().len(), 7);
    }

    #[test]
    fn tint_brightens_and_shade_darkens_every_channel(
        r in any::<u8>(),
        g in any::<u8>(),
        b in any::<u8>(),
        v in 0..=100_000i32,
    ) {
        let base = ResolvedColor::rgb(r, g, b);
        let tinted = base.modified(&[ColorModifier::Tint(v)]);
        let shaded = base.modified(&[ColorModifier::Shade(v)]);
        prop_assert!(tinted.r >= r && tinted.g >= g && tinted.b >= b);
        prop_assert!(shaded.r <= r && shaded.g <= g && shaded.b <= b);
        if v == 0 {
            prop_assert_eq!((tinted.r, tinted.g, tinted.b), (255, 255, 255));
            prop_assert_eq!((shaded.r, shaded.g, shaded.b), (0, 0, 0));
        }
        if v == 100_000 {
            prop_assert_eq!(tinted, base);
            prop_assert_eq!(shaded, base);
        }
    }

    #[test]
    fn luminance_modifiers_follow_hsl(
        r in any::<u8>(),
        g in any::<u8>(),
        b in any::<u8>(),
        scale in 0..=100_000i32,
        offset in 0..=100_000i32,
    ) {
        let base = ResolvedColor::rgb(r, g, b);
        let l = lightness(base);

        let scaled = base.modified(&[ColorModifier::LumMod(scale)]);
        let expected = l * scale as f64 / 100_000.0;
        prop_assert!((lightness(scaled) - expected).abs() <= ONE_STEP, "lumMod {} gave {:?}", scale, scaled);

        let shifted = base.modified(&[ColorModifier::LumOff(offset)]);
        let expected = (l + offset as f64 / 100_000.0).min(1.0);
        prop_assert!((lightness(shifted) - expected).abs() <= ONE_STEP, "lumOff {} gave {:?}", offset, shifted);
    }

    #[test]
    fn gradient_stops_come_out_sorted(positions in prop::collection::vec(0u32..=120_000, 1..8)) {
        let theme = Theme::default();
        let map = ColorMap::default();
        let config = RenderConfig::default();
        let caches = ResolveCaches::new();
        let ctx = RenderContext::new(&theme, &map, &config, &caches);
        let gradient = GradientFill {
            stops: positions
                .iter()
                .map(|&pos| GradientStop { pos, color: Color::srgb("336699") })
                .collect(),
            shade: GradientShade::default(),
            rot_with_shape: false,
        };

        let Paint::LinearGradient(resolved) = resolve_gradient(&gradient, &ctx) else {
            panic!("linear shade resolves to a linear gradient");
        };
        prop_assert_eq!(resolved.stops.len(), positions.len());
        prop_assert!(resolved.stops.windows(2).all(|w| w[0].offset <= w[1].offset));
        prop_assert!(resolved.stops.iter().all(|s| (0.0..=1.0).contains(&s.offset)));
    }

    #[test]
    fn matching_child_extent_is_identity(
        w in 1.0..2000.0f64,
        h in 1.0..2000.0f64,
        x in -500.0..500.0f64,
        y in -500.0..500.0f64,
    ) {
        let space = ChildSpace::of(&GroupXfrm {
            frame: Xfrm::new(37.0, 11.0, w, h),
            ch_off_x: 0.0,
            ch_off_y: 0.0,
            ch_ext_w: w,
            ch_ext_h: h,
        });
        let frame = space.map(&Xfrm::new(x, y, 25.0, 15.0));
        prop_assert!((frame.x - x).abs() < 1e-9);
        prop_assert!((frame.y - y).abs() < 1e-9);
        prop_assert!((frame.width - 25.0).abs() < 1e-9);
    }

    #[test]
    fn arrows_lead_only_for_the_exact_cycle(kinds in prop::collection::vec(0usize..3, 0..9)) {
        const NAMES: [&str; 3] = ["pie", "circularArrow", "rect"];
        let children: Vec<Element> = kinds
            .iter()
            .enumerate()
            .map(|(i, &k)| shape(i as u32 + 1, NAMES[k]))
            .collect();
        let order = render_order(&children);
        let pies = kinds.iter().filter(|&&k| k == 0).count();
        let arrows = kinds.iter().filter(|&&k| k == 1).count();

        if kinds.len() == 6 && pies == 3 && arrows == 3 {
            let (head, tail) = order.split_at(3);
            prop_assert!(head.iter().all(|&i| kinds[i] == 1));
            prop_assert!(tail.iter().all(|&i| kinds[i] == 0));
        } else {
            prop_assert_eq!(order, (0..kinds.len()).collect::<Vec<_>>());
        }
    }

    #[test]
    fn one_failing_child_never_drops_siblings(n in 1usize..12, k in 0usize..12) {
        let k = k % n;
        let children: Vec<Element> = (0..n).map(|i| shape(i as u32 + 1, "rect")).collect();
        let theme = Theme::default();
        let map = ColorMap::default();
        let config = RenderConfig::default();
        let caches = ResolveCaches::new();
        let ctx = RenderContext::new(&theme, &map, &config, &caches);

        let nodes = compose_elements(&children, &ctx, &FailAt(k as u32 + 1));
        prop_assert_eq!(nodes.len(), n);
    }
}
