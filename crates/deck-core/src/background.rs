use crate::color::ResolvedColor;
use crate::context::RenderContext;
use crate::paint::{resolve_fill, resolve_fill_ref, GradientStop, Paint};
use deck_data::{Background, Layout, Master, Slide, StyleRef};

/// Slide background: the first part in slide, layout, master order that
/// declares one wins. The result is always opaque; anything transparent
/// sits on white.
pub fn resolve_background<'a>(
    slide: &'a Slide,
    layout: Option<&'a Layout>,
    master: Option<&'a Master>,
    ctx: &RenderContext<'a>,
) -> Paint {
    let declared = slide
        .background
        .as_ref()
        .map(|bg| (bg, slide.path.as_str(), &slide.relationships))
        .or_else(|| {
            layout.and_then(|l| {
                l.background
                    .as_ref()
                    .map(|bg| (bg, l.path.as_str(), &l.relationships))
            })
        })
        .or_else(|| {
            master.and_then(|m| {
                m.background
                    .as_ref()
                    .map(|bg| (bg, m.path.as_str(), &m.relationships))
            })
        });

    match declared {
        Some((background, path, relationships)) => {
            resolve_declared(background, &ctx.clone().with_part(path, relationships))
        }
        None => Paint::Solid(ResolvedColor::WHITE),
    }
}

fn resolve_declared(background: &Background, ctx: &RenderContext) -> Paint {
    let paint = match background {
        Background::Fill { fill } => resolve_fill(Some(fill), ctx),
        Background::Ref { idx, color } => {
            // Only stands in for `phClr`; never goes through the color cache.
            let style_ref = StyleRef {
                idx: *idx,
                color: Some(color.clone()),
            };
            resolve_fill_ref(&style_ref, ctx)
        }
    };
    opaque(paint)
}

fn opaque(paint: Paint) -> Paint {
    let on_white = |c: ResolvedColor| c.composite_over(ResolvedColor::WHITE);
    match paint {
        Paint::Empty | Paint::Transparent => Paint::Solid(ResolvedColor::WHITE),
        Paint::Solid(c) => Paint::Solid(on_white(c)),
        Paint::LinearGradient(mut g) => {
            g.stops = composite_stops(&g.stops);
            Paint::LinearGradient(g)
        }
        Paint::RadialGradient(mut g) => {
            g.stops = composite_stops(&g.stops);
            Paint::RadialGradient(g)
        }
        Paint::Pattern(p) => Paint::Pattern(p.map_colors(on_white)),
        image @ Paint::Image(_) => image,
    }
}

fn composite_stops(stops: &[GradientStop]) -> Vec<GradientStop> {
    stops
        .iter()
        .map(|s| GradientStop {
            offset: s.offset,
            color: s.color.composite_over(ResolvedColor::WHITE),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderConfig;
    use crate::context::ResolveCaches;
    use deck_data::{Color, ColorMap, ColorModifier, ColorScheme, Fill, FormatScheme, Theme};

    fn theme() -> Theme {
        Theme {
            color_scheme: ColorScheme::from_pairs(&[("dk1", "000000"), ("lt1", "FFFFFF"), ("accent1", "4472C4")]),
            format_scheme: FormatScheme {
                bg_fill_styles: vec![Fill::Solid {
                    color: Color::scheme("phClr"),
                }],
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn solid(hex: &str) -> Background {
        Background::Fill {
            fill: Fill::Solid {
                color: Color::srgb(hex),
            },
        }
    }

    #[test]
    fn slide_then_layout_then_master() {
        let theme = theme();
        let map = ColorMap::default();
        let config = RenderConfig::default();
        let caches = ResolveCaches::new();
        let ctx = RenderContext::new(&theme, &map, &config, &caches);

        let master = Master {
            background: Some(solid("112233")),
            ..Default::default()
        };
        let layout = Layout {
            background: Some(solid("445566")),
            ..Default::default()
        };
        let mut slide = Slide::default();

        let hex = |p: Paint| p.solid_color().map(|c| c.hex());
        assert_eq!(hex(resolve_background(&slide, Some(&layout), Some(&master), &ctx)), Some("#445566".into()));
        assert_eq!(hex(resolve_background(&slide, None, Some(&master), &ctx)), Some("#112233".into()));
        assert_eq!(hex(resolve_background(&slide, None, None, &ctx)), Some("#FFFFFF".into()));

        slide.background = Some(solid("778899"));
        assert_eq!(hex(resolve_background(&slide, Some(&layout), Some(&master), &ctx)), Some("#778899".into()));
    }

    #[test]
    fn translucent_and_no_fill_sit_on_white() {
        let theme = theme();
        let map = ColorMap::default();
        let config = RenderConfig::default();
        let caches = ResolveCaches::new();
        let ctx = RenderContext::new(&theme, &map, &config, &caches);

        let slide = Slide {
            background: Some(Background::Fill {
                fill: Fill::Solid {
                    color: Color::srgb("000000").with(ColorModifier::Alpha(50_000)),
                },
            }),
            ..Default::default()
        };
        let paint = resolve_background(&slide, None, None, &ctx);
        let color = paint.solid_color().unwrap();
        assert!(color.is_opaque());
        assert!((color.r as i32 - 128).abs() <= 1);

        let none = Slide {
            background: Some(Background::Fill { fill: Fill::None }),
            ..Default::default()
        };
        assert_eq!(resolve_background(&none, None, None, &ctx), Paint::Solid(ResolvedColor::WHITE));
    }

    #[test]
    fn background_reference_uses_theme_list() {
        let theme = theme();
        let map = ColorMap::default();
        let config = RenderConfig::default();
        let caches = ResolveCaches::new();
        let ctx = RenderContext::new(&theme, &map, &config, &caches);

        let slide = Slide {
            background: Some(Background::Ref {
                idx: 1001,
                color: Color::scheme("accent1"),
            }),
            ..Default::default()
        };
        let paint = resolve_background(&slide, None, None, &ctx);
        assert_eq!(paint.solid_color().map(|c| c.hex()), Some("#4472C4".into()));
    }
}
