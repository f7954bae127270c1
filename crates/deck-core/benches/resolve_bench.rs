use criterion::black_box;
use criterion::criterion_group;
use criterion::criterion_main;
use criterion::Criterion;
use deck_core::context::{RenderContext, ResolveCaches};
use deck_core::group::compose_group;
use deck_core::text::layout_text;
use deck_core::{RenderConfig, ShapeRenderer};
use deck_data::{
    Color, ColorMap, ColorModifier, ColorScheme, Element, Fill, Geometry, Group, GroupXfrm, Paragraph,
    ParagraphProps, RunProps, Shape, TextBody, TextRun, Theme, Xfrm,
};
use kurbo::Size;

const PRESETS: [&str; 6] = ["rect", "roundRect", "ellipse", "rightArrow", "star5", "pie"];

fn theme() -> Theme {
    Theme {
        color_scheme: ColorScheme::from_pairs(&[
            ("dk1", "000000"),
            ("lt1", "FFFFFF"),
            ("accent1", "4472C4"),
            ("accent2", "ED7D31"),
        ]),
        ..Default::default()
    }
}

fn generate_group(children: usize, depth: usize) -> Group {
    let leaves = (0..children).map(|i| {
        let accent = if i % 2 == 0 { "accent1" } else { "accent2" };
        Element::Shape(Shape {
            id: (depth * 1000 + i) as u32,
            xfrm: Some(Xfrm::new((i % 10) as f64 * 40.0, (i / 10) as f64 * 30.0, 36.0, 24.0)),
            geometry: Some(Geometry::preset(PRESETS[i % PRESETS.len()])),
            fill: Some(Fill::Solid {
                color: Color::scheme(accent).with(ColorModifier::LumMod(75_000)),
            }),
            ..Default::default()
        })
    });
    let mut elements: Vec<Element> = leaves.collect();
    if depth > 0 {
        elements.push(Element::Group(generate_group(children, depth - 1)));
    }
    Group {
        id: depth as u32,
        name: format!("Group {depth}"),
        xfrm: GroupXfrm {
            frame: Xfrm::new(0.0, 0.0, 400.0, 300.0),
            ch_ext_w: 400.0,
            ch_ext_h: 300.0,
            ..Default::default()
        },
        fill: None,
        children: elements,
    }
}

fn generate_text(paragraphs: usize) -> TextBody {
    TextBody {
        paragraphs: (0..paragraphs)
            .map(|i| Paragraph {
                props: ParagraphProps {
                    level: Some((i % 3) as u8),
                    ..Default::default()
                },
                runs: vec![TextRun::Text {
                    text: format!("Paragraph {i} with enough words to wrap across a narrow box"),
                    props: RunProps {
                        size: Some(18.0),
                        ..Default::default()
                    },
                }],
                end_props: None,
            })
            .collect(),
        ..Default::default()
    }
}

fn bench_compose(c: &mut Criterion) {
    let theme = theme();
    let map = ColorMap::default();
    let config = RenderConfig::default();
    let caches = ResolveCaches::new();
    let group = generate_group(60, 4);

    c.bench_function("compose_nested_groups", |b| {
        b.iter(|| {
            caches.begin_pass();
            let ctx = RenderContext::new(&theme, &map, &config, &caches);
            black_box(compose_group(black_box(&group), &ctx, &ShapeRenderer))
        })
    });
}

fn bench_text(c: &mut Criterion) {
    let theme = theme();
    let map = ColorMap::default();
    let config = RenderConfig::default();
    let caches = ResolveCaches::new();
    let body = generate_text(24);

    c.bench_function("layout_text_24_paragraphs", |b| {
        b.iter(|| {
            let ctx = RenderContext::new(&theme, &map, &config, &caches);
            black_box(layout_text(black_box(&body), None, &ctx, Size::new(320.0, 240.0)))
        })
    });
}

criterion_group!(benches, bench_compose, bench_text);
criterion_main!(benches);
