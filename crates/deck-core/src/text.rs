//! Text layout: style inheritance, bullets, autofit and styled runs.
//!
//! The resolver does not break lines for drawing. It produces paragraphs of
//! styled fragments plus the box metrics a text renderer needs; line
//! breaking happens only inside the pure measurement used for autofit.

use crate::autofit::{fit_text, measure_height, AutofitResult};
use crate::bullets::{format_auto_number, AutoNumberState};
use crate::color::{resolve_color, scheme_color};
use crate::config::{EMU_PER_PX, PX_PER_PT};
use crate::context::RenderContext;
use crate::hyperlink::{resolve_link, LinkTarget};
use crate::line::{resolve_line_style, LineStyle};
use crate::paint::{resolve_fill, Paint};
use crate::style::{build_chain, is_title, StyleChain};
use deck_data::{
    Autofit, Bullet, BulletColor, BulletFont, BulletSize, Caps, FontCollection, Insets, Paragraph,
    PlaceholderRef, RunProps, Spacing, TextAlign, TextAnchor, TextBody, TextRun,
};
use kurbo::Size;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overflow {
    /// Text past the box is clipped.
    Clip,
    /// The shape grows to fit its text (`spAutoFit`).
    GrowShape,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout {
    pub insets: Insets,
    pub anchor: TextAnchor,
    pub wrap: bool,
    pub overflow: Overflow,
    pub font_scale: f64,
    pub line_spacing_reduction: f64,
    pub paragraphs: Vec<ParagraphLayout>,
    /// Measured height of the paragraphs, insets excluded (px).
    pub content_height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineHeight {
    /// Multiple of the normal line height.
    Multiple(f64),
    /// px
    Exact(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParagraphLayout {
    pub level: u8,
    pub align: TextAlign,
    pub margin_left: f64,
    pub indent: f64,
    pub space_before: f64,
    pub space_after: f64,
    pub line_height: LineHeight,
    pub tab_size: f64,
    pub bullet: Option<BulletLayout>,
    pub fragments: Vec<TextFragment>,
    /// Font size of a line with no runs, from `endParaRPr` (px).
    pub empty_line_size: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BulletLayout {
    pub text: String,
    pub font_family: String,
    pub size_px: f64,
    pub paint: Paint,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TextFragment {
    Run(StyledRun),
    Break,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StyledRun {
    pub text: String,
    pub font_family: String,
    /// Effective size after autofit scale and baseline shrink.
    pub size_px: f64,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike: bool,
    pub small_caps: bool,
    /// Fraction of the font size; positive raises the run.
    pub baseline: f64,
    pub letter_spacing: f64,
    pub paint: Paint,
    pub outline: Option<LineStyle>,
    pub link: Option<LinkTarget>,
}

/// Lays out a text body inside a box of `size` px.
pub fn layout_text<'a>(
    body: &'a TextBody,
    placeholder: Option<&PlaceholderRef>,
    ctx: &RenderContext<'a>,
    size: Size,
) -> TextLayout {
    let chain = build_chain(body, placeholder, ctx);
    let title = placeholder.map(is_title).unwrap_or(false);
    let props = &body.body;
    let insets = props.insets;
    let width = (size.width - insets.left - insets.right).max(0.0);
    let height = (size.height - insets.top - insets.bottom).max(0.0);

    let build = |fit: AutofitResult| build_paragraphs(&body.paragraphs, &chain, title, fit, ctx);
    let measure = |paragraphs: &[ParagraphLayout]| {
        measure_height(paragraphs, width, props.wrap, ctx.measurer, ctx.config)
    };

    let (fit, overflow) = match props.autofit {
        Autofit::None => (AutofitResult::NONE, Overflow::Clip),
        Autofit::Shape => (AutofitResult::NONE, Overflow::GrowShape),
        Autofit::Normal {
            font_scale: None,
            ln_spc_reduction: None,
        } if ctx.config.dynamic_autofit => {
            let fit = fit_text(height, ctx.config, |candidate| measure(&build(candidate)));
            (fit, Overflow::Clip)
        }
        Autofit::Normal {
            font_scale,
            ln_spc_reduction,
        } => {
            let frac = |v: i32| (v as f64 / 100_000.0).clamp(0.0, 1.0);
            let fit = AutofitResult {
                font_scale: font_scale.map(frac).unwrap_or(1.0),
                line_reduction: ln_spc_reduction.map(frac).unwrap_or(0.0),
            };
            (fit, Overflow::Clip)
        }
    };

    let paragraphs = build(fit);
    let content_height = measure(&paragraphs);
    TextLayout {
        insets,
        anchor: props.anchor,
        wrap: props.wrap,
        overflow,
        font_scale: fit.font_scale,
        line_spacing_reduction: fit.line_reduction,
        paragraphs,
        content_height,
    }
}

fn build_paragraphs(
    paragraphs: &[Paragraph],
    chain: &StyleChain,
    title: bool,
    fit: AutofitResult,
    ctx: &RenderContext,
) -> Vec<ParagraphLayout> {
    let mut numbering = AutoNumberState::new();
    let mut out = Vec::with_capacity(paragraphs.len());
    for paragraph in paragraphs {
        let chain = chain.with_explicit(&paragraph.props);
        let resolver = ParagraphResolver {
            level: paragraph.props.level.unwrap_or(0),
            chain: &chain,
            title,
            fit,
            ctx,
        };
        out.push(resolver.layout(paragraph, &mut numbering));
    }
    out
}

struct ParagraphResolver<'c, 'a> {
    level: u8,
    chain: &'c StyleChain<'a>,
    title: bool,
    fit: AutofitResult,
    ctx: &'c RenderContext<'a>,
}

impl<'a> ParagraphResolver<'_, 'a> {
    fn para<T>(&self, get: impl Fn(&deck_data::ParagraphProps) -> Option<T>) -> Option<T> {
        self.chain.paragraph(self.level, get)
    }

    /// Explicit run property, else the chain's default run properties.
    fn run<T>(&self, props: &RunProps, get: impl Fn(&RunProps) -> Option<T>) -> Option<T> {
        get(props).or_else(|| self.chain.run(self.level, get))
    }

    fn run_ref<T: ?Sized>(
        &self,
        props: &'a RunProps,
        get: impl Fn(&'a RunProps) -> Option<&'a T>,
    ) -> Option<&'a T> {
        get(props).or_else(|| self.chain.run_ref(self.level, get))
    }

    fn layout(&self, paragraph: &'a Paragraph, numbering: &mut AutoNumberState) -> ParagraphLayout {
        let config = self.ctx.config;
        let reduction = 1.0 - self.fit.line_reduction;

        let mut fragments = Vec::new();
        for run in &paragraph.runs {
            match run {
                TextRun::Break { .. } => fragments.push(TextFragment::Break),
                TextRun::Text { text, props } | TextRun::Field { text, props, .. } => {
                    self.push_text(text, props, &mut fragments)
                }
            }
        }

        let end_props = paragraph.end_props.clone().unwrap_or_default();
        let empty_line_size = self.font_px(&end_props);
        let first_run = fragments.iter().find_map(|f| match f {
            TextFragment::Run(run) => Some(run),
            TextFragment::Break => None,
        });
        let reference_size = first_run.map(|r| r.size_px).unwrap_or(empty_line_size);

        let line_height = match self.para(|p| p.line_spacing) {
            Some(Spacing::Points { val }) => LineHeight::Exact(val * PX_PER_PT),
            Some(Spacing::Percent { val }) => LineHeight::Multiple(val as f64 / 100_000.0 * reduction),
            None => LineHeight::Multiple(reduction),
        };
        let spacing = |s: Option<Spacing>| match s {
            Some(Spacing::Points { val }) => val * PX_PER_PT,
            Some(Spacing::Percent { val }) => {
                val as f64 / 100_000.0 * reference_size * config.line_height * reduction
            }
            None => 0.0,
        };

        let has_text = first_run.map(|r| !r.text.trim().is_empty()).unwrap_or(false);
        let bullet = if has_text {
            self.bullet(first_run, numbering)
        } else {
            None
        };

        ParagraphLayout {
            level: self.level,
            align: self.para(|p| p.align).unwrap_or(TextAlign::Left),
            margin_left: self.para(|p| p.margin_left).unwrap_or(0.0),
            indent: self.para(|p| p.indent).unwrap_or(0.0),
            space_before: spacing(self.para(|p| p.space_before)),
            space_after: spacing(self.para(|p| p.space_after)),
            line_height,
            tab_size: self
                .para(|p| p.default_tab_size)
                .filter(|emu| *emu > 0)
                .map(|emu| emu as f64 / EMU_PER_PX)
                .unwrap_or_else(|| config.default_tab_px()),
            bullet,
            fragments,
            empty_line_size,
        }
    }

    fn push_text(&self, text: &str, props: &'a RunProps, fragments: &mut Vec<TextFragment>) {
        let caps = self.run(props, |r| r.caps).unwrap_or(Caps::None);
        let text = if caps == Caps::All {
            text.to_uppercase()
        } else {
            text.to_string()
        };
        for (i, piece) in text.split(['\n', '\u{b}']).enumerate() {
            if i > 0 {
                fragments.push(TextFragment::Break);
            }
            if !piece.is_empty() {
                fragments.push(TextFragment::Run(self.styled_run(piece, props, caps)));
            }
        }
    }

    /// Size in px after autofit and baseline shrink.
    fn font_px(&self, props: &RunProps) -> f64 {
        let config = self.ctx.config;
        let size_pt = self
            .run(props, |r| r.size)
            .filter(|s| *s > 0.0)
            .unwrap_or(config.default_font_size);
        let baseline = self.run(props, |r| r.baseline).unwrap_or(0);
        let shrink = if baseline.abs() >= config.baseline_shrink_threshold {
            config.baseline_shrink_factor
        } else {
            1.0
        };
        size_pt * PX_PER_PT * self.fit.font_scale * shrink
    }

    fn styled_run(&self, text: &str, props: &'a RunProps, caps: Caps) -> StyledRun {
        let ctx = self.ctx;
        let link = props.hyperlink.as_ref().and_then(|l| resolve_link(l, ctx));
        let underline = self
            .run(props, |r| r.underline.clone())
            .map(|u| u != "none")
            .unwrap_or(false);
        let strike = self
            .run(props, |r| r.strike.clone())
            .map(|s| s != "noStrike")
            .unwrap_or(false);

        StyledRun {
            text: alternate_spaces(text),
            font_family: self.font_family(self.run(props, |r| r.latin.clone()).as_deref()),
            size_px: self.font_px(props),
            bold: self.run(props, |r| r.bold).unwrap_or(false),
            italic: self.run(props, |r| r.italic).unwrap_or(false),
            underline: underline || props.hyperlink.is_some(),
            strike,
            small_caps: caps == Caps::Small,
            baseline: self.run(props, |r| r.baseline).unwrap_or(0) as f64 / 100_000.0,
            letter_spacing: self.run(props, |r| r.spacing).unwrap_or(0.0)
                * PX_PER_PT
                * self.fit.font_scale,
            paint: self.run_paint(props),
            outline: self
                .run_ref(props, |r| r.outline.as_ref())
                .map(|line| resolve_line_style(Some(line), ctx, None))
                .filter(LineStyle::is_visible),
            link,
        }
    }

    /// Explicit fill, hyperlink color, inherited fill, `fontRef` color,
    /// then `tx1`.
    fn run_paint(&self, props: &'a RunProps) -> Paint {
        let ctx = self.ctx;
        if let Some(fill) = props.fill.as_ref() {
            return resolve_fill(Some(fill), ctx);
        }
        if props.hyperlink.is_some() {
            return Paint::Solid(scheme_color("hlink", ctx));
        }
        if let Some(fill) = self.chain.run_ref(self.level, |r| r.fill.as_ref()) {
            return resolve_fill(Some(fill), ctx);
        }
        self.text_color()
    }

    fn text_color(&self) -> Paint {
        let ctx = self.ctx;
        match ctx.font_ref.and_then(|f| f.color.as_ref()) {
            Some(color) => Paint::Solid(*resolve_color(color, ctx)),
            None => Paint::Solid(scheme_color("tx1", ctx)),
        }
    }

    fn font_family(&self, typeface: Option<&str>) -> String {
        let fonts = &self.ctx.theme.fonts;
        match typeface {
            Some(t) if t.starts_with("+mj") => fonts.major.clone(),
            Some(t) if t.starts_with("+mn") => fonts.minor.clone(),
            Some(t) if !t.is_empty() => t.to_string(),
            _ => match self.ctx.font_ref.map(|f| f.idx) {
                Some(FontCollection::Major) => fonts.major.clone(),
                Some(FontCollection::Minor) => fonts.minor.clone(),
                _ if self.title => fonts.major.clone(),
                _ => fonts.minor.clone(),
            },
        }
    }

    fn bullet(&self, first_run: Option<&StyledRun>, numbering: &mut AutoNumberState) -> Option<BulletLayout> {
        let text = match self.para(|p| p.bullet.clone()) {
            Some(Bullet::Char { char }) => {
                numbering.interrupt(self.level);
                char
            }
            Some(Bullet::AutoNum { scheme, start_at }) => {
                format_auto_number(scheme, numbering.next(self.level, scheme, start_at))
            }
            Some(Bullet::None) | None => {
                numbering.interrupt(self.level);
                return None;
            }
        };

        let text_size = first_run
            .map(|r| r.size_px)
            .unwrap_or_else(|| self.font_px(&RunProps::default()));
        let size_px = match self.para(|p| p.bullet_size) {
            Some(BulletSize::Percent { val }) => text_size * val as f64 / 100_000.0,
            Some(BulletSize::Points { val }) => val * PX_PER_PT * self.fit.font_scale,
            Some(BulletSize::FollowText) | None => text_size,
        };
        let font_family = match self.para(|p| p.bullet_font.clone()) {
            Some(BulletFont::Typeface { typeface }) => self.font_family(Some(&typeface)),
            Some(BulletFont::FollowText) | None => first_run
                .map(|r| r.font_family.clone())
                .unwrap_or_else(|| self.font_family(None)),
        };
        Some(BulletLayout {
            text,
            font_family,
            size_px,
            paint: self.bullet_paint(first_run),
        })
    }

    /// `buClr`, the inherited default run color, the first run's color,
    /// then the text color.
    fn bullet_paint(&self, first_run: Option<&StyledRun>) -> Paint {
        let ctx = self.ctx;
        if let Some(BulletColor::Color { color }) = self.chain.paragraph_ref(self.level, |p| p.bullet_color.as_ref()) {
            return Paint::Solid(*resolve_color(color, ctx));
        }
        if let Some(fill) = self.chain.run_ref(self.level, |r| r.fill.as_ref()) {
            return resolve_fill(Some(fill), ctx);
        }
        match first_run {
            Some(run) => run.paint.clone(),
            None => self.text_color(),
        }
    }
}

/// Runs of spaces alternate breakable and non-breaking spaces so renderers
/// that collapse whitespace keep every space.
pub fn alternate_spaces(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run = 0usize;
    for c in text.chars() {
        if c == ' ' {
            out.push(if run % 2 == 0 { ' ' } else { '\u{a0}' });
            run += 1;
        } else {
            out.push(c);
            run = 0;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderConfig;
    use crate::context::ResolveCaches;
    use deck_data::{AutoNumberScheme, BodyProperties, Color, ColorMap, ColorScheme, Fill, Hyperlink, ParagraphProps, Theme};

    fn theme() -> Theme {
        Theme {
            name: "test".into(),
            color_scheme: ColorScheme::from_pairs(&[
                ("dk1", "000000"),
                ("lt1", "FFFFFF"),
                ("hlink", "0563C1"),
            ]),
            ..Default::default()
        }
    }

    fn with_ctx(config: RenderConfig, f: impl FnOnce(&RenderContext)) {
        let theme = theme();
        let map = ColorMap::default();
        let caches = ResolveCaches::new();
        f(&RenderContext::new(&theme, &map, &config, &caches));
    }

    fn text(s: &str, props: RunProps) -> TextRun {
        TextRun::Text {
            text: s.into(),
            props,
        }
    }

    fn para(props: ParagraphProps, runs: Vec<TextRun>) -> Paragraph {
        Paragraph {
            props,
            runs,
            end_props: None,
        }
    }

    fn runs(layout: &TextLayout, p: usize) -> Vec<&StyledRun> {
        layout.paragraphs[p]
            .fragments
            .iter()
            .filter_map(|f| match f {
                TextFragment::Run(r) => Some(r),
                TextFragment::Break => None,
            })
            .collect()
    }

    #[test]
    fn auto_numbered_paragraphs() {
        let numbered = ParagraphProps {
            bullet: Some(Bullet::AutoNum {
                scheme: AutoNumberScheme::ArabicPeriod,
                start_at: None,
            }),
            ..Default::default()
        };
        let body = TextBody {
            paragraphs: vec![
                para(numbered.clone(), vec![text("First", RunProps::default())]),
                para(numbered, vec![text("Second", RunProps::default())]),
            ],
            ..Default::default()
        };
        with_ctx(RenderConfig::default(), |ctx| {
            let layout = layout_text(&body, None, ctx, Size::new(400.0, 200.0));
            let labels: Vec<_> = layout
                .paragraphs
                .iter()
                .map(|p| p.bullet.as_ref().map(|b| b.text.clone()))
                .collect();
            assert_eq!(labels, vec![Some("1.".to_string()), Some("2.".to_string())]);
        });
    }

    #[test]
    fn superscript_shrinks_and_caps_uppercase() {
        let props = RunProps {
            size: Some(24.0),
            baseline: Some(30_000),
            caps: Some(Caps::All),
            ..Default::default()
        };
        let body = TextBody {
            paragraphs: vec![para(ParagraphProps::default(), vec![text("x2", props)])],
            ..Default::default()
        };
        with_ctx(RenderConfig::default(), |ctx| {
            let layout = layout_text(&body, None, ctx, Size::new(400.0, 200.0));
            let run = runs(&layout, 0)[0];
            assert_eq!(run.text, "X2");
            assert!((run.size_px - 24.0 * PX_PER_PT * 0.65).abs() < 1e-9);
            assert!((run.baseline - 0.3).abs() < 1e-9);
        });
    }

    #[test]
    fn line_feeds_become_breaks_and_spaces_alternate() {
        let body = TextBody {
            paragraphs: vec![para(
                ParagraphProps::default(),
                vec![text("a   b\nc\u{b}d", RunProps::default())],
            )],
            ..Default::default()
        };
        with_ctx(RenderConfig::default(), |ctx| {
            let layout = layout_text(&body, None, ctx, Size::new(400.0, 200.0));
            let fragments = &layout.paragraphs[0].fragments;
            assert_eq!(fragments.len(), 5);
            assert_eq!(fragments[1], TextFragment::Break);
            assert_eq!(runs(&layout, 0)[0].text, "a \u{a0} b");
        });
    }

    #[test]
    fn hyperlinked_run_uses_hlink_color() {
        let props = RunProps {
            hyperlink: Some(Hyperlink {
                r_id: Some("rId7".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let body = TextBody {
            paragraphs: vec![para(ParagraphProps::default(), vec![text("site", props)])],
            ..Default::default()
        };
        with_ctx(RenderConfig::default(), |ctx| {
            let layout = layout_text(&body, None, ctx, Size::new(400.0, 200.0));
            let run = runs(&layout, 0)[0];
            assert!(run.underline);
            assert_eq!(run.paint.solid_color().map(|c| c.hex()), Some("#0563C1".into()));
            // No navigation callback, no link target.
            assert_eq!(run.link, None);
        });
    }

    #[test]
    fn empty_paragraph_uses_end_properties() {
        let body = TextBody {
            paragraphs: vec![Paragraph {
                end_props: Some(RunProps {
                    size: Some(36.0),
                    ..Default::default()
                }),
                ..Default::default()
            }],
            ..Default::default()
        };
        with_ctx(RenderConfig::default(), |ctx| {
            let layout = layout_text(&body, None, ctx, Size::new(400.0, 200.0));
            let p = &layout.paragraphs[0];
            assert!(p.fragments.is_empty());
            assert!((p.empty_line_size - 48.0).abs() < 1e-9);
            assert!((layout.content_height - 48.0 * 1.2).abs() < 1e-9);
        });
    }

    #[test]
    fn static_autofit_scales_fonts_and_percent_spacing() {
        let props = ParagraphProps {
            line_spacing: Some(Spacing::Percent { val: 150_000 }),
            ..Default::default()
        };
        let body = TextBody {
            body: BodyProperties {
                autofit: Autofit::Normal {
                    font_scale: Some(50_000),
                    ln_spc_reduction: Some(20_000),
                },
                ..Default::default()
            },
            paragraphs: vec![para(
                props,
                vec![text(
                    "t",
                    RunProps {
                        size: Some(30.0),
                        ..Default::default()
                    },
                )],
            )],
            ..Default::default()
        };
        with_ctx(RenderConfig::default(), |ctx| {
            let layout = layout_text(&body, None, ctx, Size::new(400.0, 200.0));
            assert!((runs(&layout, 0)[0].size_px - 20.0).abs() < 1e-9);
            match layout.paragraphs[0].line_height {
                LineHeight::Multiple(m) => assert!((m - 1.2).abs() < 1e-9),
                other => panic!("unexpected line height {other:?}"),
            }
        });
    }

    #[test]
    fn dynamic_autofit_shrinks_without_extra_fragments() {
        let long = "lorem ipsum dolor sit amet ".repeat(40);
        let body = TextBody {
            body: BodyProperties {
                autofit: Autofit::Normal {
                    font_scale: None,
                    ln_spc_reduction: None,
                },
                ..Default::default()
            },
            paragraphs: vec![para(
                ParagraphProps::default(),
                vec![text(&long, RunProps::default())],
            )],
            ..Default::default()
        };
        with_ctx(RenderConfig::default(), |ctx| {
            let size = Size::new(300.0, 120.0);
            let layout = layout_text(&body, None, ctx, size);
            assert!(layout.font_scale < 1.0);
            assert!(layout.content_height <= size.height - 9.6 + 1e-6);
            assert_eq!(layout.paragraphs.len(), 1);
            assert_eq!(layout.paragraphs[0].fragments.len(), 1);
        });

        let mut static_config = RenderConfig::default();
        static_config.dynamic_autofit = false;
        with_ctx(static_config, |ctx| {
            let layout = layout_text(&body, None, ctx, Size::new(300.0, 120.0));
            assert_eq!(layout.font_scale, 1.0);
        });
    }

    #[test]
    fn explicit_fill_wins_over_font_ref() {
        let props = RunProps {
            fill: Some(Fill::Solid {
                color: Color::srgb("CC3311"),
            }),
            ..Default::default()
        };
        let body = TextBody {
            paragraphs: vec![para(ParagraphProps::default(), vec![text("red", props)])],
            ..Default::default()
        };
        with_ctx(RenderConfig::default(), |ctx| {
            let layout = layout_text(&body, None, ctx, Size::new(100.0, 100.0));
            assert_eq!(
                runs(&layout, 0)[0].paint.solid_color().map(|c| c.hex()),
                Some("#CC3311".into())
            );
        });
    }

    #[test]
    fn alternating_spaces() {
        assert_eq!(alternate_spaces("a b"), "a b");
        assert_eq!(alternate_spaces("a    b"), "a \u{a0} \u{a0}b");
    }
}
