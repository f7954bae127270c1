//! Text style inheritance as an ordered chain of providers.
//!
//! Precedence, highest first: explicit paragraph properties, the shape's
//! own list style, the layout placeholder, the master placeholder followed
//! by the master text style, and finally the presentation default style.

use crate::context::RenderContext;
use deck_data::{
    Element, ListStyle, ParagraphProps, PlaceholderKind, PlaceholderRef, RunProps, TextBody, Xfrm,
};
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleSource {
    Explicit,
    ShapeList,
    LayoutPlaceholder,
    MasterPlaceholder,
    MasterTextStyle,
    Presentation,
}

/// One inheritance level.
pub trait StyleProvider {
    /// Property sets this level declares for an outline level, most
    /// specific first.
    fn for_level(&self, level: u8) -> [Option<&ParagraphProps>; 2];
}

impl StyleProvider for ParagraphProps {
    fn for_level(&self, _level: u8) -> [Option<&ParagraphProps>; 2] {
        [Some(self), None]
    }
}

impl StyleProvider for ListStyle {
    fn for_level(&self, level: u8) -> [Option<&ParagraphProps>; 2] {
        [self.levels.get(&level), self.default.as_ref()]
    }
}

/// First-hit lookup over the providers, in order.
#[derive(Clone, Default)]
pub struct StyleChain<'a> {
    providers: Vec<(StyleSource, &'a (dyn StyleProvider + 'a))>,
}

impl<'a> StyleChain<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, source: StyleSource, provider: &'a (dyn StyleProvider + 'a)) {
        self.providers.push((source, provider));
    }

    /// A copy of this chain with `props` in front as the explicit level.
    pub fn with_explicit(&self, props: &'a ParagraphProps) -> StyleChain<'a> {
        let mut providers = Vec::with_capacity(self.providers.len() + 1);
        providers.push((StyleSource::Explicit, props as &(dyn StyleProvider + 'a)));
        providers.extend(self.providers.iter().copied());
        StyleChain { providers }
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn paragraph_with_source<T>(
        &self,
        level: u8,
        get: impl Fn(&ParagraphProps) -> Option<T>,
    ) -> Option<(StyleSource, T)> {
        self.providers.iter().find_map(|(source, provider)| {
            provider
                .for_level(level)
                .into_iter()
                .flatten()
                .find_map(&get)
                .map(|v| (*source, v))
        })
    }

    pub fn paragraph<T>(&self, level: u8, get: impl Fn(&ParagraphProps) -> Option<T>) -> Option<T> {
        self.paragraph_with_source(level, get).map(|(_, v)| v)
    }

    /// Looks a run property up in each level's default run properties.
    pub fn run<T>(&self, level: u8, get: impl Fn(&RunProps) -> Option<T>) -> Option<T> {
        self.paragraph(level, |p| p.default_run.as_ref().and_then(&get))
    }

    /// Borrowing lookup. Colors must be resolved from the style sheet nodes
    /// themselves, never from clones, since the color cache is keyed by node.
    pub fn paragraph_ref<T: ?Sized>(
        &self,
        level: u8,
        get: impl Fn(&'a ParagraphProps) -> Option<&'a T>,
    ) -> Option<&'a T> {
        self.providers.iter().find_map(|&(_, provider)| {
            provider
                .for_level(level)
                .into_iter()
                .flatten()
                .find_map(&get)
        })
    }

    pub fn run_ref<T: ?Sized>(
        &self,
        level: u8,
        get: impl Fn(&'a RunProps) -> Option<&'a T>,
    ) -> Option<&'a T> {
        self.paragraph_ref(level, |p| p.default_run.as_ref().and_then(&get))
    }
}

/// Placeholder kinds that share inheritance.
fn kind_class(kind: PlaceholderKind) -> PlaceholderKind {
    match kind {
        PlaceholderKind::CtrTitle => PlaceholderKind::Title,
        PlaceholderKind::SubTitle | PlaceholderKind::Obj => PlaceholderKind::Body,
        other => other,
    }
}

pub fn is_title(ph: &PlaceholderRef) -> bool {
    kind_class(ph.kind) == PlaceholderKind::Title
}

/// Finds the placeholder a slide or layout placeholder inherits from:
/// matching `idx` first, then matching kind.
pub fn find_placeholder<'e>(shapes: &'e [Element], ph: &PlaceholderRef) -> Option<&'e Element> {
    if let Some(idx) = ph.idx {
        let by_idx = shapes
            .iter()
            .find(|e| e.placeholder().and_then(|p| p.idx) == Some(idx));
        if by_idx.is_some() {
            return by_idx;
        }
    }
    let class = kind_class(ph.kind);
    shapes.iter().find(|e| {
        e.placeholder()
            .map(|p| kind_class(p.kind) == class)
            .unwrap_or(false)
    })
}

fn element_list_style(element: &Element) -> Option<&ListStyle> {
    match element {
        Element::Shape(s) => s.text.as_ref().and_then(|t| t.list_style.as_ref()),
        _ => None,
    }
}

/// Position inherited from the layout, then the master placeholder.
pub fn inherited_xfrm(ph: &PlaceholderRef, ctx: &RenderContext) -> Option<Xfrm> {
    let from = |shapes: &[Element]| find_placeholder(shapes, ph).and_then(Element::xfrm);
    ctx.layout
        .and_then(|l| from(&l.shapes))
        .or_else(|| ctx.master.and_then(|m| from(&m.shapes)))
}

/// Chain for a text body, without the per-paragraph explicit level.
pub fn build_chain<'a>(
    body: &'a TextBody,
    placeholder: Option<&PlaceholderRef>,
    ctx: &RenderContext<'a>,
) -> StyleChain<'a> {
    let mut chain = StyleChain::new();
    if let Some(list) = body.list_style.as_ref() {
        chain.push(StyleSource::ShapeList, list);
    }
    if let Some(ph) = placeholder {
        if let Some(list) = ctx
            .layout
            .and_then(|l| find_placeholder(&l.shapes, ph))
            .and_then(element_list_style)
        {
            chain.push(StyleSource::LayoutPlaceholder, list);
        }
        if let Some(master) = ctx.master {
            if let Some(list) = find_placeholder(&master.shapes, ph).and_then(element_list_style) {
                chain.push(StyleSource::MasterPlaceholder, list);
            }
            let styles = &master.text_styles;
            let text_style = match kind_class(ph.kind) {
                PlaceholderKind::Title => styles.title.as_ref(),
                PlaceholderKind::Dt
                | PlaceholderKind::SldNum
                | PlaceholderKind::Ftr
                | PlaceholderKind::Hdr => styles.other.as_ref(),
                _ => styles.body.as_ref(),
            };
            if let Some(list) = text_style {
                chain.push(StyleSource::MasterTextStyle, list);
            }
        }
    }
    if let Some(list) = ctx.default_text_style {
        chain.push(StyleSource::Presentation, list);
    }
    chain
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_data::TextAlign;
    use std::collections::BTreeMap;

    fn list(align: TextAlign) -> ListStyle {
        let mut levels = BTreeMap::new();
        levels.insert(
            0,
            ParagraphProps {
                align: Some(align),
                ..Default::default()
            },
        );
        ListStyle {
            default: None,
            levels,
        }
    }

    #[test]
    fn first_hit_wins_and_falls_through() {
        let explicit = ParagraphProps {
            align: Some(TextAlign::Right),
            ..Default::default()
        };
        let layout = list(TextAlign::Center);
        let master = list(TextAlign::Justify);

        let mut chain = StyleChain::new();
        chain.push(StyleSource::LayoutPlaceholder, &layout);
        chain.push(StyleSource::MasterPlaceholder, &master);

        let with_explicit = chain.with_explicit(&explicit);
        assert_eq!(
            with_explicit.paragraph_with_source(0, |p| p.align),
            Some((StyleSource::Explicit, TextAlign::Right))
        );
        assert_eq!(chain.paragraph(0, |p| p.align), Some(TextAlign::Center));

        let mut master_only = StyleChain::new();
        master_only.push(StyleSource::MasterPlaceholder, &master);
        assert_eq!(master_only.paragraph(0, |p| p.align), Some(TextAlign::Justify));
        assert_eq!(master_only.paragraph(3, |p| p.align), None);
    }

    #[test]
    fn list_default_applies_to_undeclared_levels() {
        let style = ListStyle {
            default: Some(ParagraphProps {
                margin_left: Some(12.0),
                ..Default::default()
            }),
            levels: BTreeMap::new(),
        };
        let mut chain = StyleChain::new();
        chain.push(StyleSource::ShapeList, &style);
        assert_eq!(chain.paragraph(4, |p| p.margin_left), Some(12.0));
    }

    #[test]
    fn placeholders_match_by_idx_then_kind() {
        use deck_data::Shape;
        let ph = |kind, idx| PlaceholderRef { kind, idx };
        let shapes = vec![
            Element::Shape(Shape {
                id: 1,
                placeholder: Some(ph(PlaceholderKind::Title, None)),
                ..Default::default()
            }),
            Element::Shape(Shape {
                id: 2,
                placeholder: Some(ph(PlaceholderKind::Body, Some(1))),
                ..Default::default()
            }),
        ];
        let hit = find_placeholder(&shapes, &ph(PlaceholderKind::Obj, Some(1)));
        assert_eq!(hit.and_then(Element::id), Some(2));
        let hit = find_placeholder(&shapes, &ph(PlaceholderKind::CtrTitle, None));
        assert_eq!(hit.and_then(Element::id), Some(1));
    }
}
