use crate::autofit::{HeuristicMeasurer, TextMeasurer};
use crate::color::ResolvedColor;
use crate::config::RenderConfig;
use crate::error::{ErrorSink, NodeError};
use crate::media::{DecodeJob, DecodeKind, DecoderRegistry, DeferredImage, MediaStore, NoMedia};
use deck_data::{Color, ColorMap, Fill, FontRef, Layout, ListStyle, Master, Relationship, Relationships, Theme};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::sync::Arc;

static NO_RELATIONSHIPS: Relationships = Relationships::new();
static NO_DECODERS: DecoderRegistry = DecoderRegistry::new();
static HEURISTIC: HeuristicMeasurer = HeuristicMeasurer;
static NO_MEDIA: NoMedia = NoMedia;

/// Relationship scope of the part currently being rendered.
#[derive(Clone, Copy)]
pub struct PartScope<'a> {
    pub path: &'a str,
    pub relationships: &'a Relationships,
}

impl<'a> PartScope<'a> {
    pub fn lookup(&self, r_id: &str) -> Option<&'a Relationship> {
        self.relationships.get(r_id)
    }
}

/// What hyperlinks may resolve to during this pass.
#[derive(Clone, Copy, Default)]
pub struct LinkScope<'a> {
    /// False when no navigation callback is installed.
    pub enabled: bool,
    pub current_slide: usize,
    /// Package paths of all slides, in presentation order.
    pub slide_paths: &'a [String],
}

/// Everything a resolver may read. Cheap to clone: all fields are borrows
/// or small values, and nested scopes are derived with the `with_*` helpers.
#[derive(Clone)]
pub struct RenderContext<'a> {
    pub theme: &'a Theme,
    /// Effective map: slide override, else layout override, else master map.
    pub color_map: &'a ColorMap,
    pub master: Option<&'a Master>,
    pub layout: Option<&'a Layout>,
    pub default_text_style: Option<&'a ListStyle>,
    pub part: PartScope<'a>,
    pub media: &'a dyn MediaStore,
    pub decoders: &'a DecoderRegistry,
    pub measurer: &'a dyn TextMeasurer,
    pub config: &'a RenderConfig,
    pub caches: &'a ResolveCaches,
    pub errors: Option<&'a dyn ErrorSink>,
    pub links: LinkScope<'a>,
    /// Concrete fill exposed by the nearest enclosing group.
    pub group_fill: Option<&'a Fill>,
    /// Stands in for `phClr` while resolving a theme style entry.
    pub placeholder_color: Option<ResolvedColor>,
    /// `fontRef` of the shape whose text is being laid out.
    pub font_ref: Option<&'a FontRef>,
    pub depth: usize,
}

impl<'a> RenderContext<'a> {
    pub fn new(
        theme: &'a Theme,
        color_map: &'a ColorMap,
        config: &'a RenderConfig,
        caches: &'a ResolveCaches,
    ) -> Self {
        Self {
            theme,
            color_map,
            master: None,
            layout: None,
            default_text_style: None,
            part: PartScope {
                path: "",
                relationships: &NO_RELATIONSHIPS,
            },
            media: &NO_MEDIA,
            decoders: &NO_DECODERS,
            measurer: &HEURISTIC,
            config,
            caches,
            errors: None,
            links: LinkScope::default(),
            group_fill: None,
            placeholder_color: None,
            font_ref: None,
            depth: 0,
        }
    }

    pub fn with_part(mut self, path: &'a str, relationships: &'a Relationships) -> Self {
        self.part = PartScope {
            path,
            relationships,
        };
        self
    }

    pub fn with_media(mut self, media: &'a dyn MediaStore) -> Self {
        self.media = media;
        self
    }

    pub fn with_decoders(mut self, decoders: &'a DecoderRegistry) -> Self {
        self.decoders = decoders;
        self
    }

    pub fn with_measurer(mut self, measurer: &'a dyn TextMeasurer) -> Self {
        self.measurer = measurer;
        self
    }

    pub fn with_errors(mut self, sink: &'a dyn ErrorSink) -> Self {
        self.errors = Some(sink);
        self
    }

    pub fn with_links(mut self, links: LinkScope<'a>) -> Self {
        self.links = links;
        self
    }

    pub fn with_masters(mut self, master: Option<&'a Master>, layout: Option<&'a Layout>) -> Self {
        self.master = master;
        self.layout = layout;
        self
    }

    pub fn with_default_text_style(mut self, style: Option<&'a ListStyle>) -> Self {
        self.default_text_style = style;
        self
    }

    pub fn with_group_fill(&self, fill: Option<&'a Fill>) -> Self {
        Self {
            group_fill: fill,
            ..self.clone()
        }
    }

    pub fn with_placeholder_color(&self, color: Option<ResolvedColor>) -> Self {
        Self {
            placeholder_color: color,
            ..self.clone()
        }
    }

    pub fn with_font_ref(&self, font_ref: Option<&'a FontRef>) -> Self {
        Self {
            font_ref,
            ..self.clone()
        }
    }

    pub fn nested(&self) -> Self {
        Self {
            depth: self.depth + 1,
            ..self.clone()
        }
    }

    pub fn report(&self, node_id: Option<u32>, message: impl Into<String>) {
        if let Some(sink) = self.errors {
            sink.report(NodeError {
                node_id,
                message: message.into(),
            });
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct ColorKey {
    node: usize,
    placeholder: Option<(u8, u8, u8, u64)>,
}

/// Per-document caches. The color cache lives for one render pass; media
/// URLs and decode slots live as long as the document.
#[derive(Default)]
pub struct ResolveCaches {
    colors: RefCell<HashMap<ColorKey, Arc<ResolvedColor>>>,
    media_urls: RefCell<HashMap<String, Arc<str>>>,
    decodes: RefCell<HashMap<(String, DecodeKind), DeferredImage>>,
    pending: RefCell<Vec<DecodeJob>>,
    pass: Cell<u64>,
}

impl ResolveCaches {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a render pass. Color entries from earlier passes are dropped
    /// since node addresses and themes may differ.
    pub fn begin_pass(&self) {
        self.colors.borrow_mut().clear();
        self.pass.set(self.pass.get() + 1);
    }

    pub fn pass(&self) -> u64 {
        self.pass.get()
    }

    pub(crate) fn color_entry(
        &self,
        color: &Color,
        placeholder: Option<ResolvedColor>,
        compute: impl FnOnce() -> ResolvedColor,
    ) -> Arc<ResolvedColor> {
        let key = ColorKey {
            node: color as *const Color as usize,
            placeholder: placeholder.map(|c| (c.r, c.g, c.b, c.alpha.to_bits())),
        };
        if let Some(hit) = self.colors.borrow().get(&key) {
            return Arc::clone(hit);
        }
        let resolved = Arc::new(compute());
        self.colors
            .borrow_mut()
            .entry(key)
            .or_insert(resolved)
            .clone()
    }

    pub(crate) fn media_url(&self, path: &str, build: impl FnOnce() -> Option<String>) -> Option<Arc<str>> {
        if let Some(hit) = self.media_urls.borrow().get(path) {
            return Some(Arc::clone(hit));
        }
        let url: Arc<str> = Arc::from(build()?);
        self.media_urls
            .borrow_mut()
            .insert(path.to_string(), Arc::clone(&url));
        Some(url)
    }

    /// Returns the shared slot for `(path, kind)`, queueing a decode job the
    /// first time the pair is seen.
    pub(crate) fn deferred_decode(
        &self,
        path: &str,
        kind: DecodeKind,
        bytes: &[u8],
    ) -> DeferredImage {
        let key = (path.to_string(), kind);
        if let Some(slot) = self.decodes.borrow().get(&key) {
            return slot.clone();
        }
        let slot = DeferredImage::pending(path);
        self.pending.borrow_mut().push(DecodeJob {
            path: path.to_string(),
            kind,
            bytes: bytes.to_vec(),
            slot: slot.clone(),
        });
        self.decodes.borrow_mut().insert(key, slot.clone());
        slot
    }

    pub(crate) fn take_pending(&self) -> Vec<DecodeJob> {
        std::mem::take(&mut *self.pending.borrow_mut())
    }

    pub fn pending_decodes(&self) -> usize {
        self.pending.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::resolve_color;
    use deck_data::ColorScheme;

    fn theme() -> Theme {
        Theme {
            color_scheme: ColorScheme::from_pairs(&[("lt1", "FFFFFF"), ("dk1", "000000")]),
            ..Default::default()
        }
    }

    #[test]
    fn same_node_resolves_to_the_same_arc() {
        let theme = theme();
        let map = ColorMap::default();
        let config = RenderConfig::default();
        let caches = ResolveCaches::new();
        let ctx = RenderContext::new(&theme, &map, &config, &caches);

        let color = Color::scheme("bg1");
        let first = resolve_color(&color, &ctx);
        let second = resolve_color(&color, &ctx);
        assert!(Arc::ptr_eq(&first, &second));

        // An equal node elsewhere gets its own entry.
        let copy = color.clone();
        let other = resolve_color(&copy, &ctx);
        assert_eq!(*other, *first);
        assert!(!Arc::ptr_eq(&other, &first));

        // `phClr` substitution is part of the key.
        let tinted = ctx.with_placeholder_color(Some(ResolvedColor::rgb(1, 2, 3)));
        assert!(!Arc::ptr_eq(&resolve_color(&color, &tinted), &first));
    }

    #[test]
    fn entries_are_write_once_until_the_next_pass() {
        let theme = theme();
        let light = ColorMap::default();
        let dark = ColorMap([("bg1".to_string(), "dk1".to_string())].into_iter().collect());
        let config = RenderConfig::default();
        let caches = ResolveCaches::new();
        let color = Color::scheme("bg1");

        caches.begin_pass();
        let first = resolve_color(&color, &RenderContext::new(&theme, &light, &config, &caches));
        assert_eq!(first.hex(), "#FFFFFF");
        // Within one pass the first resolution sticks.
        let stale = resolve_color(&color, &RenderContext::new(&theme, &dark, &config, &caches));
        assert!(Arc::ptr_eq(&first, &stale));

        caches.begin_pass();
        assert_eq!(caches.pass(), 2);
        let fresh = resolve_color(&color, &RenderContext::new(&theme, &dark, &config, &caches));
        assert_eq!(fresh.hex(), "#000000");
        assert!(!Arc::ptr_eq(&first, &fresh));
    }
}
