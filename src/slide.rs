use crate::error::{EngineError, Result};
use anyhow::Context as _;
use deck_core::context::{LinkScope, RenderContext, ResolveCaches};
use deck_core::group::{compose_elements, render_child, ChildSpace};
use deck_core::{
    resolve_background, DecoderRegistry, ErrorSink, HeuristicMeasurer, LinkTarget, NavigationRequest,
    NodeError, RasterDecoder, RenderConfig, ShapeRenderer, TextMeasurer, VisualNode, VisualTree,
};
use deck_data::{ColorMap, Document, Element, Layout, Master, Slide, Theme};
use std::io::Read;
use std::sync::Arc;

/// Reads a [`RenderConfig`] from JSON. Missing fields keep their defaults.
pub fn load_config(reader: impl Read) -> anyhow::Result<RenderConfig> {
    serde_json::from_reader(reader).context("failed to parse render config")
}

/// Reads a parsed document model from JSON.
pub fn load_document(reader: impl Read) -> anyhow::Result<Document> {
    serde_json::from_reader(reader).context("failed to parse document model")
}

/// The parts one slide renders against.
#[derive(Clone, Copy)]
pub struct SlideParts<'d> {
    pub slide: &'d Slide,
    pub layout: &'d Layout,
    pub master: &'d Master,
    pub theme: &'d Theme,
}

impl<'d> SlideParts<'d> {
    pub fn of(document: &'d Document, index: usize) -> Result<Self> {
        let slide = document.slides.get(index).ok_or(EngineError::SlideOutOfRange {
            index,
            count: document.slides.len(),
        })?;
        let layout = document.layouts.get(slide.layout).ok_or(EngineError::MissingLayout {
            slide: index,
            layout: slide.layout,
        })?;
        let master = document.masters.get(layout.master).ok_or(EngineError::MissingMaster {
            layout: slide.layout,
            master: layout.master,
        })?;
        let theme = document.themes.get(master.theme).ok_or(EngineError::MissingTheme {
            master: layout.master,
            theme: master.theme,
        })?;
        Ok(Self {
            slide,
            layout,
            master,
            theme,
        })
    }

    /// Slide override, then layout override, then the master map.
    pub fn color_map(&self) -> &'d ColorMap {
        self.slide
            .color_map_override
            .as_ref()
            .or(self.layout.color_map_override.as_ref())
            .unwrap_or(&self.master.color_map)
    }
}

type NavigateFn = Box<dyn Fn(NavigationRequest)>;
type ErrorFn = Box<dyn Fn(NodeError)>;

/// Turns the slides of one document into visual trees.
///
/// Owns the per-document caches, so media URLs and legacy image decodes are
/// shared across every slide rendered through the same instance.
pub struct SlideRenderer {
    document: Arc<Document>,
    config: RenderConfig,
    caches: ResolveCaches,
    decoders: DecoderRegistry,
    measurer: Box<dyn TextMeasurer>,
    on_navigate: Option<NavigateFn>,
    on_error: Option<ErrorFn>,
    slide_paths: Vec<String>,
}

impl SlideRenderer {
    pub fn new(document: impl Into<Arc<Document>>) -> Self {
        let document = document.into();
        let slide_paths = document.slides.iter().map(|s| s.path.clone()).collect();
        Self {
            document,
            config: RenderConfig::default(),
            caches: ResolveCaches::new(),
            decoders: DecoderRegistry::new(),
            measurer: Box::new(HeuristicMeasurer),
            on_navigate: None,
            on_error: None,
            slide_paths,
        }
    }

    pub fn with_config(mut self, config: RenderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_config_json(self, json: &str) -> Result<Self> {
        let config = RenderConfig::from_json_str(json)?;
        Ok(self.with_config(config))
    }

    pub fn set_text_measurer(&mut self, measurer: Box<dyn TextMeasurer>) {
        self.measurer = measurer;
    }

    pub fn register_decoder(&mut self, decoder: Box<dyn RasterDecoder>) {
        self.decoders.register(decoder);
    }

    /// Installs the navigation callback. Nodes carry link targets only
    /// while one is installed.
    pub fn on_navigate(&mut self, callback: impl Fn(NavigationRequest) + 'static) {
        self.on_navigate = Some(Box::new(callback));
    }

    pub fn on_error(&mut self, callback: impl Fn(NodeError) + 'static) {
        self.on_error = Some(Box::new(callback));
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn slide_count(&self) -> usize {
        self.document.slides.len()
    }

    pub fn render_slide(&self, index: usize) -> Result<VisualTree> {
        let document = &*self.document;
        let parts = SlideParts::of(document, index)?;
        let SlideParts {
            slide,
            layout,
            master,
            theme,
        } = parts;

        self.caches.begin_pass();
        let mut ctx = RenderContext::new(theme, parts.color_map(), &self.config, &self.caches)
            .with_masters(Some(master), Some(layout))
            .with_default_text_style(document.default_text_style.as_ref())
            .with_media(&document.media)
            .with_decoders(&self.decoders)
            .with_measurer(self.measurer.as_ref());
        if let Some(sink) = self.on_error.as_ref() {
            ctx = ctx.with_errors(sink as &dyn ErrorSink);
        }
        if self.on_navigate.is_some() {
            ctx = ctx.with_links(LinkScope {
                enabled: true,
                current_slide: index,
                slide_paths: &self.slide_paths,
            });
        }

        let background = resolve_background(slide, Some(layout), Some(master), &ctx);

        let mut nodes = Vec::new();
        if slide.show_master_shapes {
            if layout.show_master_shapes {
                let master_ctx = ctx.clone().with_part(&master.path, &master.relationships);
                nodes.extend(decorations(&master.shapes, &master_ctx));
            }
            let layout_ctx = ctx.clone().with_part(&layout.path, &layout.relationships);
            nodes.extend(decorations(&layout.shapes, &layout_ctx));
        }
        let slide_ctx = ctx.with_part(&slide.path, &slide.relationships);
        nodes.extend(compose_elements(&slide.shapes, &slide_ctx, &ShapeRenderer));

        tracing::debug!(
            slide = index,
            nodes = nodes.len(),
            pending_decodes = self.caches.pending_decodes(),
            "slide resolved"
        );
        Ok(VisualTree {
            width: document.slide_width,
            height: document.slide_height,
            background,
            nodes,
        })
    }

    /// Hands a link target to the navigation callback. Returns false when
    /// no callback is installed.
    pub fn navigate(&self, target: &LinkTarget) -> bool {
        match &self.on_navigate {
            Some(callback) => {
                callback(NavigationRequest::from(target));
                true
            }
            None => false,
        }
    }

    /// Navigates to the link of a rendered node, if it has one.
    pub fn activate(&self, node: &VisualNode) -> bool {
        node.link.as_ref().is_some_and(|target| self.navigate(target))
    }

    /// Decodes every legacy image queued by earlier renders. Deferred images
    /// already handed out pick up the result through their shared slot.
    pub fn run_pending_decodes(&self) -> usize {
        deck_core::run_pending_decodes(&self.caches, &self.decoders)
    }

    pub fn pending_decodes(&self) -> usize {
        self.caches.pending_decodes()
    }
}

/// Master and layout shapes drawn under the slide. Placeholders only carry
/// inherited properties and are never drawn themselves.
fn decorations<'a>(shapes: &'a [Element], ctx: &RenderContext<'a>) -> Vec<VisualNode> {
    shapes
        .iter()
        .filter(|e| e.placeholder().is_none())
        .filter_map(|e| render_child(e, ctx, &ShapeRenderer, &ChildSpace::IDENTITY))
        .collect()
}
