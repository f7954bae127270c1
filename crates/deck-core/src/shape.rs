//! Leaf rendering: shapes, connectors, pictures and graphic frames.

use crate::color::ResolvedColor;
use crate::context::RenderContext;
use crate::effects::resolve_effects;
use crate::error::{ResolveError, Result};
use crate::geometry::{attribute_paths, resolve_geometry_with};
use crate::group::LeafRenderer;
use crate::hyperlink::resolve_link;
use crate::line::{resolve_line_style, LineStyle};
use crate::markers::build_markers;
use crate::media::{resolve_blip, resolve_target, ImageSource};
use crate::paint::{resolve_fill, shape_fill, Paint};
use crate::renderer::{
    CellBorderStyles, Frame, PictureVisual, PlaceholderReason, ShapeVisual, TableCellVisual, TableVisual,
    VisualContent, VisualNode,
};
use crate::text::layout_text;
use deck_data::{Connector, Element, FrameContent, GraphicFrame, Line, Picture, Shape, Table};
use kurbo::{Rect, Size};

/// The stock leaf renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShapeRenderer;

impl LeafRenderer for ShapeRenderer {
    fn render<'a>(&self, element: &'a Element, frame: Frame, ctx: &RenderContext<'a>) -> Result<VisualNode> {
        let (content, extent) = match element {
            Element::Shape(shape) => render_shape(shape, frame, ctx),
            Element::Connector(connector) => render_connector(connector, frame, ctx),
            Element::Picture(picture) => (render_picture(picture, frame, ctx), frame_size(frame)),
            Element::GraphicFrame(graphic) => (render_frame(graphic, frame, ctx)?, frame_size(frame)),
            Element::Group(_) | Element::Unknown => {
                return Err(ResolveError::Leaf(format!(
                    "element {:?} is not a leaf",
                    element.id()
                )))
            }
        };
        let link = match element {
            Element::Shape(Shape { hyperlink, .. }) | Element::Picture(Picture { hyperlink, .. }) => {
                hyperlink.as_ref().and_then(|l| resolve_link(l, ctx))
            }
            _ => None,
        };
        Ok(VisualNode {
            id: element.id(),
            name: element.name().to_string(),
            frame: frame.with_size(extent),
            content,
            link,
        })
    }
}

fn placeholder(reason: PlaceholderReason, message: String) -> VisualContent {
    VisualContent::Placeholder {
        reason,
        message,
        color: ResolvedColor::rgb(200, 200, 200),
    }
}

fn frame_size(frame: Frame) -> Size {
    Size::new(frame.width, frame.height)
}

/// Returns the shape content and its box extent. The extent never drops
/// below one unit, so flat shapes keep a hit box; paths use the real size.
pub fn render_shape<'a>(shape: &'a Shape, frame: Frame, ctx: &RenderContext<'a>) -> (VisualContent, Size) {
    let style = shape.style.as_ref();
    let size = frame_size(frame);
    let geometry = resolve_geometry_with(shape.geometry.as_ref(), size, ctx.config.curve_tolerance);
    let fill = shape_fill(shape.fill.as_ref(), style.and_then(|s| s.fill_ref.as_ref()), ctx);
    let line = resolve_line_style(shape.line.as_ref(), ctx, style.and_then(|s| s.ln_ref.as_ref()));
    let effects = resolve_effects(
        shape.effects.as_ref(),
        style.and_then(|s| s.effect_ref.as_ref()),
        size,
        ctx,
    );
    let text = shape.text.as_ref().map(|body| {
        let text_ctx = ctx.with_font_ref(style.and_then(|s| s.font_ref.as_ref()));
        layout_text(body, shape.placeholder.as_ref(), &text_ctx, size)
    });

    let content = VisualContent::Shape(ShapeVisual {
        markers: build_markers(&geometry.paths, &line, ctx.config),
        paths: attribute_paths(&geometry.paths, &fill, &line),
        effects,
        text,
    });
    (content, geometry.size)
}

pub fn render_connector(connector: &Connector, frame: Frame, ctx: &RenderContext) -> (VisualContent, Size) {
    let style = connector.style.as_ref();
    let size = frame_size(frame);
    let geometry = resolve_geometry_with(connector.geometry.as_ref(), size, ctx.config.curve_tolerance);
    let line = resolve_line_style(connector.line.as_ref(), ctx, style.and_then(|s| s.ln_ref.as_ref()));
    let content = VisualContent::Shape(ShapeVisual {
        markers: build_markers(&geometry.paths, &line, ctx.config),
        paths: attribute_paths(&geometry.paths, &Paint::Empty, &line),
        effects: resolve_effects(
            connector.effects.as_ref(),
            style.and_then(|s| s.effect_ref.as_ref()),
            size,
            ctx,
        ),
        text: None,
    });
    (content, geometry.size)
}

pub fn render_picture(picture: &Picture, frame: Frame, ctx: &RenderContext) -> VisualContent {
    let image = resolve_blip(&picture.blip, ctx);
    match &image.source {
        ImageSource::Unsupported { path, format } => {
            return placeholder(
                PlaceholderReason::Unsupported,
                format!("unsupported format `{format}` for {path}"),
            )
        }
        ImageSource::Missing => {
            tracing::warn!(id = picture.id, "picture media missing");
            return placeholder(
                PlaceholderReason::Missing,
                format!("media for picture {} not found", picture.id),
            );
        }
        ImageSource::Url(_) | ImageSource::Deferred(_) => {}
    }

    let style = picture.style.as_ref();
    let size = frame_size(frame);
    let mask = picture
        .geometry
        .as_ref()
        .filter(|g| g.preset_name() != Some("rect"))
        .map(|g| {
            resolve_geometry_with(Some(g), size, ctx.config.curve_tolerance)
                .paths
                .into_iter()
                .map(|p| p.path)
                .collect()
        });
    let line = resolve_line_style(picture.line.as_ref(), ctx, style.and_then(|s| s.ln_ref.as_ref()));

    VisualContent::Picture(PictureVisual {
        image,
        mask,
        line: line.is_visible().then_some(line),
        effects: resolve_effects(
            picture.effects.as_ref(),
            style.and_then(|s| s.effect_ref.as_ref()),
            size,
            ctx,
        ),
    })
}

fn render_frame<'a>(graphic: &'a GraphicFrame, frame: Frame, ctx: &RenderContext<'a>) -> Result<VisualContent> {
    match &graphic.content {
        FrameContent::Table(table) => Ok(VisualContent::Table(render_table(table, ctx))),
        FrameContent::Chart { r_id } => {
            let rel = ctx
                .part
                .lookup(r_id)
                .ok_or_else(|| ResolveError::MissingReference(r_id.clone()))?;
            Ok(VisualContent::Chart {
                part: resolve_target(ctx.part.path, &rel.target),
            })
        }
        FrameContent::OleObject {
            fallback: Some(picture),
            ..
        } => Ok(render_picture(picture, frame, ctx)),
        FrameContent::OleObject { prog_id, fallback: None } => Ok(placeholder(
            PlaceholderReason::Unsupported,
            format!(
                "embedded object {} has no preview",
                prog_id.as_deref().unwrap_or("of unknown type")
            ),
        )),
        FrameContent::Unknown => Ok(placeholder(
            PlaceholderReason::Unsupported,
            "unsupported graphic frame".to_string(),
        )),
    }
}

/// Cell rectangles from the grid, honoring spans. Continuation cells of a
/// merge are covered by their anchor and produce nothing.
pub fn render_table<'a>(table: &'a Table, ctx: &RenderContext<'a>) -> TableVisual {
    let offsets = |sizes: &mut dyn Iterator<Item = f64>| {
        let mut acc = vec![0.0];
        for size in sizes {
            let last = acc.last().copied().unwrap_or(0.0);
            acc.push(last + size.max(0.0));
        }
        acc
    };
    let xs = offsets(&mut table.columns.iter().copied());
    let ys = offsets(&mut table.rows.iter().map(|r| r.height));
    let border = |line: &Option<Line>| {
        line.as_ref()
            .map(|l| resolve_line_style(Some(l), ctx, None))
            .filter(LineStyle::is_visible)
    };

    let mut cells = Vec::new();
    for (row, table_row) in table.rows.iter().enumerate() {
        for (column, cell) in table_row.cells.iter().enumerate() {
            if cell.h_merge || cell.v_merge || column >= table.columns.len() {
                continue;
            }
            let column_end = (column + cell.grid_span.max(1) as usize).min(table.columns.len());
            let row_end = (row + cell.row_span.max(1) as usize).min(table.rows.len());
            let rect = Rect::new(xs[column], ys[row], xs[column_end], ys[row_end]);
            cells.push(TableCellVisual {
                row,
                column,
                rect,
                fill: resolve_fill(cell.fill.as_ref(), ctx),
                borders: CellBorderStyles {
                    left: border(&cell.borders.left),
                    top: border(&cell.borders.top),
                    right: border(&cell.borders.right),
                    bottom: border(&cell.borders.bottom),
                },
                text: cell
                    .text
                    .as_ref()
                    .map(|body| layout_text(body, None, ctx, rect.size())),
            });
        }
    }
    TableVisual { cells }
}
