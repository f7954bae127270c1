//! Recursive group composition with per-child failure isolation.

use crate::color::ResolvedColor;
use crate::context::RenderContext;
use crate::error::{ResolveError, Result};
use crate::renderer::{Frame, PlaceholderReason, VisualContent, VisualNode};
use crate::style::inherited_xfrm;
use deck_data::{Element, Fill, FrameContent, Group, GroupXfrm, Xfrm};
use glam::DVec2;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Renders one non-group element into a node at `frame`.
pub trait LeafRenderer {
    fn render<'a>(&self, element: &'a Element, frame: Frame, ctx: &RenderContext<'a>) -> Result<VisualNode>;
}

/// Linear map from a group's child coordinate space into its local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChildSpace {
    pub offset: DVec2,
    pub scale: DVec2,
}

impl ChildSpace {
    pub const IDENTITY: ChildSpace = ChildSpace {
        offset: DVec2::ZERO,
        scale: DVec2::ONE,
    };

    /// `(child - chOff) / chExt * size`. A zero extent on either axis means
    /// the document never set up a child space: children are used as-is.
    pub fn of(xfrm: &GroupXfrm) -> Self {
        if xfrm.ch_ext_w == 0.0 || xfrm.ch_ext_h == 0.0 {
            return Self::IDENTITY;
        }
        Self {
            offset: DVec2::new(xfrm.ch_off_x, xfrm.ch_off_y),
            scale: DVec2::new(xfrm.frame.w / xfrm.ch_ext_w, xfrm.frame.h / xfrm.ch_ext_h),
        }
    }

    pub fn map(&self, xfrm: &Xfrm) -> Frame {
        let position = (DVec2::new(xfrm.x, xfrm.y) - self.offset) * self.scale;
        let size = DVec2::new(xfrm.w, xfrm.h) * self.scale;
        Frame {
            x: position.x,
            y: position.y,
            width: size.x,
            height: size.y,
            ..Frame::from_xfrm(xfrm)
        }
    }
}

/// Composes a group placed at its own declared frame.
pub fn compose_group<'a>(group: &'a Group, ctx: &RenderContext<'a>, leaf: &dyn LeafRenderer) -> VisualNode {
    compose_group_at(group, Frame::from_xfrm(&group.xfrm.frame), ctx, leaf)
}

fn compose_group_at<'a>(
    group: &'a Group,
    frame: Frame,
    ctx: &RenderContext<'a>,
    leaf: &dyn LeafRenderer,
) -> VisualNode {
    let limit = ctx.config.max_group_depth;
    if ctx.depth >= limit {
        let error = ResolveError::DepthExceeded(limit);
        return failed_node(Some(group.id), &group.name, frame, &error.to_string(), ctx);
    }
    let inner = ctx
        .nested()
        .with_group_fill(inherited_group_fill(group.fill.as_ref(), ctx));
    let children = compose_children(&group.children, &inner, leaf, &ChildSpace::of(&group.xfrm));
    VisualNode {
        id: Some(group.id),
        name: group.name.clone(),
        frame,
        content: VisualContent::Group(children),
        link: None,
    }
}

/// Top-level elements of a slide, layout or master.
pub fn compose_elements<'a>(
    elements: &'a [Element],
    ctx: &RenderContext<'a>,
    leaf: &dyn LeafRenderer,
) -> Vec<VisualNode> {
    compose_children(elements, ctx, leaf, &ChildSpace::IDENTITY)
}

/// The fill a group exposes to `grpFill` children: its own concrete fill,
/// the parent's when it is itself `grpFill`, nothing when it declares none.
pub fn inherited_group_fill<'a>(fill: Option<&'a Fill>, ctx: &RenderContext<'a>) -> Option<&'a Fill> {
    match fill {
        Some(Fill::Group) => ctx.group_fill,
        Some(concrete) => Some(concrete),
        None => None,
    }
}

/// Source indices in render order. Three pies with three circular arrows
/// form a cycle diagram whose arrows belong underneath the pie segments.
pub fn render_order(children: &[Element]) -> Vec<usize> {
    let of_kind = |name: &str| -> Vec<usize> {
        children
            .iter()
            .enumerate()
            .filter(|(_, c)| c.preset_name() == Some(name))
            .map(|(i, _)| i)
            .collect()
    };
    let pies = of_kind("pie");
    let arrows = of_kind("circularArrow");
    if children.len() == 6 && pies.len() == 3 && arrows.len() == 3 {
        return arrows.into_iter().chain(pies).collect();
    }
    (0..children.len()).collect()
}

fn compose_children<'a>(
    children: &'a [Element],
    ctx: &RenderContext<'a>,
    leaf: &dyn LeafRenderer,
    space: &ChildSpace,
) -> Vec<VisualNode> {
    render_order(children)
        .into_iter()
        .filter_map(|i| render_child(&children[i], ctx, leaf, space))
        .collect()
}

/// Renders one child, turning errors and panics into an error placeholder.
/// `None` for children that are skipped on purpose.
pub fn render_child<'a>(
    child: &'a Element,
    ctx: &RenderContext<'a>,
    leaf: &dyn LeafRenderer,
    space: &ChildSpace,
) -> Option<VisualNode> {
    match child {
        Element::Unknown => return None,
        Element::GraphicFrame(frame) => {
            if let FrameContent::Chart { r_id } = &frame.content {
                if ctx.part.lookup(r_id).is_none() {
                    tracing::debug!(id = frame.id, r_id = %r_id, "chart relationship missing, skipping frame");
                    return None;
                }
            }
        }
        _ => {}
    }

    let xfrm = child
        .xfrm()
        .or_else(|| child.placeholder().and_then(|ph| inherited_xfrm(ph, ctx)));
    let frame = xfrm.map(|x| space.map(&x)).unwrap_or_default();

    let outcome = catch_unwind(AssertUnwindSafe(|| match child {
        Element::Group(group) => Ok(compose_group_at(group, frame, ctx, leaf)),
        other => leaf.render(other, frame, ctx),
    }));
    let message = match outcome {
        Ok(Ok(node)) => return Some(node),
        Ok(Err(error)) => error.to_string(),
        Err(payload) => payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "panic while rendering".to_string()),
    };
    Some(failed_node(child.id(), child.name(), frame, &message, ctx))
}

fn failed_node(id: Option<u32>, name: &str, frame: Frame, message: &str, ctx: &RenderContext) -> VisualNode {
    tracing::warn!(node = ?id, name, error = message, "child failed to render");
    ctx.report(id, message);
    VisualNode {
        id,
        name: name.to_string(),
        frame,
        content: VisualContent::Placeholder {
            reason: PlaceholderReason::Error,
            message: message.to_string(),
            color: ResolvedColor::from_hex(&ctx.config.error_placeholder_color)
                .unwrap_or(ResolvedColor::rgb(224, 36, 94)),
        },
        link: None,
    }
}
