//! Click targets for shapes and text runs.

use crate::context::RenderContext;
use crate::media::resolve_target;
use deck_data::{Hyperlink, TargetMode};

const SLIDE_JUMP: &str = "ppaction://hlinksldjump";
const SHOW_JUMP: &str = "ppaction://hlinkshowjump";

/// Only web links leave the document.
pub fn is_navigable_url(url: &str) -> bool {
    let lower = url.trim().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    Url(String),
    /// Zero-based slide index.
    Slide(usize),
}

/// What the navigation callback receives.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NavigationRequest {
    pub slide_index: Option<usize>,
    pub url: Option<String>,
}

impl From<&LinkTarget> for NavigationRequest {
    fn from(target: &LinkTarget) -> Self {
        match target {
            LinkTarget::Url(url) => NavigationRequest {
                slide_index: None,
                url: Some(url.clone()),
            },
            LinkTarget::Slide(index) => NavigationRequest {
                slide_index: Some(*index),
                url: None,
            },
        }
    }
}

/// Resolves a click action. `None` when links are disabled for this pass,
/// when the relationship is missing, or when the target is not navigable.
pub fn resolve_link(link: &Hyperlink, ctx: &RenderContext) -> Option<LinkTarget> {
    if !ctx.links.enabled {
        return None;
    }
    let action = link.action.as_deref().unwrap_or("");
    if let Some(rest) = action.strip_prefix(SHOW_JUMP) {
        return show_jump(rest, ctx);
    }
    if action.starts_with(SLIDE_JUMP) {
        return slide_jump(link, ctx);
    }
    if action.starts_with("ppaction://") {
        tracing::debug!(action, "unsupported click action");
        return None;
    }

    let r_id = link.r_id.as_deref()?;
    let Some(rel) = ctx.part.lookup(r_id) else {
        tracing::warn!(part = ctx.part.path, r_id, "hyperlink relationship not found");
        return None;
    };
    match rel.target_mode {
        TargetMode::External if is_navigable_url(&rel.target) => Some(LinkTarget::Url(rel.target.clone())),
        TargetMode::External => {
            tracing::debug!(target = %rel.target, "refusing non-web hyperlink");
            None
        }
        // An internal target on a plain link is a slide part.
        TargetMode::Internal => slide_index(&rel.target, ctx).map(LinkTarget::Slide),
    }
}

fn slide_jump(link: &Hyperlink, ctx: &RenderContext) -> Option<LinkTarget> {
    let rel = ctx.part.lookup(link.r_id.as_deref()?)?;
    slide_index(&rel.target, ctx).map(LinkTarget::Slide)
}

fn slide_index(target: &str, ctx: &RenderContext) -> Option<usize> {
    let path = resolve_target(ctx.part.path, target);
    ctx.links.slide_paths.iter().position(|p| *p == path)
}

fn show_jump(query: &str, ctx: &RenderContext) -> Option<LinkTarget> {
    let jump = query
        .trim_start_matches('?')
        .split('&')
        .find_map(|kv| kv.strip_prefix("jump="))?;
    let current = ctx.links.current_slide;
    let last = ctx.links.slide_paths.len().checked_sub(1)?;
    let index = match jump {
        "nextslide" => (current + 1).min(last),
        "previousslide" => current.saturating_sub(1),
        "firstslide" => 0,
        "lastslide" => last,
        other => {
            tracing::debug!(jump = other, "unsupported show jump");
            return None;
        }
    };
    Some(LinkTarget::Slide(index))
}
