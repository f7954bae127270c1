use crate::context::RenderContext;
use crate::paint::{resolve_fill, style_ctx, Paint};
use deck_data::{Dash, Line, LineCap, LineEnd, LineEndKind, LineJoin, StyleRef};

/// A resolved stroke.
#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    /// px
    pub width: f64,
    pub paint: Paint,
    /// Dash/gap lengths in px, empty for a solid line.
    pub dash: Vec<f64>,
    pub cap: LineCap,
    pub join: LineJoin,
    pub head: Option<LineEnd>,
    pub tail: Option<LineEnd>,
}

impl LineStyle {
    pub fn none() -> Self {
        Self {
            width: 0.0,
            paint: Paint::Transparent,
            dash: Vec::new(),
            cap: LineCap::Flat,
            join: LineJoin::Round,
            head: None,
            tail: None,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.width > 0.0 && self.paint.is_visible()
    }

    pub fn has_markers(&self) -> bool {
        let real = |end: &Option<LineEnd>| {
            end.map(|e| !matches!(e.kind, LineEndKind::None | LineEndKind::Unknown))
                .unwrap_or(false)
        };
        self.is_visible() && (real(&self.head) || real(&self.tail))
    }
}

impl Default for LineStyle {
    fn default() -> Self {
        Self::none()
    }
}

const DEFAULT_WIDTH: f64 = 1.0;

/// Merges an explicit `a:ln` over the theme line style picked by `lnRef`.
///
/// `lnRef idx = 0` means no line: only an explicit line fill brings the
/// stroke back. An index past the theme list behaves as if no reference
/// was given.
pub fn resolve_line_style(
    line: Option<&Line>,
    ctx: &RenderContext,
    ln_ref: Option<&StyleRef>,
) -> LineStyle {
    let (base, base_ctx) = match ln_ref {
        Some(r) if r.idx == 0 => {
            let explicit_fill = line.and_then(|l| l.fill.as_ref());
            if explicit_fill.is_none() {
                return LineStyle::none();
            }
            (None, None)
        }
        Some(r) => {
            let styles = &ctx.theme.format_scheme.line_styles;
            match styles.get(r.idx as usize - 1) {
                Some(theme_line) => (Some(theme_line), Some(style_ctx(r, ctx))),
                None => {
                    tracing::debug!(idx = r.idx, available = styles.len(), "no theme line found");
                    (None, None)
                }
            }
        }
        None => (None, None),
    };

    if line.is_none() && base.is_none() {
        return LineStyle::none();
    }

    let fill_source = line
        .filter(|l| l.fill.is_some())
        .or(base.filter(|l| l.fill.is_some()));

    let paint = match fill_source {
        Some(source) => {
            let from_theme = line.map_or(true, |l| !std::ptr::eq(l, source));
            let fill_ctx = match (&base_ctx, from_theme) {
                (Some(c), true) => c,
                _ => ctx,
            };
            resolve_fill(source.fill.as_ref(), fill_ctx)
        }
        None => Paint::Transparent,
    };
    if !paint.is_visible() {
        return LineStyle {
            paint,
            ..LineStyle::none()
        };
    }

    let width = line
        .and_then(|l| l.width)
        .or_else(|| base.and_then(|l| l.width))
        .filter(|w| *w > 0.0)
        .unwrap_or(DEFAULT_WIDTH);
    let dash = line
        .and_then(|l| l.dash.as_ref())
        .or_else(|| base.and_then(|l| l.dash.as_ref()))
        .map(|d| dash_array(d, width))
        .unwrap_or_default();

    LineStyle {
        width,
        paint,
        dash,
        cap: line
            .and_then(|l| l.cap)
            .or_else(|| base.and_then(|l| l.cap))
            .unwrap_or(LineCap::Flat),
        join: line
            .and_then(|l| l.join)
            .or_else(|| base.and_then(|l| l.join))
            .unwrap_or(LineJoin::Round),
        head: line
            .and_then(|l| l.head_end)
            .or_else(|| base.and_then(|l| l.head_end)),
        tail: line
            .and_then(|l| l.tail_end)
            .or_else(|| base.and_then(|l| l.tail_end)),
    }
}

/// Dash pattern in px. Preset patterns are multiples of the line width.
pub fn dash_array(dash: &Dash, width: f64) -> Vec<f64> {
    let units: &[f64] = match dash {
        Dash::Custom { stops } => {
            return stops
                .iter()
                .flat_map(|s| [s.d as f64, s.sp as f64])
                .map(|v| v / 100_000.0 * width)
                .collect();
        }
        Dash::Preset { val } => match val.as_str() {
            "solid" => &[],
            "dot" | "sysDot" => &[1.0, 1.0],
            "dash" => &[4.0, 3.0],
            "lgDash" => &[8.0, 3.0],
            "dashDot" => &[4.0, 3.0, 1.0, 3.0],
            "lgDashDot" => &[8.0, 3.0, 1.0, 3.0],
            "lgDashDotDot" => &[8.0, 3.0, 1.0, 3.0, 1.0, 3.0],
            "sysDash" => &[3.0, 1.0],
            "sysDashDot" => &[3.0, 1.0, 1.0, 1.0],
            "sysDashDotDot" => &[3.0, 1.0, 1.0, 1.0, 1.0, 1.0],
            other => {
                tracing::debug!(preset = other, "unknown dash preset, drawing solid");
                &[]
            }
        },
    };
    units.iter().map(|u| u * width).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_data::DashStop;

    #[test]
    fn preset_dash_scales_with_width() {
        let dash = Dash::Preset {
            val: "dashDot".into(),
        };
        assert_eq!(dash_array(&dash, 2.0), vec![8.0, 6.0, 2.0, 6.0]);
    }

    #[test]
    fn custom_dash_is_percent_of_width() {
        let dash = Dash::Custom {
            stops: vec![DashStop {
                d: 300_000,
                sp: 100_000,
            }],
        };
        assert_eq!(dash_array(&dash, 3.0), vec![9.0, 3.0]);
    }
}
