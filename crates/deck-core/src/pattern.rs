//! Preset pattern fills, degraded to stripes, grids, dot lattices or a flat
//! blend of foreground and background.

use crate::color::{resolve_color, ResolvedColor};
use crate::context::RenderContext;
use deck_data::PatternFill;

/// One repeating stripe layer, in px.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stripe {
    /// 0 = horizontal lines, 90 = vertical, 45 / -45 = diagonals.
    pub angle: f64,
    pub thickness: f64,
    pub period: f64,
    pub dashed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PatternPaint {
    Flat(ResolvedColor),
    Stripes {
        foreground: ResolvedColor,
        background: ResolvedColor,
        stripe: Stripe,
    },
    Grid {
        foreground: ResolvedColor,
        background: ResolvedColor,
        layers: [Stripe; 2],
    },
    Dots {
        foreground: ResolvedColor,
        background: ResolvedColor,
        radius: f64,
        spacing: f64,
    },
}

impl PatternPaint {
    pub fn map_colors(&self, f: impl Fn(ResolvedColor) -> ResolvedColor) -> PatternPaint {
        match self {
            PatternPaint::Flat(c) => PatternPaint::Flat(f(*c)),
            PatternPaint::Stripes {
                foreground,
                background,
                stripe,
            } => PatternPaint::Stripes {
                foreground: f(*foreground),
                background: f(*background),
                stripe: *stripe,
            },
            PatternPaint::Grid {
                foreground,
                background,
                layers,
            } => PatternPaint::Grid {
                foreground: f(*foreground),
                background: f(*background),
                layers: *layers,
            },
            PatternPaint::Dots {
                foreground,
                background,
                radius,
                spacing,
            } => PatternPaint::Dots {
                foreground: f(*foreground),
                background: f(*background),
                radius: *radius,
                spacing: *spacing,
            },
        }
    }
}

const DOT_SPACING: f64 = 8.0;

#[derive(Clone, Copy)]
enum Family {
    Horizontal,
    Vertical,
    Down,
    Up,
}

impl Family {
    fn angle(self) -> f64 {
        match self {
            Family::Horizontal => 0.0,
            Family::Vertical => 90.0,
            Family::Down => 45.0,
            Family::Up => -45.0,
        }
    }
}

fn stripe_for(name: &str) -> Option<Stripe> {
    let (class, family) = [
        ("Horz", Family::Horizontal),
        ("Vert", Family::Vertical),
        ("DnDiag", Family::Down),
        ("UpDiag", Family::Up),
    ]
    .into_iter()
    .find_map(|(suffix, family)| {
        if name.eq_ignore_ascii_case(suffix) {
            Some(("", family))
        } else {
            name.strip_suffix(suffix).map(|class| (class, family))
        }
    })?;
    let (thickness, period, dashed) = match class {
        "" => (1.0, 6.0, false),
        "lt" => (1.0, 8.0, false),
        "dk" => (2.5, 6.0, false),
        "nar" => (1.0, 3.0, false),
        "wd" => (4.0, 8.0, false),
        "dash" => (1.0, 6.0, true),
        _ => return None,
    };
    Some(Stripe {
        angle: family.angle(),
        thickness,
        period,
        dashed,
    })
}

fn grid_for(name: &str) -> Option<[Stripe; 2]> {
    let layer = |angle, thickness, period, dashed| Stripe {
        angle,
        thickness,
        period,
        dashed,
    };
    let layers = match name {
        "cross" | "smGrid" => [layer(0.0, 1.0, 4.0, false), layer(90.0, 1.0, 4.0, false)],
        "lgGrid" => [layer(0.0, 1.0, 8.0, false), layer(90.0, 1.0, 8.0, false)],
        "dotGrid" => [layer(0.0, 1.0, 8.0, true), layer(90.0, 1.0, 8.0, true)],
        "diagCross" | "openDmnd" => [layer(45.0, 1.0, 6.0, false), layer(-45.0, 1.0, 6.0, false)],
        "dashDnDiagCross" => [layer(45.0, 1.0, 6.0, true), layer(-45.0, 1.0, 6.0, true)],
        _ => return None,
    };
    Some(layers)
}

/// Texture-like presets that cannot be reproduced as stripes: share of the
/// foreground in a flat blend.
fn texture_density(name: &str) -> Option<f64> {
    let density = match name {
        "solidDmnd" | "sphere" | "weave" | "smCheck" | "lgCheck" => 0.5,
        "trellis" => 0.6,
        "plaid" => 0.45,
        "zigZag" => 0.4,
        "shingle" | "wave" | "lgConfetti" => 0.35,
        "horzBrick" | "diagBrick" | "smConfetti" => 0.3,
        "divot" => 0.25,
        _ => return None,
    };
    Some(density)
}

fn percent_density(name: &str) -> Option<f64> {
    let pct: u32 = name.strip_prefix("pct")?.parse().ok()?;
    (1..=100).contains(&pct).then(|| pct as f64 / 100.0)
}

fn blend(fg: ResolvedColor, bg: ResolvedColor, density: f64) -> ResolvedColor {
    let mix = |f: u8, b: u8| (f as f64 * density + b as f64 * (1.0 - density)).round() as u8;
    ResolvedColor {
        r: mix(fg.r, bg.r),
        g: mix(fg.g, bg.g),
        b: mix(fg.b, bg.b),
        alpha: fg.alpha * density + bg.alpha * (1.0 - density),
    }
}

pub fn resolve_pattern(pattern: &PatternFill, ctx: &RenderContext) -> PatternPaint {
    let foreground = pattern
        .fg
        .as_ref()
        .map(|c| *resolve_color(c, ctx))
        .unwrap_or(ResolvedColor::BLACK);
    let background = pattern
        .bg
        .as_ref()
        .map(|c| *resolve_color(c, ctx))
        .unwrap_or(ResolvedColor::WHITE);
    let name = pattern.preset.as_str();

    if let Some(density) = percent_density(name) {
        // Dot area matches the preset coverage; past ~78% dots would touch,
        // so the lattice collapses into a flat blend.
        let radius = DOT_SPACING * (density / std::f64::consts::PI).sqrt();
        if radius >= DOT_SPACING / 2.0 {
            return PatternPaint::Flat(blend(foreground, background, density));
        }
        return PatternPaint::Dots {
            foreground,
            background,
            radius,
            spacing: DOT_SPACING,
        };
    }
    if let Some(layers) = grid_for(name) {
        return PatternPaint::Grid {
            foreground,
            background,
            layers,
        };
    }
    if let Some(stripe) = stripe_for(name) {
        return PatternPaint::Stripes {
            foreground,
            background,
            stripe,
        };
    }
    if let Some(density) = texture_density(name) {
        return PatternPaint::Flat(blend(foreground, background, density));
    }
    tracing::debug!(preset = name, "unknown pattern preset, using background color");
    PatternPaint::Flat(background)
}
