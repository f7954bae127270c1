//! Text measurement and the shrink-on-overflow search.
//!
//! Measurement is a pure function of laid-out paragraphs: it never touches
//! the output tree, so the dynamic search can run it as often as it likes.

use crate::config::RenderConfig;
use crate::text::{LineHeight, ParagraphLayout, TextFragment};
use unicode_segmentation::UnicodeSegmentation;

/// Width of a piece of text set in one font.
pub trait TextMeasurer {
    /// Advance width in px of `text` at `size_px`.
    fn measure(&self, text: &str, font: &str, size_px: f64) -> f64;
}

impl<F> TextMeasurer for F
where
    F: Fn(&str, &str, f64) -> f64,
{
    fn measure(&self, text: &str, font: &str, size_px: f64) -> f64 {
        self(text, font, size_px)
    }
}

/// Average glyph advances of a proportional sans face.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicMeasurer;

impl HeuristicMeasurer {
    fn advance(grapheme: &str) -> f64 {
        let Some(c) = grapheme.chars().next() else {
            return 0.0;
        };
        match c {
            ' ' | '\u{a0}' => 0.28,
            '\t' => 0.0,
            'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '\'' | '!' | '|' => 0.25,
            'f' | 'r' | 't' | 'I' | '(' | ')' | '[' | ']' => 0.35,
            'm' | 'w' | 'M' | 'W' | '@' => 0.85,
            'A'..='Z' | '0'..='9' => 0.62,
            c if c.is_ascii() => 0.5,
            // CJK and other wide scripts
            c if (c as u32) >= 0x2E80 => 1.0,
            _ => 0.55,
        }
    }
}

impl TextMeasurer for HeuristicMeasurer {
    fn measure(&self, text: &str, _font: &str, size_px: f64) -> f64 {
        text.graphemes(true).map(Self::advance).sum::<f64>() * size_px
    }
}

/// Height of the given paragraphs laid out in a box `width` px wide.
pub fn measure_height(
    paragraphs: &[ParagraphLayout],
    width: f64,
    wrap: bool,
    measurer: &dyn TextMeasurer,
    config: &RenderConfig,
) -> f64 {
    paragraphs
        .iter()
        .map(|p| {
            let lines = line_sizes(p, width, wrap, measurer);
            let body: f64 = lines
                .iter()
                .map(|&size| line_height(p.line_height, size, config))
                .sum();
            p.space_before + body + p.space_after
        })
        .sum()
}

fn line_height(spacing: LineHeight, font_px: f64, config: &RenderConfig) -> f64 {
    match spacing {
        LineHeight::Multiple(m) => font_px * config.line_height * m,
        LineHeight::Exact(px) => px,
    }
}

/// Largest font size on each wrapped line.
fn line_sizes(p: &ParagraphLayout, width: f64, wrap: bool, measurer: &dyn TextMeasurer) -> Vec<f64> {
    let mut lines = Vec::new();
    let mut current_width = 0.0;
    let mut current_size: Option<f64> = None;
    let mut first_line = true;

    let available = |first: bool| {
        let indent = if first { p.indent } else { 0.0 };
        (width - p.margin_left - indent).max(1.0)
    };

    for fragment in &p.fragments {
        let run = match fragment {
            TextFragment::Break => {
                lines.push(current_size.unwrap_or(p.empty_line_size));
                current_size = None;
                current_width = 0.0;
                first_line = false;
                continue;
            }
            TextFragment::Run(run) => run,
        };
        for word in run.text.split_word_bounds() {
            let advance = if word == "\t" {
                let tab = p.tab_size.max(1.0);
                (current_width / tab).floor() * tab + tab - current_width
            } else {
                measurer.measure(word, &run.font_family, run.size_px)
                    + run.letter_spacing * word.chars().count() as f64
            };
            let is_space = word.chars().all(char::is_whitespace);
            if wrap
                && !is_space
                && current_width > 0.0
                && current_width + advance > available(first_line)
            {
                lines.push(current_size.unwrap_or(p.empty_line_size));
                current_size = None;
                current_width = 0.0;
                first_line = false;
            }
            current_width += advance;
            current_size = Some(current_size.map_or(run.size_px, |s| s.max(run.size_px)));
        }
    }
    lines.push(current_size.unwrap_or(p.empty_line_size));
    lines
}

/// Font scale and line spacing reduction, both as fractions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutofitResult {
    pub font_scale: f64,
    pub line_reduction: f64,
}

impl AutofitResult {
    pub const NONE: AutofitResult = AutofitResult {
        font_scale: 1.0,
        line_reduction: 0.0,
    };
}

/// Finds the largest font scale in `[autofit_min_scale, 1]` whose measured
/// height fits `available`. Line spacing is reduced first; the font only
/// shrinks when that is not enough.
pub fn fit_text(
    available: f64,
    config: &RenderConfig,
    measure: impl Fn(AutofitResult) -> f64,
) -> AutofitResult {
    if measure(AutofitResult::NONE) <= available {
        return AutofitResult::NONE;
    }
    let reduced = AutofitResult {
        font_scale: 1.0,
        line_reduction: config.autofit_max_line_reduction,
    };
    if measure(reduced) <= available {
        return reduced;
    }

    let at = |scale: f64| AutofitResult {
        font_scale: scale,
        line_reduction: config.autofit_max_line_reduction.min(1.0 - scale).max(0.0),
    };
    let min_scale = config.autofit_min_scale.clamp(0.01, 1.0);
    if measure(at(min_scale)) > available {
        tracing::debug!(min_scale, "text overflows even at the minimum autofit scale");
        return at(min_scale);
    }

    let (mut lo, mut hi) = (min_scale, 1.0);
    for _ in 0..config.autofit_max_iterations {
        let mid = (lo + hi) / 2.0;
        if measure(at(mid)) <= available {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    at(lo)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heuristic_width_scales_with_size() {
        let m = HeuristicMeasurer;
        let small = m.measure("Hello", "Calibri", 10.0);
        let large = m.measure("Hello", "Calibri", 20.0);
        assert!(small > 0.0);
        assert!((large - 2.0 * small).abs() < 1e-9);
    }

    #[test]
    fn fitting_content_is_left_alone() {
        let config = RenderConfig::default();
        let out = fit_text(100.0, &config, |_| 50.0);
        assert_eq!(out, AutofitResult::NONE);
    }

    #[test]
    fn search_converges_below_available_height() {
        let config = RenderConfig::default();
        // Height proportional to scale, with line spacing shaving a bit off.
        let measure = |r: AutofitResult| 200.0 * r.font_scale * (1.0 - r.line_reduction / 2.0);
        let out = fit_text(100.0, &config, measure);
        assert!(measure(out) <= 100.0);
        assert!(out.font_scale > config.autofit_min_scale);
        assert!(out.font_scale < 1.0);
    }

    #[test]
    fn overflow_stops_at_minimum_scale() {
        let config = RenderConfig::default();
        let out = fit_text(1.0, &config, |_| 1000.0);
        assert_eq!(out.font_scale, config.autofit_min_scale);
    }
}
