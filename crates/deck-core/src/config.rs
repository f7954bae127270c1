use serde::{Deserialize, Serialize};

pub const EMU_PER_PX: f64 = 9525.0;
pub const PX_PER_PT: f64 = 96.0 / 72.0;

/// Tunables for a render pass. Every field has a default so a partial JSON
/// document is enough to override a single value.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Font size used when no level of the style chain declares one (pt).
    pub default_font_size: f64,
    /// Used when no `defTabSz` is declared (EMU).
    pub default_tab_size: i64,
    /// Normal line height as a multiple of the font size.
    pub line_height: f64,
    /// Smallest arrowhead marker box edge (px).
    pub marker_min_box: f64,
    /// `|baseline|` at or above this (1/1000 percent) shrinks the run.
    pub baseline_shrink_threshold: i32,
    pub baseline_shrink_factor: f64,
    pub dynamic_autofit: bool,
    pub autofit_min_scale: f64,
    pub autofit_max_iterations: u32,
    /// Upper bound for the line spacing reduction dynamic autofit applies.
    pub autofit_max_line_reduction: f64,
    pub max_group_depth: usize,
    /// Fill of the placeholder emitted for a failed child.
    pub error_placeholder_color: String,
    /// Flattening tolerance for arcs and ellipses (px).
    pub curve_tolerance: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            default_font_size: 18.0,
            default_tab_size: 914_400,
            line_height: 1.2,
            marker_min_box: 6.0,
            baseline_shrink_threshold: 10_000,
            baseline_shrink_factor: 0.65,
            dynamic_autofit: true,
            autofit_min_scale: 0.25,
            autofit_max_iterations: 12,
            autofit_max_line_reduction: 0.2,
            max_group_depth: 64,
            error_placeholder_color: "E0245E".to_string(),
            curve_tolerance: 0.1,
        }
    }
}

impl RenderConfig {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn default_tab_px(&self) -> f64 {
        self.default_tab_size as f64 / EMU_PER_PX
    }
}
