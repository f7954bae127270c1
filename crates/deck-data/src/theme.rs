use crate::fill::{EffectList, Fill, Line};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Theme {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "colorScheme")]
    pub color_scheme: ColorScheme,
    #[serde(default)]
    pub fonts: FontScheme,
    #[serde(default, rename = "formatScheme")]
    pub format_scheme: FormatScheme,
}

/// The twelve theme color slots, keyed `dk1, lt1, dk2, lt2, accent1..6,
/// hlink, folHlink`, valued as six hex digits.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(transparent)]
pub struct ColorScheme(pub BTreeMap<String, String>);

impl ColorScheme {
    pub const SLOTS: [&'static str; 12] = [
        "dk1", "lt1", "dk2", "lt2", "accent1", "accent2", "accent3", "accent4", "accent5",
        "accent6", "hlink", "folHlink",
    ];

    /// Looks up a slot, accepting the long slot names as aliases.
    pub fn get(&self, name: &str) -> Option<&str> {
        let key = match name {
            "dark1" => "dk1",
            "light1" => "lt1",
            "dark2" => "dk2",
            "light2" => "lt2",
            "hyperlink" => "hlink",
            "followedHyperlink" => "folHlink",
            other => other,
        };
        self.0.get(key).map(String::as_str)
    }

    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

/// `clrMap` / `clrMapOvr`: abstract slot (`bg1`, `tx1`, ...) to scheme slot.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(transparent)]
pub struct ColorMap(pub BTreeMap<String, String>);

impl ColorMap {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }
}

impl Default for ColorMap {
    fn default() -> Self {
        let pairs = [
            ("bg1", "lt1"),
            ("tx1", "dk1"),
            ("bg2", "lt2"),
            ("tx2", "dk2"),
            ("accent1", "accent1"),
            ("accent2", "accent2"),
            ("accent3", "accent3"),
            ("accent4", "accent4"),
            ("accent5", "accent5"),
            ("accent6", "accent6"),
            ("hlink", "hlink"),
            ("folHlink", "folHlink"),
        ];
        Self(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FontScheme {
    #[serde(default = "default_major_font")]
    pub major: String,
    #[serde(default = "default_minor_font")]
    pub minor: String,
}

impl Default for FontScheme {
    fn default() -> Self {
        Self {
            major: default_major_font(),
            minor: default_minor_font(),
        }
    }
}

fn default_major_font() -> String {
    "Calibri Light".to_string()
}

fn default_minor_font() -> String {
    "Calibri".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct FormatScheme {
    #[serde(default, rename = "fillStyles")]
    pub fill_styles: Vec<Fill>,
    #[serde(default, rename = "lineStyles")]
    pub line_styles: Vec<Line>,
    #[serde(default, rename = "effectStyles")]
    pub effect_styles: Vec<EffectList>,
    #[serde(default, rename = "bgFillStyles")]
    pub bg_fill_styles: Vec<Fill>,
}
