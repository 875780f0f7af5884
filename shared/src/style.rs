use serde::Serialize;

use crate::catalog::RegionName;
use crate::selection::Selection;

/// Label size the renderer uses when no profile sets one.
pub const FALLBACK_FONT_SIZE: f64 = 12.0;
/// Border the renderer uses when no profile sets one.
pub const FALLBACK_BORDER_COLOR: &str = "#000";
pub const FALLBACK_BORDER_WIDTH: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Normal,
    Bold,
}

impl FontWeight {
    pub fn css(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Bold => "bold",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show: Option<bool>,
    pub color: &'static str,
    pub font_weight: FontWeight,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemStyle {
    pub area_color: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f64>,
}

/// Bundle of visual attributes applied to a whole region.
/// Unset attributes inherit from the map-level profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleProfile {
    pub label: LabelStyle,
    pub item_style: ItemStyle,
}

impl StyleProfile {
    pub const DEFAULT: Self = Self {
        label: LabelStyle {
            show: Some(true),
            color: "#333",
            font_weight: FontWeight::Normal,
            font_size: Some(12.0),
        },
        item_style: ItemStyle {
            area_color: "#e8f4f8",
            border_color: Some("#fff"),
            border_width: Some(1.5),
        },
    };

    pub const HIGHLIGHTED: Self = Self {
        label: LabelStyle {
            show: None,
            color: "#fff",
            font_weight: FontWeight::Bold,
            font_size: None,
        },
        item_style: ItemStyle {
            area_color: "#1890ff",
            border_color: None,
            border_width: None,
        },
    };

    /// Fill in every unset attribute from `base`, then from the renderer fallbacks.
    pub fn resolve_over(&self, base: &StyleProfile) -> ResolvedStyle {
        ResolvedStyle {
            label_show: self.label.show.or(base.label.show).unwrap_or(true),
            label_color: self.label.color,
            label_font_weight: self.label.font_weight,
            label_font_size: self
                .label
                .font_size
                .or(base.label.font_size)
                .unwrap_or(FALLBACK_FONT_SIZE),
            area_color: self.item_style.area_color,
            border_color: self
                .item_style
                .border_color
                .or(base.item_style.border_color)
                .unwrap_or(FALLBACK_BORDER_COLOR),
            border_width: self
                .item_style
                .border_width
                .or(base.item_style.border_width)
                .unwrap_or(FALLBACK_BORDER_WIDTH),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileKind {
    Default,
    Highlighted,
}

impl ProfileKind {
    pub fn profile(self) -> StyleProfile {
        match self {
            Self::Default => StyleProfile::DEFAULT,
            Self::Highlighted => StyleProfile::HIGHLIGHTED,
        }
    }
}

/// One entry of the per-region style list, serialized as an ECharts `geo.regions` item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionStyleOverride {
    pub name: RegionName,
    #[serde(skip)]
    pub kind: ProfileKind,
    #[serde(flatten)]
    pub profile: StyleProfile,
}

/// Every attribute concrete, ready to hand to a 2D context.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedStyle {
    pub label_show: bool,
    pub label_color: &'static str,
    pub label_font_weight: FontWeight,
    pub label_font_size: f64,
    pub area_color: &'static str,
    pub border_color: &'static str,
    pub border_width: f64,
}

impl ResolvedStyle {
    pub fn label_font(&self) -> String {
        format!(
            "{} {}px sans-serif",
            self.label_font_weight.css(),
            self.label_font_size
        )
    }
}

/// Style list for `catalog`, same length and order. Entries equal to the
/// selection are highlighted, all others get the default profile.
pub fn resolve_styles(catalog: &[RegionName], selection: &Selection) -> Vec<RegionStyleOverride> {
    catalog
        .iter()
        .map(|name| {
            let kind = if selection.is(name) {
                ProfileKind::Highlighted
            } else {
                ProfileKind::Default
            };
            RegionStyleOverride {
                name: name.clone(),
                kind,
                profile: kind.profile(),
            }
        })
        .collect()
}
