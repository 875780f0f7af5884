//! Per-render chart configuration, serializable as an ECharts option object.
//!
//! The tooltip formatter and position callbacks are not data; the host pairs
//! [`TooltipOption`] with [`crate::tooltip::tooltip_content`] and
//! [`crate::tooltip::place_tooltip`].

use serde::Serialize;

use crate::catalog::RegionName;
use crate::selection::Selection;
use crate::style::{RegionStyleOverride, ResolvedStyle, StyleProfile, resolve_styles};
use crate::tooltip::{HIDE_DELAY_MS, SHOW_DELAY_MS, TooltipBehavior, TooltipStyle};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapOption {
    pub tooltip: TooltipOption,
    pub title: Vec<TitleOption>,
    pub legend: Vec<LegendOption>,
    pub background_color: &'static str,
    pub x_axis: AxisOption,
    pub y_axis: AxisOption,
    pub geo: GeoOption,
    pub series: Vec<SeriesOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipOption {
    pub trigger: &'static str,
    pub trigger_on: &'static str,
    pub show_delay: u32,
    pub hide_delay: u32,
    /// Pointer may move onto the tooltip without it hiding.
    pub enterable: bool,
    pub style: TooltipStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub color: &'static str,
    pub font_size: f64,
}

impl TextStyle {
    pub fn css(&self) -> String {
        format!("color: {}; font-size: {}px;", self.color, self.font_size)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleOption {
    pub text: String,
    pub text_style: TextStyle,
    pub subtext: String,
    pub subtext_style: TextStyle,
    pub top: &'static str,
    pub left: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendOption {
    pub selected_mode: &'static str,
    pub top: &'static str,
    pub orient: &'static str,
    pub data: Vec<String>,
    pub left: &'static str,
    pub show: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisOption {
    pub show: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoOption {
    pub map: String,
    pub roam: bool,
    pub selected_mode: bool,
    /// Map-level profile every region inherits from.
    #[serde(flatten)]
    pub base: StyleProfile,
    /// Profile applied while a region is hovered.
    pub emphasis: StyleProfile,
    pub regions: Vec<RegionStyleOverride>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesOption {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub geo_index: u32,
    pub coordinate_system: &'static str,
    pub data: Vec<[f64; 2]>,
    pub name: String,
    pub symbol: &'static str,
}

impl MapOption {
    pub fn build(map_name: &str, catalog: &[RegionName], selection: &Selection) -> Self {
        Self {
            tooltip: TooltipOption {
                trigger: "item",
                trigger_on: "mousemove|click",
                show_delay: SHOW_DELAY_MS,
                hide_delay: HIDE_DELAY_MS,
                enterable: true,
                style: TooltipStyle::default(),
            },
            title: vec![TitleOption {
                text: map_name.to_owned(),
                text_style: TextStyle {
                    color: "#000",
                    font_size: 18.0,
                },
                subtext: format!("{map_name}地图演示"),
                subtext_style: TextStyle {
                    color: "#aaa",
                    font_size: 12.0,
                },
                top: "20px",
                left: "20px",
            }],
            legend: vec![LegendOption {
                selected_mode: "multiple",
                top: "top",
                orient: "horizontal",
                data: vec![String::new()],
                left: "center",
                show: true,
            }],
            background_color: "#fff",
            x_axis: AxisOption { show: false },
            y_axis: AxisOption { show: false },
            geo: GeoOption {
                map: map_name.to_owned(),
                roam: false,
                selected_mode: false,
                base: StyleProfile::DEFAULT,
                emphasis: StyleProfile::HIGHLIGHTED,
                regions: resolve_styles(catalog, selection),
            },
            series: vec![SeriesOption {
                kind: "scatter",
                geo_index: 0,
                coordinate_system: "geo",
                data: Vec::new(),
                name: String::new(),
                symbol: "circle",
            }],
        }
    }
}

impl TooltipOption {
    pub fn behavior(&self) -> TooltipBehavior {
        TooltipBehavior {
            show_delay_ms: self.show_delay,
            hide_delay_ms: self.hide_delay,
            enterable: self.enterable,
        }
    }
}

impl GeoOption {
    /// Concrete style for a drawn region. Hover emphasis wins over the region's
    /// own override; unnamed or unlisted regions use the map-level profile.
    pub fn style_for(&self, name: Option<&str>, hovered: bool) -> ResolvedStyle {
        if hovered {
            return self.emphasis.resolve_over(&self.base);
        }
        name.and_then(|name| self.regions.iter().find(|region| region.name == name))
            .map(|region| &region.profile)
            .unwrap_or(&self.base)
            .resolve_over(&self.base)
    }
}
