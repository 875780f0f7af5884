use std::fmt::Write as FmtWrite;

use serde::Serialize;

/// Vertical gap between the anchor point and the tooltip's top edge.
pub const TOOLTIP_OFFSET_Y: f64 = 20.0;
/// Minimum distance kept between the tooltip and every viewport edge.
pub const VIEWPORT_MARGIN: f64 = 10.0;
pub const SHOW_DELAY_MS: u32 = 0;
pub const HIDE_DELAY_MS: u32 = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipStyle {
    pub background_color: &'static str,
    pub border_color: &'static str,
    pub border_width: f64,
    pub border_radius: f64,
    pub box_shadow: &'static str,
    pub color: &'static str,
    pub font_size: f64,
}

impl Default for TooltipStyle {
    fn default() -> Self {
        Self {
            background_color: "rgba(255, 255, 255, 0.95)",
            border_color: "#1890ff",
            border_width: 1.0,
            border_radius: 4.0,
            box_shadow: "0 2px 8px rgba(0, 0, 0, 0.1)",
            color: "#333",
            font_size: 12.0,
        }
    }
}

impl TooltipStyle {
    /// Inline CSS for the tooltip box.
    pub fn css(&self) -> String {
        format!(
            "background-color: {}; border: {}px solid {}; border-radius: {}px; box-shadow: {}; color: {}; font-size: {}px;",
            self.background_color,
            self.border_width,
            self.border_color,
            self.border_radius,
            self.box_shadow,
            self.color,
            self.font_size,
        )
    }
}

/// Inline HTML fragment shown for a hovered region.
pub fn tooltip_content(name: &str) -> String {
    let mut html = String::with_capacity(name.len() + 40);
    html.push_str(r#"<div style="padding: 4px 8px">"#);
    push_escaped(&mut html, name);
    html.push_str("</div>");
    html
}

fn push_escaped(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c if c.is_control() => {
                let _ = write!(out, "&#{};", c as u32);
            }
            c => out.push(c),
        }
    }
}

/// Timer work for the tooltip after a hover or tooltip-boundary change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TooltipAction {
    /// Cancel any pending hide, then show after `delay_ms` (immediately at 0).
    Show { delay_ms: u32 },
    /// Cancel any pending show, then hide after `delay_ms`.
    Hide { delay_ms: u32 },
    /// Cancel any pending hide and keep the tooltip as it is.
    Hold,
    /// Leave timers and visibility untouched.
    Ignore,
}

/// Show/hide timing of an item tooltip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TooltipBehavior {
    pub show_delay_ms: u32,
    pub hide_delay_ms: u32,
    /// The pointer may move onto the tooltip without it closing.
    pub enterable: bool,
}

impl Default for TooltipBehavior {
    fn default() -> Self {
        Self {
            show_delay_ms: SHOW_DELAY_MS,
            hide_delay_ms: HIDE_DELAY_MS,
            enterable: true,
        }
    }
}

impl TooltipBehavior {
    /// The hovered item changed. `hovering` is whether a labelled item is under
    /// the pointer now; `over_tooltip` whether the pointer sits on the tooltip.
    pub fn on_hover(&self, hovering: bool, over_tooltip: bool) -> TooltipAction {
        if hovering {
            TooltipAction::Show {
                delay_ms: self.show_delay_ms,
            }
        } else if self.enterable && over_tooltip {
            TooltipAction::Hold
        } else {
            TooltipAction::Hide {
                delay_ms: self.hide_delay_ms,
            }
        }
    }

    pub fn on_tooltip_enter(&self) -> TooltipAction {
        if self.enterable {
            TooltipAction::Hold
        } else {
            TooltipAction::Ignore
        }
    }

    /// Pointer left the tooltip box while `hovering` reports the map hover.
    pub fn on_tooltip_leave(&self, hovering: bool) -> TooltipAction {
        if !self.enterable || hovering {
            TooltipAction::Ignore
        } else {
            TooltipAction::Hide {
                delay_ms: self.hide_delay_ms,
            }
        }
    }
}

/// Point the tooltip hangs from: the hovered datum's coordinate, else the
/// event's coordinate, else the raw pointer position.
pub fn resolve_anchor(
    data_coord: Option<[f64; 2]>,
    event_coord: Option<[f64; 2]>,
    pointer: [f64; 2],
) -> [f64; 2] {
    data_coord.or(event_coord).unwrap_or(pointer)
}

/// Top-left corner for a tooltip of `tooltip_size` hung below `anchor`, kept
/// inside `view_size` with [`VIEWPORT_MARGIN`] on every side. When the view is
/// too small to fit the box, it is pinned at the leading margin.
pub fn place_tooltip(anchor: [f64; 2], tooltip_size: [f64; 2], view_size: [f64; 2]) -> [f64; 2] {
    let target_x = anchor[0];
    let target_y = anchor[1] + TOOLTIP_OFFSET_Y;
    [
        clamp_axis(target_x, tooltip_size[0], view_size[0]),
        clamp_axis(target_y, tooltip_size[1], view_size[1]),
    ]
}

fn clamp_axis(target: f64, size: f64, view: f64) -> f64 {
    target
        .min(view - size - VIEWPORT_MARGIN)
        .max(VIEWPORT_MARGIN)
}

#[cfg(test)]
mod tests {
    use super::{
        TooltipAction, TooltipBehavior, TooltipStyle, place_tooltip, resolve_anchor,
        tooltip_content,
    };

    #[test]
    fn places_below_anchor_when_room() {
        assert_eq!(
            place_tooltip([300.0, 200.0], [100.0, 40.0], [1200.0, 900.0]),
            [300.0, 220.0]
        );
    }

    #[test]
    fn clamps_near_bottom_right_corner() {
        assert_eq!(
            place_tooltip([1150.0, 880.0], [100.0, 40.0], [1200.0, 900.0]),
            [1090.0, 850.0]
        );
    }

    #[test]
    fn clamps_to_leading_margin() {
        assert_eq!(
            place_tooltip([-50.0, -100.0], [100.0, 40.0], [1200.0, 900.0]),
            [10.0, 10.0]
        );
    }

    #[test]
    fn oversized_tooltip_pins_to_margin() {
        assert_eq!(
            place_tooltip([60.0, 60.0], [300.0, 300.0], [200.0, 200.0]),
            [10.0, 10.0]
        );
    }

    #[test]
    fn anchor_prefers_data_then_event_then_pointer() {
        let pointer = [5.0, 6.0];
        assert_eq!(resolve_anchor(Some([1.0, 2.0]), Some([3.0, 4.0]), pointer), [1.0, 2.0]);
        assert_eq!(resolve_anchor(None, Some([3.0, 4.0]), pointer), [3.0, 4.0]);
        assert_eq!(resolve_anchor(None, None, pointer), pointer);
    }

    #[test]
    fn content_wraps_name() {
        assert_eq!(
            tooltip_content("武汉市"),
            r#"<div style="padding: 4px 8px">武汉市</div>"#
        );
    }

    #[test]
    fn content_escapes_markup() {
        assert_eq!(
            tooltip_content("<b>\"A&B\"</b>"),
            r#"<div style="padding: 4px 8px">&lt;b&gt;&quot;A&amp;B&quot;&lt;/b&gt;</div>"#
        );
    }

    #[test]
    fn style_css_uses_box_chrome() {
        let css = TooltipStyle::default().css();
        assert!(css.contains("border: 1px solid #1890ff;"));
        assert!(css.contains("border-radius: 4px;"));
        assert!(css.contains("font-size: 12px;"));
    }

    #[test]
    fn shows_immediately_and_hides_after_delay() {
        let behavior = TooltipBehavior::default();
        assert_eq!(behavior.on_hover(true, false), TooltipAction::Show { delay_ms: 0 });
        assert_eq!(behavior.on_hover(false, false), TooltipAction::Hide { delay_ms: 100 });
    }

    #[test]
    fn entering_tooltip_cancels_pending_hide() {
        let behavior = TooltipBehavior::default();
        // Pointer leaves the region for the tooltip: hide is queued, then held.
        assert_eq!(behavior.on_hover(false, false), TooltipAction::Hide { delay_ms: 100 });
        assert_eq!(behavior.on_tooltip_enter(), TooltipAction::Hold);
        // Hover clearing while already on the tooltip does not queue a hide.
        assert_eq!(behavior.on_hover(false, true), TooltipAction::Hold);
        assert_eq!(behavior.on_tooltip_leave(false), TooltipAction::Hide { delay_ms: 100 });
        assert_eq!(behavior.on_tooltip_leave(true), TooltipAction::Ignore);
    }

    #[test]
    fn non_enterable_tooltip_ignores_its_own_box() {
        let behavior = TooltipBehavior {
            enterable: false,
            ..TooltipBehavior::default()
        };
        assert_eq!(behavior.on_tooltip_enter(), TooltipAction::Ignore);
        assert_eq!(behavior.on_tooltip_leave(false), TooltipAction::Ignore);
        assert_eq!(behavior.on_hover(false, true), TooltipAction::Hide { delay_ms: 100 });
    }

    #[test]
    fn show_delay_is_passed_through() {
        let behavior = TooltipBehavior {
            show_delay_ms: 250,
            ..TooltipBehavior::default()
        };
        assert_eq!(behavior.on_hover(true, true), TooltipAction::Show { delay_ms: 250 });
    }
}
